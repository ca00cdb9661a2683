//! Broadcast discovery requests and print whatever answers as JSON lines.
//!
//! This is a simple example to demonstrate how to use the [`scout`] library:
//! the listening socket's descriptor is handed to the runtime for readiness,
//! and every wake-up drains the socket with `poll_once` while an interval
//! drives the discovery rounds.

use std::os::fd::{AsRawFd, RawFd};

use clap::Parser;
use tokio::io::unix::AsyncFd;
use tokio::io::Interest;

use scout::{example::DiscoveryEvent, logger, CliArgs, DiscoveryContext, PollOutcome, ScoutError};

/// Borrowed handle to the listening socket's descriptor, registered with the
/// runtime for readiness only; the context retains ownership of the socket.
struct ListenerFd(RawFd);

impl AsRawFd for ListenerFd {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ScoutError> {
    let args = CliArgs::parse();

    logger::set_callback(|record| {
        eprintln!(
            "{timestamp} {level:5} {module}:{line} | {message}",
            timestamp = record.timestamp,
            level = record.level,
            module = record.module_path,
            line = record.line,
            message = record.message,
        );
    });

    let mut context = DiscoveryContext::new(args.port, args.search_target).with_data_sink(
        |_: &DiscoveryContext, data: &[u8]| {
            let event = DiscoveryEvent::from_payload(data);
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => logger::error!("Failed to serialise event: {err}"),
            }
        },
    );

    context.open_listener()?;

    let listener_fd = context
        .listener()
        .map(|listener| ListenerFd(listener.as_raw_fd()))
        .expect("The listener was just opened.");
    let readiness =
        AsyncFd::with_interest(listener_fd, Interest::READABLE).map_err(ScoutError::Socket)?;

    let mut rounds = tokio::time::interval(std::time::Duration::from_secs(args.interval));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("SIGINT received, gracefully shutting down.");
                break;
            },
            _ = rounds.tick() => {
                if let Err(err) = context.send_msearch() {
                    logger::warn!("Discovery round failed: {err}");
                }
            },
            guard = readiness.readable() => {
                let mut guard = guard.map_err(ScoutError::Receive)?;

                // Drain everything pending before waiting for readiness
                // again.
                loop {
                    match context.poll_once() {
                        Ok(PollOutcome::Received(_)) => continue,
                        Ok(PollOutcome::NoData) => break,
                        Err(err) => {
                            logger::error!("Receive failed: {err}");
                            break;
                        }
                    }
                }
                guard.clear_ready();
            },
        }
    }

    context.close_listener();
    logger::clear_callback();
    Ok(())
}
