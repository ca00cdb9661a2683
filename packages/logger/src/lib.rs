//! Process-wide log sink with a single registration slot.
//!
//! Nothing is written anywhere by default: a host registers a callback with
//! [`set_callback`] and every [`debug!`], [`info!`], [`warn!`] and [`error!`]
//! invocation across the process is formatted and forwarded to it. While no
//! callback is registered, logging is silently disabled and the message is
//! never formatted at all.

use std::fmt;
use std::sync::RwLock;

/// Timestamp related functions.
///
/// This module is used by [`emit`] to stamp every [`Record`]; it is public so
/// that a callback can produce matching timestamps of its own.
pub mod timestamp {
    use chrono::Utc;

    /// Generate the current timestamp.
    pub fn now() -> String {
        Utc::now().to_rfc3339()
    }
}

/// Severity of a log [`Record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// The upper-case label for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One formatted log event, as delivered to the registered callback.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    /// RFC 3339 timestamp taken when the event was emitted.
    pub timestamp: String,

    /// Name of the crate that emitted the event.
    pub tag: &'a str,

    /// Severity of the event.
    pub level: Level,

    /// Source line of the emitting macro invocation.
    pub line: u32,

    /// Module path of the emitting macro invocation.
    pub module_path: &'a str,

    /// The formatted message.
    pub message: &'a str,
}

/// The callback type held in the registration slot.
pub type LogCallback = Box<dyn Fn(&Record) + Send + Sync>;

static CALLBACK: RwLock<Option<LogCallback>> = RwLock::new(None);

/// Register the process-wide log callback, replacing any previous one.
pub fn set_callback(callback: impl Fn(&Record) + Send + Sync + 'static) {
    if let Ok(mut slot) = CALLBACK.write() {
        *slot = Some(Box::new(callback));
    }
}

/// Remove the process-wide log callback, disabling all logging.
pub fn clear_callback() {
    if let Ok(mut slot) = CALLBACK.write() {
        *slot = None;
    }
}

/// Check whether a log callback is currently registered.
pub fn is_set() -> bool {
    CALLBACK.read().map(|slot| slot.is_some()).unwrap_or(false)
}

/// Forward one event to the registered callback, if any.
///
/// The message is only formatted once a callback is known to be registered.
/// This is the support function behind the level macros; call those instead.
pub fn emit(tag: &str, level: Level, line: u32, module_path: &str, args: fmt::Arguments<'_>) {
    // A poisoned slot means a callback panicked; skip logging rather than
    // propagate the panic into unrelated callers.
    let Ok(slot) = CALLBACK.read() else {
        return;
    };

    if let Some(callback) = slot.as_ref() {
        let message = args.to_string();
        callback(&Record {
            timestamp: timestamp::now(),
            tag,
            level,
            line,
            module_path,
            message: &message,
        });
    }
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{
        $crate::emit(
            env!("CARGO_PKG_NAME"),
            $crate::Level::Debug,
            line!(),
            module_path!(),
            format_args!($($arg)*),
        );
    }};
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        $crate::emit(
            env!("CARGO_PKG_NAME"),
            $crate::Level::Info,
            line!(),
            module_path!(),
            format_args!($($arg)*),
        );
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        $crate::emit(
            env!("CARGO_PKG_NAME"),
            $crate::Level::Warn,
            line!(),
            module_path!(),
            format_args!($($arg)*),
        );
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        $crate::emit(
            env!("CARGO_PKG_NAME"),
            $crate::Level::Error,
            line!(),
            module_path!(),
            format_args!($($arg)*),
        );
    }};
}
