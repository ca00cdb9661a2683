use std::sync::Mutex;

macro_rules! expand_levels {
    ($($level:ident),+$(,)?) => {
        $(
            #[test]
            fn $level() {
                logger::$level!("Hello, world!");
                logger::$level!("Hello, {}!", "world");
            }
        )*
    };
}

expand_levels!(debug, info, warn, error,);

/// Records emitted while the capture callback is registered.
///
/// Other tests in this binary may log concurrently, so the callback filters
/// by a marker only this test emits.
static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

const MARKER: &str = "capture-callback-test";

#[test]
fn capture_callback() {
    logger::set_callback(|record| {
        if record.message.contains(MARKER) {
            CAPTURED.lock().unwrap().push(format!(
                "{level}|{tag}|{module}|{message}",
                level = record.level,
                tag = record.tag,
                module = record.module_path,
                message = record.message,
            ));
        }
    });
    assert!(logger::is_set());

    logger::warn!("{MARKER}: first");
    logger::error!("{}: second", MARKER);

    logger::clear_callback();
    assert!(!logger::is_set());

    // Disabled again: this must not reach the captured records.
    logger::warn!("{MARKER}: third");

    let captured = CAPTURED.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert!(captured[0].starts_with("WARN|logger|"));
    assert!(captured[0].ends_with(": first"));
    assert!(captured[1].starts_with("ERROR|logger|"));
    assert!(captured[1].ends_with(": second"));
}
