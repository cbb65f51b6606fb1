//! The file subscriber. One test per binary: the subscriber is global.

use twin_runtime::logging;

#[test]
fn warnings_land_in_the_log_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("twin.log");
    logging::init_with_file(&path).expect("install subscriber");

    tracing::warn!(target: "twin_runtime", answer = 42, "something odd");

    let text = std::fs::read_to_string(&path).expect("read log");
    assert!(text.contains("something odd"), "{text}");
    assert!(text.contains("answer=42"), "{text}");
    assert!(!text.contains('\x1b'), "file logs carry no colour codes");

    assert!(logging::init_with_file(&path).is_err(), "second install is refused");
}
