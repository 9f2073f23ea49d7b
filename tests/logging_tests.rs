//! Logging initialization smoke test
//!
//! The subscriber is a process-wide global, so this stays a single test
//! in its own binary.

use linkvault::config::AppConfig;
use linkvault::logging::init_logging;
use tracing::info;

#[test]
fn init_logging_to_file_captures_events() {
    let dir = tempfile::TempDir::new().unwrap();
    let log_path = dir.path().join("linkvault.log");

    let mut config = AppConfig::default();
    config.logging.level = "info".to_string();
    config.logging.file = Some(log_path.to_str().unwrap().to_string());

    let guard = init_logging(&config);
    info!("logging smoke test event");

    // Dropping the guard flushes the non-blocking writer.
    drop(guard);

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("logging smoke test event"));
    assert!(contents.contains("INFO"));
}
