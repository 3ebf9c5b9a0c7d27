use xtc_core::logging::init_logging_in;

#[test]
fn test_log_file_created_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");

    let guard = init_logging_in(&logs, "core-test", false);
    tracing::info!("core logging smoke test");
    drop(guard);

    let files: Vec<_> = std::fs::read_dir(&logs)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(files.iter().any(|f| f.starts_with("core-test.log")), "{files:?}");
}
