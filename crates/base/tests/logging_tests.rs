use {
    base::FileLogger,
    log::{Level, LevelFilter, Log, Record},
};

fn record(level: Level, message: &str, f: impl FnOnce(&Record)) {
    f(&Record::builder()
        .level(level)
        .file(Some("tests/logging_tests.rs"))
        .line(Some(7))
        .args(format_args!("{}", message))
        .build());
}

#[test]
fn test_file_logger_writes_day_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = FileLogger::new(dir.path(), LevelFilter::Info).expect("logger");

    record(Level::Info, "camera opened", |r| logger.log(r));
    logger.flush();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read_dir")
        .map(|e| e.expect("entry").path())
        .collect();
    assert_eq!(entries.len(), 1);
    let contents = std::fs::read_to_string(&entries[0]).expect("read");
    assert!(contents.contains("[INFO]"));
    assert!(contents.contains("tests/logging_tests.rs:7 - camera opened"));
    assert!(contents.ends_with('\n'));
}

#[test]
fn test_file_logger_filters_below_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = FileLogger::new(dir.path(), LevelFilter::Warn).expect("logger");

    record(Level::Debug, "noise", |r| logger.log(r));
    record(Level::Error, "source lost", |r| logger.log(r));
    logger.flush();

    let entry = std::fs::read_dir(dir.path())
        .expect("read_dir")
        .next()
        .expect("one file")
        .expect("entry");
    let contents = std::fs::read_to_string(entry.path()).expect("read");
    assert!(!contents.contains("noise"));
    assert!(contents.contains("source lost"));
}

#[test]
fn test_stdout_logger_installs_once() {
    base::init_stdout_logger(LevelFilter::Debug);
    assert_eq!(log::max_level(), LevelFilter::Debug);
    // a second install is ignored
    base::init_stdout_logger(LevelFilter::Error);
    assert_eq!(log::max_level(), LevelFilter::Debug);
    log::debug!("logger installed");
}
