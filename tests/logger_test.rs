use fs_helper::utils::logger::{build_logger, get_logger, LoggerOptions};
use fs_helper::{FsHelperError, LogFormat};
use tempfile::TempDir;

#[test]
fn test_file_sink_receives_events() {
    let temp_dir = TempDir::new().unwrap();
    let logdir = temp_dir.path().join("logs");
    let opts = LoggerOptions::new("my_module", &logdir)
        .console(false)
        .level("debug");

    let (logger, handle) = build_logger(&opts).unwrap();
    assert_eq!(handle.name(), "my_module");
    assert_eq!(handle.filenames(), &[logdir.join("my_module.log")]);

    tracing::subscriber::with_default(logger, || {
        tracing::info!("hello from the file sink");
        tracing::debug!("debug line");
        tracing::trace!("filtered out");
    });

    let content = std::fs::read_to_string(logdir.join("my_module.log")).unwrap();
    assert!(content.contains("hello from the file sink"));
    assert!(content.contains("INFO"));
    assert!(content.contains("debug line"));
    assert!(!content.contains("filtered out"));
    // 檔案輸出不含 ANSI 色碼
    assert!(!content.contains('\u{1b}'));
}

#[test]
fn test_file_sink_appends() {
    let temp_dir = TempDir::new().unwrap();
    let opts = LoggerOptions::new("append", temp_dir.path()).console(false);

    for round in 0..2 {
        let (logger, _) = build_logger(&opts).unwrap();
        tracing::subscriber::with_default(logger, || {
            tracing::warn!("round {}", round);
        });
    }

    let content = std::fs::read_to_string(temp_dir.path().join("append.log")).unwrap();
    assert!(content.contains("round 0"));
    assert!(content.contains("round 1"));
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn test_json_file_format() {
    let temp_dir = TempDir::new().unwrap();
    let opts = LoggerOptions::new("structured", temp_dir.path())
        .console(false)
        .file_format(LogFormat::Json);

    let (logger, handle) = build_logger(&opts).unwrap();
    tracing::subscriber::with_default(logger, || {
        tracing::info!(job = "sync", "finished");
    });

    let content = std::fs::read_to_string(&handle.filenames()[0]).unwrap();
    let line = content.lines().next().unwrap();
    let value: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(value["level"], "INFO");
    assert_eq!(value["fields"]["message"], "finished");
    assert_eq!(value["fields"]["job"], "sync");
}

#[test]
fn test_get_logger_installs_once() {
    let temp_dir = TempDir::new().unwrap();
    let opts = LoggerOptions::new("global", temp_dir.path()).console(false);

    let handle = get_logger(&opts).unwrap();
    assert_eq!(handle.filenames().len(), 1);

    let second = get_logger(&opts);
    assert!(matches!(second, Err(FsHelperError::LoggerAlreadyInitialized)));
}
