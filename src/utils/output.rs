use crate::domain::model::{DiskInfo, FileInfo, LogFile, OutputFormat};
use crate::core::files::human_size;
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use serde::Serialize;

/// 依輸出格式轉成字串；Text 格式使用 `text` 逐列格式化
pub fn render<T, F>(rows: &[T], format: OutputFormat, text: F) -> Result<String>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Text => Ok(rows.iter().map(text).collect::<Vec<_>>().join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in rows {
                writer.serialize(row)?;
            }
            let data = writer.into_inner().map_err(|e| e.into_error())?;
            Ok(String::from_utf8_lossy(&data).trim_end().to_string())
        }
    }
}

fn format_time(time: &Option<DateTime<Local>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_files(files: &[FileInfo], format: OutputFormat) -> Result<String> {
    render(files, format, |f| {
        format!(
            "{:>10}  {}  {}",
            human_size(f.size),
            format_time(&f.modified),
            f.path.display()
        )
    })
}

pub fn render_logs(logs: &[LogFile], format: OutputFormat) -> Result<String> {
    render(logs, format, |l| {
        format!(
            "{:<30} {:>10}  {}",
            l.name,
            human_size(l.size),
            format_time(&l.modified)
        )
    })
}

pub fn render_disks(disks: &[DiskInfo], format: OutputFormat) -> Result<String> {
    render(disks, format, |d| {
        format!(
            "{:<24} {:<8} {:>10} {:>10} {:>5.1}%  {}",
            d.name,
            d.file_system,
            human_size(d.used()),
            human_size(d.total),
            d.used_percent(),
            d.mount_point.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FileKind;
    use std::path::PathBuf;

    fn sample() -> Vec<FileInfo> {
        vec![FileInfo {
            path: PathBuf::from("/tmp/app.log"),
            name: "app.log".to_string(),
            extension: Some("log".to_string()),
            kind: FileKind::File,
            size: 2048,
            modified: None,
            readonly: false,
        }]
    }

    #[test]
    fn test_render_text() {
        let out = render_files(&sample(), OutputFormat::Text).unwrap();
        assert!(out.contains("2.0 KiB"));
        assert!(out.contains("/tmp/app.log"));
    }

    #[test]
    fn test_render_json() {
        let out = render_files(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "app.log");
        assert_eq!(value[0]["kind"], "file");
        assert_eq!(value[0]["size"], 2048);
    }

    #[test]
    fn test_render_csv_has_header() {
        let out = render_files(&sample(), OutputFormat::Csv).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "path,name,extension,kind,size,modified,readonly"
        );
        assert_eq!(lines.next().unwrap(), "/tmp/app.log,app.log,log,file,2048,,false");
    }

    #[test]
    fn test_render_plain_strings() {
        let rows = vec!["/a".to_string(), "/b".to_string()];
        let out = render(&rows, OutputFormat::Text, |s| s.clone()).unwrap();
        assert_eq!(out, "/a\n/b");
    }

    #[test]
    fn test_render_plain_strings_as_json_and_csv() {
        let rows = vec!["line one".to_string(), "line two".to_string()];
        let json = render(&rows, OutputFormat::Json, |s| s.clone()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!(["line one", "line two"]));

        let csv = render(&rows, OutputFormat::Csv, |s| s.clone()).unwrap();
        assert_eq!(csv, "line one\nline two");
    }
}
