//! log 目錄維護：列出、tail、清空、刪除與封存舊的 `*.log` 檔

use crate::domain::model::{ArchiveReport, LogFile};
use crate::domain::ports::Storage;
use crate::utils::error::{FsHelperError, Result};
use crate::utils::logger::log_filename;
use crate::utils::validation::validate_log_name;
use chrono::{DateTime, Duration, Local};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};

const LOG_EXTENSION: &str = "log";

pub struct LogDir<S: Storage> {
    root: PathBuf,
    storage: S,
}

impl<S: Storage> LogDir<S> {
    pub fn new(root: impl Into<PathBuf>, storage: S) -> Self {
        Self {
            root: root.into(),
            storage,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        log_filename(&self.root, name)
    }

    fn existing_path_for(&self, name: &str) -> Result<PathBuf> {
        validate_log_name("name", name)?;
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(FsHelperError::NotFound { path });
        }
        Ok(path)
    }

    /// 目錄中的 `*.log` 檔 (不遞迴)，依名稱排序；目錄不存在時回傳空清單
    pub fn list(&self) -> Result<Vec<LogFile>> {
        if !self.root.exists() {
            tracing::debug!("Log directory {} does not exist yet", self.root.display());
            return Ok(Vec::new());
        }
        if !self.root.is_dir() {
            return Err(FsHelperError::NotADirectory {
                path: self.root.clone(),
            });
        }

        let mut logs = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            let metadata = entry.metadata()?;
            let is_log = path.extension().and_then(|e| e.to_str()) == Some(LOG_EXTENSION);
            if !metadata.is_file() || !is_log {
                continue;
            }

            logs.push(LogFile {
                name: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path,
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Local>::from),
            });
        }

        logs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(logs)
    }

    /// 最後 `n` 行
    pub fn tail(&self, name: &str, n: usize) -> Result<Vec<String>> {
        let path = self.existing_path_for(name)?;
        if n == 0 {
            return Ok(Vec::new());
        }

        // 逐行讀取原始位元組，非 UTF-8 內容以替代字元顯示
        let mut reader = BufReader::new(std::fs::File::open(&path)?);
        let mut lines: VecDeque<String> = VecDeque::with_capacity(n);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            if lines.len() == n {
                lines.pop_front();
            }
            lines.push_back(String::from_utf8_lossy(&buf).into_owned());
        }

        Ok(lines.into_iter().collect())
    }

    /// 清空內容但保留檔案
    pub fn clear(&self, name: &str) -> Result<PathBuf> {
        let path = self.existing_path_for(name)?;
        std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)?;
        tracing::info!("🧹 Cleared {}", path.display());
        Ok(path)
    }

    fn older_than(&self, days: u32) -> Result<Vec<LogFile>> {
        let cutoff = Local::now() - Duration::days(i64::from(days));
        Ok(self
            .list()?
            .into_iter()
            .filter(|log| log.modified.is_some_and(|m| m < cutoff))
            .collect())
    }

    /// 刪除超過 `days` 天未修改的 log 檔
    pub async fn prune(&self, days: u32) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for log in self.older_than(days)? {
            self.storage.remove_file(&log.path).await?;
            tracing::info!("🗑️ Removed {}", log.path.display());
            removed.push(log.path);
        }
        Ok(removed)
    }

    /// `logs-<時間>.zip`，同名檔案已存在時加上 `-1`、`-2` 等序號
    fn default_archive_path(&self) -> PathBuf {
        let stem = format!("logs-{}", Local::now().format("%Y%m%d-%H%M%S%.3f"));
        let mut candidate = self.root.join(format!("{}.zip", stem));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self.root.join(format!("{}-{}.zip", stem, counter));
            counter += 1;
        }
        candidate
    }

    /// 將超過 `days` 天的 log 壓縮成 zip 後刪除原檔；沒有符合的檔案時回傳 None
    pub async fn archive(&self, days: u32, output: Option<PathBuf>) -> Result<Option<ArchiveReport>> {
        let candidates = self.older_than(days)?;
        if candidates.is_empty() {
            tracing::info!("Nothing to archive in {}", self.root.display());
            return Ok(None);
        }

        // 不覆寫既有的 zip：原始 log 封存後會被刪除
        let archive_path = match output {
            Some(path) if path.exists() => {
                return Err(FsHelperError::AlreadyExists { path });
            }
            Some(path) => path,
            None => self.default_archive_path(),
        };

        tracing::debug!("Creating archive with {} log files", candidates.len());

        // 在記憶體中建立 zip
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for log in &candidates {
                let data = self.storage.read_file(&log.path).await?;
                let entry_name = log
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| format!("{}.log", log.name));
                zip.start_file::<_, ()>(entry_name, FileOptions::default())?;
                zip.write_all(&data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        let bytes = zip_data.len() as u64;
        self.storage.write_file(&archive_path, &zip_data).await?;

        let mut archived = Vec::with_capacity(candidates.len());
        for log in candidates {
            self.storage.remove_file(&log.path).await?;
            archived.push(log.path);
        }

        tracing::info!(
            "📦 Archived {} log files into {}",
            archived.len(),
            archive_path.display()
        );

        Ok(Some(ArchiveReport {
            archive: archive_path,
            archived,
            bytes,
        }))
    }
}
