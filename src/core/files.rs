//! 檔案資訊、遞迴搜尋與目錄大小

use crate::domain::model::{FileInfo, FileKind, SortKey};
use crate::utils::error::{FsHelperError, Result};
use chrono::{DateTime, Local};
use regex::Regex;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// 以檔名比對 (非完整路徑)
    pub pattern: Option<Regex>,
    /// 允許的副檔名，可寫成 `log` 或 `.log`，不分大小寫
    pub extensions: Vec<String>,
    /// 0 表示只看 root 底下的直接子項目
    pub max_depth: Option<usize>,
    pub include_hidden: bool,
    pub sort: SortKey,
    pub reverse: bool,
}

impl FindOptions {
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    fn matches(&self, info: &FileInfo) -> bool {
        if !self.extensions.is_empty() {
            let ext = info.extension.as_deref().map(str::to_lowercase);
            let wanted = self
                .extensions
                .iter()
                .any(|e| Some(e.trim_start_matches('.').to_lowercase()) == ext);
            if !wanted {
                return false;
            }
        }

        match &self.pattern {
            Some(re) => re.is_match(&info.name),
            None => true,
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn build_info(path: &Path, metadata: &Metadata) -> FileInfo {
    let file_type = metadata.file_type();
    let kind = if file_type.is_symlink() {
        FileKind::Symlink
    } else if file_type.is_dir() {
        FileKind::Directory
    } else if file_type.is_file() {
        FileKind::File
    } else {
        FileKind::Other
    };

    FileInfo {
        path: path.to_path_buf(),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        extension: path
            .extension()
            .map(|e| e.to_string_lossy().into_owned()),
        kind,
        size: metadata.len(),
        modified: metadata.modified().ok().map(DateTime::<Local>::from),
        readonly: metadata.permissions().readonly(),
    }
}

/// 取得單一路徑的資訊，符號連結本身不會被追蹤
pub fn file_info(path: &str) -> Result<FileInfo> {
    let target = super::paths::abspath(path)?;
    let metadata = match fs::symlink_metadata(&target) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FsHelperError::NotFound { path: target });
        }
        Err(e) => return Err(e.into()),
    };
    Ok(build_info(&target, &metadata))
}

fn walk(dir: &Path, depth: usize, opts: &FindOptions, found: &mut Vec<FileInfo>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("⚠️ Skipping unreadable directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !opts.include_hidden && is_hidden(&path) {
            continue;
        }

        // DirEntry::metadata 不追蹤符號連結
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("⚠️ Cannot stat {}: {}", path.display(), e);
                continue;
            }
        };

        if metadata.is_dir() {
            if opts.max_depth.map_or(true, |max| depth < max) {
                walk(&path, depth + 1, opts, found);
            }
        } else if metadata.is_file() {
            let info = build_info(&path, &metadata);
            if opts.matches(&info) {
                found.push(info);
            }
        }
    }
}

pub fn sort_files(files: &mut [FileInfo], key: SortKey, reverse: bool) {
    match key {
        SortKey::Name => files.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path))),
        SortKey::Size => files.sort_by(|a, b| a.size.cmp(&b.size).then_with(|| a.path.cmp(&b.path))),
        SortKey::Modified => {
            files.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)))
        }
    }
    if reverse {
        files.reverse();
    }
}

/// 遞迴搜尋 root 底下符合條件的一般檔案
pub fn find_files(root: &str, opts: &FindOptions) -> Result<Vec<FileInfo>> {
    let root = super::paths::abspath(root)?;
    if !root.exists() {
        return Err(FsHelperError::NotFound { path: root });
    }
    if !root.is_dir() {
        return Err(FsHelperError::NotADirectory { path: root });
    }

    let mut found = Vec::new();
    walk(&root, 0, opts, &mut found);
    sort_files(&mut found, opts.sort, opts.reverse);

    tracing::debug!("Found {} files under {}", found.len(), root.display());
    Ok(found)
}

fn sum_dir(dir: &Path) -> u64 {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("⚠️ Skipping unreadable directory {}: {}", dir.display(), e);
            return 0;
        }
    };

    entries
        .flatten()
        .filter_map(|entry| entry.metadata().ok().map(|m| (entry.path(), m)))
        .map(|(path, m)| {
            if m.is_dir() {
                sum_dir(&path)
            } else if m.is_file() {
                m.len()
            } else {
                0
            }
        })
        .sum()
}

/// 檔案回傳本身大小；目錄回傳底下所有一般檔案的總和
pub fn dir_size(path: &str) -> Result<u64> {
    let target: PathBuf = super::paths::abspath(path)?;
    let metadata = match fs::symlink_metadata(&target) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FsHelperError::NotFound { path: target });
        }
        Err(e) => return Err(e.into()),
    };

    if metadata.is_dir() {
        Ok(sum_dir(&target))
    } else {
        Ok(metadata.len())
    }
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    // 以四捨五入到一位小數後的值判斷是否進位，避免出現 1024.0 KiB
    while (value * 10.0).round() / 10.0 >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
