//! 路徑相關輔助函式：展開、絕對路徑、建立目錄、找出 repository 根目錄

use crate::utils::error::{FsHelperError, Result};
use crate::utils::validation::validate_path;
use std::path::{Component, Path, PathBuf};

/// 展開 `~` 與環境變數 (`$VAR`、`${VAR}`)
///
/// 未設定的環境變數保持原樣，與設定檔的替換規則一致。
pub fn expand(path: &str) -> Result<String> {
    let wants_home = path == "~" || path.starts_with("~/");
    if wants_home && dirs::home_dir().is_none() {
        return Err(FsHelperError::HomeDirUnavailable);
    }

    let expanded =
        shellexpand::full_with_context_no_errors(
            path,
            || dirs::home_dir().map(|h| h.to_string_lossy().into_owned()),
            |var| std::env::var(var).ok());

    Ok(expanded.into_owned())
}

/// 回傳展開後的絕對路徑，不解析符號連結，路徑也不需要存在
pub fn abspath(path: &str) -> Result<PathBuf> {
    validate_path("path", path)?;

    let expanded = PathBuf::from(expand(path)?);
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };

    Ok(normalize(&joined))
}

/// 純字面上的正規化：移除 `.`，`..` 回退一層但不超過根目錄
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// 建立目錄 (含父目錄)，已存在時直接回傳
pub fn make_dirs(path: &str) -> Result<PathBuf> {
    let target = abspath(path)?;

    if target.exists() {
        if !target.is_dir() {
            return Err(FsHelperError::NotADirectory { path: target });
        }
        tracing::debug!("Directory already exists: {}", target.display());
        return Ok(target);
    }

    std::fs::create_dir_all(&target)?;
    tracing::info!("📁 Created directory: {}", target.display());
    Ok(target)
}

/// 移除最後一個副檔名；`.bashrc` 這類隱藏檔維持不變
pub fn strip_extension(name: &str) -> String {
    let path = Path::new(name);
    if path.extension().is_none() {
        return name.to_string();
    }
    path.with_extension("").to_string_lossy().into_owned()
}

/// 由 `path` 往上尋找第一個含有 `.git` 的目錄
pub fn repo_root(path: &str) -> Result<Option<PathBuf>> {
    let start = abspath(path)?;
    let start = if start.is_file() {
        start.parent().map(Path::to_path_buf).unwrap_or(start)
    } else {
        start
    };

    let found = start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf);

    match &found {
        Some(root) => tracing::debug!("Repository root for {}: {}", start.display(), root.display()),
        None => tracing::debug!("No repository found above {}", start.display()),
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_parent_and_current() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("/a/b/")), PathBuf::from("/a/b"));
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("FS_HELPER_TEST_EXPAND", "/tmp/expanded");
        assert_eq!(
            expand("$FS_HELPER_TEST_EXPAND/logs").unwrap(),
            "/tmp/expanded/logs"
        );
        assert_eq!(
            expand("${FS_HELPER_TEST_EXPAND}/x").unwrap(),
            "/tmp/expanded/x"
        );
        std::env::remove_var("FS_HELPER_TEST_EXPAND");

        assert_eq!(
            expand("$FS_HELPER_SURELY_UNSET_VAR/x").unwrap(),
            "$FS_HELPER_SURELY_UNSET_VAR/x"
        );
    }

    #[test]
    fn test_expand_tilde_only_at_start() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand("~").unwrap(), home.display().to_string());
        assert_eq!(
            expand("~/logs").unwrap(),
            format!("{}/logs", home.display())
        );
        assert_eq!(expand("a/~/b").unwrap(), "a/~/b");
        assert_eq!(expand("~user").unwrap(), "~user");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("report.csv"), "report");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension(".bashrc"), ".bashrc");
        assert_eq!(strip_extension("Makefile"), "Makefile");
        assert_eq!(strip_extension("dir/notes.txt"), "dir/notes");
    }

    #[test]
    fn test_abspath_rejects_empty() {
        assert!(abspath("").is_err());
    }
}
