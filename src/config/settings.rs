use crate::domain::model::SortKey;
use crate::utils::error::{FsHelperError, Result};
use crate::utils::validation::{validate_one_of, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 隨套件一起發佈的預設設定
pub const BUNDLED_SETTINGS: &str = include_str!("../../settings.toml");

pub const ENV_LOGDIR: &str = "FS_HELPER_LOGDIR";
pub const ENV_LOG_LEVEL: &str = "FS_HELPER_LOG_LEVEL";

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub files: FilesSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub logdir: String,
    pub level: String,
    pub file: bool,
    pub console: bool,
    pub file_format: LogFormat,
    pub console_format: LogFormat,
    pub show_target: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            logdir: "~/logs".to_string(),
            level: "info".to_string(),
            file: true,
            console: true,
            file_format: LogFormat::Full,
            console_format: LogFormat::Compact,
            show_target: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesSettings {
    pub include_hidden: bool,
    pub sort: SortKey,
}

impl Settings {
    /// 解析內建的 settings.toml
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_SETTINGS)
    }

    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FsHelperError::NotFound {
                path: path.to_path_buf(),
            },
            _ => FsHelperError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定，缺少的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        let mut settings: Settings = toml::from_str(&processed_content)?;
        settings.logging.level = settings.logging.level.to_lowercase();
        Ok(settings)
    }

    /// 替換環境變數 (例如 ${LOG_ROOT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 使用者設定檔的預設位置
    pub fn user_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fs-helper").join("settings.toml"))
    }

    /// 依序套用：指定檔案 → 使用者設定檔 → 內建設定，最後是環境變數
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit, Self::user_settings_path())
    }

    pub fn load_with(explicit: Option<&Path>, user_path: Option<PathBuf>) -> Result<Self> {
        let mut settings = match (explicit, user_path) {
            (Some(path), _) => {
                tracing::debug!("Loading settings from {}", path.display());
                Self::from_file(path)?
            }
            (None, Some(user)) if user.exists() => {
                tracing::debug!("Loading user settings from {}", user.display());
                Self::from_file(user)?
            }
            _ => Self::bundled()?,
        };

        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(logdir) = std::env::var(ENV_LOGDIR) {
            tracing::debug!("🔧 logdir overridden by {}: {}", ENV_LOGDIR, logdir);
            self.logging.logdir = logdir;
        }
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            tracing::debug!("🔧 log level overridden by {}: {}", ENV_LOG_LEVEL, level);
            self.logging.level = level.to_lowercase();
        }
    }

    /// 展開後的 log 目錄絕對路徑
    pub fn logdir(&self) -> Result<PathBuf> {
        crate::core::paths::abspath(&self.logging.logdir)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("logging.logdir", &self.logging.logdir)?;
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_matches_defaults() {
        let settings = Settings::bundled().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
[logging]
level = "debug"
console = false
"#,
        )
        .unwrap();

        assert_eq!(settings.logging.level, "debug");
        assert!(!settings.logging.console);
        assert_eq!(settings.logging.logdir, "~/logs");
        assert_eq!(settings.logging.file_format, LogFormat::Full);
        assert_eq!(settings.files.sort, SortKey::Name);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FS_HELPER_TEST_LOG_ROOT", "/var/tmp/fs-helper-test");

        let settings = Settings::from_toml_str(
            r#"
[logging]
logdir = "${FS_HELPER_TEST_LOG_ROOT}/logs"
"#,
        )
        .unwrap();
        assert_eq!(settings.logging.logdir, "/var/tmp/fs-helper-test/logs");

        std::env::remove_var("FS_HELPER_TEST_LOG_ROOT");
    }

    #[test]
    fn test_unknown_env_var_left_verbatim() {
        let settings = Settings::from_toml_str(
            r#"
[logging]
logdir = "${FS_HELPER_NEVER_SET_123}/logs"
"#,
        )
        .unwrap();
        assert_eq!(settings.logging.logdir, "${FS_HELPER_NEVER_SET_123}/logs");
    }

    #[test]
    fn test_level_is_case_insensitive() {
        let settings = Settings::from_toml_str(
            r#"
[logging]
level = "INFO"
"#,
        )
        .unwrap();
        assert_eq!(settings.logging.level, "info");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_level_fails_validation() {
        let settings = Settings::from_toml_str(
            r#"
[logging]
level = "loud"
"#,
        )
        .unwrap();
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, FsHelperError::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_invalid_format_is_parse_error() {
        let result = Settings::from_toml_str(
            r#"
[logging]
file_format = "xml"
"#,
        );
        assert!(matches!(result, Err(FsHelperError::TomlError(_))));
    }

    #[test]
    fn test_round_trip_to_toml() {
        let text = Settings::default().to_toml_string().unwrap();
        assert!(text.contains("[logging]"));
        assert_eq!(Settings::from_toml_str(&text).unwrap(), Settings::default());
    }
}
