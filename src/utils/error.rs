use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsHelperError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Settings serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Refusing to overwrite existing file: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Home directory could not be determined")]
    HomeDirUnavailable,

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("A global logger has already been installed")]
    LoggerAlreadyInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Filesystem,
    Logging,
    Output,
}

impl FsHelperError {
    pub fn invalid_value(field: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        FsHelperError::InvalidConfigValue {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FsHelperError::TomlError(_)
            | FsHelperError::TomlSerializeError(_)
            | FsHelperError::PatternError(_)
            | FsHelperError::InvalidConfigValue { .. } => ErrorCategory::Config,
            FsHelperError::IoError(_)
            | FsHelperError::NotFound { .. }
            | FsHelperError::AlreadyExists { .. }
            | FsHelperError::NotADirectory { .. }
            | FsHelperError::HomeDirUnavailable
            | FsHelperError::ZipError(_) => ErrorCategory::Filesystem,
            FsHelperError::LoggerAlreadyInitialized => ErrorCategory::Logging,
            FsHelperError::SerializationError(_) | FsHelperError::CsvError(_) => {
                ErrorCategory::Output
            }
        }
    }

    /// 對應 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 2,
            _ => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FsHelperError::NotFound { path } => format!("'{}' does not exist", path.display()),
            FsHelperError::NotADirectory { path } => {
                format!("'{}' exists but is not a directory", path.display())
            }
            FsHelperError::IoError(e) => format!("Filesystem operation failed: {}", e),
            FsHelperError::TomlError(e) => format!("Settings file is not valid TOML: {}", e),
            FsHelperError::InvalidConfigValue { field, value, reason } => {
                format!("Setting '{}' has an invalid value '{}': {}", field, value, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FsHelperError::NotFound { .. } => "Check the path spelling and that it exists",
            FsHelperError::NotADirectory { .. } => "Pass a directory path instead of a file",
            FsHelperError::AlreadyExists { .. } => "Choose another output path or remove the existing file",
            FsHelperError::HomeDirUnavailable => "Set the HOME environment variable",
            FsHelperError::PatternError(_) => "Check the regular expression syntax",
            FsHelperError::LoggerAlreadyInitialized => {
                "Call get_logger only once per process, or use build_logger with a scoped default"
            }
            FsHelperError::TomlError(_)
            | FsHelperError::TomlSerializeError(_)
            | FsHelperError::InvalidConfigValue { .. } => {
                "Fix the settings file or the FS_HELPER_* environment variables"
            }
            FsHelperError::IoError(_) | FsHelperError::ZipError(_) => {
                "Check permissions and free disk space"
            }
            FsHelperError::SerializationError(_) | FsHelperError::CsvError(_) => {
                "Try a different --format"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, FsHelperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_exit_code() {
        let err = FsHelperError::invalid_value("logging.level", "loud", "unknown level");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.exit_code(), 2);

        let err = FsHelperError::NotFound {
            path: PathBuf::from("/nope"),
        };
        assert_eq!(err.category(), ErrorCategory::Filesystem);
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().contains("/nope"));
    }

    #[test]
    fn test_io_error_conversion() {
        fn open() -> Result<()> {
            std::fs::read("/definitely/not/here/fs-helper")?;
            Ok(())
        }
        let err = open().unwrap_err();
        assert!(matches!(err, FsHelperError::IoError(_)));
    }
}
