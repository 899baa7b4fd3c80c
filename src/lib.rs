pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::Cli;

pub use crate::adapters::LocalStorage;
pub use crate::config::settings::{LogFormat, Settings};
pub use crate::core::files::{dir_size, file_info, find_files, human_size, FindOptions};
pub use crate::core::logs::LogDir;
pub use crate::core::paths::{abspath, expand, make_dirs, repo_root, strip_extension};
pub use crate::utils::error::{FsHelperError, Result};
pub use crate::utils::logger::{build_logger, get_logger, log_filename, LoggerHandle, LoggerOptions};

pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
