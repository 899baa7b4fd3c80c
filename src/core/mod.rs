#[cfg(feature = "cli")]
pub mod disks;
pub mod files;
pub mod logs;
pub mod paths;

pub use crate::domain::model::{ArchiveReport, DiskInfo, FileInfo, FileKind, LogFile, SortKey};
pub use crate::domain::ports::Storage;
pub use crate::utils::error::Result;
