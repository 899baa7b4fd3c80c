use crate::domain::model::{OutputFormat, SortKey};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "fs-helper")]
#[command(about = "CLI helpers for filesystem and logging tasks", version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the user/bundled settings
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the expanded absolute path
    Abspath {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Create directories (and parents) if missing
    Mkdir {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Remove the last extension from file names
    StripExt {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print the nearest ancestor containing a .git entry
    RepoRoot {
        #[arg(default_value = ".")]
        path: String,
    },

    /// Show file metadata
    Info {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Recursively find files
    Find {
        #[arg(default_value = ".")]
        dir: String,

        /// Regular expression matched against file names
        #[arg(short, long)]
        pattern: Option<String>,

        /// Only include these extensions (repeatable, e.g. --ext log --ext txt)
        #[arg(short, long = "ext")]
        extensions: Vec<String>,

        /// 0 = only direct children
        #[arg(long)]
        max_depth: Option<usize>,

        /// Include hidden files and directories
        #[arg(long)]
        hidden: bool,

        #[arg(long, value_enum)]
        sort: Option<SortKey>,

        #[arg(short, long)]
        reverse: bool,
    },

    /// Total size of a file or directory
    Du { path: String },

    /// Mounted disks and their usage
    Disks {
        /// Only show the disk containing this path
        path: Option<String>,
    },

    /// Write a message to <logdir>/<name>.log using the configured logger
    Log {
        name: String,
        message: String,

        #[arg(short, long, default_value = "info")]
        level: String,
    },

    /// Manage files in the log directory
    Logs {
        #[command(subcommand)]
        action: LogsAction,
    },

    /// Print the effective settings
    Settings,
}

#[derive(Debug, Clone, Subcommand)]
pub enum LogsAction {
    /// List *.log files
    List,

    /// Print the last lines of a log
    Tail {
        name: String,

        #[arg(short = 'n', long, default_value = "10")]
        lines: usize,
    },

    /// Truncate a log file
    Clear { name: String },

    /// Delete logs not modified for N days
    Prune {
        #[arg(long)]
        days: u32,
    },

    /// Zip logs not modified for N days and delete the originals
    Archive {
        #[arg(long)]
        days: u32,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_find_command() {
        let cli = Cli::try_parse_from([
            "fs-helper", "find", "/tmp", "--ext", "log", "--ext", ".txt", "--max-depth", "2",
            "--sort", "size", "-r", "--format", "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Find {
                dir,
                extensions,
                max_depth,
                sort,
                reverse,
                hidden,
                pattern,
            } => {
                assert_eq!(dir, "/tmp");
                assert_eq!(extensions, vec!["log", ".txt"]);
                assert_eq!(max_depth, Some(2));
                assert_eq!(sort, Some(SortKey::Size));
                assert!(reverse);
                assert!(!hidden);
                assert!(pattern.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_logs_archive() {
        let cli = Cli::try_parse_from(["fs-helper", "-v", "logs", "archive", "--days", "7"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Logs {
                action: LogsAction::Archive { days: 7, output: None }
            }
        ));
    }

    #[test]
    fn test_abspath_requires_argument() {
        assert!(Cli::try_parse_from(["fs-helper", "abspath"]).is_err());
    }
}
