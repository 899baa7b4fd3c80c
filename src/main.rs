use clap::Parser;
use serde::Serialize;
use fs_helper::config::cli::{Command, LogsAction};
use fs_helper::core::{disks, files, paths};
use fs_helper::domain::model::OutputFormat;
use fs_helper::utils::error::FsHelperError;
use fs_helper::utils::output::{render, render_disks, render_files, render_logs};
use fs_helper::utils::logger;
use fs_helper::{Cli, FindOptions, LocalStorage, LogDir, LoggerOptions, Settings};

#[derive(Serialize)]
struct DuRow {
    path: String,
    bytes: u64,
}

fn report(e: &FsHelperError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn emit(output: String) {
    if !output.is_empty() {
        println!("{}", output);
    }
}

/// 以設定好的 logger 寫入一則訊息
fn write_log(settings: &Settings, name: &str, level: &str, message: &str) -> fs_helper::Result<()> {
    let opts = LoggerOptions::from_settings(name, settings)?;
    logger::log_message(&opts, level, message)?;
    Ok(())
}

async fn run(cli: Cli, settings: Settings) -> fs_helper::Result<i32> {
    let format = cli.format;

    match cli.command {
        Command::Abspath { paths: inputs } => {
            let resolved = inputs
                .iter()
                .map(|p| paths::abspath(p).map(|p| p.display().to_string()))
                .collect::<fs_helper::Result<Vec<_>>>()?;
            emit(render(&resolved, format, |s| s.clone())?);
        }

        Command::Mkdir { paths: inputs } => {
            let created = inputs
                .iter()
                .map(|p| paths::make_dirs(p).map(|p| p.display().to_string()))
                .collect::<fs_helper::Result<Vec<_>>>()?;
            emit(render(&created, format, |s| s.clone())?);
        }

        Command::StripExt { names } => {
            let stripped: Vec<String> = names.iter().map(|n| paths::strip_extension(n)).collect();
            emit(render(&stripped, format, |s| s.clone())?);
        }

        Command::RepoRoot { path } => match paths::repo_root(&path)? {
            Some(root) => emit(render(&[root.display().to_string()], format, |s| s.clone())?),
            None => {
                eprintln!("❌ No repository found above '{}'", path);
                return Ok(1);
            }
        },

        Command::Info { paths: inputs } => {
            let infos = inputs
                .iter()
                .map(|p| files::file_info(p))
                .collect::<fs_helper::Result<Vec<_>>>()?;
            emit(render_files(&infos, format)?);
        }

        Command::Find {
            dir,
            pattern,
            extensions,
            max_depth,
            hidden,
            sort,
            reverse,
        } => {
            let mut opts = FindOptions {
                max_depth,
                include_hidden: hidden || settings.files.include_hidden,
                sort: sort.unwrap_or(settings.files.sort),
                reverse,
                ..FindOptions::default()
            }
            .with_extensions(&extensions);
            if let Some(pattern) = pattern {
                opts = opts.with_pattern(&pattern)?;
            }

            let found = files::find_files(&dir, &opts)?;
            tracing::info!("🔍 {} files matched under {}", found.len(), dir);
            emit(render_files(&found, format)?);
        }

        Command::Du { path } => {
            let size = files::dir_size(&path)?;
            let row = vec![DuRow { path, bytes: size }];
            emit(render(&row, format, |r| {
                format!("{}\t{}", files::human_size(r.bytes), r.path)
            })?);
        }

        Command::Disks { path } => {
            let list = match path {
                Some(path) => disks::disk_for(&path)?.into_iter().collect(),
                None => disks::list_disks(),
            };
            emit(render_disks(&list, format)?);
        }

        Command::Log {
            name,
            message,
            level,
        } => write_log(&settings, &name, &level, &message)?,

        Command::Logs { action } => {
            let root = settings.logdir()?;
            let log_dir = LogDir::new(root.clone(), LocalStorage::new(root));

            match action {
                LogsAction::List => emit(render_logs(&log_dir.list()?, format)?),
                LogsAction::Tail { name, lines } => {
                    emit(render(&log_dir.tail(&name, lines)?, format, |s| s.clone())?)
                }
                LogsAction::Clear { name } => {
                    let path = log_dir.clear(&name)?;
                    println!("🧹 Cleared {}", path.display());
                }
                LogsAction::Prune { days } => {
                    let removed = log_dir.prune(days).await?;
                    let rows: Vec<String> = removed.iter().map(|p| p.display().to_string()).collect();
                    emit(render(&rows, format, |s| format!("🗑️ {}", s))?);
                }
                LogsAction::Archive { days, output } => match log_dir.archive(days, output).await? {
                    Some(summary) => match format {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(&summary)?)
                        }
                        _ => println!(
                            "📦 Archived {} files ({}) into {}",
                            summary.archived.len(),
                            files::human_size(summary.bytes),
                            summary.archive.display()
                        ),
                    },
                    None => println!("Nothing to archive"),
                },
            }
        }

        Command::Settings => print!("{}", settings.to_toml_string()?),
    }

    Ok(0)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `log` 子命令使用設定檔中的 logger，其餘使用 CLI logger
    let log_command = matches!(cli.command, Command::Log { .. });
    if !log_command {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI args: {:?}", cli);

    let settings = match Settings::load(cli.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Failed to load settings: {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    match run(cli, settings).await {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => report(&e),
    }
}
