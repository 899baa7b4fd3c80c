//! Logger 工廠：依設定建立寫入 `<logdir>/<name>.log` 與 console 的 tracing subscriber

use crate::config::settings::{LogFormat, LoggingSettings, Settings, LOG_LEVELS};
use crate::utils::error::{FsHelperError, Result};
use crate::utils::validation::{validate_log_name, validate_one_of};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

pub type Logger = Box<dyn Subscriber + Send + Sync + 'static>;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub name: String,
    pub logdir: PathBuf,
    pub level: String,
    pub file: bool,
    pub console: bool,
    pub file_format: LogFormat,
    pub console_format: LogFormat,
    pub show_target: bool,
}

impl LoggerOptions {
    pub fn new(name: impl Into<String>, logdir: impl Into<PathBuf>) -> Self {
        Self::from_logging(name.into(), logdir.into(), &LoggingSettings::default())
    }

    pub fn from_settings(name: impl Into<String>, settings: &Settings) -> Result<Self> {
        Ok(Self::from_logging(
            name.into(),
            settings.logdir()?,
            &settings.logging,
        ))
    }

    fn from_logging(name: String, logdir: PathBuf, logging: &LoggingSettings) -> Self {
        Self {
            name,
            logdir,
            level: logging.level.clone(),
            file: logging.file,
            console: logging.console,
            file_format: logging.file_format,
            console_format: logging.console_format,
            show_target: logging.show_target,
        }
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn file(mut self, enabled: bool) -> Self {
        self.file = enabled;
        self
    }

    pub fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    pub fn file_format(mut self, format: LogFormat) -> Self {
        self.file_format = format;
        self
    }

    pub fn console_format(mut self, format: LogFormat) -> Self {
        self.console_format = format;
        self
    }
}

/// 已建立 logger 的資訊
#[derive(Debug, Clone)]
pub struct LoggerHandle {
    name: String,
    filenames: Vec<PathBuf>,
}

impl LoggerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 寫入中的 log 檔案路徑；未啟用檔案輸出時為空
    pub fn filenames(&self) -> &[PathBuf] {
        &self.filenames
    }
}

/// `<logdir>/<name>.log`，名稱中的 `::` 與路徑分隔符號會轉成 `.`
pub fn log_filename(logdir: &Path, name: &str) -> PathBuf {
    let sanitized = name.trim().replace("::", ".").replace(['/', '\\'], ".");
    logdir.join(format!("{}.log", sanitized))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    validate_one_of("logging.level", level, &LOG_LEVELS)?;

    // RUST_LOG 優先
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| FsHelperError::invalid_value("logging.level", level, e.to_string())),
    }
}

fn fmt_layer<W>(
    writer: W,
    format: LogFormat,
    ansi: bool,
    show_target: bool,
    filter: EnvFilter,
) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(show_target)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Full => base.with_filter(filter).boxed(),
        LogFormat::Compact => base.compact().with_filter(filter).boxed(),
        LogFormat::Json => base.json().with_filter(filter).boxed(),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}

/// 建立 subscriber 但不安裝，可搭配 `tracing::subscriber::with_default` 使用
pub fn build_logger(opts: &LoggerOptions) -> Result<(Logger, LoggerHandle)> {
    validate_log_name("name", &opts.name)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut filenames = Vec::new();

    if opts.file {
        let path = log_filename(&opts.logdir, &opts.name);
        let file = Arc::new(open_log_file(&path)?);
        layers.push(fmt_layer(
            file,
            opts.file_format,
            false,
            true,
            build_filter(&opts.level)?,
        ));
        filenames.push(path);
    }

    if opts.console {
        layers.push(fmt_layer(
            std::io::stderr,
            opts.console_format,
            true,
            opts.show_target,
            build_filter(&opts.level)?,
        ));
    }

    let subscriber = tracing_subscriber::registry().with(layers);
    let handle = LoggerHandle {
        name: opts.name.clone(),
        filenames,
    };

    Ok((Box::new(subscriber), handle))
}

/// 建立並安裝為全域預設 logger，每個 process 只能呼叫一次
pub fn get_logger(opts: &LoggerOptions) -> Result<LoggerHandle> {
    let (logger, handle) = build_logger(opts)?;

    // 在安裝前記錄，避免寫進使用者的 log 檔
    tracing::debug!(
        "Installing logger '{}' (files: {:?})",
        handle.name(),
        handle.filenames()
    );

    tracing::subscriber::set_global_default(logger)
        .map_err(|_| FsHelperError::LoggerAlreadyInitialized)?;
    Ok(handle)
}

/// 兩個等級中較詳細的一個
pub fn more_verbose<'a>(a: &'a str, b: &'a str) -> &'a str {
    let rank = |level: &str| LOG_LEVELS.iter().position(|l| *l == level);
    match (rank(a), rank(b)) {
        (Some(ra), Some(rb)) if rb < ra => b,
        _ => a,
    }
}

/// 寫入單則訊息用的設定：過濾等級最多放寬到訊息本身的等級
pub fn message_options(opts: &LoggerOptions, level: &str) -> Result<LoggerOptions> {
    let level = level.to_lowercase();
    validate_one_of("level", &level, &LOG_LEVELS)?;

    let configured = opts.level.to_lowercase();
    let effective = more_verbose(&configured, &level).to_string();
    Ok(opts.clone().level(effective))
}

/// 安裝 logger 後以指定等級寫入一則訊息
pub fn log_message(opts: &LoggerOptions, level: &str, message: &str) -> Result<LoggerHandle> {
    let opts = message_options(opts, level)?;
    let handle = get_logger(&opts)?;
    let name = handle.name();

    match level.to_lowercase().as_str() {
        "trace" => tracing::trace!(logger = name, "{}", message),
        "debug" => tracing::debug!(logger = name, "{}", message),
        "info" => tracing::info!(logger = name, "{}", message),
        "warn" => tracing::warn!(logger = name, "{}", message),
        _ => tracing::error!(logger = name, "{}", message),
    }

    Ok(handle)
}

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("fs_helper=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fs_helper=warn"))
    };

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!("⚠️ Logger already initialized: {}", e);
    }
}
