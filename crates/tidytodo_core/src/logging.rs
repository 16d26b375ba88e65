//! Logging bootstrap for the to-do core.
//!
//! # Responsibility
//! - Initialize file-based rolling logs once per process.
//! - Capture panics as sanitized `panic_captured` events.
//!
//! # Invariants
//! - Repeated init with the same level and directory is a no-op.
//! - Init with a different level or directory is rejected, never applied.
//! - Store and flag events carry ids and counts, never todo titles or
//!   descriptions.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "tidytodo";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: LogLevel,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(LoggingError::UnsupportedLevel(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDirectory(String),
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    Backend(String),
    /// Logging is already running with another level or directory.
    Conflict(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(message) => write!(f, "{message}"),
            Self::CreateDirectory { path, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                path.display()
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::Conflict(message) => write!(f, "{message}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Starts rolling file logs under `log_dir`.
///
/// # Errors
/// - `UnsupportedLevel` / `InvalidDirectory` for bad input (the directory
///   must be absolute).
/// - `Conflict` when already initialized with a different configuration.
/// - `CreateDirectory` / `Backend` when setup fails.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let level = level.parse::<LogLevel>()?;
    let log_dir = normalize_log_dir(log_dir.as_ref())?;

    if let Some(state) = LOGGING_STATE.get() {
        return ensure_same_config(state, level, &log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, log_dir.clone()))?;
    // Another thread may have won the race with a different configuration.
    ensure_same_config(state, level, &log_dir)
}

/// Returns `(level, log_dir)` once logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level.as_str(), state.log_dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: LogLevel, log_dir: PathBuf) -> Result<LoggingState, LoggingError> {
    std::fs::create_dir_all(&log_dir).map_err(|source| LoggingError::CreateDirectory {
        path: log_dir.clone(),
        source,
    })?;

    let logger = Logger::try_with_str(level.as_str())
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        // [YYYY-MM-DD HH:MM:SS.ffffff TZ] LEVEL [module] file:line: message
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook_once();

    info!(
        "event=app_start module=core status=ok platform={} version={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=logging_init module=core status=ok level={} log_dir={}",
        level.as_str(),
        log_dir.display()
    );

    Ok(LoggingState {
        level,
        log_dir,
        _logger: logger,
    })
}

fn ensure_same_config(
    state: &LoggingState,
    level: LogLevel,
    log_dir: &Path,
) -> Result<(), LoggingError> {
    if state.log_dir != log_dir {
        return Err(LoggingError::Conflict(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        )));
    }
    if state.level != level {
        return Err(LoggingError::Conflict(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level.as_str(),
            level.as_str()
        )));
    }
    Ok(())
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    if log_dir.as_os_str().is_empty() {
        return Err(LoggingError::InvalidDirectory(
            "log_dir cannot be empty".to_string(),
        ));
    }
    if !log_dir.is_absolute() {
        return Err(LoggingError::InvalidDirectory(format!(
            "log_dir must be an absolute path, got `{}`",
            log_dir.display()
        )));
    }
    Ok(log_dir.to_path_buf())
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Payload may contain a todo title; keep it single-line and short.
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_log_dir, sanitize_message, LogLevel,
        LoggingError,
    };
    use std::path::Path;

    #[test]
    fn level_parsing_accepts_aliases_and_case() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!(" warning ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!(matches!(
            "verbose".parse::<LogLevel>(),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let error = normalize_log_dir(Path::new("logs/dev")).unwrap_err();
        assert!(error.to_string().contains("absolute"));
    }

    #[test]
    fn sanitize_message_flattens_and_truncates() {
        let sanitized = sanitize_message("buy\nmilk\rnow", 8);
        assert!(!sanitized.contains('\n'));
        assert!(!sanitized.contains('\r'));
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn init_is_idempotent_and_rejects_reconfiguration() {
        let log_dir = tempfile::tempdir().unwrap();
        let other_dir = tempfile::tempdir().unwrap();

        init_logging("info", log_dir.path()).unwrap();
        init_logging("info", log_dir.path()).unwrap();

        let level_error = init_logging("debug", log_dir.path()).unwrap_err();
        assert!(level_error.to_string().contains("refusing to switch"));

        let dir_error = init_logging("info", other_dir.path()).unwrap_err();
        assert!(matches!(dir_error, LoggingError::Conflict(_)));

        let (active_level, active_dir) = logging_status().unwrap();
        assert_eq!(active_level, "info");
        assert_eq!(active_dir, log_dir.path());
    }
}
