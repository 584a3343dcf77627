//! Logging bootstrap for store hosts.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend exactly once per process, either with
//!   rolling files in a directory or on stderr.
//! - Keep store events metadata-only: ids, counts, durations. Names, titles,
//!   and review content are never logged.
//!
//! # Invariants
//! - Init is idempotent for the same level and target.
//! - Re-initialization with a different level or target is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "talkstore";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: LevelFilter,
    target: LogTarget,
    _logger: LoggerHandle,
}

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    Dir(PathBuf),
}

impl LogTarget {
    /// `None`, or `-`, selects stderr; anything else must be an absolute
    /// directory.
    fn parse(log_dir: Option<&str>) -> Result<Self, String> {
        let Some(raw) = log_dir.map(str::trim) else {
            return Ok(Self::Stderr);
        };
        match raw {
            "" => Err("log_dir cannot be blank; omit it to log to stderr".to_string()),
            "-" => Ok(Self::Stderr),
            dir if Path::new(dir).is_absolute() => Ok(Self::Dir(PathBuf::from(dir))),
            dir => Err(format!("log_dir must be an absolute path, got `{dir}`")),
        }
    }

    fn dir(&self) -> Option<&Path> {
        match self {
            Self::Stderr => None,
            Self::Dir(dir) => Some(dir.as_path()),
        }
    }
}

impl Display for LogTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Initializes logging at `level`, writing rolling files under `log_dir`
/// or to stderr when `log_dir` is `None` or `-`.
///
/// # Errors
/// - Unsupported `level`.
/// - `log_dir` blank, relative, or not creatable.
/// - Logging already active with a different level or target.
/// - Backend start failure.
pub fn init_logging(level: &str, log_dir: Option<&str>) -> Result<(), String> {
    let level = parse_level(level)?;
    let target = LogTarget::parse(log_dir)?;

    let state = match LOGGING_STATE.get() {
        Some(state) => state,
        None => LOGGING_STATE.get_or_try_init(|| start_logger(level, target.clone()))?,
    };
    ensure_same_config(state, level, &target)
}

/// Returns `(level, log_dir)` of the active logger, `None` before init.
/// `log_dir` is `None` while logging to stderr.
pub fn logging_status() -> Option<(&'static str, Option<PathBuf>)> {
    LOGGING_STATE.get().map(|state| {
        (
            level_name(state.level),
            state.target.dir().map(Path::to_path_buf),
        )
    })
}

/// Default level: `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: LevelFilter, target: LogTarget) -> Result<LoggingState, String> {
    let builder = Logger::try_with_str(level_name(level))
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?;

    let logger = match &target {
        LogTarget::Dir(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| {
                format!("failed to create log directory `{}`: {err}", dir.display())
            })?;
            builder
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()
        }
        LogTarget::Stderr => builder
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format)
            .start(),
    }
    .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();

    info!(
        "event=logging_init module=core status=ok level={} target={} version={}",
        level_name(level),
        target,
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        target,
        _logger: logger,
    })
}

fn ensure_same_config(
    state: &LoggingState,
    level: LevelFilter,
    target: &LogTarget,
) -> Result<(), String> {
    if state.target != *target {
        return Err(format!(
            "logging already initialized with target `{}`; refusing to switch to `{target}`",
            state.target
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            level_name(state.level),
            level_name(level)
        ));
    }
    Ok(())
}

/// Parses a level name through `log`, also taking `warning`. `off` is
/// refused: a store host always keeps error records.
fn parse_level(level: &str) -> Result<LevelFilter, String> {
    let trimmed = level.trim();
    let parsed = if trimmed.eq_ignore_ascii_case("warning") {
        Ok(LevelFilter::Warn)
    } else {
        trimmed.parse::<LevelFilter>()
    };
    match parsed {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{trimmed}`; expected trace|debug|info|warn|error"
        )),
        Ok(filter) => Ok(filter),
    }
}

fn level_name(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            single_line(panic_text(panic_info.payload()), MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn panic_text(payload: &(dyn Any + Send)) -> &str {
    if let Some(text) = payload.downcast_ref::<&str>() {
        *text
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Replaces control characters with spaces and caps the result at
/// `max_chars`, marking truncation with `...`. Panic payloads may carry
/// titles or review text.
fn single_line(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let mut line: String = chars
        .by_ref()
        .take(max_chars)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if chars.next().is_some() {
        line.push_str("...");
    }
    line
}
