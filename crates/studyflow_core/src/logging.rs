//! Logging bootstrap for the organizer core.
//!
//! # Responsibility
//! - Start the process-wide rolling file logger for the embedding shell.
//!
//! # Invariants
//! - At most one logger configuration is ever active per process.
//! - Repeating the active configuration is a no-op; a conflicting one is
//!   rejected without touching the running logger.
//! - Initialization reports failures as readable strings and never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "studyflow";
const ROTATE_AT_BYTES: u64 = 5 * 1024 * 1024;
const KEPT_LOG_FILES: usize = 4;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

/// Level plus target directory; two inits conflict when these differ.
#[derive(Clone, PartialEq, Eq)]
struct LogSpec {
    level: &'static str,
    dir: PathBuf,
}

struct ActiveLogger {
    spec: LogSpec,
    _handle: LoggerHandle,
}

/// Starts file logging for the process, or verifies it is already running
/// with the same configuration.
///
/// # Errors
/// - Unknown `level` names and empty or relative `log_dir` values.
/// - A directory that cannot be created, or a logger backend that fails to
///   start.
/// - A level/directory combination different from the one already active.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let spec = LogSpec {
        level: parse_level(level)?,
        dir: absolute_dir(log_dir)?,
    };

    let active = ACTIVE.get_or_try_init(|| start_logger(spec.clone()))?;
    if active.spec != spec {
        return Err(format!(
            "logging already active with level `{}` in `{}`; refusing `{}` in `{}`",
            active.spec.level,
            active.spec.dir.display(),
            spec.level,
            spec.dir.display()
        ));
    }
    Ok(())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(spec: LogSpec) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&spec.dir).map_err(|err| {
        format!(
            "cannot create log directory `{}`: {err}",
            spec.dir.display()
        )
    })?;

    let handle = Logger::try_with_str(spec.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", spec.level))?
        .log_to_file(
            FileSpec::default()
                .directory(&spec.dir)
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .append()
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("logger failed to start: {err}"))?;

    info!(
        "event=core_init module=core status=ok level={} log_dir={} version={}",
        spec.level,
        spec.dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        spec,
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<&'static str, String> {
    let resolved = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => {
            return Err(format!(
                "unknown log level `{level}`; expected trace, debug, info, warn or error"
            ))
        }
    };
    Ok(resolved)
}

fn absolute_dir(log_dir: &str) -> Result<PathBuf, String> {
    let raw = log_dir.trim();
    if raw.is_empty() {
        return Err("log directory must not be empty".to_string());
    }
    let dir = Path::new(raw);
    if dir.is_relative() {
        return Err(format!("log directory must be absolute, got `{raw}`"));
    }
    Ok(dir.to_path_buf())
}
