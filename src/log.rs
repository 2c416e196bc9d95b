//! Initialisation of the program logger.
//!
//! Messages are written to the terminal, with colour if supported, and optionally to log files in
//! the output directory. The log level can be set with an environment variable.
use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Metadata, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The default log level for the program.
///
/// Used if the level is given neither by the `POWERCOST_LOG_LEVEL` environment variable nor in
/// `settings.toml`.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable used to override the log level
const LOG_LEVEL_ENV_VAR: &str = "POWERCOST_LOG_LEVEL";

/// Log file for progress messages
const LOG_INFO_FILE_NAME: &str = "powercost_info.log";

/// Log file for warnings and errors
const LOG_ERROR_FILE_NAME: &str = "powercost_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger.
///
/// The level is taken from the `POWERCOST_LOG_LEVEL` environment variable if set, otherwise from
/// the settings file, otherwise `info`. Accepted values are `off`, `error`, `warn`, `info`,
/// `debug` and `trace` (case-insensitive).
///
/// Messages below warning level go to stdout and the rest to stderr. If `log_dir` is given, the
/// same messages are also written without colour to two log files in that directory. The log
/// files always record at least `info` and `warn` messages respectively, whatever the terminal
/// level.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_dir`: Where to save log files, if anywhere
pub fn init(log_level_from_settings: Option<&str>, log_dir: Option<&Path>) -> Result<()> {
    let env_level = env::var(LOG_LEVEL_ENV_VAR).ok();
    let level_name = env_level
        .as_deref()
        .or(log_level_from_settings)
        .unwrap_or(DEFAULT_LOG_LEVEL);
    let level = parse_log_level(level_name)?;

    let mut dispatch = Dispatch::new().chain(terminal_dispatch(level));
    if let Some(log_dir) = log_dir {
        dispatch = dispatch.chain(log_file_dispatch(level, log_dir)?);
    }

    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INIT
        .set(())
        .map_err(|()| anyhow!("Logger already initialised"))?;

    Ok(())
}

/// Convert a log level name into a [`LevelFilter`]
pub(crate) fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Whether a message should go to the "info" stream rather than the "error" one
fn is_info_message(metadata: &Metadata) -> bool {
    metadata.level() > LevelFilter::Warn
}

/// Messages for the terminal, split between stdout and stderr
fn terminal_dispatch(level: LevelFilter) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    // Only colour streams which are terminals
    let stdout_colours = std::io::stdout().is_terminal().then_some(colours);
    let stderr_colours = std::io::stderr().is_terminal().then_some(colours);

    Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(is_info_message)
                .format(move |out, message, record| {
                    write_log(out, message, record, stdout_colours.as_ref());
                })
                .level(level)
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .format(move |out, message, record| {
                    write_log(out, message, record, stderr_colours.as_ref());
                })
                .level(level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        )
}

/// Messages for the log files in `log_dir`
fn log_file_dispatch(level: LevelFilter, log_dir: &Path) -> Result<Dispatch> {
    let info_file = create_log_file(&log_dir.join(LOG_INFO_FILE_NAME))?;
    let error_file = create_log_file(&log_dir.join(LOG_ERROR_FILE_NAME))?;

    Ok(Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(is_info_message)
                .format(|out, message, record| write_log(out, message, record, None))
                .level(level.max(LevelFilter::Info))
                .chain(info_file),
        )
        .chain(
            Dispatch::new()
                .format(|out, message, record| write_log(out, message, record, None))
                .level(LevelFilter::Warn)
                .chain(error_file),
        ))
}

/// Create (or truncate) a log file
fn create_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Could not create log file {}", path.display()))
}

/// Write a single log message with a timestamp, colouring the level if `colours` is given
fn write_log(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = record.target();
    match colours {
        Some(colours) => {
            let level = colours.color(record.level());
            out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
        }
        None => {
            let level = record.level();
            out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
        }
    }
}
