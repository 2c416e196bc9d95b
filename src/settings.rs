//! User preferences which apply to every scenario run, read from `settings.toml` in the user's
//! config directory.
use crate::get_config_dir;
use crate::input::read_toml;
use crate::log::{DEFAULT_LOG_LEVEL, parse_log_level};
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "\
# powercost settings, applied to every scenario you run or validate
# Remove the leading '# ' from a setting to override its default
# The POWERCOST_LOG_LEVEL environment variable takes precedence over log_level
";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Where the settings file is read from
pub fn get_settings_file_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// How much progress to report: off, error, warn, info, debug or trace
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether results may replace those already in a scenario's output folder
    #[serde(default)]
    pub overwrite: bool,
    /// Whether to also write the daily energy flows of every blend in the hybrid sweep
    #[serde(default)]
    pub write_blend_flows: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
            write_blend_flows: false,
        }
    }
}

impl Settings {
    /// Load the user's settings, using the defaults if they have no settings file
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        let settings: Settings = read_toml(file_path)?;
        parse_log_level(&settings.log_level)
            .with_context(|| format!("Invalid log_level in {}", file_path.display()))?;

        Ok(settings)
    }

    /// A settings file listing every setting, commented out at its default value, beneath the
    /// setting's description
    pub fn default_file_contents() -> Result<String> {
        let defaults =
            toml::to_string(&Settings::default()).context("Could not convert settings to TOML")?;

        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for line in defaults.lines().filter(|line| line.contains('=')) {
            write!(&mut out, "\n{}", describe_setting(line)?)?;
        }

        Ok(out)
    }
}

/// Comment out a `key = value` line, preceded by the documentation for `key`
fn describe_setting(line: &str) -> Result<String> {
    let key = line.split('=').next().unwrap_or_default().trim();
    let docs = Settings::get_field_docs(key)
        .with_context(|| format!("Setting {key} has no description"))?;

    let mut out = String::new();
    for doc_line in docs.lines() {
        writeln!(&mut out, "# {}", doc_line.trim())?;
    }
    writeln!(&mut out, "# {}", line.trim())?;

    Ok(out)
}
