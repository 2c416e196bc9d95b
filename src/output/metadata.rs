//! Provenance for a run, saved next to the results so an output folder can be traced back to the
//! scenario, build and machine which produced it.
use crate::scenario::Scenario;
use anyhow::{Result, anyhow};
use chrono::Local;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Compile-time facts about this binary, generated by the `built` build script
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize)]
struct Metadata<'a> {
    scenario: ScenarioMetadata<'a>,
    build: BuildMetadata,
    host: HostMetadata,
}

/// The scenario analysed and when the analysis started
#[derive(Serialize)]
struct ScenarioMetadata<'a> {
    path: &'a Path,
    year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    place: Option<&'a str>,
    latitude: f64,
    longitude: f64,
    peak_demand_kw: f64,
    started: String,
}

impl<'a> ScenarioMetadata<'a> {
    fn new(scenario: &'a Scenario) -> Self {
        Self {
            path: &scenario.dir,
            year: scenario.year,
            place: scenario.place.as_deref(),
            latitude: scenario.location.latitude,
            longitude: scenario.location.longitude,
            peak_demand_kw: scenario.demand.peak.value(),
            started: Local::now().to_rfc3339(),
        }
    }
}

/// The version of powercost which produced the results
#[derive(Serialize)]
struct BuildMetadata {
    version: &'static str,
    /// Short commit hash, suffixed with `-dirty` for uncommitted changes
    commit: String,
    profile: &'static str,
    target: &'static str,
    rustc: &'static str,
    built: &'static str,
}

impl BuildMetadata {
    fn current() -> Self {
        let commit = match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
            (Some(hash), Some(true)) => format!("{hash}-dirty"),
            (Some(hash), _) => hash.to_string(),
            (None, _) => "unknown".to_string(),
        };

        Self {
            version: built_info::PKG_VERSION,
            commit,
            profile: if built_info::DEBUG { "debug" } else { "release" },
            target: built_info::TARGET,
            rustc: built_info::RUSTC_VERSION,
            built: built_info::BUILT_TIME_UTC,
        }
    }
}

/// The machine the analysis ran on, as reported by [`PlatformInfo`]
#[derive(Serialize)]
struct HostMetadata {
    os: String,
    kernel: String,
    machine: String,
    hostname: String,
}

impl HostMetadata {
    fn current() -> Result<Self> {
        let info = PlatformInfo::new()
            .map_err(|err| anyhow!("Unable to determine platform info: {err}"))?;

        Ok(Self {
            os: info.osname().to_string_lossy().into(),
            kernel: format!(
                "{} {}",
                info.sysname().to_string_lossy(),
                info.release().to_string_lossy()
            ),
            machine: info.machine().to_string_lossy().into(),
            hostname: info.nodename().to_string_lossy().into(),
        })
    }
}

/// Record where the results in `output_path` came from
pub fn write_metadata(output_path: &Path, scenario: &Scenario) -> Result<()> {
    let metadata = Metadata {
        scenario: ScenarioMetadata::new(scenario),
        build: BuildMetadata::current(),
        host: HostMetadata::current()?,
    };
    fs::write(
        output_path.join(METADATA_FILE_NAME),
        toml::to_string(&metadata)?,
    )?;

    Ok(())
}
