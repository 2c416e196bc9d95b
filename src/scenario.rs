//! Code for loading an analysis scenario from a directory.
//!
//! A scenario directory contains a `scenario.toml` file describing the location, load and
//! assumptions, along with the generation data for the location and optionally a `locations.csv`
//! gazetteer for resolving place names.
use crate::input::location::{Location, LocationResolver};
use crate::input::{
    CsvGenerationSource, Gazetteer, Resolution, ScenarioMarketData, input_err_msg, read_toml,
};
use crate::parameters::AnalysisParameters;
use crate::profile::days_in_year;
use crate::sizing::Demand;
use crate::technology::Technology;
use crate::units::{Capacity, Energy};
use anyhow::{Context, Result, bail};
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// The name of the file describing a scenario
pub const SCENARIO_FILE_NAME: &str = "scenario.toml";

/// The reference year used if none is given
const DEFAULT_YEAR: i32 = 2022;

const fn default_year() -> i32 {
    DEFAULT_YEAR
}

/// Where the load is located: either a named place or explicit coordinates
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct LocationSpec {
    place: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct DemandSpec {
    peak_kw: f64,
    daily_kwh: Option<f64>,
}

/// Represents the contents of the scenario file
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    #[serde(default = "default_year")]
    year: i32,
    risk_free_rate: Option<f64>,
    #[serde(default)]
    generation_resolution: Resolution,
    location: LocationSpec,
    demand: DemandSpec,
    #[serde(default)]
    parameters: AnalysisParameters,
}

/// A fully specified analysis request
#[derive(Debug)]
pub struct Scenario {
    /// Directory containing the scenario files
    pub dir: PathBuf,
    /// The reference year of the generation data
    pub year: i32,
    /// The place name given for the location, if any
    pub place: Option<String>,
    /// Where the load is located
    pub location: Location,
    /// The load to be served
    pub demand: Demand,
    /// Cost and technical assumptions, fixed for the whole analysis
    pub parameters: AnalysisParameters,
    /// Market data given in the scenario file
    pub market: ScenarioMarketData,
    /// Time resolution of the generation files
    pub resolution: Resolution,
}

impl Scenario {
    /// Read a scenario from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing the scenario files
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<Scenario> {
        let dir = scenario_dir.as_ref();
        let file_path = dir.join(SCENARIO_FILE_NAME);
        let file: ScenarioFile = read_toml(&file_path)?;
        let gazetteer = Gazetteer::from_path(dir)?;

        Self::from_file(dir, file, &gazetteer).with_context(|| input_err_msg(&file_path))
    }

    fn from_file(
        dir: &Path,
        file: ScenarioFile,
        resolver: &impl LocationResolver,
    ) -> Result<Scenario> {
        days_in_year(file.year)?;
        let location = resolve_location(&file.location, resolver)?;
        let demand = build_demand(&file.demand)?;
        file.parameters
            .validate()
            .context("Invalid analysis parameters")?;

        info!(
            "Loaded scenario for {} {location} with peak demand of {} kW",
            file.location.place.as_deref().unwrap_or("location"),
            demand.peak.value()
        );

        Ok(Scenario {
            dir: dir.to_path_buf(),
            year: file.year,
            place: file.location.place,
            location,
            demand,
            parameters: file.parameters,
            market: ScenarioMarketData {
                risk_free_rate: file.risk_free_rate,
            },
            resolution: file.generation_resolution,
        })
    }

    /// The source of generation data for this scenario
    pub fn generation_source(&self) -> CsvGenerationSource {
        CsvGenerationSource::new(&self.dir, self.resolution)
    }

    /// The generation data file for each technology
    pub fn generation_files(&self) -> Vec<(Technology, PathBuf)> {
        let source = self.generation_source();
        Technology::iter()
            .map(|technology| (technology, source.file_path(technology)))
            .collect()
    }

    /// The number of days in the reference year
    pub fn days(&self) -> Result<usize> {
        days_in_year(self.year)
    }
}

/// Turn a location given in the scenario file into coordinates
fn resolve_location(spec: &LocationSpec, resolver: &impl LocationResolver) -> Result<Location> {
    match (&spec.place, spec.latitude, spec.longitude) {
        (Some(place), None, None) => resolver
            .resolve(place)
            .with_context(|| format!("Failed to look up location '{place}'"))?
            .with_context(|| format!("Unknown location '{place}'")),
        (None, Some(latitude), Some(longitude)) => Location::new(latitude, longitude),
        (Some(_), _, _) => bail!("Give either a place name or coordinates for the location, not both"),
        (None, _, _) => bail!("Location must have a place name or both latitude and longitude"),
    }
}

/// Build the demand from the values given in the scenario file
fn build_demand(spec: &DemandSpec) -> Result<Demand> {
    let peak = Capacity(spec.peak_kw);
    match spec.daily_kwh {
        Some(daily) => Demand::new(peak, Energy(daily)),
        None => Demand::from_peak(peak),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    struct FixedResolver;

    impl LocationResolver for FixedResolver {
        fn resolve(&self, place: &str) -> Result<Option<Location>> {
            Ok((place == "Tucson").then(|| Location::new(32.22, -110.97).unwrap()))
        }
    }

    fn spec(place: Option<&str>, latitude: Option<f64>, longitude: Option<f64>) -> LocationSpec {
        LocationSpec {
            place: place.map(String::from),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_resolve_location() {
        let location = resolve_location(&spec(Some("Tucson"), None, None), &FixedResolver).unwrap();
        assert_eq!(location.latitude, 32.22);

        let location = resolve_location(&spec(None, Some(53.0), Some(-8.0)), &FixedResolver).unwrap();
        assert_eq!(location.longitude, -8.0);

        assert_error!(
            resolve_location(&spec(Some("Atlantis"), None, None), &FixedResolver),
            "Unknown location 'Atlantis'"
        );
        assert_error!(
            resolve_location(&spec(Some("Tucson"), Some(1.0), None), &FixedResolver),
            "Give either a place name or coordinates for the location, not both"
        );
        assert_error!(
            resolve_location(&spec(None, Some(1.0), None), &FixedResolver),
            "Location must have a place name or both latitude and longitude"
        );
        assert!(resolve_location(&spec(None, Some(91.0), Some(0.0)), &FixedResolver).is_err());
    }

    #[test]
    fn test_build_demand() {
        let demand = build_demand(&DemandSpec {
            peak_kw: 100.0,
            daily_kwh: None,
        })
        .unwrap();
        assert_eq!(demand.daily, Energy(2400.0));

        let demand = build_demand(&DemandSpec {
            peak_kw: 100.0,
            daily_kwh: Some(1000.0),
        })
        .unwrap();
        assert_eq!(demand.daily, Energy(1000.0));

        assert!(
            build_demand(&DemandSpec {
                peak_kw: -1.0,
                daily_kwh: None,
            })
            .is_err()
        );
    }

    #[test]
    fn test_scenario_from_path() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(SCENARIO_FILE_NAME)).unwrap();
            writeln!(
                file,
                "risk_free_rate = 0.04\n\
                [location]\nlatitude = 32.2\nlongitude = -110.9\n\
                [demand]\npeak_kw = 500\n\
                [parameters]\ncutoff_day = 10"
            )
            .unwrap();
        }

        let scenario = Scenario::from_path(dir.path()).unwrap();
        assert_eq!(scenario.year, DEFAULT_YEAR);
        assert_eq!(scenario.days().unwrap(), 365);
        assert_eq!(scenario.resolution, Resolution::Daily);
        assert_eq!(scenario.demand.daily, Energy(12_000.0));
        assert_eq!(scenario.parameters.cutoff_day, 10);
        assert_eq!(scenario.market.risk_free_rate, Some(0.04));
        assert_eq!(
            scenario.generation_files(),
            [
                (Technology::Solar, dir.path().join("solar_generation.csv")),
                (Technology::Wind, dir.path().join("wind_generation.csv"))
            ]
        );
    }

    #[test]
    fn test_scenario_from_path_invalid_parameters() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(SCENARIO_FILE_NAME)).unwrap();
            writeln!(
                file,
                "[location]\nlatitude = 0\nlongitude = 0\n\
                [demand]\npeak_kw = 500\n\
                [parameters]\nproject_lifetime = 0"
            )
            .unwrap();
        }
        assert!(Scenario::from_path(dir.path()).is_err());
    }

    #[test]
    fn test_scenario_from_path_unknown_field() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(SCENARIO_FILE_NAME)).unwrap();
            writeln!(
                file,
                "[location]\nlatitude = 0\nlongitude = 0\n\
                [demand]\npeak_kw = 500\nflavour = 1"
            )
            .unwrap();
        }
        assert!(Scenario::from_path(dir.path()).is_err());
    }
}
