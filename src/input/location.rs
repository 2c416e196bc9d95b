//! Code for resolving the location of an analysis.
use super::{input_err_msg, read_csv};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use unicase::UniCase;

const LOCATIONS_FILE_NAME: &str = "locations.csv";

/// A point on the Earth's surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in degrees (positive north)
    pub latitude: f64,
    /// Longitude in degrees (positive east)
    pub longitude: f64,
}

impl Location {
    /// Create a new [`Location`], checking that the coordinates are valid
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        ensure!(
            (-90.0..=90.0).contains(&latitude),
            "Invalid latitude {latitude}: must be between -90 and 90"
        );
        ensure!(
            (-180.0..=180.0).contains(&longitude),
            "Invalid longitude {longitude}: must be between -180 and 180"
        );

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.latitude, self.longitude)
    }
}

/// Something which can turn place names into coordinates
pub trait LocationResolver {
    /// Look up the coordinates of a named place.
    ///
    /// Returns `Ok(None)` if the place is unknown and an error if the lookup itself failed.
    fn resolve(&self, place: &str) -> Result<Option<Location>>;
}

#[derive(Debug, Deserialize)]
struct LocationRaw {
    name: String,
    latitude: f64,
    longitude: f64,
}

/// A table of known places, matched case-insensitively
#[derive(Debug, Default)]
pub struct Gazetteer {
    places: HashMap<UniCase<String>, Location>,
}

impl Gazetteer {
    /// Read a gazetteer from the `locations.csv` file in the given directory.
    ///
    /// If the file is not present, an empty gazetteer is returned.
    pub fn from_path(dir: &Path) -> Result<Self> {
        let file_path = dir.join(LOCATIONS_FILE_NAME);
        if !file_path.is_file() {
            return Ok(Self::default());
        }

        let iter = read_csv::<LocationRaw>(&file_path)?;
        Self::from_rows(iter).with_context(|| input_err_msg(&file_path))
    }

    fn from_rows<I>(iter: I) -> Result<Self>
    where
        I: Iterator<Item = LocationRaw>,
    {
        let mut places = HashMap::new();
        for raw in iter {
            let location = Location::new(raw.latitude, raw.longitude)
                .with_context(|| format!("Invalid coordinates for {}", raw.name))?;
            let name = UniCase::new(raw.name);
            ensure!(
                !places.contains_key(&name),
                "Duplicate entry for place {name}"
            );
            places.insert(name, location);
        }

        Ok(Self { places })
    }
}

impl LocationResolver for Gazetteer {
    fn resolve(&self, place: &str) -> Result<Option<Location>> {
        Ok(self.places.get(&UniCase::new(place.trim().to_string())).copied())
    }
}
