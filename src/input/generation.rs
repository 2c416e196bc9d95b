//! Code for obtaining normalised generation series for renewable technologies.
use super::location::Location;
use super::{input_err_msg, read_csv};
use crate::technology::Technology;
use anyhow::{Context, Result, ensure};
use log::debug;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::path::{Path, PathBuf};

/// The time resolution of a generation series
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Default)]
pub enum Resolution {
    /// One value per hour (kWh per kW installed, i.e. average output as a fraction of capacity)
    #[string = "hourly"]
    Hourly,
    /// One value per day (kWh per kW installed)
    #[default]
    #[string = "daily"]
    Daily,
}

/// A generation series as provided by a [`GenerationSource`].
///
/// Missing values are represented as `None` and must not be treated as zero generation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    /// The time resolution of the values
    pub resolution: Resolution,
    /// Energy generated per kW of installed capacity for each period, in chronological order
    pub values: Vec<Option<f64>>,
}

/// A source of normalised generation data for a technology at a location.
///
/// Implementations are responsible for any retries or timeouts needed when contacting external
/// services. They must either return data covering the whole reference year or an error.
pub trait GenerationSource {
    /// Get the generation per kW of installed capacity for `technology` at `location` over
    /// `year`.
    fn generation_series(
        &self,
        technology: Technology,
        location: &Location,
        year: i32,
    ) -> Result<RawSeries>;
}

#[derive(Debug, Deserialize)]
struct GenerationRow {
    period: usize,
    generation: Option<f64>,
}

/// Reads pre-computed generation series from CSV files.
///
/// Each technology has its own file, `{technology}_generation.csv`, with `period` and
/// `generation` columns. Empty `generation` cells denote missing data.
#[derive(Debug, Clone)]
pub struct CsvGenerationSource {
    dir: PathBuf,
    resolution: Resolution,
}

impl CsvGenerationSource {
    /// Create a new [`CsvGenerationSource`] reading files from `dir`
    pub fn new(dir: &Path, resolution: Resolution) -> Self {
        Self {
            dir: dir.to_path_buf(),
            resolution,
        }
    }

    /// The path to the generation file for the given technology
    pub fn file_path(&self, technology: Technology) -> PathBuf {
        self.dir.join(format!("{technology}_generation.csv"))
    }
}

impl GenerationSource for CsvGenerationSource {
    fn generation_series(
        &self,
        technology: Technology,
        location: &Location,
        year: i32,
    ) -> Result<RawSeries> {
        let file_path = self.file_path(technology);
        debug!(
            "Reading {technology} generation for {location} in {year} from {}",
            file_path.display()
        );

        let values = read_generation_rows(read_csv(&file_path)?)
            .with_context(|| input_err_msg(&file_path))?;

        Ok(RawSeries {
            resolution: self.resolution,
            values,
        })
    }
}

/// Collect generation values, checking that periods are numbered consecutively from zero
fn read_generation_rows<I>(iter: I) -> Result<Vec<Option<f64>>>
where
    I: Iterator<Item = GenerationRow>,
{
    iter.enumerate()
        .map(|(idx, row)| {
            ensure!(
                row.period == idx,
                "Periods must be numbered consecutively from 0 (expected {idx}, found {})",
                row.period
            );
            Ok(row.generation)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_csv_generation_source() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join("wind_generation.csv")).unwrap();
            writeln!(file, "period,generation\n0,4.5\n1,\n2,7.25").unwrap();
        }

        let source = CsvGenerationSource::new(dir.path(), Resolution::Daily);
        let location = Location::new(53.0, -8.0).unwrap();
        let series = source
            .generation_series(Technology::Wind, &location, 2022)
            .unwrap();
        assert_eq!(
            series,
            RawSeries {
                resolution: Resolution::Daily,
                values: vec![Some(4.5), None, Some(7.25)]
            }
        );

        // Periods out of order
        {
            let mut file = File::create(dir.path().join("wind_generation.csv")).unwrap();
            writeln!(file, "period,generation\n0,4.5\n2,7.25").unwrap();
        }
        assert!(
            source
                .generation_series(Technology::Wind, &location, 2022)
                .is_err()
        );

        // No solar file
        assert!(
            source
                .generation_series(Technology::Solar, &location, 2022)
                .is_err()
        );
    }
}
