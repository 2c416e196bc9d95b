//! The module responsible for writing output data to disk.
use crate::analysis::AnalysisReport;
use crate::ccgt::CcgtResult;
use crate::hybrid::HybridSweepResult;
use crate::report::{SystemReport, ccgt_cost_rows, sweep_rows};
use crate::scenario::Scenario;
use crate::technology::SystemType;
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "powercost_results";

/// The output file name for headline metrics
const SUMMARY_FILE_NAME: &str = "summary.csv";

/// The output file name for capital cost breakdowns
const CAPEX_FILE_NAME: &str = "capex_breakdown.csv";

/// The output file name for daily energy flows
const DAILY_ENERGY_FILE_NAME: &str = "daily_energy.csv";

/// The output file name for the hybrid sweep
const HYBRID_SWEEP_FILE_NAME: &str = "hybrid_sweep.csv";

/// The output file name for the CCGT cost breakdown
const CCGT_COSTS_FILE_NAME: &str = "ccgt_cost_breakdown.csv";

/// The output file name for the daily energy flows of every hybrid blend
const HYBRID_DAILY_ENERGY_FILE_NAME: &str = "debug_hybrid_daily_energy.csv";

/// Get the output directory for the scenario in the specified directory
pub fn get_output_dir(scenario_dir: &Path) -> Result<PathBuf> {
    // Get the scenario name from the dir path. This ends up being convoluted because we need to
    // check for all possible errors.
    let scenario_dir = scenario_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to scenario")?;

    let scenario_name = scenario_dir
        .file_name()
        .context("Scenario cannot be in root folder")?
        .to_str()
        .context("Invalid chars in scenario dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory.
///
/// Returns whether existing output will be overwritten. An error is raised if the directory
/// already contains files and `allow_overwrite` is false.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        // Empty directories can be used without any fuss
        if output_dir.read_dir()?.next().is_none() {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to overwrite it."
        );
        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// A hybrid blend fraction, written alongside other rows
#[derive(Serialize)]
struct GammaRow {
    gamma: f64,
}

/// For writing extra information useful when debugging an analysis
struct DebugDataWriter {
    hybrid_daily_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        let file_path = output_path.join(HYBRID_DAILY_ENERGY_FILE_NAME);

        Ok(Self {
            hybrid_daily_writer: csv::Writer::from_path(file_path)?,
        })
    }

    /// Write daily energy flows for every blend of a hybrid sweep
    fn write_hybrid_daily(
        &mut self,
        sweep: &HybridSweepResult,
        scenario: &Scenario,
        wacc: Dimensionless,
    ) -> Result<()> {
        for point in &sweep.points {
            let report = SystemReport::from_sizing(
                SystemType::Hybrid,
                &point.result,
                &scenario.demand,
                &scenario.parameters,
                wacc,
            )?;
            for row in report.daily {
                self.hybrid_daily_writer.serialize((
                    GammaRow {
                        gamma: point.gamma.value(),
                    },
                    row,
                ))?;
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.hybrid_daily_writer.flush()?;

        Ok(())
    }
}

/// An object for writing analysis results to file
pub struct DataWriter {
    summary_writer: csv::Writer<File>,
    capex_writer: csv::Writer<File>,
    daily_writer: csv::Writer<File>,
    sweep_writer: csv::Writer<File>,
    ccgt_writer: csv::Writer<File>,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `write_blend_flows` - Whether to also write the daily flows of every hybrid blend
    pub fn create(output_path: &Path, write_blend_flows: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let debug_writer = if write_blend_flows {
            // Create debug CSV files
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            summary_writer: new_writer(SUMMARY_FILE_NAME)?,
            capex_writer: new_writer(CAPEX_FILE_NAME)?,
            daily_writer: new_writer(DAILY_ENERGY_FILE_NAME)?,
            sweep_writer: new_writer(HYBRID_SWEEP_FILE_NAME)?,
            ccgt_writer: new_writer(CCGT_COSTS_FILE_NAME)?,
            debug_writer,
        })
    }

    /// Write the metrics, capital costs and daily energy flows of a system
    pub fn write_system_report(&mut self, report: &SystemReport) -> Result<()> {
        for row in &report.metrics {
            self.summary_writer.serialize(row)?;
        }
        for row in &report.capex {
            self.capex_writer.serialize(row)?;
        }
        for row in &report.daily {
            self.daily_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write every blend of a hybrid sweep
    pub fn write_sweep(&mut self, sweep: &HybridSweepResult) -> Result<()> {
        for row in sweep_rows(sweep) {
            self.sweep_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write the annual cost breakdown of a CCGT plant
    pub fn write_ccgt_costs(&mut self, result: &CcgtResult) -> Result<()> {
        for row in ccgt_cost_rows(result) {
            self.ccgt_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write all results of an analysis, returning the reports for each system
    pub fn write_analysis(
        &mut self,
        report: &AnalysisReport,
        scenario: &Scenario,
    ) -> Result<Vec<SystemReport>> {
        let system_reports = report.system_reports(scenario)?;
        for system_report in &system_reports {
            self.write_system_report(system_report)?;
        }
        if let Some(sweep) = &report.hybrid {
            self.write_sweep(sweep)?;
            if let Some(wtr) = &mut self.debug_writer {
                wtr.write_hybrid_daily(sweep, scenario, report.wacc)?;
            }
        }
        if let Some(ccgt) = &report.ccgt {
            self.write_ccgt_costs(ccgt)?;
        }

        Ok(system_reports)
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.summary_writer.flush()?;
        self.capex_writer.flush()?;
        self.daily_writer.flush()?;
        self.sweep_writer.flush()?;
        self.ccgt_writer.flush()?;
        if let Some(wtr) = &mut self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccgt::cost_ccgt;
    use crate::fixture::{demand, parameters, varied_series};
    use crate::hybrid::sweep_hybrid;
    use crate::sizing::size_single_technology;
    use crate::technology::Technology;
    use itertools::Itertools;
    use tempfile::tempdir;

    /// Read back a CSV file as a header and rows of strings
    fn read_back(file_path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(file_path).unwrap();
        let header = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|record| record.unwrap().iter().map(String::from).collect())
            .collect();
        (header, rows)
    }

    #[test]
    fn test_write_system_report() {
        let demand = demand();
        let parameters = parameters();
        let wacc = Dimensionless(0.06);
        let result =
            size_single_technology(&varied_series(Technology::Wind), &demand, &parameters, wacc)
                .unwrap();
        let report =
            SystemReport::from_sizing(SystemType::WindGas, &result, &demand, &parameters, wacc)
                .unwrap();

        let dir = tempdir().unwrap();
        {
            let mut writer = DataWriter::create(dir.path(), false).unwrap();
            writer.write_system_report(&report).unwrap();
            writer.flush().unwrap();
        }

        let (header, rows) = read_back(&dir.path().join(SUMMARY_FILE_NAME));
        assert_eq!(header, ["analysis", "system", "metric", "value", "unit"]);
        assert_eq!(rows.len(), report.metrics.len());
        assert_eq!(rows[0][..3], ["Wind + Gas", "Wind + Gas", "lcoe"]);

        let (header, rows) = read_back(&dir.path().join(DAILY_ENERGY_FILE_NAME));
        assert_eq!(
            header,
            [
                "analysis",
                "system",
                "day",
                "rank",
                "solar_output",
                "wind_output",
                "consumed",
                "curtailed",
                "backup"
            ]
        );
        assert_eq!(rows.len(), 365);
        // No solar in this system
        assert!(rows.iter().all(|row| row[4].is_empty()));

        let (_, rows) = read_back(&dir.path().join(CAPEX_FILE_NAME));
        let components = rows.iter().map(|row| row[2].as_str()).collect_vec();
        assert_eq!(components, ["Wind Turbines", "Battery Storage", "Gas"]);

        // Debug output is only written on request
        assert!(!dir.path().join(HYBRID_DAILY_ENERGY_FILE_NAME).exists());
    }

    #[test]
    fn test_write_sweep_and_ccgt() {
        let demand = demand();
        let parameters = parameters();
        let wacc = Dimensionless(0.06);
        let sweep = sweep_hybrid(
            &varied_series(Technology::Solar),
            &varied_series(Technology::Wind),
            &demand,
            &parameters,
            wacc,
        )
        .unwrap();
        let ccgt = cost_ccgt(&demand, 365, &parameters, wacc).unwrap();

        let dir = tempdir().unwrap();
        {
            let mut writer = DataWriter::create(dir.path(), true).unwrap();
            writer.write_sweep(&sweep).unwrap();
            writer.write_ccgt_costs(&ccgt).unwrap();
            writer.flush().unwrap();
        }

        let (header, rows) = read_back(&dir.path().join(HYBRID_SWEEP_FILE_NAME));
        assert_eq!(header[0], "gamma");
        assert_eq!(rows.len(), parameters.hybrid_gamma_steps);
        assert_eq!(rows.iter().filter(|row| row[7] == "true").count(), 1);

        let (header, rows) = read_back(&dir.path().join(CCGT_COSTS_FILE_NAME));
        assert_eq!(header, ["component", "annual_cost"]);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("a").join("b");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Existing but empty
        assert!(!create_output_directory(&output_dir, false).unwrap());

        fs::write(output_dir.join(SUMMARY_FILE_NAME), "").unwrap();
        assert!(create_output_directory(&output_dir, false).is_err());
        assert!(create_output_directory(&output_dir, true).unwrap());
    }

    #[test]
    fn test_get_output_dir() {
        let dir = tempdir().unwrap();
        let scenario_dir = dir.path().join("tucson");
        fs::create_dir(&scenario_dir).unwrap();
        assert_eq!(
            get_output_dir(&scenario_dir).unwrap(),
            PathBuf::from(OUTPUT_DIRECTORY_ROOT).join("tucson")
        );
    }
}
