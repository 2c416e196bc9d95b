//! Integration tests for the `run` command.
use itertools::Itertools;
use powercost::cli::{RunOpts, handle_run_command};
use powercost::settings::Settings;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Get the path to the example scenario.
fn get_scenario_dir() -> PathBuf {
    PathBuf::from("demos/tucson")
}

/// The distinct systems listed in the summary file
fn summary_systems(output_dir: &Path) -> Vec<String> {
    let mut reader = csv::Reader::from_path(output_dir.join("summary.csv")).unwrap();
    reader
        .records()
        .map(|record| record.unwrap()[0].to_string())
        .unique()
        .collect()
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("POWERCOST_LOG_LEVEL", "off") };

    {
        // Save results to non-existent directory to check that directory creation works
        let tempdir = tempdir().unwrap();
        let output_dir = tempdir.path().join("results");
        let opts = RunOpts {
            output_dir: Some(output_dir.clone()),
            ..RunOpts::default()
        };
        handle_run_command(&get_scenario_dir(), &opts, Some(Settings::default())).unwrap();

        for file_name in [
            "summary.csv",
            "capex_breakdown.csv",
            "daily_energy.csv",
            "hybrid_sweep.csv",
            "ccgt_cost_breakdown.csv",
            "metadata.toml",
            "powercost_info.log",
            "powercost_error.log",
        ] {
            assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
        }

        // Debug output is only written on request
        assert!(!output_dir.join("debug_hybrid_daily_energy.csv").exists());

        assert_eq!(
            summary_systems(&output_dir),
            ["Solar + Gas", "Wind + Gas", "Hybrid", "CCGT"]
        );
    }

    // Second time will fail because the logging is already initialised
    let opts = RunOpts {
        output_dir: Some(tempdir().unwrap().path().to_path_buf()),
        ..RunOpts::default()
    };
    assert_eq!(
        handle_run_command(&get_scenario_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
