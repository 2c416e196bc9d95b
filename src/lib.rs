//! Sizing and costing of solar, wind, hybrid and gas supply for a fixed electrical load.
//!
//! For a given location and load, renewable capacity is sized so that generation covers the load
//! on all but the worst days of the year, with gas backup for the remainder. The levelised cost of
//! energy of each option is then compared with a dedicated combined-cycle gas plant.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod analysis;
pub mod ccgt;
pub mod cli;
pub mod finance;
pub mod hybrid;
pub mod input;
pub mod log;
pub mod output;
pub mod parameters;
pub mod profile;
pub mod report;
pub mod scenario;
pub mod settings;
pub mod sizing;
pub mod technology;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the directory in which program configuration files are stored.
///
/// Falls back to the current directory if the platform has no config directory.
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("powercost");

    path
}
