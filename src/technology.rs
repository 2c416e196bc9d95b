//! Renewable technologies and the types of supply system built from them.
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// A renewable generation technology
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    strum::Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Technology {
    /// Single-axis tracking solar PV
    Solar,
    /// Onshore wind turbines
    Wind,
}

impl Technology {
    /// The label used for this technology's capital cost component
    pub fn capex_label(self) -> &'static str {
        match self {
            Self::Solar => "Solar Panels",
            Self::Wind => "Wind Turbines",
        }
    }
}

/// The kind of supply system chosen for the load
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
)]
pub enum SystemType {
    /// Solar and wind together, backed up by gas
    #[display("Hybrid")]
    Hybrid,
    /// Solar backed up by gas
    #[display("Solar + Gas")]
    SolarGas,
    /// Wind backed up by gas
    #[display("Wind + Gas")]
    WindGas,
    /// A dedicated combined-cycle gas plant
    #[display("CCGT")]
    GasOnly,
}

impl SystemType {
    /// The system type for a renewable technology backed up by gas
    pub fn single(technology: Technology) -> Self {
        match technology {
            Technology::Solar => Self::SolarGas,
            Technology::Wind => Self::WindGas,
        }
    }
}
