//! Fixtures for tests

use crate::parameters::AnalysisParameters;
use crate::profile::GenerationSeries;
use crate::sizing::Demand;
use crate::technology::Technology;
use crate::units::{Capacity, EnergyPerCapacity};
use rstest::fixture;
use std::f64::consts::PI;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn parameters() -> AnalysisParameters {
    AnalysisParameters::default()
}

#[fixture]
pub fn demand() -> Demand {
    Demand::from_peak(Capacity(1000.0)).unwrap()
}

/// A series with the same output every day
pub fn flat_series(technology: Technology, value: f64, days: usize) -> GenerationSeries {
    GenerationSeries::new(technology, vec![EnergyPerCapacity(value); days]).unwrap()
}

/// A year of output with a seasonal cycle and day-to-day variation.
///
/// Solar peaks in summer and wind in winter. Every value is strictly positive and the values are
/// distinct.
pub fn varied_series(technology: Technology) -> GenerationSeries {
    let (phase, weather_freq) = match technology {
        Technology::Solar => (0.0, 1.7),
        Technology::Wind => (PI, 2.3),
    };
    let values = (0..365)
        .map(|day| {
            let day = day as f64;
            let seasonal = (2.0 * PI * (day - 80.0) / 365.0 + phase).sin();
            EnergyPerCapacity(5.0 + 3.0 * seasonal + 1.5 * (weather_freq * day).sin())
        })
        .collect();

    GenerationSeries::new(technology, values).unwrap()
}
