//! Code for normalising generation profiles into daily series.
//!
//! Sizing works on daily energy per kW of installed capacity. Hourly data is aggregated into days
//! and the resulting series is checked for gaps before it can be used.
use crate::input::{RawSeries, Resolution};
use crate::technology::Technology;
use crate::units::{EnergyPerCapacity, HOURS_PER_DAY};
use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use itertools::Itertools;
use log::warn;
use std::iter::Sum;

/// The number of hourly values making up one day
const HOURS_IN_DAY: usize = 24;

/// The maximum number of missing days listed individually in a warning
const MAX_GAPS_LISTED: usize = 10;

/// Sum consecutive runs of 24 hourly values into daily values.
///
/// If the number of values is not a multiple of 24, the final partial day is still included so
/// that no data is silently dropped.
pub fn daily_aggregate<T>(hourly: &[T]) -> Vec<T>
where
    T: Copy + Sum<T>,
{
    hourly
        .chunks(HOURS_IN_DAY)
        .map(|day| day.iter().copied().sum())
        .collect()
}

/// Indices of days ordered from lowest to highest output.
///
/// The sort is stable, so days with equal output keep their calendar order.
pub fn rank_days(values: &[EnergyPerCapacity]) -> Vec<usize> {
    (0..values.len())
        .sorted_by(|&a, &b| values[a].total_cmp(&values[b]))
        .collect()
}

/// The number of days in the given calendar year
pub fn days_in_year(year: i32) -> Result<usize> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).with_context(|| format!("Invalid year {year}"))?;
    let end =
        NaiveDate::from_ymd_opt(year + 1, 1, 1).with_context(|| format!("Invalid year {year}"))?;
    Ok(usize::try_from((end - start).num_days())?)
}

/// An immutable series of daily generation per kW of installed capacity for one technology.
///
/// Values are finite, non-negative and no greater than 24 kWh per kW (i.e. running at full
/// capacity all day).
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSeries {
    technology: Technology,
    values: Vec<EnergyPerCapacity>,
}

impl GenerationSeries {
    /// Create a new [`GenerationSeries`] from daily values, checking that they are valid
    pub fn new(technology: Technology, values: Vec<EnergyPerCapacity>) -> Result<Self> {
        ensure!(!values.is_empty(), "{technology} generation series is empty");

        let max_daily = EnergyPerCapacity(HOURS_PER_DAY.value());
        for (day, value) in values.iter().enumerate() {
            ensure!(
                value.is_finite() && *value >= EnergyPerCapacity(0.0),
                "Invalid {technology} generation on day {day}: values must be finite and \
                non-negative (got {})",
                value.value()
            );
            ensure!(
                *value <= max_daily,
                "Invalid {technology} generation on day {day}: {} kWh per kW exceeds the \
                maximum possible in 24 hours",
                value.value()
            );
        }

        Ok(Self { technology, values })
    }

    /// Normalise a raw series into daily values.
    ///
    /// Hourly series are aggregated into days. A day with any missing hour is itself missing.
    /// Missing days are reported as a data quality warning and result in an error, as treating
    /// them as zero generation would overstate the need for backup.
    pub fn from_raw(technology: Technology, raw: &RawSeries) -> Result<Self> {
        let daily = match raw.resolution {
            Resolution::Daily => raw.values.clone(),
            Resolution::Hourly => daily_aggregate(&raw.values),
        };

        let gaps = daily
            .iter()
            .positions(Option::is_none)
            .collect_vec();
        if !gaps.is_empty() {
            let mut listed = gaps.iter().take(MAX_GAPS_LISTED).join(", ");
            if gaps.len() > MAX_GAPS_LISTED {
                listed.push_str(", ...");
            }
            warn!(
                "Data quality: {technology} generation is missing for {} day(s): {listed}",
                gaps.len()
            );
        }
        ensure!(
            gaps.is_empty(),
            "{technology} generation series has {} missing day(s); refusing to treat gaps as \
            zero generation",
            gaps.len()
        );

        let values = daily.into_iter().flatten().map(EnergyPerCapacity).collect();
        Self::new(technology, values)
    }

    /// The technology this series describes
    pub fn technology(&self) -> Technology {
        self.technology
    }

    /// Daily values in chronological order
    pub fn values(&self) -> &[EnergyPerCapacity] {
        &self.values
    }

    /// The number of days in the series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series is empty (never true for a validated series)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A copy of the daily values sorted from lowest to highest
    pub fn sorted(&self) -> Vec<EnergyPerCapacity> {
        self.values
            .iter()
            .copied()
            .sorted_by(EnergyPerCapacity::total_cmp)
            .collect()
    }

    /// Check that the series covers every day of the reference year
    pub fn check_full_year(&self, year: i32) -> Result<()> {
        let expected = days_in_year(year)?;
        ensure!(
            self.len() == expected,
            "{} generation series has {} days but reference year {year} has {expected}",
            self.technology,
            self.len()
        );

        Ok(())
    }
}
