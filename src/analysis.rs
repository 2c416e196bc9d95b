//! Functionality for running a complete analysis of the supply options for a load.
use crate::ccgt::{CcgtResult, cost_ccgt};
use crate::finance::wacc;
use crate::hybrid::{HybridSweepResult, sweep_hybrid};
use crate::input::{GenerationSource, MarketData};
use crate::profile::GenerationSeries;
use crate::report::SystemReport;
use crate::scenario::Scenario;
use crate::sizing::{SizingResult, size_single_technology};
use crate::technology::{SystemType, Technology};
use crate::units::Dimensionless;
use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use itertools::Itertools;
use log::{error, info};
use strum::IntoEnumIterator;

/// A system which could not be analysed
#[derive(Debug)]
pub struct SystemFailure {
    /// The system which failed
    pub system_type: SystemType,
    /// What went wrong
    pub error: anyhow::Error,
}

/// The results of analysing every supply option for a load
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// Discount rate used for capital recovery
    pub wacc: Dimensionless,
    /// Solar backed up by gas
    pub solar: Option<SizingResult>,
    /// Wind backed up by gas
    pub wind: Option<SizingResult>,
    /// Sweep over solar/wind blends
    pub hybrid: Option<HybridSweepResult>,
    /// Dedicated gas plant
    pub ccgt: Option<CcgtResult>,
    /// Systems which could not be analysed
    pub failures: Vec<SystemFailure>,
}

impl AnalysisReport {
    /// The sizing result for a single technology backed up by gas, if it succeeded
    pub fn single(&self, technology: Technology) -> Option<&SizingResult> {
        match technology {
            Technology::Solar => self.solar.as_ref(),
            Technology::Wind => self.wind.as_ref(),
        }
    }

    /// Whether any system was analysed successfully
    pub fn any_succeeded(&self) -> bool {
        self.solar.is_some() || self.wind.is_some() || self.hybrid.is_some() || self.ccgt.is_some()
    }

    /// Whether the given system failed
    pub fn has_failed(&self, system_type: SystemType) -> bool {
        self.failures
            .iter()
            .any(|failure| failure.system_type == system_type)
    }

    /// Tabular reports for every system analysed successfully
    pub fn system_reports(&self, scenario: &Scenario) -> Result<Vec<SystemReport>> {
        let demand = &scenario.demand;
        let parameters = &scenario.parameters;
        let mut reports = Vec::new();
        for technology in Technology::iter() {
            if let Some(result) = self.single(technology) {
                reports.push(SystemReport::from_sizing(
                    SystemType::single(technology),
                    result,
                    demand,
                    parameters,
                    self.wacc,
                )?);
            }
        }
        if let Some(sweep) = &self.hybrid {
            reports.push(SystemReport::from_hybrid(
                sweep, demand, parameters, self.wacc,
            )?);
        }
        if let Some(ccgt) = &self.ccgt {
            reports.push(SystemReport::from_ccgt(
                ccgt, demand, parameters, self.wacc,
            )?);
        }

        Ok(reports)
    }

    fn record_failure(&mut self, system_type: SystemType, error: anyhow::Error) {
        error!("{system_type} analysis failed: {error:#}");
        self.failures.push(SystemFailure { system_type, error });
    }
}

/// Analyse a scenario using the generation data and market data it specifies
pub fn run_scenario(scenario: &Scenario) -> Result<AnalysisReport> {
    run_analysis(scenario, &scenario.generation_source(), &scenario.market)
}

/// Analyse every supply option for the load described by a scenario.
///
/// Failing to obtain the risk-free rate is fatal, as no system can be costed without it. Otherwise
/// a failure in one system does not prevent the others from being analysed. The hybrid system
/// needs valid generation data for both solar and wind.
///
/// # Arguments
///
/// * `scenario` - The location, load and assumptions to analyse
/// * `generation` - Source of generation data for the location
/// * `market` - Source of financial market data
pub fn run_analysis(
    scenario: &Scenario,
    generation: &impl GenerationSource,
    market: &impl MarketData,
) -> Result<AnalysisReport> {
    let parameters = &scenario.parameters;
    let demand = &scenario.demand;

    let risk_free_rate = market
        .risk_free_rate()
        .context("Failed to obtain the risk-free rate from market data")?;
    let wacc = wacc(risk_free_rate, &parameters.financing_mix())?;
    info!(
        "Risk-free rate: {:.2}%, WACC: {:.2}%",
        risk_free_rate.value() * 100.0,
        wacc.value() * 100.0
    );

    let mut report = AnalysisReport {
        wacc,
        ..Default::default()
    };

    let series: IndexMap<Technology, Result<GenerationSeries>> = Technology::iter()
        .map(|technology| {
            let series = load_series(scenario, generation, technology);
            (technology, series)
        })
        .collect();

    for (&technology, technology_series) in &series {
        let result = technology_series
            .as_ref()
            .map_err(|err| anyhow!("{err:#}"))
            .and_then(|series| size_single_technology(series, demand, parameters, wacc));
        match result {
            Ok(result) => {
                info!(
                    "{}: LCOE = {:.4} $/kWh",
                    SystemType::single(technology),
                    result.lcoe.value()
                );
                match technology {
                    Technology::Solar => report.solar = Some(result),
                    Technology::Wind => report.wind = Some(result),
                }
            }
            Err(err) => report.record_failure(SystemType::single(technology), err),
        }
    }

    match (&series[&Technology::Solar], &series[&Technology::Wind]) {
        (Ok(solar), Ok(wind)) => match sweep_hybrid(solar, wind, demand, parameters, wacc) {
            Ok(sweep) => report.hybrid = Some(sweep),
            Err(err) => report.record_failure(SystemType::Hybrid, err),
        },
        _ => {
            let missing = series
                .iter()
                .filter(|(_, technology_series)| technology_series.is_err())
                .map(|(technology, _)| technology)
                .join(" and ");
            report.record_failure(
                SystemType::Hybrid,
                anyhow!("Hybrid analysis needs valid generation data but {missing} data is unavailable"),
            );
        }
    }

    match scenario
        .days()
        .and_then(|days| cost_ccgt(demand, days, parameters, wacc))
    {
        Ok(result) => {
            info!("{}: LCOE = {:.4} $/kWh", SystemType::GasOnly, result.lcoe.value());
            report.ccgt = Some(result);
        }
        Err(err) => report.record_failure(SystemType::GasOnly, err),
    }

    if !report.any_succeeded() {
        bail!(
            "No supply option could be analysed ({} failed)",
            report
                .failures
                .iter()
                .map(|failure| failure.system_type)
                .join(", ")
        );
    }

    Ok(report)
}

/// Obtain and normalise the generation series for one technology
fn load_series(
    scenario: &Scenario,
    generation: &impl GenerationSource,
    technology: Technology,
) -> Result<GenerationSeries> {
    let raw = generation
        .generation_series(technology, &scenario.location, scenario.year)
        .with_context(|| format!("Failed to obtain {technology} generation data"))?;
    let series = GenerationSeries::from_raw(technology, &raw)?;
    series.check_full_year(scenario.year)?;

    Ok(series)
}
