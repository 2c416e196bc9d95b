//! Code for shaping analysis results into tables for reporting.
//!
//! Every system analysed produces a [`SystemReport`], a flat list of metrics plus its capital
//! cost breakdown and daily energy flows. These are written to CSV files by the `output` module
//! and summarised in the log.
use crate::ccgt::CcgtResult;
use crate::finance::capex_per_kw;
use crate::hybrid::HybridSweepResult;
use crate::parameters::AnalysisParameters;
use crate::sizing::{Demand, SizingResult, solar_area_km2, turbine_count};
use crate::technology::{SystemType, Technology};
use crate::units::Dimensionless;
use anyhow::Result;
use itertools::Itertools;
use log::info;
use serde::Serialize;

/// A single named value describing a system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    /// The analysis which produced the row
    pub analysis: String,
    /// The system described
    pub system: String,
    /// Name of the metric
    pub metric: String,
    /// Value of the metric
    pub value: f64,
    /// Unit of the value
    pub unit: &'static str,
}

/// Capital cost of one component of a system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapexRow {
    /// The analysis which produced the row
    pub analysis: String,
    /// The system described
    pub system: String,
    /// The component (e.g. battery storage)
    pub component: &'static str,
    /// Capital cost
    pub capex: f64,
}

/// Energy flows of a system on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEnergyRow {
    /// The analysis which produced the row
    pub analysis: String,
    /// The system described
    pub system: String,
    /// Day of the year (zero-based)
    pub day: usize,
    /// Position of the day when ordered by output, worst first
    pub rank: usize,
    /// Solar generation, if solar is part of the system
    pub solar_output: Option<f64>,
    /// Wind generation, if wind is part of the system
    pub wind_output: Option<f64>,
    /// Renewable energy delivered to the load
    pub consumed: f64,
    /// Renewable energy thrown away
    pub curtailed: f64,
    /// Energy supplied by the backup generator
    pub backup: f64,
}

/// One blend of a hybrid sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    /// Fraction of capacity provided by solar
    pub gamma: f64,
    /// Levelised cost of energy
    pub lcoe: f64,
    /// Installed solar capacity
    pub solar_capacity: f64,
    /// Installed wind capacity
    pub wind_capacity: f64,
    /// Battery energy capacity
    pub battery_capacity: f64,
    /// Energy supplied by the backup generator over the year
    pub backup_energy: f64,
    /// Total capital cost
    pub total_capex: f64,
    /// Whether this blend was selected
    pub selected: bool,
}

/// One category of the annual costs of a CCGT plant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CcgtCostRow {
    /// The cost category
    pub component: &'static str,
    /// Annual cost
    pub annual_cost: f64,
}

/// Tabular description of one analysed system
#[derive(Debug, Clone, PartialEq)]
pub struct SystemReport {
    /// The analysis which produced the report
    pub analysis: SystemType,
    /// The system described. This differs from `analysis` when the hybrid optimiser selects a
    /// single technology.
    pub system_type: SystemType,
    /// Headline metrics
    pub metrics: Vec<MetricRow>,
    /// Capital cost breakdown
    pub capex: Vec<CapexRow>,
    /// Daily energy flows (empty for systems which are not sized against weather data)
    pub daily: Vec<DailyEnergyRow>,
}

impl SystemReport {
    fn new(analysis: SystemType, system_type: SystemType) -> Self {
        Self {
            analysis,
            system_type,
            metrics: Vec::new(),
            capex: Vec::new(),
            daily: Vec::new(),
        }
    }

    fn push_metric(&mut self, metric: &str, value: f64, unit: &'static str) {
        self.metrics.push(MetricRow {
            analysis: self.analysis.to_string(),
            system: self.system_type.to_string(),
            metric: metric.to_string(),
            value,
            unit,
        });
    }

    /// Look up the value of a metric by name
    pub fn metric(&self, metric: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|row| row.metric == metric)
            .map(|row| row.value)
    }

    /// Describe a renewable system sized against weather data
    pub fn from_sizing(
        system_type: SystemType,
        result: &SizingResult,
        demand: &Demand,
        parameters: &AnalysisParameters,
        wacc: Dimensionless,
    ) -> Result<Self> {
        Self::describe_sizing(system_type, system_type, result, demand, parameters, wacc)
    }

    fn describe_sizing(
        analysis: SystemType,
        system_type: SystemType,
        result: &SizingResult,
        demand: &Demand,
        parameters: &AnalysisParameters,
        wacc: Dimensionless,
    ) -> Result<Self> {
        let mut report = Self::new(analysis, system_type);
        let served = result.energy_served();
        let days = result.days();

        report.push_metric("lcoe", result.lcoe.value(), "$/kWh");
        report.push_metric("wacc", wacc.value(), "fraction");
        report.push_metric("annual_demand", result.annual_demand.value(), "kWh");
        report.push_metric(
            "renewable_fraction",
            (result.consumed_energy() / served).value(),
            "fraction",
        );
        report.push_metric("backup_fraction", result.backup_fraction().value(), "fraction");
        report.push_metric("backup_energy", result.backup_energy.value(), "kWh");
        report.push_metric(
            "curtailment_fraction",
            result.curtailment_fraction().value(),
            "fraction",
        );

        for component in &result.components {
            let tech = component.technology;
            report.push_metric(
                &format!("{tech}_fraction"),
                (component.consumed / served).value(),
                "fraction",
            );
            report.push_metric(&format!("{tech}_capacity"), component.capacity.value(), "kW");
            report.push_metric(
                &format!("{tech}_capacity_factor"),
                component.capacity_factor(days).value(),
                "fraction",
            );
            report.push_metric(
                &format!("{tech}_curtailment_fraction"),
                component.curtailment_fraction().value(),
                "fraction",
            );
            match tech {
                Technology::Solar => report.push_metric(
                    "solar_area",
                    solar_area_km2(component.capacity, parameters),
                    "km2",
                ),
                Technology::Wind => report.push_metric(
                    "wind_turbines",
                    turbine_count(component.capacity, parameters),
                    "turbines",
                ),
            }
        }

        report.push_metric("battery_hours", result.battery_hours.value(), "h");
        report.push_metric("battery_capacity", result.battery_capacity.value(), "kWh");
        report.push_metric("backup_capacity", result.backup_capacity.value(), "kW");

        let total_capex = result.capex.total();
        report.push_metric("total_capex", total_capex.value(), "$");
        report.push_metric(
            "capex_per_kw_peak",
            capex_per_kw(total_capex, demand.peak)?.value(),
            "$/kW",
        );

        report.capex = result
            .capex
            .iter()
            .map(|(component, capex)| CapexRow {
                analysis: analysis.to_string(),
                system: system_type.to_string(),
                component,
                capex: capex.value(),
            })
            .collect();

        report.daily = result
            .daily
            .iter()
            .map(|day| {
                let output_for = |technology| {
                    result
                        .components
                        .iter()
                        .position(|c| c.technology == technology)
                        .map(|idx| day.output[idx].value())
                };
                DailyEnergyRow {
                    analysis: analysis.to_string(),
                    system: system_type.to_string(),
                    day: day.day,
                    rank: day.rank,
                    solar_output: output_for(Technology::Solar),
                    wind_output: output_for(Technology::Wind),
                    consumed: day.consumed.value(),
                    curtailed: day.curtailed.value(),
                    backup: day.backup.value(),
                }
            })
            .collect();

        Ok(report)
    }

    /// Describe the system selected by a hybrid sweep.
    ///
    /// The report belongs to the hybrid analysis but describes whichever system the sweep
    /// selected, which is a single technology if no blend was cheap enough.
    pub fn from_hybrid(
        sweep: &HybridSweepResult,
        demand: &Demand,
        parameters: &AnalysisParameters,
        wacc: Dimensionless,
    ) -> Result<Self> {
        let best = sweep.best();
        let mut report = Self::describe_sizing(
            SystemType::Hybrid,
            sweep.system_type,
            &best.result,
            demand,
            parameters,
            wacc,
        )?;
        report.push_metric("gamma", best.gamma.value(), "fraction");
        report.push_metric(
            "lcoe_improvement",
            sweep.lcoe_improvement.value(),
            "fraction",
        );

        Ok(report)
    }

    /// Describe a dedicated CCGT plant
    pub fn from_ccgt(
        result: &CcgtResult,
        demand: &Demand,
        parameters: &AnalysisParameters,
        wacc: Dimensionless,
    ) -> Result<Self> {
        let mut report = Self::new(SystemType::GasOnly, SystemType::GasOnly);
        report.push_metric("lcoe", result.lcoe.value(), "$/kWh");
        report.push_metric("wacc", wacc.value(), "fraction");
        report.push_metric("annual_demand", result.annual_energy.value(), "kWh");
        report.push_metric("backup_fraction", 1.0, "fraction");
        report.push_metric("ccgt_capacity", result.capacity.value(), "kW");
        report.push_metric(
            "ccgt_capacity_factor",
            parameters.ccgt_capacity_factor.value(),
            "fraction",
        );
        for (category, cost) in result.cost_breakdown() {
            let metric = format!("annual_{}", category.to_lowercase().replace([' ', '&'], "_"));
            report.push_metric(&metric, cost.value(), "$");
        }
        report.push_metric("total_capex", result.capex.value(), "$");
        report.push_metric(
            "capex_per_kw_peak",
            capex_per_kw(result.capex, demand.peak)?.value(),
            "$/kW",
        );
        report.capex = vec![CapexRow {
            analysis: SystemType::GasOnly.to_string(),
            system: SystemType::GasOnly.to_string(),
            component: "Gas",
            capex: result.capex.value(),
        }];

        Ok(report)
    }
}

/// Rows describing every blend of a hybrid sweep
pub fn sweep_rows(sweep: &HybridSweepResult) -> Vec<SweepRow> {
    let capacity_of = |result: &SizingResult, technology| {
        result
            .component(technology)
            .map_or(0.0, |c| c.capacity.value())
    };

    sweep
        .points
        .iter()
        .enumerate()
        .map(|(idx, point)| SweepRow {
            gamma: point.gamma.value(),
            lcoe: point.result.lcoe.value(),
            solar_capacity: capacity_of(&point.result, Technology::Solar),
            wind_capacity: capacity_of(&point.result, Technology::Wind),
            battery_capacity: point.result.battery_capacity.value(),
            backup_energy: point.result.backup_energy.value(),
            total_capex: point.result.capex.total().value(),
            selected: idx == sweep.selected,
        })
        .collect()
}

/// Rows describing the annual costs of a CCGT plant
pub fn ccgt_cost_rows(result: &CcgtResult) -> Vec<CcgtCostRow> {
    result
        .cost_breakdown()
        .into_iter()
        .map(|(component, cost)| CcgtCostRow {
            component,
            annual_cost: cost.value(),
        })
        .collect()
}

/// Log a short summary of each system, cheapest first
pub fn log_summary(reports: &[SystemReport]) {
    info!(
        "{:<12} {:<12} {:>12} {:>16} {:>10}",
        "Analysis", "System", "LCOE ($/kWh)", "Capex ($)", "Backup"
    );
    let rows = reports.iter().sorted_by(|a, b| {
        let a = a.metric("lcoe").unwrap_or(f64::INFINITY);
        let b = b.metric("lcoe").unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
    for report in rows {
        info!(
            "{:<12} {:<12} {:>12.4} {:>16.0} {:>9.1}%",
            report.analysis.to_string(),
            report.system_type.to_string(),
            report.metric("lcoe").unwrap_or(f64::NAN),
            report.metric("total_capex").unwrap_or(f64::NAN),
            report.metric("backup_fraction").unwrap_or(f64::NAN) * 100.0
        );
    }
}
