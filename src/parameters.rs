//! Defines the `AnalysisParameters` struct, which holds the cost and technical assumptions used for
//! an analysis.
//!
//! A single immutable instance is read per analysis and passed by reference to every sizing and
//! financial routine.
use crate::finance::{BackupCosts, FinancingMix, fuel_price_per_kwh};
use crate::input::deserialise_proportion;
use crate::technology::Technology;
use crate::units::{Capacity, Dimensionless, Hours, MoneyPerCapacity, MoneyPerEnergy};
use anyhow::{Result, ensure};
use serde::Deserialize;

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_solar_cost_per_kw, MoneyPerCapacity, 350.0);
define_unit_param_default!(default_wind_cost_per_kw, MoneyPerCapacity, 1300.0);
define_unit_param_default!(default_battery_cost_per_kwh, MoneyPerEnergy, 250.0);
define_param_default!(default_ng_price_per_mmbtu, f64, 12.0);
define_unit_param_default!(default_ocgt_efficiency, Dimensionless, 0.35);
define_unit_param_default!(default_ocgt_capex_per_kw, MoneyPerCapacity, 800.0);
define_unit_param_default!(default_ocgt_opex_per_kwh, MoneyPerEnergy, 0.02);
define_unit_param_default!(default_ccgt_efficiency, Dimensionless, 0.55);
define_unit_param_default!(default_ccgt_capex_per_kw, MoneyPerCapacity, 1200.0);
define_unit_param_default!(default_ccgt_opex_per_kwh, MoneyPerEnergy, 0.01);
define_unit_param_default!(default_ccgt_capacity_factor, Dimensionless, 0.7);
define_param_default!(default_project_lifetime, u32, 20);
define_unit_param_default!(default_solar_battery_storage_hours, Hours, 24.0);
define_unit_param_default!(default_wind_battery_storage_hours, Hours, 12.0);
define_param_default!(default_cutoff_day, usize, 50);
define_param_default!(default_hybrid_lcoe_threshold, f64, 0.0);
define_param_default!(default_hybrid_gamma_steps, usize, 10);
define_unit_param_default!(default_equity_premium, Dimensionless, 0.05);
define_unit_param_default!(default_debt_premium, Dimensionless, 0.02);
define_param_default!(default_debt_ratio, f64, 0.6);
define_param_default!(default_tax_rate, f64, 0.21);
define_unit_param_default!(default_solar_panel_efficiency, Dimensionless, 0.2);
define_unit_param_default!(default_solar_panel_density, Dimensionless, 0.4);
define_unit_param_default!(default_wind_turbine_rating, Capacity, 7500.0);

/// Cost and technical assumptions for an analysis.
///
/// Every field is optional in the input file; missing fields take the default values.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnalysisParameters {
    /// Capital cost of solar PV per kW installed
    #[serde(default = "default_solar_cost_per_kw")]
    pub solar_cost_per_kw: MoneyPerCapacity,
    /// Capital cost of wind turbines per kW installed
    #[serde(default = "default_wind_cost_per_kw")]
    pub wind_cost_per_kw: MoneyPerCapacity,
    /// Capital cost of battery storage per kWh
    #[serde(default = "default_battery_cost_per_kwh")]
    pub battery_cost_per_kwh: MoneyPerEnergy,
    /// Natural gas price in $/MMBtu
    #[serde(default = "default_ng_price_per_mmbtu")]
    pub ng_price_per_mmbtu: f64,
    /// Efficiency of the open-cycle gas turbine used as backup
    #[serde(default = "default_ocgt_efficiency")]
    pub ocgt_efficiency: Dimensionless,
    /// Capital cost of the backup gas turbine per kW
    #[serde(default = "default_ocgt_capex_per_kw")]
    pub ocgt_capex_per_kw: MoneyPerCapacity,
    /// Operation and maintenance cost of the backup gas turbine per kWh generated
    #[serde(default = "default_ocgt_opex_per_kwh")]
    pub ocgt_opex_per_kwh: MoneyPerEnergy,
    /// Efficiency of the combined-cycle gas turbine
    #[serde(default = "default_ccgt_efficiency")]
    pub ccgt_efficiency: Dimensionless,
    /// Capital cost of the combined-cycle gas turbine per kW
    #[serde(default = "default_ccgt_capex_per_kw")]
    pub ccgt_capex_per_kw: MoneyPerCapacity,
    /// Operation and maintenance cost of the combined-cycle gas turbine per kWh generated
    #[serde(default = "default_ccgt_opex_per_kwh")]
    pub ccgt_opex_per_kwh: MoneyPerEnergy,
    /// Fixed capacity factor at which the combined-cycle plant runs
    #[serde(default = "default_ccgt_capacity_factor")]
    pub ccgt_capacity_factor: Dimensionless,
    /// Project lifetime in years
    #[serde(default = "default_project_lifetime")]
    pub project_lifetime: u32,
    /// Hours of battery storage (at peak demand) for a pure solar system
    #[serde(default = "default_solar_battery_storage_hours")]
    pub solar_battery_storage_hours: Hours,
    /// Hours of battery storage (at peak demand) for a pure wind system
    #[serde(default = "default_wind_battery_storage_hours")]
    pub wind_battery_storage_hours: Hours,
    /// The number of worst generation days on which backup may supply unmet demand
    #[serde(default = "default_cutoff_day")]
    pub cutoff_day: usize,
    /// Minimum relative LCOE improvement for a hybrid to be preferred over a single technology
    #[serde(default = "default_hybrid_lcoe_threshold")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub hybrid_lcoe_threshold: f64,
    /// Number of evenly spaced solar fractions evaluated by the hybrid optimiser
    #[serde(default = "default_hybrid_gamma_steps")]
    pub hybrid_gamma_steps: usize,
    /// Return required on equity above the risk-free rate
    #[serde(default = "default_equity_premium")]
    pub equity_premium: Dimensionless,
    /// Return required on debt above the risk-free rate
    #[serde(default = "default_debt_premium")]
    pub debt_premium: Dimensionless,
    /// Fraction of the project financed by debt
    #[serde(default = "default_debt_ratio")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub debt_ratio: f64,
    /// Corporate tax rate
    #[serde(default = "default_tax_rate")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub tax_rate: f64,
    /// Conversion efficiency of solar panels
    #[serde(default = "default_solar_panel_efficiency")]
    pub solar_panel_efficiency: Dimensionless,
    /// Fraction of land area covered by panels
    #[serde(default = "default_solar_panel_density")]
    pub solar_panel_density: Dimensionless,
    /// Rated power of a single wind turbine in kW
    #[serde(default = "default_wind_turbine_rating")]
    pub wind_turbine_rating_kw: Capacity,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            solar_cost_per_kw: default_solar_cost_per_kw(),
            wind_cost_per_kw: default_wind_cost_per_kw(),
            battery_cost_per_kwh: default_battery_cost_per_kwh(),
            ng_price_per_mmbtu: default_ng_price_per_mmbtu(),
            ocgt_efficiency: default_ocgt_efficiency(),
            ocgt_capex_per_kw: default_ocgt_capex_per_kw(),
            ocgt_opex_per_kwh: default_ocgt_opex_per_kwh(),
            ccgt_efficiency: default_ccgt_efficiency(),
            ccgt_capex_per_kw: default_ccgt_capex_per_kw(),
            ccgt_opex_per_kwh: default_ccgt_opex_per_kwh(),
            ccgt_capacity_factor: default_ccgt_capacity_factor(),
            project_lifetime: default_project_lifetime(),
            solar_battery_storage_hours: default_solar_battery_storage_hours(),
            wind_battery_storage_hours: default_wind_battery_storage_hours(),
            cutoff_day: default_cutoff_day(),
            hybrid_lcoe_threshold: default_hybrid_lcoe_threshold(),
            hybrid_gamma_steps: default_hybrid_gamma_steps(),
            equity_premium: default_equity_premium(),
            debt_premium: default_debt_premium(),
            debt_ratio: default_debt_ratio(),
            tax_rate: default_tax_rate(),
            solar_panel_efficiency: default_solar_panel_efficiency(),
            solar_panel_density: default_solar_panel_density(),
            wind_turbine_rating_kw: default_wind_turbine_rating(),
        }
    }
}

/// Check that a cost is a finite, non-negative number
fn check_cost(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{name} must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that a value lies in (0, 1]
fn check_proportion_nonzero(name: &str, value: f64) -> Result<()> {
    ensure!(
        value > 0.0 && value <= 1.0,
        "{name} must be greater than zero and less than or equal to one"
    );

    Ok(())
}

impl AnalysisParameters {
    /// Validate parameters after reading them in
    pub fn validate(&self) -> Result<()> {
        check_cost("solar_cost_per_kw", self.solar_cost_per_kw.value())?;
        check_cost("wind_cost_per_kw", self.wind_cost_per_kw.value())?;
        check_cost("battery_cost_per_kwh", self.battery_cost_per_kwh.value())?;
        check_cost("ng_price_per_mmbtu", self.ng_price_per_mmbtu)?;
        check_cost("ocgt_capex_per_kw", self.ocgt_capex_per_kw.value())?;
        check_cost("ocgt_opex_per_kwh", self.ocgt_opex_per_kwh.value())?;
        check_cost("ccgt_capex_per_kw", self.ccgt_capex_per_kw.value())?;
        check_cost("ccgt_opex_per_kwh", self.ccgt_opex_per_kwh.value())?;
        check_cost(
            "solar_battery_storage_hours",
            self.solar_battery_storage_hours.value(),
        )?;
        check_cost(
            "wind_battery_storage_hours",
            self.wind_battery_storage_hours.value(),
        )?;

        check_proportion_nonzero("ocgt_efficiency", self.ocgt_efficiency.value())?;
        check_proportion_nonzero("ccgt_efficiency", self.ccgt_efficiency.value())?;
        check_proportion_nonzero("ccgt_capacity_factor", self.ccgt_capacity_factor.value())?;
        check_proportion_nonzero(
            "solar_panel_efficiency",
            self.solar_panel_efficiency.value(),
        )?;
        check_proportion_nonzero("solar_panel_density", self.solar_panel_density.value())?;

        ensure!(
            self.project_lifetime > 0,
            "project_lifetime must be greater than zero"
        );
        ensure!(
            self.hybrid_gamma_steps >= 2,
            "hybrid_gamma_steps must be at least 2 so that pure solar and pure wind are included"
        );
        ensure!(
            self.equity_premium.is_finite() && self.debt_premium.is_finite(),
            "equity_premium and debt_premium must be finite numbers"
        );
        ensure!(
            self.wind_turbine_rating_kw.is_finite()
                && self.wind_turbine_rating_kw > Capacity(0.0),
            "wind_turbine_rating_kw must be a finite number greater than zero"
        );

        Ok(())
    }

    /// The financing assumptions used to calculate the WACC
    pub fn financing_mix(&self) -> FinancingMix {
        FinancingMix {
            equity_premium: self.equity_premium,
            debt_premium: self.debt_premium,
            debt_ratio: Dimensionless(self.debt_ratio),
            tax_rate: Dimensionless(self.tax_rate),
        }
    }

    /// Price of natural gas per kWh of fuel energy
    pub fn ng_price_per_kwh(&self) -> MoneyPerEnergy {
        fuel_price_per_kwh(self.ng_price_per_mmbtu)
    }

    /// Running costs of the open-cycle gas turbine which backs up renewable systems
    pub fn backup_costs(&self) -> BackupCosts {
        BackupCosts {
            fuel_price: self.ng_price_per_kwh(),
            efficiency: self.ocgt_efficiency,
            opex: self.ocgt_opex_per_kwh,
        }
    }

    /// Capital cost per kW for the given technology
    pub fn cost_per_kw(&self, technology: Technology) -> MoneyPerCapacity {
        match technology {
            Technology::Solar => self.solar_cost_per_kw,
            Technology::Wind => self.wind_cost_per_kw,
        }
    }

    /// Hours of battery storage for a system built purely from the given technology
    pub fn battery_storage_hours(&self, technology: Technology) -> Hours {
        match technology {
            Technology::Solar => self.solar_battery_storage_hours,
            Technology::Wind => self.wind_battery_storage_hours,
        }
    }
}
