//! Code for costing a dedicated combined-cycle gas turbine (CCGT) plant.
//!
//! The plant runs at a fixed capacity factor, so no sizing against weather data is needed.
use crate::finance::annual_capital_cost;
use crate::parameters::AnalysisParameters;
use crate::sizing::Demand;
use crate::units::{Capacity, Dimensionless, Energy, Money, MoneyPerEnergy};
use anyhow::{Result, ensure};

/// The result of costing a CCGT plant
#[derive(Debug, Clone, PartialEq)]
pub struct CcgtResult {
    /// Installed capacity
    pub capacity: Capacity,
    /// Total capital cost
    pub capex: Money,
    /// Energy delivered over the year
    pub annual_energy: Energy,
    /// Annual repayment of the capital cost
    pub capital_cost: Money,
    /// Annual fuel cost
    pub fuel_cost: Money,
    /// Annual operation and maintenance cost
    pub om_cost: Money,
    /// Levelised cost of energy
    pub lcoe: MoneyPerEnergy,
}

impl CcgtResult {
    /// Annual costs broken down by category
    pub fn cost_breakdown(&self) -> [(&'static str, Money); 3] {
        [
            ("Capital Cost", self.capital_cost),
            ("Fuel Cost", self.fuel_cost),
            ("O&M Cost", self.om_cost),
        ]
    }

    /// Total annual cost
    pub fn annual_cost(&self) -> Money {
        self.capital_cost + self.fuel_cost + self.om_cost
    }
}

/// Calculate the cost of serving the demand with a CCGT plant.
///
/// The plant is sized so that running at its capacity factor it can meet peak demand.
///
/// # Arguments
///
/// * `demand` - The load to be served
/// * `days` - The number of days in the reference year
/// * `parameters` - Cost and technical assumptions
/// * `wacc` - Discount rate used for capital recovery
pub fn cost_ccgt(
    demand: &Demand,
    days: usize,
    parameters: &AnalysisParameters,
    wacc: Dimensionless,
) -> Result<CcgtResult> {
    ensure!(days > 0, "Cannot cost a CCGT plant over zero days");
    let capacity_factor = parameters.ccgt_capacity_factor;
    ensure!(
        capacity_factor > Dimensionless(0.0) && capacity_factor <= Dimensionless(1.0),
        "CCGT capacity factor must be greater than zero and no more than one"
    );
    ensure!(
        parameters.ccgt_efficiency > Dimensionless(0.0),
        "CCGT efficiency must be greater than zero"
    );

    let capacity = demand.peak / capacity_factor;
    let capex = parameters.ccgt_capex_per_kw * capacity;
    let annual_energy = demand.over_days(days);

    let capital_cost = annual_capital_cost(capex, wacc, parameters.project_lifetime)?;
    let fuel_cost = parameters.ng_price_per_kwh() / parameters.ccgt_efficiency * annual_energy;
    let om_cost = parameters.ccgt_opex_per_kwh * annual_energy;
    let lcoe = (capital_cost + fuel_cost + om_cost) / annual_energy;

    Ok(CcgtResult {
        capacity,
        capex,
        annual_energy,
        capital_cost,
        fuel_cost,
        om_cost,
        lcoe,
    })
}
