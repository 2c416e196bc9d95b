//! General functions related to finance.
use crate::units::{Capacity, Dimensionless, Energy, Money, MoneyPerCapacity, MoneyPerEnergy};
use anyhow::{Result, ensure};

/// Energy content of one MMBtu of natural gas, in kWh
pub const KWH_PER_MMBTU: f64 = 293.07;

/// Assumptions about how a project is financed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancingMix {
    /// Return required on equity above the risk-free rate
    pub equity_premium: Dimensionless,
    /// Return required on debt above the risk-free rate
    pub debt_premium: Dimensionless,
    /// Fraction of the project financed by debt
    pub debt_ratio: Dimensionless,
    /// Corporate tax rate (debt interest is tax deductible)
    pub tax_rate: Dimensionless,
}

/// Calculates the weighted average cost of capital (WACC).
///
/// # Arguments
///
/// * `risk_free_rate` - The risk-free rate of return, e.g. from long-dated treasury yields
/// * `mix` - How the project is financed
///
/// # Returns
///
/// The WACC as a fraction, or an error if it is undefined (not finite or not greater than -1)
pub fn wacc(risk_free_rate: Dimensionless, mix: &FinancingMix) -> Result<Dimensionless> {
    ensure!(
        risk_free_rate.is_finite(),
        "Risk-free rate must be a finite number"
    );

    let one = Dimensionless(1.0);
    let equity_ratio = one - mix.debt_ratio;
    let equity_return = risk_free_rate + mix.equity_premium;
    let debt_return = risk_free_rate + mix.debt_premium;
    let wacc = equity_return * equity_ratio + debt_return * mix.debt_ratio * (one - mix.tax_rate);

    ensure!(
        wacc.is_finite() && wacc > Dimensionless(-1.0),
        "WACC is undefined for the given financing assumptions (got {})",
        wacc.value()
    );

    Ok(wacc)
}

/// Calculates the capital recovery factor (CRF) for a given lifetime and discount rate.
///
/// The CRF is used to annualise capital costs over the lifetime of a project. A discount rate of
/// zero gives straight-line recovery.
pub fn capital_recovery_factor(lifetime: u32, discount_rate: Dimensionless) -> Result<Dimensionless> {
    ensure!(lifetime > 0, "Project lifetime must be greater than zero");

    if discount_rate == Dimensionless(0.0) {
        return Ok(Dimensionless(1.0) / Dimensionless(lifetime as f64));
    }
    let n = i32::try_from(lifetime)?;
    let factor = (Dimensionless(1.0) + discount_rate).powi(n);
    Ok((discount_rate * factor) / (factor - Dimensionless(1.0)))
}

/// Calculates the annual cost of repaying the capital cost of a project
pub fn annual_capital_cost(capex: Money, wacc: Dimensionless, lifetime: u32) -> Result<Money> {
    Ok(capex * capital_recovery_factor(lifetime, wacc)?)
}

/// The cost of running a backup generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackupCosts {
    /// Price of fuel per kWh of fuel energy
    pub fuel_price: MoneyPerEnergy,
    /// Conversion efficiency from fuel to electricity
    pub efficiency: Dimensionless,
    /// Operation and maintenance cost per kWh generated
    pub opex: MoneyPerEnergy,
}

impl BackupCosts {
    /// The marginal cost of generating one kWh of electricity
    pub fn cost_per_kwh(&self) -> Result<MoneyPerEnergy> {
        ensure!(
            self.efficiency > Dimensionless(0.0),
            "Backup generator efficiency must be greater than zero"
        );

        Ok(self.fuel_price / self.efficiency + self.opex)
    }
}

/// Calculates the levelised cost of energy for a load-following system.
///
/// The denominator is the total energy delivered to the load (including that supplied by the
/// backup generator), not the renewable output.
///
/// # Arguments
///
/// * `capex` - Total capital cost of the system
/// * `energy_served` - Annual energy delivered to the load
/// * `backup_energy` - Annual energy supplied by the backup generator
/// * `backup` - Running costs of the backup generator
/// * `wacc` - Discount rate for capital recovery
/// * `lifetime` - Project lifetime in years
pub fn lcoe(
    capex: Money,
    energy_served: Energy,
    backup_energy: Energy,
    backup: &BackupCosts,
    wacc: Dimensionless,
    lifetime: u32,
) -> Result<MoneyPerEnergy> {
    ensure!(
        energy_served.is_finite() && energy_served > Energy(0.0),
        "Annual energy served must be greater than zero"
    );

    let annual_capital = annual_capital_cost(capex, wacc, lifetime)?;
    let annual_running = backup.cost_per_kwh()? * backup_energy;

    Ok((annual_capital + annual_running) / energy_served)
}

/// Capital cost per kW of rated capacity
pub fn capex_per_kw(total_capex: Money, rated_capacity: Capacity) -> Result<MoneyPerCapacity> {
    ensure!(
        rated_capacity.is_finite() && rated_capacity > Capacity(0.0),
        "Cannot calculate capex per kW for a rated capacity of {} kW",
        rated_capacity.value()
    );

    Ok(total_capex / rated_capacity)
}

/// Convert a gas price per MMBtu into a price per kWh of fuel energy
pub fn fuel_price_per_kwh(price_per_mmbtu: f64) -> MoneyPerEnergy {
    MoneyPerEnergy(price_per_mmbtu / KWH_PER_MMBTU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn financing_mix() -> FinancingMix {
        FinancingMix {
            equity_premium: Dimensionless(0.05),
            debt_premium: Dimensionless(0.02),
            debt_ratio: Dimensionless(0.6),
            tax_rate: Dimensionless(0.21),
        }
    }

    #[rstest]
    #[case(0.04, 0.064_44)] // 0.09*0.4 + 0.06*0.6*0.79
    #[case(0.0, 0.029_48)] // 0.05*0.4 + 0.02*0.6*0.79
    fn test_wacc(#[case] risk_free_rate: f64, #[case] expected: f64) {
        let result = wacc(Dimensionless(risk_free_rate), &financing_mix()).unwrap();
        assert_approx_eq!(Dimensionless, result, Dimensionless(expected), epsilon = 1e-12);
    }

    #[test]
    fn test_wacc_all_equity() {
        let mix = FinancingMix {
            debt_ratio: Dimensionless(0.0),
            ..financing_mix()
        };
        let result = wacc(Dimensionless(0.03), &mix).unwrap();
        assert_approx_eq!(Dimensionless, result, Dimensionless(0.08), epsilon = 1e-12);
    }

    #[test]
    fn test_wacc_undefined() {
        assert_error!(
            wacc(Dimensionless(f64::NAN), &financing_mix()),
            "Risk-free rate must be a finite number"
        );
        assert!(wacc(Dimensionless(-2.0), &financing_mix()).is_err());
    }

    #[rstest]
    #[case(10, 0.0, 0.1)] // Edge case: discount_rate==0
    #[case(10, 0.05, 0.129_504_574_965_456_7)]
    #[case(5, 0.03, 0.218_354_571_400_576_2)]
    fn test_capital_recovery_factor(
        #[case] lifetime: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result = capital_recovery_factor(lifetime, Dimensionless(discount_rate)).unwrap();
        assert_approx_eq!(f64, result.0, expected, epsilon = 1e-10);
    }

    #[test]
    fn test_capital_recovery_factor_zero_lifetime() {
        assert_error!(
            capital_recovery_factor(0, Dimensionless(0.05)),
            "Project lifetime must be greater than zero"
        );
    }

    #[rstest]
    #[case(1000.0, 10, 0.05, 129.504_574_965_456_7)]
    #[case(500.0, 5, 0.03, 109.177_285_700_287_98)]
    #[case(2000.0, 20, 0.0, 100.0)] // Zero discount rate
    fn test_annual_capital_cost(
        #[case] capex: f64,
        #[case] lifetime: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result = annual_capital_cost(Money(capex), Dimensionless(discount_rate), lifetime);
        assert_approx_eq!(Money, result.unwrap(), Money(expected), epsilon = 1e-8);
    }

    #[test]
    fn test_lcoe() {
        let backup = BackupCosts {
            fuel_price: MoneyPerEnergy(0.04),
            efficiency: Dimensionless(0.4),
            opex: MoneyPerEnergy(0.02),
        };

        // Capital: 2000/20 = 100; running: 100 * (0.1 + 0.02) = 12
        let result = lcoe(
            Money(2000.0),
            Energy(1000.0),
            Energy(100.0),
            &backup,
            Dimensionless(0.0),
            20,
        )
        .unwrap();
        assert_approx_eq!(MoneyPerEnergy, result, MoneyPerEnergy(0.112), epsilon = 1e-12);
    }

    #[test]
    fn test_lcoe_is_positive() {
        let backup = BackupCosts {
            fuel_price: MoneyPerEnergy(0.0),
            efficiency: Dimensionless(1.0),
            opex: MoneyPerEnergy(0.0),
        };
        let result = lcoe(
            Money(1.0),
            Energy(1e9),
            Energy(0.0),
            &backup,
            Dimensionless(0.07),
            20,
        )
        .unwrap();
        assert!(result > MoneyPerEnergy(0.0));
    }

    #[test]
    fn test_lcoe_no_energy_served() {
        let backup = BackupCosts {
            fuel_price: MoneyPerEnergy(0.04),
            efficiency: Dimensionless(0.4),
            opex: MoneyPerEnergy(0.02),
        };
        assert_error!(
            lcoe(
                Money(2000.0),
                Energy(0.0),
                Energy(0.0),
                &backup,
                Dimensionless(0.05),
                20
            ),
            "Annual energy served must be greater than zero"
        );
    }

    #[test]
    fn test_backup_cost_zero_efficiency() {
        let backup = BackupCosts {
            fuel_price: MoneyPerEnergy(0.04),
            efficiency: Dimensionless(0.0),
            opex: MoneyPerEnergy(0.02),
        };
        assert!(backup.cost_per_kwh().is_err());
    }

    #[test]
    fn test_capex_per_kw() {
        assert_eq!(
            capex_per_kw(Money(1000.0), Capacity(4.0)).unwrap(),
            MoneyPerCapacity(250.0)
        );
        assert_error!(
            capex_per_kw(Money(1000.0), Capacity(0.0)),
            "Cannot calculate capex per kW for a rated capacity of 0 kW"
        );
    }

    #[test]
    fn test_fuel_price_per_kwh() {
        assert_approx_eq!(
            MoneyPerEnergy,
            fuel_price_per_kwh(293.07),
            MoneyPerEnergy(1.0)
        );
    }
}
