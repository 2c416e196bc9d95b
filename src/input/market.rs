//! Code for obtaining financial market data.
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};

/// A source of financial market data
pub trait MarketData {
    /// The current risk-free rate of return (e.g. the yield on long-dated treasury bonds)
    fn risk_free_rate(&self) -> Result<Dimensionless>;
}

/// Market data given explicitly in the scenario file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioMarketData {
    /// The risk-free rate, if one was provided
    pub risk_free_rate: Option<f64>,
}

impl MarketData for ScenarioMarketData {
    fn risk_free_rate(&self) -> Result<Dimensionless> {
        let rate = self
            .risk_free_rate
            .context("No risk-free rate provided. Set `risk_free_rate` in the scenario file")?;
        ensure!(
            rate.is_finite(),
            "Risk-free rate must be a finite number (got {rate})"
        );

        Ok(Dimensionless(rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;

    #[test]
    fn test_scenario_market_data() {
        let data = ScenarioMarketData {
            risk_free_rate: Some(0.045),
        };
        assert_eq!(data.risk_free_rate().unwrap(), Dimensionless(0.045));
    }

    #[test]
    fn test_scenario_market_data_missing() {
        let data = ScenarioMarketData {
            risk_free_rate: None,
        };
        assert_error!(
            data.risk_free_rate(),
            "No risk-free rate provided. Set `risk_free_rate` in the scenario file"
        );
    }
}
