//! Code for optimising the blend of solar and wind in a hybrid system.
//!
//! A range of blend fractions (gamma) is swept, from pure wind (gamma = 0) to pure solar
//! (gamma = 1). Each blend is sized with [`size_mix`] and the cheapest is chosen, unless it does
//! not improve on the best single technology by enough to justify the extra complexity.
use crate::parameters::AnalysisParameters;
use crate::profile::GenerationSeries;
use crate::sizing::{Demand, MixComponent, SizingResult, size_mix};
use crate::technology::{SystemType, Technology};
use crate::units::{Dimensionless, MoneyPerEnergy};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::{debug, info};

/// Evenly spaced blend fractions from 0 to 1 inclusive.
///
/// The endpoints are exactly 0.0 and 1.0.
pub fn gamma_grid(steps: usize) -> Result<Vec<Dimensionless>> {
    ensure!(
        steps >= 2,
        "At least two blend fractions are needed to include pure solar and pure wind"
    );

    let last = (steps - 1) as f64;
    Ok((0..steps)
        .map(|i| Dimensionless(i as f64 / last))
        .collect())
}

/// The components of a blend with the given fraction of solar
pub fn hybrid_components<'a>(
    gamma: Dimensionless,
    solar: &'a GenerationSeries,
    wind: &'a GenerationSeries,
) -> [MixComponent<'a>; 2] {
    [
        MixComponent {
            technology: Technology::Solar,
            share: gamma,
            series: solar,
        },
        MixComponent {
            technology: Technology::Wind,
            share: Dimensionless(1.0) - gamma,
            series: wind,
        },
    ]
}

/// A single blend in a hybrid sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    /// Fraction of capacity provided by solar
    pub gamma: Dimensionless,
    /// The sized system
    pub result: SizingResult,
}

/// The outcome of a sweep over solar/wind blends
#[derive(Debug, Clone, PartialEq)]
pub struct HybridSweepResult {
    /// Every blend sized, in order of increasing gamma
    pub points: Vec<SweepPoint>,
    /// Index into `points` of the selected blend
    pub selected: usize,
    /// The kind of system selected
    pub system_type: SystemType,
    /// Relative LCOE reduction of the cheapest blend over the best single technology
    pub lcoe_improvement: Dimensionless,
}

impl HybridSweepResult {
    /// The selected blend
    pub fn best(&self) -> &SweepPoint {
        &self.points[self.selected]
    }

    /// The pure wind blend (gamma = 0)
    pub fn wind_only(&self) -> &SweepPoint {
        &self.points[0]
    }

    /// The pure solar blend (gamma = 1)
    pub fn solar_only(&self) -> &SweepPoint {
        &self.points[self.points.len() - 1]
    }
}

/// Size every blend of solar and wind and select the best system.
///
/// The cheapest blend is selected if its LCOE is lower than that of the best single technology by
/// at least `hybrid_lcoe_threshold` (as a fraction). Otherwise the cheaper single technology is
/// selected, preferring solar if the two are equal.
pub fn sweep_hybrid(
    solar: &GenerationSeries,
    wind: &GenerationSeries,
    demand: &Demand,
    parameters: &AnalysisParameters,
    wacc: Dimensionless,
) -> Result<HybridSweepResult> {
    ensure!(
        solar.technology() == Technology::Solar && wind.technology() == Technology::Wind,
        "Hybrid sweep needs a solar and a wind generation series"
    );

    let points = gamma_grid(parameters.hybrid_gamma_steps)?
        .into_iter()
        .map(|gamma| {
            let components = hybrid_components(gamma, solar, wind);
            let result = size_mix(&components, demand, parameters, wacc)
                .with_context(|| {
                    format!("Failed to size hybrid system with gamma = {}", gamma.value())
                })?;
            debug!(
                "Hybrid gamma = {:.3}: LCOE = {:.4} $/kWh",
                gamma.value(),
                result.lcoe.value()
            );
            Ok(SweepPoint { gamma, result })
        })
        .collect::<Result<Vec<_>>>()?;

    let (selected, system_type, lcoe_improvement) =
        select_system(&points.iter().map(|p| p.result.lcoe).collect_vec(), parameters);
    info!(
        "Selected {system_type} (gamma = {:.3}, improvement of best blend over best single \
        technology = {:.2}%)",
        points[selected].gamma.value(),
        lcoe_improvement.value() * 100.0
    );

    Ok(HybridSweepResult {
        points,
        selected,
        system_type,
        lcoe_improvement,
    })
}

/// Apply the selection rule to the LCOEs of a sweep ordered from pure wind to pure solar.
///
/// Returns the index of the selected point, the system type and the relative improvement of the
/// cheapest blend over the best single technology.
fn select_system(
    lcoes: &[MoneyPerEnergy],
    parameters: &AnalysisParameters,
) -> (usize, SystemType, Dimensionless) {
    let wind_idx = 0;
    let solar_idx = lcoes.len() - 1;

    // On exact ties, the first (lowest gamma) minimum wins
    let best_idx = lcoes
        .iter()
        .position_min_by(|a, b| a.total_cmp(b))
        .unwrap_or(wind_idx);

    let best_single = lcoes[solar_idx].min(lcoes[wind_idx]);
    let improvement = if best_single > MoneyPerEnergy(0.0) {
        (best_single - lcoes[best_idx]) / best_single
    } else {
        Dimensionless(0.0)
    };

    if best_single > MoneyPerEnergy(0.0)
        && improvement >= Dimensionless(parameters.hybrid_lcoe_threshold)
    {
        (best_idx, SystemType::Hybrid, improvement)
    } else if lcoes[solar_idx] <= lcoes[wind_idx] {
        (solar_idx, SystemType::SolarGas, improvement)
    } else {
        (wind_idx, SystemType::WindGas, improvement)
    }
}
