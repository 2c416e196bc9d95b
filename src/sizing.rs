//! Code for sizing renewable systems against a fixed daily demand.
//!
//! Renewable capacity is sized so that on the `cutoff_day`-th worst day of the year (counting from
//! zero) generation exactly meets demand. Worse days are topped up by a gas backup generator and
//! any surplus on better days is curtailed.
//!
//! All sizing goes through [`size_mix`], which sizes a blend of technologies. Sizing a single
//! technology is the special case of a blend with one component.
use crate::finance::lcoe;
use crate::parameters::AnalysisParameters;
use crate::profile::{GenerationSeries, rank_days};
use crate::technology::Technology;
use crate::units::{
    Capacity, Dimensionless, Energy, EnergyPerCapacity, Hours, Money, MoneyPerCapacity,
    MoneyPerEnergy, HOURS_PER_DAY,
};
use anyhow::{Result, ensure};
use itertools::Itertools;
use log::warn;
use std::error::Error;
use std::fmt;

/// Relative tolerance for the check that consumed plus backup energy equals annual demand
const ENERGY_BALANCE_TOLERANCE: f64 = 1e-6;

/// Label for the battery component of the capital cost breakdown
pub const BATTERY_CAPEX_LABEL: &str = "Battery Storage";

/// Label for the gas backup component of the capital cost breakdown
pub const GAS_CAPEX_LABEL: &str = "Gas";

/// A load with constant daily energy demand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Demand {
    /// Peak power demand
    pub peak: Capacity,
    /// Energy demanded every day
    pub daily: Energy,
}

impl Demand {
    /// Create a new [`Demand`], checking that both values are positive
    pub fn new(peak: Capacity, daily: Energy) -> Result<Self> {
        ensure!(
            peak.is_finite() && peak > Capacity(0.0),
            "Peak demand must be a finite number greater than zero"
        );
        ensure!(
            daily.is_finite() && daily > Energy(0.0),
            "Daily demand must be a finite number greater than zero"
        );

        Ok(Self { peak, daily })
    }

    /// A load which draws its peak demand continuously
    pub fn from_peak(peak: Capacity) -> Result<Self> {
        Self::new(peak, peak * HOURS_PER_DAY)
    }

    /// Total demand over the given number of days
    pub fn over_days(&self, days: usize) -> Energy {
        self.daily * Dimensionless(days as f64)
    }
}

/// One technology's contribution to a blend
#[derive(Debug, Clone, Copy)]
pub struct MixComponent<'a> {
    /// The technology
    pub technology: Technology,
    /// The fraction of the required capacity provided by this technology
    pub share: Dimensionless,
    /// Generation per kW installed for this technology
    pub series: &'a GenerationSeries,
}

/// An error indicating that no amount of renewable capacity can meet demand
#[derive(Debug, Clone, PartialEq)]
pub enum SizingError {
    /// Generation on the cutoff day is zero, so the required capacity is unbounded
    Infeasible {
        /// The technologies making up the system
        technologies: Vec<Technology>,
        /// The cutoff day used for sizing
        cutoff_day: usize,
    },
}

impl fmt::Display for SizingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infeasible {
                technologies,
                cutoff_day,
            } => write!(
                f,
                "Infeasible system: {} generation is zero on the day ranked {cutoff_day}, so no \
                amount of capacity can meet demand",
                technologies.iter().join(" + ")
            ),
        }
    }
}

impl Error for SizingError {}

/// The sizing of one technology within a system
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSizing {
    /// The technology
    pub technology: Technology,
    /// Fraction of the required capacity provided by this technology
    pub share: Dimensionless,
    /// Installed capacity
    pub capacity: Capacity,
    /// Capital cost per kW installed
    pub unit_cost: MoneyPerCapacity,
    /// Energy generated over the year
    pub generated: Energy,
    /// Energy delivered to the load over the year
    pub consumed: Energy,
    /// Energy generated in excess of demand and thrown away
    pub curtailed: Energy,
}

impl ComponentSizing {
    /// Fraction of generated energy which is curtailed (zero if nothing is generated)
    pub fn curtailment_fraction(&self) -> Dimensionless {
        if self.generated > Energy(0.0) {
            self.curtailed / self.generated
        } else {
            Dimensionless(0.0)
        }
    }

    /// Energy consumed as a fraction of what the installed capacity could produce running flat
    /// out over the given number of days (zero if nothing is installed)
    pub fn capacity_factor(&self, days: usize) -> Dimensionless {
        if self.capacity > Capacity(0.0) {
            let hours = HOURS_PER_DAY * Dimensionless(days as f64);
            self.consumed / (self.capacity * hours)
        } else {
            Dimensionless(0.0)
        }
    }
}

/// The energy flows of a system on one day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyDispatch {
    /// Day of the year (zero-based, chronological)
    pub day: usize,
    /// Position of this day when days are ordered by output, worst first
    pub rank: usize,
    /// Energy generated by each component, in the same order as [`SizingResult::components`]
    pub output: Vec<Energy>,
    /// Renewable energy delivered to the load
    pub consumed: Energy,
    /// Renewable energy thrown away
    pub curtailed: Energy,
    /// Energy supplied by the backup generator
    pub backup: Energy,
}

/// Capital costs of a system, broken down by component
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapexBreakdown(Vec<(&'static str, Money)>);

impl CapexBreakdown {
    /// Add a component to the breakdown
    pub fn push(&mut self, label: &'static str, cost: Money) {
        self.0.push((label, cost));
    }

    /// Iterate over components and their costs
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Money)> + '_ {
        self.0.iter().copied()
    }

    /// The cost of the component with the given label, if present
    pub fn get(&self, label: &str) -> Option<Money> {
        self.iter().find(|(l, _)| *l == label).map(|(_, cost)| cost)
    }

    /// Total capital cost
    pub fn total(&self) -> Money {
        self.iter().map(|(_, cost)| cost).sum()
    }
}

/// The result of sizing a system against a demand
#[derive(Debug, Clone, PartialEq)]
pub struct SizingResult {
    /// Sizing of each renewable technology
    pub components: Vec<ComponentSizing>,
    /// Total renewable capacity
    pub required_capacity: Capacity,
    /// Capacity of the gas backup generator (always peak demand; it has no capital cost if no
    /// backup days are allowed)
    pub backup_capacity: Capacity,
    /// Hours of storage at peak demand
    pub battery_hours: Hours,
    /// Battery energy capacity
    pub battery_capacity: Energy,
    /// Energy supplied by the backup generator over the year
    pub backup_energy: Energy,
    /// Total demand over the year
    pub annual_demand: Energy,
    /// Capital costs
    pub capex: CapexBreakdown,
    /// Levelised cost of energy delivered to the load
    pub lcoe: MoneyPerEnergy,
    /// Energy flows for every day, in chronological order
    pub daily: Vec<DailyDispatch>,
}

impl SizingResult {
    /// The number of days sized over
    pub fn days(&self) -> usize {
        self.daily.len()
    }

    /// The sizing for the given technology, if it is part of this system
    pub fn component(&self, technology: Technology) -> Option<&ComponentSizing> {
        self.components
            .iter()
            .find(|component| component.technology == technology)
    }

    /// Renewable energy delivered to the load over the year
    pub fn consumed_energy(&self) -> Energy {
        self.components.iter().map(|c| c.consumed).sum()
    }

    /// Renewable energy generated over the year
    pub fn generated_energy(&self) -> Energy {
        self.components.iter().map(|c| c.generated).sum()
    }

    /// Renewable energy curtailed over the year
    pub fn curtailed_energy(&self) -> Energy {
        self.components.iter().map(|c| c.curtailed).sum()
    }

    /// Energy delivered to the load from all sources
    pub fn energy_served(&self) -> Energy {
        self.consumed_energy() + self.backup_energy
    }

    /// Fraction of energy served by the backup generator
    pub fn backup_fraction(&self) -> Dimensionless {
        self.backup_energy / self.energy_served()
    }

    /// Fraction of generated renewable energy which is curtailed across all technologies
    pub fn curtailment_fraction(&self) -> Dimensionless {
        let generated = self.generated_energy();
        if generated > Energy(0.0) {
            self.curtailed_energy() / generated
        } else {
            Dimensionless(0.0)
        }
    }
}

/// Land area needed for solar panels of the given capacity, in km²
pub fn solar_area_km2(capacity: Capacity, parameters: &AnalysisParameters) -> f64 {
    // Panels are rated at 1 kW/m² irradiance
    let area_m2 = capacity.value()
        / (parameters.solar_panel_efficiency * parameters.solar_panel_density).value();
    area_m2 / 1e6
}

/// The number of wind turbines needed to provide at least the given capacity
pub fn turbine_count(capacity: Capacity, parameters: &AnalysisParameters) -> f64 {
    (capacity / parameters.wind_turbine_rating_kw).value().ceil()
}

/// Size a system consisting of a single renewable technology backed up by gas
pub fn size_single_technology(
    series: &GenerationSeries,
    demand: &Demand,
    parameters: &AnalysisParameters,
    wacc: Dimensionless,
) -> Result<SizingResult> {
    let component = MixComponent {
        technology: series.technology(),
        share: Dimensionless(1.0),
        series,
    };

    size_mix(&[component], demand, parameters, wacc)
}

/// Size a blend of renewable technologies backed up by gas and battery storage.
///
/// Each component provides a fixed share of the total renewable capacity. Days are ranked by
/// combined output per kW. The worst `cutoff_day` days use all renewable output and are topped up
/// by the backup generator. On all other days, output in excess of demand is curtailed, with each
/// technology curtailed in proportion to its share of that day's output.
///
/// # Arguments
///
/// * `components` - The technologies in the blend, with their shares and generation series
/// * `demand` - The load to be served
/// * `parameters` - Cost and technical assumptions
/// * `wacc` - Discount rate used for capital recovery
pub fn size_mix(
    components: &[MixComponent],
    demand: &Demand,
    parameters: &AnalysisParameters,
    wacc: Dimensionless,
) -> Result<SizingResult> {
    ensure!(!components.is_empty(), "A system needs at least one technology");
    let days = components[0].series.len();
    for component in components {
        ensure!(
            component.series.len() == days,
            "Generation series must cover the same days ({} has {} days, {} has {days})",
            component.technology,
            component.series.len(),
            components[0].technology
        );
        ensure!(
            component.share.is_finite() && component.share >= Dimensionless(0.0),
            "Invalid share {} for {}",
            component.share.value(),
            component.technology
        );
    }

    let cutoff_day = parameters.cutoff_day;
    ensure!(
        cutoff_day < days,
        "Cutoff day {cutoff_day} is out of range: generation series have {days} days"
    );

    // Combined output per kW of total capacity
    let combined = (0..days)
        .map(|day| {
            components
                .iter()
                .map(|c| c.series.values()[day] * c.share)
                .fold(EnergyPerCapacity(0.0), |acc, value| acc + value)
        })
        .collect_vec();
    let ranking = rank_days(&combined);
    let cutoff_output = combined[ranking[cutoff_day]];
    if cutoff_output <= EnergyPerCapacity(0.0) {
        Err(SizingError::Infeasible {
            technologies: components.iter().map(|c| c.technology).collect(),
            cutoff_day,
        })?;
    }

    let required_capacity = demand.daily / cutoff_output;
    let capacities = components
        .iter()
        .map(|c| required_capacity * c.share)
        .collect_vec();

    let mut rank_of_day = vec![0; days];
    for (rank, &day) in ranking.iter().enumerate() {
        rank_of_day[day] = rank;
    }

    let mut generated = vec![Energy(0.0); components.len()];
    let mut consumed = vec![Energy(0.0); components.len()];
    let mut curtailed = vec![Energy(0.0); components.len()];
    let mut backup_energy = Energy(0.0);
    let mut daily = Vec::with_capacity(days);
    for (day, rank) in rank_of_day.into_iter().enumerate() {
        let output = components
            .iter()
            .zip(&capacities)
            .map(|(c, &capacity)| c.series.values()[day] * capacity)
            .collect_vec();
        let total: Energy = output.iter().copied().sum();

        let (day_consumed, day_backup) = if rank < cutoff_day {
            // Backup day: everything generated is used
            let shortfall = (demand.daily - total).max(Energy(0.0));
            (output.clone(), shortfall)
        } else if total > demand.daily {
            let fraction_used = demand.daily / total;
            (
                output.iter().map(|&out| out * fraction_used).collect_vec(),
                Energy(0.0),
            )
        } else {
            (output.clone(), Energy(0.0))
        };

        for (i, (&out, &used)) in output.iter().zip(&day_consumed).enumerate() {
            generated[i] += out;
            consumed[i] += used;
            curtailed[i] += out - used;
        }
        backup_energy += day_backup;

        let day_consumed: Energy = day_consumed.into_iter().sum();
        daily.push(DailyDispatch {
            day,
            rank,
            output,
            consumed: day_consumed,
            curtailed: total - day_consumed,
            backup: day_backup,
        });
    }

    let components = components
        .iter()
        .enumerate()
        .map(|(i, c)| ComponentSizing {
            technology: c.technology,
            share: c.share,
            capacity: capacities[i],
            unit_cost: parameters.cost_per_kw(c.technology),
            generated: generated[i],
            consumed: consumed[i],
            curtailed: curtailed[i],
        })
        .collect_vec();

    let annual_demand = demand.over_days(days);
    let consumed_energy: Energy = components.iter().map(|c| c.consumed).sum();
    check_energy_balance(consumed_energy, backup_energy, annual_demand);

    // Backup is rated at peak demand, but is only paid for if it can run on some days
    let backup_capacity = demand.peak;
    let backup_capex = if cutoff_day == 0 {
        Money(0.0)
    } else {
        parameters.ocgt_capex_per_kw * backup_capacity
    };
    let battery_hours = components
        .iter()
        .map(|c| parameters.battery_storage_hours(c.technology) * c.share)
        .fold(Hours(0.0), |acc, hours| acc + hours);
    let battery_capacity = demand.peak * battery_hours;

    let mut capex = CapexBreakdown::default();
    for component in &components {
        capex.push(
            component.technology.capex_label(),
            component.unit_cost * component.capacity,
        );
    }
    capex.push(
        BATTERY_CAPEX_LABEL,
        parameters.battery_cost_per_kwh * battery_capacity,
    );
    capex.push(GAS_CAPEX_LABEL, backup_capex);

    let lcoe = lcoe(
        capex.total(),
        consumed_energy + backup_energy,
        backup_energy,
        &parameters.backup_costs(),
        wacc,
        parameters.project_lifetime,
    )?;

    Ok(SizingResult {
        components,
        required_capacity,
        backup_capacity,
        battery_hours,
        battery_capacity,
        backup_energy,
        annual_demand,
        capex,
        lcoe,
        daily,
    })
}

/// Warn if renewable and backup energy together do not add up to the annual demand.
///
/// Returns whether the energy balance holds.
fn check_energy_balance(consumed: Energy, backup: Energy, annual_demand: Energy) -> bool {
    let served = consumed + backup;
    let error = ((served - annual_demand) / annual_demand).value().abs();
    let balanced = error <= ENERGY_BALANCE_TOLERANCE;
    if !balanced {
        warn!(
            "Energy balance check failed: renewable ({:.0} kWh) plus backup ({:.0} kWh) energy \
            differs from annual demand ({:.0} kWh) by {:.2e}",
            consumed.value(),
            backup.value(),
            annual_demand.value(),
            error
        );
    }

    balanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, demand, flat_series, parameters, varied_series};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn params_with_cutoff(cutoff_day: usize) -> AnalysisParameters {
        AnalysisParameters {
            cutoff_day,
            ..parameters()
        }
    }

    #[test]
    fn test_demand_new() {
        let demand = Demand::from_peak(Capacity(1000.0)).unwrap();
        assert_eq!(demand.daily, Energy(24000.0));
        assert_eq!(demand.over_days(365), Energy(8_760_000.0));
        assert!(Demand::new(Capacity(0.0), Energy(1.0)).is_err());
        assert!(Demand::new(Capacity(1.0), Energy(f64::NAN)).is_err());
    }

    #[test]
    fn test_size_flat_series() {
        // 1 kWh per kW every day, so required capacity equals daily demand
        let series = flat_series(Technology::Solar, 1.0, 365);
        let daily = Energy(1_000_000.0);
        let demand = Demand::new(daily / HOURS_PER_DAY, daily).unwrap();
        let result = size_single_technology(
            &series,
            &demand,
            &params_with_cutoff(0),
            Dimensionless(0.05),
        )
        .unwrap();

        assert_eq!(result.required_capacity, Capacity(1_000_000.0));
        assert_eq!(result.backup_energy, Energy(0.0));
        assert_eq!(result.backup_capacity, demand.peak);
        assert_eq!(result.capex.get(GAS_CAPEX_LABEL), Some(Money(0.0)));
        let solar = result.component(Technology::Solar).unwrap();
        assert_eq!(solar.curtailed, Energy(0.0));
        assert_eq!(solar.curtailment_fraction(), Dimensionless(0.0));
        assert_approx_eq!(
            Dimensionless,
            solar.capacity_factor(365),
            Dimensionless(1.0 / 24.0)
        );
        assert_approx_eq!(Energy, result.energy_served(), Energy(365_000_000.0));
    }

    #[test]
    fn test_size_full_output_capacity_factor() {
        // Running at full capacity all day gives a capacity factor of one
        let series = flat_series(Technology::Wind, 24.0, 365);
        let demand = Demand::from_peak(Capacity(1000.0)).unwrap();
        let result =
            size_single_technology(&series, &demand, &params_with_cutoff(0), Dimensionless(0.05))
                .unwrap();

        assert_eq!(result.required_capacity, Capacity(1000.0));
        let wind = result.component(Technology::Wind).unwrap();
        assert_approx_eq!(Dimensionless, wind.capacity_factor(365), Dimensionless(1.0));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(50)]
    #[case(364)]
    fn test_size_defining_equation(#[case] cutoff_day: usize) {
        let series = varied_series(Technology::Solar);
        let demand = demand();
        let result = size_single_technology(
            &series,
            &demand,
            &params_with_cutoff(cutoff_day),
            Dimensionless(0.05),
        )
        .unwrap();

        let cutoff_output = series.sorted()[cutoff_day];
        assert_approx_eq!(
            Energy,
            cutoff_output * result.required_capacity,
            demand.daily,
            epsilon = 1e-6
        );
        assert_approx_eq!(
            Energy,
            result.consumed_energy() + result.backup_energy,
            result.annual_demand,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_size_monotonic_in_cutoff_day() {
        let series = varied_series(Technology::Wind);
        let demand = demand();
        let results = (0..365)
            .step_by(20)
            .map(|cutoff_day| {
                size_single_technology(
                    &series,
                    &demand,
                    &params_with_cutoff(cutoff_day),
                    Dimensionless(0.05),
                )
                .unwrap()
            })
            .collect_vec();

        for (lower, higher) in results.iter().tuple_windows() {
            assert!(higher.required_capacity <= lower.required_capacity);
            assert!(higher.backup_fraction() >= lower.backup_fraction());
        }
    }

    #[test]
    fn test_size_bounds() {
        let series = varied_series(Technology::Solar);
        let result =
            size_single_technology(&series, &demand(), &parameters(), Dimensionless(0.05)).unwrap();

        let solar = result.component(Technology::Solar).unwrap();
        for value in [solar.curtailment_fraction(), solar.capacity_factor(365)] {
            assert!((0.0..=1.0).contains(&value.value()));
        }
        assert!(result.backup_energy > Energy(0.0));
        assert!(result.capex.total() > Money(0.0));
        assert!(result.lcoe > MoneyPerEnergy(0.0));
        assert_eq!(result.backup_capacity, demand().peak);

        // Daily rows add up to the annual totals
        let backup: Energy = result.daily.iter().map(|d| d.backup).sum();
        assert_approx_eq!(Energy, backup, result.backup_energy, epsilon = 1e-3);
        assert_eq!(result.days(), 365);
    }

    #[test]
    fn test_size_backup_only_on_worst_days() {
        let values = [1.0, 4.0, 2.0, 8.0]
            .into_iter()
            .map(EnergyPerCapacity)
            .collect();
        let series = GenerationSeries::new(Technology::Solar, values).unwrap();
        let demand = Demand::new(Capacity(100.0), Energy(400.0)).unwrap();
        let result =
            size_single_technology(&series, &demand, &params_with_cutoff(1), Dimensionless(0.0))
                .unwrap();

        // Sized on the second worst day (2 kWh/kW)
        assert_eq!(result.required_capacity, Capacity(200.0));
        let backup = result.daily.iter().map(|d| d.backup).collect_vec();
        assert_eq!(backup, [Energy(200.0), Energy(0.0), Energy(0.0), Energy(0.0)]);
        let curtailed = result.daily.iter().map(|d| d.curtailed).collect_vec();
        assert_eq!(
            curtailed,
            [Energy(0.0), Energy(400.0), Energy(0.0), Energy(1200.0)]
        );
        assert_eq!(result.daily[3].rank, 3);
        assert_eq!(result.daily[0].rank, 0);
    }

    #[test]
    fn test_size_capex_breakdown() {
        let series = flat_series(Technology::Wind, 12.0, 365);
        let demand = Demand::from_peak(Capacity(1000.0)).unwrap();
        let parameters = params_with_cutoff(10);
        let result =
            size_single_technology(&series, &demand, &parameters, Dimensionless(0.05)).unwrap();

        assert_eq!(result.required_capacity, Capacity(2000.0));
        assert_eq!(result.battery_hours, parameters.wind_battery_storage_hours);
        let labels = result.capex.iter().map(|(label, _)| label).collect_vec();
        assert_eq!(labels, ["Wind Turbines", BATTERY_CAPEX_LABEL, GAS_CAPEX_LABEL]);
        assert_eq!(
            result.capex.get("Wind Turbines"),
            Some(parameters.wind_cost_per_kw * Capacity(2000.0))
        );
        assert_eq!(
            result.capex.get(GAS_CAPEX_LABEL),
            Some(parameters.ocgt_capex_per_kw * Capacity(1000.0))
        );
    }

    #[rstest]
    #[case(Energy(600.0), Energy(400.0), true)]
    #[case(Energy(600.0), Energy(400.000_000_1), true)]
    #[case(Energy(600.0), Energy(300.0), false)]
    #[case(Energy(1000.0), Energy(100.0), false)]
    fn test_check_energy_balance(
        #[case] consumed: Energy,
        #[case] backup: Energy,
        #[case] expected: bool,
    ) {
        assert_eq!(
            check_energy_balance(consumed, backup, Energy(1000.0)),
            expected
        );
    }

    #[test]
    fn test_size_zero_cutoff_keeps_backup_capacity() {
        let parameters = params_with_cutoff(0);
        let result = size_single_technology(
            &varied_series(Technology::Wind),
            &demand(),
            &parameters,
            Dimensionless(0.05),
        )
        .unwrap();

        // Rated at peak demand, but never paid for
        assert_eq!(result.backup_capacity, demand().peak);
        assert_eq!(result.backup_energy, Energy(0.0));
        assert_eq!(result.capex.get(GAS_CAPEX_LABEL), Some(Money(0.0)));
    }

    #[test]
    fn test_size_cutoff_out_of_range() {
        let series = flat_series(Technology::Solar, 1.0, 10);
        assert_error!(
            size_single_technology(&series, &demand(), &params_with_cutoff(10), Dimensionless(0.05)),
            "Cutoff day 10 is out of range: generation series have 10 days"
        );
    }

    #[test]
    fn test_size_infeasible() {
        let series = flat_series(Technology::Solar, 0.0, 365);
        let err = size_single_technology(&series, &demand(), &parameters(), Dimensionless(0.05))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<SizingError>(),
            Some(&SizingError::Infeasible {
                technologies: vec![Technology::Solar],
                cutoff_day: 50
            })
        );
    }

    #[test]
    fn test_size_mix_mismatched_lengths() {
        let solar = flat_series(Technology::Solar, 1.0, 365);
        let wind = flat_series(Technology::Wind, 1.0, 366);
        let components = [
            MixComponent {
                technology: Technology::Solar,
                share: Dimensionless(0.5),
                series: &solar,
            },
            MixComponent {
                technology: Technology::Wind,
                share: Dimensionless(0.5),
                series: &wind,
            },
        ];
        assert!(size_mix(&components, &demand(), &parameters(), Dimensionless(0.05)).is_err());
    }

    #[test]
    fn test_size_mix_ratable_curtailment() {
        // Solar produces three times as much as wind on the surplus day
        let solar = GenerationSeries::new(
            Technology::Solar,
            vec![EnergyPerCapacity(1.0), EnergyPerCapacity(6.0)],
        )
        .unwrap();
        let wind = GenerationSeries::new(
            Technology::Wind,
            vec![EnergyPerCapacity(1.0), EnergyPerCapacity(2.0)],
        )
        .unwrap();
        let components = [
            MixComponent {
                technology: Technology::Solar,
                share: Dimensionless(0.5),
                series: &solar,
            },
            MixComponent {
                technology: Technology::Wind,
                share: Dimensionless(0.5),
                series: &wind,
            },
        ];
        let demand = Demand::new(Capacity(10.0), Energy(100.0)).unwrap();
        let result =
            size_mix(&components, &demand, &params_with_cutoff(0), Dimensionless(0.05)).unwrap();

        assert_eq!(result.required_capacity, Capacity(100.0));
        let solar = result.component(Technology::Solar).unwrap();
        let wind = result.component(Technology::Wind).unwrap();
        assert_approx_eq!(Energy, solar.consumed, Energy(50.0 + 75.0));
        assert_approx_eq!(Energy, wind.consumed, Energy(50.0 + 25.0));
        assert_approx_eq!(Energy, solar.curtailed, Energy(225.0));
        assert_approx_eq!(Energy, wind.curtailed, Energy(75.0));
        assert_approx_eq!(
            Hours,
            result.battery_hours,
            Hours(0.5 * 24.0 + 0.5 * 12.0)
        );
    }

    #[test]
    fn test_solar_area_and_turbines() {
        let parameters = parameters();
        // 0.2 efficiency * 0.4 density = 0.08 kW/m²
        assert_approx_eq!(
            f64,
            solar_area_km2(Capacity(80_000.0), &parameters),
            1.0,
            epsilon = 1e-9
        );
        assert_eq!(turbine_count(Capacity(15_000.0), &parameters), 2.0);
        assert_eq!(turbine_count(Capacity(15_001.0), &parameters), 3.0);
        assert_eq!(turbine_count(Capacity(0.0), &parameters), 0.0);
    }
}
