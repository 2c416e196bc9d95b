//! This module defines various unit types and their conversions.
//!
//! Energy is measured in kWh, capacity (power) in kW and money in whatever currency the cost
//! assumptions are given in.
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{AddAssign, Div, Mul, Neg, SubAssign};

macro_rules! unit_struct {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Create a new instance of the unit type from an f64 value
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Returns the value of the unit type as an f64
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// The larger of two quantities
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            /// The smaller of two quantities
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// Total ordering over the underlying value (see [`f64::total_cmp`])
            pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl From<f64> for $name {
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl ApproxEq for $name {
            type Margin = F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

macro_rules! impl_dimensionless_ops {
    ($name:ident) => {
        impl Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl Div for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ident) => {
        impl Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                $Out(self.0 * rhs.0)
            }
        }
        impl Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                $Out(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ident) => {
        impl Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                $Out(self.0 / rhs.0)
            }
        }
    };
}

unit_struct!(
    /// A dimensionless quantity (fractions, ratios, rates)
    Dimensionless
);

impl Dimensionless {
    /// Raise to an integer power
    pub fn powi(self, n: i32) -> Self {
        Self(self.0.powi(n))
    }
}

impl Mul for Dimensionless {
    type Output = Dimensionless;
    fn mul(self, rhs: Dimensionless) -> Dimensionless {
        Dimensionless(self.0 * rhs.0)
    }
}

impl Div for Dimensionless {
    type Output = Dimensionless;
    fn div(self, rhs: Dimensionless) -> Dimensionless {
        Dimensionless(self.0 / rhs.0)
    }
}

// Base quantities
unit_struct!(
    /// An amount of money
    Money
);
unit_struct!(
    /// Energy in kWh
    Energy
);
unit_struct!(
    /// Power or installed (nameplate) capacity in kW
    Capacity
);
unit_struct!(
    /// A duration in hours
    Hours
);

// Derived quantities
unit_struct!(
    /// Energy generated per unit of installed capacity (kWh per kW)
    EnergyPerCapacity
);
unit_struct!(
    /// Cost per unit of installed capacity ($/kW)
    MoneyPerCapacity
);
unit_struct!(
    /// Cost per unit of energy ($/kWh)
    MoneyPerEnergy
);

impl_dimensionless_ops!(Money);
impl_dimensionless_ops!(Energy);
impl_dimensionless_ops!(Capacity);
impl_dimensionless_ops!(Hours);
impl_dimensionless_ops!(EnergyPerCapacity);
impl_dimensionless_ops!(MoneyPerCapacity);
impl_dimensionless_ops!(MoneyPerEnergy);

// Multiplication rules
impl_mul!(Capacity, Hours, Energy);
impl_mul!(EnergyPerCapacity, Capacity, Energy);
impl_mul!(MoneyPerCapacity, Capacity, Money);
impl_mul!(MoneyPerEnergy, Energy, Money);

// Division rules
impl_div!(Energy, Capacity, EnergyPerCapacity);
impl_div!(Energy, EnergyPerCapacity, Capacity);
impl_div!(Energy, Hours, Capacity);
impl_div!(Money, Capacity, MoneyPerCapacity);
impl_div!(Money, Energy, MoneyPerEnergy);

/// Hours in a day
pub const HOURS_PER_DAY: Hours = Hours(24.0);
