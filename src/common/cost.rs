use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal weight carried by an arc.
pub type Weight = u32;

/// Accumulated distance written during edge relaxation.
///
/// `Unreachable` orders after every finite value, so it can seed a search
/// and sit at the back of an open list without any sentinel arithmetic.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Cost {
    Finite(u64),
    #[default]
    Unreachable,
}

impl Cost {
    pub const ZERO: Cost = Cost::Finite(0);

    pub fn is_reachable(&self) -> bool {
        matches!(self, Cost::Finite(_))
    }

    pub fn finite(&self) -> Option<u64> {
        match self {
            Cost::Finite(value) => Some(*value),
            Cost::Unreachable => None,
        }
    }

    /// Adds `amount`, turning overflow into `Unreachable`.
    pub fn plus(self, amount: u64) -> Cost {
        match self {
            Cost::Finite(value) => value
                .checked_add(amount)
                .map_or(Cost::Unreachable, Cost::Finite),
            Cost::Unreachable => Cost::Unreachable,
        }
    }

    pub fn combine(self, other: Cost) -> Cost {
        match other {
            Cost::Finite(amount) => self.plus(amount),
            Cost::Unreachable => Cost::Unreachable,
        }
    }

    /// Scales a finite cost by `factor`, rounding down.
    pub fn discounted(self, factor: f64) -> Cost {
        match self {
            Cost::Finite(value) => Cost::Finite((value as f64 * factor).floor() as u64),
            Cost::Unreachable => Cost::Unreachable,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(value) => write!(f, "{value}"),
            Cost::Unreachable => write!(f, "unreachable"),
        }
    }
}
