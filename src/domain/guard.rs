//! Guard predicates over the value area and the last candle.
//!
//! Every predicate is a plain comparison of `open` or `close` against VAL or
//! VAH. NaN inputs make every comparison false; the separate
//! `value_area_invalid` flag covers an undefined band.

use crate::domain::value_area::{Candle, ValueArea};
use std::fmt;
use std::str::FromStr;

/// How a price sitting exactly on VAL or VAH is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// All comparisons strict. A price on a boundary is neither above nor
    /// below it.
    #[default]
    Strict,
    /// The band edges count as inside: "above VAL" is `>=` and "below VAH"
    /// is `<=`. "Below VAL" and "above VAH" stay strict.
    InclusiveBand,
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Strict => write!(f, "strict"),
            BoundaryPolicy::InclusiveBand => write!(f, "inclusive"),
        }
    }
}

impl FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" | "exclusive" => Ok(BoundaryPolicy::Strict),
            "inclusive" | "inclusive_band" => Ok(BoundaryPolicy::InclusiveBand),
            other => Err(format!(
                "unknown boundary policy '{}' (expected strict or inclusive)",
                other
            )),
        }
    }
}

impl BoundaryPolicy {
    fn above_low(self, price: f64, val: f64) -> bool {
        match self {
            BoundaryPolicy::Strict => price > val,
            BoundaryPolicy::InclusiveBand => price >= val,
        }
    }

    fn below_high(self, price: f64, vah: f64) -> bool {
        match self {
            BoundaryPolicy::Strict => price < vah,
            BoundaryPolicy::InclusiveBand => price <= vah,
        }
    }
}

/// Snapshot of all guard predicates for one set of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Guards {
    pub value_area_invalid: bool,
    pub close_below_val: bool,
    pub close_above_val: bool,
    pub close_below_vah: bool,
    pub close_above_vah: bool,
    pub open_below_val: bool,
    pub open_above_val: bool,
    pub open_below_vah: bool,
    pub open_above_vah: bool,
}

impl Guards {
    pub fn evaluate(va: &ValueArea, candle: &Candle, policy: BoundaryPolicy) -> Self {
        let ValueArea { val, vah } = *va;
        let Candle { open, close } = *candle;
        Guards {
            value_area_invalid: !va.is_defined(),
            close_below_val: close < val,
            close_above_val: policy.above_low(close, val),
            close_below_vah: policy.below_high(close, vah),
            close_above_vah: close > vah,
            open_below_val: open < val,
            open_above_val: policy.above_low(open, val),
            open_below_vah: policy.below_high(open, vah),
            open_above_vah: open > vah,
        }
    }

    /// Close above VAL and below VAH under the active policy.
    pub fn close_inside(&self) -> bool {
        self.close_above_val && self.close_below_vah
    }

    /// Both open and close inside the band.
    pub fn candle_inside(&self) -> bool {
        self.close_inside() && self.open_above_val && self.open_below_vah
    }
}
