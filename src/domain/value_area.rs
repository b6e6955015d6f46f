//! Value area, candle and order side.

use std::fmt;

/// The day's accepted trading range: VAL (low) to VAH (high).
///
/// Either bound may be NaN, meaning no valid value area is known. VAL <= VAH
/// is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueArea {
    pub val: f64,
    pub vah: f64,
}

impl ValueArea {
    pub const UNDEFINED: ValueArea = ValueArea {
        val: f64::NAN,
        vah: f64::NAN,
    };

    pub fn new(val: f64, vah: f64) -> Self {
        Self { val, vah }
    }

    /// False when either bound is NaN.
    pub fn is_defined(&self) -> bool {
        !self.val.is_nan() && !self.vah.is_nan()
    }

    /// True for a defined band whose low is above its high.
    pub fn is_inverted(&self) -> bool {
        self.is_defined() && self.val > self.vah
    }

    pub fn width(&self) -> f64 {
        self.vah - self.val
    }
}

impl Default for ValueArea {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

/// Open and close of the most recently completed bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub open: f64,
    pub close: f64,
}

impl Candle {
    pub const UNDEFINED: Candle = Candle {
        open: f64::NAN,
        close: f64::NAN,
    };

    pub fn new(open: f64, close: f64) -> Self {
        Self { open, close }
    }
}

impl Default for Candle {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defined_value_area() {
        let va = ValueArea::new(10.0, 20.0);
        assert!(va.is_defined());
        assert!(!va.is_inverted());
        assert!((va.width() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nan_bound_is_undefined() {
        assert!(!ValueArea::new(f64::NAN, 20.0).is_defined());
        assert!(!ValueArea::new(10.0, f64::NAN).is_defined());
        assert!(!ValueArea::UNDEFINED.is_defined());
        assert!(!ValueArea::default().is_defined());
    }

    #[test]
    fn inverted_band() {
        assert!(ValueArea::new(20.0, 10.0).is_inverted());
        assert!(!ValueArea::new(f64::NAN, 10.0).is_inverted());
    }

    #[test]
    fn side_opposite_and_display() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
        assert_eq!(Side::Buy.to_string(), "buy");
        assert_eq!(Side::Sell.to_string(), "sell");
    }
}
