use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::sync::OnceLock;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(leading_number, r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?");

/// Rounds to 2 decimal places, half up: ties go toward positive infinity,
/// so `-2.125` becomes `-2.12`.
///
/// `f64::EPSILON` is added before scaling so values whose binary form sits
/// just under a half-cent (`1.005`, `2.675`) still round up. Non-finite input
/// is returned unchanged.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let cents = (value + f64::EPSILON) * 100.0;
    let floor = cents.floor();
    let rounded = if cents - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded / 100.0
}

/// Parses the leading decimal number of `s`, ignoring leading whitespace and
/// any trailing text (`"12.5 USD"` → `12.5`). Returns `None` when no number
/// leads the string or the result is not finite.
pub fn parse_amount(s: &str) -> Option<f64> {
    let m = leading_number().find(s.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A monetary value that is always held at 2-decimal precision.
///
/// Every constructor and arithmetic operation re-rounds through [`round2`],
/// so a running sum built with `+` rounds after each addition.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    pub fn new(value: f64) -> Self {
        Money(round2(value))
    }

    pub fn zero() -> Self {
        Money(0.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// `self × percent / 100`, rounded.
    pub fn percent(self, percent: f64) -> Self {
        Money::new(self.0 * percent / 100.0)
    }

    pub fn min(self, other: Money) -> Self {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }
}

impl From<Money> for f64 {
    fn from(m: Money) -> f64 {
        m.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money::new(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money::new(self.0 - rhs.0)
    }
}
