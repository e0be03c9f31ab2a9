//! Price-range parsing.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::MAX_AMOUNT;
use crate::error::EstimateError;
use crate::text::{normalize, parse_amount};

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:entre|de|desde|from|between)?\s*(?P<low>\d[\d.,]*)\s*(?P<low_unit>k|mil)?\s*(?P<low_cur>€|euros|eur)?\s*(?:-|–|—|\ba\b|\by\b|\bto\b|\band\b|\bhasta\b)\s*(?P<high>\d[\d.,]*)\s*(?P<high_unit>k|mil)?\s*(?P<high_cur>€|euros|eur)?$",
    )
    .expect("range pattern is valid")
});

/// Bounds below this, with no unit or currency, are read in thousands.
const THOUSANDS_HEURISTIC_LIMIT: Decimal = dec!(1000);

/// A client's stated budget, in euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub low: Decimal,
    pub high: Decimal,
}

impl PriceRange {
    /// Parse forms like `10 - 15`, `10.000 - 15.000 €`, `10k-15k`, `10 a 15`
    /// or `entre 10 y 15`.
    ///
    /// A `k`/`mil` suffix on either bound applies to both. Bare ranges whose
    /// bounds are both under 1000 are read in thousands; a currency marker
    /// (`€`, `euros`, `eur`) makes the amounts literal. Bounds above
    /// [`MAX_AMOUNT`] are rejected.
    pub fn parse(input: &str) -> Result<Self, EstimateError> {
        let invalid = |reason: &str| EstimateError::InvalidRange {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let text = normalize(input);
        let caps = RANGE_RE
            .captures(text.trim())
            .ok_or_else(|| invalid("expected two amounts such as '10 - 15'"))?;

        let low = parse_amount(&caps["low"]).ok_or_else(|| invalid("unreadable lower bound"))?;
        let high = parse_amount(&caps["high"]).ok_or_else(|| invalid("unreadable upper bound"))?;

        let has_unit = caps.name("low_unit").is_some() || caps.name("high_unit").is_some();
        let has_currency = caps.name("low_cur").is_some() || caps.name("high_cur").is_some();
        let in_thousands = has_unit
            || (!has_currency
                && low < THOUSANDS_HEURISTIC_LIMIT
                && high < THOUSANDS_HEURISTIC_LIMIT);

        let (low, high) = if in_thousands {
            let scale = |v: Decimal| {
                v.checked_mul(dec!(1000))
                    .ok_or_else(|| invalid("amount too large"))
            };
            (scale(low)?, scale(high)?)
        } else {
            (low, high)
        };

        if high <= Decimal::ZERO {
            return Err(invalid("upper bound must be positive"));
        }
        if low > high {
            return Err(invalid("lower bound exceeds upper bound"));
        }
        if high > MAX_AMOUNT {
            return Err(invalid("amount too large"));
        }

        Ok(Self { low, high })
    }

    pub fn midpoint(&self) -> Decimal {
        self.low / dec!(2) + self.high / dec!(2)
    }

    /// Whether `value` lies within the bounds, inclusive.
    pub fn contains(&self, value: Decimal) -> bool {
        self.low <= value && value <= self.high
    }
}

impl FromStr for PriceRange {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} €", self.low.normalize(), self.high.normalize())
    }
}
