use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// A positive or negative amount of wallet currency.
///
/// Stored at full decimal precision; rendered at minor-unit precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money(pub Decimal);

impl Money {
    pub const MINOR_DECIMALS: u32 = 2;

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Rounded to minor units, half away from zero like a cashier would.
    pub fn to_minor_precision(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(Self::MINOR_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn from_decimal_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        // Reject exponent forms and stray signs up front; Decimal parsing is lenient.
        if !s
            .trim_start_matches('-')
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.')
        {
            return None;
        }
        Decimal::from_str(s).ok().map(Self)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let rounded = self.to_minor_precision();
        write!(f, "{:.2}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::Money;

    #[test]
    fn displays_two_decimals_rounding_half_away_from_zero() {
        let v = Money::from_decimal_str("1.005").unwrap();
        assert_eq!(format!("{}", v), "1.01");
        let v = Money::from_decimal_str("1.004").unwrap();
        assert_eq!(format!("{}", v), "1.00");
        let v = Money::from_decimal_str("-1.005").unwrap();
        assert_eq!(format!("{}", v), "-1.01");
        let v = Money::from_decimal_str("1500").unwrap();
        assert_eq!(format!("{}", v), "1500.00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Money::from_decimal_str("").is_none());
        assert!(Money::from_decimal_str("abc").is_none());
        assert!(Money::from_decimal_str("1e3").is_none());
        assert!(Money::from_decimal_str("1.2.3").is_none());
    }

    #[test]
    fn positivity() {
        assert!(Money::from_decimal_str("0.01").unwrap().is_positive());
        assert!(!Money::from_decimal_str("0").unwrap().is_positive());
        assert!(!Money::from_decimal_str("-5").unwrap().is_positive());
    }
}
