use anyhow::{ensure, Context, Result};
use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    ops::Mul,
    str::FromStr,
};

/// Represents an amount of money in Sri Lankan rupees.
///
/// The amount is stored internally as an integer number of paise (hundredths
/// of a rupee), so sums never drift. The [`Display`] implementation formats it
/// as rupees to 2 decimal places, and respects width and alignment flags:
///
/// ```
/// # use std::str::FromStr;
/// # use supersaver::Rupees;
/// let price = Rupees::from_str("150.5").unwrap();
/// assert_eq!(price.to_string(), "150.50");
/// assert_eq!(format!("[{price:<8}]"), "[150.50  ]");
/// ```
///
/// Parsed amounts and [`Rupees::from_paise`] are limited to what fits in an
/// `i64` number of paise. Storage is `i128`, so such an amount times any
/// `i64` quantity, or any `i32` percentage of that product, can't overflow.
/// Running totals use the `checked_` methods.
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rupees(i128);

impl Rupees {
    pub const ZERO: Rupees = Rupees(0);

    #[must_use]
    pub const fn from_paise(paise: i64) -> Self {
        Self(paise as i128)
    }

    #[must_use]
    pub const fn paise(self) -> i128 {
        self.0
    }

    /// Returns `percent` percent of this amount, rounded half away from zero
    /// to the nearest paisa, or `None` on overflow.
    ///
    /// Any percentage is accepted, including negative ones and ones over 100.
    ///
    /// ```
    /// # use supersaver::Rupees;
    /// assert_eq!(Rupees::from_paise(30000).checked_percent(10), Some(Rupees::from_paise(3000)));
    /// assert_eq!(Rupees::from_paise(999).checked_percent(50), Some(Rupees::from_paise(500)));
    /// ```
    #[must_use]
    pub fn checked_percent(self, percent: i32) -> Option<Self> {
        let scaled = self.0.checked_mul(i128::from(percent))?;
        let (whole, rest) = (scaled / 100, scaled % 100);
        if rest.abs() >= 50 {
            whole.checked_add(scaled.signum()).map(Self)
        } else {
            Some(Self(whole))
        }
    }

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl Debug for Rupees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Rupees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let paise = self.0.unsigned_abs();
        f.pad(&format!("{sign}{}.{:02}", paise / 100, paise % 100))
    }
}

impl FromStr for Rupees {
    type Err = anyhow::Error;

    /// Parses a number of rupees such as `150`, `+150.5`, `12.345` or `1e3`.
    ///
    /// Digits past the second decimal place round half away from zero.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let text = s.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let plain = !(whole.is_empty() && frac.is_empty())
            && whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit());
        let paise = if plain {
            decimal_paise(whole, frac)
        } else {
            scientific_paise(digits)
        }
        .with_context(|| format!("invalid amount {s:?}"))?;
        Ok(Self::from_paise(if negative { -paise } else { paise }))
    }
}

fn decimal_paise(whole: &str, frac: &str) -> Result<i64> {
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse()? };
    let mut paise: i64 = format!("{:0<2}", frac.get(..2).unwrap_or(frac)).parse()?;
    if frac.as_bytes().get(2).is_some_and(|&b| b >= b'5') {
        paise += 1;
    }
    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(paise))
        .context("amount out of range")
}

fn scientific_paise(digits: &str) -> Result<i64> {
    ensure!(
        digits.starts_with(|c: char| c.is_ascii_digit() || c == '.'),
        "not a number"
    );
    let paise = (digits.parse::<f64>()? * 100.0).round();
    ensure!(
        paise.is_finite() && paise < i64::MAX as f64,
        "amount out of range"
    );
    Ok(paise as i64)
}

impl Mul<i64> for Rupees {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * i128::from(rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_fn_accepts_whole_and_fractional_amounts() {
        assert_eq!(Rupees::from_str("150.00").unwrap(), Rupees(15000));
        assert_eq!(Rupees::from_str("150").unwrap(), Rupees(15000));
        assert_eq!(Rupees::from_str("150.5").unwrap(), Rupees(15050));
        assert_eq!(Rupees::from_str(".75").unwrap(), Rupees(75));
        assert_eq!(Rupees::from_str(" 12.34 ").unwrap(), Rupees(1234));
        assert_eq!(Rupees::from_str("-2.50").unwrap(), Rupees(-250));
        assert_eq!(Rupees::from_str("+5").unwrap(), Rupees(500));
    }

    #[test]
    fn from_str_fn_rounds_extra_decimal_places() {
        assert_eq!(Rupees::from_str("12.345").unwrap(), Rupees(1235));
        assert_eq!(Rupees::from_str("12.344").unwrap(), Rupees(1234));
        assert_eq!(Rupees::from_str("-12.345").unwrap(), Rupees(-1235));
        assert_eq!(Rupees::from_str("0.999").unwrap(), Rupees(100));
    }

    #[test]
    fn from_str_fn_accepts_exponent_notation() {
        assert_eq!(Rupees::from_str("1e3").unwrap(), Rupees(100_000));
        assert_eq!(Rupees::from_str("1.5E2").unwrap(), Rupees(15000));
        assert_eq!(Rupees::from_str("-2.5e-1").unwrap(), Rupees(-25));
    }

    #[test]
    fn from_str_fn_rejects_malformed_amounts() {
        for bad in ["", ".", "abc", "1.2.3", "Rs. 10", "--1", "+-1", "inf", "NaN", "1e"] {
            assert!(Rupees::from_str(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn from_str_fn_rejects_amounts_too_large_to_hold() {
        for big in ["99999999999999999", "99999999999999999999", "1e30", "-1e30"] {
            assert!(Rupees::from_str(big).is_err(), "accepted {big:?}");
        }
        assert!(Rupees::from_str("92233720368547758.07").is_ok());
    }

    #[test]
    fn display_fn_formats_two_decimal_places() {
        assert_eq!(Rupees(30000).to_string(), "300.00");
        assert_eq!(Rupees(5).to_string(), "0.05");
        assert_eq!(Rupees(-1250).to_string(), "-12.50");
        assert_eq!(format!("{:>8}|", Rupees(105)), "    1.05|");
    }

    #[test]
    fn checked_percent_fn_rounds_half_away_from_zero() {
        assert_eq!(Rupees(30000).checked_percent(10), Some(Rupees(3000)));
        assert_eq!(Rupees(333).checked_percent(15), Some(Rupees(50)));
        assert_eq!(Rupees(-333).checked_percent(15), Some(Rupees(-50)));
        assert_eq!(Rupees(1000).checked_percent(0), Some(Rupees::ZERO));
        assert_eq!(Rupees(1000).checked_percent(-10), Some(Rupees(-100)));
        assert_eq!(Rupees(1000).checked_percent(150), Some(Rupees(1500)));
    }

    #[test]
    fn checked_percent_fn_handles_extreme_inputs() {
        let gross = Rupees::from_paise(i64::MAX) * i64::from(i32::MAX);
        assert!(gross.checked_percent(i32::MAX).is_some());
        assert!(gross.checked_percent(i32::MIN).is_some());
        assert_eq!(Rupees(i128::MAX).checked_percent(2), None);
    }

    #[test]
    fn mul_fn_scales_by_quantity() {
        assert_eq!(Rupees(15000) * 2, Rupees(30000));
        assert_eq!(Rupees(15000) * -1, Rupees(-15000));
    }
}
