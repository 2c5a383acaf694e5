//! Coin amounts.
//!
//! Amounts are represented as fixed-point integers (u128) to avoid floating-point errors.
//! One coin is [`COIN`] raw units, which gives four decimal places: rewards such as
//! 0.15 and 0.25 coins are exact.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Raw units per whole coin.
pub const COIN: u128 = 10_000;

const DECIMALS: usize = 4;

/// A non-negative amount of coins.
///
/// There is no negative amount: a debit that would go below zero fails in
/// [`CoinAmount::checked_sub`], which is how balances stay non-negative.
///
/// Human-readable formats (TOML, JSON) carry the decimal string ("0.15");
/// binary formats carry the raw `u128`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoinAmount(u128);

impl CoinAmount {
    pub const ZERO: Self = Self(0);

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole coins.
    pub const fn coins(whole: u64) -> Self {
        Self(whole as u128 * COIN)
    }

    /// Hundredths of a coin, e.g. `cents(15)` is 0.15 coins.
    pub const fn cents(hundredths: u64) -> Self {
        Self(hundredths as u128 * (COIN / 100))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul(self, times: u64) -> Option<Self> {
        self.0.checked_mul(times as u128).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for CoinAmount {
    /// Renders as a decimal without trailing zeros: `500`, `0.15`, `12.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / COIN;
        let frac = self.0 % COIN;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:0width$}", width = DECIMALS);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for CoinAmount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(TypesError::InvalidAmount(s.to_string()));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) || (s.contains('.') && frac.is_empty()) {
            return Err(TypesError::InvalidAmount(s.to_string()));
        }
        if frac.len() > DECIMALS {
            return Err(TypesError::TooPrecise(s.to_string()));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| TypesError::InvalidAmount(s.to_string()))?
        };
        let mut frac_raw: u128 = 0;
        for (i, b) in frac.bytes().enumerate() {
            let digit = (b - b'0') as u128;
            frac_raw += digit * 10u128.pow((DECIMALS - 1 - i) as u32);
        }
        whole
            .checked_mul(COIN)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Self)
            .ok_or(TypesError::Overflow)
    }
}

impl Serialize for CoinAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_u128(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for CoinAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(DecimalVisitor)
        } else {
            u128::deserialize(deserializer).map(Self)
        }
    }
}

/// Accepts `"12.5"`, a bare integer number of whole coins, or a float such as
/// TOML's `0.25`. Floats go through their shortest decimal form, so anything
/// finer than four places is refused rather than rounded.
struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = CoinAmount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal coin amount such as \"0.25\" or a whole number of coins")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CoinAmount, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CoinAmount, E> {
        Ok(CoinAmount::coins(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CoinAmount, E> {
        u64::try_from(v)
            .map_err(|_| E::custom(TypesError::InvalidAmount(v.to_string())))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CoinAmount, E> {
        v.to_string().parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(CoinAmount::coins(500).to_string(), "500");
        assert_eq!(CoinAmount::cents(15).to_string(), "0.15");
        assert_eq!(CoinAmount::cents(25).to_string(), "0.25");
        assert_eq!(CoinAmount::from_raw(125_000).to_string(), "12.5");
        assert_eq!(CoinAmount::from_raw(1).to_string(), "0.0001");
    }

    #[test]
    fn parses_decimal_strings() {
        assert_eq!("0.15".parse::<CoinAmount>().unwrap(), CoinAmount::cents(15));
        assert_eq!("500".parse::<CoinAmount>().unwrap(), CoinAmount::coins(500));
        assert_eq!(".5".parse::<CoinAmount>().unwrap(), CoinAmount::cents(50));
        assert_eq!(" 7.25 ".parse::<CoinAmount>().unwrap(), CoinAmount::cents(725));
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", ".", "1.", "-1", "1e3", "abc", "1.2.3", "0.12345"] {
            assert!(bad.parse::<CoinAmount>().is_err(), "{bad:?} should not parse");
        }
        assert!(matches!(
            "0.12345".parse::<CoinAmount>(),
            Err(TypesError::TooPrecise(_))
        ));
    }

    #[test]
    fn subtraction_below_zero_fails() {
        let five = CoinAmount::coins(5);
        let ten = CoinAmount::coins(10);
        assert_eq!(five.checked_sub(ten), None);
        assert_eq!(ten.checked_sub(five), Some(five));
    }

    #[test]
    fn human_readable_formats_use_decimal_strings() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            amount: CoinAmount,
        }
        let text = toml::to_string(&Wrapper {
            amount: CoinAmount::cents(15),
        })
        .unwrap();
        assert_eq!(text.trim(), "amount = \"0.15\"");

        let parsed: Wrapper = toml::from_str("amount = 500").unwrap();
        assert_eq!(parsed.amount, CoinAmount::coins(500));
    }

    #[test]
    fn unquoted_fractions_are_accepted() {
        #[derive(Deserialize)]
        struct Wrapper {
            amount: CoinAmount,
        }
        let parsed: Wrapper = toml::from_str("amount = 0.25").unwrap();
        assert_eq!(parsed.amount, CoinAmount::cents(25));
        let parsed: Wrapper = toml::from_str("amount = 0.15").unwrap();
        assert_eq!(parsed.amount, CoinAmount::cents(15));
        let parsed: Wrapper = toml::from_str("amount = 2.0").unwrap();
        assert_eq!(parsed.amount, CoinAmount::coins(2));

        assert!(toml::from_str::<Wrapper>("amount = -0.5").is_err());
        assert!(toml::from_str::<Wrapper>("amount = 0.00001").is_err());
    }

    #[test]
    fn binary_formats_use_raw_units() {
        let bytes = bincode::serialize(&CoinAmount::cents(25)).unwrap();
        assert_eq!(bytes.len(), 16);
        let back: CoinAmount = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, CoinAmount::cents(25));
    }

    #[test]
    fn fractional_rewards_sum_exactly() {
        let mut total = CoinAmount::ZERO;
        for _ in 0..4 {
            total = total.checked_add(CoinAmount::cents(25)).unwrap();
        }
        assert_eq!(total, CoinAmount::coins(1));
    }
}
