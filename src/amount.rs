//! Amount value types.
//!
//! [`NativeAmount`] counts the smallest unit of the base currency (wei) with
//! arbitrary precision. Its human form is the display unit, 10^18 wei.
//! [`TokenAmount`] is the decimal amount passed to token contract calls.

use crate::error::ChainError;
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;
use std::str::FromStr;

/// Decimal places between the smallest unit and the display unit.
pub const NATIVE_DECIMALS: usize = 18;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NativeAmount(BigUint);

impl NativeAmount {
    pub fn zero() -> Self {
        NativeAmount(BigUint::zero())
    }

    pub fn from_wei<T: Into<BigUint>>(wei: T) -> Self {
        NativeAmount(wei.into())
    }

    pub fn wei(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse a plain decimal string in the display unit, e.g. `"1.5"`.
    ///
    /// Fractional digits beyond the smallest unit are only accepted when
    /// they are zeros.
    pub fn from_display_str(s: &str) -> Result<Self, ChainError> {
        let s = s.trim();
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ChainError::DecodingError(format!(
                "Invalid native amount '{}'",
                s
            )));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ChainError::DecodingError(format!(
                "Native amount must be a non-negative decimal, got '{}'",
                s
            )));
        }

        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.len() > NATIVE_DECIMALS {
            return Err(ChainError::DecodingError(format!(
                "Native amount '{}' has more than {} decimal places",
                s, NATIVE_DECIMALS
            )));
        }

        let mut digits = String::with_capacity(int_part.len() + NATIVE_DECIMALS);
        digits.push_str(int_part);
        digits.push_str(frac_part);
        digits.extend(std::iter::repeat('0').take(NATIVE_DECIMALS - frac_part.len()));

        BigUint::parse_bytes(digits.as_bytes(), 10)
            .map(NativeAmount)
            .ok_or_else(|| ChainError::DecodingError(format!("Invalid native amount '{}'", s)))
    }

    /// Render in the display unit with trailing fractional zeros removed.
    pub fn to_display_string(&self) -> String {
        let digits = self.0.to_str_radix(10);
        let padded = if digits.len() <= NATIVE_DECIMALS {
            format!("{:0>width$}", digits, width = NATIVE_DECIMALS + 1)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - NATIVE_DECIMALS);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{}.{}", int_part, frac_part)
        }
    }
}

/// Displays the amount in wei.
impl fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeAmount({} wei)", self.0)
    }
}

/// Parses an integer amount of wei.
impl FromStr for NativeAmount {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigUint::parse_bytes(s.trim().as_bytes(), 10)
            .map(NativeAmount)
            .ok_or_else(|| ChainError::DecodingError(format!("Invalid wei amount '{}'", s)))
    }
}

impl From<u64> for NativeAmount {
    fn from(wei: u64) -> Self {
        NativeAmount(BigUint::from(wei))
    }
}

impl From<u128> for NativeAmount {
    fn from(wei: u128) -> Self {
        NativeAmount(BigUint::from(wei))
    }
}

/// Token amount carried by contract calls.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(f64);

impl TokenAmount {
    pub const fn new(value: f64) -> Self {
        TokenAmount(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// NaN and the infinities have neither a payload nor a JSON form.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Canonical decimal rendering used in signing payloads.
    ///
    /// Values in `[1e-3, 1e7)` are written in plain notation with at least one
    /// fractional digit (`5` -> `5.0`), others in scientific notation with an
    /// upper-case exponent (`1.0E7`). Non-finite values cannot be rendered.
    pub fn to_canonical_string(&self) -> Result<String, ChainError> {
        let v = self.0;
        if !self.is_finite() {
            return Err(ChainError::EncodingError(format!(
                "Token amount {} is not a finite number",
                v
            )));
        }
        let magnitude = v.abs();
        if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
            let plain = format!("{}", v);
            if plain.contains('.') {
                Ok(plain)
            } else {
                Ok(format!("{}.0", plain))
            }
        } else {
            let sci = format!("{:e}", v);
            let (mantissa, exponent) = sci.split_once('e').ok_or_else(|| {
                ChainError::EncodingError(format!("Cannot render token amount {}", v))
            })?;
            if mantissa.contains('.') {
                Ok(format!("{}E{}", mantissa, exponent))
            } else {
                Ok(format!("{}.0E{}", mantissa, exponent))
            }
        }
    }
}

impl From<f64> for TokenAmount {
    fn from(value: f64) -> Self {
        TokenAmount(value)
    }
}
