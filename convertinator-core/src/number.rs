//! Exact decimal numbers using dashu
//!
//! Unit factors such as 0.3048 or 0.45359237 are stored exactly. Conversion
//! arithmetic happens at a fixed working precision and is only turned into
//! an `f64` at the very end.

use dashu_float::DBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// Working precision for calculations (decimal digits)
const WORK_PRECISION: usize = 50;

/// Decimal number with a fixed working precision.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    /// Round to the working precision
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(WORK_PRECISION).value()
    }

    /// Parse a plain decimal literal.
    ///
    /// Accepts an optional sign, digits and at most one decimal point, with
    /// at least one digit somewhere: `"5"`, `"-40"`, `"5."`, `".5"`.
    /// Rejects `"."`, `"12.3.4"`, exponents and anything else.
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let normalized = normalize_literal(s.trim())
            .ok_or_else(|| NumberError::ParseError(s.to_string()))?;

        let inner: DBig = normalized
            .parse()
            .map_err(|_| NumberError::ParseError(s.to_string()))?;

        Ok(Self { inner: Self::with_work_precision(inner) })
    }

    /// Create from an integer
    pub fn from_i64(n: i64) -> Self {
        Self { inner: Self::with_work_precision(DBig::from(n)) }
    }

    /// The additive identity
    pub fn zero() -> Self {
        Self::from_i64(0)
    }

    /// The multiplicative identity
    pub fn one() -> Self {
        Self::from_i64(1)
    }

    /// Check whether the value is exactly zero
    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    /// Addition
    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    /// Subtraction
    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    /// Multiplication
    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    /// Integer power by repeated multiplication
    pub fn pow(&self, exp: i32) -> Result<Self, NumberError> {
        let mut result = Self::one();
        for _ in 0..exp.unsigned_abs() {
            result = result.mul(self);
        }

        if exp < 0 {
            Self::one().checked_div(&result)
        } else {
            Ok(result)
        }
    }

    /// Nearest `f64`, or `None` if out of range.
    pub fn to_f64(&self) -> Option<f64> {
        // DBig displays in positional decimal notation, which the std float
        // parser rounds correctly.
        self.inner
            .to_string()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
    }
}

/// Strip a leading `+` and pad bare decimal points with zeros so the literal
/// is acceptable to `DBig`. Returns `None` if `s` is not a decimal literal.
fn normalize_literal(s: &str) -> Option<String> {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
        return None;
    }
    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    Some(match frac_part {
        Some(f) if !f.is_empty() => format!("{}{}.{}", sign, int_part, f),
        _ => format!("{}{}", sign, int_part),
    })
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.partial_cmp(&other.inner).unwrap_or(std::cmp::Ordering::Equal)
    }
}
