//! Unit representation with conversion factors

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use convertinator_core::{Number, NumberError};
use crate::Dimension;

/// A physical unit with its dimension and its relation to the SI base unit.
///
/// `value_si = (value + offset) * factor / divisor`. Proportional units have
/// a zero offset. Temperature scales carry the distance between their zero and
/// absolute zero as the offset (459.67 for Fahrenheit, 273.15 for Celsius).
/// The divisor keeps factors like 5/9 exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// The unit symbol (e.g., "m", "kg", "degF")
    pub symbol: String,
    /// The unit name (e.g., "meter", "kilogram", "fahrenheit")
    pub name: String,
    /// Physical dimension
    pub dimension: Dimension,
    /// Size of one unit step, in SI base units (before the divisor)
    pub factor: Number,
    /// Denominator of the factor (1 for most units)
    pub divisor: Number,
    /// Shift applied before scaling, in this unit
    pub offset: Number,
}

impl Unit {
    /// Create a new unit with proportional conversion (no offset)
    pub fn new(symbol: &str, name: &str, dimension: Dimension, factor: Number) -> Self {
        Self::with_offset(symbol, name, dimension, factor, Number::zero())
    }

    /// Create a unit with offset (for temperature scales)
    pub fn with_offset(
        symbol: &str,
        name: &str,
        dimension: Dimension,
        factor: Number,
        offset: Number,
    ) -> Self {
        Unit {
            symbol: symbol.to_string(),
            name: name.to_string(),
            dimension,
            factor,
            divisor: Number::one(),
            offset,
        }
    }

    /// Builder: divide the factor by `divisor`
    pub fn divided_by(mut self, divisor: Number) -> Self {
        self.divisor = divisor;
        self
    }

    /// Check if this unit has an offset (non-proportional conversion)
    pub fn has_offset(&self) -> bool {
        !self.offset.is_zero()
    }

    /// Check if two units are dimensionally compatible (can be converted)
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Convert a value in this unit to the SI base unit
    pub fn to_si(&self, value: &Number) -> Result<Number, NumberError> {
        value.add(&self.offset).mul(&self.factor).checked_div(&self.divisor)
    }

    /// Convert a value in the SI base unit to this unit
    pub fn from_si(&self, value_si: &Number) -> Result<Number, NumberError> {
        Ok(value_si.mul(&self.divisor).checked_div(&self.factor)?.sub(&self.offset))
    }

    /// Pure multiplicative ratio between this unit and `target`.
    ///
    /// Offsets are ignored, so this is only meaningful for proportional
    /// units. Callers that may see temperature scales use `convert_to`.
    pub fn scale_to(&self, target: &Unit) -> Result<Number, UnitError> {
        self.check_compatible(target)?;
        let numerator = self.factor.mul(&target.divisor);
        let denominator = self.divisor.mul(&target.factor);
        Ok(numerator.checked_div(&denominator)?)
    }

    /// Convert a value through the SI base unit, honoring offsets.
    pub fn convert_to(&self, value: &Number, target: &Unit) -> Result<Number, UnitError> {
        self.check_compatible(target)?;
        let si_value = self.to_si(value)?;
        Ok(target.from_si(&si_value)?)
    }

    /// Raise unit to a power (e.g., km^2). Offsets do not survive.
    pub fn power(&self, exp: i32) -> Result<Unit, UnitError> {
        if self.has_offset() {
            return Err(UnitError::OffsetPower(self.symbol.clone()));
        }

        let symbol = if exp == 1 {
            self.symbol.clone()
        } else {
            format!("{}^{}", self.symbol, exp)
        };

        let unit = Unit::new(
            &symbol,
            &format!("{} to the {}", self.name, exp),
            self.dimension.power(exp),
            self.factor.pow(exp)?,
        );
        Ok(unit.divided_by(self.divisor.pow(exp)?))
    }

    /// Fail unless both units share a dimension
    fn check_compatible(&self, target: &Unit) -> Result<(), UnitError> {
        if self.is_compatible(target) {
            Ok(())
        } else {
            Err(UnitError::IncompatibleDimensions {
                from: self.symbol.clone(),
                to: target.symbol.clone(),
                from_dim: self.dimension,
                to_dim: target.dimension,
            })
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Errors raised by the unit subsystem
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("cannot convert {from} ({from_dim}) to {to} ({to_dim}): incompatible dimensions")]
    IncompatibleDimensions {
        from: String,
        to: String,
        from_dim: Dimension,
        to_dim: Dimension,
    },

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("cannot raise offset unit {0} to a power")]
    OffsetPower(String),

    #[error("numeric error: {0}")]
    Number(#[from] NumberError),
}
