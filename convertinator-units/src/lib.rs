//! Convertinator Units - Physical units and conversion
//!
//! Provides exact unit definitions with dimensional analysis.
//!
//! Categories:
//! - Length (m, km, ft, mi, etc.)
//! - Mass (kg, g, lb, oz, etc.)
//! - Temperature (K, degC, degF, R)
//! - Area (m², km², acre, etc.)

mod dimension;
mod unit;
mod parse;
mod units;

pub use dimension::Dimension;
pub use unit::{Unit, UnitError};
pub use units::{UnitRegistry, UNITS};
