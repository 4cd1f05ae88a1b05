//! Dimensional analysis types
//!
//! Only the base quantities the converter deals in are tracked, as a
//! 3-element exponent vector: [length, mass, temperature]

use std::fmt;
use serde::{Serialize, Deserialize};

/// Exponents of the tracked base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    /// [length, mass, temperature]
    pub exponents: [i32; 3],
}

impl Dimension {
    /// Pure number, e.g. `m^0`
    pub const DIMENSIONLESS: Dimension = Dimension { exponents: [0, 0, 0] };

    /// Length dimension [L]
    pub const LENGTH: Dimension = Dimension { exponents: [1, 0, 0] };

    /// Mass dimension [M]
    pub const MASS: Dimension = Dimension { exponents: [0, 1, 0] };

    /// Temperature dimension [Θ]
    pub const TEMPERATURE: Dimension = Dimension { exponents: [0, 0, 1] };

    /// Area [L^2]
    pub const AREA: Dimension = Dimension { exponents: [2, 0, 0] };

    /// Raise to integer power (multiply exponents)
    pub fn power(&self, exp: i32) -> Dimension {
        Dimension { exponents: self.exponents.map(|e| e * exp) }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = ["L", "M", "Θ"];
        let parts: Vec<String> = self.exponents.iter()
            .zip(names)
            .filter(|&(&exp, _)| exp != 0)
            .map(|(&exp, name)| if exp == 1 { name.to_string() } else { format!("{}^{}", name, exp) })
            .collect();

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}
