//! Unit string parsing - names like "square kilometers" or "km^2"

use crate::unit::UnitError;
use crate::units::UnitRegistry;
use crate::Unit;

impl UnitRegistry {
    /// Resolve a unit string against this registry
    ///
    /// Supported formats:
    /// - Symbols and aliases: "ft", "feet", "square kilometers"
    /// - Powers: "km^2", "m^2"
    /// - Superscripts: "km²", "m³"
    pub fn resolve(&self, s: &str) -> Result<Unit, UnitError> {
        let s = s.trim();

        if let Some(unit) = self.get(s) {
            return Ok(unit.clone());
        }

        if let Some((base, exp)) = s.split_once('^') {
            let exponent: i32 = exp.trim().parse()
                .map_err(|_| UnitError::UnknownUnit(format!("invalid exponent: {}", exp)))?;
            return self.lookup(base)?.power(exponent);
        }

        if let Some((base, exponent)) = parse_superscript(s) {
            return self.lookup(base)?.power(exponent);
        }

        Err(UnitError::UnknownUnit(s.to_string()))
    }

    fn lookup(&self, s: &str) -> Result<Unit, UnitError> {
        let s = s.trim();
        self.get(s)
            .cloned()
            .ok_or_else(|| UnitError::UnknownUnit(s.to_string()))
    }
}

fn parse_superscript(s: &str) -> Option<(&str, i32)> {
    const SUPERSCRIPTS: [(&str, i32); 3] = [("¹", 1), ("²", 2), ("³", 3)];

    SUPERSCRIPTS.iter()
        .find_map(|(suffix, exp)| s.strip_suffix(suffix).map(|base| (base, *exp)))
}
