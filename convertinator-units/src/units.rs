//! Unit definitions for the imperial and metric units the converter knows

use std::collections::HashMap;
use std::sync::LazyLock;
use convertinator_core::Number;
use crate::{Unit, Dimension};

/// Process-wide default unit table
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Registry of known units, keyed by symbol, with name aliases
pub struct UnitRegistry {
    units: HashMap<String, Unit>,
    aliases: HashMap<String, String>,
}

fn exact(literal: &str) -> Number {
    Number::from_str(literal).expect("unit table constant")
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            units: HashMap::new(),
            aliases: HashMap::new(),
        };
        registry.register_length_units();
        registry.register_mass_units();
        registry.register_temperature_units();
        registry.register_area_units();
        registry
    }

    /// Get a unit by symbol or alias
    pub fn get(&self, symbol: &str) -> Option<&Unit> {
        if let Some(unit) = self.units.get(symbol) {
            return Some(unit);
        }
        self.aliases.get(symbol).and_then(|canonical| self.units.get(canonical))
    }

    fn register(&mut self, unit: Unit) {
        self.units.insert(unit.symbol.clone(), unit);
    }

    fn alias(&mut self, alias: &str, symbol: &str) {
        self.aliases.insert(alias.to_string(), symbol.to_string());
    }

    fn aliases(&mut self, symbol: &str, names: &[&str]) {
        for name in names {
            self.alias(name, symbol);
        }
    }

    fn register_length_units(&mut self) {
        self.register(Unit::new("m", "meter", Dimension::LENGTH, Number::one()));
        self.register(Unit::new("km", "kilometer", Dimension::LENGTH, Number::from_i64(1000)));
        self.register(Unit::new("cm", "centimeter", Dimension::LENGTH, exact("0.01")));
        self.register(Unit::new("mm", "millimeter", Dimension::LENGTH, exact("0.001")));

        // International yard and pound agreement (1959)
        self.register(Unit::new("in", "inch", Dimension::LENGTH, exact("0.0254")));
        self.register(Unit::new("ft", "foot", Dimension::LENGTH, exact("0.3048")));
        self.register(Unit::new("yd", "yard", Dimension::LENGTH, exact("0.9144")));
        self.register(Unit::new("mi", "mile", Dimension::LENGTH, exact("1609.344")));

        self.aliases("m", &["meter", "meters", "metre", "metres"]);
        self.aliases("km", &["kilometer", "kilometers", "kilometre", "kilometres"]);
        self.aliases("cm", &["centimeter", "centimeters", "centimetre", "centimetres"]);
        self.aliases("mm", &["millimeter", "millimeters", "millimetre", "millimetres"]);
        self.aliases("in", &["inch", "inches"]);
        self.aliases("ft", &["foot", "feet"]);
        self.aliases("yd", &["yard", "yards"]);
        self.aliases("mi", &["mile", "miles"]);
    }

    fn register_mass_units(&mut self) {
        self.register(Unit::new("kg", "kilogram", Dimension::MASS, Number::one()));
        self.register(Unit::new("g", "gram", Dimension::MASS, exact("0.001")));
        self.register(Unit::new("mg", "milligram", Dimension::MASS, exact("0.000001")));
        self.register(Unit::new("t", "tonne", Dimension::MASS, Number::from_i64(1000)));

        self.register(Unit::new("lb", "pound", Dimension::MASS, exact("0.45359237")));
        self.register(Unit::new("oz", "ounce", Dimension::MASS, exact("0.028349523125")));
        self.register(Unit::new("st", "stone", Dimension::MASS, exact("6.35029318")));

        self.aliases("kg", &["kilogram", "kilograms"]);
        self.aliases("g", &["gram", "grams"]);
        self.aliases("mg", &["milligram", "milligrams"]);
        self.aliases("t", &["tonne", "tonnes", "metric ton"]);
        self.aliases("lb", &["pound", "pounds", "lbs"]);
        self.aliases("oz", &["ounce", "ounces"]);
        self.aliases("st", &["stone", "stones"]);
    }

    fn register_temperature_units(&mut self) {
        // Kelvin is the SI base unit
        self.register(Unit::new("K", "kelvin", Dimension::TEMPERATURE, Number::one()));

        // K = C + 273.15
        self.register(Unit::with_offset(
            "degC", "celsius", Dimension::TEMPERATURE,
            Number::one(),
            exact("273.15"),
        ));

        // K = (F + 459.67) * 5/9
        self.register(Unit::with_offset(
            "degF", "fahrenheit", Dimension::TEMPERATURE,
            Number::from_i64(5),
            exact("459.67"),
        ).divided_by(Number::from_i64(9)));

        // K = R * 5/9
        self.register(Unit::new("R", "rankine", Dimension::TEMPERATURE, Number::from_i64(5))
            .divided_by(Number::from_i64(9)));

        self.aliases("K", &["kelvin"]);
        self.aliases("degC", &["C", "°C", "celsius", "degrees celsius"]);
        self.aliases("degF", &["F", "°F", "fahrenheit", "degrees fahrenheit"]);
        self.aliases("R", &["°R", "rankine"]);
    }

    fn register_area_units(&mut self) {
        self.register(Unit::new("m2", "square meter", Dimension::AREA, Number::one()));
        self.register(Unit::new("km2", "square kilometer", Dimension::AREA, Number::from_i64(1_000_000)));
        self.register(Unit::new("ha", "hectare", Dimension::AREA, Number::from_i64(10_000)));
        self.register(Unit::new("ac", "acre", Dimension::AREA, exact("4046.8564224")));
        self.register(Unit::new("ft2", "square foot", Dimension::AREA, exact("0.09290304")));
        self.register(Unit::new("mi2", "square mile", Dimension::AREA, exact("2589988.110336")));

        self.aliases("m2", &["m²", "sq m", "square meter", "square meters", "square metre", "square metres"]);
        self.aliases("km2", &["km²", "sq km", "square kilometer", "square kilometers", "square kilometre", "square kilometres"]);
        self.aliases("ha", &["hectare", "hectares"]);
        self.aliases("ac", &["acre", "acres"]);
        self.aliases("ft2", &["ft²", "sq ft", "square foot", "square feet"]);
        self.aliases("mi2", &["mi²", "sq mi", "square mile", "square miles"]);
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_registry() {
        let reg = UnitRegistry::new();

        assert!(reg.get("m").is_some());
        assert!(reg.get("lb").is_some());
        assert!(reg.get("degF").is_some());

        assert_eq!(reg.get("feet").unwrap().symbol, "ft");
        assert_eq!(reg.get("metres").unwrap().symbol, "m");
        assert_eq!(reg.get("square kilometers").unwrap().symbol, "km2");
        assert_eq!(reg.get("ounces").unwrap().symbol, "oz");

        assert!(reg.get("unknown_xyz").is_none());
    }

    #[test]
    fn test_length_conversions() {
        let reg = UnitRegistry::new();
        let mi = reg.get("mi").unwrap();
        let km = reg.get("km").unwrap();

        assert_eq!(mi.scale_to(km).unwrap(), Number::from_str("1.609344").unwrap());
    }

    #[test]
    fn test_mass_conversions() {
        let reg = UnitRegistry::new();
        let oz = reg.get("oz").unwrap();
        let g = reg.get("g").unwrap();

        assert_eq!(oz.scale_to(g).unwrap(), Number::from_str("28.349523125").unwrap());
    }

    #[test]
    fn test_area_conversions() {
        let reg = UnitRegistry::new();
        let acre = reg.get("acres").unwrap();
        let km2 = reg.get("km2").unwrap();

        assert_eq!(acre.scale_to(km2).unwrap(), Number::from_str("0.0040468564224").unwrap());
    }

    #[test]
    fn test_temperature_conversions() {
        let reg = UnitRegistry::new();
        let f = reg.get("F").unwrap();
        let c = reg.get("C").unwrap();

        let boiling = f.convert_to(&Number::from_i64(212), c).unwrap();
        assert_eq!(boiling, Number::from_i64(100));

        let crossover = f.convert_to(&Number::from_i64(-40), c).unwrap();
        assert_eq!(crossover, Number::from_i64(-40));
    }

    #[test]
    fn test_rankine_matches_fahrenheit_step() {
        let reg = UnitRegistry::new();
        let r = reg.get("R").unwrap();
        let k = reg.get("K").unwrap();

        let absolute = r.convert_to(&Number::from_str("491.67").unwrap(), k).unwrap();
        assert_eq!(absolute, Number::from_str("273.15").unwrap());
    }

    #[test]
    fn test_global_table() {
        assert_eq!(UNITS.get("acres").unwrap().symbol, "ac");
        assert!(UNITS.get("furlong").is_none());
    }
}
