//! Quantity conversion

use serde::{Deserialize, Serialize};
use convertinator_core::Number;
use crate::error::ConversionError;
use crate::extract::Measurement;
use crate::rules::{ConversionRule, RuleKind};

/// One converted measurement, ready for the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub original_token: String,
    pub source_symbol: String,
    pub value: f64,
    pub target_symbol: String,
}

/// Convert a quantity literal with the units of `rule`.
///
/// Linear rules multiply by the unit scale factor. Affine rules go through
/// the SI base so the temperature offset is applied.
pub fn convert(rule: &ConversionRule, token: &str) -> Result<ConversionResult, ConversionError> {
    let quantity = Number::from_str(token).map_err(|_| ConversionError::Parse {
        token: token.to_string(),
        rule: rule.name().to_string(),
    })?;

    let unit_error = |source| ConversionError::Unit {
        rule: rule.name().to_string(),
        source,
    };

    let converted = match rule.kind() {
        RuleKind::Linear => {
            let scale = rule.source_unit().scale_to(rule.target_unit()).map_err(unit_error)?;
            quantity.mul(&scale)
        }
        RuleKind::Affine => rule
            .source_unit()
            .convert_to(&quantity, rule.target_unit())
            .map_err(unit_error)?,
    };

    let value = converted.to_f64().ok_or_else(|| ConversionError::OutOfRange {
        token: token.to_string(),
        rule: rule.name().to_string(),
    })?;

    Ok(ConversionResult {
        original_token: token.to_string(),
        source_symbol: rule.source_symbol().to_string(),
        value,
        target_symbol: rule.target_symbol().to_string(),
    })
}

/// Convert each measurement on its own; one failure never affects the others
pub fn convert_all(measurements: &[Measurement<'_>]) -> Vec<Result<ConversionResult, ConversionError>> {
    measurements.iter()
        .map(|m| convert(m.rule, &m.token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use convertinator_units::UNITS;
    use crate::rules::{RuleDef, RuleRegistry};

    fn builtin() -> RuleRegistry {
        RuleRegistry::builtin(&UNITS).unwrap()
    }

    fn value_of(rules: &RuleRegistry, rule: &str, token: &str) -> f64 {
        convert(rules.get(rule).unwrap(), token).unwrap().value
    }

    fn assert_close(actual: f64, expected: f64) {
        let err = ((actual - expected) / expected).abs();
        assert!(err < 1e-12, "{} != {}", actual, expected);
    }

    #[test]
    fn test_linear_conversions() {
        let rules = builtin();
        assert_close(value_of(&rules, "miles", "10"), 16.09344);
        assert_close(value_of(&rules, "feet", "5"), 1.524);
        assert_close(value_of(&rules, "pounds", "10"), 4.5359237);
        assert_close(value_of(&rules, "oz", "2"), 56.69904625);
        assert_close(value_of(&rules, "acres", "640"), 2.589988110336);
    }

    #[test]
    fn test_result_fields() {
        let rules = builtin();
        let result = convert(rules.get("ft").unwrap(), "6.5").unwrap();
        assert_eq!(result.original_token, "6.5");
        assert_eq!(result.source_symbol, "ft");
        assert_eq!(result.target_symbol, "metres");
        assert_eq!(format!("{:.2}", result.value), "1.98");
    }

    #[test]
    fn test_affine_conversions() {
        let rules = builtin();
        assert_eq!(format!("{:.2}", value_of(&rules, "F", "32")), "0.00");
        assert_eq!(format!("{:.2}", value_of(&rules, "F", "212")), "100.00");
        assert_eq!(format!("{:.2}", value_of(&rules, "farenheit", "-40")), "-40.00");
        assert_eq!(format!("{:.2}", value_of(&rules, "degrees farenheit", "98.6")), "37.00");
    }

    #[test]
    fn test_affine_is_not_pure_scale() {
        let rules = builtin();
        let zero_f = value_of(&rules, "F", "0");
        assert!((zero_f - (-160.0 / 9.0)).abs() < 1e-9);
    }

    #[test]
    fn test_mile_round_trip() {
        let rules = builtin();
        let back_defs = [RuleDef::new("km", r"([0-9.]+) km", ("km", "mi"), ("km", "miles"), RuleKind::Linear)];
        let back = RuleRegistry::from_defs(&back_defs, &UNITS).unwrap();

        for x in ["1", "26.2", "0.001", "12345.678"] {
            let km = value_of(&rules, "miles", x);
            let miles = value_of(&back, "km", &km.to_string());
            let original: f64 = x.parse().unwrap();
            assert!(((miles - original) / original).abs() < 1e-6, "{} -> {} -> {}", x, km, miles);
        }
    }

    #[test]
    fn test_malformed_token() {
        let rules = builtin();
        let err = convert(rules.get("miles").unwrap(), "12.3.4").unwrap_err();
        assert_eq!(err, ConversionError::Parse { token: "12.3.4".into(), rule: "miles".into() });

        assert!(matches!(convert(rules.get("lb").unwrap(), "."), Err(ConversionError::Parse { .. })));
    }

    #[test]
    fn test_out_of_range() {
        let rules = builtin();
        let token = format!("1{}", "0".repeat(400));
        let err = convert(rules.get("miles").unwrap(), &token).unwrap_err();
        assert_eq!(err, ConversionError::OutOfRange { token: token.clone(), rule: "miles".into() });
        assert!(err.to_string().ends_with("is out of range"));
    }

    #[test]
    fn test_batch_survives_bad_token() {
        let rules = builtin();
        let measurements = vec![
            Measurement { token: "3".into(), rule: rules.get("miles").unwrap() },
            Measurement { token: "1.2.3".into(), rule: rules.get("feet").unwrap() },
            Measurement { token: "212".into(), rule: rules.get("F").unwrap() },
        ];

        let results = convert_all(&measurements);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ConversionError::Parse { .. })));
        assert_eq!(results[2].as_ref().unwrap().value, 100.0);
    }
}
