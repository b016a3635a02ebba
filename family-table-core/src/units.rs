//! Kitchen unit conversion.
//!
//! Every unit belongs to one dimension and carries a factor to that
//! dimension's base measure (grams for weight, milliliters for volume).
//! Conversions are only defined within a dimension.

use crate::error::ConversionError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Weight,
    Volume,
}

impl Dimension {
    pub fn base_unit(self) -> &'static str {
        match self {
            Dimension::Weight => "grams",
            Dimension::Volume => "ml",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitSpec {
    pub name: &'static str,
    pub dimension: Dimension,
    /// Amount of the base measure in one of this unit.
    pub factor: f64,
    #[serde(skip)]
    pub aliases: &'static [&'static str],
}

// Same constants the density tables use; volumes are US customary.
const ML_PER_CUP: f64 = 236.588;
const ML_PER_TBSP: f64 = 14.7868;
const ML_PER_TSP: f64 = 4.92892;
const ML_PER_FL_OZ: f64 = 29.5735;
const GRAMS_PER_OZ: f64 = 28.3495;
const GRAMS_PER_LB: f64 = 453.592;

static UNITS: &[UnitSpec] = &[
    UnitSpec {
        name: "cup",
        dimension: Dimension::Volume,
        factor: ML_PER_CUP,
        aliases: &["cups", "c"],
    },
    UnitSpec {
        name: "tbsp",
        dimension: Dimension::Volume,
        factor: ML_PER_TBSP,
        aliases: &["tablespoon", "tablespoons", "tbs"],
    },
    UnitSpec {
        name: "tsp",
        dimension: Dimension::Volume,
        factor: ML_PER_TSP,
        aliases: &["teaspoon", "teaspoons"],
    },
    UnitSpec {
        name: "ml",
        dimension: Dimension::Volume,
        factor: 1.0,
        aliases: &["milliliter", "milliliters", "millilitre", "millilitres"],
    },
    UnitSpec {
        name: "fl oz",
        dimension: Dimension::Volume,
        factor: ML_PER_FL_OZ,
        aliases: &["fluid ounce", "fluid ounces", "fl. oz", "floz"],
    },
    UnitSpec {
        name: "liter",
        dimension: Dimension::Volume,
        factor: 1000.0,
        aliases: &["liters", "litre", "litres", "l"],
    },
    UnitSpec {
        name: "pint",
        dimension: Dimension::Volume,
        factor: 473.176,
        aliases: &["pints", "pt"],
    },
    UnitSpec {
        name: "quart",
        dimension: Dimension::Volume,
        factor: 946.353,
        aliases: &["quarts", "qt"],
    },
    UnitSpec {
        name: "gallon",
        dimension: Dimension::Volume,
        factor: 3785.41,
        aliases: &["gallons", "gal"],
    },
    UnitSpec {
        name: "oz",
        dimension: Dimension::Weight,
        factor: GRAMS_PER_OZ,
        aliases: &["ounce", "ounces"],
    },
    UnitSpec {
        name: "lb",
        dimension: Dimension::Weight,
        factor: GRAMS_PER_LB,
        aliases: &["lbs", "pound", "pounds"],
    },
    UnitSpec {
        name: "grams",
        dimension: Dimension::Weight,
        factor: 1.0,
        aliases: &["g", "gram"],
    },
    UnitSpec {
        name: "kg",
        dimension: Dimension::Weight,
        factor: 1000.0,
        aliases: &["kilogram", "kilograms"],
    },
    UnitSpec {
        name: "mg",
        dimension: Dimension::Weight,
        factor: 0.001,
        aliases: &["milligram", "milligrams"],
    },
];

/// Reference equivalences shown next to the converter.
pub const COMMON_CONVERSIONS: &[(&str, &str)] = &[
    ("1 cup", "236.6 ml"),
    ("1 tbsp", "14.8 ml"),
    ("1 tsp", "4.9 ml"),
    ("1 oz", "28.35 grams"),
    ("1 lb", "453.6 grams"),
    ("1 cup", "8 fl oz"),
];

/// All known units, volume first.
pub fn units() -> &'static [UnitSpec] {
    UNITS
}

pub fn units_for(dimension: Dimension) -> impl Iterator<Item = &'static UnitSpec> {
    UNITS.iter().filter(move |u| u.dimension == dimension)
}

/// Look up a unit by canonical name or alias, ignoring case and surrounding whitespace.
pub fn find_unit(name: &str) -> Option<&'static UnitSpec> {
    let needle = name.trim().to_lowercase();
    UNITS
        .iter()
        .find(|u| u.name == needle || u.aliases.contains(&needle.as_str()))
}

/// Convert `amount` from one unit to another of the same dimension.
pub fn convert(amount: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ConversionError::InvalidAmount(amount));
    }

    let from_unit = find_unit(from).ok_or_else(|| ConversionError::UnknownUnit(from.to_string()))?;
    let to_unit = find_unit(to).ok_or_else(|| ConversionError::UnknownUnit(to.to_string()))?;

    if from_unit.dimension != to_unit.dimension {
        return Err(ConversionError::DimensionMismatch {
            from: from_unit.name.to_string(),
            to: to_unit.name.to_string(),
        });
    }

    Ok(amount * from_unit.factor / to_unit.factor)
}

/// Two-decimal display form, e.g. `236.59`.
pub fn format_quantity(value: f64) -> String {
    format!("{:.2}", value)
}

/// The converter's current input, as edited by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl Default for Conversion {
    fn default() -> Self {
        Self {
            amount: 1.0,
            from: "cup".to_string(),
            to: "ml".to_string(),
        }
    }
}

impl Conversion {
    pub fn new(amount: f64, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            amount,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn result(&self) -> Result<f64, ConversionError> {
        convert(self.amount, &self.from, &self.to)
    }

    /// Exchange source and target units; the amount is left as entered.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn test_cup_to_ml() {
        assert!(approx(convert(1.0, "cup", "ml").unwrap(), 236.588));
    }

    #[test]
    fn test_oz_to_grams() {
        let grams = convert(1.0, "oz", "grams").unwrap();
        assert!((grams - 28.35).abs() < 0.01);
    }

    #[test]
    fn test_cup_to_fl_oz_is_eight() {
        let fl_oz = convert(1.0, "cup", "fl oz").unwrap();
        assert!((fl_oz - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_weight_to_volume_fails() {
        let err = convert(1.0, "cup", "oz").unwrap_err();
        assert!(matches!(err, ConversionError::DimensionMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "Cannot convert between weight and volume units"
        );
    }

    #[test]
    fn test_zero_converts_to_zero() {
        for (from, to) in [("cup", "tsp"), ("lb", "kg"), ("ml", "gallon")] {
            assert_eq!(convert(0.0, from, to).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_round_trip_same_dimension() {
        for dimension in [Dimension::Weight, Dimension::Volume] {
            for a in units_for(dimension) {
                for b in units_for(dimension) {
                    let there = convert(3.5, a.name, b.name).unwrap();
                    let back = convert(there, b.name, a.name).unwrap();
                    assert!(approx(back, 3.5), "{} -> {} -> {}", a.name, b.name, a.name);
                }
            }
        }
    }

    #[test]
    fn test_unknown_unit() {
        assert_eq!(
            convert(1.0, "smidgen", "ml"),
            Err(ConversionError::UnknownUnit("smidgen".to_string()))
        );
    }

    #[test]
    fn test_invalid_amount() {
        assert!(matches!(
            convert(-1.0, "cup", "ml"),
            Err(ConversionError::InvalidAmount(_))
        ));
        assert!(matches!(
            convert(f64::NAN, "cup", "ml"),
            Err(ConversionError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_find_unit_aliases() {
        assert_eq!(find_unit("Tablespoons").unwrap().name, "tbsp");
        assert_eq!(find_unit(" G ").unwrap().name, "grams");
        assert_eq!(find_unit("fluid ounce").unwrap().name, "fl oz");
        assert!(find_unit("").is_none());
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(236.588), "236.59");
        assert_eq!(format_quantity(0.0), "0.00");
    }

    #[test]
    fn test_swap() {
        let mut c = Conversion::new(2.0, "cup", "ml");
        c.swap();
        assert_eq!(c.from, "ml");
        assert_eq!(c.to, "cup");
        assert_eq!(c.amount, 2.0);
    }
}
