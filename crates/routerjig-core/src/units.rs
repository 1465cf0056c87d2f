//! Unit conversion utilities
//!
//! All geometry is held as integer increments. A [`UnitSystem`] knows how
//! many increments make up one inch (English) or one millimetre (metric) and
//! converts between increments and what the user types or reads.
//!
//! English lengths are shown as exact fractions when the reduced denominator
//! is a power of two up to 64, and as three-place decimals otherwise. Metric
//! lengths are shown as decimals quantized to hundredths.

use crate::error::LengthParseError;
use crate::fraction::FractionValue;
use crate::translate::{self, SharedTranslator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MM_PER_INCH: f64 = 25.4;

/// Denominators that English lengths may be displayed with
pub const ALLOWED_DENOMINATORS: [u64; 7] = [1, 2, 4, 8, 16, 32, 64];

/// Scale applied to fractional increments before building a fraction
pub const FLOAT_INCREMENT_PRECISION: i64 = 100;

pub const DEFAULT_ENGLISH_INCREMENTS: u32 = 32;
pub const DEFAULT_METRIC_INCREMENTS: u32 = 1;

const METRIC_DECIMAL_PLACES: usize = 2;
const ENGLISH_DECIMAL_PLACES: usize = 3;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    Metric,
    /// English system (inches)
    English,
}

impl Default for MeasurementSystem {
    fn default() -> Self {
        Self::English
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::English => write!(f, "English"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "english" | "imperial" | "inch" | "in" => Ok(Self::English),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// A length given either as text or as a number in the current unit
#[derive(Debug, Clone, PartialEq)]
pub enum LengthInput<'a> {
    Text(&'a str),
    Value(f64),
}

impl<'a> From<&'a str> for LengthInput<'a> {
    fn from(s: &'a str) -> Self {
        LengthInput::Text(s)
    }
}

impl From<f64> for LengthInput<'_> {
    fn from(v: f64) -> Self {
        LengthInput::Value(v)
    }
}

/// Converts to and from increments and the unit being used.
#[derive(Debug, Clone)]
pub struct UnitSystem {
    metric: bool,
    num_increments: u32,
    increments_per_inch: f64,
    english_separator: String,
    decimal_places: usize,
    translator: SharedTranslator,
}

impl UnitSystem {
    /// `num_increments` is increments per inch (English) or per mm (metric);
    /// `None` selects the default for the system.
    pub fn new(system: MeasurementSystem, num_increments: Option<u32>) -> Self {
        let metric = system == MeasurementSystem::Metric;
        let num_increments = num_increments
            .unwrap_or(if metric {
                DEFAULT_METRIC_INCREMENTS
            } else {
                DEFAULT_ENGLISH_INCREMENTS
            })
            .max(1);
        let (increments_per_inch, decimal_places) = if metric {
            (MM_PER_INCH * num_increments as f64, METRIC_DECIMAL_PLACES)
        } else {
            (num_increments as f64, ENGLISH_DECIMAL_PLACES)
        };

        Self {
            metric,
            num_increments,
            increments_per_inch,
            english_separator: " ".to_string(),
            decimal_places,
            translator: translate::identity(),
        }
    }

    pub fn english(increments_per_inch: u32) -> Self {
        Self::new(MeasurementSystem::English, Some(increments_per_inch))
    }

    pub fn metric(increments_per_mm: u32) -> Self {
        Self::new(MeasurementSystem::Metric, Some(increments_per_mm))
    }

    /// Text placed between the whole part and the fraction, e.g. `1-1/2`
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.english_separator = separator.into();
        self
    }

    pub fn with_translator(mut self, translator: SharedTranslator) -> Self {
        self.translator = translator;
        self
    }

    pub fn is_metric(&self) -> bool {
        self.metric
    }

    pub fn system(&self) -> MeasurementSystem {
        if self.metric {
            MeasurementSystem::Metric
        } else {
            MeasurementSystem::English
        }
    }

    pub fn num_increments(&self) -> u32 {
        self.num_increments
    }

    pub fn increments_per_inch(&self) -> f64 {
        self.increments_per_inch
    }

    pub fn english_separator(&self) -> &str {
        &self.english_separator
    }

    pub fn decimal_places(&self) -> usize {
        self.decimal_places
    }

    pub fn translator(&self) -> &SharedTranslator {
        &self.translator
    }

    pub fn tr(&self, text: &str) -> String {
        self.translator.tr(text)
    }

    pub fn increments_to_inches(&self, increments: i64) -> f64 {
        increments as f64 / self.increments_per_inch
    }

    /// Converts increments to the current unit length.
    pub fn increments_to_length(&self, increments: i64) -> f64 {
        increments as f64 / self.num_increments as f64
    }

    pub fn inches_to_increments(&self, inches: f64) -> i64 {
        round_to_increment(self.increments_per_inch * inches)
    }

    /// Converts a length in the current unit to the nearest increment.
    pub fn length_to_increments(&self, length: f64) -> i64 {
        round_to_increment(self.length_to_increments_f64(length))
    }

    pub fn length_to_increments_f64(&self, length: f64) -> f64 {
        length * self.num_increments as f64
    }

    /// Parses a decimal or fractional length in the current unit.
    pub fn string_to_float(&self, s: &str) -> Result<f64, LengthParseError> {
        Ok(FractionValue::parse(s, &self.english_separator)?.to_f64())
    }

    pub fn string_to_increments(&self, s: &str) -> Result<i64, LengthParseError> {
        Ok(self.length_to_increments(self.string_to_float(s)?))
    }

    pub fn abstract_to_float(&self, input: LengthInput<'_>) -> Result<f64, LengthParseError> {
        match input {
            LengthInput::Text(s) => self.string_to_float(s),
            LengthInput::Value(v) => Ok(v),
        }
    }

    pub fn abstract_to_increments(&self, input: LengthInput<'_>) -> Result<i64, LengthParseError> {
        Ok(self.length_to_increments(self.abstract_to_float(input)?))
    }

    /// Human-readable form of an increment count in the current unit.
    pub fn increments_to_string(&self, increments: i64, with_units: bool) -> String {
        let mut s = if self.metric {
            self.quantized(increments as i128, self.num_increments as i128)
        } else {
            self.english_string(
                increments,
                self.num_increments as u64,
                increments as f64 / self.num_increments as f64,
            )
        };
        if with_units {
            s.push_str(&self.units_string(false, false));
        }
        s
    }

    /// Like [`increments_to_string`](Self::increments_to_string) for a
    /// fractional increment count. English values are scaled by
    /// [`FLOAT_INCREMENT_PRECISION`] and truncated before the fraction is
    /// formed.
    pub fn float_increments_to_string(&self, increments: f64, with_units: bool) -> String {
        let mut s = if self.metric {
            let scale = 10f64.powi(self.decimal_places as i32);
            let scaled = (increments / self.num_increments as f64 * scale).round() as i128;
            self.render_scaled(scaled)
        } else {
            let numerator = (FLOAT_INCREMENT_PRECISION as f64 * increments).trunc() as i64;
            let denominator = FLOAT_INCREMENT_PRECISION as u64 * self.num_increments as u64;
            self.english_string(
                numerator,
                denominator,
                increments / self.num_increments as f64,
            )
        };
        if with_units {
            s.push_str(&self.units_string(false, false));
        }
        s
    }

    /// Suffix naming the unit, such as `"` or ` (mm)`.
    pub fn units_string(&self, verbose: bool, with_parens: bool) -> String {
        let label = if self.metric {
            if verbose {
                "millimeters"
            } else {
                "mm"
            }
        } else if verbose {
            "inches"
        } else if with_parens {
            "in."
        } else {
            return "\"".to_string();
        };

        let label = self.translator.tr(label);
        if with_parens {
            format!(" ({})", label)
        } else {
            format!(" {}", label)
        }
    }

    fn english_string(&self, numerator: i64, denominator: u64, length: f64) -> String {
        let frac = FractionValue::new(0, numerator, Some(denominator)).reduce();
        if frac.numerator != 0 && !ALLOWED_DENOMINATORS.contains(&frac.reduced_denominator()) {
            format!("{:.*}", self.decimal_places, length)
        } else {
            frac.format(&self.english_separator)
        }
    }

    /// `numerator / denominator` rounded half away from zero to
    /// `decimal_places`, with trailing zeros dropped.
    fn quantized(&self, numerator: i128, denominator: i128) -> String {
        let scale = 10i128.pow(self.decimal_places as u32);
        let negative = (numerator < 0) != (denominator < 0);
        let n = numerator.abs() * scale;
        let d = denominator.abs();
        let q = (2 * n + d) / (2 * d);
        self.render_scaled(if negative { -q } else { q })
    }

    fn render_scaled(&self, scaled: i128) -> String {
        if scaled == 0 {
            return "0".to_string();
        }
        let scale = 10i128.pow(self.decimal_places as u32);
        let magnitude = scaled.abs();
        let mut s = String::new();
        if scaled < 0 {
            s.push('-');
        }
        s.push_str(&(magnitude / scale).to_string());
        let frac = magnitude % scale;
        if frac != 0 {
            let digits = format!("{:0width$}", frac, width = self.decimal_places);
            s.push('.');
            s.push_str(digits.trim_end_matches('0'));
        }
        s
    }
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self::new(MeasurementSystem::default(), None)
    }
}

impl PartialEq for UnitSystem {
    fn eq(&self, other: &Self) -> bool {
        self.metric == other.metric
            && self.num_increments == other.num_increments
            && self.english_separator == other.english_separator
    }
}

/// Nearest integer, ties away from zero
pub fn round_to_increment(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::CatalogTranslator;
    use std::sync::Arc;

    #[test]
    fn test_construction_invariants() {
        let en = UnitSystem::english(32);
        assert!(!en.is_metric());
        assert_eq!(en.increments_per_inch(), 32.0);
        assert_eq!(en.decimal_places(), 3);

        let mm = UnitSystem::metric(2);
        assert!(mm.is_metric());
        assert_eq!(mm.increments_per_inch(), 50.8);
        assert_eq!(mm.decimal_places(), 2);

        assert_eq!(UnitSystem::new(MeasurementSystem::Metric, None).num_increments(), 1);
        assert_eq!(UnitSystem::default().num_increments(), 32);
    }

    #[test]
    fn test_instances_keep_their_own_precision() {
        let en = UnitSystem::english(96);
        let mm = UnitSystem::metric(1);
        // building a metric system must not change how English values print
        assert_eq!(en.increments_to_string(1, false), "0.010");
        assert_eq!(mm.increments_to_string(3, false), "3");
        assert_eq!(en.increments_to_string(1, false), "0.010");
    }

    #[test]
    fn test_english_fractions() {
        let u = UnitSystem::english(32);
        assert_eq!(u.increments_to_string(0, false), "0");
        assert_eq!(u.increments_to_string(16, false), "1/2");
        assert_eq!(u.increments_to_string(48, false), "1 1/2");
        assert_eq!(u.increments_to_string(64, false), "2");
        assert_eq!(u.increments_to_string(-8, false), "-1/4");
        assert_eq!(u.increments_to_string(40, true), "1 1/4\"");

        let u = UnitSystem::english(32).with_separator("-");
        assert_eq!(u.increments_to_string(41, false), "1-9/32");
    }

    #[test]
    fn test_english_decimal_fallback() {
        let u = UnitSystem::english(96);
        assert_eq!(u.increments_to_string(48, false), "1/2");
        assert_eq!(u.increments_to_string(32, false), "0.333");
        assert_eq!(u.increments_to_string(100, false), "1.042");
    }

    #[test]
    fn test_float_increments() {
        let u = UnitSystem::english(32);
        assert_eq!(u.float_increments_to_string(16.0, false), "1/2");
        assert_eq!(u.float_increments_to_string(0.5, false), "1/64");
        assert_eq!(u.float_increments_to_string(1.25, false), "0.039");

        let mm = UnitSystem::metric(1);
        assert_eq!(mm.float_increments_to_string(12.346, false), "12.35");
        assert_eq!(mm.float_increments_to_string(7.0, true), "7 mm");
    }

    #[test]
    fn test_metric_strings() {
        let mm = UnitSystem::metric(1);
        assert_eq!(mm.increments_to_string(25, false), "25");
        assert_eq!(mm.increments_to_string(-4, true), "-4 mm");

        let mm = UnitSystem::metric(4);
        assert_eq!(mm.increments_to_string(10, false), "2.5");
        assert_eq!(mm.increments_to_string(1, false), "0.25");

        let mm = UnitSystem::metric(3);
        assert_eq!(mm.increments_to_string(1, false), "0.33");
        assert_eq!(mm.increments_to_string(2, false), "0.67");
    }

    #[test]
    fn test_conversions_round_half_away() {
        let u = UnitSystem::english(32);
        assert_eq!(u.inches_to_increments(0.5), 16);
        assert_eq!(u.length_to_increments(1.0 / 64.0), 1);
        assert_eq!(u.length_to_increments(-1.0 / 64.0), -1);
        assert_eq!(u.increments_to_inches(8), 0.25);
        assert_eq!(u.increments_to_length(48), 1.5);
        assert_eq!(u.length_to_increments_f64(0.1), 3.2);

        let mm = UnitSystem::metric(1);
        assert_eq!(mm.inches_to_increments(1.0), 25);
        assert_eq!(mm.increments_to_length(13), 13.0);
    }

    #[test]
    fn test_string_parsing() {
        let u = UnitSystem::english(32);
        assert_eq!(u.string_to_float("1 1/2").unwrap(), 1.5);
        assert_eq!(u.string_to_increments("1 1/2").unwrap(), 48);
        assert_eq!(u.string_to_increments("0.25").unwrap(), 8);
        assert_eq!(u.string_to_increments("3").unwrap(), 96);
        assert!(u.string_to_increments("1 1/2/3").is_err());

        let mm = UnitSystem::metric(1);
        assert_eq!(mm.string_to_increments("12.6").unwrap(), 13);
    }

    #[test]
    fn test_abstract_inputs() {
        let u = UnitSystem::english(32);
        assert_eq!(u.abstract_to_float("3/4".into()).unwrap(), 0.75);
        assert_eq!(u.abstract_to_float(0.75.into()).unwrap(), 0.75);
        assert_eq!(u.abstract_to_increments(LengthInput::Value(2.0)).unwrap(), 64);
    }

    #[test]
    fn test_units_string() {
        let en = UnitSystem::english(32);
        assert_eq!(en.units_string(false, false), "\"");
        assert_eq!(en.units_string(false, true), " (in.)");
        assert_eq!(en.units_string(true, false), " inches");

        let mm = UnitSystem::metric(1);
        assert_eq!(mm.units_string(false, false), " mm");
        assert_eq!(mm.units_string(true, true), " (millimeters)");

        let fr = UnitSystem::metric(1)
            .with_translator(Arc::new(CatalogTranslator::new().with_entry("mm", "millim.")));
        assert_eq!(fr.units_string(false, false), " millim.");
    }

    #[test]
    fn test_measurement_system_parse() {
        assert_eq!("mm".parse::<MeasurementSystem>().unwrap(), MeasurementSystem::Metric);
        assert_eq!("Inch".parse::<MeasurementSystem>().unwrap(), MeasurementSystem::English);
        assert!("furlong".parse::<MeasurementSystem>().is_err());
        assert_eq!(MeasurementSystem::English.to_string(), "English");
    }
}
