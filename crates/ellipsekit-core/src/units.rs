//! Unit-tagged quantities
//!
//! Move-to commands carry every numeric setting together with its unit, the
//! way the host's program tree stores them. SI units (m, rad, m/s, m/s²) are
//! the canonical form used by the ring geometry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A unit that can be converted to its SI base
pub trait Unit: Copy + fmt::Display {
    /// Multiplier converting a value in this unit to SI
    fn si_factor(self) -> f64;
}

/// Length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LengthUnit {
    /// Meters
    #[default]
    #[serde(rename = "m")]
    Meter,
    /// Millimeters
    #[serde(rename = "mm")]
    Millimeter,
}

impl Unit for LengthUnit {
    fn si_factor(self) -> f64 {
        match self {
            Self::Meter => 1.0,
            Self::Millimeter => 0.001,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meter => write!(f, "m"),
            Self::Millimeter => write!(f, "mm"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(Self::Meter),
            "mm" | "millimeter" | "millimeters" => Ok(Self::Millimeter),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Angle unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AngleUnit {
    /// Radians
    #[default]
    #[serde(rename = "rad")]
    Radian,
    /// Degrees
    #[serde(rename = "deg")]
    Degree,
}

impl Unit for AngleUnit {
    fn si_factor(self) -> f64 {
        match self {
            Self::Radian => 1.0,
            Self::Degree => std::f64::consts::PI / 180.0,
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radian => write!(f, "rad"),
            Self::Degree => write!(f, "deg"),
        }
    }
}

/// Tool speed unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedUnit {
    /// Meters per second
    #[default]
    #[serde(rename = "m/s")]
    MeterPerSecond,
    /// Millimeters per second
    #[serde(rename = "mm/s")]
    MillimeterPerSecond,
}

impl Unit for SpeedUnit {
    fn si_factor(self) -> f64 {
        match self {
            Self::MeterPerSecond => 1.0,
            Self::MillimeterPerSecond => 0.001,
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MeterPerSecond => write!(f, "m/s"),
            Self::MillimeterPerSecond => write!(f, "mm/s"),
        }
    }
}

/// Tool acceleration unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccelerationUnit {
    /// Meters per second squared
    #[default]
    #[serde(rename = "m/s^2")]
    MeterPerSecondSquared,
    /// Millimeters per second squared
    #[serde(rename = "mm/s^2")]
    MillimeterPerSecondSquared,
}

impl Unit for AccelerationUnit {
    fn si_factor(self) -> f64 {
        match self {
            Self::MeterPerSecondSquared => 1.0,
            Self::MillimeterPerSecondSquared => 0.001,
        }
    }
}

impl fmt::Display for AccelerationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MeterPerSecondSquared => write!(f, "m/s^2"),
            Self::MillimeterPerSecondSquared => write!(f, "mm/s^2"),
        }
    }
}

/// A numeric value tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity<U> {
    /// Raw value expressed in `unit`
    pub value: f64,
    /// Unit of `value`
    pub unit: U,
}

impl<U: Unit> Quantity<U> {
    /// Create a quantity
    pub fn new(value: f64, unit: U) -> Self {
        Self { value, unit }
    }

    /// Value converted to the SI base unit
    pub fn to_si(&self) -> f64 {
        self.value * self.unit.si_factor()
    }

    /// Re-express this quantity in another unit
    pub fn convert_to(&self, unit: U) -> Self {
        Self {
            value: self.to_si() / unit.si_factor(),
            unit,
        }
    }
}

impl<U: Unit> fmt::Display for Quantity<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} {}", self.value, self.unit)
    }
}

/// Length with unit
pub type Length = Quantity<LengthUnit>;
/// Angle with unit
pub type Angle = Quantity<AngleUnit>;
/// Speed with unit
pub type Speed = Quantity<SpeedUnit>;
/// Acceleration with unit
pub type Acceleration = Quantity<AccelerationUnit>;

impl Length {
    /// Length in meters
    pub fn meters(value: f64) -> Self {
        Self::new(value, LengthUnit::Meter)
    }
}

impl Angle {
    /// Angle in radians
    pub fn radians(value: f64) -> Self {
        Self::new(value, AngleUnit::Radian)
    }
}

impl Speed {
    /// Speed in meters per second
    pub fn meters_per_second(value: f64) -> Self {
        Self::new(value, SpeedUnit::MeterPerSecond)
    }
}

impl Acceleration {
    /// Acceleration in meters per second squared
    pub fn meters_per_second_squared(value: f64) -> Self {
        Self::new(value, AccelerationUnit::MeterPerSecondSquared)
    }
}

/// Parse a length string into meters
///
/// Accepts a bare number (interpreted in `default_unit`) or a number followed
/// by a unit suffix, e.g. `"200 mm"`, `"0.2m"`.
pub fn parse_length(input: &str, default_unit: LengthUnit) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty length".to_string());
    }

    // unit is the trailing alphabetic run, so exponents stay with the number
    let split = input
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .len();
    let (number, suffix) = input.split_at(split);
    let value = number
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("Invalid length '{}': {}", input, e))?;

    let unit = if suffix.trim().is_empty() {
        default_unit
    } else {
        suffix.parse::<LengthUnit>()?
    };

    Ok(value * unit.si_factor())
}

/// Format a length in meters for display in the given unit
pub fn format_length(value_m: f64, unit: LengthUnit) -> String {
    format!("{:.3} {}", value_m / unit.si_factor(), unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversion() {
        let l = Length::new(200.0, LengthUnit::Millimeter);
        assert!((l.to_si() - 0.2).abs() < 1e-12);
        let m = l.convert_to(LengthUnit::Meter);
        assert_eq!(m.unit, LengthUnit::Meter);
        assert!((m.value - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_angle_conversion() {
        let a = Angle::new(180.0, AngleUnit::Degree);
        assert!((a.to_si() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_parse_length() {
        assert!((parse_length("200 mm", LengthUnit::Meter).unwrap() - 0.2).abs() < 1e-12);
        assert!((parse_length("0.12m", LengthUnit::Millimeter).unwrap() - 0.12).abs() < 1e-12);
        assert!((parse_length("  3 ", LengthUnit::Millimeter).unwrap() - 0.003).abs() < 1e-12);
        assert!((parse_length("-5", LengthUnit::Meter).unwrap() + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_length_exponent() {
        assert!((parse_length("1e-3 m", LengthUnit::Millimeter).unwrap() - 0.001).abs() < 1e-12);
        assert!((parse_length("2E2mm", LengthUnit::Meter).unwrap() - 0.2).abs() < 1e-12);
        assert!((parse_length("5e2", LengthUnit::Millimeter).unwrap() - 0.5).abs() < 1e-12);
        assert!(parse_length("1e", LengthUnit::Meter).is_err());
    }

    #[test]
    fn test_parse_length_invalid() {
        assert!(parse_length("", LengthUnit::Meter).is_err());
        assert!(parse_length("abc", LengthUnit::Meter).is_err());
        assert!(parse_length("2 furlongs", LengthUnit::Meter).is_err());
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(0.2, LengthUnit::Millimeter), "200.000 mm");
        assert_eq!(format_length(0.2, LengthUnit::Meter), "0.200 m");
    }

    #[test]
    fn test_unit_serialization() {
        let speed = Speed::meters_per_second(0.25);
        let json = serde_json::to_string(&speed).unwrap();
        assert_eq!(json, r#"{"value":0.25,"unit":"m/s"}"#);
        let back: Speed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, speed);
    }
}
