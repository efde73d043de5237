//! Display Formatting Helpers
//!
//! Functions for rendering converted channel values for people. Values are
//! stored in °C and device units; conversion to the preferred temperature
//! scale only happens here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::PhysicalValue;

/// Temperature scale used when printing platinum sensor values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    /// Convert a Celsius value into this unit
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
            TemperatureUnit::Kelvin => celsius_to_kelvin(celsius),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Kelvin => "kelvin",
        };
        f.write_str(name)
    }
}

/// Convert Celsius to Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert Celsius to Kelvin
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}

/// Format a temperature with explicit unit and precision
///
/// # Returns
/// Formatted string like "21.500°C" or "70.70°F"
pub fn format_temperature(celsius: f64, unit: TemperatureUnit, precision: usize) -> String {
    format!("{:.*}{}", precision, unit.from_celsius(celsius), unit.suffix())
}

/// Format a converted channel value with its units
///
/// Platinum sensor values go through [`format_temperature`]; everything
/// else is printed in the device units of its sensor type.
pub fn format_value(value: &PhysicalValue, unit: TemperatureUnit, precision: usize) -> String {
    if value.sensor_type.is_temperature() {
        return format_temperature(value.value, unit, precision);
    }
    match value.units() {
        "" => format!("{:.*}", precision, value.value),
        units => format!("{:.*} {}", precision, value.value, units),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ChannelIndex, SensorType};

    fn value(sensor_type: SensorType, value: f64) -> PhysicalValue {
        PhysicalValue {
            channel: ChannelIndex::new(1).unwrap(),
            sensor_type,
            raw_counts: 0,
            value,
        }
    }

    #[test]
    fn test_conversions() {
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert!((celsius_to_kelvin(25.0) - 298.15).abs() < 1e-9);
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(21.5, TemperatureUnit::Celsius, 3), "21.500°C");
        assert_eq!(format_temperature(100.0, TemperatureUnit::Fahrenheit, 1), "212.0°F");
        assert_eq!(format_temperature(0.0, TemperatureUnit::Kelvin, 2), "273.15K");
    }

    #[test]
    fn test_format_value_uses_sensor_units() {
        let pt = value(SensorType::Pt100, 25.0);
        assert_eq!(format_value(&pt, TemperatureUnit::Celsius, 2), "25.00°C");

        let ohms = value(SensorType::Resistance10k, 4700.0);
        assert_eq!(format_value(&ohms, TemperatureUnit::Fahrenheit, 0), "4700 mΩ");

        let volts = value(SensorType::DifferentialVoltage115mV, 0.001);
        assert_eq!(format_value(&volts, TemperatureUnit::Celsius, 4), "0.0010 mV");
    }

    #[test]
    fn test_unit_serde() {
        let unit: TemperatureUnit = serde_json::from_str("\"kelvin\"").unwrap();
        assert_eq!(unit, TemperatureUnit::Kelvin);
        assert_eq!(serde_json::to_string(&TemperatureUnit::Fahrenheit).unwrap(), "\"fahrenheit\"");
    }
}
