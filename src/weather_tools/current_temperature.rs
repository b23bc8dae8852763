use super::WeatherContext;
use crate::types::{Tool, ToolError};

use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const TEMPERATURE_RANGE: std::ops::RangeInclusive<i32> = 30..=50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl FromStr for TemperatureUnit {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Celsius" => Ok(Self::Celsius),
            "Fahrenheit" => Ok(Self::Fahrenheit),
            other => Err(ToolError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius => f.write_str("Celsius"),
            Self::Fahrenheit => f.write_str("Fahrenheit"),
        }
    }
}

// `unit` stays a string so an unknown unit reaches the handler and comes
// back as `InvalidUnit` instead of a deserialization error
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename = "get_current_temperature")]
#[schemars(description = "Get the current temperature for a specific location")]
pub struct CurrentTemperature {
    #[serde(default = "default_location")]
    #[schemars(description = "The city and state, e.g., San Francisco, CA")]
    pub location: String,

    #[serde(default = "default_unit")]
    #[schemars(
        with = "TemperatureUnit",
        description = "The temperature unit to use. Infer this from the user's location."
    )]
    pub unit: String,
}

fn default_location() -> String {
    "Unknown Location".to_string()
}

fn default_unit() -> String {
    TemperatureUnit::Celsius.to_string()
}

impl Tool for CurrentTemperature {
    type Context = WeatherContext;

    fn apply(&self, context: &Self::Context) -> Result<String, ToolError> {
        let unit: TemperatureUnit = self.unit.parse()?;
        let temperature = context.thermometer().read(TEMPERATURE_RANGE);
        tracing::debug!(location = %self.location, %unit, temperature, "read temperature");
        Ok(format!("{temperature} {unit}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather_tools::testing::FixedThermometer;

    fn request(json: &str) -> CurrentTemperature {
        serde_json::from_str(json).unwrap()
    }

    fn parse_reading(output: &str) -> (i32, &str) {
        let (value, unit) = output.split_once(' ').unwrap();
        (value.parse().unwrap(), unit)
    }

    #[test]
    fn reports_value_in_range_for_both_units() {
        let context = WeatherContext::default();
        for unit in ["Celsius", "Fahrenheit"] {
            for _ in 0..50 {
                let args = format!(r#"{{"location":"Paris","unit":"{unit}"}}"#);
                let output = request(&args).apply(&context).unwrap();
                let (value, reported_unit) = parse_reading(&output);
                assert!(TEMPERATURE_RANGE.contains(&value), "{output}");
                assert_eq!(reported_unit, unit);
            }
        }
    }

    #[test]
    fn unit_defaults_to_celsius() {
        let context = WeatherContext::new(FixedThermometer(42));
        let output = request(r#"{"location":"Oslo"}"#).apply(&context).unwrap();
        assert_eq!(output, "42 Celsius");
    }

    #[test]
    fn missing_location_is_allowed() {
        let tool = request("{}");
        assert_eq!(tool.location, "Unknown Location");
        assert_eq!(tool.unit, "Celsius");
    }

    #[test]
    fn uses_injected_thermometer() {
        let context = WeatherContext::new(FixedThermometer(33));
        let output = request(r#"{"location":"Austin, TX","unit":"Fahrenheit"}"#)
            .apply(&context)
            .unwrap();
        assert_eq!(output, "33 Fahrenheit");
    }

    #[test]
    fn rejects_unknown_unit() {
        let context = WeatherContext::new(FixedThermometer(40));
        let result = request(r#"{"location":"Paris","unit":"Kelvin"}"#).apply(&context);
        assert_eq!(result, Err(ToolError::InvalidUnit("Kelvin".to_string())));
    }

    #[test]
    fn unit_names_are_case_sensitive() {
        assert!("celsius".parse::<TemperatureUnit>().is_err());
        assert_eq!(
            "Fahrenheit".parse::<TemperatureUnit>(),
            Ok(TemperatureUnit::Fahrenheit)
        );
    }
}
