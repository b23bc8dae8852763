use super::WeatherContext;
use crate::types::{Tool, ToolError};

use schemars::JsonSchema;
use serde::Deserialize;

const RAIN_PROBABILITY: &str = "0.06";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename = "get_rain_probability")]
#[schemars(description = "Get the probability of rain for a specific location")]
pub struct RainProbability {
    #[serde(default)]
    #[schemars(description = "The city and state, e.g., San Francisco, CA")]
    pub location: String,
}

impl Tool for RainProbability {
    type Context = WeatherContext;

    fn apply(&self, _: &Self::Context) -> Result<String, ToolError> {
        tracing::debug!(location = %self.location, "rain probability is a fixed estimate");
        Ok(RAIN_PROBABILITY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_reports_the_same_probability() {
        let context = WeatherContext::default();
        for location in ["Paris", "", "Springfield, ??", "東京"] {
            let tool = RainProbability {
                location: location.to_string(),
            };
            assert_eq!(tool.apply(&context).unwrap(), "0.06");
        }
    }
}
