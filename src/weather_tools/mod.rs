mod current_temperature;
mod rain_probability;

use crate::types::{ToolSet, ToolSetCreationError};

use current_temperature::CurrentTemperature;
use rain_probability::RainProbability;

use rand::Rng;
use std::ops::RangeInclusive;

/// Source of temperature readings. The built-in tool is a stub, so the
/// default implementation draws from a random number generator.
pub trait Thermometer {
    fn read(&self, range: RangeInclusive<i32>) -> i32;
}

pub struct RandomThermometer;

impl Thermometer for RandomThermometer {
    fn read(&self, range: RangeInclusive<i32>) -> i32 {
        rand::rng().random_range(range)
    }
}

/// Capabilities handed to every weather tool invocation.
pub struct WeatherContext {
    thermometer: Box<dyn Thermometer + Send + Sync>,
}

impl WeatherContext {
    pub fn new(thermometer: impl Thermometer + Send + Sync + 'static) -> Self {
        Self {
            thermometer: Box::new(thermometer),
        }
    }

    pub fn thermometer(&self) -> &dyn Thermometer {
        self.thermometer.as_ref()
    }
}

impl Default for WeatherContext {
    fn default() -> Self {
        Self::new(RandomThermometer)
    }
}

pub fn weather_toolset() -> Result<ToolSet<WeatherContext>, ToolSetCreationError> {
    ToolSet::new()
        .add_tool::<CurrentTemperature>()?
        .add_tool::<RainProbability>()
}
