//! Built-in demo tools: `getLocation` and `getCurrentWeather`.
//!
//! Both return fixed values from the `[tools]` configuration section.

use super::tools::{Tool, ToolRegistry};
use crate::config::ToolSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub const GET_LOCATION: &str = "getLocation";
pub const GET_CURRENT_WEATHER: &str = "getCurrentWeather";

/// Reports the user's location. Takes no argument.
pub struct GetLocation {
    location: String,
}

impl GetLocation {
    pub fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
        }
    }
}

#[async_trait]
impl Tool for GetLocation {
    fn name(&self) -> &str {
        GET_LOCATION
    }

    fn description(&self) -> &str {
        "Returns user's location details. No arguments needed."
    }

    fn example(&self) -> Option<&str> {
        Some("null")
    }

    async fn call(&self, _argument: &str) -> Result<Value> {
        Ok(Value::String(self.location.clone()))
    }
}

/// Weather report returned by [`GetCurrentWeather`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: String,
    pub unit: String,
    pub forecast: String,
}

/// Reports the weather for a location.
pub struct GetCurrentWeather {
    settings: ToolSettings,
}

impl GetCurrentWeather {
    pub fn new(settings: &ToolSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    fn report(&self, argument: &str) -> WeatherReport {
        // "null" is how the prompt spells a missing argument
        let location = match argument {
            "" | "null" => self.settings.location.clone(),
            other => other.to_string(),
        };
        WeatherReport {
            location,
            temperature: self.settings.temperature.clone(),
            unit: self.settings.unit.clone(),
            forecast: self.settings.forecast.clone(),
        }
    }
}

#[async_trait]
impl Tool for GetCurrentWeather {
    fn name(&self) -> &str {
        GET_CURRENT_WEATHER
    }

    fn description(&self) -> &str {
        "Returns the current weather of the location specified."
    }

    fn example(&self) -> Option<&str> {
        Some("Salt Lake City")
    }

    async fn call(&self, argument: &str) -> Result<Value> {
        Ok(serde_json::to_value(self.report(argument))?)
    }
}

/// Registry holding the two built-in tools.
pub fn builtin_registry(settings: &ToolSettings) -> ToolRegistry {
    ToolRegistry::builder()
        .tool(GetLocation::new(&settings.location))
        .tool(GetCurrentWeather::new(settings))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_location_ignores_argument() {
        let tool = GetLocation::new("Salt Lake City, UT");
        assert_eq!(
            tokio_test::block_on(tool.call("null")).unwrap(),
            json!("Salt Lake City, UT")
        );
        assert_eq!(
            tokio_test::block_on(tool.call("anything")).unwrap(),
            json!("Salt Lake City, UT")
        );
    }

    #[tokio::test]
    async fn test_weather_report() {
        let tool = GetCurrentWeather::new(&ToolSettings::default());
        assert_eq!(
            tool.call("New York City").await.unwrap(),
            json!({
                "location": "New York City",
                "temperature": "72",
                "unit": "F",
                "forecast": "sunny"
            })
        );
    }

    #[tokio::test]
    async fn test_weather_defaults_to_configured_location() {
        let settings = ToolSettings {
            location: "Tromsø, NO".to_string(),
            forecast: "snow".to_string(),
            ..ToolSettings::default()
        };
        let tool = GetCurrentWeather::new(&settings);
        let report = tool.call("null").await.unwrap();
        assert_eq!(report["location"], "Tromsø, NO");
        assert_eq!(report["forecast"], "snow");
    }

    #[test]
    fn test_builtin_catalog() {
        let registry = builtin_registry(&ToolSettings::default());
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec![GET_CURRENT_WEATHER, GET_LOCATION]
        );
        let catalog = registry.catalog();
        assert!(catalog.contains("    E.g. getLocation: null\n"));
        assert!(catalog.contains("    E.g. getCurrentWeather: Salt Lake City\n"));
    }
}
