use std::collections::BTreeMap;
use serde::Serialize;
use serde_json::Value;

/// Air quality for a location, as shown on the radar page
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AirQuality {
    pub aqi: Option<u8>,
    pub components: BTreeMap<String, f64>,
}

impl AirQuality {
    /// Extracts the air quality index and pollutant concentrations from an `/air_pollution`
    /// document. Anything not matching the expected shape gives an empty result rather than
    /// an error.
    ///
    /// # Arguments
    ///
    /// * 'doc' - the decoded air pollution document
    pub fn from_document(doc: &Value) -> Self {
        let Some(first) = doc.get("list").and_then(|l| l.get(0)) else {
            return Self::default();
        };
        let Some(aqi) = first.pointer("/main/aqi").and_then(Value::as_u64) else {
            return Self::default();
        };
        let Some(components) = first.get("components").and_then(Value::as_object) else {
            return Self::default();
        };

        Self {
            aqi: u8::try_from(aqi).ok(),
            components: components
                .iter()
                .filter_map(|(k, v)| v.as_f64().map(|v| (k.clone(), v)))
                .collect(),
        }
    }

    pub fn description(&self) -> &'static str {
        aqi_description(self.aqi)
    }
}

/// Maps the OpenWeatherMap air quality index (1-5) to a description
///
/// # Arguments
///
/// * 'aqi' - air quality index
pub fn aqi_description(aqi: Option<u8>) -> &'static str {
    match aqi {
        Some(1) => "Good",
        Some(2) => "Fair",
        Some(3) => "Moderate",
        Some(4) => "Poor",
        Some(5) => "Very Poor",
        _ => "N/A",
    }
}
