use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::manager_forecast::{FieldMissing, ForecastSample};

/// Unit system requested from OpenWeatherMap
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Standard,
    Metric,
    #[default]
    Imperial,
}

impl Units {
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Standard => "K",
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            Units::Standard | Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Condition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MainValues {
    pub temp: f64,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Wind {
    pub speed: f64,
    pub deg: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Sys {
    pub country: Option<String>,
}

/// Current weather as returned by the `/weather` endpoint
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CurrentWeather {
    pub name: String,
    pub coord: Coord,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: MainValues,
    pub wind: Wind,
    #[serde(default)]
    pub sys: Sys,
}

impl CurrentWeather {
    /// First reported condition, OpenWeatherMap lists the primary one first
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

/// Root of the `/forecast` document
///
/// Entries are kept as raw json so that one broken entry doesn't reject the whole feed.
#[derive(Deserialize)]
pub struct FullForecast {
    pub list: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawMain {
    temp: Option<f64>,
}

#[derive(Deserialize)]
struct RawCondition {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Deserialize)]
struct RawEntry {
    dt: Option<i64>,
    dt_txt: Option<String>,
    main: Option<RawMain>,
    #[serde(default)]
    weather: Vec<RawCondition>,
}

impl TryFrom<RawEntry> for ForecastSample {
    type Error = FieldMissing;

    fn try_from(entry: RawEntry) -> Result<Self, Self::Error> {
        let timestamp = entry.dt_txt
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S").ok())
            .map(|t| t.and_utc())
            .or_else(|| entry.dt.and_then(|dt| DateTime::<Utc>::from_timestamp(dt, 0)))
            .ok_or(FieldMissing("dt_txt"))?;

        let temperature = entry.main
            .and_then(|m| m.temp)
            .ok_or(FieldMissing("main.temp"))?;

        let condition = entry.weather
            .into_iter()
            .next()
            .ok_or(FieldMissing("weather"))?;
        let condition_text = condition.description.ok_or(FieldMissing("weather.description"))?;

        Ok(ForecastSample {
            timestamp,
            temperature,
            condition_text,
            condition_icon: condition.icon,
        })
    }
}

/// Decodes one entry of the forecast list
///
/// # Arguments
///
/// * 'value' - raw json entry
pub fn decode_sample(value: serde_json::Value) -> Result<ForecastSample, FieldMissing> {
    let entry: RawEntry = serde_json::from_value(value).map_err(|_| FieldMissing("entry"))?;
    ForecastSample::try_from(entry)
}
