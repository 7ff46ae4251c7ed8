use std::env;
use std::fs;
use std::path::PathBuf;
use log::warn;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::logging::setup_logger;
use crate::manager_forecast::KeyMode;
use crate::manager_owm::Units;

const CONFIG_PATH_VAR: &str = "WEATHERFRONT_CONFIG";
const API_KEY_VAR: &str = "WEATHER_API_KEY";
const OWM_BASE: &str = "http://api.openweathermap.org/data/2.5";

#[derive(Deserialize, Debug, Clone)]
pub struct WebServer {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OWMParameters {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_current_weather_url")]
    pub current_weather_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    #[serde(default)]
    pub units: Units,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ForecastParameters {
    #[serde(default)]
    pub day_key: KeyMode,
    #[serde(default = "default_max_days")]
    pub max_days: usize,
}

impl Default for ForecastParameters {
    fn default() -> Self {
        Self { day_key: KeyMode::default(), max_days: default_max_days() }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Cities {
    #[serde(default = "default_featured")]
    pub featured: Vec<String>,
    #[serde(default = "default_location")]
    pub default_location: String,
}

impl Default for Cities {
    fn default() -> Self {
        Self { featured: default_featured(), default_location: default_location() }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct General {
    pub log_path: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_to_stdout")]
    pub log_to_stdout: bool,
}

impl Default for General {
    fn default() -> Self {
        Self { log_path: None, log_level: default_log_level(), log_to_stdout: default_log_to_stdout() }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub web_server: WebServer,
    pub owm: OWMParameters,
    #[serde(default)]
    pub forecast: ForecastParameters,
    #[serde(default)]
    pub cities: Cities,
    #[serde(default)]
    pub general: General,
}

fn default_current_weather_url() -> String { format!("{}/weather", OWM_BASE) }
fn default_forecast_url() -> String { format!("{}/forecast", OWM_BASE) }
fn default_air_quality_url() -> String { format!("{}/air_pollution", OWM_BASE) }
fn default_timeout() -> u64 { 30 }
fn default_max_days() -> usize { 5 }
fn default_location() -> String { "London".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_log_to_stdout() -> bool { true }

fn default_featured() -> Vec<String> {
    ["London", "New York", "Tokyo", "Sydney", "Paris"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// Loads the configuration and sets up logging
///
/// The config file is read from the path given in `WEATHERFRONT_CONFIG`, or `config.toml`
/// in the working directory. Variables in a `.env` file are loaded before anything else,
/// and `WEATHER_API_KEY` takes precedence over the api key in the file.
pub fn config() -> Result<Config, ConfigError> {
    let dotenv_warning = dotenv_problem(dotenvy::dotenv());

    let config_path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    let toml = fs::read_to_string(&config_path)?;

    let config = load_config(&toml, env::var(API_KEY_VAR).ok())?;
    setup_logger(&config.general)?;

    if let Some(problem) = dotenv_warning {
        warn!("failed to load .env file: {}", problem);
    }

    Ok(config)
}

/// Returns a description of what went wrong loading the .env file, if anything did.
/// A missing file is not a problem, the environment may be set up by other means.
///
/// # Arguments
///
/// * 'result' - outcome of loading the .env file
fn dotenv_problem(result: Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e.to_string()),
    }
}

/// Parses and validates a configuration
///
/// # Arguments
///
/// * 'toml' - the configuration file contents
/// * 'api_key' - api key overriding whatever is given in the file
fn load_config(toml: &str, api_key: Option<String>) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(toml)?;

    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.owm.api_key = key;
    }

    if config.owm.api_key.trim().is_empty() {
        return Err(ConfigError::from("no OpenWeatherMap api key given, set owm.api_key or WEATHER_API_KEY"));
    }
    if config.cities.default_location.trim().is_empty() {
        return Err(ConfigError::from("cities.default_location must not be empty"));
    }

    Ok(config)
}
