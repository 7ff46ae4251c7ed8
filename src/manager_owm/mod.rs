pub mod errors;
mod models;

use std::time::Duration;
use log::debug;
use reqwest::{Client, StatusCode};
use crate::air_quality::AirQuality;
use crate::initialization::OWMParameters;
use crate::manager_forecast::{FieldMissing, ForecastSample};
use crate::manager_owm::errors::OWMError;
use crate::manager_owm::models::{decode_sample, FullForecast};

pub use crate::manager_owm::models::{CurrentWeather, Units};

/// Struct for fetching current weather, forecasts and air quality from OpenWeatherMap
#[derive(Clone)]
pub struct OWM {
    client: Client,
    params: OWMParameters,
}

impl OWM {
    /// Returns an OWM struct ready for fetching data from OpenWeatherMap
    ///
    /// # Arguments
    ///
    /// * 'params' - api key, endpoint urls, units and timeout
    pub fn new(params: &OWMParameters) -> Result<OWM, OWMError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(params.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            params: params.clone(),
        })
    }

    /// Retrieves current weather for a location
    ///
    /// # Arguments
    ///
    /// * 'location' - city name, optionally followed by a country, e.g. "Paris, FR"
    pub async fn current_weather(&self, location: &str) -> Result<CurrentWeather, OWMError> {
        let json = self.get(&self.params.current_weather_url, &self.location_query(location)).await?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Retrieves the 5 day / 3 hour forecast for a location.
    ///
    /// Every entry of the feed is returned in feed order, entries that can't be decoded
    /// into a sample are returned as `FieldMissing` for the caller to skip.
    ///
    /// # Arguments
    ///
    /// * 'location' - city name, optionally followed by a country
    pub async fn forecast(&self, location: &str) -> Result<Vec<Result<ForecastSample, FieldMissing>>, OWMError> {
        let json = self.get(&self.params.forecast_url, &self.location_query(location)).await?;
        let forecast: FullForecast = serde_json::from_str(&json)?;

        debug!("forecast for {} holds {} entries", location, forecast.list.len());

        Ok(forecast.list.into_iter().map(decode_sample).collect())
    }

    /// Retrieves the current air quality at a coordinate
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the location
    /// * 'lon' - longitude of the location
    pub async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality, OWMError> {
        let query = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", self.params.api_key.clone()),
        ];
        let json = self.get(&self.params.air_quality_url, &query).await?;
        let doc: serde_json::Value = serde_json::from_str(&json)?;

        Ok(AirQuality::from_document(&doc))
    }

    fn location_query(&self, location: &str) -> [(&'static str, String); 3] {
        [
            ("q", location.to_string()),
            ("appid", self.params.api_key.clone()),
            ("units", self.params.units.as_query().to_string()),
        ]
    }

    /// Makes a GET request and returns the body of a successful response
    ///
    /// # Arguments
    ///
    /// * 'url' - endpoint url
    /// * 'query' - query parameters
    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<String, OWMError> {
        let req = self.client
            .get(url)
            .query(query)
            .send().await?;

        let status = req.status();
        if status == StatusCode::NOT_FOUND {
            return Err(OWMError::NotFound(format!("nothing found at {}", url)));
        }
        if !status.is_success() {
            return Err(OWMError::Status(status.as_u16(), format!("Error while fetching from OpenWeatherMap: {}", status)));
        }

        Ok(req.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params(server: &MockServer) -> OWMParameters {
        OWMParameters {
            api_key: "test-key".to_string(),
            current_weather_url: format!("{}/weather", server.uri()),
            forecast_url: format!("{}/forecast", server.uri()),
            air_quality_url: format!("{}/air_pollution", server.uri()),
            units: Units::Imperial,
            timeout_secs: 5,
        }
    }

    fn london() -> serde_json::Value {
        json!({
            "coord": { "lon": -0.1257, "lat": 51.5085 },
            "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
            "main": { "temp": 52.3, "feels_like": 50.1, "temp_min": 50.0, "temp_max": 54.0, "pressure": 1012, "humidity": 81 },
            "wind": { "speed": 9.22, "deg": 240 },
            "sys": { "country": "GB" },
            "name": "London",
            "cod": 200
        })
    }

    #[tokio::test]
    async fn current_weather_sends_location_key_and_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london()))
            .expect(1)
            .mount(&server)
            .await;

        let owm = OWM::new(&params(&server)).unwrap();
        let weather = owm.current_weather("London").await.unwrap();

        assert_eq!(weather.name, "London");
        assert_eq!(weather.coord, models::Coord { lat: 51.5085, lon: -0.1257 });
        assert_eq!(weather.main.temp, 52.3);
        assert_eq!(weather.wind.speed, 9.22);
        assert_eq!(weather.condition().map(|c| c.description.as_str()), Some("broken clouds"));
        assert_eq!(weather.sys.country.as_deref(), Some("GB"));
    }

    #[tokio::test]
    async fn unknown_location_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })))
            .mount(&server)
            .await;

        let owm = OWM::new(&params(&server)).unwrap();
        let err = owm.current_weather("Nowhere").await.unwrap_err();

        assert!(matches!(err, OWMError::NotFound(_)));
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn other_statuses_are_passed_on() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let owm = OWM::new(&params(&server)).unwrap();
        let err = owm.current_weather("London").await.unwrap_err();

        assert_eq!(err.status_code(), Some(401));
    }

    #[tokio::test]
    async fn malformed_current_weather_is_document_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let owm = OWM::new(&params(&server)).unwrap();
        let err = owm.current_weather("London").await.unwrap_err();

        assert!(matches!(err, OWMError::Document(_)));
        assert_eq!(err.status_code(), None);
    }

    #[tokio::test]
    async fn forecast_keeps_broken_entries_as_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Tokyo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "cnt": 3,
                "list": [
                    { "dt_txt": "2024-01-01 00:00:00", "main": { "temp": 40.0 }, "weather": [{ "description": "clear sky", "icon": "01n" }] },
                    { "dt_txt": "2024-01-01 03:00:00", "weather": [{ "description": "clear sky" }] },
                    { "dt_txt": "2024-01-01 06:00:00", "main": { "temp": 44.0 }, "weather": [{ "description": "few clouds" }] }
                ]
            })))
            .mount(&server)
            .await;

        let owm = OWM::new(&params(&server)).unwrap();
        let samples = owm.forecast("Tokyo").await.unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].as_ref().map(|s| s.temperature), Ok(40.0));
        assert_eq!(samples[1], Err(FieldMissing("main.temp")));
        assert!(samples[2].is_ok());
    }

    #[tokio::test]
    async fn forecast_without_list_is_document_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cod": "200" })))
            .mount(&server)
            .await;

        let owm = OWM::new(&params(&server)).unwrap();
        let err = owm.forecast("Tokyo").await.unwrap_err();

        assert!(matches!(err, OWMError::Document(_)));
    }

    #[tokio::test]
    async fn air_quality_queries_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .and(query_param("lat", "51.5085"))
            .and(query_param("lon", "-0.1257"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [{ "main": { "aqi": 4 }, "components": { "no2": 41.5 } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let owm = OWM::new(&params(&server)).unwrap();
        let air = owm.air_quality(51.5085, -0.1257).await.unwrap();

        assert_eq!(air.aqi, Some(4));
        assert_eq!(air.description(), "Poor");
        assert_eq!(air.components.get("no2"), Some(&41.5));
    }

    #[tokio::test]
    async fn air_quality_server_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let owm = OWM::new(&params(&server)).unwrap();
        let err = owm.air_quality(1.0, 2.0).await.unwrap_err();

        assert_eq!(err.status_code(), Some(503));
    }
}
