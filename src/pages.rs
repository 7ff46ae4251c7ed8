use serde::Serialize;
use tera::{Context, Tera};
use crate::air_quality::AirQuality;
use crate::errors::PageError;
use crate::manager_forecast::ForecastResult;
use crate::manager_owm::{CurrentWeather, Units};

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("forecasts.html", include_str!("../templates/forecasts.html")),
    ("radar.html", include_str!("../templates/radar.html")),
    ("news.html", include_str!("../templates/news.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// UV index isn't offered by the free OpenWeatherMap endpoints
const UV_INDEX: &str = "N/A";

/// Current weather flattened for the templates
#[derive(Serialize, Debug, Clone)]
pub struct CurrentView {
    pub name: String,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: f64,
    pub description: String,
    pub icon: Option<String>,
}

impl From<&CurrentWeather> for CurrentView {
    fn from(w: &CurrentWeather) -> Self {
        let condition = w.condition();
        Self {
            name: w.name.clone(),
            country: w.sys.country.clone(),
            lat: w.coord.lat,
            lon: w.coord.lon,
            temperature: w.main.temp,
            feels_like: w.main.feels_like,
            humidity: w.main.humidity,
            wind_speed: w.wind.speed,
            description: condition.map(|c| c.description.clone()).unwrap_or_default(),
            icon: condition.and_then(|c| c.icon.clone()),
        }
    }
}

/// One city on the start page, `weather` is None if fetching it failed
#[derive(Serialize, Debug, Clone)]
pub struct CityCard {
    pub city: String,
    pub weather: Option<CurrentView>,
}

/// Renders the html pages
pub struct Pages {
    tera: Tera,
    units: Units,
}

impl Pages {
    /// Returns a Pages struct with all templates registered
    ///
    /// # Arguments
    ///
    /// * 'units' - unit system the upstream values are given in
    pub fn new(units: Units) -> Result<Pages, PageError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())?;

        Ok(Self { tera, units })
    }

    pub fn index(&self, cards: &[CityCard]) -> Result<String, PageError> {
        let mut context = self.context();
        context.insert("cards", cards);

        self.render("index.html", &context)
    }

    pub fn forecasts(&self, current: &CurrentWeather, forecast: &ForecastResult) -> Result<String, PageError> {
        let mut context = self.context();
        context.insert("current", &CurrentView::from(current));
        context.insert("forecast", forecast);

        self.render("forecasts.html", &context)
    }

    pub fn radar(&self, current: &CurrentWeather, air: &AirQuality) -> Result<String, PageError> {
        let mut context = self.context();
        context.insert("current", &CurrentView::from(current));
        context.insert("uv_index", UV_INDEX);
        context.insert("aqi", air.description());
        context.insert("components", &air.components);

        self.render("radar.html", &context)
    }

    pub fn news(&self) -> Result<String, PageError> {
        self.render("news.html", &self.context())
    }

    pub fn error(&self, message: &str) -> Result<String, PageError> {
        let mut context = self.context();
        context.insert("message", message);

        self.render("error.html", &context)
    }

    fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("temp_symbol", self.units.temperature_symbol());
        context.insert("speed_unit", self.units.speed_unit());
        context
    }

    fn render(&self, template: &str, context: &Context) -> Result<String, PageError> {
        Ok(self.tera.render(template, context)?)
    }
}
