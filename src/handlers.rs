use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse, Responder};
use log::{error, info};
use serde::Deserialize;
use tokio::task::JoinSet;
use crate::AppState;
use crate::errors::PageError;
use crate::manager_forecast::aggregate;
use crate::manager_owm::errors::OWMError;
use crate::pages::{CityCard, CurrentView};

const SCRIPT: &str = include_str!("../static/js/script.js");

#[derive(Deserialize, Debug)]
struct LocationQuery {
    location: Option<String>,
}

/// Registers all routes, including the fallback for unknown paths
///
/// # Arguments
///
/// * 'cfg' - service config of the app
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(forecasts)
        .service(radar)
        .service(news)
        .service(script)
        .default_service(web::to(not_found));
}

#[get("/")]
async fn index(data: web::Data<AppState>) -> impl Responder {
    let mut set: JoinSet<(usize, Result<CurrentView, OWMError>)> = JoinSet::new();

    for (i, city) in data.cities.featured.iter().enumerate() {
        let owm = data.owm.clone();
        let city = city.clone();
        set.spawn(async move { (i, owm.current_weather(&city).await.map(|w| CurrentView::from(&w))) });
    }

    let mut cards: Vec<CityCard> = data.cities.featured
        .iter()
        .map(|city| CityCard { city: city.clone(), weather: None })
        .collect();

    for (i, result) in set.join_all().await {
        match result {
            Ok(view) => cards[i].weather = Some(view),
            Err(e) => error!("failed to get current weather for {}: {}", cards[i].city, e),
        }
    }

    page(&data, data.pages.index(&cards))
}

#[get("/forecasts")]
async fn forecasts(params: web::Query<LocationQuery>, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", params);
    let location = location(&params, &data);

    let current = match data.owm.current_weather(&location).await {
        Ok(current) => current,
        Err(e) => return upstream_error(&data, &e, "Error fetching current weather."),
    };

    let samples = match data.owm.forecast(&location).await {
        Ok(samples) => samples,
        Err(OWMError::NotFound(e)) => {
            error!("forecast not found: {}", e);
            return error_page(&data, StatusCode::NOT_FOUND, "Error fetching forecast.");
        }
        Err(e) => return upstream_error(&data, &e, "Error fetching forecast."),
    };

    let forecast = aggregate(samples, data.forecast.day_key, data.forecast.max_days);
    info!("forecast for {} covers {} days", location, forecast.len());

    page(&data, data.pages.forecasts(&current, &forecast))
}

#[get("/radar")]
async fn radar(params: web::Query<LocationQuery>, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", params);
    let location = location(&params, &data);

    let current = match data.owm.current_weather(&location).await {
        Ok(current) => current,
        Err(e) => return upstream_error(&data, &e, "Error fetching current weather."),
    };

    let air = match data.owm.air_quality(current.coord.lat, current.coord.lon).await {
        Ok(air) => air,
        Err(OWMError::NotFound(e)) => {
            error!("air quality not found: {}", e);
            return error_page(&data, StatusCode::NOT_FOUND, "Error fetching air quality data.");
        }
        Err(e) => return upstream_error(&data, &e, "Error fetching air quality data."),
    };

    page(&data, data.pages.radar(&current, &air))
}

#[get("/news")]
async fn news(data: web::Data<AppState>) -> impl Responder {
    page(&data, data.pages.news())
}

#[get("/static/js/script.js")]
async fn script() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(SCRIPT)
}

async fn not_found(data: web::Data<AppState>) -> HttpResponse {
    error_page(&data, StatusCode::NOT_FOUND, "Page not found.")
}

/// Returns the requested location, or the configured default if none was given
fn location(params: &LocationQuery, data: &AppState) -> String {
    params.location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(data.cities.default_location.as_str())
        .to_string()
}

fn page(data: &AppState, rendered: Result<String, PageError>) -> HttpResponse {
    match rendered {
        Ok(html) => HttpResponse::Ok().content_type(ContentType::html()).body(html),
        Err(e) => {
            error!("failed to render page: {}", e);
            error_page(data, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
        }
    }
}

/// Maps a failed OpenWeatherMap request to an error page.
///
/// A 404 from upstream means the location is unknown, any other upstream status is passed
/// on as is. Failures without a status (connection, timeout, bad document) give 502.
///
/// # Arguments
///
/// * 'data' - app state
/// * 'e' - the error from the OpenWeatherMap manager
/// * 'message' - message shown for anything but an unknown location
fn upstream_error(data: &AppState, e: &OWMError, message: &str) -> HttpResponse {
    error!("{}: {}", message, e);

    if let OWMError::NotFound(_) = e {
        return error_page(data, StatusCode::NOT_FOUND, "Location not found.");
    }

    let status = e.status_code()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::BAD_GATEWAY);

    error_page(data, status, message)
}

fn error_page(data: &AppState, status: StatusCode, message: &str) -> HttpResponse {
    match data.pages.error(message) {
        Ok(html) => HttpResponse::build(status).content_type(ContentType::html()).body(html),
        Err(e) => {
            error!("failed to render error page: {}", e);
            HttpResponse::build(status).content_type(ContentType::plaintext()).body(message.to_string())
        }
    }
}
