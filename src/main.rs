mod errors;
mod logging;
mod initialization;
mod handlers;
mod pages;
mod air_quality;
mod manager_forecast;
mod manager_owm;

use actix_web::{web, App, HttpServer};
use log::info;
use crate::errors::UnrecoverableError;
use crate::initialization::{config, Cities, ForecastParameters};
use crate::manager_owm::OWM;
use crate::pages::Pages;

struct AppState {
    owm: OWM,
    pages: Pages,
    forecast: ForecastParameters,
    cities: Cities,
}

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;

    let owm = OWM::new(&config.owm)?;
    let pages = Pages::new(config.owm.units)?;
    let state = web::Data::new(AppState {
        owm,
        pages,
        forecast: config.forecast.clone(),
        cities: config.cities.clone(),
    });

    info!("listening on {}:{}", config.web_server.bind_address, config.web_server.bind_port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::routes)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
