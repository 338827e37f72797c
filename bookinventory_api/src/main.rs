use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::Context;
use paperclip::actix::{web, OpenApiExt};
use tracing_actix_web::TracingLogger;

use bookinventory_api::app_config::{config_app, cors, json_config};
use bookinventory_api::books_repository::{
    BookRepository, InMemoryBookRepository, PostgresBooksRepository,
};
use bookinventory_api::connection::PostgresConnectionProvider;
use bookinventory_api::settings::Settings;
use bookinventory_api::telemetry::init_telemetry;

const APP_NAME: &str = "bookinventory_api";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    init_telemetry(APP_NAME).context("Failed to install telemetry")?;

    let books_repository: Arc<dyn BookRepository> = if settings.server.use_in_memory_db {
        tracing::warn!("Using in memory books repository, data is lost on restart");
        Arc::new(InMemoryBookRepository::default())
    } else {
        Arc::new(PostgresBooksRepository::new(
            PostgresConnectionProvider::new(settings.database.clone()),
        ))
    };

    tracing::info!(
        "Starting HTTP server at http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(books_repository.clone()))
            .app_data(json_config())
            .wrap(cors())
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind((settings.server.host.as_str(), settings.server.port))?
    .run()
    .await?;

    Ok(())
}
