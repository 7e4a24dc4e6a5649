//! # Quill Server
//!
//! Admin API of the Quill blog engine, with the auto-publication scheduler
//! running in-process.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use quill_core::ports::{Clock, SystemClock};
use quill_infra::CronTaskScheduler;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill server on {}:{}",
        config.host,
        config.port
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repository = state::article_repository(config.database.as_ref()).await;

    let timers = Arc::new(CronTaskScheduler::new(config.scheduler.clone(), clock.clone()).await?);
    timers.start().await?;

    let state = AppState::new(repository, timers.clone(), clock);

    // Picks up articles scheduled before the restart; overdue ones run at once.
    state.scheduler.schedule_new().await;

    let app_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(app_state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    state.scheduler.shutdown().await;
    timers.shutdown().await?;
    Ok(())
}
