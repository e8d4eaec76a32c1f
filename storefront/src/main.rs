// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use kasse::{CommerceApi, GraphQlClient};
use std::sync::Arc;
use std::time::Duration;
use storefront::web::configure_app_routes;
use storefront::{AppConfig, AppState};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let api: Arc<dyn CommerceApi> = match GraphQlClient::new(app_config.commerce_api_url.clone(), app_config.request_timeout)
  {
    Ok(client) => Arc::new(client),
    Err(e) => {
      tracing::error!(error = %e, "Failed to build the commerce API client.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  let app_state = AppState::new(api, app_config.clone());

  let sessions = Arc::clone(&app_state.sessions);
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(SESSION_PRUNE_INTERVAL);
    loop {
      interval.tick().await;
      sessions.prune_idle();
    }
  });

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
