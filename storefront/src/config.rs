// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use kasse::Region;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// GraphQL endpoint of the commerce backend.
  pub commerce_api_url: String,

  // Region used when a request does not name one (the JSON line API).
  pub default_channel: String,
  pub default_locale: String,

  pub checkout_cookie_name: String,
  pub request_timeout: Duration,
  pub products_per_page: u32,
  /// Menu whose items become the home page's product blocks.
  pub homepage_menu: String,
  pub session_idle_timeout: Duration,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let commerce_api_url = get_env("COMMERCE_API_URL")?;

    let default_channel = get_env("DEFAULT_CHANNEL").unwrap_or_else(|_| "default-channel".to_string());
    let default_locale = get_env("DEFAULT_LOCALE").unwrap_or_else(|_| "en-us".to_string());
    let checkout_cookie_name = get_env("CHECKOUT_COOKIE_NAME").unwrap_or_else(|_| "checkoutToken".to_string());

    let request_timeout_secs = get_env("REQUEST_TIMEOUT_SECS")
      .unwrap_or_else(|_| "30".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid REQUEST_TIMEOUT_SECS: {}", e)))?;
    let products_per_page = get_env("PRODUCTS_PER_PAGE")
      .unwrap_or_else(|_| "12".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid PRODUCTS_PER_PAGE: {}", e)))?;
    if products_per_page == 0 {
      return Err(AppError::Config("PRODUCTS_PER_PAGE must be at least 1".to_string()));
    }
    let homepage_menu = get_env("HOMEPAGE_MENU").unwrap_or_else(|_| "homepage".to_string());
    let session_idle_secs = get_env("SESSION_IDLE_SECS")
      .unwrap_or_else(|_| "1800".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_IDLE_SECS: {}", e)))?;

    tracing::info!(
      commerce_api_url = %commerce_api_url,
      default_channel = %default_channel,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      commerce_api_url,
      default_channel,
      default_locale,
      checkout_cookie_name,
      request_timeout: Duration::from_secs(request_timeout_secs),
      products_per_page,
      homepage_menu,
      session_idle_timeout: Duration::from_secs(session_idle_secs),
    })
  }

  pub fn default_region(&self) -> Region {
    Region::new(self.default_channel.clone(), self.default_locale.clone())
  }
}
