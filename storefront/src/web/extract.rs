// storefront/src/web/extract.rs

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::USER_AGENT;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use kasse::{BrowserEngine, CheckoutToken, Region};
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// What every cart request needs to know about the browser: its engine
/// (for commit triggers) and the checkout token cookie, if any.
#[derive(Debug, Clone)]
pub struct Shopper {
  pub engine: BrowserEngine,
  pub token: Option<CheckoutToken>,
}

impl FromRequest for Shopper {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let Some(app_state) = req.app_data::<web::Data<AppState>>() else {
      warn!("Shopper extractor: AppState is not registered.");
      return ready(Err(AppError::Internal("Application state is missing.".to_string())));
    };

    let engine = req
      .headers()
      .get(USER_AGENT)
      .and_then(|v| v.to_str().ok())
      .map(BrowserEngine::from_user_agent)
      .unwrap_or_default();

    let token = req
      .cookie(&app_state.config.checkout_cookie_name)
      .map(|c| c.value().trim().to_string())
      .filter(|v| !v.is_empty())
      .map(CheckoutToken::new);

    ready(Ok(Shopper { engine, token }))
  }
}

/// `/{channel}/{locale}` prefix of every page route.
#[derive(Debug, Deserialize)]
pub struct RegionPath {
  pub channel: String,
  pub locale: String,
}

impl RegionPath {
  pub fn region(&self) -> Result<Region, AppError> {
    region_from_parts(&self.channel, &self.locale)
  }
}

pub fn region_from_parts(channel: &str, locale: &str) -> Result<Region, AppError> {
  let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
  if !valid(channel) {
    return Err(AppError::Validation(format!("Invalid channel '{}'", channel)));
  }
  if !valid(locale) {
    return Err(AppError::Validation(format!("Invalid locale '{}'", locale)));
  }
  Ok(Region::new(channel, locale))
}

/// URL prefix for pages in `region`.
pub fn region_prefix(region: &Region) -> String {
  format!("/{}/{}", region.channel, region.locale)
}

pub fn token_cookie(name: &str, token: &CheckoutToken) -> Cookie<'static> {
  Cookie::build(name.to_string(), token.to_string())
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .finish()
}

pub fn expired_token_cookie(name: &str) -> Cookie<'static> {
  let mut cookie = Cookie::build(name.to_string(), "").path("/").finish();
  cookie.make_removal();
  cookie
}
