// storefront/src/web/handlers/cart_handlers.rs

use actix_web::http::header::{ContentType, LOCATION};
use actix_web::{web, HttpResponse, HttpResponseBuilder};
use kasse::editor::{parse_quantity, InputRejection};
use kasse::{CommitOutcome, CommitTrigger, LineId, LineItemEditor, RemoveOutcome, VariantId};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pages;
use crate::session::CartSession;
use crate::state::AppState;
use crate::web::extract::{
  expired_token_cookie, region_from_parts, region_prefix, token_cookie, RegionPath, Shopper,
};
use std::sync::Arc;

#[derive(Deserialize, Debug)]
pub struct LinePath {
  pub channel: String,
  pub locale: String,
  pub line_id: String,
}

#[derive(Deserialize, Debug)]
pub struct QuantityForm {
  pub quantity: String,
  /// Absent when the form was submitted without the hidden field.
  #[serde(default)]
  pub trigger: Option<CommitTrigger>,
}

#[derive(Deserialize, Debug)]
pub struct AddToCartForm {
  pub variant_id: String,
  #[serde(default)]
  pub quantity: Option<String>,
}

/// Clears the cookie when the browser sent a token the API no longer knows.
pub(crate) fn forget_stale_token(
  response: &mut HttpResponseBuilder,
  app_state: &AppState,
  shopper: &Shopper,
  session: &CartSession,
) {
  if shopper.token.is_some() && session.context().checkout_token().is_none() {
    info!("Checkout token cookie is stale, clearing it.");
    response.cookie(expired_token_cookie(&app_state.config.checkout_cookie_name));
  }
}

fn see_other(location: String) -> HttpResponseBuilder {
  let mut response = HttpResponse::SeeOther();
  response.insert_header((LOCATION, location));
  response
}

async fn line_editor(
  app_state: &AppState,
  path: &LinePath,
  shopper: &Shopper,
) -> Result<(Arc<CartSession>, LineItemEditor), AppError> {
  let region = region_from_parts(&path.channel, &path.locale)?;
  let session = app_state
    .sessions
    .open(region, shopper.token.clone(), shopper.engine)
    .await?;
  let line_id = LineId::new(path.line_id.clone());
  let editor = session
    .editor(&line_id, shopper.engine)?
    .ok_or_else(|| AppError::NotFound(format!("Line '{}' is not in the cart", line_id)))?;
  Ok((session, editor))
}

#[instrument(
    name = "handler::cart_page",
    skip(app_state, path, shopper),
    fields(channel = %path.channel, locale = %path.locale)
)]
pub async fn cart_page_handler(
  app_state: web::Data<AppState>,
  path: web::Path<RegionPath>,
  shopper: Shopper,
) -> Result<HttpResponse, AppError> {
  let region = path.region()?;
  let session = app_state
    .sessions
    .open(region.clone(), shopper.token.clone(), shopper.engine)
    .await?;
  let views = session.views()?;
  let (checkout, _) = session.context().current_checkout();

  let mut response = HttpResponse::Ok();
  forget_stale_token(&mut response, &app_state, &shopper, &session);
  Ok(
    response
      .content_type(ContentType::html())
      .body(pages::cart_page(&region, checkout.as_deref(), &views)),
  )
}

/// The quantity form: the submitted text goes through the editor exactly
/// as typed, then commits with the submitted trigger.
#[instrument(
    name = "handler::update_quantity",
    skip(app_state, path, form, shopper),
    fields(line_id = %path.line_id, quantity = %form.quantity)
)]
pub async fn update_quantity_handler(
  app_state: web::Data<AppState>,
  path: web::Path<LinePath>,
  form: web::Form<QuantityForm>,
  shopper: Shopper,
) -> Result<HttpResponse, AppError> {
  let (session, editor) = line_editor(&app_state, &path, &shopper).await?;

  editor.focus();
  editor.input(&form.quantity);
  let outcome = editor.commit(form.trigger.unwrap_or(CommitTrigger::Enter)).await?;
  match &outcome {
    CommitOutcome::Rejected(count) => warn!(errors = count, "Quantity change rejected by the API."),
    CommitOutcome::Failed(reason) => warn!(reason = %reason, "Quantity change failed."),
    other => info!(outcome = ?other, "Quantity form handled."),
  }

  let region = session.context().region();
  Ok(see_other(format!("{}/cart", region_prefix(region))).finish())
}

#[instrument(name = "handler::remove_line", skip(app_state, path, shopper), fields(line_id = %path.line_id))]
pub async fn remove_line_handler(
  app_state: web::Data<AppState>,
  path: web::Path<LinePath>,
  shopper: Shopper,
) -> Result<HttpResponse, AppError> {
  let (session, editor) = line_editor(&app_state, &path, &shopper).await?;

  match editor.remove().await? {
    RemoveOutcome::Requested => info!("Line removal requested."),
    other => warn!(outcome = ?other, "Line removal did not go through."),
  }

  let region = session.context().region();
  Ok(see_other(format!("{}/cart", region_prefix(region))).finish())
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, path, form, shopper),
    fields(variant_id = %form.variant_id)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<RegionPath>,
  form: web::Form<AddToCartForm>,
  shopper: Shopper,
) -> Result<HttpResponse, AppError> {
  let region = path.region()?;
  if form.variant_id.trim().is_empty() {
    return Err(AppError::Validation("A variant must be selected.".to_string()));
  }
  let quantity = match form.quantity.as_deref() {
    None => 1,
    Some(raw) => parse_quantity(raw).map_err(|rejection| {
      AppError::Validation(match rejection {
        InputRejection::Empty => "Quantity is required.".to_string(),
        other => format!("Invalid quantity '{}': {:?}", raw, other),
      })
    })?,
  };

  let session = app_state
    .sessions
    .open(region.clone(), shopper.token.clone(), shopper.engine)
    .await?;
  let errors = session
    .context()
    .add_to_cart(&VariantId::new(form.variant_id.trim()), quantity)
    .await?;
  if !errors.is_empty() {
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    warn!(errors = ?messages, "Add to cart rejected by the API.");
    return Err(AppError::Validation(messages.join(" ")));
  }

  let session = app_state.sessions.adopt(session);
  let mut response = see_other(format!("{}/cart", region_prefix(&region)));
  if let Some(token) = session.context().checkout_token() {
    if shopper.token.as_ref() != Some(&token) {
      info!(token = %token, "Issuing checkout token cookie.");
    }
    response.cookie(token_cookie(&app_state.config.checkout_cookie_name, &token));
  }
  Ok(response.finish())
}
