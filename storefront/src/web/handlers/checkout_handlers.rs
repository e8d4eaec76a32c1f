// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::http::header::{ContentType, LOCATION};
use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::pages;
use crate::state::AppState;
use crate::web::extract::{region_prefix, RegionPath, Shopper};
use crate::web::handlers::cart_handlers::forget_stale_token;

/// Spinner while the checkout resolves, the cart when there is nothing to
/// check out, the order summary otherwise.
#[instrument(
    name = "handler::checkout_page",
    skip(app_state, path, shopper),
    fields(channel = %path.channel, locale = %path.locale)
)]
pub async fn checkout_page_handler(
  app_state: web::Data<AppState>,
  path: web::Path<RegionPath>,
  shopper: Shopper,
) -> Result<HttpResponse, AppError> {
  let region = path.region()?;
  let session = app_state
    .sessions
    .open(region.clone(), shopper.token.clone(), shopper.engine)
    .await?;
  let snapshot = session.context().snapshot();

  if snapshot.loading {
    return Ok(
      HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::spinner_page("Checkout", &region)),
    );
  }

  let checkout = snapshot.checkout.as_deref().filter(|c| !c.is_empty());
  let mut response = match checkout {
    Some(_) => HttpResponse::Ok(),
    None => HttpResponse::SeeOther(),
  };
  forget_stale_token(&mut response, &app_state, &shopper, &session);

  match checkout {
    Some(checkout) => Ok(
      response
        .content_type(ContentType::html())
        .body(pages::checkout_page(&region, checkout)),
    ),
    None => {
      info!("Nothing to check out, redirecting to the cart.");
      Ok(
        response
          .insert_header((LOCATION, format!("{}/cart", region_prefix(&region))))
          .finish(),
      )
    }
  }
}
