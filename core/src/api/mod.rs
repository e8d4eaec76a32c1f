// kasse/src/api/mod.rs

//! The remote commerce API as the storefront consumes it.
//!
//! `CommerceApi` is the seam between UI state and the backend. The GraphQL
//! implementation lives in [`graphql`]; tests and the checkout context wrap
//! or replace it.

pub(crate) mod documents;
pub mod graphql;

use crate::error::KasseResult;
use crate::model::{
  CheckoutLineInput, CheckoutSession, CheckoutToken, LineId, LinesMutationPayload, ProductCollectionQuery,
  Menu, ProductDetails, ProductGroup, ProductPage, Region, VariantId,
};
use async_trait::async_trait;

pub use graphql::GraphQlClient;

/// Operations against the headless commerce backend.
///
/// Mutations answer `Ok(None)` when the response carried no data payload at
/// all, and `Err` only when no usable response arrived. `locale` is the
/// API's language code (see [`Region::language_code`]).
#[async_trait]
pub trait CommerceApi: Send + Sync {
  async fn checkout_by_token(&self, token: &CheckoutToken, locale: &str) -> KasseResult<Option<CheckoutSession>>;

  async fn update_checkout_line(
    &self,
    token: &CheckoutToken,
    variant_id: &VariantId,
    quantity: u32,
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>>;

  async fn remove_checkout_line(
    &self,
    token: &CheckoutToken,
    line_id: &LineId,
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>>;

  async fn create_checkout(
    &self,
    channel: &str,
    lines: &[CheckoutLineInput],
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>>;

  async fn add_checkout_lines(
    &self,
    token: &CheckoutToken,
    lines: &[CheckoutLineInput],
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>>;

  async fn product_collection(&self, query: &ProductCollectionQuery) -> KasseResult<ProductPage>;

  async fn product_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<ProductDetails>>;

  /// The collection published under `slug` in the region's channel.
  async fn collection_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<ProductGroup>>;

  async fn category_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<ProductGroup>>;

  /// The navigation menu published under `slug` in the region's channel.
  async fn menu_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<Menu>>;
}
