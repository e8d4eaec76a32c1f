// kasse/src/context/bound_api.rs

use crate::api::CommerceApi;
use crate::context::CheckoutContext;
use crate::error::KasseResult;
use crate::model::{
  CheckoutLineInput, CheckoutSession, CheckoutToken, LineId, LinesMutationPayload, Menu, ProductCollectionQuery,
  ProductDetails, ProductGroup, ProductPage, Region, VariantId,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{event, Level};

/// A `CommerceApi` that keeps a `CheckoutContext` current.
///
/// A mutation payload carrying the context's checkout is published before
/// the call returns. A successful payload without a checkout makes the
/// context refetch. Editors therefore never refresh the context themselves.
pub struct ContextBoundApi {
  inner: Arc<dyn CommerceApi>,
  context: CheckoutContext,
}

impl ContextBoundApi {
  pub fn new(inner: Arc<dyn CommerceApi>, context: CheckoutContext) -> Self {
    Self { inner, context }
  }

  async fn observe(&self, payload: &Option<LinesMutationPayload>) {
    let Some(payload) = payload else {
      return;
    };
    match &payload.checkout {
      Some(checkout) => {
        self.context.accept_checkout(checkout.clone());
      }
      None if payload.is_success() => {
        if let Err(e) = self.context.refresh().await {
          event!(Level::WARN, error = %e, "Refetch after mutation failed.");
        }
      }
      None => {}
    }
  }
}

#[async_trait]
impl CommerceApi for ContextBoundApi {
  async fn checkout_by_token(&self, token: &CheckoutToken, locale: &str) -> KasseResult<Option<CheckoutSession>> {
    self.inner.checkout_by_token(token, locale).await
  }

  async fn update_checkout_line(
    &self,
    token: &CheckoutToken,
    variant_id: &VariantId,
    quantity: u32,
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    let payload = self.inner.update_checkout_line(token, variant_id, quantity, locale).await?;
    self.observe(&payload).await;
    Ok(payload)
  }

  async fn remove_checkout_line(
    &self,
    token: &CheckoutToken,
    line_id: &LineId,
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    let payload = self.inner.remove_checkout_line(token, line_id, locale).await?;
    self.observe(&payload).await;
    Ok(payload)
  }

  async fn create_checkout(
    &self,
    channel: &str,
    lines: &[CheckoutLineInput],
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self.inner.create_checkout(channel, lines, locale).await
  }

  async fn add_checkout_lines(
    &self,
    token: &CheckoutToken,
    lines: &[CheckoutLineInput],
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    let payload = self.inner.add_checkout_lines(token, lines, locale).await?;
    self.observe(&payload).await;
    Ok(payload)
  }

  async fn product_collection(&self, query: &ProductCollectionQuery) -> KasseResult<ProductPage> {
    self.inner.product_collection(query).await
  }

  async fn product_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<ProductDetails>> {
    self.inner.product_by_slug(slug, region).await
  }

  async fn collection_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<ProductGroup>> {
    self.inner.collection_by_slug(slug, region).await
  }

  async fn category_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<ProductGroup>> {
    self.inner.category_by_slug(slug, region).await
  }

  async fn menu_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<Menu>> {
    self.inner.menu_by_slug(slug, region).await
  }
}
