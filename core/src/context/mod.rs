// kasse/src/context/mod.rs

//! The checkout context: one session's checkout token and the latest
//! checkout fetched for it.
//!
//! Components receive a `CheckoutContext` handle explicitly. They read
//! snapshots, subscribe to new ones, and send mutations through
//! [`CheckoutContext::api`], which publishes every resulting checkout back
//! into the context.

mod bound_api;
pub mod store;

use crate::api::CommerceApi;
use crate::error::KasseResult;
use crate::model::{CheckoutLineInput, CheckoutSession, CheckoutToken, MutationError, Region, VariantId};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{event, instrument, Level};

pub use bound_api::ContextBoundApi;
pub use store::{MemoryTokenStore, TokenStore};

/// What the context knows right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutSnapshot {
  pub checkout: Option<Arc<CheckoutSession>>,
  pub loading: bool,
  /// Bumped on every publication.
  pub revision: u64,
}

struct ContextInner {
  api: Arc<dyn CommerceApi>,
  token_store: Arc<dyn TokenStore>,
  region: Region,
  token: RwLock<Option<CheckoutToken>>,
  snapshot: watch::Sender<CheckoutSnapshot>,
}

/// Session-scoped handle on the current checkout. Clones share state.
#[derive(Clone)]
pub struct CheckoutContext {
  inner: Arc<ContextInner>,
}

impl fmt::Debug for CheckoutContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let snapshot = self.snapshot();
    f.debug_struct("CheckoutContext")
      .field("region", &self.inner.region)
      .field("token", &self.checkout_token())
      .field("loading", &snapshot.loading)
      .field("revision", &snapshot.revision)
      .finish()
  }
}

impl CheckoutContext {
  /// A context that has not resolved anything yet: it reports `loading`
  /// until [`resolve`](Self::resolve) finishes.
  pub fn new(api: Arc<dyn CommerceApi>, token_store: Arc<dyn TokenStore>, region: Region) -> Self {
    let (snapshot, _) = watch::channel(CheckoutSnapshot {
      checkout: None,
      loading: true,
      revision: 0,
    });
    Self {
      inner: Arc::new(ContextInner {
        api,
        token_store,
        region,
        token: RwLock::new(None),
        snapshot,
      }),
    }
  }

  pub fn region(&self) -> &Region {
    &self.inner.region
  }

  pub fn checkout_token(&self) -> Option<CheckoutToken> {
    self.inner.token.read().clone()
  }

  /// The current checkout, if any, and whether a fetch is outstanding.
  pub fn current_checkout(&self) -> (Option<Arc<CheckoutSession>>, bool) {
    let snapshot = self.inner.snapshot.borrow();
    (snapshot.checkout.clone(), snapshot.loading)
  }

  pub fn snapshot(&self) -> CheckoutSnapshot {
    self.inner.snapshot.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<CheckoutSnapshot> {
    self.inner.snapshot.subscribe()
  }

  /// Mutation handle for editors. See [`ContextBoundApi`].
  pub fn api(&self) -> Arc<dyn CommerceApi> {
    Arc::new(ContextBoundApi::new(Arc::clone(&self.inner.api), self.clone()))
  }

  /// Loads the persisted token and fetches its checkout.
  #[instrument(name = "CheckoutContext::resolve", skip(self), err(Display))]
  pub async fn resolve(&self) -> KasseResult<Option<Arc<CheckoutSession>>> {
    let stored = self.inner.token_store.load();
    *self.inner.token.write() = stored;
    self.fetch_current().await
  }

  /// Refetches the checkout for the current token.
  #[instrument(name = "CheckoutContext::refresh", skip(self), err(Display))]
  pub async fn refresh(&self) -> KasseResult<Option<Arc<CheckoutSession>>> {
    self.fetch_current().await
  }

  async fn fetch_current(&self) -> KasseResult<Option<Arc<CheckoutSession>>> {
    let Some(token) = self.checkout_token() else {
      event!(Level::DEBUG, "No checkout token stored, nothing to fetch.");
      self.publish(None, false);
      return Ok(None);
    };

    self.set_loading(true);
    let fetched = self
      .inner
      .api
      .checkout_by_token(&token, &self.inner.region.language_code())
      .await;

    match fetched {
      Ok(Some(checkout)) => {
        event!(Level::DEBUG, %token, lines = checkout.lines.len(), "Checkout fetched.");
        let checkout = Arc::new(checkout);
        self.publish(Some(Arc::clone(&checkout)), false);
        Ok(Some(checkout))
      }
      Ok(None) => {
        // Expired, or completed into an order.
        event!(Level::INFO, %token, "Checkout no longer exists, dropping stored token.");
        self.forget_token(&token);
        Ok(None)
      }
      Err(e) => {
        event!(Level::WARN, %token, error = %e, "Checkout fetch failed, keeping previous snapshot.");
        self.set_loading(false);
        Err(e)
      }
    }
  }

  /// Adds `quantity` of a variant, creating the checkout on first use.
  ///
  /// Returns the mutation's errors; an empty list means the cart changed.
  #[instrument(name = "CheckoutContext::add_to_cart", skip(self, variant_id), fields(variant_id = %variant_id), err(Display))]
  pub async fn add_to_cart(&self, variant_id: &VariantId, quantity: u32) -> KasseResult<Vec<MutationError>> {
    let lines = [CheckoutLineInput {
      variant_id: variant_id.clone(),
      quantity,
    }];
    let locale = self.inner.region.language_code();

    let payload = match self.checkout_token() {
      Some(token) => self.inner.api.add_checkout_lines(&token, &lines, &locale).await?,
      None => {
        self
          .inner
          .api
          .create_checkout(&self.inner.region.channel, &lines, &locale)
          .await?
      }
    };

    let Some(payload) = payload else {
      event!(Level::WARN, "Add to cart returned no payload.");
      return Ok(Vec::new());
    };

    if let Some(checkout) = payload.checkout {
      if self.checkout_token().as_ref() != Some(&checkout.token) {
        event!(Level::INFO, token = %checkout.token, "Checkout created, persisting token.");
        self.inner.token_store.save(&checkout.token);
        *self.inner.token.write() = Some(checkout.token.clone());
      }
      self.publish(Some(Arc::new(checkout)), false);
    }
    Ok(payload.errors)
  }

  /// Forgets the checkout entirely, e.g. after the order was placed.
  pub fn reset(&self) {
    let previous = self.inner.token.write().take();
    self.inner.token_store.clear();
    self.publish(None, false);
    event!(Level::INFO, had_token = previous.is_some(), "Checkout context reset.");
  }

  /// Publishes `checkout` if it belongs to the current token. Returns
  /// whether it was accepted.
  pub(crate) fn accept_checkout(&self, checkout: CheckoutSession) -> bool {
    if self.checkout_token().as_ref() != Some(&checkout.token) {
      event!(Level::DEBUG, token = %checkout.token, "Ignoring checkout for a different token.");
      return false;
    }
    self.publish(Some(Arc::new(checkout)), false);
    true
  }

  fn forget_token(&self, token: &CheckoutToken) {
    {
      let mut current = self.inner.token.write();
      if current.as_ref() == Some(token) {
        *current = None;
      }
    }
    self.inner.token_store.clear();
    self.publish(None, false);
  }

  fn set_loading(&self, loading: bool) {
    self.inner.snapshot.send_modify(|s| {
      s.loading = loading;
      s.revision += 1;
    });
  }

  fn publish(&self, checkout: Option<Arc<CheckoutSession>>, loading: bool) {
    self.inner.snapshot.send_modify(|s| {
      s.checkout = checkout;
      s.loading = loading;
      s.revision += 1;
    });
  }
}
