// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use kasse::model::{
  CheckoutLine, CheckoutLineInput, CheckoutSession, CheckoutToken, Image, LineId, LineProduct, LinesMutationPayload,
  Menu, Money, MutationError, ProductCollectionQuery, ProductDetails, ProductGroup, ProductId, ProductPage,
  ProductVariant, Region, TaxedMoney, VariantId,
};
use kasse::{CheckoutContext, CommerceApi, KasseError, KasseResult, MemoryTokenStore};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::Level;

// --- Tracing ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixtures ---
pub const TOKEN: &str = "T1";
pub const CURRENCY: &str = "USD";

pub fn region() -> Region {
  Region::new("default-channel", "en-us")
}

pub fn money(cents: i64) -> TaxedMoney {
  TaxedMoney {
    gross: Money::new(Decimal::new(cents, 2), CURRENCY),
    net: None,
  }
}

/// A line whose unit price is `unit_cents`.
pub fn line(id: &str, variant: &str, quantity: u32, unit_cents: i64) -> CheckoutLine {
  CheckoutLine {
    id: LineId::from(id),
    variant: ProductVariant {
      id: VariantId::from(variant),
      name: format!("{} variant", variant),
      product: Some(LineProduct {
        id: ProductId::from(format!("product-{}", variant).as_str()),
        name: format!("Product {}", variant),
        slug: format!("product-{}", variant.to_lowercase()),
        thumbnail: Some(Image {
          url: format!("https://cdn.example.com/{}.png", variant),
          alt: None,
        }),
        translation: None,
      }),
      translation: None,
    },
    quantity,
    total_price: money(unit_cents * i64::from(quantity)),
  }
}

pub fn checkout(token: &str, lines: Vec<CheckoutLine>) -> CheckoutSession {
  CheckoutSession {
    token: CheckoutToken::from(token),
    lines: lines.into_iter().map(Arc::new).collect(),
    subtotal_price: None,
    total_price: None,
  }
}

/// Line `L1` (variant `V1`, quantity 2) and line `L2` (variant `V2`,
/// quantity 1) under token `T1`.
pub fn two_line_checkout() -> CheckoutSession {
  checkout(TOKEN, vec![line("L1", "V1", 2, 500), line("L2", "V2", 1, 1250)])
}

/// Rebuilds every line in a new `Arc`, as a fresh API response would.
pub fn fresh(checkout: &CheckoutSession) -> CheckoutSession {
  CheckoutSession {
    token: checkout.token.clone(),
    lines: checkout.lines.iter().map(|l| Arc::new(CheckoutLine::clone(l))).collect(),
    subtotal_price: checkout.subtotal_price.clone(),
    total_price: checkout.total_price.clone(),
  }
}

/// A reqwest failure produced without touching the network.
pub async fn transport_error(operation: &'static str) -> KasseError {
  let source = match reqwest::Client::new().get("not a url").send().await {
    Err(e) => e,
    Ok(_) => panic!("request to an invalid URL unexpectedly succeeded"),
  };
  KasseError::Transport { operation, source }
}

// --- Scripted API ---

/// How the mock answers the next mutation of a kind.
#[derive(Debug, Clone)]
pub enum Reply {
  /// Apply the mutation to the stored checkout and return it.
  Apply,
  /// Apply it but answer without a checkout, forcing a refetch.
  ApplySilently,
  /// Refuse with these errors and no checkout.
  Errors(Vec<MutationError>),
  /// A response without any data payload.
  Absent,
  /// GraphQL-level failure.
  GraphQlFailure(String),
  /// No response at all.
  Unreachable,
  /// Wait for the gate before answering with the inner reply.
  Gated(Arc<Notify>, Box<Reply>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
  CheckoutByToken { token: String },
  UpdateLine { token: String, variant_id: String, quantity: u32 },
  RemoveLine { token: String, line_id: String },
  CreateCheckout { channel: String, lines: usize },
  AddLines { token: String, lines: usize },
  ProductCollection,
  ProductBySlug { slug: String },
}

/// An in-memory commerce backend holding at most one checkout, with
/// per-call scripting for mutations.
#[derive(Default)]
pub struct MockCommerceApi {
  checkout: Mutex<Option<CheckoutSession>>,
  calls: Mutex<Vec<ApiCall>>,
  update_replies: Mutex<VecDeque<Reply>>,
  remove_replies: Mutex<VecDeque<Reply>>,
  fetch_failures: Mutex<usize>,
}

impl MockCommerceApi {
  pub fn new(checkout: Option<CheckoutSession>) -> Arc<Self> {
    Arc::new(Self {
      checkout: Mutex::new(checkout),
      ..Default::default()
    })
  }

  pub fn with_two_lines() -> Arc<Self> {
    Self::new(Some(two_line_checkout()))
  }

  pub fn script_update(&self, reply: Reply) {
    self.update_replies.lock().push_back(reply);
  }

  pub fn script_remove(&self, reply: Reply) {
    self.remove_replies.lock().push_back(reply);
  }

  /// The next `n` checkout fetches fail at the transport level.
  pub fn fail_fetches(&self, n: usize) {
    *self.fetch_failures.lock() = n;
  }

  pub fn calls(&self) -> Vec<ApiCall> {
    self.calls.lock().clone()
  }

  pub fn mutation_calls(&self) -> Vec<ApiCall> {
    self
      .calls()
      .into_iter()
      .filter(|c| !matches!(c, ApiCall::CheckoutByToken { .. }))
      .collect()
  }

  pub fn stored_checkout(&self) -> Option<CheckoutSession> {
    self.checkout.lock().clone()
  }

  /// Replaces the stored checkout, as if another tab had changed it.
  pub fn set_checkout(&self, checkout: Option<CheckoutSession>) {
    *self.checkout.lock() = checkout;
  }

  fn record(&self, call: ApiCall) {
    self.calls.lock().push(call);
  }

  fn apply_quantity(&self, variant_id: &VariantId, quantity: u32) -> Option<CheckoutSession> {
    let mut stored = self.checkout.lock();
    let current = stored.as_ref()?;
    let lines = current
      .lines
      .iter()
      .map(|l| {
        let mut line = CheckoutLine::clone(l);
        if &line.variant.id == variant_id {
          let unit = line.total_price.gross.amount / Decimal::from(line.quantity.max(1));
          line.total_price.gross.amount = unit * Decimal::from(quantity);
          line.quantity = quantity;
        }
        Arc::new(line)
      })
      .collect();
    let updated = CheckoutSession {
      lines,
      ..current.clone()
    };
    *stored = Some(updated.clone());
    Some(updated)
  }

  fn apply_removal(&self, line_id: &LineId) -> Option<CheckoutSession> {
    let mut stored = self.checkout.lock();
    let current = stored.as_ref()?;
    let updated = CheckoutSession {
      lines: current.lines.iter().filter(|l| &l.id != line_id).cloned().collect(),
      ..current.clone()
    };
    let updated = fresh(&updated);
    *stored = Some(updated.clone());
    Some(updated)
  }

  async fn answer(
    &self,
    reply: Reply,
    operation: &'static str,
    apply: impl FnOnce() -> Option<CheckoutSession>,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    let mut reply = reply;
    while let Reply::Gated(gate, inner) = reply {
      gate.notified().await;
      reply = *inner;
    }
    match reply {
      Reply::Apply => Ok(Some(LinesMutationPayload {
        errors: Vec::new(),
        checkout: apply(),
      })),
      Reply::ApplySilently => {
        apply();
        Ok(Some(LinesMutationPayload::default()))
      }
      Reply::Errors(errors) => Ok(Some(LinesMutationPayload { errors, checkout: None })),
      Reply::Absent => Ok(None),
      Reply::GraphQlFailure(message) => Err(KasseError::GraphQl {
        operation,
        messages: vec![message],
      }),
      Reply::Unreachable => Err(transport_error(operation).await),
      Reply::Gated(..) => unreachable!("gates are unwrapped above"),
    }
  }
}

#[async_trait]
impl CommerceApi for MockCommerceApi {
  async fn checkout_by_token(&self, token: &CheckoutToken, _locale: &str) -> KasseResult<Option<CheckoutSession>> {
    self.record(ApiCall::CheckoutByToken {
      token: token.to_string(),
    });
    let fail = {
      let mut failures = self.fetch_failures.lock();
      let fail = *failures > 0;
      *failures = failures.saturating_sub(1);
      fail
    };
    if fail {
      return Err(transport_error("CheckoutByToken").await);
    }
    let stored = self.checkout.lock().clone();
    Ok(stored.filter(|c| &c.token == token).map(|c| fresh(&c)))
  }

  async fn update_checkout_line(
    &self,
    token: &CheckoutToken,
    variant_id: &VariantId,
    quantity: u32,
    _locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self.record(ApiCall::UpdateLine {
      token: token.to_string(),
      variant_id: variant_id.to_string(),
      quantity,
    });
    let reply = self.update_replies.lock().pop_front().unwrap_or(Reply::Apply);
    self
      .answer(reply, "CheckoutLineUpdate", || self.apply_quantity(variant_id, quantity))
      .await
  }

  async fn remove_checkout_line(
    &self,
    token: &CheckoutToken,
    line_id: &LineId,
    _locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self.record(ApiCall::RemoveLine {
      token: token.to_string(),
      line_id: line_id.to_string(),
    });
    let reply = self.remove_replies.lock().pop_front().unwrap_or(Reply::Apply);
    self
      .answer(reply, "RemoveProductFromCheckout", || self.apply_removal(line_id))
      .await
  }

  async fn create_checkout(
    &self,
    channel: &str,
    lines: &[CheckoutLineInput],
    _locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self.record(ApiCall::CreateCheckout {
      channel: channel.to_string(),
      lines: lines.len(),
    });
    let created = checkout(
      "NEW",
      lines
        .iter()
        .enumerate()
        .map(|(i, input)| line(&format!("N{}", i + 1), input.variant_id.as_str(), input.quantity, 100))
        .collect(),
    );
    *self.checkout.lock() = Some(created.clone());
    Ok(Some(LinesMutationPayload {
      errors: Vec::new(),
      checkout: Some(created),
    }))
  }

  async fn add_checkout_lines(
    &self,
    token: &CheckoutToken,
    lines: &[CheckoutLineInput],
    _locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self.record(ApiCall::AddLines {
      token: token.to_string(),
      lines: lines.len(),
    });
    let updated = {
      let mut stored = self.checkout.lock();
      let Some(current) = stored.as_mut() else {
        return Ok(Some(LinesMutationPayload {
          errors: vec![MutationError::new("token", "Checkout not found")],
          checkout: None,
        }));
      };
      for input in lines {
        let next_id = format!("A{}", current.lines.len() + 1);
        current
          .lines
          .push(Arc::new(line(&next_id, input.variant_id.as_str(), input.quantity, 100)));
      }
      fresh(current)
    };
    Ok(Some(LinesMutationPayload {
      errors: Vec::new(),
      checkout: Some(updated),
    }))
  }

  async fn product_collection(&self, _query: &ProductCollectionQuery) -> KasseResult<ProductPage> {
    self.record(ApiCall::ProductCollection);
    Ok(ProductPage::default())
  }

  async fn product_by_slug(&self, slug: &str, _region: &Region) -> KasseResult<Option<ProductDetails>> {
    self.record(ApiCall::ProductBySlug { slug: slug.to_string() });
    Ok(None)
  }

  async fn collection_by_slug(&self, _slug: &str, _region: &Region) -> KasseResult<Option<ProductGroup>> {
    Ok(None)
  }

  async fn category_by_slug(&self, _slug: &str, _region: &Region) -> KasseResult<Option<ProductGroup>> {
    Ok(None)
  }

  async fn menu_by_slug(&self, _slug: &str, _region: &Region) -> KasseResult<Option<Menu>> {
    Ok(None)
  }
}

/// A context over `api` whose store already holds `token`, resolved.
pub async fn resolved_context(api: Arc<MockCommerceApi>, token: Option<&str>) -> CheckoutContext {
  let store = Arc::new(MemoryTokenStore::new(token.map(CheckoutToken::from)));
  let context = CheckoutContext::new(api, store, region());
  context.resolve().await.expect("resolve should succeed against the mock");
  context
}

/// Yields until the mock has recorded `n` mutation calls.
pub async fn wait_for_mutations(api: &MockCommerceApi, n: usize) {
  for _ in 0..1000 {
    if api.mutation_calls().len() >= n {
      return;
    }
    tokio::task::yield_now().await;
  }
  panic!("expected {} mutation calls, saw {:?}", n, api.mutation_calls());
}
