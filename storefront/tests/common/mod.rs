// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::{test, web};
use async_trait::async_trait;
use kasse::model::{
  CheckoutLineInput, Menu, MenuItem, ProductCard, ProductCollectionQuery, ProductDetails, ProductGroup, ProductPage,
};
use kasse::{
  CheckoutLine, CheckoutSession, CheckoutToken, CommerceApi, KasseResult, LineId, LinesMutationPayload,
  MutationError, Region, VariantId,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storefront::{AppConfig, AppState};
use tracing::Level;

// --- Tracing ---
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
pub const COOKIE: &str = "checkoutToken";
pub const STOCK: u32 = 10;
pub const PREFIX: &str = "/default-channel/en-us";

pub fn config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    commerce_api_url: "http://commerce.invalid/graphql/".to_string(),
    default_channel: "default-channel".to_string(),
    default_locale: "en-us".to_string(),
    checkout_cookie_name: COOKIE.to_string(),
    request_timeout: Duration::from_secs(5),
    products_per_page: 2,
    homepage_menu: "homepage".to_string(),
    session_idle_timeout: Duration::from_secs(1800),
  }
}

/// A cart line priced at `unit` dollars per item.
pub fn line(id: &str, variant: &str, quantity: u32, unit: f64) -> CheckoutLine {
  serde_json::from_value(json!({
    "id": id,
    "quantity": quantity,
    "totalPrice": { "gross": { "amount": unit * f64::from(quantity), "currency": "USD" } },
    "variant": {
      "id": variant,
      "name": format!("{} size", variant),
      "product": {
        "id": format!("P-{}", variant),
        "name": format!("Product {}", variant),
        "slug": format!("product-{}", variant.to_lowercase()),
        "thumbnail": { "url": format!("https://cdn.example.com/{}.png", variant), "alt": null }
      }
    }
  }))
  .expect("line fixture should decode")
}

pub fn card(slug: &str, name: &str) -> ProductCard {
  serde_json::from_value(json!({
    "id": format!("P-{}", slug),
    "name": name,
    "slug": slug,
    "pricing": { "priceRange": { "start": { "gross": { "amount": 4.5, "currency": "USD" } } } }
  }))
  .expect("card fixture should decode")
}

pub fn product(slug: &str, variants: &[(&str, i32)]) -> ProductDetails {
  let variants: Vec<_> = variants
    .iter()
    .map(|(id, available)| {
      json!({
        "id": id,
        "name": format!("{} size", id),
        "quantityAvailable": available,
        "pricing": { "price": { "gross": { "amount": 12.0, "currency": "USD" } } }
      })
    })
    .collect();
  serde_json::from_value(json!({
    "id": format!("P-{}", slug),
    "name": format!("Product {}", slug),
    "slug": slug,
    "description": r#"{"blocks":[{"type":"paragraph","data":{"text":"Made of cotton."}}]}"#,
    "category": { "name": "Apparel" },
    "variants": variants
  }))
  .expect("product fixture should decode")
}

pub fn group(id: &str, slug: &str, name: &str) -> ProductGroup {
  ProductGroup {
    id: id.to_string(),
    name: name.to_string(),
    slug: slug.to_string(),
    description: None,
    translation: None,
  }
}

/// A home page menu with one item per group: collections first, then
/// categories.
pub fn menu(collections: &[ProductGroup], categories: &[ProductGroup]) -> Menu {
  let item = |group: &ProductGroup| MenuItem {
    id: format!("item-{}", group.slug),
    name: group.name.clone(),
    translation: None,
    collection: None,
    category: None,
  };
  let items = collections
    .iter()
    .map(|g| MenuItem {
      collection: Some(g.clone()),
      ..item(g)
    })
    .chain(categories.iter().map(|g| MenuItem {
      category: Some(g.clone()),
      ..item(g)
    }))
    .collect();
  Menu {
    id: "TWVudTox".to_string(),
    name: "homepage".to_string(),
    items: Some(items),
  }
}

// --- Fake backend ---

/// An in-memory commerce backend. Quantities above `STOCK` are refused the
/// way the real API refuses them.
#[derive(Default)]
pub struct FakeCommerce {
  checkouts: Mutex<HashMap<String, Vec<CheckoutLine>>>,
  products: Mutex<HashMap<String, ProductDetails>>,
  cards: Mutex<Vec<ProductCard>>,
  collections: Mutex<HashMap<String, ProductGroup>>,
  categories: Mutex<HashMap<String, ProductGroup>>,
  menus: Mutex<HashMap<String, Menu>>,
  queries: Mutex<Vec<ProductCollectionQuery>>,
  mutations: Mutex<Vec<String>>,
}

impl FakeCommerce {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  /// Token `T1` with lines `L1` (variant `V1`, 2 at $5) and `L2` (variant
  /// `V2`, 1 at $12.50).
  pub fn with_cart() -> Arc<Self> {
    let fake = Self::new();
    fake.checkouts.lock().insert(
      TOKEN.to_string(),
      vec![line("L1", "V1", 2, 5.0), line("L2", "V2", 1, 12.5)],
    );
    fake
  }

  pub fn add_cards(&self, cards: Vec<ProductCard>) {
    self.cards.lock().extend(cards);
  }

  pub fn add_product(&self, product: ProductDetails) {
    self.products.lock().insert(product.slug.clone(), product);
  }

  pub fn add_collection(&self, group: ProductGroup) {
    self.collections.lock().insert(group.slug.clone(), group);
  }

  pub fn add_category(&self, group: ProductGroup) {
    self.categories.lock().insert(group.slug.clone(), group);
  }

  pub fn add_menu(&self, slug: &str, menu: Menu) {
    self.menus.lock().insert(slug.to_string(), menu);
  }

  /// Drops a line behind the storefront's back, as another tab would.
  pub fn drop_line(&self, token: &str, line_id: &str) {
    if let Some(lines) = self.checkouts.lock().get_mut(token) {
      lines.retain(|line| line.id.as_str() != line_id);
    }
  }

  /// Forgets the checkout, as when it expires or becomes an order.
  pub fn expire(&self, token: &str) {
    self.checkouts.lock().remove(token);
  }

  pub fn lines(&self, token: &str) -> Option<Vec<CheckoutLine>> {
    self.checkouts.lock().get(token).cloned()
  }

  pub fn queries(&self) -> Vec<ProductCollectionQuery> {
    self.queries.lock().clone()
  }

  pub fn mutations(&self) -> Vec<String> {
    self.mutations.lock().clone()
  }

  fn session(token: &str, lines: &[CheckoutLine]) -> CheckoutSession {
    CheckoutSession {
      token: CheckoutToken::from(token),
      lines: lines.iter().cloned().map(Arc::new).collect(),
      subtotal_price: None,
      total_price: None,
    }
  }

  fn payload(token: &str, lines: &[CheckoutLine]) -> Option<LinesMutationPayload> {
    Some(LinesMutationPayload {
      errors: Vec::new(),
      checkout: Some(Self::session(token, lines)),
    })
  }

  fn stock_error() -> Option<LinesMutationPayload> {
    Some(LinesMutationPayload {
      errors: vec![MutationError::new("quantity", format!("Only {} remaining in stock.", STOCK))],
      checkout: None,
    })
  }

  fn with_quantity(existing: &CheckoutLine, quantity: u32) -> CheckoutLine {
    let unit = existing.total_price.gross.amount / Decimal::from(existing.quantity.max(1));
    let mut line = existing.clone();
    line.quantity = quantity;
    line.total_price.gross.amount = unit * Decimal::from(quantity);
    line
  }
}

#[async_trait]
impl CommerceApi for FakeCommerce {
  async fn checkout_by_token(&self, token: &CheckoutToken, _locale: &str) -> KasseResult<Option<CheckoutSession>> {
    Ok(self.lines(token.as_str()).map(|lines| Self::session(token.as_str(), &lines)))
  }

  async fn update_checkout_line(
    &self,
    token: &CheckoutToken,
    variant_id: &VariantId,
    quantity: u32,
    _locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self.mutations.lock().push(format!("update {} {}", variant_id, quantity));
    if quantity > STOCK {
      return Ok(Self::stock_error());
    }
    let mut checkouts = self.checkouts.lock();
    let Some(lines) = checkouts.get_mut(token.as_str()) else {
      return Ok(None);
    };
    for line in lines.iter_mut() {
      if &line.variant.id == variant_id {
        *line = Self::with_quantity(line, quantity);
      }
    }
    Ok(Self::payload(token.as_str(), lines))
  }

  async fn remove_checkout_line(
    &self,
    token: &CheckoutToken,
    line_id: &LineId,
    _locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self.mutations.lock().push(format!("remove {}", line_id));
    let mut checkouts = self.checkouts.lock();
    let Some(lines) = checkouts.get_mut(token.as_str()) else {
      return Ok(None);
    };
    lines.retain(|line| &line.id != line_id);
    Ok(Self::payload(token.as_str(), lines))
  }

  async fn create_checkout(
    &self,
    _channel: &str,
    lines: &[CheckoutLineInput],
    _locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self.mutations.lock().push(format!("create {}", lines.len()));
    let created: Vec<CheckoutLine> = lines
      .iter()
      .map(|input| {
        line(
          &format!("L-{}", input.variant_id),
          input.variant_id.as_str(),
          input.quantity,
          3.0,
        )
      })
      .collect();
    self.checkouts.lock().insert("NEW".to_string(), created.clone());
    Ok(Self::payload("NEW", &created))
  }

  async fn add_checkout_lines(
    &self,
    token: &CheckoutToken,
    lines: &[CheckoutLineInput],
    _locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self.mutations.lock().push(format!("add {}", lines.len()));
    if lines.iter().any(|input| input.quantity > STOCK) {
      return Ok(Self::stock_error());
    }
    let mut checkouts = self.checkouts.lock();
    let Some(existing) = checkouts.get_mut(token.as_str()) else {
      return Ok(None);
    };
    for input in lines {
      existing.push(line(
        &format!("L-{}", input.variant_id),
        input.variant_id.as_str(),
        input.quantity,
        3.0,
      ));
    }
    Ok(Self::payload(token.as_str(), existing))
  }

  async fn product_collection(&self, query: &ProductCollectionQuery) -> KasseResult<ProductPage> {
    self.queries.lock().push(query.clone());
    let cards = self.cards.lock().clone();
    let start = query
      .after
      .as_deref()
      .and_then(|cursor| cursor.parse::<usize>().ok())
      .unwrap_or(0);
    let end = (start + query.first as usize).min(cards.len());
    let products = cards.get(start..end).map(<[ProductCard]>::to_vec).unwrap_or_default();
    Ok(ProductPage {
      products,
      page_info: kasse::model::PageInfo {
        has_next_page: end < cards.len(),
        end_cursor: Some(end.to_string()),
      },
      total_count: Some(cards.len() as u32),
    })
  }

  async fn product_by_slug(&self, slug: &str, _region: &Region) -> KasseResult<Option<ProductDetails>> {
    Ok(self.products.lock().get(slug).cloned())
  }

  async fn collection_by_slug(&self, slug: &str, _region: &Region) -> KasseResult<Option<ProductGroup>> {
    Ok(self.collections.lock().get(slug).cloned())
  }

  async fn category_by_slug(&self, slug: &str, _region: &Region) -> KasseResult<Option<ProductGroup>> {
    Ok(self.categories.lock().get(slug).cloned())
  }

  async fn menu_by_slug(&self, slug: &str, _region: &Region) -> KasseResult<Option<Menu>> {
    Ok(self.menus.lock().get(slug).cloned())
  }
}

// --- App harness ---

pub fn app_state(api: Arc<FakeCommerce>) -> AppState {
  AppState::new(api, Arc::new(config()))
}

pub fn app_data(state: &AppState) -> web::Data<AppState> {
  web::Data::new(state.clone())
}

pub async fn body_text<B: MessageBody>(response: ServiceResponse<B>) -> String {
  let bytes = test::read_body(response).await;
  String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
