// kasse/src/api/graphql.rs

//! `CommerceApi` over HTTP GraphQL, using reqwest.

use crate::api::{documents, CommerceApi};
use crate::error::{KasseError, KasseResult};
use crate::model::{
  CheckoutLineInput, CheckoutSession, CheckoutToken, LineId, LinesMutationPayload, Menu, PageInfo, ProductCard,
  ProductCollectionQuery, ProductDetails, ProductGroup, ProductPage, Region, VariantId,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{event, instrument, Level};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
  operation_name: &'static str,
  query: &'a str,
  variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
  message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
  #[serde(default)]
  data: Option<Value>,
  #[serde(default)]
  errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
  node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductConnection {
  #[serde(default)]
  total_count: Option<u32>,
  #[serde(default)]
  edges: Vec<Edge<ProductCard>>,
  #[serde(default)]
  page_info: PageInfo,
}

/// A GraphQL client for a Saleor-compatible commerce endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
  endpoint: String,
  client: Client,
}

impl GraphQlClient {
  /// Builds a client whose requests give up after `timeout`.
  pub fn new(endpoint: impl Into<String>, timeout: Duration) -> KasseResult<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| KasseError::Configuration(format!("could not build HTTP client: {}", e)))?;
    Ok(Self::with_client(endpoint, client))
  }

  pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
    Self {
      endpoint: endpoint.into(),
      client,
    }
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  /// Posts one operation and returns the value under `root_field` in
  /// `data`, or `None` when the response has no data for it.
  async fn execute<T: DeserializeOwned>(
    &self,
    operation: &'static str,
    root_field: &str,
    query: &str,
    variables: Value,
  ) -> KasseResult<Option<T>> {
    let request = GraphQlRequest {
      operation_name: operation,
      query,
      variables,
    };

    let response = self
      .client
      .post(&self.endpoint)
      .json(&request)
      .send()
      .await
      .and_then(|r| r.error_for_status())
      .map_err(|source| KasseError::Transport { operation, source })?;

    let body = response
      .bytes()
      .await
      .map_err(|source| KasseError::Transport { operation, source })?;

    let envelope: GraphQlResponse =
      serde_json::from_slice(&body).map_err(|source| KasseError::Decode { operation, source })?;

    let messages: Vec<String> = envelope
      .errors
      .unwrap_or_default()
      .into_iter()
      .map(|e| e.message)
      .collect();

    let Some(mut data) = envelope.data.filter(|d| !d.is_null()) else {
      if messages.is_empty() {
        event!(Level::DEBUG, operation, "Response carried no data payload.");
        return Ok(None);
      }
      return Err(KasseError::GraphQl { operation, messages });
    };

    if !messages.is_empty() {
      event!(Level::WARN, operation, errors = ?messages, "Partial GraphQL response, using the data that came back.");
    }

    match data.get_mut(root_field).map(Value::take) {
      None | Some(Value::Null) => Ok(None),
      Some(value) => serde_json::from_value(value)
        .map(Some)
        .map_err(|source| KasseError::Decode { operation, source }),
    }
  }
}

#[async_trait]
impl CommerceApi for GraphQlClient {
  #[instrument(name = "GraphQlClient::checkout_by_token", skip(self, token), fields(token = %token), err(Display))]
  async fn checkout_by_token(&self, token: &CheckoutToken, locale: &str) -> KasseResult<Option<CheckoutSession>> {
    self
      .execute(
        "CheckoutByToken",
        "checkout",
        &documents::checkout_by_token(),
        json!({ "token": token, "locale": locale }),
      )
      .await
  }

  #[instrument(name = "GraphQlClient::update_checkout_line", skip(self, token, variant_id), fields(token = %token, variant_id = %variant_id), err(Display))]
  async fn update_checkout_line(
    &self,
    token: &CheckoutToken,
    variant_id: &VariantId,
    quantity: u32,
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    let lines = [CheckoutLineInput {
      variant_id: variant_id.clone(),
      quantity,
    }];
    self
      .execute(
        "CheckoutLineUpdate",
        "checkoutLinesUpdate",
        &documents::checkout_line_update(),
        json!({ "token": token, "lines": lines, "locale": locale }),
      )
      .await
  }

  #[instrument(name = "GraphQlClient::remove_checkout_line", skip(self, token, line_id), fields(token = %token, line_id = %line_id), err(Display))]
  async fn remove_checkout_line(
    &self,
    token: &CheckoutToken,
    line_id: &LineId,
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self
      .execute(
        "RemoveProductFromCheckout",
        "checkoutLineDelete",
        &documents::remove_product_from_checkout(),
        json!({ "checkoutToken": token, "lineId": line_id, "locale": locale }),
      )
      .await
  }

  #[instrument(name = "GraphQlClient::create_checkout", skip(self, lines), fields(num_lines = lines.len()), err(Display))]
  async fn create_checkout(
    &self,
    channel: &str,
    lines: &[CheckoutLineInput],
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self
      .execute(
        "CreateCheckout",
        "checkoutCreate",
        &documents::create_checkout(),
        json!({ "channel": channel, "lines": lines, "locale": locale }),
      )
      .await
  }

  #[instrument(name = "GraphQlClient::add_checkout_lines", skip(self, token, lines), fields(token = %token, num_lines = lines.len()), err(Display))]
  async fn add_checkout_lines(
    &self,
    token: &CheckoutToken,
    lines: &[CheckoutLineInput],
    locale: &str,
  ) -> KasseResult<Option<LinesMutationPayload>> {
    self
      .execute(
        "CheckoutAddProductLine",
        "checkoutLinesAdd",
        &documents::checkout_add_product_line(),
        json!({ "checkoutToken": token, "lines": lines, "locale": locale }),
      )
      .await
  }

  #[instrument(name = "GraphQlClient::product_collection", skip_all, fields(channel = %query.region.channel), err(Display))]
  async fn product_collection(&self, query: &ProductCollectionQuery) -> KasseResult<ProductPage> {
    let connection: Option<ProductConnection> = self
      .execute(
        "ProductCollection",
        "products",
        &documents::product_collection(),
        json!({
          "first": query.first,
          "after": query.after,
          "channel": query.region.channel,
          "locale": query.region.language_code(),
          "filter": query.filter,
          "sortBy": query.sort_by,
        }),
      )
      .await?;

    Ok(
      connection
        .map(|c| ProductPage {
          products: c.edges.into_iter().map(|e| e.node).collect(),
          page_info: c.page_info,
          total_count: c.total_count,
        })
        .unwrap_or_default(),
    )
  }

  #[instrument(name = "GraphQlClient::product_by_slug", skip(self, region), fields(channel = %region.channel), err(Display))]
  async fn product_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<ProductDetails>> {
    self
      .execute(
        "ProductBySlug",
        "product",
        &documents::product_by_slug(),
        json!({ "slug": slug, "channel": region.channel, "locale": region.language_code() }),
      )
      .await
  }

  #[instrument(name = "GraphQlClient::collection_by_slug", skip(self, region), fields(channel = %region.channel), err(Display))]
  async fn collection_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<ProductGroup>> {
    self
      .execute(
        "CollectionBySlug",
        "collection",
        &documents::collection_by_slug(),
        json!({ "slug": slug, "channel": region.channel, "locale": region.language_code() }),
      )
      .await
  }

  #[instrument(name = "GraphQlClient::category_by_slug", skip(self, region), err(Display))]
  async fn category_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<ProductGroup>> {
    self
      .execute(
        "CategoryBySlug",
        "category",
        &documents::category_by_slug(),
        json!({ "slug": slug, "locale": region.language_code() }),
      )
      .await
  }

  #[instrument(name = "GraphQlClient::menu_by_slug", skip(self, region), fields(channel = %region.channel), err(Display))]
  async fn menu_by_slug(&self, slug: &str, region: &Region) -> KasseResult<Option<Menu>> {
    self
      .execute(
        "MenuBySlug",
        "menu",
        &documents::menu_by_slug(),
        json!({ "slug": slug, "channel": region.channel, "locale": region.language_code() }),
      )
      .await
  }
}
