// storefront/src/web/handlers/product_handlers.rs

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use kasse::model::{
  Menu, MenuTarget, OrderDirection, ProductCollectionQuery, ProductFilter, ProductGroup, ProductOrder, ProductOrderField,
  ProductPage,
};
use kasse::Region;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pages;
use crate::state::AppState;
use crate::web::extract::{region_from_parts, region_prefix, RegionPath};

/// Slug of the collection shown under every product page.
pub const SUGGESTED_COLLECTION: &str = "suggested-products";
const SUGGESTED_COUNT: u32 = 4;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ProductListQuery {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sort_field: Option<ProductOrderField>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sort_direction: Option<OrderDirection>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub after: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub collection: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub search: Option<String>,
}

impl ProductListQuery {
  fn sort_by(&self) -> Option<ProductOrder> {
    if self.sort_field.is_none() && self.sort_direction.is_none() {
      return None;
    }
    Some(ProductOrder {
      field: self.sort_field.unwrap_or_default(),
      direction: self.sort_direction.unwrap_or_default(),
    })
  }

  /// Blank search text means no search at all.
  fn search(&self) -> Option<String> {
    self
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
  }

  /// Same listing, next page.
  fn next_page(&self, base: &str, cursor: &str) -> Result<String, AppError> {
    let next = ProductListQuery {
      after: Some(cursor.to_string()),
      ..self.clone()
    };
    let query =
      serde_urlencoded::to_string(&next).map_err(|e| AppError::Internal(format!("Could not encode query: {}", e)))?;
    Ok(format!("{}?{}", base, query))
  }
}

#[derive(Deserialize, Debug)]
pub struct SlugPath {
  pub channel: String,
  pub locale: String,
  pub slug: String,
}

impl SlugPath {
  fn region(&self) -> Result<Region, AppError> {
    region_from_parts(&self.channel, &self.locale)
  }
}

#[derive(Deserialize, Debug)]
pub struct VariantQuery {
  pub variant: Option<String>,
}

fn html(body: String) -> HttpResponse {
  HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

async fn fetch_page(
  app_state: &AppState,
  region: &Region,
  filter: ProductFilter,
  listing: &ProductListQuery,
) -> Result<ProductPage, AppError> {
  let query = ProductCollectionQuery {
    region: region.clone(),
    filter,
    sort_by: listing.sort_by(),
    first: app_state.config.products_per_page,
    after: listing.after.clone(),
  };
  Ok(app_state.api.product_collection(&query).await?)
}

fn grid(region: &Region, page: &ProductPage, listing: &ProductListQuery, base: &str) -> Result<String, AppError> {
  let load_more = match page.page_info.end_cursor.as_deref() {
    Some(cursor) if page.page_info.has_next_page => Some(listing.next_page(base, cursor)?),
    _ => None,
  };
  Ok(pages::product_grid(region, &page.products, load_more.as_deref()))
}

#[instrument(
    name = "handler::list_products",
    skip(app_state, path, query),
    fields(channel = %path.channel, search = ?query.search, collection = ?query.collection)
)]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  path: web::Path<RegionPath>,
  query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
  let region = path.region()?;
  let listing = query.into_inner();

  let mut filter = ProductFilter {
    search: listing.search(),
    ..Default::default()
  };
  if let Some(slug) = listing.collection.as_deref() {
    let collection = app_state
      .api
      .collection_by_slug(slug, &region)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", slug)))?;
    filter.collections.push(collection.id);
  }

  let page = fetch_page(&app_state, &region, filter, &listing).await?;
  info!(count = page.products.len(), has_next = page.page_info.has_next_page, "Listed products.");
  let base = format!("{}/products", region_prefix(&region));
  let grid = grid(&region, &page, &listing, &base)?;
  Ok(html(pages::product_list_page(&region, "Products", None, &grid)))
}

/// Home page: one product block per item of the configured menu, all under
/// the same sort order.
#[instrument(
    name = "handler::home_page",
    skip(app_state, path, query),
    fields(channel = %path.channel, locale = %path.locale)
)]
pub async fn home_page_handler(
  app_state: web::Data<AppState>,
  path: web::Path<RegionPath>,
  query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
  let region = path.region()?;
  let query = query.into_inner();
  let listing = ProductListQuery {
    sort_field: query.sort_field,
    sort_direction: query.sort_direction,
    ..Default::default()
  };
  let prefix = region_prefix(&region);

  let menu_slug = &app_state.config.homepage_menu;
  let menu = app_state.api.menu_by_slug(menu_slug, &region).await?;
  if menu.is_none() {
    warn!(menu = %menu_slug, "Home page menu not found.");
  }

  let mut blocks = Vec::new();
  for item in menu.iter().flat_map(Menu::items) {
    let Some(target) = item.target() else {
      continue;
    };
    let (filter, href) = match target {
      MenuTarget::Collection(group) => (
        ProductFilter {
          collections: vec![group.id.clone()],
          ..Default::default()
        },
        format!("{}/collections/{}", prefix, group.slug),
      ),
      MenuTarget::Category(group) => (
        ProductFilter {
          categories: vec![group.id.clone()],
          ..Default::default()
        },
        format!("{}/category/{}", prefix, group.slug),
      ),
    };
    let page = fetch_page(&app_state, &region, filter, &listing).await?;
    blocks.push(pages::home_block(&region, item.display_name(), &href, &page.products));
  }

  info!(blocks = blocks.len(), "Rendered home page.");
  let sorter = pages::sort_control(&format!("{}/", prefix), listing.sort_field, listing.sort_direction);
  Ok(html(pages::home_page(&region, &sorter, &blocks)))
}

async fn group_page(
  app_state: &AppState,
  region: &Region,
  group: &ProductGroup,
  filter: ProductFilter,
  listing: &ProductListQuery,
  base: &str,
) -> Result<HttpResponse, AppError> {
  let page = fetch_page(app_state, region, filter, listing).await?;
  let grid = grid(region, &page, listing, base)?;
  let hero = pages::group_hero(group);
  Ok(html(pages::product_list_page(region, group.display_name(), Some(&hero), &grid)))
}

#[instrument(name = "handler::category_page", skip(app_state, path, query), fields(slug = %path.slug))]
pub async fn category_page_handler(
  app_state: web::Data<AppState>,
  path: web::Path<SlugPath>,
  query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
  let region = path.region()?;
  let category = app_state
    .api
    .category_by_slug(&path.slug, &region)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", path.slug)))?;

  let filter = ProductFilter {
    categories: vec![category.id.clone()],
    ..Default::default()
  };
  let base = format!("{}/category/{}", region_prefix(&region), path.slug);
  group_page(&app_state, &region, &category, filter, &query, &base).await
}

#[instrument(name = "handler::collection_page", skip(app_state, path, query), fields(slug = %path.slug))]
pub async fn collection_page_handler(
  app_state: web::Data<AppState>,
  path: web::Path<SlugPath>,
  query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
  let region = path.region()?;
  let collection = app_state
    .api
    .collection_by_slug(&path.slug, &region)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", path.slug)))?;

  let filter = ProductFilter {
    collections: vec![collection.id.clone()],
    ..Default::default()
  };
  let base = format!("{}/collections/{}", region_prefix(&region), path.slug);
  group_page(&app_state, &region, &collection, filter, &query, &base).await
}

/// Suggested products for the product page. A failure here only costs the
/// page its suggestions.
async fn suggested_grid(app_state: &AppState, region: &Region, exclude_slug: &str) -> String {
  let collection = match app_state.api.collection_by_slug(SUGGESTED_COLLECTION, region).await {
    Ok(Some(collection)) => collection,
    Ok(None) => return String::new(),
    Err(e) => {
      warn!(error = %e, "Could not load the suggested collection.");
      return String::new();
    }
  };

  let query = ProductCollectionQuery {
    region: region.clone(),
    filter: ProductFilter {
      collections: vec![collection.id],
      ..Default::default()
    },
    sort_by: None,
    first: SUGGESTED_COUNT + 1,
    after: None,
  };
  match app_state.api.product_collection(&query).await {
    Ok(page) => {
      let products: Vec<_> = page
        .products
        .into_iter()
        .filter(|p| p.slug != exclude_slug)
        .take(SUGGESTED_COUNT as usize)
        .collect();
      if products.is_empty() {
        String::new()
      } else {
        pages::product_grid(region, &products, None)
      }
    }
    Err(e) => {
      warn!(error = %e, "Could not load suggested products.");
      String::new()
    }
  }
}

#[instrument(name = "handler::product_page", skip(app_state, path, query), fields(slug = %path.slug))]
pub async fn product_page_handler(
  app_state: web::Data<AppState>,
  path: web::Path<SlugPath>,
  query: web::Query<VariantQuery>,
) -> Result<HttpResponse, AppError> {
  let region = path.region()?;
  let product = app_state
    .api
    .product_by_slug(&path.slug, &region)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", path.slug)))?;

  let suggested = suggested_grid(&app_state, &region, &product.slug).await;
  Ok(html(pages::product_page(
    &region,
    &product,
    query.variant.as_deref(),
    &suggested,
  )))
}
