// kasse/src/model/product.rs

//! Catalogue types: product cards for collections, full product details,
//! categories and collections, and the menus that link them.

use crate::model::checkout::{translated_name, Image, ProductId, Translation, VariantId};
use crate::model::money::TaxedMoney;
use crate::model::region::Region;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
  pub start: Option<TaxedMoney>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricing {
  #[serde(default)]
  pub price_range: Option<PriceRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
  pub name: String,
}

/// The slice of a product shown in grids and collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
  pub id: ProductId,
  pub name: String,
  pub slug: String,
  #[serde(default)]
  pub thumbnail: Option<Image>,
  #[serde(default)]
  pub category: Option<CategoryRef>,
  #[serde(default)]
  pub pricing: Option<ProductPricing>,
  #[serde(default)]
  pub translation: Option<Translation>,
}

impl ProductCard {
  pub fn display_name(&self) -> &str {
    translated_name(&self.translation, &self.name)
  }

  pub fn starting_price(&self) -> Option<&TaxedMoney> {
    self
      .pricing
      .as_ref()
      .and_then(|p| p.price_range.as_ref())
      .and_then(|r| r.start.as_ref())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPrice {
  pub price: Option<TaxedMoney>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailsVariant {
  pub id: VariantId,
  pub name: String,
  #[serde(default)]
  pub quantity_available: Option<i32>,
  #[serde(default)]
  pub pricing: Option<VariantPrice>,
  #[serde(default)]
  pub translation: Option<Translation>,
}

impl ProductDetailsVariant {
  pub fn display_name(&self) -> &str {
    translated_name(&self.translation, &self.name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
  pub id: ProductId,
  pub name: String,
  pub slug: String,
  /// Rich-text JSON document, as stored by the API.
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub thumbnail: Option<Image>,
  #[serde(default)]
  pub category: Option<CategoryRef>,
  #[serde(default)]
  pub variants: Vec<ProductDetailsVariant>,
  #[serde(default)]
  pub translation: Option<Translation>,
}

impl ProductDetails {
  pub fn display_name(&self) -> &str {
    translated_name(&self.translation, &self.name)
  }

  /// Variant picked by the `variant` query parameter. A product with a
  /// single variant always selects it.
  pub fn selected_variant(&self, requested: Option<&str>) -> Option<&ProductDetailsVariant> {
    if let [only] = self.variants.as_slice() {
      return Some(only);
    }
    let requested = requested?;
    self.variants.iter().find(|v| v.id.as_str() == requested)
  }

  /// Paragraph texts of the rich-text description, translated when a
  /// translation exists. Unparseable documents yield nothing.
  pub fn description_paragraphs(&self) -> Vec<String> {
    rich_text_paragraphs(translated_description(&self.translation, &self.description))
  }
}

/// A category or collection, as shown in a page hero above its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductGroup {
  pub id: String,
  pub name: String,
  pub slug: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub translation: Option<Translation>,
}

impl ProductGroup {
  pub fn display_name(&self) -> &str {
    translated_name(&self.translation, &self.name)
  }

  pub fn description_paragraphs(&self) -> Vec<String> {
    rich_text_paragraphs(translated_description(&self.translation, &self.description))
  }
}

/// A navigation menu. The home page shows one product block per item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub items: Option<Vec<MenuItem>>,
}

impl Menu {
  pub fn items(&self) -> &[MenuItem] {
    self.items.as_deref().unwrap_or_default()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub translation: Option<Translation>,
  #[serde(default)]
  pub collection: Option<ProductGroup>,
  #[serde(default)]
  pub category: Option<ProductGroup>,
}

/// What a menu item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget<'a> {
  Collection(&'a ProductGroup),
  Category(&'a ProductGroup),
}

impl MenuItem {
  pub fn display_name(&self) -> &str {
    translated_name(&self.translation, &self.name)
  }

  /// Collection first; items linking to neither (pages, URLs) have no
  /// product block.
  pub fn target(&self) -> Option<MenuTarget<'_>> {
    self
      .collection
      .as_ref()
      .map(MenuTarget::Collection)
      .or_else(|| self.category.as_ref().map(MenuTarget::Category))
  }
}

fn translated_description<'a>(translation: &'a Option<Translation>, fallback: &'a Option<String>) -> Option<&'a str> {
  translation
    .as_ref()
    .and_then(|t| t.description.as_deref())
    .or(fallback.as_deref())
}

fn rich_text_paragraphs(source: Option<&str>) -> Vec<String> {
  let Some(source) = source else {
    return Vec::new();
  };
  let Ok(document) = serde_json::from_str::<serde_json::Value>(source) else {
    return Vec::new();
  };
  document
    .get("blocks")
    .and_then(|b| b.as_array())
    .map(|blocks| {
      blocks
        .iter()
        .filter_map(|block| block.pointer("/data/text").and_then(|t| t.as_str()))
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductOrderField {
  #[default]
  Name,
  Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
  #[default]
  Asc,
  Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProductOrder {
  pub field: ProductOrderField,
  pub direction: OrderDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub collections: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub categories: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub search: Option<String>,
}

/// Parameters for one page of a product collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCollectionQuery {
  pub region: Region,
  pub filter: ProductFilter,
  pub sort_by: Option<ProductOrder>,
  pub first: u32,
  pub after: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
  pub has_next_page: bool,
  #[serde(default)]
  pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
  pub products: Vec<ProductCard>,
  pub page_info: PageInfo,
  pub total_count: Option<u32>,
}
