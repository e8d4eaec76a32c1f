// kasse/src/model/checkout.rs

//! Checkout, lines and mutation errors as the commerce API returns them.

use crate::model::money::TaxedMoney;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! opaque_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(String);

    impl $name {
      pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
      }

      pub fn as_str(&self) -> &str {
        &self.0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }

    impl From<&str> for $name {
      fn from(value: &str) -> Self {
        Self(value.to_string())
      }
    }
  };
}

opaque_id!(
  /// Opaque token issued by the API when a checkout is created.
  CheckoutToken
);
opaque_id!(LineId);
opaque_id!(VariantId);
opaque_id!(ProductId);

/// Localized overrides for a named entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
  pub url: String,
  #[serde(default)]
  pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProduct {
  pub id: ProductId,
  pub name: String,
  pub slug: String,
  #[serde(default)]
  pub thumbnail: Option<Image>,
  #[serde(default)]
  pub translation: Option<Translation>,
}

impl LineProduct {
  pub fn display_name(&self) -> &str {
    translated_name(&self.translation, &self.name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
  pub id: VariantId,
  pub name: String,
  #[serde(default)]
  pub product: Option<LineProduct>,
  #[serde(default)]
  pub translation: Option<Translation>,
}

impl ProductVariant {
  pub fn display_name(&self) -> &str {
    translated_name(&self.translation, &self.name)
  }
}

pub(crate) fn translated_name<'a>(translation: &'a Option<Translation>, fallback: &'a str) -> &'a str {
  translation
    .as_ref()
    .and_then(|t| t.name.as_deref())
    .filter(|name| !name.is_empty())
    .unwrap_or(fallback)
}

/// One product variant in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
  pub id: LineId,
  pub variant: ProductVariant,
  pub quantity: u32,
  pub total_price: TaxedMoney,
}

/// The current cart. Lines are reference counted so that a consumer can
/// tell a freshly delivered line from the one it already holds with
/// `Arc::ptr_eq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
  pub token: CheckoutToken,
  #[serde(default, deserialize_with = "shared_lines")]
  pub lines: Vec<Arc<CheckoutLine>>,
  #[serde(default)]
  pub subtotal_price: Option<TaxedMoney>,
  #[serde(default)]
  pub total_price: Option<TaxedMoney>,
}

fn shared_lines<'de, D>(deserializer: D) -> Result<Vec<Arc<CheckoutLine>>, D::Error>
where
  D: Deserializer<'de>,
{
  let lines: Option<Vec<CheckoutLine>> = Option::deserialize(deserializer)?;
  Ok(lines.unwrap_or_default().into_iter().map(Arc::new).collect())
}

impl CheckoutSession {
  pub fn line(&self, id: &LineId) -> Option<&Arc<CheckoutLine>> {
    self.lines.iter().find(|line| &line.id == id)
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn item_count(&self) -> u32 {
    self.lines.iter().map(|line| line.quantity).sum()
  }
}

/// A field-scoped validation or business error from a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationError {
  #[serde(default)]
  pub field: Option<String>,
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub code: Option<String>,
}

impl MutationError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      field: Some(field.into()),
      message: message.into(),
      code: None,
    }
  }

  /// Key used when rendering the message next to its control.
  pub fn field_key(&self) -> &str {
    self.field.as_deref().unwrap_or("__all__")
  }
}

/// What a line mutation answers with when the API returned a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinesMutationPayload {
  #[serde(default)]
  pub errors: Vec<MutationError>,
  #[serde(default)]
  pub checkout: Option<CheckoutSession>,
}

impl LinesMutationPayload {
  pub fn is_success(&self) -> bool {
    self.errors.is_empty()
  }
}

/// A line to create or update: which variant and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineInput {
  pub variant_id: VariantId,
  pub quantity: u32,
}
