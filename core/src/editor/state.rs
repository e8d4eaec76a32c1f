// kasse/src/editor/state.rs

use crate::model::{CheckoutLine, LineId, MutationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The editor's loading flag: never touched, waiting on the API, or done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
  #[default]
  Unset,
  Loading,
  Settled,
}

impl LoadingState {
  pub fn is_loading(self) -> bool {
    self == LoadingState::Loading
  }
}

/// A problem with the last commit that is not a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorNotice {
  /// The API could not be reached. Nothing was confirmed.
  Unreachable,
  /// The API answered with something other than a payload.
  Failed,
}

impl EditorNotice {
  pub fn message(self) -> &'static str {
    match self {
      EditorNotice::Unreachable => "Could not reach the store. Please try again.",
      EditorNotice::Failed => "This line could not be updated. Please try again.",
    }
  }
}

/// Everything one line editor knows.
#[derive(Debug, Clone, PartialEq)]
pub struct LineState {
  /// The line as last delivered by the checkout context.
  pub line: Arc<CheckoutLine>,
  /// Last valid quantity: confirmed, or typed and not yet confirmed.
  pub quantity: u32,
  /// Raw text of the quantity input.
  pub field: String,
  pub errors: Option<Vec<MutationError>>,
  pub loading: LoadingState,
  pub notice: Option<EditorNotice>,
  /// Bumped on every submitted commit; only the latest is applied.
  pub(crate) generation: u64,
  /// Bumped on every accepted edit of the field.
  pub(crate) edit_seq: u64,
  /// `edit_seq` at the point the field last matched the server.
  pub(crate) synced_seq: u64,
}

impl LineState {
  pub fn new(line: Arc<CheckoutLine>) -> Self {
    Self {
      quantity: line.quantity,
      field: line.quantity.to_string(),
      line,
      errors: None,
      loading: LoadingState::Unset,
      notice: None,
      generation: 0,
      edit_seq: 0,
      synced_seq: 0,
    }
  }

  pub fn line_id(&self) -> &LineId {
    &self.line.id
  }

  pub fn confirmed_quantity(&self) -> u32 {
    self.line.quantity
  }

  /// Whether the shopper typed something the server has not seen.
  pub fn has_pending_edit(&self) -> bool {
    self.edit_seq != self.synced_seq
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn has_errors(&self) -> bool {
    self.errors.as_ref().is_some_and(|e| !e.is_empty())
  }

  /// Resets the field and quantity to what the server confirmed.
  pub(crate) fn adopt_confirmed(&mut self) {
    self.quantity = self.line.quantity;
    self.field = self.line.quantity.to_string();
    self.synced_seq = self.edit_seq;
  }
}

/// Serializable picture of a line editor, used by renderers and the JSON
/// event endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
  pub line_id: LineId,
  pub product_name: String,
  pub product_slug: Option<String>,
  pub variant_name: String,
  pub thumbnail_url: Option<String>,
  pub thumbnail_alt: String,
  pub quantity: u32,
  pub field: String,
  pub loading: LoadingState,
  pub disabled: bool,
  pub errors: Vec<MutationError>,
  pub notice: Option<String>,
  pub total: String,
}

impl From<&LineState> for LineView {
  fn from(state: &LineState) -> Self {
    let line = &state.line;
    let product = line.variant.product.as_ref();
    let thumbnail = product.and_then(|p| p.thumbnail.as_ref());
    LineView {
      line_id: line.id.clone(),
      product_name: product.map(|p| p.display_name().to_string()).unwrap_or_default(),
      product_slug: product.map(|p| p.slug.clone()),
      variant_name: line.variant.display_name().to_string(),
      thumbnail_url: thumbnail.map(|t| t.url.clone()),
      thumbnail_alt: thumbnail.and_then(|t| t.alt.clone()).unwrap_or_default(),
      quantity: state.quantity,
      field: state.field.clone(),
      loading: state.loading,
      disabled: state.loading.is_loading(),
      errors: state.errors.clone().unwrap_or_default(),
      notice: state.notice.map(|n| n.message().to_string()),
      total: line.total_price.gross.format(),
    }
  }
}
