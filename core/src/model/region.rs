// kasse/src/model/region.rs

use serde::{Deserialize, Serialize};

/// Sales channel and content language a request is served in.
///
/// Every query and mutation is scoped by both; the locale selects which
/// translations the API returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
  pub channel: String,
  pub locale: String,
}

impl Region {
  pub fn new(channel: impl Into<String>, locale: impl Into<String>) -> Self {
    Self {
      channel: channel.into(),
      locale: locale.into(),
    }
  }

  /// Locale in the API's enum form: `en-us` becomes `EN_US`.
  pub fn language_code(&self) -> String {
    self.locale.replace('-', "_").to_uppercase()
  }
}
