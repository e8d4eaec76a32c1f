// kasse/src/model/money.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary amount exactly as the commerce API reported it.
///
/// Amounts are displayed, never computed with locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
  #[serde(with = "rust_decimal::serde::float")]
  pub amount: Decimal,
  pub currency: String,
}

impl Money {
  pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
    Self {
      amount,
      currency: currency.into(),
    }
  }

  /// Display form used by rendered pages, e.g. `12.50 USD`.
  pub fn format(&self) -> String {
    format!("{:.2} {}", self.amount, self.currency)
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.format())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxedMoney {
  pub gross: Money,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub net: Option<Money>,
}
