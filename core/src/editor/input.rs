// kasse/src/editor/input.rs

//! Keystroke filtering and the quantity field's native validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest quantity the field accepts before the API ever sees it.
pub const MAX_QUANTITY: u32 = 9_999;

/// A key pressed while the quantity field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "char", rename_all = "snake_case")]
pub enum Key {
  Char(char),
  Enter,
  Backspace,
}

/// What the editor did with a keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOutcome {
  /// The keystroke went into the field.
  Accepted,
  /// The keystroke was swallowed; the field is unchanged.
  Rejected,
  /// Enter: the caller should run a commit with `CommitTrigger::Enter`.
  Commit,
}

/// What fired a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitTrigger {
  Blur,
  Enter,
  /// Only commits on engines whose change events are unreliable before
  /// blur (see [`BrowserEngine::commits_on_click`]).
  Click,
}

impl fmt::Display for CommitTrigger {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      CommitTrigger::Blur => "blur",
      CommitTrigger::Enter => "enter",
      CommitTrigger::Click => "click",
    })
  }
}

/// Rendering engine of the shopper's browser, as far as the editor cares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserEngine {
  /// Firefox: number-input change events do not fire reliably before
  /// blur, so clicks commit and change events are ignored.
  Gecko,
  #[default]
  Other,
}

impl BrowserEngine {
  pub fn from_user_agent(user_agent: &str) -> Self {
    if user_agent.contains("Firefox") {
      BrowserEngine::Gecko
    } else {
      BrowserEngine::Other
    }
  }

  pub fn commits_on_click(self) -> bool {
    self == BrowserEngine::Gecko
  }

  pub fn tracks_change_events(self) -> bool {
    self != BrowserEngine::Gecko
  }
}

/// Why the field's value is not a valid quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRejection {
  Empty,
  NotANumber,
  NotWhole,
  BelowMinimum,
  AboveMaximum,
}

/// Validity as a `<input type="number" min="1" step="1" required>` judges
/// it: non-empty, numeric, whole, at least one.
pub fn parse_quantity(raw: &str) -> Result<u32, InputRejection> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Err(InputRejection::Empty);
  }
  let value: f64 = raw.parse().map_err(|_| InputRejection::NotANumber)?;
  if !value.is_finite() {
    return Err(InputRejection::NotANumber);
  }
  if value.fract() != 0.0 {
    return Err(InputRejection::NotWhole);
  }
  if value < 1.0 {
    return Err(InputRejection::BelowMinimum);
  }
  if value > f64::from(MAX_QUANTITY) {
    return Err(InputRejection::AboveMaximum);
  }
  Ok(value as u32)
}
