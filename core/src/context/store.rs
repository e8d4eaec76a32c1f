// kasse/src/context/store.rs

use crate::model::CheckoutToken;
use parking_lot::Mutex;

/// Where the checkout token lives between page loads (a cookie, local
/// storage, a server-side session row).
pub trait TokenStore: Send + Sync {
  fn load(&self) -> Option<CheckoutToken>;
  fn save(&self, token: &CheckoutToken);
  fn clear(&self);
}

/// Process-local token storage, seeded from whatever the caller already
/// knows (for a server, the request cookie).
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
  token: Mutex<Option<CheckoutToken>>,
}

impl MemoryTokenStore {
  pub fn new(initial: Option<CheckoutToken>) -> Self {
    Self {
      token: Mutex::new(initial),
    }
  }
}

impl TokenStore for MemoryTokenStore {
  fn load(&self) -> Option<CheckoutToken> {
    self.token.lock().clone()
  }

  fn save(&self, token: &CheckoutToken) {
    *self.token.lock() = Some(token.clone());
  }

  fn clear(&self) {
    *self.token.lock() = None;
  }
}
