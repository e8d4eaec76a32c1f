// storefront/src/state.rs
use crate::config::AppConfig;
use crate::session::SessionRegistry;
use kasse::CommerceApi;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub api: Arc<dyn CommerceApi>,
  pub sessions: Arc<SessionRegistry>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(api: Arc<dyn CommerceApi>, config: Arc<AppConfig>) -> Self {
    let sessions = Arc::new(SessionRegistry::new(Arc::clone(&api), config.session_idle_timeout));
    Self { api, sessions, config }
  }
}
