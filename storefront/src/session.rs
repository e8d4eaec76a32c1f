// storefront/src/session.rs

//! Per-browser cart sessions.
//!
//! A session owns one `CheckoutContext` and the `LineItemList` built over
//! it, so editor state (typed text, pending errors, in-flight generations)
//! survives between requests. Sessions are keyed by region and checkout
//! token; a browser without a token gets a throwaway session until its
//! first add-to-cart creates a checkout.

use kasse::editor::ListChanges;
use kasse::{
  BrowserEngine, CheckoutContext, CheckoutToken, CommerceApi, KasseResult, LineId, LineItemEditor, LineItemList,
  LineView, MemoryTokenStore, Region,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

pub struct CartSession {
  context: CheckoutContext,
  lines: Mutex<LineItemList>,
  last_seen: Mutex<Instant>,
}

impl CartSession {
  pub fn new(context: CheckoutContext, engine: BrowserEngine) -> KasseResult<Self> {
    let lines = LineItemList::new(context.clone(), engine)?;
    Ok(Self {
      context,
      lines: Mutex::new(lines),
      last_seen: Mutex::new(Instant::now()),
    })
  }

  pub fn context(&self) -> &CheckoutContext {
    &self.context
  }

  /// Brings the editors in line with the context's latest checkout.
  pub fn reconcile(&self) -> KasseResult<ListChanges> {
    self.lines.lock().refresh()
  }

  /// The editor for `line_id`, after a reconcile, applying the input rules
  /// of the requesting browser. Editors are handles, so the returned one can
  /// be awaited on without holding the list lock.
  pub fn editor(&self, line_id: &LineId, engine: BrowserEngine) -> KasseResult<Option<LineItemEditor>> {
    let mut lines = self.lines.lock();
    lines.refresh()?;
    Ok(lines.editor(line_id).map(|editor| editor.for_engine(engine)))
  }

  pub fn views(&self) -> KasseResult<Vec<LineView>> {
    let mut lines = self.lines.lock();
    lines.refresh()?;
    Ok(lines.editors().iter().map(LineItemEditor::view).collect())
  }

  pub fn touch(&self) {
    *self.last_seen.lock() = Instant::now();
  }

  pub fn idle_for(&self) -> Duration {
    self.last_seen.lock().elapsed()
  }
}

fn session_key(region: &Region, token: &CheckoutToken) -> String {
  format!("{}:{}:{}", region.channel, region.locale, token)
}

pub struct SessionRegistry {
  api: Arc<dyn CommerceApi>,
  sessions: Mutex<HashMap<String, Arc<CartSession>>>,
  idle_timeout: Duration,
}

impl SessionRegistry {
  pub fn new(api: Arc<dyn CommerceApi>, idle_timeout: Duration) -> Self {
    Self {
      api,
      sessions: Mutex::new(HashMap::new()),
      idle_timeout,
    }
  }

  /// The live session for `token` in `region`, or a freshly resolved one.
  /// A live session refetches its checkout so changes made elsewhere (another
  /// tab, an expired checkout, a placed order) show up on this request.
  ///
  /// A token the API no longer knows resolves to an empty session and is
  /// unregistered; callers compare `context().checkout_token()` with what
  /// the browser sent to notice that.
  #[instrument(name = "SessionRegistry::open", skip(self, token), fields(channel = %region.channel, has_token = token.is_some()), err(Display))]
  pub async fn open(
    &self,
    region: Region,
    token: Option<CheckoutToken>,
    engine: BrowserEngine,
  ) -> KasseResult<Arc<CartSession>> {
    if let Some(token) = &token {
      let key = session_key(&region, token);
      let existing = self.sessions.lock().get(&key).cloned();
      if let Some(session) = existing {
        session.touch();
        if session.context().refresh().await?.is_none() {
          info!(token = %token, "Checkout is gone, unregistering cart session.");
          self.forget(&key, &session);
        }
        return Ok(session);
      }
    }

    let store = Arc::new(MemoryTokenStore::new(token));
    let context = CheckoutContext::new(Arc::clone(&self.api), store, region);
    context.resolve().await?;
    let session = Arc::new(CartSession::new(context, engine)?);
    Ok(self.adopt(session))
  }

  /// Registers `session` under its current token. When another request
  /// registered the same token first, that session wins and is returned.
  pub fn adopt(&self, session: Arc<CartSession>) -> Arc<CartSession> {
    let Some(token) = session.context().checkout_token() else {
      debug!("Session has no checkout yet, not registering it.");
      return session;
    };
    let key = session_key(session.context().region(), &token);
    let mut sessions = self.sessions.lock();
    Arc::clone(sessions.entry(key).or_insert_with(|| {
      info!(token = %token, "Registered cart session.");
      session
    }))
  }

  fn forget(&self, key: &str, session: &Arc<CartSession>) {
    let mut sessions = self.sessions.lock();
    if sessions.get(key).is_some_and(|current| Arc::ptr_eq(current, session)) {
      sessions.remove(key);
    }
  }

  /// Drops sessions idle for longer than the configured timeout.
  pub fn prune_idle(&self) -> usize {
    let mut sessions = self.sessions.lock();
    let before = sessions.len();
    sessions.retain(|_, session| session.idle_for() < self.idle_timeout);
    let pruned = before - sessions.len();
    if pruned > 0 {
      info!(pruned, remaining = sessions.len(), "Pruned idle cart sessions.");
    }
    pruned
  }

  pub fn len(&self) -> usize {
    self.sessions.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.lock().is_empty()
  }
}
