// kasse/src/editor/line.rs

use crate::api::CommerceApi;
use crate::context::CheckoutContext;
use crate::editor::commit::{build_commit_flow, CommitOutcome, CommitRun};
use crate::editor::input::{parse_quantity, BrowserEngine, CommitTrigger, Key, KeyOutcome};
use crate::editor::removal::{build_removal_flow, RemovalRun, RemoveOutcome};
use crate::editor::state::{LineState, LineView, LoadingState};
use crate::error::{KasseError, KasseResult};
use crate::flow::{Flow, SharedState};
use crate::model::{CheckoutLine, LineId};
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// The commit and removal flows. Built once and shared by every editor of a
/// list.
pub struct EditorFlows {
  pub(crate) commit: Flow<CommitRun, KasseError>,
  pub(crate) removal: Flow<RemovalRun, KasseError>,
}

impl EditorFlows {
  pub fn build() -> KasseResult<Self> {
    Ok(Self {
      commit: build_commit_flow()?,
      removal: build_removal_flow()?,
    })
  }

  pub fn commit_steps(&self) -> Vec<&str> {
    self.commit.step_names()
  }

  pub fn removal_steps(&self) -> Vec<&str> {
    self.removal.step_names()
  }
}

impl fmt::Debug for EditorFlows {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EditorFlows")
      .field("commit", &self.commit_steps())
      .field("removal", &self.removal_steps())
      .finish()
  }
}

/// Controller for one cart line: quantity edits, commits and removal.
///
/// Mutations go through the context's bound API, so the context picks up
/// every result on its own. Clones share state.
#[derive(Clone)]
pub struct LineItemEditor {
  state: SharedState<LineState>,
  context: CheckoutContext,
  api: Arc<dyn CommerceApi>,
  engine: BrowserEngine,
  flows: Arc<EditorFlows>,
}

impl fmt::Debug for LineItemEditor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LineItemEditor")
      .field("state", &*self.state.read())
      .field("engine", &self.engine)
      .finish()
  }
}

impl LineItemEditor {
  pub fn new(line: Arc<CheckoutLine>, context: CheckoutContext, engine: BrowserEngine) -> KasseResult<Self> {
    Ok(Self::with_flows(line, context, engine, Arc::new(EditorFlows::build()?)))
  }

  pub fn with_flows(
    line: Arc<CheckoutLine>,
    context: CheckoutContext,
    engine: BrowserEngine,
    flows: Arc<EditorFlows>,
  ) -> Self {
    let api = context.api();
    Self {
      state: SharedState::new(LineState::new(line)),
      context,
      api,
      engine,
      flows,
    }
  }

  pub fn line_id(&self) -> LineId {
    self.state.read().line.id.clone()
  }

  pub fn engine(&self) -> BrowserEngine {
    self.engine
  }

  /// A handle on the same line state that applies `engine`'s input rules.
  /// A shared cart can be edited from more than one browser.
  pub fn for_engine(&self, engine: BrowserEngine) -> Self {
    Self {
      engine,
      ..self.clone()
    }
  }

  /// A copy of the current state.
  pub fn state(&self) -> LineState {
    self.state.read().clone()
  }

  pub fn view(&self) -> LineView {
    LineView::from(&*self.state.read())
  }

  /// Takes a line delivered by the context. A new `Arc` resets the
  /// quantity to the confirmed value, unless the shopper has typed an edit
  /// the server has not seen yet. Returns whether the line changed.
  pub fn sync_line(&self, line: Arc<CheckoutLine>) -> KasseResult<bool> {
    let mut state = self.state.write();
    if state.line.id != line.id {
      return Err(KasseError::LineMismatch {
        expected: state.line.id.to_string(),
        actual: line.id.to_string(),
      });
    }
    if Arc::ptr_eq(&state.line, &line) {
      return Ok(false);
    }
    state.line = line;
    if !state.has_pending_edit() {
      state.adopt_confirmed();
    }
    Ok(true)
  }

  /// Filters a keystroke. Only decimal digits reach the field.
  pub fn key_press(&self, key: Key) -> KeyOutcome {
    match key {
      Key::Enter => KeyOutcome::Commit,
      Key::Char(c) if c.is_ascii_digit() => {
        let mut field = self.state.read().field.clone();
        field.push(c);
        self.apply_field(field);
        KeyOutcome::Accepted
      }
      Key::Backspace => {
        let mut field = self.state.read().field.clone();
        field.pop();
        self.apply_field(field);
        KeyOutcome::Accepted
      }
      Key::Char(_) => KeyOutcome::Rejected,
    }
  }

  /// Change event carrying the whole field text.
  pub fn input(&self, raw: &str) {
    self.apply_field(raw.to_string());
  }

  fn apply_field(&self, text: String) {
    let mut state = self.state.write();
    if self.engine.tracks_change_events() {
      if let Ok(quantity) = parse_quantity(&text) {
        state.quantity = quantity;
      }
    }
    state.field = text;
    state.edit_seq += 1;
  }

  /// Focus gives the shopper a clean slate.
  pub fn focus(&self) {
    self.state.update(|s| {
      s.errors = None;
      s.notice = None;
    });
  }

  /// Commits the field's value.
  #[instrument(name = "LineItemEditor::commit", skip(self), fields(line_id = %self.line_id()), err(Display))]
  pub async fn commit(&self, trigger: CommitTrigger) -> KasseResult<CommitOutcome> {
    if trigger == CommitTrigger::Click && !self.engine.commits_on_click() {
      return Ok(CommitOutcome::Ignored);
    }

    let run = SharedState::new(CommitRun::new(
      self.state.clone(),
      Arc::clone(&self.api),
      self.context.clone(),
      trigger,
    ));

    if let Err(e) = self.flows.commit.run(run.clone()).await {
      let generation = run.read().generation;
      self.state.update(|s| {
        if s.generation == generation && s.loading.is_loading() {
          s.loading = LoadingState::Settled;
        }
      });
      return Err(e);
    }

    let outcome = run.read().outcome.clone();
    event!(Level::DEBUG, ?outcome, "Commit finished.");
    Ok(outcome)
  }

  /// Asks the API to delete this line. The editor keeps rendering it until
  /// the context delivers a checkout without it.
  #[instrument(name = "LineItemEditor::remove", skip(self), fields(line_id = %self.line_id()), err(Display))]
  pub async fn remove(&self) -> KasseResult<RemoveOutcome> {
    let run = SharedState::new(RemovalRun::new(
      self.state.clone(),
      Arc::clone(&self.api),
      self.context.clone(),
    ));
    self.flows.removal.run(run.clone()).await?;
    let outcome = run.read().outcome.clone();
    event!(Level::DEBUG, ?outcome, "Removal finished.");
    Ok(outcome)
  }
}
