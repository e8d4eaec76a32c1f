// kasse/src/editor/commit.rs

//! The quantity commit as a flow: `validate_quantity`, `mark_loading`,
//! `submit_update`, `reconcile`.

use crate::api::CommerceApi;
use crate::context::CheckoutContext;
use crate::editor::input::{parse_quantity, CommitTrigger, InputRejection};
use crate::editor::state::{EditorNotice, LineState, LoadingState};
use crate::error::{KasseError, KasseResult};
use crate::flow::{Flow, FlowControl, SharedState};
use crate::model::LinesMutationPayload;
use serde::Serialize;
use std::sync::Arc;
use tracing::{event, Level};

pub(crate) const COMMIT_STEPS: &[(&str, bool)] = &[
  ("validate_quantity", false),
  ("mark_loading", false),
  ("submit_update", false),
  ("reconcile", false),
];

/// How a commit ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum CommitOutcome {
  /// The trigger does not commit on this browser engine.
  Ignored,
  /// The field failed validation. No request was sent.
  Invalid(InputRejection),
  /// The server accepted the quantity.
  Confirmed,
  /// The server answered with this many errors.
  Rejected(usize),
  /// The response carried no payload.
  Unconfirmed,
  /// A later commit was submitted before this one's response arrived.
  Superseded,
  /// The request failed before the server answered.
  Failed(String),
}

pub(crate) struct CommitRun {
  pub(crate) line: SharedState<LineState>,
  pub(crate) api: Arc<dyn CommerceApi>,
  pub(crate) context: CheckoutContext,
  pub(crate) trigger: CommitTrigger,
  pub(crate) quantity: u32,
  pub(crate) generation: u64,
  pub(crate) edit_seq: u64,
  pub(crate) response: Option<KasseResult<Option<LinesMutationPayload>>>,
  pub(crate) outcome: CommitOutcome,
}

impl CommitRun {
  pub(crate) fn new(
    line: SharedState<LineState>,
    api: Arc<dyn CommerceApi>,
    context: CheckoutContext,
    trigger: CommitTrigger,
  ) -> Self {
    Self {
      line,
      api,
      context,
      trigger,
      quantity: 0,
      generation: 0,
      edit_seq: 0,
      response: None,
      outcome: CommitOutcome::Ignored,
    }
  }
}

pub(crate) fn build_commit_flow() -> KasseResult<Flow<CommitRun, KasseError>> {
  let mut flow = Flow::new(COMMIT_STEPS);
  flow.on_step("validate_quantity", validate_quantity)?;
  flow.on_step("mark_loading", mark_loading)?;
  flow.on_step("submit_update", submit_update)?;
  flow.on_step("reconcile", reconcile)?;
  Ok(flow)
}

async fn validate_quantity(run: SharedState<CommitRun>) -> KasseResult<FlowControl> {
  let mut run = run.write();
  let line = run.line.clone();
  let mut state = line.write();

  match parse_quantity(&state.field) {
    Err(rejection) => {
      event!(Level::DEBUG, line_id = %state.line.id, ?rejection, "Quantity invalid, commit aborted.");
      state.loading = LoadingState::Settled;
      run.outcome = CommitOutcome::Invalid(rejection);
      Ok(FlowControl::Stop)
    }
    Ok(quantity) => {
      state.quantity = quantity;
      run.quantity = quantity;
      Ok(FlowControl::Continue)
    }
  }
}

async fn mark_loading(run: SharedState<CommitRun>) -> KasseResult<FlowControl> {
  let mut run = run.write();
  let line = run.line.clone();
  let mut state = line.write();
  state.generation += 1;
  state.loading = LoadingState::Loading;
  run.generation = state.generation;
  run.edit_seq = state.edit_seq;
  Ok(FlowControl::Continue)
}

async fn submit_update(run: SharedState<CommitRun>) -> KasseResult<FlowControl> {
  let (api, context, variant_id, quantity, generation, trigger) = {
    let run = run.read();
    let variant_id = run.line.read().line.variant.id.clone();
    (
      Arc::clone(&run.api),
      run.context.clone(),
      variant_id,
      run.quantity,
      run.generation,
      run.trigger,
    )
  };

  event!(Level::DEBUG, %variant_id, quantity, generation, %trigger, "Submitting quantity update.");
  let response = match context.checkout_token() {
    Some(token) => {
      let locale = context.region().language_code();
      api.update_checkout_line(&token, &variant_id, quantity, &locale).await
    }
    None => Err(KasseError::MissingCheckoutToken),
  };

  run.write().response = Some(response);
  Ok(FlowControl::Continue)
}

async fn reconcile(run: SharedState<CommitRun>) -> KasseResult<FlowControl> {
  let mut run = run.write();
  let line = run.line.clone();
  let mut state = line.write();

  if state.generation != run.generation {
    event!(
      Level::DEBUG,
      line_id = %state.line.id,
      stale = run.generation,
      latest = state.generation,
      "Discarding response of a superseded commit."
    );
    run.outcome = CommitOutcome::Superseded;
    return Ok(FlowControl::Stop);
  }

  let response = run
    .response
    .take()
    .ok_or_else(|| KasseError::Internal("commit reached reconcile without a response".to_string()))?;

  run.outcome = match response {
    Ok(None) => {
      state.loading = LoadingState::Loading;
      state.errors = None;
      CommitOutcome::Unconfirmed
    }
    Ok(Some(payload)) => {
      state.loading = LoadingState::Settled;
      state.notice = None;
      if payload.errors.is_empty() {
        state.errors = None;
        CommitOutcome::Confirmed
      } else {
        let count = payload.errors.len();
        event!(Level::INFO, line_id = %state.line.id, errors = count, "Quantity update rejected.");
        state.errors = Some(payload.errors);
        CommitOutcome::Rejected(count)
      }
    }
    Err(e) => {
      event!(Level::WARN, line_id = %state.line.id, error = %e, "Quantity update failed.");
      state.loading = LoadingState::Settled;
      state.notice = Some(if e.is_transport() {
        EditorNotice::Unreachable
      } else {
        EditorNotice::Failed
      });
      CommitOutcome::Failed(e.to_string())
    }
  };

  // The bound API has already published any returned checkout.
  let (current, _) = run.context.current_checkout();
  if let Some(fresh) = current.and_then(|c| c.line(&state.line.id).cloned()) {
    state.line = fresh;
  }
  if state.edit_seq == run.edit_seq {
    state.adopt_confirmed();
  }
  Ok(FlowControl::Continue)
}
