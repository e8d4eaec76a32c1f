// kasse/src/editor/removal.rs

use crate::api::CommerceApi;
use crate::context::CheckoutContext;
use crate::editor::state::{EditorNotice, LineState};
use crate::error::{KasseError, KasseResult};
use crate::flow::{Flow, FlowControl, SharedState};
use crate::model::{CheckoutToken, LineId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{event, Level};

pub(crate) const REMOVAL_STEPS: &[(&str, bool)] = &[("resolve_token", false), ("submit_removal", false)];

/// How a removal request ended. The line itself only disappears once the
/// context delivers a checkout without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RemoveOutcome {
  Requested,
  Rejected(usize),
  Unconfirmed,
  Failed(String),
}

pub(crate) struct RemovalRun {
  pub(crate) line: SharedState<LineState>,
  pub(crate) api: Arc<dyn CommerceApi>,
  pub(crate) context: CheckoutContext,
  pub(crate) token: Option<CheckoutToken>,
  pub(crate) outcome: RemoveOutcome,
}

impl RemovalRun {
  pub(crate) fn new(line: SharedState<LineState>, api: Arc<dyn CommerceApi>, context: CheckoutContext) -> Self {
    Self {
      line,
      api,
      context,
      token: None,
      outcome: RemoveOutcome::Unconfirmed,
    }
  }
}

pub(crate) fn build_removal_flow() -> KasseResult<Flow<RemovalRun, KasseError>> {
  let mut flow = Flow::new(REMOVAL_STEPS);
  flow.on_step("resolve_token", resolve_token)?;
  flow.on_step("submit_removal", submit_removal)?;
  Ok(flow)
}

async fn resolve_token(run: SharedState<RemovalRun>) -> KasseResult<FlowControl> {
  let mut run = run.write();
  match run.context.checkout_token() {
    Some(token) => {
      run.token = Some(token);
      Ok(FlowControl::Continue)
    }
    None => {
      let error = KasseError::MissingCheckoutToken;
      run.line.write().notice = Some(EditorNotice::Failed);
      run.outcome = RemoveOutcome::Failed(error.to_string());
      Ok(FlowControl::Stop)
    }
  }
}

async fn submit_removal(run: SharedState<RemovalRun>) -> KasseResult<FlowControl> {
  let (api, context, token, line_id, line) = {
    let run = run.read();
    let token = run.token.clone().ok_or(KasseError::MissingCheckoutToken)?;
    let line_id: LineId = run.line.read().line.id.clone();
    (Arc::clone(&run.api), run.context.clone(), token, line_id, run.line.clone())
  };

  event!(Level::DEBUG, %token, %line_id, "Submitting line removal.");
  let locale = context.region().language_code();
  let response = api.remove_checkout_line(&token, &line_id, &locale).await;

  let outcome = {
    let mut state = line.write();
    match response {
      Ok(None) => RemoveOutcome::Unconfirmed,
      Ok(Some(payload)) if payload.errors.is_empty() => {
        state.errors = None;
        state.notice = None;
        RemoveOutcome::Requested
      }
      Ok(Some(payload)) => {
        let count = payload.errors.len();
        event!(Level::INFO, %line_id, errors = count, "Line removal rejected.");
        state.errors = Some(payload.errors);
        RemoveOutcome::Rejected(count)
      }
      Err(e) => {
        event!(Level::WARN, %line_id, error = %e, "Line removal failed.");
        state.notice = Some(if e.is_transport() {
          EditorNotice::Unreachable
        } else {
          EditorNotice::Failed
        });
        RemoveOutcome::Failed(e.to_string())
      }
    }
  };

  run.write().outcome = outcome;
  Ok(FlowControl::Continue)
}
