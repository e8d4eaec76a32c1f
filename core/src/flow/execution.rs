// kasse/src/flow/execution.rs

//! `Flow::run()`: executes steps and their handlers in order.

use crate::error::KasseError;
use crate::flow::control::{FlowControl, FlowResult};
use crate::flow::definition::{Flow, Handler};
use crate::flow::shared::SharedState;
use tracing::{event, instrument, span, Instrument, Level};

enum PhaseOutcome<Err> {
  Continue,
  Stopped,
  Failed(Err),
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<KasseError> + Send + Sync + 'static,
{
  /// Executes the flow against `data`.
  ///
  /// A step whose handler returns `FlowControl::Stop` ends the run with
  /// `FlowResult::Stopped`. A handler error ends it with that error. A
  /// non-optional step with no handlers at all fails with
  /// `KasseError::HandlerMissing` converted into `Err`.
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(
      flow_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, data: SharedState<TData>) -> Result<FlowResult, Err> {
    event!(Level::DEBUG, "Flow execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(
        Level::DEBUG,
        "flow_step",
        step_name = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      let has_handlers = [&self.before, &self.on, &self.after]
        .iter()
        .any(|table| table.get(step_name).is_some_and(|v| !v.is_empty()));

      if !has_handlers {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
        return Err(Err::from(KasseError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for (phase, table) in [("before", &self.before), ("on", &self.on), ("after", &self.after)] {
        let Some(handlers) = table.get(step_name) else {
          continue;
        };
        match run_phase(phase, handlers, &data).instrument(step_span.clone()).await {
          PhaseOutcome::Continue => {}
          PhaseOutcome::Stopped => {
            event!(parent: &step_span, Level::DEBUG, phase, "Flow stopped by a handler.");
            return Ok(FlowResult::Stopped);
          }
          PhaseOutcome::Failed(e) => {
            event!(parent: &step_span, Level::WARN, phase, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowResult::Completed)
  }
}

async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: &[Handler<TData, Err>],
  data: &SharedState<TData>,
) -> PhaseOutcome<Err>
where
  TData: 'static + Send + Sync,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    let handler_span = span!(Level::TRACE, "flow_handler", phase, handler_index = handler_idx);
    match handler_fn(data.clone()).instrument(handler_span).await {
      Ok(FlowControl::Continue) => {}
      Ok(FlowControl::Stop) => return PhaseOutcome::Stopped,
      Err(e) => return PhaseOutcome::Failed(e),
    }
  }
  PhaseOutcome::Continue
}
