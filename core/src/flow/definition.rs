// kasse/src/flow/definition.rs

//! The `Flow<TData, Err>` struct, its step definitions and the methods that
//! shape it before it runs.

use crate::error::KasseError;
use crate::flow::control::FlowControl;
use crate::flow::shared::SharedState;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A step handler: an async function over the shared flow data.
///
/// Handlers lock `SharedState` to read or write, and must drop the guard
/// before awaiting anything.
pub type Handler<TData, Err> = Box<
  dyn Fn(SharedState<TData>) -> Pin<Box<dyn Future<Output = Result<FlowControl, Err>> + Send>> + Send + Sync,
>;

/// One named step of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  /// An optional step with no handlers is skipped instead of failing the run.
  pub optional: bool,
}

/// An ordered list of named steps, each with `before`, `on` and `after`
/// handlers, executed against one `SharedState<TData>`.
///
/// `Err` is what handlers return; it must absorb `KasseError` so that
/// setup problems found while running (a required step without handlers)
/// surface through the same channel.
pub struct Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<KasseError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef>,
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<KasseError> + Send + Sync + 'static,
{
  /// Creates a flow from `(name, optional)` pairs, in execution order.
  pub fn new(step_defs: &[(&str, bool)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
      })
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub(crate) fn ensure_step_exists(&self, step_name: &str) -> Result<usize, KasseError> {
    self
      .steps
      .iter()
      .position(|s| s.name == step_name)
      .ok_or_else(|| KasseError::StepNotFound {
        step_name: step_name.to_string(),
      })
  }

  /// Adds a new step right after `existing_step_name`.
  pub fn insert_after_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
  ) -> Result<(), KasseError> {
    let idx = self.ensure_step_exists(existing_step_name)?;
    let name: String = new_step_name.into();
    if self.steps.iter().any(|s| s.name == name) {
      return Err(KasseError::Configuration(format!(
        "step '{}' already exists in flow",
        name
      )));
    }
    self.steps.insert(idx + 1, StepDef { name, optional });
    Ok(())
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) -> Result<(), KasseError> {
    let idx = self.ensure_step_exists(step_name)?;
    if let Some(step) = self.steps.get_mut(idx) {
      step.optional = optional;
    }
    Ok(())
  }
}
