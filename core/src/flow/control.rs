// kasse/src/flow/control.rs

//! Signals for controlling flow execution and the outcome of a flow run.

/// Returned by a handler to say whether the flow should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  /// Run the remaining handlers of this step and the following steps.
  Continue,
  /// Halt immediately. No further handlers run, in this step or later ones.
  Stop,
}

/// Outcome of a full flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowResult {
  /// Every non-optional step ran to the end.
  Completed,
  /// A handler returned `FlowControl::Stop`.
  Stopped,
}
