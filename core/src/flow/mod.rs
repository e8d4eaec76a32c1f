// kasse/src/flow/mod.rs

//! A small engine for named-step async flows over shared data. The line
//! editor's commit and removal sequences are built on it.

pub mod control;
pub mod definition;
pub mod execution;
pub mod hooks;
pub mod shared;

pub use control::{FlowControl, FlowResult};
pub use definition::{Flow, Handler, StepDef};
pub use shared::SharedState;
