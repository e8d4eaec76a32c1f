// kasse/src/editor/mod.rs

//! Line item editors: one controller per cart line that turns keystrokes
//! and commit triggers into quantity updates and removals, and keeps its
//! editable state consistent with what the server confirmed.
//!
//! Each commit takes a new generation; only the response of the latest one
//! is applied. An applied response resets the field to the confirmed
//! quantity unless the shopper typed again while it was in flight.

pub mod commit;
pub mod input;
mod line;
pub mod list;
pub mod removal;
pub mod render;
pub mod state;

pub use commit::CommitOutcome;
pub use input::{parse_quantity, BrowserEngine, CommitTrigger, InputRejection, Key, KeyOutcome, MAX_QUANTITY};
pub use line::{EditorFlows, LineItemEditor};
pub use list::{LineItemList, ListChanges};
pub use removal::RemoveOutcome;
pub use render::{render_line, LineActions};
pub use state::{EditorNotice, LineState, LineView, LoadingState};
