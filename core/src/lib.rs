// src/lib.rs

//! Kasse: session-scoped checkout state and line-item editing for headless
//! commerce storefronts.
//!
//! Kasse sits between a storefront's views and a remote commerce GraphQL
//! API. It provides:
//!  - A `CheckoutContext` holding one session's checkout token and the latest
//!    fetched checkout, published to subscribers through a watch channel.
//!  - `LineItemEditor`s that turn keystrokes and commit triggers into
//!    quantity updates and removals, discarding stale responses by
//!    generation.
//!  - The `CommerceApi` contract and a reqwest-based `GraphQlClient`.
//!  - A small named-step `Flow` engine the editor sequences run on.

pub mod api;
pub mod context;
pub mod editor;
pub mod error;
pub mod flow;
pub mod model;

// --- Re-exports for the Public API ---

pub use crate::api::{CommerceApi, GraphQlClient};
pub use crate::context::{CheckoutContext, CheckoutSnapshot, ContextBoundApi, MemoryTokenStore, TokenStore};
pub use crate::editor::{
  BrowserEngine, CommitOutcome, CommitTrigger, EditorNotice, Key, KeyOutcome, LineItemEditor, LineItemList, LineState,
  LineView, LoadingState, RemoveOutcome,
};
pub use crate::error::{KasseError, KasseResult};
pub use crate::flow::{Flow, FlowControl, FlowResult, SharedState, StepDef};
pub use crate::model::{
  CheckoutLine, CheckoutSession, CheckoutToken, LineId, LinesMutationPayload, Money, MutationError, Region, TaxedMoney,
  VariantId,
};

/*
    Typical request:
    1. Build one `GraphQlClient` per process and share it as `Arc<dyn CommerceApi>`.
    2. Per shopper session, create a `CheckoutContext` with a `TokenStore`
       seeded from the request (a cookie, say) and call `resolve()`.
    3. Keep a `LineItemList` per session and `refresh()` it before rendering.
    4. Route input events to the matching `LineItemEditor`: `key_press`,
       `input`, `focus`, `commit(trigger)`, `remove()`.
    5. Results land in the context by themselves; refresh the list again and render.
*/
