// kasse/src/editor/list.rs

use crate::context::{CheckoutContext, CheckoutSnapshot};
use crate::editor::input::BrowserEngine;
use crate::editor::line::{EditorFlows, LineItemEditor};
use crate::error::KasseResult;
use crate::model::LineId;
use std::sync::Arc;
use tracing::{event, Level};

/// What a reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListChanges {
  pub added: Vec<LineId>,
  pub removed: Vec<LineId>,
  pub refreshed: Vec<LineId>,
}

impl ListChanges {
  pub fn is_empty(&self) -> bool {
    self.added.is_empty() && self.removed.is_empty() && self.refreshed.is_empty()
  }
}

/// The editors of every line of the current checkout, in checkout order.
#[derive(Debug)]
pub struct LineItemList {
  context: CheckoutContext,
  engine: BrowserEngine,
  flows: Arc<EditorFlows>,
  editors: Vec<LineItemEditor>,
  revision: Option<u64>,
}

impl LineItemList {
  pub fn new(context: CheckoutContext, engine: BrowserEngine) -> KasseResult<Self> {
    Ok(Self {
      context,
      engine,
      flows: Arc::new(EditorFlows::build()?),
      editors: Vec::new(),
      revision: None,
    })
  }

  pub fn editors(&self) -> &[LineItemEditor] {
    &self.editors
  }

  pub fn editor(&self, line_id: &LineId) -> Option<&LineItemEditor> {
    self.editors.iter().find(|e| &e.line_id() == line_id)
  }

  pub fn len(&self) -> usize {
    self.editors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.editors.is_empty()
  }

  /// Reconciles against the context's current snapshot.
  pub fn refresh(&mut self) -> KasseResult<ListChanges> {
    let snapshot = self.context.snapshot();
    self.reconcile(&snapshot)
  }

  /// Brings the editors in line with `snapshot`: new lines get an editor,
  /// lines missing from it lose theirs, the rest receive their new line.
  /// Editors that survive keep their state.
  pub fn reconcile(&mut self, snapshot: &CheckoutSnapshot) -> KasseResult<ListChanges> {
    if self.revision == Some(snapshot.revision) {
      return Ok(ListChanges::default());
    }

    let mut changes = ListChanges::default();
    let lines = snapshot.checkout.as_ref().map(|c| c.lines.as_slice()).unwrap_or_default();
    let mut previous = std::mem::take(&mut self.editors);
    let mut next = Vec::with_capacity(lines.len());

    for line in lines {
      match previous.iter().position(|e| e.line_id() == line.id) {
        Some(idx) => {
          let editor = previous.swap_remove(idx);
          if editor.sync_line(Arc::clone(line))? {
            changes.refreshed.push(line.id.clone());
          }
          next.push(editor);
        }
        None => {
          changes.added.push(line.id.clone());
          next.push(LineItemEditor::with_flows(
            Arc::clone(line),
            self.context.clone(),
            self.engine,
            Arc::clone(&self.flows),
          ));
        }
      }
    }
    changes.removed = previous.iter().map(LineItemEditor::line_id).collect();

    self.editors = next;
    self.revision = Some(snapshot.revision);
    if !changes.is_empty() {
      event!(
        Level::DEBUG,
        added = changes.added.len(),
        removed = changes.removed.len(),
        refreshed = changes.refreshed.len(),
        revision = snapshot.revision,
        "Line list reconciled."
      );
    }
    Ok(changes)
  }
}
