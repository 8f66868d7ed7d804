//! Snapshot undo/redo over the document.
//!
//! Snapshots deep-copy tracks and canvas settings. The asset list is carried
//! by identity across undo and redo so probe results and loaded content are
//! never rolled back.

use crate::document::model::ProjectDocument;

/// Undo/redo stack holding the live document as its present state.
#[derive(Clone, Debug, Default)]
pub struct History {
    past: Vec<ProjectDocument>,
    /// The live document.
    pub present: ProjectDocument,
    future: Vec<ProjectDocument>,
}

impl History {
    /// Wrap a document with empty undo and redo stacks.
    pub fn new(present: ProjectDocument) -> Self {
        Self { past: Vec::new(), present, future: Vec::new() }
    }

    /// Record the current state before a structural edit. Clears the redo
    /// stack.
    pub fn checkpoint(&mut self) {
        self.past.push(self.present.clone());
        self.future.clear();
    }

    /// Whether undo is possible.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether redo is possible.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Step back one snapshot. The current asset list is kept.
    pub fn undo(&mut self) -> bool {
        let Some(mut prev) = self.past.pop() else {
            return false;
        };
        prev.assets = self.present.assets.clone();
        let current = std::mem::replace(&mut self.present, prev);
        self.future.push(current);
        true
    }

    /// Step forward one snapshot. The current asset list is kept.
    pub fn redo(&mut self) -> bool {
        let Some(mut next) = self.future.pop() else {
            return false;
        };
        next.assets = self.present.assets.clone();
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/history.rs"]
mod tests;
