//! # Reorder/Insert Engine
//!
//! Turns a finished drag into a new document.
//!
//! ## Drop Semantics
//!
//! Cases are checked in this order:
//!
//! ### Delete
//! - Canvas block dropped on the trash
//! - Removes the block from the first section
//! - Missing id is a no-op
//!
//! ### Insert
//! - Palette item dropped anywhere
//! - Over an existing block: lands above (`Top`) or below (`Bottom`) it
//! - Anywhere else, or over a block that no longer exists: appended
//!
//! ### Reorder
//! - Canvas block dropped on another canvas block
//! - The target's position is looked up after the dragged block is taken
//!   out, so `Bottom` on the block just above means "stay put"
//! - Dropping a block on itself, or naming a missing block, is a no-op
//!
//! Anything else is a no-op. The engine never fails: stale references are
//! reported through [`DropEffect::Noop`] and a debug event only.

use crate::drag::{DragSource, DropIntent, DropTarget, Edge};
use pagesmith_document::{Block, BlockIdGenerator, BlockKind, EditorDocument};

/// Why a drop changed nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoopReason {
    /// A block was dropped onto itself
    SelfDrop,

    /// The drop named a block id that isn't in the list
    ReferenceNotFound(String),

    /// No case handles this source/target combination
    Unsupported,
}

/// What a drop did to the block list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropEffect {
    Inserted { id: String, index: usize },
    Moved { id: String, from: usize, to: usize },
    Deleted { id: String, index: usize },
    Noop(NoopReason),
}

impl DropEffect {
    pub fn is_noop(&self) -> bool {
        matches!(self, DropEffect::Noop(_))
    }

    /// The block that was inserted, moved or deleted
    pub fn block_id(&self) -> Option<&str> {
        match self {
            DropEffect::Inserted { id, .. }
            | DropEffect::Moved { id, .. }
            | DropEffect::Deleted { id, .. } => Some(id),
            DropEffect::Noop(_) => None,
        }
    }
}

/// Result of applying a drop
#[derive(Debug, Clone)]
pub struct Applied {
    /// The next document (an unchanged copy for no-ops)
    pub document: EditorDocument,

    pub effect: DropEffect,
}

impl Applied {
    fn noop(doc: &EditorDocument, reason: NoopReason) -> Self {
        tracing::debug!(?reason, "drop left document unchanged");
        Self {
            document: doc.clone(),
            effect: DropEffect::Noop(reason),
        }
    }
}

impl DropIntent {
    /// Compute the document that results from this drop.
    ///
    /// `ids` supplies the id for blocks created from the palette.
    pub fn apply(&self, doc: &EditorDocument, ids: &mut BlockIdGenerator) -> Applied {
        match (&self.source, &self.target) {
            (DragSource::CanvasBlock { id, .. }, DropTarget::Trash) => delete_block(doc, id),

            (DragSource::Palette(kind), target) => {
                insert_from_palette(doc, *kind, target, self.edge, ids)
            }

            (DragSource::CanvasBlock { id, .. }, DropTarget::CanvasBlock(target_id)) => {
                reorder(doc, id, target_id, self.edge)
            }

            _ => Applied::noop(doc, NoopReason::Unsupported),
        }
    }
}

/// Free-function form of [`DropIntent::apply`]
pub fn apply(doc: &EditorDocument, intent: &DropIntent, ids: &mut BlockIdGenerator) -> Applied {
    intent.apply(doc, ids)
}

/// Remove a block from the first section
pub fn delete_block(doc: &EditorDocument, id: &str) -> Applied {
    let Some(index) = doc.position_of(id) else {
        return Applied::noop(doc, NoopReason::ReferenceNotFound(id.to_string()));
    };

    let mut next = doc.clone();
    next.editable_blocks().remove(index);

    Applied {
        document: next,
        effect: DropEffect::Deleted {
            id: id.to_string(),
            index,
        },
    }
}

fn insert_from_palette(
    doc: &EditorDocument,
    kind: BlockKind,
    target: &DropTarget,
    edge: Edge,
    ids: &mut BlockIdGenerator,
) -> Applied {
    let mut block = Block::new(kind, ids);
    while doc.contains_block(block.id()) {
        block = Block::new(kind, ids);
    }
    let id = block.id().to_string();

    let anchor = target.block_id().and_then(|target_id| doc.position_of(target_id));

    let mut next = doc.clone();
    let blocks = next.editable_blocks();
    let index = match anchor {
        Some(target_index) => target_index + edge.offset(),
        None => blocks.len(),
    };
    blocks.insert(index, block);

    Applied {
        document: next,
        effect: DropEffect::Inserted { id, index },
    }
}

fn reorder(doc: &EditorDocument, dragged_id: &str, target_id: &str, edge: Edge) -> Applied {
    if dragged_id == target_id {
        return Applied::noop(doc, NoopReason::SelfDrop);
    }

    let Some(from) = doc.position_of(dragged_id) else {
        return Applied::noop(doc, NoopReason::ReferenceNotFound(dragged_id.to_string()));
    };

    let mut next = doc.clone();
    let blocks = next.editable_blocks();
    let dragged = blocks.remove(from);

    let Some(target_index) = blocks.iter().position(|block| block.id() == target_id) else {
        return Applied::noop(doc, NoopReason::ReferenceNotFound(target_id.to_string()));
    };

    let to = (target_index + edge.offset()).min(blocks.len());
    blocks.insert(to, dragged);

    Applied {
        document: next,
        effect: DropEffect::Moved {
            id: dragged_id.to_string(),
            from,
            to,
        },
    }
}
