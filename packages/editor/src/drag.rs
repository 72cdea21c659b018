//! # Drag Session
//!
//! Tracks one in-progress drag gesture.
//!
//! ```text
//! Idle ──start_drag──▶ Dragging ──end_drag / cancel_drag──▶ Idle
//!                        │  ▲
//!                        └──┘ update_hover
//! ```
//!
//! A drag comes from the palette (carries a block type) or from the canvas
//! (carries the dragged block's id plus a snapshot for the ghost preview).
//! While dragging, the session remembers which canvas block is under the
//! pointer and whether the drop would land above or below it. Nothing here
//! touches the document: `end_drag` hands back a [`DropIntent`] and the
//! engine turns that into a new document.

use pagesmith_document::{Block, BlockKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-screen rectangle in canvas coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Which side of the hovered block a drop lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    #[default]
    Bottom,
}

impl Edge {
    /// `Top` when the dragged element's vertical center is above the
    /// target's midpoint, `Bottom` otherwise (ties go to `Bottom`)
    pub fn from_rects(dragged: &Rect, target: &Rect) -> Edge {
        if dragged.center_y() < target.center_y() {
            Edge::Top
        } else {
            Edge::Bottom
        }
    }

    /// Added to the target's index to get the insertion index
    pub fn offset(self) -> usize {
        match self {
            Edge::Top => 0,
            Edge::Bottom => 1,
        }
    }
}

/// Where a drag started
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// A new block of this type, dragged from the palette
    Palette(BlockKind),

    /// An existing canvas block. `snapshot` is for preview rendering only.
    CanvasBlock { id: String, snapshot: Block },
}

impl DragSource {
    pub fn canvas_block(block: &Block) -> Self {
        DragSource::CanvasBlock {
            id: block.id().to_string(),
            snapshot: block.clone(),
        }
    }
}

/// What the pointer is over
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DropTarget {
    #[default]
    None,
    CanvasBlock(String),
    Trash,
}

impl DropTarget {
    pub fn block(id: impl Into<String>) -> Self {
        DropTarget::CanvasBlock(id.into())
    }

    pub fn block_id(&self) -> Option<&str> {
        match self {
            DropTarget::CanvasBlock(id) => Some(id),
            _ => None,
        }
    }
}

/// The terminal (source, target, edge) triple of a finished drag
#[derive(Debug, Clone, PartialEq)]
pub struct DropIntent {
    pub source: DragSource,
    pub target: DropTarget,
    pub edge: Edge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    pub source: DragSource,
    pub hover_target: DropTarget,
    pub hover_edge: Edge,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DragError {
    #[error("A drag is already in progress")]
    AlreadyDragging,

    #[error("No drag in progress")]
    NotDragging,
}

/// Single drag session; at most one gesture is active at a time
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn active_source(&self) -> Option<&DragSource> {
        match &self.state {
            DragState::Dragging(active) => Some(&active.source),
            DragState::Idle => None,
        }
    }

    /// What the pointer is over; `None` while idle
    pub fn hover_target(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging(active) => Some(&active.hover_target),
            DragState::Idle => None,
        }
    }

    /// Id of the canvas block under the pointer, if any
    pub fn hover_target_block(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging(active) => active.hover_target.block_id(),
            DragState::Idle => None,
        }
    }

    pub fn is_over_trash(&self) -> bool {
        matches!(
            &self.state,
            DragState::Dragging(ActiveDrag {
                hover_target: DropTarget::Trash,
                ..
            })
        )
    }

    /// `Bottom` whenever no canvas block is hovered
    pub fn hover_edge(&self) -> Edge {
        match &self.state {
            DragState::Dragging(active) => active.hover_edge,
            DragState::Idle => Edge::Bottom,
        }
    }

    /// Insertion line to draw: the hovered block and the side it goes on
    pub fn indicator(&self) -> Option<(&str, Edge)> {
        self.hover_target_block()
            .map(|id| (id, self.hover_edge()))
    }

    pub fn start_drag(&mut self, source: DragSource) -> Result<(), DragError> {
        if self.is_dragging() {
            tracing::debug!(?source, "ignoring drag start while another drag is active");
            return Err(DragError::AlreadyDragging);
        }

        tracing::trace!(?source, "drag started");
        self.state = DragState::Dragging(ActiveDrag {
            source,
            hover_target: DropTarget::None,
            hover_edge: Edge::Bottom,
        });
        Ok(())
    }

    /// Record what the pointer is over and recompute the edge.
    ///
    /// The rectangles are only consulted for canvas-block targets.
    pub fn update_hover(
        &mut self,
        target: DropTarget,
        dragged: Rect,
        target_rect: Rect,
    ) -> Result<Edge, DragError> {
        let DragState::Dragging(active) = &mut self.state else {
            return Err(DragError::NotDragging);
        };

        active.hover_edge = match &target {
            DropTarget::CanvasBlock(_) => Edge::from_rects(&dragged, &target_rect),
            DropTarget::Trash | DropTarget::None => Edge::Bottom,
        };
        active.hover_target = target;

        Ok(active.hover_edge)
    }

    /// Finish the drag and return to idle.
    ///
    /// The hover edge carries over only if the drop lands on the block that
    /// was last hovered; otherwise the edge is `Bottom`.
    pub fn end_drag(&mut self, target: DropTarget) -> Result<DropIntent, DragError> {
        let DragState::Dragging(active) = std::mem::take(&mut self.state) else {
            return Err(DragError::NotDragging);
        };

        let edge = if active.hover_target == target {
            active.hover_edge
        } else {
            Edge::Bottom
        };

        Ok(DropIntent {
            source: active.source,
            target,
            edge,
        })
    }

    /// Abandon the drag. Returns whether a drag was active.
    pub fn cancel_drag(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        if was_dragging {
            tracing::trace!("drag cancelled");
        }
        was_dragging
    }
}
