//! # Pagesmith Editor
//!
//! Drag-and-drop editing engine for page documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ surfaces: palette, canvas, trash, inspector │
//! └─────────────────────────────────────────────┘
//!                     ↓ pointer events
//! ┌─────────────────────────────────────────────┐
//! │ drag: DragSession (hover target + edge)     │
//! └─────────────────────────────────────────────┘
//!                     ↓ DropIntent on release
//! ┌─────────────────────────────────────────────┐
//! │ engine: DropIntent::apply → new document    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: draft swap, selection, save/publish│
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Hover is cheap, drops are atomic**: the drag session only tracks
//!    where the pointer is; the document changes once, on release
//! 2. **Copy-on-write**: every edit yields a new `EditorDocument`
//! 3. **Stale targets are no-ops**: a drop that names a missing block
//!    leaves the document alone and is never reported as an error
//! 4. **Saves don't stomp edits**: a save response only replaces the draft
//!    if the draft is still what was sent
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagesmith_editor::{DragSource, DropTarget, EditorSession, Rect};
//! use pagesmith_document::BlockKind;
//!
//! let mut session = EditorSession::load(&service, "page-1").await?;
//!
//! session.start_drag(DragSource::Palette(BlockKind::Hero))?;
//! session.update_hover(target.clone(), dragged_rect, target_rect)?;
//! session.end_drag(target)?;
//!
//! session.save(&service).await?;
//! ```

mod drag;
mod engine;
mod errors;
mod service;
mod session;

pub use drag::{
    ActiveDrag, DragError, DragSession, DragSource, DragState, DropIntent, DropTarget, Edge, Rect,
};
pub use engine::{apply, delete_block, Applied, DropEffect, NoopReason};
pub use errors::EditorError;
pub use service::{
    NewPage, NewSite, PageRecord, PageService, PublishResponse, ServiceError, SiteRecord,
};
pub use session::{EditorSession, SaveRequest};

// Re-export document types for convenience
pub use pagesmith_document::{Block, BlockIdGenerator, BlockKind, BlockPatch, EditorDocument};
