//! # Pagesmith Document
//!
//! The versioned editor-state document that describes a page: one or more
//! sections, each holding an ordered list of typed blocks.
//!
//! ```text
//! EditorDocument (version 1)
//!   └─ sections[0]  (layout "full")
//!        └─ blocks: [hero, text, <unknown>, ...]
//! ```
//!
//! The editor only ever touches `sections[0]`. Block order in that list is
//! the render order; there is no separate index.
//!
//! Documents are values. Every edit produces a new `EditorDocument`, which
//! is what lets the editor swap its draft atomically.
//!
//! ## Wire format
//!
//! ```json
//! { "version": 1, "title": "Home", "sections": [
//!     { "id": "sec_1", "layout": "full", "blocks": [
//!         { "id": "blk_...", "type": "text", "props": { "text": "Hi" } }
//!     ]}
//! ]}
//! ```
//!
//! Blocks whose `type` is not known are kept verbatim as [`UnknownBlock`]
//! and written back out untouched.
//! Keys the model doesn't name, at any level, are carried in `extra` maps
//! so a load followed by a save leaves them in place.

mod block;
mod document;
mod error;
mod id_generator;

pub use block::{Block, BlockKind, BlockPatch, HeroProps, TextProps, UnknownBlock};
pub use document::{EditorDocument, Layout, Section, CURRENT_VERSION, DEFAULT_SECTION_ID};
pub use error::DocumentError;
pub use id_generator::BlockIdGenerator;
