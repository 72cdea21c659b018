//! # Editor Document
//!
//! The page draft held by the editor and stored by the page service.
//!
//! ## Lifecycle
//!
//! ```text
//! fetch → parse → edit (new value per edit) → serialize → save
//! ```

use crate::{Block, BlockPatch, DocumentError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// The only document version this build reads and writes
pub const CURRENT_VERSION: u32 = 1;

/// Id given to the section created on first edit
pub const DEFAULT_SECTION_ID: &str = "sec_1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layout: Layout::Full,
            blocks: Vec::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorDocument {
    pub version: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Top-level keys the editor doesn't model, such as `raw_html`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EditorDocument {
    /// Empty document, as synthesized for pages without stored state
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            version: CURRENT_VERSION,
            title: title.into(),
            sections: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Hand-written page body that replaces the rendered blocks when set
    pub fn raw_html(&self) -> Option<&str> {
        self.extra
            .get("raw_html")
            .and_then(Value::as_str)
            .filter(|html| !html.trim().is_empty())
    }

    pub fn from_json(source: &str) -> Result<Self, DocumentError> {
        let doc: EditorDocument = serde_json::from_str(source)?;
        doc.check_version()
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let doc: EditorDocument = serde_json::from_value(value)?;
        doc.check_version()
    }

    fn check_version(self) -> Result<Self, DocumentError> {
        if self.version != CURRENT_VERSION {
            return Err(DocumentError::UnsupportedVersion(self.version));
        }
        Ok(self)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_value(&self) -> Result<Value, DocumentError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Blocks of the editable (first) section; empty if there is none
    pub fn blocks(&self) -> &[Block] {
        self.sections
            .first()
            .map(|section| section.blocks.as_slice())
            .unwrap_or(&[])
    }

    /// Copy of this document that is guaranteed to have a first section
    pub fn ensure_editable_section(&self) -> EditorDocument {
        let mut next = self.clone();
        next.editable_blocks();
        next
    }

    /// Mutable first-section blocks, creating the section if needed.
    ///
    /// Only call this on a document you own outright, e.g. a fresh clone.
    pub fn editable_blocks(&mut self) -> &mut Vec<Block> {
        if self.sections.is_empty() {
            self.sections.push(Section::new(DEFAULT_SECTION_ID));
        }
        &mut self.sections[0].blocks
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks().iter().find(|block| block.id() == id)
    }

    /// Index of a block in the editable section
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.blocks().iter().position(|block| block.id() == id)
    }

    /// Whether any section holds a block with this id
    pub fn contains_block(&self, id: &str) -> bool {
        self.sections
            .iter()
            .flat_map(|section| section.blocks.iter())
            .any(|block| block.id() == id)
    }

    /// Ids of every block in every section, in document order
    pub fn block_ids(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|section| section.blocks.iter())
            .map(Block::id)
            .collect()
    }

    /// Ids that appear more than once; empty for a well-formed document
    pub fn duplicate_block_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for id in self.block_ids() {
            if !seen.insert(id) && !duplicates.iter().any(|d: &String| d == id) {
                duplicates.push(id.to_string());
            }
        }
        duplicates
    }

    /// New document with one block's props edited
    pub fn with_block_patched(
        &self,
        id: &str,
        patch: &BlockPatch,
    ) -> Result<EditorDocument, DocumentError> {
        let index = self
            .position_of(id)
            .ok_or_else(|| DocumentError::BlockNotFound(id.to_string()))?;

        let patched = self.blocks()[index].patched(patch)?;
        let mut next = self.clone();
        next.editable_blocks()[index] = patched;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockKind;
    use serde_json::json;

    #[test]
    fn test_new_document_has_no_sections() {
        let doc = EditorDocument::new("Home");

        assert_eq!(doc.version, 1);
        assert_eq!(doc.title, "Home");
        assert!(doc.sections.is_empty());
        assert!(doc.blocks().is_empty());
    }

    #[test]
    fn test_ensure_editable_section_does_not_touch_input() {
        let doc = EditorDocument::new("Home");
        let next = doc.ensure_editable_section();

        assert!(doc.sections.is_empty());
        assert_eq!(next.sections.len(), 1);
        assert_eq!(next.sections[0].id, DEFAULT_SECTION_ID);
        assert_eq!(next.sections[0].layout, Layout::Full);
        assert!(next.sections[0].blocks.is_empty());
    }

    #[test]
    fn test_ensure_editable_section_keeps_existing() {
        let mut doc = EditorDocument::new("Home");
        doc.sections.push(Section::new("sec_custom"));

        let next = doc.ensure_editable_section();
        assert_eq!(next, doc);
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let doc = EditorDocument::from_value(json!({
            "version": 1,
            "title": "Home",
            "sections": [{ "id": "sec_1", "layout": "full" }]
        }))
        .unwrap();

        assert_eq!(doc.sections.len(), 1);
        assert!(doc.blocks().is_empty());
    }

    #[test]
    fn test_unmodelled_keys_survive_edits() {
        let stored = json!({
            "version": 1,
            "title": "T",
            "raw_html": "<marquee>hi</marquee>",
            "theme": { "accent": "#f00" },
            "sections": [{
                "id": "s",
                "layout": "full",
                "style": { "padding": 4 },
                "blocks": [{ "id": "a", "type": "text", "props": { "text": "x" } }]
            }]
        });

        let doc = EditorDocument::from_value(stored.clone()).unwrap();
        assert_eq!(doc.raw_html(), Some("<marquee>hi</marquee>"));
        assert_eq!(doc.sections[0].extra.get("style"), Some(&json!({ "padding": 4 })));

        let next = doc.with_block_patched("a", &BlockPatch::text("y")).unwrap();
        let mut expected = stored;
        expected["sections"][0]["blocks"][0]["props"]["text"] = json!("y");
        assert_eq!(next.to_value().unwrap(), expected);
    }

    #[test]
    fn test_blank_raw_html_is_ignored() {
        let doc = EditorDocument::from_value(json!({ "version": 1, "raw_html": "  " })).unwrap();
        assert_eq!(doc.raw_html(), None);
    }

    #[test]
    fn test_rejects_other_versions() {
        let result = EditorDocument::from_json(r#"{"version": 2, "title": "x", "sections": []}"#);
        assert!(matches!(result, Err(DocumentError::UnsupportedVersion(2))));
    }

    #[test]
    fn test_rejects_unknown_layout() {
        let result = EditorDocument::from_json(
            r#"{"version": 1, "title": "x", "sections": [{"id": "s", "layout": "grid", "blocks": []}]}"#,
        );
        assert!(matches!(result, Err(DocumentError::Malformed(_))));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let result = EditorDocument::from_json(r#"{"version": 1, "title": "#);
        assert!(matches!(result, Err(DocumentError::Malformed(_))));
    }

    #[test]
    fn test_duplicate_ids_are_reported() {
        let mut doc = EditorDocument::new("Home");
        let blocks = doc.editable_blocks();
        blocks.push(Block::with_id(BlockKind::Text, "a"));
        blocks.push(Block::with_id(BlockKind::Text, "b"));
        blocks.push(Block::with_id(BlockKind::Hero, "a"));
        blocks.push(Block::with_id(BlockKind::Hero, "a"));

        assert_eq!(doc.duplicate_block_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_with_block_patched_is_copy_on_write() {
        let mut doc = EditorDocument::new("Home");
        doc.editable_blocks()
            .push(Block::with_id(BlockKind::Text, "a"));

        let next = doc
            .with_block_patched("a", &BlockPatch::text("Hello"))
            .unwrap();

        assert_eq!(
            doc.block("a"),
            Some(&Block::with_id(BlockKind::Text, "a"))
        );
        match next.block("a") {
            Some(Block::Text { props, .. }) => assert_eq!(props.text, "Hello"),
            other => panic!("Expected text block, got {:?}", other),
        }
    }

    #[test]
    fn test_with_block_patched_missing_block() {
        let doc = EditorDocument::new("Home");
        let result = doc.with_block_patched("nope", &BlockPatch::text("x"));

        assert!(matches!(result, Err(DocumentError::BlockNotFound(_))));
    }
}
