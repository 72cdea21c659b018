//! # Editor Session
//!
//! Holds one page's draft while it is being edited.
//!
//! The session owns the draft document, the block selection, the drag
//! session and the last snapshot known to be persisted. Every edit swaps
//! the draft for a new document value.
//!
//! Saving is split in two so that editing can continue while a request is
//! in flight: [`EditorSession::begin_save`] snapshots the draft, and
//! [`EditorSession::complete_save`] folds the response back in without
//! overwriting anything edited in the meantime.

use crate::drag::{DragSession, DragSource, DropTarget, Edge, Rect};
use crate::engine::{delete_block, DropEffect};
use crate::{EditorError, PageRecord, PageService, ServiceError};
use pagesmith_document::{Block, BlockIdGenerator, BlockKind, BlockPatch, EditorDocument};

/// Editing state for a single page
#[derive(Debug)]
pub struct EditorSession {
    /// Page metadata as last reported by the service
    page: PageRecord,

    /// Live draft
    draft: EditorDocument,

    /// What the service is known to hold
    persisted: EditorDocument,

    selected: Option<String>,

    drag: DragSession,

    ids: BlockIdGenerator,

    /// Parse error from the raw JSON panel; blocks saving while set
    raw_error: Option<String>,
}

/// Snapshot of the draft sent with a save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub page_id: String,
    pub document: EditorDocument,
}

impl EditorSession {
    /// Start editing a fetched page
    pub fn open(page: PageRecord) -> Result<Self, EditorError> {
        Self::open_with_ids(page, BlockIdGenerator::new())
    }

    pub fn open_with_ids(page: PageRecord, ids: BlockIdGenerator) -> Result<Self, EditorError> {
        let draft = page
            .editor_document()
            .map_err(|e| EditorError::MalformedDocument(e.to_string()))?;

        Ok(Self {
            page,
            persisted: draft.clone(),
            draft,
            selected: None,
            drag: DragSession::new(),
            ids,
            raw_error: None,
        })
    }

    /// Fetch a page and start editing it
    pub async fn load<S>(service: &S, page_id: &str) -> Result<Self, EditorError>
    where
        S: PageService + ?Sized,
    {
        let page = service.fetch_page(page_id).await?;
        tracing::info!(page_id, name = %page.name, "page loaded into editor");
        Self::open(page)
    }

    pub fn page(&self) -> &PageRecord {
        &self.page
    }

    pub fn page_id(&self) -> &str {
        &self.page.id
    }

    pub fn document(&self) -> &EditorDocument {
        &self.draft
    }

    pub fn blocks(&self) -> &[Block] {
        self.draft.blocks()
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn published_url(&self) -> Option<&str> {
        self.page.published_html_url.as_deref()
    }

    /// Whether the draft differs from the last persisted snapshot
    pub fn is_dirty(&self) -> bool {
        self.draft != self.persisted
    }

    pub fn can_save(&self) -> bool {
        self.raw_error.is_none()
    }

    pub fn raw_error(&self) -> Option<&str> {
        self.raw_error.as_deref()
    }

    pub fn summary(&self) -> String {
        format!("{} block(s) in first section", self.blocks().len())
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    pub fn start_drag(&mut self, source: DragSource) -> Result<(), EditorError> {
        Ok(self.drag.start_drag(source)?)
    }

    pub fn start_palette_drag(&mut self, kind: BlockKind) -> Result<(), EditorError> {
        self.start_drag(DragSource::Palette(kind))
    }

    /// Start dragging an existing block, snapshotting it for the preview
    pub fn start_block_drag(&mut self, id: &str) -> Result<(), EditorError> {
        let block = self
            .draft
            .block(id)
            .ok_or_else(|| EditorError::BlockNotFound(id.to_string()))?;
        let source = DragSource::canvas_block(block);
        self.start_drag(source)
    }

    pub fn update_hover(
        &mut self,
        target: DropTarget,
        dragged: Rect,
        target_rect: Rect,
    ) -> Result<Edge, EditorError> {
        Ok(self.drag.update_hover(target, dragged, target_rect)?)
    }

    /// Finish the drag and apply the drop to the draft
    pub fn end_drag(&mut self, target: DropTarget) -> Result<DropEffect, EditorError> {
        let intent = self.drag.end_drag(target)?;
        let applied = intent.apply(&self.draft, &mut self.ids);
        self.draft = applied.document;
        self.follow_selection(&applied.effect);
        Ok(applied.effect)
    }

    /// Abandon the drag without touching the draft
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel_drag()
    }

    fn follow_selection(&mut self, effect: &DropEffect) {
        match effect {
            DropEffect::Inserted { id, .. } => self.selected = Some(id.clone()),
            DropEffect::Deleted { id, .. } if self.selected.as_deref() == Some(id) => {
                self.selected = None;
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Inspector
    // ------------------------------------------------------------------

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.as_deref().and_then(|id| self.draft.block(id))
    }

    /// Select a block; ids not in the draft clear the selection.
    /// Returns whether a block is now selected.
    pub fn select_block(&mut self, id: &str) -> bool {
        self.selected = self.draft.block(id).map(|block| block.id().to_string());
        self.selected.is_some()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn patch_block(&mut self, id: &str, patch: &BlockPatch) -> Result<(), EditorError> {
        self.draft = self.draft.with_block_patched(id, patch)?;
        Ok(())
    }

    /// Patch the selected block; does nothing when nothing is selected
    pub fn patch_selected(&mut self, patch: &BlockPatch) -> Result<(), EditorError> {
        match self.selected.clone() {
            Some(id) => self.patch_block(&id, patch),
            None => Ok(()),
        }
    }

    pub fn delete_block(&mut self, id: &str) -> DropEffect {
        let applied = delete_block(&self.draft, id);
        self.draft = applied.document;
        self.follow_selection(&applied.effect);
        applied.effect
    }

    /// Append a new block and select it
    pub fn add_block(&mut self, kind: BlockKind) -> DropEffect {
        let intent = crate::DropIntent {
            source: DragSource::Palette(kind),
            target: DropTarget::None,
            edge: Edge::Bottom,
        };
        let applied = intent.apply(&self.draft, &mut self.ids);
        self.draft = applied.document;
        self.follow_selection(&applied.effect);
        applied.effect
    }

    // ------------------------------------------------------------------
    // Raw JSON panel
    // ------------------------------------------------------------------

    pub fn raw_json(&self) -> Result<String, EditorError> {
        Ok(self.draft.to_json_pretty()?)
    }

    /// Replace the draft with hand-edited JSON.
    ///
    /// On a parse failure the draft is left alone and saving is disabled
    /// until a valid edit arrives or the edit is discarded.
    pub fn apply_raw_json(&mut self, source: &str) -> Result<(), EditorError> {
        match EditorDocument::from_json(source) {
            Ok(doc) => {
                self.draft = doc;
                self.raw_error = None;
                if self.selected_block().is_none() {
                    self.selected = None;
                }
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.raw_error = Some(message.clone());
                Err(EditorError::MalformedDocument(message))
            }
        }
    }

    pub fn discard_raw_edit(&mut self) {
        self.raw_error = None;
    }

    // ------------------------------------------------------------------
    // Save / publish
    // ------------------------------------------------------------------

    /// Snapshot the draft for saving
    pub fn begin_save(&self) -> Result<SaveRequest, EditorError> {
        if let Some(reason) = &self.raw_error {
            return Err(EditorError::SaveDisabled(reason.clone()));
        }

        Ok(SaveRequest {
            page_id: self.page.id.clone(),
            document: self.draft.clone(),
        })
    }

    /// Fold a save response back into the session.
    ///
    /// Success updates the page metadata and the persisted snapshot. The
    /// draft is replaced with the stored document only if it still equals
    /// what was sent. Failure leaves everything as it was.
    pub fn complete_save(
        &mut self,
        request: SaveRequest,
        result: Result<PageRecord, ServiceError>,
    ) -> Result<(), EditorError> {
        if request.page_id != self.page.id {
            return Err(EditorError::PageMismatch {
                request: request.page_id,
                open: self.page.id.clone(),
            });
        }

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(page_id = %request.page_id, error = %e, "save failed");
                return Err(e.into());
            }
        };

        let stored = match record.editor_document() {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    page_id = %request.page_id,
                    error = %e,
                    "stored document unreadable, keeping sent snapshot"
                );
                request.document.clone()
            }
        };

        if self.draft == request.document {
            self.draft = stored.clone();
        } else {
            tracing::debug!(page_id = %request.page_id, "draft changed during save, keeping local edits");
        }
        self.persisted = stored;
        self.page = record;

        tracing::info!(page_id = %request.page_id, dirty = self.is_dirty(), "page saved");
        Ok(())
    }

    /// Save the draft and wait for the response
    pub async fn save<S>(&mut self, service: &S) -> Result<(), EditorError>
    where
        S: PageService + ?Sized,
    {
        let request = self.begin_save()?;
        let result = service.save_page(&request.page_id, &request.document).await;
        self.complete_save(request, result)
    }

    /// Publish the stored page; returns the published URL.
    ///
    /// Only page metadata is updated. Unsaved draft edits are not published.
    pub async fn publish<S>(&mut self, service: &S) -> Result<String, EditorError>
    where
        S: PageService + ?Sized,
    {
        let response = match service.publish_page(&self.page.id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(page_id = %self.page.id, error = %e, "publish failed");
                return Err(e.into());
            }
        };

        tracing::info!(page_id = %self.page.id, url = %response.published_html_url, "page published");
        self.page = response.page;
        Ok(response.published_html_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(editor_state: Option<serde_json::Value>) -> PageRecord {
        PageRecord {
            id: "page-1".to_string(),
            site_id: "site-1".to_string(),
            name: "Home".to_string(),
            slug: String::new(),
            page_type: "page".to_string(),
            editor_state,
            published_html_url: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn session() -> EditorSession {
        EditorSession::open_with_ids(page(None), BlockIdGenerator::from_seed("t")).unwrap()
    }

    fn add(session: &mut EditorSession, kind: BlockKind) -> String {
        session.add_block(kind).block_id().unwrap().to_string()
    }

    #[test]
    fn test_open_synthesizes_default_document() {
        let session = session();

        assert_eq!(session.document(), &EditorDocument::new("Home"));
        assert!(!session.is_dirty());
        assert!(session.can_save());
        assert_eq!(session.summary(), "0 block(s) in first section");
    }

    #[test]
    fn test_open_rejects_malformed_state() {
        let result = EditorSession::open(page(Some(json!({ "version": "one" }))));
        assert!(matches!(result, Err(EditorError::MalformedDocument(_))));
    }

    #[test]
    fn test_add_block_selects_it() {
        let mut session = session();
        let id = add(&mut session, BlockKind::Text);

        assert_eq!(id, "blk_t_1");
        assert_eq!(session.selected_block_id(), Some("blk_t_1"));
        assert!(session.is_dirty());
    }

    #[test]
    fn test_select_unknown_id_clears_selection() {
        let mut session = session();
        session.add_block(BlockKind::Text);

        assert!(!session.select_block("missing"));
        assert_eq!(session.selected_block_id(), None);
    }

    #[test]
    fn test_patch_selected_block() {
        let mut session = session();
        session.add_block(BlockKind::Hero);
        session
            .patch_selected(&BlockPatch::headline("Spring sale"))
            .unwrap();

        match session.selected_block() {
            Some(Block::Hero { props, .. }) => assert_eq!(props.headline, "Spring sale"),
            other => panic!("Expected hero, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut session = session();
        let first = add(&mut session, BlockKind::Text);
        let second = add(&mut session, BlockKind::Text);
        assert_eq!(session.selected_block_id(), Some(second.as_str()));

        session.delete_block(&first);
        assert_eq!(session.selected_block_id(), Some(second.as_str()));

        session.delete_block(&second);
        assert_eq!(session.selected_block_id(), None);
        assert!(session.blocks().is_empty());
    }

    #[test]
    fn test_malformed_raw_json_disables_save() {
        let mut session = session();
        session.add_block(BlockKind::Text);
        let before = session.document().clone();

        let result = session.apply_raw_json("{ not json");
        assert!(matches!(result, Err(EditorError::MalformedDocument(_))));
        assert_eq!(session.document(), &before);
        assert!(!session.can_save());
        assert!(matches!(
            session.begin_save(),
            Err(EditorError::SaveDisabled(_))
        ));

        let fixed = session.raw_json().unwrap();
        session.apply_raw_json(&fixed).unwrap();
        assert!(session.can_save());
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn test_raw_json_drops_stale_selection() {
        let mut session = session();
        session.add_block(BlockKind::Text);

        session
            .apply_raw_json(r#"{"version": 1, "title": "Home", "sections": []}"#)
            .unwrap();
        assert_eq!(session.selected_block_id(), None);
    }

    #[test]
    fn test_complete_save_rejects_other_page() {
        let mut session = session();
        let request = SaveRequest {
            page_id: "other".to_string(),
            document: EditorDocument::new("x"),
        };

        let result = session.complete_save(request, Ok(page(None)));
        assert!(matches!(result, Err(EditorError::PageMismatch { .. })));
    }
}
