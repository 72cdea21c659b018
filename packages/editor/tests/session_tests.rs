//! Editor session against an in-memory page service

use async_trait::async_trait;
use pagesmith_editor::{
    BlockIdGenerator, BlockKind, BlockPatch, DropTarget, EditorDocument, EditorError,
    EditorSession, NewPage, NewSite, PageRecord, PageService, PublishResponse, Rect,
    ServiceError, SiteRecord,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct FakeService {
    pages: Mutex<HashMap<String, PageRecord>>,
    offline: AtomicBool,
}

impl FakeService {
    fn with_page(id: &str, editor_state: Option<serde_json::Value>) -> Self {
        let service = Self::default();
        service.pages.lock().unwrap().insert(
            id.to_string(),
            PageRecord {
                id: id.to_string(),
                site_id: "site-1".to_string(),
                name: "Home".to_string(),
                slug: String::new(),
                page_type: "page".to_string(),
                editor_state,
                published_html_url: None,
                created_at: "2026-01-01T00:00:00Z".to_string(),
                updated_at: "2026-01-01T00:00:00Z".to_string(),
            },
        );
        service
    }

    fn stored(&self, id: &str) -> PageRecord {
        self.pages.lock().unwrap()[id].clone()
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), ServiceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PageService for FakeService {
    async fn fetch_page(&self, page_id: &str) -> Result<PageRecord, ServiceError> {
        self.check_online()?;
        self.pages
            .lock()
            .unwrap()
            .get(page_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(page_id.to_string()))
    }

    async fn save_page(
        &self,
        page_id: &str,
        editor_state: &EditorDocument,
    ) -> Result<PageRecord, ServiceError> {
        self.check_online()?;
        let mut pages = self.pages.lock().unwrap();
        let page = pages
            .get_mut(page_id)
            .ok_or_else(|| ServiceError::NotFound(page_id.to_string()))?;
        page.editor_state = Some(editor_state.to_value().unwrap());
        page.updated_at = "2026-01-02T00:00:00Z".to_string();
        Ok(page.clone())
    }

    async fn publish_page(&self, page_id: &str) -> Result<PublishResponse, ServiceError> {
        self.check_online()?;
        let mut pages = self.pages.lock().unwrap();
        let page = pages
            .get_mut(page_id)
            .ok_or_else(|| ServiceError::NotFound(page_id.to_string()))?;
        let url = format!("https://cdn.test/sites/site-1/{}.html", page_id);
        page.published_html_url = Some(url.clone());
        Ok(PublishResponse {
            published_html_url: url,
            page: page.clone(),
        })
    }

    async fn list_sites(&self) -> Result<Vec<SiteRecord>, ServiceError> {
        Ok(Vec::new())
    }

    async fn create_site(&self, _site: NewSite) -> Result<SiteRecord, ServiceError> {
        Err(ServiceError::Rejected {
            status: 405,
            message: "not supported".to_string(),
        })
    }

    async fn get_site(&self, site_id: &str) -> Result<SiteRecord, ServiceError> {
        Err(ServiceError::NotFound(site_id.to_string()))
    }

    async fn list_pages(&self, _site_id: &str) -> Result<Vec<PageRecord>, ServiceError> {
        Ok(self.pages.lock().unwrap().values().cloned().collect())
    }

    async fn create_page(&self, site_id: &str, _page: NewPage) -> Result<PageRecord, ServiceError> {
        Err(ServiceError::NotFound(site_id.to_string()))
    }
}

async fn open(service: &FakeService) -> EditorSession {
    let page = service.fetch_page("page-1").await.unwrap();
    EditorSession::open_with_ids(page, BlockIdGenerator::from_seed("s")).unwrap()
}

#[tokio::test]
async fn test_load_missing_page() {
    let service = FakeService::default();
    let result = EditorSession::load(&service, "nope").await;

    assert!(matches!(
        result,
        Err(EditorError::Network(ServiceError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_edit_save_reload() {
    let service = FakeService::with_page("page-1", None);
    let mut session = open(&service).await;

    session.start_palette_drag(BlockKind::Hero).unwrap();
    session.end_drag(DropTarget::None).unwrap();
    session
        .patch_selected(&BlockPatch::headline("Open house"))
        .unwrap();
    assert!(session.is_dirty());

    session.save(&service).await.unwrap();
    assert!(!session.is_dirty());

    let reloaded = EditorSession::load(&service, "page-1").await.unwrap();
    assert_eq!(reloaded.document(), session.document());
    assert_eq!(reloaded.page().updated_at, "2026-01-02T00:00:00Z");
}

#[tokio::test]
async fn test_save_keeps_fields_the_editor_does_not_model() {
    let stored = serde_json::json!({
        "version": 1,
        "title": "Home",
        "raw_html": "<marquee>hi</marquee>",
        "sections": [{
            "id": "sec_1",
            "layout": "full",
            "style": { "padding": 8 },
            "blocks": [{
                "id": "blk_h",
                "type": "hero",
                "props": {
                    "headline": "a",
                    "subheadline": "b",
                    "ctaText": "c",
                    "ctaHref": "d",
                    "image": "x.png"
                }
            }]
        }]
    });
    let service = FakeService::with_page("page-1", Some(stored.clone()));
    let mut session = EditorSession::load(&service, "page-1").await.unwrap();

    session.add_block(BlockKind::Text);
    session.save(&service).await.unwrap();

    let saved = service.stored("page-1").editor_state.unwrap();
    assert_eq!(saved["raw_html"], stored["raw_html"]);
    assert_eq!(saved["sections"][0]["style"], stored["sections"][0]["style"]);
    assert_eq!(
        saved["sections"][0]["blocks"][0],
        stored["sections"][0]["blocks"][0]
    );
    assert_eq!(saved["sections"][0]["blocks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_edits_during_save_are_kept() {
    let service = FakeService::with_page("page-1", None);
    let mut session = open(&service).await;
    session.add_block(BlockKind::Text);

    let request = session.begin_save().unwrap();
    let sent = request.document.clone();

    // Keep editing while the request is in flight
    session.add_block(BlockKind::Hero);
    let local = session.document().clone();

    let result = service.save_page(&request.page_id, &request.document).await;
    session.complete_save(request, result).unwrap();

    assert_eq!(session.document(), &local);
    assert_eq!(session.document().blocks().len(), 2);
    assert!(session.is_dirty());
    assert_eq!(service.stored("page-1").editor_document().unwrap(), sent);
}

#[tokio::test]
async fn test_failed_save_leaves_draft_alone() {
    let service = FakeService::with_page("page-1", None);
    let mut session = open(&service).await;
    session.add_block(BlockKind::Text);
    let draft = session.document().clone();

    service.go_offline();
    let result = session.save(&service).await;

    assert!(matches!(
        result,
        Err(EditorError::Network(ServiceError::Transport(_)))
    ));
    assert_eq!(session.document(), &draft);
    assert!(session.is_dirty());
    assert!(session.can_save());
}

#[tokio::test]
async fn test_publish_updates_metadata_only() {
    let service = FakeService::with_page("page-1", None);
    let mut session = open(&service).await;
    session.add_block(BlockKind::Text);
    let draft = session.document().clone();

    let url = session.publish(&service).await.unwrap();

    assert_eq!(url, "https://cdn.test/sites/site-1/page-1.html");
    assert_eq!(session.published_url(), Some(url.as_str()));
    assert_eq!(session.document(), &draft);
}

#[tokio::test]
async fn test_gesture_through_session() {
    let stored = serde_json::json!({
        "version": 1,
        "title": "Home",
        "sections": [{
            "id": "sec_1",
            "layout": "full",
            "blocks": [
                {"id": "A", "type": "text", "props": {"text": "first"}},
                {"id": "B", "type": "text", "props": {"text": "second"}}
            ]
        }]
    });
    let service = FakeService::with_page("page-1", Some(stored));
    let mut session = open(&service).await;

    session.start_block_drag("B").unwrap();
    session
        .update_hover(
            DropTarget::block("A"),
            Rect::new(0.0, 0.0, 300.0, 20.0),
            Rect::new(0.0, 0.0, 300.0, 80.0),
        )
        .unwrap();
    session.end_drag(DropTarget::block("A")).unwrap();

    let order: Vec<&str> = session.blocks().iter().map(|b| b.id()).collect();
    assert_eq!(order, vec!["B", "A"]);

    assert!(matches!(
        session.start_block_drag("missing"),
        Err(EditorError::BlockNotFound(_))
    ));
    assert!(!session.drag().is_dragging());
}
