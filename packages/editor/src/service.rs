//! # Page Service Contract
//!
//! The narrow interface through which the editor reaches page storage and
//! publishing. Transport is up to the implementor; record shapes follow
//! the storage API's JSON (snake_case keys).

use async_trait::async_trait;
use pagesmith_document::{DocumentError, EditorDocument};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: String,
    pub site_id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "type", default = "default_page_type")]
    pub page_type: String,
    #[serde(default)]
    pub editor_state: Option<Value>,
    #[serde(default)]
    pub published_html_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn default_page_type() -> String {
    "page".to_string()
}

impl PageRecord {
    /// The stored document, or an empty one titled after the page when
    /// nothing has been stored yet (null, missing, or `{}`)
    pub fn editor_document(&self) -> Result<EditorDocument, DocumentError> {
        match &self.editor_state {
            None | Some(Value::Null) => Ok(EditorDocument::new(&self.name)),
            Some(Value::Object(map)) if map.is_empty() => Ok(EditorDocument::new(&self.name)),
            Some(state) => EditorDocument::from_value(state.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: String,
    pub owner_account_id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub primary_domain: Option<String>,
    #[serde(default)]
    pub dealer_account_id: Option<String>,
    #[serde(default)]
    pub publish_status: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewSite {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewPage {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_state: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishResponse {
    pub published_html_url: String,
    pub page: PageRecord,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Page storage and publishing, as seen by the editor
#[async_trait]
pub trait PageService: Send + Sync {
    async fn fetch_page(&self, page_id: &str) -> Result<PageRecord, ServiceError>;

    /// Persist the whole document; returns the stored record
    async fn save_page(
        &self,
        page_id: &str,
        editor_state: &EditorDocument,
    ) -> Result<PageRecord, ServiceError>;

    /// Render and publish the stored document
    async fn publish_page(&self, page_id: &str) -> Result<PublishResponse, ServiceError>;

    async fn list_sites(&self) -> Result<Vec<SiteRecord>, ServiceError>;

    async fn create_site(&self, site: NewSite) -> Result<SiteRecord, ServiceError>;

    async fn get_site(&self, site_id: &str) -> Result<SiteRecord, ServiceError>;

    async fn list_pages(&self, site_id: &str) -> Result<Vec<PageRecord>, ServiceError>;

    async fn create_page(&self, site_id: &str, page: NewPage) -> Result<PageRecord, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(editor_state: Option<Value>) -> PageRecord {
        PageRecord {
            id: "p1".to_string(),
            site_id: "s1".to_string(),
            name: "About us".to_string(),
            slug: "about".to_string(),
            page_type: "page".to_string(),
            editor_state,
            published_html_url: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_missing_state_synthesizes_default() {
        for state in [None, Some(Value::Null), Some(json!({}))] {
            let doc = record(state).editor_document().unwrap();
            assert_eq!(doc, EditorDocument::new("About us"));
        }
    }

    #[test]
    fn test_stored_state_is_parsed() {
        let doc = record(Some(json!({
            "version": 1,
            "title": "Stored",
            "sections": []
        })))
        .editor_document()
        .unwrap();

        assert_eq!(doc.title, "Stored");
    }

    #[test]
    fn test_page_record_reads_storage_json() {
        let page: PageRecord = serde_json::from_value(json!({
            "id": "p1",
            "site_id": "s1",
            "name": "Home",
            "slug": "",
            "type": "page",
            "editor_state": {},
            "published_state": null,
            "published_html_url": null,
            "last_editor_account_id": "acct",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(page.page_type, "page");
        assert_eq!(page.editor_document().unwrap().title, "Home");
    }
}
