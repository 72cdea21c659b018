//! Account-scoped operations over sites and pages.
//!
//! Every call names the acting account. Sites owned by someone else, and
//! pages on such sites, are reported exactly like missing ones.

use crate::models::{
    now_iso, CreatePage, CreateSite, Page, PagePatch, PublishStatus, Site, SitePatch,
};
use crate::publisher::{ArtifactSink, PublishError};
use crate::repository::{
    InMemoryPageRepository, InMemorySiteRepository, PageRepository, SiteRepository,
};
use pagesmith_compiler_html::{render_page_to_html, CompileOptions};
use pagesmith_document::{DocumentError, EditorDocument};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Site not found")]
    SiteNotFound(String),

    #[error("Page not found")]
    PageNotFound(String),

    #[error("Stored document is invalid: {0}")]
    InvalidDocument(#[from] DocumentError),

    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Outcome of a publish
#[derive(Debug, Clone, Serialize)]
pub struct Published {
    pub published_html_url: String,
    pub page: Page,
}

pub struct Workspace {
    sites: Box<dyn SiteRepository>,
    pages: Box<dyn PageRepository>,
    sink: Arc<dyn ArtifactSink>,
    render_options: CompileOptions,
}

impl Workspace {
    pub fn new(
        sites: Box<dyn SiteRepository>,
        pages: Box<dyn PageRepository>,
        sink: Arc<dyn ArtifactSink>,
    ) -> Self {
        Self {
            sites,
            pages,
            sink,
            render_options: CompileOptions::default(),
        }
    }

    /// Workspace backed by in-memory repositories
    pub fn in_memory(sink: Arc<dyn ArtifactSink>) -> Self {
        Self::new(
            Box::new(InMemorySiteRepository::new()),
            Box::new(InMemoryPageRepository::new()),
            sink,
        )
    }

    pub fn with_render_options(mut self, options: CompileOptions) -> Self {
        self.render_options = options;
        self
    }

    // ------------------------------------------------------------------
    // Sites
    // ------------------------------------------------------------------

    pub fn list_sites(&self, account_id: &str) -> Vec<Site> {
        self.sites.list_by_owner(account_id)
    }

    pub fn create_site(&mut self, account_id: &str, data: CreateSite) -> Site {
        let site = self.sites.create(account_id, data);
        tracing::info!(site_id = %site.id, slug = %site.slug, account_id, "site created");
        site
    }

    pub fn get_site(&self, account_id: &str, site_id: &str) -> WorkspaceResult<Site> {
        self.sites
            .get_by_id(site_id)
            .filter(|site| site.owner_account_id == account_id)
            .ok_or_else(|| WorkspaceError::SiteNotFound(site_id.to_string()))
    }

    pub fn update_site(
        &mut self,
        account_id: &str,
        site_id: &str,
        patch: SitePatch,
    ) -> WorkspaceResult<Site> {
        self.get_site(account_id, site_id)?;
        self.sites
            .update(site_id, patch)
            .ok_or_else(|| WorkspaceError::SiteNotFound(site_id.to_string()))
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    pub fn list_pages(&self, account_id: &str, site_id: &str) -> WorkspaceResult<Vec<Page>> {
        self.get_site(account_id, site_id)?;
        Ok(self.pages.list_by_site(site_id))
    }

    pub fn create_page(
        &mut self,
        account_id: &str,
        site_id: &str,
        data: CreatePage,
    ) -> WorkspaceResult<Page> {
        self.get_site(account_id, site_id)?;
        let page = self.pages.create(site_id, data);
        tracing::info!(page_id = %page.id, site_id, "page created");
        Ok(page)
    }

    pub fn get_page(&self, account_id: &str, page_id: &str) -> WorkspaceResult<Page> {
        self.owned_page(account_id, page_id).map(|(page, _)| page)
    }

    /// Patch a page, recording `account_id` as its last editor
    pub fn update_page(
        &mut self,
        account_id: &str,
        page_id: &str,
        mut patch: PagePatch,
    ) -> WorkspaceResult<Page> {
        self.owned_page(account_id, page_id)?;
        patch.last_editor_account_id = Some(account_id.to_string());

        let page = self
            .pages
            .update(page_id, patch)
            .ok_or_else(|| WorkspaceError::PageNotFound(page_id.to_string()))?;
        tracing::debug!(page_id, account_id, "page updated");
        Ok(page)
    }

    /// Render the stored document, upload it and record where it went
    pub fn publish_page(&mut self, account_id: &str, page_id: &str) -> WorkspaceResult<Published> {
        let (page, site) = self.owned_page(account_id, page_id)?;

        let document = stored_document(&page.editor_state)?;
        let html = render_page_to_html(&document, &site.settings, self.render_options.clone());
        let key = format!("sites/{}/{}.html", site.slug, page.file_slug());

        let url = match self.sink.upload(&key, &html) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(page_id, key = %key, error = %e, "publish upload failed");
                self.sites.update(
                    &site.id,
                    SitePatch {
                        publish_status: Some(PublishStatus::Error),
                        ..SitePatch::default()
                    },
                );
                return Err(e.into());
            }
        };

        let page = self
            .pages
            .update(
                page_id,
                PagePatch {
                    published_state: Some(page.editor_state.clone()),
                    published_html_url: Some(url.clone()),
                    ..PagePatch::default()
                },
            )
            .ok_or_else(|| WorkspaceError::PageNotFound(page_id.to_string()))?;

        self.sites.update(
            &site.id,
            SitePatch {
                publish_status: Some(PublishStatus::Published),
                published_at: Some(now_iso()),
                ..SitePatch::default()
            },
        );

        tracing::info!(page_id, url = %url, "page published");
        Ok(Published {
            published_html_url: url,
            page,
        })
    }

    fn owned_page(&self, account_id: &str, page_id: &str) -> WorkspaceResult<(Page, Site)> {
        let not_found = || WorkspaceError::PageNotFound(page_id.to_string());

        let page = self.pages.get_by_id(page_id).ok_or_else(not_found)?;
        let site = self
            .sites
            .get_by_id(&page.site_id)
            .filter(|site| site.owner_account_id == account_id)
            .ok_or_else(not_found)?;
        Ok((page, site))
    }
}

/// Parse stored editor state; nothing stored yet publishes an empty page
fn stored_document(state: &Value) -> Result<EditorDocument, DocumentError> {
    match state {
        Value::Null => Ok(EditorDocument::new("")),
        Value::Object(map) if map.is_empty() => Ok(EditorDocument::new("")),
        other => EditorDocument::from_value(other.clone()),
    }
}
