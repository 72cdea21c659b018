use crate::models::{CreatePage, CreateSite, PagePatch};
use crate::workspace::{Workspace, WorkspaceError};
use async_trait::async_trait;
use pagesmith_editor::{
    EditorDocument, NewPage, NewSite, PageRecord, PageService, PublishResponse, ServiceError,
    SiteRecord,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// [`PageService`] that calls a [`Workspace`] in-process on behalf of one account
#[derive(Clone)]
pub struct LocalPageService {
    workspace: Arc<RwLock<Workspace>>,
    account_id: String,
}

impl LocalPageService {
    pub fn new(workspace: Arc<RwLock<Workspace>>, account_id: impl Into<String>) -> Self {
        Self {
            workspace,
            account_id: account_id.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl From<WorkspaceError> for ServiceError {
    fn from(error: WorkspaceError) -> Self {
        match error {
            WorkspaceError::SiteNotFound(id) | WorkspaceError::PageNotFound(id) => {
                ServiceError::NotFound(id)
            }
            WorkspaceError::InvalidDocument(e) => ServiceError::Rejected {
                status: 400,
                message: e.to_string(),
            },
            WorkspaceError::Publish(e) => ServiceError::Rejected {
                status: 500,
                message: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl PageService for LocalPageService {
    async fn fetch_page(&self, page_id: &str) -> Result<PageRecord, ServiceError> {
        let workspace = self.workspace.read().await;
        Ok(workspace.get_page(&self.account_id, page_id)?.into())
    }

    async fn save_page(
        &self,
        page_id: &str,
        editor_state: &EditorDocument,
    ) -> Result<PageRecord, ServiceError> {
        let state = editor_state.to_value().map_err(|e| ServiceError::Rejected {
            status: 400,
            message: e.to_string(),
        })?;

        let mut workspace = self.workspace.write().await;
        let page = workspace.update_page(
            &self.account_id,
            page_id,
            PagePatch {
                editor_state: Some(state),
                ..PagePatch::default()
            },
        )?;
        Ok(page.into())
    }

    async fn publish_page(&self, page_id: &str) -> Result<PublishResponse, ServiceError> {
        let mut workspace = self.workspace.write().await;
        let published = workspace.publish_page(&self.account_id, page_id)?;
        Ok(PublishResponse {
            published_html_url: published.published_html_url,
            page: published.page.into(),
        })
    }

    async fn list_sites(&self) -> Result<Vec<SiteRecord>, ServiceError> {
        let workspace = self.workspace.read().await;
        Ok(workspace
            .list_sites(&self.account_id)
            .into_iter()
            .map(SiteRecord::from)
            .collect())
    }

    async fn create_site(&self, site: NewSite) -> Result<SiteRecord, ServiceError> {
        let mut workspace = self.workspace.write().await;
        let site = workspace.create_site(
            &self.account_id,
            CreateSite {
                name: Some(site.name),
                slug: site.slug,
                ..CreateSite::default()
            },
        );
        Ok(site.into())
    }

    async fn get_site(&self, site_id: &str) -> Result<SiteRecord, ServiceError> {
        let workspace = self.workspace.read().await;
        Ok(workspace.get_site(&self.account_id, site_id)?.into())
    }

    async fn list_pages(&self, site_id: &str) -> Result<Vec<PageRecord>, ServiceError> {
        let workspace = self.workspace.read().await;
        Ok(workspace
            .list_pages(&self.account_id, site_id)?
            .into_iter()
            .map(PageRecord::from)
            .collect())
    }

    async fn create_page(&self, site_id: &str, page: NewPage) -> Result<PageRecord, ServiceError> {
        let mut workspace = self.workspace.write().await;
        let page = workspace.create_page(
            &self.account_id,
            site_id,
            CreatePage {
                name: Some(page.name),
                slug: Some(page.slug),
                page_type: None,
                editor_state: page.editor_state,
            },
        )?;
        Ok(page.into())
    }
}
