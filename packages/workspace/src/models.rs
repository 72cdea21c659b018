use pagesmith_editor::{PageRecord, SiteRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current UTC time as RFC 3339 with second precision, e.g. `2026-03-01T12:00:00Z`
pub fn now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
    Error,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Draft => "draft",
            PublishStatus::Published => "published",
            PublishStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub owner_account_id: String,
    pub name: String,
    pub slug: String,
    pub primary_domain: Option<String>,
    pub dealer_account_id: Option<String>,
    pub publish_status: PublishStatus,
    pub published_at: Option<String>,
    pub settings: Map<String, Value>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub site_id: String,
    pub name: String,
    /// `""` is the site's home page
    pub slug: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub editor_state: Value,
    pub published_state: Option<Value>,
    pub published_html_url: Option<String>,
    pub last_editor_account_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Page {
    /// File name (without extension) the page publishes to
    pub fn file_slug(&self) -> &str {
        let slug = self.slug.trim_matches('/');
        if slug.is_empty() {
            "index"
        } else {
            slug
        }
    }
}

/// Body of a site creation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSite {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub primary_domain: Option<String>,
    pub dealer_account_id: Option<String>,
    pub settings: Option<Map<String, Value>>,
}

/// Body of a page creation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePage {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub page_type: Option<String>,
    pub editor_state: Option<Value>,
}

/// Partial site update; `None` leaves a field alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub primary_domain: Option<String>,
    pub dealer_account_id: Option<String>,
    pub settings: Option<Map<String, Value>>,
    #[serde(skip_deserializing)]
    pub publish_status: Option<PublishStatus>,
    #[serde(skip_deserializing)]
    pub published_at: Option<String>,
}

/// Partial page update; `None` leaves a field alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub page_type: Option<String>,
    pub editor_state: Option<Value>,
    #[serde(skip_deserializing)]
    pub published_state: Option<Value>,
    #[serde(skip_deserializing)]
    pub published_html_url: Option<String>,
    #[serde(skip_deserializing)]
    pub last_editor_account_id: Option<String>,
}

impl Site {
    pub(crate) fn apply(&mut self, patch: SitePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(domain) = patch.primary_domain {
            self.primary_domain = Some(domain);
        }
        if let Some(dealer) = patch.dealer_account_id {
            self.dealer_account_id = Some(dealer);
        }
        if let Some(settings) = patch.settings {
            self.settings = settings;
        }
        if let Some(status) = patch.publish_status {
            self.publish_status = status;
        }
        if let Some(published_at) = patch.published_at {
            self.published_at = Some(published_at);
        }
        self.updated_at = now_iso();
    }
}

impl Page {
    pub(crate) fn apply(&mut self, patch: PagePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(page_type) = patch.page_type {
            self.page_type = page_type;
        }
        if let Some(state) = patch.editor_state {
            self.editor_state = state;
        }
        if let Some(state) = patch.published_state {
            self.published_state = Some(state);
        }
        if let Some(url) = patch.published_html_url {
            self.published_html_url = Some(url);
        }
        if let Some(account) = patch.last_editor_account_id {
            self.last_editor_account_id = Some(account);
        }
        self.updated_at = now_iso();
    }
}

impl From<Site> for SiteRecord {
    fn from(site: Site) -> Self {
        SiteRecord {
            id: site.id,
            owner_account_id: site.owner_account_id,
            name: site.name,
            slug: site.slug,
            primary_domain: site.primary_domain,
            dealer_account_id: site.dealer_account_id,
            publish_status: site.publish_status.as_str().to_string(),
            published_at: site.published_at,
            settings: site.settings,
            created_at: site.created_at,
            updated_at: site.updated_at,
        }
    }
}

impl From<Page> for PageRecord {
    fn from(page: Page) -> Self {
        PageRecord {
            id: page.id,
            site_id: page.site_id,
            name: page.name,
            slug: page.slug,
            page_type: page.page_type,
            editor_state: Some(page.editor_state),
            published_html_url: page.published_html_url,
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}
