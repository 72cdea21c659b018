//! Site and page storage.
//!
//! The traits are what [`crate::Workspace`] talks to. The in-memory
//! implementations back the local server and the tests; nothing survives
//! a restart. Listings come back in creation order.

use crate::models::{
    generate_id, now_iso, CreatePage, CreateSite, Page, PagePatch, PublishStatus, Site, SitePatch,
};
use serde_json::{json, Map};
use std::collections::HashMap;

pub trait SiteRepository: Send + Sync {
    fn list_by_owner(&self, owner_account_id: &str) -> Vec<Site>;

    fn get_by_id(&self, site_id: &str) -> Option<Site>;

    fn create(&mut self, owner_account_id: &str, data: CreateSite) -> Site;

    /// Apply a patch; `None` if the site doesn't exist
    fn update(&mut self, site_id: &str, patch: SitePatch) -> Option<Site>;
}

pub trait PageRepository: Send + Sync {
    fn list_by_site(&self, site_id: &str) -> Vec<Page>;

    fn get_by_id(&self, page_id: &str) -> Option<Page>;

    fn create(&mut self, site_id: &str, data: CreatePage) -> Page;

    /// Apply a patch; `None` if the page doesn't exist
    fn update(&mut self, page_id: &str, patch: PagePatch) -> Option<Page>;
}

#[derive(Debug, Default)]
pub struct InMemorySiteRepository {
    sites: HashMap<String, Site>,
    order: Vec<String>,
}

impl InMemorySiteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SiteRepository for InMemorySiteRepository {
    fn list_by_owner(&self, owner_account_id: &str) -> Vec<Site> {
        self.order
            .iter()
            .filter_map(|id| self.sites.get(id))
            .filter(|site| site.owner_account_id == owner_account_id)
            .cloned()
            .collect()
    }

    fn get_by_id(&self, site_id: &str) -> Option<Site> {
        self.sites.get(site_id).cloned()
    }

    fn create(&mut self, owner_account_id: &str, data: CreateSite) -> Site {
        let id = generate_id();
        let slug = match data.slug {
            Some(slug) if !slug.is_empty() => slug,
            _ => id.split('-').next().unwrap_or(&id).to_string(),
        };
        let now = now_iso();

        let site = Site {
            id: id.clone(),
            owner_account_id: owner_account_id.to_string(),
            name: data.name.unwrap_or_else(|| "New Site".to_string()),
            slug,
            primary_domain: data.primary_domain,
            dealer_account_id: data.dealer_account_id,
            publish_status: PublishStatus::Draft,
            published_at: None,
            settings: data.settings.unwrap_or_else(Map::new),
            created_at: now.clone(),
            updated_at: now,
        };

        self.order.push(id.clone());
        self.sites.insert(id, site.clone());
        site
    }

    fn update(&mut self, site_id: &str, patch: SitePatch) -> Option<Site> {
        let site = self.sites.get_mut(site_id)?;
        site.apply(patch);
        Some(site.clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPageRepository {
    pages: HashMap<String, Page>,
    order: Vec<String>,
}

impl InMemoryPageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageRepository for InMemoryPageRepository {
    fn list_by_site(&self, site_id: &str) -> Vec<Page> {
        self.order
            .iter()
            .filter_map(|id| self.pages.get(id))
            .filter(|page| page.site_id == site_id)
            .cloned()
            .collect()
    }

    fn get_by_id(&self, page_id: &str) -> Option<Page> {
        self.pages.get(page_id).cloned()
    }

    fn create(&mut self, site_id: &str, data: CreatePage) -> Page {
        let id = generate_id();
        let now = now_iso();

        let page = Page {
            id: id.clone(),
            site_id: site_id.to_string(),
            name: data.name.unwrap_or_else(|| "New Page".to_string()),
            slug: data.slug.unwrap_or_default(),
            page_type: data.page_type.unwrap_or_else(|| "page".to_string()),
            editor_state: data.editor_state.unwrap_or_else(|| json!({})),
            published_state: None,
            published_html_url: None,
            last_editor_account_id: None,
            created_at: now.clone(),
            updated_at: now,
        };

        self.order.push(id.clone());
        self.pages.insert(id, page.clone());
        page
    }

    fn update(&mut self, page_id: &str, patch: PagePatch) -> Option<Page> {
        let page = self.pages.get_mut(page_id)?;
        page.apply(patch);
        Some(page.clone())
    }
}
