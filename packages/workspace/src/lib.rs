//! Storage and publishing backend for the page editor.
//!
//! Sites own pages; pages carry the editor document as opaque JSON until
//! they are published, at which point the document is rendered to static
//! HTML and handed to an [`ArtifactSink`].

pub mod config;
pub mod local;
pub mod models;
pub mod publisher;
pub mod repository;
pub mod server;
pub mod workspace;

pub use config::{Config, DEFAULT_CONFIG_NAME};
pub use local::LocalPageService;
pub use models::{
    CreatePage, CreateSite, Page, PagePatch, PublishStatus, Site, SitePatch,
};
pub use publisher::{ArtifactSink, DirectorySink, MemorySink, PublishError};
pub use repository::{
    InMemoryPageRepository, InMemorySiteRepository, PageRepository, SiteRepository,
};
pub use server::{router, ApiError, AppState, ACCOUNT_HEADER};
pub use workspace::{Published, Workspace, WorkspaceError, WorkspaceResult};
