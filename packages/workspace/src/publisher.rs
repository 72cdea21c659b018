use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Invalid artifact key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for published HTML
pub trait ArtifactSink: Send + Sync {
    /// Store `html` under `key` and return its public URL
    fn upload(&self, key: &str, html: &str) -> Result<String, PublishError>;
}

/// Writes artifacts below a directory, served from `base_url`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    base_url: String,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for DirectorySink {
    fn upload(&self, key: &str, html: &str) -> Result<String, PublishError> {
        let relative = safe_relative_path(key)?;
        let path = self.root.join(relative);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, html)?;

        tracing::debug!(path = %path.display(), "artifact written");
        Ok(format!("{}/{}", self.base_url, key))
    }
}

/// Keeps artifacts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<HashMap<String, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.artifacts
            .lock()
            .ok()
            .and_then(|artifacts| artifacts.get(key).cloned())
    }
}

impl ArtifactSink for MemorySink {
    fn upload(&self, key: &str, html: &str) -> Result<String, PublishError> {
        safe_relative_path(key)?;
        if let Ok(mut artifacts) = self.artifacts.lock() {
            artifacts.insert(key.to_string(), html.to_string());
        }
        Ok(format!("memory://{}", key))
    }
}

/// Reject keys that would escape the sink's root
fn safe_relative_path(key: &str) -> Result<PathBuf, PublishError> {
    let path = PathBuf::from(key);
    let only_normal = path
        .components()
        .all(|component| matches!(component, Component::Normal(_)));

    if key.is_empty() || !only_normal {
        return Err(PublishError::InvalidKey(key.to_string()));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path(), "https://cdn.example.com/");

        let url = sink
            .upload("sites/lot/index.html", "<p>hi</p>")
            .unwrap();

        assert_eq!(url, "https://cdn.example.com/sites/lot/index.html");
        let written = std::fs::read_to_string(dir.path().join("sites/lot/index.html")).unwrap();
        assert_eq!(written, "<p>hi</p>");
    }

    #[test]
    fn test_keys_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path(), "http://localhost");

        for key in ["../outside.html", "/etc/passwd", "sites/../../x.html", ""] {
            assert!(matches!(
                sink.upload(key, "x"),
                Err(PublishError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        let url = sink.upload("sites/a/about.html", "<p>about</p>").unwrap();

        assert_eq!(url, "memory://sites/a/about.html");
        assert_eq!(sink.get("sites/a/about.html").as_deref(), Some("<p>about</p>"));
        assert_eq!(sink.get("sites/a/index.html"), None);
    }
}
