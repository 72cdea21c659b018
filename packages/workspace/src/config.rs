use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagesmith.config.json";

/// Pagesmith configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory published pages are written to
    #[serde(default = "default_publish_dir")]
    pub publish_dir: String,

    /// URL prefix under which `publish_dir` is served; derived from
    /// `host` and `port` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,

    /// Account used for requests without an `x-account-id` header
    #[serde(default = "default_account_id")]
    pub default_account_id: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_publish_dir() -> String {
    "published".to_string()
}

fn default_account_id() -> String {
    "dev-account-1".to_string()
}

impl Config {
    /// Load config from a directory; a missing file yields the defaults
    pub fn load(cwd: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = cwd.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute path to the publish directory
    pub fn get_publish_dir(&self, cwd: impl AsRef<Path>) -> PathBuf {
        cwd.as_ref().join(&self.publish_dir)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL for published page links
    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.clone(),
            None => format!("http://{}/published", self.address()),
        }
    }

    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        publish_dir: Option<String>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(publish_dir) = publish_dir {
            self.publish_dir = publish_dir;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            publish_dir: default_publish_dir(),
            public_base_url: None,
            default_account_id: default_account_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "host": "0.0.0.0",
            "port": 8080,
            "publishDir": "out",
            "publicBaseUrl": "https://cdn.example.com",
            "defaultAccountId": "acct-7"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.publish_dir, "out");
        assert_eq!(config.public_base_url(), "https://cdn.example.com");
        assert_eq!(config.default_account_id, "acct-7");

        let moved = config.with_overrides(None, Some(9999), None);
        assert_eq!(moved.public_base_url(), "https://cdn.example.com");
    }

    #[test]
    fn test_base_url_follows_overridden_port() {
        let config = Config::default().with_overrides(None, Some(8080), Some("out".to_string()));

        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.public_base_url(), "http://127.0.0.1:8080/published");
        assert_eq!(config.publish_dir, "out");

        let config = Config::default().with_overrides(Some("0.0.0.0".to_string()), None, None);
        assert_eq!(config.public_base_url(), "http://0.0.0.0:3030/published");
    }

    #[test]
    fn test_derived_base_url_is_not_written() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(!json.contains("publicBaseUrl"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "port": 9000 }"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.default_account_id, "dev-account-1");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "publishDir": "site-out" }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.get_publish_dir(dir.path()), dir.path().join("site-out"));
    }
}
