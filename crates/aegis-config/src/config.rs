//! Shell configuration
//!
//! `aegis.config.json` describes the shell window and the bridge allow
//! tokens. A missing file means defaults: the stock window and the
//! permissive gate. Note the fail-open posture: the default `allow` is
//! `["*"]`, and deployments are expected to tighten it explicitly.

use serde::{Deserialize, Serialize};
use std::path::Path;

use aegis_bridge::{AllowList, AllowToken};

use crate::error::ConfigError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellConfig {
    /// Application name
    pub name: String,
    /// Window title
    pub title: String,
    pub version: String,
    /// Entry document loaded into the front-end surface
    pub main: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Native window frame
    pub frame: bool,
    pub dev_tools: bool,
    /// Bridge allow tokens; `"*"` permits everything, an empty list
    /// permits nothing
    pub allow: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            name: "Aegis App".to_string(),
            title: "Aegis App".to_string(),
            version: "1.0.0".to_string(),
            main: "index.html".to_string(),
            width: 1200,
            height: 800,
            resizable: true,
            frame: true,
            dev_tools: true,
            allow: vec!["*".to_string()],
        }
    }
}

impl ShellConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Build the bridge capability gate from the configured tokens.
    pub fn allow_list(&self) -> AllowList {
        let mut allow = AllowList::deny_all();
        allow.configure(self.allow.iter().map(|token| AllowToken::parse(token)));
        allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_bridge::ActionId;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.width, 1200);
        assert_eq!(config.height, 800);
        assert!(config.resizable);
        assert_eq!(config.allow, vec!["*".to_string()]);
        assert!(config.allow_list().is_permitted(&ActionId::new("read")));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ShellConfig::load("/nonexistent/aegis.config.json").unwrap();
        assert_eq!(config.name, "Aegis App");
    }

    #[test]
    fn test_partial_config_merges_defaults() {
        let config: ShellConfig =
            serde_json::from_str(r#"{"title": "Files", "width": 640, "allow": ["read"]}"#)
                .unwrap();

        assert_eq!(config.title, "Files");
        assert_eq!(config.width, 640);
        // Unspecified fields keep their defaults
        assert_eq!(config.height, 800);

        let allow = config.allow_list();
        assert!(allow.is_permitted(&ActionId::new("read")));
        assert!(!allow.is_permitted(&ActionId::new("write")));
    }

    #[test]
    fn test_load_roundtrip() {
        let path = std::env::temp_dir().join(format!("aegis-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"name": "Demo", "devTools": false, "allow": ["dialog", "app.quit"]}"#,
        )
        .unwrap();

        let config = ShellConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.name, "Demo");
        assert!(!config.dev_tools);

        let allow = config.allow_list();
        assert!(allow.is_permitted(&ActionId::new("dialog.open")));
        assert!(allow.is_permitted(&ActionId::new("app.quit")));
        assert!(!allow.is_permitted(&ActionId::new("app.minimize")));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let path = std::env::temp_dir().join(format!("aegis-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{not json").unwrap();

        let err = ShellConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_allow_denies_everything() {
        let config: ShellConfig = serde_json::from_str(r#"{"allow": []}"#).unwrap();
        assert!(!config.allow_list().is_permitted(&ActionId::new("read")));
    }
}
