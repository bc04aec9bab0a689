//! Engine configuration.
//!
//! The console reads one TOML file (`atrium.toml` by default). Every field
//! has a default so a partial file is valid; a missing file is treated by the
//! CLI as a default (not yet installed) configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{AtriumError, Result};

/// Engine-wide configuration shared with every command.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Whether the system has been installed. The console refuses to
    /// dispatch anything while this is false.
    #[serde(default)]
    pub installed: bool,
    /// Human-readable site name.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Runtime state directory (migration state, maintenance marker).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Cache file store.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Asset sources (stylesheets, scripts, images).
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Web-served directory assets are published into.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Schema migration files (`*.sql`).
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,
    /// Installed modules, in registration order.
    #[serde(default)]
    pub modules: Vec<String>,
}

fn default_site_name() -> String {
    "Atrium".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/cache")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from("migrations")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            installed: false,
            site_name: default_site_name(),
            data_dir: default_data_dir(),
            cache_dir: default_cache_dir(),
            assets_dir: default_assets_dir(),
            public_dir: default_public_dir(),
            migrations_dir: default_migrations_dir(),
            modules: Vec::new(),
        }
    }
}

/// Parse an engine TOML config.
pub fn parse_config(toml_str: &str) -> Result<EngineConfig> {
    toml::from_str(toml_str).map_err(|e| AtriumError::Config(format!("atrium.toml: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(!config.installed);
        assert_eq!(config.site_name, "Atrium");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.cache_dir, PathBuf::from("data/cache"));
        assert!(config.modules.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
installed = true
site_name = "Example Site"
data_dir = "/srv/atrium/data"
cache_dir = "/srv/atrium/cache"
modules = ["maintenance", "blog"]
"#;
        let config = parse_config(toml).unwrap();
        assert!(config.installed);
        assert_eq!(config.site_name, "Example Site");
        assert_eq!(config.data_dir, PathBuf::from("/srv/atrium/data"));
        assert_eq!(config.cache_dir, PathBuf::from("/srv/atrium/cache"));
        // Unset paths keep their defaults.
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert_eq!(config.modules, vec!["maintenance", "blog"]);
    }

    #[test]
    fn parse_invalid_toml() {
        let result = parse_config("this is [[[not valid toml");
        assert!(result.is_err());
        if let Err(AtriumError::Config(msg)) = result {
            assert!(msg.contains("atrium.toml"));
        } else {
            panic!("expected Config error");
        }
    }

    #[test]
    fn parse_module_order_is_preserved() {
        let toml = r#"modules = ["zeta", "alpha", "middle"]"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.modules, vec!["zeta", "alpha", "middle"]);
    }

    #[test]
    fn default_matches_empty_parse() {
        let parsed = parse_config("").unwrap();
        let default = EngineConfig::default();
        assert_eq!(parsed.installed, default.installed);
        assert_eq!(parsed.site_name, default.site_name);
        assert_eq!(parsed.migrations_dir, default.migrations_dir);
    }

    #[test]
    fn config_is_clone_and_debug() {
        let config = EngineConfig::default();
        let cloned = config.clone();
        let dbg = format!("{cloned:?}");
        assert!(dbg.contains("Atrium"));
    }
}
