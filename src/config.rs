//! Application configuration.
//!
//! The configuration is loaded from a JSON file whose path is passed on the
//! command line (`--config <path>`).  Without the flag the compiled-in
//! defaults are used.
//!
//! # Example
//!
//! ```json
//! {
//!   "separator": " - ",
//!   "unique": true,
//!   "app_names": {
//!     "firefox": "Web",
//!     "Code": "Editor"
//!   }
//! }
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Separator placed between application names when none is configured.
pub const DEFAULT_SEPARATOR: &str = "|";

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all fields
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// String placed between application names in a label.
    pub separator: String,

    /// List each display name only once per workspace (first occurrence
    /// wins, order is kept).
    pub unique: bool,

    /// Display-name overrides keyed by window class.
    ///
    /// Keys are lowercased by [`Config::load`]; see [`Config::normalized`].
    pub app_names: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            unique: false,
            app_names: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    ///
    /// The returned config is already [normalized](Config::normalized).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parse configuration from a JSON string and normalize it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Lowercase every `app_names` key so lookups can be case-insensitive.
    ///
    /// If two keys only differ in case, which one survives is unspecified.
    pub fn normalized(mut self) -> Self {
        self.app_names = self
            .app_names
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        self
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "separator": " - ",
            "unique": true,
            "app_names": { "firefox": "Web", "code": "Editor" }
        }"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.separator, " - ");
        assert!(cfg.unique);
        assert_eq!(cfg.app_names.get("firefox").map(String::as_str), Some("Web"));
        assert_eq!(cfg.app_names.get("code").map(String::as_str), Some("Editor"));
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.separator, "|");
        assert!(!cfg.unique);
        assert!(cfg.app_names.is_empty());
    }

    #[test]
    fn deserialize_partial_keeps_other_defaults() {
        let cfg = Config::from_json(r#"{ "unique": true }"#).unwrap();
        assert!(cfg.unique);
        assert_eq!(cfg.separator, DEFAULT_SEPARATOR);
    }

    #[test]
    fn app_name_keys_are_lowercased() {
        let cfg = Config::from_json(r#"{ "app_names": { "FireFox": "Web" } }"#).unwrap();
        assert_eq!(cfg.app_names.get("firefox").map(String::as_str), Some("Web"));
        assert!(!cfg.app_names.contains_key("FireFox"));
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "separator": ":", "future_section": { "key": 42 } }"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.separator, ":");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Config::from_json("{ separator: ").is_err());
        assert!(Config::from_json(r#"{ "unique": "yes" }"#).is_err());
    }

    #[test]
    fn load_reads_and_normalizes_file() {
        let path = std::env::temp_dir().join(format!("wsnamer-config-{}.json", std::process::id()));
        {
            let mut f = std::fs::File::create(&path).unwrap();
            write!(f, r#"{{ "app_names": {{ "XTerm": "Term" }} }}"#).unwrap();
        }
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.app_names.get("xterm").map(String::as_str), Some("Term"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let err = Config::load(Path::new("/nonexistent/wsnamer/config.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
