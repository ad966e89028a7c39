use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snapshot_logging::{snap_debug, snap_info, snap_warn};
use thiserror::Error;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "snapshot.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Run configuration, frozen before the run starts.
///
/// Only `dry_run` is interpreted here. Every other option, including keys this
/// type does not know about, is forwarded untouched to the crawler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotConfig {
    #[serde(rename = "inlineCSS")]
    pub inline_css: bool,
    pub preload_scripts: bool,
    pub preload_fonts: bool,
    #[serde(rename = "addCSPHashes")]
    pub add_csp_hashes: bool,
    pub csp_algo: String,
    pub dry_run: bool,
    pub print_console_logs: bool,
    pub remove_empty_style_tags: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            inline_css: true,
            preload_scripts: true,
            preload_fonts: true,
            add_csp_hashes: true,
            csp_algo: "sha256".to_string(),
            dry_run: false,
            print_console_logs: false,
            remove_empty_style_tags: true,
            extra: Map::new(),
        }
    }
}

impl SnapshotConfig {
    /// Loads `path`, falling back to defaults when it is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                snap_info!("Loaded configuration from {:?}", path);
                config
            }
            Err(err) => {
                snap_debug!("Using default configuration ({:?}: {})", path, err);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a JSON object and overlays it on the defaults key by key.
    ///
    /// A known key whose value has the wrong JSON type keeps its default and is
    /// logged; the remaining keys still apply.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let overrides: Map<String, Value> = serde_json::from_str(text)?;
        let mut merged = match serde_json::to_value(Self::default())? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in overrides {
            let expected = merged
                .get(&key)
                .filter(|default| !same_kind(default, &value))
                .map(kind_name);
            if let Some(expected) = expected {
                snap_warn!(
                    "Ignoring config key {:?}: expected {}, got {}",
                    key,
                    expected,
                    kind_name(&value)
                );
                continue;
            }
            merged.insert(key, value);
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    kind_name(a) == kind_name(b)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
