use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HasteError, Result};

pub const CONFIG_FILENAME: &str = "haste.json";

/// Options shared by the index and its default collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasteMapConfig {
    /// Source extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Platform tags recognised in file names (`Foo.ios.js`).
    pub platforms: BTreeSet<String>,
    /// Fall back to the `native` variant before the generic one.
    pub prefer_native_platform: bool,
    /// Packages under `node_modules` that still take part in the index.
    pub provides_module_node_modules: Vec<String>,
}

impl Default for HasteMapConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["js".to_string(), "json".to_string()],
            platforms: ["ios", "android", "native", "web"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            prefer_native_platform: false,
            provides_module_node_modules: vec!["react-native".to_string()],
        }
    }
}

impl HasteMapConfig {
    /// Loads a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
            .map_err(|error| HasteError::Config(format!("{}: {error}", path.display())))
    }

    pub fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        !ext.is_empty() && self.extensions.iter().any(|candidate| candidate == ext)
    }
}
