use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtensionError;

/// Configured extensions: bare names, or names mapped to argument payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionConfig {
    Names(Vec<String>),
    WithArgs(Map<String, Value>),
}

impl ExtensionConfig {
    /// Configured names in order. A repeated name keeps its first position.
    pub fn names(&self) -> Vec<String> {
        match self {
            ExtensionConfig::Names(names) => {
                let mut seen = HashSet::new();
                names
                    .iter()
                    .filter(|name| seen.insert(name.as_str()))
                    .cloned()
                    .collect()
            }
            ExtensionConfig::WithArgs(map) => map.keys().cloned().collect(),
        }
    }

    /// Argument payload for `name`. Always `None` for list-shaped configs.
    pub fn args_for(&self, name: &str) -> Option<Value> {
        match self {
            ExtensionConfig::Names(_) => None,
            ExtensionConfig::WithArgs(map) => map.get(name).cloned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ExtensionConfig::Names(names) => names.is_empty(),
            ExtensionConfig::WithArgs(map) => map.is_empty(),
        }
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig::Names(Vec::new())
    }
}

/// Compiler options relevant to extension loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Extensions to load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionConfig>,

    /// Enables timing of extension loading.
    #[serde(default)]
    pub extended_diagnostics: bool,

    /// Any additional options not covered above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl CompilerOptions {
    pub fn with_extensions(mut self, extensions: ExtensionConfig) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn with_extended_diagnostics(mut self, enabled: bool) -> Self {
        self.extended_diagnostics = enabled;
        self
    }

    /// Snapshot of the extension configuration (empty when unset).
    pub fn extension_config(&self) -> ExtensionConfig {
        self.extensions.clone().unwrap_or_default()
    }
}

/// A project file such as `tsconfig.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub compiler_options: CompilerOptions,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Read a project file.
pub fn load_project_config(path: &Path) -> Result<ProjectConfig, ExtensionError> {
    if !path.exists() {
        return Err(ExtensionError::Config(format!(
            "Project file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}
