//! Loads extension modules written as JSON documents.
//!
//! A JSON module is an object whose keys are its exports. Executable lint
//! providers cannot live in JSON, so an export refers to one by id:
//!
//! ```json
//! {
//!   "default": { "extension-kind": "syntactic-lint", "provider": "no-debugger" },
//!   "settings": { "maxDepth": 3 }
//! }
//! ```
//!
//! The id is looked up in the loader's [`ProviderRegistry`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ExtensionError;
use crate::extensions::exports::{ExportValue, ModuleExport, ModuleExports};
use crate::extensions::host::ExtensionLoader;
use crate::extensions::lint::ProviderConstructor;

/// Field naming a registered provider.
pub const PROVIDER_PROPERTY: &str = "provider";

/// Provider constructors available to JSON modules, keyed by id.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ProviderConstructor>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.providers.keys().collect();
        ids.sort();
        f.debug_struct("ProviderRegistry")
            .field("providers", &ids)
            .finish()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, ctor: impl ProviderConstructor + 'static) {
        self.providers.insert(id.into(), Arc::new(ctor));
    }

    pub fn with_provider(
        mut self,
        id: impl Into<String>,
        ctor: impl ProviderConstructor + 'static,
    ) -> Self {
        self.register(id, ctor);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn ProviderConstructor>> {
        self.providers.get(id)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonModuleLoader {
    registry: ProviderRegistry,
}

impl JsonModuleLoader {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Build the export table from an already parsed document.
    pub fn exports_from_value(&self, document: Value) -> Result<ModuleExports, ExtensionError> {
        let fields = match document {
            Value::Null => return Ok(ModuleExports::new()),
            Value::Object(fields) => fields,
            other => {
                return Err(ExtensionError::Load(format!(
                    "module must be a JSON object, found {}",
                    json_type_name(&other)
                )));
            }
        };

        let mut exports = ModuleExports::new();
        for (key, value) in fields {
            let export = self.export_from_value(&key, value);
            exports.insert(key, export);
        }
        Ok(exports)
    }

    fn export_from_value(&self, key: &str, value: Value) -> ModuleExport {
        let Value::Object(fields) = value else {
            return ModuleExport::data(value);
        };

        let ctor = match fields.get(PROVIDER_PROPERTY).and_then(Value::as_str) {
            None => return ModuleExport::data(Value::Object(fields)),
            Some(id) => match self.registry.get(id) {
                Some(ctor) => ctor.clone(),
                None => {
                    tracing::warn!("Export '{key}' names unknown provider '{id}'");
                    return ModuleExport::data(Value::Object(fields));
                }
            },
        };

        fields
            .into_iter()
            .fold(ModuleExport::new(ExportValue::Constructor(ctor)), |export, (name, field)| {
                export.with_property(name, field)
            })
    }
}

impl ExtensionLoader for JsonModuleLoader {
    fn load_extension(&self, path: &Path) -> Result<ModuleExports, ExtensionError> {
        let content = std::fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&content)?;
        self.exports_from_value(document)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
