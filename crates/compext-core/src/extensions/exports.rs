//! Runtime shape of whatever a loaded extension module exports.
//!
//! Hosts translate their native module objects into [`ModuleExports`]; the
//! classifier only ever inspects this representation.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::extensions::lint::ProviderConstructor;

/// Property carrying an export's declared extension kind.
pub const EXTENSION_KIND_PROPERTY: &str = "extension-kind";

/// Export key that maps to the bare extension name.
pub const DEFAULT_EXPORT_KEY: &str = "default";

/// A single exported value.
#[derive(Clone)]
pub enum ExportValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map<String, Value>),
    /// Something that can be instantiated into a lint walker.
    Constructor(Arc<dyn ProviderConstructor>),
}

impl ExportValue {
    /// Name of the value's runtime type, as reported in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ExportValue::Undefined => "undefined",
            ExportValue::Null | ExportValue::Array(_) | ExportValue::Object(_) => "object",
            ExportValue::Bool(_) => "boolean",
            ExportValue::Number(_) => "number",
            ExportValue::String(_) => "string",
            ExportValue::Constructor(_) => "function",
        }
    }

    pub fn is_falsy(&self) -> bool {
        match self {
            ExportValue::Undefined | ExportValue::Null => true,
            ExportValue::Bool(b) => !b,
            ExportValue::Number(n) => *n == 0.0 || n.is_nan(),
            ExportValue::String(s) => s.is_empty(),
            ExportValue::Array(_) | ExportValue::Object(_) | ExportValue::Constructor(_) => false,
        }
    }
}

impl From<Value> for ExportValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ExportValue::Null,
            Value::Bool(b) => ExportValue::Bool(b),
            Value::Number(n) => ExportValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => ExportValue::String(s),
            Value::Array(items) => ExportValue::Array(items),
            Value::Object(map) => ExportValue::Object(map),
        }
    }
}

impl fmt::Debug for ExportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportValue::Undefined => f.write_str("Undefined"),
            ExportValue::Null => f.write_str("Null"),
            ExportValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            ExportValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            ExportValue::String(s) => f.debug_tuple("String").field(s).finish(),
            ExportValue::Array(items) => f.debug_tuple("Array").field(items).finish(),
            ExportValue::Object(map) => f.debug_tuple("Object").field(map).finish(),
            ExportValue::Constructor(_) => f.write_str("Constructor(..)"),
        }
    }
}

/// An exported value together with the static properties attached to it.
#[derive(Debug, Clone)]
pub struct ModuleExport {
    value: ExportValue,
    properties: Map<String, Value>,
}

impl ModuleExport {
    pub fn new(value: ExportValue) -> Self {
        Self {
            value,
            properties: Map::new(),
        }
    }

    /// Plain data export.
    pub fn data(value: Value) -> Self {
        Self::new(value.into())
    }

    /// Constructor export without any properties.
    pub fn constructor(ctor: impl ProviderConstructor + 'static) -> Self {
        Self::new(ExportValue::Constructor(Arc::new(ctor)))
    }

    /// Constructor export tagged with an extension kind.
    pub fn tagged_constructor(kind_tag: &str, ctor: impl ProviderConstructor + 'static) -> Self {
        Self::constructor(ctor).with_property(EXTENSION_KIND_PROPERTY, Value::from(kind_tag))
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn value(&self) -> &ExportValue {
        &self.value
    }

    /// Look up a property. Object values expose their own fields as well;
    /// attached properties take precedence.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).or_else(|| match &self.value {
            ExportValue::Object(fields) => fields.get(key),
            _ => None,
        })
    }

    /// The declared kind tag, only when it is a string.
    pub fn kind_tag(&self) -> Option<&str> {
        self.property(EXTENSION_KIND_PROPERTY).and_then(Value::as_str)
    }

    pub fn is_falsy(&self) -> bool {
        self.value.is_falsy()
    }

    pub fn as_constructor(&self) -> Option<&Arc<dyn ProviderConstructor>> {
        match &self.value {
            ExportValue::Constructor(ctor) => Some(ctor),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }
}

/// Ordered export table of one module. Empty means the module exported
/// nothing usable.
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    entries: Vec<(String, ModuleExport)>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an export, keeping the original position on replace.
    pub fn with_export(mut self, key: impl Into<String>, export: ModuleExport) -> Self {
        self.insert(key, export);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, export: ModuleExport) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = export,
            None => self.entries.push((key, export)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ModuleExport> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleExport)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
