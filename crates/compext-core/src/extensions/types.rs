use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::extensions::exports::ModuleExport;
use crate::extensions::lint::ProviderConstructor;

pub const SYNTACTIC_LINT: &str = "syntactic-lint";
pub const SEMANTIC_LINT: &str = "semantic-lint";

/// Role an extension export plays.
///
/// Only the lint kinds are validated; any other tag is carried through as
/// [`ExtensionKind::Custom`] so other subsystems can define their own kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    SyntacticLint,
    SemanticLint,
    Custom(String),
}

impl ExtensionKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            SYNTACTIC_LINT => ExtensionKind::SyntacticLint,
            SEMANTIC_LINT => ExtensionKind::SemanticLint,
            other => ExtensionKind::Custom(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            ExtensionKind::SyntacticLint => SYNTACTIC_LINT,
            ExtensionKind::SemanticLint => SEMANTIC_LINT,
            ExtensionKind::Custom(tag) => tag,
        }
    }

    pub fn is_lint(&self) -> bool {
        matches!(
            self,
            ExtensionKind::SyntacticLint | ExtensionKind::SemanticLint
        )
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Clone)]
pub enum ExtensionPayload {
    /// Validated provider for a lint kind.
    Provider(Arc<dyn ProviderConstructor>),
    /// Unchecked export for any other kind.
    Opaque(ModuleExport),
}

impl fmt::Debug for ExtensionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionPayload::Provider(_) => f.write_str("Provider(..)"),
            ExtensionPayload::Opaque(export) => f.debug_tuple("Opaque").field(export).finish(),
        }
    }
}

/// One classified extension export.
#[derive(Debug, Clone)]
pub struct ExtensionRecord {
    /// `name` for default exports, `name[key]` otherwise.
    pub name: String,
    /// Argument payload from a mapping-shaped configuration.
    pub args: Option<Value>,
    pub kind: ExtensionKind,
    pub payload: ExtensionPayload,
}

impl ExtensionRecord {
    pub fn provider(&self) -> Option<&Arc<dyn ProviderConstructor>> {
        match &self.payload {
            ExtensionPayload::Provider(ctor) => Some(ctor),
            ExtensionPayload::Opaque(_) => None,
        }
    }

    pub fn opaque(&self) -> Option<&ModuleExport> {
        match &self.payload {
            ExtensionPayload::Opaque(export) => Some(export),
            ExtensionPayload::Provider(_) => None,
        }
    }
}

/// Extension records grouped by kind tag, in load order within each kind.
#[derive(Debug, Clone, Default)]
pub struct ExtensionCollection {
    by_kind: BTreeMap<String, Vec<ExtensionRecord>>,
}

impl ExtensionCollection {
    /// Group records by kind tag. Kinds without records are never present.
    pub fn group_by_kind(records: impl IntoIterator<Item = ExtensionRecord>) -> Self {
        let mut by_kind: BTreeMap<String, Vec<ExtensionRecord>> = BTreeMap::new();
        for record in records {
            by_kind
                .entry(record.kind.tag().to_string())
                .or_default()
                .push(record);
        }
        Self { by_kind }
    }

    pub fn get(&self, kind_tag: &str) -> Option<&[ExtensionRecord]> {
        self.by_kind.get(kind_tag).map(Vec::as_slice)
    }

    pub fn of_kind(&self, kind: &ExtensionKind) -> &[ExtensionRecord] {
        self.get(kind.tag()).unwrap_or(&[])
    }

    pub fn syntactic_lints(&self) -> &[ExtensionRecord] {
        self.of_kind(&ExtensionKind::SyntacticLint)
    }

    pub fn semantic_lints(&self) -> &[ExtensionRecord] {
        self.of_kind(&ExtensionKind::SemanticLint)
    }

    pub fn contains_kind(&self, kind_tag: &str) -> bool {
        self.by_kind.contains_key(kind_tag)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.by_kind.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ExtensionRecord])> {
        self.by_kind.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of kinds present.
    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }
}
