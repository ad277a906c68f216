//! Turns raw module exports into typed extension records.
//!
//! Each export goes through two checks. The first decides whether the export
//! claims to be an extension at all: falsy values and values without a string
//! `extension-kind` tag are skipped without a diagnostic, so modules can export
//! helpers next to their extensions. The second applies only to exports that
//! passed the first, and checks the shape required by the declared kind.

use serde_json::Value;

use crate::diagnostics::{Diagnostic, EXTENSION_EXPORT_TYPE_MISMATCH};
use crate::extensions::exports::{DEFAULT_EXPORT_KEY, ModuleExport, ModuleExports};
use crate::extensions::types::{ExtensionKind, ExtensionPayload, ExtensionRecord};

/// Type name a lint export must have.
pub const PROVIDER_TYPE_NAME: &str = "function";

/// Records and diagnostics produced from one module.
#[derive(Debug, Default)]
pub struct ClassifiedModule {
    pub records: Vec<ExtensionRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// `name` for the default export, `name[key]` for any other.
pub fn qualified_name(base: &str, export_key: &str) -> String {
    if export_key == DEFAULT_EXPORT_KEY {
        base.to_string()
    } else {
        format!("{base}[{export_key}]")
    }
}

/// Strip an `[exportKey]` qualifier, leaving the module's symbolic name.
pub fn extension_root_name(qualified_name: &str) -> &str {
    match qualified_name.find('[') {
        Some(0) | None => qualified_name,
        Some(i) => &qualified_name[..i],
    }
}

/// Classify every export of a module loaded under `base_name`.
///
/// A bad export never affects its siblings.
pub fn classify_module(
    base_name: &str,
    exports: &ModuleExports,
    args: Option<&Value>,
) -> ClassifiedModule {
    let mut classified = ClassifiedModule::default();

    for (key, export) in exports.iter() {
        let Some(kind) = declared_kind(export) else {
            continue;
        };

        match validate_export(base_name, key, kind, export, args) {
            Ok(record) => classified.records.push(record),
            Err(diagnostic) => classified.diagnostics.push(diagnostic),
        }
    }

    classified
}

/// First check: does the export carry a kind tag?
fn declared_kind(export: &ModuleExport) -> Option<ExtensionKind> {
    if export.is_falsy() {
        return None;
    }
    export.kind_tag().map(ExtensionKind::from_tag)
}

/// Second check: is the export shaped the way its kind requires?
fn validate_export(
    base_name: &str,
    key: &str,
    kind: ExtensionKind,
    export: &ModuleExport,
    args: Option<&Value>,
) -> Result<ExtensionRecord, Diagnostic> {
    let payload = if kind.is_lint() {
        let Some(ctor) = export.as_constructor() else {
            return Err(Diagnostic::compiler(
                &EXTENSION_EXPORT_TYPE_MISMATCH,
                &[
                    base_name,
                    key,
                    kind.tag(),
                    export.type_name(),
                    PROVIDER_TYPE_NAME,
                ],
            ));
        };
        ExtensionPayload::Provider(ctor.clone())
    } else {
        ExtensionPayload::Opaque(export.clone())
    };

    Ok(ExtensionRecord {
        name: qualified_name(base_name, key),
        args: args.cloned(),
        kind,
        payload,
    })
}
