//! Runs the extension pipeline for a project and renders the result.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use compext_core::{
    Diagnostic, ExtensionCache, ExtensionError, FileSystemHost, JsonModuleLoader,
    NodeModuleResolver, Profiler, ProviderRegistry, load_project_config, paths,
};

/// `path` may name the project file or the directory holding it.
pub fn project_file_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        paths::project_file(path)
    } else {
        path.to_path_buf()
    }
}

/// Load the project file and set up an extension cache for it.
///
/// Extension names resolve relative to the project file's directory, made
/// absolute against the working directory.
pub fn open_project(
    project_file: &Path,
    extended_diagnostics: bool,
    registry: ProviderRegistry,
) -> Result<ExtensionCache, ExtensionError> {
    let config = load_project_config(project_file)?;
    let mut options = config.compiler_options;
    options.extended_diagnostics |= extended_diagnostics;

    let project_dir = match project_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::path::absolute(dir)?,
        _ => std::env::current_dir()?,
    };
    tracing::debug!("Project directory: {}", project_dir.display());

    let host = FileSystemHost::new(project_dir).with_loader(JsonModuleLoader::new(registry));
    let profiler = Profiler::new(options.extended_diagnostics);
    Ok(ExtensionCache::new(
        &options,
        Arc::new(host),
        &NodeModuleResolver::default(),
        profiler,
    ))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedExtension {
    pub name: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    pub bucket: String,
    pub millis: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub extensions: Vec<ReportedExtension>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<ProfileEntry>,
}

impl Report {
    pub fn from_cache(cache: &ExtensionCache) -> Self {
        let extensions = cache
            .get_compiler_extensions()
            .iter()
            .flat_map(|(kind, records)| {
                records.iter().map(move |record| ReportedExtension {
                    name: record.name.clone(),
                    kind: kind.to_string(),
                    args: record.args.clone(),
                })
            })
            .collect();

        let profile = cache
            .profiler()
            .report()
            .into_iter()
            .map(|(bucket, total)| ProfileEntry {
                bucket,
                millis: total.as_secs_f64() * 1000.0,
            })
            .collect();

        Self {
            extensions,
            diagnostics: cache.get_extension_loading_diagnostics().to_vec(),
            profile,
        }
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ExtensionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if self.extensions.is_empty() {
            out.push_str("No extensions loaded.\n");
        } else {
            let mut current_kind: Option<&str> = None;
            for ext in &self.extensions {
                if current_kind != Some(ext.kind.as_str()) {
                    let _ = writeln!(out, "{}:", ext.kind);
                    current_kind = Some(ext.kind.as_str());
                }
                match &ext.args {
                    Some(args) => {
                        let _ = writeln!(out, "  {} {args}", ext.name);
                    }
                    None => {
                        let _ = writeln!(out, "  {}", ext.name);
                    }
                }
            }
        }

        for diagnostic in &self.diagnostics {
            let _ = writeln!(out, "{diagnostic}");
        }

        if !self.profile.is_empty() {
            out.push_str("Extension load times:\n");
            for entry in &self.profile {
                let _ = writeln!(out, "  {}: {:.2}ms", entry.bucket, entry.millis);
            }
        }

        out
    }
}
