use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use crate::config::options::{CompilerOptions, ExtensionConfig};
use crate::config::paths;
use crate::diagnostics::{
    Diagnostic, EXTENSION_LOAD_FAILED, EXTENSION_LOADING_NOT_SUPPORTED, EXTENSION_NOT_FOUND,
};
use crate::extensions::classify::classify_module;
use crate::extensions::exports::ModuleExports;
use crate::extensions::host::{ExtensionHost, ExtensionLoader, ModuleResolver, ResolvedNameMap};
use crate::extensions::types::ExtensionCollection;
use crate::profiler::Profiler;

/// Outcome of loading one configured name.
struct LoadResult {
    name: String,
    result: Result<ModuleExports, Diagnostic>,
}

struct LoadedExtensions {
    collection: ExtensionCollection,
    diagnostics: Vec<Diagnostic>,
}

/// Resolves configured extensions up front and loads them on first use.
///
/// Loading and classification run at most once per cache. Every failure is
/// recorded as a diagnostic; nothing is returned as an error.
pub struct ExtensionCache {
    config: ExtensionConfig,
    profiling_enabled: bool,
    host: Arc<dyn ExtensionHost>,
    profiler: Profiler,
    resolved_names: ResolvedNameMap,
    loaded: OnceCell<LoadedExtensions>,
}

impl ExtensionCache {
    /// Create a cache, resolving every configured name immediately.
    pub fn new(
        options: &CompilerOptions,
        host: Arc<dyn ExtensionHost>,
        resolver: &dyn ModuleResolver,
        profiler: Profiler,
    ) -> Self {
        let resolved_names = resolve_extension_names(options, host.as_ref(), resolver);
        Self::with_resolved_names(options, host, resolved_names, profiler)
    }

    /// Create a cache from an already computed name map. No resolution is
    /// performed.
    pub fn with_resolved_names(
        options: &CompilerOptions,
        host: Arc<dyn ExtensionHost>,
        resolved_names: ResolvedNameMap,
        profiler: Profiler,
    ) -> Self {
        Self {
            config: options.extension_config(),
            profiling_enabled: options.extended_diagnostics,
            host,
            profiler,
            resolved_names,
            loaded: OnceCell::new(),
        }
    }

    pub fn resolved_names(&self) -> &ResolvedNameMap {
        &self.resolved_names
    }

    /// Whether the load pass has already run.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    /// Loaded extensions grouped by kind. Loads them on the first call.
    pub fn get_compiler_extensions(&self) -> &ExtensionCollection {
        &self.loaded().collection
    }

    /// Diagnostics from resolving, loading and validating extensions.
    /// Loads them first if that has not happened yet.
    pub fn get_extension_loading_diagnostics(&self) -> &[Diagnostic] {
        &self.loaded().diagnostics
    }

    fn loaded(&self) -> &LoadedExtensions {
        self.loaded.get_or_init(|| self.collect_compiler_extensions())
    }

    fn collect_compiler_extensions(&self) -> LoadedExtensions {
        let load_results: Vec<LoadResult> = self
            .config
            .names()
            .into_iter()
            .map(|name| {
                let result = self.load_extension(&name);
                LoadResult { name, result }
            })
            .collect();

        let mut diagnostics = Vec::new();
        let mut successful = Vec::new();
        for LoadResult { name, result } in load_results {
            match result {
                Ok(exports) => successful.push((name, exports)),
                Err(diagnostic) => {
                    tracing::warn!("{}", diagnostic.message);
                    diagnostics.push(diagnostic);
                }
            }
        }

        let mut records = Vec::new();
        for (name, exports) in &successful {
            let args = self.config.args_for(name);
            let classified = classify_module(name, exports, args.as_ref());
            records.extend(classified.records);
            diagnostics.extend(classified.diagnostics);
        }

        let collection = ExtensionCollection::group_by_kind(records);
        tracing::debug!(
            "Loaded {} extension(s) across {} kind(s) with {} diagnostic(s)",
            collection.record_count(),
            collection.len(),
            diagnostics.len()
        );

        LoadedExtensions {
            collection,
            diagnostics,
        }
    }

    fn load_extension(&self, name: &str) -> Result<ModuleExports, Diagnostic> {
        let Some(path) = self.resolved_names.get(name) else {
            return Err(Diagnostic::compiler(&EXTENSION_NOT_FOUND, &[name]));
        };
        let Some(loader) = self.host.extension_loader() else {
            return Err(Diagnostic::compiler(&EXTENSION_LOADING_NOT_SUPPORTED, &[name]));
        };

        if self.profiling_enabled {
            self.profiler.start_profile(name, Some(name));
        }
        let exports = contained_load(loader, path)
            .map_err(|message| Diagnostic::compiler(&EXTENSION_LOAD_FAILED, &[&message]))?;
        if self.profiling_enabled {
            self.profiler.complete_profile(name);
        }

        tracing::debug!(
            "Loaded extension '{name}' from {} ({} export(s))",
            path.display(),
            exports.len()
        );
        Ok(exports)
    }
}

/// Resolve every configured name, relative to `<cwd>/tsconfig.json`.
/// Unresolvable names are left out of the map.
pub fn resolve_extension_names(
    options: &CompilerOptions,
    host: &dyn ExtensionHost,
    resolver: &dyn ModuleResolver,
) -> ResolvedNameMap {
    let current_dir = host.current_directory();
    let containing_file = paths::containing_file_hint(current_dir.as_deref());

    let mut resolved = ResolvedNameMap::new();
    for name in options.extension_config().names() {
        match resolver.resolve(&name, &containing_file, options, host) {
            Some(path) => {
                tracing::debug!("Resolved extension '{name}' to {}", path.display());
                resolved.insert(name, path);
            }
            None => tracing::debug!("Could not resolve extension '{name}'"),
        }
    }
    resolved
}

/// Run the loader, turning both errors and panics into a message.
fn contained_load(loader: &dyn ExtensionLoader, path: &Path) -> Result<ModuleExports, String> {
    match catch_unwind(AssertUnwindSafe(|| loader.load_extension(path))) {
        Ok(Ok(exports)) => Ok(exports),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "extension panicked".to_string()
    }
}
