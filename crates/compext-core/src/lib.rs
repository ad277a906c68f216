pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extensions;
pub mod profiler;

// ========== Public API re-exports ==========

// Error
pub use error::ExtensionError;

// Config
pub use config::options::{CompilerOptions, ExtensionConfig, ProjectConfig, load_project_config};
pub use config::paths;

// Diagnostics
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticCode, DiagnosticMessage,
    EXTENSION_EXPORT_TYPE_MISMATCH, EXTENSION_LOAD_FAILED, EXTENSION_LOADING_NOT_SUPPORTED,
    EXTENSION_NOT_FOUND, TextSpan,
};

// Extensions
pub use extensions::lint::{
    LintNode, LintReport, LintReporter, LintWalker, ProviderConstructor, ProviderState,
};
pub use extensions::types::{
    ExtensionCollection, ExtensionKind, ExtensionPayload, ExtensionRecord, SEMANTIC_LINT,
    SYNTACTIC_LINT,
};
pub use extensions::{
    ExportValue, ExtensionCache, ExtensionHost, ExtensionLoader, FileSystemHost, JsonModuleLoader,
    ModuleExport, ModuleExports, ModuleResolver, NodeModuleResolver, ProviderRegistry,
    ResolvedNameMap, classify_module, resolve_extension_names,
};

// Profiling
pub use profiler::{ProfileSink, ProfileSpan, Profiler, RecordingProfileSink, TracingProfileSink};
