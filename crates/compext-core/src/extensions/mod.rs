pub mod cache;
pub mod classify;
pub mod exports;
pub mod host;
pub mod json_loader;
pub mod lint;
pub mod resolver;
pub mod types;

pub use cache::{ExtensionCache, resolve_extension_names};
pub use classify::{ClassifiedModule, classify_module, extension_root_name, qualified_name};
pub use exports::{ExportValue, ModuleExport, ModuleExports};
pub use host::{ExtensionHost, ExtensionLoader, FileSystemHost, ModuleResolver, ResolvedNameMap};
pub use json_loader::{JsonModuleLoader, ProviderRegistry};
pub use resolver::NodeModuleResolver;
