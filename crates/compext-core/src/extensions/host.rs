//! Contracts the extension cache expects from its environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::options::CompilerOptions;
use crate::error::ExtensionError;
use crate::extensions::exports::ModuleExports;

/// Symbolic extension name -> absolute module path.
pub type ResolvedNameMap = HashMap<String, PathBuf>;

/// Turns a resolved module path into its exports.
pub trait ExtensionLoader {
    fn load_extension(&self, path: &Path) -> Result<ModuleExports, ExtensionError>;
}

/// File-system access and loading capability of the compiler host.
///
/// The probing methods default to the real file system.
pub trait ExtensionHost {
    fn current_directory(&self) -> Option<PathBuf> {
        None
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    /// The host's module loader, if it can load extensions at all.
    fn extension_loader(&self) -> Option<&dyn ExtensionLoader> {
        None
    }
}

/// Maps a symbolic extension name to a module path.
///
/// Failure to resolve is `None`, never an error.
pub trait ModuleResolver {
    fn resolve(
        &self,
        name: &str,
        containing_file: &Path,
        options: &CompilerOptions,
        host: &dyn ExtensionHost,
    ) -> Option<PathBuf>;
}

impl<F> ModuleResolver for F
where
    F: Fn(&str, &Path, &CompilerOptions, &dyn ExtensionHost) -> Option<PathBuf>,
{
    fn resolve(
        &self,
        name: &str,
        containing_file: &Path,
        options: &CompilerOptions,
        host: &dyn ExtensionHost,
    ) -> Option<PathBuf> {
        self(name, containing_file, options, host)
    }
}

/// A host backed by the real file system.
pub struct FileSystemHost<L> {
    current_dir: PathBuf,
    loader: Option<L>,
}

impl<L: ExtensionLoader> FileSystemHost<L> {
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            loader: None,
        }
    }

    pub fn with_loader(mut self, loader: L) -> Self {
        self.loader = Some(loader);
        self
    }
}

impl<L: ExtensionLoader> ExtensionHost for FileSystemHost<L> {
    fn current_directory(&self) -> Option<PathBuf> {
        Some(self.current_dir.clone())
    }

    fn extension_loader(&self) -> Option<&dyn ExtensionLoader> {
        self.loader.as_ref().map(|l| l as &dyn ExtensionLoader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyLoader;

    impl ExtensionLoader for EmptyLoader {
        fn load_extension(&self, _path: &Path) -> Result<ModuleExports, ExtensionError> {
            Ok(ModuleExports::new())
        }
    }

    #[test]
    fn test_file_system_host_without_loader() {
        let host = FileSystemHost::<EmptyLoader>::new("/work");
        assert_eq!(host.current_directory(), Some(PathBuf::from("/work")));
        assert!(host.extension_loader().is_none());
    }

    #[test]
    fn test_file_system_host_probes_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("ext.json");
        std::fs::write(&file, "{}").unwrap();

        let host = FileSystemHost::new(tmp.path()).with_loader(EmptyLoader);
        assert!(host.file_exists(&file));
        assert!(!host.file_exists(tmp.path()));
        assert!(host.directory_exists(tmp.path()));
        assert_eq!(host.read_file(&file).as_deref(), Some("{}"));

        let loader = host.extension_loader().unwrap();
        assert!(loader.load_extension(&file).unwrap().is_empty());
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |name: &str, _: &Path, _: &CompilerOptions, _: &dyn ExtensionHost| {
            (name == "known").then(|| PathBuf::from("/ext/known.js"))
        };
        let host = FileSystemHost::<EmptyLoader>::new("/");
        let options = CompilerOptions::default();
        assert_eq!(
            resolver.resolve("known", Path::new("/tsconfig.json"), &options, &host),
            Some(PathBuf::from("/ext/known.js"))
        );
        assert_eq!(
            resolver.resolve("other", Path::new("/tsconfig.json"), &options, &host),
            None
        );
    }
}
