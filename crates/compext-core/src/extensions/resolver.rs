//! Node-style resolution of extension names to module files.

use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::config::options::CompilerOptions;
use crate::config::paths::{INDEX_FILE_STEM, PACKAGE_JSON_FILE_NAME, node_modules_dir};
use crate::extensions::host::{ExtensionHost, ModuleResolver};

const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".json"];

/// Resolves relative and absolute names against the containing file, and
/// bare names through `node_modules` directories of every ancestor.
///
/// All probing goes through the [`ExtensionHost`].
#[derive(Debug, Clone)]
pub struct NodeModuleResolver {
    extensions: Vec<String>,
}

impl Default for NodeModuleResolver {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()))
    }
}

impl NodeModuleResolver {
    /// `extensions` are tried in order when a path has no matching file,
    /// e.g. `[".js", ".json"]`.
    pub fn new(extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            extensions: extensions.into_iter().collect(),
        }
    }

    fn load_as_file(&self, candidate: &Path, host: &dyn ExtensionHost) -> Option<PathBuf> {
        if host.file_exists(candidate) {
            return Some(candidate.to_path_buf());
        }
        self.extensions.iter().find_map(|ext| {
            let mut with_ext = candidate.as_os_str().to_owned();
            with_ext.push(ext);
            let path = PathBuf::from(with_ext);
            host.file_exists(&path).then_some(path)
        })
    }

    fn load_as_directory(&self, dir: &Path, host: &dyn ExtensionHost) -> Option<PathBuf> {
        if !host.directory_exists(dir) {
            return None;
        }

        if let Some(main) = package_main(dir, host) {
            let target = dir.join(main);
            if let Some(found) = self
                .load_as_file(&target, host)
                .or_else(|| self.load_as_index(&target, host))
            {
                return Some(found);
            }
        }

        self.load_as_index(dir, host)
    }

    fn load_as_index(&self, dir: &Path, host: &dyn ExtensionHost) -> Option<PathBuf> {
        let index = dir.join(INDEX_FILE_STEM);
        self.extensions.iter().find_map(|ext| {
            let mut with_ext = index.as_os_str().to_owned();
            with_ext.push(ext);
            let path = PathBuf::from(with_ext);
            host.file_exists(&path).then_some(path)
        })
    }

    fn load_as_file_or_directory(
        &self,
        candidate: &Path,
        host: &dyn ExtensionHost,
    ) -> Option<PathBuf> {
        self.load_as_file(candidate, host)
            .or_else(|| self.load_as_directory(candidate, host))
    }
}

impl ModuleResolver for NodeModuleResolver {
    fn resolve(
        &self,
        name: &str,
        containing_file: &Path,
        _options: &CompilerOptions,
        host: &dyn ExtensionHost,
    ) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }

        let containing_dir = absolute_dir(containing_file);

        if is_path_like(name) {
            let candidate = normalize(&containing_dir.join(name));
            return self.load_as_file_or_directory(&candidate, host);
        }

        containing_dir.ancestors().find_map(|dir| {
            let candidate = node_modules_dir(dir).join(name);
            self.load_as_file_or_directory(&candidate, host)
        })
    }
}

fn is_path_like(name: &str) -> bool {
    name.starts_with("./")
        || name.starts_with("../")
        || name == "."
        || name == ".."
        || Path::new(name).is_absolute()
}

/// Directory of `containing_file`. A relative path is taken relative to the
/// process working directory, so resolved paths are always absolute.
fn absolute_dir(containing_file: &Path) -> PathBuf {
    let dir = containing_file.parent().unwrap_or(Path::new(""));
    if dir.is_absolute() {
        return normalize(dir);
    }
    let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    normalize(&base.join(dir))
}

/// Lexically collapse `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn package_main(dir: &Path, host: &dyn ExtensionHost) -> Option<String> {
    let content = host.read_file(&dir.join(PACKAGE_JSON_FILE_NAME))?;
    let package: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Ignoring malformed package.json in {}: {e}", dir.display());
            return None;
        }
    };
    package
        .get("main")
        .and_then(Value::as_str)
        .filter(|main| !main.is_empty())
        .map(str::to_string)
}
