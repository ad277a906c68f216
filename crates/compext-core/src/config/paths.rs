use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "compext";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PROJECT_FILE_NAME: &str = "tsconfig.json";
pub const NODE_MODULES_DIR_NAME: &str = "node_modules";
pub const PACKAGE_JSON_FILE_NAME: &str = "package.json";
pub const INDEX_FILE_STEM: &str = "index";

/// Get the project file path inside a directory.
pub fn project_file(dir: &Path) -> PathBuf {
    dir.join(PROJECT_FILE_NAME)
}

/// Location handed to the resolver as the file extension names are
/// resolved relative to.
pub fn containing_file_hint(current_dir: Option<&Path>) -> PathBuf {
    project_file(current_dir.unwrap_or(Path::new("")))
}

/// Get the `node_modules` directory inside a directory.
pub fn node_modules_dir(dir: &Path) -> PathBuf {
    dir.join(NODE_MODULES_DIR_NAME)
}
