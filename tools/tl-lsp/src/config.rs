//! Server settings and project discovery.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Project configuration file; its directory is the compiler's working
/// directory.
pub const CONFIG_FILE: &str = "tlconfig.lua";

/// Compiler looked up on `PATH` when none is configured.
pub const DEFAULT_COMPILER: &str = "tl";

/// Settings from the client's `initializationOptions`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub compiler_path: Option<PathBuf>,
    /// Minimum time between two compiler runs for one document.
    pub refresh_interval_ms: u64,
    /// Directories searched upward for `tlconfig.lua`, starting with the
    /// document's own.
    pub max_config_search_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            compiler_path: None,
            refresh_interval_ms: 250,
            max_config_search_depth: 10,
        }
    }
}

impl Settings {
    /// Read settings, falling back to defaults when they are absent or
    /// invalid.
    pub fn from_init_options(options: Option<Value>) -> Self {
        match options {
            None | Some(Value::Null) => Settings::default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                tracing::warn!(%err, "ignoring invalid initialization options");
                Settings::default()
            }),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn compiler_program(&self) -> PathBuf {
        self.compiler_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPILER))
    }
}

/// Directory of the nearest `tlconfig.lua` above `file`, searching at most
/// `max_depth` directories and never leaving `workspace_root`.
pub fn find_project_dir(
    file: &Path,
    workspace_root: Option<&Path>,
    max_depth: usize,
) -> Option<PathBuf> {
    for dir in file.parent()?.ancestors().take(max_depth) {
        if workspace_root.is_some_and(|root| !dir.starts_with(root)) {
            break;
        }
        if dir.join(CONFIG_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
    }
    None
}

/// Working directory for compiling `file`: its project directory, or the
/// file's own directory.
pub fn working_dir(file: &Path, workspace_root: Option<&Path>, max_depth: usize) -> PathBuf {
    find_project_dir(file, workspace_root, max_depth)
        .or_else(|| file.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
