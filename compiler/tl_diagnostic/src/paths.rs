//! Mapping compiler-reported paths back to editor URIs.

use std::path::{Component, Path, PathBuf};

use url::Url;

/// File name prefix of the temporary copies handed to the compiler.
pub const TEMP_FILE_PREFIX: &str = "__tl__tmp__check-";

/// Whether `path` names one of our temporary copies.
pub fn is_temp_file(path: &str) -> bool {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(TEMP_FILE_PREFIX))
}

/// Resolves paths from one compiler run.
#[derive(Clone, Debug)]
pub struct PathMapper {
    document: Url,
    /// Working directory of the compiler run.
    project_dir: PathBuf,
    workspace_root: Option<PathBuf>,
}

impl PathMapper {
    pub fn new(document: Url, project_dir: impl Into<PathBuf>) -> Self {
        PathMapper {
            document,
            project_dir: project_dir.into(),
            workspace_root: None,
        }
    }

    /// Drop files outside `root`.
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(normalize(&root.into()));
        self
    }

    /// The document being checked.
    pub fn document(&self) -> &Url {
        &self.document
    }

    /// URI for a path the compiler printed, or `None` when it lies outside
    /// the workspace.
    pub fn to_uri(&self, reported: &str) -> Option<Url> {
        if is_temp_file(reported) {
            return Some(self.document.clone());
        }
        let path = normalize(&self.project_dir.join(reported));
        if let Some(root) = &self.workspace_root {
            if !path.starts_with(root) {
                return None;
            }
        }
        Url::from_file_path(&path).ok()
    }
}

/// Lexically resolve `.` and `..`; the file need not exist.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
