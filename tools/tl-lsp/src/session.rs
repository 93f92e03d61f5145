//! Per-document state owned by the server.
//!
//! Each open document has an [`Entry`] holding its text and tree, the last
//! report the compiler produced for it, and the files its last diagnostics
//! were published to. Entries live from `open_document` to `close_document`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tl_diagnostic::PathMapper;
use tl_parse::Document;
use tl_types::TypeReport;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};

use crate::compiler::Compiler;
use crate::config::Settings;
use crate::convert;

/// A successfully decoded report and the paths of the run that made it.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub report: Arc<TypeReport>,
    pub paths: PathMapper,
}

/// Settings fixed at `initialize`.
#[derive(Debug)]
pub struct Workspace {
    pub settings: Settings,
    pub root: Option<PathBuf>,
    pub compiler: Compiler,
}

impl Workspace {
    pub fn new(settings: Settings, root: Option<PathBuf>) -> Self {
        let compiler = Compiler::new(settings.compiler_program());
        Workspace {
            settings,
            root,
            compiler,
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Workspace::new(Settings::default(), None)
    }
}

struct Entry {
    document: Document,
    /// Distinguishes this opening of the document from earlier ones.
    epoch: u64,
    analysis: Option<Analysis>,
    published: Vec<Url>,
}

/// Text of a document at the moment a refresh starts.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub text: String,
    pub epoch: u64,
}

#[derive(Default)]
pub struct Session {
    documents: DashMap<Url, Entry>,
    next_epoch: AtomicU64,
    workspace: OnceLock<Workspace>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Fix the workspace. Only the first call has an effect.
    pub fn configure(&self, workspace: Workspace) {
        if self.workspace.set(workspace).is_err() {
            tracing::warn!("workspace already configured");
        }
    }

    pub fn workspace(&self) -> &Workspace {
        self.workspace.get_or_init(Workspace::default)
    }

    /// Start tracking `uri`, replacing any earlier state. Returns the epoch
    /// of this opening.
    #[tracing::instrument(level = "debug", skip(self, text), fields(len = text.len()))]
    pub fn open_document(&self, uri: Url, text: String) -> u64 {
        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);
        let document = Document::new(uri.as_str(), text);
        self.documents.insert(
            uri,
            Entry {
                document,
                epoch,
                analysis: None,
                published: Vec::new(),
            },
        );
        epoch
    }

    /// Stop tracking `uri`. Returns the files whose diagnostics should be
    /// cleared.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn close_document(&self, uri: &Url) -> Vec<Url> {
        let mut files = self
            .documents
            .remove(uri)
            .map(|(_, entry)| entry.published)
            .unwrap_or_default();
        if !files.contains(uri) {
            files.push(uri.clone());
        }
        files
    }

    pub fn is_open(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    /// Apply one `didChange` batch. Returns `false` when `uri` is not open.
    pub fn apply_changes(&self, uri: &Url, changes: Vec<TextDocumentContentChangeEvent>) -> bool {
        let Some(mut entry) = self.documents.get_mut(uri) else {
            tracing::warn!(%uri, "change for a document that is not open");
            return false;
        };
        entry
            .document
            .apply_edits_with(changes, convert::content_change);
        true
    }

    /// Run `f` on the document and its latest analysis.
    pub fn with_document<T>(
        &self,
        uri: &Url,
        f: impl FnOnce(&Document, Option<&Analysis>) -> T,
    ) -> Option<T> {
        let entry = self.documents.get(uri)?;
        Some(f(&entry.document, entry.analysis.as_ref()))
    }

    pub fn snapshot(&self, uri: &Url) -> Option<Snapshot> {
        let entry = self.documents.get(uri)?;
        Some(Snapshot {
            text: entry.document.text(None).to_owned(),
            epoch: entry.epoch,
        })
    }

    /// Whether `uri` is still the opening that had `epoch`.
    pub fn is_current(&self, uri: &Url, epoch: u64) -> bool {
        self.documents
            .get(uri)
            .is_some_and(|entry| entry.epoch == epoch)
    }

    /// Replace the cached analysis. Dropped when the document was closed or
    /// reopened since `epoch`.
    pub fn store_analysis(&self, uri: &Url, epoch: u64, analysis: Analysis) -> bool {
        match self.documents.get_mut(uri) {
            Some(mut entry) if entry.epoch == epoch => {
                entry.analysis = Some(analysis);
                true
            }
            _ => {
                tracing::debug!(%uri, "discarding report for a stale document");
                false
            }
        }
    }

    pub fn analysis(&self, uri: &Url) -> Option<Analysis> {
        self.documents.get(uri)?.analysis.clone()
    }

    /// Record the files diagnostics were just published to. Returns the
    /// files published last time that are no longer among them, or `None`
    /// when the document is stale.
    pub fn replace_published(&self, uri: &Url, epoch: u64, files: Vec<Url>) -> Option<Vec<Url>> {
        let mut entry = self.documents.get_mut(uri)?;
        if entry.epoch != epoch {
            return None;
        }
        let previous = std::mem::replace(&mut entry.published, files);
        Some(
            previous
                .into_iter()
                .filter(|file| !entry.published.contains(file))
                .collect(),
        )
    }
}
