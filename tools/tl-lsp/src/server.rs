//! The language server: protocol handlers over a [`Session`].

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tl_diagnostic::{DiagnosticMap, PathMapper};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::request::{GotoTypeDefinitionParams, GotoTypeDefinitionResponse};
use tower_lsp::lsp_types::{
    CompletionOptions, CompletionParams, CompletionResponse, Diagnostic,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverParams,
    HoverProviderCapability, InitializeParams, InitializeResult, InitializedParams, MessageType,
    OneOf, ServerCapabilities, ServerInfo, SignatureHelp, SignatureHelpOptions,
    SignatureHelpParams, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions, TextDocumentSyncSaveOptions, TypeDefinitionProviderCapability, Url,
    WorkDoneProgressOptions,
};
use tower_lsp::{Client, LanguageServer};

use crate::compiler::{CompilerError, MIN_VERSION};
use crate::config::{working_dir, Settings};
use crate::convert;
use crate::features::{completion, definition, hover, signature};
use crate::refresh::{Refresh, Scheduler};
use crate::session::{Analysis, Session, Workspace};

/// What a refresh sends back to the editor.
pub trait Editor: Send + Sync + 'static {
    fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>) -> impl Future<Output = ()> + Send;

    fn notify(&self, kind: MessageType, message: String) -> impl Future<Output = ()> + Send;
}

impl Editor for Client {
    async fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>) {
        self.publish_diagnostics(uri, diagnostics, None).await;
    }

    async fn notify(&self, kind: MessageType, message: String) {
        self.show_message(kind, message).await;
    }
}

/// Runs the compiler for one document and publishes what it reports.
pub struct Analyzer<E = Client> {
    client: E,
    session: Arc<Session>,
    /// A missing compiler is reported once, not on every keystroke.
    reported_missing: AtomicBool,
}

impl<E: Editor> Analyzer<E> {
    pub fn new(client: E, session: Arc<Session>) -> Self {
        Analyzer {
            client,
            session,
            reported_missing: AtomicBool::new(false),
        }
    }

    fn paths(&self, uri: &Url) -> (PathMapper, PathBuf) {
        let workspace = self.session.workspace();
        let settings = &workspace.settings;
        let cwd = match uri.to_file_path() {
            Ok(file) => working_dir(
                &file,
                workspace.root.as_deref(),
                settings.max_config_search_depth,
            ),
            Err(()) => PathBuf::from("."),
        };
        let mut paths = PathMapper::new(uri.clone(), &cwd);
        if let Some(root) = &workspace.root {
            paths = paths.with_workspace_root(root);
        }
        (paths, cwd)
    }

    /// Publish `map` and clear files the previous run reported on but this
    /// one did not.
    async fn publish(&self, uri: &Url, epoch: u64, map: &DiagnosticMap) {
        let converted = self.session.with_document(uri, |doc, _| {
            map.iter()
                .map(|(file, diagnostics)| {
                    let doc = (file == uri).then_some(doc);
                    let diagnostics = diagnostics
                        .iter()
                        .map(|diagnostic| convert::diagnostic(doc, diagnostic))
                        .collect::<Vec<_>>();
                    (file.clone(), diagnostics)
                })
                .collect::<Vec<_>>()
        });
        let Some(converted) = converted else {
            return;
        };
        let files = converted.iter().map(|(file, _)| file.clone()).collect();
        let Some(stale) = self.session.replace_published(uri, epoch, files) else {
            return;
        };

        for (file, diagnostics) in converted {
            self.client.publish(file, diagnostics).await;
        }
        for file in stale {
            self.client.publish(file, Vec::new()).await;
        }
    }

    async fn report_error(&self, err: &CompilerError) {
        tracing::error!(%err, "analysis failed");
        if matches!(err, CompilerError::NotFound { .. })
            && self.reported_missing.swap(true, Ordering::Relaxed)
        {
            return;
        }
        self.client.notify(MessageType::ERROR, err.to_string()).await;
    }
}

impl<E: Editor> Refresh for Analyzer<E> {
    #[tracing::instrument(level = "debug", skip_all, fields(uri = %uri))]
    async fn refresh(&self, uri: Url) {
        let Some(snapshot) = self.session.snapshot(&uri) else {
            return;
        };
        let (paths, cwd) = self.paths(&uri);
        let compiler = &self.session.workspace().compiler;

        let output = match compiler.analyze(&snapshot.text, &cwd).await {
            Ok(output) => output,
            Err(err) => return self.report_error(&err).await,
        };
        if !self.session.is_current(&uri, snapshot.epoch) {
            tracing::debug!("document closed during analysis");
            return;
        }

        match output.diagnostics(&paths) {
            Ok(map) => self.publish(&uri, snapshot.epoch, &map).await,
            Err(err) => {
                self.publish(&uri, snapshot.epoch, &DiagnosticMap::new(uri.clone()))
                    .await;
                self.report_error(&err).await;
            }
        }

        // A failed report keeps the previous one in place.
        match output.report() {
            Ok(report) => {
                let analysis = Analysis {
                    report: Arc::new(report),
                    paths,
                };
                self.session.store_analysis(&uri, snapshot.epoch, analysis);
            }
            Err(err) => self.report_error(&err).await,
        }
    }

    fn interval(&self) -> Duration {
        self.session.workspace().settings.refresh_interval()
    }
}

pub struct TealLanguageServer {
    client: Client,
    session: Arc<Session>,
    scheduler: Scheduler<Analyzer>,
}

impl TealLanguageServer {
    pub fn new(client: Client) -> Self {
        let session = Arc::new(Session::new());
        let analyzer = Analyzer::new(client.clone(), Arc::clone(&session));
        TealLanguageServer {
            client,
            session,
            scheduler: Scheduler::new(analyzer),
        }
    }

    async fn check_compiler_version(&self) {
        let compiler = &self.session.workspace().compiler;
        match compiler.version().await {
            Ok(version) if version.is_supported() => {
                tracing::info!(%version, "found Teal compiler");
            }
            Ok(version) => {
                let message = format!(
                    "Teal compiler {version} is older than {MIN_VERSION}; some features may not work"
                );
                tracing::warn!("{message}");
                self.client.show_message(MessageType::WARNING, message).await;
            }
            Err(err @ CompilerError::NotFound { .. }) => {
                self.scheduler.runner().report_error(&err).await;
            }
            Err(err) => tracing::warn!(%err, "could not determine compiler version"),
        }
    }
}

fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    let folder = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri);
    #[allow(deprecated)]
    let uri = folder.or(params.root_uri.as_ref())?;
    uri.to_file_path().ok()
}

#[tower_lsp::async_trait]
impl LanguageServer for TealLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let settings = Settings::from_init_options(params.initialization_options.clone());
        let root = workspace_root(&params);
        tracing::info!(?settings, ?root, "initializing");
        self.session.configure(Workspace::new(settings, root));

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::INCREMENTAL),
                        save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                        ..Default::default()
                    },
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                type_definition_provider: Some(TypeDefinitionProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_owned(), ":".to_owned()]),
                    ..Default::default()
                }),
                signature_help_provider: Some(SignatureHelpOptions {
                    trigger_characters: Some(vec!["(".to_owned(), ",".to_owned()]),
                    retrigger_characters: None,
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "tl-lsp".to_owned(),
                version: Some(env!("CARGO_PKG_VERSION").to_owned()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Teal language server initialized")
            .await;
        self.check_compiler_version().await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        self.session
            .open_document(uri.clone(), params.text_document.text);
        self.scheduler.request(uri);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        if self.session.apply_changes(&uri, params.content_changes) {
            self.scheduler.request(uri);
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        if self.session.is_open(&uri) {
            self.scheduler.request(uri);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.scheduler.remove(&uri);
        for file in self.session.close_document(&uri) {
            self.client.publish_diagnostics(file, Vec::new(), None).await;
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let position = params.text_document_position_params;
        Ok(self
            .session
            .with_document(&position.text_document.uri, |doc, analysis| {
                hover::hover(doc, analysis?, position.position)
            })
            .flatten())
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let position = params.text_document_position_params;
        Ok(self
            .session
            .with_document(&position.text_document.uri, |doc, analysis| {
                definition::definition(doc, analysis?, position.position)
            })
            .flatten()
            .map(GotoDefinitionResponse::Scalar))
    }

    async fn goto_type_definition(
        &self,
        params: GotoTypeDefinitionParams,
    ) -> Result<Option<GotoTypeDefinitionResponse>> {
        let position = params.text_document_position_params;
        Ok(self
            .session
            .with_document(&position.text_document.uri, |doc, analysis| {
                definition::type_definition(doc, analysis?, position.position)
            })
            .flatten()
            .map(GotoTypeDefinitionResponse::Scalar))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position;
        Ok(self
            .session
            .with_document(&position.text_document.uri, |doc, analysis| {
                completion::completion(doc, analysis, position.position)
            })
            .map(CompletionResponse::Array))
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> Result<Option<SignatureHelp>> {
        let position = params.text_document_position_params;
        Ok(self
            .session
            .with_document(&position.text_document.uri, |doc, analysis| {
                signature::signature_help(doc, analysis?, position.position)
            })
            .flatten())
    }
}
