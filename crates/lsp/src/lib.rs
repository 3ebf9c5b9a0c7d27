//! Editor-protocol server. A thin caller of the selected [`CompilerAdapter`]: it
//! keeps the open documents, compiles them off the dispatch loop, and converts
//! adapter results to protocol types.

pub mod capabilities;
pub mod completion;
pub mod editing;
pub mod goto;
pub mod highlight;
pub mod hover;
pub mod semantic;
pub mod symbols;
pub mod sync;
pub mod util;

use crate::util::Document;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{info, warn};
use xtc_api::CompilerAdapter;
use xtc_core::{AdapterKind, ServerConfig};

pub type AdapterBuilder = Arc<dyn Fn(AdapterKind) -> Arc<dyn CompilerAdapter> + Send + Sync>;

pub struct XtcLanguageServer {
    client: Client,
    pub adapter: Arc<RwLock<Option<Arc<dyn CompilerAdapter>>>>,
    pub adapter_builder: AdapterBuilder,
    pub config: RwLock<ServerConfig>,
    pub documents: DashMap<Url, Arc<Document>>,
    compile_locks: DashMap<Url, Arc<Mutex<()>>>,
}

impl XtcLanguageServer {
    pub fn new(client: Client, config: ServerConfig, adapter_builder: AdapterBuilder) -> Self {
        Self {
            client,
            adapter: Arc::new(RwLock::new(None)),
            adapter_builder,
            config: RwLock::new(config),
            documents: DashMap::new(),
            compile_locks: DashMap::new(),
        }
    }

    /// The backend chosen at `initialize`, if the client has initialized.
    pub async fn adapter(&self) -> Option<Arc<dyn CompilerAdapter>> {
        self.adapter.read().await.clone()
    }

    pub fn content(&self, uri: &Url) -> Option<String> {
        self.documents.get(uri).map(|d| d.content.clone())
    }

    fn compile_lock(&self, uri: &Url) -> Arc<Mutex<()>> {
        self.compile_locks
            .entry(uri.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for XtcLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let config = {
            let mut config = self.config.write().await;
            if let Some(options) = &params.initialization_options {
                match config.merge_json(options) {
                    Ok(merged) => *config = merged,
                    Err(e) => warn!("Ignoring bad initializationOptions: {}", e),
                }
            }
            config.clone()
        };

        let adapter = (self.adapter_builder)(config.adapter);
        info!(
            "Initializing for {} with backend {}",
            params
                .client_info
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("unknown client"),
            adapter.display_name()
        );
        if !adapter.health_check() {
            warn!("Backend {} failed its health check", adapter.display_name());
        }
        *self.adapter.write().await = Some(adapter);

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "xtc-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: capabilities::server_capabilities(&config),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let name = match self.adapter().await {
            Some(adapter) => adapter.display_name().to_string(),
            None => "none".to_string(),
        };
        self.client
            .log_message(MessageType::INFO, format!("XTC language server ready ({})", name))
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down with {} open documents", self.documents.len());
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        sync::did_open(self, params).await
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        sync::did_change(self, params).await
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        sync::did_save(self, params).await
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        sync::did_close(self, params).await
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        hover::hover(self, params).await
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        completion::completion(self, params).await
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> Result<Option<SignatureHelp>> {
        completion::signature_help(self, params).await
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        goto::definition(self, params).await
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        goto::references(self, params).await
    }

    async fn document_highlight(
        &self,
        params: DocumentHighlightParams,
    ) -> Result<Option<Vec<DocumentHighlight>>> {
        highlight::highlight(self, params).await
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        symbols::document_symbol(self, params).await
    }

    async fn symbol(&self, params: WorkspaceSymbolParams) -> Result<Option<Vec<SymbolInformation>>> {
        symbols::workspace_symbol(self, params).await
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        editing::folding_range(self, params).await
    }

    async fn selection_range(
        &self,
        params: SelectionRangeParams,
    ) -> Result<Option<Vec<SelectionRange>>> {
        editing::selection_range(self, params).await
    }

    async fn document_link(&self, params: DocumentLinkParams) -> Result<Option<Vec<DocumentLink>>> {
        editing::document_link(self, params).await
    }

    async fn prepare_rename(
        &self,
        params: TextDocumentPositionParams,
    ) -> Result<Option<PrepareRenameResponse>> {
        editing::prepare_rename(self, params).await
    }

    async fn rename(&self, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
        editing::rename(self, params).await
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        editing::formatting(self, params).await
    }

    async fn range_formatting(
        &self,
        params: DocumentRangeFormattingParams,
    ) -> Result<Option<Vec<TextEdit>>> {
        editing::range_formatting(self, params).await
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        semantic::semantic_tokens_full(self, params).await
    }
}

/// Serves the protocol over stdin/stdout until the client exits. The backend is
/// built by `adapter_builder` once the client's initialization options are known.
pub async fn run_server<F>(config: ServerConfig, adapter_builder: F) -> std::io::Result<()>
where
    F: Fn(AdapterKind) -> Arc<dyn CompilerAdapter> + Send + Sync + 'static,
{
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let builder: AdapterBuilder = Arc::new(adapter_builder);
    let (service, socket) = tower_lsp::LspService::new(move |client| {
        XtcLanguageServer::new(client, config.clone(), builder.clone())
    });
    tower_lsp::Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
