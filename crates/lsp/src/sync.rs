//! Full-text document sync. Every open or change replaces the stored text and
//! recompiles; diagnostics are republished in full each time.

use crate::XtcLanguageServer;
use crate::util::{Document, to_lsp_diagnostic};
use std::sync::Arc;
use std::time::Instant;
use tower_lsp::lsp_types::*;
use tracing::{debug, warn};

pub async fn did_open(server: &XtcLanguageServer, params: DidOpenTextDocumentParams) {
    let doc = params.text_document;
    server
        .documents
        .insert(doc.uri.clone(), Arc::new(Document::new(doc.text, doc.version)));
    recompile(server, doc.uri).await;
}

pub async fn did_change(server: &XtcLanguageServer, params: DidChangeTextDocumentParams) {
    let uri = params.text_document.uri;
    // Full sync: the last change carries the whole document.
    let Some(change) = params.content_changes.into_iter().last() else {
        return;
    };
    let symbols = server
        .documents
        .get(&uri)
        .map(|d| d.symbols.clone())
        .unwrap_or_default();
    server.documents.insert(
        uri.clone(),
        Arc::new(Document {
            content: change.text,
            version: params.text_document.version,
            symbols,
        }),
    );
    recompile(server, uri).await;
}

pub async fn did_save(server: &XtcLanguageServer, params: DidSaveTextDocumentParams) {
    if let Some(text) = params.text {
        let version = server.documents.get(&params.text_document.uri).map(|d| d.version).unwrap_or(0);
        server.documents.insert(
            params.text_document.uri.clone(),
            Arc::new(Document::new(text, version)),
        );
        recompile(server, params.text_document.uri).await;
    }
}

/// Forgets the document. An in-flight compile of it finishes first, so its results
/// cannot outlive the close.
pub async fn did_close(server: &XtcLanguageServer, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;
    server.documents.remove(&uri);
    let lock = server.compile_lock(&uri);
    let _guard = lock.lock().await;
    if let Some(adapter) = server.adapter().await {
        adapter.close_document(uri.as_str());
    }
    server.client.publish_diagnostics(uri.clone(), Vec::new(), None).await;
    server.compile_locks.remove(&uri);
}

/// Compiles the newest stored text of `uri` and publishes its diagnostics.
/// Compiles of one uri are serialized; a compile that finishes after a newer
/// edit arrived does not overwrite the newer outline.
pub(crate) async fn recompile(server: &XtcLanguageServer, uri: Url) {
    let Some(adapter) = server.adapter().await else {
        warn!("Ignoring {} before initialize", uri);
        return;
    };
    let lock = server.compile_lock(&uri);
    let _guard = lock.lock().await;

    let Some(doc) = server.documents.get(&uri).map(|d| d.value().clone()) else {
        return;
    };

    let started = Instant::now();
    let key = uri.to_string();
    let content = doc.content.clone();
    let compiler = adapter.clone();
    let result = match tokio::task::spawn_blocking(move || compiler.compile(&key, &content)).await {
        Ok(result) => result,
        Err(e) => {
            warn!("compile failed for {}: {}", uri, e);
            return;
        }
    };
    debug!(
        "Compiled {} v{} in {:?}: {} symbols, {} diagnostics",
        uri,
        doc.version,
        started.elapsed(),
        result.symbols.len(),
        result.diagnostics.len()
    );

    if !server.documents.contains_key(&uri) {
        debug!("{} was closed during compile; dropping its results", uri);
        adapter.close_document(uri.as_str());
        return;
    }

    let diagnostics = result.diagnostics.iter().map(to_lsp_diagnostic).collect();
    if let Some(mut entry) = server.documents.get_mut(&uri)
        && entry.version == doc.version
    {
        *entry = Arc::new(Document {
            content: doc.content.clone(),
            version: doc.version,
            symbols: result.symbols,
        });
    }
    server
        .client
        .publish_diagnostics(uri, diagnostics, Some(doc.version))
        .await;
}
