use crate::XtcLanguageServer;
use crate::util::{to_lsp_location, to_lsp_range, to_lsp_symbol_kind};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use xtc_api::SymbolInfo;

/// Outline of the last compile. Compiles on demand if the document has not
/// produced one yet.
pub async fn document_symbol(
    server: &XtcLanguageServer,
    params: DocumentSymbolParams,
) -> Result<Option<DocumentSymbolResponse>> {
    let uri = params.text_document.uri;

    let cached = server.documents.get(&uri).map(|d| d.symbols.clone());
    let symbols = match cached {
        Some(symbols) if !symbols.is_empty() => symbols,
        Some(_) => {
            let Some(adapter) = server.adapter().await else {
                return Ok(None);
            };
            let Some(content) = server.content(&uri) else {
                return Ok(None);
            };
            let key = uri.to_string();
            match tokio::task::spawn_blocking(move || adapter.compile(&key, &content)).await {
                Ok(result) => result.symbols,
                Err(e) => {
                    tracing::warn!("document_symbol compile failed for {}: {}", uri, e);
                    return Ok(None);
                }
            }
        }
        None => return Ok(None),
    };

    Ok(Some(DocumentSymbolResponse::Nested(
        symbols.iter().map(to_document_symbol).collect(),
    )))
}

pub async fn workspace_symbol(
    server: &XtcLanguageServer,
    params: WorkspaceSymbolParams,
) -> Result<Option<Vec<SymbolInformation>>> {
    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };

    let symbols: Vec<SymbolInformation> = adapter
        .workspace_symbols(&params.query)
        .iter()
        .filter_map(to_symbol_information)
        .collect();
    tracing::debug!("workspace/symbol '{}' -> {}", params.query, symbols.len());

    Ok(Some(symbols))
}

pub(crate) fn to_document_symbol(symbol: &SymbolInfo) -> DocumentSymbol {
    #[allow(deprecated)]
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: symbol.type_signature.clone(),
        kind: to_lsp_symbol_kind(symbol.kind),
        tags: None,
        deprecated: None,
        range: to_lsp_range(symbol.location.range),
        selection_range: to_lsp_range(symbol.selection_range),
        children: if symbol.children.is_empty() {
            None
        } else {
            Some(symbol.children.iter().map(to_document_symbol).collect())
        },
    }
}

fn to_symbol_information(symbol: &SymbolInfo) -> Option<SymbolInformation> {
    let container_name = symbol
        .qualified_name
        .rsplit_once('.')
        .map(|(owner, _)| owner.to_string());
    #[allow(deprecated)]
    Some(SymbolInformation {
        name: symbol.name.clone(),
        kind: to_lsp_symbol_kind(symbol.kind),
        tags: None,
        deprecated: None,
        location: to_lsp_location(&symbol.location)?,
        container_name,
    })
}
