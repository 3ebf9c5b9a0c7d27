use crate::XtcLanguageServer;
use crate::util::to_lsp_range;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use xtc_api::HighlightKind;

pub async fn highlight(
    server: &XtcLanguageServer,
    params: DocumentHighlightParams,
) -> Result<Option<Vec<DocumentHighlight>>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };

    let highlights: Vec<DocumentHighlight> = adapter
        .document_highlights(uri.as_str(), position.line as usize, position.character as usize)
        .into_iter()
        .map(|h| DocumentHighlight {
            range: to_lsp_range(h.range),
            kind: Some(highlight_kind(h.kind)),
        })
        .collect();

    if highlights.is_empty() {
        Ok(None)
    } else {
        Ok(Some(highlights))
    }
}

fn highlight_kind(kind: HighlightKind) -> DocumentHighlightKind {
    match kind {
        HighlightKind::Text => DocumentHighlightKind::TEXT,
        HighlightKind::Read => DocumentHighlightKind::READ,
        HighlightKind::Write => DocumentHighlightKind::WRITE,
    }
}
