use crate::XtcLanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn hover(server: &XtcLanguageServer, params: HoverParams) -> Result<Option<Hover>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };

    let text = adapter.get_hover_info(
        uri.as_str(),
        position.line as usize,
        position.character as usize,
    );
    tracing::debug!(
        "hover {}:{}:{} -> {}",
        uri,
        position.line,
        position.character,
        if text.is_some() { "found" } else { "none" }
    );

    Ok(text.map(markdown_hover))
}

fn markdown_hover(value: String) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: None,
    }
}
