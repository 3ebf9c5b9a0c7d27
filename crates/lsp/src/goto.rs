use crate::XtcLanguageServer;
use crate::util::to_lsp_location;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn definition(
    server: &XtcLanguageServer,
    params: GotoDefinitionParams,
) -> Result<Option<GotoDefinitionResponse>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };

    let location = adapter
        .find_definition(uri.as_str(), position.line as usize, position.character as usize)
        .and_then(|l| to_lsp_location(&l));
    tracing::debug!(
        "definition {}:{}:{} -> {:?}",
        uri,
        position.line,
        position.character,
        location.as_ref().map(|l| l.range.start)
    );

    Ok(location.map(GotoDefinitionResponse::Scalar))
}

pub async fn references(
    server: &XtcLanguageServer,
    params: ReferenceParams,
) -> Result<Option<Vec<Location>>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };

    let locations: Vec<Location> = adapter
        .find_references(
            uri.as_str(),
            position.line as usize,
            position.character as usize,
            params.context.include_declaration,
        )
        .iter()
        .filter_map(to_lsp_location)
        .collect();
    tracing::debug!("references {} -> {}", uri, locations.len());

    if locations.is_empty() {
        Ok(None)
    } else {
        Ok(Some(locations))
    }
}
