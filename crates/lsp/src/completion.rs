use crate::XtcLanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use xtc_api as api;

pub async fn completion(
    server: &XtcLanguageServer,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };

    let items: Vec<CompletionItem> = adapter
        .get_completions(uri.as_str(), position.line as usize, position.character as usize)
        .into_iter()
        .map(to_completion_item)
        .collect();
    tracing::debug!("completion {} -> {} items", uri, items.len());

    Ok(Some(CompletionResponse::Array(items)))
}

pub async fn signature_help(
    server: &XtcLanguageServer,
    params: SignatureHelpParams,
) -> Result<Option<SignatureHelp>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };

    Ok(adapter
        .signature_help(uri.as_str(), position.line as usize, position.character as usize)
        .map(to_signature_help))
}

fn to_completion_item(item: api::CompletionItem) -> CompletionItem {
    let kind = match item.kind {
        api::CompletionKind::Class => CompletionItemKind::CLASS,
        api::CompletionKind::Interface => CompletionItemKind::INTERFACE,
        api::CompletionKind::Method => CompletionItemKind::METHOD,
        api::CompletionKind::Property => CompletionItemKind::PROPERTY,
        api::CompletionKind::Variable => CompletionItemKind::VARIABLE,
        api::CompletionKind::Keyword => CompletionItemKind::KEYWORD,
        api::CompletionKind::Module => CompletionItemKind::MODULE,
    };
    CompletionItem {
        label: item.label,
        kind: Some(kind),
        detail: Some(item.detail),
        insert_text: Some(item.insert_text),
        ..Default::default()
    }
}

fn to_signature_help(help: api::SignatureHelp) -> SignatureHelp {
    let signatures = help
        .signatures
        .into_iter()
        .map(|sig| SignatureInformation {
            label: sig.label,
            documentation: sig.documentation.map(Documentation::String),
            parameters: Some(
                sig.parameters
                    .into_iter()
                    .map(|p| ParameterInformation {
                        label: ParameterLabel::Simple(p.label),
                        documentation: p.documentation.map(Documentation::String),
                    })
                    .collect(),
            ),
            active_parameter: None,
        })
        .collect();
    SignatureHelp {
        signatures,
        active_signature: Some(help.active_signature as u32),
        active_parameter: Some(help.active_parameter as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_item_kinds() {
        let item = to_completion_item(api::CompletionItem::new(
            "String",
            api::CompletionKind::Class,
            "built-in type",
        ));
        assert_eq!(item.kind, Some(CompletionItemKind::CLASS));
        assert_eq!(item.detail.as_deref(), Some("built-in type"));
        assert_eq!(item.insert_text.as_deref(), Some("String"));
    }

    #[test]
    fn test_signature_help_conversion() {
        let help = to_signature_help(api::SignatureHelp {
            signatures: vec![api::SignatureInfo {
                label: "add(Int a, Int b)".to_string(),
                documentation: Some("Adds.".to_string()),
                parameters: vec![
                    api::ParameterInfo {
                        label: "Int a".to_string(),
                        documentation: None,
                    },
                    api::ParameterInfo {
                        label: "Int b".to_string(),
                        documentation: None,
                    },
                ],
            }],
            active_signature: 0,
            active_parameter: 1,
        });
        assert_eq!(help.active_parameter, Some(1));
        let params = help.signatures[0].parameters.as_ref().unwrap();
        assert_eq!(params.len(), 2);
        assert!(matches!(&params[1].label, ParameterLabel::Simple(l) if l == "Int b"));
    }
}
