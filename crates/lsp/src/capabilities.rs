use tower_lsp::lsp_types::*;
use xtc_core::{ServerConfig, TOKEN_MODIFIERS, TOKEN_TYPES};

pub fn semantic_tokens_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TOKEN_TYPES.iter().copied().map(SemanticTokenType::new).collect(),
        token_modifiers: TOKEN_MODIFIERS
            .iter()
            .copied()
            .map(SemanticTokenModifier::new)
            .collect(),
    }
}

pub fn server_capabilities(config: &ServerConfig) -> ServerCapabilities {
    let semantic_tokens_provider = config.semantic_tokens.then(|| {
        SemanticTokensServerCapabilities::SemanticTokensOptions(SemanticTokensOptions {
            legend: semantic_tokens_legend(),
            full: Some(SemanticTokensFullOptions::Bool(true)),
            range: Some(false),
            ..Default::default()
        })
    });

    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(vec![".".into(), ":".into(), "<".into()]),
            ..Default::default()
        }),
        signature_help_provider: Some(SignatureHelpOptions {
            trigger_characters: Some(vec!["(".into(), ",".into()]),
            ..Default::default()
        }),
        definition_provider: Some(OneOf::Left(true)),
        references_provider: Some(OneOf::Left(true)),
        document_highlight_provider: Some(OneOf::Left(true)),
        document_symbol_provider: Some(OneOf::Left(true)),
        workspace_symbol_provider: Some(OneOf::Left(true)),
        document_formatting_provider: Some(OneOf::Left(true)),
        document_range_formatting_provider: Some(OneOf::Left(true)),
        rename_provider: Some(OneOf::Right(RenameOptions {
            prepare_provider: Some(true),
            work_done_progress_options: Default::default(),
        })),
        document_link_provider: Some(DocumentLinkOptions {
            resolve_provider: Some(false),
            work_done_progress_options: Default::default(),
        }),
        folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
        selection_range_provider: Some(SelectionRangeProviderCapability::Simple(true)),
        semantic_tokens_provider,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_order_matches_encoder() {
        let legend = semantic_tokens_legend();
        assert_eq!(legend.token_types.len(), 23);
        assert_eq!(legend.token_types[13].as_str(), "method");
        assert_eq!(legend.token_modifiers[0].as_str(), "declaration");
        assert_eq!(legend.token_modifiers.len(), 10);
    }

    #[test]
    fn test_triggers_and_rename() {
        let caps = server_capabilities(&ServerConfig::default());
        let completion = caps.completion_provider.unwrap();
        assert_eq!(completion.trigger_characters.unwrap(), vec![".", ":", "<"]);
        let signature = caps.signature_help_provider.unwrap();
        assert_eq!(signature.trigger_characters.unwrap(), vec!["(", ","]);
        assert!(matches!(
            caps.rename_provider,
            Some(OneOf::Right(RenameOptions { prepare_provider: Some(true), .. }))
        ));
        assert!(caps.semantic_tokens_provider.is_some());
    }

    #[test]
    fn test_semantic_tokens_can_be_disabled() {
        let config = ServerConfig {
            semantic_tokens: false,
            ..ServerConfig::default()
        };
        assert!(server_capabilities(&config).semantic_tokens_provider.is_none());
    }
}
