use crate::XtcLanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn semantic_tokens_full(
    server: &XtcLanguageServer,
    params: SemanticTokensParams,
) -> Result<Option<SemanticTokensResult>> {
    if !server.config.read().await.semantic_tokens {
        return Ok(None);
    }
    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };

    let Some(tokens) = adapter.semantic_tokens(params.text_document.uri.as_str()) else {
        return Ok(None);
    };
    Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
        result_id: None,
        data: to_semantic_tokens(&tokens.data),
    })))
}

/// Splits the flat stream into five-integer records. A trailing partial record is dropped.
pub fn to_semantic_tokens(data: &[u32]) -> Vec<SemanticToken> {
    data.chunks_exact(5)
        .map(|t| SemanticToken {
            delta_line: t[0],
            delta_start: t[1],
            length: t[2],
            token_type: t[3],
            token_modifiers_bitset: t[4],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_are_split_in_order() {
        let tokens = to_semantic_tokens(&[0, 6, 6, 2, 1, 1, 4, 6, 1, 0, 9]);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].delta_start, 6);
        assert_eq!(tokens[0].token_modifiers_bitset, 1);
        assert_eq!(tokens[1].delta_line, 1);
        assert_eq!(tokens[1].token_type, 1);
    }
}
