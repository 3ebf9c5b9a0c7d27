//! Structural editing requests: folding, selection, links, rename, formatting.

use crate::XtcLanguageServer;
use crate::util::{from_lsp_position, from_lsp_range, to_lsp_range};
use std::collections::HashMap;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use xtc_api as api;

pub async fn folding_range(
    server: &XtcLanguageServer,
    params: FoldingRangeParams,
) -> Result<Option<Vec<FoldingRange>>> {
    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };
    let ranges = adapter
        .folding_ranges(params.text_document.uri.as_str())
        .into_iter()
        .map(to_folding_range)
        .collect();
    Ok(Some(ranges))
}

pub async fn selection_range(
    server: &XtcLanguageServer,
    params: SelectionRangeParams,
) -> Result<Option<Vec<SelectionRange>>> {
    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };
    let positions: Vec<api::Position> = params.positions.into_iter().map(from_lsp_position).collect();
    let ranges = adapter
        .selection_ranges(params.text_document.uri.as_str(), &positions)
        .into_iter()
        .map(to_selection_range)
        .collect();
    Ok(Some(ranges))
}

pub async fn document_link(
    server: &XtcLanguageServer,
    params: DocumentLinkParams,
) -> Result<Option<Vec<DocumentLink>>> {
    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };
    let links = adapter
        .document_links(params.text_document.uri.as_str())
        .into_iter()
        .map(|link| DocumentLink {
            range: to_lsp_range(link.range),
            target: link.target.and_then(|t| Url::parse(&t).ok()),
            tooltip: link.tooltip,
            data: None,
        })
        .collect();
    Ok(Some(links))
}

pub async fn prepare_rename(
    server: &XtcLanguageServer,
    params: TextDocumentPositionParams,
) -> Result<Option<PrepareRenameResponse>> {
    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };
    let position = params.position;
    Ok(adapter
        .prepare_rename(
            params.text_document.uri.as_str(),
            position.line as usize,
            position.character as usize,
        )
        .map(|r| PrepareRenameResponse::RangeWithPlaceholder {
            range: to_lsp_range(r.range),
            placeholder: r.placeholder,
        }))
}

pub async fn rename(server: &XtcLanguageServer, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    let Some(adapter) = server.adapter().await else {
        return Ok(None);
    };
    let edit = adapter.rename(
        uri.as_str(),
        position.line as usize,
        position.character as usize,
        &params.new_name,
    );
    tracing::debug!("rename {} to '{}' -> {}", uri, params.new_name, edit.is_some());
    Ok(edit.map(to_workspace_edit))
}

pub async fn formatting(
    server: &XtcLanguageServer,
    params: DocumentFormattingParams,
) -> Result<Option<Vec<TextEdit>>> {
    let uri = params.text_document.uri;
    let (Some(adapter), Some(content)) = (server.adapter().await, server.content(&uri)) else {
        return Ok(None);
    };
    let edits = adapter.format_document(uri.as_str(), &content, &to_formatting_options(&params.options));
    Ok(Some(edits.into_iter().map(to_text_edit).collect()))
}

pub async fn range_formatting(
    server: &XtcLanguageServer,
    params: DocumentRangeFormattingParams,
) -> Result<Option<Vec<TextEdit>>> {
    let uri = params.text_document.uri;
    let (Some(adapter), Some(content)) = (server.adapter().await, server.content(&uri)) else {
        return Ok(None);
    };
    let edits = adapter.format_range(
        uri.as_str(),
        &content,
        from_lsp_range(params.range),
        &to_formatting_options(&params.options),
    );
    Ok(Some(edits.into_iter().map(to_text_edit).collect()))
}

fn to_folding_range(range: api::FoldingRange) -> FoldingRange {
    FoldingRange {
        start_line: range.start_line as u32,
        end_line: range.end_line as u32,
        kind: range.kind.map(|k| match k {
            api::FoldingKind::Comment => FoldingRangeKind::Comment,
            api::FoldingKind::Imports => FoldingRangeKind::Imports,
            api::FoldingKind::Region => FoldingRangeKind::Region,
        }),
        ..Default::default()
    }
}

fn to_selection_range(range: api::SelectionRange) -> SelectionRange {
    SelectionRange {
        range: to_lsp_range(range.range),
        parent: range.parent.map(|p| Box::new(to_selection_range(*p))),
    }
}

fn to_text_edit(edit: api::TextEdit) -> TextEdit {
    TextEdit::new(to_lsp_range(edit.range), edit.new_text)
}

fn to_workspace_edit(edit: api::WorkspaceEdit) -> WorkspaceEdit {
    let changes: HashMap<Url, Vec<TextEdit>> = edit
        .changes
        .into_iter()
        .filter_map(|(uri, edits)| {
            let uri = Url::parse(&uri).ok()?;
            Some((uri, edits.into_iter().map(to_text_edit).collect()))
        })
        .collect();
    WorkspaceEdit::new(changes)
}

fn to_formatting_options(options: &FormattingOptions) -> api::FormattingOptions {
    api::FormattingOptions {
        tab_size: options.tab_size,
        insert_spaces: options.insert_spaces,
        trim_trailing_whitespace: options.trim_trailing_whitespace.unwrap_or(false),
        insert_final_newline: options.insert_final_newline.unwrap_or(false),
    }
}
