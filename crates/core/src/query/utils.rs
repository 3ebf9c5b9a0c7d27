use crate::error::{CoreError, Result};
use std::collections::HashMap;
use xtc_api::SymbolInfo;
use xtc_syntax::{Language, Query, SyntaxNode};

/// Compiles a query from its `.scm` source.
pub fn load_query(language: &Language, scm: &str) -> Result<Query> {
    Ok(Query::new(language, scm)?)
}

/// Gets the index of a capture name in a query.
pub fn get_capture_index(query: &Query, name: &str) -> Result<u32> {
    query
        .capture_index_for_name(name)
        .ok_or_else(|| CoreError::MissingCapture(name.to_string()))
}

/// A symbol together with the node it was extracted from, used while nesting.
pub struct RawSymbol<'t> {
    pub symbol: SymbolInfo,
    pub node: SyntaxNode<'t>,
}

/// Nests flat symbols into an outline using the tree's parent links: each symbol
/// becomes a child of the nearest enclosing node that is itself a symbol.
/// Input order is kept among siblings.
pub fn build_symbol_hierarchy(raw_symbols: Vec<RawSymbol<'_>>) -> Vec<SymbolInfo> {
    let index_by_node: HashMap<&SyntaxNode<'_>, usize> = raw_symbols
        .iter()
        .enumerate()
        .map(|(i, raw)| (&raw.node, i))
        .collect();

    let parents: Vec<Option<usize>> = raw_symbols
        .iter()
        .map(|raw| {
            raw.node
                .ancestors()
                .find_map(|ancestor| index_by_node.get(&ancestor).copied())
        })
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); raw_symbols.len()];
    let mut roots = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    let mut slots: Vec<Option<SymbolInfo>> = raw_symbols.into_iter().map(|r| Some(r.symbol)).collect();

    fn build(idx: usize, slots: &mut [Option<SymbolInfo>], children: &[Vec<usize>]) -> Option<SymbolInfo> {
        let mut symbol = slots[idx].take()?;
        symbol.children = children[idx]
            .iter()
            .filter_map(|&c| build(c, slots, children))
            .collect();
        Some(symbol)
    }

    roots
        .into_iter()
        .filter_map(|root| build(root, &mut slots, &children))
        .collect()
}

/// Defines a struct of capture indices with a `new` that resolves every capture
/// name against a compiled query, failing on the first one that is absent.
#[macro_export]
macro_rules! decl_indices {
    ($name:ident, { $($field:ident => $capture:expr),+ $(,)? }) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            $(pub $field: u32,)+
        }

        impl $name {
            pub fn new(query: &$crate::syntax::Query) -> $crate::error::Result<Self> {
                Ok(Self {
                    $($field: $crate::query::utils::get_capture_index(query, $capture)?,)+
                })
            }
        }
    };
}
