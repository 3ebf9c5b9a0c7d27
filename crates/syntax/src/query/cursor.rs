use super::{Matcher, Operand, Pattern, PatternEntry, Predicate, Query};
use crate::tree::SyntaxNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCapture<'t> {
    pub node: SyntaxNode<'t>,
    pub index: u32,
}

/// One successful match of one pattern.
#[derive(Debug, Clone)]
pub struct QueryMatch<'t> {
    pub pattern_index: usize,
    pub captures: Vec<QueryCapture<'t>>,
}

impl<'t> QueryMatch<'t> {
    pub fn nodes_for_capture_index(&self, index: u32) -> impl Iterator<Item = SyntaxNode<'t>> + '_ {
        self.captures
            .iter()
            .filter(move |c| c.index == index)
            .map(|c| c.node.clone())
    }

    pub fn node_for_capture_index(&self, index: u32) -> Option<SyntaxNode<'t>> {
        self.nodes_for_capture_index(index).next()
    }
}

/// Runs queries over a tree. Holds no traversal state between calls, so every call to
/// [`QueryCursor::matches`] rescans from the given node.
#[derive(Debug, Default)]
pub struct QueryCursor {
    match_limit: Option<usize>,
}

impl QueryCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after this many matches per call.
    pub fn set_match_limit(&mut self, limit: usize) {
        self.match_limit = Some(limit);
    }

    pub fn matches<'q, 't>(&mut self, query: &'q Query, node: SyntaxNode<'t>) -> QueryMatches<'q, 't> {
        QueryMatches {
            query,
            stack: vec![node],
            current: None,
            next_pattern: 0,
            remaining: self.match_limit,
        }
    }
}

/// Pre-order walk yielding matches node by node, pattern by pattern.
pub struct QueryMatches<'q, 't> {
    query: &'q Query,
    stack: Vec<SyntaxNode<'t>>,
    current: Option<SyntaxNode<'t>>,
    next_pattern: usize,
    remaining: Option<usize>,
}

impl<'t> Iterator for QueryMatches<'_, 't> {
    type Item = QueryMatch<'t>;

    fn next(&mut self) -> Option<QueryMatch<'t>> {
        if self.remaining == Some(0) {
            return None;
        }
        loop {
            let node = match &self.current {
                Some(node) if self.next_pattern < self.query.entries().len() => node.clone(),
                _ => {
                    let node = self.stack.pop()?;
                    let start = self.stack.len();
                    self.stack.extend(node.children());
                    self.stack[start..].reverse();
                    self.current = Some(node);
                    self.next_pattern = 0;
                    continue;
                }
            };
            let pattern_index = self.next_pattern;
            self.next_pattern += 1;

            let entry = &self.query.entries()[pattern_index];
            let mut captures = Vec::new();
            if match_pattern(&entry.root, &node, &mut captures) && satisfies(entry, &captures) {
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
                return Some(QueryMatch {
                    pattern_index,
                    captures,
                });
            }
        }
    }
}

fn matches_kind(matcher: &Matcher, node: &SyntaxNode<'_>) -> bool {
    match matcher {
        Matcher::Named(kind) | Matcher::Anonymous(kind) => node.syntax_kind() == *kind && !node.is_missing(),
        Matcher::AnyNamed => node.is_named(),
        Matcher::Any => true,
        Matcher::Alternation(_) => false,
    }
}

fn match_pattern<'t>(pattern: &Pattern, node: &SyntaxNode<'t>, captures: &mut Vec<QueryCapture<'t>>) -> bool {
    let mark = captures.len();
    let matched = match &pattern.matcher {
        Matcher::Alternation(alternatives) => alternatives.iter().any(|alt| {
            let before = captures.len();
            let ok = match_pattern(alt, node, captures);
            if !ok {
                captures.truncate(before);
            }
            ok
        }),
        matcher => {
            matches_kind(matcher, node) && {
                let children: Vec<_> = node.children().collect();
                match_children(&pattern.children, 0, &children, 0, captures)
            }
        }
    };
    if !matched {
        captures.truncate(mark);
        return false;
    }
    captures.extend(pattern.captures.iter().map(|&index| QueryCapture {
        node: node.clone(),
        index,
    }));
    true
}

/// Child patterns match distinct children in order, not necessarily adjacent.
fn match_children<'t>(
    patterns: &[Pattern],
    pattern_index: usize,
    children: &[SyntaxNode<'t>],
    child_index: usize,
    captures: &mut Vec<QueryCapture<'t>>,
) -> bool {
    let Some(pattern) = patterns.get(pattern_index) else {
        return true;
    };
    for (offset, child) in children[child_index..].iter().enumerate() {
        if let Some(field) = pattern.field {
            if child.field() != Some(field) {
                continue;
            }
        }
        let mark = captures.len();
        if match_pattern(pattern, child, captures)
            && match_children(patterns, pattern_index + 1, children, child_index + offset + 1, captures)
        {
            return true;
        }
        captures.truncate(mark);
    }
    false
}

fn capture_text<'t>(captures: &[QueryCapture<'t>], index: u32) -> Option<&'t str> {
    captures.iter().find(|c| c.index == index).map(|c| c.node.text())
}

fn satisfies(entry: &PatternEntry, captures: &[QueryCapture<'_>]) -> bool {
    entry.predicates.iter().all(|predicate| match predicate {
        Predicate::Eq {
            capture,
            operand,
            negated,
        } => {
            let Some(left) = capture_text(captures, *capture) else {
                return true;
            };
            let right = match operand {
                Operand::Capture(other) => capture_text(captures, *other),
                Operand::Literal(text) => Some(text.as_str()),
            };
            (Some(left) == right) != *negated
        }
        Predicate::Match {
            capture,
            regex,
            negated,
        } => capture_text(captures, *capture).is_none_or(|text| regex.is_match(text) != *negated),
        Predicate::AnyOf { capture, values } => {
            capture_text(captures, *capture).is_none_or(|text| values.iter().any(|v| v == text))
        }
    })
}
