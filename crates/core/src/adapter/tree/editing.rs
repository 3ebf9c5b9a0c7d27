use super::navigation::identifier_at;
use crate::adapter::constants::is_keyword;
use crate::query::QueryEngine;
use crate::util::{is_identifier, node_range};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;
use xtc_api::{DocumentLink, FoldingKind, FoldingRange, PrepareRenameResult, TextEdit, WorkspaceEdit};
use xtc_syntax::SyntaxTree;

const FOLDABLE: &[&str] = &[
    "module_body",
    "package_body",
    "class_body",
    "enum_body",
    "block",
    "switch_statement",
    "list_literal",
    "map_literal",
];

/// Multi-line bodies and comments, plus one range per run of adjacent imports.
pub fn folding_ranges(engine: &QueryEngine, tree: &SyntaxTree) -> Vec<FoldingRange> {
    let mut ranges = Vec::new();
    let mut seen_lines = HashSet::new();

    for node in tree.root_node().descendants() {
        if node.start_line() >= node.end_line() {
            continue;
        }
        let kind = if node.is_comment() {
            Some(FoldingKind::Comment)
        } else if FOLDABLE.contains(&node.kind()) {
            None
        } else {
            continue;
        };
        if seen_lines.insert(node.start_line()) {
            ranges.push(FoldingRange {
                start_line: node.start_line(),
                end_line: node.end_line(),
                kind,
            });
        }
    }

    let mut group: Option<(usize, usize)> = None;
    let mut groups = Vec::new();
    for site in engine.import_sites(tree) {
        let (start, end) = (site.range.start_line, site.range.end_line);
        group = match group {
            Some((first, last)) if start <= last + 1 => Some((first, end)),
            Some(done) => {
                groups.push(done);
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    groups.extend(group);
    ranges.extend(
        groups
            .into_iter()
            .filter(|(first, last)| last > first)
            .map(|(start_line, end_line)| FoldingRange {
                start_line,
                end_line,
                kind: Some(FoldingKind::Imports),
            }),
    );

    ranges.sort_by_key(|r| (r.start_line, r.end_line));
    ranges
}

/// One link per imported path. Targets are left for the client to resolve.
pub fn document_links(engine: &QueryEngine, tree: &SyntaxTree) -> Vec<DocumentLink> {
    engine
        .import_sites(tree)
        .into_iter()
        .map(|site| DocumentLink {
            range: site.path_range,
            target: None,
            tooltip: Some(format!("import {}", site.path)),
        })
        .collect()
}

pub fn prepare_rename(tree: &SyntaxTree, line: usize, column: usize) -> Option<PrepareRenameResult> {
    let identifier = identifier_at(tree, line, column)?;
    Some(PrepareRenameResult {
        range: node_range(&identifier),
        placeholder: identifier.text().to_string(),
    })
}

/// Replaces every same-name identifier in the document. Names that are not valid
/// identifiers, or are keywords, are refused.
pub fn rename(
    engine: &QueryEngine,
    tree: &SyntaxTree,
    uri: &str,
    line: usize,
    column: usize,
    new_name: &str,
) -> Option<WorkspaceEdit> {
    if !is_identifier(new_name) || is_keyword(new_name) {
        warn!("Refusing rename to '{}': not a valid identifier", new_name);
        return None;
    }
    let identifier = identifier_at(tree, line, column)?;
    let edits: Vec<TextEdit> = engine
        .identifier_nodes(tree, identifier.text())
        .iter()
        .map(|n| TextEdit {
            range: node_range(n),
            new_text: new_name.to_string(),
        })
        .collect();
    if edits.is_empty() {
        return None;
    }
    Some(WorkspaceEdit {
        changes: BTreeMap::from([(uri.to_string(), edits)]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use xtc_api::Range;
    use xtc_syntax::{Parser, language};

    const URI: &str = "file:///edit.x";

    fn setup(source: &str) -> (QueryEngine, SyntaxTree) {
        let language = language().unwrap();
        (QueryEngine::new(&language).unwrap(), Parser::new(&language).parse(source))
    }

    const PERSON: &str = "module myapp {
    class Person {
        Person create() {
            return new Person();
        }
    }
}";

    #[test]
    fn test_folding_nested_declarations() {
        let source = "module myapp {
    class Outer {
        class Inner {
            void method() {
                return;
            }
        }
    }
}";
        let (engine, tree) = setup(source);
        let ranges = folding_ranges(&engine, &tree);

        let spans: Vec<_> = ranges.iter().map(|r| (r.start_line, r.end_line)).collect();
        assert_eq!(spans, [(0, 8), (1, 7), (2, 6), (3, 5)]);
        assert!(ranges.iter().all(|r| r.kind.is_none()));
    }

    #[test]
    fn test_folding_comments_and_imports() {
        let source = "module myapp {
    import a.B;
    import c.D;

    import e.F;
    /*
     * Notes
     */
    class Person {
    }
}
/* unterminated
";
        let (engine, tree) = setup(source);
        let ranges = folding_ranges(&engine, &tree);

        let comments: Vec<_> = ranges
            .iter()
            .filter(|r| r.kind == Some(FoldingKind::Comment))
            .map(|r| (r.start_line, r.end_line))
            .collect();
        assert_eq!(comments, [(5, 7), (11, 12)]);

        let imports: Vec<_> = ranges
            .iter()
            .filter(|r| r.kind == Some(FoldingKind::Imports))
            .map(|r| (r.start_line, r.end_line))
            .collect();
        assert_eq!(imports, [(1, 2)]);
    }

    #[test]
    fn test_document_links() {
        let (engine, tree) = setup("module myapp {\n    import foo.Bar;\n}");
        let links = document_links(&engine, &tree);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].range, Range::new(1, 11, 1, 18));
        assert_eq!(links[0].tooltip.as_deref(), Some("import foo.Bar"));

        let (engine, tree) = setup("module myapp {}");
        assert!(document_links(&engine, &tree).is_empty());
    }

    #[test]
    fn test_prepare_rename() {
        let (_, tree) = setup(PERSON);

        let result = prepare_rename(&tree, 1, 10).unwrap();
        assert_eq!(result.placeholder, "Person");
        assert_eq!(result.range, Range::new(1, 10, 1, 16));
        assert!(prepare_rename(&tree, 100, 0).is_none());
    }

    #[test]
    fn test_rename_all_occurrences() {
        let (engine, tree) = setup(PERSON);

        let edit = rename(&engine, &tree, URI, 1, 10, "Human").unwrap();
        let edits = &edit.changes[URI];
        assert_eq!(edits.len(), 3);
        assert!(edits.iter().all(|e| e.new_text == "Human"));
        assert_eq!(edits[2].range, Range::new(3, 23, 3, 29));
    }

    #[test]
    fn test_rename_rejects_invalid_names() {
        let (engine, tree) = setup(PERSON);
        assert!(rename(&engine, &tree, URI, 1, 10, "not valid").is_none());
        assert!(rename(&engine, &tree, URI, 1, 10, "class").is_none());
        assert!(rename(&engine, &tree, URI, 1, 10, "9lives").is_none());
    }
}
