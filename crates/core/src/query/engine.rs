use super::symbols::{self, build_symbol, symbol_for_node};
use super::utils::{RawSymbol, build_symbol_hierarchy, load_query};
use crate::error::Result;
use crate::queries::calls::{CALLS_SCM, CallIndices};
use crate::queries::declarations::{DECLARATIONS_SCM, DeclarationIndices};
use crate::queries::identifiers::{IDENTIFIERS_SCM, IdentifierIndices};
use crate::queries::imports::{IMPORTS_SCM, ImportIndices};
use crate::util::{node_location, node_range};
use std::collections::HashMap;
use std::sync::Arc;
use xtc_api::{Location, Range, SymbolInfo, SymbolKind};
use xtc_syntax::{Language, Query, QueryCursor, SyntaxNode, SyntaxTree};

/// The queries compiled by [`QueryEngine::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Declarations,
    Imports,
    Identifiers,
    Calls,
}

/// Capture name to node, for one match.
pub type Captures<'t> = HashMap<String, SyntaxNode<'t>>;

/// An `import` statement: the imported path and where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    pub path: String,
    pub alias: Option<String>,
    /// The whole statement.
    pub range: Range,
    /// Just the imported path.
    pub path_range: Range,
}

impl ImportSite {
    /// Name the import binds in the file: the alias, else the last path segment.
    pub fn simple_name(&self) -> &str {
        self.alias
            .as_deref()
            .unwrap_or_else(|| self.path.rsplit('.').next().unwrap_or(&self.path))
    }
}

/// Structural fact extraction over syntax trees.
///
/// Built once per loaded grammar. Holds only compiled queries, so it is shared
/// freely between threads; every call rescans the tree it is given.
pub struct QueryEngine {
    declarations: Arc<Query>,
    declaration_indices: DeclarationIndices,
    imports: Arc<Query>,
    import_indices: ImportIndices,
    identifiers: Arc<Query>,
    identifier_indices: IdentifierIndices,
    calls: Arc<Query>,
    call_indices: CallIndices,
}

impl Clone for QueryEngine {
    fn clone(&self) -> Self {
        Self {
            declarations: Arc::clone(&self.declarations),
            declaration_indices: self.declaration_indices.clone(),
            imports: Arc::clone(&self.imports),
            import_indices: self.import_indices.clone(),
            identifiers: Arc::clone(&self.identifiers),
            identifier_indices: self.identifier_indices.clone(),
            calls: Arc::clone(&self.calls),
            call_indices: self.call_indices.clone(),
        }
    }
}

impl QueryEngine {
    pub fn new(language: &Language) -> Result<Self> {
        let declarations = load_query(language, DECLARATIONS_SCM)?;
        let declaration_indices = DeclarationIndices::new(&declarations)?;

        let imports = load_query(language, IMPORTS_SCM)?;
        let import_indices = ImportIndices::new(&imports)?;

        let identifiers = load_query(language, IDENTIFIERS_SCM)?;
        let identifier_indices = IdentifierIndices::new(&identifiers)?;

        let calls = load_query(language, CALLS_SCM)?;
        let call_indices = CallIndices::new(&calls)?;

        tracing::debug!(
            "Compiled {} declaration, {} import, {} identifier and {} call patterns",
            declarations.pattern_count(),
            imports.pattern_count(),
            identifiers.pattern_count(),
            calls.pattern_count()
        );

        Ok(Self {
            declarations: Arc::new(declarations),
            declaration_indices,
            imports: Arc::new(imports),
            import_indices,
            identifiers: Arc::new(identifiers),
            identifier_indices,
            calls: Arc::new(calls),
            call_indices,
        })
    }

    pub fn query(&self, kind: QueryKind) -> &Query {
        match kind {
            QueryKind::Declarations => &self.declarations,
            QueryKind::Imports => &self.imports,
            QueryKind::Identifiers => &self.identifiers,
            QueryKind::Calls => &self.calls,
        }
    }

    /// Runs one of the fixed queries over the whole tree. Each match becomes a map
    /// from capture name to node.
    pub fn execute<'t>(&self, kind: QueryKind, tree: &'t SyntaxTree) -> Vec<Captures<'t>> {
        let query = self.query(kind);
        let names = query.capture_names();
        let mut cursor = QueryCursor::new();
        cursor
            .matches(query, tree.root_node())
            .map(|m| {
                m.captures
                    .iter()
                    .map(|c| (names[c.index as usize].clone(), c.node.clone()))
                    .collect()
            })
            .collect()
    }

    fn raw_declarations<'t>(&self, tree: &'t SyntaxTree, uri: &str) -> Vec<RawSymbol<'t>> {
        let idx = &self.declaration_indices;
        let table = [
            (idx.module, SymbolKind::Module),
            (idx.package, SymbolKind::Package),
            (idx.class, SymbolKind::Class),
            (idx.interface, SymbolKind::Interface),
            (idx.mixin, SymbolKind::Mixin),
            (idx.service, SymbolKind::Service),
            (idx.constant, SymbolKind::Const),
            (idx.enumeration, SymbolKind::Enum),
            (idx.method, SymbolKind::Method),
            (idx.property, SymbolKind::Property),
            (idx.constructor, SymbolKind::Constructor),
        ];

        let mut cursor = QueryCursor::new();
        cursor
            .matches(&self.declarations, tree.root_node())
            .filter_map(|m| {
                let (decl, kind) = table
                    .iter()
                    .find_map(|&(index, kind)| m.node_for_capture_index(index).map(|n| (n, kind)))?;
                let name = m.node_for_capture_index(idx.name)?;
                if symbols::name_text(&name).is_empty() {
                    return None;
                }
                Some(RawSymbol {
                    symbol: build_symbol(uri, kind, &decl, &name),
                    node: decl,
                })
            })
            .collect()
    }

    /// Every named declaration in document order, flat.
    pub fn find_all_declarations(&self, tree: &SyntaxTree, uri: &str) -> Vec<SymbolInfo> {
        self.raw_declarations(tree, uri)
            .into_iter()
            .map(|raw| raw.symbol)
            .collect()
    }

    /// Declarations nested by containment, for the document outline.
    pub fn symbol_hierarchy(&self, tree: &SyntaxTree, uri: &str) -> Vec<SymbolInfo> {
        build_symbol_hierarchy(self.raw_declarations(tree, uri))
    }

    /// The declaration enclosing `(line, column)`: the node there or its nearest
    /// ancestor that declares a name. `None` inside comments, at file scope, and
    /// past the end of the document.
    pub fn find_declaration_at(
        &self,
        tree: &SyntaxTree,
        line: usize,
        column: usize,
        uri: &str,
    ) -> Option<SymbolInfo> {
        let node = tree.node_at(line, column)?;
        if node.is_comment() {
            return None;
        }
        let decl = node.ancestor_or_self(|n| symbols::declaration_name(n).is_some())?;
        symbol_for_node(uri, &decl)
    }

    /// Locations of every identifier or type name spelled exactly `name`.
    pub fn find_all_identifiers(&self, tree: &SyntaxTree, name: &str, uri: &str) -> Vec<Location> {
        self.identifier_nodes(tree, name)
            .iter()
            .map(|n| node_location(uri, n))
            .collect()
    }

    pub(crate) fn identifier_nodes<'t>(&self, tree: &'t SyntaxTree, name: &str) -> Vec<SyntaxNode<'t>> {
        let index = self.identifier_indices.identifier;
        let mut cursor = QueryCursor::new();
        cursor
            .matches(&self.identifiers, tree.root_node())
            .filter_map(|m| m.node_for_capture_index(index))
            .filter(|n| n.text() == name)
            .collect()
    }

    /// Imported paths, e.g. `ecstasy.collections.HashMap`.
    pub fn find_imports(&self, tree: &SyntaxTree) -> Vec<String> {
        self.import_sites(tree).into_iter().map(|site| site.path).collect()
    }

    pub fn import_sites(&self, tree: &SyntaxTree) -> Vec<ImportSite> {
        let idx = &self.import_indices;
        let mut cursor = QueryCursor::new();
        cursor
            .matches(&self.imports, tree.root_node())
            .filter_map(|m| {
                let import = m.node_for_capture_index(idx.import)?;
                let path = m.node_for_capture_index(idx.path)?;
                let text = symbols::name_text(&path);
                if text.is_empty() {
                    return None;
                }
                let alias = import
                    .child_by_field_name("alias")
                    .filter(|a| !a.is_missing())
                    .map(|a| a.text().to_string());
                Some(ImportSite {
                    path: text,
                    alias,
                    range: node_range(&import),
                    path_range: node_range(&path),
                })
            })
            .collect()
    }

    /// Names of called methods with the location of each call-site name.
    pub fn find_callees(&self, tree: &SyntaxTree, uri: &str) -> Vec<(String, Location)> {
        let index = self.call_indices.callee;
        let mut cursor = QueryCursor::new();
        cursor
            .matches(&self.calls, tree.root_node())
            .filter_map(|m| m.node_for_capture_index(index))
            .map(|callee| (callee.text().to_string(), node_location(uri, &callee)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xtc_syntax::Parser;

    const URI: &str = "file:///test.x";

    fn setup(source: &str) -> (QueryEngine, SyntaxTree) {
        let language = xtc_syntax::language().unwrap();
        let engine = QueryEngine::new(&language).unwrap();
        let tree = Parser::new(&language).parse(source);
        (engine, tree)
    }

    const CALCULATOR: &str = "module myapp {
    import ecstasy.io.Console;
    import ecstasy.collections.HashMap as Map;

    class Calculator {
        Int add(Int a, Int b) {
            return a + b;
        }
        void test() {
            Int x = add(1, 2);
            console.print(x);
        }
    }
}";

    #[test]
    fn test_module_symbol_extraction() {
        let (engine, tree) = setup("module myapp {\n}");
        let symbols = engine.find_all_declarations(&tree, URI);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "myapp");
        assert_eq!(symbols[0].kind, SymbolKind::Module);
        assert_eq!(symbols[0].location.uri, URI);
    }

    #[test]
    fn test_declarations_in_document_order() {
        let (engine, tree) = setup(CALCULATOR);
        let found: Vec<_> = engine
            .find_all_declarations(&tree, URI)
            .into_iter()
            .map(|s| (s.name, s.kind))
            .collect();
        assert_eq!(
            found,
            vec![
                ("myapp".to_string(), SymbolKind::Module),
                ("Calculator".to_string(), SymbolKind::Class),
                ("add".to_string(), SymbolKind::Method),
                ("test".to_string(), SymbolKind::Method),
            ]
        );
    }

    #[test]
    fn test_every_declaration_kind_is_recognized() {
        let (engine, tree) = setup(
            "module m {
    package p {}
    interface I {}
    mixin M into I {}
    service S {}
    const C(Int x) {}
    enum E { A, B }
    class K {
        Int size;
        construct() {}
        void run() {}
    }
}",
        );
        let kinds: Vec<_> = engine
            .find_all_declarations(&tree, URI)
            .into_iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SymbolKind::Module,
                SymbolKind::Package,
                SymbolKind::Interface,
                SymbolKind::Mixin,
                SymbolKind::Service,
                SymbolKind::Const,
                SymbolKind::Enum,
                SymbolKind::Class,
                SymbolKind::Property,
                SymbolKind::Constructor,
                SymbolKind::Method,
            ]
        );
    }

    #[test]
    fn test_unnamed_declarations_are_skipped() {
        let (engine, tree) = setup("module myapp {\n    class Person {\n    }\n    class {\n}");
        let names: Vec<_> = engine
            .find_all_declarations(&tree, URI)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["myapp", "Person"]);
    }

    #[test]
    fn test_symbol_hierarchy() {
        let (engine, tree) = setup(CALCULATOR);
        let outline = engine.symbol_hierarchy(&tree, URI);
        assert_eq!(outline.len(), 1);
        let class = &outline[0].children[0];
        assert_eq!(class.name, "Calculator");
        let methods: Vec<_> = class.children.iter().map(|c| c.qualified_name.as_str()).collect();
        assert_eq!(methods, ["myapp.Calculator.add", "myapp.Calculator.test"]);
    }

    #[test]
    fn test_execute_returns_capture_maps() {
        let (engine, tree) = setup(CALCULATOR);
        let matches = engine.execute(QueryKind::Calls, &tree);
        let callees: Vec<_> = matches.iter().map(|m| m["callee"].text()).collect();
        assert_eq!(callees, ["add", "print"]);
        assert!(matches.iter().all(|m| m["call"].kind() == "call_expression"));

        // A second run sees the same matches.
        assert_eq!(engine.execute(QueryKind::Calls, &tree).len(), 2);
    }

    #[test]
    fn test_find_declaration_at() {
        let (engine, tree) = setup("module myapp {\n    class Person {\n    }\n}");
        let symbol = engine.find_declaration_at(&tree, 1, 10, URI).unwrap();
        assert_eq!(symbol.name, "Person");
        assert_eq!(symbol.kind, SymbolKind::Class);
        assert!(engine.find_declaration_at(&tree, 9999, 0, URI).is_none());
    }

    #[test]
    fn test_find_declaration_at_walks_up_and_stops_at_comments() {
        let (engine, tree) = setup("// header\nclass A {\n    void run(Int count) {\n        count++;\n    }\n}");
        assert!(engine.find_declaration_at(&tree, 0, 4, URI).is_none());

        let in_body = engine.find_declaration_at(&tree, 3, 9, URI).unwrap();
        assert_eq!(in_body.name, "run");
        assert_eq!(in_body.kind, SymbolKind::Method);

        let param = engine.find_declaration_at(&tree, 2, 18, URI).unwrap();
        assert_eq!(param.name, "count");
        assert_eq!(param.kind, SymbolKind::Parameter);
        assert_eq!(param.type_signature.as_deref(), Some("Int count"));
    }

    #[test]
    fn test_find_declaration_at_file_scope_is_none() {
        let (engine, tree) = setup("module a {}\n\n\nmodule b {}");
        assert!(engine.find_declaration_at(&tree, 1, 0, URI).is_none());
    }

    #[test]
    fn test_find_all_identifiers_is_textual() {
        let (engine, tree) = setup(
            "class Person {\n    Person create() {\n        return new Person();\n    }\n    Int Personal;\n}",
        );
        let locations = engine.find_all_identifiers(&tree, "Person", URI);
        let starts: Vec<_> = locations.iter().map(|l| l.range.start()).collect();
        assert_eq!(
            starts,
            vec![
                xtc_api::Position::new(0, 6),
                xtc_api::Position::new(1, 4),
                xtc_api::Position::new(2, 19),
            ]
        );
        assert!(engine.find_all_identifiers(&tree, "Nobody", URI).is_empty());
    }

    #[test]
    fn test_imports() {
        let (engine, tree) = setup(CALCULATOR);
        assert_eq!(
            engine.find_imports(&tree),
            ["ecstasy.io.Console", "ecstasy.collections.HashMap"]
        );
        let sites = engine.import_sites(&tree);
        assert_eq!(sites[0].simple_name(), "Console");
        assert_eq!(sites[1].simple_name(), "Map");
        assert_eq!(sites[1].alias.as_deref(), Some("Map"));
        assert_eq!(sites[0].path_range, Range::new(1, 11, 1, 29));
        assert_eq!(sites[0].range, Range::new(1, 4, 1, 30));
    }

    #[test]
    fn test_find_callees() {
        let (engine, tree) = setup(CALCULATOR);
        let callees = engine.find_callees(&tree, URI);
        assert_eq!(callees.len(), 2);
        assert_eq!(callees[0].0, "add");
        assert_eq!(callees[0].1.range, Range::new(9, 20, 9, 23));
        assert_eq!(callees[1].0, "print");
    }
}
