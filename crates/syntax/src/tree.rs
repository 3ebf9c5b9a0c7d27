use crate::kind::{Field, HAS_ERROR_BIT, KIND_MASK, MISSING_BIT, SyntaxKind, XtcLanguage};
use crate::language::Language;
use rowan::{GreenNode, GreenNodeData, NodeOrToken, TextRange, TextSize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

type RowanNode = rowan::SyntaxNode<XtcLanguage>;
type RowanElement = rowan::SyntaxElement<XtcLanguage>;

/// Green nodes at every multiple of this depth are kept alive by the tree, so
/// dropping a deeply nested tree never recurses further than this.
const ANCHOR_SPACING: usize = 64;

/// 0-based row and UTF-16 column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Identifies a child slot: the child's range and kind plus its index in the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FieldKey {
    range: TextRange,
    kind: SyntaxKind,
    index: u32,
}

impl FieldKey {
    pub fn new(range: TextRange, kind: SyntaxKind, index: usize) -> Self {
        Self {
            range,
            kind,
            index: index as u32,
        }
    }
}

/// Byte offsets to rows and UTF-16 columns.
#[derive(Debug)]
struct LineIndex {
    line_starts: Vec<u32>,
    /// Offsets of non-ASCII characters, with the running sum of how many more UTF-8
    /// bytes than UTF-16 units each one and its predecessors take.
    wide_offsets: Vec<u32>,
    wide_excess: Vec<u32>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut wide_offsets = Vec::new();
        let mut wide_excess = vec![0];
        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(offset as u32 + 1);
            } else if !c.is_ascii() {
                let excess = (c.len_utf8() - c.len_utf16()) as u32;
                wide_offsets.push(offset as u32);
                wide_excess.push(wide_excess[wide_excess.len() - 1] + excess);
            }
        }
        Self {
            line_starts,
            wide_offsets,
            wide_excess,
        }
    }

    /// Total excess of the wide characters before `offset`.
    fn excess_before(&self, offset: u32) -> u32 {
        self.wide_excess[self.wide_offsets.partition_point(|&o| o < offset)]
    }

    fn point(&self, offset: TextSize) -> Point {
        let offset = u32::from(offset);
        let row = self.line_starts.partition_point(|&s| s <= offset) - 1;
        let line_start = self.line_starts[row];
        let excess = self.excess_before(offset) - self.excess_before(line_start);
        Point::new(row, (offset - line_start - excess) as usize)
    }
}

/// A parsed document: the source text, its green tree and the field table.
///
/// Trees are released by consuming them with [`SyntaxTree::release`]; nodes borrow the
/// tree, so the compiler rejects any node used after its tree is gone.
pub struct SyntaxTree {
    green: GreenNode,
    anchors: Vec<GreenNode>,
    source: String,
    lines: LineIndex,
    fields: HashMap<FieldKey, Field>,
    node_count: usize,
    language: Language,
}

impl SyntaxTree {
    pub(crate) fn new(source: String, green: GreenNode, fields: HashMap<FieldKey, Field>, language: Language) -> Self {
        let (anchors, node_count) = collect_anchors(&green);
        let lines = LineIndex::new(&source);
        Self {
            green,
            anchors,
            source,
            lines,
            fields,
            node_count,
            language,
        }
    }

    pub fn root_node(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            tree: self,
            element: NodeOrToken::Node(RowanNode::new_root(self.green.clone())),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Nodes and tokens in the tree, whitespace excluded.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn has_errors(&self) -> bool {
        self.green.kind().0 & HAS_ERROR_BIT != 0
    }

    /// Smallest node containing `(line, column)`, using the inclusive containment rule.
    /// Returns `None` for positions past the end of the document.
    pub fn node_at(&self, line: usize, column: usize) -> Option<SyntaxNode<'_>> {
        let root = self.root_node();
        let point = Point::new(line, column);
        if !root.contains_point(point) {
            return None;
        }
        Some(root.descendant_for_point(point))
    }

    /// Ends the tree's lifetime.
    pub fn release(self) {
        tracing::trace!("Released syntax tree with {} nodes", self.node_count);
    }

    fn point(&self, offset: TextSize) -> Point {
        self.lines.point(offset)
    }
}

/// Clones of the green nodes at every `ANCHOR_SPACING` levels, parents before
/// children, and the number of non-whitespace elements.
fn collect_anchors(root: &GreenNode) -> (Vec<GreenNode>, usize) {
    let mut anchors = Vec::new();
    let mut count = 1;
    let mut stack: Vec<(&GreenNodeData, usize)> = vec![(&**root, 0)];
    while let Some((node, depth)) = stack.pop() {
        if depth > 0 && depth % ANCHOR_SPACING == 0 {
            anchors.push(node.to_owned());
        }
        for child in node.children() {
            match child {
                NodeOrToken::Node(child) => {
                    count += 1;
                    stack.push((child, depth + 1));
                }
                NodeOrToken::Token(token) => {
                    if token.kind().0 & KIND_MASK != SyntaxKind::Whitespace.id() {
                        count += 1;
                    }
                }
            }
        }
    }
    (anchors, count)
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("nodes", &self.node_count)
            .field("has_errors", &self.has_errors())
            .finish()
    }
}

/// A view of one node or token of a [`SyntaxTree`]. Whitespace is never exposed; every
/// other token, comments included, is a leaf node. Cheap to clone; never outlives its
/// tree.
#[derive(Clone)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    element: RowanElement,
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.element == other.element
    }
}

impl Eq for SyntaxNode<'_> {}

impl Hash for SyntaxNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.hash(state);
    }
}

impl<'t> SyntaxNode<'t> {
    fn wrap(&self, element: RowanElement) -> SyntaxNode<'t> {
        SyntaxNode {
            tree: self.tree,
            element,
        }
    }

    fn raw_kind(&self) -> u16 {
        match &self.element {
            NodeOrToken::Node(node) => node.green().kind().0,
            NodeOrToken::Token(token) => token.green().kind().0,
        }
    }

    fn range(&self) -> TextRange {
        self.element.text_range()
    }

    fn index(&self) -> usize {
        match &self.element {
            NodeOrToken::Node(node) => node.index(),
            NodeOrToken::Token(token) => token.index(),
        }
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> &'static str {
        self.syntax_kind().name()
    }

    pub fn syntax_kind(&self) -> SyntaxKind {
        SyntaxKind::from_id(self.raw_kind() & KIND_MASK).unwrap_or(SyntaxKind::Error)
    }

    pub fn kind_id(&self) -> u16 {
        self.raw_kind() & KIND_MASK
    }

    pub fn is_named(&self) -> bool {
        self.syntax_kind().is_named()
    }

    pub fn is_error(&self) -> bool {
        self.syntax_kind() == SyntaxKind::Error
    }

    pub fn is_missing(&self) -> bool {
        self.raw_kind() & MISSING_BIT != 0
    }

    /// True when this node or any descendant is an error or missing node.
    pub fn has_error(&self) -> bool {
        self.raw_kind() & HAS_ERROR_BIT != 0
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.syntax_kind(), SyntaxKind::Comment | SyntaxKind::DocComment)
    }

    pub fn start_byte(&self) -> usize {
        self.range().start().into()
    }

    pub fn end_byte(&self) -> usize {
        self.range().end().into()
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }

    pub fn start_position(&self) -> Point {
        self.tree.point(self.range().start())
    }

    pub fn end_position(&self) -> Point {
        self.tree.point(self.range().end())
    }

    pub fn start_line(&self) -> usize {
        self.start_position().row
    }

    pub fn start_column(&self) -> usize {
        self.start_position().column
    }

    pub fn end_line(&self) -> usize {
        self.end_position().row
    }

    pub fn end_column(&self) -> usize {
        self.end_position().column
    }

    pub fn text(&self) -> &'t str {
        &self.tree.source[self.byte_range()]
    }

    /// Inclusive at both boundary lines: a point right after the last character is inside.
    pub fn contains_point(&self, point: Point) -> bool {
        let (start, end) = (self.start_position(), self.end_position());
        if point.row < start.row || point.row > end.row {
            return false;
        }
        if point.row == start.row && point.column < start.column {
            return false;
        }
        if point.row == end.row && point.column > end.column {
            return false;
        }
        true
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        let parent = match &self.element {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => token.parent(),
        };
        parent.map(|p| self.wrap(NodeOrToken::Node(p)))
    }

    pub fn field(&self) -> Option<Field> {
        self.parent()?;
        let key = FieldKey::new(self.range(), self.syntax_kind(), self.index());
        self.tree.fields.get(&key).copied()
    }

    /// Name of the field this node occupies in its parent.
    pub fn field_name(&self) -> Option<&'static str> {
        self.field().map(Field::name)
    }

    pub fn child_count(&self) -> usize {
        self.children().count()
    }

    pub fn child(&self, index: usize) -> Option<SyntaxNode<'t>> {
        self.children().nth(index)
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    pub fn named_child(&self, index: usize) -> Option<SyntaxNode<'t>> {
        self.named_children().nth(index)
    }

    /// All children in source order. Each call starts a fresh iteration.
    pub fn children(&self) -> impl Iterator<Item = SyntaxNode<'t>> + use<'t> {
        let tree = self.tree;
        let elements = match &self.element {
            NodeOrToken::Node(node) => Some(node.children_with_tokens()),
            NodeOrToken::Token(_) => None,
        };
        elements
            .into_iter()
            .flatten()
            .filter(|e| e.kind() != SyntaxKind::Whitespace)
            .map(move |element| SyntaxNode { tree, element })
    }

    pub fn named_children(&self) -> impl Iterator<Item = SyntaxNode<'t>> + use<'t> {
        self.children().filter(|c| c.is_named())
    }

    pub fn child_by_field(&self, field: Field) -> Option<SyntaxNode<'t>> {
        self.children().find(|c| c.field() == Some(field))
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<SyntaxNode<'t>> {
        Field::from_name(name).and_then(|field| self.child_by_field(field))
    }

    pub fn children_by_field_name(&self, name: &str) -> impl Iterator<Item = SyntaxNode<'t>> + use<'t> {
        let field = Field::from_name(name);
        self.children()
            .filter(move |c| field.is_some() && c.field() == field)
    }

    /// First child with the given type. Linear; prefer field lookups where the grammar has them.
    pub fn child_by_type(&self, kind: &str) -> Option<SyntaxNode<'t>> {
        self.children().find(|c| c.kind() == kind)
    }

    pub fn next_sibling(&self) -> Option<SyntaxNode<'t>> {
        let mut next = self.next_element(&self.element);
        while let Some(element) = next {
            if element.kind() != SyntaxKind::Whitespace {
                return Some(self.wrap(element));
            }
            next = self.next_element(&element);
        }
        None
    }

    pub fn prev_sibling(&self) -> Option<SyntaxNode<'t>> {
        let mut prev = self.prev_element(&self.element);
        while let Some(element) = prev {
            if element.kind() != SyntaxKind::Whitespace {
                return Some(self.wrap(element));
            }
            prev = self.prev_element(&element);
        }
        None
    }

    fn next_element(&self, element: &RowanElement) -> Option<RowanElement> {
        match element {
            NodeOrToken::Node(node) => node.next_sibling_or_token(),
            NodeOrToken::Token(token) => token.next_sibling_or_token(),
        }
    }

    fn prev_element(&self, element: &RowanElement) -> Option<RowanElement> {
        match element {
            NodeOrToken::Node(node) => node.prev_sibling_or_token(),
            NodeOrToken::Token(token) => token.prev_sibling_or_token(),
        }
    }

    pub fn next_named_sibling(&self) -> Option<SyntaxNode<'t>> {
        let mut node = self.next_sibling();
        while let Some(n) = node {
            if n.is_named() {
                return Some(n);
            }
            node = n.next_sibling();
        }
        None
    }

    pub fn prev_named_sibling(&self) -> Option<SyntaxNode<'t>> {
        let mut node = self.prev_sibling();
        while let Some(n) = node {
            if n.is_named() {
                return Some(n);
            }
            node = n.prev_sibling();
        }
        None
    }

    /// Proper ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<'t>> + use<'t> {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    /// This node followed by its ancestors, nearest first.
    pub fn ancestors_and_self(&self) -> impl Iterator<Item = SyntaxNode<'t>> + use<'t> {
        std::iter::successors(Some(self.clone()), |n| n.parent())
    }

    /// Nearest node, starting with this one, accepted by `pred`.
    pub fn ancestor_or_self(&self, mut pred: impl FnMut(&SyntaxNode<'t>) -> bool) -> Option<SyntaxNode<'t>> {
        self.ancestors_and_self().find(|n| pred(n))
    }

    /// This node and all of its descendants in pre-order.
    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode<'t>> + use<'t> {
        let mut stack = vec![self.clone()];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            let start = stack.len();
            stack.extend(node.children());
            stack[start..].reverse();
            Some(node)
        })
    }

    /// Smallest descendant containing `point`; this node when no child does.
    ///
    /// When two siblings touch at `point`, named nodes win over punctuation and a node
    /// starting at `point` wins over one ending there.
    pub fn descendant_for_point(&self, point: Point) -> SyntaxNode<'t> {
        let mut node = self.clone();
        loop {
            let best = node
                .children()
                .filter(|c| c.start_byte() < c.end_byte() && c.contains_point(point))
                .max_by_key(|c| (c.is_named(), point < c.end_position()));
            match best {
                Some(child) => node = child,
                None => return node,
            }
        }
    }

    /// S-expression of the named structure, e.g. `(source_file (module_declaration ...))`.
    pub fn to_sexp(&self) -> String {
        enum Step<'t> {
            Open(SyntaxNode<'t>, bool),
            Close,
        }

        let mut out = String::new();
        let mut stack = vec![Step::Open(self.clone(), false)];
        while let Some(step) = stack.pop() {
            let (node, nested) = match step {
                Step::Close => {
                    out.push(')');
                    continue;
                }
                Step::Open(node, nested) => (node, nested),
            };
            if nested {
                out.push(' ');
                if let Some(name) = node.field_name() {
                    out.push_str(name);
                    out.push_str(": ");
                }
            }
            if node.is_missing() {
                out.push_str("(MISSING ");
                out.push_str(node.kind());
                out.push(')');
                continue;
            }
            out.push('(');
            out.push_str(node.kind());
            stack.push(Step::Close);
            let children: Vec<_> = node
                .children()
                .filter(|c| c.is_named() || c.is_missing())
                .collect();
            stack.extend(children.into_iter().rev().map(|c| Step::Open(c, true)));
        }
        out
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} - {}]",
            self.kind(),
            self.start_position(),
            self.end_position()
        )
    }
}
