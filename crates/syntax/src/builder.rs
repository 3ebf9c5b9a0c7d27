use crate::kind::{Field, HAS_ERROR_BIT, MISSING_BIT, SyntaxKind};
use crate::lexer::Token;
use crate::tree::FieldKey;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};
use std::collections::HashMap;

/// Position in the open node where a later `start_node_at` can wrap what follows.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    green: rowan::Checkpoint,
    depth: usize,
    index: usize,
}

/// What the builder remembers about an element after handing it to rowan.
#[derive(Debug, Clone, Copy)]
struct Child {
    kind: SyntaxKind,
    range: TextRange,
    field: Option<Field>,
    has_error: bool,
}

impl Child {
    fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}

struct Frame {
    kind: SyntaxKind,
    field: Option<Field>,
    green: rowan::Checkpoint,
    offset: TextSize,
    children: Vec<Child>,
}

/// Drives a rowan [`GreenNodeBuilder`] from parser callbacks.
///
/// Nodes are only handed to rowan when they close, so the raw kind can carry the
/// error flags of the finished subtree. Fields are collected into a side table keyed
/// by each child's range, kind and index in its parent.
pub(crate) struct TreeBuilder<'s> {
    text: &'s str,
    inner: GreenNodeBuilder<'static>,
    origin: rowan::Checkpoint,
    stack: Vec<Frame>,
    pending_field: Option<Field>,
    offset: TextSize,
    fields: HashMap<FieldKey, Field>,
}

impl<'s> TreeBuilder<'s> {
    pub fn new(text: &'s str) -> Self {
        let inner = GreenNodeBuilder::new();
        let origin = inner.checkpoint();
        Self {
            text,
            inner,
            origin,
            stack: Vec::new(),
            pending_field: None,
            offset: TextSize::from(0),
            fields: HashMap::new(),
        }
    }

    /// The next node or token attached to the open node takes this field.
    pub fn set_field(&mut self, field: Field) {
        self.pending_field = Some(field);
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        let field = self.pending_field.take();
        self.stack.push(Frame {
            kind,
            field,
            green: self.inner.checkpoint(),
            offset: self.offset,
            children: Vec::new(),
        });
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            green: self.inner.checkpoint(),
            depth: self.stack.len(),
            index: self.stack.last().map_or(0, |f| f.children.len()),
        }
    }

    /// Opens a node that adopts every child added since `checkpoint`. The wrapper
    /// inherits the field of the first adopted child.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        debug_assert_eq!(checkpoint.depth, self.stack.len(), "checkpoint from another node");
        let mut children = match self.stack.last_mut() {
            Some(frame) => frame.children.split_off(checkpoint.index.min(frame.children.len())),
            None => Vec::new(),
        };
        let inherited = children
            .iter_mut()
            .find(|c| !c.is_trivia())
            .and_then(|c| c.field.take());
        let field = inherited.or_else(|| self.pending_field.take());
        let offset = children.first().map_or(self.offset, |c| c.range.start());
        self.stack.push(Frame {
            kind,
            field,
            green: checkpoint.green,
            offset,
            children,
        });
    }

    /// Tags the first child of the open node with `field`.
    pub fn set_first_child_field(&mut self, field: Field) {
        if let Some(child) = self
            .stack
            .last_mut()
            .and_then(|f| f.children.iter_mut().find(|c| !c.is_trivia()))
        {
            child.field = Some(field);
        }
    }

    /// Tags the first child of kind `kind` in the open node with `field`.
    pub fn set_child_field(&mut self, kind: SyntaxKind, field: Field) {
        if let Some(child) = self
            .stack
            .last_mut()
            .and_then(|f| f.children.iter_mut().find(|c| !c.is_trivia() && c.kind == kind))
        {
            child.field = Some(field);
        }
    }

    /// Tags the most recent child of the open node with `field`.
    pub fn set_last_child_field(&mut self, field: Field) {
        if let Some(child) = self
            .stack
            .last_mut()
            .and_then(|f| f.children.iter_mut().rev().find(|c| !c.is_trivia()))
        {
            child.field = Some(field);
        }
    }

    pub fn finish_node(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let child = self.close(frame);
        self.attach(child);
    }

    pub fn token(&mut self, kind: SyntaxKind, token: &Token) {
        let field = self.pending_field.take();
        let has_error = kind == SyntaxKind::ErrorToken;
        let raw = if has_error { kind.id() | HAS_ERROR_BIT } else { kind.id() };
        let child = self.leaf(kind, raw, field, token);
        self.attach(Child { has_error, ..child });
    }

    /// Whitespace and comments attach where they appear without consuming the pending
    /// field.
    pub fn trivia(&mut self, token: &Token) {
        let child = self.leaf(token.kind, token.kind.id(), None, token);
        self.attach(child);
    }

    /// Zero-width placeholder for a node the grammar required but the text lacks.
    pub fn missing(&mut self, kind: SyntaxKind) {
        let field = self.pending_field.take();
        self.inner
            .token(rowan::SyntaxKind(kind.id() | MISSING_BIT | HAS_ERROR_BIT), "");
        self.attach(Child {
            kind,
            range: TextRange::empty(self.offset),
            field,
            has_error: true,
        });
    }

    /// Closes every open node and returns the green root with the field table.
    pub fn finish(mut self) -> (GreenNode, HashMap<FieldKey, Field>) {
        while self.stack.len() > 1 {
            self.finish_node();
        }
        let root = match self.stack.pop() {
            Some(frame) => frame,
            None => Frame {
                kind: SyntaxKind::SourceFile,
                field: None,
                green: self.origin,
                offset: TextSize::from(0),
                children: Vec::new(),
            },
        };
        self.close(root);
        (self.inner.finish(), self.fields)
    }

    fn leaf(&mut self, kind: SyntaxKind, raw: u16, field: Option<Field>, token: &Token) -> Child {
        let text = &self.text[token.start..token.end];
        debug_assert_eq!(usize::from(self.offset), token.start, "tokens must be contiguous");
        self.inner.token(rowan::SyntaxKind(raw), text);
        let range = TextRange::at(self.offset, TextSize::of(text));
        self.offset = range.end();
        Child {
            kind,
            range,
            field,
            has_error: false,
        }
    }

    fn close(&mut self, frame: Frame) -> Child {
        let mut has_error = frame.kind == SyntaxKind::Error;
        for (index, child) in frame.children.iter().enumerate() {
            has_error |= child.has_error;
            if let Some(field) = child.field {
                let key = FieldKey::new(child.range, child.kind, index);
                self.fields.insert(key, field);
            }
        }
        let raw = if has_error {
            frame.kind.id() | HAS_ERROR_BIT
        } else {
            frame.kind.id()
        };
        self.inner.start_node_at(frame.green, rowan::SyntaxKind(raw));
        self.inner.finish_node();
        Child {
            kind: frame.kind,
            range: TextRange::new(frame.offset, self.offset),
            field: frame.field,
            has_error,
        }
    }

    fn attach(&mut self, child: Child) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::KIND_MASK;
    use crate::lexer::lex;

    #[test]
    fn test_fields_and_error_flags_survive_finish() {
        let text = "x ;";
        let lexed = lex(text);
        let mut builder = TreeBuilder::new(text);
        builder.start_node(SyntaxKind::SourceFile);
        builder.set_field(Field::Name);
        builder.token(SyntaxKind::Identifier, &lexed.tokens[0]);
        builder.trivia(&lexed.trivia[0]);
        builder.token(SyntaxKind::Semicolon, &lexed.tokens[1]);
        builder.missing(SyntaxKind::RBrace);
        let (green, fields) = builder.finish();

        assert_eq!(green.kind().0 & KIND_MASK, SyntaxKind::SourceFile.id());
        assert_ne!(green.kind().0 & HAS_ERROR_BIT, 0);
        assert_eq!(green.children().count(), 4);
        let name = FieldKey::new(
            TextRange::new(TextSize::from(0), TextSize::from(1)),
            SyntaxKind::Identifier,
            0,
        );
        assert_eq!(fields.get(&name), Some(&Field::Name));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_wrapper_takes_over_the_first_child_field() {
        let text = "a+b";
        let lexed = lex(text);
        let mut builder = TreeBuilder::new(text);
        builder.start_node(SyntaxKind::SourceFile);
        let checkpoint = builder.checkpoint();
        builder.set_field(Field::Value);
        builder.token(SyntaxKind::Identifier, &lexed.tokens[0]);
        builder.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
        builder.set_first_child_field(Field::Left);
        builder.token(SyntaxKind::Plus, &lexed.tokens[1]);
        builder.token(SyntaxKind::Identifier, &lexed.tokens[2]);
        builder.set_last_child_field(Field::Right);
        builder.finish_node();
        let (_, fields) = builder.finish();

        let range = |start: u32, end: u32| TextRange::new(TextSize::from(start), TextSize::from(end));
        assert_eq!(
            fields.get(&FieldKey::new(range(0, 3), SyntaxKind::BinaryExpression, 0)),
            Some(&Field::Value)
        );
        assert_eq!(
            fields.get(&FieldKey::new(range(0, 1), SyntaxKind::Identifier, 0)),
            Some(&Field::Left)
        );
        assert_eq!(
            fields.get(&FieldKey::new(range(2, 3), SyntaxKind::Identifier, 2)),
            Some(&Field::Right)
        );
    }
}
