use super::{Matcher, Operand, Pattern, PatternEntry, Predicate};
use crate::error::{QueryError, QueryErrorKind};
use crate::kind::{Field, SyntaxKind};
use crate::language::Language;
use regex::Regex;

pub(super) fn compile(
    language: &Language,
    source: &str,
) -> Result<(Vec<PatternEntry>, Vec<String>), QueryError> {
    let mut reader = Reader {
        language,
        source,
        offset: 0,
        captures: Vec::new(),
    };
    let mut patterns = Vec::new();
    loop {
        reader.skip_trivia();
        if reader.at_end() {
            break;
        }
        let start_byte = reader.offset;
        let mut predicates = Vec::new();
        let root = reader.pattern(&mut predicates)?;
        patterns.push(PatternEntry {
            root,
            predicates,
            start_byte,
        });
    }
    Ok((patterns, reader.captures))
}

struct Reader<'a> {
    language: &'a Language,
    source: &'a str,
    offset: usize,
    captures: Vec<String>,
}

impl Reader<'_> {
    fn rest(&self) -> &str {
        &self.source[self.offset..]
    }

    fn at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.offset += c.len_utf8();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.advance(),
                Some(';') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn error(&self, kind: QueryErrorKind, message: impl Into<String>) -> QueryError {
        let consumed = &self.source[..self.offset];
        let row = consumed.matches('\n').count();
        let column = consumed.rsplit('\n').next().map_or(0, |l| l.chars().count());
        QueryError {
            row,
            column,
            offset: self.offset,
            kind,
            message: message.into(),
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), QueryError> {
        self.skip_trivia();
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(QueryErrorKind::Syntax, format!("expected '{}'", expected)))
        }
    }

    fn identifier(&mut self) -> Result<&str, QueryError> {
        let start = self.offset;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '?' | '!'))
        {
            self.advance();
        }
        if start == self.offset {
            return Err(self.error(QueryErrorKind::Syntax, "expected an identifier"));
        }
        Ok(&self.source[start..self.offset])
    }

    fn string(&mut self) -> Result<String, QueryError> {
        self.expect_char('"')?;
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error(QueryErrorKind::Syntax, "unterminated string")),
                Some('"') => {
                    self.advance();
                    return Ok(value);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some(c) => c,
                        None => return Err(self.error(QueryErrorKind::Syntax, "unterminated string")),
                    };
                    value.push(escaped);
                    self.advance();
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn pattern(&mut self, predicates: &mut Vec<Predicate>) -> Result<Pattern, QueryError> {
        self.skip_trivia();
        let mut pattern = match self.peek() {
            Some('(') => self.node_pattern(predicates)?,
            Some('[') => {
                self.advance();
                let mut alternatives = Vec::new();
                loop {
                    self.skip_trivia();
                    match self.peek() {
                        Some(']') => {
                            self.advance();
                            break;
                        }
                        None => return Err(self.error(QueryErrorKind::Syntax, "unclosed '['")),
                        _ => alternatives.push(self.pattern(predicates)?),
                    }
                }
                if alternatives.is_empty() {
                    return Err(self.error(QueryErrorKind::Syntax, "empty alternation"));
                }
                leaf(Matcher::Alternation(alternatives))
            }
            Some('"') => {
                let text = self.string()?;
                let kind = self
                    .language
                    .id_for_node_kind(&text, false)
                    .and_then(SyntaxKind::from_id)
                    .ok_or_else(|| self.error(QueryErrorKind::NodeType, format!("\"{}\"", text)))?;
                leaf(Matcher::Anonymous(kind))
            }
            Some('_') => {
                self.advance();
                leaf(Matcher::Any)
            }
            _ => return Err(self.error(QueryErrorKind::Syntax, "expected a pattern")),
        };

        loop {
            self.skip_trivia();
            match self.peek() {
                Some('@') => {
                    self.advance();
                    let name = self.identifier()?.to_string();
                    pattern.captures.push(self.capture_id(name));
                }
                Some('*' | '+' | '?') => {
                    return Err(self.error(QueryErrorKind::Syntax, "quantifiers are not supported"));
                }
                _ => return Ok(pattern),
            }
        }
    }

    fn node_pattern(&mut self, predicates: &mut Vec<Predicate>) -> Result<Pattern, QueryError> {
        self.advance();
        self.skip_trivia();

        // `((pattern) @cap (#pred? ...))` groups one pattern with its predicates.
        if matches!(self.peek(), Some('(' | '[' | '"')) {
            let inner = self.pattern(predicates)?;
            loop {
                self.skip_trivia();
                match self.peek() {
                    Some(')') => {
                        self.advance();
                        return Ok(inner);
                    }
                    Some('(') if self.peek_second() == Some('#') => self.predicate(predicates)?,
                    _ => {
                        return Err(self.error(QueryErrorKind::Syntax, "sibling sequences are not supported"));
                    }
                }
            }
        }

        let matcher = if self.peek() == Some('_') && !self.peek_second().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance();
            Matcher::AnyNamed
        } else {
            let name = self.identifier()?.to_string();
            let kind = self
                .language
                .id_for_node_kind(&name, true)
                .and_then(SyntaxKind::from_id)
                .ok_or_else(|| self.error(QueryErrorKind::NodeType, name.clone()))?;
            Matcher::Named(kind)
        };

        let mut children = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(')') => {
                    self.advance();
                    break;
                }
                None => return Err(self.error(QueryErrorKind::Syntax, "unclosed '('")),
                Some('(') if self.peek_second() == Some('#') => self.predicate(predicates)?,
                Some(c) if c.is_ascii_alphabetic() => {
                    let name = self.identifier()?.to_string();
                    let field = Field::from_name(&name)
                        .ok_or_else(|| self.error(QueryErrorKind::Field, name.clone()))?;
                    self.expect_char(':')?;
                    let mut child = self.pattern(predicates)?;
                    child.field = Some(field);
                    children.push(child);
                }
                _ => children.push(self.pattern(predicates)?),
            }
        }

        Ok(Pattern {
            matcher,
            field: None,
            children,
            captures: Vec::new(),
        })
    }

    fn predicate(&mut self, predicates: &mut Vec<Predicate>) -> Result<(), QueryError> {
        self.advance();
        self.advance();
        let name = self.identifier()?.to_string();
        let mut args = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(')') => {
                    self.advance();
                    break;
                }
                Some('@') => {
                    self.advance();
                    let capture = self.identifier()?.to_string();
                    let id = self
                        .existing_capture(&capture)
                        .ok_or_else(|| self.error(QueryErrorKind::Capture, capture.clone()))?;
                    args.push(Operand::Capture(id));
                }
                Some('"') => args.push(Operand::Literal(self.string()?)),
                _ => return Err(self.error(QueryErrorKind::Predicate, format!("bad argument to #{}", name))),
            }
        }

        let invalid = |reader: &Self| reader.error(QueryErrorKind::Predicate, format!("#{}", name));
        let (first, rest) = match args.split_first() {
            Some((Operand::Capture(id), rest)) => (*id, rest),
            _ => return Err(invalid(self)),
        };
        let predicate = match (name.as_str(), rest) {
            ("eq?" | "not-eq?", [operand]) => Predicate::Eq {
                capture: first,
                operand: operand.clone(),
                negated: name == "not-eq?",
            },
            ("match?" | "not-match?", [Operand::Literal(pattern)]) => {
                let regex = Regex::new(pattern).map_err(|e| {
                    self.error(QueryErrorKind::Predicate, format!("invalid regex: {}", e))
                })?;
                Predicate::Match {
                    capture: first,
                    regex,
                    negated: name == "not-match?",
                }
            }
            ("any-of?", values) if !values.is_empty() => {
                let values = values
                    .iter()
                    .map(|v| match v {
                        Operand::Literal(s) => Ok(s.clone()),
                        Operand::Capture(_) => Err(invalid(self)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Predicate::AnyOf {
                    capture: first,
                    values,
                }
            }
            _ => return Err(invalid(self)),
        };
        predicates.push(predicate);
        Ok(())
    }

    fn capture_id(&mut self, name: String) -> u32 {
        if let Some(id) = self.existing_capture(&name) {
            return id;
        }
        self.captures.push(name);
        (self.captures.len() - 1) as u32
    }

    fn existing_capture(&self, name: &str) -> Option<u32> {
        self.captures.iter().position(|c| c == name).map(|i| i as u32)
    }
}

fn leaf(matcher: Matcher) -> Pattern {
    Pattern {
        matcher,
        field: None,
        children: Vec::new(),
        captures: Vec::new(),
    }
}
