use crate::language::Language;
use crate::tree::SyntaxTree;

/// Turns XTC source into a [`SyntaxTree`].
///
/// Every call is a full parse of the given text. Parsing never fails; malformed input
/// yields `ERROR` and `MISSING` nodes inside an otherwise usable tree.
#[derive(Debug, Clone)]
pub struct Parser {
    language: Language,
}

impl Parser {
    pub fn new(language: &Language) -> Self {
        Self {
            language: language.clone(),
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn parse(&self, text: &str) -> SyntaxTree {
        let (green, fields) = crate::grammar::parse(text);
        SyntaxTree::new(text.to_string(), green, fields, self.language.clone())
    }
}
