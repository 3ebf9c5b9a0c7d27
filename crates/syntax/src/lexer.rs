use crate::kind::SyntaxKind;
use logos::{Lexer, Logos};

/// A token as a byte span of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: SyntaxKind,
    pub start: usize,
    pub end: usize,
}

/// Significant tokens, terminated by `Eof`, and the whitespace and comments between
/// them. Together they cover every byte of the text.
pub(crate) struct Lexed {
    pub tokens: Vec<Token>,
    pub trivia: Vec<Token>,
}

/// Runs from `/*` to the first `*/`. Without one, only the opening `/*` is consumed
/// and reported as an error token.
pub(crate) fn block_comment(lex: &mut Lexer<'_, SyntaxKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

pub(crate) fn lex(text: &str) -> Lexed {
    let mut tokens = Vec::new();
    let mut trivia = Vec::new();
    let mut covered = 0;

    for (result, span) in SyntaxKind::lexer(text).spanned() {
        if span.start > covered {
            tokens.push(Token {
                kind: SyntaxKind::ErrorToken,
                start: covered,
                end: span.start,
            });
        }
        covered = span.end;
        let kind = match result {
            Ok(SyntaxKind::Comment) if is_doc_comment(&text[span.clone()]) => SyntaxKind::DocComment,
            Ok(kind) => kind,
            Err(()) => {
                // consecutive unrecognized characters become one error token
                if let Some(last) = tokens.last_mut().filter(|t| t.kind == SyntaxKind::ErrorToken) {
                    if last.end == span.start {
                        last.end = span.end;
                        continue;
                    }
                }
                SyntaxKind::ErrorToken
            }
        };
        let token = Token {
            kind,
            start: span.start,
            end: span.end,
        };
        if kind.is_trivia() {
            trivia.push(token);
        } else {
            tokens.push(token);
        }
    }

    if covered < text.len() {
        tokens.push(Token {
            kind: SyntaxKind::ErrorToken,
            start: covered,
            end: text.len(),
        });
    }
    tokens.push(Token {
        kind: SyntaxKind::Eof,
        start: text.len(),
        end: text.len(),
    });
    Lexed { tokens, trivia }
}

fn is_doc_comment(text: &str) -> bool {
    text.starts_with("/**") && text != "/**/"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        lex(text).tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_identifiers_and_punctuation() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("class Person { String name; }"),
            vec![ClassKw, Identifier, LBrace, Identifier, Identifier, Semicolon, RBrace, Eof]
        );
        assert_eq!(kinds("a >>>= b ?. c"), vec![Identifier, UshrEq, Identifier, QuestionDot, Identifier, Eof]);
        assert_eq!(kinds("classy True"), vec![Identifier, TrueKw, Eof]);
    }

    #[test]
    fn test_literals() {
        use SyntaxKind::*;
        assert_eq!(
            kinds(r#"42 0xFF 3.14 1e9 "hi\"there" $"x={x}" 'c' 1..5"#),
            vec![
                IntegerLiteral,
                IntegerLiteral,
                FloatLiteral,
                FloatLiteral,
                StringLiteral,
                TemplateStringLiteral,
                CharLiteral,
                IntegerLiteral,
                DotDot,
                IntegerLiteral,
                Eof
            ]
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        let lexed = lex("// line\n/** doc */ /* block */ /**/ x");
        let comment_kinds: Vec<_> = lexed
            .trivia
            .iter()
            .map(|t| t.kind)
            .filter(|k| *k != SyntaxKind::Whitespace)
            .collect();
        assert_eq!(
            comment_kinds,
            vec![
                SyntaxKind::Comment,
                SyntaxKind::DocComment,
                SyntaxKind::Comment,
                SyntaxKind::Comment
            ]
        );
        assert_eq!(lexed.tokens.len(), 2);
        assert_eq!(lexed.tokens[0].start, 36);
    }

    #[test]
    fn test_unterminated_string_is_error_token() {
        let lexed = lex("\"abc\nx");
        assert_eq!(lexed.tokens[0].kind, SyntaxKind::ErrorToken);
        assert_eq!(lexed.tokens[0].end, 4);
        assert_eq!(lexed.tokens[1].kind, SyntaxKind::Identifier);
    }

    #[test]
    fn test_unterminated_block_comment_is_error_token() {
        let lexed = lex("x /* note\ny");
        let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::ErrorToken,
                SyntaxKind::Identifier,
                SyntaxKind::Identifier,
                SyntaxKind::Eof
            ]
        );
        assert_eq!((lexed.tokens[1].start, lexed.tokens[1].end), (2, 4));
    }

    #[test]
    fn test_tokens_and_trivia_cover_the_text() {
        let text = "module m { \u{1F600}\u{1F600} # }\n";
        let lexed = lex(text);
        let errors: Vec<_> = lexed
            .tokens
            .iter()
            .filter(|t| t.kind == SyntaxKind::ErrorToken)
            .map(|t| &text[t.start..t.end])
            .collect();
        assert_eq!(errors, vec!["\u{1F600}\u{1F600}", "#"]);
        let mut spans: Vec<_> = lexed
            .tokens
            .iter()
            .chain(&lexed.trivia)
            .filter(|t| t.kind != SyntaxKind::Eof)
            .map(|t| (t.start, t.end))
            .collect();
        spans.sort();
        let mut offset = 0;
        for (start, end) in spans {
            assert_eq!(start, offset);
            offset = end;
        }
        assert_eq!(offset, text.len());
    }
}
