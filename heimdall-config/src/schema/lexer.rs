//! Lexical pass over legacy declaration source.
//!
//! Splits the text into tokens and pairs up delimiters. Braces must balance
//! (they define blocks); brackets and parentheses are matched leniently
//! because they only ever appear inside declaration values. String literals
//! and comments are single tokens, so delimiters inside them are inert.

use crate::error::{ParseError, ParseErrorKind};

/// Delimiter families tracked by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delim {
    Brace,
    Bracket,
    Paren,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifier or number-ish run: `[A-Za-z0-9_$]+`.
    Word,
    /// Quoted literal; `terminated` is false when the line ended first.
    Str { terminated: bool },
    /// `//` or `/* */` comment.
    Comment,
    Colon,
    Semicolon,
    Open(Delim),
    Close(Delim),
    Newline,
    /// Any other single character.
    Punct(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// One-based line of `start`.
    pub line: usize,
}

/// Token stream plus delimiter pairing.
#[derive(Debug)]
pub(crate) struct Lexed<'a> {
    pub source: &'a str,
    pub tokens: Vec<Token>,
    /// For each `Open` token, the index of its matching `Close`, if any.
    matches: Vec<Option<usize>>,
}

impl<'a> Lexed<'a> {
    pub fn text(&self, token: &Token) -> &'a str {
        &self.source[token.start..token.end]
    }

    pub fn matching_close(&self, open: usize) -> Option<usize> {
        self.matches.get(open).copied().flatten()
    }

    /// Comment body with the `//` or `/* */` markers stripped.
    pub fn comment_text(&self, token: &Token) -> &'a str {
        let raw = self.text(token);
        let body = raw
            .strip_prefix("//")
            .or_else(|| {
                raw.strip_prefix("/*")
                    .map(|rest| rest.strip_suffix("*/").unwrap_or(rest))
            })
            .unwrap_or(raw);
        body.trim()
    }
}

/// Tokenizes `source` and pairs delimiters.
///
/// # Errors
///
/// Returns a [`ParseError`] for an unclosed `{` or a stray `}`.
pub(crate) fn lex(source: &str) -> Result<Lexed<'_>, ParseError> {
    let tokens = tokenize(source);
    let matches = pair_delimiters(&tokens)?;
    Ok(Lexed {
        source,
        tokens,
        matches,
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    let mut line = 1;

    while let Some((start, c)) = chars.next() {
        let token_line = line;
        let kind = match c {
            '\n' => {
                line += 1;
                TokenKind::Newline
            }
            c if c.is_whitespace() => continue,
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                while chars.next_if(|&(_, c)| c != '\n').is_some() {}
                TokenKind::Comment
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut previous = '\0';
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                    }
                    if previous == '*' && c == '/' {
                        break;
                    }
                    previous = c;
                }
                TokenKind::Comment
            }
            '"' | '\'' | '`' => {
                let quote = c;
                let mut terminated = false;
                let mut escaped = false;
                while let Some(&(_, next)) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == quote {
                        terminated = true;
                        break;
                    }
                }
                TokenKind::Str { terminated }
            }
            c if is_word_char(c) => {
                while chars.next_if(|&(_, c)| is_word_char(c)).is_some() {}
                TokenKind::Word
            }
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '{' => TokenKind::Open(Delim::Brace),
            '}' => TokenKind::Close(Delim::Brace),
            '[' => TokenKind::Open(Delim::Bracket),
            ']' => TokenKind::Close(Delim::Bracket),
            '(' => TokenKind::Open(Delim::Paren),
            ')' => TokenKind::Close(Delim::Paren),
            other => TokenKind::Punct(other),
        };

        let end = chars.peek().map_or(source.len(), |&(i, _)| i);
        tokens.push(Token {
            kind,
            start,
            end,
            line: token_line,
        });
    }

    tokens
}

fn pair_delimiters(tokens: &[Token]) -> Result<Vec<Option<usize>>, ParseError> {
    let mut matches = vec![None; tokens.len()];
    let mut braces: Vec<usize> = Vec::new();
    // Brackets and parens opened inside the current brace level.
    let mut groups: Vec<Vec<usize>> = vec![Vec::new()];

    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Open(Delim::Brace) => {
                braces.push(index);
                groups.push(Vec::new());
            }
            TokenKind::Close(Delim::Brace) => {
                let open = braces
                    .pop()
                    .ok_or_else(|| ParseError::new(ParseErrorKind::UnexpectedClose, token.line))?;
                matches[open] = Some(index);
                groups.pop();
            }
            TokenKind::Open(_) => {
                if let Some(level) = groups.last_mut() {
                    level.push(index);
                }
            }
            TokenKind::Close(delim) => {
                let Some(level) = groups.last_mut() else {
                    continue;
                };
                let found = level
                    .iter()
                    .rposition(|&open| tokens[open].kind == TokenKind::Open(delim));
                if let Some(position) = found {
                    let open = level[position];
                    level.truncate(position);
                    matches[open] = Some(index);
                }
            }
            _ => {}
        }
    }

    match braces.first() {
        Some(&open) => Err(ParseError::new(
            ParseErrorKind::UnterminatedBlock,
            tokens[open].line,
        )),
        None => Ok(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("property int height: 30"),
            vec![
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Colon,
                TokenKind::Word,
            ]
        );
    }

    #[test]
    fn test_braces_inside_strings_are_inert() {
        let lexed = lex(r#"QtObject { property string s: "{ not a block" }"#).unwrap();
        let open = lexed
            .tokens
            .iter()
            .position(|t| t.kind == TokenKind::Open(Delim::Brace))
            .unwrap();
        let close = lexed.matching_close(open).unwrap();
        assert_eq!(lexed.tokens[close].kind, TokenKind::Close(Delim::Brace));
        assert_eq!(close, lexed.tokens.len() - 1);
    }

    #[test]
    fn test_braces_inside_comments_are_inert() {
        assert!(lex("QtObject { // {{{\n}").is_ok());
        assert!(lex("QtObject { /* } */ }").is_ok());
    }

    #[test]
    fn test_unterminated_block_reports_opening_line() {
        let err = lex("QtObject {\n  property int x: 1\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedBlock);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_stray_close_brace() {
        let err = lex("property int x: 1\n}\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedClose);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let lexed = lex("property string s: \"oops\nproperty int x: 1").unwrap();
        let string = lexed
            .tokens
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Str { .. }))
            .unwrap();
        assert_eq!(string.kind, TokenKind::Str { terminated: false });
        assert!(lexed.tokens.iter().any(|t| t.line == 2));
    }

    #[test]
    fn test_brackets_match_across_lines() {
        let lexed = lex("property list<string> apps: [\n  \"a\",\n  \"b\"\n]").unwrap();
        let open = lexed
            .tokens
            .iter()
            .position(|t| t.kind == TokenKind::Open(Delim::Bracket))
            .unwrap();
        let close = lexed.matching_close(open).unwrap();
        assert_eq!(lexed.tokens[close].line, 4);
    }

    #[test]
    fn test_unmatched_bracket_is_lenient() {
        let lexed = lex("property var x: [1, 2\nproperty int y: 3").unwrap();
        let open = lexed
            .tokens
            .iter()
            .position(|t| t.kind == TokenKind::Open(Delim::Bracket))
            .unwrap();
        assert!(lexed.matching_close(open).is_none());
    }

    #[test]
    fn test_comment_text() {
        let lexed = lex("x // trailing note \n/* block */").unwrap();
        let comments: Vec<&str> = lexed
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Comment)
            .map(|t| lexed.comment_text(t))
            .collect();
        assert_eq!(comments, vec!["trailing note", "block"]);
    }
}
