//! Declaration extraction from legacy property-declaration source.
//!
//! The extractor runs after the lexical pass has paired every brace. It walks
//! the tokens of one scope, picks out `property <type> <name>: <value>`
//! declarations and recurses into nested object blocks
//! (`property QtObject name: QtObject { ... }`). Any other brace block is
//! transparent: its declarations belong to the enclosing scope, which is how
//! the file's own root object is handled.

use std::fs;
use std::ops::Range;
use std::path::Path;

use indexmap::IndexMap;

use super::lexer::{self, Delim, Lexed, Token, TokenKind};
use crate::error::{Error, ParseError, ParseErrorKind, Result};

/// Type keyword that introduces a nested object block.
pub const OBJECT_KEYWORD: &str = "QtObject";

/// Deepest accepted nesting of object blocks.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Modifiers that may precede the `property` keyword.
const MODIFIERS: &[&str] = &["readonly", "required", "default"];

/// One raw declaration, taken verbatim from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Declared type, generic arguments included (`list<string>`).
    pub type_name: String,
    /// Property name.
    pub name: String,
    /// Value text after the colon, without a trailing `;` (may be empty).
    pub default_literal: String,
    /// Trailing `//` comment on the declaration line.
    pub comment: Option<String>,
    /// One-based source line.
    pub line: usize,
}

/// A nested object block and everything declared inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDeclaration {
    /// Property name of the block.
    pub name: String,
    /// Trailing comment on the block's opening line.
    pub comment: Option<String>,
    /// One-based source line.
    pub line: usize,
    /// Declarations inside the block, in source order.
    pub properties: DeclarationMap,
}

/// A property of a scope: either a plain declaration or a nested block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationEntry {
    /// `property <type> <name>: <value>`
    Property(Declaration),
    /// `property QtObject <name>: QtObject { ... }`
    Object(ObjectDeclaration),
}

impl DeclarationEntry {
    /// One-based line of the declaration.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Property(d) => d.line,
            Self::Object(o) => o.line,
        }
    }
}

/// Declarations of one scope keyed by name, in source order.
pub type DeclarationMap = IndexMap<String, DeclarationEntry>;

/// A declaration that was dropped while the rest of its block was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDeclaration {
    /// One-based source line.
    pub line: usize,
    /// Why the declaration was dropped.
    pub reason: String,
}

/// A repeated name that lost to an earlier declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDeclaration {
    /// The repeated property name.
    pub name: String,
    /// Line of the declaration that was kept.
    pub kept_line: usize,
    /// Line of the declaration that was ignored.
    pub ignored_line: usize,
}

/// Result of extracting one source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Top-level declarations.
    pub properties: DeclarationMap,
    /// Declarations dropped individually.
    pub skipped: Vec<SkippedDeclaration>,
    /// Names declared more than once in a scope (first one kept).
    pub duplicates: Vec<DuplicateDeclaration>,
}

/// Extracts property declarations from legacy source text.
///
/// # Examples
///
/// ```
/// use heimdall_config::schema::{DeclarationEntry, DeclarationExtractor};
///
/// let source = r#"
/// QtObject {
///     property int height: 30 // bar height
///     property QtObject workspaces: QtObject {
///         property int shown: 5
///     }
/// }
/// "#;
///
/// let extraction = DeclarationExtractor::new().extract(source).unwrap();
/// let DeclarationEntry::Property(height) = &extraction.properties["height"] else {
///     panic!("expected a plain declaration");
/// };
/// assert_eq!(height.default_literal, "30");
/// assert_eq!(height.comment.as_deref(), Some("bar height"));
/// assert!(matches!(extraction.properties["workspaces"], DeclarationEntry::Object(_)));
/// ```
#[derive(Debug, Clone)]
pub struct DeclarationExtractor {
    strict_duplicates: bool,
    max_depth: usize,
}

impl Default for DeclarationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationExtractor {
    /// Creates an extractor where the first declaration of a name wins.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strict_duplicates: false,
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Makes a repeated name in one scope a [`ParseError`].
    #[must_use]
    pub const fn with_strict_duplicates(mut self, strict: bool) -> Self {
        self.strict_duplicates = strict;
        self
    }

    /// Overrides the nesting limit for object blocks.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Extracts declarations from `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unbalanced braces, nesting beyond the
    /// limit, or (in strict mode) a duplicate name.
    pub fn extract(&self, source: &str) -> std::result::Result<Extraction, ParseError> {
        let lexed = lexer::lex(source)?;
        let mut walk = Walk {
            lexed: &lexed,
            extractor: self,
            skipped: Vec::new(),
            duplicates: Vec::new(),
        };
        let properties = walk.scope(0..lexed.tokens.len(), 0)?;
        Ok(Extraction {
            properties,
            skipped: walk.skipped,
            duplicates: walk.duplicates,
        })
    }

    /// Reads and extracts a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the file is missing, [`Error::Io`]
    /// if it cannot be read, and [`Error::Parse`] if extraction fails.
    pub fn extract_file(&self, path: &Path) -> Result<Extraction> {
        let source = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let extraction = self.extract(&source).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for skipped in &extraction.skipped {
            log::warn!(
                "{}:{}: skipped declaration: {}",
                path.display(),
                skipped.line,
                skipped.reason
            );
        }
        for duplicate in &extraction.duplicates {
            log::debug!(
                "{}:{}: '{}' already declared on line {}, ignoring",
                path.display(),
                duplicate.ignored_line,
                duplicate.name,
                duplicate.kept_line
            );
        }

        Ok(extraction)
    }
}

/// State of one extraction run.
struct Walk<'l, 'a> {
    lexed: &'l Lexed<'a>,
    extractor: &'l DeclarationExtractor,
    skipped: Vec<SkippedDeclaration>,
    duplicates: Vec<DuplicateDeclaration>,
}

/// What a `property` keyword turned out to introduce.
enum Parsed {
    Entry(DeclarationEntry),
    Skipped(SkippedDeclaration),
}

impl Walk<'_, '_> {
    fn token(&self, index: usize) -> Option<&Token> {
        self.lexed.tokens.get(index)
    }

    fn is_word(&self, index: usize, word: &str) -> bool {
        self.token(index)
            .is_some_and(|t| t.kind == TokenKind::Word && self.lexed.text(t) == word)
    }

    fn scope(
        &mut self,
        range: Range<usize>,
        depth: usize,
    ) -> std::result::Result<DeclarationMap, ParseError> {
        let mut declarations = DeclarationMap::new();
        let mut index = range.start;

        while index < range.end {
            if !self.is_word(index, "property") || !self.starts_statement(index) {
                index += 1;
                continue;
            }

            let (parsed, next) = self.property(index, range.end, depth)?;
            index = next;

            match parsed {
                Parsed::Entry(entry) => self.insert(&mut declarations, entry)?,
                Parsed::Skipped(skipped) => self.skipped.push(skipped),
            }
        }

        Ok(declarations)
    }

    /// True if the `property` keyword at `index` begins a declaration rather
    /// than appearing inside a value.
    fn starts_statement(&self, index: usize) -> bool {
        let mut cursor = index;
        while cursor > 0 {
            cursor -= 1;
            let Some(token) = self.token(cursor) else {
                return true;
            };
            match token.kind {
                TokenKind::Word if MODIFIERS.contains(&self.lexed.text(token)) => {}
                TokenKind::Newline
                | TokenKind::Semicolon
                | TokenKind::Comment
                | TokenKind::Open(Delim::Brace)
                | TokenKind::Close(Delim::Brace) => return true,
                _ => return false,
            }
        }
        true
    }

    fn insert(
        &mut self,
        declarations: &mut DeclarationMap,
        entry: DeclarationEntry,
    ) -> std::result::Result<(), ParseError> {
        let name = match &entry {
            DeclarationEntry::Property(d) => d.name.clone(),
            DeclarationEntry::Object(o) => o.name.clone(),
        };

        match declarations.get(&name) {
            None => {
                declarations.insert(name, entry);
                Ok(())
            }
            Some(_) if self.extractor.strict_duplicates => Err(ParseError::new(
                ParseErrorKind::DuplicateDeclaration { name },
                entry.line(),
            )),
            Some(kept) => {
                self.duplicates.push(DuplicateDeclaration {
                    name,
                    kept_line: kept.line(),
                    ignored_line: entry.line(),
                });
                Ok(())
            }
        }
    }

    /// Parses the declaration whose `property` keyword is at `index`.
    ///
    /// Returns what was parsed and the index to resume scanning from.
    fn property(
        &mut self,
        index: usize,
        end: usize,
        depth: usize,
    ) -> std::result::Result<(Parsed, usize), ParseError> {
        let line = self.lexed.tokens[index].line;
        let skip = |reason: &str, next: usize| {
            Ok((
                Parsed::Skipped(SkippedDeclaration {
                    line,
                    reason: reason.to_string(),
                }),
                next,
            ))
        };

        let mut cursor = index + 1;

        // Type, with optional generic arguments.
        let Some(type_token) = self.token(cursor).filter(|t| t.kind == TokenKind::Word) else {
            return skip("expected a type after 'property'", cursor);
        };
        let type_start = type_token.start;
        let mut type_end = type_token.end;
        cursor += 1;
        if self
            .token(cursor)
            .is_some_and(|t| t.kind == TokenKind::Punct('<'))
        {
            while let Some(token) = self.token(cursor).filter(|_| cursor < end) {
                if token.kind == TokenKind::Newline {
                    return skip("unterminated generic type", cursor);
                }
                cursor += 1;
                if token.kind == TokenKind::Punct('>') {
                    type_end = token.end;
                    break;
                }
            }
        }
        let type_name: String = self.lexed.source[type_start..type_end]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        // Name.
        let Some(name_token) = self
            .token(cursor)
            .filter(|t| t.kind == TokenKind::Word && cursor < end)
        else {
            return skip("expected a property name", cursor);
        };
        let name = self.lexed.text(name_token).to_string();
        cursor += 1;

        let has_colon = self
            .token(cursor)
            .is_some_and(|t| t.kind == TokenKind::Colon && cursor < end);
        if has_colon {
            cursor += 1;
        }

        if type_name == OBJECT_KEYWORD
            && self.is_word(cursor, OBJECT_KEYWORD)
            && self
                .token(cursor + 1)
                .is_some_and(|t| t.kind == TokenKind::Open(Delim::Brace))
        {
            return self.object_block(name, line, cursor + 1, depth);
        }

        let (value, comment, next, failure) = self.value(cursor, end, has_colon);
        if let Some(reason) = failure {
            return skip(&format!("'{name}': {reason}"), next);
        }

        Ok((
            Parsed::Entry(DeclarationEntry::Property(Declaration {
                type_name,
                name,
                default_literal: value,
                comment,
                line,
            })),
            next,
        ))
    }

    fn object_block(
        &mut self,
        name: String,
        line: usize,
        open: usize,
        depth: usize,
    ) -> std::result::Result<(Parsed, usize), ParseError> {
        if depth + 1 > self.extractor.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep {
                    limit: self.extractor.max_depth,
                },
                line,
            ));
        }

        let close = self
            .lexed
            .matching_close(open)
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnterminatedBlock, line))?;

        let comment = self
            .token(open + 1)
            .filter(|t| t.kind == TokenKind::Comment && t.line == line)
            .map(|t| self.lexed.comment_text(t).to_string())
            .filter(|c| !c.is_empty());

        let properties = self.scope(open + 1..close, depth + 1)?;

        Ok((
            Parsed::Entry(DeclarationEntry::Object(ObjectDeclaration {
                name,
                comment,
                line,
                properties,
            })),
            close + 1,
        ))
    }

    /// Collects value text starting at `start`.
    ///
    /// The value runs to the end of its line, or past it while a bracket,
    /// brace or parenthesis opened in the value is still open. A `;` ends it
    /// early. Returns the text, trailing comment, resume index, and a failure
    /// reason if the declaration must be dropped.
    fn value(
        &self,
        start: usize,
        end: usize,
        has_colon: bool,
    ) -> (String, Option<String>, usize, Option<String>) {
        let mut cursor = start;
        let mut span: Option<(usize, usize)> = None;
        let mut comment = None;
        let mut failure = None;

        while cursor < end {
            let token = self.lexed.tokens[cursor];
            match token.kind {
                TokenKind::Newline => break,
                TokenKind::Close(Delim::Brace) => break,
                TokenKind::Comment => {
                    comment = Some(self.lexed.comment_text(&token).to_string());
                    cursor += 1;
                    break;
                }
                TokenKind::Semicolon => {
                    cursor += 1;
                    if let Some(t) = self
                        .token(cursor)
                        .filter(|t| t.kind == TokenKind::Comment && cursor < end)
                    {
                        comment = Some(self.lexed.comment_text(t).to_string());
                        cursor += 1;
                    }
                    break;
                }
                _ if !has_colon => break,
                TokenKind::Open(_) => {
                    let close = self
                        .lexed
                        .matching_close(cursor)
                        .filter(|&close| close < end)
                        .unwrap_or(cursor);
                    let last = self.lexed.tokens[close];
                    span = Some((span.map_or(token.start, |(s, _)| s), last.end));
                    cursor = close + 1;
                }
                TokenKind::Str { terminated: false } => {
                    failure = Some("unterminated string literal".to_string());
                    span = Some((span.map_or(token.start, |(s, _)| s), token.end));
                    cursor += 1;
                }
                _ => {
                    span = Some((span.map_or(token.start, |(s, _)| s), token.end));
                    cursor += 1;
                }
            }
        }

        let text = span
            .map(|(s, e)| self.lexed.source[s..e].trim().to_string())
            .unwrap_or_default();
        let comment = comment.filter(|c| !c.is_empty());
        (text, comment, cursor, failure)
    }
}
