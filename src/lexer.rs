// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for the Hiss scripting language.
// Converts source code text into a stream of tokens for parsing.
//
// Hiss is whitespace-significant: the lexer measures the leading
// indentation of every logical line and emits Indent/Dedent tokens that
// bound block extents, Python style. Blank lines and comment-only lines
// produce no tokens at all.
//
// Supports:
// - Keywords: print, if, elif, else, for, in, range, and, or, not, def, return
// - Identifiers, integer and float literals
// - String literals with escape sequences
// - Operators: =, ==, !=, <, <=, >, >=, +, -, *, /, %
// - Punctuation: ( ) : ,
// - Comments starting with #

use crate::errors::{HissError, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fmt;

static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["print", "if", "elif", "else", "for", "in", "range", "and", "or", "not", "def", "return"]
        .into_iter()
        .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Name(String),
    Int(i64),
    Float(f64),
    Str(String),
    Keyword(String),
    Operator(String),
    Punctuation(char),
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl TokenKind {
    /// True for the token kinds that can begin a statement.
    pub fn starts_statement(&self) -> bool {
        match self {
            TokenKind::Name(_) => true,
            TokenKind::Keyword(k) => {
                matches!(k.as_str(), "print" | "if" | "for" | "def" | "return")
            }
            _ => false,
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        matches!(self, TokenKind::Keyword(k) if k == word)
    }

    pub fn is_operator(&self, op: &str) -> bool {
        matches!(self, TokenKind::Operator(o) if o == op)
    }

    pub fn is_punctuation(&self, ch: char) -> bool {
        matches!(self, TokenKind::Punctuation(c) if *c == ch)
    }

    /// True for the six comparison operators.
    pub fn is_comparison_operator(&self) -> bool {
        matches!(self, TokenKind::Operator(o)
            if matches!(o.as_str(), "<" | "<=" | ">" | ">=" | "==" | "!="))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Name(n) => write!(f, "NAME `{}`", n),
            TokenKind::Int(v) => write!(f, "INT `{}`", v),
            TokenKind::Float(v) => write!(f, "FLOAT `{}`", v),
            TokenKind::Str(s) => write!(f, "STRING {:?}", s),
            TokenKind::Keyword(k) => write!(f, "keyword `{}`", k),
            TokenKind::Operator(o) => write!(f, "operator `{}`", o),
            TokenKind::Punctuation(c) => write!(f, "`{}`", c),
            TokenKind::Newline => write!(f, "NEWLINE"),
            TokenKind::Indent => write!(f, "INDENT"),
            TokenKind::Dedent => write!(f, "DEDENT"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line, self.column)
    }
}

fn lex_error(message: impl Into<String>, line: usize, column: usize) -> HissError {
    HissError::Lex { message: message.into(), line, column }
}

/// Tokenizes Hiss source code into a vector of tokens.
///
/// Processes the input line by line. The leading whitespace of each
/// non-blank line drives an indentation stack that emits Indent and
/// Dedent tokens; the body of the line is then scanned character by
/// character. Every logical line ends with a Newline token, and the
/// whole stream ends with any pending Dedents followed by a single Eof.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut indents: Vec<usize> = vec![0];

    for (idx, raw_line) in source.lines().enumerate() {
        let line = idx + 1;

        // Measure indentation. Tabs are rejected so that block extents
        // never depend on a tab-width convention.
        let mut width = 0;
        for ch in raw_line.chars() {
            match ch {
                ' ' => width += 1,
                '\t' => return Err(lex_error("tab character in indentation", line, width + 1)),
                _ => break,
            }
        }

        let body: &str = &raw_line[width..];
        if body.is_empty() || body.starts_with('#') {
            continue;
        }

        let current = *indents.last().unwrap_or(&0);
        if width > current {
            indents.push(width);
            tokens.push(Token { kind: TokenKind::Indent, line, column: 1 });
        } else if width < current {
            while width < *indents.last().unwrap_or(&0) {
                indents.pop();
                tokens.push(Token { kind: TokenKind::Dedent, line, column: 1 });
            }
            if width != *indents.last().unwrap_or(&0) {
                return Err(lex_error(
                    "unindent does not match any outer indentation level",
                    line,
                    width + 1,
                ));
            }
        }

        scan_line(body, line, width, &mut tokens)?;

        let end_column = width + body.chars().count() + 1;
        tokens.push(Token { kind: TokenKind::Newline, line, column: end_column });
    }

    let last_line = source.lines().count().max(1);
    while indents.len() > 1 {
        indents.pop();
        tokens.push(Token { kind: TokenKind::Dedent, line: last_line, column: 1 });
    }
    tokens.push(Token { kind: TokenKind::Eof, line: last_line, column: 1 });

    Ok(tokens)
}

/// Scans the body of one line (indentation already consumed).
fn scan_line(body: &str, line: usize, indent: usize, tokens: &mut Vec<Token>) -> Result<()> {
    let mut chars = body.chars().peekable();
    // Column of the next unread character, 1-based within the full line.
    let mut col = indent + 1;

    while let Some(&c) = chars.peek() {
        match c {
            ' ' => {
                chars.next();
                col += 1;
            }
            '#' => break,
            '"' => {
                let start_col = col;
                chars.next();
                col += 1;
                let mut s = String::new();
                let mut closed = false;
                while let Some(ch) = chars.next() {
                    col += 1;
                    if ch == '"' {
                        closed = true;
                        break;
                    }
                    if ch == '\\' {
                        match chars.next() {
                            Some(esc) => {
                                col += 1;
                                match esc {
                                    'n' => s.push('\n'),
                                    't' => s.push('\t'),
                                    '\\' => s.push('\\'),
                                    '"' => s.push('"'),
                                    other => s.push(other),
                                }
                            }
                            None => break,
                        }
                    } else {
                        s.push(ch);
                    }
                }
                if !closed {
                    return Err(lex_error("unterminated string literal", line, start_col));
                }
                tokens.push(Token { kind: TokenKind::Str(s), line, column: start_col });
            }
            '0'..='9' => {
                let start_col = col;
                let mut num = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        num.push(ch);
                        chars.next();
                        col += 1;
                    } else {
                        break;
                    }
                }
                let kind = if num.contains('.') {
                    match num.parse::<f64>() {
                        Ok(v) => TokenKind::Float(v),
                        Err(_) => {
                            return Err(lex_error(
                                format!("malformed number literal `{}`", num),
                                line,
                                start_col,
                            ))
                        }
                    }
                } else {
                    match num.parse::<i64>() {
                        Ok(v) => TokenKind::Int(v),
                        Err(_) => {
                            return Err(lex_error(
                                format!("integer literal `{}` out of range", num),
                                line,
                                start_col,
                            ))
                        }
                    }
                };
                tokens.push(Token { kind, line, column: start_col });
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start_col = col;
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                        col += 1;
                    } else {
                        break;
                    }
                }
                let kind = if KEYWORDS.contains(ident.as_str()) {
                    TokenKind::Keyword(ident)
                } else {
                    TokenKind::Name(ident)
                };
                tokens.push(Token { kind, line, column: start_col });
            }
            '=' | '<' | '>' => {
                let start_col = col;
                let op = c;
                chars.next();
                col += 1;
                let kind = if chars.peek() == Some(&'=') {
                    chars.next();
                    col += 1;
                    TokenKind::Operator(format!("{}=", op))
                } else {
                    TokenKind::Operator(op.to_string())
                };
                tokens.push(Token { kind, line, column: start_col });
            }
            '!' => {
                let start_col = col;
                chars.next();
                col += 1;
                if chars.peek() == Some(&'=') {
                    chars.next();
                    col += 1;
                    tokens.push(Token {
                        kind: TokenKind::Operator("!=".into()),
                        line,
                        column: start_col,
                    });
                } else {
                    return Err(lex_error("expected `=` after `!`", line, start_col));
                }
            }
            '+' | '-' | '*' | '/' | '%' => {
                tokens.push(Token { kind: TokenKind::Operator(c.to_string()), line, column: col });
                chars.next();
                col += 1;
            }
            '(' | ')' | ':' | ',' => {
                tokens.push(Token { kind: TokenKind::Punctuation(c), line, column: col });
                chars.next();
                col += 1;
            }
            _ => {
                return Err(lex_error(format!("unexpected character `{}`", c), line, col));
            }
        }
    }

    Ok(())
}

/// The token source consumed by the parser.
///
/// Wraps the tokenized input with a read cursor, a single-slot push-back
/// facility, and a diagnostic replay of everything handed out so far.
/// Pushing back more than the most recently returned token is a
/// programming error in a grammar production, not a runtime condition,
/// so `push_back` panics rather than reporting failure.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    can_push_back: bool,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream { tokens, pos: 0, can_push_back: false }
    }

    /// Returns the next token, consuming it. Once the end of input is
    /// reached the final Eof token is returned indefinitely.
    pub fn next(&mut self) -> Token {
        if self.pos < self.tokens.len() {
            let tok = self.tokens[self.pos].clone();
            self.pos += 1;
            self.can_push_back = true;
            tok
        } else {
            // Sticky Eof: repeated reads past the end are allowed and
            // push_back becomes a no-op there.
            self.can_push_back = false;
            self.tokens
                .last()
                .cloned()
                .unwrap_or(Token { kind: TokenKind::Eof, line: 1, column: 1 })
        }
    }

    /// Restores the most recently returned token for one subsequent
    /// `next` call. Panics on double push-back.
    pub fn push_back(&mut self) {
        assert!(
            self.can_push_back || self.pos >= self.tokens.len(),
            "TokenStream: push_back without a preceding next"
        );
        if self.can_push_back {
            self.pos -= 1;
            self.can_push_back = false;
        }
    }

    /// Every token returned so far, for postmortem diagnostics.
    pub fn history(&self) -> &[Token] {
        &self.tokens[..self.pos]
    }
}
