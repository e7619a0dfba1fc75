// File: src/errors.rs
//
// Error handling and reporting for the Hiss interpreter.
// Every failure is a structured value carrying its diagnostic fields as
// data, propagated with `Result` to a single top-level boundary (the CLI
// or the REPL) that decides what to do with it. `report()` renders the
// pretty, colored form for that boundary; the plain `Display` form stays
// terse for embedding and tests.

use crate::lexer::{Token, TokenKind};
use colored::Colorize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HissError>;

/// A token kind the parser would have accepted at the point of failure.
///
/// Kept as a closed set rather than free-form text so callers can match
/// on what was expected (e.g. "did the parser want an assignment
/// operator here?") instead of grepping a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Name,
    IntLiteral,
    FloatLiteral,
    StrLiteral,
    Keyword(&'static str),
    AssignOp,
    ComparisonOp,
    OpenParen,
    CloseParen,
    Colon,
    Comma,
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expected::Name => write!(f, "NAME"),
            Expected::IntLiteral => write!(f, "INT"),
            Expected::FloatLiteral => write!(f, "FLOAT"),
            Expected::StrLiteral => write!(f, "STRING"),
            Expected::Keyword(k) => write!(f, "keyword `{}`", k),
            Expected::AssignOp => write!(f, "`=`"),
            Expected::ComparisonOp => write!(f, "comparison operator"),
            Expected::OpenParen => write!(f, "`(`"),
            Expected::CloseParen => write!(f, "`)`"),
            Expected::Colon => write!(f, "`:`"),
            Expected::Comma => write!(f, "`,`"),
            Expected::Newline => write!(f, "NEWLINE"),
            Expected::Indent => write!(f, "INDENT"),
            Expected::Dedent => write!(f, "DEDENT"),
            Expected::Eof => write!(f, "EOF"),
        }
    }
}

impl Expected {
    /// Whether the given token satisfies this expectation.
    pub fn matches(&self, kind: &TokenKind) -> bool {
        match self {
            Expected::Name => matches!(kind, TokenKind::Name(_)),
            Expected::IntLiteral => matches!(kind, TokenKind::Int(_)),
            Expected::FloatLiteral => matches!(kind, TokenKind::Float(_)),
            Expected::StrLiteral => matches!(kind, TokenKind::Str(_)),
            Expected::Keyword(k) => kind.is_keyword(k),
            Expected::AssignOp => kind.is_operator("="),
            Expected::ComparisonOp => kind.is_comparison_operator(),
            Expected::OpenParen => kind.is_punctuation('('),
            Expected::CloseParen => kind.is_punctuation(')'),
            Expected::Colon => kind.is_punctuation(':'),
            Expected::Comma => kind.is_punctuation(','),
            Expected::Newline => matches!(kind, TokenKind::Newline),
            Expected::Indent => matches!(kind, TokenKind::Indent),
            Expected::Dedent => matches!(kind, TokenKind::Dedent),
            Expected::Eof => matches!(kind, TokenKind::Eof),
        }
    }
}

/// A grammar mismatch: which production failed, what it would have
/// accepted, the offending token, and the full replay of tokens
/// consumed up to that point.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub production: &'static str,
    pub expected: Vec<Expected>,
    pub found: Token,
    pub history: Vec<Token>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "syntax error in {}: expected ", self.production)?;
        for (i, exp) in self.expected.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", exp)?;
        }
        write!(f, ", found {}", self.found)
    }
}

/// The reason a function call could not be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    UnknownFunction,
    ArityMismatch { expected: usize, got: usize },
    /// The call appeared in expression position but the function
    /// finished without returning a value.
    NoValue,
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CallFailure::UnknownFunction => write!(f, "no such function"),
            CallFailure::ArityMismatch { expected, got } => {
                write!(f, "expected {} argument(s), got {}", expected, got)
            }
            CallFailure::NoValue => write!(f, "function returned no value"),
        }
    }
}

/// Everything that can go wrong while lexing, parsing, or evaluating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HissError {
    #[error("{0}")]
    Syntax(Box<SyntaxError>),

    #[error("lex error at {line}:{column}: {message}")]
    Lex { message: String, line: usize, column: usize },

    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },

    #[error("type error: `{op}` is not defined for {operands}")]
    Type { op: String, operands: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("range() step must not be zero")]
    InvalidRangeStep,

    #[error("call to `{name}` failed: {reason}")]
    Call { name: String, reason: CallFailure },

    #[error("`return` outside of a function")]
    ReturnOutsideFunction,
}

impl From<SyntaxError> for HissError {
    fn from(err: SyntaxError) -> Self {
        HissError::Syntax(Box::new(err))
    }
}

impl HissError {
    /// Renders the colored, multi-line report shown by the CLI and the
    /// REPL. For syntax errors this includes the replay of every token
    /// consumed before the failure, since that is usually the fastest
    /// way to see where an indentation or newline went missing.
    pub fn report(&self) -> String {
        let mut out = String::new();
        match self {
            HissError::Syntax(err) => {
                out.push_str(&format!(
                    "{}: {}\n",
                    "Syntax Error".red().bold(),
                    format!("{}", err).bold()
                ));
                out.push_str(&format!(
                    "{}\n",
                    format!("  --> {}:{}", err.found.line, err.found.column).bright_blue()
                ));
                if !err.history.is_empty() {
                    out.push_str(&format!(
                        "{}\n",
                        "tokens consumed up to this point:".bright_yellow()
                    ));
                    for tok in &err.history {
                        out.push_str(&format!("   {}\n", tok));
                    }
                }
            }
            HissError::Lex { message, line, column } => {
                out.push_str(&format!("{}: {}\n", "Lex Error".red().bold(), message.bold()));
                out.push_str(&format!(
                    "{}\n",
                    format!("  --> {}:{}", line, column).bright_blue()
                ));
            }
            other => {
                out.push_str(&format!(
                    "{}: {}\n",
                    "Runtime Error".red().bold(),
                    format!("{}", other).bold()
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_matches_token_kinds() {
        assert!(Expected::AssignOp.matches(&TokenKind::Operator("=".into())));
        assert!(!Expected::AssignOp.matches(&TokenKind::Operator("==".into())));
        assert!(Expected::ComparisonOp.matches(&TokenKind::Operator("<=".into())));
        assert!(Expected::Keyword("print").matches(&TokenKind::Keyword("print".into())));
        assert!(!Expected::Keyword("print").matches(&TokenKind::Name("print_it".into())));
    }

    #[test]
    fn syntax_error_display_lists_alternatives() {
        let err = SyntaxError {
            production: "assign_stmt",
            expected: vec![Expected::AssignOp, Expected::OpenParen],
            found: Token { kind: TokenKind::Int(5), line: 1, column: 3 },
            history: vec![],
        };
        let text = format!("{}", err);
        assert!(text.contains("assign_stmt"));
        assert!(text.contains("`=` | `(`"));
        assert!(text.contains("INT `5`"));
    }
}
