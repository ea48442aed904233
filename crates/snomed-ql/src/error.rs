//! Error types for query parsing.

use thiserror::Error;

use crate::token::TokenKind;

/// Errors that can occur while lexing or parsing a query.
///
/// Parsing is fail-fast: the first error aborts the parse and no partial tree
/// is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QlError {
    /// The current token does not start any alternative of the production.
    #[error("unexpected `{found}` at position {position}, expected {}", describe(.expected))]
    UnexpectedToken {
        /// Token kinds that would have been accepted.
        expected: Vec<TokenKind>,
        /// The offending token.
        found: TokenKind,
        /// Byte offset of the offending token.
        position: usize,
    },

    /// Input ended while a production still required a token.
    #[error("unexpected end of input at position {position}, expected {}", describe(.expected))]
    PrematureEnd {
        /// Token kinds that would have been accepted.
        expected: Vec<TokenKind>,
        /// Byte offset of the end of input.
        position: usize,
    },

    /// An opening delimiter was never closed.
    #[error("unclosed `{delimiter}` opened at position {opened_at}")]
    UnbalancedDelimiter {
        /// The opening delimiter.
        delimiter: TokenKind,
        /// Byte offset of the opening delimiter.
        opened_at: usize,
        /// Byte offset where the closing delimiter was required.
        position: usize,
    },

    /// A numeric or identifier literal violates its format.
    #[error("invalid literal `{literal}` at position {position}: {reason}")]
    InvalidLiteral {
        /// The literal text as written.
        literal: String,
        /// What is wrong with it.
        reason: String,
        /// Byte offset of the literal.
        position: usize,
    },

    /// The lexer could not classify the input.
    #[error("lexical error at position {position}: {message}")]
    Lexical {
        /// Byte offset of the unrecognised input.
        position: usize,
        /// Description of the problem.
        message: String,
    },

    /// Parentheses or braces nest deeper than the configured limit.
    #[error("nesting exceeds depth limit {limit} at position {position}")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
        /// Byte offset of the delimiter that crossed the limit.
        position: usize,
    },
}

impl QlError {
    /// Byte offset in the source text where the error was detected.
    pub fn position(&self) -> usize {
        match self {
            QlError::UnexpectedToken { position, .. }
            | QlError::PrematureEnd { position, .. }
            | QlError::UnbalancedDelimiter { position, .. }
            | QlError::InvalidLiteral { position, .. }
            | QlError::Lexical { position, .. }
            | QlError::NestingTooDeep { position, .. } => *position,
        }
    }
}

fn describe(expected: &[TokenKind]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => format!("`{}`", only),
        _ => {
            let kinds: Vec<String> = expected.iter().map(|k| format!("`{}`", k)).collect();
            format!("one of {}", kinds.join(", "))
        }
    }
}

/// Result type for query parsing.
pub type QlResult<T> = std::result::Result<T, QlError>;
