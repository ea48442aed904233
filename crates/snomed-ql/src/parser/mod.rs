//! Recursive-descent parser for QL queries and ECL expression constraints.
//!
//! The grammar is split by layer: `query` drives the filter cascade and
//! calls into `ecl` for embedded expressions, which in turn uses `refinement`
//! and `comparison`. Literal assembly lives in `literal`.
//!
//! Every binary tier is built from two combinators: `left_fold` for the
//! repeatable operators (OR, AND) and `optional_binary` for the
//! exclusion operator, which may appear at most once per nesting level.

mod comparison;
mod ecl;
mod literal;
mod query;
mod refinement;

use crate::ast::{ExpressionConstraint, Query};
use crate::config::ParserConfig;
use crate::error::{QlError, QlResult};
use crate::lexer::tokenize_with_config;
use crate::token::{Token, TokenKind};

/// Parse a query string.
///
/// # Examples
///
/// ```rust
/// use snomed_ql::{parse, Filter};
///
/// // Empty query matches everything
/// assert!(parse("").unwrap().is_empty());
///
/// // Active status combined with an embedded ECL expression
/// let query = parse("active = true AND ecl = << 404684003").unwrap();
/// assert!(matches!(query.constraint, Some(Filter::Conjunction(_, _))));
/// ```
pub fn parse(input: &str) -> QlResult<Query> {
    parse_with_config(input, &ParserConfig::default())
}

/// Parse a query string with explicit configuration.
pub fn parse_with_config(input: &str, config: &ParserConfig) -> QlResult<Query> {
    let tokens = tokenize_with_config(input, config)?;
    tracing::debug!(tokens = tokens.len(), "parsing query");

    let result = Parser::new(&tokens, config).parse_query();
    if let Err(ref error) = result {
        tracing::debug!(position = error.position(), %error, "query rejected");
    }
    result
}

/// Parse a standalone ECL expression constraint.
///
/// # Examples
///
/// ```rust
/// use snomed_ql::{parse_ecl, ExpressionConstraint};
///
/// let expr = parse_ecl("< 19829001 AND < 301867009").unwrap();
/// assert!(matches!(expr, ExpressionConstraint::And(_, _)));
/// ```
pub fn parse_ecl(input: &str) -> QlResult<ExpressionConstraint> {
    parse_ecl_with_config(input, &ParserConfig::default())
}

/// Parse a standalone ECL expression constraint with explicit configuration.
pub fn parse_ecl_with_config(
    input: &str,
    config: &ParserConfig,
) -> QlResult<ExpressionConstraint> {
    let tokens = tokenize_with_config(input, config)?;
    tracing::debug!(tokens = tokens.len(), "parsing expression constraint");

    let result = Parser::new(&tokens, config).parse_expression_constraint();
    if let Err(ref error) = result {
        tracing::debug!(position = error.position(), %error, "expression constraint rejected");
    }
    result
}

// ============================================================================
// Token stream
// ============================================================================

/// Peekable cursor over a token slice.
///
/// Reads past the end yield an `Eof` token positioned where the last token
/// ends.
#[derive(Debug, Clone)]
pub struct TokenStream<'t, 'src> {
    tokens: &'t [Token<'src>],
    pos: usize,
    eof: Token<'src>,
}

impl<'t, 'src> TokenStream<'t, 'src> {
    /// Creates a stream positioned at the first token.
    pub fn new(tokens: &'t [Token<'src>]) -> Self {
        let end = tokens.last().map_or(0, |t| t.span.end);
        Self {
            tokens,
            pos: 0,
            eof: Token::eof(end),
        }
    }

    /// The current token.
    pub fn peek(&self) -> Token<'src> {
        self.peek_nth(0)
    }

    /// The token `n` places ahead of the current one.
    pub fn peek_nth(&self, n: usize) -> Token<'src> {
        self.tokens.get(self.pos + n).copied().unwrap_or(self.eof)
    }

    /// Consumes and returns the current token.
    pub fn advance(&mut self) -> Token<'src> {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true once every token has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Tokens that start a QL filter rather than continue an ECL expression.
const QL_OWNED: &[TokenKind] = &[
    TokenKind::Active,
    TokenKind::Ecl,
    TokenKind::ModuleId,
    TokenKind::DoubleCurlyOpen,
    TokenKind::Term,
    TokenKind::Type,
    TokenKind::Regex,
    TokenKind::PreferredIn,
    TokenKind::AcceptableIn,
    TokenKind::LanguageRefSet,
    TokenKind::TypeId,
    TokenKind::Concept,
    TokenKind::Description,
];

/// Single-use parser over a token slice.
///
/// Use one instance per query; the parse methods consume the parser.
///
/// ```rust
/// use snomed_ql::{tokenize, Parser, ParserConfig};
///
/// let tokens = tokenize("active = false").unwrap();
/// let query = Parser::new(&tokens, &ParserConfig::default()).parse_query().unwrap();
/// assert!(!query.is_empty());
/// ```
#[derive(Debug)]
pub struct Parser<'t, 'src> {
    stream: TokenStream<'t, 'src>,
    max_depth: Option<usize>,
    depth: usize,
}

impl<'t, 'src> Parser<'t, 'src> {
    /// Creates a parser positioned at the first token.
    pub fn new(tokens: &'t [Token<'src>], config: &ParserConfig) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    /// Parses a complete query. Empty input yields a query without a constraint.
    pub fn parse_query(mut self) -> QlResult<Query> {
        if self.stream.at_end() {
            return Ok(Query::empty());
        }
        let filter = self.filter()?;
        self.expect_end()?;
        Ok(Query::new(filter))
    }

    /// Parses a complete ECL expression constraint.
    pub fn parse_expression_constraint(mut self) -> QlResult<ExpressionConstraint> {
        let expression = self.expression_constraint()?;
        self.expect_end()?;
        Ok(expression)
    }

    // ------------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------------

    fn check(&self, kind: TokenKind) -> bool {
        self.stream.peek().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.check(kind) {
            Some(self.stream.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> QlResult<Token<'src>> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(&[kind])),
        }
    }

    fn expect_end(&self) -> QlResult<()> {
        if self.stream.at_end() {
            Ok(())
        } else {
            Err(self.unexpected(&[TokenKind::Eof]))
        }
    }

    /// Error for the current token not matching any of `expected`.
    fn unexpected(&self, expected: &[TokenKind]) -> QlError {
        let token = self.stream.peek();
        if token.kind == TokenKind::Eof {
            QlError::PrematureEnd {
                expected: expected.to_vec(),
                position: token.span.start,
            }
        } else {
            QlError::UnexpectedToken {
                expected: expected.to_vec(),
                found: token.kind,
                position: token.span.start,
            }
        }
    }

    /// Consumes the closing delimiter matching `open`.
    fn close(&mut self, kind: TokenKind, open: Token<'src>) -> QlResult<()> {
        if self.eat(kind).is_some() {
            return Ok(());
        }
        if self.stream.at_end() {
            return Err(QlError::UnbalancedDelimiter {
                delimiter: open.kind,
                opened_at: open.span.start,
                position: self.stream.peek().span.start,
            });
        }
        Err(self.unexpected(&[kind]))
    }

    /// Consumes the current opening delimiter, runs `inner` one level deeper and
    /// then requires `close`.
    fn enclosed<T>(
        &mut self,
        close: TokenKind,
        inner: impl FnOnce(&mut Self) -> QlResult<T>,
    ) -> QlResult<T> {
        let open = self.stream.advance();
        if let Some(limit) = self.max_depth {
            if self.depth >= limit {
                return Err(QlError::NestingTooDeep {
                    limit,
                    position: open.span.start,
                });
            }
        }

        self.depth += 1;
        let result = inner(self);
        self.depth -= 1;

        let value = result?;
        self.close(close, open)?;
        Ok(value)
    }

    // ------------------------------------------------------------------------
    // Cascade combinators
    // ------------------------------------------------------------------------

    /// `operand (operator operand)*`, folded left-associatively.
    ///
    /// An operator is consumed only while `take_operator` accepts the current
    /// token.
    fn left_fold<T>(
        &mut self,
        operand: impl Fn(&mut Self) -> QlResult<T>,
        take_operator: impl Fn(&Self) -> bool,
        combine: impl Fn(T, T) -> T,
    ) -> QlResult<T> {
        let mut acc = operand(self)?;
        while take_operator(self) {
            self.stream.advance();
            let right = operand(self)?;
            acc = combine(acc, right);
        }
        Ok(acc)
    }

    /// `operand (operator operand)?`
    ///
    /// A second operator at the same level is left for the caller, which
    /// rejects it.
    fn optional_binary<T>(
        &mut self,
        operand: impl Fn(&mut Self) -> QlResult<T>,
        take_operator: impl Fn(&Self) -> bool,
        combine: impl Fn(T, T) -> T,
    ) -> QlResult<T> {
        let left = operand(self)?;
        if !take_operator(self) {
            return Ok(left);
        }
        self.stream.advance();
        let right = operand(self)?;
        Ok(combine(left, right))
    }

    /// Gate for ECL binary operators embedded in a query.
    ///
    /// The operator belongs to the ECL expression unless the token after it,
    /// ignoring opening parentheses, starts a QL filter.
    fn ecl_operator(&self, operators: &[TokenKind]) -> bool {
        let operator = self.stream.peek();
        if !operators.contains(&operator.kind) {
            return false;
        }

        let mut n = 1;
        while self.stream.peek_nth(n).kind == TokenKind::RoundOpen {
            n += 1;
        }
        let next = self.stream.peek_nth(n);
        if QL_OWNED.contains(&next.kind) {
            tracing::trace!(
                operator = %operator.kind,
                position = operator.span.start,
                "operator left to enclosing filter"
            );
            return false;
        }
        true
    }
}
