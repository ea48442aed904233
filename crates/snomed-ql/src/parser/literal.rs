//! Literal assembly: identifiers, integers, decimals, booleans and strings.
//!
//! Literals may not contain whitespace, so consecutive digit tokens only form
//! one literal when their spans touch.

use super::Parser;
use crate::ast::{Decimal, NonNegativeInteger};
use crate::error::{QlError, QlResult};
use crate::token::{Span, TokenKind};
use crate::SctId;

/// Minimum number of digits in a SNOMED CT identifier.
const MIN_IDENTIFIER_DIGITS: usize = 6;

/// A number written after `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Numeric {
    Integer(i64),
    Decimal(Decimal),
}

/// Adjacent digit tokens.
struct DigitRun {
    digits: String,
    span: Span,
}

impl<'t, 'src> Parser<'t, 'src> {
    fn digit_run(&mut self) -> QlResult<DigitRun> {
        if !self.stream.peek().kind.is_digit() {
            return Err(self.unexpected(&[TokenKind::Zero, TokenKind::DigitNonZero]));
        }
        let first = self.stream.advance();
        let mut digits = String::from(first.text);
        let mut span = first.span;

        loop {
            let next = self.stream.peek();
            if !next.kind.is_digit() || !span.touches(next.span) {
                break;
            }
            self.stream.advance();
            digits.push_str(next.text);
            span.end = next.span.end;
        }
        Ok(DigitRun { digits, span })
    }

    /// `nonzero digit{4} digit+`
    pub(crate) fn snomed_identifier(&mut self) -> QlResult<SctId> {
        let run = self.digit_run()?;
        let invalid = |reason: &str| QlError::InvalidLiteral {
            literal: run.digits.clone(),
            reason: reason.to_string(),
            position: run.span.start,
        };

        if run.digits.starts_with('0') {
            return Err(invalid("identifier must not start with 0"));
        }
        if run.digits.len() < MIN_IDENTIFIER_DIGITS {
            return Err(invalid("identifier must have at least 6 digits"));
        }
        run.digits
            .parse()
            .map_err(|_| invalid("identifier does not fit in 64 bits"))
    }

    /// `0 | nonzero digit*`
    pub(crate) fn non_negative_integer(&mut self) -> QlResult<NonNegativeInteger> {
        let run = self.digit_run()?;
        check_leading_zero(&run.digits, run.span.start)?;
        Ok(NonNegativeInteger::new(run.digits))
    }

    /// Scans `sign? nni ('.' digit*)?`, classifying it as Integer or Decimal.
    ///
    /// A `.` touching the integer part turns the literal into a decimal; the
    /// fractional part may be empty.
    pub(crate) fn numeric_literal(&mut self) -> QlResult<Numeric> {
        let start = self.stream.peek();
        let sign = match start.kind {
            TokenKind::Plus | TokenKind::Dash => {
                self.stream.advance();
                let next = self.stream.peek();
                if next.kind.is_digit() && !start.span.touches(next.span) {
                    return Err(QlError::InvalidLiteral {
                        literal: start.text.to_string(),
                        reason: "sign must be directly followed by digits".to_string(),
                        position: start.span.start,
                    });
                }
                start.text
            }
            _ => "",
        };

        let integer = self.digit_run()?;
        let position = if sign.is_empty() {
            integer.span.start
        } else {
            start.span.start
        };
        check_leading_zero(&integer.digits, integer.span.start)?;

        let dot = self.stream.peek();
        if dot.kind == TokenKind::Dot && integer.span.touches(dot.span) {
            self.stream.advance();
            let mut text = format!("{}{}.", sign, integer.digits);
            let next = self.stream.peek();
            if next.kind.is_digit() && dot.span.touches(next.span) {
                text.push_str(&self.digit_run()?.digits);
            }
            return Ok(Numeric::Decimal(Decimal::new(text)));
        }

        let text = format!("{}{}", sign, integer.digits);
        text.parse()
            .map(Numeric::Integer)
            .map_err(|_| QlError::InvalidLiteral {
                literal: text.clone(),
                reason: "integer does not fit in 64 bits".to_string(),
                position,
            })
    }

    pub(crate) fn boolean(&mut self) -> QlResult<bool> {
        match self.stream.peek().kind {
            TokenKind::True => {
                self.stream.advance();
                Ok(true)
            }
            TokenKind::False => {
                self.stream.advance();
                Ok(false)
            }
            _ => Err(self.unexpected(&[TokenKind::True, TokenKind::False])),
        }
    }

    /// A quoted string with escapes resolved.
    pub(crate) fn string_literal(&mut self) -> QlResult<String> {
        let token = self.expect(TokenKind::String)?;
        unescape(token.text, token.span.start)
    }
}

fn check_leading_zero(digits: &str, position: usize) -> QlResult<()> {
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(QlError::InvalidLiteral {
            literal: digits.to_string(),
            reason: "leading zeros are not allowed".to_string(),
            position,
        });
    }
    Ok(())
}

/// Text between the pipes of a `|term|`, verbatim.
pub(crate) fn term_text(raw: &str) -> String {
    raw.strip_prefix('|')
        .and_then(|inner| inner.strip_suffix('|'))
        .unwrap_or(raw)
        .to_string()
}

/// Strips the quotes from a string token and resolves backslash escapes.
pub(crate) fn unescape(raw: &str, position: usize) -> QlResult<String> {
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
    let illegal = |reason: &str| QlError::InvalidLiteral {
        literal: raw.to_string(),
        reason: reason.to_string(),
        position,
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return Err(illegal("incomplete \\u escape"));
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| illegal("invalid \\u escape"))?
            }
            Some(other) => return Err(illegal(&format!("illegal escape `\\{}`", other))),
            None => return Err(illegal("dangling backslash")),
        };
        out.push(escaped);
    }
    Ok(out)
}
