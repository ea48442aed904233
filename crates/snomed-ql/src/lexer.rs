//! Lexer turning query text into classified tokens, built with nom.
//!
//! Whitespace and comments are skipped between tokens. Digits are emitted one
//! token per character so that the parser can assemble identifiers and numeric
//! literals itself and reject literals split by whitespace.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while},
    character::complete::{alpha1, anychar, char, multispace1, none_of, one_of},
    combinator::{map_opt, recognize, value},
    multi::many0_count,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::config::ParserConfig;
use crate::error::{QlError, QlResult};
use crate::token::{Span, Token, TokenKind};

/// Tokenize query text with the default configuration.
///
/// The returned vector does not contain an `Eof` token; the parser's token
/// stream supplies one when it runs past the end.
///
/// # Examples
///
/// ```rust
/// use snomed_ql::{tokenize, TokenKind};
///
/// let tokens = tokenize("<< 404684003").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::DblLt);
/// assert_eq!(tokens.len(), 10);
/// ```
pub fn tokenize(input: &str) -> QlResult<Vec<Token<'_>>> {
    tokenize_with_config(input, &ParserConfig::default())
}

/// Tokenize query text.
pub fn tokenize_with_config<'src>(
    input: &'src str,
    config: &ParserConfig,
) -> QlResult<Vec<Token<'src>>> {
    let mut tokens = Vec::new();
    let mut rest = skip_trivia(input, config.comments);

    while !rest.is_empty() {
        let start = input.len() - rest.len();
        match token_kind(rest) {
            Ok((remaining, kind)) => {
                let end = input.len() - remaining.len();
                tokens.push(Token::new(kind, Span::new(start, end), &input[start..end]));
                rest = skip_trivia(remaining, config.comments);
            }
            Err(_) => return Err(lexical_error(rest, start)),
        }
    }

    tracing::trace!(count = tokens.len(), "tokenized input");
    Ok(tokens)
}

fn skip_trivia(input: &str, comments: bool) -> &str {
    let result = if comments {
        many0_count(alt((multispace1, line_comment, block_comment)))(input)
    } else {
        many0_count(multispace1)(input)
    };
    match result {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_till(|c| c == '\n' || c == '\r')))(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

// ============================================================================
// Token classification
// ============================================================================

fn token_kind(input: &str) -> IResult<&str, TokenKind> {
    alt((literal, word, operator, punctuation))(input)
}

fn literal(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::String, quoted_string),
        value(TokenKind::TermString, term_string),
        value(TokenKind::Zero, char('0')),
        value(TokenKind::DigitNonZero, one_of("123456789")),
    ))(input)
}

fn word(input: &str) -> IResult<&str, TokenKind> {
    map_opt(alpha1, TokenKind::keyword)(input)
}

fn operator(input: &str) -> IResult<&str, TokenKind> {
    alt((
        // Order matters - longer matches first
        value(TokenKind::DblLt, tag("<<")),
        value(TokenKind::LtEm, tag("<!")),
        value(TokenKind::Lte, tag("<=")),
        value(TokenKind::Lt, char('<')),
        value(TokenKind::DblGt, tag(">>")),
        value(TokenKind::GtEm, tag(">!")),
        value(TokenKind::Gte, tag(">=")),
        value(TokenKind::Gt, char('>')),
        value(TokenKind::NotEqual, tag("!=")),
        value(TokenKind::Not, char('!')),
        value(TokenKind::Equal, char('=')),
    ))(input)
}

fn punctuation(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::DoubleCurlyOpen, tag("{{")),
        value(TokenKind::DoubleCurlyClose, tag("}}")),
        value(TokenKind::CurlyOpen, char('{')),
        value(TokenKind::CurlyClose, char('}')),
        value(TokenKind::RoundOpen, char('(')),
        value(TokenKind::RoundClose, char(')')),
        value(TokenKind::SquareOpen, char('[')),
        value(TokenKind::SquareClose, char(']')),
        value(TokenKind::To, tag("..")),
        value(TokenKind::Dot, char('.')),
        value(TokenKind::Comma, char(',')),
        value(TokenKind::Colon, char(':')),
        value(TokenKind::Caret, char('^')),
        value(TokenKind::Hash, char('#')),
        value(TokenKind::Wildcard, char('*')),
        value(TokenKind::Plus, char('+')),
        value(TokenKind::Dash, char('-')),
    ))(input)
}

fn escape(input: &str) -> IResult<&str, char> {
    preceded(char('\\'), anychar)(input)
}

fn quoted_string(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(delimited(
            char('"'),
            many0_count(alt((escape, none_of("\\\"")))),
            char('"'),
        )),
        recognize(delimited(
            char('\''),
            many0_count(alt((escape, none_of("\\'")))),
            char('\''),
        )),
    ))(input)
}

fn term_string(input: &str) -> IResult<&str, &str> {
    recognize(tuple((char('|'), take_while(|c| c != '|'), char('|'))))(input)
}

fn lexical_error(rest: &str, position: usize) -> QlError {
    let message = if rest.starts_with('"') || rest.starts_with('\'') {
        "unterminated string literal".to_string()
    } else if rest.starts_with('|') {
        "unterminated term".to_string()
    } else if rest.starts_with("/*") {
        "unterminated comment".to_string()
    } else if let Ok((_, word)) = alpha1::<&str, nom::error::Error<&str>>(rest) {
        format!("unknown keyword `{}`", word)
    } else {
        match rest.chars().next() {
            Some(c) => format!("unrecognised character `{}`", c),
            None => "unexpected end of input".to_string(),
        }
    };
    QlError::Lexical { position, message }
}
