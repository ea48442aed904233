//! Token vocabulary shared by the lexer and the parser.

use std::fmt;

/// Byte range of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns true if `next` begins exactly where this span ends.
    pub fn touches(&self, next: Span) -> bool {
        self.end == next.start
    }
}

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Digits
    /// `0`
    Zero,
    /// `1`..`9`
    DigitNonZero,

    // Signs
    /// `+`
    Plus,
    /// `-` (sign marker, also accepted as exclusion)
    Dash,

    // Structural punctuation
    /// `(`
    RoundOpen,
    /// `)`
    RoundClose,
    /// `{`
    CurlyOpen,
    /// `}`
    CurlyClose,
    /// `{{`
    DoubleCurlyOpen,
    /// `}}`
    DoubleCurlyClose,
    /// `[`
    SquareOpen,
    /// `]`
    SquareClose,
    /// `.`
    Dot,
    /// `..`
    To,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `^`
    Caret,
    /// `#`
    Hash,
    /// `*`
    Wildcard,
    /// `!`
    Not,

    // Comparison and hierarchy operators
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `<<`
    DblLt,
    /// `>>`
    DblGt,
    /// `<!`
    LtEm,
    /// `>!`
    GtEm,

    // Connectives
    /// `AND` (any case)
    And,
    /// `OR` (any case)
    Or,
    /// `MINUS` (any case)
    Minus,

    // Words
    /// `R` (reversed attribute)
    Reversed,
    /// `true`
    True,
    /// `false`
    False,
    /// `active`
    Active,
    /// `ecl`
    Ecl,
    /// `term`
    Term,
    /// `type`
    Type,
    /// `typeId`
    TypeId,
    /// `regex`
    Regex,
    /// `moduleId`
    ModuleId,
    /// `preferredIn`
    PreferredIn,
    /// `acceptableIn`
    AcceptableIn,
    /// `languageRefSet`
    LanguageRefSet,
    /// `Concept` (filter domain)
    Concept,
    /// `Description` (filter domain)
    Description,
    /// `match` (lexical search type)
    Match,
    /// `exact` (lexical search type)
    Exact,

    // Literals
    /// Quoted string: `"..."` or `'...'`
    String,
    /// Pipe-delimited term: `|...|`
    TermString,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns true for `0`..`9`.
    pub fn is_digit(self) -> bool {
        matches!(self, TokenKind::Zero | TokenKind::DigitNonZero)
    }

    /// Returns the keyword kind for a word, if the word is reserved.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        if word.eq_ignore_ascii_case("AND") {
            return Some(TokenKind::And);
        }
        if word.eq_ignore_ascii_case("OR") {
            return Some(TokenKind::Or);
        }
        if word.eq_ignore_ascii_case("MINUS") {
            return Some(TokenKind::Minus);
        }
        let kind = match word {
            "R" => TokenKind::Reversed,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "active" => TokenKind::Active,
            "ecl" => TokenKind::Ecl,
            "term" => TokenKind::Term,
            "type" => TokenKind::Type,
            "typeId" => TokenKind::TypeId,
            "regex" => TokenKind::Regex,
            "moduleId" => TokenKind::ModuleId,
            "preferredIn" => TokenKind::PreferredIn,
            "acceptableIn" => TokenKind::AcceptableIn,
            "languageRefSet" => TokenKind::LanguageRefSet,
            "Concept" => TokenKind::Concept,
            "Description" => TokenKind::Description,
            "match" => TokenKind::Match,
            "exact" => TokenKind::Exact,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Zero => "0",
            TokenKind::DigitNonZero => "digit",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::RoundOpen => "(",
            TokenKind::RoundClose => ")",
            TokenKind::CurlyOpen => "{",
            TokenKind::CurlyClose => "}",
            TokenKind::DoubleCurlyOpen => "{{",
            TokenKind::DoubleCurlyClose => "}}",
            TokenKind::SquareOpen => "[",
            TokenKind::SquareClose => "]",
            TokenKind::Dot => ".",
            TokenKind::To => "..",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Caret => "^",
            TokenKind::Hash => "#",
            TokenKind::Wildcard => "*",
            TokenKind::Not => "!",
            TokenKind::Equal => "=",
            TokenKind::NotEqual => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Lte => "<=",
            TokenKind::Gte => ">=",
            TokenKind::DblLt => "<<",
            TokenKind::DblGt => ">>",
            TokenKind::LtEm => "<!",
            TokenKind::GtEm => ">!",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Minus => "MINUS",
            TokenKind::Reversed => "R",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Active => "active",
            TokenKind::Ecl => "ecl",
            TokenKind::Term => "term",
            TokenKind::Type => "type",
            TokenKind::TypeId => "typeId",
            TokenKind::Regex => "regex",
            TokenKind::ModuleId => "moduleId",
            TokenKind::PreferredIn => "preferredIn",
            TokenKind::AcceptableIn => "acceptableIn",
            TokenKind::LanguageRefSet => "languageRefSet",
            TokenKind::Concept => "Concept",
            TokenKind::Description => "Description",
            TokenKind::Match => "match",
            TokenKind::Exact => "exact",
            TokenKind::String => "string",
            TokenKind::TermString => "|term|",
            TokenKind::Eof => "end of input",
        };
        f.write_str(s)
    }
}

/// A classified token borrowing its lexeme from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Token classification.
    pub kind: TokenKind,
    /// Location in the source.
    pub span: Span,
    /// The exact source text of the token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Creates a token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }

    /// Creates an end-of-input token at `offset`.
    pub fn eof(offset: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(offset, offset),
            text: "",
        }
    }
}
