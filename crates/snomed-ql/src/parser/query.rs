//! QL filters: the Disjunction/Conjunction/Exclusion cascade and filter atoms.

use super::Parser;
use crate::ast::{DescriptionFilter, Domain, Filter, LexicalSearchType};
use crate::error::QlResult;
use crate::token::TokenKind;

const FILTER_START: &[TokenKind] = &[
    TokenKind::Active,
    TokenKind::Ecl,
    TokenKind::ModuleId,
    TokenKind::Concept,
    TokenKind::Description,
    TokenKind::DoubleCurlyOpen,
    TokenKind::RoundOpen,
];

/// Filters that accept a `Concept.` / `Description.` prefix.
const DOMAIN_FILTERS: &[TokenKind] = &[TokenKind::Active, TokenKind::ModuleId];

/// One slot of the unordered description filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DescriptionSlot {
    Term,
    Active,
    Type,
    Regex,
    PreferredIn,
    AcceptableIn,
    LanguageRefSet,
}

impl DescriptionSlot {
    const ALL: [DescriptionSlot; 7] = [
        DescriptionSlot::Term,
        DescriptionSlot::Active,
        DescriptionSlot::Type,
        DescriptionSlot::Regex,
        DescriptionSlot::PreferredIn,
        DescriptionSlot::AcceptableIn,
        DescriptionSlot::LanguageRefSet,
    ];

    fn from_kind(kind: TokenKind) -> Option<Self> {
        if kind == TokenKind::TypeId {
            return Some(DescriptionSlot::Type);
        }
        Self::ALL.into_iter().find(|slot| slot.keyword() == kind)
    }

    fn keyword(self) -> TokenKind {
        match self {
            DescriptionSlot::Term => TokenKind::Term,
            DescriptionSlot::Active => TokenKind::Active,
            DescriptionSlot::Type => TokenKind::Type,
            DescriptionSlot::Regex => TokenKind::Regex,
            DescriptionSlot::PreferredIn => TokenKind::PreferredIn,
            DescriptionSlot::AcceptableIn => TokenKind::AcceptableIn,
            DescriptionSlot::LanguageRefSet => TokenKind::LanguageRefSet,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl<'t, 'src> Parser<'t, 'src> {
    /// `conjunction ('OR' conjunction)*`
    pub(crate) fn filter(&mut self) -> QlResult<Filter> {
        self.left_fold(Self::conjunction, |p| p.check(TokenKind::Or), Filter::or)
    }

    /// `exclusion ('AND' exclusion)*`
    fn conjunction(&mut self) -> QlResult<Filter> {
        self.left_fold(Self::exclusion, |p| p.check(TokenKind::And), Filter::and)
    }

    /// `atom ('MINUS' atom)?`
    fn exclusion(&mut self) -> QlResult<Filter> {
        self.optional_binary(
            Self::filter_atom,
            |p| p.check(TokenKind::Minus) || p.check(TokenKind::Dash),
            Filter::exclusion,
        )
    }

    fn filter_atom(&mut self) -> QlResult<Filter> {
        match self.stream.peek().kind {
            TokenKind::Active | TokenKind::ModuleId => self.domain_filter(None),
            TokenKind::Concept => {
                self.stream.advance();
                self.expect(TokenKind::Dot)?;
                self.domain_filter(Some(Domain::Concept))
            }
            TokenKind::Description => {
                self.stream.advance();
                self.expect(TokenKind::Dot)?;
                self.domain_filter(Some(Domain::Description))
            }
            TokenKind::Ecl => {
                self.stream.advance();
                self.expect(TokenKind::Equal)?;
                self.expression_constraint().map(Filter::Ecl)
            }
            TokenKind::DoubleCurlyOpen => self
                .enclosed(TokenKind::DoubleCurlyClose, Self::description_filter)
                .map(Filter::Description),
            TokenKind::RoundOpen => self
                .enclosed(TokenKind::RoundClose, Self::filter)
                .map(Filter::nested),
            _ => Err(self.unexpected(FILTER_START)),
        }
    }

    /// `active = bool` or `moduleId = expression`, after an optional domain.
    fn domain_filter(&mut self, domain: Option<Domain>) -> QlResult<Filter> {
        match self.stream.peek().kind {
            TokenKind::Active => {
                self.stream.advance();
                self.expect(TokenKind::Equal)?;
                let active = self.boolean()?;
                Ok(Filter::Active { domain, active })
            }
            TokenKind::ModuleId => {
                self.stream.advance();
                self.expect(TokenKind::Equal)?;
                let constraint = self.expression_constraint()?;
                Ok(Filter::Module { domain, constraint })
            }
            _ => Err(self.unexpected(DOMAIN_FILTERS)),
        }
    }

    /// `(match | regex | exact) ':'` before a term.
    fn lexical_search_type(&mut self) -> Option<LexicalSearchType> {
        let search = match self.stream.peek().kind {
            TokenKind::Match => LexicalSearchType::Match,
            TokenKind::Regex => LexicalSearchType::Regex,
            TokenKind::Exact => LexicalSearchType::Exact,
            _ => return None,
        };
        if self.stream.peek_nth(1).kind != TokenKind::Colon {
            return None;
        }
        self.stream.advance();
        self.stream.advance();
        Some(search)
    }

    /// Slots in any order, each at most once.
    ///
    /// A slot keyword whose slot is already filled ends the group, after which
    /// only `}}` may follow.
    fn description_filter(&mut self) -> QlResult<DescriptionFilter> {
        let mut filter = DescriptionFilter::default();
        let mut selected = 0u8;

        while let Some(slot) = DescriptionSlot::from_kind(self.stream.peek().kind) {
            if selected & slot.bit() != 0 {
                break;
            }
            self.stream.advance();
            self.expect(TokenKind::Equal)?;
            match slot {
                DescriptionSlot::Term => {
                    filter.term_search = self.lexical_search_type();
                    filter.term = Some(self.string_literal()?);
                }
                DescriptionSlot::Active => filter.active = Some(self.boolean()?),
                DescriptionSlot::Type => {
                    filter.description_type = Some(self.expression_constraint()?)
                }
                DescriptionSlot::Regex => filter.regex = Some(self.string_literal()?),
                DescriptionSlot::PreferredIn => {
                    filter.preferred_in = Some(self.expression_constraint()?)
                }
                DescriptionSlot::AcceptableIn => {
                    filter.acceptable_in = Some(self.expression_constraint()?)
                }
                DescriptionSlot::LanguageRefSet => {
                    filter.language_ref_set = Some(self.expression_constraint()?)
                }
            }
            selected |= slot.bit();
        }

        if !self.stream.at_end() && !self.check(TokenKind::DoubleCurlyClose) {
            let mut expected: Vec<TokenKind> = DescriptionSlot::ALL
                .into_iter()
                .filter(|slot| selected & slot.bit() == 0)
                .map(DescriptionSlot::keyword)
                .collect();
            expected.push(TokenKind::DoubleCurlyClose);
            return Err(self.unexpected(&expected));
        }
        Ok(filter)
    }
}
