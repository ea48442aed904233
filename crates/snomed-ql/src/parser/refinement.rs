//! Refinements, attribute groups, attribute sets and cardinality.

use super::Parser;
use crate::ast::{
    AttributeConstraint, AttributeGroup, AttributeSet, Cardinality, MaxValue, Refinement,
};
use crate::error::QlResult;
use crate::token::TokenKind;

impl<'t, 'src> Parser<'t, 'src> {
    /// `and_refinement ('OR' and_refinement)*`
    pub(crate) fn refinement(&mut self) -> QlResult<Refinement> {
        self.left_fold(
            Self::and_refinement,
            |p| p.refinement_operator(&[TokenKind::Or]),
            Refinement::or,
        )
    }

    /// `sub_refinement (('AND' | ',') sub_refinement)*`
    fn and_refinement(&mut self) -> QlResult<Refinement> {
        self.left_fold(
            Self::sub_refinement,
            |p| p.refinement_operator(&[TokenKind::And, TokenKind::Comma]),
            Refinement::and,
        )
    }

    /// Attribute constraint, attribute group or nested refinement.
    fn sub_refinement(&mut self) -> QlResult<Refinement> {
        match self.stream.peek().kind {
            TokenKind::SquareOpen => {
                let cardinality = self.cardinality()?;
                if self.check(TokenKind::CurlyOpen) {
                    self.attribute_group(Some(cardinality)).map(Refinement::Group)
                } else {
                    self.attribute_constraint(Some(cardinality))
                        .map(Refinement::Attribute)
                }
            }
            TokenKind::CurlyOpen => self.attribute_group(None).map(Refinement::Group),
            TokenKind::RoundOpen => self
                .enclosed(TokenKind::RoundClose, Self::refinement)
                .map(Refinement::nested),
            _ => self.attribute_constraint(None).map(Refinement::Attribute),
        }
    }

    /// Accepts a refinement operator only if what follows it, past any opening
    /// parentheses, can start another sub-refinement. Otherwise the operator is
    /// left to the enclosing expression.
    fn refinement_operator(&self, operators: &[TokenKind]) -> bool {
        if !operators.contains(&self.stream.peek().kind) {
            return false;
        }
        let mut n = 1;
        while self.stream.peek_nth(n).kind == TokenKind::RoundOpen {
            n += 1;
        }
        starts_attribute(self.stream.peek_nth(n).kind)
    }

    /// `card? { attribute_set }`
    fn attribute_group(&mut self, cardinality: Option<Cardinality>) -> QlResult<AttributeGroup> {
        let attributes = self.enclosed(TokenKind::CurlyClose, Self::attribute_set)?;
        Ok(AttributeGroup {
            cardinality,
            attributes,
        })
    }

    /// `and_attribute_set ('OR' and_attribute_set)*`
    fn attribute_set(&mut self) -> QlResult<AttributeSet> {
        self.left_fold(
            Self::and_attribute_set,
            |p| p.check(TokenKind::Or),
            AttributeSet::or,
        )
    }

    /// `sub_attribute_set (('AND' | ',') sub_attribute_set)*`
    fn and_attribute_set(&mut self) -> QlResult<AttributeSet> {
        self.left_fold(
            Self::sub_attribute_set,
            |p| p.check(TokenKind::And) || p.check(TokenKind::Comma),
            AttributeSet::and,
        )
    }

    fn sub_attribute_set(&mut self) -> QlResult<AttributeSet> {
        match self.stream.peek().kind {
            TokenKind::RoundOpen => self
                .enclosed(TokenKind::RoundClose, Self::attribute_set)
                .map(AttributeSet::nested),
            TokenKind::SquareOpen => {
                let cardinality = self.cardinality()?;
                self.attribute_constraint(Some(cardinality))
                    .map(AttributeSet::Attribute)
            }
            _ => self.attribute_constraint(None).map(AttributeSet::Attribute),
        }
    }

    /// `card? 'R'? sub_expression comparison`, with the cardinality already read.
    fn attribute_constraint(
        &mut self,
        cardinality: Option<Cardinality>,
    ) -> QlResult<AttributeConstraint> {
        let reversed = self.eat(TokenKind::Reversed).is_some();
        let attribute = self.sub_expression_constraint()?;
        let comparison = self.comparison()?;
        Ok(AttributeConstraint {
            cardinality,
            reversed,
            attribute,
            comparison,
        })
    }

    /// `[ nni .. (nni | *) ]`
    pub(crate) fn cardinality(&mut self) -> QlResult<Cardinality> {
        let open = self.expect(TokenKind::SquareOpen)?;
        let min = self.non_negative_integer()?;
        self.expect(TokenKind::To)?;
        let max = if self.eat(TokenKind::Wildcard).is_some() {
            MaxValue::Unbounded
        } else if self.stream.peek().kind.is_digit() {
            MaxValue::Bounded(self.non_negative_integer()?)
        } else {
            return Err(self.unexpected(&[TokenKind::DigitNonZero, TokenKind::Wildcard]));
        };
        self.close(TokenKind::SquareClose, open)?;
        Ok(Cardinality::new(min, max))
    }
}

/// Tokens that can start an attribute constraint or attribute group.
fn starts_attribute(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::SquareOpen
            | TokenKind::CurlyOpen
            | TokenKind::Reversed
            | TokenKind::Caret
            | TokenKind::Zero
            | TokenKind::DigitNonZero
            | TokenKind::Wildcard
            | TokenKind::LtEm
            | TokenKind::Lt
            | TokenKind::DblLt
            | TokenKind::GtEm
            | TokenKind::Gt
            | TokenKind::DblGt
    )
}
