//! ECL expression constraints: the Or/And/Exclusion cascade, refinement and
//! dotted attribute navigation, hierarchy operators and focus concepts.

use super::literal::term_text;
use super::Parser;
use crate::ast::{
    ConceptReference, ExpressionConstraint, FocusConcept, RefsetOperand, SubExpressionConstraint,
};
use crate::error::QlResult;
use crate::token::TokenKind;

/// Tokens that can start a focus concept.
const FOCUS_START: &[TokenKind] = &[
    TokenKind::Caret,
    TokenKind::DigitNonZero,
    TokenKind::Wildcard,
    TokenKind::RoundOpen,
];

/// Tokens that can start a sub-expression constraint.
const SUB_EXPRESSION_START: &[TokenKind] = &[
    TokenKind::LtEm,
    TokenKind::Lt,
    TokenKind::DblLt,
    TokenKind::GtEm,
    TokenKind::Gt,
    TokenKind::DblGt,
    TokenKind::Caret,
    TokenKind::DigitNonZero,
    TokenKind::Wildcard,
    TokenKind::RoundOpen,
];

/// Operands accepted after `^`.
const MEMBER_OF_START: &[TokenKind] = &[
    TokenKind::DigitNonZero,
    TokenKind::Wildcard,
    TokenKind::RoundOpen,
];

impl<'t, 'src> Parser<'t, 'src> {
    /// `and ('OR' and)*`
    pub(crate) fn expression_constraint(&mut self) -> QlResult<ExpressionConstraint> {
        self.left_fold(
            Self::and_expression_constraint,
            |p| p.ecl_operator(&[TokenKind::Or]),
            ExpressionConstraint::or,
        )
    }

    /// `exclusion (('AND' | ',') exclusion)*`
    fn and_expression_constraint(&mut self) -> QlResult<ExpressionConstraint> {
        self.left_fold(
            Self::exclusion_expression_constraint,
            |p| p.ecl_operator(&[TokenKind::And, TokenKind::Comma]),
            ExpressionConstraint::and,
        )
    }

    /// `refined ('MINUS' refined)?`
    fn exclusion_expression_constraint(&mut self) -> QlResult<ExpressionConstraint> {
        self.optional_binary(
            Self::refined_expression_constraint,
            |p| p.ecl_operator(&[TokenKind::Minus, TokenKind::Dash]),
            ExpressionConstraint::exclusion,
        )
    }

    /// `dotted (':' refinement)?`
    fn refined_expression_constraint(&mut self) -> QlResult<ExpressionConstraint> {
        let constraint = self.dotted_expression_constraint()?;
        if self.eat(TokenKind::Colon).is_none() {
            return Ok(constraint);
        }
        let refinement = self.refinement()?;
        Ok(ExpressionConstraint::refined(constraint, refinement))
    }

    /// `sub ('.' sub)*`
    fn dotted_expression_constraint(&mut self) -> QlResult<ExpressionConstraint> {
        let mut constraint = ExpressionConstraint::from(self.sub_expression_constraint()?);
        while self.eat(TokenKind::Dot).is_some() {
            let attribute = self.sub_expression_constraint()?;
            constraint = ExpressionConstraint::dotted(constraint, attribute);
        }
        Ok(constraint)
    }

    /// A hierarchy operator applied to a focus concept, or a bare focus concept.
    pub(crate) fn sub_expression_constraint(&mut self) -> QlResult<SubExpressionConstraint> {
        let operator: fn(FocusConcept) -> SubExpressionConstraint = match self.stream.peek().kind
        {
            TokenKind::LtEm => SubExpressionConstraint::ChildOf,
            TokenKind::Lt => SubExpressionConstraint::DescendantOf,
            TokenKind::DblLt => SubExpressionConstraint::DescendantOrSelfOf,
            TokenKind::GtEm => SubExpressionConstraint::ParentOf,
            TokenKind::Gt => SubExpressionConstraint::AncestorOf,
            TokenKind::DblGt => SubExpressionConstraint::AncestorOrSelfOf,
            kind if kind.is_digit() || FOCUS_START.contains(&kind) => {
                return self.focus_concept().map(SubExpressionConstraint::Focus)
            }
            _ => return Err(self.unexpected(SUB_EXPRESSION_START)),
        };
        self.stream.advance();
        let focus = self.focus_concept()?;
        Ok(operator(focus))
    }

    fn focus_concept(&mut self) -> QlResult<FocusConcept> {
        match self.stream.peek().kind {
            TokenKind::Caret => {
                self.stream.advance();
                self.refset_operand().map(FocusConcept::MemberOf)
            }
            kind if kind.is_digit() => self.concept_reference().map(FocusConcept::ConceptReference),
            TokenKind::Wildcard => {
                self.stream.advance();
                Ok(FocusConcept::Any)
            }
            TokenKind::RoundOpen => self.nested_expression_constraint().map(FocusConcept::Nested),
            _ => Err(self.unexpected(FOCUS_START)),
        }
    }

    /// The operand of `^`: no hierarchy operator and no second `^`.
    fn refset_operand(&mut self) -> QlResult<RefsetOperand> {
        match self.stream.peek().kind {
            kind if kind.is_digit() => {
                self.concept_reference().map(RefsetOperand::ConceptReference)
            }
            TokenKind::Wildcard => {
                self.stream.advance();
                Ok(RefsetOperand::Any)
            }
            TokenKind::RoundOpen => self.nested_expression_constraint().map(RefsetOperand::Nested),
            _ => Err(self.unexpected(MEMBER_OF_START)),
        }
    }

    /// `identifier |term|?`
    fn concept_reference(&mut self) -> QlResult<ConceptReference> {
        let id = self.snomed_identifier()?;
        let term = self.eat(TokenKind::TermString).map(|t| term_text(t.text));
        Ok(ConceptReference { id, term })
    }

    /// `( expression )`
    fn nested_expression_constraint(&mut self) -> QlResult<Box<ExpressionConstraint>> {
        self.enclosed(TokenKind::RoundClose, Self::expression_constraint)
            .map(Box::new)
    }
}
