//! Attribute value comparisons.
//!
//! `=` and `!=` compare against a concept expression, a quoted string or a
//! `#` number. The ordering operators only compare against numbers.

use super::literal::Numeric;
use super::Parser;
use crate::ast::{
    AttributeComparison, Comparison, ComparisonOperator, DataTypeComparison,
};
use crate::error::QlResult;
use crate::token::TokenKind;

const COMPARISON_OPERATORS: &[TokenKind] = &[
    TokenKind::Equal,
    TokenKind::NotEqual,
    TokenKind::Lt,
    TokenKind::Lte,
    TokenKind::Gt,
    TokenKind::Gte,
];

impl<'t, 'src> Parser<'t, 'src> {
    pub(crate) fn comparison(&mut self) -> QlResult<Comparison> {
        let operator = match self.stream.peek().kind {
            TokenKind::Equal => ComparisonOperator::Equal,
            TokenKind::NotEqual => ComparisonOperator::NotEqual,
            TokenKind::Lt => ComparisonOperator::LessThan,
            TokenKind::Lte => ComparisonOperator::LessThanOrEqual,
            TokenKind::Gt => ComparisonOperator::GreaterThan,
            TokenKind::Gte => ComparisonOperator::GreaterThanOrEqual,
            _ => return Err(self.unexpected(COMPARISON_OPERATORS)),
        };
        self.stream.advance();

        let equality = matches!(
            operator,
            ComparisonOperator::Equal | ComparisonOperator::NotEqual
        );
        match self.stream.peek().kind {
            TokenKind::Hash => self.numeric_comparison(operator),
            TokenKind::String if equality => {
                let value = self.string_literal()?;
                let comparison = if operator == ComparisonOperator::Equal {
                    DataTypeComparison::StringEquals(value)
                } else {
                    DataTypeComparison::StringNotEquals(value)
                };
                Ok(comparison.into())
            }
            _ if equality => {
                let value = self.sub_expression_constraint()?;
                let comparison = if operator == ComparisonOperator::Equal {
                    AttributeComparison::equals(value)
                } else {
                    AttributeComparison::not_equals(value)
                };
                Ok(comparison.into())
            }
            _ => Err(self.unexpected(&[TokenKind::Hash])),
        }
    }

    /// `# (integer | decimal)`
    fn numeric_comparison(&mut self, operator: ComparisonOperator) -> QlResult<Comparison> {
        self.expect(TokenKind::Hash)?;
        let comparison = match self.numeric_literal()? {
            Numeric::Integer(value) => DataTypeComparison::integer(operator, value),
            Numeric::Decimal(value) => DataTypeComparison::decimal(operator, value),
        };
        Ok(comparison.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        AttributeComparison, Comparison, ComparisonOperator, DataTypeComparison, Decimal,
        ExpressionConstraint as E, FocusConcept as F, Refinement, SubExpressionConstraint as S,
    };
    use crate::error::QlError;
    use crate::parser::parse_ecl;
    use crate::token::TokenKind;

    fn comparison_of(input: &str) -> Comparison {
        match parse_ecl(input).unwrap() {
            E::Refined {
                refinement: Refinement::Attribute(attribute),
                ..
            } => attribute.comparison,
            other => panic!("Expected single attribute refinement, got {:?}", other),
        }
    }

    fn data_type(input: &str) -> DataTypeComparison {
        match comparison_of(input) {
            Comparison::DataType(c) => c,
            other => panic!("Expected DataType comparison, got {:?}", other),
        }
    }

    mod attribute_values {
        use super::*;

        #[test]
        fn test_equals_expression() {
            assert_eq!(
                comparison_of("* : 363698007 = << 39057004"),
                Comparison::Attribute(AttributeComparison::equals(S::descendant_or_self_of(
                    F::concept(39057004)
                )))
            );
        }

        #[test]
        fn test_not_equals_expression() {
            assert_eq!(
                comparison_of("* : 363698007 != *"),
                Comparison::Attribute(AttributeComparison::not_equals(F::Any))
            );
        }

        #[test]
        fn test_value_is_not_dotted() {
            // The value is a single sub-expression; a following `.` is not part of it.
            assert!(parse_ecl("* : 363698007 = 39057004 . 272741003").is_err());
        }

        #[test]
        fn test_ordering_operator_needs_number() {
            let err = parse_ecl("* : 363698007 < 39057004").unwrap_err();
            assert_eq!(
                err,
                QlError::UnexpectedToken {
                    expected: vec![TokenKind::Hash],
                    found: TokenKind::DigitNonZero,
                    position: 16,
                }
            );
        }

        #[test]
        fn test_ordering_operator_rejects_string() {
            assert!(parse_ecl("* : 363698007 >= \"x\"").is_err());
        }
    }

    mod strings {
        use super::*;

        #[test]
        fn test_string_equals() {
            assert_eq!(
                data_type("* : 363698007 = \"tablet\""),
                DataTypeComparison::StringEquals("tablet".to_string())
            );
        }

        #[test]
        fn test_string_not_equals_single_quotes() {
            assert_eq!(
                data_type("* : 363698007 != 'it\\'s'"),
                DataTypeComparison::StringNotEquals("it's".to_string())
            );
        }
    }

    mod numbers {
        use super::*;

        #[test]
        fn test_integer_equals() {
            assert_eq!(
                data_type("* : 1142135004 = #100"),
                DataTypeComparison::IntegerEquals(100)
            );
        }

        #[test]
        fn test_decimal_equals() {
            assert_eq!(
                data_type("* : 1142135004 = #1.5"),
                DataTypeComparison::DecimalEquals(Decimal::new("1.5"))
            );
        }

        #[test]
        fn test_decimal_empty_fraction() {
            assert_eq!(
                data_type("* : 1142135004 = #1."),
                DataTypeComparison::DecimalEquals(Decimal::new("1."))
            );
        }

        #[test]
        fn test_all_integer_operators() {
            let cases = [
                ("=", ComparisonOperator::Equal),
                ("!=", ComparisonOperator::NotEqual),
                ("<", ComparisonOperator::LessThan),
                ("<=", ComparisonOperator::LessThanOrEqual),
                (">", ComparisonOperator::GreaterThan),
                (">=", ComparisonOperator::GreaterThanOrEqual),
            ];
            for (text, op) in cases {
                let input = format!("* : 1142135004 {} #-5", text);
                assert_eq!(data_type(&input), DataTypeComparison::integer(op, -5));
            }
        }

        #[test]
        fn test_decimal_ordering() {
            assert_eq!(
                data_type("* : 1142135004 <= #+0.5"),
                DataTypeComparison::DecimalLessThanEquals(Decimal::new("+0.5"))
            );
        }

        #[test]
        fn test_hash_without_number() {
            let err = parse_ecl("* : 1142135004 > #").unwrap_err();
            assert!(matches!(err, QlError::PrematureEnd { .. }));
        }

        #[test]
        fn test_hash_string_rejected() {
            assert!(parse_ecl("* : 1142135004 = #\"x\"").is_err());
        }
    }
}
