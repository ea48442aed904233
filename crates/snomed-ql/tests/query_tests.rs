//! Integration tests for query parsing.
//!
//! These tests exercise the public API end to end: precedence and
//! associativity at every tier, literal validity, the unordered description
//! group, nesting and error reporting.

use snomed_ql::{
    parse, parse_ecl, parse_with_config, AttributeComparison, AttributeConstraint,
    AttributeGroup, AttributeSet, Cardinality, Comparison, DataTypeComparison, Decimal,
    DescriptionFilter, ExpressionConstraint as E, Filter, FocusConcept as F, ParserConfig,
    QlError, Query, Refinement, SubExpressionConstraint as S, TokenKind,
};

fn ecl_filter(input: &str) -> E {
    match parse(input).unwrap().constraint {
        Some(Filter::Ecl(expr)) => expr,
        other => panic!("Expected Ecl filter, got {:?}", other),
    }
}

fn attr_equals(attribute: u64, value: u64) -> AttributeConstraint {
    AttributeConstraint::new(
        S::concept(attribute),
        AttributeComparison::equals(F::concept(value)).into(),
    )
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_end_to_end_example() {
    let query = parse(
        "active = true AND (ecl = << 404684003 |Clinical finding| : 363698007 = 39057004)",
    )
    .unwrap();

    let expected = Query::new(Filter::and(
        Filter::active(true),
        Filter::nested(Filter::ecl(E::refined(
            E::descendant_or_self_of(F::concept_with_term(404684003, "Clinical finding")),
            Refinement::Attribute(attr_equals(363698007, 39057004)),
        ))),
    ));
    assert_eq!(query, expected);
}

#[test]
fn test_empty_query_matches_everything() {
    let query = parse("").unwrap();
    assert!(query.is_empty());
    assert_eq!(query, Query::default());
}

#[test]
fn test_determinism() {
    let input = "{{ term = \"x\" }} OR ecl = < 404684003 : [0..1] { 363698007 = * } \
                 MINUS moduleId = 900000000000207008";
    assert_eq!(parse(input).unwrap(), parse(input).unwrap());
}

// ============================================================================
// Associativity and precedence
// ============================================================================

mod associativity {
    use super::*;

    #[test]
    fn test_query_or_chain() {
        assert_eq!(
            parse("active = true OR active = false OR ecl = *").unwrap().constraint,
            Some(Filter::or(
                Filter::or(Filter::active(true), Filter::active(false)),
                Filter::ecl(E::any())
            ))
        );
    }

    #[test]
    fn test_query_and_chain() {
        assert_eq!(
            parse("active = true AND ecl = * AND active = false").unwrap().constraint,
            Some(Filter::and(
                Filter::and(Filter::active(true), Filter::ecl(E::any())),
                Filter::active(false)
            ))
        );
    }

    #[test]
    fn test_ecl_chains() {
        let a = || E::concept(100001);
        let b = || E::concept(100002);
        let c = || E::concept(100003);
        assert_eq!(
            parse_ecl("100001 OR 100002 OR 100003").unwrap(),
            E::or(E::or(a(), b()), c())
        );
        assert_eq!(
            parse_ecl("100001 , 100002 , 100003").unwrap(),
            E::and(E::and(a(), b()), c())
        );
    }

    #[test]
    fn test_refinement_chains() {
        let refinement = match parse_ecl("* : 100001 = 200001 OR 100002 = 200002 OR 100003 = 200003")
            .unwrap()
        {
            E::Refined { refinement, .. } => refinement,
            other => panic!("Expected Refined, got {:?}", other),
        };
        assert_eq!(
            refinement,
            Refinement::or(
                Refinement::or(
                    attr_equals(100001, 200001).into(),
                    attr_equals(100002, 200002).into()
                ),
                attr_equals(100003, 200003).into()
            )
        );
    }

    #[test]
    fn test_attribute_set_chains() {
        let refinement = match parse_ecl("* : { 100001 = 200001 , 100002 = 200002 AND 100003 = 200003 }")
            .unwrap()
        {
            E::Refined { refinement, .. } => refinement,
            other => panic!("Expected Refined, got {:?}", other),
        };
        assert_eq!(
            refinement,
            Refinement::Group(AttributeGroup::new(AttributeSet::and(
                AttributeSet::and(
                    attr_equals(100001, 200001).into(),
                    attr_equals(100002, 200002).into()
                ),
                attr_equals(100003, 200003).into()
            )))
        );
    }
}

mod precedence {
    use super::*;

    #[test]
    fn test_and_over_or_in_queries() {
        assert_eq!(
            parse("active = true AND active = false OR ecl = *").unwrap().constraint,
            Some(Filter::or(
                Filter::and(Filter::active(true), Filter::active(false)),
                Filter::ecl(E::any())
            ))
        );
        assert_eq!(
            parse("active = true OR active = false AND ecl = *").unwrap().constraint,
            Some(Filter::or(
                Filter::active(true),
                Filter::and(Filter::active(false), Filter::ecl(E::any()))
            ))
        );
    }

    #[test]
    fn test_and_over_or_in_ecl() {
        assert_eq!(
            ecl_filter("ecl = 100001 AND 100002 OR 100003"),
            E::or(
                E::and(E::concept(100001), E::concept(100002)),
                E::concept(100003)
            )
        );
        assert_eq!(
            ecl_filter("ecl = 100001 OR 100002 AND 100003"),
            E::or(
                E::concept(100001),
                E::and(E::concept(100002), E::concept(100003))
            )
        );
    }

    #[test]
    fn test_exclusion_sits_between_and_and_refinement() {
        assert_eq!(
            ecl_filter("ecl = 100001 AND 100002 - 100003"),
            E::and(
                E::concept(100001),
                E::exclusion(E::concept(100002), E::concept(100003))
            )
        );
    }

    #[test]
    fn test_query_exclusion_binds_tighter_than_and() {
        assert_eq!(
            parse("active = true AND ecl = * MINUS active = false")
                .unwrap()
                .constraint,
            Some(Filter::and(
                Filter::active(true),
                Filter::exclusion(Filter::ecl(E::any()), Filter::active(false))
            ))
        );
    }
}

// ============================================================================
// Non-repeatable exclusion
// ============================================================================

mod exclusion {
    use super::*;

    #[test]
    fn test_query_tier_rejects_chain() {
        let err = parse("active = true - active = false - ecl = *").unwrap_err();
        assert!(matches!(
            err,
            QlError::UnexpectedToken {
                found: TokenKind::Dash,
                ..
            }
        ));
    }

    #[test]
    fn test_ecl_tier_rejects_chain() {
        let err = parse_ecl("100001 - 100002 - 100003").unwrap_err();
        assert!(matches!(
            err,
            QlError::UnexpectedToken {
                found: TokenKind::Dash,
                position: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_chain_inside_parens_rejected() {
        let err = parse_ecl("(100001 MINUS 100002 MINUS 100003)").unwrap_err();
        assert!(matches!(
            err,
            QlError::UnexpectedToken {
                found: TokenKind::Minus,
                ..
            }
        ));
    }

    #[test]
    fn test_nesting_allows_both_groupings() {
        assert_eq!(
            parse_ecl("100001 - (100002 - 100003)").unwrap(),
            E::exclusion(
                E::concept(100001),
                E::nested(E::exclusion(E::concept(100002), E::concept(100003)))
            )
        );
        assert_eq!(
            parse("(active = true - active = false) - ecl = *").unwrap().constraint,
            Some(Filter::exclusion(
                Filter::nested(Filter::exclusion(Filter::active(true), Filter::active(false))),
                Filter::ecl(E::any())
            ))
        );
    }
}

// ============================================================================
// Literals
// ============================================================================

mod literals {
    use super::*;

    #[test]
    fn test_identifier_length_and_lead() {
        assert!(matches!(
            parse("ecl = 12345"),
            Err(QlError::InvalidLiteral { position: 6, .. })
        ));
        assert_eq!(ecl_filter("ecl = 123456"), E::concept(123456));
        assert!(matches!(
            parse("ecl = 012345"),
            Err(QlError::InvalidLiteral { position: 6, .. })
        ));
    }

    fn data_type(input: &str) -> DataTypeComparison {
        match parse_ecl(input).unwrap() {
            E::Refined {
                refinement: Refinement::Attribute(AttributeConstraint {
                    comparison: Comparison::DataType(comparison),
                    ..
                }),
                ..
            } => comparison,
            other => panic!("Expected data type comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_decimal_disambiguation() {
        assert_eq!(
            data_type("* : 1142135004 = #100"),
            DataTypeComparison::IntegerEquals(100)
        );

        let decimal = data_type("* : 1142135004 = #1.5");
        assert_eq!(decimal, DataTypeComparison::DecimalEquals(Decimal::new("1.5")));
        match decimal {
            DataTypeComparison::DecimalEquals(d) => assert_eq!(d.to_f64(), Some(1.5)),
            _ => unreachable!(),
        }

        assert_eq!(
            data_type("* : 1142135004 = #1."),
            DataTypeComparison::DecimalEquals(Decimal::new("1."))
        );
    }

    #[test]
    fn test_whitespace_inside_number_rejected() {
        assert!(parse_ecl("* : 1142135004 = #1 00").is_err());
        assert!(parse_ecl("* : 1142135004 = #- 1").is_err());
    }

    #[test]
    fn test_term_is_retained() {
        assert_eq!(
            parse_ecl("404684003 |Clinical finding|").unwrap(),
            E::concept_with_term(404684003, "Clinical finding")
        );
        assert_eq!(
            parse_ecl("404684003 | Clinical  finding |").unwrap(),
            E::concept_with_term(404684003, " Clinical  finding ")
        );
        // The term does not affect the concept it annotates.
        assert_eq!(
            parse_ecl("404684003 |Clinical finding|").unwrap().as_concept_id(),
            parse_ecl("404684003").unwrap().as_concept_id()
        );
    }
}

// ============================================================================
// Description filter
// ============================================================================

mod description_filter {
    use super::*;

    #[test]
    fn test_unordered_group_equality() {
        assert_eq!(
            parse("{{ term=\"x\" active=true }}").unwrap(),
            parse("{{ active=true term=\"x\" }}").unwrap()
        );
        assert_eq!(
            parse("{{ term=\"x\" active=true }}").unwrap().constraint,
            Some(Filter::Description(
                DescriptionFilter::new().with_term("x").with_active(true)
            ))
        );
    }

    #[test]
    fn test_repeated_slot_rejected() {
        let err = parse("{{ term=\"x\" term=\"y\" }}").unwrap_err();
        assert!(matches!(
            err,
            QlError::UnexpectedToken {
                found: TokenKind::Term,
                ..
            }
        ));
    }

    #[test]
    fn test_repeated_active_rejected() {
        assert!(parse("{{ active = true type = * active = false }}").is_err());
    }
}

// ============================================================================
// Nesting
// ============================================================================

mod nesting {
    use super::*;

    #[test]
    fn test_nested_wrappers_are_preserved_and_strippable() {
        let nested = parse_ecl("(((<404684003)))").unwrap();
        let bare = parse_ecl("<404684003").unwrap();
        assert_ne!(nested, bare);
        assert_eq!(nested.unwrap_nested(), &bare);
    }

    #[test]
    fn test_nested_filters_strippable() {
        let nested = parse("((active = true))").unwrap().constraint.unwrap();
        assert_eq!(nested.unwrap_nested(), &Filter::active(true));
    }

    #[test]
    fn test_depth_limit_from_config() {
        let config = ParserConfig::builder().with_max_depth(2).build();
        assert!(parse_with_config("((active = true))", &config).is_ok());
        assert!(matches!(
            parse_with_config("(((active = true)))", &config),
            Err(QlError::NestingTooDeep { limit: 2, position: 2 })
        ));
    }

    #[test]
    fn test_group_cardinality_in_nested_refinement() {
        let expr = parse_ecl("< 404684003 : ([0..0] { 363698007 = * })").unwrap();
        assert_eq!(
            expr,
            E::refined(
                E::descendant_of(F::concept(404684003)),
                Refinement::nested(Refinement::Group(
                    AttributeGroup::new(
                        AttributeConstraint::new(
                            S::concept(363698007),
                            AttributeComparison::equals(F::Any).into()
                        )
                        .into()
                    )
                    .with_cardinality(Cardinality::bounded(0, 0))
                ))
            )
        );
    }
}

// ============================================================================
// Errors
// ============================================================================

mod errors {
    use super::*;

    #[test]
    fn test_unbalanced_paren() {
        let err = parse("(active = true").unwrap_err();
        assert_eq!(
            err,
            QlError::UnbalancedDelimiter {
                delimiter: TokenKind::RoundOpen,
                opened_at: 0,
                position: 14,
            }
        );
        assert_eq!(err.to_string(), "unclosed `(` opened at position 0");
    }

    #[test]
    fn test_premature_end() {
        let err = parse("active =").unwrap_err();
        assert_eq!(
            err,
            QlError::PrematureEnd {
                expected: vec![TokenKind::True, TokenKind::False],
                position: 8,
            }
        );
        assert_eq!(
            err.to_string(),
            "unexpected end of input at position 8, expected one of `true`, `false`"
        );
    }

    #[test]
    fn test_unexpected_token_message() {
        let err = parse("ecl = < 404684003 )").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected `)` at position 18, expected `end of input`"
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        let query = parse("active = true // status\nAND /* concept set */ ecl = *").unwrap();
        assert_eq!(
            query.constraint,
            Some(Filter::and(Filter::active(true), Filter::ecl(E::any())))
        );
    }
}
