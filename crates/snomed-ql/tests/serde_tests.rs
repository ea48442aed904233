//! Serialization of parsed queries (requires the `serde` feature).

#![cfg(feature = "serde")]

use snomed_ql::{parse, parse_ecl, ExpressionConstraint, Query};

#[test]
fn test_query_json_roundtrip() {
    let query = parse(
        "active = true AND (ecl = << 404684003 |Clinical finding| : \
         [1..*] { 363698007 = << 39057004 } OR 1142135004 >= #-2.5) \
         MINUS {{ term = exact:\"heart\" preferredIn = 900000000000509007 }} \
         OR Description.moduleId = 900000000000207008",
    )
    .unwrap();

    let json = serde_json::to_string(&query).unwrap();
    let back: Query = serde_json::from_str(&json).unwrap();
    assert_eq!(query, back);
}

#[test]
fn test_concept_reference_json_shape() {
    let expr = parse_ecl("404684003 |Clinical finding|").unwrap();
    let value = serde_json::to_value(&expr).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "SubExpression": {
                "Focus": {
                    "ConceptReference": { "id": 404684003u64, "term": "Clinical finding" }
                }
            }
        })
    );

    let back: ExpressionConstraint = serde_json::from_value(value).unwrap();
    assert_eq!(back, expr);
}
