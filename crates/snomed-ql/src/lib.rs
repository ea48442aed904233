//! # snomed-ql
//!
//! A Rust parser for the SNOMED CT Query Language (QL) and the Expression
//! Constraint Language (ECL) it embeds.
//!
//! QL combines *filters* with `OR`, `AND` and `MINUS`:
//!
//! - `active = true|false` selects by status
//! - `ecl = <expression>` selects the concepts an ECL expression denotes
//! - `moduleId = <expression>` selects by module
//! - `{{ term = "..." type = <expression> ... }}` searches descriptions
//!
//! `active` and `moduleId` may be prefixed with `Concept.` or `Description.`,
//! and a term may name its search type: `term = exact:"Heart attack"`.
//!
//! Parsing produces a strictly tree-shaped AST; nothing is resolved against a
//! terminology store.
//!
//! ## Usage
//!
//! ```rust
//! use snomed_ql::{parse, parse_ecl, ExpressionConstraint, Filter};
//!
//! let query = parse(
//!     "active = true AND (ecl = << 404684003 |Clinical finding| : 363698007 = 39057004)",
//! )
//! .unwrap();
//! assert!(matches!(query.constraint, Some(Filter::Conjunction(_, _))));
//!
//! let expr = parse_ecl("< 19829001 MINUS < 301867009").unwrap();
//! assert!(matches!(expr, ExpressionConstraint::Exclusion(_, _)));
//! ```
//!
//! ## Operator precedence
//!
//! | Tier | Loosest to tightest |
//! |------|---------------------|
//! | QL | `OR`, `AND`, `MINUS` |
//! | ECL | `OR`, `AND`/`,`, `MINUS`, `:` refinement, `.` navigation |
//! | Refinement | `OR`, `AND`/`,` |
//!
//! `OR` and `AND` chain left-associatively. `MINUS` appears at most once per
//! nesting level: `a MINUS b MINUS c` is rejected, `(a MINUS b) MINUS c` is not.
//!
//! ## ECL Syntax Quick Reference
//!
//! | Operator | Meaning | Example |
//! |----------|---------|---------|
//! | (none) | Self | `404684003` |
//! | `<!` | Children of | `<! 404684003` |
//! | `<` | Descendants of | `< 404684003` |
//! | `<<` | Descendants or self of | `<< 404684003` |
//! | `>!` | Parents of | `>! 404684003` |
//! | `>` | Ancestors of | `> 404684003` |
//! | `>>` | Ancestors or self of | `>> 404684003` |
//! | `^` | Member of (refset) | `^ 700043003` |
//! | `*` | Any concept | `*` |
//! | `:` | Refinement | `< 19829001 : 116676008 = << 79654002` |
//! | `.` | Attribute navigation | `< 125605004 . 363698007` |
//!
//! ## Features
//!
//! - `parallel` - parse batches with rayon in [`parse_batch`]
//! - `serde` - derive `Serialize`/`Deserialize` for the AST

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod batch;
mod config;
mod error;
mod lexer;
mod parser;
mod token;

pub use ast::{
    AttributeComparison, AttributeConstraint, AttributeGroup, AttributeSet, Cardinality,
    Comparison, ComparisonOperator, ConceptReference, DataTypeComparison, Decimal,
    DescriptionFilter, Domain, ExpressionConstraint, Filter, FocusConcept, LexicalSearchType,
    MaxValue, NonNegativeInteger, Query, Refinement, RefsetOperand, SubExpressionConstraint,
};
pub use batch::parse_batch;
pub use config::{ParserConfig, ParserConfigBuilder, DEFAULT_MAX_DEPTH};
pub use error::{QlError, QlResult};
pub use lexer::{tokenize, tokenize_with_config};
pub use parser::{
    parse, parse_ecl, parse_ecl_with_config, parse_with_config, Parser, TokenStream,
};
pub use token::{Span, Token, TokenKind};

/// SNOMED CT Identifier type (64-bit unsigned integer).
pub type SctId = u64;
