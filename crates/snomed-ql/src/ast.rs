//! Abstract Syntax Tree types for QL queries and embedded ECL expressions.
//!
//! Every node owns its children; trees are built once, bottom-up, by the
//! parser and compare by structure.

use crate::SctId;

// =============================================================================
// Query and filters
// =============================================================================

/// Root of a parsed query.
///
/// An empty query has no constraint and matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Query {
    /// The top-level filter, if any.
    pub constraint: Option<Filter>,
}

impl Query {
    /// Creates a query with the given constraint.
    pub fn new(constraint: Filter) -> Self {
        Self {
            constraint: Some(constraint),
        }
    }

    /// Creates a query without a constraint.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the query has no constraint.
    pub fn is_empty(&self) -> bool {
        self.constraint.is_none()
    }
}

/// A QL filter.
///
/// # Examples
///
/// ```rust
/// use snomed_ql::{parse, Filter};
///
/// let query = parse("active = true AND ecl = *").unwrap();
/// assert!(matches!(query.constraint, Some(Filter::Conjunction(_, _))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Filter {
    /// `filter OR filter`
    Disjunction(Box<Filter>, Box<Filter>),
    /// `filter AND filter`
    Conjunction(Box<Filter>, Box<Filter>),
    /// `filter MINUS filter` (at most one per nesting level)
    Exclusion(Box<Filter>, Box<Filter>),
    /// `(Concept. | Description.)? active = true|false`
    Active {
        /// Component the status applies to, if prefixed.
        domain: Option<Domain>,
        /// Required status.
        active: bool,
    },
    /// `ecl = <expression constraint>`
    Ecl(ExpressionConstraint),
    /// `(Concept. | Description.)? moduleId = <expression constraint>`
    Module {
        /// Component the module applies to, if prefixed.
        domain: Option<Domain>,
        /// Allowed modules.
        constraint: ExpressionConstraint,
    },
    /// `{{ term = "..." active = ... }}`
    Description(DescriptionFilter),
    /// `( filter )`
    Nested(Box<Filter>),
}

impl Filter {
    /// Creates a disjunction.
    pub fn or(left: Filter, right: Filter) -> Self {
        Filter::Disjunction(Box::new(left), Box::new(right))
    }

    /// Creates a conjunction.
    pub fn and(left: Filter, right: Filter) -> Self {
        Filter::Conjunction(Box::new(left), Box::new(right))
    }

    /// Creates an exclusion.
    pub fn exclusion(left: Filter, right: Filter) -> Self {
        Filter::Exclusion(Box::new(left), Box::new(right))
    }

    /// Creates an active-status filter.
    pub fn active(active: bool) -> Self {
        Filter::Active {
            domain: None,
            active,
        }
    }

    /// Creates an active-status filter restricted to one component domain.
    pub fn active_in(domain: Domain, active: bool) -> Self {
        Filter::Active {
            domain: Some(domain),
            active,
        }
    }

    /// Creates an ECL filter.
    pub fn ecl(constraint: ExpressionConstraint) -> Self {
        Filter::Ecl(constraint)
    }

    /// Creates a module filter.
    pub fn module(constraint: ExpressionConstraint) -> Self {
        Filter::Module {
            domain: None,
            constraint,
        }
    }

    /// Creates a module filter restricted to one component domain.
    pub fn module_in(domain: Domain, constraint: ExpressionConstraint) -> Self {
        Filter::Module {
            domain: Some(domain),
            constraint,
        }
    }

    /// Creates a parenthesized filter.
    pub fn nested(inner: Filter) -> Self {
        Filter::Nested(Box::new(inner))
    }

    /// Returns true for Disjunction, Conjunction and Exclusion.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Filter::Disjunction(_, _) | Filter::Conjunction(_, _) | Filter::Exclusion(_, _)
        )
    }

    /// Unwraps parenthesized filters to get the inner filter.
    pub fn unwrap_nested(&self) -> &Filter {
        match self {
            Filter::Nested(inner) => inner.unwrap_nested(),
            other => other,
        }
    }
}

/// Component a domain-prefixed filter applies to: `Concept.` or `Description.`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// `Concept`
    Concept,
    /// `Description`
    Description,
}

/// How a `term` slot is matched: `term = exact:"..."`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexicalSearchType {
    /// `match`
    Match,
    /// `regex`
    Regex,
    /// `exact`
    Exact,
}

impl std::fmt::Display for LexicalSearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexicalSearchType::Match => write!(f, "match"),
            LexicalSearchType::Regex => write!(f, "regex"),
            LexicalSearchType::Exact => write!(f, "exact"),
        }
    }
}

/// Free-text description filter: `{{ ... }}`.
///
/// Each slot may appear at most once and in any order, so two filters with the
/// same slots compare equal regardless of how they were written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptionFilter {
    /// `term = "..."`
    pub term: Option<String>,
    /// Search type written before the term: `term = match:"..."`
    pub term_search: Option<LexicalSearchType>,
    /// `active = true|false`
    pub active: Option<bool>,
    /// `type = <ecl>` or `typeId = <ecl>`
    pub description_type: Option<ExpressionConstraint>,
    /// `regex = "..."`
    pub regex: Option<String>,
    /// `preferredIn = <ecl>`
    pub preferred_in: Option<ExpressionConstraint>,
    /// `acceptableIn = <ecl>`
    pub acceptable_in: Option<ExpressionConstraint>,
    /// `languageRefSet = <ecl>`
    pub language_ref_set: Option<ExpressionConstraint>,
}

impl DescriptionFilter {
    /// Creates a filter with no slots set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the term slot.
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Sets the term slot together with its search type.
    pub fn with_term_search(mut self, search: LexicalSearchType, term: impl Into<String>) -> Self {
        self.term_search = Some(search);
        self.term = Some(term.into());
        self
    }

    /// Sets the active slot.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Sets the type slot.
    pub fn with_type(mut self, description_type: ExpressionConstraint) -> Self {
        self.description_type = Some(description_type);
        self
    }

    /// Sets the regex slot.
    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = Some(regex.into());
        self
    }

    /// Sets the preferredIn slot.
    pub fn with_preferred_in(mut self, refset: ExpressionConstraint) -> Self {
        self.preferred_in = Some(refset);
        self
    }

    /// Sets the acceptableIn slot.
    pub fn with_acceptable_in(mut self, refset: ExpressionConstraint) -> Self {
        self.acceptable_in = Some(refset);
        self
    }

    /// Sets the languageRefSet slot.
    pub fn with_language_ref_set(mut self, refset: ExpressionConstraint) -> Self {
        self.language_ref_set = Some(refset);
        self
    }

    /// Returns true if no slot is set (`{{ }}`).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Expression constraints
// =============================================================================

/// Abstract Syntax Tree for ECL expression constraints.
///
/// Operands that the grammar restricts are typed accordingly: hierarchy
/// operators wrap a [`FocusConcept`], `^` takes a [`RefsetOperand`], and
/// dotted attributes are [`SubExpressionConstraint`]s.
///
/// # Examples
///
/// ```rust
/// use snomed_ql::{parse_ecl, ExpressionConstraint, SubExpressionConstraint};
///
/// let expr = parse_ecl("<< 404684003").unwrap();
/// assert!(matches!(
///     expr,
///     ExpressionConstraint::SubExpression(SubExpressionConstraint::DescendantOrSelfOf(_))
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpressionConstraint {
    /// `expression OR expression`
    Or(Box<ExpressionConstraint>, Box<ExpressionConstraint>),
    /// `expression AND expression` or `expression , expression`
    And(Box<ExpressionConstraint>, Box<ExpressionConstraint>),
    /// `expression MINUS expression` (at most one per nesting level)
    Exclusion(Box<ExpressionConstraint>, Box<ExpressionConstraint>),

    /// Refined expression: `focus : refinement`
    /// Example: `< 19829001 : 116676008 = << 79654002`
    Refined {
        /// The focus expression.
        constraint: Box<ExpressionConstraint>,
        /// The refinement clause.
        refinement: Refinement,
    },

    /// Attribute navigation: `expression . attribute`
    /// Example: `< 125605004 . 363698007`
    Dotted {
        /// The source expression.
        constraint: Box<ExpressionConstraint>,
        /// The attribute to navigate along.
        attribute: SubExpressionConstraint,
    },

    /// A focus concept, optionally behind a hierarchy operator.
    SubExpression(SubExpressionConstraint),
}

impl ExpressionConstraint {
    /// Creates a new concept reference expression.
    pub fn concept(id: SctId) -> Self {
        FocusConcept::concept(id).into()
    }

    /// Creates a new concept reference expression with a term.
    pub fn concept_with_term(id: SctId, term: impl Into<String>) -> Self {
        FocusConcept::concept_with_term(id, term).into()
    }

    /// Creates the wildcard expression `*`.
    pub fn any() -> Self {
        FocusConcept::Any.into()
    }

    /// Creates a child-of expression.
    pub fn child_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::ChildOf(focus).into()
    }

    /// Creates a descendant-of expression.
    pub fn descendant_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::DescendantOf(focus).into()
    }

    /// Creates a descendant-or-self-of expression.
    pub fn descendant_or_self_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::DescendantOrSelfOf(focus).into()
    }

    /// Creates a parent-of expression.
    pub fn parent_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::ParentOf(focus).into()
    }

    /// Creates an ancestor-of expression.
    pub fn ancestor_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::AncestorOf(focus).into()
    }

    /// Creates an ancestor-or-self-of expression.
    pub fn ancestor_or_self_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::AncestorOrSelfOf(focus).into()
    }

    /// Creates a member-of expression.
    pub fn member_of(refset: RefsetOperand) -> Self {
        FocusConcept::MemberOf(refset).into()
    }

    /// Creates a parenthesized expression.
    pub fn nested(inner: ExpressionConstraint) -> Self {
        FocusConcept::nested(inner).into()
    }

    /// Creates an OR expression.
    pub fn or(left: ExpressionConstraint, right: ExpressionConstraint) -> Self {
        ExpressionConstraint::Or(Box::new(left), Box::new(right))
    }

    /// Creates an AND expression.
    pub fn and(left: ExpressionConstraint, right: ExpressionConstraint) -> Self {
        ExpressionConstraint::And(Box::new(left), Box::new(right))
    }

    /// Creates a MINUS expression.
    pub fn exclusion(left: ExpressionConstraint, right: ExpressionConstraint) -> Self {
        ExpressionConstraint::Exclusion(Box::new(left), Box::new(right))
    }

    /// Creates a refined expression.
    pub fn refined(constraint: ExpressionConstraint, refinement: Refinement) -> Self {
        ExpressionConstraint::Refined {
            constraint: Box::new(constraint),
            refinement,
        }
    }

    /// Creates a dotted attribute navigation.
    pub fn dotted(
        constraint: ExpressionConstraint,
        attribute: impl Into<SubExpressionConstraint>,
    ) -> Self {
        ExpressionConstraint::Dotted {
            constraint: Box::new(constraint),
            attribute: attribute.into(),
        }
    }

    /// Returns the sub-expression if this is neither compound, refined nor dotted.
    pub fn as_sub_expression(&self) -> Option<&SubExpressionConstraint> {
        match self {
            ExpressionConstraint::SubExpression(sub) => Some(sub),
            _ => None,
        }
    }

    /// Returns true if this is a simple concept reference.
    pub fn is_concept_reference(&self) -> bool {
        self.as_concept_id().is_some()
    }

    /// Returns true if this expression is a hierarchy operator.
    pub fn has_hierarchy_operator(&self) -> bool {
        self.as_sub_expression()
            .is_some_and(SubExpressionConstraint::has_hierarchy_operator)
    }

    /// Returns true if this is a compound expression (OR, AND, MINUS).
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            ExpressionConstraint::Or(_, _)
                | ExpressionConstraint::And(_, _)
                | ExpressionConstraint::Exclusion(_, _)
        )
    }

    /// Returns the concept ID if this is a simple concept reference.
    pub fn as_concept_id(&self) -> Option<SctId> {
        self.as_sub_expression()
            .and_then(SubExpressionConstraint::as_concept_id)
    }

    /// Unwraps nested expressions to get the inner expression.
    pub fn unwrap_nested(&self) -> &ExpressionConstraint {
        match self {
            ExpressionConstraint::SubExpression(SubExpressionConstraint::Focus(
                FocusConcept::Nested(inner),
            )) => inner.unwrap_nested(),
            other => other,
        }
    }
}

impl From<SubExpressionConstraint> for ExpressionConstraint {
    fn from(sub: SubExpressionConstraint) -> Self {
        ExpressionConstraint::SubExpression(sub)
    }
}

impl From<FocusConcept> for ExpressionConstraint {
    fn from(focus: FocusConcept) -> Self {
        ExpressionConstraint::SubExpression(SubExpressionConstraint::Focus(focus))
    }
}

/// A focus concept with at most one hierarchy operator in front.
///
/// Used on its own, as a dotted attribute, as the attribute of a refinement
/// and as the value of an attribute comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubExpressionConstraint {
    /// `<! focus`
    ChildOf(FocusConcept),
    /// `< focus`
    DescendantOf(FocusConcept),
    /// `<< focus`
    DescendantOrSelfOf(FocusConcept),
    /// `>! focus`
    ParentOf(FocusConcept),
    /// `> focus`
    AncestorOf(FocusConcept),
    /// `>> focus`
    AncestorOrSelfOf(FocusConcept),
    /// No hierarchy operator.
    Focus(FocusConcept),
}

impl SubExpressionConstraint {
    /// A bare concept reference.
    pub fn concept(id: SctId) -> Self {
        FocusConcept::concept(id).into()
    }

    /// Creates a child-of sub-expression.
    pub fn child_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::ChildOf(focus)
    }

    /// Creates a descendant-of sub-expression.
    pub fn descendant_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::DescendantOf(focus)
    }

    /// Creates a descendant-or-self-of sub-expression.
    pub fn descendant_or_self_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::DescendantOrSelfOf(focus)
    }

    /// Creates a parent-of sub-expression.
    pub fn parent_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::ParentOf(focus)
    }

    /// Creates an ancestor-of sub-expression.
    pub fn ancestor_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::AncestorOf(focus)
    }

    /// Creates an ancestor-or-self-of sub-expression.
    pub fn ancestor_or_self_of(focus: FocusConcept) -> Self {
        SubExpressionConstraint::AncestorOrSelfOf(focus)
    }

    /// The focus concept, with any operator stripped.
    pub fn focus(&self) -> &FocusConcept {
        use SubExpressionConstraint::*;
        match self {
            ChildOf(focus) | DescendantOf(focus) | DescendantOrSelfOf(focus) | ParentOf(focus)
            | AncestorOf(focus) | AncestorOrSelfOf(focus) | Focus(focus) => focus,
        }
    }

    /// Returns true unless this is a bare focus concept.
    pub fn has_hierarchy_operator(&self) -> bool {
        !matches!(self, SubExpressionConstraint::Focus(_))
    }

    /// Returns the concept ID if this is a bare concept reference.
    pub fn as_concept_id(&self) -> Option<SctId> {
        match self {
            SubExpressionConstraint::Focus(focus) => focus.as_concept_id(),
            _ => None,
        }
    }
}

impl From<FocusConcept> for SubExpressionConstraint {
    fn from(focus: FocusConcept) -> Self {
        SubExpressionConstraint::Focus(focus)
    }
}

/// The operand of a hierarchy operator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusConcept {
    /// Reference set membership: `^ refset`
    MemberOf(RefsetOperand),
    /// A single concept: `404684003` or `404684003 |Clinical finding|`
    ConceptReference(ConceptReference),
    /// Wildcard matching any concept: `*`
    Any,
    /// Parenthesized expression.
    Nested(Box<ExpressionConstraint>),
}

impl FocusConcept {
    /// Creates a concept reference.
    pub fn concept(id: SctId) -> Self {
        FocusConcept::ConceptReference(ConceptReference::new(id))
    }

    /// Creates a concept reference with a term.
    pub fn concept_with_term(id: SctId, term: impl Into<String>) -> Self {
        FocusConcept::ConceptReference(ConceptReference::with_term(id, term))
    }

    /// Creates a member-of focus.
    pub fn member_of(refset: RefsetOperand) -> Self {
        FocusConcept::MemberOf(refset)
    }

    /// Creates a parenthesized focus.
    pub fn nested(inner: ExpressionConstraint) -> Self {
        FocusConcept::Nested(Box::new(inner))
    }

    /// Returns the concept ID if this is a concept reference.
    pub fn as_concept_id(&self) -> Option<SctId> {
        match self {
            FocusConcept::ConceptReference(concept) => Some(concept.id),
            _ => None,
        }
    }
}

/// The operand of `^`. Hierarchy operators are not allowed here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefsetOperand {
    /// A reference set concept.
    ConceptReference(ConceptReference),
    /// `^ *`
    Any,
    /// `^ ( expression )`
    Nested(Box<ExpressionConstraint>),
}

impl RefsetOperand {
    /// Creates a reference set concept operand.
    pub fn concept(id: SctId) -> Self {
        RefsetOperand::ConceptReference(ConceptReference::new(id))
    }

    /// Creates a reference set concept operand with a term.
    pub fn concept_with_term(id: SctId, term: impl Into<String>) -> Self {
        RefsetOperand::ConceptReference(ConceptReference::with_term(id, term))
    }

    /// Creates a parenthesized operand.
    pub fn nested(inner: ExpressionConstraint) -> Self {
        RefsetOperand::Nested(Box::new(inner))
    }
}

/// A concept identifier with its optional `|term|`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConceptReference {
    /// The SNOMED CT concept ID.
    pub id: SctId,
    /// Optional term in pipe notation; kept verbatim for display only.
    pub term: Option<String>,
}

impl ConceptReference {
    /// Creates a reference without a term.
    pub fn new(id: SctId) -> Self {
        Self { id, term: None }
    }

    /// Creates a reference with a term.
    pub fn with_term(id: SctId, term: impl Into<String>) -> Self {
        Self {
            id,
            term: Some(term.into()),
        }
    }
}

// =============================================================================
// Refinements
// =============================================================================

/// Refinement clause following `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Refinement {
    /// `refinement OR refinement`
    Or(Box<Refinement>, Box<Refinement>),
    /// `refinement AND refinement` or `refinement , refinement`
    And(Box<Refinement>, Box<Refinement>),
    /// A single attribute constraint.
    Attribute(AttributeConstraint),
    /// `card? { attribute set }`
    Group(AttributeGroup),
    /// `( refinement )`
    Nested(Box<Refinement>),
}

impl Refinement {
    /// Creates an OR refinement.
    pub fn or(left: Refinement, right: Refinement) -> Self {
        Refinement::Or(Box::new(left), Box::new(right))
    }

    /// Creates an AND refinement.
    pub fn and(left: Refinement, right: Refinement) -> Self {
        Refinement::And(Box::new(left), Box::new(right))
    }

    /// Creates a parenthesized refinement.
    pub fn nested(inner: Refinement) -> Self {
        Refinement::Nested(Box::new(inner))
    }

    /// Unwraps parenthesized refinements.
    pub fn unwrap_nested(&self) -> &Refinement {
        match self {
            Refinement::Nested(inner) => inner.unwrap_nested(),
            other => other,
        }
    }
}

impl From<AttributeConstraint> for Refinement {
    fn from(attribute: AttributeConstraint) -> Self {
        Refinement::Attribute(attribute)
    }
}

impl From<AttributeGroup> for Refinement {
    fn from(group: AttributeGroup) -> Self {
        Refinement::Group(group)
    }
}

/// Contents of an attribute group's braces.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeSet {
    /// `set OR set`
    Or(Box<AttributeSet>, Box<AttributeSet>),
    /// `set AND set` or `set , set`
    And(Box<AttributeSet>, Box<AttributeSet>),
    /// A single attribute constraint.
    Attribute(AttributeConstraint),
    /// `( attribute set )`
    Nested(Box<AttributeSet>),
}

impl AttributeSet {
    /// Creates an OR attribute set.
    pub fn or(left: AttributeSet, right: AttributeSet) -> Self {
        AttributeSet::Or(Box::new(left), Box::new(right))
    }

    /// Creates an AND attribute set.
    pub fn and(left: AttributeSet, right: AttributeSet) -> Self {
        AttributeSet::And(Box::new(left), Box::new(right))
    }

    /// Creates a parenthesized attribute set.
    pub fn nested(inner: AttributeSet) -> Self {
        AttributeSet::Nested(Box::new(inner))
    }
}

impl From<AttributeConstraint> for AttributeSet {
    fn from(attribute: AttributeConstraint) -> Self {
        AttributeSet::Attribute(attribute)
    }
}

/// A single attribute constraint within a refinement.
///
/// Example: `[1..*] R 363698007 |Finding site| = << 39057004`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeConstraint {
    /// Optional cardinality constraint.
    pub cardinality: Option<Cardinality>,
    /// Whether the relationship direction is reversed (`R`).
    pub reversed: bool,
    /// The attribute, as a sub-expression constraint.
    pub attribute: SubExpressionConstraint,
    /// The comparison applied to attribute values.
    pub comparison: Comparison,
}

impl AttributeConstraint {
    /// Creates an attribute constraint without cardinality or reversal.
    pub fn new(attribute: impl Into<SubExpressionConstraint>, comparison: Comparison) -> Self {
        Self {
            cardinality: None,
            reversed: false,
            attribute: attribute.into(),
            comparison,
        }
    }

    /// Sets the cardinality.
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = Some(cardinality);
        self
    }

    /// Marks the constraint as reversed.
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }
}

/// Attribute constraints that must hold within one relationship group.
///
/// Example: `[0..1] { 363698007 = << 39057004, 116676008 = << 415582006 }`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeGroup {
    /// Optional cardinality for the group itself.
    pub cardinality: Option<Cardinality>,
    /// The attributes inside the braces.
    pub attributes: AttributeSet,
}

impl AttributeGroup {
    /// Creates a group without cardinality.
    pub fn new(attributes: AttributeSet) -> Self {
        Self {
            cardinality: None,
            attributes,
        }
    }

    /// Sets the cardinality.
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = Some(cardinality);
        self
    }
}

// =============================================================================
// Literals and cardinality
// =============================================================================

/// A non-negative integer kept as written.
///
/// No leading zeros except the literal `0`; no range check is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NonNegativeInteger(String);

impl NonNegativeInteger {
    /// Wraps digit text already validated by the parser.
    pub fn new(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    /// The digits as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value, or None if it does not fit in a u64.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for NonNegativeInteger {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for NonNegativeInteger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upper bound of a cardinality.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaxValue {
    /// A numeric bound.
    Bounded(NonNegativeInteger),
    /// `*`
    Unbounded,
}

/// Cardinality constraint: `[min..max]`.
///
/// `min <= max` is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cardinality {
    /// Minimum occurrences.
    pub min: NonNegativeInteger,
    /// Maximum occurrences.
    pub max: MaxValue,
}

impl Cardinality {
    /// Creates a cardinality constraint.
    pub fn new(min: NonNegativeInteger, max: MaxValue) -> Self {
        Self { min, max }
    }

    /// `[min..max]`
    pub fn bounded(min: u64, max: u64) -> Self {
        Self {
            min: min.into(),
            max: MaxValue::Bounded(max.into()),
        }
    }

    /// `[min..*]`
    pub fn at_least(min: u64) -> Self {
        Self {
            min: min.into(),
            max: MaxValue::Unbounded,
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.max {
            MaxValue::Bounded(max) => write!(f, "[{}..{}]", self.min, max),
            MaxValue::Unbounded => write!(f, "[{}..*]", self.min),
        }
    }
}

/// A signed decimal kept as written, e.g. `-1.5` or `12.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decimal(String);

impl Decimal {
    /// Wraps decimal text already validated by the parser.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The literal as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value as a float.
    pub fn to_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Comparisons
// =============================================================================

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonOperator {
    /// Equal: `=`
    Equal,
    /// Not equal: `!=`
    NotEqual,
    /// Less than: `<`
    LessThan,
    /// Less than or equal: `<=`
    LessThanOrEqual,
    /// Greater than: `>`
    GreaterThan,
    /// Greater than or equal: `>=`
    GreaterThanOrEqual,
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonOperator::Equal => write!(f, "="),
            ComparisonOperator::NotEqual => write!(f, "!="),
            ComparisonOperator::LessThan => write!(f, "<"),
            ComparisonOperator::LessThanOrEqual => write!(f, "<="),
            ComparisonOperator::GreaterThan => write!(f, ">"),
            ComparisonOperator::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// Right-hand side of an attribute constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparison {
    /// Compared against a concept expression.
    Attribute(AttributeComparison),
    /// Compared against a string, integer or decimal value.
    DataType(DataTypeComparison),
}

impl Comparison {
    /// The comparison operator.
    pub fn operator(&self) -> ComparisonOperator {
        match self {
            Comparison::Attribute(c) => c.operator(),
            Comparison::DataType(c) => c.operator(),
        }
    }
}

impl From<AttributeComparison> for Comparison {
    fn from(comparison: AttributeComparison) -> Self {
        Comparison::Attribute(comparison)
    }
}

impl From<DataTypeComparison> for Comparison {
    fn from(comparison: DataTypeComparison) -> Self {
        Comparison::DataType(comparison)
    }
}

/// `= expression` or `!= expression`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeComparison {
    /// `= expression`
    Equals(SubExpressionConstraint),
    /// `!= expression`
    NotEquals(SubExpressionConstraint),
}

impl AttributeComparison {
    /// Creates an equality comparison.
    pub fn equals(value: impl Into<SubExpressionConstraint>) -> Self {
        AttributeComparison::Equals(value.into())
    }

    /// Creates an inequality comparison.
    pub fn not_equals(value: impl Into<SubExpressionConstraint>) -> Self {
        AttributeComparison::NotEquals(value.into())
    }

    /// The comparison operator.
    pub fn operator(&self) -> ComparisonOperator {
        match self {
            AttributeComparison::Equals(_) => ComparisonOperator::Equal,
            AttributeComparison::NotEquals(_) => ComparisonOperator::NotEqual,
        }
    }

    /// The sub-expression compared against.
    pub fn value(&self) -> &SubExpressionConstraint {
        match self {
            AttributeComparison::Equals(value) | AttributeComparison::NotEquals(value) => value,
        }
    }
}

/// Comparison against a typed value.
///
/// Strings only support `=` and `!=`; numbers (written after `#`) support all
/// six operators.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataTypeComparison {
    /// `= "text"`
    StringEquals(String),
    /// `!= "text"`
    StringNotEquals(String),
    /// `= #n`
    IntegerEquals(i64),
    /// `!= #n`
    IntegerNotEquals(i64),
    /// `> #n`
    IntegerGreaterThan(i64),
    /// `>= #n`
    IntegerGreaterThanEquals(i64),
    /// `< #n`
    IntegerLessThan(i64),
    /// `<= #n`
    IntegerLessThanEquals(i64),
    /// `= #d.d`
    DecimalEquals(Decimal),
    /// `!= #d.d`
    DecimalNotEquals(Decimal),
    /// `> #d.d`
    DecimalGreaterThan(Decimal),
    /// `>= #d.d`
    DecimalGreaterThanEquals(Decimal),
    /// `< #d.d`
    DecimalLessThan(Decimal),
    /// `<= #d.d`
    DecimalLessThanEquals(Decimal),
}

impl DataTypeComparison {
    /// Builds an integer comparison for any operator.
    pub fn integer(operator: ComparisonOperator, value: i64) -> Self {
        match operator {
            ComparisonOperator::Equal => DataTypeComparison::IntegerEquals(value),
            ComparisonOperator::NotEqual => DataTypeComparison::IntegerNotEquals(value),
            ComparisonOperator::GreaterThan => DataTypeComparison::IntegerGreaterThan(value),
            ComparisonOperator::GreaterThanOrEqual => {
                DataTypeComparison::IntegerGreaterThanEquals(value)
            }
            ComparisonOperator::LessThan => DataTypeComparison::IntegerLessThan(value),
            ComparisonOperator::LessThanOrEqual => DataTypeComparison::IntegerLessThanEquals(value),
        }
    }

    /// Builds a decimal comparison for any operator.
    pub fn decimal(operator: ComparisonOperator, value: Decimal) -> Self {
        match operator {
            ComparisonOperator::Equal => DataTypeComparison::DecimalEquals(value),
            ComparisonOperator::NotEqual => DataTypeComparison::DecimalNotEquals(value),
            ComparisonOperator::GreaterThan => DataTypeComparison::DecimalGreaterThan(value),
            ComparisonOperator::GreaterThanOrEqual => {
                DataTypeComparison::DecimalGreaterThanEquals(value)
            }
            ComparisonOperator::LessThan => DataTypeComparison::DecimalLessThan(value),
            ComparisonOperator::LessThanOrEqual => DataTypeComparison::DecimalLessThanEquals(value),
        }
    }

    /// The comparison operator.
    pub fn operator(&self) -> ComparisonOperator {
        use DataTypeComparison::*;
        match self {
            StringEquals(_) | IntegerEquals(_) | DecimalEquals(_) => ComparisonOperator::Equal,
            StringNotEquals(_) | IntegerNotEquals(_) | DecimalNotEquals(_) => {
                ComparisonOperator::NotEqual
            }
            IntegerGreaterThan(_) | DecimalGreaterThan(_) => ComparisonOperator::GreaterThan,
            IntegerGreaterThanEquals(_) | DecimalGreaterThanEquals(_) => {
                ComparisonOperator::GreaterThanOrEqual
            }
            IntegerLessThan(_) | DecimalLessThan(_) => ComparisonOperator::LessThan,
            IntegerLessThanEquals(_) | DecimalLessThanEquals(_) => {
                ComparisonOperator::LessThanOrEqual
            }
        }
    }
}
