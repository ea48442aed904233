//! Configuration types for the query parser.

/// Default limit on parenthesis and brace nesting.
///
/// One level of a nested attribute value costs over a dozen recursive calls,
/// so this stays low enough for a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Configuration for lexing and parsing.
///
/// # Example
///
/// ```rust
/// use snomed_ql::ParserConfig;
///
/// let config = ParserConfig::builder()
///     .with_max_depth(32)
///     .with_comments(false)
///     .build();
/// assert_eq!(config.max_depth, Some(32));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of `(`, `{` and `{{` (None = unlimited).
    pub max_depth: Option<usize>,
    /// Whether `//` and `/* */` comments are skipped by the lexer.
    pub comments: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            comments: true,
        }
    }
}

impl ParserConfig {
    /// Creates a new builder for ParserConfig.
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }
}

/// Builder for ParserConfig.
#[derive(Debug, Clone)]
pub struct ParserConfigBuilder {
    max_depth: Option<usize>,
    comments: bool,
}

impl Default for ParserConfigBuilder {
    fn default() -> Self {
        let defaults = ParserConfig::default();
        Self {
            max_depth: defaults.max_depth,
            comments: defaults.comments,
        }
    }
}

impl ParserConfigBuilder {
    /// Sets the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Removes the nesting limit.
    pub fn unlimited_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Enables or disables comment skipping.
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    /// Builds the ParserConfig.
    pub fn build(self) -> ParserConfig {
        ParserConfig {
            max_depth: self.max_depth,
            comments: self.comments,
        }
    }
}
