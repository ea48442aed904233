//! Parsing many independent queries.
//!
//! Each input gets its own token vector and parser, so nothing is shared
//! between parses. With the `parallel` feature the inputs are spread across
//! the rayon thread pool.

use crate::ast::Query;
use crate::config::ParserConfig;
use crate::error::QlResult;
use crate::parser::parse_with_config;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Parse a batch of queries. Results are returned in input order.
///
/// ```rust
/// use snomed_ql::{parse_batch, ParserConfig};
///
/// let results = parse_batch(&["active = true", "ecl = ("], &ParserConfig::default());
/// assert!(results[0].is_ok());
/// assert!(results[1].is_err());
/// ```
pub fn parse_batch<S>(inputs: &[S], config: &ParserConfig) -> Vec<QlResult<Query>>
where
    S: AsRef<str> + Sync,
{
    tracing::debug!(count = inputs.len(), "parsing query batch");

    #[cfg(feature = "parallel")]
    let results: Vec<QlResult<Query>> = inputs
        .par_iter()
        .map(|input| parse_with_config(input.as_ref(), config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<QlResult<Query>> = inputs
        .iter()
        .map(|input| parse_with_config(input.as_ref(), config))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    tracing::debug!(count = inputs.len(), failed, "query batch parsed");
    results
}
