//! The serialization boundary: filter trees to and from JSON text.

use std::str::FromStr;

use crate::ast::FilterGroup;
use crate::error::ParseError;

/// Render a filter tree as pretty-printed JSON.
///
/// Key order is stable (id, operator, conditions, groups for groups; id,
/// field, operator, value for conditions) so exported filters diff cleanly.
pub fn to_text(root: &FilterGroup) -> String { serde_json::to_string_pretty(root).unwrap_or_default() }

/// Parse filter text into a tree.
///
/// The input must be a JSON object matching the FilterGroup shape; missing
/// `conditions`/`groups`/`value` keys default to empty, but operator tokens
/// outside the closed enums are rejected here rather than deferred to scan
/// time. Field paths and operator/value pairings are not validated - the
/// evaluator handles those fail-soft.
pub fn from_text(text: &str) -> Result<FilterGroup, ParseError> {
    match serde_json::from_str(text) {
        Ok(root) => Ok(root),
        Err(source) => {
            tracing::warn!(%source, "rejected filter text");
            Err(ParseError::Json(source))
        }
    }
}

impl FromStr for FilterGroup {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { from_text(s) }
}
