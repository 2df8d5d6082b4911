//! Evaluate filter trees against individual records. This is the scan-side
//! half of the crate: given a record and a condition group, decide membership
//! without pre-indexing or mutating either side.

use std::cmp::Ordering;

use serde_json::Value;

use crate::ast::{ComparisonOperator, FilterCondition, FilterGroup, GroupOperator};
use crate::path;

/// Trait for items a filter tree can be evaluated against.
pub trait Filterable {
    /// Read the value at a field path, or `None` when the path is absent.
    fn value(&self, field_path: &str) -> Option<&Value>;
}

impl Filterable for Value {
    fn value(&self, field_path: &str) -> Option<&Value> { path::resolve(self, field_path) }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn value(&self, field_path: &str) -> Option<&Value> { (**self).value(field_path) }
}

/// Equality within a type family: strings compare case-insensitively, numbers
/// numerically across integer/float representations, everything else
/// structurally. Cross-family pairings are never equal - no string/number
/// coercion.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(a), Value::String(b)) => a.to_lowercase() == b.to_lowercase(),
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => left == right,
    }
}

/// Ordering for greaterThan/lessThan: numbers numerically, strings
/// lexicographically. Any other pairing is unordered.
fn compare_order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Coerce a condition value to text for the contains family: strings
/// verbatim, anything else via its JSON rendering.
fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Evaluate one leaf comparison against a record.
///
/// Total by construction: a missing field satisfies only `notExists`, and an
/// operator applied to a value kind it cannot judge evaluates to `false`
/// (`notContains` being the deliberate exception - a non-string trivially
/// does not contain anything).
pub fn evaluate_condition<I: Filterable>(item: &I, condition: &FilterCondition) -> bool {
    let Some(actual) = item.value(&condition.field) else {
        return condition.operator == ComparisonOperator::NotExists;
    };
    let value = &condition.value;

    match condition.operator {
        ComparisonOperator::Equals => values_equal(actual, value),
        ComparisonOperator::NotEquals => !values_equal(actual, value),
        ComparisonOperator::Contains => match actual {
            Value::String(s) => s.to_lowercase().contains(&coerce_text(value).to_lowercase()),
            _ => false,
        },
        ComparisonOperator::NotContains => match actual {
            Value::String(s) => !s.to_lowercase().contains(&coerce_text(value).to_lowercase()),
            _ => true,
        },
        ComparisonOperator::GreaterThan => compare_order(actual, value) == Some(Ordering::Greater),
        ComparisonOperator::LessThan => compare_order(actual, value) == Some(Ordering::Less),
        ComparisonOperator::In => match value {
            Value::Array(candidates) => candidates.iter().any(|candidate| values_equal(actual, candidate)),
            _ => false,
        },
        // Like `in`, a non-array value fails the membership test outright.
        ComparisonOperator::NotIn => match value {
            Value::Array(candidates) => !candidates.iter().any(|candidate| values_equal(actual, candidate)),
            _ => false,
        },
        // Resolution already succeeded, so the field exists - even when null.
        ComparisonOperator::Exists => true,
        ComparisonOperator::NotExists => false,
        ComparisonOperator::StartsWith => match actual {
            Value::String(s) => s.to_lowercase().starts_with(&coerce_text(value).to_lowercase()),
            _ => false,
        },
        ComparisonOperator::EndsWith => match actual {
            Value::String(s) => s.to_lowercase().ends_with(&coerce_text(value).to_lowercase()),
            _ => false,
        },
    }
}

/// Evaluate a group against one record, recursing through nested groups.
///
/// Conditions are visited in order, then nested groups. A group with no
/// children matches unconditionally, whatever its operator. Short-circuiting
/// is safe because evaluation has no side effects.
pub fn evaluate_group<I: Filterable>(item: &I, group: &FilterGroup) -> bool {
    if group.is_empty() {
        return true;
    }

    let mut results = group
        .conditions
        .iter()
        .map(|condition| evaluate_condition(item, condition))
        .chain(group.groups.iter().map(|nested| evaluate_group(item, nested)));

    match group.operator {
        GroupOperator::And => results.all(|matched| matched),
        GroupOperator::Or => results.any(|matched| matched),
    }
}

#[derive(Debug, PartialEq)]
pub enum FilterResult<R> {
    Pass(R),
    Skip(R),
}

/// Wrap an iterator of records, tagging each as passing or skipping the
/// filter tree. Evaluation is total, so every input item yields a result.
pub struct FilterIterator<I> {
    iter: I,
    root: FilterGroup,
}

impl<I, R> FilterIterator<I>
where
    I: Iterator<Item = R>,
    R: Filterable,
{
    pub fn new(iter: I, root: FilterGroup) -> Self { Self { iter, root } }
}

impl<I, R> Iterator for FilterIterator<I>
where
    I: Iterator<Item = R>,
    R: Filterable,
{
    type Item = FilterResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|item| {
            if evaluate_group(&item, &self.root) {
                FilterResult::Pass(item)
            } else {
                FilterResult::Skip(item)
            }
        })
    }
}
