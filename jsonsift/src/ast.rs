use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ulid::Ulid;

use crate::error::ParseError;
use crate::fields::FieldType;

/// How a group combines the results of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupOperator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl std::fmt::Display for GroupOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupOperator::And => write!(f, "AND"),
            GroupOperator::Or => write!(f, "OR"),
        }
    }
}

/// Leaf comparison operators.
///
/// The enum is closed: filter text carrying an operator outside this set is
/// rejected at parse time rather than evaluating to a silent non-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    In,
    NotIn,
    Exists,
    NotExists,
    StartsWith,
    EndsWith,
}

impl ComparisonOperator {
    /// Whether the operator reads the condition's `value`. `exists` and
    /// `notExists` are decided by path resolution alone.
    pub fn needs_value(&self) -> bool { !matches!(self, ComparisonOperator::Exists | ComparisonOperator::NotExists) }

    /// The operators a builder should offer for a field of the given type.
    ///
    /// Advisory only - the evaluator stays total for any operator/value
    /// pairing, so a tree violating this table still evaluates safely.
    pub fn for_field_type(ty: FieldType) -> &'static [ComparisonOperator] {
        use ComparisonOperator::*;
        match ty {
            FieldType::String => &[Equals, NotEquals, Contains, NotContains, Exists, NotExists, StartsWith, EndsWith],
            FieldType::Number => &[Equals, NotEquals, GreaterThan, LessThan, Exists, NotExists],
            FieldType::Boolean => &[Equals, NotEquals, Exists, NotExists],
            FieldType::Array | FieldType::Object | FieldType::Null => &[Exists, NotExists],
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            ComparisonOperator::Equals => "equals",
            ComparisonOperator::NotEquals => "notEquals",
            ComparisonOperator::Contains => "contains",
            ComparisonOperator::NotContains => "notContains",
            ComparisonOperator::GreaterThan => "greaterThan",
            ComparisonOperator::LessThan => "lessThan",
            ComparisonOperator::In => "in",
            ComparisonOperator::NotIn => "notIn",
            ComparisonOperator::Exists => "exists",
            ComparisonOperator::NotExists => "notExists",
            ComparisonOperator::StartsWith => "startsWith",
            ComparisonOperator::EndsWith => "endsWith",
        };
        f.write_str(token)
    }
}

impl FromStr for ComparisonOperator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "equals" => ComparisonOperator::Equals,
            "notEquals" => ComparisonOperator::NotEquals,
            "contains" => ComparisonOperator::Contains,
            "notContains" => ComparisonOperator::NotContains,
            "greaterThan" => ComparisonOperator::GreaterThan,
            "lessThan" => ComparisonOperator::LessThan,
            "in" => ComparisonOperator::In,
            "notIn" => ComparisonOperator::NotIn,
            "exists" => ComparisonOperator::Exists,
            "notExists" => ComparisonOperator::NotExists,
            "startsWith" => ComparisonOperator::StartsWith,
            "endsWith" => ComparisonOperator::EndsWith,
            other => return Err(ParseError::UnknownOperator(other.to_string())),
        })
    }
}

/// One leaf comparison: a field path, an operator, and the value the operator
/// compares against. `value` is ignored by operators that need none.
///
/// Field declaration order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub id: String,
    pub field: String,
    pub operator: ComparisonOperator,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: ComparisonOperator, value: serde_json::Value) -> Self {
        Self { id: Ulid::new().to_string(), field: field.into(), operator, value }
    }
}

/// A node of the filter tree: an ordered list of conditions plus nested
/// groups, combined with AND or OR. Groups are plain owned values - every
/// edit works on a tree the caller exclusively owns, so pending and applied
/// trees can never share structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub id: String,
    pub operator: GroupOperator,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
    #[serde(default)]
    pub groups: Vec<FilterGroup>,
}

impl FilterGroup {
    pub fn new(operator: GroupOperator) -> Self {
        Self { id: Ulid::new().to_string(), operator, conditions: Vec::new(), groups: Vec::new() }
    }

    /// A group with no children imposes no constraint.
    pub fn is_empty(&self) -> bool { self.conditions.is_empty() && self.groups.is_empty() }

    pub fn find_group(&self, id: &str) -> Option<&FilterGroup> {
        if self.id == id {
            return Some(self);
        }
        self.groups.iter().find_map(|nested| nested.find_group(id))
    }

    pub fn find_group_mut(&mut self, id: &str) -> Option<&mut FilterGroup> {
        if self.id == id {
            return Some(self);
        }
        self.groups.iter_mut().find_map(|nested| nested.find_group_mut(id))
    }

    /// Append a condition to the group with the given id. Returns false when
    /// no such group exists in the tree.
    pub fn add_condition(&mut self, group_id: &str, condition: FilterCondition) -> bool {
        match self.find_group_mut(group_id) {
            Some(group) => {
                group.conditions.push(condition);
                true
            }
            None => false,
        }
    }

    /// Replace the condition carrying the same id, wherever it sits.
    pub fn update_condition(&mut self, condition: &FilterCondition) -> bool {
        if let Some(slot) = self.conditions.iter_mut().find(|existing| existing.id == condition.id) {
            *slot = condition.clone();
            return true;
        }
        self.groups.iter_mut().any(|nested| nested.update_condition(condition))
    }

    pub fn remove_condition(&mut self, condition_id: &str) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|condition| condition.id != condition_id);
        if self.conditions.len() != before {
            return true;
        }
        self.groups.iter_mut().any(|nested| nested.remove_condition(condition_id))
    }

    /// Nest a group under the group with the given id.
    pub fn add_group(&mut self, parent_id: &str, group: FilterGroup) -> bool {
        match self.find_group_mut(parent_id) {
            Some(parent) => {
                parent.groups.push(group);
                true
            }
            None => false,
        }
    }

    /// Remove a nested group. The node this is called on cannot remove itself.
    pub fn remove_group(&mut self, group_id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|nested| nested.id != group_id);
        if self.groups.len() != before {
            return true;
        }
        self.groups.iter_mut().any(|nested| nested.remove_group(group_id))
    }

    pub fn set_operator(&mut self, group_id: &str, operator: GroupOperator) -> bool {
        match self.find_group_mut(group_id) {
            Some(group) => {
                group.operator = operator;
                true
            }
            None => false,
        }
    }
}

impl Default for FilterGroup {
    fn default() -> Self { Self::new(GroupOperator::And) }
}
