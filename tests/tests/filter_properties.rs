
use jsonsift::ast::{ComparisonOperator, FilterCondition, FilterGroup, GroupOperator};
use jsonsift::{evaluate_group, from_text, to_text};
use jsonsift_core::{scan, ScanOptions};
use serde_json::json;

fn condition(field: &str, operator: ComparisonOperator, value: serde_json::Value) -> FilterCondition {
    FilterCondition::new(field, operator, value)
}

#[test]
fn identity_filter_returns_the_whole_dataset_in_order() {
    let data = common::job_records();
    let outcome = scan(&data, &FilterGroup::default(), &ScanOptions::default(), |_| {});
    assert_eq!(outcome.matched, data);
    assert_eq!(outcome.count, data.len());
    assert_eq!(outcome.total_count, data.len());
}

#[test]
fn empty_groups_are_vacuously_true_under_both_operators() {
    let record = json!({ "anything": 1 });
    assert!(evaluate_group(&record, &FilterGroup::new(GroupOperator::And)));
    assert!(evaluate_group(&record, &FilterGroup::new(GroupOperator::Or)));
}

/// Negate every condition's operator and flip AND/OR on every group.
fn complement(group: &FilterGroup) -> FilterGroup {
    use ComparisonOperator::*;
    let mut flipped = group.clone();
    flipped.operator = match group.operator {
        GroupOperator::And => GroupOperator::Or,
        GroupOperator::Or => GroupOperator::And,
    };
    for cond in &mut flipped.conditions {
        cond.operator = match cond.operator {
            Equals => NotEquals,
            NotEquals => Equals,
            Contains => NotContains,
            NotContains => Contains,
            In => NotIn,
            NotIn => In,
            Exists => NotExists,
            NotExists => Exists,
            other => other,
        };
    }
    flipped.groups = group.groups.iter().map(complement).collect();
    flipped
}

#[test]
fn de_morgan_complement_splits_the_dataset() {
    let data = common::job_records();
    let mut root = FilterGroup::new(GroupOperator::And);
    root.conditions.push(condition("owner", ComparisonOperator::Equals, json!("admin")));
    let mut nested = FilterGroup::new(GroupOperator::Or);
    nested.conditions.push(condition("status", ComparisonOperator::Contains, json!("success")));
    nested.conditions.push(condition("priority", ComparisonOperator::In, json!([1, 2])));
    nested.conditions.push(condition("dependencies", ComparisonOperator::Exists, json!(null)));
    root.groups.push(nested);

    let flipped = complement(&root);
    for record in &data {
        let original = evaluate_group(record, &root);
        let negated = evaluate_group(record, &flipped);
        assert_ne!(original, negated, "complement must invert membership for {record}");
    }
}

#[test]
fn batching_never_changes_the_result() {
    let data = common::job_records();
    let mut root = FilterGroup::new(GroupOperator::Or);
    root.conditions.push(condition("status", ComparisonOperator::Equals, json!("success")));
    root.conditions.push(condition("priority", ComparisonOperator::GreaterThan, json!(4)));

    let by_one = scan(&data, &root, &ScanOptions { batch_threshold: 0, batch_size: 1 }, |_| {});
    let whole = scan(&data, &root, &ScanOptions { batch_threshold: 0, batch_size: data.len() }, |_| {});
    assert_eq!(by_one.matched, whole.matched);
    assert_eq!(by_one.count, whole.count);
    assert_eq!(by_one.total_count, whole.total_count);
}

#[test]
fn filter_text_round_trips_structurally() {
    let mut root = FilterGroup::new(GroupOperator::And);
    root.conditions.push(condition("schedule.days[0]", ComparisonOperator::Equals, json!("MON")));
    let mut nested = FilterGroup::new(GroupOperator::Or);
    nested.conditions.push(condition("priority", ComparisonOperator::LessThan, json!(3)));
    nested.conditions.push(condition("owner", ComparisonOperator::NotExists, json!(null)));
    root.groups.push(nested);

    let text = to_text(&root);
    assert_eq!(from_text(&text).unwrap(), root);
}

#[test]
fn case_insensitive_equality_spans_the_dataset() {
    let data = common::job_records();
    let mut root = FilterGroup::new(GroupOperator::And);
    root.conditions.push(condition("status", ComparisonOperator::Equals, json!("SUCCESS")));
    let outcome = scan(&data, &root, &ScanOptions::default(), |_| {});
    // Matches both "SUCCESS" and "success" records.
    assert_eq!(outcome.count, 2);
}
