
use anyhow::Result;
use jsonsift::ast::{ComparisonOperator, FilterCondition, FilterGroup, GroupOperator};
use jsonsift_core::{FilterEngine, ScanEvent, ScanOptions};
use serde_json::json;

fn condition(field: &str, operator: ComparisonOperator, value: serde_json::Value) -> FilterCondition {
    FilterCondition::new(field, operator, value)
}

/// Root AND [p > 100] with a nested OR [cat = "A", cat = "B"].
fn priced_catalog_filter() -> FilterGroup {
    let mut root = FilterGroup::new(GroupOperator::And);
    root.conditions.push(condition("p", ComparisonOperator::GreaterThan, json!(100)));
    let mut nested = FilterGroup::new(GroupOperator::Or);
    nested.conditions.push(condition("cat", ComparisonOperator::Equals, json!("A")));
    nested.conditions.push(condition("cat", ComparisonOperator::Equals, json!("B")));
    root.groups.push(nested);
    root
}

#[test]
fn end_to_end_nested_and_or_scenario() {
    let mut engine = FilterEngine::new(common::catalog_records());
    engine.set_pending(priced_catalog_filter());
    let outcome = engine.apply();
    assert_eq!(outcome.count, 2);
    assert_eq!(outcome.matched, vec![json!({ "p": 150, "cat": "B" }), json!({ "p": 200, "cat": "A" })]);
    assert_eq!(outcome.total_count, 3);
}

#[test]
fn narrowing_the_nested_or_shrinks_the_match_set() {
    let mut engine = FilterEngine::new(common::catalog_records());
    let mut root = priced_catalog_filter();
    let nested_id = root.groups[0].id.clone();
    let gone = root.groups[0].conditions[1].id.clone();
    assert!(root.remove_condition(&gone));
    assert!(root.find_group(&nested_id).is_some());

    engine.set_pending(root);
    let outcome = engine.apply();
    // Only p > 100 AND cat = "A" remains.
    assert_eq!(outcome.matched, vec![json!({ "p": 200, "cat": "A" })]);
}

#[test]
fn builder_metadata_reflects_the_dataset() {
    let engine = FilterEngine::new(common::job_records());
    let fields = engine.fields();
    let status = fields.iter().find(|f| f.path == "status").unwrap();
    assert_eq!(status.ty, jsonsift::FieldType::String);
    assert!(fields.iter().any(|f| f.path == "schedule.days[0]"));

    let statuses = jsonsift::unique_values(engine.dataset(), "status");
    assert_eq!(statuses, vec![json!("SUCCESS"), json!("RUNNING"), json!("FAILURE"), json!("success")]);
}

#[test]
fn import_rejection_keeps_last_known_good_state() {
    let mut engine = FilterEngine::new(common::catalog_records());
    engine.set_pending(priced_catalog_filter());
    engine.apply();
    assert_eq!(engine.results().len(), 2);

    assert!(engine.import_pending("{\"id\":\"r\",\"operator\":\"NAND\"}").is_err());
    assert_eq!(engine.results().len(), 2);
    assert_eq!(engine.applied(), engine.pending());
}

#[test]
fn reset_restores_the_unfiltered_view() {
    let mut engine = FilterEngine::new(common::catalog_records());
    engine.set_pending(priced_catalog_filter());
    engine.apply();
    engine.reset();
    assert_eq!(engine.results(), common::catalog_records().as_slice());
    assert!(engine.pending().is_empty());
}

#[tokio::test]
async fn background_scan_streams_progress_then_completes() -> Result<()> {
    let data: Vec<serde_json::Value> = (0..120).map(|i| json!({ "seq": i, "keep": i % 3 == 0 })).collect();
    let mut engine = FilterEngine::with_options(data, ScanOptions { batch_threshold: 50, batch_size: 25 });
    let mut events = engine.progress_events();

    let mut root = FilterGroup::new(GroupOperator::And);
    root.conditions.push(condition("keep", ComparisonOperator::Equals, json!(true)));
    engine.set_pending(root);

    let outcome = engine.apply_background().await?;
    assert_eq!(outcome.count, 40);

    let mut progress_updates = 0;
    let mut terminated = false;
    while let Ok(event) = events.try_recv() {
        assert!(!terminated, "events after the terminal event");
        match event {
            ScanEvent::Progress(update) => {
                progress_updates += 1;
                assert_eq!(update.total_count, 120);
                assert!(update.processed_so_far <= 120);
                assert!(update.matched_so_far <= update.processed_so_far);
            }
            ScanEvent::Complete(final_outcome) => {
                terminated = true;
                assert_eq!(final_outcome.count, 40);
                assert_eq!(final_outcome.total_count, 120);
            }
            ScanEvent::Error { message } => panic!("unexpected scan error: {message}"),
        }
    }
    assert!(terminated);
    assert_eq!(progress_updates, 5, "120 records in chunks of 25");
    Ok(())
}

#[tokio::test]
async fn background_and_inline_scans_agree() -> Result<()> {
    let data = common::job_records();
    let mut root = FilterGroup::new(GroupOperator::Or);
    root.conditions.push(condition("priority", ComparisonOperator::LessThan, json!(3)));
    root.conditions.push(condition("owner", ComparisonOperator::NotExists, json!(null)));

    let mut inline = FilterEngine::new(data.clone());
    inline.set_pending(root.clone());
    let inline_matched = inline.apply().matched.clone();

    let mut background = FilterEngine::new(data);
    background.set_pending(root);
    let background_outcome = background.apply_background().await?;
    assert_eq!(background_outcome.matched, inline_matched);
    Ok(())
}
