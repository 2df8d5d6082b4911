//! The sequential scan over a dataset snapshot: chunked for large datasets so
//! a host can surface progress, single-pass otherwise. Batching only affects
//! progress reporting - the outcome is identical either way.

use std::time::{Duration, Instant};

use jsonsift::{FilterGroup, FilterIterator, FilterResult};
use serde::Serialize;
use serde_json::Value;

/// Tuning for the batching strategy. Datasets at or below `batch_threshold`
/// records run as one pass; larger ones run in `batch_size` chunks with a
/// progress notification after each chunk.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub batch_threshold: usize,
    pub batch_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self { Self { batch_threshold: 5000, batch_size: 1000 } }
}

/// Progress snapshot emitted after each completed chunk of a batched scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProgress {
    pub percent_complete: f64,
    pub matched_so_far: usize,
    pub processed_so_far: usize,
    pub total_count: usize,
}

/// Final product of a scan. `matched` preserves the dataset's relative order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub matched: Vec<Value>,
    pub count: usize,
    pub total_count: usize,
    /// Wall-clock scan time, for display and telemetry only.
    pub elapsed: Duration,
}

/// One entry in the ordered event stream of a scan: zero or more progress
/// notifications terminated by exactly one completion or error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScanEvent {
    Progress(ScanProgress),
    Complete(ScanOutcome),
    Error { message: String },
}

/// Filter `data` through `root` sequentially, invoking `on_progress` after
/// each chunk when the dataset is large enough to batch. The dataset and
/// tree are read-only snapshots; an empty dataset returns in constant time.
pub fn scan(data: &[Value], root: &FilterGroup, options: &ScanOptions, mut on_progress: impl FnMut(ScanProgress)) -> ScanOutcome {
    let started = Instant::now();
    let total_count = data.len();
    if total_count == 0 {
        return ScanOutcome { matched: Vec::new(), count: 0, total_count: 0, elapsed: started.elapsed() };
    }

    let batched = total_count > options.batch_threshold;
    let batch_size = if batched { options.batch_size.max(1) } else { total_count };

    let mut matched = Vec::new();
    let mut processed = 0usize;
    let mut results = FilterIterator::new(data.iter(), root.clone());
    while processed < total_count {
        let take = batch_size.min(total_count - processed);
        for result in results.by_ref().take(take) {
            if let FilterResult::Pass(record) = result {
                matched.push(record.clone());
            }
        }
        processed += take;
        if batched {
            on_progress(ScanProgress {
                percent_complete: processed as f64 * 100.0 / total_count as f64,
                matched_so_far: matched.len(),
                processed_so_far: processed,
                total_count,
            });
        }
    }

    let count = matched.len();
    ScanOutcome { matched, count, total_count, elapsed: started.elapsed() }
}
