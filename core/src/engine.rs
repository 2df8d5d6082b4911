//! The driver owning dataset snapshots and the two-phase filter state.

use std::sync::Arc;
use std::time::Duration;

use jsonsift::{conversion, fields, FieldInfo, FilterGroup};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::scan::{scan, ScanEvent, ScanOptions, ScanOutcome};
use crate::task;

/// Drives filter trees over an in-memory dataset.
///
/// The engine keeps two trees: a *pending* tree that edits and imports touch,
/// and an *applied* tree that produced the current results. Only an explicit
/// [`apply`](FilterEngine::apply) copies pending over applied and triggers a
/// scan, so half-finished edits never cost a pass over a large dataset.
///
/// Both apply flavors take `&mut self`, so a second apply cannot start while
/// one is still in flight. There is no cancellation; a started scan runs to
/// completion.
pub struct FilterEngine {
    dataset: Arc<Vec<Value>>,
    fields: Vec<FieldInfo>,
    pending: FilterGroup,
    applied: FilterGroup,
    outcome: ScanOutcome,
    options: ScanOptions,
    progress: Option<mpsc::UnboundedSender<ScanEvent>>,
}

/// The unfiltered dataset presented as a scan result, used before any apply
/// and after reset.
fn identity_outcome(dataset: &Arc<Vec<Value>>) -> ScanOutcome {
    ScanOutcome { matched: dataset.as_ref().clone(), count: dataset.len(), total_count: dataset.len(), elapsed: Duration::ZERO }
}

impl FilterEngine {
    pub fn new(dataset: Vec<Value>) -> Self {
        Self::with_options(dataset, ScanOptions::default())
    }

    pub fn with_options(dataset: Vec<Value>, options: ScanOptions) -> Self {
        let fields = fields::inspect_dataset(&dataset);
        let dataset = Arc::new(dataset);
        let outcome = identity_outcome(&dataset);
        Self {
            dataset,
            fields,
            pending: FilterGroup::default(),
            applied: FilterGroup::default(),
            outcome,
            options,
            progress: None,
        }
    }

    /// Replace the dataset. Fields are re-inspected and the results
    /// republish the new dataset until the next apply; pending and applied
    /// trees are kept as-is.
    pub fn set_dataset(&mut self, dataset: Vec<Value>) {
        self.fields = fields::inspect_dataset(&dataset);
        self.dataset = Arc::new(dataset);
        self.outcome = identity_outcome(&self.dataset);
    }

    pub fn dataset(&self) -> &[Value] { &self.dataset }

    /// Builder metadata for the current dataset.
    pub fn fields(&self) -> &[FieldInfo] { &self.fields }

    pub fn pending(&self) -> &FilterGroup { &self.pending }

    /// Mutable access for tree edits. Edits never touch the applied tree or
    /// the displayed results.
    pub fn pending_mut(&mut self) -> &mut FilterGroup { &mut self.pending }

    pub fn set_pending(&mut self, root: FilterGroup) { self.pending = root; }

    pub fn applied(&self) -> &FilterGroup { &self.applied }

    /// The records matched by the applied tree, in dataset order.
    pub fn results(&self) -> &[Value] { &self.outcome.matched }

    pub fn outcome(&self) -> &ScanOutcome { &self.outcome }

    /// Parse filter text into the pending tree. Rejected input leaves every
    /// piece of engine state untouched.
    pub fn import_pending(&mut self, text: &str) -> Result<(), EngineError> {
        self.pending = conversion::from_text(text)?;
        Ok(())
    }

    pub fn export_pending(&self) -> String { conversion::to_text(&self.pending) }

    pub fn export_applied(&self) -> String { conversion::to_text(&self.applied) }

    /// Subscribe to scan events. Each call replaces the previous
    /// subscription; events from later applies flow to the new receiver.
    pub fn progress_events(&mut self) -> mpsc::UnboundedReceiver<ScanEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.progress = Some(tx);
        rx
    }

    /// Apply the pending tree inline on the caller's thread.
    pub fn apply(&mut self) -> &ScanOutcome {
        debug!(root = %self.pending.id, operator = %self.pending.operator, "applying filter");
        self.applied = self.pending.clone();
        let progress = self.progress.clone();
        let outcome = scan(&self.dataset, &self.applied, &self.options, |update| {
            if let Some(tx) = &progress {
                let _ = tx.send(ScanEvent::Progress(update));
            }
        });
        debug!(matched = outcome.count, total = outcome.total_count, elapsed = ?outcome.elapsed, "scan complete");
        if let Some(tx) = &self.progress {
            let _ = tx.send(ScanEvent::Complete(outcome.clone()));
        }
        self.outcome = outcome;
        &self.outcome
    }

    /// Apply the pending tree on a worker thread, keeping the caller's
    /// thread free for the duration of the scan.
    ///
    /// The worker receives owned snapshots of the dataset and tree - no
    /// shared mutable state crosses the boundary - and produces a result
    /// identical to [`apply`](FilterEngine::apply). If the worker aborts,
    /// the previously applied tree and results stay in place.
    pub async fn apply_background(&mut self) -> Result<&ScanOutcome, EngineError> {
        let candidate = self.pending.clone();
        debug!(root = %candidate.id, operator = %candidate.operator, "applying filter on worker");
        let dataset = Arc::clone(&self.dataset);
        let root = candidate.clone();
        let options = self.options.clone();
        let progress = self.progress.clone();
        let handle = task::spawn_blocking(move || {
            scan(&dataset, &root, &options, |update| {
                if let Some(tx) = &progress {
                    let _ = tx.send(ScanEvent::Progress(update));
                }
            })
        });

        match handle.await {
            Ok(outcome) => {
                debug!(matched = outcome.count, total = outcome.total_count, elapsed = ?outcome.elapsed, "background scan complete");
                if let Some(tx) = &self.progress {
                    let _ = tx.send(ScanEvent::Complete(outcome.clone()));
                }
                self.applied = candidate;
                self.outcome = outcome;
                Ok(&self.outcome)
            }
            Err(join_error) => {
                warn!(error = %join_error, "background scan aborted");
                let message = join_error.to_string();
                if let Some(tx) = &self.progress {
                    let _ = tx.send(ScanEvent::Error { message: message.clone() });
                }
                Err(EngineError::ScanFailed(message))
            }
        }
    }

    /// Clear both trees and republish the unfiltered dataset.
    pub fn reset(&mut self) {
        self.pending = FilterGroup::default();
        self.applied = FilterGroup::default();
        self.outcome = identity_outcome(&self.dataset);
    }
}
