//! Bulk preview refresh.
//!
//! Fans a capped batch of link ids out in fixed-size chunks. Chunking
//! bounds the number of simultaneously in-flight requests; it carries no
//! ordering semantics, and links within a chunk resolve concurrently and
//! independently — one link's failure never aborts the batch. Only
//! structurally invalid input (empty batch, oversized batch, malformed
//! ids) rejects the whole call, and it does so before any fetch starts.

use std::collections::HashMap;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::PreviewError;
use crate::metadata::PreviewStatus;
use crate::service::{PreviewService, RefreshOutcome};

/// Hard ceiling on ids per call. Larger sets are the caller's to chunk
/// across calls; silently truncating here would misreport completion.
pub const MAX_BATCH_SIZE: usize = 20;

/// Links resolved concurrently at a time.
const CHUNK_SIZE: usize = 5;

/// Aggregate result of a batch refresh.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Per-link outcome, keyed by link id.
    pub outcomes: HashMap<String, RefreshOutcome>,
    /// Links actually processed (equals `outcomes.len()`).
    pub processed: usize,
    /// Links requested.
    pub total: usize,
}

impl PreviewService {
    /// Refresh up to [`MAX_BATCH_SIZE`] links, returning per-link results.
    pub async fn batch_refresh(
        &self,
        link_ids: &[String],
    ) -> Result<BatchReport, PreviewError> {
        validate(link_ids)?;

        let mut outcomes = HashMap::with_capacity(link_ids.len());
        for chunk in link_ids.chunks(CHUNK_SIZE) {
            let resolved = join_all(chunk.iter().map(|id| async move {
                (id.clone(), self.force_refresh(id).await)
            }))
            .await;

            for (id, result) in resolved {
                let outcome = match result {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        // Per-link errors (unknown id, store failure)
                        // become failed outcomes, not batch failures.
                        warn!(link_id = %id, "batch refresh entry failed: {err}");
                        RefreshOutcome {
                            metadata: None,
                            status: PreviewStatus::Failed,
                            refreshed: false,
                        }
                    }
                };
                outcomes.insert(id, outcome);
            }
        }

        let report = BatchReport {
            processed: outcomes.len(),
            total: link_ids.len(),
            outcomes,
        };
        info!(processed = report.processed, total = report.total, "batch refresh complete");
        Ok(report)
    }
}

fn validate(link_ids: &[String]) -> Result<(), PreviewError> {
    if link_ids.is_empty() {
        return Err(PreviewError::EmptyBatch);
    }
    if link_ids.len() > MAX_BATCH_SIZE {
        return Err(PreviewError::BatchTooLarge {
            requested: link_ids.len(),
            max: MAX_BATCH_SIZE,
        });
    }
    if let Some(bad) = link_ids.iter().find(|id| id.trim().is_empty()) {
        return Err(PreviewError::MalformedId(bad.to_string()));
    }
    Ok(())
}
