use shared::{Clock, CoreError, CoreResult};
use std::sync::Arc;
use tracing::{info, warn};

use crate::ranker::{rank_queue, summarize, QueueSummary, RankedEntry};
use crate::source::IntakeSource;

pub struct TriageService<S: IntakeSource, C: Clock> {
    source: Arc<S>,
    clock: Arc<C>,
}

impl<S: IntakeSource, C: Clock> TriageService<S, C> {
    pub fn new(source: Arc<S>, clock: Arc<C>) -> Self {
        Self { source, clock }
    }

    /// Current queue, most urgent first.
    pub async fn queue(&self) -> CoreResult<Vec<RankedEntry>> {
        let entries = self.source.fetch_active().await.map_err(|e| {
            warn!(error = %e, "intake snapshot unavailable");
            CoreError::dependency("intake queue", e)
        })?;

        let now = self.clock.now();
        let ranked = rank_queue(&entries, now);

        for flagged in ranked.iter().filter_map(|r| r.warning.as_ref()) {
            warn!(
                record_id = %flagged.record_id,
                field = flagged.field,
                reason = %flagged.reason,
                "intake record kept with data integrity warning"
            );
        }

        info!(queued = ranked.len(), at = %now, "triage queue ranked");
        Ok(ranked)
    }

    pub async fn queue_with_summary(&self) -> CoreResult<(Vec<RankedEntry>, QueueSummary)> {
        let ranked = self.queue().await?;
        let summary = summarize(&ranked);
        Ok((ranked, summary))
    }
}
