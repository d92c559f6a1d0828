//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{IngestEvent, IngestStats};

/// Logs every non-zero ingestion counter, outcomes first, then rejections.
pub fn print_ingest_statistics(stats: &IngestStats) {
    let outcomes: Vec<IngestEvent> = IngestEvent::iter().filter(|e| !e.is_rejection()).collect();
    if outcomes.iter().any(|e| stats.get(*e) > 0) {
        info!("Ingestion Counts:");
        for event in outcomes {
            let count = stats.get(event);
            if count > 0 {
                info!("   {}: {}", event.as_str(), count);
            }
        }
    }

    let total_rejected = stats.total_rejected();
    if total_rejected > 0 {
        info!("Rejection Counts ({} total):", total_rejected);
        for event in IngestEvent::iter().filter(IngestEvent::is_rejection) {
            let count = stats.get(event);
            if count > 0 {
                info!("   {}: {}", event.as_str(), count);
            }
        }
    }
}
