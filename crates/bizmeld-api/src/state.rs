use std::sync::Arc;

use bizmeld_core::{CompositeDataset, RawSources};

/// Read-only process-wide state: the composite dataset computed once at
/// startup plus the raw per-source intermediates for the debug endpoints.
///
/// Handlers share it behind an `Arc` and never mutate it; re-ingestion would
/// require swapping the whole `Arc`, not editing members in place.
pub struct AppState {
    pub composite: CompositeDataset,
    pub raw: RawSources,
}

pub type SharedState = Arc<AppState>;
