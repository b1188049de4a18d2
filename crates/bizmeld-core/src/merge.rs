use bizmeld_parser::DeckSummary;
use polars::prelude::DataFrame;

use crate::normalize::RecordFrames;

/// The merge output: six named members, constructed once per pipeline run
/// and immutable afterwards.
///
/// `company_performance` (per-quarter figures from the records source) and
/// `aggregated_performance` (whole-period figures from the report source)
/// are independent views and are deliberately not reconciled.
#[derive(Debug, Clone)]
pub struct CompositeDataset {
    pub company_info: DataFrame,
    pub employee_data: DataFrame,
    pub company_performance: DataFrame,
    /// `None` when the activity source was unavailable at ingest time.
    pub membership_activity: Option<DataFrame>,
    pub aggregated_performance: DataFrame,
    pub presentation: DeckSummary,
}

/// Co-locates the normalized outputs by name. Pure: no joins, no hidden
/// state, deterministic given its inputs.
pub fn merge_sources(
    records: RecordFrames,
    membership_activity: Option<DataFrame>,
    aggregated_performance: DataFrame,
    presentation: DeckSummary,
) -> CompositeDataset {
    CompositeDataset {
        company_info: records.companies,
        employee_data: records.employees,
        company_performance: records.performance,
        membership_activity,
        aggregated_performance,
        presentation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_records;
    use serde_json::json;

    #[test]
    fn members_are_colocated_without_reconciliation() {
        let frames = normalize_records(&json!({
            "companies": [{
                "id": 1,
                "performance": {"Q1": {"revenue": 100}}
            }]
        }))
        .expect("normalize failed");

        let composite = merge_sources(
            frames,
            None,
            DataFrame::default(),
            DeckSummary::default(),
        );

        assert_eq!(composite.company_performance.height(), 1);
        assert_eq!(composite.aggregated_performance.height(), 0);
        assert!(composite.membership_activity.is_none());
    }
}
