//! Comparative analysis: fetches one record set for a product selection and
//! runs the rollup calculator and series builder over that same set.

use crate::rollup::{compute_rollups, rank, ProductRollup, RankBy, Summary};
use crate::series::{build_series, SeriesReport};
use leadboard_core::{
    AccountId, DateRange, LeadboardError, LeadboardResult, MetricRecord, ProductId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Filter handed to a [`RecordSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordQuery {
    pub owner: AccountId,
    pub product_ids: Vec<ProductId>,
    #[serde(default)]
    pub range: DateRange,
}

/// Anything that can return metric records for an owner, a product set and
/// an inclusive date range. Omitted range bounds mean "no limit".
pub trait RecordSource {
    fn fetch_records(&self, query: &RecordQuery) -> LeadboardResult<Vec<MetricRecord>>;
}

impl<T: RecordSource + ?Sized> RecordSource for std::sync::Arc<T> {
    fn fetch_records(&self, query: &RecordQuery) -> LeadboardResult<Vec<MetricRecord>> {
        (**self).fetch_records(query)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub owner: AccountId,
    pub product_ids: Vec<ProductId>,
    #[serde(default)]
    pub range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub range: DateRange,
    pub record_count: usize,
    pub summary: Summary,
    /// Rollups in selection order; products without records are left out.
    pub products: Vec<ProductRollup>,
    #[serde(flatten)]
    pub series: SeriesReport,
}

impl AnalysisReport {
    /// Reorder `products` best first by `metric`.
    pub fn rank_products(&mut self, metric: RankBy) {
        self.products = rank(&self.products, metric).into_iter().cloned().collect();
    }
}

/// Run a comparative analysis for the selected products.
///
/// Fails with [`LeadboardError::EmptySelection`] before touching the source
/// when nothing is selected.
pub fn run_analysis<S>(source: &S, request: &AnalysisRequest) -> LeadboardResult<AnalysisReport>
where
    S: RecordSource + ?Sized,
{
    if request.product_ids.is_empty() {
        return Err(LeadboardError::EmptySelection);
    }
    request.range.validate()?;

    let product_ids = dedup_selection(&request.product_ids);
    let query = RecordQuery {
        owner: request.owner,
        product_ids,
        range: request.range,
    };
    let records = source.fetch_records(&query)?;

    debug!(
        owner = %request.owner,
        products = query.product_ids.len(),
        start = ?query.range.start,
        end = ?query.range.end,
        records = records.len(),
        "Running analysis"
    );

    Ok(analyze(&query.product_ids, query.range, &records))
}

/// Pure part of [`run_analysis`]: totals and series over one record set.
pub fn analyze(
    selection: &[ProductId],
    range: DateRange,
    records: &[MetricRecord],
) -> AnalysisReport {
    let mut rollups = compute_rollups(records);
    let products = selection
        .iter()
        .filter_map(|id| rollups.by_product.remove(id))
        .collect();

    AnalysisReport {
        range,
        record_count: records.len(),
        summary: rollups.summary,
        products,
        series: build_series(records),
    }
}

fn dedup_selection(ids: &[ProductId]) -> Vec<ProductId> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
