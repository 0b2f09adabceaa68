//! Performance analytics: per-product rollups, KPI derivation, and
//! date-bucketed chart series over daily metric records.

pub mod analysis;
pub mod format;
pub mod overview;
pub mod ratios;
pub mod rollup;
pub mod series;

pub use analysis::{run_analysis, AnalysisReport, AnalysisRequest, RecordQuery, RecordSource};
pub use overview::{
    product_detail, product_overview, MetricEntryPreview, ProductDetail, ProductOverview,
};
pub use rollup::{compute_rollups, rank, Kpis, ProductRollup, RankBy, RollupReport, Summary};
pub use series::{build_series, ChartRow, SeriesMetric, SeriesReport};
