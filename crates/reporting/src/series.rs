//! Time-bucketed series builder: reshapes records into one row per date with
//! one column per product, for charting ratios over time.

use crate::ratios;
use chrono::NaiveDate;
use leadboard_core::MetricRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One chart row. Products without a record on `date` have no key at all;
/// a present `0.0` is a real measurement. Product names sit next to `date`
/// in the serialized row, which is why `date` is not a valid product name
/// (see [`leadboard_core::types::CHART_DATE_KEY`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl ChartRow {
    pub fn value(&self, product_name: &str) -> Option<f64> {
        self.values.get(product_name).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub conversion_series: Vec<ChartRow>,
    pub cpl_series: Vec<ChartRow>,
    /// Distinct product names in first-seen order.
    pub product_names: Vec<String>,
}

/// Per-record ratio plotted by a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMetric {
    ConversionRate,
    CostPerLead,
}

impl SeriesMetric {
    pub fn value(&self, record: &MetricRecord) -> f64 {
        match self {
            SeriesMetric::ConversionRate => ratios::conversion_rate(record.sales, record.leads),
            SeriesMetric::CostPerLead => ratios::cost_per_lead(record.spend, record.leads),
        }
    }
}

/// Build one series: ratio per record, then the mean of each
/// `(date, product name)` cell. Rows come out sorted by date.
pub fn build_metric_series(records: &[MetricRecord], metric: SeriesMetric) -> Vec<ChartRow> {
    let mut buckets: BTreeMap<NaiveDate, BTreeMap<&str, Vec<f64>>> = BTreeMap::new();
    for record in records {
        buckets
            .entry(record.date)
            .or_default()
            .entry(record.product_name.as_str())
            .or_default()
            .push(metric.value(record));
    }

    buckets
        .into_iter()
        .map(|(date, cells)| ChartRow {
            date,
            values: cells
                .into_iter()
                .filter_map(|(name, values)| {
                    ratios::mean(&values).map(|avg| (name.to_string(), avg))
                })
                .collect(),
        })
        .collect()
}

/// Distinct product names, in the order they first appear.
pub fn product_names(records: &[MetricRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.product_name.as_str()))
        .map(|r| r.product_name.clone())
        .collect()
}

pub fn build_series(records: &[MetricRecord]) -> SeriesReport {
    SeriesReport {
        conversion_series: build_metric_series(records, SeriesMetric::ConversionRate),
        cpl_series: build_metric_series(records, SeriesMetric::CostPerLead),
        product_names: product_names(records),
    }
}
