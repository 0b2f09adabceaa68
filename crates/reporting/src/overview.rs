//! Product overview cards and per-product detail totals.

use crate::ratios;
use crate::rollup::{Kpis, Totals};
use chrono::{DateTime, Utc};
use leadboard_core::{MetricRecord, Product, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dashboard card for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOverview {
    pub id: ProductId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub metrics_count: usize,
    pub total_leads: u64,
    pub total_sales: u64,
    pub total_revenue: f64,
    pub net_result: f64,
}

/// One card per product, in the order given. Products with no records in
/// `records` still get a zeroed card.
pub fn product_overview(products: &[Product], records: &[MetricRecord]) -> Vec<ProductOverview> {
    let mut totals: HashMap<ProductId, Totals> = HashMap::new();
    for record in records {
        totals.entry(record.product_id).or_default().add(record);
    }

    products
        .iter()
        .map(|product| {
            let t = totals.get(&product.id).copied().unwrap_or_default();
            ProductOverview {
                id: product.id,
                name: product.name.clone(),
                created_at: product.created_at,
                metrics_count: t.record_count,
                total_leads: t.leads,
                total_sales: t.sales,
                total_revenue: t.revenue,
                net_result: ratios::net_result(t.revenue, t.spend),
            }
        })
        .collect()
}

/// A single record with its own ratios, as listed on the product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordKpis {
    #[serde(flatten)]
    pub record: MetricRecord,
    pub cost_per_lead: f64,
    pub conversion_rate: f64,
    pub return_on_spend: f64,
    pub net_result: f64,
}

impl From<MetricRecord> for RecordKpis {
    fn from(record: MetricRecord) -> Self {
        Self {
            cost_per_lead: ratios::cost_per_lead(record.spend, record.leads),
            conversion_rate: ratios::conversion_rate(record.sales, record.leads),
            return_on_spend: ratios::return_on_spend(record.revenue, record.spend),
            net_result: ratios::net_result(record.revenue, record.spend),
            record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    /// Newest first.
    pub records: Vec<RecordKpis>,
    pub totals: Kpis,
}

pub fn product_detail(product: Product, mut records: Vec<MetricRecord>) -> ProductDetail {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    let totals = Kpis::from(Totals::from_records(&records));
    ProductDetail {
        product,
        records: records.into_iter().map(RecordKpis::from).collect(),
        totals,
    }
}

/// Live ratios shown while a metric entry is being typed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricEntryPreview {
    pub cost_per_lead: f64,
    pub return_on_spend: f64,
}

impl MetricEntryPreview {
    pub fn from_entry(spend: f64, leads: u64, revenue: f64) -> Self {
        Self {
            cost_per_lead: ratios::cost_per_lead(spend, leads),
            return_on_spend: ratios::return_on_spend(revenue, spend),
        }
    }
}
