//! Rollup calculator: groups metric records by product and derives KPIs.

use crate::ratios;
use leadboard_core::{MetricRecord, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Accumulator ────────────────────────────────────────────────────────────

/// Raw sums over a set of records. Money accumulates as `f64`, counts as `u64`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub spend: f64,
    pub leads: u64,
    pub sales: u64,
    pub revenue: f64,
    pub record_count: usize,
}

impl Totals {
    pub fn add(&mut self, record: &MetricRecord) {
        self.spend += record.spend;
        self.leads = self.leads.saturating_add(record.leads);
        self.sales = self.sales.saturating_add(record.sales);
        self.revenue += record.revenue;
        self.record_count += 1;
    }

    pub fn merge(&mut self, other: &Totals) {
        self.spend += other.spend;
        self.leads = self.leads.saturating_add(other.leads);
        self.sales = self.sales.saturating_add(other.sales);
        self.revenue += other.revenue;
        self.record_count += other.record_count;
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a MetricRecord>) -> Self {
        let mut totals = Self::default();
        for record in records {
            totals.add(record);
        }
        totals
    }
}

// ─── Derived KPIs ───────────────────────────────────────────────────────────

/// Summed totals plus the ratios derived from them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub spend: f64,
    pub leads: u64,
    pub sales: u64,
    pub revenue: f64,
    pub record_count: usize,
    pub cost_per_lead: f64,
    /// Percentage, 0–100 for well-formed data.
    pub conversion_rate: f64,
    pub return_on_spend: f64,
    pub net_result: f64,
    pub average_ticket: f64,
}

impl From<Totals> for Kpis {
    fn from(t: Totals) -> Self {
        Self {
            spend: t.spend,
            leads: t.leads,
            sales: t.sales,
            revenue: t.revenue,
            record_count: t.record_count,
            cost_per_lead: ratios::cost_per_lead(t.spend, t.leads),
            conversion_rate: ratios::conversion_rate(t.sales, t.leads),
            return_on_spend: ratios::return_on_spend(t.revenue, t.spend),
            net_result: ratios::net_result(t.revenue, t.spend),
            average_ticket: ratios::average_ticket(t.revenue, t.sales),
        }
    }
}

/// Rollup across every selected product.
pub type Summary = Kpis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRollup {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(flatten)]
    pub kpis: Kpis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupReport {
    pub by_product: BTreeMap<ProductId, ProductRollup>,
    pub summary: Summary,
}

/// KPI used to order a product leaderboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    #[default]
    NetResult,
    Revenue,
    ReturnOnSpend,
    ConversionRate,
    Leads,
}

impl RankBy {
    fn value(&self, kpis: &Kpis) -> f64 {
        match self {
            RankBy::NetResult => kpis.net_result,
            RankBy::Revenue => kpis.revenue,
            RankBy::ReturnOnSpend => kpis.return_on_spend,
            RankBy::ConversionRate => kpis.conversion_rate,
            RankBy::Leads => kpis.leads as f64,
        }
    }
}

impl RollupReport {
    /// Product rollups, best first by `metric`.
    pub fn ranked_by(&self, metric: RankBy) -> Vec<&ProductRollup> {
        rank(self.by_product.values(), metric)
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&ProductRollup> {
        self.by_product.get(product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.by_product.is_empty()
    }
}

/// Order rollups best first by `metric`; ties break on product name, then id.
pub fn rank<'a>(
    rollups: impl IntoIterator<Item = &'a ProductRollup>,
    metric: RankBy,
) -> Vec<&'a ProductRollup> {
    let mut ranked: Vec<&ProductRollup> = rollups.into_iter().collect();
    ranked.sort_by(|a, b| {
        metric
            .value(&b.kpis)
            .total_cmp(&metric.value(&a.kpis))
            .then_with(|| a.product_name.cmp(&b.product_name))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked
}

// ─── Calculator ─────────────────────────────────────────────────────────────

/// Reduce records into one rollup per product plus a summary over all of them.
///
/// The summary is folded from the per-product totals in key order, so its
/// money sums match `by_product.values().map(..).sum()` bit for bit.
pub fn compute_rollups(records: &[MetricRecord]) -> RollupReport {
    let mut groups: BTreeMap<ProductId, (String, Totals)> = BTreeMap::new();
    for record in records {
        let (_, totals) = groups
            .entry(record.product_id)
            .or_insert_with(|| (record.product_name.clone(), Totals::default()));
        totals.add(record);
    }

    let mut overall = Totals::default();
    let by_product = groups
        .into_iter()
        .map(|(product_id, (product_name, totals))| {
            overall.merge(&totals);
            let rollup = ProductRollup {
                product_id,
                product_name,
                kpis: Kpis::from(totals),
            };
            (product_id, rollup)
        })
        .collect();

    RollupReport {
        by_product,
        summary: Kpis::from(overall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn record(
        product_id: ProductId,
        name: &str,
        day: u32,
        spend: f64,
        leads: u64,
        sales: u64,
        revenue: f64,
    ) -> MetricRecord {
        MetricRecord {
            product_id,
            product_name: name.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            spend,
            leads,
            sales,
            revenue,
        }
    }

    #[test]
    fn test_single_product_scenario() {
        let a = Uuid::new_v4();
        let records = vec![
            record(a, "Product A", 1, 100.0, 10, 2, 300.0),
            record(a, "Product A", 2, 50.0, 5, 1, 100.0),
        ];

        let report = compute_rollups(&records);
        let rollup = report.get(&a).unwrap();
        assert_eq!(rollup.kpis.spend, 150.0);
        assert_eq!(rollup.kpis.leads, 15);
        assert_eq!(rollup.kpis.sales, 3);
        assert_eq!(rollup.kpis.revenue, 400.0);
        assert_eq!(rollup.kpis.record_count, 2);
        assert_eq!(rollup.kpis.cost_per_lead, 10.0);
        assert_eq!(rollup.kpis.conversion_rate, 20.0);
        assert!((rollup.kpis.return_on_spend - 2.667).abs() < 1e-3);
        assert_eq!(rollup.kpis.net_result, 250.0);
        assert_eq!(report.summary, rollup.kpis);
    }

    #[test]
    fn test_groups_by_id_not_name() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let records = vec![
            record(a, "Same", 1, 10.0, 1, 0, 0.0),
            record(b, "Same", 1, 20.0, 2, 0, 0.0),
            record(a, "Same", 3, 30.0, 3, 0, 0.0),
        ];
        let report = compute_rollups(&records);
        assert_eq!(report.by_product.len(), 2);
        assert_eq!(report.get(&a).unwrap().kpis.spend, 40.0);
        assert_eq!(report.get(&b).unwrap().kpis.spend, 20.0);
        assert_eq!(report.summary.spend, 60.0);
        assert_eq!(report.summary.leads, 6);
    }

    #[test]
    fn test_empty_input() {
        let report = compute_rollups(&[]);
        assert!(report.is_empty());
        assert_eq!(report.summary, Kpis::default());
    }

    #[test]
    fn test_losing_product_has_negative_net_result() {
        let a = Uuid::new_v4();
        let report = compute_rollups(&[record(a, "Loss", 1, 80.0, 0, 0, 0.0)]);
        let kpis = report.get(&a).unwrap().kpis;
        assert_eq!(kpis.net_result, -80.0);
        assert_eq!(kpis.cost_per_lead, 0.0);
        assert_eq!(kpis.conversion_rate, 0.0);
        assert_eq!(kpis.return_on_spend, 0.0);
    }

    #[test]
    fn test_ranked_by() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let records = vec![
            record(a, "Alpha", 1, 100.0, 10, 1, 50.0),
            record(b, "Bravo", 1, 100.0, 10, 5, 500.0),
            record(c, "Charlie", 1, 10.0, 10, 9, 60.0),
        ];
        let report = compute_rollups(&records);

        let by_net: Vec<&str> = report
            .ranked_by(RankBy::NetResult)
            .iter()
            .map(|r| r.product_name.as_str())
            .collect();
        assert_eq!(by_net, vec!["Bravo", "Charlie", "Alpha"]);

        let by_conversion: Vec<&str> = report
            .ranked_by(RankBy::ConversionRate)
            .iter()
            .map(|r| r.product_name.as_str())
            .collect();
        assert_eq!(by_conversion, vec!["Charlie", "Bravo", "Alpha"]);

        let by_leads: Vec<&str> = report
            .ranked_by(RankBy::Leads)
            .iter()
            .map(|r| r.product_name.as_str())
            .collect();
        assert_eq!(by_leads, vec!["Alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn test_idempotent() {
        let a = Uuid::new_v4();
        let records = vec![
            record(a, "A", 1, 12.3, 4, 1, 7.0),
            record(a, "A", 2, 0.1, 0, 0, 0.2),
        ];
        assert_eq!(compute_rollups(&records), compute_rollups(&records));
    }

    #[test]
    fn test_serializes_flat() {
        let a = Uuid::new_v4();
        let report = compute_rollups(&[record(a, "A", 1, 10.0, 2, 1, 30.0)]);
        let json = serde_json::to_value(&report).unwrap();
        let rollup = &json["by_product"][a.to_string()];
        assert_eq!(rollup["product_name"], "A");
        assert_eq!(rollup["cost_per_lead"], 5.0);
        assert_eq!(json["summary"]["net_result"], 20.0);
    }

    fn arb_records() -> impl Strategy<Value = Vec<MetricRecord>> {
        let ids: Vec<ProductId> = (0..4u128).map(Uuid::from_u128).collect();
        proptest::collection::vec(
            (
                0usize..4,
                1u32..28,
                0.0f64..10_000.0,
                0u64..500,
                0u64..500,
                0.0f64..50_000.0,
            ),
            0..40,
        )
        .prop_map(move |rows| {
            rows.into_iter()
                .map(|(p, day, spend, leads, sales, revenue)| {
                    record(ids[p], &format!("P{p}"), day, spend, leads, sales, revenue)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn summary_reconciles_with_products(records in arb_records()) {
            let report = compute_rollups(&records);
            let spend: f64 = report.by_product.values().map(|r| r.kpis.spend).sum();
            let revenue: f64 = report.by_product.values().map(|r| r.kpis.revenue).sum();
            let leads: u64 = report.by_product.values().map(|r| r.kpis.leads).sum();
            let sales: u64 = report.by_product.values().map(|r| r.kpis.sales).sum();
            prop_assert_eq!(report.summary.spend, spend);
            prop_assert_eq!(report.summary.revenue, revenue);
            prop_assert_eq!(report.summary.leads, leads);
            prop_assert_eq!(report.summary.sales, sales);
            prop_assert_eq!(report.summary.record_count, records.len());
        }

        #[test]
        fn zero_guards_hold(records in arb_records()) {
            let report = compute_rollups(&records);
            for kpis in report.by_product.values().map(|r| r.kpis).chain([report.summary]) {
                if kpis.leads == 0 {
                    prop_assert_eq!(kpis.cost_per_lead, 0.0);
                    prop_assert_eq!(kpis.conversion_rate, 0.0);
                }
                if kpis.spend == 0.0 {
                    prop_assert_eq!(kpis.return_on_spend, 0.0);
                }
                prop_assert_eq!(kpis.net_result, kpis.revenue - kpis.spend);
                prop_assert!(kpis.cost_per_lead.is_finite());
                prop_assert!(kpis.return_on_spend.is_finite());
            }
        }
    }
}
