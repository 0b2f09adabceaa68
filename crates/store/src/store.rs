//! In-memory metrics store backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! This provides the same API surface for development and testing.

use crate::models::*;
use chrono::{Duration, NaiveDate, Utc};
use dashmap::DashMap;
use leadboard_core::{
    AccountId, DateRange, LeadboardError, LeadboardResult, MetricEntry, MetricRecord, Product,
    ProductId,
};
use leadboard_reporting::{RecordQuery, RecordSource};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Account that owns the seeded demo products.
pub const DEMO_ACCOUNT: AccountId = Uuid::from_u128(0x1ead_b0a4d);

/// Thread-safe in-memory store for products and their daily metrics.
///
/// Metrics are keyed by `(product, date)`, so writing the same day twice
/// replaces the earlier entry.
pub struct MetricsStore {
    products: DashMap<ProductId, Product>,
    metrics: DashMap<(ProductId, NaiveDate), MetricEntry>,
}

impl MetricsStore {
    pub fn new() -> Self {
        info!("Metrics store initialized (in-memory, development mode)");
        Self {
            products: DashMap::new(),
            metrics: DashMap::new(),
        }
    }

    /// Store pre-populated with a few products for [`DEMO_ACCOUNT`].
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        store.seed_demo_data();
        store
    }

    // ─── Products ──────────────────────────────────────────────────────────

    pub fn create_product(
        &self,
        owner: AccountId,
        req: CreateProductRequest,
    ) -> LeadboardResult<Product> {
        let name = Product::validate_name(&req.name)?;
        let product = Product {
            id: Uuid::new_v4(),
            owner,
            name,
            created_at: Utc::now(),
        };
        self.products.insert(product.id, product.clone());
        metrics::counter!("store.products.created").increment(1);
        info!(product_id = %product.id, owner = %owner, name = %product.name, "Product created");
        Ok(product)
    }

    /// Products owned by `owner`, optionally filtered by a case-insensitive
    /// name substring.
    pub fn list_products(
        &self,
        owner: AccountId,
        order: ProductOrder,
        search: Option<&str>,
    ) -> Vec<Product> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|r| r.value().owner == owner)
            .filter(|r| {
                needle
                    .as_deref()
                    .map_or(true, |n| r.value().name.to_lowercase().contains(n))
            })
            .map(|r| r.value().clone())
            .collect();

        match order {
            ProductOrder::Name => products.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.id.cmp(&b.id))
            }),
            ProductOrder::Newest => products.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }
        products
    }

    pub fn get_product(&self, owner: AccountId, id: ProductId) -> LeadboardResult<Product> {
        self.products
            .get(&id)
            .filter(|r| r.value().owner == owner)
            .map(|r| r.value().clone())
            .ok_or_else(|| LeadboardError::NotFound(format!("product {id}")))
    }

    pub fn rename_product(
        &self,
        owner: AccountId,
        id: ProductId,
        req: RenameProductRequest,
    ) -> LeadboardResult<Product> {
        let name = Product::validate_name(&req.name)?;
        let mut entry = self
            .products
            .get_mut(&id)
            .filter(|r| r.value().owner == owner)
            .ok_or_else(|| LeadboardError::NotFound(format!("product {id}")))?;
        entry.value_mut().name = name;
        metrics::counter!("store.products.renamed").increment(1);
        info!(product_id = %id, name = %entry.value().name, "Product renamed");
        Ok(entry.value().clone())
    }

    /// Delete a product and every metric recorded for it.
    pub fn delete_product(&self, owner: AccountId, id: ProductId) -> LeadboardResult<()> {
        self.get_product(owner, id)?;
        self.products.remove(&id);
        let before = self.metrics.len();
        self.metrics.retain(|(product_id, _), _| *product_id != id);
        metrics::counter!("store.products.deleted").increment(1);
        info!(
            product_id = %id,
            metrics_removed = before.saturating_sub(self.metrics.len()),
            "Product deleted"
        );
        Ok(())
    }

    // ─── Metrics ───────────────────────────────────────────────────────────

    /// Insert or replace the metric for `(product_id, entry.date)`.
    pub fn upsert_metric(
        &self,
        owner: AccountId,
        product_id: ProductId,
        entry: MetricEntry,
    ) -> LeadboardResult<MetricRecord> {
        entry.validate()?;
        let product = self.get_product(owner, product_id)?;
        let record = MetricRecord::from_entry(&product, &entry);
        let replaced = self.metrics.insert((product_id, entry.date), entry).is_some();
        metrics::counter!("store.metrics.upserted").increment(1);
        info!(
            product_id = %product_id,
            date = %record.date,
            replaced,
            "Metric saved"
        );
        Ok(record)
    }

    pub fn delete_metric(
        &self,
        owner: AccountId,
        product_id: ProductId,
        date: NaiveDate,
    ) -> LeadboardResult<()> {
        self.get_product(owner, product_id)?;
        self.metrics
            .remove(&(product_id, date))
            .ok_or_else(|| LeadboardError::NotFound(format!("metric for {product_id} on {date}")))?;
        metrics::counter!("store.metrics.deleted").increment(1);
        info!(product_id = %product_id, date = %date, "Metric deleted");
        Ok(())
    }

    /// All metrics of one product inside `range`, oldest first.
    pub fn records_for_product(
        &self,
        owner: AccountId,
        product_id: ProductId,
        range: &DateRange,
    ) -> LeadboardResult<Vec<MetricRecord>> {
        let product = self.get_product(owner, product_id)?;
        let mut records: Vec<MetricRecord> = self
            .metrics
            .iter()
            .filter(|r| r.key().0 == product_id && range.contains(r.key().1))
            .map(|r| MetricRecord::from_entry(&product, r.value()))
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    /// Records of every product owned by `owner` inside `range`.
    pub fn records_for_owner(&self, owner: AccountId, range: &DateRange) -> Vec<MetricRecord> {
        let product_ids: Vec<ProductId> = self
            .products
            .iter()
            .filter(|r| r.value().owner == owner)
            .map(|r| *r.key())
            .collect();
        self.collect_records(owner, &product_ids, range)
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    fn collect_records(
        &self,
        owner: AccountId,
        product_ids: &[ProductId],
        range: &DateRange,
    ) -> Vec<MetricRecord> {
        // Resolve names up front so no product guard is held while scanning metrics.
        let selected: HashMap<ProductId, (usize, Product)> = product_ids
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                self.products
                    .get(id)
                    .filter(|r| r.value().owner == owner)
                    .map(|r| (*id, (position, r.value().clone())))
            })
            .collect();

        let mut rows: Vec<(usize, MetricRecord)> = self
            .metrics
            .iter()
            .filter(|r| range.contains(r.key().1))
            .filter_map(|r| {
                selected.get(&r.key().0).map(|(position, product)| {
                    (*position, MetricRecord::from_entry(product, r.value()))
                })
            })
            .collect();

        rows.sort_by(|(pa, a), (pb, b)| a.date.cmp(&b.date).then(pa.cmp(pb)));
        rows.into_iter().map(|(_, record)| record).collect()
    }

    // ─── Demo data ─────────────────────────────────────────────────────────

    fn seed_demo_data(&self) {
        let today = Utc::now().date_naive();
        let demo = [
            ("Curso de Marketing Digital", 120.0, 24u64, 0.18, 197.0),
            ("Mentoria de Vendas", 80.0, 10, 0.30, 497.0),
            ("Ebook Tráfego Pago", 45.0, 30, 0.08, 47.0),
        ];

        for (i, (name, daily_spend, daily_leads, close_rate, ticket)) in demo.iter().enumerate() {
            let product = Product {
                id: Uuid::new_v4(),
                owner: DEMO_ACCOUNT,
                name: name.to_string(),
                created_at: Utc::now() - Duration::days(30 - i as i64),
            };
            for day in 0..14i64 {
                // Weekly swing so the charts have some shape.
                let swing = 1.0 + 0.25 * ((day % 7) as f64 - 3.0) / 3.0;
                let leads = (*daily_leads as f64 * swing).round() as u64;
                let sales = (leads as f64 * close_rate).floor() as u64;
                let entry = MetricEntry {
                    date: today - Duration::days(day),
                    spend: (daily_spend * swing * 100.0).round() / 100.0,
                    leads,
                    sales,
                    revenue: sales as f64 * ticket,
                };
                self.metrics.insert((product.id, entry.date), entry);
            }
            self.products.insert(product.id, product);
        }
        debug!(
            products = self.products.len(),
            metrics = self.metrics.len(),
            "Seeded demo data"
        );
    }
}

impl RecordSource for MetricsStore {
    fn fetch_records(&self, query: &RecordQuery) -> LeadboardResult<Vec<MetricRecord>> {
        Ok(self.collect_records(query.owner, &query.product_ids, &query.range))
    }
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadboard_reporting::{run_analysis, AnalysisRequest};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn entry(d: u32, spend: f64, leads: u64, sales: u64, revenue: f64) -> MetricEntry {
        MetricEntry {
            date: day(d),
            spend,
            leads,
            sales,
            revenue,
        }
    }

    fn create(store: &MetricsStore, owner: AccountId, name: &str) -> Product {
        store
            .create_product(owner, CreateProductRequest { name: name.to_string() })
            .unwrap()
    }

    #[test]
    fn test_create_product_validates_name() {
        let store = MetricsStore::new();
        let owner = Uuid::new_v4();
        let err = store
            .create_product(owner, CreateProductRequest { name: " ab ".to_string() })
            .unwrap_err();
        assert!(matches!(err, LeadboardError::Validation(_)));

        let err = store
            .create_product(owner, CreateProductRequest { name: "Date".to_string() })
            .unwrap_err();
        assert!(matches!(err, LeadboardError::Validation(_)));

        let product = create(&store, owner, "  Launch Course ");
        assert_eq!(product.name, "Launch Course");
        assert_eq!(store.product_count(), 1);
    }

    #[test]
    fn test_products_are_owner_scoped() {
        let store = MetricsStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let product = create(&store, alice, "Alice Product");

        assert!(store.get_product(alice, product.id).is_ok());
        assert!(matches!(
            store.get_product(bob, product.id),
            Err(LeadboardError::NotFound(_))
        ));
        assert!(store.list_products(bob, ProductOrder::Name, None).is_empty());
        assert!(store
            .upsert_metric(bob, product.id, entry(1, 1.0, 1, 0, 0.0))
            .is_err());
    }

    #[test]
    fn test_list_products_order_and_search() {
        let store = MetricsStore::new();
        let owner = Uuid::new_v4();
        create(&store, owner, "bravo course");
        create(&store, owner, "Alpha Ebook");
        create(&store, owner, "Charlie Course");

        let names: Vec<String> = store
            .list_products(owner, ProductOrder::Name, None)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha Ebook", "bravo course", "Charlie Course"]);

        let found: Vec<String> = store
            .list_products(owner, ProductOrder::Name, Some("COURSE"))
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(found, vec!["bravo course", "Charlie Course"]);

        assert_eq!(store.list_products(owner, ProductOrder::Newest, Some("  ")).len(), 3);
    }

    #[test]
    fn test_upsert_replaces_same_day() {
        let store = MetricsStore::new();
        let owner = Uuid::new_v4();
        let product = create(&store, owner, "Upsert Me");

        store.upsert_metric(owner, product.id, entry(1, 100.0, 10, 1, 50.0)).unwrap();
        store.upsert_metric(owner, product.id, entry(1, 70.0, 7, 2, 90.0)).unwrap();
        store.upsert_metric(owner, product.id, entry(2, 10.0, 1, 0, 0.0)).unwrap();

        let records = store
            .records_for_product(owner, product.id, &DateRange::all())
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, day(1));
        assert_eq!(records[0].spend, 70.0);
        assert_eq!(records[0].product_name, "Upsert Me");
        assert_eq!(store.metric_count(), 2);
    }

    #[test]
    fn test_upsert_rejects_negative_spend() {
        let store = MetricsStore::new();
        let owner = Uuid::new_v4();
        let product = create(&store, owner, "Negative");
        assert!(matches!(
            store.upsert_metric(owner, product.id, entry(1, -5.0, 1, 0, 0.0)),
            Err(LeadboardError::Validation(_))
        ));
        assert_eq!(store.metric_count(), 0);
    }

    #[test]
    fn test_fetch_filters_and_orders() {
        let store = MetricsStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let a = create(&store, owner, "Product A");
        let b = create(&store, owner, "Product B");
        let foreign = create(&store, other, "Foreign");

        store.upsert_metric(owner, a.id, entry(3, 1.0, 1, 0, 0.0)).unwrap();
        store.upsert_metric(owner, a.id, entry(1, 1.0, 1, 0, 0.0)).unwrap();
        store.upsert_metric(owner, b.id, entry(1, 2.0, 1, 0, 0.0)).unwrap();
        store.upsert_metric(owner, b.id, entry(9, 2.0, 1, 0, 0.0)).unwrap();
        store.upsert_metric(other, foreign.id, entry(2, 5.0, 1, 0, 0.0)).unwrap();

        let query = RecordQuery {
            owner,
            product_ids: vec![b.id, a.id, foreign.id],
            range: DateRange::between(day(1), day(3)),
        };
        let records = store.fetch_records(&query).unwrap();
        let got: Vec<(NaiveDate, &str)> = records
            .iter()
            .map(|r| (r.date, r.product_name.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (day(1), "Product B"),
                (day(1), "Product A"),
                (day(3), "Product A"),
            ]
        );
    }

    #[test]
    fn test_rename_is_reflected_in_fetched_records() {
        let store = MetricsStore::new();
        let owner = Uuid::new_v4();
        let a = create(&store, owner, "Old Name");
        store.upsert_metric(owner, a.id, entry(1, 1.0, 1, 0, 0.0)).unwrap();
        store
            .rename_product(owner, a.id, RenameProductRequest { name: "New Name".to_string() })
            .unwrap();
        let records = store.records_for_owner(owner, &DateRange::all());
        assert_eq!(records[0].product_name, "New Name");
    }

    #[test]
    fn test_delete_product_cascades() {
        let store = MetricsStore::new();
        let owner = Uuid::new_v4();
        let a = create(&store, owner, "Doomed");
        let b = create(&store, owner, "Survivor");
        store.upsert_metric(owner, a.id, entry(1, 1.0, 1, 0, 0.0)).unwrap();
        store.upsert_metric(owner, b.id, entry(1, 1.0, 1, 0, 0.0)).unwrap();

        assert!(store.delete_product(Uuid::new_v4(), a.id).is_err());
        store.delete_product(owner, a.id).unwrap();
        assert_eq!(store.product_count(), 1);
        assert_eq!(store.metric_count(), 1);
    }

    #[test]
    fn test_delete_metric() {
        let store = MetricsStore::new();
        let owner = Uuid::new_v4();
        let a = create(&store, owner, "Product A");
        store.upsert_metric(owner, a.id, entry(1, 1.0, 1, 0, 0.0)).unwrap();
        store.delete_metric(owner, a.id, day(1)).unwrap();
        assert!(matches!(
            store.delete_metric(owner, a.id, day(1)),
            Err(LeadboardError::NotFound(_))
        ));
    }

    #[test]
    fn test_analysis_over_store() {
        let store = MetricsStore::new();
        let owner = Uuid::new_v4();
        let a = create(&store, owner, "Product A");
        store.upsert_metric(owner, a.id, entry(1, 100.0, 10, 2, 300.0)).unwrap();
        store.upsert_metric(owner, a.id, entry(2, 50.0, 5, 1, 100.0)).unwrap();

        let report = run_analysis(
            &store,
            &AnalysisRequest {
                owner,
                product_ids: vec![a.id],
                range: DateRange::all(),
            },
        )
        .unwrap();
        assert_eq!(report.summary.spend, 150.0);
        assert_eq!(report.summary.cost_per_lead, 10.0);
        assert_eq!(report.summary.conversion_rate, 20.0);
        assert_eq!(report.summary.net_result, 250.0);
        assert_eq!(report.series.conversion_series.len(), 2);
    }

    #[test]
    fn test_mutations_are_counted() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            let store = MetricsStore::new();
            let owner = Uuid::new_v4();
            let a = create(&store, owner, "Counted");
            store.upsert_metric(owner, a.id, entry(1, 1.0, 1, 0, 0.0)).unwrap();
            store.upsert_metric(owner, a.id, entry(1, 2.0, 1, 0, 0.0)).unwrap();
            store.delete_metric(owner, a.id, day(1)).unwrap();
            let rename = RenameProductRequest {
                name: "Recounted".to_string(),
            };
            store.rename_product(owner, a.id, rename).unwrap();
            store.delete_product(owner, a.id).unwrap();
            // Rejected writes are not counted.
            assert!(store.delete_product(owner, a.id).is_err());
        });

        let rendered = handle.render();
        for line in [
            "store_products_created 1",
            "store_metrics_upserted 2",
            "store_metrics_deleted 1",
            "store_products_renamed 1",
            "store_products_deleted 1",
        ] {
            assert!(rendered.lines().any(|l| l == line), "missing {line:?} in {rendered}");
        }
    }

    #[test]
    fn test_demo_seed() {
        let store = MetricsStore::with_demo_data();
        assert_eq!(store.product_count(), 3);
        assert_eq!(store.metric_count(), 42);
        let products = store.list_products(DEMO_ACCOUNT, ProductOrder::Newest, None);
        assert_eq!(products[0].name, "Ebook Tráfego Pago");
    }
}
