//! Axum REST handlers for products, metrics, the dashboard and analytics.

use crate::auth::Account;
use crate::error::ApiError;
use crate::rest::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use leadboard_core::coerce::{self, parse_literal_date};
use leadboard_core::{AccountId, DateRange, MetricEntry, MetricRecord, Product, ProductId};
use leadboard_reporting::format::{self, ResultTone};
use leadboard_reporting::overview::RecordKpis;
use leadboard_reporting::{
    product_detail, product_overview, run_analysis, AnalysisReport, AnalysisRequest,
    MetricEntryPreview, ProductDetail, ProductOverview, RankBy,
};
use leadboard_store::{CreateProductRequest, ProductOrder, RenameProductRequest};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

// ─── Request / response types ──────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub order: Option<ProductOrder>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    #[serde(default, deserialize_with = "coerce::optional_date")]
    pub start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "coerce::optional_date")]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardCard {
    #[serde(flatten)]
    pub overview: ProductOverview,
    pub revenue_label: String,
    pub net_result_label: String,
    pub tone: ResultTone,
}

#[derive(Debug, Serialize)]
pub struct SavedMetric {
    pub record: MetricRecord,
    pub preview: MetricEntryPreview,
}

/// Metric values for a date given in the path.
#[derive(Debug, Deserialize)]
pub struct MetricValues {
    #[serde(default, deserialize_with = "coerce::amount")]
    pub spend: f64,
    #[serde(default, deserialize_with = "coerce::count")]
    pub leads: u64,
    #[serde(default, deserialize_with = "coerce::count")]
    pub sales: u64,
    #[serde(default, deserialize_with = "coerce::amount")]
    pub revenue: f64,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsBody {
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
    #[serde(default, deserialize_with = "coerce::optional_date")]
    pub start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "coerce::optional_date")]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub rank_by: Option<RankBy>,
}

// ─── Products ──────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    Account(owner): Account,
    Query(params): Query<ProductListParams>,
) -> Json<Vec<Product>> {
    Json(state.store.list_products(
        owner,
        params.order.unwrap_or_default(),
        params.search.as_deref(),
    ))
}

pub async fn create_product(
    State(state): State<AppState>,
    Account(owner): Account,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.store.create_product(owner, req)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Account(owner): Account,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDetail>, ApiError> {
    let product = state.store.get_product(owner, id)?;
    let records = state.store.records_for_product(owner, id, &DateRange::all())?;
    Ok(Json(product_detail(product, records)))
}

pub async fn rename_product(
    State(state): State<AppState>,
    Account(owner): Account,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameProductRequest>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.store.rename_product(owner, id, req)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Account(owner): Account,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_product(owner, id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Metrics ───────────────────────────────────────────────────────────────

/// GET /api/v1/products/:id/metrics: newest first.
pub async fn list_metrics(
    State(state): State<AppState>,
    Account(owner): Account,
    Path(id): Path<Uuid>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<RecordKpis>>, ApiError> {
    range.validate()?;
    let records = state.store.records_for_product(owner, id, &range)?;
    Ok(Json(records.into_iter().rev().map(RecordKpis::from).collect()))
}

pub async fn upsert_metric(
    State(state): State<AppState>,
    Account(owner): Account,
    Path(id): Path<Uuid>,
    Json(entry): Json<MetricEntry>,
) -> Result<Json<SavedMetric>, ApiError> {
    save_metric(&state, owner, id, entry).map(Json)
}

/// PUT /api/v1/products/:id/metrics/:date
pub async fn upsert_metric_at(
    State(state): State<AppState>,
    Account(owner): Account,
    Path((id, date)): Path<(Uuid, String)>,
    Json(values): Json<MetricValues>,
) -> Result<Json<SavedMetric>, ApiError> {
    let entry = MetricEntry {
        date: date_param(&date)?,
        spend: values.spend,
        leads: values.leads,
        sales: values.sales,
        revenue: values.revenue,
    };
    save_metric(&state, owner, id, entry).map(Json)
}

pub async fn delete_metric(
    State(state): State<AppState>,
    Account(owner): Account,
    Path((id, date)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_metric(owner, id, date_param(&date)?)?;
    Ok(StatusCode::NO_CONTENT)
}

fn save_metric(
    state: &AppState,
    owner: AccountId,
    id: ProductId,
    entry: MetricEntry,
) -> Result<SavedMetric, ApiError> {
    let record = state.store.upsert_metric(owner, id, entry)?;
    let preview = MetricEntryPreview::from_entry(record.spend, record.leads, record.revenue);
    Ok(SavedMetric { record, preview })
}

fn date_param(raw: &str) -> Result<NaiveDate, ApiError> {
    parse_literal_date(raw)
        .ok_or_else(|| ApiError::bad_request("invalid_date", "expected a YYYY-MM-DD date"))
}

// ─── Dashboard ─────────────────────────────────────────────────────────────

pub async fn dashboard(
    State(state): State<AppState>,
    Account(owner): Account,
    Query(params): Query<DashboardParams>,
) -> Result<Json<Vec<DashboardCard>>, ApiError> {
    let range = DateRange {
        start: params.start,
        end: params.end,
    };
    range.validate()?;

    let products = state
        .store
        .list_products(owner, ProductOrder::Newest, params.search.as_deref());
    let records = state.store.records_for_owner(owner, &range);

    let cards = product_overview(&products, &records)
        .into_iter()
        .map(|overview| DashboardCard {
            revenue_label: format::currency(overview.total_revenue, &state.currency),
            net_result_label: format::currency(overview.net_result, &state.currency),
            tone: format::result_tone(overview.net_result),
            overview,
        })
        .collect();
    Ok(Json(cards))
}

// ─── Analytics ─────────────────────────────────────────────────────────────

/// POST /api/v1/analytics: comparative report over the selected products.
pub async fn analytics(
    State(state): State<AppState>,
    Account(owner): Account,
    Json(body): Json<AnalyticsBody>,
) -> Result<Json<AnalysisReport>, ApiError> {
    metrics::counter!("api.analytics.requests").increment(1);
    let request = AnalysisRequest {
        owner,
        product_ids: body.product_ids,
        range: DateRange {
            start: body.start,
            end: body.end,
        },
    };

    let mut report = run_analysis(state.store.as_ref(), &request)?;
    if let Some(metric) = body.rank_by {
        report.rank_products(metric);
    }

    info!(
        owner = %owner,
        products = request.product_ids.len(),
        records = report.record_count,
        "Analysis generated"
    );
    Ok(Json(report))
}
