use crate::coerce;
use crate::error::{LeadboardError, LeadboardResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProductId = Uuid;
pub type AccountId = Uuid;

pub const PRODUCT_NAME_MIN_CHARS: usize = 3;
pub const PRODUCT_NAME_MAX_CHARS: usize = 100;

/// Key holding the row date in chart series output. Product names become
/// sibling keys of it, so no product may be called this.
pub const CHART_DATE_KEY: &str = "date";

/// A tracked product, owned by a single account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub owner: AccountId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Trim a user-supplied product name and check its length.
    pub fn validate_name(raw: &str) -> LeadboardResult<String> {
        let name = raw.trim();
        let chars = name.chars().count();
        if !(PRODUCT_NAME_MIN_CHARS..=PRODUCT_NAME_MAX_CHARS).contains(&chars) {
            return Err(LeadboardError::Validation(format!(
                "product name must be between {PRODUCT_NAME_MIN_CHARS} and \
                 {PRODUCT_NAME_MAX_CHARS} characters, got {chars}"
            )));
        }
        if name.eq_ignore_ascii_case(CHART_DATE_KEY) {
            return Err(LeadboardError::Validation(format!(
                "product name {name:?} is reserved"
            )));
        }
        Ok(name.to_string())
    }
}

/// One day's measured performance for one product.
///
/// Numeric fields are read leniently: missing or malformed values are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub product_id: ProductId,
    /// Display label resolved from the product catalog.
    #[serde(default)]
    pub product_name: String,
    #[serde(deserialize_with = "coerce::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "coerce::amount")]
    pub spend: f64,
    #[serde(default, deserialize_with = "coerce::count")]
    pub leads: u64,
    #[serde(default, deserialize_with = "coerce::count")]
    pub sales: u64,
    #[serde(default, deserialize_with = "coerce::amount")]
    pub revenue: f64,
}

impl MetricRecord {
    pub fn from_entry(product: &Product, entry: &MetricEntry) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            date: entry.date,
            spend: entry.spend,
            leads: entry.leads,
            sales: entry.sales,
            revenue: entry.revenue,
        }
    }
}

/// A metric as typed in by a user, before it is attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    #[serde(deserialize_with = "coerce::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "coerce::amount")]
    pub spend: f64,
    #[serde(default, deserialize_with = "coerce::count")]
    pub leads: u64,
    #[serde(default, deserialize_with = "coerce::count")]
    pub sales: u64,
    #[serde(default, deserialize_with = "coerce::amount")]
    pub revenue: f64,
}

impl MetricEntry {
    pub fn validate(&self) -> LeadboardResult<()> {
        if self.spend < 0.0 {
            return Err(LeadboardError::Validation(
                "spend must not be negative".to_string(),
            ));
        }
        if self.revenue < 0.0 {
            return Err(LeadboardError::Validation(
                "revenue must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Inclusive date filter. Either bound may be left open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, deserialize_with = "coerce::optional_date")]
    pub start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "coerce::optional_date")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub fn validate(&self) -> LeadboardResult<()> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => {
                Err(LeadboardError::InvalidRange { start, end })
            }
            _ => Ok(()),
        }
    }
}
