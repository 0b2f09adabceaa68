//! Derived KPI routines. Every rollup, summary, chart cell and entry preview
//! goes through these so the zero-guards agree everywhere.

/// Spend per lead; 0 when there are no leads.
pub fn cost_per_lead(spend: f64, leads: u64) -> f64 {
    if leads > 0 {
        spend / leads as f64
    } else {
        0.0
    }
}

/// Sales as a percentage of leads; 0 when there are no leads.
pub fn conversion_rate(sales: u64, leads: u64) -> f64 {
    if leads > 0 {
        (sales as f64 / leads as f64) * 100.0
    } else {
        0.0
    }
}

/// Revenue per unit of spend (ROAS); 0 when nothing was spent.
pub fn return_on_spend(revenue: f64, spend: f64) -> f64 {
    if spend > 0.0 {
        revenue / spend
    } else {
        0.0
    }
}

/// Revenue minus spend. Negative when the product lost money.
pub fn net_result(revenue: f64, spend: f64) -> f64 {
    revenue - spend
}

/// Revenue per sale; 0 when there are no sales.
pub fn average_ticket(revenue: f64, sales: u64) -> f64 {
    if sales > 0 {
        revenue / sales as f64
    } else {
        0.0
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
