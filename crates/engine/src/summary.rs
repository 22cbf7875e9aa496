//! Dashboard KPIs over the cleaned record table.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::columns::{
    COVERAGE, CUSTOMER, LIFETIME_VALUE, MONTHLY_PREMIUM, SALES_CHANNEL, TOTAL_CLAIMS, YEAR_MONTH,
};
use crate::table::RecordTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub rows: usize,
    pub customers: usize,
    pub total_lifetime_value: f64,
    pub mean_lifetime_value: Option<f64>,
    pub total_monthly_premium: f64,
    pub total_claims: f64,
    pub policies_by_month: Vec<MonthCount>,
    pub by_coverage: Vec<CategoryCount>,
    pub by_sales_channel: Vec<CategoryCount>,
}

pub fn summarize(records: &RecordTable) -> DashboardSummary {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for month in records.column_values(YEAR_MONTH).filter_map(|v| v.as_text()) {
        *months.entry(month.to_string()).or_insert(0) += 1;
    }

    DashboardSummary {
        rows: records.row_count(),
        customers: records.distinct_count(CUSTOMER),
        total_lifetime_value: records.sum(LIFETIME_VALUE),
        mean_lifetime_value: records.mean(LIFETIME_VALUE),
        total_monthly_premium: records.sum(MONTHLY_PREMIUM),
        total_claims: records.sum(TOTAL_CLAIMS),
        policies_by_month: months
            .into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect(),
        by_coverage: category_counts(records, COVERAGE),
        by_sales_channel: category_counts(records, SALES_CHANNEL),
    }
}

/// Non-missing value counts, largest first, ties by name.
fn category_counts(records: &RecordTable, column: &str) -> Vec<CategoryCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in records.column_values(column) {
        if let Some(name) = value.display() {
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, count)| CategoryCount { name, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}
