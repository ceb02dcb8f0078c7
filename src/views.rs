// Aggregate views over the filtered subset. Each function is a pure
// projection; the dashboard recomputes all of them on every filter change.
use crate::types::{KpiView, Record, ShippingStats, TopProductRow, TrendRow};
use crate::util::average;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

/// How many product groups a ranking keeps.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Sales,
    Profit,
}

impl Metric {
    pub fn of(&self, r: &Record) -> f64 {
        match self {
            Metric::Sales => r.sales,
            Metric::Profit => r.profit,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Sales => "Sales",
            Metric::Profit => "Profit",
        }
    }
}

pub fn kpi(data: &[Record]) -> KpiView {
    let total_sales: f64 = data.iter().map(|r| r.sales).sum();
    let total_profit: f64 = data.iter().map(|r| r.profit).sum();
    let orders: HashSet<&str> = data.iter().map(|r| r.order_id.as_str()).collect();
    KpiView {
        total_sales,
        total_profit,
        distinct_order_count: orders.len(),
    }
}

/// Top 10 products by the summed metric, re-ordered ascending so the
/// largest entry comes last (the bar chart draws bottom-up). Ties in the
/// descending cut resolve first-seen-first; every entry tied for the slice
/// maximum carries `is_max`.
pub fn top_products(data: &[Record], metric: Metric) -> Vec<TopProductRow> {
    // Group in first-seen order; a HashMap alone would make tie order
    // nondeterministic.
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, f64)> = Vec::new();
    for r in data {
        match index.get(&r.product_name) {
            Some(&i) => groups[i].1 += metric.of(r),
            None => {
                index.insert(r.product_name.clone(), groups.len());
                groups.push((r.product_name.clone(), metric.of(r)));
            }
        }
    }

    // Stable sort keeps first-seen groups ahead of later ties.
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    groups.truncate(TOP_N);
    groups.reverse();

    let slice_max = groups.iter().map(|g| g.1).fold(f64::NEG_INFINITY, f64::max);
    groups
        .into_iter()
        .map(|(product_name, value)| TopProductRow {
            product_name,
            value,
            is_max: value == slice_max,
        })
        .collect()
}

/// Mean/min/max of `days_to_ship`, null values ignored. `None` when the
/// subset has no non-null value at all; zeros would read as a real
/// zero-day shipping time.
pub fn shipping_stats(data: &[Record]) -> Option<ShippingStats> {
    let days: Vec<i64> = data.iter().filter_map(|r| r.days_to_ship).collect();
    let min = days.iter().copied().min()?;
    let max = days.iter().copied().max()?;
    let as_f64: Vec<f64> = days.iter().map(|d| *d as f64).collect();
    Some(ShippingStats {
        mean: average(&as_f64),
        min,
        max,
    })
}

/// Sales summed per `(year, category)`, one row per populated group,
/// ordered by year then category. Combinations with no records produce no
/// row. Records whose year is null never join a group.
pub fn sales_trend(data: &[Record]) -> Vec<TrendRow> {
    let mut sums: BTreeMap<(i32, String), f64> = BTreeMap::new();
    for r in data {
        if let Some(year) = r.year {
            *sums.entry((year, r.category.clone())).or_insert(0.0) += r.sales;
        }
    }
    sums.into_iter()
        .map(|((year, category), sales)| TrendRow {
            year: year.to_string(),
            category,
            sales,
        })
        .collect()
}
