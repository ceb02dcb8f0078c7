use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Order ID")]
    pub order_id: Option<String>,
    #[serde(rename = "Order Date")]
    pub order_date: Option<String>,
    #[serde(rename = "Ship Date")]
    pub ship_date: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Sub-Category")]
    pub sub_category: Option<String>,
    #[serde(rename = "Segment")]
    pub segment: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Postal Code")]
    pub postal_code: Option<String>,
    #[serde(rename = "Product Name")]
    pub product_name: Option<String>,
    #[serde(rename = "Sales")]
    pub sales: Option<String>,
    #[serde(rename = "Profit")]
    pub profit: Option<String>,
}

/// One cleaned transaction line item. Date-derived fields are `None` when
/// the backing date string failed to parse; the record itself is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub order_id: String,
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub days_to_ship: Option<i64>,
    pub category: String,
    pub sub_category: String,
    pub segment: String,
    pub region: String,
    pub city: String,
    pub state: String,
    pub postal_code: Option<f64>,
    pub product_name: String,
    pub sales: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KpiView {
    pub total_sales: f64,
    pub total_profit: f64,
    pub distinct_order_count: usize,
}

/// One entry of a top-10 ranking, ascending by `value` so the largest bar
/// renders last. `is_max` marks every entry tied for the slice maximum.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct TopProductRow {
    #[serde(rename = "ProductName")]
    #[tabled(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: f64,
    #[serde(rename = "IsMax")]
    #[tabled(rename = "IsMax")]
    pub is_max: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShippingStats {
    pub mean: f64,
    pub min: i64,
    pub max: i64,
}

/// One row of the category/year trend table. `year` is textual for the
/// downstream consumer (categorical axis, not a continuous one).
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct TrendRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: String,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Sales")]
    #[tabled(rename = "Sales")]
    pub sales: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub kpi: KpiView,
    pub shipping: Option<ShippingStats>,
}
