// Cleaning pass: date derivation, targeted postal imputation, exact dedup.
//
// The three steps run once, right after the raw rows are read; the result
// is the immutable dataset every filter/aggregate call works from.
use crate::types::{RawRow, Record};
use crate::util::{days_diff, parse_date_dmy, parse_f64_safe, shift_year};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

/// Fixed shift applied to the parsed ship year before the final ship date
/// is reconstructed. The upstream data prep does exactly this, so every
/// shipping duration comes out ~730 days long.
// TODO: confirm with the data owners whether the +2 ship-year shift is
// intended; dropping it would change every days_to_ship value.
pub const SHIP_YEAR_OFFSET: i32 = 2;

/// Postal code assigned to Burlington, Vermont rows whose postal field is
/// empty in the source. The only missing postal codes in the dataset are
/// this one city, so the fill is targeted rather than a blanket default.
pub const BURLINGTON_VT_POSTAL: f64 = 5401.0;

#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    pub total_rows: usize,
    pub skipped_amounts: usize,
    pub date_errors: usize,
    pub imputed_postal: usize,
    pub duplicates_removed: usize,
}

/// Derived date fields for one row: final order date, final ship date
/// (year-shifted), order year, and the day difference between the two.
pub fn derive_dates(
    order: Option<&str>,
    ship: Option<&str>,
) -> (Option<NaiveDate>, Option<NaiveDate>, Option<i32>, Option<i64>) {
    let order_date = parse_date_dmy(order);
    let ship_date = parse_date_dmy(ship).and_then(|d| shift_year(d, SHIP_YEAR_OFFSET));
    let year = order_date.map(|d| d.year());
    let days_to_ship = match (order_date, ship_date) {
        (Some(o), Some(s)) => Some(days_diff(o, s)),
        _ => None,
    };
    (order_date, ship_date, year, days_to_ship)
}

/// Targeted imputation plus numeric coercion for the postal code.
///
/// The fill rule only fires when the raw value is *missing* (absent or
/// blank) and the row is Burlington, Vermont. A present-but-unparseable
/// value is not missing; it simply coerces to `None`. Returns the coerced
/// value and whether the fill fired.
pub fn resolve_postal(raw: Option<&str>, city: &str, state: &str) -> (Option<f64>, bool) {
    let missing = raw.map_or(true, |s| s.trim().is_empty());
    if missing && city == "Burlington" && state == "Vermont" {
        return (Some(BURLINGTON_VT_POSTAL), true);
    }
    (parse_f64_safe(raw), false)
}

fn clean_str(s: Option<String>) -> String {
    s.unwrap_or_default().trim().to_string()
}

/// Convert raw rows into cleaned records and drop exact duplicates.
///
/// Rows whose `Sales` or `Profit` cannot be parsed are skipped and counted;
/// those two fields feed every monetary aggregate, so a silent zero is
/// worse than losing the row. Date failures are non-fatal: the record is
/// kept with null derived fields.
pub fn clean(rows: Vec<RawRow>) -> (Vec<Record>, CleanReport) {
    let mut report = CleanReport {
        total_rows: rows.len(),
        ..CleanReport::default()
    };
    let mut records: Vec<Record> = Vec::with_capacity(rows.len());

    for row in rows {
        let sales = match parse_f64_safe(row.sales.as_deref()) {
            Some(v) => v,
            None => {
                report.skipped_amounts += 1;
                continue;
            }
        };
        let profit = match parse_f64_safe(row.profit.as_deref()) {
            Some(v) => v,
            None => {
                report.skipped_amounts += 1;
                continue;
            }
        };

        let (order_date, ship_date, year, days_to_ship) =
            derive_dates(row.order_date.as_deref(), row.ship_date.as_deref());
        if order_date.is_none() || ship_date.is_none() {
            report.date_errors += 1;
        }

        let city = clean_str(row.city);
        let state = clean_str(row.state);
        let (postal_code, imputed) = resolve_postal(row.postal_code.as_deref(), &city, &state);
        if imputed {
            report.imputed_postal += 1;
        }

        records.push(Record {
            order_id: clean_str(row.order_id),
            order_date,
            ship_date,
            year,
            days_to_ship,
            category: clean_str(row.category),
            sub_category: clean_str(row.sub_category),
            segment: clean_str(row.segment),
            region: clean_str(row.region),
            city,
            state,
            postal_code,
            product_name: clean_str(row.product_name),
            sales,
            profit,
        });
    }

    let before = records.len();
    let records = dedup_exact(records);
    report.duplicates_removed = before - records.len();
    (records, report)
}

type DedupKey = (
    (String, String),
    (Option<NaiveDate>, Option<NaiveDate>, Option<i32>, Option<i64>),
    (String, String, String, String, String, String),
    (Option<u64>, u64, u64),
);

fn dedup_key(r: &Record) -> DedupKey {
    (
        (r.order_id.clone(), r.product_name.clone()),
        (r.order_date, r.ship_date, r.year, r.days_to_ship),
        (
            r.category.clone(),
            r.sub_category.clone(),
            r.segment.clone(),
            r.region.clone(),
            r.city.clone(),
            r.state.clone(),
        ),
        (
            r.postal_code.map(f64::to_bits),
            r.sales.to_bits(),
            r.profit.to_bits(),
        ),
    )
}

/// Dedup policy: exact full-record equality across every field, derived
/// ones included. The first occurrence survives and input order is
/// preserved. Float fields compare by bit pattern, which matches exact
/// equality for every value the pipeline produces.
pub fn dedup_exact(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<DedupKey> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(dedup_key(r)))
        .collect()
}
