use std::fs;
use std::path::Path;

use superstore_report::filter::FilterSpec;
use superstore_report::loader::{LoadCache, LoadError};
use superstore_report::views::{self, Metric};

const HEADER: &str = "Order ID,Order Date,Ship Date,Category,Sub-Category,Segment,Region,City,State,Postal Code,Product Name,Sales,Profit";

fn write_csv(path: &Path, rows: &[&str]) {
    let mut body = String::from(HEADER);
    for r in rows {
        body.push('\n');
        body.push_str(r);
    }
    body.push('\n');
    fs::write(path, body).expect("failed writing test csv");
}

fn sample_rows() -> Vec<&'static str> {
    vec![
        // Three line items for the ranking scenario, two sharing an order id.
        "US-1,01/01/2015 00:00,05/01/2015 00:00,Furniture,Chairs,Consumer,West,Seattle,Washington,98103,A,100,10",
        "US-1,01/01/2015 00:00,05/01/2015 00:00,Furniture,Tables,Consumer,West,Seattle,Washington,98103,B,50,5",
        "US-2,03/06/2016 00:00,07/06/2016 00:00,Technology,Phones,Corporate,East,Boston,Massachusetts,02108,A,30,3",
        // Exact duplicate of the first row.
        "US-1,01/01/2015 00:00,05/01/2015 00:00,Furniture,Chairs,Consumer,West,Seattle,Washington,98103,A,100,10",
        // Missing postal code in Burlington, Vermont: imputation target.
        "US-3,10/02/2016 00:00,14/02/2016 00:00,Office Supplies,Paper,Home Office,East,Burlington,Vermont,,C,20,2",
        // Missing postal code elsewhere: stays missing.
        "US-4,10/02/2016 00:00,14/02/2016 00:00,Office Supplies,Paper,Home Office,East,Burlington,New York,,C,20,2",
        // Unparseable order date: record kept with null year/days.
        "US-5,garbage,14/02/2016 00:00,Technology,Phones,Consumer,West,Seattle,Washington,98103,D,40,4",
    ]
}

#[test]
fn end_to_end_clean_filter_aggregate() {
    let temp = tempfile::tempdir().expect("failed creating tempdir");
    let path = temp.path().join("orders.csv");
    write_csv(&path, &sample_rows());

    let mut cache = LoadCache::new();
    let (records, report) = cache.load(&path).expect("load should succeed");

    assert_eq!(report.total_rows, 7);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.imputed_postal, 1);
    assert_eq!(report.date_errors, 1);
    assert_eq!(records.len(), 6);

    // Imputation precision: only Burlington, Vermont got the fill.
    let vermont = records
        .iter()
        .find(|r| r.state == "Vermont")
        .expect("vermont row");
    assert_eq!(vermont.postal_code, Some(5401.0));
    let new_york = records
        .iter()
        .find(|r| r.city == "Burlington" && r.state == "New York")
        .expect("new york row");
    assert_eq!(new_york.postal_code, None);

    // Ship dates carry the +2 year shift.
    let first = &records[0];
    assert_eq!(first.year, Some(2015));
    assert_eq!(first.days_to_ship, Some(735));

    // The bad-date record survives with null derived fields.
    let bad = records.iter().find(|r| r.order_id == "US-5").expect("bad-date row");
    assert_eq!(bad.year, None);
    assert_eq!(bad.days_to_ship, None);

    // Select-all filtering drops only the null-year record.
    let spec = FilterSpec::select_all(records);
    let subset = spec.apply(records);
    assert_eq!(subset.len(), 5);

    let kpi = views::kpi(&subset);
    assert_eq!(kpi.total_sales, 220.0);
    assert_eq!(kpi.total_profit, 22.0);
    assert_eq!(kpi.distinct_order_count, 4);

    // Top products by sales: A=130, B=50, C=40 summed across the subset.
    let top = views::top_products(&subset, Metric::Sales);
    assert_eq!(top.len(), 3);
    assert_eq!(top[2].product_name, "A");
    assert_eq!(top[2].value, 130.0);
    assert!(top[2].is_max);
    assert!(!top[0].is_max);

    let stats = views::shipping_stats(&subset).expect("subset has durations");
    assert_eq!(stats.min, 734);
    assert_eq!(stats.max, 735);

    let trend = views::sales_trend(&subset);
    let years: Vec<&str> = trend.iter().map(|r| r.year.as_str()).collect();
    assert_eq!(years, vec!["2015", "2016", "2016"]);
}

#[test]
fn emptied_dimension_yields_zero_kpis() {
    let temp = tempfile::tempdir().expect("failed creating tempdir");
    let path = temp.path().join("orders.csv");
    write_csv(&path, &sample_rows());

    let mut cache = LoadCache::new();
    let (records, _) = cache.load(&path).expect("load should succeed");

    let mut spec = FilterSpec::select_all(records);
    spec.categories.clear();
    let subset = spec.apply(records);
    assert!(subset.is_empty());

    let kpi = views::kpi(&subset);
    assert_eq!(kpi.total_sales, 0.0);
    assert_eq!(kpi.total_profit, 0.0);
    assert_eq!(kpi.distinct_order_count, 0);
}

#[test]
fn missing_required_column_is_fatal() {
    let temp = tempfile::tempdir().expect("failed creating tempdir");
    let path = temp.path().join("orders.csv");
    fs::write(
        &path,
        "Order ID,Order Date,Category\nUS-1,01/01/2015,Furniture\n",
    )
    .expect("failed writing test csv");

    let mut cache = LoadCache::new();
    let err = cache.load(&path).err().expect("schema error expected");
    match err {
        LoadError::Schema { missing } => {
            assert!(missing.contains(&"Ship Date".to_string()));
            assert!(missing.contains(&"Profit".to_string()));
            assert!(!missing.contains(&"Order ID".to_string()));
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn cache_serves_unchanged_content_and_rebuilds_on_change() {
    let temp = tempfile::tempdir().expect("failed creating tempdir");
    let path = temp.path().join("orders.csv");
    write_csv(&path, &sample_rows());

    let mut cache = LoadCache::new();
    let first_len = cache.load(&path).expect("first load").0.len();
    let second_len = cache.load(&path).expect("repeat load").0.len();
    assert_eq!(first_len, second_len);

    // Append a fresh row; the fingerprint changes and the entry rebuilds.
    let mut rows = sample_rows();
    rows.push(
        "US-9,01/03/2017 00:00,04/03/2017 00:00,Technology,Phones,Consumer,South,Austin,Texas,73301,E,60,6",
    );
    write_csv(&path, &rows);

    let (records, _) = cache.load(&path).expect("reload after change");
    assert_eq!(records.len(), first_len + 1);
    assert!(records.iter().any(|r| r.order_id == "US-9"));
}

#[test]
fn missing_file_reports_io_error() {
    let mut cache = LoadCache::new();
    let err = cache
        .load(Path::new("/nonexistent/orders.csv"))
        .err()
        .expect("io error expected");
    assert!(matches!(err, LoadError::Io { .. }));
}
