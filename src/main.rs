// Entry point and high-level CLI flow.
//
// - Option [1] loads and cleans the CSV, printing diagnostics.
// - Option [2] computes the four dashboard views under an explicit
//   select-all filter, exports them, and previews each table.
// - After generating views, the user can go back to the menu or exit.
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use superstore_report::filter::FilterSpec;
use superstore_report::loader::LoadCache;
use superstore_report::output;
use superstore_report::types::DashboardSummary;
use superstore_report::util::{format_int, format_number};
use superstore_report::views::{self, Metric};

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask whether to go back to the menu after the views were generated.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and clean the source file through the cache.
///
/// Returns `true` on success so the menu knows views can be generated.
fn handle_load(cache: &mut LoadCache, path: &Path) -> bool {
    match cache.load(path) {
        Ok((records, report)) => {
            println!(
                "Processing dataset... ({} rows read, {} cleaned records)",
                format_int(report.total_rows as i64),
                format_int(records.len() as i64)
            );
            if report.parse_errors + report.skipped_amounts > 0 {
                println!(
                    "Note: {} rows skipped ({} unreadable, {} with unparseable amounts).",
                    format_int((report.parse_errors + report.skipped_amounts) as i64),
                    format_int(report.parse_errors as i64),
                    format_int(report.skipped_amounts as i64)
                );
            }
            if report.date_errors > 0 {
                println!(
                    "Note: {} records kept with unparseable dates.",
                    format_int(report.date_errors as i64)
                );
            }
            if report.imputed_postal > 0 {
                println!(
                    "Info: Imputed postal code for {} rows.",
                    format_int(report.imputed_postal as i64)
                );
            }
            if report.duplicates_removed > 0 {
                println!(
                    "Info: Removed {} exact duplicate rows.",
                    format_int(report.duplicates_removed as i64)
                );
            }
            println!();
            true
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
            false
        }
    }
}

/// Handle option [2]: compute and export all dashboard views.
///
/// This function is intentionally side-effectful:
/// - writes three CSV files and a JSON summary,
/// - and prints Markdown previews of each view to the console.
fn handle_views(cache: &mut LoadCache, path: &Path) {
    let (records, _) = match cache.load(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
            return;
        }
    };

    let spec = FilterSpec::select_all(records);
    let subset = spec.apply(records);

    println!("Computing dashboard views...\n");

    let kpi = views::kpi(&subset);
    println!("KPI (years {}-{}):", spec.min_year, spec.max_year);
    println!("  Total Sales:     {}", format_number(kpi.total_sales, 2));
    println!("  Total Profit:    {}", format_number(kpi.total_profit, 2));
    println!(
        "  Distinct Orders: {}\n",
        format_int(kpi.distinct_order_count as u64)
    );

    for metric in [Metric::Sales, Metric::Profit] {
        let top = views::top_products(&subset, metric);
        let file = match metric {
            Metric::Sales => "top10_products_sales.csv",
            Metric::Profit => "top10_products_profit.csv",
        };
        if let Err(e) = output::write_csv(file, &top) {
            eprintln!("Write error: {}", e);
        }
        println!("Top 10 Products by {}", metric.label());
        output::preview_table(&top, 10);
        println!("(Full table exported to {})\n", file);
    }

    let shipping = views::shipping_stats(&subset);
    println!("Average Shipping Days");
    match shipping {
        Some(stats) => println!(
            "  mean {} (range {}-{})\n",
            format_number(stats.mean, 1),
            stats.min,
            stats.max
        ),
        None => println!("  undefined (no shipping durations in subset)\n"),
    }

    let trend = views::sales_trend(&subset);
    let trend_file = "sales_trend_by_category.csv";
    if let Err(e) = output::write_csv(trend_file, &trend) {
        eprintln!("Write error: {}", e);
    }
    println!("Sales Trends by Category");
    output::preview_table(&trend, 12);
    println!("(Full table exported to {})\n", trend_file);

    let summary = DashboardSummary { kpi, shipping };
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary exported to summary.json\n");
}

fn main() {
    env_logger::init();

    let path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "data.csv".to_string()),
    );
    // The cache is owned here and handed down; nothing global.
    let mut cache = LoadCache::new();
    let mut loaded = false;

    loop {
        println!("Superstore pipeline ({}):", path.display());
        println!("[1] Load and clean the data");
        println!("[2] Compute dashboard views\n");
        match read_choice().as_str() {
            "1" => {
                loaded = handle_load(&mut cache, &path);
            }
            "2" => {
                if !loaded {
                    println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
                    continue;
                }
                println!();
                handle_views(&mut cache, &path);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
