use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Export one view as CSV, one row per entry.
pub fn write_csv<P, T>(path: P, rows: &[T]) -> Result<(), Box<dyn Error>>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export a single value (summary struct) as pretty-printed JSON.
pub fn write_json<P, T>(path: P, value: &T) -> Result<(), Box<dyn Error>>
where
    P: AsRef<Path>,
    T: Serialize,
{
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Print up to `max_rows` entries of a view as a Markdown table.
pub fn preview_table<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let head: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if head.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!("{}\n", Table::new(head).with(Style::markdown()));
}
