use crate::clean::{clean, CleanReport};
use crate::types::{RawRow, Record};
use csv::ReaderBuilder;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::HashMap;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Columns the source file must carry; anything missing is fatal.
static REQUIRED_COLUMNS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Order ID",
        "Order Date",
        "Ship Date",
        "Category",
        "Sub-Category",
        "Segment",
        "Region",
        "City",
        "State",
        "Postal Code",
        "Product Name",
        "Sales",
        "Profit",
    ]
});

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Diagnostics for one load+clean run.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub cleaned_rows: usize,
    pub parse_errors: usize,
    pub skipped_amounts: usize,
    pub date_errors: usize,
    pub imputed_postal: usize,
    pub duplicates_removed: usize,
}

impl LoadReport {
    fn from_clean(parse_errors: usize, cleaned_rows: usize, c: &CleanReport) -> Self {
        LoadReport {
            total_rows: c.total_rows + parse_errors,
            cleaned_rows,
            parse_errors,
            skipped_amounts: c.skipped_amounts,
            date_errors: c.date_errors,
            imputed_postal: c.imputed_postal,
            duplicates_removed: c.duplicates_removed,
        }
    }
}

/// Read raw rows from CSV bytes after validating the header row. Rows that
/// fail deserialization are skipped and counted, not fatal.
pub fn read_raw(bytes: &[u8]) -> Result<(Vec<RawRow>, usize), LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == **c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::Schema { missing });
    }

    let mut rows = Vec::new();
    let mut parse_errors = 0usize;
    for result in rdr.deserialize::<RawRow>() {
        match result {
            Ok(r) => rows.push(r),
            Err(e) => {
                debug!("skipping undeserializable row: {e}");
                parse_errors += 1;
            }
        }
    }
    Ok((rows, parse_errors))
}

struct CacheEntry {
    fingerprint: u64,
    records: Vec<Record>,
    report: LoadReport,
}

/// Memo of cleaned datasets, keyed by path with a content fingerprint.
///
/// The caller owns the cache and threads it through explicitly; a repeat
/// load of an unchanged file returns the cached dataset without re-reading
/// rows, while a content change rebuilds the entry. The cached records are
/// never mutated after construction.
#[derive(Default)]
pub struct LoadCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load, clean, and memoize the dataset at `path`.
    pub fn load(&mut self, path: &Path) -> Result<(&[Record], &LoadReport), LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fingerprint = content_fingerprint(&bytes);

        let entry = match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(mut occ) => {
                if occ.get().fingerprint != fingerprint {
                    info!("content changed for {}, rebuilding dataset", path.display());
                    *occ.get_mut() = build_entry(&bytes, fingerprint)?;
                } else {
                    debug!("cache hit for {}", path.display());
                }
                occ.into_mut()
            }
            Entry::Vacant(vac) => vac.insert(build_entry(&bytes, fingerprint)?),
        };
        Ok((&entry.records, &entry.report))
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }
}

fn build_entry(bytes: &[u8], fingerprint: u64) -> Result<CacheEntry, LoadError> {
    let (raws, parse_errors) = read_raw(bytes)?;
    let (records, clean_report) = clean(raws);
    if parse_errors > 0 || clean_report.skipped_amounts > 0 {
        warn!(
            "{} rows unreadable, {} rows with unparseable amounts",
            parse_errors, clean_report.skipped_amounts
        );
    }
    let report = LoadReport::from_clean(parse_errors, records.len(), &clean_report);
    Ok(CacheEntry {
        fingerprint,
        records,
        report,
    })
}

fn content_fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish()
}
