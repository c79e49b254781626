// CSV catalog loading
use faqx_core::{Catalog, Error, QaEntry, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns every catalog file must carry; others are ignored
pub const REQUIRED_COLUMNS: [&str; 4] = ["product_id", "product_name", "question", "answer"];

#[derive(Debug, Deserialize)]
struct CatalogRow {
    product_id: String,
    product_name: String,
    question: String,
    answer: String,
}

impl From<CatalogRow> for QaEntry {
    fn from(row: CatalogRow) -> Self {
        QaEntry {
            product_id: row.product_id,
            product_name: row.product_name,
            question: row.question,
            answer: row.answer,
        }
    }
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::MalformedCatalog(format!("cannot open {}: {}", path.display(), e))
    })?;
    read_catalog(file)
}

/// Parse a catalog from CSV with a header row. Row order becomes entry order.
pub fn read_catalog<R: Read>(reader: R) -> Result<Catalog> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::MalformedCatalog(format!("unreadable header: {}", e)))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(Error::MalformedCatalog(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut entries = Vec::new();
    for (line, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = row.map_err(|e| {
            Error::MalformedCatalog(format!("row {}: {}", line + 1, e))
        })?;
        entries.push(QaEntry::from(row));
    }

    if entries.is_empty() {
        return Err(Error::MalformedCatalog("catalog has no rows".to_string()));
    }

    Catalog::from_entries(entries)
}
