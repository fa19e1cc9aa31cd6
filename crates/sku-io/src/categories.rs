//! Category master CSV import.
//!
//! Expected layout: a header row, then `category, average unit price` rows.
//! Column names in the header are not checked, positions are.

use crate::{line_of, open, IoError};
use rust_decimal::Decimal;
use sku_core::{CategoryMaster, ValidationError};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim().replace(',', "");
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

/// Load a category master from CSV.
pub fn read_categories<R: Read>(reader: R) -> Result<CategoryMaster, IoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.len() != 2 {
        return Err(IoError::Row {
            line: 1,
            message: format!("expected 2 columns (category, price), found {}", headers.len()),
        });
    }
    if parse_decimal(&headers[1]).is_some() {
        return Err(IoError::Row {
            line: 1,
            message: "header row required; first row looks like data".to_string(),
        });
    }

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = line_of(&record);
        let name = record[0].to_string();
        let price = parse_decimal(&record[1]).ok_or_else(|| IoError::Row {
            line,
            message: format!("price {:?} is not a number", &record[1]),
        })?;
        if price <= Decimal::ZERO {
            return Err(IoError::InvalidRow {
                line,
                source: ValidationError::NonPositivePrice {
                    category: name,
                    price,
                },
            });
        }
        rows.push((name, price));
    }

    let master = CategoryMaster::from_rows(rows)?;
    info!(categories = master.len(), "loaded category master");
    Ok(master)
}

/// Load a category master from a CSV file path.
pub fn read_categories_file(path: &Path) -> Result<CategoryMaster, IoError> {
    read_categories(open(path)?)
}
