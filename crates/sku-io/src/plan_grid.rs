//! Addition plan CSV import.
//!
//! Layout mirrors the editable grid: header `category,Y1,Y2,...`, one row per
//! category. Year columns may be given as `Y3` or `3`, in any order, and may
//! cover only part of the horizon. Blank cells count as zero.

use crate::{line_of, open, IoError};
use sku_core::{validate_horizon, AdditionPlan, CategoryMaster, ValidationError};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing::info;

fn parse_year(header: &str) -> Option<u32> {
    let digits = header
        .strip_prefix('Y')
        .or_else(|| header.strip_prefix('y'))
        .unwrap_or(header);
    digits.parse().ok()
}

/// Read a category × year grid into a plan over `master` and `horizon`.
///
/// The horizon comes from the scenario, not the header, so a grid may leave
/// later years blank.
pub fn read_plan_grid<R: Read>(
    reader: R,
    master: &CategoryMaster,
    horizon: u32,
) -> Result<AdditionPlan, IoError> {
    validate_horizon(horizon)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut years = Vec::with_capacity(headers.len().saturating_sub(1));
    let mut seen_years = BTreeSet::new();
    for h in headers.iter().skip(1) {
        let year = parse_year(h).ok_or_else(|| IoError::Row {
            line: 1,
            message: format!("column {h:?} is not a year (expected Y1, Y2, ...)"),
        })?;
        if year == 0 || year > horizon {
            return Err(IoError::InvalidRow {
                line: 1,
                source: ValidationError::YearOutOfRange { year, horizon },
            });
        }
        if !seen_years.insert(year) {
            return Err(IoError::Row {
                line: 1,
                message: format!("year {year} appears twice"),
            });
        }
        years.push(year);
    }

    let mut plan = AdditionPlan::new(master, horizon);
    let mut seen_categories = BTreeSet::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = line_of(&record);
        let category = &record[0];
        if !master.contains(category) {
            return Err(IoError::InvalidRow {
                line,
                source: ValidationError::UnknownCategory(category.to_string()),
            });
        }
        if !seen_categories.insert(category.to_string()) {
            return Err(IoError::Row {
                line,
                message: format!("category {category:?} appears twice"),
            });
        }
        for (cell, &year) in record.iter().skip(1).zip(&years) {
            if cell.is_empty() {
                continue;
            }
            let count: i64 = cell.parse().map_err(|_| IoError::Row {
                line,
                message: format!("count {cell:?} for {category} in Y{year} is not an integer"),
            })?;
            plan.set(category, year, count)
                .map_err(|source| IoError::InvalidRow { line, source })?;
        }
    }

    info!(horizon, total = plan.total(), "loaded addition plan");
    Ok(plan)
}

/// Read a plan grid from a CSV file path.
pub fn read_plan_grid_file(
    path: &Path,
    master: &CategoryMaster,
    horizon: u32,
) -> Result<AdditionPlan, IoError> {
    read_plan_grid(open(path)?, master, horizon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_grid_with_blank_cells() {
        let master = CategoryMaster::default();
        let data = "\
category,Y1,Y2,Y3
MRO,10,,5
Medical,0,2,
";
        let plan = read_plan_grid(data.as_bytes(), &master, 3).unwrap();
        assert_eq!(plan.get("MRO", 1), 10);
        assert_eq!(plan.get("MRO", 2), 0);
        assert_eq!(plan.get("MRO", 3), 5);
        assert_eq!(plan.get("Medical", 2), 2);
        assert_eq!(plan.get("OA/PC", 1), 0);
        assert_eq!(plan.total(), 17);
    }

    #[test]
    fn accepts_partial_and_reordered_year_columns() {
        let master = CategoryMaster::default();
        let plan = read_plan_grid("c,5,y2\nMRO,1,2\n".as_bytes(), &master, 5).unwrap();
        assert_eq!(plan.get("MRO", 5), 1);
        assert_eq!(plan.get("MRO", 2), 2);
    }

    #[test]
    fn rejects_negative_counts_with_line() {
        let master = CategoryMaster::default();
        let err = read_plan_grid("c,Y1\nMRO,3\nMedical,-2\n".as_bytes(), &master, 1).unwrap_err();
        assert!(matches!(
            err,
            IoError::InvalidRow {
                line: 3,
                source: ValidationError::NegativeCount { count: -2, .. }
            }
        ));
    }

    #[test]
    fn rejects_fractional_counts() {
        let master = CategoryMaster::default();
        let err = read_plan_grid("c,Y1\nMRO,1.5\n".as_bytes(), &master, 1).unwrap_err();
        assert!(matches!(err, IoError::Row { line: 2, .. }));
    }

    #[test]
    fn rejects_unknown_category() {
        let master = CategoryMaster::default();
        let err = read_plan_grid("c,Y1\nToys,1\n".as_bytes(), &master, 1).unwrap_err();
        assert!(matches!(
            err,
            IoError::InvalidRow {
                source: ValidationError::UnknownCategory(_),
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_headers() {
        let master = CategoryMaster::default();
        assert!(read_plan_grid("c,Year\nMRO,1\n".as_bytes(), &master, 3).is_err());
        assert!(read_plan_grid("c,Y4\nMRO,1\n".as_bytes(), &master, 3).is_err());
        assert!(read_plan_grid("c,Y1,Y1\nMRO,1,1\n".as_bytes(), &master, 3).is_err());
    }

    #[test]
    fn rejects_horizon_beyond_maximum() {
        let master = CategoryMaster::default();
        let err = read_plan_grid("c,Y1\nMRO,1\n".as_bytes(), &master, u32::MAX).unwrap_err();
        assert!(matches!(
            err,
            IoError::Invalid(ValidationError::HorizonTooLong { .. })
        ));
    }
}
