//! CSV export of simulation reports (UTF-8, header row, comma separated).

use crate::IoError;
use rust_decimal::Decimal;
use sku_core::{LaborRecord, SalesRecord, YearSummary};
use sku_projection::{CategoryPivot, SimulationReport};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SUMMARY_FILE: &str = "summary.csv";
pub const SALES_FILE: &str = "sales_by_category.csv";
pub const LABOR_FILE: &str = "labor_by_category.csv";
pub const PIVOT_FILE: &str = "category_pivot.csv";

fn cell(value: Decimal) -> String {
    value.normalize().to_string()
}

/// `year,revenue,hours,labor_cost,net_profit`
pub fn write_summary<W: Write>(out: W, rows: &[YearSummary]) -> Result<(), IoError> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["year", "revenue", "hours", "labor_cost", "net_profit"])?;
    for r in rows {
        w.write_record([
            r.year.to_string(),
            cell(r.revenue),
            cell(r.hours),
            cell(r.labor_cost),
            cell(r.net_profit),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// `year,category,revenue`
pub fn write_sales<W: Write>(out: W, rows: &[SalesRecord]) -> Result<(), IoError> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["year", "category", "revenue"])?;
    for r in rows {
        w.write_record([r.year.to_string(), r.category.clone(), cell(r.revenue)])?;
    }
    w.flush()?;
    Ok(())
}

/// `year,category,hours,cost`
pub fn write_labor<W: Write>(out: W, rows: &[LaborRecord]) -> Result<(), IoError> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["year", "category", "hours", "cost"])?;
    for r in rows {
        w.write_record([
            r.year.to_string(),
            r.category.clone(),
            cell(r.hours),
            cell(r.cost),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// `category,Y1..YT,total`, followed by a `total` row of year totals.
pub fn write_pivot<W: Write>(out: W, pivot: &CategoryPivot) -> Result<(), IoError> {
    let mut w = csv::Writer::from_writer(out);
    let mut header = vec!["category".to_string()];
    header.extend(pivot.years.iter().map(|y| format!("Y{y}")));
    header.push("total".to_string());
    w.write_record(&header)?;

    for row in &pivot.rows {
        let mut rec = vec![row.category.clone()];
        rec.extend(row.revenue.iter().map(|v| cell(*v)));
        rec.push(cell(row.total));
        w.write_record(&rec)?;
    }
    let mut totals = vec!["total".to_string()];
    totals.extend(pivot.year_totals.iter().map(|v| cell(*v)));
    totals.push(cell(pivot.grand_total));
    w.write_record(&totals)?;
    w.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<std::fs::File, IoError> {
    std::fs::File::create(path).map_err(|source| IoError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// Write every report table into `dir`, creating it if needed.
///
/// Returns the written paths in a fixed order: summary, sales, labor, pivot.
pub fn export_report(report: &SimulationReport, dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    std::fs::create_dir_all(dir).map_err(|source| IoError::File {
        path: dir.to_path_buf(),
        source,
    })?;
    let paths: Vec<PathBuf> = [SUMMARY_FILE, SALES_FILE, LABOR_FILE, PIVOT_FILE]
        .iter()
        .map(|name| dir.join(name))
        .collect();

    write_summary(create(&paths[0])?, &report.summary)?;
    write_sales(create(&paths[1])?, &report.sales)?;
    write_labor(create(&paths[2])?, &report.labor)?;
    write_pivot(create(&paths[3])?, &report.pivot)?;

    info!(dir = %dir.display(), files = paths.len(), "exported report");
    Ok(paths)
}
