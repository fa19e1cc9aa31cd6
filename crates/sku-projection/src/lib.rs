#![deny(warnings)]

//! Projection engine: turns an addition plan into revenue and labor records.
//!
//! Every plan cell `(category, origin year t, added)` fans out into one labor
//! record at `t` and one sales record per realization year `t..=T`. The
//! realization factor depends only on the item's age:
//! - age 0: `r0`
//! - age 1: `r1`
//! - age k >= 2: `r2 * (1 - d)^(k - 2)`
//!
//! Records are generated first as an ordered sequence of immutable values and
//! folded into summaries afterwards by [`aggregate`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sku_core::{
    validate_config, AdditionPlan, CategoryMaster, LaborParameters, LaborRecord,
    ProjectionConfig, SalesParameters, SalesRecord, ValidationError, YearSummary,
};
use thiserror::Error;
use tracing::{debug, info};

pub mod aggregate;

pub use aggregate::{CategoryPivot, PivotRow, YearLabor, YearRevenue};

/// Errors produced by a projection run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// Input or configuration rejected before computation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// A monetary or hour value exceeded the representable range.
    #[error("arithmetic overflow for category {category} in year {year}")]
    Overflow { category: String, year: u32 },
    /// An aggregated total exceeded the representable range.
    #[error("arithmetic overflow while aggregating the {table} table")]
    TotalOverflow { table: &'static str },
}

/// Raw output of the engine, prior to aggregation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub horizon: u32,
    /// One record per (origin year, category, realization year).
    pub sales: Vec<SalesRecord>,
    /// One record per non-zero plan cell, at its origin year.
    pub labor: Vec<LaborRecord>,
}

/// Per-unit realization factor for an item of the given age.
pub fn realization_factor(age: u32, sales: &SalesParameters) -> Decimal {
    match age {
        0 => sales.r0,
        1 => sales.r1,
        _ => {
            let keep = Decimal::ONE - sales.d;
            let mut factor = sales.r2;
            for _ in 2..age {
                factor *= keep;
            }
            factor
        }
    }
}

/// Revenue realized at `age` by `added` items priced at `unit_price`.
///
/// Returns `None` on overflow.
pub fn contribution(
    added: u64,
    unit_price: Decimal,
    age: u32,
    sales: &SalesParameters,
) -> Option<Decimal> {
    Decimal::from(added)
        .checked_mul(sales.q)?
        .checked_mul(unit_price)?
        .checked_mul(realization_factor(age, sales))
}

/// Registration hours and cost for `added` items.
///
/// Returns `None` on overflow.
pub fn registration_labor(added: u64, labor: &LaborParameters) -> Option<(Decimal, Decimal)> {
    let hours = Decimal::from(added)
        .checked_mul(labor.minutes_per_sku)?
        .checked_div(Decimal::from(60u32))?;
    let cost = hours.checked_mul(labor.wage_per_hour)?;
    Some((hours, cost))
}

fn check_consistency(
    master: &CategoryMaster,
    plan: &AdditionPlan,
    cfg: &ProjectionConfig,
) -> Result<(), ValidationError> {
    validate_config(cfg)?;
    if plan.horizon() != cfg.horizon {
        return Err(ValidationError::HorizonMismatch {
            plan: plan.horizon(),
            config: cfg.horizon,
        });
    }
    if let Some(missing) = plan.categories().iter().find(|c| !master.contains(c)) {
        return Err(ValidationError::UnknownCategory(missing.clone()));
    }
    Ok(())
}

/// Run the recurrence over every non-zero plan cell.
///
/// The plan is only read. Output order: origin year, then category in plan
/// order, then realization year.
pub fn project(
    master: &CategoryMaster,
    plan: &AdditionPlan,
    cfg: &ProjectionConfig,
) -> Result<Projection, ProjectionError> {
    check_consistency(master, plan, cfg)?;
    let priced = master.adjusted(cfg.price_factor)?;
    let horizon = cfg.horizon;

    let mut sales = Vec::new();
    let mut labor = Vec::new();
    for entry in plan.entries() {
        let overflow = || ProjectionError::Overflow {
            category: entry.category.to_string(),
            year: entry.year,
        };
        let unit_price = priced
            .price(entry.category)
            .ok_or_else(|| ValidationError::UnknownCategory(entry.category.to_string()))?;

        let (hours, cost) = registration_labor(entry.count, &cfg.labor).ok_or_else(overflow)?;
        labor.push(LaborRecord {
            year: entry.year,
            category: entry.category.to_string(),
            hours,
            cost,
        });

        for future in entry.year..=horizon {
            let age = future - entry.year;
            let revenue =
                contribution(entry.count, unit_price, age, &cfg.sales).ok_or_else(overflow)?;
            sales.push(SalesRecord {
                year: future,
                category: entry.category.to_string(),
                revenue,
            });
        }
        debug!(
            category = entry.category,
            year = entry.year,
            added = entry.count,
            "expanded plan cell"
        );
    }

    info!(
        horizon,
        sales_records = sales.len(),
        labor_records = labor.len(),
        "projection complete"
    );
    Ok(Projection {
        horizon,
        sales,
        labor,
    })
}

/// Fully validated inputs of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scenario {
    pub master: CategoryMaster,
    pub plan: AdditionPlan,
    pub config: ProjectionConfig,
}

/// Every output of a run, produced together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub config: ProjectionConfig,
    /// Year summary for years 1..=horizon.
    pub summary: Vec<YearSummary>,
    /// Category × year revenue matrix.
    pub pivot: CategoryPivot,
    /// Revenue grouped by (year, category).
    pub sales: Vec<SalesRecord>,
    /// Registration labor grouped by (year, category).
    pub labor: Vec<LaborRecord>,
}

/// Project and aggregate in one pass.
pub fn simulate(scenario: &Scenario) -> Result<SimulationReport, ProjectionError> {
    let Scenario {
        master,
        plan,
        config,
    } = scenario;
    let projection = project(master, plan, config)?;
    let horizon = projection.horizon;
    let overflow = |table| ProjectionError::TotalOverflow { table };

    let revenue =
        aggregate::sales_by_year(&projection.sales, horizon).ok_or_else(|| overflow("sales"))?;
    let labor =
        aggregate::labor_by_year(&projection.labor, horizon).ok_or_else(|| overflow("labor"))?;
    let summary = aggregate::summary(&revenue, &labor).ok_or_else(|| overflow("summary"))?;
    let pivot = aggregate::category_pivot(&projection.sales, master, horizon)
        .ok_or_else(|| overflow("pivot"))?;
    let sales = aggregate::sales_by_category(&projection.sales, master, horizon)
        .ok_or_else(|| overflow("sales"))?;
    let labor = aggregate::labor_by_category(&projection.labor, master, horizon)
        .ok_or_else(|| overflow("labor"))?;

    Ok(SimulationReport {
        config: config.clone(),
        summary,
        pivot,
        sales,
        labor,
    })
}
