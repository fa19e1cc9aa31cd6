#![deny(warnings)]

//! Core domain models and invariants for the SKU planner.
//!
//! This crate defines the serializable inputs of a projection run (category
//! master, addition plan, sales and labor parameters) and the record types the
//! projection produces, together with validation helpers that reject
//! out-of-range input before any computation starts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod master;
pub mod plan;

pub use master::{Category, CategoryMaster};
pub use plan::{AdditionPlan, PlanEntry};

/// Longest supported simulation horizon, in years.
pub const MAX_HORIZON: u32 = 20;

/// Validation errors for inputs and configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Category names must contain non-whitespace text.
    #[error("category name must not be empty")]
    EmptyCategoryName,
    /// Each category may appear only once in the master.
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),
    /// A category master needs at least one row.
    #[error("category master is empty")]
    EmptyMaster,
    /// Average unit price must be strictly positive.
    #[error("price for category {category} must be > 0, got {price}")]
    NonPositivePrice { category: String, price: Decimal },
    /// The global price factor must be strictly positive.
    #[error("price factor must be > 0, got {0}")]
    NonPositiveFactor(Decimal),
    /// Category referenced by the plan is not present in the master.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    /// Plan counts must be non-negative.
    #[error("negative count {count} for category {category} in year {year}")]
    NegativeCount {
        category: String,
        year: u32,
        count: i64,
    },
    /// Plan year outside [1, horizon].
    #[error("year {year} is outside the simulation horizon [1, {horizon}]")]
    YearOutOfRange { year: u32, horizon: u32 },
    /// Plan horizon differs from the configured horizon.
    #[error("plan covers {plan} years but the configuration horizon is {config}")]
    HorizonMismatch { plan: u32, config: u32 },
    /// A rate lies outside its declared inclusive range.
    #[error("{field} must be within [{min}, {max}], got {value}")]
    RateOutOfRange {
        field: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },
    /// Adjusted price no longer fits in a Decimal.
    #[error("price for category {category} overflows when multiplied by {factor}")]
    PriceOverflow { category: String, factor: Decimal },
    /// Horizon beyond [`MAX_HORIZON`].
    #[error("horizon {horizon} exceeds the supported maximum of {max} years")]
    HorizonTooLong { horizon: u32, max: u32 },
    /// Labor inputs must be strictly positive.
    #[error("{field} must be > 0, got {value}")]
    NonPositiveLabor { field: &'static str, value: Decimal },
}

/// Sales realization parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SalesParameters {
    /// Sell-through rate: fraction of an added item's face value realized per
    /// full-effect year, in [0,1].
    pub q: Decimal,
    /// Ramp factor for an item's first year of life, in [0,1].
    pub r0: Decimal,
    /// Ramp factor for an item's second year of life, in [0,1].
    pub r1: Decimal,
    /// Steady-state factor from the third year on, in [0,1].
    pub r2: Decimal,
    /// Annual decay applied from the third year on, in [0,0.5].
    pub d: Decimal,
}

impl Default for SalesParameters {
    fn default() -> Self {
        Self {
            q: Decimal::new(2, 1),
            r0: Decimal::new(5, 1),
            r1: Decimal::new(8, 1),
            r2: Decimal::ONE,
            d: Decimal::new(5, 2),
        }
    }
}

/// Registration labor parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LaborParameters {
    /// Minutes needed to register one SKU (> 0).
    pub minutes_per_sku: Decimal,
    /// Hourly wage (> 0).
    pub wage_per_hour: Decimal,
    /// Monthly working hours per worker (> 0). Carried for staffing
    /// calculations; the projection itself does not read it.
    pub hours_per_month: Decimal,
}

impl Default for LaborParameters {
    fn default() -> Self {
        Self {
            minutes_per_sku: Decimal::new(40, 0),
            wage_per_hour: Decimal::new(2000, 0),
            hours_per_month: Decimal::new(160, 0),
        }
    }
}

/// Immutable configuration for one projection run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of simulated years; years are numbered 1..=horizon, at most
    /// [`MAX_HORIZON`].
    pub horizon: u32,
    /// Multiplier applied to every category price before computation.
    pub price_factor: Decimal,
    pub sales: SalesParameters,
    pub labor: LaborParameters,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon: 10,
            price_factor: Decimal::ONE,
            sales: SalesParameters::default(),
            labor: LaborParameters::default(),
        }
    }
}

/// Revenue realized in `year` by the SKUs of one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub year: u32,
    pub category: String,
    pub revenue: Decimal,
}

/// Registration effort spent in `year` on one category's new SKUs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborRecord {
    pub year: u32,
    pub category: String,
    pub hours: Decimal,
    pub cost: Decimal,
}

/// Year-level totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub revenue: Decimal,
    pub hours: Decimal,
    pub labor_cost: Decimal,
    /// `revenue - labor_cost`; may be negative.
    pub net_profit: Decimal,
}

fn check_rate(field: &'static str, value: Decimal, max: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > max {
        return Err(ValidationError::RateOutOfRange {
            field,
            value,
            min: Decimal::ZERO,
            max,
        });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveLabor { field, value });
    }
    Ok(())
}

/// Validate sales parameters: `q`, `r0`, `r1`, `r2` in [0,1] and `d` in [0,0.5].
pub fn validate_sales(p: &SalesParameters) -> Result<(), ValidationError> {
    check_rate("q", p.q, Decimal::ONE)?;
    check_rate("r0", p.r0, Decimal::ONE)?;
    check_rate("r1", p.r1, Decimal::ONE)?;
    check_rate("r2", p.r2, Decimal::ONE)?;
    check_rate("d", p.d, Decimal::new(5, 1))?;
    Ok(())
}

/// Validate labor parameters; every field must be strictly positive.
pub fn validate_labor(p: &LaborParameters) -> Result<(), ValidationError> {
    check_positive("minutes_per_sku", p.minutes_per_sku)?;
    check_positive("wage_per_hour", p.wage_per_hour)?;
    check_positive("hours_per_month", p.hours_per_month)?;
    Ok(())
}

/// Validate the global price factor.
pub fn validate_price_factor(factor: Decimal) -> Result<(), ValidationError> {
    if factor <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveFactor(factor));
    }
    Ok(())
}

/// Validate the horizon against [`MAX_HORIZON`]. Zero is allowed.
pub fn validate_horizon(horizon: u32) -> Result<(), ValidationError> {
    if horizon > MAX_HORIZON {
        return Err(ValidationError::HorizonTooLong {
            horizon,
            max: MAX_HORIZON,
        });
    }
    Ok(())
}

/// Validate a whole projection configuration.
pub fn validate_config(cfg: &ProjectionConfig) -> Result<(), ValidationError> {
    validate_horizon(cfg.horizon)?;
    validate_price_factor(cfg.price_factor)?;
    validate_sales(&cfg.sales)?;
    validate_labor(&cfg.labor)?;
    Ok(())
}
