//! Addition plan: how many SKUs are added per category per year.

use crate::{CategoryMaster, ValidationError};
use serde::Serialize;
use tracing::trace;

/// One non-zero cell of the plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanEntry<'a> {
    pub category: &'a str,
    /// Origin year, in 1..=horizon.
    pub year: u32,
    pub count: u64,
}

/// Dense category × year grid of SKU additions, zero by default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdditionPlan {
    categories: Vec<String>,
    horizon: u32,
    // Row-major: counts[category_index * horizon + (year - 1)]
    counts: Vec<u64>,
}

impl AdditionPlan {
    /// Empty plan over the master's categories and years 1..=horizon.
    pub fn new(master: &CategoryMaster, horizon: u32) -> Self {
        let categories: Vec<String> = master.names().map(str::to_string).collect();
        let counts = vec![0; categories.len() * horizon as usize];
        Self {
            categories,
            horizon,
            counts,
        }
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Categories the plan is keyed by, in master order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    fn index(&self, category: &str, year: u32) -> Option<usize> {
        if year == 0 || year > self.horizon {
            return None;
        }
        let row = self.categories.iter().position(|c| c == category)?;
        Some(row * self.horizon as usize + (year - 1) as usize)
    }

    /// Set the number of SKUs added for `category` in `year`.
    pub fn set(&mut self, category: &str, year: u32, count: i64) -> Result<(), ValidationError> {
        if !self.categories.iter().any(|c| c == category) {
            return Err(ValidationError::UnknownCategory(category.to_string()));
        }
        if count < 0 {
            return Err(ValidationError::NegativeCount {
                category: category.to_string(),
                year,
                count,
            });
        }
        let idx = self
            .index(category, year)
            .ok_or(ValidationError::YearOutOfRange {
                year,
                horizon: self.horizon,
            })?;
        trace!(category, year, count, "plan cell set");
        self.counts[idx] = count as u64;
        Ok(())
    }

    /// Count for a cell; zero for cells never set or outside the grid.
    pub fn get(&self, category: &str, year: u32) -> u64 {
        self.index(category, year)
            .map(|idx| self.counts[idx])
            .unwrap_or(0)
    }

    /// Non-zero cells, ordered by origin year and then by category order.
    pub fn entries(&self) -> impl Iterator<Item = PlanEntry<'_>> + '_ {
        let horizon = self.horizon as usize;
        (0..horizon).flat_map(move |col| {
            self.categories
                .iter()
                .enumerate()
                .filter_map(move |(row, category)| {
                    let count = self.counts[row * horizon + col];
                    (count > 0).then(|| PlanEntry {
                        category: category.as_str(),
                        year: col as u32 + 1,
                        count,
                    })
                })
        })
    }

    /// Sum of all counts, widened so any number of `i64::MAX` cells fits.
    pub fn total(&self) -> u128 {
        self.counts.iter().map(|&c| u128::from(c)).sum()
    }
}
