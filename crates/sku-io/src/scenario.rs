//! YAML scenario files.
//!
//! A scenario names the horizon, parameters, category source and plan of one
//! run. Every field has a default, so an empty file describes the built-in
//! categories with an all-zero plan over ten years.

use crate::{read_categories_file, read_plan_grid_file, IoError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sku_core::{
    validate_config, AdditionPlan, Category, CategoryMaster, LaborParameters, ProjectionConfig,
    SalesParameters,
};
use sku_projection::Scenario;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single plan cell given inline in the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanCell {
    pub category: String,
    pub year: u32,
    pub count: i64,
}

/// On-disk scenario description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ScenarioFile {
    pub horizon: u32,
    pub price_factor: Decimal,
    pub sales: SalesParameters,
    pub labor: LaborParameters,
    /// Category master CSV; mutually exclusive with `categories`.
    pub categories_csv: Option<PathBuf>,
    pub categories: Option<Vec<Category>>,
    /// Plan grid CSV, applied before the inline `plan` cells.
    pub plan_csv: Option<PathBuf>,
    pub plan: Vec<PlanCell>,
}

impl Default for ScenarioFile {
    fn default() -> Self {
        let cfg = ProjectionConfig::default();
        Self {
            horizon: cfg.horizon,
            price_factor: cfg.price_factor,
            sales: cfg.sales,
            labor: cfg.labor,
            categories_csv: None,
            categories: None,
            plan_csv: None,
            plan: Vec::new(),
        }
    }
}

impl ScenarioFile {
    pub fn from_yaml_str(text: &str) -> Result<Self, IoError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read a scenario file; relative CSV paths resolve against its directory.
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let text = std::fs::read_to_string(path).map_err(|source| IoError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file = Self::from_yaml_str(&text)?;
        if let Some(base) = path.parent() {
            file.resolve_paths(base);
        }
        Ok(file)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for p in [&mut self.categories_csv, &mut self.plan_csv]
            .into_iter()
            .flatten()
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    pub fn config(&self) -> ProjectionConfig {
        ProjectionConfig {
            horizon: self.horizon,
            price_factor: self.price_factor,
            sales: self.sales.clone(),
            labor: self.labor.clone(),
        }
    }

    fn master(&self) -> Result<CategoryMaster, IoError> {
        match (&self.categories_csv, &self.categories) {
            (Some(_), Some(_)) => Err(IoError::Scenario(
                "categories_csv and categories are mutually exclusive".to_string(),
            )),
            (Some(path), None) => read_categories_file(path),
            (None, Some(rows)) => Ok(CategoryMaster::from_rows(
                rows.iter().map(|c| (c.name.clone(), c.price)),
            )?),
            (None, None) => Ok(CategoryMaster::default()),
        }
    }

    /// Validate and assemble the inputs of a run.
    pub fn build(&self) -> Result<Scenario, IoError> {
        let config = self.config();
        validate_config(&config)?;
        let master = self.master()?;
        let mut plan = match &self.plan_csv {
            Some(path) => read_plan_grid_file(path, &master, self.horizon)?,
            None => AdditionPlan::new(&master, self.horizon),
        };
        for cell in &self.plan {
            plan.set(&cell.category, cell.year, cell.count)?;
        }
        debug!(
            horizon = self.horizon,
            categories = master.len(),
            planned = plan.total(),
            "scenario built"
        );
        Ok(Scenario {
            master,
            plan,
            config,
        })
    }
}

/// Read, resolve and validate a scenario file in one step.
pub fn load_scenario(path: &Path) -> Result<Scenario, IoError> {
    ScenarioFile::from_path(path)?.build()
}
