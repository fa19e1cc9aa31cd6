//! Category master: the category → average unit price reference table.

use crate::{validate_price_factor, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Built-in categories used when no external table is supplied.
const DEFAULT_CATEGORIES: [(&str, i64); 7] = [
    ("OA/PC", 50_000),
    ("Stationery", 500),
    ("Household", 1_500),
    ("Furniture", 20_000),
    ("MRO", 3_000),
    ("Medical", 8_000),
    ("Other", 10_000),
];

/// A catalog category with its average unit price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Average unit price (> 0).
    pub price: Decimal,
}

/// Ordered, duplicate-free set of categories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryMaster {
    categories: Vec<Category>,
}

impl CategoryMaster {
    /// Build a master from ordered `(name, price)` rows.
    ///
    /// Names are trimmed. Empty names, duplicates, non-positive prices and an
    /// empty table are rejected.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let mut categories = Vec::new();
        for (name, price) in rows {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(ValidationError::EmptyCategoryName);
            }
            if price <= Decimal::ZERO {
                return Err(ValidationError::NonPositivePrice {
                    category: name,
                    price,
                });
            }
            if !seen.insert(name.clone()) {
                return Err(ValidationError::DuplicateCategory(name));
            }
            categories.push(Category { name, price });
        }
        if categories.is_empty() {
            return Err(ValidationError::EmptyMaster);
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Index of `name` in load order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Unadjusted average unit price.
    pub fn price(&self, name: &str) -> Option<Decimal> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.price)
    }

    /// Price of `name` multiplied by `factor`.
    pub fn adjusted_price(&self, name: &str, factor: Decimal) -> Result<Decimal, ValidationError> {
        validate_price_factor(factor)?;
        let price = self
            .price(name)
            .ok_or_else(|| ValidationError::UnknownCategory(name.to_string()))?;
        price
            .checked_mul(factor)
            .ok_or_else(|| ValidationError::PriceOverflow {
                category: name.to_string(),
                factor,
            })
    }

    /// A copy of this master with every price multiplied by `factor`.
    pub fn adjusted(&self, factor: Decimal) -> Result<Self, ValidationError> {
        validate_price_factor(factor)?;
        let categories = self
            .categories
            .iter()
            .map(|c| {
                Ok(Category {
                    name: c.name.clone(),
                    price: self.adjusted_price(&c.name, factor)?,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        Ok(Self { categories })
    }
}

impl Default for CategoryMaster {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, price)| Category {
                    name: (*name).to_string(),
                    price: Decimal::new(*price, 0),
                })
                .collect(),
        }
    }
}
