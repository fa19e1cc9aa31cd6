//! Aggregation of raw projection records into year and category views.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sku_core::{CategoryMaster, LaborRecord, SalesRecord, YearSummary};
use std::collections::BTreeMap;
use tracing::warn;

/// Total revenue of one year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRevenue {
    pub year: u32,
    pub revenue: Decimal,
}

/// Total registration effort of one year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearLabor {
    pub year: u32,
    pub hours: Decimal,
    pub cost: Decimal,
}

/// One category's revenue across the horizon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRow {
    pub category: String,
    /// Revenue per year; index 0 is year 1.
    pub revenue: Vec<Decimal>,
    pub total: Decimal,
}

/// Category × year revenue matrix, zero-filled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPivot {
    pub years: Vec<u32>,
    pub rows: Vec<PivotRow>,
    pub year_totals: Vec<Decimal>,
    pub grand_total: Decimal,
}

impl CategoryPivot {
    /// Revenue for a single cell; zero when absent.
    pub fn get(&self, category: &str, year: u32) -> Decimal {
        let Some(col) = self.years.iter().position(|&y| y == year) else {
            return Decimal::ZERO;
        };
        self.rows
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.revenue[col])
            .unwrap_or(Decimal::ZERO)
    }
}

fn zeroed<T: Clone>(horizon: u32, zero: T) -> BTreeMap<u32, T> {
    (1..=horizon).map(|y| (y, zero.clone())).collect()
}

fn checked_sum<'a, I: IntoIterator<Item = &'a Decimal>>(values: I) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

fn add_to(slot: &mut Decimal, v: Decimal) -> Option<()> {
    *slot = slot.checked_add(v)?;
    Some(())
}

/// Revenue per year, one row per year in 1..=horizon.
///
/// Records outside the horizon still produce a row so no revenue is dropped.
/// Returns `None` when a yearly total overflows.
pub fn sales_by_year(records: &[SalesRecord], horizon: u32) -> Option<Vec<YearRevenue>> {
    let mut by_year = zeroed(horizon, Decimal::ZERO);
    for r in records {
        add_to(by_year.entry(r.year).or_insert(Decimal::ZERO), r.revenue)?;
    }
    Some(
        by_year
            .into_iter()
            .map(|(year, revenue)| YearRevenue { year, revenue })
            .collect(),
    )
}

/// Hours and cost per year, one row per year in 1..=horizon.
///
/// Returns `None` when a yearly total overflows.
pub fn labor_by_year(records: &[LaborRecord], horizon: u32) -> Option<Vec<YearLabor>> {
    let mut by_year = zeroed(horizon, (Decimal::ZERO, Decimal::ZERO));
    for r in records {
        let slot = by_year
            .entry(r.year)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        add_to(&mut slot.0, r.hours)?;
        add_to(&mut slot.1, r.cost)?;
    }
    Some(
        by_year
            .into_iter()
            .map(|(year, (hours, cost))| YearLabor { year, hours, cost })
            .collect(),
    )
}

/// Outer join of the two yearly series; a missing side counts as zero.
///
/// Returns `None` when a total or a net profit overflows.
pub fn summary(sales: &[YearRevenue], labor: &[YearLabor]) -> Option<Vec<YearSummary>> {
    let mut joined: BTreeMap<u32, (Decimal, Decimal, Decimal)> = BTreeMap::new();
    for s in sales {
        add_to(&mut joined.entry(s.year).or_default().0, s.revenue)?;
    }
    for l in labor {
        let slot = joined.entry(l.year).or_default();
        add_to(&mut slot.1, l.hours)?;
        add_to(&mut slot.2, l.cost)?;
    }
    joined
        .into_iter()
        .map(|(year, (revenue, hours, labor_cost))| {
            Some(YearSummary {
                year,
                revenue,
                hours,
                labor_cost,
                net_profit: revenue.checked_sub(labor_cost)?,
            })
        })
        .collect()
}

/// Category × year revenue matrix in master order.
///
/// Records for categories outside the master or years outside the horizon are
/// skipped with a warning. Returns `None` when a cell or a total overflows.
pub fn category_pivot(
    records: &[SalesRecord],
    master: &CategoryMaster,
    horizon: u32,
) -> Option<CategoryPivot> {
    let width = horizon as usize;
    let mut rows: Vec<PivotRow> = master
        .names()
        .map(|name| PivotRow {
            category: name.to_string(),
            revenue: vec![Decimal::ZERO; width],
            total: Decimal::ZERO,
        })
        .collect();

    for r in records {
        let Some(row) = master.position(&r.category) else {
            warn!(category = %r.category, "pivot: unknown category skipped");
            continue;
        };
        if r.year == 0 || r.year > horizon {
            warn!(year = r.year, horizon, "pivot: year outside horizon skipped");
            continue;
        }
        add_to(&mut rows[row].revenue[(r.year - 1) as usize], r.revenue)?;
    }

    let mut year_totals = vec![Decimal::ZERO; width];
    for row in &mut rows {
        row.total = checked_sum(&row.revenue)?;
        for (acc, v) in year_totals.iter_mut().zip(&row.revenue) {
            add_to(acc, *v)?;
        }
    }
    let grand_total = checked_sum(&year_totals)?;

    Some(CategoryPivot {
        years: (1..=horizon).collect(),
        rows,
        year_totals,
        grand_total,
    })
}

/// Revenue grouped by (year, category): dense, year-major, master order.
pub fn sales_by_category(
    records: &[SalesRecord],
    master: &CategoryMaster,
    horizon: u32,
) -> Option<Vec<SalesRecord>> {
    let pivot = category_pivot(records, master, horizon)?;
    Some(
        pivot
            .years
            .iter()
            .enumerate()
            .flat_map(|(col, &year)| {
                pivot.rows.iter().map(move |row| SalesRecord {
                    year,
                    category: row.category.clone(),
                    revenue: row.revenue[col],
                })
            })
            .collect(),
    )
}

/// Hours and cost grouped by (year, category): dense, year-major, master order.
pub fn labor_by_category(
    records: &[LaborRecord],
    master: &CategoryMaster,
    horizon: u32,
) -> Option<Vec<LaborRecord>> {
    let width = horizon as usize;
    let mut grid = vec![(Decimal::ZERO, Decimal::ZERO); master.len() * width];
    for r in records {
        let Some(row) = master.position(&r.category) else {
            warn!(category = %r.category, "labor: unknown category skipped");
            continue;
        };
        if r.year == 0 || r.year > horizon {
            warn!(year = r.year, horizon, "labor: year outside horizon skipped");
            continue;
        }
        let cell = &mut grid[row * width + (r.year - 1) as usize];
        add_to(&mut cell.0, r.hours)?;
        add_to(&mut cell.1, r.cost)?;
    }

    let mut out = Vec::with_capacity(grid.len());
    for year in 1..=horizon {
        for (row, category) in master.names().enumerate() {
            let (hours, cost) = grid[row * width + (year - 1) as usize];
            out.push(LaborRecord {
                year,
                category: category.to_string(),
                hours,
                cost,
            });
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn master() -> CategoryMaster {
        CategoryMaster::from_rows(vec![("A", Decimal::ONE), ("B", Decimal::TEN)]).unwrap()
    }

    fn sale(year: u32, category: &str, revenue: i64) -> SalesRecord {
        SalesRecord {
            year,
            category: category.to_string(),
            revenue: Decimal::new(revenue, 0),
        }
    }

    fn work(year: u32, category: &str, hours: i64, cost: i64) -> LaborRecord {
        LaborRecord {
            year,
            category: category.to_string(),
            hours: Decimal::new(hours, 0),
            cost: Decimal::new(cost, 0),
        }
    }

    #[test]
    fn sales_by_year_is_dense() {
        let rows = sales_by_year(&[sale(2, "A", 5), sale(2, "B", 7)], 3).unwrap();
        let got: Vec<(u32, Decimal)> = rows.iter().map(|r| (r.year, r.revenue)).collect();
        assert_eq!(
            got,
            vec![
                (1, Decimal::ZERO),
                (2, Decimal::new(12, 0)),
                (3, Decimal::ZERO)
            ]
        );
    }

    #[test]
    fn labor_by_year_sums_hours_and_cost() {
        let rows = labor_by_year(&[work(1, "A", 2, 20), work(1, "B", 3, 30)], 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].hours, Decimal::new(5, 0));
        assert_eq!(rows[0].cost, Decimal::new(50, 0));
        assert_eq!(rows[1].cost, Decimal::ZERO);
    }

    #[test]
    fn summary_is_an_outer_join() {
        let sales = vec![YearRevenue {
            year: 2,
            revenue: Decimal::new(100, 0),
        }];
        let labor = vec![YearLabor {
            year: 1,
            hours: Decimal::new(4, 0),
            cost: Decimal::new(40, 0),
        }];
        let s = summary(&sales, &labor).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].year, 1);
        assert_eq!(s[0].revenue, Decimal::ZERO);
        assert_eq!(s[0].net_profit, Decimal::new(-40, 0));
        assert_eq!(s[1].year, 2);
        assert_eq!(s[1].labor_cost, Decimal::ZERO);
        assert_eq!(s[1].net_profit, Decimal::new(100, 0));
    }

    #[test]
    fn pivot_is_zero_filled_in_master_order() {
        let p = category_pivot(&[sale(2, "B", 3), sale(2, "B", 4)], &master(), 3).unwrap();
        assert_eq!(p.years, vec![1, 2, 3]);
        assert_eq!(p.rows[0].category, "A");
        assert_eq!(p.rows[0].revenue, vec![Decimal::ZERO; 3]);
        assert_eq!(p.get("B", 2), Decimal::new(7, 0));
        assert_eq!(p.get("B", 9), Decimal::ZERO);
        assert_eq!(p.rows[1].total, Decimal::new(7, 0));
        assert_eq!(p.year_totals[1], Decimal::new(7, 0));
        assert_eq!(p.grand_total, Decimal::new(7, 0));
    }

    #[test]
    fn pivot_skips_unknown_categories() {
        let p = category_pivot(&[sale(1, "Z", 3)], &master(), 1).unwrap();
        assert_eq!(p.grand_total, Decimal::ZERO);
    }

    #[test]
    fn long_form_tables_cover_every_year_and_category() {
        let s = sales_by_category(&[sale(1, "B", 3)], &master(), 2).unwrap();
        let keys: Vec<(u32, &str)> = s.iter().map(|r| (r.year, r.category.as_str())).collect();
        assert_eq!(keys, vec![(1, "A"), (1, "B"), (2, "A"), (2, "B")]);
        assert_eq!(s[1].revenue, Decimal::new(3, 0));

        let l = labor_by_category(&[work(2, "A", 1, 10), work(2, "A", 1, 10)], &master(), 2).unwrap();
        assert_eq!(l.len(), 4);
        assert_eq!(l[2].category, "A");
        assert_eq!(l[2].hours, Decimal::new(2, 0));
        assert_eq!(l[2].cost, Decimal::new(20, 0));
    }

    #[test]
    fn overflowing_totals_are_none() {
        let half = Decimal::MAX / Decimal::TWO + Decimal::TEN;
        let big = |year| SalesRecord {
            year,
            category: "A".to_string(),
            revenue: half,
        };
        assert!(sales_by_year(&[big(1), big(1)], 2).is_none());
        // Separate years fit per cell, but not in the row or grand total.
        assert!(sales_by_year(&[big(1), big(2)], 2).is_some());
        assert!(category_pivot(&[big(1), big(2)], &master(), 2).is_none());
        assert!(sales_by_category(&[big(1), big(2)], &master(), 2).is_none());

        let costly = LaborRecord {
            year: 1,
            category: "B".to_string(),
            hours: Decimal::ONE,
            cost: half,
        };
        assert!(labor_by_year(&[costly.clone(), costly.clone()], 1).is_none());
        assert!(labor_by_category(&[costly.clone(), costly], &master(), 1).is_none());

        let loss = summary(
            &[YearRevenue {
                year: 1,
                revenue: Decimal::MIN,
            }],
            &[YearLabor {
                year: 1,
                hours: Decimal::ONE,
                cost: Decimal::ONE,
            }],
        );
        assert!(loss.is_none());
    }

    proptest! {
        #[test]
        fn sales_aggregation_is_lossless(recs in proptest::collection::vec((1u32..=5, 0usize..2, 0i64..1_000_000), 0..50)) {
            let names = ["A", "B"];
            let records: Vec<SalesRecord> = recs.iter().map(|&(y, c, v)| sale(y, names[c], v)).collect();
            let raw: Decimal = records.iter().map(|r| r.revenue).sum();
            let by_year: Decimal = sales_by_year(&records, 5).unwrap().iter().map(|r| r.revenue).sum();
            let pivot = category_pivot(&records, &master(), 5).unwrap();
            prop_assert_eq!(raw, by_year);
            prop_assert_eq!(raw, pivot.grand_total);
        }

        #[test]
        fn labor_aggregation_is_lossless(recs in proptest::collection::vec((1u32..=5, 0usize..2, 0i64..1_000, 0i64..1_000_000), 0..50)) {
            let names = ["A", "B"];
            let records: Vec<LaborRecord> = recs.iter().map(|&(y, c, h, k)| work(y, names[c], h, k)).collect();
            let raw: Decimal = records.iter().map(|r| r.cost).sum();
            let by_year: Decimal = labor_by_year(&records, 5).unwrap().iter().map(|r| r.cost).sum();
            let long: Decimal = labor_by_category(&records, &master(), 5).unwrap().iter().map(|r| r.cost).sum();
            prop_assert_eq!(raw, by_year);
            prop_assert_eq!(raw, long);
        }
    }
}
