use criterion::{criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use sku_core::{AdditionPlan, CategoryMaster, ProjectionConfig};
use sku_projection::Scenario;

fn full_plan(horizon: u32) -> Scenario {
    let master = CategoryMaster::default();
    let mut plan = AdditionPlan::new(&master, horizon);
    let names: Vec<String> = master.names().map(str::to_string).collect();
    for (i, name) in names.iter().enumerate() {
        for year in 1..=horizon {
            plan.set(name, year, 100 + (i as i64) * 10 + year as i64)
                .unwrap();
        }
    }
    Scenario {
        master,
        plan,
        config: ProjectionConfig {
            horizon,
            price_factor: Decimal::new(12, 1),
            ..ProjectionConfig::default()
        },
    }
}

fn bench_simulate(c: &mut Criterion) {
    let scenario = full_plan(20);
    c.bench_function("simulate_20y_default_master", |b| {
        b.iter(|| {
            let _ = sku_projection::simulate(&scenario);
        })
    });
    c.bench_function("project_20y_default_master", |b| {
        b.iter(|| {
            let _ = sku_projection::project(&scenario.master, &scenario.plan, &scenario.config);
        })
    });
}

criterion_group!(benches, bench_simulate);
criterion_main!(benches);
