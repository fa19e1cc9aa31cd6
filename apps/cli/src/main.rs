#![deny(warnings)]

//! Headless CLI: runs an SKU addition scenario and prints or exports the
//! resulting revenue, labor and profit projection.

use anyhow::{anyhow, bail, Context, Result};
use rust_decimal::Decimal;
use sku_io::ScenarioFile;
use sku_projection::SimulationReport;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: sku-cli [--scenario FILE] [--years N] [--categories CSV] \
[--plan CSV] [--factor F] [--out DIR] [--json] [--version]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    scenario: Option<PathBuf>,
    years: Option<u32>,
    categories: Option<PathBuf>,
    plan: Option<PathBuf>,
    factor: Option<Decimal>,
    out: Option<PathBuf>,
    json: bool,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"))
        };
        match arg.as_str() {
            "--scenario" => parsed.scenario = Some(value("--scenario")?.into()),
            "--years" => {
                let raw = value("--years")?;
                parsed.years = Some(
                    raw.parse()
                        .with_context(|| format!("--years: {raw:?} is not a year count"))?,
                );
            }
            "--categories" => parsed.categories = Some(value("--categories")?.into()),
            "--plan" => parsed.plan = Some(value("--plan")?.into()),
            "--factor" => {
                let raw = value("--factor")?;
                parsed.factor = Some(
                    Decimal::from_str(&raw)
                        .with_context(|| format!("--factor: {raw:?} is not a number"))?,
                );
            }
            "--out" => parsed.out = Some(value("--out")?.into()),
            "--json" => parsed.json = true,
            "--version" => parsed.version = true,
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    Ok(parsed)
}

fn scenario_file(args: &Args) -> Result<ScenarioFile> {
    let mut file = match &args.scenario {
        Some(path) => ScenarioFile::from_path(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => ScenarioFile::default(),
    };
    if let Some(years) = args.years {
        file.horizon = years;
    }
    if let Some(path) = &args.categories {
        file.categories_csv = Some(path.clone());
        file.categories = None;
    }
    if let Some(path) = &args.plan {
        file.plan_csv = Some(path.clone());
    }
    if let Some(factor) = args.factor {
        file.price_factor = factor;
    }
    Ok(file)
}

fn money(v: Decimal) -> String {
    v.round_dp(2).normalize().to_string()
}

fn print_report(report: &SimulationReport) {
    let cfg = &report.config;
    println!(
        "Scenario | years: {} | price factor: {} | q: {} | r0: {} | r1: {} | r2: {} | d: {}",
        cfg.horizon,
        cfg.price_factor,
        cfg.sales.q,
        cfg.sales.r0,
        cfg.sales.r1,
        cfg.sales.r2,
        cfg.sales.d
    );
    println!(
        "Labor | min/SKU: {} | wage/h: {} | h/month/worker: {}",
        cfg.labor.minutes_per_sku, cfg.labor.wage_per_hour, cfg.labor.hours_per_month
    );

    println!();
    println!(
        "{:>4} {:>16} {:>10} {:>14} {:>16}",
        "year", "revenue", "hours", "labor_cost", "net_profit"
    );
    for row in &report.summary {
        println!(
            "{:>4} {:>16} {:>10} {:>14} {:>16}",
            row.year,
            money(row.revenue),
            money(row.hours),
            money(row.labor_cost),
            money(row.net_profit)
        );
    }

    println!();
    let pivot = &report.pivot;
    let mut header = format!("{:<14}", "category");
    for y in &pivot.years {
        header.push_str(&format!(" {:>12}", format!("Y{y}")));
    }
    header.push_str(&format!(" {:>14}", "total"));
    println!("{header}");
    for row in &pivot.rows {
        let mut line = format!("{:<14}", row.category);
        for v in &row.revenue {
            line.push_str(&format!(" {:>12}", money(*v)));
        }
        line.push_str(&format!(" {:>14}", money(row.total)));
        println!("{line}");
    }
}

fn main() -> Result<()> {
    // Logging setup; stdout stays reserved for the report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!(
            "sku-cli {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(?args, "starting CLI");

    let scenario = scenario_file(&args)?
        .build()
        .context("invalid scenario")?;
    let report = sku_projection::simulate(&scenario).context("simulation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(dir) = &args.out {
        let written = sku_io::export_report(&report, dir)
            .with_context(|| format!("exporting to {}", dir.display()))?;
        for path in written {
            info!(path = %path.display(), "wrote");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let a = args(&[
            "--scenario",
            "s.yaml",
            "--years",
            "5",
            "--categories",
            "c.csv",
            "--plan",
            "p.csv",
            "--factor",
            "1.5",
            "--out",
            "out",
            "--json",
        ])
        .unwrap();
        assert_eq!(a.scenario, Some(PathBuf::from("s.yaml")));
        assert_eq!(a.years, Some(5));
        assert_eq!(a.factor, Some(Decimal::new(15, 1)));
        assert_eq!(a.out, Some(PathBuf::from("out")));
        assert!(a.json);
        assert!(!a.version);
    }

    #[test]
    fn rejects_unknown_flags_and_bad_values() {
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["--years", "-1"]).is_err());
        assert!(args(&["--years"]).is_err());
        assert!(args(&["--factor", "abc"]).is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let a = args(&["--years", "3", "--factor", "2"]).unwrap();
        let file = scenario_file(&a).unwrap();
        assert_eq!(file.horizon, 3);
        assert_eq!(file.price_factor, Decimal::new(2, 0));
        let s = file.build().unwrap();
        assert_eq!(s.plan.horizon(), 3);
    }

    #[test]
    fn huge_year_override_is_rejected() {
        let a = args(&["--years", "4000000000"]).unwrap();
        let err = scenario_file(&a).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("exceeds the supported maximum"));
    }

    #[test]
    fn default_run_produces_full_horizon() {
        let s = scenario_file(&Args::default()).unwrap().build().unwrap();
        let report = sku_projection::simulate(&s).unwrap();
        assert_eq!(report.summary.len(), 10);
        assert_eq!(report.pivot.rows.len(), 7);
    }
}
