//! Bandscope CLI: validate valuation CSVs and query them from the shell.
//!
//! Commands:
//! - `check`: print the validation report (text, markdown or JSON)
//! - `list`: symbols per category with their years
//! - `show`: one symbol's band by year plus the close gauge
//! - `category`: symbols of a category compared for one year
//! - `config init|show`: write or print the active config

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bandscope_core::{AppConfig, StockRecord, ValuationTable};
use bandscope_runner::charts::format_price;
use bandscope_runner::{
    category_view, config_path_in, load_config, process_file, render, stock_view,
    write_default_config, ConfigSource, ProcessOutcome, ReportFormat, ReportSummary,
};

#[derive(Parser)]
#[command(
    name = "bandscope",
    about = "Bandscope CLI: valuation bands from English/Chinese CSV files"
)]
struct Cli {
    /// Config file. Defaults to the per-user config when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSV and print the report. Exits with 1 when there are errors.
    Check {
        file: PathBuf,

        /// Report format: text, markdown or json.
        #[arg(long, default_value = "text")]
        format: ReportFormat,

        /// Write the report to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List symbols per category with the years they cover.
    List { file: PathBuf },
    /// Show one symbol's valuation band and close gauge.
    Show {
        file: PathBuf,

        #[arg(long)]
        symbol: String,

        /// Gauge year. Defaults to the symbol's latest year.
        #[arg(long)]
        year: Option<i32>,

        /// Print the chart and gauge specs as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Compare the symbols of a category. Without --category, every category.
    Category {
        file: PathBuf,

        #[arg(long)]
        category: Option<String>,

        /// Defaults to the latest year in each category.
        #[arg(long)]
        year: Option<i32>,

        /// Print the chart specs as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Config file management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default config file.
    Init {
        /// Target path. Defaults to the per-user config location.
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the active config and where it came from.
    Show,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let user_config = user_config_path();
    let (config, source) = load_config(cli.config.as_deref(), user_config.as_deref())
        .context("loading config")?;
    tracing::debug!(source = %source, "config loaded");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Check {
            file,
            format,
            output,
        } => run_check(&mut out, &file, &config, format, output.as_deref()),
        Commands::List { file } => {
            run_list(&mut out, &file, &config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show {
            file,
            symbol,
            year,
            json,
        } => {
            run_show(&mut out, &file, &config, &symbol, year, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Category {
            file,
            category,
            year,
            json,
        } => {
            run_category(&mut out, &file, &config, category.as_deref(), year, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Init { path, force } => {
                    let Some(path) = path.or(user_config) else {
                        bail!("no config directory on this platform; pass --path");
                    };
                    run_config_init(&mut out, &path, force)?;
                }
                ConfigAction::Show => run_config_show(&mut out, &config, &source)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| config_path_in(&dir))
}

// ─── Commands ────────────────────────────────────────────────────────

fn run_check(
    out: &mut impl Write,
    file: &Path,
    config: &AppConfig,
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<ExitCode> {
    let outcome = process_file(file, config)
        .with_context(|| format!("loading {}", file.display()))?;
    let summary = ReportSummary::from_outcome(&outcome);
    let report = render(&summary, format).context("rendering report")?;

    match output {
        Some(path) => {
            std::fs::write(path, &report)
                .with_context(|| format!("writing report to {}", path.display()))?;
            writeln!(out, "{}: {}", summary.headline(), path.display())?;
        }
        None => {
            write!(out, "{report}")?;
            if !report.ends_with('\n') {
                writeln!(out)?;
            }
        }
    }

    Ok(if summary.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_list(out: &mut impl Write, file: &Path, config: &AppConfig) -> Result<()> {
    let outcome = load_valid(file, config)?;
    let table = loaded_table(&outcome)?;

    for category in table.list_categories() {
        let records = table.filter_by_category(&category)?;
        writeln!(out, "{category}")?;
        let mut symbols: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
        symbols.dedup();
        for symbol in symbols.into_iter().filter(|s| !s.is_empty()) {
            let years: Vec<String> = records
                .iter()
                .filter(|r| r.symbol == symbol)
                .filter_map(|r| r.year)
                .map(|y| y.to_string())
                .collect();
            writeln!(out, "  {symbol:<10} {}", years.join(", "))?;
        }
    }
    writeln!(
        out,
        "{} symbols in {} categories, {} rows",
        table.list_symbols().len(),
        table.list_categories().len(),
        table.len()
    )?;
    Ok(())
}

fn run_show(
    out: &mut impl Write,
    file: &Path,
    config: &AppConfig,
    symbol: &str,
    year: Option<i32>,
    json: bool,
) -> Result<()> {
    let outcome = load_valid(file, config)?;
    let table = loaded_table(&outcome)?;
    let view = stock_view(table, symbol, year)?;
    if view.records.is_empty() {
        bail!("symbol '{}' not found in {}", view.symbol, file.display());
    }

    if json {
        let value = serde_json::json!({ "chart": view.chart, "gauge": view.gauge });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "{}", view.chart.title)?;
    write_records(out, &view.records)?;
    match (&view.gauge, view.gauge_year) {
        (Some(gauge), Some(y)) => {
            let delta = match gauge.delta_pct() {
                Some(pct) => format!("{:+.2} ({pct:+.1}%)", gauge.delta),
                None => format!("{:+.2}", gauge.delta),
            };
            writeln!(
                out,
                "Close {y}: {} vs fair {}: {delta}, {}",
                format_price(gauge.value),
                format_price(gauge.reference),
                gauge.zone
            )?;
        }
        (_, Some(y)) => writeln!(out, "Close {y}: not enough data for a gauge")?,
        _ => {}
    }
    Ok(())
}

fn run_category(
    out: &mut impl Write,
    file: &Path,
    config: &AppConfig,
    category: Option<&str>,
    year: Option<i32>,
    json: bool,
) -> Result<()> {
    let outcome = load_valid(file, config)?;
    let table = loaded_table(&outcome)?;

    let categories: Vec<String> = match category {
        Some(c) => {
            let c = c.trim();
            if !table.list_categories().contains(c) {
                bail!("category '{c}' not found in {}", file.display());
            }
            vec![c.to_string()]
        }
        None => table.list_categories().into_iter().collect(),
    };

    let mut charts = Vec::new();
    for category in &categories {
        let view = category_view(table, category, year)?;
        if json {
            charts.push(view.chart);
            continue;
        }
        writeln!(out, "{}", view.chart.title)?;
        if view.records.is_empty() {
            writeln!(out, "  (no rows)")?;
        } else {
            write_category_rows(out, &view.records)?;
        }
    }

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&charts)?)?;
    }
    Ok(())
}

fn run_config_init(out: &mut impl Write, path: &Path, force: bool) -> Result<()> {
    write_default_config(path, force)?;
    writeln!(out, "Wrote default config to {}", path.display())?;
    Ok(())
}

fn run_config_show(out: &mut impl Write, config: &AppConfig, source: &ConfigSource) -> Result<()> {
    writeln!(out, "# source: {source}")?;
    write!(out, "{}", config.to_toml()?)?;
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Run the pipeline and refuse files whose report has errors.
fn load_valid(file: &Path, config: &AppConfig) -> Result<ProcessOutcome> {
    let outcome = process_file(file, config)
        .with_context(|| format!("loading {}", file.display()))?;
    if !outcome.is_loaded() {
        for issue in outcome.report.errors() {
            eprintln!("error: {}", issue.message);
            eprintln!("       {}", issue.suggestion);
        }
        bail!(
            "{} has {} validation errors; run `bandscope check` for the full report",
            file.display(),
            outcome.report.error_count()
        );
    }
    for skip in &outcome.coercion_skips {
        tracing::warn!("{skip}");
    }
    Ok(outcome)
}

fn loaded_table(outcome: &ProcessOutcome) -> Result<&ValuationTable> {
    outcome
        .table
        .as_ref()
        .context("no table was produced for this file")
}

fn price(value: Option<f64>) -> String {
    value.map(format_price).unwrap_or_else(|| "-".into())
}

fn write_records(out: &mut impl Write, records: &[StockRecord]) -> Result<()> {
    writeln!(
        out,
        "{:>6} {:>10} {:>10} {:>10} {:>10}  {}",
        "Year", "Cheap", "Fair", "Expensive", "Close", "Date"
    )?;
    for r in records {
        writeln!(
            out,
            "{:>6} {:>10} {:>10} {:>10} {:>10}  {}",
            r.year.map(|y| y.to_string()).unwrap_or_else(|| "-".into()),
            price(r.cheap),
            price(r.fair),
            price(r.expensive),
            price(r.close),
            r.close_date.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

fn write_category_rows(out: &mut impl Write, records: &[StockRecord]) -> Result<()> {
    writeln!(
        out,
        "  {:<10} {:>10} {:>10} {:>10} {:>10}  {}",
        "Symbol", "Cheap", "Fair", "Expensive", "Close", "Zone"
    )?;
    for r in records {
        let zone = r.zone().map(|z| z.label()).unwrap_or("-");
        writeln!(
            out,
            "  {:<10} {:>10} {:>10} {:>10} {:>10}  {zone}",
            r.symbol,
            price(r.cheap),
            price(r.fair),
            price(r.expensive),
            price(r.close),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Year,Symbol,Category,Cheap,Fair,Expensive,Close,Close Date
2023,AAPL,Tech,120.50,150.00,180.25,145.30,2023-12-29
2024,AAPL,Tech,130.00,160.00,190.00,185.50,2024-12-31
2024,MSFT,Tech,320.00,380.00,440.00,421.50,2024-12-31
2024,XOM,Energy,95.00,105.00,115.00,99.00,2024-12-31
";

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "bandscope", "check", "v.csv", "--format", "md", "--config", "c.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(
            cli.command,
            Commands::Check { format: ReportFormat::Markdown, .. }
        ));
        assert!(Cli::try_parse_from(["bandscope", "check", "v.csv", "--format", "html"]).is_err());
        assert!(Cli::try_parse_from(["bandscope", "show", "v.csv"]).is_err());
    }

    #[test]
    fn check_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(&dir, "good.csv", CSV);
        let bad = write_file(&dir, "bad.csv", "Ticker,Price\nAAPL,1\n");
        let config = AppConfig::default();

        let mut buf = Vec::new();
        let code = run_check(&mut buf, &good, &config, ReportFormat::Text, None).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(String::from_utf8(buf).unwrap().contains("Validation passed with no issues"));

        let mut buf = Vec::new();
        let code = run_check(&mut buf, &bad, &config, ReportFormat::Json, None).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["valid"], false);
    }

    #[test]
    fn check_writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(&dir, "good.csv", CSV);
        let report = dir.path().join("report.md");

        let mut buf = Vec::new();
        run_check(
            &mut buf,
            &good,
            &AppConfig::default(),
            ReportFormat::Markdown,
            Some(&report),
        )
        .unwrap();
        let md = std::fs::read_to_string(&report).unwrap();
        assert!(md.starts_with("# Bandscope Validation Report"));
        assert!(String::from_utf8(buf).unwrap().contains("report.md"));
    }

    #[test]
    fn list_groups_by_category() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(&dir, "v.csv", CSV);
        let text = output(|out| run_list(out, &file, &AppConfig::default()));

        let energy = text.find("Energy").unwrap();
        let tech = text.find("Tech").unwrap();
        assert!(energy < tech);
        assert!(text.contains("  AAPL       2023, 2024"));
        assert!(text.contains("3 symbols in 2 categories, 4 rows"));
    }

    #[test]
    fn show_prints_band_and_gauge() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(&dir, "v.csv", CSV);
        let text = output(|out| run_show(out, &file, &AppConfig::default(), " AAPL", None, false));
        assert!(text.starts_with("AAPL Price Levels"));
        assert!(text.contains("2023-12-29"));
        assert!(text.contains("Close 2024: 185.50 vs fair 160.00: +25.50 (+15.9%)"));
    }

    #[test]
    fn show_unknown_symbol_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(&dir, "v.csv", CSV);
        let mut buf = Vec::new();
        let err = run_show(&mut buf, &file, &AppConfig::default(), "GOOG", None, false).unwrap_err();
        assert!(err.to_string().contains("symbol 'GOOG' not found"));
    }

    #[test]
    fn show_json_has_chart_and_gauge() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(&dir, "v.csv", CSV);
        let text = output(|out| run_show(out, &file, &AppConfig::default(), "AAPL", Some(2023), true));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["chart"]["title"], "AAPL Price Levels");
        assert_eq!(value["gauge"]["value"], 145.30);
    }

    #[test]
    fn category_defaults_to_every_category() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(&dir, "v.csv", CSV);
        let text = output(|out| run_category(out, &file, &AppConfig::default(), None, None, false));
        assert!(text.contains("Energy Stocks Overview (2024)"));
        assert!(text.contains("Tech Stocks Overview (2024)"));
        assert!(text.contains("cheap to fair"));
        assert!(text.contains("fair to expensive"));
    }

    #[test]
    fn category_filters_and_rejects_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(&dir, "v.csv", CSV);
        let text = output(|out| {
            run_category(out, &file, &AppConfig::default(), Some("Tech"), Some(2023), true)
        });
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["title"], "Tech Stocks Overview (2023)");

        let mut buf = Vec::new();
        assert!(run_category(&mut buf, &file, &AppConfig::default(), Some("Retail"), None, false).is_err());
    }

    #[test]
    fn query_commands_refuse_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_file(&dir, "bad.csv", "Ticker,Price\nAAPL,1\n");
        let mut buf = Vec::new();
        let err = run_list(&mut buf, &bad, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("5 validation errors"));
    }

    #[test]
    fn config_init_and_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bandscope").join("config.toml");

        output(|out| run_config_init(out, &path, false));
        assert!(path.is_file());
        let mut buf = Vec::new();
        assert!(run_config_init(&mut buf, &path, false).is_err());
        output(|out| run_config_init(out, &path, true));

        let (config, source) = load_config(Some(&path), None).unwrap();
        let text = output(|out| run_config_show(out, &config, &source));
        assert!(text.starts_with(&format!("# source: {}", path.display())));
        assert!(text.contains("[validation]"));
    }
}
