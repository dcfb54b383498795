//! CLI command implementations
//!
//! Each command loads nothing beyond what it needs:
//! - init writes the schema catalog (and optionally sample sources)
//! - load reads sources, runs the loader and replaces the stored warehouse
//! - query, check and summary read the stored warehouse, verifying checksums
//!
//! Commands return their response payload; `run_command` writes it.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::etl::{read_orders_and_products, read_sales_file, write_sample_data, Loader, SourceRow};
use crate::observability::{self, Event};
use crate::query::{revenue_breakdown, QueryRunner};
use crate::schema::SchemaCatalog;
use crate::storage::{SnapshotStore, WarehouseManifest};
use crate::warehouse::{IntegrityReport, Warehouse};

use super::args::Command;
use super::config::{Config, SourceFiles};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command and write its response
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = Config::load(cmd.config_path()).and_then(|config| {
        observability::init(config.log_format, &config.log_level)?;
        tracing::info!(event = %Event::ConfigLoaded, data_dir = %config.data_dir);

        match &cmd {
            Command::Init { sample, .. } => init(&config, *sample),
            Command::Load { .. } => load(&config),
            Command::Query { name, .. } => query(&config, name.as_deref()),
            Command::Check { .. } => check(&config),
            Command::Summary { .. } => summary(&config),
        }
    });

    match result {
        Ok(data) => write_response(data),
        Err(err) => {
            write_error(err.code_str(), err.message())?;
            Err(err)
        }
    }
}

/// Initialize a data directory
///
/// - Creates the directory and writes the four table schemas
/// - Optionally writes the sample source files
/// - Refuses to run twice on the same directory
pub fn init(config: &Config, sample: bool) -> CliResult<Value> {
    let data_dir = config.data_path();

    let mut existing = SchemaCatalog::new(data_dir);
    existing.load_all()?;
    if existing.table_count() > 0 {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(data_dir).map_err(|e| {
        CliError::io_error(format!("Failed to create directory {}: {}", data_dir.display(), e))
    })?;

    let catalog = SchemaCatalog::star(data_dir)?;
    let written = catalog.save_all()?;
    tracing::info!(event = %Event::SchemasLoaded, tables = written.len());

    let mut data = json!({
        "initialized": true,
        "data_dir": data_dir.display().to_string(),
        "schemas": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
    });

    if sample {
        let (orders, products) = write_sample_data(data_dir)?;
        tracing::info!(event = %Event::SampleDataWritten, dir = %data_dir.display());
        data["sample_files"] = json!([orders.display().to_string(), products.display().to_string()]);
    }

    Ok(data)
}

/// Load the configured sources into a fresh warehouse
///
/// The previous warehouse is dropped and replaced. The response carries the
/// full load report and the new manifest.
pub fn load(config: &Config) -> CliResult<Value> {
    open_catalog(config.data_path())?;

    let rows = read_source(config)?;
    let (warehouse, report) = Loader::new().load(rows);
    let manifest = SnapshotStore::new(config.data_path()).write(&warehouse, report.load_id)?;

    Ok(json!({
        "clean": report.is_clean(),
        "report": serde_json::to_value(&report)?,
        "errors": serde_json::to_value(report.errors())?,
        "snapshot": serde_json::to_value(&manifest)?,
    }))
}

/// Run one query by name, or all of them
pub fn query(config: &Config, name: Option<&str>) -> CliResult<Value> {
    let (warehouse, _) = open_warehouse(config)?;
    let runner = QueryRunner::new(&warehouse);

    let results = match name {
        Some(name) => vec![runner.run_named(name)?],
        None => runner.run_all()?,
    };

    Ok(serde_json::to_value(results)?)
}

/// Verify stored checksums and report referential integrity
pub fn check(config: &Config) -> CliResult<Value> {
    let (warehouse, manifest) = open_warehouse(config)?;
    let integrity = IntegrityReport::check(&warehouse);

    let checks: Vec<Value> = integrity
        .checks()
        .iter()
        .map(|(label, count)| json!({ "CheckType": label, "Count": count }))
        .collect();

    Ok(json!({
        "load_id": manifest.load_id,
        "created_at": manifest.created_at,
        "checksums_verified": true,
        "tables": serde_json::to_value(&manifest.tables)?,
        "integrity": checks,
        "clean": integrity.is_clean(),
    }))
}

/// Row counts, revenue total and covered date range
pub fn summary(config: &Config) -> CliResult<Value> {
    let (warehouse, manifest) = open_warehouse(config)?;

    let total = revenue_breakdown(&warehouse)?
        .into_iter()
        .find(|row| row.is_total())
        .map(|row| row.total_revenue)
        .unwrap_or_default();
    let first_date = warehouse.dates().next().map(|d| d.date_key.clone());
    let last_date = warehouse.dates().last().map(|d| d.date_key.clone());
    let categories = warehouse
        .products()
        .map(|p| p.category.as_str())
        .collect::<std::collections::BTreeSet<_>>();

    Ok(json!({
        "load_id": manifest.load_id,
        "created_at": manifest.created_at,
        "counts": serde_json::to_value(warehouse.counts())?,
        "total_revenue": total.to_string(),
        "categories": categories,
        "first_date": first_date,
        "last_date": last_date,
    }))
}

fn read_source(config: &Config) -> CliResult<Vec<SourceRow>> {
    let rows = match config.source() {
        SourceFiles::Flat(path) => {
            let rows = read_sales_file(&path)?;
            tracing::info!(event = %Event::SourceRead, file = %path.display(), rows = rows.len());
            rows
        }
        SourceFiles::Split { orders, products } => {
            let rows = read_orders_and_products(&orders, &products)?;
            tracing::info!(
                event = %Event::SourceRead,
                file = %orders.display(),
                products = %products.display(),
                rows = rows.len(),
            );
            rows
        }
    };
    Ok(rows)
}

fn open_catalog(data_dir: &Path) -> CliResult<SchemaCatalog> {
    let mut catalog = SchemaCatalog::new(data_dir);
    catalog.load_all()?;
    if catalog.table_count() == 0 {
        return Err(CliError::not_initialized());
    }
    Ok(catalog)
}

fn open_warehouse(config: &Config) -> CliResult<(Warehouse, WarehouseManifest)> {
    let catalog = open_catalog(config.data_path())?;
    Ok(SnapshotStore::new(config.data_path()).read(&catalog)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use tempfile::TempDir;

    fn config(tmp: &TempDir) -> Config {
        Config::new(tmp.path().join("dw").display().to_string())
    }

    #[test]
    fn test_init_twice_fails() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);

        let data = init(&config, false).unwrap();
        assert_eq!(data["initialized"], true);
        assert_eq!(data["schemas"].as_array().unwrap().len(), 4);

        let err = init(&config, false).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::AlreadyInitialized);
    }

    #[test]
    fn test_load_requires_init() {
        let tmp = TempDir::new().unwrap();
        let err = load(&config(&tmp)).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::NotInitialized);
    }

    #[test]
    fn test_query_requires_load() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        init(&config, false).unwrap();

        let err = query(&config, None).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::NotLoaded);
    }

    #[test]
    fn test_sample_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        init(&config, true).unwrap();

        let loaded = load(&config).unwrap();
        assert_eq!(loaded["clean"], true);
        assert_eq!(loaded["report"]["facts_loaded"], 7);
        assert_eq!(loaded["report"]["counts"]["dim_product"], 4);
        assert_eq!(loaded["report"]["counts"]["dim_customer"], 5);

        let results = query(&config, Some("product_performance")).unwrap();
        assert_eq!(results[0]["rows"][0]["ProductID"], "P004");

        let checked = check(&config).unwrap();
        assert_eq!(checked["clean"], true);

        let summary = summary(&config).unwrap();
        // 31 + 25 + 46.50 + 50 + 50 + 120 + 15.50
        assert_eq!(summary["total_revenue"], "338.00");
        assert_eq!(summary["first_date"], "2024-01-05");
        assert_eq!(summary["last_date"], "2024-01-09");
    }

    #[test]
    fn test_unknown_query_name() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        init(&config, true).unwrap();
        load(&config).unwrap();

        let err = query(&config, Some("top_products")).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::QueryError);
    }
}
