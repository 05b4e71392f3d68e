//! Batch runner: loads a dataset, then answers every query of a query file,
//! one output file per query.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ridecatalog::core::error::{Error, ErrorKind};
use ridecatalog::core::stats::{CatalogStats, LoadReport};
use ridecatalog::query::executor::BatchReport;
use ridecatalog::query::output::FileSink;
use ridecatalog::{Config, DatasetLoader, IndexingStrategy, QueryExecutor, Result};

/// Written by `--report`
#[derive(Serialize)]
struct RunReport {
    load: LoadReport,
    catalog: CatalogStats,
    batch: BatchReport,
}

fn main() -> Result<()> {
    let matches = Command::new("ridecatalog")
        .version(ridecatalog::VERSION)
        .about("Loads a ride-sharing dataset and answers batch queries.")
        .arg(
            Arg::new("dataset")
                .value_name("DATASET_DIR")
                .required(true)
                .help("Directory holding users.csv, drivers.csv and rides.csv")
        )
        .arg(
            Arg::new("queries")
                .value_name("QUERIES_FILE")
                .required(true)
                .help("File with one query per line")
        )
        .arg(
            Arg::new("eager-indexing")
                .long("eager-indexing")
                .action(ArgAction::SetTrue)
                .help("Rank every city while finalizing instead of on first use")
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .action(ArgAction::SetTrue)
                .help("Execute queries on a worker pool")
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Number of worker threads for --parallel")
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .value_name("DIR")
                .help("Directory for command<N>_output.txt files")
        )
        .arg(
            Arg::new("report")
                .long("report")
                .value_name("FILE")
                .help("Write load, catalog and batch statistics as JSON")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
        )
        .get_matches();

    init_tracing(matches.get_one::<String>("log-level"));

    let config = config_from_matches(&matches);
    config.validate()?;

    let queries_path = matches.get_one::<String>("queries")
        .map(PathBuf::from)
        .unwrap_or_default();
    let queries = fs::read_to_string(&queries_path)
        .map_err(|e| Error::new(ErrorKind::Io, format!("Cannot read {}: {}", queries_path.display(), e)))?;

    info!(
        "Starting ridecatalog v{} ({:?} indexing)",
        ridecatalog::VERSION,
        config.indexing
    );

    let (catalog, load) = DatasetLoader::new(&config.dataset_path).load(&config)?;
    let stats = catalog.stats();
    info!(
        users = stats.users,
        drivers = stats.drivers,
        rides = stats.rides,
        cities = stats.cities,
        skipped = load.total_skipped(),
        "Catalog ready"
    );

    let executor = QueryExecutor::new(&catalog, &config)?;
    let mut sink = FileSink::new(&config.output_dir)?;
    let report = executor.run_batch(queries.lines(), &mut sink)?;

    let cache = executor.cache_stats();
    info!(
        commands = report.commands,
        failed = report.failed,
        cache_hit_rate = cache.hit_rate(),
        cities_indexed = catalog.stats().cities_indexed,
        output_dir = %config.output_dir.display(),
        "Done"
    );

    if let Some(path) = matches.get_one::<String>("report") {
        let run = RunReport { load, catalog: catalog.stats(), batch: report };
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &run)?;
        info!(path = %path, "Report written");
    }
    Ok(())
}

/// `--log-level` wins over `RUST_LOG`; info when neither is set.
fn init_tracing(level: Option<&String>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}

fn config_from_matches(matches: &ArgMatches) -> Config {
    let mut config = Config::default();

    if let Some(dataset) = matches.get_one::<String>("dataset") {
        config.dataset_path = PathBuf::from(dataset);
    }
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.output_dir = PathBuf::from(dir);
    }
    config.indexing = IndexingStrategy::from_eager_flag(matches.get_flag("eager-indexing"));
    config.parallel_queries = matches.get_flag("parallel");
    if let Some(workers) = matches.get_one::<usize>("workers") {
        config.worker_threads = *workers;
    }
    config
}
