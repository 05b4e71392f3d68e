use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::{FileReport, LoadReport};
use crate::loader::parse::{parse_driver, parse_ride, parse_user};
use crate::pricing::fare::PriceCalculator;
use crate::reader::catalog::Catalog;
use crate::writer::catalog_builder::CatalogBuilder;

pub const USERS_FILE: &str = "users.csv";
pub const DRIVERS_FILE: &str = "drivers.csv";
pub const RIDES_FILE: &str = "rides.csv";

/// Reads a dataset directory into a catalog
pub struct DatasetLoader {
    pub root: PathBuf,
}

impl DatasetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DatasetLoader { root: root.into() }
    }

    /// Loads users, drivers and rides (in that order) and finalizes.
    pub fn load(&self, config: &Config) -> Result<(Catalog, LoadReport)> {
        let mut builder = CatalogBuilder::new(config);
        let report = self.load_into(&mut builder)?;
        Ok((builder.finalize(), report))
    }

    /// Feeds every valid record into an existing builder.
    ///
    /// Invalid lines and records the builder refuses are skipped and counted.
    /// Only a file that cannot be opened or read stops the load.
    pub fn load_into<P: PriceCalculator>(&self, builder: &mut CatalogBuilder<P>) -> Result<LoadReport> {
        let start = Instant::now();

        let users = load_file(&self.root.join(USERS_FILE), |line| {
            builder.register_user(parse_user(line)?).map(|_| ())
        })?;
        let drivers = load_file(&self.root.join(DRIVERS_FILE), |line| {
            builder.register_driver(parse_driver(line)?).map(|_| ())
        })?;
        let rides = load_file(&self.root.join(RIDES_FILE), |line| {
            builder.register_ride(parse_ride(line)?).map(|_| ())
        })?;

        let report = LoadReport {
            users,
            drivers,
            rides,
            took_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            path = %self.root.display(),
            accepted = report.total_accepted(),
            skipped = report.total_skipped(),
            took_ms = report.took_ms,
            "Dataset loaded"
        );

        Ok(report)
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::new(ErrorKind::Io, format!("Cannot open {}: {}", path.display(), e)))
}

/// Skips the header, then hands every non-blank line to `register`.
fn load_file(path: &Path, mut register: impl FnMut(&str) -> Result<()>) -> Result<FileReport> {
    let reader = open(path)?;
    let mut report = FileReport::default();

    for (number, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        report.lines += 1;

        match register(&line) {
            Ok(()) => report.accepted += 1,
            Err(err) => {
                match err.kind {
                    ErrorKind::AlreadyExists | ErrorKind::NotFound => report.rejected += 1,
                    _ => report.invalid += 1,
                }
                debug!(file = %path.display(), line = number + 1, error = %err, "Skipping line");
            }
        }
    }

    debug!(
        file = %path.display(),
        accepted = report.accepted,
        invalid = report.invalid,
        rejected = report.rejected,
        "File loaded"
    );
    Ok(report)
}
