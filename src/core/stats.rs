use serde::{Serialize, Deserialize};
use crate::core::config::IndexingStrategy;

/// Catalog statistics for monitoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    // Entity counts
    pub users: usize,
    pub drivers: usize,
    pub rides: usize,

    // Index metrics
    pub cities: usize,
    pub indexing: IndexingStrategy,
    pub cities_indexed: usize,
    pub driver_city_pairs: usize,
}

/// Outcome of loading one dataset file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub lines: usize,
    pub accepted: usize,
    // Lines that failed validation
    pub invalid: usize,
    // Valid lines the catalog refused (duplicates, unknown references)
    pub rejected: usize,
}

impl FileReport {
    pub fn skipped(&self) -> usize {
        self.invalid + self.rejected
    }
}

/// Outcome of loading a whole dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub users: FileReport,
    pub drivers: FileReport,
    pub rides: FileReport,
    pub took_ms: u64,
}

impl LoadReport {
    pub fn total_accepted(&self) -> usize {
        self.users.accepted + self.drivers.accepted + self.rides.accepted
    }

    pub fn total_skipped(&self) -> usize {
        self.users.skipped() + self.drivers.skipped() + self.rides.skipped()
    }
}
