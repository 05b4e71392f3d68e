use std::path::PathBuf;
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, Result};

/// When the per-city structures are sorted and ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexingStrategy {
    /// Every city bucket and driver-city ranking is built inside `finalize`.
    Eager,
    /// Built on the first query that touches the city.
    Lazy,
}

impl IndexingStrategy {
    pub fn from_eager_flag(eager_indexing: bool) -> Self {
        if eager_indexing {
            IndexingStrategy::Eager
        } else {
            IndexingStrategy::Lazy
        }
    }

    pub fn is_eager(&self) -> bool {
        matches!(self, IndexingStrategy::Eager)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub output_dir: PathBuf,
    pub indexing: IndexingStrategy,

    // Ages are computed against this date, not the wall clock
    pub reference_date: NaiveDate,

    pub parallel_queries: bool,
    pub worker_threads: usize,
    pub query_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_path: PathBuf::from("datasets/data-regular"),
            output_dir: PathBuf::from("Resultados"),
            indexing: IndexingStrategy::Lazy,
            reference_date: NaiveDate::from_ymd_opt(2022, 10, 9).unwrap_or_default(),
            parallel_queries: false,
            worker_threads: num_cpus::get(),
            query_cache_size: 1024,
        }
    }
}

impl Config {
    pub fn with_eager_indexing(mut self, eager_indexing: bool) -> Self {
        self.indexing = IndexingStrategy::from_eager_flag(eager_indexing);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(Error::invalid_argument("worker_threads must be at least 1"));
        }
        if self.query_cache_size == 0 {
            return Err(Error::invalid_argument("query_cache_size must be at least 1"));
        }
        Ok(())
    }
}
