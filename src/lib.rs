pub mod core;
pub mod pricing;
pub mod index;
pub mod search;
pub mod writer;
pub mod reader;
pub mod loader;
pub mod query;

pub use crate::core::config::{Config, IndexingStrategy};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::loader::dataset::DatasetLoader;
pub use crate::query::executor::QueryExecutor;
pub use crate::reader::catalog::Catalog;
pub use crate::writer::catalog_builder::CatalogBuilder;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/*
┌──────────────────────────────────────────────────────────────────────────────────┐
│                          RIDECATALOG STRUCT ARCHITECTURE                          │
└──────────────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────── BUILDING PHASE (writer) ────────────────────────────┐
│                                                                                   │
│  DatasetLoader ──parse_user/parse_driver/parse_ride──▶ CatalogBuilder<P>          │
│                                                                                   │
│  ┌─────────────────────────────────────────────────────────────────────────────┐ │
│  │ struct CatalogBuilder<P: PriceCalculator>                                    │ │
│  │   store: EntityStore                 // Vec<User|Driver|Ride> + key maps     │ │
│  │   cities: CityIndexBuilder           // city -> Vec<RideHandle>, unordered   │ │
│  │   driver_cities: DriverCityAggregator// city -> driver -> score sum / count  │ │
│  │   pricer: P                          // fare charged once per ride           │ │
│  └─────────────────────────────────────────────────────────────────────────────┘ │
│                                    │                                              │
│                        finalize(self) -> Catalog                                  │
│                                    ▼                                              │
└───────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── FINALIZED PHASE (reader) ────────────────────────────┐
│                                                                                   │
│  ┌─────────────────────────────────────────────────────────────────────────────┐ │
│  │ struct Catalog                                                               │ │
│  │   store: EntityStore                                                         │ │
│  │   rankings: GlobalRankings       // drivers by score, users by distance,     │ │
│  │                                  // rides by date (rayon sorts)              │ │
│  │   cities: CityIndex              // Deferred<Vec<RideHandle>, Vec<..>>       │ │
│  │   driver_cities: DriverCityIndex // Deferred<HashMap<..>, Vec<Stat>>         │ │
│  └─────────────────────────────────────────────────────────────────────────────┘ │
│                                                                                   │
│  Deferred<A, R> = Mutex<Accumulating(A) | Ranked(Arc<R>)>                         │
│    Eager: every city ranked inside finalize                                       │
│    Lazy:  ranked by the first query touching the city, exactly once               │
│                                                                                   │
└───────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── QUERIES ─────────────────────────────────────┐
│                                                                                   │
│  query line ─QueryParser(nom)─▶ Query ─QueryExecutor─▶ QueryOutput                │
│                                   │          │                                    │
│                                   │      QueryCache (lru)                         │
│                                   ▼                                               │
│                      format_output ─▶ OutputSink (FileSink | BufferSink)          │
│                                                                                   │
│  Range queries: date_lower_bound (binary search) + range_scan + RunningAverage    │
│                                                                                   │
└───────────────────────────────────────────────────────────────────────────────────┘
*/
