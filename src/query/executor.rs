use std::time::Instant;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::ast::{ProfileKey, Query, QueryOutput};
use crate::query::cache::{CacheStats, QueryCache};
use crate::query::output::{format_output, OutputSink};
use crate::query::parser::{QueryParser, COMMENT_PREFIX};
use crate::reader::catalog::Catalog;
use crate::search::results::{Profile, RankedDriver, RankedUser, RideSummary};

/// Outcome of one query batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub commands: usize,
    // Lines that could not be parsed into a query
    pub failed: usize,
    pub took_ms: u64,
}

/// Executes queries against a finalized catalog with result caching
pub struct QueryExecutor<'c> {
    catalog: &'c Catalog,
    parser: QueryParser,
    cache: QueryCache,
    parallel: bool,
    workers: usize,
}

impl<'c> QueryExecutor<'c> {
    pub fn new(catalog: &'c Catalog, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(QueryExecutor {
            catalog,
            parser: QueryParser::new(),
            cache: QueryCache::new(config.query_cache_size)?,
            parallel: config.parallel_queries,
            workers: config.worker_threads,
        })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn execute(&self, query: &Query) -> QueryOutput {
        self.cache.get_or_insert_with(query, || {
            let start = Instant::now();
            let output = self.execute_uncached(query);
            debug!(
                kind = query.kind(),
                took_us = start.elapsed().as_micros() as u64,
                empty = output.is_empty(),
                "Query executed"
            );
            output
        })
    }

    /// Parses and runs one line. Comments and blank lines give `Ok(None)`.
    pub fn execute_line(&self, line: &str) -> Result<Option<QueryOutput>> {
        Ok(self.parser.parse(line)?.map(|query| self.execute(&query)))
    }

    fn execute_uncached(&self, query: &Query) -> QueryOutput {
        let catalog = self.catalog;
        match query {
            Query::Profile(key) => QueryOutput::Profile(self.profile(key)),
            Query::TopDrivers { n } => QueryOutput::Drivers(
                catalog.top_drivers(*n).into_iter().map(RankedDriver::from).collect()
            ),
            Query::TopUsers { n } => QueryOutput::Users(
                catalog.top_users(*n).into_iter().map(RankedUser::from).collect()
            ),
            Query::AveragePriceInCity { city } => {
                QueryOutput::Scalar(catalog.average_price_in_city(city))
            }
            Query::AveragePriceInRange { range } => {
                QueryOutput::Scalar(catalog.average_price_in_date_range(*range))
            }
            Query::AverageDistanceInCity { city, range } => {
                QueryOutput::Scalar(catalog.average_distance_in_city_by_date(city, *range))
            }
            Query::TopDriversInCity { n, city } => QueryOutput::Drivers(
                catalog.top_drivers_in_city(*n, city).iter().map(RankedDriver::from).collect()
            ),
            Query::TippedRides { range } => QueryOutput::Rides(
                catalog.tipped_rides_in_date_range(*range).into_iter().map(RideSummary::from).collect()
            ),
        }
    }

    // Inactive accounts are reported like unknown ones
    fn profile(&self, key: &ProfileKey) -> Option<Profile> {
        let reference = self.catalog.reference_date();
        let profile = match key {
            ProfileKey::User(username) => self.catalog.get_user(username)
                .filter(|user| user.is_active())
                .map(|user| Profile::from_user(user, reference)),
            ProfileKey::Driver(id) => self.catalog.get_driver(*id)
                .filter(|driver| driver.is_active())
                .map(|driver| Profile::from_driver(driver, reference)),
        };
        if profile.is_none() {
            debug!(?key, "No active account for profile query");
        }
        profile
    }

    /// Runs every query line and writes command `N` for line `N`.
    ///
    /// Every line takes a number. Lines starting with `#` write nothing;
    /// blank lines and lines that do not parse write an empty output. Only a
    /// sink failure stops the batch.
    pub fn run_batch<I, S>(&self, lines: I, sink: &mut S) -> Result<BatchReport>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        S: OutputSink,
    {
        let start = Instant::now();
        let mut report = BatchReport::default();

        let mut commands: Vec<usize> = Vec::new();
        let mut queries: Vec<Option<Query>> = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            let number = index + 1;
            let line = line.as_ref();
            if line.starts_with(COMMENT_PREFIX) {
                continue;
            }
            let query = match self.parser.parse(line) {
                Ok(query) => query,
                Err(err) => {
                    warn!(line = number, text = line.trim(), error = %err, "Skipping malformed query");
                    report.failed += 1;
                    None
                }
            };
            commands.push(number);
            queries.push(query);
        }

        let outputs = if self.parallel {
            self.execute_parallel(&queries)?
        } else {
            queries.iter().map(|query| self.render(query.as_ref())).collect()
        };

        for (number, lines) in commands.iter().zip(&outputs) {
            sink.write_output(*number, lines)?;
        }

        report.commands = outputs.len();
        report.took_ms = start.elapsed().as_millis() as u64;
        info!(
            commands = report.commands,
            failed = report.failed,
            parallel = self.parallel,
            took_ms = report.took_ms,
            "Query batch finished"
        );
        Ok(report)
    }

    fn execute_parallel(&self, queries: &[Option<Query>]) -> Result<Vec<Vec<String>>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| Error::new(ErrorKind::InvalidState, format!("Cannot start query workers: {}", e)))?;

        // collect keeps input order
        Ok(pool.install(|| {
            queries.par_iter()
                .map(|query| self.render(query.as_ref()))
                .collect()
        }))
    }

    fn render(&self, query: Option<&Query>) -> Vec<String> {
        query
            .map(|query| format_output(&self.execute(query)))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::core::types::{AccountStatus, CarClass, Driver, DriverId, Gender, Ride, RideId, User};
    use crate::pricing::fare::FlatFare;
    use crate::query::output::BufferSink;
    use crate::writer::catalog_builder::CatalogBuilder;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> Catalog {
        let mut builder = CatalogBuilder::with_pricer(&Config::default(), FlatFare(5.0));
        builder.register_user(User::new("ana", "Ana", Gender::Female, date(9, 10, 1990), date(1, 1, 2015),
                                        "cash", AccountStatus::Active)).unwrap();
        builder.register_user(User::new("old", "Old", Gender::Male, date(1, 1, 1950), date(1, 1, 2015),
                                        "cash", AccountStatus::Inactive)).unwrap();
        builder.register_driver(Driver::new(DriverId(7), "Rui", Gender::Male, date(1, 1, 1980),
                                            CarClass::Basic, "AA", "Porto", date(1, 1, 2016),
                                            AccountStatus::Active)).unwrap();
        builder.register_ride(Ride::new(RideId(1), date(2, 1, 2021), DriverId(7), "ana", "Porto", 10, 4, 5, 1.0))
            .unwrap();
        builder.register_ride(Ride::new(RideId(2), date(3, 1, 2021), DriverId(7), "old", "Porto", 6, 2, 3, 0.0))
            .unwrap();
        builder.finalize()
    }

    #[test]
    fn profiles_skip_inactive_accounts() {
        let catalog = catalog();
        let executor = QueryExecutor::new(&catalog, &Config::default()).unwrap();

        let QueryOutput::Profile(Some(profile)) = executor.execute_line("1 ana").unwrap().unwrap() else {
            panic!("expected a profile");
        };
        assert_eq!(profile.age, 32);
        assert_eq!(profile.total_amount, 6.0);

        assert_eq!(executor.execute_line("1 old").unwrap(), Some(QueryOutput::Profile(None)));
        assert_eq!(executor.execute_line("1 nobody").unwrap(), Some(QueryOutput::Profile(None)));
        assert!(matches!(executor.execute_line("1 000000000007").unwrap(),
                         Some(QueryOutput::Profile(Some(_)))));
    }

    #[test]
    fn repeated_queries_hit_the_cache() {
        let catalog = catalog();
        let executor = QueryExecutor::new(&catalog, &Config::default()).unwrap();
        executor.execute(&Query::TopDrivers { n: 1 });
        executor.execute(&Query::TopDrivers { n: 1 });
        assert_eq!(executor.cache_stats().hit_count, 1);
    }

    #[test]
    fn batch_numbers_queries_and_survives_bad_lines() {
        let catalog = catalog();
        let executor = QueryExecutor::new(&catalog, &Config::default()).unwrap();
        let mut sink = BufferSink::new();

        let lines = ["2 1", "# comment", "", "2 x", "4 Porto"];
        let report = executor.run_batch(lines, &mut sink).unwrap();

        assert_eq!(report.commands, 4);
        assert_eq!(report.failed, 1);
        assert_eq!(sink.lines(1).unwrap(), ["000000000007;Rui;4.000".to_string()]);
        assert_eq!(sink.lines(2), None);
        assert!(sink.lines(3).unwrap().is_empty());
        assert!(sink.lines(4).unwrap().is_empty());
        assert_eq!(sink.lines(5).unwrap(), ["5.000".to_string()]);
    }

    #[test]
    fn comment_lines_use_up_a_command_number() {
        let catalog = catalog();
        let executor = QueryExecutor::new(&catalog, &Config::default()).unwrap();
        let mut sink = BufferSink::new();

        executor.run_batch(["# header comment", "2 1"], &mut sink).unwrap();

        let numbers: Vec<usize> = sink.outputs.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![2]);
        assert_eq!(sink.lines(2).unwrap(), ["000000000007;Rui;4.000".to_string()]);
    }

    #[test]
    fn parallel_batch_matches_sequential() {
        let catalog = catalog();
        let lines = ["1 ana", "2 5", "3 5", "5 01/01/2021 31/12/2021", "6 Porto 01/01/2021 02/01/2021",
                     "7 2 Porto", "9 01/01/2021 31/12/2021"];

        let sequential = QueryExecutor::new(&catalog, &Config::default()).unwrap();
        let mut expected = BufferSink::new();
        sequential.run_batch(lines, &mut expected).unwrap();

        let config = Config { parallel_queries: true, worker_threads: 2, ..Config::default() };
        let parallel = QueryExecutor::new(&catalog, &config).unwrap();
        let mut actual = BufferSink::new();
        parallel.run_batch(lines, &mut actual).unwrap();

        assert_eq!(expected.outputs, actual.outputs);
    }
}
