use chrono::NaiveDate;
use crate::core::config::IndexingStrategy;
use crate::core::stats::CatalogStats;
use crate::core::types::{Driver, DriverId, Ride, RideHandle, User};
use crate::index::city_index::CityIndex;
use crate::index::driver_city::{DriverCityIndex, DriverCityStat};
use crate::index::entity_store::EntityStore;
use crate::index::ranking::{compare_rides_by_distance, GlobalRankings};
use crate::search::range::{range_scan, top_n, DateRange, RunningAverage};

/// Read-only catalog produced by `CatalogBuilder::finalize`.
///
/// Nothing here mutates records or rankings. The only interior state is the
/// lazy per-city indexing, which converts each city at most once and is safe
/// to trigger from several threads.
#[derive(Debug)]
pub struct Catalog {
    store: EntityStore,
    cities: CityIndex,
    driver_cities: DriverCityIndex,
    rankings: GlobalRankings,
    indexing: IndexingStrategy,
    reference_date: NaiveDate,
}

impl Catalog {
    pub(crate) fn new(
        store: EntityStore,
        cities: CityIndex,
        driver_cities: DriverCityIndex,
        rankings: GlobalRankings,
        indexing: IndexingStrategy,
        reference_date: NaiveDate,
    ) -> Self {
        Catalog {
            store,
            cities,
            driver_cities,
            rankings,
            indexing,
            reference_date,
        }
    }

    pub fn get_user(&self, username: &str) -> Option<&User> {
        self.store.get_user(username)
    }

    pub fn get_driver(&self, id: DriverId) -> Option<&Driver> {
        self.store.get_driver(id)
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Best average score first, ties broken by the higher id.
    pub fn top_drivers(&self, n: usize) -> Vec<&Driver> {
        top_n(&self.rankings.drivers_by_score, n).iter()
            .map(|handle| self.store.driver(*handle))
            .collect()
    }

    /// Longest total distance first.
    pub fn top_users(&self, n: usize) -> Vec<&User> {
        top_n(&self.rankings.users_by_distance, n).iter()
            .map(|handle| self.store.user(*handle))
            .collect()
    }

    /// Mean fare over every ride of the city; 0 for an unknown city.
    pub fn average_price_in_city(&self, city: &str) -> f64 {
        let Some(bucket) = self.cities.bucket(city) else {
            return 0.0;
        };

        bucket.with_unordered(|rides| {
            rides.iter()
                .map(|handle| self.store.ride(*handle).price())
                .collect::<RunningAverage>()
                .average()
        })
    }

    /// Mean fare of the rides dated inside `range`, across all cities.
    pub fn average_price_in_date_range(&self, range: DateRange) -> f64 {
        self.rides_in_range(&self.rankings.rides_by_date, range)
            .map(Ride::price)
            .collect::<RunningAverage>()
            .average()
    }

    /// Mean distance of the city's rides dated inside `range`.
    pub fn average_distance_in_city_by_date(&self, city: &str, range: DateRange) -> f64 {
        let Some(rides) = self.cities.rides_by_date(city, &self.store) else {
            return 0.0;
        };

        self.rides_in_range(&rides, range)
            .map(|ride| ride.distance as f64)
            .collect::<RunningAverage>()
            .average()
    }

    /// Rides inside `range` that carried a tip, longest first.
    pub fn tipped_rides_in_date_range(&self, range: DateRange) -> Vec<&Ride> {
        let mut tipped: Vec<&Ride> = self.rides_in_range(&self.rankings.rides_by_date, range)
            .filter(|ride| ride.tip > 0.0)
            .collect();
        tipped.sort_unstable_by(|a, b| compare_rides_by_distance(a, b));
        tipped
    }

    /// Best drivers of one city by their average score inside it.
    pub fn top_drivers_in_city(&self, n: usize, city: &str) -> Vec<DriverCityStat> {
        match self.driver_cities.ranking(city) {
            Some(ranking) => top_n(&ranking, n).to_vec(),
            None => Vec::new(),
        }
    }

    /// Rides of a city in date order; empty for an unknown city.
    pub fn rides_in_city(&self, city: &str) -> Vec<&Ride> {
        self.cities.rides_by_date(city, &self.store)
            .map(|rides| rides.iter().map(|handle| self.store.ride(*handle)).collect())
            .unwrap_or_default()
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.cities()
    }

    pub fn users(&self) -> &[User] {
        self.store.users()
    }

    pub fn drivers(&self) -> &[Driver] {
        self.store.drivers()
    }

    pub fn rides(&self) -> &[Ride] {
        self.store.rides()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            users: self.store.user_count(),
            drivers: self.store.driver_count(),
            rides: self.store.ride_count(),
            cities: self.cities.city_count(),
            indexing: self.indexing,
            cities_indexed: self.cities.ranked_count(),
            driver_city_pairs: self.driver_cities.pair_count(),
        }
    }

    fn rides_in_range<'a>(&'a self, rides: &'a [RideHandle], range: DateRange) -> impl Iterator<Item = &'a Ride> + 'a {
        let store = &self.store;
        range_scan(rides, range, move |handle: &RideHandle| store.ride(*handle).date)
            .map(move |handle| store.ride(*handle))
    }
}
