use std::time::Instant;
use chrono::NaiveDate;
use tracing::{debug, info};
use crate::core::config::{Config, IndexingStrategy};
use crate::core::error::Result;
use crate::core::types::{Driver, DriverHandle, DriverId, Ride, RideHandle, User, UserHandle};
use crate::index::city_index::CityIndexBuilder;
use crate::index::driver_city::DriverCityAggregator;
use crate::index::entity_store::EntityStore;
use crate::index::ranking::GlobalRankings;
use crate::pricing::fare::{PriceCalculator, StandardFares};
use crate::reader::catalog::Catalog;

/// Single writer for the load phase.
///
/// Records are registered in file order (users and drivers before the
/// rides that reference them). `finalize` consumes the builder and hands
/// back the read-only `Catalog`, so there is no way to query half-built
/// indexes or to register after finalizing.
pub struct CatalogBuilder<P: PriceCalculator = StandardFares> {
    indexing: IndexingStrategy,
    reference_date: NaiveDate,
    pricer: P,
    store: EntityStore,
    cities: CityIndexBuilder,
    driver_cities: DriverCityAggregator,
}

impl CatalogBuilder<StandardFares> {
    pub fn new(config: &Config) -> Self {
        Self::with_pricer(config, StandardFares::default())
    }
}

impl<P: PriceCalculator> CatalogBuilder<P> {
    pub fn with_pricer(config: &Config, pricer: P) -> Self {
        CatalogBuilder {
            indexing: config.indexing,
            reference_date: config.reference_date,
            pricer,
            store: EntityStore::new(),
            cities: CityIndexBuilder::new(),
            driver_cities: DriverCityAggregator::new(),
        }
    }

    pub fn register_user(&mut self, user: User) -> Result<UserHandle> {
        self.store.register_user(user)
    }

    pub fn register_driver(&mut self, driver: Driver) -> Result<DriverHandle> {
        self.store.register_driver(driver)
    }

    /// Prices the ride, stores it, and feeds the city and driver-city indexes.
    ///
    /// A ride with an unknown user or driver, or a repeated id, is refused
    /// before anything is modified.
    pub fn register_ride(&mut self, ride: Ride) -> Result<RideHandle> {
        let (_, driver) = self.store.check_ride(&ride)?;
        let price = self.pricer.price(ride.distance, self.store.driver(driver).car_class);

        let city = ride.city.clone();
        let score = ride.score_driver as u32;
        let handle = self.store.insert_ride(ride.with_price(price))?;

        self.cities.index_ride(&city, handle);
        self.driver_cities.add_score(&city, self.store.driver(driver), score);
        Ok(handle)
    }

    pub fn get_user(&self, username: &str) -> Option<&User> {
        self.store.get_user(username)
    }

    pub fn get_driver(&self, id: DriverId) -> Option<&Driver> {
        self.store.get_driver(id)
    }

    pub fn user_count(&self) -> usize {
        self.store.user_count()
    }

    pub fn driver_count(&self) -> usize {
        self.store.driver_count()
    }

    pub fn ride_count(&self) -> usize {
        self.store.ride_count()
    }

    pub fn finalize(self) -> Catalog {
        let start = Instant::now();
        debug!(
            cities = self.cities.city_count(),
            driver_city_pairs = self.driver_cities.pair_count(),
            strategy = ?self.indexing,
            pricer = self.pricer.name(),
            "Finalizing catalog"
        );

        let rankings = GlobalRankings::build(&self.store);
        let cities = self.cities.finalize(&self.store, self.indexing);
        let driver_cities = self.driver_cities.finalize(self.indexing);

        info!(
            users = self.store.user_count(),
            drivers = self.store.driver_count(),
            rides = self.store.ride_count(),
            took_ms = start.elapsed().as_millis() as u64,
            "Catalog finalized"
        );

        Catalog::new(self.store, cities, driver_cities, rankings, self.indexing, self.reference_date)
    }
}
