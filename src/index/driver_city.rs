use std::collections::HashMap;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use crate::core::config::IndexingStrategy;
use crate::core::types::{Driver, DriverId};
use crate::index::deferred::Deferred;
use crate::index::ranking::compare_by_score_then_id;

/// Score totals of one driver inside one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverCityStat {
    pub driver: DriverId,
    // Copied when the pair is first seen
    pub name: String,
    pub score_sum: u64,
    pub ride_count: u32,
}

impl DriverCityStat {
    pub fn new(driver: &Driver) -> Self {
        DriverCityStat {
            driver: driver.id,
            name: driver.name.clone(),
            score_sum: 0,
            ride_count: 0,
        }
    }

    pub fn add_score(&mut self, score: u32) {
        self.score_sum += score as u64;
        self.ride_count += 1;
    }

    pub fn average_score(&self) -> f64 {
        if self.ride_count == 0 {
            0.0
        } else {
            self.score_sum as f64 / self.ride_count as f64
        }
    }
}

type CityDrivers = HashMap<DriverId, DriverCityStat>;

/// Per-city driver stats: a map while accumulating, a ranking once finalized.
pub type CityRanking = Deferred<CityDrivers, Vec<DriverCityStat>>;

/// Accumulates (city, driver) score totals during ingestion
#[derive(Debug, Default)]
pub struct DriverCityAggregator {
    cities: HashMap<String, CityDrivers>,
}

impl DriverCityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_score(&mut self, city: &str, driver: &Driver, score: u32) {
        self.cities.entry(city.to_string())
            .or_default()
            .entry(driver.id)
            .or_insert_with(|| DriverCityStat::new(driver))
            .add_score(score);
    }

    pub fn pair_count(&self) -> usize {
        self.cities.values().map(HashMap::len).sum()
    }

    pub fn finalize(self, strategy: IndexingStrategy) -> DriverCityIndex {
        let pairs = self.pair_count();
        let cities = self.cities.into_iter()
            .map(|(city, drivers)| {
                let ranking = if strategy.is_eager() {
                    CityRanking::ranked(rank_city_drivers(drivers))
                } else {
                    CityRanking::accumulating(drivers)
                };
                (city, ranking)
            })
            .collect();

        DriverCityIndex { cities, pairs }
    }
}

/// Visits every entry once and orders by average score, then id, both descending.
pub fn rank_city_drivers(drivers: CityDrivers) -> Vec<DriverCityStat> {
    let mut ranked: Vec<DriverCityStat> = drivers.into_values().collect();
    ranked.sort_unstable_by(|a, b| {
        compare_by_score_then_id(a.average_score(), a.driver, b.average_score(), b.driver)
    });
    ranked
}

/// Finalized per-city driver rankings
#[derive(Debug)]
pub struct DriverCityIndex {
    cities: HashMap<String, CityRanking>,
    pairs: usize,
}

impl DriverCityIndex {
    pub fn ranking(&self, city: &str) -> Option<Arc<Vec<DriverCityStat>>> {
        self.cities.get(city).map(|ranking| ranking.rank_with(rank_city_drivers))
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn ranked_count(&self) -> usize {
        self.cities.values().filter(|ranking| ranking.is_ranked()).count()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs
    }
}
