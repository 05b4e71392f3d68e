use std::collections::HashMap;
use std::sync::Arc;
use crate::core::config::IndexingStrategy;
use crate::core::types::RideHandle;
use crate::index::deferred::Deferred;
use crate::index::entity_store::EntityStore;
use crate::index::ranking::sort_rides_by_date;

/// Rides of one city: insertion order while accumulating, date order once ranked.
pub type CityBucket = Deferred<Vec<RideHandle>, Vec<RideHandle>>;

/// Groups rides by city while the catalog is being built
#[derive(Debug, Default)]
pub struct CityIndexBuilder {
    buckets: HashMap<String, Vec<RideHandle>>,
}

impl CityIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_ride(&mut self, city: &str, ride: RideHandle) {
        match self.buckets.get_mut(city) {
            Some(bucket) => bucket.push(ride),
            None => {
                self.buckets.insert(city.to_string(), vec![ride]);
            }
        }
    }

    pub fn city_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn finalize(self, store: &EntityStore, strategy: IndexingStrategy) -> CityIndex {
        let buckets = self.buckets.into_iter()
            .map(|(city, mut rides)| {
                let bucket = if strategy.is_eager() {
                    sort_rides_by_date(&mut rides, store);
                    CityBucket::ranked(rides)
                } else {
                    CityBucket::accumulating(rides)
                };
                (city, bucket)
            })
            .collect();

        CityIndex { buckets }
    }
}

/// Finalized city index
#[derive(Debug)]
pub struct CityIndex {
    buckets: HashMap<String, CityBucket>,
}

impl CityIndex {
    pub fn bucket(&self, city: &str) -> Option<&CityBucket> {
        self.buckets.get(city)
    }

    /// Date-ordered rides of a city, sorting the bucket on first use.
    pub fn rides_by_date(&self, city: &str, store: &EntityStore) -> Option<Arc<Vec<RideHandle>>> {
        self.buckets.get(city).map(|bucket| {
            bucket.rank_with(|mut rides| {
                sort_rides_by_date(&mut rides, store);
                rides
            })
        })
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn city_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn ranked_count(&self) -> usize {
        self.buckets.values().filter(|bucket| bucket.is_ranked()).count()
    }

    pub fn total_rides(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.len()).sum()
    }
}
