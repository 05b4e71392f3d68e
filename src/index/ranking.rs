use std::cmp::Ordering;
use rayon::prelude::*;
use crate::core::types::{Driver, DriverHandle, DriverId, Ride, RideHandle, User, UserHandle};
use crate::index::entity_store::EntityStore;

/// Highest average first; equal averages put the higher id first.
pub fn compare_by_score_then_id(a_score: f64, a_id: DriverId, b_score: f64, b_id: DriverId) -> Ordering {
    b_score.total_cmp(&a_score).then_with(|| b_id.cmp(&a_id))
}

pub fn compare_drivers_by_score(a: &Driver, b: &Driver) -> Ordering {
    compare_by_score_then_id(a.average_score(), a.id, b.average_score(), b.id)
}

/// Longest distance first, then most recent ride, then username.
pub fn compare_users_by_distance(a: &User, b: &User) -> Ordering {
    b.total_distance.cmp(&a.total_distance)
        .then_with(|| b.totals.last_ride.cmp(&a.totals.last_ride))
        .then_with(|| a.username.cmp(&b.username))
}

/// Oldest first; ids keep equal dates in a fixed order.
pub fn compare_rides_by_date(a: &Ride, b: &Ride) -> Ordering {
    a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id))
}

/// Longest first, then most recent, then highest id.
pub fn compare_rides_by_distance(a: &Ride, b: &Ride) -> Ordering {
    b.distance.cmp(&a.distance)
        .then_with(|| b.date.cmp(&a.date))
        .then_with(|| b.id.cmp(&a.id))
}

/// Sorts ride handles by date using the records they point to.
///
/// Sequential: city buckets are sorted while their lock is held, and a rayon
/// worker waiting there could pick up a query that needs the same lock.
pub fn sort_rides_by_date(handles: &mut [RideHandle], store: &EntityStore) {
    handles.sort_unstable_by(|a, b| compare_rides_by_date(store.ride(*a), store.ride(*b)));
}

/// The three global orders built once at finalize.
#[derive(Debug, Default)]
pub struct GlobalRankings {
    pub drivers_by_score: Vec<DriverHandle>,
    pub users_by_distance: Vec<UserHandle>,
    pub rides_by_date: Vec<RideHandle>,
}

impl GlobalRankings {
    pub fn build(store: &EntityStore) -> Self {
        let mut drivers_by_score: Vec<DriverHandle> = (0..store.driver_count()).map(DriverHandle).collect();
        let mut users_by_distance: Vec<UserHandle> = (0..store.user_count()).map(UserHandle).collect();
        let mut rides_by_date: Vec<RideHandle> = (0..store.ride_count()).map(RideHandle).collect();

        rayon::join(
            || drivers_by_score.par_sort_unstable_by(|a, b| {
                compare_drivers_by_score(store.driver(*a), store.driver(*b))
            }),
            || rayon::join(
                || users_by_distance.par_sort_unstable_by(|a, b| {
                    compare_users_by_distance(store.user(*a), store.user(*b))
                }),
                || rides_by_date.par_sort_unstable_by(|a, b| {
                    compare_rides_by_date(store.ride(*a), store.ride(*b))
                }),
            ),
        );

        GlobalRankings {
            drivers_by_score,
            users_by_distance,
            rides_by_date,
        }
    }
}
