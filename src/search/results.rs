use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::core::types::{Driver, DriverId, Gender, Ride, RideId, User};
use crate::index::driver_city::DriverCityStat;

/// Profile of a user or a driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    pub average_score: f64,
    pub ride_count: u32,
    // Spent for users, earned for drivers
    pub total_amount: f64,
}

impl Profile {
    pub fn from_user(user: &User, reference: NaiveDate) -> Self {
        Profile {
            name: user.name.clone(),
            gender: user.gender,
            age: user.age(reference),
            average_score: user.average_score(),
            ride_count: user.totals.ride_count,
            total_amount: user.total_spent(),
        }
    }

    pub fn from_driver(driver: &Driver, reference: NaiveDate) -> Self {
        Profile {
            name: driver.name.clone(),
            gender: driver.gender,
            age: driver.age(reference),
            average_score: driver.average_score(),
            ride_count: driver.totals.ride_count,
            total_amount: driver.total_earned(),
        }
    }
}

/// Driver entry in a score ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDriver {
    pub id: DriverId,
    pub name: String,
    pub average_score: f64,
}

impl From<&Driver> for RankedDriver {
    fn from(driver: &Driver) -> Self {
        RankedDriver {
            id: driver.id,
            name: driver.name.clone(),
            average_score: driver.average_score(),
        }
    }
}

impl From<&DriverCityStat> for RankedDriver {
    fn from(stat: &DriverCityStat) -> Self {
        RankedDriver {
            id: stat.driver,
            name: stat.name.clone(),
            average_score: stat.average_score(),
        }
    }
}

/// User entry in the distance ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedUser {
    pub username: String,
    pub name: String,
    pub total_distance: u64,
}

impl From<&User> for RankedUser {
    fn from(user: &User) -> Self {
        RankedUser {
            username: user.username.clone(),
            name: user.name.clone(),
            total_distance: user.total_distance,
        }
    }
}

/// Ride fields reported by range listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideSummary {
    pub id: RideId,
    pub date: NaiveDate,
    pub distance: u32,
    pub city: String,
    pub tip: f64,
}

impl From<&Ride> for RideSummary {
    fn from(ride: &Ride) -> Self {
        RideSummary {
            id: ride.id,
            date: ride.date,
            distance: ride.distance,
            city: ride.city.clone(),
            tip: ride.tip,
        }
    }
}
