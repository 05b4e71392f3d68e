use serde::{Serialize, Deserialize};
use crate::core::types::DriverId;
use crate::search::range::DateRange;
use crate::search::results::{Profile, RankedDriver, RankedUser, RideSummary};

/// Main query enum representing all supported query kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Query {
    Profile(ProfileKey),                                       // 1
    TopDrivers { n: usize },                                   // 2
    TopUsers { n: usize },                                     // 3
    AveragePriceInCity { city: String },                       // 4
    AveragePriceInRange { range: DateRange },                  // 5
    AverageDistanceInCity { city: String, range: DateRange },  // 6
    TopDriversInCity { n: usize, city: String },               // 7
    TippedRides { range: DateRange },                          // 9
}

impl Query {
    /// Number used for this kind in query files
    pub fn kind(&self) -> u8 {
        match self {
            Query::Profile(_) => 1,
            Query::TopDrivers { .. } => 2,
            Query::TopUsers { .. } => 3,
            Query::AveragePriceInCity { .. } => 4,
            Query::AveragePriceInRange { .. } => 5,
            Query::AverageDistanceInCity { .. } => 6,
            Query::TopDriversInCity { .. } => 7,
            Query::TippedRides { .. } => 9,
        }
    }
}

/// Profile lookups go to drivers for all-digit keys, to users otherwise
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKey {
    User(String),
    Driver(DriverId),
}

/// Structured result of one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryOutput {
    // None when the account is unknown or inactive
    Profile(Option<Profile>),
    Drivers(Vec<RankedDriver>),
    Users(Vec<RankedUser>),
    Scalar(f64),
    Rides(Vec<RideSummary>),
}

impl QueryOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            QueryOutput::Profile(profile) => profile.is_none(),
            QueryOutput::Drivers(drivers) => drivers.is_empty(),
            QueryOutput::Users(users) => users.is_empty(),
            QueryOutput::Scalar(_) => false,
            QueryOutput::Rides(rides) => rides.is_empty(),
        }
    }
}
