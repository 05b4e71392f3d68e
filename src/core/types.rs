use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use chrono::NaiveDate;
use crate::core::error::{Error, Result};

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a `dd/mm/yyyy` date.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    // chrono accepts single-digit fields, the dataset format does not
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'/' || bytes[5] != b'/' {
        return Err(Error::invalid_input(format!("Date '{}' is not dd/mm/yyyy", text)));
    }
    Ok(NaiveDate::parse_from_str(text, DATE_FORMAT)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverId(pub u64);

impl DriverId {
    pub fn new(id: u64) -> Self {
        DriverId(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for DriverId {
    fn from(id: u64) -> Self {
        DriverId(id)
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:012}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RideId(pub u64);

impl From<u64> for RideId {
    fn from(id: u64) -> Self {
        RideId(id)
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:012}", self.0)
    }
}

/// Position of a user in the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserHandle(pub(crate) usize);

/// Position of a driver in the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverHandle(pub(crate) usize);

/// Position of a ride in the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RideHandle(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            other => Err(Error::invalid_input(format!("Unknown gender '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl FromStr for AccountStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("active") {
            Ok(AccountStatus::Active)
        } else if s.eq_ignore_ascii_case("inactive") {
            Ok(AccountStatus::Inactive)
        } else {
            Err(Error::invalid_input(format!("Unknown account status '{}'", s)))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarClass {
    Basic,
    Green,
    Premium,
}

impl FromStr for CarClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("basic") {
            Ok(CarClass::Basic)
        } else if s.eq_ignore_ascii_case("green") {
            Ok(CarClass::Green)
        } else if s.eq_ignore_ascii_case("premium") {
            Ok(CarClass::Premium)
        } else {
            Err(Error::invalid_input(format!("Unknown car class '{}'", s)))
        }
    }
}

/// Ride totals shared by users and drivers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RideTotals {
    pub ride_count: u32,
    pub score_sum: u64,
    pub amount: f64,
    pub last_ride: Option<NaiveDate>,
}

impl RideTotals {
    fn record(&mut self, score: u32, amount: f64, date: NaiveDate) {
        self.ride_count += 1;
        self.score_sum += score as u64;
        self.amount += amount;
        self.last_ride = Some(self.last_ride.map_or(date, |last| last.max(date)));
    }

    /// Zero when no ride was recorded.
    pub fn average_score(&self) -> f64 {
        if self.ride_count == 0 {
            0.0
        } else {
            self.score_sum as f64 / self.ride_count as f64
        }
    }
}

fn age_at(birth_date: NaiveDate, reference: NaiveDate) -> u32 {
    reference.years_since(birth_date).unwrap_or(0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub account_creation: NaiveDate,
    pub pay_method: String,
    pub account_status: AccountStatus,
    pub totals: RideTotals,
    pub total_distance: u64,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        gender: Gender,
        birth_date: NaiveDate,
        account_creation: NaiveDate,
        pay_method: impl Into<String>,
        account_status: AccountStatus,
    ) -> Self {
        User {
            username: username.into(),
            name: name.into(),
            gender,
            birth_date,
            account_creation,
            pay_method: pay_method.into(),
            account_status,
            totals: RideTotals::default(),
            total_distance: 0,
        }
    }

    pub(crate) fn record_ride(&mut self, ride: &Ride) {
        self.totals.record(ride.score_user as u32, ride.total_cost(), ride.date);
        self.total_distance += ride.distance as u64;
    }

    pub fn is_active(&self) -> bool {
        self.account_status == AccountStatus::Active
    }

    pub fn average_score(&self) -> f64 {
        self.totals.average_score()
    }

    pub fn total_spent(&self) -> f64 {
        self.totals.amount
    }

    pub fn age(&self, reference: NaiveDate) -> u32 {
        age_at(self.birth_date, reference)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub car_class: CarClass,
    pub license_plate: String,
    pub city: String,
    pub account_creation: NaiveDate,
    pub account_status: AccountStatus,
    pub totals: RideTotals,
}

impl Driver {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: DriverId,
        name: impl Into<String>,
        gender: Gender,
        birth_date: NaiveDate,
        car_class: CarClass,
        license_plate: impl Into<String>,
        city: impl Into<String>,
        account_creation: NaiveDate,
        account_status: AccountStatus,
    ) -> Self {
        Driver {
            id,
            name: name.into(),
            gender,
            birth_date,
            car_class,
            license_plate: license_plate.into(),
            city: city.into(),
            account_creation,
            account_status,
            totals: RideTotals::default(),
        }
    }

    pub(crate) fn record_ride(&mut self, ride: &Ride) {
        self.totals.record(ride.score_driver as u32, ride.total_cost(), ride.date);
    }

    pub fn is_active(&self) -> bool {
        self.account_status == AccountStatus::Active
    }

    pub fn average_score(&self) -> f64 {
        self.totals.average_score()
    }

    pub fn total_earned(&self) -> f64 {
        self.totals.amount
    }

    pub fn age(&self, reference: NaiveDate) -> u32 {
        age_at(self.birth_date, reference)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: RideId,
    pub date: NaiveDate,
    pub driver: DriverId,
    pub user: String,
    pub city: String,
    pub distance: u32,
    pub score_user: u8,
    pub score_driver: u8,
    pub tip: f64,
    pub comment: Option<String>,
    price: f64,
}

impl Ride {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RideId,
        date: NaiveDate,
        driver: DriverId,
        user: impl Into<String>,
        city: impl Into<String>,
        distance: u32,
        score_user: u8,
        score_driver: u8,
        tip: f64,
    ) -> Self {
        Ride {
            id,
            date,
            driver,
            user: user.into(),
            city: city.into(),
            distance,
            score_user,
            score_driver,
            tip,
            comment: None,
            price: 0.0,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub(crate) fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Fare set at registration; zero until then.
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn total_cost(&self) -> f64 {
        self.price + self.tip
    }
}
