use std::collections::HashMap;
use crate::core::error::{Error, Result};
use crate::core::types::{Driver, DriverHandle, DriverId, Ride, RideHandle, RideId, User, UserHandle};

/// Owning collections for users, drivers and rides plus their key maps.
///
/// Every other structure in the crate refers to records through the
/// handles handed out here. Records are appended and never removed, so a
/// handle stays valid for the lifetime of the store.
#[derive(Debug, Default)]
pub struct EntityStore {
    users: Vec<User>,
    drivers: Vec<Driver>,
    rides: Vec<Ride>,

    user_index: HashMap<String, UserHandle>,
    driver_index: HashMap<DriverId, DriverHandle>,
    ride_index: HashMap<RideId, RideHandle>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duplicate usernames are rejected and the store is left untouched.
    pub fn register_user(&mut self, user: User) -> Result<UserHandle> {
        if self.user_index.contains_key(&user.username) {
            return Err(Error::already_exists(format!("User '{}' already registered", user.username)));
        }

        let handle = UserHandle(self.users.len());
        self.user_index.insert(user.username.clone(), handle);
        self.users.push(user);
        Ok(handle)
    }

    /// Duplicate driver ids are rejected and the store is left untouched.
    pub fn register_driver(&mut self, driver: Driver) -> Result<DriverHandle> {
        if self.driver_index.contains_key(&driver.id) {
            return Err(Error::already_exists(format!("Driver {} already registered", driver.id.value())));
        }

        let handle = DriverHandle(self.drivers.len());
        self.driver_index.insert(driver.id, handle);
        self.drivers.push(driver);
        Ok(handle)
    }

    /// Checks that a ride can be stored without touching anything.
    pub(crate) fn check_ride(&self, ride: &Ride) -> Result<(UserHandle, DriverHandle)> {
        if self.ride_index.contains_key(&ride.id) {
            return Err(Error::already_exists(format!("Ride {} already registered", ride.id.0)));
        }
        let user = self.user_handle(&ride.user)
            .ok_or_else(|| Error::not_found(format!("Ride {} references unknown user '{}'", ride.id.0, ride.user)))?;
        let driver = self.driver_handle(ride.driver)
            .ok_or_else(|| Error::not_found(format!("Ride {} references unknown driver {}", ride.id.0, ride.driver.value())))?;
        Ok((user, driver))
    }

    /// Stores a priced ride and folds it into the user and driver totals.
    pub(crate) fn insert_ride(&mut self, ride: Ride) -> Result<RideHandle> {
        let (user, driver) = self.check_ride(&ride)?;

        self.users[user.0].record_ride(&ride);
        self.drivers[driver.0].record_ride(&ride);

        let handle = RideHandle(self.rides.len());
        self.ride_index.insert(ride.id, handle);
        self.rides.push(ride);
        Ok(handle)
    }

    pub fn get_user(&self, username: &str) -> Option<&User> {
        self.user_handle(username).map(|handle| self.user(handle))
    }

    pub fn get_driver(&self, id: DriverId) -> Option<&Driver> {
        self.driver_handle(id).map(|handle| self.driver(handle))
    }

    pub fn user_handle(&self, username: &str) -> Option<UserHandle> {
        self.user_index.get(username).copied()
    }

    pub fn driver_handle(&self, id: DriverId) -> Option<DriverHandle> {
        self.driver_index.get(&id).copied()
    }

    pub fn user(&self, handle: UserHandle) -> &User {
        &self.users[handle.0]
    }

    pub fn driver(&self, handle: DriverHandle) -> &Driver {
        &self.drivers[handle.0]
    }

    pub fn ride(&self, handle: RideHandle) -> &Ride {
        &self.rides[handle.0]
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn rides(&self) -> &[Ride] {
        &self.rides
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    pub fn ride_count(&self) -> usize {
        self.rides.len()
    }
}
