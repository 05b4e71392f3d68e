use crate::core::error::{Error, Result};
use crate::core::types::{parse_date, Driver, DriverId, Ride, RideId, User};

pub const FIELD_SEPARATOR: char = ';';

const USER_FIELDS: usize = 7;
const DRIVER_FIELDS: usize = 9;
const RIDE_FIELDS: usize = 10;

fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(FIELD_SEPARATOR).collect();
    if fields.len() != expected {
        return Err(Error::invalid_input(format!(
            "Expected {} fields, found {}", expected, fields.len()
        )));
    }
    Ok(fields)
}

fn required<'a>(field: &'a str, name: &str) -> Result<&'a str> {
    if field.is_empty() {
        Err(Error::invalid_input(format!("Field '{}' is empty", name)))
    } else {
        Ok(field)
    }
}

fn positive_integer<T: std::str::FromStr + Default + PartialOrd>(field: &str, name: &str) -> Result<T> {
    // Rejects signs and decimals that `parse` would otherwise accept
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_input(format!("Field '{}' is not a positive integer: '{}'", name, field)));
    }
    let value: T = field.parse()
        .map_err(|_| Error::invalid_input(format!("Field '{}' is out of range: '{}'", name, field)))?;
    if value <= T::default() {
        return Err(Error::invalid_input(format!("Field '{}' must be positive", name)));
    }
    Ok(value)
}

fn non_negative_decimal(field: &str, name: &str) -> Result<f64> {
    let value: f64 = required(field, name)?.parse()?;
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_input(format!("Field '{}' must be a non-negative number", name)));
    }
    Ok(value)
}

/// `username;name;gender;birth_date;account_creation;pay_method;account_status`
pub fn parse_user(line: &str) -> Result<User> {
    let f = split_fields(line, USER_FIELDS)?;

    Ok(User::new(
        required(f[0], "username")?,
        required(f[1], "name")?,
        required(f[2], "gender")?.parse()?,
        parse_date(f[3])?,
        parse_date(f[4])?,
        required(f[5], "pay_method")?,
        f[6].parse()?,
    ))
}

/// `id;name;birth_day;gender;car_class;license_plate;city;account_creation;account_status`
pub fn parse_driver(line: &str) -> Result<Driver> {
    let f = split_fields(line, DRIVER_FIELDS)?;

    Ok(Driver::new(
        DriverId(required(f[0], "id")?.parse()?),
        required(f[1], "name")?,
        required(f[3], "gender")?.parse()?,
        parse_date(f[2])?,
        f[4].parse()?,
        required(f[5], "license_plate")?,
        required(f[6], "city")?,
        parse_date(f[7])?,
        f[8].parse()?,
    ))
}

/// `id;date;driver;user;city;distance;score_user;score_driver;tip;comment`
pub fn parse_ride(line: &str) -> Result<Ride> {
    let f = split_fields(line, RIDE_FIELDS)?;

    let ride = Ride::new(
        RideId(required(f[0], "id")?.parse()?),
        parse_date(f[1])?,
        DriverId(required(f[2], "driver")?.parse()?),
        required(f[3], "user")?,
        required(f[4], "city")?,
        positive_integer(f[5], "distance")?,
        positive_integer(f[6], "score_user")?,
        positive_integer(f[7], "score_driver")?,
        non_negative_decimal(f[8], "tip")?,
    );

    Ok(if f[9].is_empty() { ride } else { ride.with_comment(f[9]) })
}
