use chrono::NaiveDate;
use ridecatalog::core::error::ErrorKind;
use ridecatalog::core::types::{AccountStatus, CarClass, Driver, DriverId, Gender, Ride, RideId, User};
use ridecatalog::pricing::fare::PriceCalculator;
use ridecatalog::search::range::DateRange;
use ridecatalog::{Catalog, CatalogBuilder, Config};

/// Charges one unit per kilometre so tests can pick exact prices
struct DistanceFare;

impl PriceCalculator for DistanceFare {
    fn price(&self, distance: u32, _car_class: CarClass) -> f64 {
        distance as f64
    }

    fn name(&self) -> &str {
        "distance"
    }
}

fn date(d: u32, m: u32, y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn user(username: &str) -> User {
    User::new(username, username.to_uppercase(), Gender::Female, date(1, 1, 1990), date(1, 1, 2015),
              "card", AccountStatus::Active)
}

fn driver(id: u64, city: &str) -> Driver {
    Driver::new(DriverId(id), format!("Driver {}", id), Gender::Male, date(1, 1, 1980), CarClass::Basic,
                "00-AA-00", city, date(1, 1, 2016), AccountStatus::Active)
}

/// Ten Porto rides on 2023-01-01..=10 priced 10, 20, ..., 100.
fn porto_catalog(eager: bool) -> Catalog {
    let config = Config::default().with_eager_indexing(eager);
    let mut builder = CatalogBuilder::with_pricer(&config, DistanceFare);
    builder.register_user(user("rider")).unwrap();
    builder.register_driver(driver(1, "Porto")).unwrap();

    // registered newest first so finalize has to sort
    for day in (1..=10u32).rev() {
        let ride = Ride::new(RideId(day as u64), date(day, 1, 2023), DriverId(1), "rider", "Porto",
                             day * 10, 5, 4, 0.0);
        builder.register_ride(ride).unwrap();
    }
    builder.finalize()
}

#[test]
fn average_price_in_date_range_scans_only_matching_days() {
    for eager in [false, true] {
        let catalog = porto_catalog(eager);
        let range = DateRange::new(date(3, 1, 2023), date(5, 1, 2023));
        assert_eq!(catalog.average_price_in_date_range(range), 40.0);
        assert_eq!(catalog.average_distance_in_city_by_date("Porto", range), 40.0);
    }
}

#[test]
fn over_requesting_top_drivers_returns_what_exists() {
    let catalog = porto_catalog(false);
    let top = catalog.top_drivers_in_city(2, "Porto");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].driver, DriverId(1));
    assert_eq!(top[0].average_score(), 4.0);

    assert_eq!(catalog.top_drivers(10).len(), 1);
    assert_eq!(catalog.top_users(10).len(), 1);
    assert!(catalog.top_drivers(0).is_empty());
}

#[test]
fn unknown_username_is_absent() {
    let catalog = porto_catalog(false);
    assert!(catalog.get_user("ghost").is_none());
    assert!(catalog.get_driver(DriverId(404)).is_none());
}

#[test]
fn empty_and_inverted_ranges_are_zero() {
    let catalog = porto_catalog(true);
    let before = DateRange::new(date(1, 1, 2020), date(31, 12, 2020));
    let inverted = DateRange::new(date(5, 1, 2023), date(3, 1, 2023));

    for range in [before, inverted] {
        assert_eq!(catalog.average_price_in_date_range(range), 0.0);
        assert_eq!(catalog.average_distance_in_city_by_date("Porto", range), 0.0);
        assert!(catalog.tipped_rides_in_date_range(range).is_empty());
    }
    assert_eq!(catalog.average_price_in_city("Lisboa"), 0.0);
    assert_eq!(catalog.average_distance_in_city_by_date("Lisboa", before), 0.0);
}

#[test]
fn repeated_queries_are_identical() {
    let catalog = porto_catalog(false);
    let range = DateRange::new(date(2, 1, 2023), date(9, 1, 2023));

    let first = (
        catalog.average_price_in_city("Porto"),
        catalog.average_distance_in_city_by_date("Porto", range),
        catalog.top_drivers_in_city(3, "Porto"),
        catalog.rides_in_city("Porto").iter().map(|ride| ride.id).collect::<Vec<_>>(),
    );
    for _ in 0..3 {
        let again = (
            catalog.average_price_in_city("Porto"),
            catalog.average_distance_in_city_by_date("Porto", range),
            catalog.top_drivers_in_city(3, "Porto"),
            catalog.rides_in_city("Porto").iter().map(|ride| ride.id).collect::<Vec<_>>(),
        );
        assert_eq!(first, again);
    }
    assert_eq!(first.0, 55.0);
}

#[test]
fn city_rides_come_back_in_date_order() {
    let catalog = porto_catalog(false);
    let dates: Vec<NaiveDate> = catalog.rides_in_city("Porto").iter().map(|ride| ride.date).collect();
    assert_eq!(dates.len(), 10);
    assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn duplicate_registration_is_rejected_without_overwriting() {
    let mut builder = CatalogBuilder::new(&Config::default());
    builder.register_user(user("ana")).unwrap();

    let mut impostor = user("ana");
    impostor.name = "Somebody Else".into();
    let err = builder.register_user(impostor).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyExists);
    assert_eq!(builder.get_user("ana").unwrap().name, "ANA");

    builder.register_driver(driver(3, "Braga")).unwrap();
    assert_eq!(builder.register_driver(driver(3, "Faro")).unwrap_err().kind, ErrorKind::AlreadyExists);
    assert_eq!(builder.get_driver(DriverId(3)).unwrap().city, "Braga");
    assert_eq!(builder.user_count(), 1);
    assert_eq!(builder.driver_count(), 1);
}

#[test]
fn rides_with_unknown_references_are_refused() {
    let mut builder = CatalogBuilder::new(&Config::default());
    builder.register_user(user("ana")).unwrap();
    builder.register_driver(driver(1, "Braga")).unwrap();

    let ghost_user = Ride::new(RideId(1), date(1, 1, 2022), DriverId(1), "ghost", "Braga", 3, 5, 5, 0.0);
    let ghost_driver = Ride::new(RideId(2), date(1, 1, 2022), DriverId(9), "ana", "Braga", 3, 5, 5, 0.0);
    assert_eq!(builder.register_ride(ghost_user).unwrap_err().kind, ErrorKind::NotFound);
    assert_eq!(builder.register_ride(ghost_driver).unwrap_err().kind, ErrorKind::NotFound);

    let ok = Ride::new(RideId(3), date(1, 1, 2022), DriverId(1), "ana", "Braga", 3, 5, 5, 0.0);
    builder.register_ride(ok.clone()).unwrap();
    assert_eq!(builder.register_ride(ok).unwrap_err().kind, ErrorKind::AlreadyExists);

    let catalog = builder.finalize();
    assert_eq!(catalog.stats().rides, 1);
    assert_eq!(catalog.get_user("ana").unwrap().totals.ride_count, 1);
}

#[test]
fn standard_fares_price_each_ride_once() {
    let mut builder = CatalogBuilder::new(&Config::default());
    builder.register_user(user("ana")).unwrap();
    builder.register_driver(driver(1, "Braga")).unwrap();
    builder.register_ride(Ride::new(RideId(1), date(1, 1, 2022), DriverId(1), "ana", "Braga", 10, 5, 5, 2.0))
        .unwrap();
    let catalog = builder.finalize();

    let ride = &catalog.rides()[0];
    assert!((ride.price() - 9.45).abs() < 1e-9);
    assert!((ride.total_cost() - 11.45).abs() < 1e-9);
    assert!((catalog.get_user("ana").unwrap().total_spent() - 11.45).abs() < 1e-9);
    assert!((catalog.get_driver(DriverId(1)).unwrap().total_earned() - 11.45).abs() < 1e-9);
}

#[test]
fn tied_drivers_rank_higher_id_first() {
    let mut builder = CatalogBuilder::with_pricer(&Config::default(), DistanceFare);
    builder.register_user(user("ana")).unwrap();
    for id in [4, 9, 6] {
        builder.register_driver(driver(id, "Braga")).unwrap();
        builder.register_ride(Ride::new(RideId(id), date(1, 1, 2022), DriverId(id), "ana", "Braga", 1, 5, 3, 0.0))
            .unwrap();
    }
    let catalog = builder.finalize();

    let global: Vec<DriverId> = catalog.top_drivers(3).iter().map(|d| d.id).collect();
    let city: Vec<DriverId> = catalog.top_drivers_in_city(3, "Braga").iter().map(|s| s.driver).collect();
    assert_eq!(global, vec![DriverId(9), DriverId(6), DriverId(4)]);
    assert_eq!(city, global);
}
