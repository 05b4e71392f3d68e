use crate::core::types::CarClass;

/// Price calculator trait
pub trait PriceCalculator: Send + Sync {
    fn price(&self, distance: u32, car_class: CarClass) -> f64;

    fn name(&self) -> &str;
}

/// Base fare plus a per-kilometre rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareRate {
    pub base: f64,
    pub per_km: f64,
}

impl FareRate {
    pub fn apply(&self, distance: u32) -> f64 {
        self.base + self.per_km * distance as f64
    }
}

/// Fare table with one rate per car class
#[derive(Debug, Clone)]
pub struct StandardFares {
    pub basic: FareRate,
    pub green: FareRate,
    pub premium: FareRate,
}

impl Default for StandardFares {
    fn default() -> Self {
        StandardFares {
            basic: FareRate { base: 3.25, per_km: 0.62 },
            green: FareRate { base: 4.00, per_km: 0.79 },
            premium: FareRate { base: 5.20, per_km: 0.94 },
        }
    }
}

impl PriceCalculator for StandardFares {
    fn price(&self, distance: u32, car_class: CarClass) -> f64 {
        let rate = match car_class {
            CarClass::Basic => &self.basic,
            CarClass::Green => &self.green,
            CarClass::Premium => &self.premium,
        };
        rate.apply(distance)
    }

    fn name(&self) -> &str {
        "standard"
    }
}

/// Same fare for every ride, regardless of distance or class
#[derive(Debug, Clone, Copy)]
pub struct FlatFare(pub f64);

impl PriceCalculator for FlatFare {
    fn price(&self, _distance: u32, _car_class: CarClass) -> f64 {
        self.0
    }

    fn name(&self) -> &str {
        "flat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_fares_per_class() {
        let fares = StandardFares::default();
        assert!((fares.price(10, CarClass::Basic) - 9.45).abs() < 1e-9);
        assert!((fares.price(10, CarClass::Green) - 11.90).abs() < 1e-9);
        assert!((fares.price(10, CarClass::Premium) - 14.60).abs() < 1e-9);
    }

    #[test]
    fn zero_distance_charges_base() {
        let fares = StandardFares::default();
        assert_eq!(fares.price(0, CarClass::Green), 4.00);
    }
}
