//! Seeded synthetic listings for demos, benchmarks and tests.
//!
//! Prices follow a fixed linear rule (brand tier, car type, engine power,
//! mileage and options) plus bounded uniform noise, so a linear regressor
//! fitted on them has a known shape to recover.

use crate::schema::{CarOptions, CarRecord, CarType, Fuel, ModelKey, PaintColor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn brand_premium(key: ModelKey) -> f64 {
    match key {
        ModelKey::Ferrari | ModelKey::Lamborghini | ModelKey::Maserati | ModelKey::Porsche => 60.0,
        ModelKey::Audi | ModelKey::Bmw | ModelKey::Mercedes | ModelKey::Lexus => 25.0,
        ModelKey::AlfaRomeo | ModelKey::Mini | ModelKey::Volkswagen => 10.0,
        _ => 0.0,
    }
}

fn type_premium(car_type: CarType) -> f64 {
    match car_type {
        CarType::Convertible | CarType::Coupe => 20.0,
        CarType::Suv | CarType::Van => 15.0,
        CarType::Estate | CarType::Sedan => 5.0,
        CarType::Hatchback | CarType::Subcompact => 0.0,
    }
}

/// Price of a listing under the synthetic rule, before noise.
pub fn reference_price(record: &CarRecord) -> f64 {
    let options = record.options.as_array().iter().filter(|&&f| f).count() as f64;
    40.0 + brand_premium(record.model_key)
        + type_premium(record.car_type)
        + 0.25 * record.engine_power as f64
        - 0.0001 * record.mileage as f64
        + 4.0 * options
}

fn random_record(rng: &mut StdRng) -> CarRecord {
    let mut flag = |p: f64| rng.gen_bool(p);
    let options = CarOptions {
        private_parking_available: flag(0.5),
        has_gps: flag(0.7),
        has_air_conditioning: flag(0.2),
        automatic_car: flag(0.2),
        has_getaround_connect: flag(0.5),
        has_speed_regulator: flag(0.4),
        winter_tires: flag(0.9),
    };

    CarRecord {
        model_key: *ModelKey::ALL.choose(rng).unwrap_or(&ModelKey::Renault),
        mileage: rng.gen_range(0..=300_000),
        engine_power: rng.gen_range(60..=300),
        fuel: *Fuel::ALL.choose(rng).unwrap_or(&Fuel::Diesel),
        paint_color: *PaintColor::ALL.choose(rng).unwrap_or(&PaintColor::Black),
        car_type: *CarType::ALL.choose(rng).unwrap_or(&CarType::Estate),
        options,
    }
}

/// `n` listings and their prices; the same seed gives the same rows.
/// Prices are floored at 10 so every target is positive.
pub fn listings(n: usize, seed: u64) -> (Vec<CarRecord>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(n);
    let mut prices = Vec::with_capacity(n);

    for _ in 0..n {
        let record = random_record(&mut rng);
        let noise: f64 = rng.gen_range(-3.0..3.0);
        prices.push((reference_price(&record) + noise).max(10.0));
        records.push(record);
    }

    (records, prices)
}
