//! Untrusted prediction request and its conversion into a [`CarRecord`].

use crate::error::ValidationError;
use crate::schema::record::{CarOptions, CarRecord};
use serde::{Deserialize, Serialize};

/// A prediction request as it arrives on the wire.
///
/// Categorical fields are kept as raw strings so that an out-of-set value is
/// reported as [`ValidationError::UnknownCategory`] naming the field, rather
/// than as a generic decoding failure. Flags must be JSON booleans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarFeatures {
    pub model_key: String,
    pub mileage: i64,
    pub engine_power: i64,
    pub fuel: String,
    pub paint_color: String,
    pub car_type: String,
    pub private_parking_available: bool,
    pub has_gps: bool,
    pub has_air_conditioning: bool,
    pub automatic_car: bool,
    pub has_getaround_connect: bool,
    pub has_speed_regulator: bool,
    pub winter_tires: bool,
}

impl TryFrom<CarFeatures> for CarRecord {
    type Error = ValidationError;

    fn try_from(features: CarFeatures) -> Result<Self, Self::Error> {
        let record = CarRecord {
            model_key: features.model_key.parse()?,
            mileage: features.mileage,
            engine_power: features.engine_power,
            fuel: features.fuel.parse()?,
            paint_color: features.paint_color.parse()?,
            car_type: features.car_type.parse()?,
            options: CarOptions {
                private_parking_available: features.private_parking_available,
                has_gps: features.has_gps,
                has_air_conditioning: features.has_air_conditioning,
                automatic_car: features.automatic_car,
                has_getaround_connect: features.has_getaround_connect,
                has_speed_regulator: features.has_speed_regulator,
                winter_tires: features.winter_tires,
            },
        };
        record.validate()?;
        Ok(record)
    }
}

impl From<&CarRecord> for CarFeatures {
    fn from(record: &CarRecord) -> Self {
        CarFeatures {
            model_key: record.model_key.to_string(),
            mileage: record.mileage,
            engine_power: record.engine_power,
            fuel: record.fuel.to_string(),
            paint_color: record.paint_color.to_string(),
            car_type: record.car_type.to_string(),
            private_parking_available: record.options.private_parking_available,
            has_gps: record.options.has_gps,
            has_air_conditioning: record.options.has_air_conditioning,
            automatic_car: record.options.automatic_car,
            has_getaround_connect: record.options.has_getaround_connect,
            has_speed_regulator: record.options.has_speed_regulator,
            winter_tires: record.options.winter_tires,
        }
    }
}
