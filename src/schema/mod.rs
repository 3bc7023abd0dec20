//! Listing schema: column names, typed records and request validation.
//!
//! The column lists here fix the feature layout. The numeric branch sees
//! [`NUMERIC_FEATURES`] in order, the categorical branch
//! [`CATEGORICAL_FEATURES`] in order, and nothing else may reach the pipeline.

pub mod record;
pub mod request;

pub use record::{
    CarOptions, CarRecord, CarType, Fuel, ModelKey, PaintColor, ENGINE_POWER_RANGE, MILEAGE_RANGE,
};
pub use request::CarFeatures;

use crate::dataset::{ColumnKind, Frame};
use crate::error::{PricingError, Result};

/// Target column of the listings dataset.
pub const TARGET_COLUMN: &str = "rental_price_per_day";

/// Equipment flags, in feature order.
pub const FLAG_FEATURES: [&str; 7] = [
    "private_parking_available",
    "has_gps",
    "has_air_conditioning",
    "automatic_car",
    "has_getaround_connect",
    "has_speed_regulator",
    "winter_tires",
];

pub const NUMERIC_FEATURES: [&str; 9] = [
    "mileage",
    "engine_power",
    "private_parking_available",
    "has_gps",
    "has_air_conditioning",
    "automatic_car",
    "has_getaround_connect",
    "has_speed_regulator",
    "winter_tires",
];

pub const CATEGORICAL_FEATURES: [&str; 4] = ["model_key", "fuel", "paint_color", "car_type"];

/// Options compared in the market analysis.
pub const OPTION_FEATURES: [&str; 6] = [
    "has_gps",
    "has_air_conditioning",
    "automatic_car",
    "has_getaround_connect",
    "has_speed_regulator",
    "winter_tires",
];

/// Expected kind of a feature column, `None` when the name is not a feature.
pub fn feature_kind(name: &str) -> Option<ColumnKind> {
    if NUMERIC_FEATURES.contains(&name) {
        Some(ColumnKind::Numeric)
    } else if CATEGORICAL_FEATURES.contains(&name) {
        Some(ColumnKind::Categorical)
    } else {
        None
    }
}

/// Check that a training frame holds exactly the feature columns, each of the
/// expected kind. All problems are reported in one [`PricingError::Schema`].
pub fn validate_frame(frame: &Frame) -> Result<()> {
    let mut problems = Vec::new();

    let expected = NUMERIC_FEATURES
        .iter()
        .map(|name| (*name, ColumnKind::Numeric))
        .chain(
            CATEGORICAL_FEATURES
                .iter()
                .map(|name| (*name, ColumnKind::Categorical)),
        );
    for (name, kind) in expected {
        match frame.column(name) {
            None => problems.push(format!("missing column '{}'", name)),
            Some(column) if column.kind() != kind => problems.push(format!(
                "column '{}' is {}, expected {}",
                name,
                column.kind(),
                kind
            )),
            Some(_) => {}
        }
    }

    for name in frame.column_names() {
        if feature_kind(name).is_none() {
            problems.push(format!("unexpected column '{}'", name));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(PricingError::Schema(problems.join("; ")))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// The reference BMW listing: diesel black SUV, 50 000 km, 110 hp, no options.
    pub fn bmw_suv() -> CarRecord {
        CarRecord {
            model_key: ModelKey::Bmw,
            mileage: 50_000,
            engine_power: 110,
            fuel: Fuel::Diesel,
            paint_color: PaintColor::Black,
            car_type: CarType::Suv,
            options: CarOptions::default(),
        }
    }

    pub fn bmw_request_json() -> serde_json::Value {
        serde_json::json!({
            "model_key": "BMW",
            "mileage": 50000,
            "engine_power": 110,
            "fuel": "diesel",
            "paint_color": "black",
            "car_type": "suv",
            "private_parking_available": false,
            "has_gps": false,
            "has_air_conditioning": false,
            "automatic_car": false,
            "has_getaround_connect": false,
            "has_speed_regulator": false,
            "winter_tires": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    #[test]
    fn test_records_frame_passes() {
        let frame = Frame::from_records(&[fixtures::bmw_suv()]);
        assert!(validate_frame(&frame).is_ok());
    }

    #[test]
    fn test_missing_and_extra_columns_reported() {
        let mut frame = Frame::from_records(&[fixtures::bmw_suv()]);
        frame.drop_column("fuel");
        frame
            .push_column("colour", Column::Categorical(vec![Some("red".into())]))
            .unwrap();

        let err = validate_frame(&frame).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, PricingError::Schema(_)));
        assert!(msg.contains("missing column 'fuel'"), "{}", msg);
        assert!(msg.contains("unexpected column 'colour'"), "{}", msg);
    }

    #[test]
    fn test_wrong_kind_reported() {
        let mut frame = Frame::from_records(&[fixtures::bmw_suv()]);
        frame.drop_column("mileage");
        frame
            .push_column("mileage", Column::Categorical(vec![Some("lots".into())]))
            .unwrap();
        let msg = validate_frame(&frame).unwrap_err().to_string();
        assert!(msg.contains("'mileage' is categorical"), "{}", msg);
    }
}
