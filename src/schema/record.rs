//! Typed listing record and its closed categorical domains.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Declares a closed categorical domain: the enum, its wire labels, `ALL`,
/// `Display` and a `FromStr` that reports the owning field on failure.
macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const FIELD: &'static str = $field;

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(ValidationError::UnknownCategory {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

closed_set! {
    /// Car brand.
    ModelKey, field = "model_key" {
        Citroen => "Citroën",
        Peugeot => "Peugeot",
        Pgo => "PGO",
        Renault => "Renault",
        Audi => "Audi",
        Bmw => "BMW",
        Ford => "Ford",
        Mercedes => "Mercedes",
        Opel => "Opel",
        Porsche => "Porsche",
        Volkswagen => "Volkswagen",
        KiaMotors => "KIA Motors",
        AlfaRomeo => "Alfa Romeo",
        Ferrari => "Ferrari",
        Fiat => "Fiat",
        Lamborghini => "Lamborghini",
        Maserati => "Maserati",
        Lexus => "Lexus",
        Honda => "Honda",
        Mazda => "Mazda",
        Mini => "Mini",
        Mitsubishi => "Mitsubishi",
        Nissan => "Nissan",
        Seat => "SEAT",
        Subaru => "Subaru",
        Suzuki => "Suzuki",
        Toyota => "Toyota",
        Yamaha => "Yamaha",
    }
}

closed_set! {
    Fuel, field = "fuel" {
        Diesel => "diesel",
        Petrol => "petrol",
        HybridPetrol => "hybrid_petrol",
        Electro => "electro",
    }
}

closed_set! {
    PaintColor, field = "paint_color" {
        Black => "black",
        Grey => "grey",
        White => "white",
        Red => "red",
        Silver => "silver",
        Blue => "blue",
        Orange => "orange",
        Beige => "beige",
        Brown => "brown",
        Green => "green",
    }
}

closed_set! {
    CarType, field = "car_type" {
        Convertible => "convertible",
        Coupe => "coupe",
        Estate => "estate",
        Hatchback => "hatchback",
        Sedan => "sedan",
        Subcompact => "subcompact",
        Suv => "suv",
        Van => "van",
    }
}

pub const MILEAGE_RANGE: (i64, i64) = (0, 300_000);
pub const ENGINE_POWER_RANGE: (i64, i64) = (0, 300);

/// Equipment flags of a listing, in feature order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarOptions {
    pub private_parking_available: bool,
    pub has_gps: bool,
    pub has_air_conditioning: bool,
    pub automatic_car: bool,
    pub has_getaround_connect: bool,
    pub has_speed_regulator: bool,
    pub winter_tires: bool,
}

impl CarOptions {
    pub fn as_array(&self) -> [bool; 7] {
        [
            self.private_parking_available,
            self.has_gps,
            self.has_air_conditioning,
            self.automatic_car,
            self.has_getaround_connect,
            self.has_speed_regulator,
            self.winter_tires,
        ]
    }
}

/// One vehicle listing with typed, closed-set fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub model_key: ModelKey,
    pub mileage: i64,
    pub engine_power: i64,
    pub fuel: Fuel,
    pub paint_color: PaintColor,
    pub car_type: CarType,
    #[serde(flatten)]
    pub options: CarOptions,
}

fn check_range(
    field: &'static str,
    value: i64,
    (min, max): (i64, i64),
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl CarRecord {
    /// Range checks for the integer fields; enums are valid by construction.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("mileage", self.mileage, MILEAGE_RANGE)?;
        check_range("engine_power", self.engine_power, ENGINE_POWER_RANGE)
    }

    /// Values of the numeric branch: mileage, engine_power, then the flags as 0/1.
    pub fn numeric_values(&self) -> [f64; 9] {
        let flags = self.options.as_array();
        let mut values = [0.0; 9];
        values[0] = self.mileage as f64;
        values[1] = self.engine_power as f64;
        for (slot, flag) in values[2..].iter_mut().zip(flags) {
            *slot = if flag { 1.0 } else { 0.0 };
        }
        values
    }

    /// Labels of the categorical branch: model_key, fuel, paint_color, car_type.
    pub fn categorical_values(&self) -> [&'static str; 4] {
        [
            self.model_key.as_str(),
            self.fuel.as_str(),
            self.paint_color.as_str(),
            self.car_type.as_str(),
        ]
    }
}
