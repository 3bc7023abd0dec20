//! CSV readers for the listings and checkout-delay exports.

use crate::dataset::{Column, Frame};
use crate::error::{PricingError, Result};
use crate::schema::{NUMERIC_FEATURES, TARGET_COLUMN};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// One rental from the delay export.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DelayRecord {
    pub checkin_type: String,
    /// Minutes late at checkout; negative when early, `None` when unknown.
    pub delay_minutes: Option<f64>,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        PricingError::Io(io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

/// Index columns written by dataframe exports carry an empty or `Unnamed: N` header.
fn is_index_column(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || name.starts_with("Unnamed")
}

fn parse_number(cell: &str, row: usize, column: &str) -> Result<Option<f64>> {
    let value = match cell.trim() {
        "" => return Ok(None),
        "True" | "true" => 1.0,
        "False" | "false" => 0.0,
        other => other.parse::<f64>().map_err(|_| {
            PricingError::Data(format!(
                "row {}: column '{}' has non-numeric value '{}'",
                row, column, other
            ))
        })?,
    };
    if value.is_nan() {
        return Ok(None);
    }
    if !value.is_finite() {
        return Err(PricingError::Data(format!(
            "row {}: column '{}' is not finite",
            row, column
        )));
    }
    Ok(Some(value))
}

enum Sink {
    Skip,
    Target,
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

/// Read a listings CSV into a feature frame and the target prices.
///
/// The index column is dropped, `rental_price_per_day` becomes the target,
/// known numeric and flag columns are parsed as numbers, and every other
/// column is kept as categorical text. Empty cells are missing values.
pub fn read_listings<R: Read>(reader: R) -> Result<(Frame, Vec<f64>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = rdr.headers().map_err(PricingError::data)?.clone();

    if !headers.iter().any(|h| h.trim() == TARGET_COLUMN) {
        return Err(PricingError::Schema(format!(
            "missing target column '{}'",
            TARGET_COLUMN
        )));
    }

    let mut sinks: Vec<Sink> = headers
        .iter()
        .map(|h| {
            let h = h.trim();
            if h == TARGET_COLUMN {
                Sink::Target
            } else if is_index_column(h) {
                Sink::Skip
            } else if NUMERIC_FEATURES.contains(&h) {
                Sink::Numeric(Vec::new())
            } else {
                Sink::Categorical(Vec::new())
            }
        })
        .collect();
    let mut prices = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(PricingError::data)?;
        for ((cell, sink), name) in record.iter().zip(sinks.iter_mut()).zip(headers.iter()) {
            match sink {
                Sink::Skip => {}
                Sink::Target => {
                    let price = parse_number(cell, row, name)?.ok_or_else(|| {
                        PricingError::Data(format!("row {}: missing {}", row, TARGET_COLUMN))
                    })?;
                    prices.push(price);
                }
                Sink::Numeric(values) => values.push(parse_number(cell, row, name)?),
                Sink::Categorical(values) => {
                    let cell = cell.trim();
                    values.push((!cell.is_empty()).then(|| cell.to_string()));
                }
            }
        }
    }

    let mut frame = Frame::new();
    for (sink, name) in sinks.into_iter().zip(headers.iter()) {
        let column = match sink {
            Sink::Skip | Sink::Target => continue,
            Sink::Numeric(values) => Column::Numeric(values),
            Sink::Categorical(values) => Column::Categorical(values),
        };
        frame
            .push_column(name.trim(), column)
            .map_err(|e| PricingError::Schema(e.to_string()))?;
    }

    tracing::debug!(
        rows = frame.n_rows(),
        columns = frame.n_columns(),
        "listings parsed"
    );
    Ok((frame, prices))
}

pub fn load_listings(path: impl AsRef<Path>) -> Result<(Frame, Vec<f64>)> {
    let path = path.as_ref();
    let (frame, prices) = read_listings(open(path)?)?;
    tracing::info!(path = %path.display(), rows = frame.n_rows(), "loaded listings");
    Ok((frame, prices))
}

/// Read the checkout-delay CSV; only `checkin_type` and
/// `delay_at_checkout_in_minutes` are used.
pub fn read_delays<R: Read>(reader: R) -> Result<Vec<DelayRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = rdr.headers().map_err(PricingError::data)?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| PricingError::Schema(format!("missing column '{}'", name)))
    };
    let type_idx = position("checkin_type")?;
    let delay_idx = position("delay_at_checkout_in_minutes")?;

    let mut delays = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(PricingError::data)?;
        let checkin_type = record.get(type_idx).unwrap_or_default().trim().to_string();
        let delay_minutes = parse_number(
            record.get(delay_idx).unwrap_or_default(),
            row,
            "delay_at_checkout_in_minutes",
        )?;
        delays.push(DelayRecord {
            checkin_type,
            delay_minutes,
        });
    }
    Ok(delays)
}

pub fn load_delays(path: impl AsRef<Path>) -> Result<Vec<DelayRecord>> {
    let path = path.as_ref();
    let delays = read_delays(open(path)?)?;
    tracing::info!(path = %path.display(), rows = delays.len(), "loaded delays");
    Ok(delays)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTINGS: &str = "\
,model_key,mileage,engine_power,fuel,paint_color,car_type,private_parking_available,has_gps,has_air_conditioning,automatic_car,has_getaround_connect,has_speed_regulator,winter_tires,rental_price_per_day
0,Citroën,140411,100,diesel,black,convertible,True,True,False,False,True,True,True,106
1,Citroën,13929,317,petrol,grey,convertible,True,True,False,False,False,True,True,264
2,Audi,,120,,black,estate,false,1,0,true,false,False,False,101
";

    #[test]
    fn test_read_listings() {
        let (frame, prices) = read_listings(LISTINGS.as_bytes()).unwrap();
        assert_eq!(prices, vec![106.0, 264.0, 101.0]);
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.n_columns(), 13);
        assert!(frame.column("rental_price_per_day").is_none());
        assert!(frame.column("").is_none());

        assert_eq!(
            frame.column("mileage"),
            Some(&Column::Numeric(vec![Some(140411.0), Some(13929.0), None]))
        );
        assert_eq!(
            frame.column("has_gps"),
            Some(&Column::Numeric(vec![Some(1.0), Some(1.0), Some(1.0)]))
        );
        assert_eq!(
            frame.column("fuel"),
            Some(&Column::Categorical(vec![
                Some("diesel".into()),
                Some("petrol".into()),
                None
            ]))
        );
        assert!(crate::schema::validate_frame(&frame).is_ok());
    }

    #[test]
    fn test_missing_target_is_schema_error() {
        let csv = "model_key,mileage\nBMW,10\n";
        assert!(matches!(
            read_listings(csv.as_bytes()),
            Err(PricingError::Schema(_))
        ));
    }

    #[test]
    fn test_bad_number_is_data_error() {
        let csv = "mileage,rental_price_per_day\nlots,10\n";
        let err = read_listings(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PricingError::Data(_)));
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_read_delays() {
        let csv = "\
rental_id,car_id,checkin_type,state,delay_at_checkout_in_minutes
1,10,mobile,ended,-81
2,11,connect,canceled,
3,12,mobile,ended,1012
";
        let delays = read_delays(csv.as_bytes()).unwrap();
        assert_eq!(delays.len(), 3);
        assert_eq!(delays[0].delay_minutes, Some(-81.0));
        assert_eq!(delays[1].checkin_type, "connect");
        assert_eq!(delays[1].delay_minutes, None);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_listings("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, PricingError::Io(_)));
    }
}
