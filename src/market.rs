//! Market analysis tables: prices by brand, option impact and checkout delays.

use crate::dataset::{Column, DelayRecord, Frame};
use crate::error::{PricingError, Result};
use crate::schema::OPTION_FEATURES;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DELAY_BIN_WIDTH: i64 = 10;
pub const DELAY_RANGE: (i64, i64) = (-200, 200);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelPrice {
    pub model_key: String,
    pub mean_price: f64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptionImpact {
    pub option: String,
    /// `None` when no listing has the option.
    pub mean_with: Option<f64>,
    /// `None` when every listing has the option.
    pub mean_without: Option<f64>,
}

/// Listings whose delay falls in `[start, end)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DelayBin {
    pub start: i64,
    pub end: i64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckinDelay {
    pub checkin_type: String,
    pub mean_delay: f64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketReport {
    pub by_model: Vec<ModelPrice>,
    pub options: Vec<OptionImpact>,
    pub delay_histogram: Option<Vec<DelayBin>>,
    pub delay_by_checkin: Option<Vec<CheckinDelay>>,
}

#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn check_len(frame: &Frame, prices: &[f64]) -> Result<()> {
    if frame.n_rows() != prices.len() {
        return Err(PricingError::Data(format!(
            "{} prices for {} rows",
            prices.len(),
            frame.n_rows()
        )));
    }
    Ok(())
}

/// Mean daily price per brand, sorted by brand label. Rows without a brand
/// are skipped.
pub fn mean_price_by_model(frame: &Frame, prices: &[f64]) -> Result<Vec<ModelPrice>> {
    check_len(frame, prices)?;
    let keys = match frame.column("model_key") {
        Some(Column::Categorical(values)) => values,
        Some(_) => return Err(PricingError::Schema("model_key must be categorical".into())),
        None => return Err(PricingError::Schema("missing column 'model_key'".into())),
    };

    let mut groups: BTreeMap<&str, Mean> = BTreeMap::new();
    for (key, &price) in keys.iter().zip(prices) {
        if let Some(key) = key {
            groups.entry(key.as_str()).or_default().push(price);
        }
    }

    Ok(groups
        .into_iter()
        .filter_map(|(key, mean)| {
            mean.value().map(|mean_price| ModelPrice {
                model_key: key.to_string(),
                mean_price,
                count: mean.count,
            })
        })
        .collect())
}

/// Mean price with and without each equipment option.
pub fn option_impact(frame: &Frame, prices: &[f64]) -> Result<Vec<OptionImpact>> {
    check_len(frame, prices)?;
    OPTION_FEATURES
        .iter()
        .map(|&option| {
            let flags = match frame.column(option) {
                Some(Column::Numeric(values)) => values,
                Some(_) => {
                    return Err(PricingError::Schema(format!("{} must be numeric", option)))
                }
                None => return Err(PricingError::Schema(format!("missing column '{}'", option))),
            };
            let (mut with, mut without) = (Mean::default(), Mean::default());
            for (flag, &price) in flags.iter().zip(prices) {
                match flag {
                    Some(f) if *f != 0.0 => with.push(price),
                    Some(_) => without.push(price),
                    None => {}
                }
            }
            Ok(OptionImpact {
                option: option.to_string(),
                mean_with: with.value(),
                mean_without: without.value(),
            })
        })
        .collect()
}

/// Counts of checkout delays in 10-minute bins over [-200, 200).
/// Missing delays and delays outside the range are not counted.
pub fn delay_histogram(delays: &[DelayRecord]) -> Vec<DelayBin> {
    let (low, high) = DELAY_RANGE;
    let n_bins = ((high - low) / DELAY_BIN_WIDTH) as usize;
    let mut counts = vec![0usize; n_bins];

    for delay in delays.iter().filter_map(|d| d.delay_minutes) {
        if delay >= low as f64 && delay < high as f64 {
            let bin = ((delay - low as f64) / DELAY_BIN_WIDTH as f64).floor() as usize;
            if let Some(count) = counts.get_mut(bin) {
                *count += 1;
            }
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = low + i as i64 * DELAY_BIN_WIDTH;
            DelayBin {
                start,
                end: start + DELAY_BIN_WIDTH,
                count,
            }
        })
        .collect()
}

/// Mean delay and number of rentals with a known delay, per check-in type.
pub fn delay_by_checkin(delays: &[DelayRecord]) -> Vec<CheckinDelay> {
    let mut groups: BTreeMap<&str, Mean> = BTreeMap::new();
    for record in delays {
        if let Some(delay) = record.delay_minutes {
            groups
                .entry(record.checkin_type.as_str())
                .or_default()
                .push(delay);
        }
    }
    groups
        .into_iter()
        .filter_map(|(checkin_type, mean)| {
            mean.value().map(|mean_delay| CheckinDelay {
                checkin_type: checkin_type.to_string(),
                mean_delay,
                count: mean.count,
            })
        })
        .collect()
}

/// All tables; the delay tables only when a delay export is given.
pub fn analyze(
    frame: &Frame,
    prices: &[f64],
    delays: Option<&[DelayRecord]>,
) -> Result<MarketReport> {
    Ok(MarketReport {
        by_model: mean_price_by_model(frame, prices)?,
        options: option_impact(frame, prices)?,
        delay_histogram: delays.map(delay_histogram),
        delay_by_checkin: delays.map(delay_by_checkin),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::bmw_suv;
    use crate::schema::ModelKey;

    fn fleet() -> (Frame, Vec<f64>) {
        let mut a = bmw_suv();
        let mut b = bmw_suv();
        let mut c = bmw_suv();
        a.options.has_gps = true;
        b.options.has_gps = true;
        c.model_key = ModelKey::Audi;
        (Frame::from_records(&[a, b, c]), vec![100.0, 120.0, 80.0])
    }

    fn delay(checkin_type: &str, minutes: Option<f64>) -> DelayRecord {
        DelayRecord {
            checkin_type: checkin_type.into(),
            delay_minutes: minutes,
        }
    }

    #[test]
    fn test_mean_price_by_model_sorted() {
        let (frame, prices) = fleet();
        let rows = mean_price_by_model(&frame, &prices).unwrap();
        assert_eq!(
            rows,
            vec![
                ModelPrice {
                    model_key: "Audi".into(),
                    mean_price: 80.0,
                    count: 1
                },
                ModelPrice {
                    model_key: "BMW".into(),
                    mean_price: 110.0,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_option_impact() {
        let (frame, prices) = fleet();
        let rows = option_impact(&frame, &prices).unwrap();
        assert_eq!(rows.len(), 6);
        let gps = rows.iter().find(|r| r.option == "has_gps").unwrap();
        assert_eq!(gps.mean_with, Some(110.0));
        assert_eq!(gps.mean_without, Some(80.0));
        let winter = rows.iter().find(|r| r.option == "winter_tires").unwrap();
        assert_eq!(winter.mean_with, None);
        assert_eq!(winter.mean_without, Some(100.0));
    }

    #[test]
    fn test_length_mismatch() {
        let (frame, prices) = fleet();
        assert!(mean_price_by_model(&frame, &prices[..2]).is_err());
    }

    #[test]
    fn test_delay_histogram_bins() {
        let delays = vec![
            delay("mobile", Some(-200.0)),
            delay("mobile", Some(-0.5)),
            delay("mobile", Some(0.0)),
            delay("mobile", Some(9.9)),
            delay("connect", Some(199.0)),
            delay("connect", Some(200.0)),
            delay("connect", None),
        ];
        let bins = delay_histogram(&delays);
        assert_eq!(bins.len(), 40);
        assert_eq!((bins[0].start, bins[0].end, bins[0].count), (-200, -190, 1));
        assert_eq!(bins[19].count, 1);
        assert_eq!((bins[20].start, bins[20].count), (0, 2));
        assert_eq!(bins[39].count, 1);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
    }

    #[test]
    fn test_delay_by_checkin() {
        let delays = vec![
            delay("mobile", Some(10.0)),
            delay("mobile", Some(30.0)),
            delay("connect", Some(-5.0)),
            delay("connect", None),
        ];
        let rows = delay_by_checkin(&delays);
        assert_eq!(rows[0].checkin_type, "connect");
        assert_eq!((rows[0].mean_delay, rows[0].count), (-5.0, 1));
        assert_eq!((rows[1].mean_delay, rows[1].count), (20.0, 2));
    }
}
