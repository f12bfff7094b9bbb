//! Trend forecasting
//!
//! Fits a low-degree least-squares polynomial to a numeric [`Series`] and
//! projects it forward:
//!
//! - fewer than [`MIN_OBSERVATIONS`] present values give an explicitly empty
//!   result, which callers report as "not enough data"
//! - a line is fitted below [`QUADRATIC_MIN_OBSERVATIONS`] values, a
//!   parabola from there on
//! - the optional band is `point ± 1.96σ` where σ is the sample standard
//!   deviation of the fit residuals. It is a normal approximation, not a
//!   prediction interval.
//!
//! # Example
//!
//! ```rust
//! use insightrs::forecast::forecast;
//! use insightrs::series::Series;
//!
//! let series = Series::from_values(vec![10.0, 12.0, 14.0, 16.0, 18.0, 20.0], None);
//! let result = forecast(&series, 3).unwrap();
//! let values = result.values();
//! assert!((values[0] - 22.0).abs() < 1e-9);
//! assert!((values[2] - 26.0).abs() < 1e-9);
//! ```

mod polyfit;

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::series::Series;
use crate::temporal::dominant_spacing;

pub use self::polyfit::TrendModel;

/// Minimum number of present observations needed to forecast
pub const MIN_OBSERVATIONS: usize = 3;

/// Observation count from which a quadratic trend is fitted
pub const QUADRATIC_MIN_OBSERVATIONS: usize = 6;

/// z-score of the approximate 95% band
pub const CONFIDENCE_Z: f64 = 1.96;

/// Forecasting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastOptions {
    /// Emit lower and upper bounds around each point
    pub confidence_band: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        ForecastOptions {
            confidence_band: true,
        }
    }
}

/// Position of a forecast point
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub enum ForecastIndex {
    /// Continuation of the integer sequence of the input
    Position(usize),
    /// Synthesized future timestamp
    Timestamp(NaiveDateTime),
}

/// One projected value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub index: ForecastIndex,
    pub value: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Outcome of a forecast request
///
/// Either exactly `horizon` points or, when there was not enough data,
/// no points at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    model: Option<TrendModel>,
    observations: usize,
}

impl ForecastResult {
    fn insufficient(observations: usize) -> Self {
        ForecastResult {
            points: Vec::new(),
            model: None,
            observations,
        }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the input had too few observations to forecast
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fitted trend, None for an empty result
    pub fn model(&self) -> Option<&TrendModel> {
        self.model.as_ref()
    }

    /// Number of present observations the fit was based on
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Point forecasts in order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Polynomial trend forecaster
#[derive(Debug, Clone, Default)]
pub struct TrendForecaster {
    options: ForecastOptions,
}

impl TrendForecaster {
    pub fn new(options: ForecastOptions) -> Self {
        TrendForecaster { options }
    }

    pub fn options(&self) -> &ForecastOptions {
        &self.options
    }

    /// Forecasts `horizon` steps past the end of `series`.
    pub fn forecast(&self, series: &Series, horizon: usize) -> Result<ForecastResult> {
        self.forecast_with_index(series.values(), series.timestamps(), horizon)
    }

    /// Forecasts from parallel value and optional timestamp slices.
    ///
    /// Fails with [`Error::Data`] if the slices differ in length and with
    /// [`Error::InvalidInput`] for a zero horizon or for future timestamps
    /// past the end of the calendar.
    pub fn forecast_with_index(
        &self,
        values: &[Option<f64>],
        timestamps: Option<&[NaiveDateTime]>,
        horizon: usize,
    ) -> Result<ForecastResult> {
        if let Some(ts) = timestamps {
            if ts.len() != values.len() {
                return Err(Error::Data(format!(
                    "value length ({}) and index length ({}) differ",
                    values.len(),
                    ts.len()
                )));
            }
        }
        if horizon == 0 {
            return Err(Error::InvalidInput("forecast horizon must be at least 1".into()));
        }

        let present: Vec<(usize, f64)> = values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.filter(|x| !x.is_nan()).map(|x| (i, x)))
            .collect();
        let n = present.len();
        if n < MIN_OBSERVATIONS {
            debug!("forecast: only {} observation(s), returning empty result", n);
            return Ok(ForecastResult::insufficient(n));
        }

        let degree = if n < QUADRATIC_MIN_OBSERVATIONS { 1 } else { 2 };

        let (xs, ys, future): (Vec<f64>, Vec<f64>, Vec<(f64, ForecastIndex)>) = match timestamps {
            None => {
                let xs = (0..n).map(|i| i as f64).collect();
                let ys = present.iter().map(|(_, v)| *v).collect();
                let future = (n..n + horizon)
                    .map(|p| (p as f64, ForecastIndex::Position(p)))
                    .collect();
                (xs, ys, future)
            }
            Some(ts) => {
                let mut pairs: Vec<(NaiveDateTime, f64)> =
                    present.iter().map(|(i, v)| (ts[*i], *v)).collect();
                pairs.sort_by(|a, b| a.0.cmp(&b.0));
                let stamps: Vec<NaiveDateTime> = pairs.iter().map(|(t, _)| *t).collect();

                let step = dominant_spacing(&stamps);
                let step_secs = step.num_seconds() as f64;
                let origin = stamps[0];
                let xs: Vec<f64> = stamps
                    .iter()
                    .map(|t| (*t - origin).num_seconds() as f64 / step_secs)
                    .collect();
                let ys = pairs.iter().map(|(_, v)| *v).collect();

                let last_x = xs[n - 1];
                let last = stamps[n - 1];
                let future = (1..=horizon)
                    .map(|k| -> Result<(f64, ForecastIndex)> {
                        let stamp = i32::try_from(k)
                            .ok()
                            .and_then(|steps| step.checked_mul(steps))
                            .and_then(|delta| last.checked_add_signed(delta))
                            .ok_or_else(|| {
                                Error::InvalidInput(format!(
                                    "forecast step {} falls outside the representable date range",
                                    k
                                ))
                            })?;
                        Ok((last_x + k as f64, ForecastIndex::Timestamp(stamp)))
                    })
                    .collect::<Result<Vec<_>>>()?;
                debug!("forecast: inferred spacing of {}s", step.num_seconds());
                (xs, ys, future)
            }
        };

        let model = polyfit::fit(&xs, &ys, degree)?;
        let sigma = model.residual_std();
        debug!(
            "forecast: degree {} fit on {} observations, residual sigma {}",
            model.degree(),
            n,
            sigma
        );

        let points = future
            .into_iter()
            .map(|(x, index)| {
                let value = model.evaluate(x);
                let (lower, upper) = if self.options.confidence_band {
                    (
                        Some(value - CONFIDENCE_Z * sigma),
                        Some(value + CONFIDENCE_Z * sigma),
                    )
                } else {
                    (None, None)
                };
                ForecastPoint {
                    index,
                    value,
                    lower,
                    upper,
                }
            })
            .collect();

        Ok(ForecastResult {
            points,
            model: Some(model),
            observations: n,
        })
    }
}

/// Forecasts `horizon` steps with default options.
pub fn forecast(series: &Series, horizon: usize) -> Result<ForecastResult> {
    TrendForecaster::default().forecast(series, horizon)
}
