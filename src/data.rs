//! Monthly revenue series handling and historical data assembly

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A calendar month, the unit of all series in this crate
///
/// The fields stay private so every `Period` in circulation has passed the
/// month validation in [`Period::new`], including ones deserialized from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriod> for Period {
    type Error = ForecastError;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        Period::new(raw.year, raw.month)
    }
}

impl Period {
    /// Create a new period, validating the month
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidParameter(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1..=12
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of this month
    pub fn first_day(&self) -> NaiveDate {
        // month is validated at construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated calendar month")
    }

    /// The month immediately before this one
    pub fn prev(&self) -> Period {
        if self.month == 1 {
            Period {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Period {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month immediately after this one
    pub fn next(&self) -> Period {
        if self.month == 12 {
            Period {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Period {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// This period moved back `n` months
    pub fn minus_months(&self, n: u32) -> Period {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) - n as i64;
        Period {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    /// Signed number of months from this period to `target`
    pub fn months_until(&self, target: Period) -> i64 {
        12 * (target.year as i64 - self.year as i64) + (target.month as i64 - self.month as i64)
    }

    /// The period a calendar date falls in
    pub fn from_date(date: NaiveDate) -> Period {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One observed monthly revenue total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// The month the total belongs to
    pub period: Period,
    /// Total revenue for the month
    pub total: f64,
}

/// Ordered, gap-free sequence of monthly revenue totals
///
/// Construction aggregates duplicate periods, sorts chronologically and keeps
/// only the longest contiguous run of months ending at the most recent
/// period. Data on the far side of a gap is discarded, never interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    points: Vec<TimePoint>,
}

impl MonthlySeries {
    /// Assemble a series from raw source rows
    pub fn from_points(rows: Vec<TimePoint>) -> Self {
        let mut by_period: BTreeMap<Period, f64> = BTreeMap::new();
        for row in rows {
            *by_period.entry(row.period).or_insert(0.0) += row.total;
        }

        let ordered: Vec<TimePoint> = by_period
            .into_iter()
            .map(|(period, total)| TimePoint { period, total })
            .collect();

        // Keep the contiguous suffix: walk back from the latest period until
        // a month is missing.
        let mut start = ordered.len();
        while start > 0 {
            if start < ordered.len() && ordered[start - 1].period.next() != ordered[start].period {
                break;
            }
            start -= 1;
        }

        Self {
            points: ordered[start..].to_vec(),
        }
    }

    /// Number of periods in the series
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the series has no periods
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The observed points in chronological order
    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    /// The revenue totals in chronological order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.total).collect()
    }

    /// Earliest period in the series
    pub fn first_period(&self) -> Option<Period> {
        self.points.first().map(|p| p.period)
    }

    /// Latest period in the series
    pub fn last_period(&self) -> Option<Period> {
        self.points.last().map(|p| p.period)
    }
}

/// Read-only boundary to the persistence layer
///
/// Implementations own category filtering: with `category == None` the
/// aggregate source must return only rows representing the pre-computed
/// all-categories total per month, and the transaction source must sum
/// across categories exactly once per period.
pub trait RevenueDataSource {
    /// Pre-aggregated monthly totals, ordered by period
    fn monthly_totals(
        &self,
        category: Option<i64>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<TimePoint>;

    /// Monthly totals recomputed from the transaction ledger, ordered by period
    fn transaction_totals(
        &self,
        category: Option<i64>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<TimePoint>;

    /// Observed total for one period, if it has been recorded
    fn actual_value(&self, period: Period, category: Option<i64>) -> Option<f64>;
}

/// Assembles leakage-safe training series from a revenue data source
#[derive(Debug)]
pub struct HistoricalDataProvider<'a, S: RevenueDataSource> {
    source: &'a S,
}

impl<'a, S: RevenueDataSource> HistoricalDataProvider<'a, S> {
    /// Create a provider over a data source
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// The underlying data source
    pub fn source(&self) -> &S {
        self.source
    }

    /// Build a training series for the given bounds
    ///
    /// The pre-aggregated monthly totals are the primary source. When they
    /// yield fewer than `min_periods` periods, or `realtime` is set, monthly
    /// totals are recomputed from the transaction ledger and whichever source
    /// yields more periods wins.
    pub fn training_series(
        &self,
        category: Option<i64>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        min_periods: usize,
        realtime: bool,
    ) -> Result<MonthlySeries> {
        let mut series = MonthlySeries::from_points(self.source.monthly_totals(category, start, end));

        if series.len() < min_periods || realtime {
            let fallback =
                MonthlySeries::from_points(self.source.transaction_totals(category, start, end));
            log::debug!(
                "aggregate source yielded {} periods, transaction ledger {} (min {})",
                series.len(),
                fallback.len(),
                min_periods
            );
            if fallback.len() > series.len() {
                series = fallback;
            }
        }

        if series.len() < min_periods {
            return Err(ForecastError::InsufficientData {
                required: min_periods,
                available: series.len(),
            });
        }

        Ok(series)
    }

    /// Last day usable for training data targeting `target`
    ///
    /// The bound is the final day of the month immediately preceding the
    /// target, so the target period itself can never leak into training.
    pub fn training_window_end(target: Period) -> NaiveDate {
        target.first_day().pred_opt().expect("date has a predecessor")
    }

    /// Forecast horizon in months from the last training period to the target
    pub fn forecast_steps(last: Period, target: Period) -> usize {
        last.months_until(target).max(1) as usize
    }

    /// Observed total for the target period, if already recorded
    pub fn actual_value(&self, period: Period, category: Option<i64>) -> Option<f64> {
        self.source.actual_value(period, category)
    }
}
