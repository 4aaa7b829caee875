//! Shared test fixtures: an in-memory stand-in for the persistence layer
#![allow(dead_code)]

use chrono::NaiveDate;
use revenue_forecast::data::{Period, RevenueDataSource, TimePoint};

/// A row in one of the in-memory tables
#[derive(Debug, Clone, Copy)]
pub struct Row {
    pub category: Option<i64>,
    pub period: Period,
    pub total: f64,
}

/// In-memory revenue store backing the services under test
#[derive(Debug, Default)]
pub struct InMemorySource {
    pub aggregates: Vec<Row>,
    pub transactions: Vec<Row>,
    pub actuals: Vec<Row>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aggregates(mut self, rows: Vec<Row>) -> Self {
        self.aggregates = rows;
        self
    }

    pub fn with_transactions(mut self, rows: Vec<Row>) -> Self {
        self.transactions = rows;
        self
    }

    pub fn with_actual(mut self, category: Option<i64>, period: Period, total: f64) -> Self {
        self.actuals.push(Row {
            category,
            period,
            total,
        });
        self
    }

    fn select(rows: &[Row], category: Option<i64>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<TimePoint> {
        let start = start.map(Period::from_date);
        let end = end.map(Period::from_date);
        let mut points: Vec<TimePoint> = rows
            .iter()
            .filter(|r| r.category == category)
            .filter(|r| start.map_or(true, |s| r.period >= s))
            .filter(|r| end.map_or(true, |e| r.period <= e))
            .map(|r| TimePoint {
                period: r.period,
                total: r.total,
            })
            .collect();
        points.sort_by_key(|p| p.period);
        points
    }
}

impl RevenueDataSource for InMemorySource {
    fn monthly_totals(
        &self,
        category: Option<i64>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<TimePoint> {
        Self::select(&self.aggregates, category, start, end)
    }

    fn transaction_totals(
        &self,
        category: Option<i64>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<TimePoint> {
        Self::select(&self.transactions, category, start, end)
    }

    fn actual_value(&self, period: Period, category: Option<i64>) -> Option<f64> {
        self.actuals
            .iter()
            .find(|r| r.period == period && r.category == category)
            .map(|r| r.total)
    }
}

/// `months` consecutive rows starting at `start`, values from a closure
pub fn month_rows<F>(category: Option<i64>, start: Period, months: usize, value: F) -> Vec<Row>
where
    F: Fn(usize) -> f64,
{
    let mut rows = Vec::with_capacity(months);
    let mut period = start;
    for t in 0..months {
        rows.push(Row {
            category,
            period,
            total: value(t),
        });
        period = period.next();
    }
    rows
}

/// Multiplicative seasonal pattern with mean 1 over a 12-month cycle
pub const SEASONAL_FACTORS: [f64; 12] = [
    1.20, 0.80, 1.00, 1.10, 0.90, 1.05, 0.95, 1.15, 0.85, 1.00, 1.10, 0.90,
];

/// Deterministic trending seasonal revenue: (base + slope*t) * season(phase)
///
/// The phase is anchored to the calendar month so two series starting in
/// different months still agree on which month peaks.
pub fn seasonal_revenue(base: f64, slope: f64, start: Period, t: usize) -> f64 {
    let month = {
        let mut p = start;
        for _ in 0..t {
            p = p.next();
        }
        p.month()
    };
    (base + slope * t as f64) * SEASONAL_FACTORS[(month - 1) as usize]
}
