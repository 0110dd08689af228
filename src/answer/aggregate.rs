//! Aggregates over a filtered set of rows. Missing values are skipped.

use crate::dataset::{Column, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean of a metric over the rows that have it; NaN when none do.
pub fn mean(rows: &[&Row], column: Column) -> f64 {
    let (sum, count) = rows
        .iter()
        .filter_map(|row| row.metric(column))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// First row holding the largest value of a metric.
pub fn max_by<'a>(rows: &[&'a Row], column: Column) -> Option<(&'a Row, f64)> {
    let mut best: Option<(&'a Row, f64)> = None;
    for row in rows {
        if let Some(value) = row.metric(column) {
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((*row, value)),
            }
        }
    }
    best
}

/// Crops ranked by total production, highest first. Ties keep alphabetical
/// order; rows without a crop name are left out.
pub fn top_crops(rows: &[&Row], limit: usize) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        if let Some(crop) = row.crop() {
            *totals.entry(crop).or_insert(0.0) += row.production().unwrap_or(0.0);
        }
    }

    let mut ranked: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(crop, total)| (crop.to_string(), total))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub annual_rainfall: Option<f64>,
    pub production: Option<f64>,
}

/// Per-year means of rainfall and production, keyed by year for a line chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendChart {
    pub points: Vec<TrendPoint>,
}

impl TrendChart {
    pub fn from_rows(rows: &[&Row]) -> Self {
        #[derive(Default)]
        struct Acc {
            rain_sum: f64,
            rain_n: usize,
            prod_sum: f64,
            prod_n: usize,
        }

        let mut by_year: BTreeMap<i32, Acc> = BTreeMap::new();
        for row in rows {
            let acc = by_year.entry(row.year()).or_default();
            if let Some(v) = row.annual_rainfall() {
                acc.rain_sum += v;
                acc.rain_n += 1;
            }
            if let Some(v) = row.production() {
                acc.prod_sum += v;
                acc.prod_n += 1;
            }
        }

        let points = by_year
            .into_iter()
            .map(|(year, acc)| TrendPoint {
                year,
                annual_rainfall: (acc.rain_n > 0).then(|| acc.rain_sum / acc.rain_n as f64),
                production: (acc.prod_n > 0).then(|| acc.prod_sum / acc.prod_n as f64),
            })
            .collect();

        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
