//! CSV loading and normalization for the three source tables.

use super::schema::{Column, ColumnSet, CropRow, MergedRow, RainfallRow, Row};
use super::{Dataset, Table};
use crate::error::{AgriError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Position of each canonical column in a CSV header. When two raw headers map
/// to the same canonical column, the first one wins.
#[derive(Debug, Default)]
struct ColumnIndex {
    positions: HashMap<Column, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut positions = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(column) = Column::from_header(header) {
                positions.entry(column).or_insert(idx);
            }
        }
        Self { positions }
    }

    fn columns(&self) -> ColumnSet {
        self.positions
            .keys()
            .fold(ColumnSet::new(), |set, column| set.with(*column))
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: Column) -> Option<&'r str> {
        self.positions
            .get(&column)
            .and_then(|idx| record.get(*idx))
    }
}

/// Parse a year cell into an integer year.
///
/// Accepts plain years ("1998"), float-formatted years ("1998.0") and
/// agricultural-season ranges ("2007-08"), which keep their first 4 characters.
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    if let Ok(year) = trimmed.parse::<f64>() {
        if year.is_finite() && year.fract() == 0.0 {
            return Some(year as i32);
        }
    }
    trimmed.get(..4).and_then(|prefix| prefix.parse::<i32>().ok())
}

/// Parse a numeric cell. Empty, non-numeric and NaN cells are missing values.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Table {
    /// Read a table from a CSV file.
    pub fn from_path(dataset: Dataset, path: &Path) -> Result<Table> {
        if !path.exists() {
            return Err(AgriError::Dataset(format!(
                "{} file not found: {}",
                dataset,
                path.display()
            )));
        }

        info!("Loading {} table: {}", dataset, path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(dataset, file)
    }

    /// Read a table from any CSV source, normalizing headers into the canonical
    /// schema. `State` and `Year` are required; every other column is optional.
    pub fn from_reader<R: Read>(dataset: Dataset, reader: R) -> Result<Table> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let index = ColumnIndex::from_headers(rdr.headers()?);
        let columns = index.columns();

        for required in [Column::State, Column::Year] {
            if !columns.contains(required) {
                return Err(AgriError::Schema(format!(
                    "{} table has no {} column",
                    dataset, required
                )));
            }
        }

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for (line, result) in rdr.records().enumerate() {
            let record = result?;

            let Some(year) = index.cell(&record, Column::Year).and_then(parse_year) else {
                warn!(
                    "Skipping {} row {}: unparseable year {:?}",
                    dataset,
                    line + 2,
                    index.cell(&record, Column::Year).unwrap_or("")
                );
                skipped += 1;
                continue;
            };

            let state = index
                .cell(&record, Column::State)
                .unwrap_or("")
                .to_string();
            let crop = parse_text(index.cell(&record, Column::Crop));
            let production = index.cell(&record, Column::Production).and_then(parse_number);
            let annual_rainfall = index
                .cell(&record, Column::AnnualRainfall)
                .and_then(parse_number);

            let row = match dataset {
                Dataset::Crop => Row::Crop(CropRow {
                    state,
                    year,
                    crop,
                    production,
                }),
                Dataset::Rainfall => Row::Rainfall(RainfallRow {
                    state,
                    year,
                    annual_rainfall,
                }),
                Dataset::Merged => Row::Merged(MergedRow {
                    state,
                    year,
                    crop,
                    annual_rainfall,
                    production,
                }),
            };
            rows.push(row);
        }

        info!(
            "Loaded {} {} rows ({} skipped), columns: {:?}",
            rows.len(),
            dataset,
            skipped,
            columns.iter().map(|c| c.name()).collect::<Vec<_>>()
        );

        Ok(Table::new(dataset, columns.restrict_to(dataset), rows))
    }
}

impl ColumnSet {
    /// Drop columns the dataset's row shape cannot hold (e.g. a stray `Crop`
    /// column in the rainfall file).
    fn restrict_to(self, dataset: Dataset) -> ColumnSet {
        let allowed: &[Column] = match dataset {
            Dataset::Crop => &[Column::State, Column::Year, Column::Crop, Column::Production],
            Dataset::Rainfall => &[Column::State, Column::Year, Column::AnnualRainfall],
            Dataset::Merged => &Column::ALL,
        };
        self.iter()
            .filter(|c| allowed.contains(c))
            .fold(ColumnSet::new(), |set, c| set.with(c))
    }
}
