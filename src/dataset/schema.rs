//! Canonical schema shared by the three source tables.
//!
//! Source files disagree on header names (`State_Name` vs `SUBDIVISION`,
//! `Crop_Year` vs `YEAR`, ...). Every header is trimmed and mapped onto one of
//! the canonical [`Column`]s; anything else is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    State,
    Year,
    Crop,
    Production,
    AnnualRainfall,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::State,
        Column::Year,
        Column::Crop,
        Column::Production,
        Column::AnnualRainfall,
    ];

    /// Canonical header name.
    pub fn name(&self) -> &'static str {
        match self {
            Column::State => "State",
            Column::Year => "Year",
            Column::Crop => "Crop",
            Column::Production => "Production",
            Column::AnnualRainfall => "Annual_Rainfall",
        }
    }

    /// Map a raw header onto a canonical column, accepting the legacy names
    /// used by the crop, IMD rainfall and merged exports.
    pub fn from_header(header: &str) -> Option<Column> {
        match header.trim() {
            "State" | "State_Name" | "SUBDIVISION" => Some(Column::State),
            "Year" | "Crop_Year" | "YEAR" => Some(Column::Year),
            "Crop" => Some(Column::Crop),
            "Production" => Some(Column::Production),
            "Annual_Rainfall" | "ANNUAL" | "Annual" => Some(Column::AnnualRainfall),
            _ => None,
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Column::State => 1,
            Column::Year => 1 << 1,
            Column::Crop => 1 << 2,
            Column::Production => 1 << 3,
            Column::AnnualRainfall => 1 << 4,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which canonical columns a table's header actually carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSet(u8);

impl ColumnSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn with(mut self, column: Column) -> Self {
        self.insert(column);
        self
    }

    pub fn insert(&mut self, column: Column) {
        self.0 |= column.bit();
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0 & column.bit() != 0
    }

    pub fn contains_all(&self, columns: &[Column]) -> bool {
        columns.iter().all(|c| self.contains(*c))
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        Column::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropRow {
    pub state: String,
    pub year: i32,
    pub crop: Option<String>,
    pub production: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RainfallRow {
    pub state: String,
    pub year: i32,
    pub annual_rainfall: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub state: String,
    pub year: i32,
    pub crop: Option<String>,
    pub annual_rainfall: Option<f64>,
    pub production: Option<f64>,
}

/// One normalized record. The variant follows the table it was read from;
/// columns a variant does not carry read as `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Crop(CropRow),
    Rainfall(RainfallRow),
    Merged(MergedRow),
}

impl Row {
    pub fn state(&self) -> &str {
        match self {
            Row::Crop(r) => &r.state,
            Row::Rainfall(r) => &r.state,
            Row::Merged(r) => &r.state,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Row::Crop(r) => r.year,
            Row::Rainfall(r) => r.year,
            Row::Merged(r) => r.year,
        }
    }

    pub fn crop(&self) -> Option<&str> {
        match self {
            Row::Crop(r) => r.crop.as_deref(),
            Row::Rainfall(_) => None,
            Row::Merged(r) => r.crop.as_deref(),
        }
    }

    pub fn production(&self) -> Option<f64> {
        match self {
            Row::Crop(r) => r.production,
            Row::Rainfall(_) => None,
            Row::Merged(r) => r.production,
        }
    }

    pub fn annual_rainfall(&self) -> Option<f64> {
        match self {
            Row::Crop(_) => None,
            Row::Rainfall(r) => r.annual_rainfall,
            Row::Merged(r) => r.annual_rainfall,
        }
    }

    /// Numeric value of a metric column, if this row has one.
    pub fn metric(&self, column: Column) -> Option<f64> {
        match column {
            Column::Production => self.production(),
            Column::AnnualRainfall => self.annual_rainfall(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_headers_map_to_canonical() {
        assert_eq!(Column::from_header("State_Name"), Some(Column::State));
        assert_eq!(Column::from_header("SUBDIVISION"), Some(Column::State));
        assert_eq!(Column::from_header("Crop_Year"), Some(Column::Year));
        assert_eq!(Column::from_header("YEAR"), Some(Column::Year));
        assert_eq!(Column::from_header("ANNUAL"), Some(Column::AnnualRainfall));
        assert_eq!(Column::from_header("Annual"), Some(Column::AnnualRainfall));
        assert_eq!(Column::from_header("  Production "), Some(Column::Production));
        assert_eq!(Column::from_header("District_Name"), None);
        assert_eq!(Column::from_header("JAN"), None);
    }

    #[test]
    fn test_column_set() {
        let set = ColumnSet::new().with(Column::State).with(Column::Production);
        assert!(set.contains(Column::State));
        assert!(!set.contains(Column::Crop));
        assert!(set.contains_all(&[Column::State, Column::Production]));
        assert!(!set.contains_all(&[Column::State, Column::Year]));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Column::State, Column::Production]);
    }

    #[test]
    fn test_row_accessors_follow_variant() {
        let row = Row::Rainfall(RainfallRow {
            state: "Kerala".to_string(),
            year: 2001,
            annual_rainfall: Some(2900.5),
        });
        assert_eq!(row.crop(), None);
        assert_eq!(row.production(), None);
        assert_eq!(row.metric(Column::AnnualRainfall), Some(2900.5));
        assert_eq!(row.metric(Column::State), None);
    }
}
