//! Reference datasets: crop production, IMD rainfall and the merged view.
//!
//! All three are read once at startup into an immutable [`Tables`] value.
//! Queries only ever borrow it.

pub mod loader;
pub mod schema;

pub use schema::{Column, ColumnSet, CropRow, MergedRow, RainfallRow, Row};

use crate::config::DataPaths;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Which reference table a question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Rainfall,
    Crop,
    Merged,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Rainfall => "rainfall",
            Dataset::Crop => "crop",
            Dataset::Merged => "merged",
        }
    }

    /// Provenance string quoted in every answer drawn from this table.
    pub fn source_label(&self) -> &'static str {
        match self {
            Dataset::Rainfall => "IMD 2017",
            Dataset::Crop => "Agriculture Ministry 2022",
            Dataset::Merged => "IMD + Agriculture Ministry",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    dataset: Dataset,
    columns: ColumnSet,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(dataset: Dataset, columns: ColumnSet, rows: Vec<Row>) -> Self {
        Self {
            dataset,
            columns,
            rows,
        }
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    pub fn columns(&self) -> ColumnSet {
        self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The three normalized tables.
#[derive(Debug, Clone)]
pub struct Tables {
    pub crop: Table,
    pub rainfall: Table,
    pub merged: Table,
}

impl Tables {
    pub fn new(crop: Table, rainfall: Table, merged: Table) -> Self {
        Self {
            crop,
            rainfall,
            merged,
        }
    }

    /// Load all three tables from disk.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let crop = Table::from_path(Dataset::Crop, &paths.crop)?;
        let rainfall = Table::from_path(Dataset::Rainfall, &paths.rainfall)?;
        let merged = Table::from_path(Dataset::Merged, &paths.merged)?;

        info!(
            "Datasets ready: crop={} rainfall={} merged={}",
            crop.len(),
            rainfall.len(),
            merged.len()
        );

        Ok(Self::new(crop, rainfall, merged))
    }

    pub fn get(&self, dataset: Dataset) -> &Table {
        match dataset {
            Dataset::Crop => &self.crop,
            Dataset::Rainfall => &self.rainfall,
            Dataset::Merged => &self.merged,
        }
    }
}
