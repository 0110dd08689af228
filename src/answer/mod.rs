//! Answer generation: pick a table, filter it, compute one aggregate and
//! phrase the result.
//!
//! Every path ends in a sentence. Unsupported action/table combinations and
//! tables missing a required column produce [`NOT_AVAILABLE`]; filters that
//! remove every row produce a "no data" sentence naming the filters.

pub mod aggregate;
pub mod format;

pub use aggregate::{TrendChart, TrendPoint};

use crate::dataset::{Column, Dataset, Row, Table, Tables};
use crate::intent::{Action, Filters, Intent};
use format::{format_float, round_to};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub const NOT_AVAILABLE: &str = "Answer not available in dataset";

const TOP_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// Present only for a successful trend answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<TrendChart>,
}

impl Answer {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            chart: None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Answer an interpreted question against the loaded tables.
pub fn generate(intent: &Intent, tables: &Tables) -> Answer {
    let dataset = intent.effective_dataset();
    let table = tables.get(dataset);
    let rows = apply_filters(table, &intent.filters);

    debug!(
        "{} rows of {} match filters {}",
        rows.len(),
        dataset,
        intent.filters
    );

    if rows.is_empty() {
        return Answer::plain(format!(
            "No data found for this query (filters: {})",
            intent.filters
        ));
    }

    let query = AggregateQuery {
        table,
        rows: &rows,
        filters: &intent.filters,
        source: dataset.source_label(),
    };

    let answer = match (intent.action, dataset) {
        (Action::Average, Dataset::Rainfall) => query.average_rainfall(),
        (Action::Average, Dataset::Crop) => query.average_production(),
        (Action::Max, Dataset::Rainfall) => query.highest_rainfall(),
        (Action::Max, Dataset::Crop) => query.highest_production(),
        (Action::Top, Dataset::Crop) => query.top_crops(),
        (Action::Trend, Dataset::Merged) => query.trend(),
        _ => None,
    };

    answer.unwrap_or_else(|| Answer::plain(NOT_AVAILABLE))
}

/// Keep the rows matching every filter whose column the table has.
pub fn apply_filters<'t>(table: &'t Table, filters: &Filters) -> Vec<&'t Row> {
    let state = filters
        .state
        .as_ref()
        .filter(|_| table.has_column(Column::State))
        .map(|s| s.to_lowercase());
    let crop = filters
        .crop
        .as_ref()
        .filter(|_| table.has_column(Column::Crop))
        .map(|c| c.to_lowercase());
    let years = Some(&filters.years)
        .filter(|years| !years.is_empty() && table.has_column(Column::Year));

    table
        .rows()
        .iter()
        .filter(|row| state.as_ref().map_or(true, |s| row.state().to_lowercase() == *s))
        .filter(|row| {
            crop.as_ref()
                .map_or(true, |c| row.crop().map(str::to_lowercase).as_ref() == Some(c))
        })
        .filter(|row| years.map_or(true, |ys| ys.contains(&row.year())))
        .collect()
}

struct AggregateQuery<'a> {
    table: &'a Table,
    rows: &'a [&'a Row],
    filters: &'a Filters,
    source: &'static str,
}

impl<'a> AggregateQuery<'a> {
    fn requires(&self, columns: &[Column]) -> Option<()> {
        self.table.columns().contains_all(columns).then_some(())
    }

    fn place(&self) -> &str {
        self.filters.state.as_deref().unwrap_or("India")
    }

    fn average_rainfall(&self) -> Option<Answer> {
        self.requires(&[Column::AnnualRainfall])?;
        let avg = round_to(aggregate::mean(self.rows, Column::AnnualRainfall), 2);
        Some(Answer::plain(format!(
            "Average rainfall in {} = {} mm (source: {})",
            self.place(),
            format_float(avg),
            self.source
        )))
    }

    fn average_production(&self) -> Option<Answer> {
        self.requires(&[Column::Production])?;
        let avg = round_to(aggregate::mean(self.rows, Column::Production), 2);
        Some(Answer::plain(format!(
            "Average crop production in {} = {} tons (source: {})",
            self.place(),
            format_float(avg),
            self.source
        )))
    }

    fn highest_rainfall(&self) -> Option<Answer> {
        self.requires(&[Column::AnnualRainfall])?;
        let (row, value) = aggregate::max_by(self.rows, Column::AnnualRainfall)?;
        Some(Answer::plain(format!(
            "Highest rainfall in {} = {} mm, Year = {} (source: {})",
            row.state(),
            format_float(value),
            row.year(),
            self.source
        )))
    }

    fn highest_production(&self) -> Option<Answer> {
        self.requires(&[Column::Production, Column::Crop])?;
        let named: Vec<&Row> = self
            .rows
            .iter()
            .copied()
            .filter(|row| row.crop().is_some())
            .collect();
        let (row, value) = aggregate::max_by(&named, Column::Production)?;
        let crop = row.crop()?;
        let year: String = row.year().to_string().chars().take(4).collect();
        Some(Answer::plain(format!(
            "Highest {} production in {} = {} tons, Year = {} (source: {})",
            crop,
            row.state(),
            format_float(value),
            year,
            self.source
        )))
    }

    fn top_crops(&self) -> Option<Answer> {
        self.requires(&[Column::Production, Column::Crop])?;
        let names: Vec<String> = aggregate::top_crops(self.rows, TOP_LIMIT)
            .into_iter()
            .map(|(crop, _)| crop)
            .collect();
        if names.is_empty() {
            return None;
        }
        Some(Answer::plain(format!(
            "Top crops in {} = {} (source: {})",
            self.place(),
            names.join(", "),
            self.source
        )))
    }

    fn trend(&self) -> Option<Answer> {
        self.requires(&[Column::AnnualRainfall, Column::Production])?;
        let chart = TrendChart::from_rows(self.rows);
        Some(Answer {
            text: format!(
                "Trend data ready for {} in {} (source: {})",
                self.filters.crop.as_deref().unwrap_or("selected crop"),
                self.place(),
                self.source
            ),
            chart: Some(chart),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{ColumnSet, CropRow, MergedRow, RainfallRow};
    use crate::interpreter::interpret;

    fn rain(state: &str, year: i32, value: f64) -> Row {
        Row::Rainfall(RainfallRow {
            state: state.to_string(),
            year,
            annual_rainfall: Some(value),
        })
    }

    fn crop(state: &str, year: i32, name: &str, production: f64) -> Row {
        Row::Crop(CropRow {
            state: state.to_string(),
            year,
            crop: Some(name.to_string()),
            production: Some(production),
        })
    }

    fn merged(state: &str, year: i32, name: &str, rain: f64, production: f64) -> Row {
        Row::Merged(MergedRow {
            state: state.to_string(),
            year,
            crop: Some(name.to_string()),
            annual_rainfall: Some(rain),
            production: Some(production),
        })
    }

    fn all_columns() -> ColumnSet {
        Column::ALL.into_iter().fold(ColumnSet::new(), |s, c| s.with(c))
    }

    fn sample_tables() -> Tables {
        let crop_cols = ColumnSet::new()
            .with(Column::State)
            .with(Column::Year)
            .with(Column::Crop)
            .with(Column::Production);
        let rain_cols = ColumnSet::new()
            .with(Column::State)
            .with(Column::Year)
            .with(Column::AnnualRainfall);

        Tables::new(
            Table::new(
                Dataset::Crop,
                crop_cols,
                vec![
                    crop("Punjab", 2001, "Wheat", 500.0),
                    crop("Punjab", 2002, "Wheat", 700.0),
                    crop("Punjab", 2001, "Rice", 900.0),
                    crop("Punjab", 2001, "Cotton", 100.0),
                    crop("Punjab", 2001, "Maize", 50.0),
                    crop("Kerala", 2001, "Coconut", 3000.0),
                ],
            ),
            Table::new(
                Dataset::Rainfall,
                rain_cols,
                vec![
                    rain("KERALA", 2001, 3000.0),
                    rain("KERALA", 2002, 2800.5),
                    rain("TAMIL NADU", 2004, 1200.0),
                    rain("TAMIL NADU", 2005, 1650.2),
                ],
            ),
            Table::new(
                Dataset::Merged,
                all_columns(),
                vec![
                    merged("Maharashtra", 2002, "Rice", 1000.0, 40.0),
                    merged("Maharashtra", 2001, "Rice", 900.0, 20.0),
                    merged("Maharashtra", 2002, "Rice", 1200.0, 60.0),
                ],
            ),
        )
    }

    fn ask(query: &str, tables: &Tables) -> Answer {
        generate(&interpret(query), tables)
    }

    #[test]
    fn test_average_rainfall() {
        let answer = ask("Average rainfall in Kerala", &sample_tables());
        assert_eq!(answer.text, "Average rainfall in Kerala = 2900.25 mm (source: IMD 2017)");
        assert!(answer.chart.is_none());
    }

    #[test]
    fn test_average_production_defaults_to_india() {
        let answer = ask("average crop production", &sample_tables());
        assert_eq!(
            answer.text,
            "Average crop production in India = 875.0 tons (source: Agriculture Ministry 2022)"
        );
    }

    #[test]
    fn test_highest_rainfall() {
        let answer = ask("Highest rainfall in Tamil Nadu", &sample_tables());
        assert_eq!(
            answer.text,
            "Highest rainfall in TAMIL NADU = 1650.2 mm, Year = 2005 (source: IMD 2017)"
        );
    }

    #[test]
    fn test_highest_production() {
        let answer = ask("max crop production in Punjab", &sample_tables());
        assert_eq!(
            answer.text,
            "Highest Rice production in Punjab = 900.0 tons, Year = 2001 (source: Agriculture Ministry 2022)"
        );
    }

    #[test]
    fn test_top_crops() {
        let answer = ask("Top crops in Punjab", &sample_tables());
        assert_eq!(
            answer.text,
            "Top crops in Punjab = Wheat, Rice, Cotton (source: Agriculture Ministry 2022)"
        );
    }

    #[test]
    fn test_year_filter() {
        let answer = ask("top crops in Punjab in 2002", &sample_tables());
        assert_eq!(
            answer.text,
            "Top crops in Punjab = Wheat (source: Agriculture Ministry 2022)"
        );
    }

    #[test]
    fn test_trend_on_default_dataset() {
        let answer = ask("Rice trend in Maharashtra", &sample_tables());
        assert_eq!(
            answer.text,
            "Trend data ready for Rice in Maharashtra (source: IMD + Agriculture Ministry)"
        );
        let chart = answer.chart.unwrap();
        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[0].year, 2001);
        assert_eq!(chart.points[1].annual_rainfall, Some(1100.0));
        assert_eq!(chart.points[1].production, Some(50.0));
    }

    #[test]
    fn test_no_data_names_filters() {
        let intent = Intent::new(
            Some(Dataset::Rainfall),
            Action::Average,
            Filters {
                state: Some("Atlantis".to_string()),
                ..Filters::default()
            },
        );
        assert_eq!(
            generate(&intent, &sample_tables()).text,
            "No data found for this query (filters: {'state': 'Atlantis'})"
        );
    }

    #[test]
    fn test_gibberish_is_not_available() {
        assert_eq!(ask("asdkjasd", &sample_tables()).text, NOT_AVAILABLE);
    }

    #[test]
    fn test_unsupported_combinations() {
        let tables = sample_tables();
        assert_eq!(ask("lowest rainfall in Kerala", &tables).text, NOT_AVAILABLE);
        assert_eq!(ask("compare crop production", &tables).text, NOT_AVAILABLE);
        assert_eq!(ask("top rainfall states", &tables).text, NOT_AVAILABLE);
        assert_eq!(ask("rainfall trend in Kerala", &tables).text, NOT_AVAILABLE);
    }

    #[test]
    fn test_missing_column_is_not_available() {
        let mut tables = sample_tables();
        tables.rainfall = Table::new(
            Dataset::Rainfall,
            ColumnSet::new().with(Column::State).with(Column::Year),
            vec![Row::Rainfall(RainfallRow {
                state: "Kerala".to_string(),
                year: 2001,
                annual_rainfall: None,
            })],
        );
        assert_eq!(ask("Average rainfall in Kerala", &tables).text, NOT_AVAILABLE);
    }

    #[test]
    fn test_crop_actions_need_crop_column() {
        let mut tables = sample_tables();
        tables.crop = Table::new(
            Dataset::Crop,
            ColumnSet::new()
                .with(Column::State)
                .with(Column::Year)
                .with(Column::Production),
            vec![Row::Crop(CropRow {
                state: "Punjab".to_string(),
                year: 2001,
                crop: None,
                production: Some(500.0),
            })],
        );
        assert_eq!(ask("max crop production in Punjab", &tables).text, NOT_AVAILABLE);
        assert_eq!(ask("top crops in Punjab", &tables).text, NOT_AVAILABLE);
        assert_eq!(
            ask("average crop production in Punjab", &tables).text,
            "Average crop production in Punjab = 500.0 tons (source: Agriculture Ministry 2022)"
        );
    }

    #[test]
    fn test_highest_production_skips_unnamed_crops() {
        let mut tables = sample_tables();
        let mut rows = tables.crop.rows().to_vec();
        rows.push(Row::Crop(CropRow {
            state: "Punjab".to_string(),
            year: 2003,
            crop: None,
            production: Some(99_999.0),
        }));
        tables.crop = Table::new(Dataset::Crop, tables.crop.columns(), rows);

        assert_eq!(
            ask("max crop production in Punjab", &tables).text,
            "Highest Rice production in Punjab = 900.0 tons, Year = 2001 (source: Agriculture Ministry 2022)"
        );
    }

    #[test]
    fn test_average_rounds_half_cent_ties_to_even() {
        let mut tables = sample_tables();
        let mut rows: Vec<Row> = (0..7).map(|_| crop("Punjab", 2001, "Rice", 125.0)).collect();
        rows.push(crop("Punjab", 2002, "Rice", 126.0));
        tables.crop = Table::new(Dataset::Crop, tables.crop.columns(), rows);

        assert_eq!(
            ask("Average crop production in Punjab", &tables).text,
            "Average crop production in Punjab = 125.12 tons (source: Agriculture Ministry 2022)"
        );
    }

    #[test]
    fn test_crop_filter_ignored_without_crop_column() {
        let tables = sample_tables();
        let rows = apply_filters(&tables.rainfall, &interpret("rice rainfall in kerala").filters);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let tables = sample_tables();
        let intent = interpret("Top crops in Punjab");
        assert_eq!(generate(&intent, &tables), generate(&intent, &tables));
    }
}
