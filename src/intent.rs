//! Structured form of a question: which table, which aggregate, which filters.

use crate::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Compare,
    Top,
    Trend,
    Average,
    Max,
    Min,
    General,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Compare => "compare",
            Action::Top => "top",
            Action::Trend => "trend",
            Action::Average => "average",
            Action::Max => "max",
            Action::Min => "min",
            Action::General => "general",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional state/crop/year constraints, applied conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub years: Vec<i32>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.crop.is_none() && self.years.is_empty()
    }
}

/// Quote a string the way a dict literal would show it.
fn quote(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{}\"", s.replace('\\', "\\\\"))
    } else {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// Renders as a dict literal in insertion order, e.g.
/// `{'state': 'Kerala', 'years': [2001, 1998]}`. Used in "no data" answers.
impl fmt::Display for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = Vec::new();
        if let Some(state) = &self.state {
            entries.push(format!("'state': {}", quote(state)));
        }
        if let Some(crop) = &self.crop {
            entries.push(format!("'crop': {}", quote(crop)));
        }
        if !self.years.is_empty() {
            let years: Vec<String> = self.years.iter().map(|y| y.to_string()).collect();
            entries.push(format!("'years': [{}]", years.join(", ")));
        }
        write!(f, "{{{}}}", entries.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// `None` when no dataset keyword matched.
    pub dataset: Option<Dataset>,
    pub action: Action,
    pub filters: Filters,
}

impl Intent {
    pub fn new(dataset: Option<Dataset>, action: Action, filters: Filters) -> Self {
        Self {
            dataset,
            action,
            filters,
        }
    }

    /// The table an answer is drawn from; unset falls back to the merged table.
    pub fn effective_dataset(&self) -> Dataset {
        self.dataset.unwrap_or(Dataset::Merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_display() {
        assert_eq!(Filters::default().to_string(), "{}");

        let filters = Filters {
            state: Some("Atlantis".to_string()),
            ..Filters::default()
        };
        assert_eq!(filters.to_string(), "{'state': 'Atlantis'}");

        let filters = Filters {
            state: Some("Kerala".to_string()),
            crop: Some("Rice".to_string()),
            years: vec![2001, 1998, 2001],
        };
        assert_eq!(
            filters.to_string(),
            "{'state': 'Kerala', 'crop': 'Rice', 'years': [2001, 1998, 2001]}"
        );
    }

    #[test]
    fn test_quote_switches_delimiters() {
        assert_eq!(quote("Jammu & Kashmir"), "'Jammu & Kashmir'");
        assert_eq!(quote("Bay's"), "\"Bay's\"");
    }

    #[test]
    fn test_intent_serializes_lowercase() {
        let intent = Intent::new(Some(Dataset::Rainfall), Action::Average, Filters::default());
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["dataset"], "rainfall");
        assert_eq!(json["action"], "average");
        assert_eq!(json["filters"], serde_json::json!({}));
        assert_eq!(Intent::new(None, Action::General, Filters::default()).effective_dataset(), Dataset::Merged);
    }
}
