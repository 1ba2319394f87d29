//! Dataset model
//!
//! Records of flagged repositories, the in-memory dataset that holds them,
//! and the selector between the original and translated dataset variants.

mod decoder;

pub use decoder::{decode, split_line};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category shown for records without a `problem_type`
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// One flagged repository entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Raw category tag, possibly empty
    pub problem_type: String,
    pub datetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_link: Option<String>,
}

impl Record {
    /// Category tag used for display, `unknown` when the record has none
    pub fn category(&self) -> &str {
        if self.problem_type.is_empty() {
            UNKNOWN_CATEGORY
        } else {
            &self.problem_type
        }
    }

    /// A record is kept only when both id and name are present
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty()
    }
}

/// Ordered collection of records for one data source mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Decode raw CSV text into a dataset
    pub fn from_csv(text: &str) -> Self {
        Self::new(decode(text))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which published variant of the dataset to read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceMode {
    /// Untranslated upstream data
    Original,
    /// English translation of the upstream data
    #[default]
    Translated,
}

impl DataSourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Translated => "translated",
        }
    }
}

impl fmt::Display for DataSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSourceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "translated" => Ok(Self::Translated),
            other => Err(format!(
                "unknown data source mode '{}' (expected 'original' or 'translated')",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_defaults_to_unknown() {
        let record = Record {
            id: "1".to_string(),
            name: "repo".to_string(),
            ..Default::default()
        };
        assert_eq!(record.category(), "unknown");
        assert!(record.problem_type.is_empty());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(
            "original".parse::<DataSourceMode>().unwrap(),
            DataSourceMode::Original
        );
        assert_eq!(
            " Translated ".parse::<DataSourceMode>().unwrap(),
            DataSourceMode::Translated
        );
        assert!("english".parse::<DataSourceMode>().is_err());
        assert_eq!(DataSourceMode::default(), DataSourceMode::Translated);
    }
}
