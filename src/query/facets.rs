// Option lists for the category and date selectors
use crate::dataset::Dataset;
use serde::Serialize;
use std::collections::BTreeMap;

/// Record counts per category and per period of a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub total: usize,
    /// Keyed by display category (`unknown` for empty tags)
    pub categories: BTreeMap<String, usize>,
    /// Keyed by `YYYY`
    pub years: BTreeMap<String, usize>,
    /// Keyed by `YYYY-MM`
    pub months: BTreeMap<String, usize>,
}

impl Facets {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut facets = Self {
            total: dataset.len(),
            ..Default::default()
        };

        for record in dataset.records() {
            *facets
                .categories
                .entry(record.category().to_string())
                .or_insert(0) += 1;

            if let Some(year) = year_prefix(&record.datetime) {
                *facets.years.entry(year.to_string()).or_insert(0) += 1;
            }
            if let Some(month) = month_prefix(&record.datetime) {
                *facets.months.entry(month.to_string()).or_insert(0) += 1;
            }
        }

        facets
    }

    /// Categories ordered by descending count, then name
    pub fn categories_by_count(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .categories
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

fn year_prefix(datetime: &str) -> Option<&str> {
    let year = datetime.get(..4)?;
    year.bytes().all(|b| b.is_ascii_digit()).then_some(year)
}

fn month_prefix(datetime: &str) -> Option<&str> {
    let month = datetime.get(..7)?;
    let bytes = month.as_bytes();
    let shaped = bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit);
    shaped.then_some(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    fn record(problem_type: &str, datetime: &str) -> Record {
        Record {
            id: "1".to_string(),
            name: "n".to_string(),
            problem_type: problem_type.to_string(),
            datetime: datetime.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_facet_counts() {
        let dataset = Dataset::new(vec![
            record("malware", "2024-03-01T00:00:00Z"),
            record("malware", "2024-04-02"),
            record("spam", "2023-12-31 10:00:00"),
            record("", "garbage"),
        ]);
        let facets = Facets::from_dataset(&dataset);

        assert_eq!(facets.total, 4);
        assert_eq!(facets.categories["malware"], 2);
        assert_eq!(facets.categories["unknown"], 1);
        assert_eq!(facets.years["2024"], 2);
        assert_eq!(facets.months["2023-12"], 1);
        assert!(!facets.months.contains_key("garbage"));
        assert_eq!(
            facets.categories_by_count(),
            vec![("malware", 2), ("spam", 1), ("unknown", 1)]
        );
    }

    #[test]
    fn test_each_category_selects_its_count() {
        use crate::query::{filter, FilterCriteria};

        let dataset = Dataset::new(vec![
            record("", "2024-01-01"),
            record("spam", "2024-01-02"),
            record("political_slogan", "2024-01-03"),
            record("", "2024-01-04"),
        ]);
        let facets = Facets::from_dataset(&dataset);

        for (category, count) in &facets.categories {
            let criteria = FilterCriteria::new().with_problem_type(Some(category.as_str()));
            assert_eq!(filter(&dataset, &criteria).len(), *count, "{}", category);
        }
        assert_eq!(facets.categories["unknown"], 2);
    }

    #[test]
    fn test_short_or_multibyte_timestamps() {
        assert_eq!(month_prefix("2024"), None);
        assert_eq!(month_prefix("2024/03/01"), None);
        assert_eq!(year_prefix("20ё4-01"), None);
        assert_eq!(month_prefix("2024-0ё"), None);
    }
}
