// Line-oriented CSV decoding for the search dataset.
//
// Quotes only toggle the "inside quotes" state and are never copied. There is
// no `""` escape and no multi-line field support; the published dataset is
// decoded with exactly these rules.

use super::Record;
use std::mem::take;

/// Column a header name maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Description,
    ProblemType,
    Datetime,
    CommitLink,
    Ignored,
}

impl Column {
    fn from_header(header: &str) -> Self {
        match header.trim() {
            "id" => Self::Id,
            "name" => Self::Name,
            "description" => Self::Description,
            "problem_type" => Self::ProblemType,
            "datetime" => Self::Datetime,
            "commit_link" => Self::CommitLink,
            _ => Self::Ignored,
        }
    }
}

/// Decode CSV text into records, dropping rows without an id or name
pub fn decode(text: &str) -> Vec<Record> {
    let text = text.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = text.split('\n');
    let columns: Vec<Column> = match lines.next() {
        Some(header) => header.split(',').map(Column::from_header).collect(),
        None => return Vec::new(),
    };

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        let values = split_line(line);
        let mut record = Record::default();
        for (index, column) in columns.iter().enumerate() {
            let value = values.get(index).map(|v| clean_value(v)).unwrap_or_default();
            match column {
                Column::Id => record.id = value,
                Column::Name => record.name = value,
                Column::Description => record.description = value,
                Column::ProblemType => record.problem_type = value,
                Column::Datetime => record.datetime = value,
                Column::CommitLink => {
                    record.commit_link = if value.is_empty() { None } else { Some(value) }
                }
                Column::Ignored => {}
            }
        }

        if record.is_complete() {
            records.push(record);
        } else {
            dropped += 1;
        }
    }

    tracing::debug!(kept = records.len(), dropped, "Decoded CSV dataset");
    records
}

/// Split one line into raw fields.
///
/// A comma separates fields only outside quotes; `"` flips the quote state
/// and is dropped from the output.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(take(&mut current)),
            _ => current.push(ch),
        }
    }

    fields.push(current);
    fields
}

/// Trim, then strip a single leading and trailing `"` if present
fn clean_value(raw: &str) -> String {
    let value = raw.trim();
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,name,description,problem_type,datetime,commit_link";

    #[test]
    fn test_quoted_comma_is_literal() {
        let text = format!(
            "{}\n1,\"Foo, Bar\",desc,malware,2024-03-01T00:00:00Z,https://x",
            HEADER
        );
        let records = decode(&text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].name, "Foo, Bar");
        assert_eq!(records[0].problem_type, "malware");
        assert_eq!(records[0].commit_link.as_deref(), Some("https://x"));
    }

    #[test]
    fn test_split_line_drops_quote_characters() {
        assert_eq!(split_line(r#"a,"b""c",d"#), vec!["a", "bc", "d"]);
        assert_eq!(split_line(""), vec![""]);
        assert_eq!(split_line("a,,b,"), vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_unterminated_quote_swallows_rest_of_line() {
        assert_eq!(split_line(r#"1,"open,still open"#), vec!["1", "open,still open"]);
    }

    #[test]
    fn test_rows_without_id_or_name_are_dropped() {
        let text = format!(
            "{}\n,missing id,,spam,2024-01-01,\n2,,no name,spam,2024-01-01,\n3,kept,,spam,2024-01-01,",
            HEADER
        );
        let records = decode(&text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "3");
    }

    #[test]
    fn test_ragged_rows() {
        let text = format!("{}\n1,short\n2,long,d,spam,2024,https://y,extra,more", HEADER);
        let records = decode(&text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "");
        assert_eq!(records[0].datetime, "");
        assert!(records[0].commit_link.is_none());
        assert_eq!(records[1].commit_link.as_deref(), Some("https://y"));
    }

    #[test]
    fn test_columns_matched_by_header_position() {
        let text = "id,datetime,problem_type,name,commit_link,description,PURL-link,PURL\n\
                    7,2023-05-02,ddos,some/repo,,Does things,pkg:x,pkg:y";
        let records = decode(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "some/repo");
        assert_eq!(records[0].datetime, "2023-05-02");
        assert_eq!(records[0].problem_type, "ddos");
        assert_eq!(records[0].description, "Does things");
        assert!(records[0].commit_link.is_none());
    }

    #[test]
    fn test_values_trimmed_and_crlf_tolerated() {
        let text = format!("{}\r\n 1 ,  name  , d ,spam,2024-01-01, https://z \r\n", HEADER);
        let records = decode(&text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].name, "name");
        assert_eq!(records[0].commit_link.as_deref(), Some("https://z"));
    }

    #[test]
    fn test_empty_and_header_only_input() {
        assert!(decode("").is_empty());
        assert!(decode("   \n  ").is_empty());
        assert!(decode(HEADER).is_empty());
    }

    #[test]
    fn test_byte_order_mark_ignored() {
        let text = format!("\u{feff}{}\n1,n,,spam,2024,", HEADER);
        assert_eq!(decode(&text).len(), 1);
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let text = format!("{}\n1,a,,spam,2024,\n\n2,b,,spam,2024,", HEADER);
        let ids: Vec<_> = decode(&text).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
