// Pure rendering of records into result cards, plus text and HTML presentations.
//
// Every string taken from the dataset is treated as literal text: the terminal
// presentation drops control characters and the HTML presentation escapes
// markup characters in both text and attribute positions.

use super::pagination::LoadMore;
use crate::dataset::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_RESULTS: &str = "No results found. Try adjusting your search criteria.";
pub const INVALID_DATE: &str = "Invalid Date";
pub const LINK_LABEL: &str = "View Source";
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Presentation settings for cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// strftime pattern for the card date
    pub date_format: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// External evidence link on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLink {
    pub href: String,
    pub label: String,
}

/// Display model for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCard {
    pub name: String,
    /// Category with underscores shown as spaces
    pub category_label: String,
    /// Raw category tag, used as a styling hook
    pub category_class: String,
    pub description: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<CardLink>,
}

/// Result area: either a batch of cards or the empty-state message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsBody {
    NoResults { message: String },
    Cards { cards: Vec<ResultCard> },
}

/// Everything a front end needs to draw the results panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub total_count: usize,
    pub filtered_count: usize,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub body: ResultsBody,
    pub load_more: LoadMore,
}

/// Render a batch of records into cards
pub fn render<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    options: &RenderOptions,
) -> Vec<ResultCard> {
    records
        .into_iter()
        .map(|record| render_card(record, options))
        .collect()
}

pub fn render_card(record: &Record, options: &RenderOptions) -> ResultCard {
    let category = record.category();
    ResultCard {
        name: record.name.clone(),
        category_label: category.replace('_', " "),
        category_class: category.to_string(),
        description: if record.description.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            record.description.clone()
        },
        date: format_date(&record.datetime, &options.date_format),
        link: record.commit_link.as_ref().map(|href| CardLink {
            href: href.clone(),
            label: LINK_LABEL.to_string(),
        }),
    }
}

/// Format a dataset timestamp as a calendar date (UTC)
pub fn format_date(datetime: &str, pattern: &str) -> String {
    let Some(date) = parse_date(datetime.trim()) else {
        return INVALID_DATE.to_string();
    };

    let mut out = String::new();
    match write!(out, "{}", date.format(pattern)) {
        Ok(()) => out,
        Err(_) => INVALID_DATE.to_string(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Group digits in thousands, e.g. `12,345`
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Drop control characters so dataset text cannot drive the terminal
pub fn literal_text(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

/// Escape text for HTML content and quoted attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

impl ResultCard {
    /// Plain-text card for terminal output
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{}  [{}]\n  {}\n  {}",
            literal_text(&self.name),
            literal_text(&self.category_label),
            literal_text(&self.description),
            literal_text(&self.date),
        );
        if let Some(link) = &self.link {
            let _ = write!(out, "  {}: {}", link.label, literal_text(&link.href));
        }
        out
    }

    /// HTML fragment for one card
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "<div class=\"result-card\">");
        let _ = writeln!(out, "  <div class=\"result-header\">");
        let _ = writeln!(out, "    <div>");
        let _ = writeln!(
            out,
            "      <div class=\"result-name\">{}</div>",
            escape_html(&self.name)
        );
        let _ = writeln!(
            out,
            "      <div class=\"result-type {}\">{}</div>",
            escape_html(&self.category_class),
            escape_html(&self.category_label)
        );
        let _ = writeln!(out, "    </div>");
        let _ = writeln!(out, "  </div>");
        let _ = writeln!(
            out,
            "  <div class=\"result-description\">{}</div>",
            escape_html(&self.description)
        );
        let _ = writeln!(out, "  <div class=\"result-footer\">");
        let _ = writeln!(
            out,
            "    <div class=\"result-date\">{}</div>",
            escape_html(&self.date)
        );
        if let Some(link) = &self.link {
            let _ = writeln!(
                out,
                "    <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"result-link\">{}</a>",
                escape_html(&link.href),
                escape_html(&link.label)
            );
        }
        let _ = writeln!(out, "  </div>");
        let _ = writeln!(out, "</div>");
        out
    }
}

impl ResultsView {
    pub fn cards(&self) -> &[ResultCard] {
        match &self.body {
            ResultsBody::Cards { cards } => cards,
            ResultsBody::NoResults { .. } => &[],
        }
    }

    fn stats_line(&self) -> String {
        format!(
            "Total: {}  Showing: {}",
            group_thousands(self.total_count),
            group_thousands(self.filtered_count)
        )
    }

    fn load_more_label(&self) -> Option<&'static str> {
        match self.load_more {
            LoadMore::Hidden => None,
            LoadMore::Available => Some("Load More"),
            LoadMore::Exhausted => Some("No More Results"),
        }
    }

    /// Terminal presentation of the whole panel
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.loading {
            let _ = writeln!(out, "Loading...");
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "{}", literal_text(error));
        }
        let _ = writeln!(out, "{}", self.stats_line());
        let _ = writeln!(out);

        match &self.body {
            ResultsBody::NoResults { message } => {
                let _ = writeln!(out, "{}", message);
            }
            ResultsBody::Cards { cards } => {
                for card in cards {
                    let _ = writeln!(out, "{}", card.to_text());
                    let _ = writeln!(out);
                }
            }
        }

        if let Some(label) = self.load_more_label() {
            let _ = writeln!(out, "[{}]", label);
        }
        out
    }

    /// HTML presentation of the whole panel
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(error) = &self.error {
            let _ = writeln!(
                out,
                "<div class=\"error-message\">{}</div>",
                escape_html(error)
            );
        }
        let _ = writeln!(
            out,
            "<div class=\"stats\"><span id=\"totalCount\">{}</span> <span id=\"filteredCount\">{}</span></div>",
            group_thousands(self.total_count),
            group_thousands(self.filtered_count)
        );
        let _ = writeln!(out, "<div id=\"results\">");
        match &self.body {
            ResultsBody::NoResults { message } => {
                let _ = writeln!(out, "<div class=\"no-results\">{}</div>", escape_html(message));
            }
            ResultsBody::Cards { cards } => {
                for card in cards {
                    out.push_str(&card.to_html());
                }
            }
        }
        let _ = writeln!(out, "</div>");
        if let Some(label) = self.load_more_label() {
            let disabled = if self.load_more == LoadMore::Exhausted {
                " disabled"
            } else {
                ""
            };
            let _ = writeln!(out, "<button id=\"loadMoreBtn\"{}>{}</button>", disabled, label);
        }
        out
    }
}
