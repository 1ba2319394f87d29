//! Search session state
//!
//! Holds the selected mode, the loaded dataset, the active filter criteria,
//! the filtered view and the pagination cursor. Every change goes through a
//! named transition; fetches are tagged with tickets so that only the most
//! recently issued fetch may replace the dataset.

use crate::dataset::{DataSourceMode, Dataset, Record};
use crate::error::ToxicError;
use crate::query::{self, FilterCriteria};
use crate::view::{render, LoadMore, Paginator, RenderOptions, ResultsBody, ResultsView, NO_RESULTS};

/// Identifies one issued dataset fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    token: u64,
    mode: DataSourceMode,
}

impl FetchTicket {
    pub fn mode(&self) -> DataSourceMode {
        self.mode
    }
}

/// What happened when a fetch completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The dataset was replaced
    Applied { records: usize },
    /// A newer fetch was issued; the result was discarded
    Stale,
    /// The fetch failed; the previous dataset is kept
    Failed { message: String },
}

/// The single owner of all mutable search state
#[derive(Debug, Default)]
pub struct SearchSession {
    mode: DataSourceMode,
    loaded_mode: Option<DataSourceMode>,
    dataset: Dataset,
    criteria: FilterCriteria,
    filtered: Vec<usize>,
    paginator: Paginator,
    latest_token: u64,
    loading: bool,
    error: Option<String>,
}

impl SearchSession {
    pub fn new(mode: DataSourceMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> DataSourceMode {
        self.mode
    }

    /// Mode of the dataset currently held, if any was loaded
    pub fn loaded_mode(&self) -> Option<DataSourceMode> {
        self.loaded_mode
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// User-visible message of the last failed fetch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Select a data source and issue a fetch for it
    pub fn set_mode(&mut self, mode: DataSourceMode) -> FetchTicket {
        tracing::debug!(from = %self.mode, to = %mode, "Switching data source");
        self.mode = mode;
        self.begin_fetch()
    }

    /// Issue a fetch for the current mode; supersedes any outstanding fetch
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_token += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            token: self.latest_token,
            mode: self.mode,
        }
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.token == self.latest_token
    }

    /// Finish a fetch with the downloaded CSV text
    pub fn complete_success(&mut self, ticket: FetchTicket, csv_text: &str) -> FetchOutcome {
        if !self.is_current(&ticket) {
            tracing::debug!(token = ticket.token, latest = self.latest_token, "Discarding stale fetch");
            return FetchOutcome::Stale;
        }

        self.loading = false;
        self.dataset = Dataset::from_csv(csv_text);
        self.loaded_mode = Some(ticket.mode);
        self.refilter();

        tracing::info!(
            mode = %ticket.mode,
            records = self.dataset.len(),
            "Dataset loaded"
        );
        FetchOutcome::Applied {
            records: self.dataset.len(),
        }
    }

    /// Finish a fetch that failed; the current dataset stays in place
    pub fn complete_failure(&mut self, ticket: FetchTicket, error: &ToxicError) -> FetchOutcome {
        if !self.is_current(&ticket) {
            tracing::debug!(token = ticket.token, latest = self.latest_token, "Discarding stale fetch error");
            return FetchOutcome::Stale;
        }

        self.loading = false;
        let message = format!("Error loading data: {}", error);
        tracing::error!("{}", message);
        self.error = Some(message.clone());
        FetchOutcome::Failed { message }
    }

    /// Replace the filter criteria, recompute the filtered set and go back
    /// to the first page
    pub fn apply_filters(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    /// Drop every filter
    pub fn clear_filters(&mut self) {
        self.apply_filters(FilterCriteria::default());
    }

    fn refilter(&mut self) {
        self.filtered = query::filter(&self.dataset, &self.criteria);
        self.paginator.reset();
        tracing::debug!(
            total = self.dataset.len(),
            filtered = self.filtered.len(),
            "Filters applied"
        );
    }

    /// Reveal the next page; `None` when there is nothing more to show
    pub fn next_page(&mut self) -> Option<Vec<&Record>> {
        let range = self.paginator.advance(self.filtered.len())?;
        Some(self.records_at(&self.filtered[range]))
    }

    /// Records inside the current view window
    pub fn visible_records(&self) -> Vec<&Record> {
        let window = self.paginator.window(self.filtered.len());
        self.records_at(&self.filtered[window])
    }

    fn records_at(&self, indices: &[usize]) -> Vec<&Record> {
        indices
            .iter()
            .filter_map(|&index| self.dataset.get(index))
            .collect()
    }

    /// Describe the results panel for the current window
    pub fn view(&self, options: &RenderOptions) -> ResultsView {
        let filtered_count = self.filtered.len();
        let body = if filtered_count == 0 {
            ResultsBody::NoResults {
                message: NO_RESULTS.to_string(),
            }
        } else {
            ResultsBody::Cards {
                cards: render(self.visible_records(), options),
            }
        };
        let load_more = if filtered_count == 0 {
            LoadMore::Hidden
        } else {
            self.paginator.load_more(filtered_count)
        };

        ResultsView {
            total_count: self.dataset.len(),
            filtered_count,
            loading: self.loading,
            error: self.error.clone(),
            body,
            load_more,
        }
    }
}
