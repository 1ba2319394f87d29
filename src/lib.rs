//! toxic-repos - search and export for the toxic-repos dataset
//!
//! Fetches the published CSV of flagged software repositories, decodes it,
//! filters it by free text, category and date, pages through the results and
//! renders them as cards. The raw dataset can be downloaded as CSV, JSON or
//! SQLite, and local copies converted between those formats.

pub mod cli;
pub mod config;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod query;
pub mod session;
pub mod source;
pub mod view;

pub use dataset::{DataSourceMode, Dataset, Record};
pub use error::{Result, ToxicError};
pub use query::{Facets, FilterCriteria};
pub use session::SearchSession;
pub use source::{Endpoints, ExportFormat, Fetcher, HttpFetcher, Orchestrator};
