//! Data source orchestration
//!
//! Resolves where each dataset variant lives, fetches it through the
//! [`Fetcher`] seam, and drives the search session from the result. Exports
//! bypass decoding entirely and download the published file as-is.

mod endpoints;
mod fetcher;
mod orchestrator;

pub use endpoints::{Endpoints, ExportFormat};
pub use fetcher::{Fetcher, HttpFetcher};
pub use orchestrator::Orchestrator;
