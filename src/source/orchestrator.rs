// Drives fetch -> decode -> filter -> render for one search session
use super::endpoints::{Endpoints, ExportFormat};
use super::fetcher::Fetcher;
use crate::dataset::DataSourceMode;
use crate::error::{Result, ToxicError};
use crate::query::{Facets, FilterCriteria};
use crate::session::{FetchOutcome, FetchTicket, SearchSession};
use crate::view::{render, RenderOptions, ResultCard, ResultsView};
use std::path::{Path, PathBuf};

/// Owns the session and the fetcher; the only place session state changes
pub struct Orchestrator<F: Fetcher> {
    fetcher: F,
    endpoints: Endpoints,
    render_options: RenderOptions,
    session: SearchSession,
}

impl<F: Fetcher> Orchestrator<F> {
    pub fn new(
        fetcher: F,
        endpoints: Endpoints,
        render_options: RenderOptions,
        mode: DataSourceMode,
    ) -> Self {
        Self {
            fetcher,
            endpoints,
            render_options,
            session: SearchSession::new(mode),
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn mode(&self) -> DataSourceMode {
        self.session.mode()
    }

    /// Fetch the dataset for the current mode.
    ///
    /// On failure the error is recorded in the session (previous results stay
    /// visible) and also returned.
    pub async fn load(&mut self) -> Result<FetchOutcome> {
        let ticket = self.session.begin_fetch();
        self.finish(ticket).await
    }

    /// Switch data source and fetch its dataset
    pub async fn set_mode(&mut self, mode: DataSourceMode) -> Result<FetchOutcome> {
        let ticket = self.session.set_mode(mode);
        self.finish(ticket).await
    }

    async fn finish(&mut self, ticket: FetchTicket) -> Result<FetchOutcome> {
        let url = self.endpoints.dataset_url(ticket.mode());
        tracing::info!("Loading {} dataset from {}", ticket.mode(), url);

        match self.fetcher.fetch_text(&url).await {
            Ok(text) => Ok(self.session.complete_success(ticket, &text)),
            Err(e) => match self.session.complete_failure(ticket, &e) {
                FetchOutcome::Stale => Ok(FetchOutcome::Stale),
                _ => Err(e),
            },
        }
    }

    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> ResultsView {
        self.session.apply_filters(criteria);
        self.view()
    }

    pub fn clear_filters(&mut self) -> ResultsView {
        self.session.clear_filters();
        self.view()
    }

    /// Cards for the next page, or `None` when no more results exist
    pub fn next_page(&mut self) -> Option<Vec<ResultCard>> {
        let Self {
            session,
            render_options,
            ..
        } = self;
        session
            .next_page()
            .map(|records| render(records, render_options))
    }

    pub fn view(&self) -> ResultsView {
        self.session.view(&self.render_options)
    }

    pub fn facets(&self) -> Facets {
        Facets::from_dataset(self.session.dataset())
    }

    /// Download one export variant of the current mode into `output_dir`.
    ///
    /// Unknown format names do nothing and yield `Ok(None)`.
    pub async fn export(&self, format: &str, output_dir: &Path) -> Result<Option<PathBuf>> {
        let Some(format) = ExportFormat::parse(format) else {
            tracing::debug!("Ignoring unsupported export format {:?}", format);
            return Ok(None);
        };
        self.export_format(format, output_dir).await.map(Some)
    }

    pub async fn export_format(&self, format: ExportFormat, output_dir: &Path) -> Result<PathBuf> {
        let mode = self.session.mode();
        let url = self.endpoints.export_url(format, mode);
        let target = output_dir.join(format.download_file_name(mode));

        tracing::info!("Exporting {} ({}) to {}", format, mode, target.display());
        let bytes = self.fetcher.fetch_bytes(&url).await?;

        std::fs::create_dir_all(output_dir).map_err(|e| ToxicError::Io {
            source: e,
            context: format!("Failed to create export directory: {}", output_dir.display()),
        })?;
        std::fs::write(&target, &bytes).map_err(|e| ToxicError::Io {
            source: e,
            context: format!("Failed to write export file: {}", target.display()),
        })?;

        tracing::info!(bytes = bytes.len(), "Export written");
        Ok(target)
    }
}
