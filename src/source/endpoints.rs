// Remote locations of the published dataset files
use crate::config::SourceConfig;
use crate::dataset::DataSourceMode;
use std::fmt;

/// Stem shared by every published dataset file
const FILE_STEM: &str = "toxic-repos";

/// Downloadable dataset formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Sqlite,
}

impl ExportFormat {
    /// Parse a user-supplied format name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    /// Directory the format is published under
    pub fn directory(&self) -> &'static str {
        self.name()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Sqlite => "sqlite3",
        }
    }

    /// Name of the published file, e.g. `toxic-repos.sqlite3`
    pub fn remote_file_name(&self) -> String {
        format!("{}.{}", FILE_STEM, self.extension())
    }

    /// Name of the downloaded file, e.g. `toxic-repos-original.csv`
    pub fn download_file_name(&self, mode: DataSourceMode) -> String {
        format!("{}-{}.{}", FILE_STEM, mode, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// URL resolver for the search dataset and the export variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    original_dir: String,
    translated_dir: String,
}

impl Endpoints {
    pub fn new(
        base_url: impl Into<String>,
        original_dir: impl Into<String>,
        translated_dir: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            original_dir: original_dir.into().trim_matches('/').to_string(),
            translated_dir: translated_dir.into().trim_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.original_dir.clone(),
            config.translated_dir.clone(),
        )
    }

    fn mode_dir(&self, mode: DataSourceMode) -> &str {
        match mode {
            DataSourceMode::Original => &self.original_dir,
            DataSourceMode::Translated => &self.translated_dir,
        }
    }

    /// CSV the search interface loads
    pub fn dataset_url(&self, mode: DataSourceMode) -> String {
        self.export_url(ExportFormat::Csv, mode)
    }

    /// Download location of one export format
    pub fn export_url(&self, format: ExportFormat, mode: DataSourceMode) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            self.mode_dir(mode),
            format.directory(),
            format.remote_file_name()
        )
    }
}
