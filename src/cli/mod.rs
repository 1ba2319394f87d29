//! CLI command definitions and parsing
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod browse;

pub use browse::{BrowseCommand, BROWSE_HELP};

#[derive(Parser, Debug)]
#[command(
    name = "toxic-repos",
    version,
    about = "Search, filter and export the toxic-repos dataset",
    long_about = "toxic-repos fetches the published dataset of flagged software repositories, \
                  lets you filter it by free text, category and date, pages through the results, \
                  and downloads the raw dataset as CSV, JSON or SQLite."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/toxic-repos/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Dataset variant selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Original,
    Translated,
}

impl From<ModeArg> for crate::dataset::DataSourceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Original => Self::Original,
            ModeArg::Translated => Self::Translated,
        }
    }
}

/// Result output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the dataset and print matching records
    Search {
        /// Free-text search over name, description and category
        query: Option<String>,

        /// Only show records with this exact problem type
        #[arg(short = 't', long = "type", value_name = "PROBLEM_TYPE")]
        problem_type: Option<String>,

        /// Only show records whose timestamp starts with this prefix (e.g. 2024-03)
        #[arg(short, long, value_name = "PREFIX")]
        date: Option<String>,

        /// Dataset variant (defaults to the configured mode)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Number of pages of 20 results to show
        #[arg(short, long, default_value = "1")]
        pages: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Interactive search session
    Browse {
        /// Dataset variant to start with
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Show record counts per category and period
    Stats {
        /// Dataset variant
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Download the raw dataset (csv, json or sqlite)
    Export {
        /// Format to download
        format: String,

        /// Dataset variant
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Directory to write into (defaults to the configured export directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Convert a local dataset between formats
    Convert {
        #[command(subcommand)]
        action: ConvertAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConvertAction {
    /// CSV file to json/ and sqlite/ variants
    Csv {
        /// Input CSV file
        input: PathBuf,

        /// Output directory
        output_dir: PathBuf,
    },

    /// SQLite database to csv/ and json/ variants
    Sqlite {
        /// Input database containing a `repos` table
        input: PathBuf,

        /// Output directory
        output_dir: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::try_parse_from([
            "toxic-repos",
            "search",
            "miner",
            "--type",
            "malware",
            "--date",
            "2024-03",
            "--mode",
            "original",
            "--pages",
            "2",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                query,
                problem_type,
                date,
                mode,
                pages,
                format,
            } => {
                assert_eq!(query.as_deref(), Some("miner"));
                assert_eq!(problem_type.as_deref(), Some("malware"));
                assert_eq!(date.as_deref(), Some("2024-03"));
                assert_eq!(mode, Some(ModeArg::Original));
                assert_eq!(pages, 2);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_export_accepts_any_format_name() {
        let cli = Cli::try_parse_from(["toxic-repos", "export", "xml"]).unwrap();
        assert!(matches!(cli.command, Commands::Export { format, .. } if format == "xml"));
    }
}
