use std::path::{Path, PathBuf};
use toxic_repos::cli::{
    BrowseCommand, Cli, Commands, ConfigAction, ConvertAction, ModeArg, OutputFormat, BROWSE_HELP,
};
use toxic_repos::config::{Config, ConfigValidator};
use toxic_repos::convert;
use toxic_repos::error::{Result, ToxicError};
use toxic_repos::query::{Facets, FilterCriteria};
use toxic_repos::source::{Endpoints, HttpFetcher, Orchestrator};
use toxic_repos::view::{group_thousands, literal_text};
use toxic_repos::DataSourceMode;

fn main() {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::debug!("Command failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search {
            query,
            problem_type,
            date,
            mode,
            pages,
            format,
        } => {
            let criteria = FilterCriteria::new()
                .with_search(query.unwrap_or_default())
                .with_problem_type(problem_type.as_deref())
                .with_date_prefix(date.as_deref());
            cmd_search(cli.config, mode, criteria, pages, format)
        }
        Commands::Browse { mode } => cmd_browse(cli.config, mode),
        Commands::Stats { mode, json } => cmd_stats(cli.config, mode, json),
        Commands::Export {
            format,
            mode,
            output,
        } => cmd_export(cli.config, &format, mode, output),
        Commands::Convert { action } => cmd_convert(action),
        Commands::Config { action } => cmd_config(cli.config, action),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose {
        "toxic_repos=debug"
    } else {
        "toxic_repos=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| ToxicError::Io {
        source: e,
        context: "Failed to create tokio runtime".to_string(),
    })
}

fn orchestrator(config: &Config, mode: Option<ModeArg>) -> Result<Orchestrator<HttpFetcher>> {
    let fetcher = HttpFetcher::new(&config.http)?;
    let mode = mode
        .map(DataSourceMode::from)
        .unwrap_or(config.source.default_mode);
    Ok(Orchestrator::new(
        fetcher,
        Endpoints::from_config(&config.source),
        config.render_options(),
        mode,
    ))
}

fn cmd_search(
    config_path: Option<PathBuf>,
    mode: Option<ModeArg>,
    criteria: FilterCriteria,
    pages: usize,
    format: OutputFormat,
) -> Result<()> {
    let config = load_config(config_path)?;
    let mut orchestrator = orchestrator(&config, mode)?;

    runtime()?.block_on(orchestrator.load())?;
    orchestrator.apply_filters(criteria);
    for _ in 1..pages.max(1) {
        if orchestrator.next_page().is_none() {
            break;
        }
    }

    let view = orchestrator.view();
    match format {
        OutputFormat::Text => print!("{}", view.to_text()),
        OutputFormat::Html => print!("{}", view.to_html()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&view).map_err(|e| ToxicError::Json {
                source: e,
                context: "Failed to serialize results".to_string(),
            })?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_browse(config_path: Option<PathBuf>, mode: Option<ModeArg>) -> Result<()> {
    use tokio::io::{AsyncBufReadExt, BufReader};

    let config = load_config(config_path)?;
    let export_dir = config.export.output_dir.clone();
    let mut orchestrator = orchestrator(&config, mode)?;
    let rt = runtime()?;

    rt.block_on(async {
        // A failed initial load leaves an empty session that can still be reloaded with :mode.
        // The session records the error and the view prints it.
        if let Err(e) = orchestrator.load().await {
            tracing::debug!("Initial load failed: {:?}", e);
        }
        print!("{}", orchestrator.view().to_text());
        println!("{}", BROWSE_HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut criteria = orchestrator.session().criteria().clone();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    return Err(ToxicError::Io {
                        source: e,
                        context: "Failed to read input".to_string(),
                    })
                }
            };

            match BrowseCommand::parse(&line) {
                BrowseCommand::Search(term) => {
                    criteria = criteria.with_search(term);
                    print!("{}", orchestrator.apply_filters(criteria.clone()).to_text());
                }
                BrowseCommand::Type(problem_type) => {
                    criteria = criteria.with_problem_type(problem_type.as_deref());
                    print!("{}", orchestrator.apply_filters(criteria.clone()).to_text());
                }
                BrowseCommand::Date(prefix) => {
                    criteria = criteria.with_date_prefix(prefix.as_deref());
                    print!("{}", orchestrator.apply_filters(criteria.clone()).to_text());
                }
                BrowseCommand::Clear => {
                    criteria = FilterCriteria::default();
                    print!("{}", orchestrator.clear_filters().to_text());
                }
                BrowseCommand::Mode(mode) => {
                    if let Err(e) = orchestrator.set_mode(mode).await {
                        tracing::debug!("Mode switch failed: {:?}", e);
                    }
                    print!("{}", orchestrator.view().to_text());
                }
                BrowseCommand::More => match orchestrator.next_page() {
                    Some(cards) => {
                        for card in cards {
                            println!("{}\n", card.to_text());
                        }
                        if orchestrator.session().paginator().is_exhausted() {
                            println!("[No More Results]");
                        }
                    }
                    None => println!("[No More Results]"),
                },
                BrowseCommand::Export(format) => {
                    match orchestrator.export(&format, &export_dir).await {
                        Ok(Some(path)) => println!("Saved {}", path.display()),
                        Ok(None) => {}
                        Err(e) => println!("Export failed: {}", e),
                    }
                }
                BrowseCommand::Stats => print_stats(&orchestrator.facets()),
                BrowseCommand::Help => println!("{}", BROWSE_HELP),
                BrowseCommand::Quit => break,
                BrowseCommand::Invalid(message) => println!("{}", message),
            }
        }

        Ok(())
    })
}

fn cmd_stats(config_path: Option<PathBuf>, mode: Option<ModeArg>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let mut orchestrator = orchestrator(&config, mode)?;
    runtime()?.block_on(orchestrator.load())?;

    let facets = orchestrator.facets();
    if json {
        let json = serde_json::to_string_pretty(&facets).map_err(|e| ToxicError::Json {
            source: e,
            context: "Failed to serialize stats".to_string(),
        })?;
        println!("{}", json);
    } else {
        println!("Dataset: {}", orchestrator.mode());
        print_stats(&facets);
    }
    Ok(())
}

fn print_stats(facets: &Facets) {
    println!("Total records: {}", group_thousands(facets.total));
    println!("\nCategories:");
    for (category, count) in facets.categories_by_count() {
        println!("  {:<24} {:>8}", literal_text(category), group_thousands(count));
    }
    println!("\nYears:");
    for (year, count) in &facets.years {
        println!("  {:<24} {:>8}", year, group_thousands(*count));
    }
}

fn cmd_export(
    config_path: Option<PathBuf>,
    format: &str,
    mode: Option<ModeArg>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let output = output.unwrap_or_else(|| config.export.output_dir.clone());
    let orchestrator = orchestrator(&config, mode)?;

    if let Some(path) = runtime()?.block_on(orchestrator.export(format, &output))? {
        println!("✓ Saved {}", path.display());
    }
    Ok(())
}

fn cmd_convert(action: ConvertAction) -> Result<()> {
    let report = match action {
        ConvertAction::Csv { input, output_dir } => convert::csv_to_formats(&input, &output_dir)?,
        ConvertAction::Sqlite { input, output_dir } => {
            convert::sqlite_to_formats(&input, &output_dir)?
        }
    };

    println!("✓ Converted {} records", report.records);
    for path in &report.written {
        println!("  - {}", path.display());
    }
    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            let content = toml::to_string_pretty(&config)?;
            println!("{}", content);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            ConfigValidator::validate(&config)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            create_parent_dir(&path)?;
            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    Config::load_or_default(&path)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ToxicError::Io {
            source: e,
            context: format!("Failed to create config directory: {:?}", parent),
        })?;
    }
    Ok(())
}
