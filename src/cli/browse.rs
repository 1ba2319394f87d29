// Line commands of the interactive browse loop
use crate::dataset::DataSourceMode;

pub const BROWSE_HELP: &str = "\
Type text to search name, description and category. Commands:
  :type <problem_type|any>   filter by exact category
  :date <prefix|any>         filter by timestamp prefix (e.g. 2024-03)
  :clear                     drop all filters
  :mode <original|translated> switch dataset and reload
  :more                      show the next page
  :export <csv|json|sqlite>  download the raw dataset
  :stats                     counts per category
  :help                      this text
  :quit                      leave";

/// One parsed line of browse input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Replace the search term (may be empty)
    Search(String),
    /// `None` means any category
    Type(Option<String>),
    /// `None` means any date
    Date(Option<String>),
    Clear,
    Mode(DataSourceMode),
    More,
    Export(String),
    Stats,
    Help,
    Quit,
    /// Unrecognized command, with a message for the user
    Invalid(String),
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Self::Search(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "type" | "t" => Self::Type(any_or(arg)),
            "date" | "d" => Self::Date(any_or(arg)),
            "clear" | "c" => Self::Clear,
            "mode" | "m" => match arg.parse() {
                Ok(mode) => Self::Mode(mode),
                Err(message) => Self::Invalid(message),
            },
            "more" | "n" => Self::More,
            "export" | "e" => Self::Export(arg.to_string()),
            "stats" | "s" => Self::Stats,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command ':{}' (try :help)", other)),
        }
    }
}

fn any_or(arg: &str) -> Option<String> {
    if arg.is_empty() || arg.eq_ignore_ascii_case("any") {
        None
    } else {
        Some(arg.to_string())
    }
}
