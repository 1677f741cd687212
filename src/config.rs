// Command-line configuration for Templar
// Uses clap for argument parsing

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Everything one template-preparation run is driven by.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Bundle of previously captured requests
    pub requests_file: Option<PathBuf>,
    /// Files (or directories of files) with one raw HTTP request each
    pub raw_requests: Vec<PathBuf>,
    /// File with one URL per line
    pub urls_file: Option<PathBuf>,
    pub urls: Vec<String>,
    pub method: Option<String>,
    /// Body fragments, joined with `&`
    pub data: Vec<String>,
    /// `"Key: Value"` header overrides
    pub headers: Vec<String>,
    pub params_file: Option<PathBuf>,
    pub params_split: usize,
    pub params_method: String,
    pub params_encoding: String,
    pub output: Option<PathBuf>,
    pub log_level: String,
}

pub fn build_cli() -> Command {
    Command::new("templar")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Jake Abendroth")
        .about("Builds scan templates from captured requests, raw requests, URL lists or inline options")
        .after_help("EXAMPLES:\n  templar --requests-file previous_scan.json\n  templar -r login.req -r search.req --params-file params.txt --params-split 10\n  templar -u https://example.com/search -X POST -d q=1 -H 'X-Api-Key: abc'\n  templar --urls-file urls.txt --params-file params.txt --params-method POST --params-encoding json")
        .arg(Arg::new("requests_file")
            .long("requests-file")
            .num_args(1)
            .value_parser(clap::value_parser!(PathBuf))
            .help("Bundle of previously captured requests"))
        .arg(Arg::new("raw_request")
            .short('r')
            .long("raw-request")
            .action(ArgAction::Append)
            .value_parser(clap::value_parser!(PathBuf))
            .help("File with one raw HTTP request, or a directory of them (repeatable)"))
        .arg(Arg::new("urls_file")
            .long("urls-file")
            .num_args(1)
            .value_parser(clap::value_parser!(PathBuf))
            .help("File with one URL per line; invalid lines are skipped"))
        .arg(Arg::new("url")
            .short('u')
            .long("url")
            .action(ArgAction::Append)
            .help("Target URL (repeatable)"))
        .arg(Arg::new("method")
            .short('X')
            .long("method")
            .num_args(1)
            .help("HTTP method for URL targets"))
        .arg(Arg::new("data")
            .short('d')
            .long("data")
            .action(ArgAction::Append)
            .help("Request body data for URL targets, joined with '&' (repeatable)"))
        .arg(Arg::new("header")
            .short('H')
            .long("header")
            .action(ArgAction::Append)
            .help("Header for URL targets, as 'Key: Value' (repeatable)"))
        .arg(Arg::new("params_file")
            .long("params-file")
            .num_args(1)
            .value_parser(clap::value_parser!(PathBuf))
            .help("File with one parameter name per line"))
        .arg(Arg::new("params_split")
            .long("params-split")
            .num_args(1)
            .default_value("0")
            .value_parser(clap::value_parser!(usize))
            .help("Parameters per template (0: all in one)"))
        .arg(Arg::new("params_method")
            .long("params-method")
            .num_args(1)
            .help("HTTP method for templates carrying extra parameters"))
        .arg(Arg::new("params_encoding")
            .long("params-encoding")
            .num_args(1)
            .default_value("url")
            .help("Body encoding for extra parameters: url or json"))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .num_args(1)
            .value_parser(clap::value_parser!(PathBuf))
            .help("Templates output file (default: templar_templates_<timestamp>.jsonl)"))
        .arg(Arg::new("log_level")
            .long("log-level")
            .num_args(1)
            .default_value("info")
            .help("Log level when RUST_LOG is unset"))
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let paths = |id: &str| -> Vec<PathBuf> {
            matches.get_many::<PathBuf>(id).map(|v| v.cloned().collect()).unwrap_or_default()
        };
        let strings = |id: &str| -> Vec<String> {
            matches.get_many::<String>(id).map(|v| v.cloned().collect()).unwrap_or_default()
        };
        let string = |id: &str| matches.get_one::<String>(id).cloned();

        Self {
            requests_file: matches.get_one::<PathBuf>("requests_file").cloned(),
            raw_requests: paths("raw_request"),
            urls_file: matches.get_one::<PathBuf>("urls_file").cloned(),
            urls: strings("url"),
            method: string("method"),
            data: strings("data"),
            headers: strings("header"),
            params_file: matches.get_one::<PathBuf>("params_file").cloned(),
            params_split: matches.get_one::<usize>("params_split").copied().unwrap_or(0),
            params_method: string("params_method").unwrap_or_default(),
            params_encoding: string("params_encoding").unwrap_or_default(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            log_level: string("log_level").unwrap_or_else(|| "info".to_string()),
        }
    }
}
