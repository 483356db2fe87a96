//! tabclip CLI
//!
//! Usage:
//!   tabclip [OPTIONS] [RECORDS]
//!
//! Options:
//!   -c, --config <FILE>      Configuration file (TOML format)
//!   -f, --format <NAME>      Named format from the configuration
//!   -t, --template <TEXT>    Template text, overriding --format
//!   --check                  Report syntax errors in the template
//!   --list-formats           List configured formats
//!   -h, --help               Print help

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{error, info, LevelFilter};

use tabclip::{check_template, format_records, load_records, Config, TabRecord};

#[derive(Parser, Debug)]
#[command(name = "tabclip")]
#[command(about = "Format browser tabs as clipboard text")]
struct Cli {
    /// Records file, JSON or TOML (reads JSON from stdin if not provided)
    records: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Named format from the configuration, by label or 1-based position
    #[arg(short, long, default_value = "1")]
    format: String,

    /// Template text, overriding --format
    #[arg(short, long)]
    template: Option<String>,

    /// Use CRLF line endings
    #[arg(long)]
    crlf: bool,

    /// Maximum placeholder nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Report syntax errors in the template and exit
    #[arg(long)]
    check: bool,

    /// List configured formats and exit
    #[arg(long)]
    list_formats: bool,

    /// Print the rich text flavor instead of plain text when available
    #[arg(long)]
    rich: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    if cli.list_formats {
        for (i, entry) in config.formats.iter().enumerate() {
            println!("{}. {}\t{}", i + 1, entry.label, entry.format);
        }
        return;
    }

    let template = match &cli.template {
        Some(text) => text.clone(),
        None => match config.format(&cli.format) {
            Ok(entry) => entry.format.clone(),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
    };
    info!(template = template.as_str(); "Selected template");

    let mut format_config = config.format_config();
    if cli.crlf {
        format_config = format_config.with_crlf(true);
    }
    if let Some(depth) = cli.max_depth {
        format_config = format_config.with_max_depth(depth);
    }

    if cli.check {
        if let Err(e) = check_template(&template, &format_config) {
            match e.as_parse() {
                Some(parse) => eprint!("{}", parse.format(&template, "<template>")),
                None => eprintln!("Error: {}", e),
            }
            process::exit(1);
        }
        println!("OK");
        return;
    }

    let records = match read_records(&cli) {
        Ok(records) => records,
        Err(message) => {
            error!(error = message.as_str(); "Failed to load records");
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    };
    info!(count = records.len(); "Loaded records");

    let formatted = format_records(&template, &records, &format_config);
    match (cli.rich, formatted.rich_text) {
        (true, Some(rich)) => println!("{}", rich),
        _ => print!("{}", formatted.plain_text),
    }
}

fn read_records(cli: &Cli) -> Result<Vec<TabRecord>, String> {
    if let Some(path) = &cli.records {
        return load_records(path).map_err(|e| format!("'{}': {}", path.display(), e));
    }

    if io::stdin().is_terminal() {
        return Err("no records file given and stdin is a terminal".to_string());
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("reading from stdin: {}", e))?;
    tabclip::record::records_from_json(&buffer).map_err(|e| e.to_string())
}
