use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::data::country::CountryRecord;
use crate::data::loader::{load, LoadError};
use crate::data::source::{
    DatasetSource, FileDatasetSource, HttpDatasetSource, DEFAULT_DATASET_URL,
};
use crate::data::validate::{validate_dataset, Severity};
use crate::server::page_store::static_paths;
use crate::server::{self, ServerConfig, DEFAULT_BIND_ADDR};

#[derive(Parser, Debug)]
#[command(name = "holiday-planner")]
#[command(about = "Countries and their public holidays as a JSON API and HTML pages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the API and the pages
    Serve(ServeArgs),
    /// Check the dataset for duplicate keys and unreadable dates
    Validate(SourceArgs),
    /// Print every prerendered page path
    Routes(SourceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// URL of the dataset document
    #[arg(long, env = "HOLIDAY_PLANNER_DATASET_URL", default_value = DEFAULT_DATASET_URL)]
    pub dataset_url: String,

    /// Read the dataset from this file instead of the URL
    #[arg(long, env = "HOLIDAY_PLANNER_DATASET_FILE")]
    pub dataset_file: Option<PathBuf>,

    /// Give up on the dataset request after this many seconds
    #[arg(long, env = "HOLIDAY_PLANNER_FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,
}

impl SourceArgs {
    pub fn build_source(&self) -> Result<Arc<dyn DatasetSource>, LoadError> {
        match &self.dataset_file {
            Some(path) => Ok(Arc::new(FileDatasetSource::new(path.clone()))),
            None => Ok(Arc::new(HttpDatasetSource::new(
                self.dataset_url.clone(),
                Duration::from_secs(self.fetch_timeout_secs),
            )?)),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Address to listen on
    #[arg(long, env = "HOLIDAY_PLANNER_BIND", default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,

    /// Seconds before prerendered pages are regenerated
    #[arg(long, env = "HOLIDAY_PLANNER_REVALIDATE_SECS", default_value_t = 600)]
    pub revalidate_secs: u64,
}

/// Parse `args` (program name first) and run the command. Returns the process exit code.
pub async fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => run(cli).await,
        Err(err) => {
            let _ = err.print();
            err.exit_code()
        }
    }
}

pub async fn run(cli: Cli) -> i32 {
    match cli.command {
        Command::Serve(args) => handle_serve(args).await,
        Command::Validate(args) => handle_validate(args).await,
        Command::Routes(args) => handle_routes(args).await,
    }
}

async fn handle_serve(args: ServeArgs) -> i32 {
    let source = match args.source.build_source() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("invalid dataset source: {err}");
            return 1;
        }
    };
    let config = ServerConfig {
        bind_addr: args.bind,
        revalidate: Duration::from_secs(args.revalidate_secs),
    };
    match server::run_server(source, config).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err:#}");
            1
        }
    }
}

async fn handle_validate(args: SourceArgs) -> i32 {
    let countries = match load_from(&args).await {
        Ok(countries) => countries,
        Err(err) => {
            eprintln!("failed to load dataset: {err}");
            return 1;
        }
    };

    let report = validate_dataset(&countries);
    for finding in &report.findings {
        println!("{finding}");
    }

    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s)",
            report.count(Severity::Error)
        );
        1
    } else {
        println!(
            "validation passed: countries={}, warnings={}",
            countries.len(),
            report.count(Severity::Warning)
        );
        0
    }
}

async fn handle_routes(args: SourceArgs) -> i32 {
    match load_from(&args).await {
        Ok(countries) => {
            for path in static_paths(&countries) {
                println!("{path}");
            }
            0
        }
        Err(err) => {
            eprintln!("failed to load dataset: {err}");
            1
        }
    }
}

async fn load_from(args: &SourceArgs) -> Result<Vec<CountryRecord>, LoadError> {
    let source = args.build_source()?;
    load(source.as_ref()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["holiday-planner", "serve"]).expect("serve should parse");
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.revalidate_secs, 600);
        assert_eq!(args.source.fetch_timeout_secs, 30);
    }

    #[test]
    fn dataset_file_selects_local_source() {
        let cli = Cli::try_parse_from([
            "holiday-planner",
            "routes",
            "--dataset-file",
            "tests/fixtures/dataset.json",
        ])
        .expect("routes should parse");
        let Command::Routes(args) = cli.command else {
            panic!("expected routes");
        };
        let source = args.build_source().expect("file source builds");
        assert_eq!(source.describe(), "tests/fixtures/dataset.json");
    }

    #[test]
    fn missing_subcommand_is_a_usage_error() {
        let err = Cli::try_parse_from(["holiday-planner"]).expect_err("subcommand is required");
        assert_eq!(err.exit_code(), 2);
    }
}
