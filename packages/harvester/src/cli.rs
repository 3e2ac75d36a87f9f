//! Command-line interface for the harvester.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use oxrdf::Graph;

use crate::config::{
    CatalogEndpoint, HarvesterConfig, DEFAULT_PAGE_SIZE, DEFAULT_STYLESHEET, DEFAULT_XSLTPROC,
    ENV_STYLESHEET, ENV_TIMEOUT_SECS, ENV_XSLTPROC, HTTP_TIMEOUT_SECS,
};
use crate::document::DocumentTransformer;
use crate::error::{error_chain, Result};
use crate::harvester::{harvest_catalog, transform_single, HarvestObserver, RecordFailure};
use crate::http::create_client;
use crate::rdf::{write_graph, RdfFormat};
use crate::transform::XsltprocTransform;

/// Harvest ISO 19139 metadata and convert it to DCAT-AP RDF.
#[derive(Parser)]
#[command(name = "dcat-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by all subcommands.
#[derive(Args)]
pub struct GlobalOptions {
    /// ISO 19139 to DCAT-AP XSLT stylesheet
    #[arg(long, global = true, env = ENV_STYLESHEET, default_value = DEFAULT_STYLESHEET)]
    pub stylesheet: PathBuf,

    /// XSLT processor executable
    #[arg(long, global = true, env = ENV_XSLTPROC, default_value = DEFAULT_XSLTPROC)]
    pub xsltproc: PathBuf,

    /// Output RDF syntax
    #[arg(short, long, global = true, value_enum, default_value_t = RdfFormat::Turtle)]
    pub format: RdfFormat,

    /// Write the graph to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform a single ISO 19115 document.
    Single {
        /// ISO19115 URL
        url: String,
    },

    /// Harvest all published records of a GeoNetwork catalog.
    Gn {
        /// GeoNetwork server URL
        #[arg(value_name = "server-url")]
        server_url: String,

        /// Records per search request
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let page_size = match &cli.command {
        Commands::Gn { page_size, .. } => *page_size,
        Commands::Single { .. } => DEFAULT_PAGE_SIZE,
    };
    let config = HarvesterConfig::builder()
        .stylesheet(&cli.options.stylesheet)
        .xsltproc(&cli.options.xsltproc)
        .timeout_secs(cli.options.timeout)
        .page_size(page_size)
        .build()?;

    let transform = XsltprocTransform::from_config(&config)?;
    tracing::debug!(stylesheet = %transform.stylesheet().display(), "using stylesheet");
    let client = create_client(config.timeout_secs)?;
    let transformer = DocumentTransformer::new(client, transform);

    let graph = match &cli.command {
        Commands::Single { url } => single_command(&transformer, url)?,
        Commands::Gn { server_url, .. } => gn_command(&transformer, server_url, &config)?,
    };

    emit(&graph, cli.options.format, cli.options.output.as_deref())
}

/// Execute the single command.
fn single_command(transformer: &DocumentTransformer<XsltprocTransform>, url: &str) -> Result<Graph> {
    let pb = spinner();
    pb.set_message(format!("Transforming {url}"));

    let result = transform_single(transformer, url);
    pb.finish_and_clear();
    result
}

/// Execute the gn (GeoNetwork harvest) command.
fn gn_command(
    transformer: &DocumentTransformer<XsltprocTransform>,
    server_url: &str,
    config: &HarvesterConfig,
) -> Result<Graph> {
    let endpoint = CatalogEndpoint::parse(server_url)?;

    let mut observer = CliObserver::new(spinner());
    observer.pb.set_message(format!("Searching {endpoint}"));

    let report = harvest_catalog(transformer, &endpoint, config.page_size, &mut observer);
    observer.pb.finish_and_clear();
    let report = report?;

    eprintln!(
        "{} {} of {} records{}",
        style("Harvested").green().bold(),
        report.transformed,
        report.discovered,
        if report.failures.is_empty() {
            String::new()
        } else {
            format!(", {}", style(format!("{} failed", report.failures.len())).yellow().bold())
        }
    );

    Ok(report.graph)
}

/// Write the graph to a file or stdout.
fn emit(graph: &Graph, format: RdfFormat, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            write_graph(graph, format, file)?.flush()?;
        }
        None => {
            let stdout = BufWriter::new(io::stdout().lock());
            write_graph(graph, format, stdout)?.flush()?;
        }
    }
    Ok(())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Prints skipped records to stderr as they happen and keeps the spinner current.
struct CliObserver {
    pb: ProgressBar,
    total: usize,
}

impl CliObserver {
    fn new(pb: ProgressBar) -> Self {
        Self { pb, total: 0 }
    }
}

impl HarvestObserver for CliObserver {
    fn on_discovered(&mut self, count: usize) {
        self.total = count;
    }

    fn on_record(&mut self, index: usize, url: &str) {
        self.pb
            .set_message(format!("[{}/{}] {url}", index + 1, self.total));
    }

    fn on_failure(&mut self, failure: &RecordFailure) {
        self.pb.suspend(|| {
            eprintln!(
                "{} {}\n  {}",
                style("Skipped").yellow().bold(),
                failure.url,
                error_chain(&failure.error)
            );
        });
    }
}
