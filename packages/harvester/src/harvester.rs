//! Harvest orchestration: discovery plus per-record transformation.

use oxrdf::Graph;

use crate::config::CatalogEndpoint;
use crate::discovery::find_datasets;
use crate::document::DocumentTransformer;
use crate::error::{error_chain, HarvesterError, Result};
use crate::transform::Transform;

/// A record that could not be transformed and was skipped.
#[derive(Debug)]
pub struct RecordFailure {
    /// Fetch URL of the record.
    pub url: String,
    /// Why it failed.
    pub error: HarvesterError,
}

/// Outcome of a catalog harvest.
#[derive(Debug)]
pub struct HarvestReport {
    /// Triples of every successfully transformed record.
    pub graph: Graph,
    /// Number of records found by discovery.
    pub discovered: usize,
    /// Number of records merged into the graph.
    pub transformed: usize,
    /// Records that were skipped, in processing order.
    pub failures: Vec<RecordFailure>,
}

/// Receives progress events during a harvest.
///
/// All methods default to doing nothing.
pub trait HarvestObserver {
    /// Discovery finished with `count` records.
    fn on_discovered(&mut self, _count: usize) {}

    /// Record `index` (zero based) is about to be processed.
    fn on_record(&mut self, _index: usize, _url: &str) {}

    /// A record failed and will be skipped. Called as it happens.
    fn on_failure(&mut self, _failure: &RecordFailure) {}
}

impl HarvestObserver for () {}

/// Transform a single document into a fresh graph.
///
/// Every failure is returned to the caller.
pub fn transform_single<T: Transform>(
    transformer: &DocumentTransformer<T>,
    url: &str,
) -> Result<Graph> {
    transformer.transform(url)
}

/// Harvest all published records of a catalog into one graph.
///
/// Discovery errors abort the harvest. Per-record errors that only concern
/// that record (see [`HarvesterError::is_recoverable`]) are reported to the
/// observer as they happen, collected in the report and skipped; any other
/// error aborts the harvest.
///
/// # Arguments
/// * `transformer` - Document transformer; its HTTP client is used for discovery too
/// * `endpoint` - Normalized catalog endpoint
/// * `page_size` - Search page size
/// * `observer` - Progress and failure callbacks
pub fn harvest_catalog<T, O>(
    transformer: &DocumentTransformer<T>,
    endpoint: &CatalogEndpoint,
    page_size: usize,
    observer: &mut O,
) -> Result<HarvestReport>
where
    T: Transform,
    O: HarvestObserver + ?Sized,
{
    let urls = find_datasets(transformer.client(), endpoint, page_size)?;
    observer.on_discovered(urls.len());

    let mut graph = Graph::new();
    let mut transformed = 0;
    let mut failures = Vec::new();

    for (index, url) in urls.iter().enumerate() {
        observer.on_record(index, url);

        match transformer.transform_into(url, &mut graph) {
            Ok(_) => transformed += 1,
            Err(error) if error.is_recoverable() => {
                tracing::debug!(url = %url, error = %error_chain(&error), "skipping record");
                let failure = RecordFailure {
                    url: url.clone(),
                    error,
                };
                observer.on_failure(&failure);
                failures.push(failure);
            }
            Err(error) => return Err(error),
        }
    }

    tracing::info!(
        endpoint = %endpoint,
        discovered = urls.len(),
        transformed,
        failed = failures.len(),
        triples = graph.len(),
        "harvest finished"
    );

    Ok(HarvestReport {
        graph,
        discovered: urls.len(),
        transformed,
        failures,
    })
}
