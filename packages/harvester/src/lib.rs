//! DCAT harvester - Convert ISO 19139 catalog metadata to DCAT-AP RDF.
//!
//! This crate fetches ISO 19115/19139 metadata records from a GeoNetwork
//! catalog, runs them through an ISO 19139 to DCAT-AP stylesheet and merges
//! the resulting RDF into one graph.
//!
//! # Example
//!
//! ```
//! use dcat_harvester::config::CatalogEndpoint;
//! use dcat_harvester::uri::RecordUris;
//!
//! let endpoint = CatalogEndpoint::parse("https://example.org/geonetwork").unwrap();
//! let url = endpoint.record_url("abc");
//! assert_eq!(url, "https://example.org/geonetwork/srv/api/records/abc/formatters/xml");
//!
//! let uris = RecordUris::from_fetch_url(&url);
//! assert_eq!(uris.metadata, "https://example.org/geonetwork/srv/api/records/abc#metadata");
//! ```
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`config`]: Constants, catalog endpoint handling and runtime settings
//! - [`error`]: Error types and Result alias
//! - [`http`]: Blocking HTTP client helpers
//! - [`xml`]: Character decoding, hardened XML parsing and the `gco:LocalName` fixup
//! - [`uri`]: Resource and metadata URI derivation
//! - [`transform`]: The stylesheet transform and its `xsltproc` implementation
//! - [`rdf`]: Reading RDF/XML, merging and serializing graphs
//! - [`discovery`]: Paginated record discovery through the search API
//! - [`document`]: Per-record fetch, fix, transform and parse
//! - [`harvester`]: Single-document and whole-catalog entry points
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod discovery;
pub mod document;
pub mod error;
pub mod harvester;
pub mod http;
pub mod rdf;
pub mod transform;
pub mod uri;
pub mod xml;

// Re-export main functions
pub use harvester::{harvest_catalog, transform_single};

// Re-export commonly used items
pub use config::{CatalogEndpoint, HarvesterConfig};
pub use document::DocumentTransformer;
pub use error::{HarvesterError, Result};
pub use harvester::{HarvestObserver, HarvestReport, RecordFailure};
pub use rdf::RdfFormat;
pub use transform::{Transform, XsltprocTransform};
pub use uri::RecordUris;
