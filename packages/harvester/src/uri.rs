//! Resource and metadata URI derivation.
//!
//! Both URIs end up as subjects in the generated graph and act as persistent
//! identifiers, so the derivation must not drift.

use std::sync::LazyLock;

use regex::Regex;

/// Fragment identifying the metadata record of a resource.
pub const METADATA_FRAGMENT: &str = "#metadata";

/// Trailing renderer segment of a record fetch URL.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FORMATTER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/formatters/[^/]+$").expect("valid regex"));

/// URIs handed to the transform for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUris {
    /// URI of the described resource (dataset, service, ...).
    pub resource: String,
    /// URI of the metadata record describing it.
    pub metadata: String,
}

impl RecordUris {
    /// Derive both URIs from a record fetch URL.
    ///
    /// # Examples
    /// ```
    /// use dcat_harvester::uri::RecordUris;
    ///
    /// let uris = RecordUris::from_fetch_url("https://host/srv/api/records/abc/formatters/xml");
    /// assert_eq!(uris.resource, "https://host/srv/api/records/abc");
    /// assert_eq!(uris.metadata, "https://host/srv/api/records/abc#metadata");
    /// ```
    pub fn from_fetch_url(fetch_url: &str) -> Self {
        let resource = resource_uri(fetch_url);
        let metadata = metadata_uri(&resource);
        Self { resource, metadata }
    }
}

/// Strip a trailing `/formatters/<name>` segment.
pub fn resource_uri(fetch_url: &str) -> String {
    FORMATTER_SUFFIX.replace(fetch_url, "").into_owned()
}

/// Replace any fragment of `resource_uri` with `#metadata`.
pub fn metadata_uri(resource_uri: &str) -> String {
    let without_fragment = resource_uri
        .split_once('#')
        .map_or(resource_uri, |(base, _)| base);
    format!("{without_fragment}{METADATA_FRAGMENT}")
}
