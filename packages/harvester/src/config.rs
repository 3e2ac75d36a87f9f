//! Configuration constants, catalog URL handling and runtime settings.

use std::path::PathBuf;

use url::Url;

use crate::error::{HarvesterError, Result};

/// Service root segment every GeoNetwork API path lives under.
pub const SERVICE_ROOT: &str = "srv/";

/// Search endpoint, relative to the catalog endpoint.
pub const SEARCH_PATH: &str = "api/search/records/_search";

/// Number of records requested per search page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// HTTP timeout in seconds.
///
/// Matches the blocking transport's own default so an unset timeout and the
/// explicit one behave the same.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default path of the ISO 19139 to DCAT-AP stylesheet.
pub const DEFAULT_STYLESHEET: &str = "iso-19139-to-dcat-ap.xsl";

/// Default XSLT processor executable.
pub const DEFAULT_XSLTPROC: &str = "xsltproc";

/// Environment variable overriding the stylesheet path.
pub const ENV_STYLESHEET: &str = "DCAT_HARVESTER_STYLESHEET";

/// Environment variable overriding the XSLT processor.
pub const ENV_XSLTPROC: &str = "DCAT_HARVESTER_XSLTPROC";

/// Environment variable overriding the HTTP timeout.
pub const ENV_TIMEOUT_SECS: &str = "DCAT_HARVESTER_TIMEOUT_SECS";

/// Normalize a raw catalog base URL.
///
/// Appends `/` when missing, then the `srv/` service root unless the URL
/// already ends in `/srv/`. Normalizing twice gives the same result.
///
/// # Examples
/// ```
/// use dcat_harvester::config::normalize_catalog_url;
///
/// assert_eq!(
///     normalize_catalog_url("https://example.org/geonetwork"),
///     "https://example.org/geonetwork/srv/"
/// );
/// assert_eq!(
///     normalize_catalog_url("https://example.org/geonetwork/srv"),
///     "https://example.org/geonetwork/srv/"
/// );
/// ```
pub fn normalize_catalog_url(raw: &str) -> String {
    let mut url = raw.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    if !url.ends_with("/srv/") {
        url.push_str(SERVICE_ROOT);
    }
    url
}

/// A normalized catalog endpoint, always ending in `/srv/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoint {
    base: String,
}

impl CatalogEndpoint {
    /// Normalize and validate a raw catalog base URL.
    pub fn parse(raw: &str) -> Result<Self> {
        let base = normalize_catalog_url(raw);
        Url::parse(&base).map_err(|source| HarvesterError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        Ok(Self { base })
    }

    /// The normalized base URL.
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// URL of the record search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.base)
    }

    /// URL of the ISO 19139 XML rendering of one record.
    ///
    /// The identifier is inserted verbatim; the resulting URL ends up in
    /// persistent RDF identifiers and must not be rewritten.
    pub fn record_url(&self, record_id: &str) -> String {
        format!("{}api/records/{record_id}/formatters/xml", self.base)
    }
}

impl std::fmt::Display for CatalogEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)
    }
}

/// Runtime settings for a harvester run.
#[derive(Debug, Clone)]
pub struct HarvesterConfig {
    pub stylesheet: PathBuf,
    pub xsltproc: PathBuf,
    pub timeout_secs: u64,
    pub page_size: usize,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            stylesheet: PathBuf::from(DEFAULT_STYLESHEET),
            xsltproc: PathBuf::from(DEFAULT_XSLTPROC),
            timeout_secs: HTTP_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl HarvesterConfig {
    /// Create a config builder.
    pub fn builder() -> HarvesterConfigBuilder {
        HarvesterConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check invariants that the rest of the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(HarvesterError::Config(
                "page size must be greater than zero".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(HarvesterError::Config(
                "HTTP timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for `HarvesterConfig`.
pub struct HarvesterConfigBuilder {
    config: HarvesterConfig,
}

impl HarvesterConfigBuilder {
    pub fn stylesheet(mut self, stylesheet: impl Into<PathBuf>) -> Self {
        self.config.stylesheet = stylesheet.into();
        self
    }

    pub fn xsltproc(mut self, xsltproc: impl Into<PathBuf>) -> Self {
        self.config.xsltproc = xsltproc.into();
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn build(self) -> Result<HarvesterConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
