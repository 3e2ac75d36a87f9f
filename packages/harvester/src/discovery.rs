//! Record discovery through the GeoNetwork search API.
//!
//! The search endpoint is an Elasticsearch proxy. We page through all
//! published, non-template records and turn each hit into the URL of its
//! ISO 19139 XML rendering.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::CatalogEndpoint;
use crate::error::{HarvesterError, Result};
use crate::http::post_json;

/// JSON body of one search page request.
#[derive(Debug, Serialize)]
pub struct SearchQuery {
    query: Value,
    #[serde(rename = "_source")]
    source: &'static str,
    from: usize,
    size: usize,
}

impl SearchQuery {
    /// Query for published, non-template records, starting at `from`.
    pub fn page(from: usize, size: usize) -> Self {
        Self {
            query: json!({
                "bool": {
                    "must": [
                        { "term": { "isPublishedToAll": true } },
                        { "term": { "isTemplate": "n" } }
                    ]
                }
            }),
            source: "obj._id",
            from,
            size,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Total number of hits reported by the service.
    pub total: u64,
    /// Record identifiers on this page, in service order.
    pub ids: Vec<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Option<Hits>,
}

#[derive(Deserialize)]
struct Hits {
    total: Option<Total>,
    hits: Option<Vec<Hit>>,
}

#[derive(Deserialize)]
struct Total {
    value: Option<u64>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: Option<Value>,
}

impl SearchPage {
    /// Parse and validate a search response body.
    ///
    /// `hits.total.value` is required; a missing `hits.hits` list is an empty
    /// page. Every hit must carry a string `_id`.
    pub fn from_json(body: &[u8], url: &str) -> Result<Self> {
        let malformed = |message: String| HarvesterError::MalformedResponse {
            url: url.to_string(),
            message,
        };

        let response: SearchResponse =
            serde_json::from_slice(body).map_err(|e| malformed(e.to_string()))?;
        let hits = response
            .hits
            .ok_or_else(|| malformed("missing 'hits'".to_string()))?;
        let total = hits
            .total
            .and_then(|t| t.value)
            .ok_or_else(|| malformed("missing 'hits.total.value'".to_string()))?;

        let ids = hits
            .hits
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, hit)| match hit.id {
                Some(Value::String(id)) => Ok(id),
                _ => Err(malformed(format!("hit {i} has no string '_id'"))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { total, ids })
    }
}

/// Request one page of search results.
pub fn fetch_page(
    client: &Client,
    endpoint: &CatalogEndpoint,
    from: usize,
    size: usize,
) -> Result<SearchPage> {
    let url = endpoint.search_url();
    let body = serde_json::to_vec(&SearchQuery::page(from, size))?;
    let response = post_json(client, &url, body)?;
    SearchPage::from_json(&response, &url)
}

/// Walk all pages, calling `fetch` with each offset.
///
/// Stops after an empty page, or once the reported total is less than the
/// next offset. Offsets are never requested twice.
///
/// # Arguments
/// * `page_size` - Records per page, must be non-zero
/// * `fetch` - Fetches the page starting at the given offset
///
/// # Returns
/// All record identifiers in discovery order, duplicates included
pub fn paginate<F>(page_size: usize, mut fetch: F) -> Result<Vec<String>>
where
    F: FnMut(usize) -> Result<SearchPage>,
{
    if page_size == 0 {
        return Err(HarvesterError::Config(
            "page size must be greater than zero".to_string(),
        ));
    }

    let mut ids = Vec::new();
    let mut start = 0;

    loop {
        let page = fetch(start)?;
        let page_len = page.ids.len();
        ids.extend(page.ids);
        start += page_size;

        tracing::debug!(
            total = page.total,
            page_len,
            next = start,
            "fetched search page"
        );

        if page_len == 0 || page.total < start as u64 {
            break;
        }
    }

    Ok(ids)
}

/// Find the fetch URLs of all published, non-template records.
///
/// Any failure, including on the first page, is returned as is; there is no
/// partial result.
pub fn find_datasets(
    client: &Client,
    endpoint: &CatalogEndpoint,
    page_size: usize,
) -> Result<Vec<String>> {
    let ids = paginate(page_size, |from| {
        fetch_page(client, endpoint, from, page_size)
    })?;

    tracing::info!(endpoint = %endpoint, records = ids.len(), "discovered records");

    Ok(ids.iter().map(|id| endpoint.record_url(id)).collect())
}
