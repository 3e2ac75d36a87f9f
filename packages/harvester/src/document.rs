//! Single metadata document: fetch, fix, transform, parse to RDF.

use oxrdf::{Graph, Triple};
use reqwest::blocking::Client;

use crate::error::Result;
use crate::http::get_bytes;
use crate::rdf::{merge, parse_rdf_xml};
use crate::transform::Transform;
use crate::uri::RecordUris;
use crate::xml::{decode_document, fix_local_names, parse, XmlParserConfig};

/// Turns one ISO 19139 record URL into DCAT-AP triples.
///
/// Errors are returned unchanged; deciding what a failure means is up to
/// the caller.
pub struct DocumentTransformer<T> {
    client: Client,
    transform: T,
    parser: XmlParserConfig,
}

impl<T: Transform> DocumentTransformer<T> {
    /// Create a transformer using the hardened parser settings.
    pub fn new(client: Client, transform: T) -> Self {
        Self {
            client,
            transform,
            parser: XmlParserConfig::hardened(),
        }
    }

    /// Override the parser settings (node limit).
    pub fn with_parser_config(mut self, parser: XmlParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// The HTTP client, shared with discovery.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Transform the document at `url` into a new graph.
    pub fn transform(&self, url: &str) -> Result<Graph> {
        let mut graph = Graph::new();
        self.transform_into(url, &mut graph)?;
        Ok(graph)
    }

    /// Transform the document at `url` and merge it into `graph`.
    ///
    /// The graph is only touched once the whole document has been turned
    /// into triples; on error it is left exactly as it was.
    ///
    /// # Returns
    /// Number of triples that were new to the graph
    pub fn transform_into(&self, url: &str, graph: &mut Graph) -> Result<usize> {
        let triples = self.record_triples(url)?;
        let added = merge(graph, &triples);
        tracing::debug!(url, triples = triples.len(), added, "merged record");
        Ok(added)
    }

    /// Fetch, fix and transform one record into triples.
    pub fn record_triples(&self, url: &str) -> Result<Vec<Triple>> {
        let body = get_bytes(&self.client, url)?;
        let xml = decode_document(&body)?;

        let doc = parse(&xml, &self.parser)?;
        let fixed = fix_local_names(&doc);

        let uris = RecordUris::from_fetch_url(url);
        let rdf_xml = self.transform.transform(&fixed, &uris)?;

        parse_rdf_xml(&rdf_xml, &uris.resource)
    }
}
