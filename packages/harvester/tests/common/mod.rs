//! Shared helpers for integration tests: a mock GeoNetwork catalog and a
//! stub transform that needs no XSLT processor.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use oxrdf::{Graph, NamedNodeRef};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dcat_harvester::harvester::{HarvestObserver, RecordFailure};
use dcat_harvester::http::create_client;
use dcat_harvester::xml::GCO_NAMESPACE;
use dcat_harvester::{DocumentTransformer, RecordUris, Result, Transform};

pub const GMD_NAMESPACE: &str = "http://www.isotc211.org/2005/gmd";

/// Path of a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// ISO 19139 record fixture with the given file identifier.
pub fn record_xml(id: &str) -> String {
    let path = fixture_path("record.xml");
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
        .replace("{id}", id)
}

/// Elasticsearch-style search response body.
pub fn search_response(total: u64, ids: &[&str]) -> serde_json::Value {
    let hits: Vec<_> = ids.iter().map(|id| json!({ "_id": id })).collect();
    json!({ "hits": { "total": { "value": total }, "hits": hits } })
}

/// Mount a search page answering requests for offset `from`.
pub async fn mount_search_page(
    server: &MockServer,
    from: usize,
    size: usize,
    total: u64,
    ids: &[&str],
) {
    Mock::given(method("POST"))
        .and(path("/srv/api/search/records/_search"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_partial_json(json!({ "from": from, "size": size })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(total, ids)))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a record rendering answering with `status` and `body`.
pub async fn mount_record(server: &MockServer, id: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/srv/api/records/{id}/formatters/xml")))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "application/xml")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Mount a record rendering with a raw byte body.
pub async fn mount_record_bytes(server: &MockServer, id: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/srv/api/records/{id}/formatters/xml")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/xml")
                .set_body_bytes(body),
        )
        .mount(server)
        .await;
}

/// The record fixture encoded as ISO-8859-1, with an accented title.
pub fn latin1_record_xml(id: &str) -> Vec<u8> {
    record_xml(id)
        .replace(r#"encoding="UTF-8""#, r#"encoding="ISO-8859-1""#)
        .replace("Bodemgebruik", "Département")
        .chars()
        .map(|c| u8::try_from(c).expect("fixture is Latin-1"))
        .collect()
}

/// Fetch URL of a record on the mock server.
pub fn record_url(server: &MockServer, id: &str) -> String {
    format!("{}/srv/api/records/{id}/formatters/xml", server.uri())
}

/// Resource URI of a record on the mock server.
pub fn resource_uri(server: &MockServer, id: &str) -> String {
    RecordUris::from_fetch_url(&record_url(server, id)).resource
}

/// Number of triples with the given IRI as subject.
pub fn triples_about(graph: &Graph, iri: &str) -> usize {
    graph
        .triples_for_subject(NamedNodeRef::new_unchecked(iri))
        .count()
}

/// Build a document transformer around `transform`.
pub fn transformer<T: Transform>(transform: T) -> DocumentTransformer<T> {
    DocumentTransformer::new(create_client(5).expect("client"), transform)
}

/// Produces a small DCAT graph from the fixed document, without XSLT.
///
/// Emits four triples per record plus one `dcat:keyword` per `gco:LocalName`.
pub struct StubTransform;

impl Transform for StubTransform {
    fn transform(&self, document: &str, uris: &RecordUris) -> Result<String> {
        let doc = roxmltree::Document::parse(document)?;

        let identifier = doc
            .descendants()
            .find(|n| n.has_tag_name((GMD_NAMESPACE, "fileIdentifier")))
            .and_then(|n| n.first_element_child())
            .and_then(|n| n.text())
            .unwrap_or_default();

        let keywords: String = doc
            .descendants()
            .filter(|n| n.has_tag_name((GCO_NAMESPACE, "LocalName")))
            .filter_map(|n| n.text())
            .map(|k| format!("<dcat:keyword>{k}</dcat:keyword>"))
            .collect();

        Ok(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dcat="http://www.w3.org/ns/dcat#"
         xmlns:dct="http://purl.org/dc/terms/"
         xmlns:foaf="http://xmlns.com/foaf/0.1/">
  <dcat:Dataset rdf:about="{resource}">
    <dct:identifier>{identifier}</dct:identifier>
    {keywords}
  </dcat:Dataset>
  <dcat:CatalogRecord rdf:about="{metadata}">
    <foaf:primaryTopic rdf:resource="{resource}"/>
  </dcat:CatalogRecord>
</rdf:RDF>"#,
            resource = uris.resource,
            metadata = uris.metadata,
        ))
    }
}

/// Runs [`StubTransform`] and keeps every document it was given.
#[derive(Default)]
pub struct CapturingTransform {
    pub documents: Mutex<Vec<String>>,
}

impl Transform for CapturingTransform {
    fn transform(&self, document: &str, uris: &RecordUris) -> Result<String> {
        self.documents
            .lock()
            .expect("lock")
            .push(document.to_string());
        StubTransform.transform(document, uris)
    }
}

/// Returns output that is not RDF/XML.
pub struct BrokenOutputTransform;

impl Transform for BrokenOutputTransform {
    fn transform(&self, _document: &str, _uris: &RecordUris) -> Result<String> {
        Ok("<rdf:RDF><dcat:Dataset>".to_string())
    }
}

/// Collects observer events.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub discovered: Option<usize>,
    pub visited: Vec<String>,
    pub failed: Vec<String>,
}

impl HarvestObserver for RecordingObserver {
    fn on_discovered(&mut self, count: usize) {
        self.discovered = Some(count);
    }

    fn on_record(&mut self, _index: usize, url: &str) {
        self.visited.push(url.to_string());
    }

    fn on_failure(&mut self, failure: &RecordFailure) {
        self.failed.push(failure.url.clone());
    }
}
