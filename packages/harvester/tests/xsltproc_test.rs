//! Tests running the real `xsltproc` processor on a minimal stylesheet.
//!
//! Ignored by default; run with `cargo test -- --ignored` where `xsltproc`
//! is installed.

mod common;

use std::io::Write;

use oxrdf::{NamedNodeRef, TripleRef};
use tempfile::NamedTempFile;

use dcat_harvester::rdf::parse_rdf_xml;
use dcat_harvester::xml::{fix_local_names, parse, XmlParserConfig};
use dcat_harvester::{HarvesterError, RecordUris, Transform, XsltprocTransform};

use common::{fixture_path, record_xml};

const FETCH_URL: &str = "https://example.org/srv/api/records/abc/formatters/xml";

fn fixed_record(id: &str) -> String {
    let xml = record_xml(id);
    let doc = parse(&xml, &XmlParserConfig::hardened()).unwrap();
    fix_local_names(&doc)
}

#[test]
#[ignore = "needs xsltproc on PATH"]
fn test_stylesheet_receives_uri_parameters() {
    let transform = XsltprocTransform::new("xsltproc", fixture_path("minimal-dcat.xsl")).unwrap();
    let uris = RecordUris::from_fetch_url(FETCH_URL);

    let rdf_xml = transform.transform(&fixed_record("abc"), &uris).unwrap();
    let triples = parse_rdf_xml(&rdf_xml, &uris.resource).unwrap();

    let mut graph = oxrdf::Graph::new();
    dcat_harvester::rdf::merge(&mut graph, &triples);

    assert!(graph.contains(TripleRef::new(
        NamedNodeRef::new_unchecked("https://example.org/srv/api/records/abc#metadata"),
        NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/primaryTopic"),
        NamedNodeRef::new_unchecked("https://example.org/srv/api/records/abc"),
    )));
    assert!(graph.contains(TripleRef::new(
        NamedNodeRef::new_unchecked("https://example.org/srv/api/records/abc"),
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/conformsTo"),
        NamedNodeRef::new_unchecked("https://example.org/features/Land%20use"),
    )));
}

#[test]
#[ignore = "needs xsltproc on PATH"]
fn test_unfixed_local_name_breaks_generated_uri() {
    let transform = XsltprocTransform::new("xsltproc", fixture_path("minimal-dcat.xsl")).unwrap();
    let uris = RecordUris::from_fetch_url(FETCH_URL);

    // Without the fixup the stylesheet emits an IRI containing a space.
    let rdf_xml = transform.transform(&record_xml("abc"), &uris).unwrap();
    let err = parse_rdf_xml(&rdf_xml, &uris.resource).unwrap_err();
    assert!(matches!(err, HarvesterError::RdfParse(_)));
}

#[test]
#[ignore = "needs xsltproc on PATH"]
fn test_invalid_stylesheet_is_transform_error() {
    let mut stylesheet = NamedTempFile::new().unwrap();
    write!(stylesheet, "<xsl:stylesheet").unwrap();

    let transform = XsltprocTransform::new("xsltproc", stylesheet.path()).unwrap();
    let err = transform
        .transform(&fixed_record("abc"), &RecordUris::from_fetch_url(FETCH_URL))
        .unwrap_err();

    assert!(matches!(err, HarvesterError::Transform { .. }), "unexpected error: {err}");
    assert!(err.is_recoverable());
}
