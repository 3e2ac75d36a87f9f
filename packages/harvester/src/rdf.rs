//! RDF graph handling: reading transform output and writing the result.

use std::collections::HashMap;
use std::io::Write;

use clap::ValueEnum;
use oxrdf::{BlankNode, Graph, Subject, Term, Triple};
use oxrdfxml::RdfXmlParser;
use oxttl::TurtleSerializer;

use crate::error::{HarvesterError, Result};

/// Prefixes bound in Turtle output.
pub const PREFIXES: &[(&str, &str)] = &[
    ("adms", "http://www.w3.org/ns/adms#"),
    ("dcat", "http://www.w3.org/ns/dcat#"),
    ("dcatap", "http://data.europa.eu/r5r/"),
    ("dct", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("gsp", "http://www.opengis.net/ont/geosparql#"),
    ("locn", "http://www.w3.org/ns/locn#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("schema", "http://schema.org/"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("vcard", "http://www.w3.org/2006/vcard/ns#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// Output syntax for the harvested graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RdfFormat {
    /// Turtle with the common DCAT-AP prefixes.
    #[default]
    Turtle,
    /// N-Triples, one triple per line.
    Ntriples,
}

/// Parse RDF/XML into triples.
///
/// Blank nodes are relabeled with fresh identifiers, so triples from two
/// different documents never share a blank node even when both documents use
/// the same `rdf:nodeID`. Either every triple is returned or an error is.
///
/// # Arguments
/// * `rdf_xml` - RDF/XML text
/// * `base_iri` - Base IRI for resolving relative references
pub fn parse_rdf_xml(rdf_xml: &str, base_iri: &str) -> Result<Vec<Triple>> {
    let parser = RdfXmlParser::new()
        .with_base_iri(base_iri)
        .map_err(|e| HarvesterError::RdfParse(format!("invalid base IRI '{base_iri}': {e}")))?;

    let mut scope = BlankNodeScope::default();
    parser
        .for_reader(rdf_xml.as_bytes())
        .map(|triple| {
            triple
                .map(|t| scope.relabel(t))
                .map_err(|e| HarvesterError::RdfParse(e.to_string()))
        })
        .collect()
}

/// Insert triples into a graph, returning how many were new.
pub fn merge(graph: &mut Graph, triples: &[Triple]) -> usize {
    triples.iter().filter(|&t| graph.insert(t)).count()
}

/// Serialize a graph to a writer.
pub fn write_graph<W: Write>(graph: &Graph, format: RdfFormat, mut out: W) -> Result<W> {
    match format {
        RdfFormat::Turtle => {
            let mut serializer = TurtleSerializer::new();
            for (prefix, iri) in PREFIXES {
                serializer = serializer.with_prefix(*prefix, *iri).map_err(|e| {
                    HarvesterError::Serialization(format!("invalid prefix {prefix}: {e}"))
                })?;
            }
            let mut writer = serializer.for_writer(out);
            for triple in graph.iter() {
                writer.serialize_triple(triple)?;
            }
            Ok(writer.finish()?)
        }
        RdfFormat::Ntriples => {
            for triple in graph.iter() {
                writeln!(out, "{triple} .")?;
            }
            Ok(out)
        }
    }
}

/// Serialize a graph to a string.
pub fn graph_to_string(graph: &Graph, format: RdfFormat) -> Result<String> {
    let bytes = write_graph(graph, format, Vec::new())?;
    String::from_utf8(bytes).map_err(|e| HarvesterError::Serialization(e.to_string()))
}

/// Maps document-local blank nodes onto fresh ones.
#[derive(Default)]
struct BlankNodeScope {
    mapping: HashMap<BlankNode, BlankNode>,
}

impl BlankNodeScope {
    fn relabel(&mut self, triple: Triple) -> Triple {
        let subject = match triple.subject {
            Subject::BlankNode(b) => Subject::BlankNode(self.fresh(b)),
            other => other,
        };
        let object = match triple.object {
            Term::BlankNode(b) => Term::BlankNode(self.fresh(b)),
            other => other,
        };
        Triple::new(subject, triple.predicate, object)
    }

    fn fresh(&mut self, node: BlankNode) -> BlankNode {
        self.mapping.entry(node).or_default().clone()
    }
}
