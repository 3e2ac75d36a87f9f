//! Hardened XML parsing.
//!
//! Catalog content is untrusted. Documents carrying a DTD are refused, which
//! rules out external entities and DTD references before anything could try
//! to resolve them.

use roxmltree::{Document, ParsingOptions};

use crate::error::Result;

/// Parser settings passed explicitly to every parse call.
///
/// DTD support is always off and cannot be switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlParserConfig {
    nodes_limit: u32,
}

impl XmlParserConfig {
    /// Settings used for catalog documents.
    pub const fn hardened() -> Self {
        Self {
            nodes_limit: u32::MAX,
        }
    }

    /// Cap the number of nodes a single document may produce.
    pub fn with_nodes_limit(mut self, nodes_limit: u32) -> Self {
        self.nodes_limit = nodes_limit;
        self
    }

    /// Whether documents with a DTD are accepted. Always `false`.
    pub fn allows_dtd(&self) -> bool {
        self.options().allow_dtd
    }

    fn options<'a>(&self) -> ParsingOptions<'a> {
        let mut options = ParsingOptions::default();
        options.allow_dtd = false;
        options.nodes_limit = self.nodes_limit;
        options
    }
}

impl Default for XmlParserConfig {
    fn default() -> Self {
        Self::hardened()
    }
}

/// Parse an XML document with the given settings.
///
/// # Examples
/// ```
/// use dcat_harvester::xml::{parse, XmlParserConfig};
///
/// let doc = parse("<root><a/></root>", &XmlParserConfig::hardened()).unwrap();
/// assert_eq!(doc.root_element().tag_name().name(), "root");
///
/// let xxe = r#"<!DOCTYPE r [<!ENTITY x SYSTEM "file:///etc/passwd">]><r>&x;</r>"#;
/// assert!(parse(xxe, &XmlParserConfig::hardened()).is_err());
/// ```
pub fn parse<'input>(text: &'input str, config: &XmlParserConfig) -> Result<Document<'input>> {
    Ok(Document::parse_with_options(text, config.options())?)
}
