//! `gco:LocalName` fixup.
//!
//! The DCAT-AP stylesheet builds URIs out of `gco:LocalName` values, which
//! are free text in practice. Their text is percent-encoded before the
//! transform runs so the generated URIs are well-formed.

use std::ops::Range;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use roxmltree::{Document, Node};

/// ISO 19139 Geographic COmmon namespace.
pub const GCO_NAMESPACE: &str = "http://www.isotc211.org/2005/gco";

const LOCAL_NAME: &str = "LocalName";

/// Characters left as-is: alphanumerics plus `_ . - ~ /`.
const URI_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Percent-encode a local name for use inside a URI.
///
/// # Examples
/// ```
/// use dcat_harvester::xml::encode_local_name;
///
/// assert_eq!(encode_local_name("Land use"), "Land%20use");
/// assert_eq!(encode_local_name("a/b_c.d-e~f"), "a/b_c.d-e~f");
/// assert_eq!(encode_local_name("é"), "%C3%A9");
/// ```
pub fn encode_local_name(text: &str) -> String {
    utf8_percent_encode(text, URI_SAFE).to_string()
}

/// Return the document text with every `gco:LocalName` value percent-encoded.
///
/// Only the element's leading text (before any child node) is touched, and
/// it is encoded exactly once. Everything else in the source is kept byte for
/// byte. A document without `gco:LocalName` elements comes back unchanged.
pub fn fix_local_names(doc: &Document<'_>) -> String {
    let source = doc.input_text();

    let edits: Vec<(Range<usize>, String)> = doc
        .descendants()
        .filter(|n| n.has_tag_name((GCO_NAMESPACE, LOCAL_NAME)))
        .filter_map(leading_text)
        .map(|text| (text.range(), encode_local_name(text.text().unwrap_or_default())))
        .collect();

    tracing::trace!(count = edits.len(), "encoding gco:LocalName values");

    splice(source, &edits)
}

/// The element's first child, if it is a text node.
fn leading_text<'a, 'input>(element: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    element.first_child().filter(|child| child.is_text())
}

/// Replace the given source ranges. Ranges must be sorted and disjoint.
fn splice(source: &str, edits: &[(Range<usize>, String)]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (range, replacement) in edits {
        out.push_str(&source[cursor..range.start]);
        out.push_str(replacement);
        cursor = range.end;
    }
    out.push_str(&source[cursor..]);
    out
}
