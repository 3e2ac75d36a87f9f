//! Character decoding of fetched documents.
//!
//! Records are decoded by their byte order mark or XML declaration, not
//! assumed to be UTF-8. The decoded text is handed on as UTF-8, so a
//! declaration naming another encoding is rewritten to say so. Bytes that
//! are invalid in the detected encoding are an error; nothing is replaced.

use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex as BytesRegex;
use regex::Regex;

use crate::error::{HarvesterError, Result};

#[allow(clippy::expect_used)] // Static regex pattern that is guaranteed to be valid
static DECLARED_ENCODING: LazyLock<BytesRegex> = LazyLock::new(|| {
    BytesRegex::new(r#"^<\?xml\s[^>]*?\bencoding\s*=\s*["']([A-Za-z][A-Za-z0-9._:-]*)["']"#)
        .expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex pattern that is guaranteed to be valid
static DECLARATION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(<\?xml\s[^>]*?\bencoding\s*=\s*["'])[A-Za-z][A-Za-z0-9._:-]*(["'])"#)
        .expect("valid regex")
});

/// Encoding label named in the XML declaration, if any.
pub fn declared_encoding(bytes: &[u8]) -> Option<&[u8]> {
    DECLARED_ENCODING
        .captures(bytes)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_bytes())
}

/// Decode a fetched document to UTF-8 text.
///
/// A byte order mark wins over the declaration. Without either the document
/// is UTF-8. When the source was not UTF-8 the declaration is rewritten to
/// `UTF-8`.
///
/// # Examples
/// ```
/// use dcat_harvester::xml::decode_document;
///
/// let latin1 = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><r>D\xE9partement</r>";
/// assert_eq!(
///     decode_document(latin1).unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?><r>Département</r>"
/// );
/// ```
pub fn decode_document(bytes: &[u8]) -> Result<String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (encoding_from_declaration(bytes)?, bytes),
    };

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            HarvesterError::Encoding(format!("document is not valid {}", encoding.name()))
        })?;

    let declared_utf8 = declared_encoding(body)
        .and_then(Encoding::for_label)
        .is_none_or(|declared| declared == UTF_8);
    if encoding == UTF_8 && declared_utf8 {
        return Ok(text.into_owned());
    }

    tracing::debug!(encoding = encoding.name(), "decoded non UTF-8 document");
    Ok(relabel_utf8(text))
}

/// Encoding named by the declaration; UTF-8 when there is none.
fn encoding_from_declaration(bytes: &[u8]) -> Result<&'static Encoding> {
    let Some(label) = declared_encoding(bytes) else {
        return Ok(UTF_8);
    };
    let encoding = Encoding::for_label(label).ok_or_else(|| {
        HarvesterError::Encoding(format!(
            "unsupported encoding '{}'",
            String::from_utf8_lossy(label)
        ))
    })?;
    // The declaration was readable as ASCII, so a UTF-16 label cannot be right.
    if encoding.is_ascii_compatible() {
        Ok(encoding)
    } else {
        Ok(UTF_8)
    }
}

fn relabel_utf8(text: Cow<'_, str>) -> String {
    DECLARATION_LABEL
        .replace(&text, "${1}UTF-8${2}")
        .into_owned()
}
