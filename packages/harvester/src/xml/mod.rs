//! XML parsing and pre-transform fixes for ISO 19139 documents.

pub mod encoding;
pub mod fixup;
pub mod parser;

pub use encoding::decode_document;
pub use fixup::{encode_local_name, fix_local_names, GCO_NAMESPACE};
pub use parser::{parse, XmlParserConfig};
