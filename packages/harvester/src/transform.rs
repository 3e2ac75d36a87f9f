//! ISO 19139 to DCAT-AP transform.
//!
//! The mapping itself lives in an external XSLT stylesheet. The harvester
//! only depends on its two-parameter contract: the document goes in,
//! `ResourceUri` and `MetadataUri` are passed as string parameters, and an
//! RDF/XML document comes out.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::HarvesterConfig;
use crate::error::{HarvesterError, Result};
use crate::uri::RecordUris;
use crate::xml::decode_document;

/// Stylesheet parameter carrying the resource URI.
pub const RESOURCE_URI_PARAM: &str = "ResourceUri";

/// Stylesheet parameter carrying the metadata URI.
pub const METADATA_URI_PARAM: &str = "MetadataUri";

/// A transform from an ISO 19139 document to RDF/XML.
///
/// Implemented by [`XsltprocTransform`] for real runs; tests provide their
/// own implementations.
pub trait Transform {
    /// Transform one document, returning RDF/XML text.
    fn transform(&self, document: &str, uris: &RecordUris) -> Result<String>;
}

impl<T: Transform + ?Sized> Transform for &T {
    fn transform(&self, document: &str, uris: &RecordUris) -> Result<String> {
        (**self).transform(document, uris)
    }
}

/// Runs the stylesheet with the `xsltproc` command line processor.
///
/// Network access and DTD validation are disabled for the processor as well,
/// so neither the document nor the stylesheet can pull in remote content.
#[derive(Debug, Clone)]
pub struct XsltprocTransform {
    program: PathBuf,
    stylesheet: PathBuf,
}

impl XsltprocTransform {
    /// Create a transform for the given processor and stylesheet.
    ///
    /// Fails with `HarvesterError::Config` if the stylesheet does not exist.
    pub fn new(program: impl Into<PathBuf>, stylesheet: impl Into<PathBuf>) -> Result<Self> {
        let stylesheet = stylesheet.into();
        if !stylesheet.is_file() {
            return Err(HarvesterError::Config(format!(
                "stylesheet not found: {}",
                stylesheet.display()
            )));
        }
        Ok(Self {
            program: program.into(),
            stylesheet,
        })
    }

    /// Create a transform from the harvester configuration.
    pub fn from_config(config: &HarvesterConfig) -> Result<Self> {
        Self::new(&config.xsltproc, &config.stylesheet)
    }

    /// Path of the stylesheet in use.
    pub fn stylesheet(&self) -> &Path {
        &self.stylesheet
    }

    fn args(&self, uris: &RecordUris) -> Vec<OsString> {
        vec![
            "--nonet".into(),
            "--novalid".into(),
            "--stringparam".into(),
            RESOURCE_URI_PARAM.into(),
            uris.resource.clone().into(),
            "--stringparam".into(),
            METADATA_URI_PARAM.into(),
            uris.metadata.clone().into(),
            self.stylesheet.clone().into_os_string(),
            "-".into(),
        ]
    }
}

impl Transform for XsltprocTransform {
    fn transform(&self, document: &str, uris: &RecordUris) -> Result<String> {
        let program = self.program.display().to_string();
        tracing::debug!(program, resource_uri = %uris.resource, "running stylesheet");

        // Failing to start the processor is a setup problem, not a record problem.
        let mut child = Command::new(&self.program)
            .args(self.args(uris))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| HarvesterError::Config(format!("failed to execute {program}: {e}")))?;

        let mut stdin = child.stdin.take().ok_or_else(|| HarvesterError::Transform {
            message: format!("{program} stdin unavailable"),
            stderr: String::new(),
        })?;

        // Feed stdin from a separate thread so a large output cannot block the input.
        let (write_result, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(document.as_bytes()));
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output.map_err(|e| HarvesterError::Transform {
            message: format!("failed to wait for {program}: {e}"),
            stderr: String::new(),
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(HarvesterError::Transform {
                message: format!("{program} exited with code {:?}", output.status.code()),
                stderr,
            });
        }

        match write_result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(HarvesterError::Transform {
                    message: format!("failed to write document to {program}: {e}"),
                    stderr,
                })
            }
            Err(_) => {
                return Err(HarvesterError::Transform {
                    message: format!("writer thread for {program} panicked"),
                    stderr,
                })
            }
        }

        if !stderr.is_empty() {
            tracing::debug!(stderr = %stderr, "stylesheet messages (non-fatal)");
        }

        decode_document(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use tempfile::NamedTempFile;

    fn uris() -> RecordUris {
        RecordUris::from_fetch_url("https://host/srv/api/records/abc/formatters/xml")
    }

    #[test]
    fn test_missing_stylesheet_is_config_error() {
        let err = XsltprocTransform::new("xsltproc", "/nonexistent/dcat.xsl").unwrap_err();
        assert!(matches!(err, HarvesterError::Config(_)));
    }

    #[test]
    fn test_args_pass_uris_as_string_params() {
        let stylesheet = NamedTempFile::new().unwrap();
        let transform = XsltprocTransform::new("xsltproc", stylesheet.path()).unwrap();
        let args = transform.args(&uris());

        let expected: Vec<&OsStr> = vec![
            OsStr::new("--nonet"),
            OsStr::new("--novalid"),
            OsStr::new("--stringparam"),
            OsStr::new("ResourceUri"),
            OsStr::new("https://host/srv/api/records/abc"),
            OsStr::new("--stringparam"),
            OsStr::new("MetadataUri"),
            OsStr::new("https://host/srv/api/records/abc#metadata"),
            stylesheet.path().as_os_str(),
            OsStr::new("-"),
        ];
        assert_eq!(args.iter().map(|a| a.as_os_str()).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_missing_program_is_config_error() {
        let stylesheet = NamedTempFile::new().unwrap();
        let transform =
            XsltprocTransform::new("/nonexistent/bin/xsltproc", stylesheet.path()).unwrap();
        let err = transform.transform("<a/>", &uris()).unwrap_err();
        assert!(matches!(err, HarvesterError::Config(_)));
        assert!(!err.is_recoverable());
    }
}
