//! Source resolution.
//!
//! Normalizes what the user supplied (a URL, an in-memory file or a path on
//! disk) into an [`AnalysisInput`], and owns the "primary source" record
//! that stands for the analyzed URL in the first reply's citations.
//!
//! Malformed URLs are never an error here: they are forwarded as typed and
//! get a generic primary-source label instead of a derived hostname.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use forge_models::{AnalysisInput, Source};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Domain used when a URI has no parseable host.
pub const PLACEHOLDER_DOMAIN: &str = "source";

/// Title of the primary source when the URL parses.
pub const PRIMARY_SOURCE_TITLE: &str = "Primary Target Analysis";

/// Title of the primary source when the URL does not parse.
pub const FALLBACK_PRIMARY_SOURCE_TITLE: &str = "Primary Source";

/// File types accepted for upload, keyed by lowercase extension.
const SUPPORTED_FILES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("text", "text/plain"),
    ("md", "text/plain"),
];

/// Errors that can occur while resolving user input.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Nothing was typed.
    #[error("please enter a URL to analyze")]
    EmptyUrl,

    /// The file type cannot be analyzed.
    #[error("unsupported file {}: please upload a PDF or Text file", .0.display())]
    UnsupportedFile(PathBuf),

    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Build a URL analysis request.
///
/// Only blank input is rejected; anything else is forwarded trimmed.
pub fn resolve_url(raw: &str, deep_research: bool) -> Result<AnalysisInput, ResolveError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ResolveError::EmptyUrl);
    }
    Ok(AnalysisInput::url(value, deep_research))
}

/// Build a file analysis request from in-memory content.
pub fn resolve_file(bytes: &[u8], mime_type: &str, file_name: &str) -> AnalysisInput {
    AnalysisInput::file(BASE64_STANDARD.encode(bytes), mime_type, file_name)
}

/// Build a file analysis request from a path on disk.
///
/// `~` is expanded. Only PDF and plain text files are accepted.
pub fn resolve_path(path: impl AsRef<Path>) -> Result<AnalysisInput, ResolveError> {
    let raw = path.as_ref().to_string_lossy();
    let path = PathBuf::from(shellexpand::tilde(raw.trim()).as_ref());

    let mime_type = mime_type_for(&path).ok_or_else(|| ResolveError::UnsupportedFile(path.clone()))?;
    let bytes = std::fs::read(&path).map_err(|source| ResolveError::Io {
        path: path.clone(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(file = %file_name, mime_type, size = bytes.len(), "Resolved file input");
    Ok(resolve_file(&bytes, mime_type, &file_name))
}

/// MIME type for a supported file path.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
    SUPPORTED_FILES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Display domain for a URI: its host without a leading `www.`.
///
/// Returns [`PLACEHOLDER_DOMAIN`] when the URI cannot be parsed or has no host.
pub fn domain_of(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|url| url.host_str().map(strip_www))
        .unwrap_or_else(|| PLACEHOLDER_DOMAIN.to_string())
}

fn strip_www(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Synthetic source standing for the analyzed URL itself.
pub fn primary_source(url: &str) -> Source {
    match Url::parse(url) {
        Ok(_) => Source::new(PRIMARY_SOURCE_TITLE, url, domain_of(url)),
        Err(_) => Source::new(FALLBACK_PRIMARY_SOURCE_TITLE, url, PLACEHOLDER_DOMAIN),
    }
}

/// Prepend the primary source to a URL analysis' citations.
///
/// Nothing is added when a source with the identical URI is already present,
/// or when the input is a file.
pub fn merge_primary_source(input: &AnalysisInput, sources: Vec<Source>) -> Vec<Source> {
    let Some(url) = input.url_value() else {
        return sources;
    };
    if sources.iter().any(|s| s.uri == url) {
        return sources;
    }

    let mut merged = Vec::with_capacity(sources.len() + 1);
    merged.push(primary_source(url));
    merged.extend(sources);
    merged
}

/// Drop sources whose URI already appeared, keeping the first occurrence.
pub fn dedup_sources(sources: Vec<Source>) -> Vec<Source> {
    let mut seen = HashSet::with_capacity(sources.len());
    sources
        .into_iter()
        .filter(|s| seen.insert(s.uri.clone()))
        .collect()
}
