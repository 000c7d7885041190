//! The unit of work accepted by the ingestion coordinator.

use std::path::{Path, PathBuf};

use crate::convert::ConvertError;
use crate::utils::path::resolve_under;

/// Target used when piped content names no file.
pub const DEFAULT_TARGET: &str = "LIVE";

/// Leading comment that names the file piped content belongs to.
const FILEPATH_DIRECTIVE: &str = "<!-- filepath:";

/// A request waiting for the next conversion run.
///
/// At most one exists at a time; a newer one replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    /// Bytes read from the ingestion pipe, possibly with a filepath directive.
    RawContent(Vec<u8>),
    /// A file a viewer asked for.
    FileRequest { path: PathBuf, slides: bool },
}

impl PendingRequest {
    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::RawContent(bytes) => format!("{} piped bytes", bytes.len()),
            Self::FileRequest { path, slides: true } => format!("{} (slides)", path.display()),
            Self::FileRequest { path, .. } => path.display().to_string(),
        }
    }
}

/// Markdown together with the file it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub path: PathBuf,
    pub content: String,
}

impl ResolvedContent {
    /// Directory the converter runs in and relative links resolve against.
    pub fn working_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}

/// Decode a piped payload and split off its filepath directive.
///
/// `<!-- filepath:notes/a.md -->\n# Title` targets `home/notes/a.md`; an
/// absolute path is used as-is. Without a directive the payload targets
/// [`DEFAULT_TARGET`]. A directive without a terminating newline yields
/// empty content for the default target.
pub fn parse_payload(bytes: Vec<u8>, home: &Path) -> Result<ResolvedContent, ConvertError> {
    let text = String::from_utf8(bytes)?;

    let Some(rest) = text.strip_prefix(FILEPATH_DIRECTIVE) else {
        return Ok(ResolvedContent {
            path: resolve_under(Path::new(DEFAULT_TARGET), home),
            content: text,
        });
    };

    let Some((directive, content)) = rest.split_once('\n') else {
        return Ok(ResolvedContent {
            path: resolve_under(Path::new(DEFAULT_TARGET), home),
            content: String::new(),
        });
    };

    let target = directive.trim();
    let target = target.strip_suffix("-->").unwrap_or(target).trim();

    Ok(ResolvedContent {
        path: resolve_under(Path::new(target), home),
        content: content.to_string(),
    })
}
