//! Messages received from viewers.

use std::path::{Path, PathBuf};

use crate::utils::path::resolve_under;

const FILEPATH_PREFIX: &str = "filepath:";
const SLIDES_FILEPATH_PREFIX: &str = "revealjs:filepath:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerRequest {
    /// Render a file, relative to home unless absolute.
    File { path: PathBuf, slides: bool },
    /// Push the current bibliography again.
    Bibliography,
}

impl ViewerRequest {
    pub fn parse(text: &str, home: &Path) -> Self {
        if let Some(path) = text.strip_prefix(FILEPATH_PREFIX) {
            Self::File {
                path: resolve_under(Path::new(path), home),
                slides: false,
            }
        } else if let Some(path) = text.strip_prefix(SLIDES_FILEPATH_PREFIX) {
            Self::File {
                path: resolve_under(Path::new(path), home),
                slides: true,
            }
        } else {
            Self::Bibliography
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "/nonexistent/home";

    #[test]
    fn test_filepath() {
        assert_eq!(
            ViewerRequest::parse("filepath:notes/a.md", Path::new(HOME)),
            ViewerRequest::File {
                path: PathBuf::from("/nonexistent/home/notes/a.md"),
                slides: false,
            }
        );
    }

    #[test]
    fn test_slides_filepath() {
        assert_eq!(
            ViewerRequest::parse("revealjs:filepath:talk.md", Path::new(HOME)),
            ViewerRequest::File {
                path: PathBuf::from("/nonexistent/home/talk.md"),
                slides: true,
            }
        );
    }

    #[test]
    fn test_anything_else_is_bibliography() {
        for text in ["", "js", "citeproc", "FILEPATH:x", "revealjs:x"] {
            assert_eq!(
                ViewerRequest::parse(text, Path::new(HOME)),
                ViewerRequest::Bibliography
            );
        }
    }
}
