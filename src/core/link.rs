//! Link classification utilities.

/// Syntactic classification of links found in rendered html
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// External link with URL scheme (https://, mailto:, file:, etc.)
    External,
    /// Pure fragment/anchor link (#section, ./#section).
    Fragment,
    /// Absolute path (/etc/notes.md).
    Absolute,
    /// Path relative to the document's directory (./image.png, ../other.md).
    FileRelative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if is_external_link(link) {
            Self::External
        } else if link.starts_with('#') || link.starts_with("./#") {
            Self::Fragment
        } else if link.starts_with('/') {
            Self::Absolute
        } else {
            Self::FileRelative(link)
        }
    }
}

/// Check whether a link carries a URL scheme (`scheme:`).
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
