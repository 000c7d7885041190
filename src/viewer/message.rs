//! Messages pushed to viewers.
//!
//! Viewers tell the shapes apart by their keys:
//!
//! | keys                                   | meaning                  |
//! |----------------------------------------|--------------------------|
//! | `filepath`, `htmlblocks`, `bibid`, ... | full render result       |
//! | `html`, `bibid`                        | bibliography             |
//! | `error`                                | a run failed             |
//! | `status`                               | conversion in progress   |

use serde::Serialize;

use crate::convert::{Conversion, HtmlBlock};

/// Progress glyph, repeated once per tick.
const PROGRESS_GLYPH: &str = " 🞄 ";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewerMessage {
    Render {
        filepath: String,
        htmlblocks: Vec<HtmlBlock>,
        #[serde(rename = "suppress-bibliography")]
        suppress_bibliography: bool,
        #[serde(rename = "reference-section-title")]
        reference_section_title: String,
        bibid: Option<u64>,
        toc: bool,
        #[serde(rename = "toc-title")]
        toc_title: Option<String>,
    },
    Bibliography {
        html: String,
        bibid: Option<u64>,
    },
    Error {
        error: String,
    },
    Status {
        status: String,
    },
}

impl ViewerMessage {
    pub fn render(filepath: String, conversion: Conversion) -> Self {
        let Conversion {
            blocks,
            flags,
            bibliography_id,
        } = conversion;

        Self::Render {
            filepath,
            htmlblocks: blocks,
            suppress_bibliography: flags.suppress_bibliography,
            reference_section_title: flags.reference_section_title,
            bibid: bibliography_id,
            toc: flags.toc,
            toc_title: flags.toc_title,
        }
    }

    pub fn bibliography(html: &str, bibid: Option<u64>) -> Self {
        Self::Bibliography {
            html: html.to_string(),
            bibid,
        }
    }

    pub fn error(error: impl std::fmt::Display) -> Self {
        Self::Error {
            error: error.to_string(),
        }
    }

    /// Progress indicator for the `tick`th interval of a run.
    pub fn progress(tick: usize) -> Self {
        Self::Status {
            status: PROGRESS_GLYPH.repeat(tick),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Render { .. } => "render",
            Self::Bibliography { .. } => "bibliography",
            Self::Error { .. } => "error",
            Self::Status { .. } => "status",
        }
    }

    /// Serialize to the wire format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("unserializable message: {e}") }).to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::DocumentFlags;
    use serde_json::{Value, json};

    fn parse(msg: &ViewerMessage) -> Value {
        serde_json::from_str(&msg.to_json()).unwrap()
    }

    #[test]
    fn test_render_shape() {
        let msg = ViewerMessage::render(
            "notes/a.md".into(),
            Conversion {
                blocks: vec![HtmlBlock(7, "<p>x</p>".into())],
                flags: DocumentFlags {
                    toc: true,
                    ..Default::default()
                },
                bibliography_id: Some(42),
            },
        );
        assert_eq!(
            parse(&msg),
            json!({
                "filepath": "notes/a.md",
                "htmlblocks": [[7, "<p>x</p>"]],
                "suppress-bibliography": false,
                "reference-section-title": "",
                "bibid": 42,
                "toc": true,
                "toc-title": null,
            })
        );
    }

    #[test]
    fn test_key_order_matches_viewer() {
        let msg = ViewerMessage::render(
            "LIVE".into(),
            Conversion {
                blocks: vec![],
                flags: DocumentFlags::default(),
                bibliography_id: None,
            },
        );
        let json = msg.to_json();
        let filepath = json.find("filepath").unwrap();
        let toc_title = json.find("toc-title").unwrap();
        assert!(filepath < toc_title);
    }

    #[test]
    fn test_bibliography_shape() {
        assert_eq!(
            parse(&ViewerMessage::bibliography("", None)),
            json!({"html": "", "bibid": null})
        );
    }

    #[test]
    fn test_error_and_status() {
        assert_eq!(
            parse(&ViewerMessage::error("boom")),
            json!({"error": "boom"})
        );
        assert_eq!(
            parse(&ViewerMessage::progress(2)),
            json!({"status": " 🞄  🞄 "})
        );
        assert_eq!(ViewerMessage::progress(1).kind(), "status");
    }
}
