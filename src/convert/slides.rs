//! Slide mode: the leading directive and block grouping.
//!
//! A document starting with `<!-- revealjs -->` (or `<!-- revealjs:N -->`)
//! is rendered as slides with slide level `N` (default 2). In slide mode a
//! block group is a whole section, so the viewer can swap slides without
//! re-rendering their neighbours.

use serde_json::Value;

use super::document::tag;

const DIRECTIVE_PREFIX: &str = "<!-- revealjs";
const DIRECTIVE_SUFFIX: &str = "-->";
pub const DEFAULT_SLIDE_LEVEL: u8 = 2;

/// Directive prepended when a viewer forces slide mode on a file.
pub const FORCED_DIRECTIVE: &str = "<!-- revealjs -->\n";

/// How block groups are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderFormat {
    #[default]
    Html,
    Slides {
        level: u8,
    },
}

impl RenderFormat {
    /// Converter arguments selecting the output writer.
    pub fn args(self) -> Vec<String> {
        match self {
            Self::Html => vec!["--to".into(), "html5".into()],
            Self::Slides { level } => vec![
                "--to".into(),
                "revealjs".into(),
                "--slide-level".into(),
                level.to_string(),
            ],
        }
    }

    /// Distinguishes cache entries rendered with different writers.
    pub fn cache_tag(self) -> String {
        match self {
            Self::Html => "html5".into(),
            Self::Slides { level } => format!("revealjs:{level}"),
        }
    }

    pub const fn is_slides(self) -> bool {
        matches!(self, Self::Slides { .. })
    }
}

/// Detect a slide directive on the first line and strip it.
///
/// Returns the render format and the content the converter should see. A
/// first line that merely starts like a directive (`<!-- revealjsx -->`)
/// is left alone.
pub fn split_directive(content: &str) -> (RenderFormat, &str) {
    if !content.starts_with(DIRECTIVE_PREFIX) {
        return (RenderFormat::Html, content);
    }

    let (line, rest) = content.split_once('\n').unwrap_or((content, ""));
    let Some(inner) = line[DIRECTIVE_PREFIX.len()..]
        .trim_end()
        .strip_suffix(DIRECTIVE_SUFFIX)
    else {
        return (RenderFormat::Html, content);
    };

    let inner = inner.trim();
    let level = if inner.is_empty() {
        DEFAULT_SLIDE_LEVEL
    } else if let Some(n) = inner.strip_prefix(':') {
        n.trim()
            .parse::<u8>()
            .ok()
            .filter(|&n| n >= 1)
            .unwrap_or(DEFAULT_SLIDE_LEVEL)
    } else {
        return (RenderFormat::Html, content);
    };

    (RenderFormat::Slides { level }, rest)
}

/// Prefix `content` with the slide directive unless it already has one.
pub fn force_slides(content: String) -> String {
    if split_directive(&content).0.is_slides() {
        content
    } else {
        format!("{FORCED_DIRECTIVE}{content}")
    }
}

/// Partition blocks into render groups.
///
/// Outside slide mode every block is its own group. In slide mode a group
/// opens at each level-1 header; at slide level 1 a horizontal rule also
/// closes the current group and is itself dropped. Empty groups are never
/// emitted.
pub fn group_blocks(blocks: &[Value], format: RenderFormat) -> Vec<Vec<&Value>> {
    let RenderFormat::Slides { level } = format else {
        return blocks.iter().map(|b| vec![b]).collect();
    };

    let mut groups = Vec::new();
    let mut current: Vec<&Value> = Vec::new();

    for block in blocks {
        if is_top_header(block) {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            current.push(block);
        } else if level == 1 && tag(block) == Some("HorizontalRule") {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(block);
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// `{"t": "Header", "c": [1, attr, inlines]}`
fn is_top_header(block: &Value) -> bool {
    tag(block) == Some("Header") && block["c"].get(0).and_then(Value::as_u64) == Some(1)
}
