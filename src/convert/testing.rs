//! In-process stand-in for the converter.
//!
//! Understands a tiny line language, one chunk per blank-line separated
//! paragraph:
//!
//! | chunk             | becomes                         |
//! |-------------------|---------------------------------|
//! | `key: value`      | metadata (`toc: true` is a bool) |
//! | `# A` / `## A`    | header                          |
//! | `---`             | horizontal rule                 |
//! | `@key`            | paragraph holding a citation    |
//! | `img:path`        | paragraph holding an image      |
//! | anything else     | paragraph                       |
//!
//! Content containing `FAIL` fails to parse; a group containing `BROKEN`
//! parses but fails to render.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Map, Value, json};

use super::converter::Converter;
use super::document::{Document, stringify, tag};
use super::error::ConvertError;
use super::slides::RenderFormat;

const META_KEYS: [&str; 6] = ["bibliography", "csl", "title", "toc", "toc-title", "suppress-bibliography"];

#[derive(Default)]
pub struct FakeConverter {
    parse_delay: Duration,
    bibliography_delay: Duration,
    parses: AtomicUsize,
    renders: AtomicUsize,
    standalones: AtomicUsize,
    bibliographies: AtomicUsize,
}

impl FakeConverter {
    /// Make every parse block for `delay`.
    pub fn with_parse_delay(delay: Duration) -> Self {
        Self {
            parse_delay: delay,
            ..Default::default()
        }
    }

    /// Make every bibliography render block for `delay`.
    pub fn with_bibliography_delay(delay: Duration) -> Self {
        Self {
            bibliography_delay: delay,
            ..Default::default()
        }
    }

    pub fn parse_calls(&self) -> usize {
        self.parses.load(Ordering::SeqCst)
    }

    pub fn render_calls(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    pub fn standalone_calls(&self) -> usize {
        self.standalones.load(Ordering::SeqCst)
    }

    pub fn bibliography_calls(&self) -> usize {
        self.bibliographies.load(Ordering::SeqCst)
    }
}

fn inlines(text: &str) -> Value {
    json!([{"t": "Str", "c": text}])
}

fn parse_chunk(chunk: &str, meta: &mut Map<String, Value>) -> Option<Value> {
    if let Some((key, value)) = chunk.split_once(": ")
        && META_KEYS.contains(&key)
    {
        let value = match value {
            "true" => json!({"t": "MetaBool", "c": true}),
            "false" => json!({"t": "MetaBool", "c": false}),
            _ => json!({"t": "MetaInlines", "c": inlines(value)}),
        };
        meta.insert(key.to_string(), value);
        return None;
    }

    let block = if chunk == "---" {
        json!({"t": "HorizontalRule"})
    } else if let Some(text) = chunk.strip_prefix("## ") {
        json!({"t": "Header", "c": [2, [text, [], []], inlines(text)]})
    } else if let Some(text) = chunk.strip_prefix("# ") {
        json!({"t": "Header", "c": [1, [text, [], []], inlines(text)]})
    } else if let Some(key) = chunk.strip_prefix('@') {
        json!({"t": "Para", "c": [{"t": "Cite", "c": [[{"citationId": key}], inlines(chunk)]}]})
    } else if let Some(path) = chunk.strip_prefix("img:") {
        json!({"t": "Para", "c": [{"t": "Image", "c": [["", [], []], [], [path, ""]]}]})
    } else {
        json!({"t": "Para", "c": inlines(chunk)})
    };
    Some(block)
}

fn render_block(block: &Value) -> String {
    let text = stringify(&block["c"]);
    match tag(block) {
        Some("Header") => {
            let level = block["c"][0].as_u64().unwrap_or(1);
            format!("<h{level}>{text}</h{level}>")
        }
        Some("HorizontalRule") => "<hr />".into(),
        Some("Para") => match tag(&block["c"][0]) {
            Some("Image") => {
                let src = block["c"][0]["c"][2][0].as_str().unwrap_or_default();
                format!(r#"<img src="{src}">"#)
            }
            Some("Cite") => format!(r#"<p><span class="citation">{text}</span></p>"#),
            _ => format!("<p>{text}</p>"),
        },
        _ => String::new(),
    }
}

fn read(document: &str) -> Result<Document, ConvertError> {
    Ok(Document::from_json(document.as_bytes())?)
}

impl Converter for FakeConverter {
    fn parse(&self, content: &str, _cwd: &Path) -> Result<Document, ConvertError> {
        self.parses.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.parse_delay);
        if content.contains("FAIL") {
            return Err(ConvertError::Converter(anyhow::anyhow!("cannot parse FAIL")));
        }

        let mut meta = Map::new();
        let blocks = content
            .split("\n\n")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .filter_map(|chunk| parse_chunk(chunk, &mut meta))
            .collect();

        Ok(Document {
            api_version: json!([1, 23, 1]),
            meta,
            blocks,
        })
    }

    fn render(
        &self,
        document: &str,
        _cwd: &Path,
        _format: RenderFormat,
    ) -> Result<String, ConvertError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if document.contains("BROKEN") {
            return Err(ConvertError::Converter(anyhow::anyhow!("cannot render BROKEN")));
        }
        Ok(read(document)?.blocks.iter().map(render_block).collect())
    }

    fn render_standalone(
        &self,
        document: &str,
        format: RenderFormat,
    ) -> Result<String, ConvertError> {
        self.standalones.fetch_add(1, Ordering::SeqCst);
        let doc = read(document)?;
        let Some(title) = doc.meta_text("title") else {
            return Ok("<body>\n</body>".into());
        };
        Ok(match format {
            RenderFormat::Html => format!(
                "<body>\n<header id=\"title-block-header\">\n<h1 class=\"title\">{title}</h1>\n</header>\n</body>"
            ),
            RenderFormat::Slides { .. } => format!(
                "<div class=\"slides\">\n<section id=\"title-slide\">\n<h1>{title}</h1>\n</section>\n</div>"
            ),
        })
    }

    fn render_bibliography(&self, document: &str, _cwd: &Path) -> Result<String, ConvertError> {
        self.bibliographies.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.bibliography_delay);
        let doc = read(document)?;
        Ok(format!(r#"<div id="refs">{}</div>"#, doc.blocks.len()))
    }
}
