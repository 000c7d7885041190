//! The converter's document AST, kept as JSON.
//!
//! Only the top level is typed: `pandoc-api-version`, `meta` and `blocks`.
//! Blocks and metadata values stay as [`Value`] because they are passed
//! back to the converter untouched; we only ever read a handful of meta
//! keys and walk blocks looking for citations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata keys that make up the standalone title block.
pub const TITLE_KEYS: [&str; 4] = ["author", "date", "subtitle", "title"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "pandoc-api-version")]
    pub api_version: Value,
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub blocks: Vec<Value>,
}

/// A document built from borrowed parts, used for every converter call
/// after the initial parse.
#[derive(Serialize)]
struct Fragment<'a, B: Serialize> {
    blocks: B,
    meta: &'a Map<String, Value>,
    #[serde(rename = "pandoc-api-version")]
    api_version: &'a Value,
}

/// Per-document flags forwarded to the viewer with every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFlags {
    pub suppress_bibliography: bool,
    pub reference_section_title: String,
    pub toc: bool,
    pub toc_title: Option<String>,
}

impl Document {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// `true` only for an explicit boolean `true`.
    pub fn meta_flag(&self, key: &str) -> bool {
        self.meta
            .get(key)
            .is_some_and(|v| tag(v) == Some("MetaBool") && v["c"] == Value::Bool(true))
    }

    /// Plain text of a string-like metadata value.
    pub fn meta_text(&self, key: &str) -> Option<String> {
        self.meta.get(key).and_then(meta_text)
    }

    /// The subset of `meta` named by `keys`, in the order of `keys`.
    pub fn meta_subset(&self, keys: &[&str]) -> Map<String, Value> {
        keys.iter()
            .filter_map(|&k| self.meta.get(k).map(|v| (k.to_string(), v.clone())))
            .collect()
    }

    pub fn flags(&self) -> DocumentFlags {
        DocumentFlags {
            suppress_bibliography: self.meta_flag("suppress-bibliography"),
            reference_section_title: self.meta_text("reference-section-title").unwrap_or_default(),
            toc: self.meta_flag("toc"),
            toc_title: self.meta_text("toc-title"),
        }
    }

    /// Serialize `blocks` as a document with empty metadata.
    pub fn fragment_json(&self, blocks: &[&Value]) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Fragment {
            blocks,
            meta: &Map::new(),
            api_version: &self.api_version,
        })
    }

    /// Serialize a block-less document carrying only the title metadata.
    pub fn title_json(&self) -> Result<String, serde_json::Error> {
        let meta = self.meta_subset(&TITLE_KEYS);
        let no_blocks: &[Value] = &[];
        serde_json::to_string(&Fragment {
            blocks: no_blocks,
            meta: &meta,
            api_version: &self.api_version,
        })
    }

    /// Serialize arbitrary blocks under the given metadata.
    pub fn with_meta_json(
        &self,
        blocks: &[Value],
        meta: &Map<String, Value>,
    ) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Fragment {
            blocks,
            meta,
            api_version: &self.api_version,
        })
    }

    /// Every `Cite` inline in document order, each wrapped in its own
    /// paragraph.
    pub fn citation_blocks(&self) -> Vec<Value> {
        let mut cites = Vec::new();
        for block in &self.blocks {
            collect_cites(block, &mut cites);
        }
        cites
            .into_iter()
            .map(|cite| serde_json::json!({ "t": "Para", "c": [cite] }))
            .collect()
    }
}

/// The `t` tag of an AST node.
pub fn tag(node: &Value) -> Option<&str> {
    node.get("t").and_then(Value::as_str)
}

/// Plain text of a metadata value; `None` for maps, lists and booleans.
pub fn meta_text(value: &Value) -> Option<String> {
    match tag(value)? {
        "MetaString" => value["c"].as_str().map(str::to_string),
        "MetaInlines" | "MetaBlocks" => Some(stringify(&value["c"])),
        _ => None,
    }
}

/// Concatenate the text of every inline below `node`.
pub fn stringify(node: &Value) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: &Value, out: &mut String) {
    match node {
        Value::Array(items) => items.iter().for_each(|item| push_text(item, out)),
        Value::Object(_) => match tag(node) {
            Some("Str") => out.push_str(node["c"].as_str().unwrap_or_default()),
            Some("Space" | "SoftBreak" | "LineBreak") => out.push(' '),
            // [attr, text] and [mathtype, text]
            Some("Code" | "Math") => {
                if let Some(text) = node["c"].get(1).and_then(Value::as_str) {
                    out.push_str(text);
                }
            }
            _ => {
                if let Some(children) = node.get("c") {
                    push_text(children, out);
                }
            }
        },
        _ => {}
    }
}

fn collect_cites(node: &Value, out: &mut Vec<Value>) {
    match node {
        Value::Array(items) => items.iter().for_each(|item| collect_cites(item, out)),
        Value::Object(_) if tag(node) == Some("Cite") => out.push(node.clone()),
        Value::Object(_) => {
            if let Some(children) = node.get("c") {
                collect_cites(children, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(meta: Value, blocks: Value) -> Document {
        serde_json::from_value(json!({
            "pandoc-api-version": [1, 23, 1],
            "meta": meta,
            "blocks": blocks,
        }))
        .unwrap()
    }

    fn inlines(text: &str) -> Value {
        let words: Vec<Value> = text
            .split(' ')
            .map(|w| json!({"t": "Str", "c": w}))
            .collect();
        let mut out = Vec::new();
        for (i, w) in words.into_iter().enumerate() {
            if i > 0 {
                out.push(json!({"t": "Space"}));
            }
            out.push(w);
        }
        Value::Array(out)
    }

    #[test]
    fn test_flags() {
        let d = doc(
            json!({
                "toc": {"t": "MetaBool", "c": true},
                "suppress-bibliography": {"t": "MetaBool", "c": false},
                "toc-title": {"t": "MetaInlines", "c": inlines("Contents here")},
                "reference-section-title": {"t": "MetaString", "c": "Refs"},
            }),
            json!([]),
        );
        let flags = d.flags();
        assert!(flags.toc);
        assert!(!flags.suppress_bibliography);
        assert_eq!(flags.toc_title.as_deref(), Some("Contents here"));
        assert_eq!(flags.reference_section_title, "Refs");
    }

    #[test]
    fn test_flags_default() {
        let flags = doc(json!({}), json!([])).flags();
        assert_eq!(flags, DocumentFlags::default());
    }

    #[test]
    fn test_meta_flag_ignores_string_true() {
        let d = doc(json!({"toc": {"t": "MetaString", "c": "true"}}), json!([]));
        assert!(!d.meta_flag("toc"));
    }

    #[test]
    fn test_stringify_nested() {
        let node = json!([
            {"t": "Emph", "c": [{"t": "Str", "c": "very"}]},
            {"t": "Space"},
            {"t": "Code", "c": [["", [], []], "x+1"]},
            {"t": "Link", "c": [["", [], []], [{"t": "Str", "c": "here"}], ["http://x", ""]]},
        ]);
        assert_eq!(stringify(&node), "very x+1here");
    }

    #[test]
    fn test_meta_subset_follows_key_order() {
        let d = doc(
            json!({
                "title": {"t": "MetaString", "c": "T"},
                "author": {"t": "MetaString", "c": "A"},
                "other": {"t": "MetaString", "c": "O"},
            }),
            json!([]),
        );
        let subset = d.meta_subset(&TITLE_KEYS);
        let keys: Vec<_> = subset.keys().map(String::as_str).collect();
        assert_eq!(keys, ["author", "title"]);
    }

    #[test]
    fn test_fragment_json_shape() {
        let d = doc(
            json!({"title": {"t": "MetaString", "c": "T"}}),
            json!([{"t": "HorizontalRule"}]),
        );
        let refs: Vec<&Value> = d.blocks.iter().collect();
        let parsed: Value = serde_json::from_str(&d.fragment_json(&refs).unwrap()).unwrap();
        assert_eq!(parsed["meta"], json!({}));
        assert_eq!(parsed["blocks"], json!([{"t": "HorizontalRule"}]));
        assert_eq!(parsed["pandoc-api-version"], json!([1, 23, 1]));
    }

    #[test]
    fn test_title_json_has_no_blocks() {
        let d = doc(
            json!({"title": {"t": "MetaString", "c": "T"}, "toc": {"t": "MetaBool", "c": true}}),
            json!([{"t": "HorizontalRule"}]),
        );
        let parsed: Value = serde_json::from_str(&d.title_json().unwrap()).unwrap();
        assert_eq!(parsed["blocks"], json!([]));
        assert!(parsed["meta"].get("title").is_some());
        assert!(parsed["meta"].get("toc").is_none());
    }

    #[test]
    fn test_citation_blocks() {
        let cite = json!({"t": "Cite", "c": [[], [{"t": "Str", "c": "[@a]"}]]});
        let d = doc(
            json!({}),
            json!([
                {"t": "Para", "c": [{"t": "Str", "c": "see"}, cite.clone()]},
                {"t": "BlockQuote", "c": [{"t": "Para", "c": [cite.clone()]}]},
                {"t": "Para", "c": [{"t": "Str", "c": "none"}]},
            ]),
        );
        let blocks = d.citation_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], json!({"t": "Para", "c": [cite]}));
    }
}
