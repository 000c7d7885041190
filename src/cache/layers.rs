//! The four memo tables sitting in front of the converter.
//!
//! | table          | key parts                               | value          |
//! |----------------|-----------------------------------------|----------------|
//! | documents      | raw content, working dir                | parsed AST     |
//! | blocks         | block group json, working dir, format   | one html block |
//! | titles         | title metadata json, format             | title blocks   |
//! | bibliographies | fingerprint text, bibliography id, dir  | html           |
//!
//! Whole-document tables are small because their entries are large and
//! churn on every edit. Block-level tables are large because their entries
//! are small and survive edits to unrelated blocks.

use std::path::Path;
use std::sync::Arc;

use super::BoundedCache;
use crate::config::CacheConfig;
use crate::convert::{Document, HtmlBlock, RenderFormat};
use crate::utils::hash::{ContentHash, KeyHasher};

pub struct Caches {
    pub documents: BoundedCache<Arc<Document>>,
    pub blocks: BoundedCache<HtmlBlock>,
    pub titles: BoundedCache<Arc<Vec<HtmlBlock>>>,
    pub bibliographies: BoundedCache<Arc<str>>,
}

impl Caches {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            documents: BoundedCache::new("documents", config.documents),
            blocks: BoundedCache::new("blocks", config.blocks),
            titles: BoundedCache::new("titles", config.titles),
            bibliographies: BoundedCache::new("bibliographies", config.bibliographies),
        }
    }

    pub fn document_key(content: &str, cwd: &Path) -> ContentHash {
        KeyHasher::new().part(content).path(cwd).finish()
    }

    pub fn block_key(group_json: &str, cwd: &Path, format: RenderFormat) -> ContentHash {
        KeyHasher::new()
            .part(group_json)
            .path(cwd)
            .part(&format.cache_tag())
            .finish()
    }

    pub fn title_key(title_json: &str, format: RenderFormat) -> ContentHash {
        KeyHasher::new()
            .part(title_json)
            .part(&format.cache_tag())
            .finish()
    }

    pub fn bibliography_key(info: &str, id: u64, cwd: &Path) -> ContentHash {
        KeyHasher::new()
            .part(info)
            .part(&id.to_le_bytes())
            .path(cwd)
            .finish()
    }
}

impl Default for Caches {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
