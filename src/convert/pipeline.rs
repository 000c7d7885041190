//! Content to html blocks, through the memo tables.
//!
//! ```text
//! content ─► document ─┬─► fingerprint ─► bibliography actor
//!   (cache)            ├─► title block      (cache)
//!                      └─► block groups     (cache, rendered in parallel)
//! ```
//!
//! Converter calls run on the blocking pool; groups missing from the
//! block cache are fanned out over rayon and reassembled in document
//! order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::spawn_blocking;

use super::converter::Converter;
use super::document::{Document, DocumentFlags};
use super::error::ConvertError;
use super::html::{extract_title, rewrite_links, unwrap_section};
use super::slides::{RenderFormat, group_blocks, split_directive};
use crate::actor::messages::BibMsg;
use crate::bibliography::BibFingerprint;
use crate::cache::Caches;
use crate::debug;
use crate::utils::hash::stable_id;

/// One rendered block group: `[id, html]` on the wire.
///
/// The id is derived from the html, so the viewer can skip blocks it
/// already shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlBlock(pub u64, pub String);

impl HtmlBlock {
    pub fn new(html: String) -> Self {
        Self(stable_id(&html), html)
    }

    #[cfg(test)]
    pub fn html(&self) -> &str {
        &self.1
    }
}

/// Result of one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Title blocks first, then one block per group.
    pub blocks: Vec<HtmlBlock>,
    pub flags: DocumentFlags,
    pub bibliography_id: Option<u64>,
}

pub struct Pipeline {
    converter: Arc<dyn Converter>,
    caches: Arc<Caches>,
    bib_tx: mpsc::Sender<BibMsg>,
}

impl Pipeline {
    pub fn new(
        converter: Arc<dyn Converter>,
        caches: Arc<Caches>,
        bib_tx: mpsc::Sender<BibMsg>,
    ) -> Self {
        Self {
            converter,
            caches,
            bib_tx,
        }
    }

    pub fn converter(&self) -> Arc<dyn Converter> {
        Arc::clone(&self.converter)
    }

    /// Convert `content` whose relative links resolve against `cwd`.
    pub async fn convert(&self, content: &str, cwd: &Path) -> Result<Conversion, ConvertError> {
        let (format, body) = split_directive(content);
        let doc = self.document(body, cwd).await?;

        let fingerprint = {
            let doc = Arc::clone(&doc);
            let cwd = cwd.to_path_buf();
            spawn_blocking(move || BibFingerprint::derive(&doc, &cwd)).await?
        };
        let bibliography_id = fingerprint.id;
        if self.bib_tx.send(BibMsg::Update(fingerprint)).await.is_err() {
            debug!("convert"; "bibliography actor is gone");
        }

        let title = self.title(&doc, format).await?;
        let groups = self.groups(&doc, cwd, format).await?;

        let mut blocks = Vec::with_capacity(title.len() + groups.len());
        blocks.extend(title.iter().cloned());
        blocks.extend(groups);

        Ok(Conversion {
            blocks,
            flags: doc.flags(),
            bibliography_id,
        })
    }

    async fn document(&self, content: &str, cwd: &Path) -> Result<Arc<Document>, ConvertError> {
        let key = Caches::document_key(content, cwd);
        if let Some(doc) = self.caches.documents.get(&key) {
            return Ok(doc);
        }

        let converter = self.converter();
        let content = content.to_string();
        let cwd = cwd.to_path_buf();
        let doc = spawn_blocking(move || converter.parse(&content, &cwd)).await??;

        let doc = Arc::new(doc);
        self.caches.documents.insert(key, Arc::clone(&doc));
        Ok(doc)
    }

    async fn title(
        &self,
        doc: &Document,
        format: RenderFormat,
    ) -> Result<Arc<Vec<HtmlBlock>>, ConvertError> {
        let json = doc.title_json()?;
        let key = Caches::title_key(&json, format);
        if let Some(blocks) = self.caches.titles.get(&key) {
            return Ok(blocks);
        }

        let converter = self.converter();
        let page = spawn_blocking(move || converter.render_standalone(&json, format)).await??;
        let blocks: Vec<HtmlBlock> = extract_title(&page, format)
            .map(|html| HtmlBlock::new(html.to_string()))
            .into_iter()
            .collect();

        let blocks = Arc::new(blocks);
        self.caches.titles.insert(key, Arc::clone(&blocks));
        Ok(blocks)
    }

    async fn groups(
        &self,
        doc: &Document,
        cwd: &Path,
        format: RenderFormat,
    ) -> Result<Vec<HtmlBlock>, ConvertError> {
        let jsons = group_blocks(&doc.blocks, format)
            .iter()
            .map(|group| doc.fragment_json(group))
            .collect::<Result<Vec<_>, _>>()?;
        let keys: Vec<_> = jsons
            .iter()
            .map(|json| Caches::block_key(json, cwd, format))
            .collect();

        let mut slots: Vec<Option<HtmlBlock>> =
            keys.iter().map(|key| self.caches.blocks.get(key)).collect();
        let misses: Vec<(usize, String)> = jsons
            .into_iter()
            .enumerate()
            .filter(|(i, _)| slots[*i].is_none())
            .collect();

        if !misses.is_empty() {
            debug!("convert"; "rendering {} of {} blocks", misses.len(), slots.len());
            let converter = self.converter();
            let cwd: PathBuf = cwd.to_path_buf();
            let rendered = spawn_blocking(move || {
                misses
                    .into_par_iter()
                    .map(|(i, json)| (i, render_group(&*converter, &json, &cwd, format)))
                    .collect::<Vec<_>>()
            })
            .await?;

            // Keep every group that rendered, then report the first failure.
            let mut first_err = None;
            for (i, block) in rendered {
                match block {
                    Ok(block) => {
                        self.caches.blocks.insert(keys[i], block.clone());
                        slots[i] = Some(block);
                    }
                    Err(e) => {
                        first_err.get_or_insert(e);
                    }
                }
            }
            if let Some(e) = first_err {
                return Err(e);
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

fn render_group(
    converter: &dyn Converter,
    json: &str,
    cwd: &Path,
    format: RenderFormat,
) -> Result<HtmlBlock, ConvertError> {
    let html = converter.render(json, cwd, format)?;
    let html = rewrite_links(&html, cwd);
    let html = if format.is_slides() {
        unwrap_section(&html).to_string()
    } else {
        html.into_owned()
    };
    Ok(HtmlBlock::new(html))
}
