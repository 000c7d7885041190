//! Bibliography rendering.
//!
//! Fingerprints are derived during every conversion and handed to the
//! bibliography actor, which renders them through the bibliography cache.

mod fingerprint;

pub use fingerprint::BibFingerprint;

use std::sync::Arc;

use crate::cache::Caches;
use crate::convert::{ConvertError, Converter};

/// Bibliography html for `fp`, from the cache or the converter.
///
/// An empty fingerprint renders to the empty string without touching
/// the converter.
pub fn render(
    fp: &BibFingerprint,
    converter: &dyn Converter,
    caches: &Caches,
) -> Result<Arc<str>, ConvertError> {
    let (Some(info), Some(id)) = (&fp.info, fp.id) else {
        return Ok(Arc::from(""));
    };

    let key = Caches::bibliography_key(info, id, &fp.cwd);
    if let Some(html) = caches.bibliographies.get(&key) {
        return Ok(html);
    }

    let html: Arc<str> = Arc::from(converter.render_bibliography(info, &fp.cwd)?);
    caches.bibliographies.insert(key, Arc::clone(&html));
    Ok(html)
}
