//! Markdown to html blocks.
//!
//! # Module Structure
//!
//! ```text
//! convert/
//! ├── converter   # Converter trait, Pandoc process wrapper
//! ├── document    # Document AST and metadata accessors
//! ├── error       # ConvertError
//! ├── html        # Link rewriting, title extraction
//! ├── pipeline    # Cached, parallel conversion
//! └── slides      # Slide directive and block grouping
//! ```

pub mod converter;
pub mod document;
mod error;
pub mod html;
mod pipeline;
pub mod slides;

#[cfg(test)]
pub mod testing;

pub use converter::{Converter, Pandoc};
pub use document::{Document, DocumentFlags};
pub use error::ConvertError;
pub use pipeline::{Conversion, HtmlBlock, Pipeline};
pub use slides::RenderFormat;
