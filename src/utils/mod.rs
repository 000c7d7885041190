//! Utility modules shared by the preview pipeline.

pub mod exec;
pub mod hash;
pub mod path;
