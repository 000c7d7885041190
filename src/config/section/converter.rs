//! `[converter]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [converter]
//! program = "pandoc"
//! from = "markdown+emoji"
//! math = "katex"
//! ```

use serde::{Deserialize, Serialize};

/// External document converter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Converter executable, looked up on `PATH`.
    pub program: String,

    /// Input format passed as `--from` when parsing raw content.
    pub from: String,

    /// Math rendering method, passed as `--<math>` on every call.
    pub math: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "pandoc".into(),
            from: "markdown+emoji".into(),
            math: "mathjax".into(),
        }
    }
}

impl ConverterConfig {
    /// The math flag as it appears on the command line.
    pub fn math_flag(&self) -> String {
        format!("--{}", self.math)
    }
}
