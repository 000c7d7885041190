//! The external document converter.
//!
//! [`Converter`] is the blocking seam between the pipeline and the
//! process it shells out to. [`Pandoc`] is the real implementation;
//! tests substitute their own.

use std::path::Path;

use super::document::Document;
use super::error::ConvertError;
use super::slides::RenderFormat;
use crate::config::ConverterConfig;
use crate::debug;
use crate::utils::exec::{Cmd, FilterRule, SILENT_FILTER};

/// Converter stderr lines not worth surfacing in verbose logs.
static PANDOC_FILTER: FilterRule = FilterRule::new(&["[WARNING] This document format requires"]);

/// Every method blocks until the converter process exits.
pub trait Converter: Send + Sync + 'static {
    /// Parse raw content into a document.
    fn parse(&self, content: &str, cwd: &Path) -> Result<Document, ConvertError>;

    /// Render a block-group document to an html fragment.
    fn render(&self, document: &str, cwd: &Path, format: RenderFormat)
    -> Result<String, ConvertError>;

    /// Render a metadata-only document to a standalone page.
    fn render_standalone(&self, document: &str, format: RenderFormat)
    -> Result<String, ConvertError>;

    /// Render a citations-only document to its bibliography.
    fn render_bibliography(&self, document: &str, cwd: &Path) -> Result<String, ConvertError>;
}

/// How the installed converter resolves citations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Citeproc {
    /// `--citeproc`
    Builtin,
    /// `--filter pandoc-citeproc`, for converters predating the builtin.
    Filter,
}

impl Citeproc {
    fn args(self) -> &'static [&'static str] {
        match self {
            Self::Builtin => &["--citeproc"],
            Self::Filter => &["--filter", "pandoc-citeproc"],
        }
    }
}

pub struct Pandoc {
    config: ConverterConfig,
    citeproc: Citeproc,
}

impl Pandoc {
    /// Check the installed converter and build the invocation table.
    pub fn detect(config: ConverterConfig) -> Self {
        let citeproc = Self::detect_citeproc(&config.program);
        debug!("convert"; "{} citation support: {:?}", config.program, citeproc);
        Self { config, citeproc }
    }

    fn detect_citeproc(program: &str) -> Citeproc {
        let check = Cmd::new(program)
            .arg("--citeproc")
            .stdin("")
            .filter(&SILENT_FILTER)
            .run();
        if check.is_ok() {
            Citeproc::Builtin
        } else {
            Citeproc::Filter
        }
    }

    fn run(&self, args: &[&str], cwd: Option<&Path>, input: &str) -> Result<String, ConvertError> {
        let mut cmd = Cmd::new(&self.config.program)
            .args(args)
            .arg(self.config.math_flag())
            .stdin(input)
            .filter(&PANDOC_FILTER);
        if let Some(dir) = cwd {
            cmd = cmd.cwd(dir);
        }
        let output = cmd.run().map_err(ConvertError::Converter)?;
        Ok(String::from_utf8(output.stdout)?)
    }

    fn run_with_format(
        &self,
        args: &[&str],
        format: RenderFormat,
        cwd: Option<&Path>,
        input: &str,
    ) -> Result<String, ConvertError> {
        let format_args = format.args();
        let args: Vec<&str> = args
            .iter()
            .copied()
            .chain(format_args.iter().map(String::as_str))
            .collect();
        self.run(&args, cwd, input)
    }
}

impl Converter for Pandoc {
    fn parse(&self, content: &str, cwd: &Path) -> Result<Document, ConvertError> {
        let json = self.run(
            &["--from", &self.config.from, "--to", "json"],
            Some(cwd),
            content,
        )?;
        Ok(Document::from_json(json.as_bytes())?)
    }

    fn render(
        &self,
        document: &str,
        cwd: &Path,
        format: RenderFormat,
    ) -> Result<String, ConvertError> {
        self.run_with_format(&["--from", "json"], format, Some(cwd), document)
    }

    fn render_standalone(
        &self,
        document: &str,
        format: RenderFormat,
    ) -> Result<String, ConvertError> {
        self.run_with_format(&["--from", "json", "--standalone"], format, None, document)
    }

    fn render_bibliography(&self, document: &str, cwd: &Path) -> Result<String, ConvertError> {
        let args: Vec<&str> = ["--from", "json"]
            .into_iter()
            .chain(self.citeproc.args().iter().copied())
            .collect();
        self.run_with_format(&args, RenderFormat::Html, Some(cwd), document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pandoc_with(program: &str) -> Pandoc {
        Pandoc {
            config: ConverterConfig {
                program: program.into(),
                ..Default::default()
            },
            citeproc: Citeproc::Builtin,
        }
    }

    #[test]
    fn test_citeproc_args() {
        assert_eq!(Citeproc::Builtin.args(), ["--citeproc"]);
        assert_eq!(Citeproc::Filter.args(), ["--filter", "pandoc-citeproc"]);
    }

    #[test]
    fn test_citeproc_falls_back_when_missing() {
        assert_eq!(
            Pandoc::detect_citeproc("mdlive-no-such-converter"),
            Citeproc::Filter
        );
    }

    #[test]
    fn test_missing_program_is_converter_error() {
        let pandoc = pandoc_with("mdlive-no-such-converter");
        let err = pandoc.parse("# A", Path::new("/")).unwrap_err();
        assert!(matches!(err, ConvertError::Converter(_)));
    }
}
