//! `[paths]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! home = "~/notes"                    # requested paths are relative to this
//! runtime_dir = "/run/user/1000/mdlive"
//! client_page = "~/.local/share/mdlive/viewer.html"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory the runtime state lives in when nothing else is configured.
const RUNTIME_SUBDIR: &str = "mdlive";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base directory for `filepath:` requests and pipe directives.
    pub home: PathBuf,

    /// Holds the named pipe and the advertised port/page files.
    /// Defaults to `$XDG_RUNTIME_DIR/mdlive`, falling back to `/tmp/mdlive`.
    pub runtime_dir: Option<PathBuf>,

    /// Viewer page advertised to editor integrations.
    pub client_page: Option<PathBuf>,

    /// Slide viewer page advertised to editor integrations.
    pub client_page_slides: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            home: PathBuf::from("~"),
            runtime_dir: None,
            client_page: None,
            client_page_slides: None,
        }
    }
}

impl PathsConfig {
    /// Effective runtime directory.
    pub fn runtime_dir(&self) -> PathBuf {
        self.runtime_dir.clone().unwrap_or_else(|| {
            std::env::var_os("XDG_RUNTIME_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(RUNTIME_SUBDIR)
        })
    }

    /// Named pipe that feeds new content.
    pub fn pipe_path(&self) -> PathBuf {
        self.runtime_dir().join("pipe")
    }

    /// Expand `~` and make every configured path absolute.
    pub(crate) fn expand(&mut self, base: &Path) {
        self.home = expand_path(&self.home, base);
        for slot in [
            &mut self.runtime_dir,
            &mut self.client_page,
            &mut self.client_page_slides,
        ] {
            if let Some(path) = slot.take() {
                *slot = Some(expand_path(&path, base));
            }
        }
    }
}

/// Tilde expansion followed by normalization against `base`.
fn expand_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    crate::utils::path::resolve_under(Path::new(&expanded), base)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::config::test_parse_config;

    #[test]
    fn test_paths_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.paths.home, PathBuf::from("~"));
        assert!(config.paths.client_page.is_none());
        assert!(config.paths.runtime_dir().ends_with("mdlive"));
    }

    #[test]
    fn test_pipe_inside_runtime_dir() {
        let config = test_parse_config("[paths]\nruntime_dir = \"/run/preview\"");
        assert_eq!(config.paths.pipe_path(), PathBuf::from("/run/preview/pipe"));
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_relative_paths() {
        let mut config = test_parse_config("[paths]\nhome = \"docs\"\nclient_page = \"view.html\"");
        config.paths.expand(Path::new("/nonexistent/base"));
        assert_eq!(config.paths.home, PathBuf::from("/nonexistent/base/docs"));
        assert_eq!(
            config.paths.client_page,
            Some(PathBuf::from("/nonexistent/base/view.html"))
        );
    }
}
