//! Serve lifecycle: runtime directory, named pipe, advertised files and
//! the actor system.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::{
    actor::Coordinator,
    config::{PathsConfig, PreviewConfig},
    convert::Pandoc,
    core::register_shutdown,
    log,
    utils::exec::{Cmd, SILENT_FILTER},
};

/// Port the viewer pages connect to without a `?port=` query.
const DEFAULT_VIEWER_PORT: u16 = 9877;

/// Worker threads for the actor runtime; conversions run on the blocking pool.
const WORKER_THREADS: usize = 2;

/// Files written into the runtime directory for editor integrations.
const PORT_FILE: &str = "websocket_port";
const CLIENT_FILE: &str = "client_path";
const CLIENT_SLIDES_FILE: &str = "client_path_revealjs";

/// Run the preview server until Ctrl+C.
pub fn serve(config: PreviewConfig) -> Result<()> {
    let config = Arc::new(config);
    let pipe = prepare_runtime(&config.paths)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(WORKER_THREADS)
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded(1);
    register_shutdown(shutdown_tx);

    let converter = Arc::new(Pandoc::detect(config.converter.clone()));
    let paths = config.paths.clone();

    rt.block_on(async move {
        Coordinator::new(config, converter)
            .with_shutdown_signal(shutdown_rx)
            .run(|port| {
                advertise(&paths, port)?;
                print_banner(&pipe, paths.client_page.as_deref(), port);
                Ok(())
            })
            .await
    })
}

/// Create the runtime directory and the named pipe inside it.
fn prepare_runtime(paths: &PathsConfig) -> Result<PathBuf> {
    let dir = paths.runtime_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create runtime directory {}", dir.display()))?;

    let pipe = paths.pipe_path();
    if !is_fifo(&pipe) {
        if pipe.exists() {
            fs::remove_file(&pipe)
                .with_context(|| format!("Failed to replace {}", pipe.display()))?;
        }
        Cmd::new("mkfifo")
            .arg(&pipe)
            .filter(&SILENT_FILTER)
            .run()
            .with_context(|| format!("Failed to create named pipe {}", pipe.display()))?;
    }
    Ok(pipe)
}

#[cfg(unix)]
fn is_fifo(path: &Path) -> bool {
    use std::os::unix::fs::FileTypeExt;
    fs::metadata(path).is_ok_and(|meta| meta.file_type().is_fifo())
}

#[cfg(not(unix))]
fn is_fifo(_path: &Path) -> bool {
    false
}

/// Write the bound port and the configured viewer pages for editor plugins.
fn advertise(paths: &PathsConfig, port: u16) -> Result<()> {
    let dir = paths.runtime_dir();
    let write = |name: &str, value: &str| {
        let file = dir.join(name);
        fs::write(&file, value).with_context(|| format!("Failed to write {}", file.display()))
    };

    write(PORT_FILE, &port.to_string())?;
    if let Some(page) = &paths.client_page {
        write(CLIENT_FILE, &page.to_string_lossy())?;
    }
    if let Some(page) = &paths.client_page_slides {
        write(CLIENT_SLIDES_FILE, &page.to_string_lossy())?;
    }
    Ok(())
}

fn print_banner(pipe: &Path, client_page: Option<&Path>, port: u16) {
    log!("serve"; "viewer websocket on port {}", port);
    println!();
    println!("Pipe new content to {}, for example,", pipe.display().cyan());
    println!("    echo '# Hello World!' > {}", pipe.display());

    if let Some(page) = client_page {
        let query = if port == DEFAULT_VIEWER_PORT {
            String::new()
        } else {
            format!("?port={port}")
        };
        println!();
        println!("Direct your browser to");
        println!("    {}", format!("file://{}{}", page.display(), query).cyan());
        println!("to view the rendered markdown");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_in(dir: &Path) -> PathsConfig {
        PathsConfig {
            runtime_dir: Some(dir.join("run")),
            ..PathsConfig::default()
        }
    }

    #[test]
    fn test_advertise_port_only() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        fs::create_dir_all(paths.runtime_dir()).unwrap();

        advertise(&paths, 9880).unwrap();

        let run = paths.runtime_dir();
        assert_eq!(fs::read_to_string(run.join(PORT_FILE)).unwrap(), "9880");
        assert!(!run.join(CLIENT_FILE).exists());
        assert!(!run.join(CLIENT_SLIDES_FILE).exists());
    }

    #[test]
    fn test_advertise_client_pages() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = paths_in(dir.path());
        paths.client_page = Some(PathBuf::from("/srv/viewer.html"));
        paths.client_page_slides = Some(PathBuf::from("/srv/slides.html"));
        fs::create_dir_all(paths.runtime_dir()).unwrap();

        advertise(&paths, 9877).unwrap();

        let run = paths.runtime_dir();
        assert_eq!(
            fs::read_to_string(run.join(CLIENT_FILE)).unwrap(),
            "/srv/viewer.html"
        );
        assert_eq!(
            fs::read_to_string(run.join(CLIENT_SLIDES_FILE)).unwrap(),
            "/srv/slides.html"
        );
    }

    #[test]
    fn test_advertise_missing_runtime_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        assert!(advertise(&paths, 9877).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_prepare_runtime_creates_fifo() {
        if which::which("mkfifo").is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());

        let pipe = prepare_runtime(&paths).unwrap();
        assert!(is_fifo(&pipe));
        // a second start reuses the existing pipe
        assert_eq!(prepare_runtime(&paths).unwrap(), pipe);
    }

    #[cfg(unix)]
    #[test]
    fn test_is_fifo_regular_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(!is_fifo(file.path()));
    }
}
