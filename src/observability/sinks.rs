//! Sink construction.
//!
//! # Responsibilities
//! - Build one `fmt` layer per enabled sink (console first, then file)
//! - Create the log directory, falling back to the working directory on permission errors
//! - Report the effective configuration (the directory logs actually land in)
//!
//! # Design Decisions
//! - Console records are human-readable and coloured; file records are JSON or plain text
//! - Every record is timestamped by its layer (RFC 3339, UTC)
//! - No enabled sink is valid: the layer list is empty and records are discarded

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{Layer, Registry};

use crate::config::LogConfiguration;
use crate::error::{Error, Result};
use crate::observability::rotation::{RollingFile, RotationPolicy};

/// A type-erased sink layer over the base registry.
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Output of [`build_sinks`].
pub struct Sinks {
    /// Layers in fan-out order.
    pub layers: Vec<BoxedLayer>,
    /// Configuration as applied, with `directory` rewritten after a fallback.
    pub config: LogConfiguration,
    /// Active log file, when file logging is enabled.
    pub log_file: Option<PathBuf>,
}

impl std::fmt::Debug for Sinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sinks")
            .field("layers", &self.layers.len())
            .field("config", &self.config)
            .field("log_file", &self.log_file)
            .finish()
    }
}

/// Where the file sink ended up writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDirectory {
    /// The configured directory was usable.
    Requested(PathBuf),
    /// Permission was denied; the working directory is used instead.
    Fallback(PathBuf),
}

impl LogDirectory {
    pub fn path(&self) -> &Path {
        match self {
            LogDirectory::Requested(path) | LogDirectory::Fallback(path) => path,
        }
    }
}

/// A rotating file sink ready to be wrapped in a layer.
#[derive(Debug)]
pub struct FileSink {
    pub writer: RollingFile,
    pub directory: LogDirectory,
}

/// Build the sink layers for `config`. An empty `directory` is resolved
/// against `base_dir`.
pub fn build_sinks(config: &LogConfiguration, base_dir: &Path) -> Result<Sinks> {
    let mut effective = config.clone();
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut log_file = None;

    if config.console_logging_enabled {
        layers.push(console_layer());
    }

    if config.file_logging_enabled {
        let sink = build_file_sink(config, base_dir)?;
        if let LogDirectory::Fallback(dir) = &sink.directory {
            effective.directory = directory_string(dir)?;
        }
        log_file = Some(sink.writer.path().to_path_buf());
        layers.push(file_layer(sink.writer, config.encode_logs_as_json));
    }

    tracing::debug!(
        sinks = layers.len(),
        log_file = ?log_file,
        "Logging sinks built"
    );

    Ok(Sinks {
        layers,
        config: effective,
        log_file,
    })
}

/// Create the log directory and the rotating writer for the file sink.
pub fn build_file_sink(config: &LogConfiguration, base_dir: &Path) -> Result<FileSink> {
    let requested = config.log_directory(base_dir);
    let directory = prepare_directory_with(&requested, &config.filename, create_log_dir)?;

    let writer = RollingFile::new(
        directory.path().join(&config.filename),
        RotationPolicy::from_config(config),
    );

    Ok(FileSink { writer, directory })
}

/// Create the directory holding `dir/filename` using `create`, retrying in
/// the working directory when permission is denied.
pub(crate) fn prepare_directory_with<F>(
    requested: &Path,
    filename: &str,
    create: F,
) -> Result<LogDirectory>
where
    F: Fn(&Path) -> io::Result<()>,
{
    let target = file_parent(requested, filename);

    match create(&target) {
        Ok(()) => Ok(LogDirectory::Requested(requested.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            let fallback = std::env::current_dir().map_err(|source| Error::Io {
                path: requested.to_path_buf(),
                source,
            })?;

            tracing::warn!(
                requested = %requested.display(),
                fallback = %fallback.display(),
                "Permission denied creating log directory, using working directory"
            );

            create(&file_parent(&fallback, filename)).map_err(|source| {
                Error::DirectoryFallback {
                    requested: requested.to_path_buf(),
                    fallback: fallback.clone(),
                    source,
                }
            })?;

            Ok(LogDirectory::Fallback(fallback))
        }
        Err(source) => Err(Error::Io {
            path: target,
            source,
        }),
    }
}

/// `Directory` is stored as a JSON string, so the path must be UTF-8.
fn directory_string(dir: &Path) -> Result<String> {
    dir.to_str().map(str::to_string).ok_or_else(|| Error::Io {
        path: dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, "log directory is not valid UTF-8"),
    })
}

fn file_parent(dir: &Path, filename: &str) -> PathBuf {
    let path = dir.join(filename);
    match path.parent() {
        Some(parent) => parent.to_path_buf(),
        None => dir.to_path_buf(),
    }
}

#[cfg(unix)]
fn create_log_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(path)
}

#[cfg(not(unix))]
fn create_log_dir(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
}

fn timer() -> ChronoUtc {
    ChronoUtc::rfc_3339()
}

fn console_layer() -> BoxedLayer {
    fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_timer(timer())
        .boxed()
}

fn file_layer(writer: RollingFile, json: bool) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .with_timer(timer());

    if json {
        layer.json().flatten_event(true).boxed()
    } else {
        layer.boxed()
    }
}
