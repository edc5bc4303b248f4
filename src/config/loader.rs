//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::schema::LogConfiguration;
use crate::error::{Error, Result};
use crate::fs::{entry_kind, EntryKind};

/// Indentation used when writing the configuration file.
const INDENT: &[u8] = b" ";

/// Load the configuration at `dir/filename`, writing defaults first if the
/// file does not exist.
///
/// The whole struct is replaced by what the file holds; keys absent from the
/// file are zero-valued.
pub fn load_config(dir: &Path, filename: &str) -> Result<LogConfiguration> {
    let path = dir.join(filename);

    let kind = entry_kind(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    match kind {
        EntryKind::Missing => {
            write_default_config(dir, filename)?;
        }
        EntryKind::Folder => {
            return Err(Error::ConfigRead {
                path,
                source: io::Error::new(io::ErrorKind::InvalidInput, "path is a directory"),
            });
        }
        EntryKind::File => {}
    }

    let content = fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    let config = serde_json::from_str(&content)
        .map_err(|source| Error::ConfigParse { path: path.clone(), source })?;

    tracing::debug!(path = %path.display(), "Logging configuration loaded");
    Ok(config)
}

/// Write the default configuration to `dir/filename`, creating parent
/// directories as needed.
pub fn write_default_config(dir: &Path, filename: &str) -> Result<PathBuf> {
    let path = dir.join(filename);
    let contents = encode_config(&LogConfiguration::default())?;

    let parent = path.parent().unwrap_or(dir);
    fs::create_dir_all(parent).map_err(|source| Error::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    fs::write(&path, contents).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), "Created default logging configuration");
    Ok(path)
}

/// Encode a configuration the way it is stored on disk.
pub fn encode_config(config: &LogConfiguration) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    config.serialize(&mut ser).map_err(Error::Serialize)?;
    Ok(buf)
}
