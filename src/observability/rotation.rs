//! Size-rotated log file with age and count based pruning.
//!
//! # Responsibilities
//! - Append records to the active file, opened lazily on first write
//! - Rename the active file to a timestamped backup when it would exceed the size limit
//! - Delete backups older than the age limit, then the oldest beyond the count limit
//!
//! # Design Decisions
//! - Backups live next to the active file: `<stem>-<UTC timestamp>.<ext>`
//! - Timestamps in backup names drive both ordering and ageing
//! - A single write larger than the size limit is rejected, never split
//! - Not synchronized; callers share it behind a `Mutex`

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{NaiveDateTime, SubsecRound, Utc};

use crate::config::LogConfiguration;
use crate::fs::{file_exists, folder_exists};

const BYTES_PER_MB: u64 = 1024 * 1024;
const SECS_PER_DAY: u64 = 24 * 60 * 60;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

/// Rotation thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Bytes before rotation. Zero disables size rotation.
    pub max_size: u64,
    /// Backups older than this are deleted.
    pub max_age: Option<Duration>,
    /// Backups retained. Zero keeps all.
    pub max_backups: usize,
}

impl RotationPolicy {
    /// Thresholds from configuration units (MB, days, count).
    pub fn from_config(config: &LogConfiguration) -> Self {
        let max_age = (config.max_file_age > 0)
            .then(|| Duration::from_secs(u64::from(config.max_file_age) * SECS_PER_DAY));
        Self {
            max_size: config.max_file_size.saturating_mul(BYTES_PER_MB),
            max_age,
            max_backups: config.max_file_backups as usize,
        }
    }
}

/// A log file that rotates transparently as it is written.
#[derive(Debug)]
pub struct RollingFile {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    size: u64,
    last_backup: Option<NaiveDateTime>,
}

impl RollingFile {
    /// Create a writer for `path`. Nothing is touched on disk until the first write.
    pub fn new(path: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            file: None,
            size: 0,
            last_backup: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Rename the active file to a backup and start a new one.
    pub fn rotate(&mut self) -> io::Result<()> {
        self.file = None;

        if file_exists(&self.path) {
            let backup = self.backup_path();
            fs::rename(&self.path, &backup)?;
            tracing::debug!(backup = %backup.display(), "Rotated log file");
        }

        self.open_new()?;
        self.prune()
    }

    /// Paths of existing backups, oldest first.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .scan_backups()?
            .into_iter()
            .map(|(_, path)| path)
            .collect())
    }

    fn active(&mut self, incoming: u64) -> io::Result<&mut File> {
        let limit = self.policy.max_size;
        if limit > 0 && incoming > limit {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("write of {incoming} bytes exceeds maximum log file size of {limit} bytes"),
            ));
        }

        if self.file.is_none() {
            self.open_existing()?;
        }

        if limit > 0 && self.size + incoming > limit {
            self.rotate()?;
        }

        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file is not open"))
    }

    fn open_existing(&mut self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.size = file.metadata()?.len();
        self.file = Some(file);
        self.prune()
    }

    fn open_new(&mut self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.size = 0;
        self.file = Some(file);
        Ok(())
    }

    fn prune(&self) -> io::Result<()> {
        let mut backups = self.scan_backups()?;

        if let Some(max_age) = self.policy.max_age {
            let max_age = chrono::Duration::from_std(max_age)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let cutoff = Utc::now().naive_utc() - max_age;
            let (expired, kept): (Vec<_>, Vec<_>) =
                backups.into_iter().partition(|(stamp, _)| *stamp < cutoff);
            for (_, path) in expired {
                remove_backup(&path)?;
            }
            backups = kept;
        }

        let max_backups = self.policy.max_backups;
        if max_backups > 0 && backups.len() > max_backups {
            let excess = backups.len() - max_backups;
            for (_, path) in backups.drain(..excess) {
                remove_backup(&path)?;
            }
        }

        Ok(())
    }

    fn scan_backups(&self) -> io::Result<Vec<(NaiveDateTime, PathBuf)>> {
        let (prefix, ext) = self.name_parts();
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut backups = Vec::new();
        if !folder_exists(&dir) {
            return Ok(backups);
        }

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(stamp) = parse_backup_name(name, &prefix, &ext) {
                backups.push((stamp, entry.path()));
            }
        }

        backups.sort();
        Ok(backups)
    }

    /// Backup names carry strictly increasing millisecond timestamps.
    fn backup_path(&mut self) -> PathBuf {
        let (prefix, ext) = self.name_parts();
        let step = chrono::Duration::milliseconds(1);

        let mut stamp = Utc::now().naive_utc().trunc_subsecs(3);
        if let Some(last) = self.last_backup {
            if stamp <= last {
                stamp = last + step;
            }
        }

        let mut candidate;
        loop {
            let name = format!("{prefix}{}{ext}", stamp.format(BACKUP_TIME_FORMAT));
            candidate = self.path.with_file_name(name);
            if !file_exists(&candidate) {
                break;
            }
            stamp += step;
        }

        self.last_backup = Some(stamp);
        candidate
    }

    /// `("<stem>-", ".<ext>")` for the active file name.
    fn name_parts(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        (format!("{stem}-"), ext)
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = self.active(buf.len() as u64)?;
        let written = file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn parse_backup_name(name: &str, prefix: &str, ext: &str) -> Option<NaiveDateTime> {
    let stamp = name.strip_prefix(prefix)?.strip_suffix(ext)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()
}

fn remove_backup(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(backup = %path.display(), "Removed old log backup");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_size: u64, max_backups: usize) -> RotationPolicy {
        RotationPolicy {
            max_size,
            max_age: None,
            max_backups,
        }
    }

    #[test]
    fn test_policy_from_config_units() {
        let policy = RotationPolicy::from_config(&LogConfiguration::default());
        assert_eq!(policy.max_size, 10 * 1024 * 1024);
        assert_eq!(policy.max_age, Some(Duration::from_secs(30 * 24 * 60 * 60)));
        assert_eq!(policy.max_backups, 10);

        let mut config = LogConfiguration::default();
        config.max_file_age = 0;
        assert_eq!(RotationPolicy::from_config(&config).max_age, None);
    }

    #[test]
    fn test_lazy_open_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("out.log");
        let mut file = RollingFile::new(&path, policy(1024, 0));
        assert!(!path.exists());

        file.write_all(b"hello\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.log");
        fs::write(&path, "first\n").unwrap();

        let mut file = RollingFile::new(&path, policy(1024, 0));
        file.write_all(b"second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_rotates_when_size_exceeded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.log");
        let mut file = RollingFile::new(&path, policy(10, 0));

        file.write_all(b"aaaaaaaa\n").unwrap();
        file.write_all(b"bbbbbbbb\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "bbbbbbbb\n");
        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "aaaaaaaa\n");
    }

    #[test]
    fn test_backup_count_is_capped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.log");
        let mut file = RollingFile::new(&path, policy(4, 2));

        for line in ["a1\n", "b2\n", "c3\n", "d4\n", "e5\n"] {
            file.write_all(line.as_bytes()).unwrap();
        }

        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), 2);
        // Oldest deleted first.
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "c3\n");
        assert_eq!(fs::read_to_string(&backups[1]).unwrap(), "d4\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "e5\n");
    }

    #[test]
    fn test_expired_backups_are_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.log");
        let stale = tmp.path().join("out-2000-01-01T00-00-00.000.log");
        fs::write(&stale, "old\n").unwrap();

        let mut file = RollingFile::new(
            &path,
            RotationPolicy {
                max_size: 4,
                max_age: Some(Duration::from_secs(SECS_PER_DAY)),
                max_backups: 0,
            },
        );
        file.write_all(b"a1\n").unwrap();
        file.write_all(b"b2\n").unwrap();

        assert!(!stale.exists());
        assert_eq!(file.backups().unwrap().len(), 1);
    }

    #[test]
    fn test_stale_backups_pruned_on_first_open() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.log");
        let stale = tmp.path().join("out-2000-01-01T00-00-00.000.log");
        fs::write(&stale, "old\n").unwrap();

        let mut file = RollingFile::new(
            &path,
            RotationPolicy {
                max_size: BYTES_PER_MB,
                max_age: Some(Duration::from_secs(SECS_PER_DAY)),
                max_backups: 0,
            },
        );
        file.write_all(b"first record\n").unwrap();

        assert!(!stale.exists());
        assert!(file.backups().unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "first record\n");
    }

    #[test]
    fn test_excess_backups_pruned_on_first_open() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.log");
        for day in ["01", "02", "03"] {
            let stamp = format!("2030-01-{day}T00-00-00.000");
            fs::write(tmp.path().join(format!("out-{stamp}.log")), "x\n").unwrap();
        }

        let mut file = RollingFile::new(&path, policy(BYTES_PER_MB, 1));
        file.write_all(b"a\n").unwrap();

        let backups = file.backups().unwrap();
        assert_eq!(backups, vec![tmp.path().join("out-2030-01-03T00-00-00.000.log")]);
    }

    #[test]
    fn test_concurrent_writers_rotate_without_losing_lines() {
        use std::sync::{Arc, Mutex};
        use std::thread;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.log");
        let shared = Arc::new(Mutex::new(RollingFile::new(&path, policy(64, 0))));

        let workers: Vec<_> = (0..8)
            .map(|t| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for seq in 0..50 {
                        let line = format!("t{t:02} s{seq:03}\n");
                        shared.lock().unwrap().write_all(line.as_bytes()).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let file = shared.lock().unwrap();
        let backups = file.backups().unwrap();
        assert!(!backups.is_empty());

        let mut lines: Vec<String> = Vec::new();
        for p in backups.iter().chain(std::iter::once(&path)) {
            lines.extend(fs::read_to_string(p).unwrap().lines().map(str::to_string));
        }
        assert_eq!(lines.len(), 8 * 50);
        assert!(lines.iter().all(|l| l.len() == 8 && l.starts_with('t')));
    }

    #[test]
    fn test_oversized_write_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut file = RollingFile::new(tmp.path().join("out.log"), policy(4, 0));
        let err = file.write_all(b"way too long").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_parse_backup_name() {
        assert!(parse_backup_name("out-2024-05-01T10-20-30.123.log", "out-", ".log").is_some());
        assert!(parse_backup_name("out-2024-05-01T10-20-30.123.log.gz", "out-", ".log").is_none());
        assert!(parse_backup_name("out.log", "out-", ".log").is_none());
        assert!(parse_backup_name("other-2024-05-01T10-20-30.123.log", "out-", ".log").is_none());
    }
}
