//! Append-only line writer with size-based rotation.
//!
//! Before each write the current file size is checked against the rotation policy.
//! An oversized file is renamed to `<name>.<unix-seconds>` and a fresh file is
//! started; rotated files beyond the retention count are deleted, oldest first.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// When to rotate and how many rotated files to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub max_backups: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            max_backups: 3,
        }
    }
}

/// Thread-safe rotating writer. The file is opened lazily on first write.
pub struct FileWriter {
    file_path: PathBuf,
    policy: RotationPolicy,
    file: Mutex<Option<File>>,
}

impl FileWriter {
    pub const fn new(file_path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            file_path,
            policy,
            file: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline and flushes.
    ///
    /// # Errors
    ///
    /// Fails if rotation, opening, writing or flushing fails, or if the lock was
    /// poisoned by a panicking writer.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("writer lock poisoned: {e}")))?;

        if self.needs_rotation() {
            *guard = None;
            self.rotate()?;
        }

        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *guard = Some(file);
        }
        let Some(file) = guard.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "trace file is not open"));
        };

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.file_path).is_ok_and(|m| m.len() > self.policy.max_bytes)
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = chrono::Utc::now().timestamp();
        let rotated = PathBuf::from(format!("{}.{stamp}", self.file_path.display()));

        if self.file_path.exists() {
            fs::rename(&self.file_path, &rotated)?;
        }

        self.prune_backups()
    }

    /// Deletes rotated files beyond the retention count, newest kept.
    fn prune_backups(&self) -> io::Result<()> {
        let Some(parent) = self.file_path.parent() else {
            return Ok(());
        };
        let Some(name) = self.file_path.file_name().and_then(|n| n.to_str()) else {
            return Ok(());
        };
        let prefix = format!("{name}.");

        let dir = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };

        let mut backups: Vec<(u64, PathBuf)> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter_map(|path| {
                let stamp = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.strip_prefix(&prefix))
                    .and_then(|suffix| suffix.parse::<u64>().ok())?;
                Some((stamp, path))
            })
            .collect();

        backups.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, stale) in backups.iter().skip(self.policy.max_backups) {
            let _ = fs::remove_file(stale);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_when_over_limit_and_keeps_backups_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.json");
        for stamp in ["1000", "2000", "3000"] {
            fs::write(dir.path().join(format!("traces.json.{stamp}")), "old").unwrap();
        }

        let writer = FileWriter::new(path.clone(), RotationPolicy { max_bytes: 8, max_backups: 2 });
        writer.write_line("0123456789").unwrap();
        writer.write_line("next").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "next\n");
        let backups = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("traces.json."))
            .count();
        assert_eq!(backups, 2);
    }
}
