//! Where the CLI keeps its column database and logs.
//!
//! Defaults to the platform data and cache dirs. `--data-dir` puts
//! everything under one root instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use directories::ProjectDirs;

const LOG_PREFIX: &str = "datagrid-";
const CURRENT_LOG: &str = "datagrid.log";

/// Archived logs kept by [`AppPaths::rotate_logs`] by default.
pub const KEEP_LOGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    data: PathBuf,
    logs: PathBuf,
}

impl AppPaths {
    /// Resolve paths, preferring `root` when given. `None` when there is no
    /// override and no home directory.
    pub fn resolve(root: Option<PathBuf>) -> Option<Self> {
        match root {
            Some(root) => Some(Self::under(root)),
            None => {
                let dirs = ProjectDirs::from("dev", "datagrid", "datagrid")?;
                Some(Self {
                    data: dirs.data_dir().to_path_buf(),
                    logs: dirs.cache_dir().join("logs"),
                })
            }
        }
    }

    /// Everything under a single directory.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            logs: root.join("logs"),
            data: root,
        }
    }

    /// Saved column preferences for every widget.
    pub fn columns_db(&self) -> PathBuf {
        self.data.join("columns.db")
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs.join(CURRENT_LOG)
    }

    /// Archive the previous run's log under a timestamped name and keep
    /// only the newest `keep` archives.
    pub fn rotate_logs(&self, now: DateTime<Local>, keep: usize) -> io::Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.logs)?;
        let current = self.log_file();
        if current.exists() {
            fs::rename(&current, self.logs.join(archive_name(now)))?;
        }
        prune_archives(&self.logs, keep)
    }
}

fn archive_name(now: DateTime<Local>) -> String {
    format!("{LOG_PREFIX}{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Delete all but the newest `keep` archives. Returns what was removed.
fn prune_archives(dir: &Path, keep: usize) -> io::Result<Vec<PathBuf>> {
    let mut archives: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(LOG_PREFIX) && n.ends_with(".log"))
        })
        .collect();

    // timestamped names sort oldest first
    archives.sort();
    let excess = archives.len().saturating_sub(keep);
    let removed: Vec<PathBuf> = archives.drain(..excess).collect();
    for path in &removed {
        fs::remove_file(path)?;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_override_root_holds_everything() {
        let paths = AppPaths::resolve(Some(PathBuf::from("/tmp/grid"))).unwrap();
        assert_eq!(paths.columns_db(), PathBuf::from("/tmp/grid/columns.db"));
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/grid/logs/datagrid.log"));
    }

    #[test]
    fn test_rotation_archives_current_log() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::under(dir.path());
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        fs::write(paths.log_file(), "previous run").unwrap();

        let removed = paths.rotate_logs(at(9), KEEP_LOGS).unwrap();
        assert!(removed.is_empty());
        assert!(!paths.log_file().exists());
        let archived = dir.path().join("logs").join("datagrid-20260301_090000.log");
        assert_eq!(fs::read_to_string(archived).unwrap(), "previous run");
    }

    #[test]
    fn test_rotation_keeps_newest_archives() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::under(dir.path());
        let logs = dir.path().join("logs");
        fs::create_dir_all(&logs).unwrap();
        for hour in 1..=4 {
            fs::write(logs.join(archive_name(at(hour))), "").unwrap();
        }
        fs::write(logs.join("notes.txt"), "").unwrap();

        let removed = paths.rotate_logs(at(5), 2).unwrap();
        assert_eq!(
            removed,
            vec![
                logs.join("datagrid-20260301_010000.log"),
                logs.join("datagrid-20260301_020000.log"),
            ]
        );
        assert!(logs.join("datagrid-20260301_040000.log").exists());
        assert!(logs.join("notes.txt").exists());
    }
}
