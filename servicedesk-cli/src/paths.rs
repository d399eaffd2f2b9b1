//! Platform directories for config and logs.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "servicedesk";
const APPLICATION: &str = "servicedesk";

const LATEST_LOG: &str = "latest.log";

/// Archived logs kept besides `latest.log`.
const KEPT_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Default config file.
///
/// - Linux: `$XDG_CONFIG_HOME/servicedesk/config.toml`
/// - macOS: `~/Library/Application Support/org.servicedesk.servicedesk/config.toml`
/// - Windows: `%APPDATA%\servicedesk\servicedesk\config\config.toml`
pub fn config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Directory holding the log files (the platform cache dir).
pub fn log_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// The log file written by the current run.
pub fn log_file() -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archives the previous run's log under a timestamp and prunes old
/// archives. Runs before the logger opens `latest.log`.
pub fn rotate_logs() {
    let Some(dir) = log_dir() else { return };
    archive_latest(&dir, &chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
    prune_logs(&dir, KEPT_LOGS);
}

fn archive_latest(dir: &Path, stamp: &str) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let _ = fs::rename(&latest, dir.join(format!("{stamp}.log")));
    }
}

fn prune_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut archived: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first.
    archived.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    let excess = archived.len().saturating_sub(keep);
    for entry in archived.iter().take(excess) {
        let _ = fs::remove_file(entry.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("servicedesk-paths-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_archive_latest() {
        let dir = scratch("archive");
        fs::write(dir.join(LATEST_LOG), "old run").unwrap();

        archive_latest(&dir, "20240101_120000");

        assert!(!dir.join(LATEST_LOG).exists());
        assert_eq!(fs::read_to_string(dir.join("20240101_120000.log")).unwrap(), "old run");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_prune_keeps_latest_and_newest() {
        let dir = scratch("prune");
        for i in 0..5 {
            fs::write(dir.join(format!("2024010{i}_000000.log")), "").unwrap();
        }
        fs::write(dir.join(LATEST_LOG), "").unwrap();
        fs::write(dir.join("config.toml"), "").unwrap();

        prune_logs(&dir, 2);

        let logs = fs::read_dir(&dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".log"))
            .count();
        assert_eq!(logs, 3);
        assert!(dir.join(LATEST_LOG).exists());
        assert!(dir.join("config.toml").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
