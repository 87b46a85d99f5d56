// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-run log folder naming and cleanup.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Folder name for a run started at `started`, e.g. `run_20250101_120000`.
pub fn run_folder_name(started: DateTime<Utc>) -> String {
    format!("{}{}", RUN_PREFIX, started.format(RUN_TIMESTAMP_FORMAT))
}

/// Start time encoded in a run folder name.
pub fn parse_run_folder_name(name: &str) -> Option<DateTime<Utc>> {
    let timestamp = name.strip_prefix(RUN_PREFIX)?;
    NaiveDateTime::parse_from_str(timestamp, RUN_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Clean up old log directories based on retention policy
///
/// Runs older than `retention_days` are removed first, then the oldest of
/// the rest until at most `retention_runs` remain. Returns the number removed.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
    now: DateTime<Utc>,
) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let cutoff_date = now - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(started) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_run_folder_name)
        {
            runs.push((path, started));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, dt)| *dt);

    let expired = runs.iter().take_while(|(_, dt)| *dt < cutoff_date).count();
    let surplus = (runs.len() - expired).saturating_sub(retention_runs);

    let mut removed_count = 0;
    for (path, _) in runs.iter().take(expired + surplus) {
        match std::fs::remove_dir_all(path) {
            Ok(()) => removed_count += 1,
            Err(e) => eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            ),
        }
    }

    Ok(removed_count)
}
