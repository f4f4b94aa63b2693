//! Milestone log: one timestamped line per pipeline phase.
//!
//! Write-only telemetry, never read back by the pipeline. Format is
//! `YYYY-MM-DD HH:MM:SS - <message>`, one line per milestone.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one timestamped milestone line.
    pub fn record(&self, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{timestamp} - {message}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etl_process.log");
        let log = ProgressLog::new(&path);
        log.record("Process: start").unwrap();
        log.record("Process: complete").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - Process: start"));
        assert!(lines[1].ends_with(" - Process: complete"));
        // `YYYY-MM-DD HH:MM:SS` prefix
        assert_eq!(lines[0].split(" - ").next().unwrap().len(), 19);
    }
}
