//! Telegram group search, delegated to an external script.
//!
//! The script receives the keyword as its only argument and prints a JSON
//! array of `{"date": ..., "link": ...}` objects, newest first.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use super::Searcher;
use crate::config::GroupSearchConfig;
use crate::errors::SearchError;

/// One matching group message as reported by the script
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupHit {
    pub date: String,
    pub link: String,
}

/// Decode the script's stdout
pub fn parse_script_output(stdout: &[u8]) -> Result<Vec<GroupHit>, SearchError> {
    Ok(serde_json::from_slice(stdout)?)
}

/// Runs the group search script
pub struct GroupSearch {
    python: PathBuf,
    script: PathBuf,
}

impl GroupSearch {
    pub fn new(config: &GroupSearchConfig) -> Self {
        Self {
            python: config.python.clone(),
            script: config.script.clone(),
        }
    }
}

#[async_trait]
impl Searcher for GroupSearch {
    async fn search(&self, keyword: &str) -> Result<Vec<String>, SearchError> {
        debug!(script = %self.script.display(), "Running group search script");

        let output = Command::new(&self.python)
            .arg(&self.script)
            .arg(keyword)
            .output()
            .await
            .map_err(|e| {
                SearchError::Process(format!("failed to run {}: {e}", self.python.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SearchError::Process(format!(
                "script exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let hits = parse_script_output(&output.stdout)?;
        debug!(count = hits.len(), "Group search script finished");

        Ok(hits.into_iter().map(|hit| hit.link).collect())
    }
}
