use std::path::{Path, PathBuf};

use super::config::Config;
use super::error::StimLogError;

/// Anything that can produce the ordered list of presented stimulus names
pub trait StimulusSource {
    type Error;

    fn read_stimuli(&self) -> Result<Vec<String>, Self::Error>;
}

impl StimulusSource for Vec<String> {
    type Error = StimLogError;

    fn read_stimuli(&self) -> Result<Vec<String>, StimLogError> {
        Ok(self.clone())
    }
}

/// Pull stimulus names, in presentation order, out of free text.
///
/// Only lines containing `marker` are considered; the name is the whitespace
/// token at `token` (zero-based). Marker lines too short to have that token
/// are skipped. There is no other validation of the log format.
pub fn parse_stimuli(text: &str, marker: &str, token: usize) -> Vec<String> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| line.contains(marker))
        .filter_map(|(idx, line)| match line.split_whitespace().nth(token) {
            Some(name) => Some(String::from(name)),
            None => {
                log::debug!("Skipping short marker line {}: {line:?}", idx + 1);
                None
            }
        })
        .collect()
}

/// A jstim log file on disk
#[derive(Debug, Clone)]
pub struct StimLog {
    path: PathBuf,
    marker: String,
    token: usize,
}

impl StimLog {
    pub fn new(path: &Path, config: &Config) -> Self {
        Self {
            path: path.to_path_buf(),
            marker: config.log_marker.clone(),
            token: config.stim_token,
        }
    }

    pub fn read(&self) -> Result<Vec<String>, StimLogError> {
        if !self.path.exists() {
            return Err(StimLogError::BadFilePath(self.path.clone()));
        }
        // Logs are not always clean UTF-8; lossy is fine since we only want the names
        let bytes = std::fs::read(&self.path)?;
        let text = String::from_utf8_lossy(&bytes);
        let stims = parse_stimuli(&text, &self.marker, self.token);
        log::info!(
            "Found {} stimulus presentations in {}",
            stims.len(),
            self.path.to_string_lossy()
        );
        Ok(stims)
    }
}

impl StimulusSource for StimLog {
    type Error = StimLogError;

    fn read_stimuli(&self) -> Result<Vec<String>, StimLogError> {
        self.read()
    }
}
