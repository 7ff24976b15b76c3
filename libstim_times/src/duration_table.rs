use fxhash::FxHashMap;
use std::path::{Path, PathBuf};

use super::error::{DurationError, WavFileError};
use super::wav_file::WavFile;

/// Playback duration (seconds) of each stimulus, keyed by stimulus name
#[derive(Debug, Clone, Default)]
pub struct DurationTable {
    map: FxHashMap<String, f64>,
}

impl DurationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a duration. If the name is already present the new value wins,
    /// and the replaced value is returned.
    pub fn insert(&mut self, name: &str, duration: f64) -> Option<f64> {
        let previous = self.map.insert(String::from(name), duration);
        if let Some(prev) = previous {
            log::warn!(
                "Stimulus name {name} was supplied more than once; replacing duration {prev} s with {duration} s"
            );
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.map.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Build the table from a set of WAV files. The stimulus name is the file name
    /// without directory or extension; later files overwrite earlier ones with the same name.
    pub fn from_wav_files(paths: &[PathBuf]) -> Result<Self, DurationError> {
        let mut table = Self::new();
        for path in paths.iter() {
            let name = stimulus_name(path)?;
            let unreadable = |source| DurationError::UnreadableAudio {
                path: path.clone(),
                source,
            };
            let wav = WavFile::new(path).map_err(unreadable)?;
            if wav.n_frames == 0 {
                return Err(unreadable(WavFileError::EmptyAudio));
            }
            log::info!(
                "Stimulus {name}: {} frames at {} Hz ({} s)",
                wav.n_frames,
                wav.sample_rate,
                wav.duration()
            );
            table.insert(&name, wav.duration());
        }
        Ok(table)
    }
}

impl FromIterator<(String, f64)> for DurationTable {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (name, duration) in iter {
            table.insert(&name, duration);
        }
        table
    }
}

/// Anything that can produce a table of stimulus durations
pub trait DurationSource {
    type Error;

    fn read_durations(&self) -> Result<DurationTable, Self::Error>;
}

impl DurationSource for DurationTable {
    type Error = DurationError;

    fn read_durations(&self) -> Result<DurationTable, DurationError> {
        Ok(self.clone())
    }
}

/// The stimulus audio files given on the command line
#[derive(Debug, Clone, Default)]
pub struct WavSet {
    paths: Vec<PathBuf>,
}

impl WavSet {
    pub fn new(paths: &[PathBuf]) -> Self {
        Self {
            paths: paths.to_vec(),
        }
    }
}

impl DurationSource for WavSet {
    type Error = DurationError;

    fn read_durations(&self) -> Result<DurationTable, DurationError> {
        DurationTable::from_wav_files(&self.paths)
    }
}

/// Strip directory and extension from a path to get the stimulus name
pub fn stimulus_name(path: &Path) -> Result<String, DurationError> {
    path.file_stem()
        .map(|stem| String::from(stem.to_string_lossy()))
        .ok_or_else(|| DurationError::BadFileName(path.to_path_buf()))
}
