use std::path::PathBuf;
use thiserror::Error;

use super::constants::EVENT_DATATYPE;

#[derive(Debug, Error)]
pub enum SampledDatasetError {
    #[error("Could not open Bark dataset because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Could not open Bark dataset because metadata file {0:?} does not exist")]
    MissingMetadata(PathBuf),
    #[error("Bark dataset failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Bark dataset failed to parse metadata YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Bark dataset has unsupported dtype {0:?}")]
    BadDtype(String),
    #[error("Bark dataset has invalid sampling rate {0}; must be greater than zero")]
    BadSamplingRate(f64),
    #[error("Bark dataset declares zero channels")]
    NoChannels,
    #[error("Bark dataset size {0} bytes is not a whole number of frames of {1} bytes")]
    BadDataSize(u64, usize),
    #[error("Bark dataset could not be shaped into a sample matrix: {0}")]
    ShapeError(#[from] ndarray::ShapeError),
}

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Invalid sampling rate {0} given for TriggerRecording; must be greater than zero")]
    BadSamplingRate(f64),
    #[error("Trigger channel {channel} does not exist; recording has {n_channels} channel(s)")]
    ChannelIndex { channel: usize, n_channels: usize },
}

#[derive(Debug, Error)]
pub enum StimLogError {
    #[error("Could not open stimulus log because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Stimulus log failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum WavFileError {
    #[error("Could not open WAV file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("WAV file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("WAV file is missing the RIFF/WAVE signature")]
    NotRiffWave,
    #[error("WAV file has unsupported format tag {0:#06x}")]
    UnsupportedFormat(u16),
    #[error("WAV file has no {0:?} chunk")]
    MissingChunk(&'static str),
    #[error("WAV file has invalid fmt chunk -- sample rate: {0} block align: {1}")]
    BadFormatChunk(u32, u16),
    #[error("WAV file contains no audio frames")]
    EmptyAudio,
}

#[derive(Debug, Error)]
pub enum DurationError {
    #[error("Could not read audio file {path:?}: {source}")]
    UnreadableAudio {
        path: PathBuf,
        #[source]
        source: WavFileError,
    },
    #[error("Could not derive a stimulus name from audio file path {0:?}")]
    BadFileName(PathBuf),
}

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("Stimulus {0:?} appears in the log but no audio file supplied its duration")]
    MissingDuration(String),
}

#[derive(Debug, Error)]
pub enum EventDatasetError {
    #[error("Could not open event dataset because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Event dataset failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Event dataset failed to convert metadata YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Event dataset has datatype {0}; expected {exp}", exp=EVENT_DATATYPE)]
    BadDatatype(u32),
    #[error("Event dataset is missing column {0:?}")]
    MissingColumn(&'static str),
    #[error("Event dataset row {0} is malformed")]
    BadRow(usize),
    #[error("Event dataset failed to parse a float: {0}")]
    FloatError(#[from] std::num::ParseFloatError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Bark dataset error: {0}")]
    DatasetError(#[from] SampledDatasetError),
    #[error("Processor failed due to trigger error: {0}")]
    TriggerError(#[from] TriggerError),
    #[error("Processor failed due to stimulus log error: {0}")]
    StimLogError(#[from] StimLogError),
    #[error("Processor failed due to duration lookup error: {0}")]
    DurationError(#[from] DurationError),
    #[error("Processor failed due to alignment error: {0}")]
    AlignmentError(#[from] AlignmentError),
    #[error("Processor failed due to event dataset error: {0}")]
    EventDatasetError(#[from] EventDatasetError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
}
