use std::path::PathBuf;

use super::aligner::{align, detect_onsets, StimulusInterval};
use super::config::Config;
use super::duration_table::{DurationSource, WavSet};
use super::error::ProcessorError;
use super::event_dataset::EventDataset;
use super::sampled_dataset::SampledDataset;
use super::stim_log::{StimLog, StimulusSource};
use super::trigger::TriggerSource;

/// Everything needed to turn one recording session into a stimulus event dataset
#[derive(Debug, Clone, Default)]
pub struct Job {
    pub pulse_path: PathBuf,
    pub log_path: PathBuf,
    pub wav_paths: Vec<PathBuf>,
    pub out_path: PathBuf,
    pub channel: usize,
}

/// Read the three inputs and align them.
///
/// Every input is read before alignment starts; nothing is written.
pub fn build_timeline<T, S, D>(
    trigger: &T,
    stimuli: &S,
    durations: &D,
    channel: usize,
    threshold: f64,
) -> Result<Vec<StimulusInterval>, ProcessorError>
where
    T: TriggerSource,
    S: StimulusSource,
    D: DurationSource,
    ProcessorError: From<T::Error> + From<S::Error> + From<D::Error>,
{
    let recording = trigger.read_recording()?;
    let names = stimuli.read_stimuli()?;
    let table = durations.read_durations()?;

    let onsets = detect_onsets(&recording, channel, threshold)?;
    Ok(align(&onsets, &names, &table)?)
}

/// The main entry point of stim_times.
///
/// Reads the Bark pulse dataset, jstim log and stimulus WAV files named by the job, aligns
/// them and writes the intervals as a Bark event dataset. If anything fails no output is written.
pub fn process(config: &Config, job: &Job) -> Result<Vec<StimulusInterval>, ProcessorError> {
    log::info!("Reading pulse dataset {}...", job.pulse_path.to_string_lossy());
    let trigger = SampledDataset::new(&job.pulse_path);
    let stimuli = StimLog::new(&job.log_path, config);
    let durations = WavSet::new(&job.wav_paths);

    let intervals = build_timeline(
        &trigger,
        &stimuli,
        &durations,
        job.channel,
        config.threshold,
    )?;

    EventDataset::new(&job.out_path).write(&intervals)?;
    Ok(intervals)
}
