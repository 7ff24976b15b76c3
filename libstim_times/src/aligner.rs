//! The alignment core: find trigger onsets and pair them with the logged stimuli.
//!
//! Pairing is purely positional. The n-th onset is assumed to belong to the n-th
//! `next stim` line of the log, so the log order must match the trigger order
//! exactly, with no missed or spurious entries on either side. Nothing here can
//! detect a violation of that; a dropped trigger shifts every later stimulus.
use bitvec::prelude::BitVec;

use super::duration_table::DurationTable;
use super::error::{AlignmentError, TriggerError};
use super::trigger::TriggerRecording;

/// One presented stimulus and the time range (seconds) it played over
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusInterval {
    pub name: String,
    pub start: f64,
    pub stop: f64,
}

impl StimulusInterval {
    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }
}

/// Find the times (seconds) at which `channel` rises from below `threshold` to at-or-above it.
///
/// The onset time is the index of the first at-or-above sample divided by the sampling
/// rate. A trace that starts above threshold does not count as an onset at sample 0, and
/// no debouncing is applied: every rising edge is reported, however close to the last.
pub fn detect_onsets(
    recording: &TriggerRecording,
    channel: usize,
    threshold: f64,
) -> Result<Vec<f64>, TriggerError> {
    let trace = recording.channel(channel)?;
    let rate = recording.sampling_rate();
    let above: BitVec = trace.iter().map(|sample| *sample >= threshold).collect();
    let onsets: Vec<f64> = above
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| !pair[0] && pair[1])
        .map(|(idx, _)| (idx + 1) as f64 / rate)
        .collect();
    log::info!(
        "Detected {} onsets on channel {} ({} samples at {} Hz, threshold {})",
        onsets.len(),
        channel,
        recording.n_samples(),
        rate,
        threshold
    );
    Ok(onsets)
}

/// Pair onsets with stimulus names in order and close each interval with the stimulus duration.
///
/// Stops at the shorter of the two sequences. Any name without a duration is an error,
/// since its stop time cannot be known.
pub fn align(
    onsets: &[f64],
    names: &[String],
    durations: &DurationTable,
) -> Result<Vec<StimulusInterval>, AlignmentError> {
    if onsets.len() != names.len() {
        log::warn!(
            "Found {} trigger onsets but {} logged stimuli; only the first {} will be paired",
            onsets.len(),
            names.len(),
            onsets.len().min(names.len())
        );
    }
    onsets
        .iter()
        .zip(names.iter())
        .map(|(onset, name)| {
            let duration = durations
                .get(name)
                .ok_or_else(|| AlignmentError::MissingDuration(name.clone()))?;
            Ok(StimulusInterval {
                name: name.clone(),
                start: *onset,
                stop: onset + duration,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn single_channel(trace: &[f64], rate: f64) -> TriggerRecording {
        let samples = Array2::from_shape_vec((trace.len(), 1), trace.to_vec()).unwrap();
        TriggerRecording::new(samples, rate).unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn test_onsets_on_selected_channel() {
        let trigger = [0.0, 0.0, 25000.0, 25000.0, 0.0, 0.0, 30000.0, 0.0];
        let mut samples = Array2::<f64>::zeros((trigger.len(), 3));
        for (row, value) in trigger.iter().enumerate() {
            samples[[row, 0]] = 50000.0;
            samples[[row, 1]] = *value;
            samples[[row, 2]] = row as f64;
        }
        let rec = TriggerRecording::new(samples, 2.0).unwrap();
        assert_eq!(detect_onsets(&rec, 1, 20000.0).unwrap(), vec![1.0, 3.0]);
        // Channel 0 is held high from the start, which is never an onset
        assert!(detect_onsets(&rec, 0, 20000.0).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let rec = single_channel(&[0.0, 100.0, 0.0, 99.9, 101.0], 1.0);
        assert_eq!(detect_onsets(&rec, 0, 100.0).unwrap(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_constant_signals_have_no_onsets() {
        assert!(detect_onsets(&single_channel(&[0.0; 16], 10.0), 0, 1.0)
            .unwrap()
            .is_empty());
        assert!(detect_onsets(&single_channel(&[5.0; 16], 10.0), 0, 1.0)
            .unwrap()
            .is_empty());
        assert!(detect_onsets(&single_channel(&[], 10.0), 0, 1.0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_noisy_edges_are_not_debounced() {
        let rec = single_channel(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0], 4.0);
        assert_eq!(detect_onsets(&rec, 0, 1.0).unwrap(), vec![0.25, 0.75, 1.25]);
    }

    #[test]
    fn test_onsets_match_rising_edges() {
        let trace: Vec<f64> = (0..1000).map(|i| ((i * 37) % 11) as f64).collect();
        let threshold = 6.0;
        let expected: Vec<f64> = (1..trace.len())
            .filter(|i| trace[i - 1] < threshold && trace[*i] >= threshold)
            .map(|i| i as f64 / 250.0)
            .collect();
        let onsets = detect_onsets(&single_channel(&trace, 250.0), 0, threshold).unwrap();
        assert_eq!(onsets, expected);
        assert!(onsets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_missing_channel() {
        let rec = single_channel(&[0.0, 1.0], 1.0);
        assert!(matches!(
            detect_onsets(&rec, 1, 0.5),
            Err(TriggerError::ChannelIndex { .. })
        ));
    }

    #[test]
    fn test_align() {
        let durations: DurationTable = [(String::from("toneA"), 0.5), (String::from("toneB"), 1.2)]
            .into_iter()
            .collect();
        let intervals = align(&[1.0, 3.0], &names(&["toneA", "toneB"]), &durations).unwrap();
        assert_eq!(
            intervals,
            vec![
                StimulusInterval {
                    name: String::from("toneA"),
                    start: 1.0,
                    stop: 1.5
                },
                StimulusInterval {
                    name: String::from("toneB"),
                    start: 3.0,
                    stop: 3.0 + 1.2
                },
            ]
        );
    }

    #[test]
    fn test_align_truncates_to_shorter() {
        let durations: DurationTable = [(String::from("a"), 0.25)].into_iter().collect();
        let more_onsets = align(&[1.0, 2.0, 3.0], &names(&["a", "a"]), &durations).unwrap();
        assert_eq!(more_onsets.len(), 2);
        let more_names = align(&[1.0], &names(&["a", "a", "a"]), &durations).unwrap();
        assert_eq!(more_names.len(), 1);
        assert!(align(&[], &names(&["a"]), &durations).unwrap().is_empty());
        for interval in more_onsets.iter() {
            assert_eq!(interval.duration(), 0.25);
        }
    }

    #[test]
    fn test_align_missing_duration() {
        let durations: DurationTable = [(String::from("toneA"), 0.5)].into_iter().collect();
        match align(&[1.0, 3.0], &names(&["toneA", "toneC"]), &durations) {
            Err(AlignmentError::MissingDuration(name)) => assert_eq!(name, "toneC"),
            _ => panic!(),
        }
    }

    #[test]
    fn test_unpaired_names_need_no_duration() {
        let durations: DurationTable = [(String::from("toneA"), 0.5)].into_iter().collect();
        let intervals = align(&[1.0], &names(&["toneA", "toneC"]), &durations).unwrap();
        assert_eq!(intervals.len(), 1);
    }
}
