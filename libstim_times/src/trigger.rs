use ndarray::{Array2, ArrayView1, Axis};

use super::error::TriggerError;

/// A multichannel trigger recording, stored as a (time x channel) matrix
/// of samples along with the rate they were acquired at.
#[derive(Debug, Clone)]
pub struct TriggerRecording {
    samples: Array2<f64>,
    sampling_rate: f64,
}

impl TriggerRecording {
    /// Create a recording. The sampling rate must be positive (NaN is rejected too)
    pub fn new(samples: Array2<f64>, sampling_rate: f64) -> Result<Self, TriggerError> {
        if !(sampling_rate > 0.0) {
            return Err(TriggerError::BadSamplingRate(sampling_rate));
        }
        Ok(Self {
            samples,
            sampling_rate,
        })
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn n_samples(&self) -> usize {
        self.samples.nrows()
    }

    pub fn n_channels(&self) -> usize {
        self.samples.ncols()
    }

    /// Get a view of a single channel's samples
    pub fn channel(&self, channel: usize) -> Result<ArrayView1<f64>, TriggerError> {
        if channel >= self.n_channels() {
            return Err(TriggerError::ChannelIndex {
                channel,
                n_channels: self.n_channels(),
            });
        }
        Ok(self.samples.index_axis(Axis(1), channel))
    }
}

/// Anything that can hand over a trigger recording (a Bark dataset on disk, a test fake, ...)
pub trait TriggerSource {
    type Error;

    fn read_recording(&self) -> Result<TriggerRecording, Self::Error>;
}

impl TriggerSource for TriggerRecording {
    type Error = TriggerError;

    fn read_recording(&self) -> Result<TriggerRecording, TriggerError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_channel_view() {
        let rec = TriggerRecording::new(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]], 10.0).unwrap();
        assert_eq!(rec.n_samples(), 3);
        assert_eq!(rec.n_channels(), 2);
        assert_eq!(rec.channel(1).unwrap().to_vec(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_bad_channel() {
        let rec = TriggerRecording::new(array![[1.0, 2.0]], 10.0).unwrap();
        match rec.channel(2) {
            Err(TriggerError::ChannelIndex {
                channel,
                n_channels,
            }) => {
                assert_eq!(channel, 2);
                assert_eq!(n_channels, 2);
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_bad_sampling_rate() {
        assert!(TriggerRecording::new(array![[0.0]], 0.0).is_err());
        assert!(TriggerRecording::new(array![[0.0]], -1.0).is_err());
        assert!(TriggerRecording::new(array![[0.0]], f64::NAN).is_err());
    }
}
