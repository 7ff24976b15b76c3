use byteorder::{BigEndian, ByteOrder, LittleEndian};
use ndarray::Array2;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::constants::META_SUFFIX;
use super::error::SampledDatasetError;
use super::trigger::{TriggerRecording, TriggerSource};

/// The kind of a single sample, parsed from a numpy-style dtype string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl SampleKind {
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    fn from_code(kind: char, size: usize) -> Option<Self> {
        match (kind, size) {
            ('i', 1) => Some(Self::I8),
            ('u', 1) => Some(Self::U8),
            ('i', 2) => Some(Self::I16),
            ('u', 2) => Some(Self::U16),
            ('i', 4) => Some(Self::I32),
            ('u', 4) => Some(Self::U32),
            ('i', 8) => Some(Self::I64),
            ('u', 8) => Some(Self::U64),
            ('f', 4) => Some(Self::F32),
            ('f', 8) => Some(Self::F64),
            _ => None,
        }
    }
}

/// Sample kind plus byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dtype {
    pub kind: SampleKind,
    pub big_endian: bool,
}

impl Dtype {
    /// Parse either a numpy type name (`int16`, `float32`) or an array-protocol
    /// string (`<i2`, `>f4`, `|u1`). Byte order defaults to little endian.
    pub fn parse(dtype: &str) -> Result<Self, SampledDatasetError> {
        let bad = || SampledDatasetError::BadDtype(String::from(dtype));
        let dtype = dtype.trim();
        let named = match dtype {
            "int8" => Some(SampleKind::I8),
            "uint8" => Some(SampleKind::U8),
            "int16" => Some(SampleKind::I16),
            "uint16" => Some(SampleKind::U16),
            "int32" => Some(SampleKind::I32),
            "uint32" => Some(SampleKind::U32),
            "int64" => Some(SampleKind::I64),
            "uint64" => Some(SampleKind::U64),
            "float32" => Some(SampleKind::F32),
            "float64" | "double" => Some(SampleKind::F64),
            _ => None,
        };
        if let Some(kind) = named {
            return Ok(Self {
                kind,
                big_endian: false,
            });
        }

        let mut chars = dtype.chars().peekable();
        let big_endian = match chars.peek() {
            Some('>') => {
                chars.next();
                true
            }
            Some('<') | Some('=') | Some('|') => {
                chars.next();
                false
            }
            _ => false,
        };
        let kind_code = chars.next().ok_or_else(bad)?;
        let size: usize = chars.collect::<String>().parse().map_err(|_| bad())?;
        let kind = SampleKind::from_code(kind_code, size).ok_or_else(bad)?;
        Ok(Self { kind, big_endian })
    }
}

/// The subset of Bark sampled-dataset metadata we need. Other keys are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct SampledMetadata {
    pub sampling_rate: f64,
    pub dtype: String,
    pub n_channels: usize,
}

/// A Bark sampled dataset: raw interleaved samples plus a `.meta.yaml` sidecar
#[derive(Debug, Clone)]
pub struct SampledDataset {
    path: PathBuf,
}

impl SampledDataset {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    /// Path of the metadata sidecar, i.e. `<data path>.meta.yaml`
    pub fn get_metadata_path(&self) -> PathBuf {
        let mut meta = self.path.clone().into_os_string();
        meta.push(META_SUFFIX);
        PathBuf::from(meta)
    }

    pub fn read_metadata(&self) -> Result<SampledMetadata, SampledDatasetError> {
        let meta_path = self.get_metadata_path();
        if !meta_path.exists() {
            return Err(SampledDatasetError::MissingMetadata(meta_path));
        }
        let yaml_str = std::fs::read_to_string(&meta_path)?;
        Ok(serde_yaml::from_str::<SampledMetadata>(&yaml_str)?)
    }

    /// Read the full dataset into memory, widening every sample to f64
    pub fn read(&self) -> Result<TriggerRecording, SampledDatasetError> {
        if !self.path.exists() {
            return Err(SampledDatasetError::BadFilePath(self.path.clone()));
        }
        let meta = self.read_metadata()?;
        if !(meta.sampling_rate > 0.0) {
            return Err(SampledDatasetError::BadSamplingRate(meta.sampling_rate));
        }
        if meta.n_channels == 0 {
            return Err(SampledDatasetError::NoChannels);
        }
        let dtype = Dtype::parse(&meta.dtype)?;

        let bytes = std::fs::read(&self.path)?;
        log::info!(
            "Read {} of {} data from {}",
            human_bytes::human_bytes(bytes.len() as f64),
            meta.dtype,
            self.path.to_string_lossy()
        );
        let frame_size = dtype.kind.size_bytes() * meta.n_channels;
        if bytes.len() % frame_size != 0 {
            return Err(SampledDatasetError::BadDataSize(
                bytes.len() as u64,
                frame_size,
            ));
        }

        let values = if dtype.big_endian {
            decode_samples::<BigEndian>(&bytes, dtype.kind)
        } else {
            decode_samples::<LittleEndian>(&bytes, dtype.kind)
        };
        let samples = Array2::from_shape_vec((bytes.len() / frame_size, meta.n_channels), values)?;

        // Rate was validated above, so this cannot fail
        TriggerRecording::new(samples, meta.sampling_rate)
            .map_err(|_| SampledDatasetError::BadSamplingRate(meta.sampling_rate))
    }
}

impl TriggerSource for SampledDataset {
    type Error = SampledDatasetError;

    fn read_recording(&self) -> Result<TriggerRecording, SampledDatasetError> {
        self.read()
    }
}

/// Decode a raw buffer of samples. The buffer length must be a multiple of the sample size
fn decode_samples<B: ByteOrder>(bytes: &[u8], kind: SampleKind) -> Vec<f64> {
    let chunks = bytes.chunks_exact(kind.size_bytes());
    match kind {
        SampleKind::I8 => chunks.map(|c| c[0] as i8 as f64).collect(),
        SampleKind::U8 => chunks.map(|c| c[0] as f64).collect(),
        SampleKind::I16 => chunks.map(|c| B::read_i16(c) as f64).collect(),
        SampleKind::U16 => chunks.map(|c| B::read_u16(c) as f64).collect(),
        SampleKind::I32 => chunks.map(|c| B::read_i32(c) as f64).collect(),
        SampleKind::U32 => chunks.map(|c| B::read_u32(c) as f64).collect(),
        SampleKind::I64 => chunks.map(|c| B::read_i64(c) as f64).collect(),
        SampleKind::U64 => chunks.map(|c| B::read_u64(c) as f64).collect(),
        SampleKind::F32 => chunks.map(|c| B::read_f32(c) as f64).collect(),
        SampleKind::F64 => chunks.map(|c| B::read_f64(c)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    fn write_dataset(name: &str, bytes: &[u8], meta: &str) -> SampledDataset {
        let path = std::env::temp_dir().join(format!("{}_{}.dat", name, std::process::id()));
        std::fs::write(&path, bytes).unwrap();
        let dset = SampledDataset::new(&path);
        std::fs::write(dset.get_metadata_path(), meta).unwrap();
        dset
    }

    fn remove_dataset(dset: &SampledDataset) {
        std::fs::remove_file(dset.get_path()).unwrap();
        std::fs::remove_file(dset.get_metadata_path()).unwrap();
    }

    #[test]
    fn test_dtype_parsing() {
        let le_i16 = Dtype {
            kind: SampleKind::I16,
            big_endian: false,
        };
        assert_eq!(Dtype::parse("int16").unwrap(), le_i16);
        assert_eq!(Dtype::parse("<i2").unwrap(), le_i16);
        assert_eq!(Dtype::parse("i2").unwrap(), le_i16);
        assert_eq!(
            Dtype::parse(">f4").unwrap(),
            Dtype {
                kind: SampleKind::F32,
                big_endian: true
            }
        );
        assert_eq!(Dtype::parse("|u1").unwrap().kind, SampleKind::U8);
        assert!(Dtype::parse("complex64").is_err());
        assert!(Dtype::parse("<f2").is_err());
        assert!(Dtype::parse("").is_err());
    }

    #[test]
    fn test_read_interleaved_int16() {
        // 3 channels, trigger on channel 1
        let trigger: [i16; 8] = [0, 0, 25000, 25000, 0, 0, 30000, 0];
        let mut bytes = Vec::new();
        for (row, value) in trigger.iter().enumerate() {
            bytes.write_i16::<LittleEndian>(row as i16).unwrap();
            bytes.write_i16::<LittleEndian>(*value).unwrap();
            bytes.write_i16::<LittleEndian>(-1).unwrap();
        }
        let dset = write_dataset(
            "stim_times_int16",
            &bytes,
            "sampling_rate: 2\ndtype: <i2\nn_channels: 3\ncolumns:\n  0: {units: null}\n",
        );
        let rec = dset.read().unwrap();
        remove_dataset(&dset);

        assert_eq!(rec.sampling_rate(), 2.0);
        assert_eq!(rec.n_samples(), 8);
        assert_eq!(rec.n_channels(), 3);
        let channel: Vec<f64> = rec.channel(1).unwrap().to_vec();
        assert_eq!(channel, trigger.iter().map(|v| *v as f64).collect::<Vec<f64>>());
        assert_eq!(rec.channel(0).unwrap()[7], 7.0);
        assert_eq!(rec.channel(2).unwrap()[3], -1.0);
    }

    #[test]
    fn test_read_big_endian_float() {
        let mut bytes = Vec::new();
        bytes.write_f32::<BigEndian>(0.25).unwrap();
        bytes.write_f32::<BigEndian>(-3.5).unwrap();
        let dset = write_dataset(
            "stim_times_be_f32",
            &bytes,
            "sampling_rate: 30000.0\ndtype: '>f4'\nn_channels: 1\n",
        );
        let rec = dset.read().unwrap();
        remove_dataset(&dset);
        assert_eq!(rec.channel(0).unwrap().to_vec(), vec![0.25, -3.5]);
    }

    #[test]
    fn test_partial_frame_is_rejected() {
        let dset = write_dataset(
            "stim_times_partial",
            &[0u8; 5],
            "sampling_rate: 10\ndtype: int16\nn_channels: 2\n",
        );
        let result = dset.read();
        remove_dataset(&dset);
        match result {
            Err(SampledDatasetError::BadDataSize(5, 4)) => (),
            _ => panic!(),
        }
    }

    #[test]
    fn test_bad_sampling_rate_is_rejected() {
        let dset = write_dataset(
            "stim_times_zero_rate",
            &[0u8; 4],
            "sampling_rate: 0\ndtype: int16\nn_channels: 1\n",
        );
        let result = dset.read();
        remove_dataset(&dset);
        assert!(matches!(result, Err(SampledDatasetError::BadSamplingRate(_))));
    }

    #[test]
    fn test_missing_metadata() {
        let path = std::env::temp_dir().join(format!("stim_times_nometa_{}.dat", std::process::id()));
        std::fs::write(&path, [0u8; 2]).unwrap();
        let result = SampledDataset::new(&path).read();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(SampledDatasetError::MissingMetadata(_))));
    }
}
