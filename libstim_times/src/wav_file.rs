use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::error::WavFileError;

const WAVE_FORMAT_PCM: u16 = 0x0001;
const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Header information of a RIFF/WAVE file.
///
/// Only the header is parsed; the audio itself is never loaded since all we
/// care about is how long the file plays for.
#[derive(Debug, Clone)]
pub struct WavFile {
    path: PathBuf,
    pub format_tag: u16,
    pub n_channels: u16,
    pub sample_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub n_frames: u64,
}

impl WavFile {
    /// Open a WAV file and parse its fmt and data chunk headers
    pub fn new(path: &Path) -> Result<Self, WavFileError> {
        if !path.exists() {
            return Err(WavFileError::BadFilePath(path.to_path_buf()));
        }
        let mut reader = BufReader::new(File::open(path)?);

        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag)?;
        if &tag != b"RIFF" {
            return Err(WavFileError::NotRiffWave);
        }
        let _riff_size = reader.read_u32::<LittleEndian>()?;
        reader.read_exact(&mut tag)?;
        if &tag != b"WAVE" {
            return Err(WavFileError::NotRiffWave);
        }

        let mut format: Option<(u16, u16, u32, u16, u16)> = None;
        let mut data_size: Option<u32> = None;
        // Walk the chunks until we have seen both fmt and data
        while format.is_none() || data_size.is_none() {
            match reader.read_exact(&mut tag) {
                Ok(()) => (),
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(WavFileError::IOError(e)),
            }
            let chunk_size = reader.read_u32::<LittleEndian>()?;
            let mut consumed: u32 = 0;
            match &tag {
                b"fmt " => {
                    let format_tag = reader.read_u16::<LittleEndian>()?;
                    let n_channels = reader.read_u16::<LittleEndian>()?;
                    let sample_rate = reader.read_u32::<LittleEndian>()?;
                    let _byte_rate = reader.read_u32::<LittleEndian>()?;
                    let block_align = reader.read_u16::<LittleEndian>()?;
                    let bits_per_sample = reader.read_u16::<LittleEndian>()?;
                    consumed = 16;
                    format = Some((
                        format_tag,
                        n_channels,
                        sample_rate,
                        block_align,
                        bits_per_sample,
                    ));
                }
                b"data" => {
                    data_size = Some(chunk_size);
                }
                _ => (),
            }
            // Chunks are word aligned; odd sized chunks carry a pad byte
            let remaining = chunk_size.saturating_sub(consumed) as i64 + (chunk_size % 2) as i64;
            if format.is_none() || data_size.is_none() {
                reader.seek(SeekFrom::Current(remaining))?;
            }
        }

        let (format_tag, n_channels, sample_rate, block_align, bits_per_sample) =
            format.ok_or(WavFileError::MissingChunk("fmt "))?;
        let data_size = data_size.ok_or(WavFileError::MissingChunk("data"))?;
        if !matches!(
            format_tag,
            WAVE_FORMAT_PCM | WAVE_FORMAT_IEEE_FLOAT | WAVE_FORMAT_EXTENSIBLE
        ) {
            return Err(WavFileError::UnsupportedFormat(format_tag));
        }
        if sample_rate == 0 || block_align == 0 {
            return Err(WavFileError::BadFormatChunk(sample_rate, block_align));
        }

        Ok(Self {
            path: path.to_path_buf(),
            format_tag,
            n_channels,
            sample_rate,
            block_align,
            bits_per_sample,
            n_frames: (data_size / block_align as u32) as u64,
        })
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    /// Playback length in seconds (frames / sample rate)
    pub fn duration(&self) -> f64 {
        self.n_frames as f64 / self.sample_rate as f64
    }
}
