//! Keysound WAV loading for the 16-bit 44.1kHz mono/stereo subset

use super::header::{BITS_PER_SAMPLE, SAMPLE_RATE};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Decoded 16-bit PCM, interleaved when stereo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PcmData {
    /// 1 or 2
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl PcmData {
    /// Number of sample frames (samples per channel)
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            n => self.samples.len() / n as usize,
        }
    }
}

/// Load a keysound WAV file
pub fn read_pcm(path: &Path) -> Result<PcmData> {
    let file = File::open(path).map_err(|source| Error::ResourceMissing {
        path: path.to_path_buf(),
        source,
    })?;
    decode_pcm(BufReader::new(file), path)
}

/// Decode WAV data from `input`. `path` only names the source in errors.
///
/// A data chunk shorter than its header claims is cut at the last whole
/// frame.
pub fn decode_pcm<R: Read>(input: R, path: &Path) -> Result<PcmData> {
    let unsupported = |reason: String| Error::UnsupportedAudio {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = hound::WavReader::new(input).map_err(|e| unsupported(e.to_string()))?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int {
        return Err(unsupported("Not a PCM file".into()));
    }
    if spec.channels != 1 && spec.channels != 2 {
        return Err(unsupported("Not a mono/stereo file".into()));
    }
    if spec.sample_rate != SAMPLE_RATE {
        return Err(unsupported("Sample rate != 44.1khz".into()));
    }
    if spec.bits_per_sample != BITS_PER_SAMPLE {
        return Err(unsupported("Not a 16-bit file".into()));
    }

    let mut samples: Vec<i16> = reader.samples::<i16>().map_while(|s| s.ok()).collect();
    samples.truncate(samples.len() - samples.len() % spec.channels as usize);

    Ok(PcmData {
        channels: spec.channels,
        samples,
    })
}
