//! Keysound sample loading

use crate::error::Result;
use crate::wav::reader::read_pcm;
use crate::wav::PcmData;
use std::path::{Path, PathBuf};

/// A keysound referenced by the chart.
///
/// Created with only a filename while decoding; PCM data is loaded right
/// before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Filename as written in the chart
    pub filename: String,
    /// Volume multiplier applied to every sample value
    pub volume: f32,
    pcm: Option<PcmData>,
}

impl Sample {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            volume: 1.0,
            pcm: None,
        }
    }

    /// Create an already loaded sample
    pub fn from_pcm(filename: impl Into<String>, pcm: PcmData) -> Self {
        Self {
            pcm: Some(pcm),
            ..Self::new(filename)
        }
    }

    /// Name of the WAV file backing this keysound: the chart filename with
    /// its extension replaced by `wav`
    pub fn wav_filename(&self) -> PathBuf {
        Path::new(&self.filename).with_extension("wav")
    }

    /// Load PCM data from the WAV file next to the chart.
    ///
    /// On failure the sample stays unloaded and renders silent.
    pub fn load(&mut self, dir: &Path) -> Result<()> {
        self.pcm = Some(read_pcm(&dir.join(self.wav_filename()))?);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.pcm.is_some()
    }

    pub fn channels(&self) -> u16 {
        self.pcm.as_ref().map_or(0, |p| p.channels)
    }

    /// Playback length in sample frames (0 when unloaded)
    pub fn sample_count(&self) -> usize {
        self.pcm.as_ref().map_or(0, PcmData::frames)
    }

    /// Volume scaled value of `channel` (0 = left, 1 = right) at frame
    /// `index`. Mono samples return the same value for both channels.
    pub fn get_sample(&self, index: usize, channel: usize) -> i32 {
        let Some(pcm) = &self.pcm else {
            return 0;
        };
        let raw = match pcm.channels {
            1 => pcm.samples.get(index),
            _ => pcm.samples.get(index * 2 + channel),
        };
        raw.map_or(0, |&v| (v as f32 * self.volume) as i32)
    }
}
