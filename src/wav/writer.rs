//! WAV file writer

use super::header::{WavHeader, BLOCK_ALIGN, MAX_FRAMES};
use crate::error::{Error, Result};
use crate::render::MixedBuffer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Full scale of the normalized output
pub const NORMALIZED_PEAK: f64 = 32766.0;

/// Scale an accumulated value so that `peak` maps to full scale
pub fn normalize(value: i32, peak: u32) -> i16 {
    if peak == 0 {
        return 0;
    }
    let scaled = (value as f64 * (NORMALIZED_PEAK / peak as f64)).round();
    scaled.clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Size of the data chunk holding `frames` output frames
pub fn data_size(frames: usize) -> Result<u32> {
    if frames as u64 > MAX_FRAMES {
        return Err(Error::Format(format!(
            "{} frames do not fit in a WAV data chunk",
            frames
        )));
    }
    Ok(frames as u32 * BLOCK_ALIGN as u32)
}

/// Write `buffer` to a new WAV file at `path`.
///
/// The size is checked first, so an oversized buffer leaves no file behind.
pub fn write_file(path: &Path, buffer: &MixedBuffer) -> Result<u32> {
    data_size(buffer.len())?;
    WavWriter::create(path)?.write(buffer)
}

/// Stereo 16-bit WAV writer
pub struct WavWriter<W: Write> {
    out: W,
    header: WavHeader,
}

impl WavWriter<BufWriter<File>> {
    /// Create the output file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> WavWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header: WavHeader::new(),
        }
    }

    /// Write the header and the normalized buffer, returning the payload size
    pub fn write(&mut self, buffer: &MixedBuffer) -> Result<u32> {
        let frames = buffer.frames();
        let size = data_size(frames.len())?;

        self.header.set_data_size(size);
        self.out.write_all(self.header.as_bytes())?;

        let peak = buffer.peak();
        let mut percentage = 0;
        for (i, frame) in frames.iter().enumerate() {
            let pct = i * 100 / frames.len();
            if pct > percentage {
                percentage = pct;
                tracing::debug!("Writing: {}%", pct);
            }
            for &value in frame {
                self.out.write_all(&normalize(value, peak).to_le_bytes())?;
            }
        }

        self.out.flush()?;
        Ok(size)
    }

    /// Consume the writer and return the underlying output
    pub fn into_inner(self) -> W {
        self.out
    }
}
