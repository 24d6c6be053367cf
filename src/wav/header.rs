//! RIFF/WAVE header definitions

/// Output and accepted sample rate
pub const SAMPLE_RATE: u32 = 44100;

/// Output and accepted bits per sample
pub const BITS_PER_SAMPLE: u16 = 16;

/// Output channel count
pub const OUTPUT_CHANNELS: u16 = 2;

/// Linear PCM format tag
pub const FORMAT_PCM: u16 = 1;

/// Size of the `fmt ` chunk body for PCM
pub const FMT_CHUNK_SIZE: u32 = 16;

/// Canonical header size in bytes
pub const WAV_HEADER_SIZE: usize = 44;

/// Bytes per output frame
pub const BLOCK_ALIGN: u16 = OUTPUT_CHANNELS * (BITS_PER_SAMPLE / 8);

/// Most output frames a data chunk can hold
pub const MAX_FRAMES: u64 = u32::MAX as u64 / BLOCK_ALIGN as u64;

/// Header offsets (in bytes)
pub mod offset {
    /// "RIFF" identifier
    pub const RIFF: usize = 0x00;
    /// RIFF chunk size (file size - 8)
    pub const CHUNK_SIZE: usize = 0x04;
    /// "WAVE" form type followed by "fmt " chunk id
    pub const WAVE_FMT: usize = 0x08;
    /// fmt chunk size
    pub const FMT_SIZE: usize = 0x10;
    /// Format tag
    pub const AUDIO_FORMAT: usize = 0x14;
    /// Channel count
    pub const NUM_CHANNELS: usize = 0x16;
    /// Sample rate
    pub const SAMPLE_RATE: usize = 0x18;
    /// Byte rate
    pub const BYTE_RATE: usize = 0x1C;
    /// Block align
    pub const BLOCK_ALIGN: usize = 0x20;
    /// Bits per sample
    pub const BITS_PER_SAMPLE: usize = 0x22;
    /// First chunk after fmt (for canonical files)
    pub const DATA: usize = 0x24;
    /// data chunk size
    pub const DATA_SIZE: usize = 0x28;
}

/// Canonical 44-byte PCM WAV header
#[derive(Debug, Clone)]
pub struct WavHeader {
    data: [u8; WAV_HEADER_SIZE],
}

impl WavHeader {
    /// Header for 16-bit stereo at 44.1kHz with an empty data chunk
    pub fn new() -> Self {
        let mut header = Self {
            data: [0; WAV_HEADER_SIZE],
        };

        header.data[offset::RIFF..offset::RIFF + 4].copy_from_slice(b"RIFF");
        header.data[offset::WAVE_FMT..offset::WAVE_FMT + 8].copy_from_slice(b"WAVEfmt ");
        header.data[offset::DATA..offset::DATA + 4].copy_from_slice(b"data");

        header.write_u32(offset::FMT_SIZE, FMT_CHUNK_SIZE);
        header.write_u16(offset::AUDIO_FORMAT, FORMAT_PCM);
        header.write_u16(offset::NUM_CHANNELS, OUTPUT_CHANNELS);
        header.write_u32(offset::SAMPLE_RATE, SAMPLE_RATE);
        header.write_u32(offset::BYTE_RATE, SAMPLE_RATE * BLOCK_ALIGN as u32);
        header.write_u16(offset::BLOCK_ALIGN, BLOCK_ALIGN);
        header.write_u16(offset::BITS_PER_SAMPLE, BITS_PER_SAMPLE);
        header.set_data_size(0);

        header
    }

    /// Set the data chunk size and the RIFF size that depends on it
    pub fn set_data_size(&mut self, size: u32) {
        self.write_u32(offset::DATA_SIZE, size);
        self.write_u32(
            offset::CHUNK_SIZE,
            (WAV_HEADER_SIZE as u32 - 8).saturating_add(size),
        );
    }

    pub fn write_u16(&mut self, offset: usize, value: u16) {
        if offset + 1 < WAV_HEADER_SIZE {
            self.data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        }
    }

    pub fn write_u32(&mut self, offset: usize, value: u32) {
        if offset + 3 < WAV_HEADER_SIZE {
            self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for WavHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_header_fields() {
        let header = WavHeader::new();
        let bytes = header.as_bytes();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..16], b"WAVEfmt ");
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u16_at(bytes, offset::AUDIO_FORMAT), 1);
        assert_eq!(u16_at(bytes, offset::NUM_CHANNELS), 2);
        assert_eq!(u32_at(bytes, offset::SAMPLE_RATE), 44100);
        assert_eq!(u32_at(bytes, offset::BYTE_RATE), 176400);
        assert_eq!(u16_at(bytes, offset::BLOCK_ALIGN), 4);
        assert_eq!(u16_at(bytes, offset::BITS_PER_SAMPLE), 16);
    }

    #[test]
    fn test_sizes_follow_data() {
        let mut header = WavHeader::new();
        header.set_data_size(400);
        let bytes = header.as_bytes();
        assert_eq!(u32_at(bytes, offset::DATA_SIZE), 400);
        assert_eq!(u32_at(bytes, offset::CHUNK_SIZE), 436);
    }

    #[test]
    fn test_max_frames_fill_data_chunk() {
        assert_eq!(MAX_FRAMES, 1_073_741_823);
        assert!(MAX_FRAMES * BLOCK_ALIGN as u64 <= u32::MAX as u64);
    }
}
