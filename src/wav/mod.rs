pub mod header;
pub mod reader;
pub mod writer;

pub use header::{WavHeader, MAX_FRAMES, SAMPLE_RATE};
pub use reader::{decode_pcm, read_pcm, PcmData};
pub use writer::WavWriter;
