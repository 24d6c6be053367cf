//! XNT chart model and decoding
//!
//! A chart is a binary `.xnt` note file paired with a `.xne` text header
//! that carries the initial tempo.

pub mod export;
pub mod header;
pub mod json;
pub mod reader;
pub mod tempo;
pub mod volume;

use crate::render::Sample;
use std::collections::BTreeMap;

pub use json::ChartJson;
pub use reader::XntReader;
pub use tempo::{TempoChange, TempoMap};

/// Keysound ID to sample
pub type KeysoundTable = BTreeMap<u16, Sample>;

/// A decoded note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Measure index plus fractional offset within the measure
    pub position: f64,
    /// Hold length in measures (0 for a tap)
    pub length: f64,
    /// Lane or auto-play slot
    pub channel: u8,
    pub keysound_id: u16,
}

/// Everything decoded from an XNT file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    pub tempo_map: TempoMap,
    /// Notes played by the performer
    pub foreground: Vec<Note>,
    /// Notes that always play
    pub background: Vec<Note>,
    pub keysounds: KeysoundTable,
}

impl Chart {
    /// Decode a chart from raw XNT data
    pub fn parse(data: &[u8]) -> crate::Result<Self> {
        XntReader::new(data).parse()
    }

    /// Number of notes across both tracks
    pub fn note_count(&self) -> usize {
        self.foreground.len() + self.background.len()
    }
}
