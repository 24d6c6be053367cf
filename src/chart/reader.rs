//! XNT file reader and parser

use super::{Chart, Note, TempoMap};
use crate::error::{Error, Result};
use crate::render::Sample;

/// XNT file identifier
pub const XNT_MAGIC: &[u8; 4] = b"XNOT";

/// Reserved bytes before each tempo or note segment count
const SEGMENT_SKIP: usize = 12;

/// XNT file reader
pub struct XntReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> XntReader<'a> {
    /// Create a new reader from raw XNT data
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Skip reserved bytes
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Read bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.data.len() - self.pos < len {
            return Err(Error::Format(format!(
                "Unexpected end of data at offset {}",
                self.pos
            )));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32_le(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Read a count or length field, rejecting negative values
    fn read_count(&mut self, what: &str) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_i32_le()?;
        usize::try_from(count)
            .map_err(|_| Error::Format(format!("Negative {} {} at offset {}", what, count, offset)))
    }

    /// Read a position as measure index plus fractional offset
    fn read_position(&mut self) -> Result<f64> {
        let measure = self.read_i16_le()?;
        let offset = self.read_f32_le()?;
        Ok(f64::from(measure) + f64::from(offset))
    }

    /// Parse a complete XNT file
    pub fn parse(&mut self) -> Result<Chart> {
        let segments = self.parse_header()?;

        let mut chart = Chart::default();
        if segments == 3 {
            self.parse_tempo_changes(&mut chart.tempo_map)?;
        }
        chart.foreground = self.parse_notes()?;
        chart.background = self.parse_notes()?;
        self.parse_keysounds(&mut chart.keysounds)?;

        tracing::info!(
            "Decoded {} tempo changes, {} + {} notes, {} keysounds",
            chart.tempo_map.len(),
            chart.foreground.len(),
            chart.background.len(),
            chart.keysounds.len()
        );

        Ok(chart)
    }

    /// Validate magic and return the segment count
    pub fn parse_header(&mut self) -> Result<i32> {
        self.pos = 0;
        if self.data.len() < XNT_MAGIC.len() || &self.data[..4] != XNT_MAGIC {
            return Err(Error::Format("Not an XNT file".into()));
        }
        self.skip(4)?;
        self.skip(2)?;
        let segments = self.read_i32_le()?;
        self.skip(1)?;

        if segments != 2 && segments != 3 {
            return Err(Error::Format(format!(
                "XNT file has unknown number of segments: {}",
                segments
            )));
        }
        Ok(segments)
    }

    /// Parse the tempo change segment into `tempo_map`
    pub fn parse_tempo_changes(&mut self, tempo_map: &mut TempoMap) -> Result<()> {
        self.skip(SEGMENT_SKIP)?;
        let count = self.read_count("tempo change count")?;

        for _ in 0..count {
            self.skip(1)?;
            let position = self.read_position()?;
            self.skip(3)?;
            let tempo = self.read_f32_le()?;

            if !(tempo.is_finite() && tempo > 0.0) {
                return Err(Error::Format(format!(
                    "Invalid tempo {} at position {}",
                    tempo, position
                )));
            }
            tempo_map.insert(position, f64::from(tempo));
        }
        Ok(())
    }

    /// Parse one note segment, preserving file order
    pub fn parse_notes(&mut self) -> Result<Vec<Note>> {
        self.skip(SEGMENT_SKIP)?;
        let count = self.read_count("note count")?;

        let mut notes = Vec::with_capacity(count.min(self.data.len() / 14));
        for _ in 0..count {
            self.skip(1)?;
            let position = self.read_position()?;
            let channel = self.read_u8()?;
            let keysound_id = self.read_u16_le()?;
            let length = f64::from(self.read_f32_le()?);
            notes.push(Note {
                position,
                length,
                channel,
                keysound_id,
            });
        }
        Ok(notes)
    }

    /// Parse keysound definitions. A repeated ID replaces the earlier one.
    pub fn parse_keysounds(&mut self, keysounds: &mut super::KeysoundTable) -> Result<()> {
        let count = self.read_count("keysound count")?;

        for _ in 0..count {
            let keysound_id = self.read_u16_le()?;
            self.skip(2)?;
            let len = self.read_count("filename length")?;
            let raw = self.read_bytes(len)?;
            let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            let filename = String::from_utf8_lossy(&raw[..end]).into_owned();
            keysounds.insert(keysound_id, Sample::new(filename));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds XNT data for tests
    #[derive(Default)]
    pub(crate) struct XntBuilder {
        pub tempo: Option<Vec<(i16, f32, f32)>>,
        pub foreground: Vec<(i16, f32, u8, u16, f32)>,
        pub background: Vec<(i16, f32, u8, u16, f32)>,
        pub keysounds: Vec<(u16, &'static str)>,
    }

    impl XntBuilder {
        pub(crate) fn build(&self) -> Vec<u8> {
            let mut buf = Vec::new();
            buf.extend(XNT_MAGIC);
            buf.extend([0, 0]);
            let segments: i32 = if self.tempo.is_some() { 3 } else { 2 };
            buf.extend(segments.to_le_bytes());
            buf.push(0);

            if let Some(tempo) = &self.tempo {
                buf.extend([0xAA; SEGMENT_SKIP]);
                buf.extend((tempo.len() as i32).to_le_bytes());
                for &(measure, offset, bpm) in tempo {
                    buf.push(0);
                    buf.extend(measure.to_le_bytes());
                    buf.extend(offset.to_le_bytes());
                    buf.extend([0; 3]);
                    buf.extend(bpm.to_le_bytes());
                }
            }

            for notes in [&self.foreground, &self.background] {
                buf.extend([0xBB; SEGMENT_SKIP]);
                buf.extend((notes.len() as i32).to_le_bytes());
                for &(measure, offset, channel, id, hold) in notes {
                    buf.push(0);
                    buf.extend(measure.to_le_bytes());
                    buf.extend(offset.to_le_bytes());
                    buf.push(channel);
                    buf.extend(id.to_le_bytes());
                    buf.extend(hold.to_le_bytes());
                }
            }

            buf.extend((self.keysounds.len() as i32).to_le_bytes());
            for &(id, name) in &self.keysounds {
                buf.extend(id.to_le_bytes());
                buf.extend([0, 0]);
                buf.extend((name.len() as i32).to_le_bytes());
                buf.extend(name.as_bytes());
            }
            buf
        }
    }

    #[test]
    fn test_parse_two_segments() {
        let data = XntBuilder {
            foreground: vec![(2, 0.5, 3, 7, 0.0), (1, 0.0, 0, 8, 0.25)],
            background: vec![(0, 0.75, 1, 9, 0.0)],
            keysounds: vec![(7, "a.ogg"), (8, "b.ogg"), (9, "c.ogg")],
            ..Default::default()
        }
        .build();

        let chart = Chart::parse(&data).unwrap();
        assert!(chart.tempo_map.is_empty());
        assert_eq!(
            chart.foreground,
            vec![
                Note { position: 2.5, length: 0.0, channel: 3, keysound_id: 7 },
                Note { position: 1.0, length: 0.25, channel: 0, keysound_id: 8 },
            ]
        );
        assert_eq!(chart.background[0].position, 0.75);
        assert_eq!(chart.keysounds[&8].filename, "b.ogg");
        assert_eq!(chart.keysounds.len(), 3);
    }

    #[test]
    fn test_parse_tempo_segment() {
        let data = XntBuilder {
            tempo: Some(vec![(4, 0.0, 240.0), (0, 0.0, 120.0), (4, 0.0, 200.0)]),
            foreground: vec![(4, 0.0, 0, 1, 0.0)],
            keysounds: vec![(1, "x.ogg")],
            ..Default::default()
        }
        .build();

        let chart = Chart::parse(&data).unwrap();
        let changes: Vec<(f64, f64)> = chart.tempo_map.iter().map(|c| (c.position, c.tempo)).collect();
        assert_eq!(changes, vec![(0.0, 120.0), (4.0, 200.0)]);
    }

    #[test]
    fn test_duplicate_keysound_overwrites() {
        let data = XntBuilder {
            keysounds: vec![(5, "old.ogg"), (5, "new.ogg")],
            ..Default::default()
        }
        .build();

        let chart = Chart::parse(&data).unwrap();
        assert_eq!(chart.keysounds.len(), 1);
        assert_eq!(chart.keysounds[&5].filename, "new.ogg");
    }

    #[test]
    fn test_filename_trailing_nul_dropped() {
        let data = XntBuilder {
            keysounds: vec![(1, "pad.ogg\0")],
            ..Default::default()
        }
        .build();
        let chart = Chart::parse(&data).unwrap();
        assert_eq!(chart.keysounds[&1].filename, "pad.ogg");
    }

    #[test]
    fn test_bad_magic() {
        let mut data = XntBuilder::default().build();
        data[0] = b'Y';
        let err = Chart::parse(&data).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_bad_segment_count() {
        let mut data = XntBuilder::default().build();
        data[6..10].copy_from_slice(&4i32.to_le_bytes());
        assert!(matches!(Chart::parse(&data), Err(Error::Format(_))));
    }

    #[test]
    fn test_truncated() {
        let data = XntBuilder {
            foreground: vec![(0, 0.0, 0, 1, 0.0)],
            keysounds: vec![(1, "a.ogg")],
            ..Default::default()
        }
        .build();
        for len in [0, 3, 10, 30, data.len() - 1] {
            assert!(
                matches!(Chart::parse(&data[..len]), Err(Error::Format(_))),
                "length {} should fail",
                len
            );
        }
    }

    #[test]
    fn test_invalid_tempo_rejected() {
        let data = XntBuilder {
            tempo: Some(vec![(1, 0.0, 0.0)]),
            ..Default::default()
        }
        .build();
        assert!(matches!(Chart::parse(&data), Err(Error::Format(_))));
    }
}
