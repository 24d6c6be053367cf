//! Export of decoded notes as a BMS chart

use super::{Chart, Note};
use crate::error::Result;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Grid divisions per measure
const DIVISIONS: usize = 192;

/// BMS channel for extended tempo changes
const BPM_CHANNEL: u16 = 8;

/// BMS channels for performer lanes 0-7
const LANE_CHANNELS: [u16; 8] = [16, 11, 12, 13, 14, 15, 18, 19];

/// Offset from a lane channel to its long note channel
const LONG_NOTE_OFFSET: u16 = 40;

/// Holds at most this long are written as taps
const TAP_MAX_LENGTH: f64 = 1.5 / DIVISIONS as f64;

/// Auto-play notes are spread over these internal channels, all written
/// as BGM channel 01
const AUTO_CHANNELS: std::ops::Range<u16> = 101..132;
const BGM_CHANNEL: u16 = 1;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Two digit base-36, or `None` if the value does not fit
pub fn base36(value: u16) -> Option<String> {
    let value = value as usize;
    if value >= 36 * 36 {
        return None;
    }
    Some(String::from_utf8_lossy(&[BASE36[value / 36], BASE36[value % 36]]).into_owned())
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Measure -> channel -> slot values (0 = empty)
#[derive(Debug, Default)]
struct NoteGrid {
    measures: BTreeMap<i64, BTreeMap<u16, [u16; DIVISIONS]>>,
}

impl NoteGrid {
    fn slot(&mut self, channel: u16, position: f64) -> &mut u16 {
        let tick = (position * DIVISIONS as f64) as i64;
        let measure = tick.div_euclid(DIVISIONS as i64);
        let index = tick.rem_euclid(DIVISIONS as i64) as usize;
        &mut self
            .measures
            .entry(measure)
            .or_default()
            .entry(channel)
            .or_insert([0; DIVISIONS])[index]
    }

    fn add_foreground(&mut self, note: &Note) {
        let Some(&lane) = LANE_CHANNELS.get(note.channel as usize) else {
            tracing::warn!("Skipping note on unknown lane {}", note.channel);
            return;
        };
        if note.length > TAP_MAX_LENGTH {
            *self.slot(lane + LONG_NOTE_OFFSET, note.position) = note.keysound_id;
            *self.slot(lane + LONG_NOTE_OFFSET, note.position + note.length) = note.keysound_id;
        } else {
            *self.slot(lane, note.position) = note.keysound_id;
        }
    }

    fn add_background(&mut self, note: &Note) {
        let first = AUTO_CHANNELS.start + note.channel as u16;
        for channel in first..AUTO_CHANNELS.end {
            let slot = self.slot(channel, note.position);
            if *slot == 0 {
                *slot = note.keysound_id;
                return;
            }
        }
        tracing::warn!("No free BGM channel for note at {}", note.position);
    }
}

/// Write the chart as BMS text
pub fn write_bms<W: Write>(chart: &Chart, out: &mut W) -> Result<()> {
    let mut grid = NoteGrid::default();

    for (id, sample) in &chart.keysounds {
        match base36(*id) {
            Some(key) => writeln!(out, "#WAV{} {}", key, sample.filename)?,
            None => tracing::warn!("Keysound {} can't be written in base 36", id),
        }
    }

    for (i, change) in chart.tempo_map.iter().enumerate() {
        let entry = u16::try_from(i + 1)
            .ok()
            .and_then(|index| base36(index).map(|key| (index, key)));
        match entry {
            Some((index, key)) => {
                writeln!(out, "#BPM{} {}", key, change.tempo)?;
                *grid.slot(BPM_CHANNEL, change.position) = index;
            }
            None => tracing::warn!(
                "Tempo change {} at {} can't be written in base 36",
                i + 1,
                change.position
            ),
        }
    }
    writeln!(out)?;

    for note in &chart.foreground {
        grid.add_foreground(note);
    }
    for note in &chart.background {
        grid.add_background(note);
    }

    for (measure, channels) in &grid.measures {
        for (&channel, slots) in channels {
            let bms_channel = if AUTO_CHANNELS.contains(&channel) {
                BGM_CHANNEL
            } else {
                channel
            };
            let step = slots
                .iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .fold(DIVISIONS, |acc, (i, _)| gcd(acc, i));

            write!(out, "#{:03}{:02}:", measure, bms_channel)?;
            for &value in slots.iter().step_by(step) {
                out.write_all(base36(value).as_deref().unwrap_or("00").as_bytes())?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Write the chart as BMS text to `path`
pub fn export_notes(chart: &Chart, path: &Path) -> Result<()> {
    tracing::info!("Exporting notes to {}", path.display());
    let mut out = BufWriter::new(File::create(path)?);
    write_bms(chart, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Sample;

    fn note(position: f64, length: f64, channel: u8, keysound_id: u16) -> Note {
        Note { position, length, channel, keysound_id }
    }

    fn export(chart: &Chart) -> String {
        let mut out = Vec::new();
        write_bms(chart, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_base36() {
        assert_eq!(base36(0).unwrap(), "00");
        assert_eq!(base36(35).unwrap(), "0Z");
        assert_eq!(base36(36).unwrap(), "10");
        assert_eq!(base36(1295).unwrap(), "ZZ");
        assert_eq!(base36(1296), None);
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(192, 0), 192);
        assert_eq!(gcd(192, 48), 48);
        assert_eq!(gcd(48, 72), 24);
    }

    #[test]
    fn test_export_lines() {
        let mut chart = Chart::default();
        chart.keysounds.insert(1, Sample::new("kick.ogg"));
        chart.keysounds.insert(37, Sample::new("snare.ogg"));
        chart.tempo_map.insert(1.0, 150.0);
        chart.foreground = vec![
            note(0.0, 0.0, 0, 1),
            note(0.5, 0.0, 0, 37),
            note(1.25, 0.5, 1, 1),
        ];
        chart.background = vec![note(0.0, 0.0, 0, 1), note(0.0, 0.0, 0, 37)];

        let text = export(&chart);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "#WAV01 kick.ogg",
                "#WAV11 snare.ogg",
                "#BPM01 150",
                "",
                "#00016:0111",
                "#00001:01",
                "#00001:11",
                "",
                "#00108:01",
                "#00151:00010001",
                "",
            ]
        );
    }

    #[test]
    fn test_tempo_changes_past_base36_skipped() {
        let mut chart = Chart::default();
        for i in 0..1300 {
            chart.tempo_map.insert(i as f64, 100.0 + i as f64);
        }

        let text = export(&chart);
        assert!(text.contains("#BPMZZ 1394"));
        assert_eq!(text.lines().filter(|l| l.starts_with("#BPM")).count(), 1295);
        // Measure 1294 holds index 1295, later measures have nothing
        assert!(text.contains("#129408:ZZ"));
        assert!(!text.contains("#129508:"));
        assert!(!text.lines().any(|l| l.starts_with("#1299")));
    }

    #[test]
    fn test_unknown_lane_skipped() {
        let mut chart = Chart::default();
        chart.foreground = vec![note(0.0, 0.0, 9, 1)];
        let text = export(&chart);
        assert!(!text.contains(':'));
    }
}
