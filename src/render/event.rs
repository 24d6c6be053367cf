//! Sound event scheduling

use crate::chart::{Chart, Note, TempoMap};
use crate::error::{Error, Result};
use crate::wav::{MAX_FRAMES, SAMPLE_RATE};

/// A keysound trigger at an absolute sample index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundEvent {
    /// Output sample index
    pub time: u64,
    pub keysound_id: u16,
}

/// Convert the notes of both tracks into sound events.
///
/// The earliest note lands on sample 0. Events are sorted by time; events
/// at the same sample keep foreground-then-background file order.
///
/// Fails if a note lands past the last sample a WAV file can hold.
pub fn schedule(chart: &Chart, initial_tempo: f64) -> Result<Vec<SoundEvent>> {
    let notes = || chart.foreground.iter().chain(chart.background.iter());

    let Some(min_position) = notes().map(|n| n.position).reduce(f64::min) else {
        return Ok(Vec::new());
    };
    let shift = chart.tempo_map.position_to_seconds(initial_tempo, min_position);

    let mut events = notes()
        .map(|note| event_for_note(&chart.tempo_map, initial_tempo, shift, note))
        .collect::<Result<Vec<_>>>()?;

    // sort_by_key is stable
    events.sort_by_key(|e| e.time);
    Ok(events)
}

fn event_for_note(
    tempo_map: &TempoMap,
    initial_tempo: f64,
    shift: f64,
    note: &Note,
) -> Result<SoundEvent> {
    let seconds = tempo_map.position_to_seconds(initial_tempo, note.position) - shift;
    let time = (seconds * SAMPLE_RATE as f64).round();
    if !time.is_finite() || time >= MAX_FRAMES as f64 {
        return Err(Error::Format(format!(
            "Note at position {} starts after {:.0} seconds, too long for a WAV file",
            note.position, seconds
        )));
    }
    Ok(SoundEvent {
        time: time.max(0.0) as u64,
        keysound_id: note.keysound_id,
    })
}
