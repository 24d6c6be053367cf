//! JSON serialization types for decoded charts

use super::{Chart, Note, TempoChange};
use serde::Serialize;
use std::collections::BTreeMap;

/// Top-level JSON structure for an XNT chart
#[derive(Debug, Clone, Serialize)]
pub struct ChartJson {
    /// Tempo changes in position order
    pub tempo_changes: Vec<TempoChangeJson>,
    /// Performer notes in file order
    pub foreground: Vec<NoteJson>,
    /// Auto-play notes in file order
    pub background: Vec<NoteJson>,
    /// Keysound ID to filename
    pub keysounds: BTreeMap<u16, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TempoChangeJson {
    pub position: f64,
    pub tempo: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteJson {
    pub position: f64,
    #[serde(skip_serializing_if = "is_zero")]
    pub length: f64,
    pub channel: u8,
    pub keysound: u16,
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

impl From<&Chart> for ChartJson {
    fn from(chart: &Chart) -> Self {
        Self {
            tempo_changes: chart.tempo_map.iter().map(TempoChangeJson::from).collect(),
            foreground: chart.foreground.iter().map(NoteJson::from).collect(),
            background: chart.background.iter().map(NoteJson::from).collect(),
            keysounds: chart
                .keysounds
                .iter()
                .map(|(&id, sample)| (id, sample.filename.clone()))
                .collect(),
        }
    }
}

impl From<&TempoChange> for TempoChangeJson {
    fn from(change: &TempoChange) -> Self {
        Self {
            position: change.position,
            tempo: change.tempo,
        }
    }
}

impl From<&Note> for NoteJson {
    fn from(note: &Note) -> Self {
        Self {
            position: note.position,
            length: note.length,
            channel: note.channel,
            keysound: note.keysound_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Sample;

    #[test]
    fn test_chart_json() {
        let mut chart = Chart::default();
        chart.tempo_map.insert(2.0, 150.0);
        chart.foreground.push(Note { position: 1.5, length: 0.0, channel: 2, keysound_id: 4 });
        chart.background.push(Note { position: 0.0, length: 0.5, channel: 0, keysound_id: 5 });
        chart.keysounds.insert(4, Sample::new("kick.ogg"));

        let value = serde_json::to_value(ChartJson::from(&chart)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "tempo_changes": [{ "position": 2.0, "tempo": 150.0 }],
                "foreground": [{ "position": 1.5, "channel": 2, "keysound": 4 }],
                "background": [{ "position": 0.0, "length": 0.5, "channel": 0, "keysound": 5 }],
                "keysounds": { "4": "kick.ogg" }
            })
        );
    }
}
