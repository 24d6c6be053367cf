//! Tempo map and musical position to time conversion

/// Seconds per measure at 1 BPM (4 beats per measure, 60 seconds per minute)
pub const SECONDS_PER_MEASURE_BPM: f64 = 4.0 * 60.0;

/// A tempo change at a musical position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoChange {
    /// Measure index plus fractional offset within the measure
    pub position: f64,
    /// Tempo in beats per minute
    pub tempo: f64,
}

/// Tempo changes ordered by position, at most one per position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TempoMap {
    changes: Vec<TempoChange>,
}

impl TempoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tempo change. A change at an existing position replaces it.
    pub fn insert(&mut self, position: f64, tempo: f64) {
        let change = TempoChange { position, tempo };
        match self
            .changes
            .binary_search_by(|c| c.position.total_cmp(&position))
        {
            Ok(i) => self.changes[i] = change,
            Err(i) => self.changes.insert(i, change),
        }
    }

    /// Iterate changes in ascending position order
    pub fn iter(&self) -> impl Iterator<Item = &TempoChange> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Elapsed seconds from position 0 to `position`.
    ///
    /// `initial_tempo` is in effect until the first change. Every change
    /// strictly before `position` closes a segment at the tempo that was
    /// active before it; the remainder runs at the tempo active at
    /// `position`.
    pub fn position_to_seconds(&self, initial_tempo: f64, position: f64) -> f64 {
        let mut seconds = 0.0;
        let mut tempo = initial_tempo;
        let mut last = 0.0;

        for change in self.changes.iter().take_while(|c| c.position < position) {
            seconds += (change.position - last) * SECONDS_PER_MEASURE_BPM / tempo;
            last = change.position;
            tempo = change.tempo;
        }

        seconds + (position - last) * SECONDS_PER_MEASURE_BPM / tempo
    }
}
