//! Additive mixing of keysound instances

use super::event::SoundEvent;
use super::sample::Sample;
use crate::chart::KeysoundTable;
use crate::wav::SAMPLE_RATE;

/// Amplitude per character of the progress bar
const PROGRESS_BAR_STEP: u32 = 4096;

/// Accumulated stereo output prior to normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MixedBuffer {
    frames: Vec<[i32; 2]>,
    peak: u32,
}

impl MixedBuffer {
    /// Build a buffer from frames, computing the peak
    pub fn from_frames(frames: Vec<[i32; 2]>) -> Self {
        let peak = frames
            .iter()
            .flatten()
            .map(|v| v.unsigned_abs())
            .max()
            .unwrap_or(0);
        Self { frames, peak }
    }

    /// (left, right) accumulator pairs, one per output sample
    pub fn frames(&self) -> &[[i32; 2]] {
        &self.frames
    }

    /// Largest absolute value seen on either channel
    pub fn peak(&self) -> u32 {
        self.peak
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// One playback of a keysound
#[derive(Debug, Clone, Copy)]
struct SoundInstance<'a> {
    sample: &'a Sample,
    start: u64,
}

impl SoundInstance<'_> {
    fn still_playing(&self, now: u64) -> bool {
        now < self.start + self.sample.sample_count() as u64
    }

    fn get_sample(&self, now: u64, channel: usize) -> i32 {
        self.sample.get_sample((now - self.start) as usize, channel)
    }
}

/// Mixing engine over a fixed keysound table
pub struct Mixer<'a> {
    keysounds: &'a KeysoundTable,
    instances: Vec<SoundInstance<'a>>,
}

impl<'a> Mixer<'a> {
    pub fn new(keysounds: &'a KeysoundTable) -> Self {
        Self {
            keysounds,
            instances: Vec::new(),
        }
    }

    /// Resolve a keysound that can actually play
    fn resolve(&self, keysound_id: u16) -> Option<&'a Sample> {
        self.keysounds
            .get(&keysound_id)
            .filter(|sample| sample.is_loaded())
    }

    /// Upper bound on the number of frames `mix` produces for `events`.
    ///
    /// The i-th sorted event starts at most `i` ticks late, since only one
    /// event starts per tick.
    pub fn frame_bound(&self, events: &[SoundEvent]) -> u64 {
        events
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let length = self.resolve(e.keysound_id).map_or(0, |s| s.sample_count() as u64);
                e.time.saturating_add(i as u64).saturating_add(length)
            })
            .max()
            .map_or(0, |end| end.saturating_add(1))
    }

    /// Render sorted events until every event has fired and every
    /// instance has finished.
    ///
    /// At most one pending event starts per sample tick.
    pub fn mix(&mut self, events: &[SoundEvent]) -> MixedBuffer {
        let bound = self.frame_bound(events);
        let mut frames = Vec::with_capacity(usize::try_from(bound).unwrap_or(0));
        let mut peak: u32 = 0;
        let mut window_peak: u32 = 0;
        let mut pending = events.iter().peekable();
        let mut now: u64 = 0;

        self.instances.clear();

        while pending.peek().is_some() || !self.instances.is_empty() {
            if now % SAMPLE_RATE as u64 == 0 {
                tracing::debug!(
                    "Rendering: {:3} sec: {}",
                    now / SAMPLE_RATE as u64,
                    "]".repeat(window_peak.div_ceil(PROGRESS_BAR_STEP) as usize)
                );
                window_peak = 0;
            }

            if let Some(event) = pending.next_if(|e| e.time <= now) {
                if let Some(sample) = self.resolve(event.keysound_id) {
                    self.instances.push(SoundInstance { sample, start: now });
                }
            }

            let (mut left, mut right) = (0i32, 0i32);
            self.instances.retain(|instance| {
                if !instance.still_playing(now) {
                    return false;
                }
                left = left.saturating_add(instance.get_sample(now, 0));
                right = right.saturating_add(instance.get_sample(now, 1));
                true
            });

            let amplitude = left.unsigned_abs().max(right.unsigned_abs());
            peak = peak.max(amplitude);
            window_peak = window_peak.max(amplitude);

            frames.push([left, right]);
            now += 1;
        }

        tracing::info!("Max amplitude: {}", peak);
        MixedBuffer { frames, peak }
    }
}
