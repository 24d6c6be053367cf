//! Rendering pipeline: load keysounds, schedule, mix and write

pub mod event;
pub mod mixer;
pub mod sample;

pub use event::{schedule, SoundEvent};
pub use mixer::{MixedBuffer, Mixer};
pub use sample::Sample;

use crate::chart::export::export_notes;
use crate::chart::header::read_initial_tempo;
use crate::chart::volume::{apply_volumes, read_volumes, VolumeMap};
use crate::chart::{Chart, KeysoundTable};
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::wav::writer::write_file;
use crate::wav::MAX_FRAMES;
use std::fs;
use std::path::Path;

/// Outcome of a finished render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Stereo frames written
    pub frames: usize,
    /// Peak accumulated amplitude before normalization
    pub peak: u32,
    /// Keysounds that failed to load and were silenced
    pub failed_keysounds: usize,
}

/// Load every keysound from `dir` and apply volume overrides.
///
/// Failures are logged and leave the keysound silent. Returns the number
/// of keysounds that failed.
pub fn load_samples(keysounds: &mut KeysoundTable, dir: &Path, volumes: &VolumeMap) -> usize {
    let total = keysounds.len();
    let mut failed = 0;

    for (i, (id, sample)) in keysounds.iter_mut().enumerate() {
        tracing::info!(
            "({}/{}) [{}]: Loading {}...",
            i + 1,
            total,
            id,
            sample.wav_filename().display()
        );
        if let Err(e) = sample.load(dir) {
            tracing::warn!("{}", e);
            failed += 1;
        }
    }

    apply_volumes(keysounds, volumes);
    failed
}

/// Render a decoded chart to the WAV file named by `config`.
///
/// Keysounds are loaded from the chart directory; they are released when
/// `chart` is dropped. A chart too long for a WAV file fails before the
/// notes export or any mixing, so no output is created.
pub fn render_chart(
    chart: &mut Chart,
    initial_tempo: f64,
    volumes: &VolumeMap,
    config: &RenderConfig,
) -> Result<RenderSummary> {
    let events = schedule(chart, initial_tempo)?;
    let failed_keysounds = load_samples(&mut chart.keysounds, &config.dir, volumes);

    let mut mixer = Mixer::new(&chart.keysounds);
    let bound = mixer.frame_bound(&events);
    if bound > MAX_FRAMES {
        return Err(Error::Format(format!(
            "Render needs up to {} frames, more than a WAV file holds ({})",
            bound, MAX_FRAMES
        )));
    }

    if config.export_notes {
        export_notes(chart, &config.notes_path())?;
    }

    let buffer = mixer.mix(&events);

    tracing::info!("Writing {}...", config.output.display());
    write_file(&config.output, &buffer)?;

    Ok(RenderSummary {
        frames: buffer.len(),
        peak: buffer.peak(),
        failed_keysounds,
    })
}

/// Read, decode and render the chart described by `config`.
///
/// Header, volume file and chart are all read before any output is
/// written, so a fatal error leaves no output behind.
pub fn render_file(config: &RenderConfig) -> Result<RenderSummary> {
    let initial_tempo = read_initial_tempo(&config.header)?;
    let volumes = read_volumes(&config.volumes)?;

    let data = fs::read(&config.chart).map_err(|e| {
        Error::Format(format!("XNT file {} not found: {}", config.chart.display(), e))
    })?;
    let mut chart = Chart::parse(&data)?;

    let summary = render_chart(&mut chart, initial_tempo, &volumes, config)?;
    tracing::info!("Finished!");
    Ok(summary)
}
