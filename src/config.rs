//! Input and output path derivation

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the optional volume override file next to the chart
pub const VOLUME_FILENAME: &str = "volumes.txt";

/// Files involved in rendering one chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Directory holding the chart and its keysounds
    pub dir: PathBuf,
    /// Binary note file (`.xnt`)
    pub chart: PathBuf,
    /// Text header with the initial tempo (`.xne`)
    pub header: PathBuf,
    /// Volume overrides
    pub volumes: PathBuf,
    /// Rendered WAV
    pub output: PathBuf,
    /// Write a BMS export of the notes next to the output
    pub export_notes: bool,
}

impl RenderConfig {
    /// Derive all paths from the chart path.
    ///
    /// Either the `.xnt` or the `.xne` file may be given.
    pub fn new(chart: &Path, output: Option<&Path>) -> Self {
        let dir = chart.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = chart
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut chars = name.chars();
        let last = chars.next_back();
        let base = chars.as_str();
        let note_name = match last {
            Some('e') => format!("{}t", base),
            _ => name.clone(),
        };
        let header_name = format!("{}e", base);

        let chart = dir.join(note_name);
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| chart.with_extension("wav"));

        Self {
            volumes: dir.join(VOLUME_FILENAME),
            header: dir.join(header_name),
            chart,
            output,
            dir,
            export_notes: false,
        }
    }

    /// BMS export path: output stem with `_notes.bms`
    pub fn notes_path(&self) -> PathBuf {
        let mut name: OsString = self.output.file_stem().unwrap_or_default().to_owned();
        name.push("_notes.bms");
        self.output.with_file_name(name)
    }
}
