//! XNE header parsing
//!
//! Only the initial tempo is taken from the header: the first line carries
//! an attribute of the form `Tempo="<float>"`.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

const TEMPO_ATTR: &str = "Tempo=\"";

/// Extract the initial tempo from the first line of header text
pub fn parse_initial_tempo(text: &str) -> Result<f64> {
    let line = text.lines().next().unwrap_or("");

    let start = line
        .find(TEMPO_ATTR)
        .ok_or_else(|| Error::Config("XNE file has no Tempo attribute".into()))?
        + TEMPO_ATTR.len();
    let rest = &line[start..];
    let value = rest.find('"').map_or(rest, |end| &rest[..end]);

    let tempo = leading_float(value);
    match tempo {
        Some(t) if t.is_finite() && t > 0.0 => Ok(t),
        _ => Err(Error::Config(format!("XNE file has invalid tempo: {:?}", value))),
    }
}

/// Parse the longest numeric prefix, ignoring leading whitespace
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    (1..=s.len())
        .rev()
        .filter(|&i| s.is_char_boundary(i))
        .find_map(|i| s[..i].parse::<f64>().ok())
}

/// Read the initial tempo from an XNE file
pub fn read_initial_tempo(path: &Path) -> Result<f64> {
    let data = fs::read(path)
        .map_err(|e| Error::Config(format!("XNE file {} not found: {}", path.display(), e)))?;
    parse_initial_tempo(&String::from_utf8_lossy(&data))
}
