//! Keysound volume overrides
//!
//! The file holds whitespace separated `<first> <last> <volume>` triples.
//! Each triple applies to every ID in `first..=last`; later triples win.

use super::KeysoundTable;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Keysound ID to volume multiplier
pub type VolumeMap = BTreeMap<u16, f32>;

/// Parse volume overrides, stopping at the first malformed triple
pub fn parse_volumes(text: &str) -> VolumeMap {
    let mut volumes = VolumeMap::new();
    let mut tokens = text.split_whitespace();

    loop {
        let (Some(first), Some(last), Some(volume)) = (
            tokens.next().and_then(|t| t.parse::<u16>().ok()),
            tokens.next().and_then(|t| t.parse::<u16>().ok()),
            tokens.next().and_then(|t| t.parse::<f32>().ok()),
        ) else {
            break;
        };

        for id in first..=last {
            tracing::debug!("volume[{}] = {}", id, volume);
            volumes.insert(id, volume);
        }
    }

    volumes
}

/// Read a volume file. A missing file yields no overrides.
pub fn read_volumes(path: &Path) -> Result<VolumeMap> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse_volumes(&text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(VolumeMap::new()),
        Err(e) => Err(Error::Config(format!(
            "Volume file {} can't be read: {}",
            path.display(),
            e
        ))),
    }
}

/// Set the volume of every keysound that has an override
pub fn apply_volumes(keysounds: &mut KeysoundTable, volumes: &VolumeMap) {
    for (id, sample) in keysounds.iter_mut() {
        if let Some(&volume) = volumes.get(id) {
            sample.volume = volume;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Sample;

    #[test]
    fn test_ranges_inclusive() {
        let volumes = parse_volumes("1 3 0.5\n10 10 2.0\n");
        assert_eq!(volumes.len(), 4);
        assert_eq!(volumes[&1], 0.5);
        assert_eq!(volumes[&3], 0.5);
        assert_eq!(volumes[&10], 2.0);
        assert!(!volumes.contains_key(&4));
    }

    #[test]
    fn test_later_lines_overwrite() {
        let volumes = parse_volumes("1 5 0.5\n3 4 0.8");
        assert_eq!(volumes[&2], 0.5);
        assert_eq!(volumes[&3], 0.8);
        assert_eq!(volumes[&5], 0.5);
    }

    #[test]
    fn test_stops_at_malformed() {
        let volumes = parse_volumes("1 1 0.5\n2 x 0.5\n3 3 0.5");
        assert_eq!(volumes.len(), 1);
    }

    #[test]
    fn test_empty_range() {
        assert!(parse_volumes("5 2 0.5").is_empty());
    }

    #[test]
    fn test_missing_file() {
        let volumes = read_volumes(Path::new("/nonexistent/volumes.txt")).unwrap();
        assert!(volumes.is_empty());
    }

    #[test]
    fn test_apply() {
        let mut keysounds = KeysoundTable::new();
        keysounds.insert(1, Sample::new("a.ogg"));
        keysounds.insert(2, Sample::new("b.ogg"));
        apply_volumes(&mut keysounds, &parse_volumes("2 9 0.25"));
        assert_eq!(keysounds[&1].volume, 1.0);
        assert_eq!(keysounds[&2].volume, 0.25);
    }
}
