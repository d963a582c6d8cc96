// src/library.rs - Gesture library storage and JSON loading
use crate::landmarks::{LandmarkSample, LANDMARK_COUNT};
use nalgebra::Vector3;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("cannot read gesture file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("gesture file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("gesture file must contain a JSON object of name -> variations")]
    NotAnObject,
}

/// One named gesture with its recorded variations, in stored order.
#[derive(Debug, Clone)]
pub struct GestureEntry {
    pub name: String,
    pub variations: Vec<LandmarkSample>,
}

/// In-memory collection of reference gestures, loaded once from a JSON file
/// and read-only afterwards. Entries keep the insertion order of the JSON
/// object, which fixes the tie-break order during matching.
#[derive(Debug, Clone, Default)]
pub struct GestureLibrary {
    entries: Vec<GestureEntry>,
}

/// Coordinates in recorded gesture files arrive either as JSON numbers or as
/// numeric strings, depending on what produced the file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCoord {
    Number(f64),
    Text(String),
}

impl RawCoord {
    fn to_f64(&self) -> Option<f64> {
        match self {
            RawCoord::Number(n) => Some(*n),
            RawCoord::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl GestureLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a gesture library from disk. File-level problems (missing file,
    /// malformed JSON) are errors; individual bad variations are skipped with
    /// a warning so one corrupt recording cannot take the whole library down.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, LibraryError> {
        let root: serde_json::Value = serde_json::from_str(text)?;
        let object = root.as_object().ok_or(LibraryError::NotAnObject)?;

        let mut entries = Vec::with_capacity(object.len());
        for (name, value) in object {
            let raw_variations: Vec<serde_json::Value> = match value {
                serde_json::Value::Array(items) => items.clone(),
                _ => {
                    warn!(gesture = %name, "gesture value is not an array of variations, skipping");
                    continue;
                }
            };

            let mut variations = Vec::with_capacity(raw_variations.len());
            for (index, raw) in raw_variations.into_iter().enumerate() {
                match parse_variation(raw) {
                    Ok(sample) => variations.push(sample),
                    Err(reason) => {
                        warn!(gesture = %name, variation = index, %reason, "skipping variation");
                    }
                }
            }

            entries.push(GestureEntry {
                name: name.clone(),
                variations,
            });
        }

        Ok(Self { entries })
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[GestureEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn gesture_count(&self) -> usize {
        self.entries.len()
    }

    pub fn variation_count(&self) -> usize {
        self.entries.iter().map(|e| e.variations.len()).sum()
    }
}

/// Coerces one raw variation into a typed 21-point sample. This is the one
/// place loosely-typed file data becomes numbers; anything that does not
/// parse cleanly rejects the whole variation rather than smuggling NaN into
/// the matcher.
fn parse_variation(raw: serde_json::Value) -> Result<LandmarkSample, String> {
    let points: Vec<[RawCoord; 3]> =
        serde_json::from_value(raw).map_err(|e| format!("bad point structure: {}", e))?;

    if points.len() != LANDMARK_COUNT {
        return Err(format!(
            "expected {} landmarks, found {}",
            LANDMARK_COUNT,
            points.len()
        ));
    }

    let mut sample = Vec::with_capacity(LANDMARK_COUNT);
    for (index, [x, y, z]) in points.iter().enumerate() {
        match (x.to_f64(), y.to_f64(), z.to_f64()) {
            (Some(x), Some(y), Some(z)) => sample.push(Vector3::new(x, y, z)),
            _ => return Err(format!("landmark {} has a non-numeric coordinate", index)),
        }
    }

    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::index::MIDDLE_TIP;

    fn variation_json(fill: f64) -> String {
        let points: Vec<String> = (0..LANDMARK_COUNT)
            .map(|i| format!("[{}, {}, 0.0]", i as f64 * 0.01, fill))
            .collect();
        format!("[{}]", points.join(","))
    }

    #[test]
    fn parses_numeric_coordinates() {
        let json = format!(r#"{{"A": [{}]}}"#, variation_json(0.5));
        let library = GestureLibrary::from_json_str(&json).unwrap();
        assert_eq!(library.gesture_count(), 1);
        assert_eq!(library.variation_count(), 1);
        assert_eq!(library.entries()[0].name, "A");
        assert_eq!(library.entries()[0].variations[0].len(), LANDMARK_COUNT);
    }

    #[test]
    fn coerces_string_coordinates() {
        let points: Vec<String> = (0..LANDMARK_COUNT)
            .map(|i| format!(r#"["{}", "0.25", "-0.5"]"#, i as f64 * 0.02))
            .collect();
        let json = format!(r#"{{"B": [[{}]]}}"#, points.join(","));

        let library = GestureLibrary::from_json_str(&json).unwrap();
        assert_eq!(library.variation_count(), 1);
        let sample = &library.entries()[0].variations[0];
        assert_eq!(sample[MIDDLE_TIP].y, 0.25);
        assert_eq!(sample[MIDDLE_TIP].z, -0.5);
    }

    #[test]
    fn preserves_insertion_order() {
        let json = format!(
            r#"{{"Z": [{}], "A": [{}], "M": [{}]}}"#,
            variation_json(0.1),
            variation_json(0.2),
            variation_json(0.3)
        );
        let library = GestureLibrary::from_json_str(&json).unwrap();
        let names: Vec<&str> = library.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn skips_variation_with_wrong_point_count() {
        let json = format!(
            r#"{{"A": [[[0.0, 0.0, 0.0]], {}]}}"#,
            variation_json(0.4)
        );
        let library = GestureLibrary::from_json_str(&json).unwrap();
        // The one-point variation is dropped, the valid one survives.
        assert_eq!(library.gesture_count(), 1);
        assert_eq!(library.variation_count(), 1);
    }

    #[test]
    fn skips_variation_with_unparseable_coordinate() {
        let mut points: Vec<String> = (0..LANDMARK_COUNT)
            .map(|_| "[0.1, 0.2, 0.3]".to_string())
            .collect();
        points[3] = r#"["not a number", 0.2, 0.3]"#.to_string();
        let json = format!(r#"{{"A": [[{}], {}]}}"#, points.join(","), variation_json(0.9));

        let library = GestureLibrary::from_json_str(&json).unwrap();
        assert_eq!(library.variation_count(), 1);
    }

    #[test]
    fn gesture_with_no_valid_variations_is_kept_but_empty() {
        let json = r#"{"A": [[[1, 2, 3]]]}"#;
        let library = GestureLibrary::from_json_str(json).unwrap();
        assert_eq!(library.gesture_count(), 1);
        assert_eq!(library.variation_count(), 0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            GestureLibrary::from_json_str("not json at all"),
            Err(LibraryError::Json(_))
        ));
    }

    #[test]
    fn non_object_root_is_an_error() {
        assert!(matches!(
            GestureLibrary::from_json_str("[1, 2, 3]"),
            Err(LibraryError::NotAnObject)
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("sign_tracker_does_not_exist.json");
        assert!(matches!(
            GestureLibrary::load(&path),
            Err(LibraryError::Io { .. })
        ));
    }
}
