// src/classifier.rs - Nearest-neighbor gesture classification
use crate::landmarks::{distance, normalize, LandmarkSample};
use crate::library::GestureLibrary;
use std::fmt;

/// Acceptance threshold in normalized-distance units. A fixed tunable
/// constant, not derived from data: the closest library match is only
/// reported when it comes in strictly below this.
pub const DISTANCE_THRESHOLD: f64 = 0.5;

/// Per-frame classification outcome. The `Display` form is the label shown
/// to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    /// No hand in the frame.
    NoHand,
    /// A hand was detected but its pose was too degenerate to normalize.
    NormalizationFailed,
    /// No stored gesture came close enough.
    Unknown,
    /// Best match within the acceptance threshold.
    Sign { name: String, distance: f64 },
}

impl fmt::Display for Recognition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recognition::NoHand => write!(f, "no hand detected"),
            Recognition::NormalizationFailed => write!(f, "normalization failed"),
            Recognition::Unknown => write!(f, "unknown"),
            Recognition::Sign { name, .. } => write!(f, "{}", name),
        }
    }
}

/// Labels a live landmark sample with the closest known gesture.
///
/// Every stored variation is normalized again on every call; nothing is
/// cached between frames, so cost is linear in the total variation count.
/// Variations that fail to normalize are skipped, and ties on the minimum
/// distance go to the variation encountered first in library order.
pub fn classify(sample: Option<&LandmarkSample>, library: &GestureLibrary) -> Recognition {
    let Some(sample) = sample else {
        return Recognition::NoHand;
    };
    let Some(query) = normalize(sample) else {
        return Recognition::NormalizationFailed;
    };

    let mut best: Option<(&str, f64)> = None;
    for entry in library.entries() {
        for variation in &entry.variations {
            let Some(reference) = normalize(variation) else {
                continue;
            };
            let d = distance(&query, &reference);
            if best.map_or(true, |(_, min)| d < min) {
                best = Some((entry.name.as_str(), d));
            }
        }
    }

    match best {
        Some((name, d)) if d < DISTANCE_THRESHOLD => Recognition::Sign {
            name: name.to_string(),
            distance: d,
        },
        _ => Recognition::Unknown,
    }
}
