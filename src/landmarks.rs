// src/landmarks.rs - Hand landmark representation, normalization and distance
use nalgebra::Vector3;

/// Number of landmarks in one hand sample (MediaPipe hand model).
pub const LANDMARK_COUNT: usize = 21;

/// MediaPipe hand landmark indices.
#[allow(dead_code)]
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

use index::{MIDDLE_TIP, WRIST};

/// One hand pose at one instant: 21 ordered 3D points in the tracker's
/// normalized image coordinate space. Index 0 is the wrist, index 12 the
/// middle fingertip.
pub type LandmarkSample = Vec<Vector3<f64>>;

/// Maps a raw sample into a translation- and scale-invariant representation:
/// the wrist moves to the origin and the wrist-to-middle-fingertip distance
/// becomes 1, so the same sign matches regardless of where the hand sits in
/// the frame or how far it is from the camera.
///
/// Partial: returns `None` for anything that is not a full 21-point sample,
/// and for degenerate poses where the reference distance is zero or not
/// finite (e.g. fingertip coincident with the wrist).
pub fn normalize(sample: &[Vector3<f64>]) -> Option<LandmarkSample> {
    if sample.len() != LANDMARK_COUNT {
        return None;
    }

    let base = sample[WRIST];
    let translated: Vec<Vector3<f64>> = sample.iter().map(|p| p - base).collect();

    // Translated wrist is the origin, so the scale factor is just the norm
    // of the translated middle fingertip.
    let scale = translated[MIDDLE_TIP].norm();
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }

    Some(translated.into_iter().map(|p| p / scale).collect())
}

/// Euclidean (L2) distance over all 63 scalar coordinates of two normalized
/// samples. Returns infinity when the inputs are not comparable (length
/// mismatch, or not exactly 21 points) - that signals "no match possible",
/// not an error.
pub fn distance(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> f64 {
    if a.len() != b.len() || a.len() != LANDMARK_COUNT {
        return f64::INFINITY;
    }

    a.iter()
        .zip(b.iter())
        .map(|(pa, pb)| (pa - pb).norm_squared())
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::index::{INDEX_TIP, PINKY_TIP};
    use super::*;

    /// A valid sample with the wrist at `origin`, the middle fingertip
    /// `spread` above it, and the remaining points spread out
    /// deterministically.
    fn test_sample(origin: Vector3<f64>, spread: f64) -> LandmarkSample {
        (0..LANDMARK_COUNT)
            .map(|i| match i {
                WRIST => origin,
                MIDDLE_TIP => origin + Vector3::new(0.0, spread, 0.0),
                _ => origin + Vector3::new(i as f64 * 0.01 * spread, 0.02 * spread, 0.005 * spread),
            })
            .collect()
    }

    #[test]
    fn normalize_rejects_empty_input() {
        assert!(normalize(&[]).is_none());
    }

    #[test]
    fn normalize_rejects_wrong_length() {
        let short: Vec<Vector3<f64>> = vec![Vector3::zeros(); 20];
        assert!(normalize(&short).is_none());
        let long: Vec<Vector3<f64>> = vec![Vector3::zeros(); 22];
        assert!(normalize(&long).is_none());
    }

    #[test]
    fn normalize_rejects_zero_scale() {
        // Every point coincident with the wrist: reference distance is zero.
        let degenerate: Vec<Vector3<f64>> = vec![Vector3::new(0.4, 0.6, 0.1); LANDMARK_COUNT];
        assert!(normalize(&degenerate).is_none());
    }

    #[test]
    fn normalize_rejects_non_finite_scale() {
        let mut sample = test_sample(Vector3::zeros(), 1.0);
        sample[MIDDLE_TIP] = Vector3::new(f64::NAN, 0.0, 0.0);
        assert!(normalize(&sample).is_none());
    }

    #[test]
    fn normalized_wrist_is_origin_and_reference_distance_is_one() {
        let sample = test_sample(Vector3::new(0.3, 0.7, -0.1), 0.25);
        let normalized = normalize(&sample).unwrap();
        assert!(normalized[WRIST].norm() < 1e-12);
        assert!((normalized[MIDDLE_TIP].norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_is_translation_and_scale_invariant() {
        let near = test_sample(Vector3::new(0.1, 0.2, 0.0), 0.5);
        // Same pose, shifted across the frame and twice as large.
        let far: LandmarkSample = test_sample(Vector3::zeros(), 0.5)
            .iter()
            .map(|p| p * 2.0 + Vector3::new(0.4, 0.1, 0.05))
            .collect();

        let a = normalize(&near).unwrap();
        let b = normalize(&far).unwrap();
        assert!(distance(&a, &b) < 1e-9);
    }

    #[test]
    fn normalize_is_idempotent_on_normalized_input() {
        let sample = test_sample(Vector3::new(0.5, 0.5, 0.0), 0.3);
        let once = normalize(&sample).unwrap();
        let twice = normalize(&once).unwrap();
        assert!(distance(&once, &twice) < 1e-12);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let normalized = normalize(&test_sample(Vector3::zeros(), 1.0)).unwrap();
        assert_eq!(distance(&normalized, &normalized), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = normalize(&test_sample(Vector3::zeros(), 1.0)).unwrap();
        let b = normalize(&test_sample(Vector3::zeros(), 0.4)).unwrap();
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn distance_is_infinite_for_mismatched_shapes() {
        let full = test_sample(Vector3::zeros(), 1.0);
        let short: Vec<Vector3<f64>> = full[..20].to_vec();
        assert_eq!(distance(&full, &short), f64::INFINITY);
        assert_eq!(distance(&short, &full), f64::INFINITY);
        assert_eq!(distance(&short, &short), f64::INFINITY);
    }

    #[test]
    fn distance_matches_hand_computed_value() {
        let a = test_sample(Vector3::zeros(), 1.0);
        let mut b = a.clone();
        b[INDEX_TIP] += Vector3::new(0.3, 0.0, 0.0);
        b[PINKY_TIP] += Vector3::new(0.0, 0.4, 0.0);
        // sqrt(0.3^2 + 0.4^2) = 0.5
        assert!((distance(&a, &b) - 0.5).abs() < 1e-12);
    }
}
