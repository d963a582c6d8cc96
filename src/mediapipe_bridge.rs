// src/mediapipe_bridge.rs - Stub version for testing
use anyhow::Result;
use image::DynamicImage;

/// Landmarks for the detected hands, one inner list of 21 `[x, y, z]`
/// triples per hand, in the tracker's normalized image coordinates.
#[derive(Debug, Default)]
pub struct MediaPipeResult {
    pub hand_landmarks: Vec<Vec<[f64; 3]>>,
}

pub struct MediaPipeWrapper;

impl MediaPipeWrapper {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }

    pub fn process_image(&mut self, _frame: &DynamicImage) -> Result<MediaPipeResult> {
        // No detections from the stub; the tracker falls back to its
        // simulated hand when nothing real is available.
        Ok(MediaPipeResult::default())
    }
}
