// src/tracking.rs - Hand tracking with lazy MediaPipe initialization
use crate::landmarks::index::WRIST;
use crate::landmarks::{LandmarkSample, LANDMARK_COUNT};
use crate::mediapipe_bridge::MediaPipeWrapper;
use anyhow::Result;
use image::DynamicImage;
use nalgebra::Vector3;
use std::collections::VecDeque;
use std::time::Instant;

#[derive(Clone)]
pub struct PerformanceMetrics {
    pub avg_fps: f32,
    pub avg_processing_time: f32,
    /// Share of recent frames that contained a hand.
    pub detection_rate: f32,
    frame_times: VecDeque<f32>,
    detections: VecDeque<bool>,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            avg_fps: 0.0,
            avg_processing_time: 0.0,
            detection_rate: 0.0,
            frame_times: VecDeque::with_capacity(30),
            detections: VecDeque::with_capacity(30),
        }
    }
}

/// What the tracker produced for one frame: at most one hand, per the
/// single-hand configuration.
#[derive(Debug, Clone, Default)]
pub struct FrameResult {
    pub tracking_lost: bool,
    pub hand: Option<LandmarkSample>,
    pub timestamp: f64,
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub max_hands: usize,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
    pub downsample_width: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_hands: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.7,
            downsample_width: 640,
        }
    }
}

pub struct HandTracker {
    config: TrackerConfig,
    mediapipe: Option<MediaPipeWrapper>,
    mediapipe_initialized: bool,
    metrics: PerformanceMetrics,
    // Simulation state for demo mode
    sim_time: f64,
}

// Open palm facing the camera, image coordinates (x right, y down).
// Animated in generate_simulation_data when no real tracker is available.
const SIM_HAND_POSE: [[f64; 3]; LANDMARK_COUNT] = [
    [0.50, 0.78, 0.00],  // wrist
    [0.44, 0.72, -0.01], // thumb
    [0.39, 0.66, -0.02],
    [0.36, 0.60, -0.03],
    [0.34, 0.55, -0.04],
    [0.44, 0.55, -0.01], // index
    [0.43, 0.46, -0.02],
    [0.42, 0.40, -0.03],
    [0.42, 0.34, -0.04],
    [0.50, 0.53, -0.01], // middle
    [0.50, 0.43, -0.02],
    [0.50, 0.36, -0.03],
    [0.50, 0.30, -0.04],
    [0.56, 0.55, -0.01], // ring
    [0.57, 0.46, -0.02],
    [0.57, 0.40, -0.03],
    [0.58, 0.34, -0.04],
    [0.61, 0.58, -0.01], // pinky
    [0.63, 0.51, -0.02],
    [0.64, 0.46, -0.03],
    [0.65, 0.42, -0.04],
];

impl HandTracker {
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: TrackerConfig::default(),
            mediapipe: None,
            mediapipe_initialized: false,
            metrics: PerformanceMetrics::new(),
            sim_time: 0.0,
        })
    }

    pub fn config_mut(&mut self) -> &mut TrackerConfig {
        &mut self.config
    }

    pub fn initialize_mediapipe(&mut self) {
        if self.mediapipe_initialized {
            eprintln!("MediaPipe already initialized");
            return;
        }

        eprintln!(
            "Initializing MediaPipe hand tracking (max {} hand(s), confidence {:.2})...",
            self.config.max_hands, self.config.min_detection_confidence
        );

        match MediaPipeWrapper::new() {
            Ok(mp) => {
                eprintln!("✓ MediaPipe initialized successfully");
                self.mediapipe = Some(mp);
                self.mediapipe_initialized = true;
            }
            Err(e) => {
                eprintln!("✗ MediaPipe initialization failed: {}", e);
                eprintln!("  Will use simulation mode for tracking");
            }
        }
    }

    pub fn shutdown_mediapipe(&mut self) {
        if self.mediapipe.is_some() {
            eprintln!("Shutting down MediaPipe...");
            self.mediapipe = None;
            self.mediapipe_initialized = false;
        }
    }

    pub fn is_using_mediapipe(&self) -> bool {
        self.mediapipe.is_some() && self.mediapipe_initialized
    }

    pub fn process_frame(&mut self, frame: &DynamicImage) -> Result<FrameResult> {
        let mut result = FrameResult::default();
        result.timestamp = self.sim_time;
        self.sim_time += 0.033;

        if let Some(ref mut mp) = self.mediapipe {
            // Downsample large frames before detection, detection quality
            // does not need full camera resolution.
            let input = if frame.width() > self.config.downsample_width {
                let scale = self.config.downsample_width as f64 / frame.width() as f64;
                frame.thumbnail(
                    self.config.downsample_width,
                    (frame.height() as f64 * scale) as u32,
                )
            } else {
                frame.clone()
            };

            match mp.process_image(&input) {
                Ok(mp_result) => {
                    result.hand = mp_result
                        .hand_landmarks
                        .iter()
                        .take(self.config.max_hands)
                        .find_map(|hand| Self::convert_landmarks(hand));
                }
                Err(e) => {
                    eprintln!("MediaPipe error: {}", e);
                    result.tracking_lost = true;
                }
            }
        } else {
            result.hand = Some(self.generate_simulation_data());
        }

        Ok(result)
    }

    pub fn process_frame_with_metrics(
        &mut self,
        frame: &DynamicImage,
    ) -> Result<(FrameResult, PerformanceMetrics)> {
        let start = Instant::now();
        let result = self.process_frame(frame)?;
        let elapsed = start.elapsed().as_secs_f32();

        self.metrics.frame_times.push_front(elapsed);
        if self.metrics.frame_times.len() > 30 {
            self.metrics.frame_times.pop_back();
        }
        self.metrics.detections.push_front(result.hand.is_some());
        if self.metrics.detections.len() > 30 {
            self.metrics.detections.pop_back();
        }

        self.metrics.avg_processing_time =
            self.metrics.frame_times.iter().sum::<f32>() / self.metrics.frame_times.len() as f32;
        self.metrics.avg_fps = if self.metrics.avg_processing_time > 0.0 {
            1.0 / self.metrics.avg_processing_time
        } else {
            0.0
        };
        self.metrics.detection_rate = self.metrics.detections.iter().filter(|d| **d).count() as f32
            / self.metrics.detections.len() as f32;

        Ok((result, self.metrics.clone()))
    }

    fn convert_landmarks(hand: &[[f64; 3]]) -> Option<LandmarkSample> {
        if hand.len() != LANDMARK_COUNT {
            eprintln!(
                "Dropping hand with {} landmarks (expected {})",
                hand.len(),
                LANDMARK_COUNT
            );
            return None;
        }
        Some(
            hand.iter()
                .map(|lm| Vector3::new(lm[0], lm[1], lm[2]))
                .collect(),
        )
    }

    /// Animated synthetic hand so the rest of the pipeline stays exercisable
    /// without a camera-grade tracker: the palm drifts around the frame and
    /// the fingers curl in and out.
    fn generate_simulation_data(&self) -> LandmarkSample {
        let t = self.sim_time;
        let drift = Vector3::new(0.06 * (t * 0.5).sin(), 0.03 * (t * 0.9).sin(), 0.0);
        let curl = 0.85 + 0.15 * (t * 0.4).cos();

        let wrist = Vector3::new(SIM_HAND_POSE[WRIST][0], SIM_HAND_POSE[WRIST][1], SIM_HAND_POSE[WRIST][2]);
        SIM_HAND_POSE
            .iter()
            .map(|p| {
                let point = Vector3::new(p[0], p[1], p[2]);
                wrist + (point - wrist) * curl + drift
            })
            .collect()
    }
}
