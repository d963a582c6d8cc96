// src/data.rs - Per-session recognition logging and CSV export
use crate::classifier::Recognition;
use anyhow::Result;
use chrono::Local;
use csv::Writer;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default location for exported session logs.
pub static DEFAULT_OUTPUT_DIR: Lazy<PathBuf> = Lazy::new(|| {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.join("SignTracker")))
        .unwrap_or_else(|| PathBuf::from("./output"))
});

#[derive(Debug, Serialize)]
struct RecognitionRecord {
    timestamp: f64,
    frame: u64,
    hand_detected: bool,
    label: String,
    match_distance: Option<f64>,
}

/// Accumulates one record per processed frame and writes them out as CSV on
/// request. Recognition history only; recorded gesture templates never pass
/// through here.
pub struct SessionLog {
    output_dir: PathBuf,
    session_name: String,
    records: Vec<RecognitionRecord>,
}

impl SessionLog {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name
            .unwrap_or_else(|| format!("session_{}", Local::now().format("%Y%m%d_%H%M%S")));

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            records: Vec::new(),
        }
    }

    pub fn add_frame(&mut self, timestamp: f64, frame: u64, recognition: &Recognition) {
        let match_distance = match recognition {
            Recognition::Sign { distance, .. } => Some(*distance),
            _ => None,
        };

        self.records.push(RecognitionRecord {
            timestamp,
            frame,
            hand_detected: !matches!(recognition, Recognition::NoHand),
            label: recognition.to_string(),
            match_distance,
        });
    }

    pub fn frame_count(&self) -> usize {
        self.records.len()
    }

    pub fn matched_count(&self) -> usize {
        self.records.iter().filter(|r| r.match_distance.is_some()).count()
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self
            .output_dir
            .join(&self.session_name)
            .join("recognition_log.csv");

        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&csv_path)?;
        let mut writer = Writer::from_writer(file);

        for record in &self.records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(csv_path)
    }
}
