// src/video.rs - Webcam capture for the live recognition loop
use anyhow::Result;
use image::{DynamicImage, ImageBuffer};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub struct VideoSource {
    camera: Arc<Mutex<Camera>>,
}

#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub path: PathBuf,
    pub fps: f64,
    pub width: i32,
    pub height: i32,
}

impl VideoSource {
    pub fn new_camera(index: i32) -> Result<Self> {
        eprintln!("DEBUG: Attempting to open camera index {}", index);

        let camera_index = CameraIndex::Index(index as u32);

        let format = CameraFormat::new(Resolution::new(640, 480), FrameFormat::MJPEG, 30);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Exact(format));

        let camera = Camera::new(camera_index, requested).map_err(|e| {
            eprintln!("DEBUG: Failed to create camera: {}", e);
            anyhow::anyhow!("Failed to open camera: {}", e)
        })?;

        eprintln!("DEBUG: Camera created successfully");
        Ok(Self {
            camera: Arc::new(Mutex::new(camera)),
        })
    }

    /// Captures one frame, converted to RGBA and mirrored horizontally so the
    /// preview behaves like a mirror (the gesture library is recorded against
    /// the mirrored view as well).
    pub fn read_frame(&mut self) -> Result<DynamicImage> {
        let mut cam = self.camera.lock().unwrap();

        if !cam.is_stream_open() {
            cam.open_stream()
                .map_err(|e| anyhow::anyhow!("Failed to open camera stream: {}", e))?;
        }

        let frame = cam
            .frame()
            .map_err(|e| anyhow::anyhow!("Failed to capture frame: {}", e))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| anyhow::anyhow!("Failed to decode frame: {}", e))?;

        let width = decoded.width();
        let height = decoded.height();
        let rgb_data = decoded.into_vec();

        let mut rgba_data = Vec::with_capacity((width * height * 4) as usize);
        for chunk in rgb_data.chunks(3) {
            rgba_data.push(chunk[0]);
            rgba_data.push(chunk[1]);
            rgba_data.push(chunk[2]);
            rgba_data.push(255);
        }

        let img = ImageBuffer::from_raw(width, height, rgba_data)
            .ok_or_else(|| anyhow::anyhow!("Failed to create image buffer"))?;

        let flipped = image::imageops::flip_horizontal(&img);
        Ok(DynamicImage::ImageRgba8(flipped))
    }

    pub fn get_info(&self) -> VideoInfo {
        let cam = self.camera.lock().unwrap();
        let resolution = cam.resolution();
        VideoInfo {
            path: PathBuf::from("camera://0"),
            fps: cam.frame_rate() as f64,
            width: resolution.width() as i32,
            height: resolution.height() as i32,
        }
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        if let Ok(mut cam) = self.camera.lock() {
            let _ = cam.stop_stream();
        }
    }
}
