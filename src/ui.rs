// src/ui.rs - Theme and hand overlay drawing
use crate::classifier::Recognition;
use crate::landmarks::LandmarkSample;
use eframe::egui::{self, Color32, Pos2, Rect, Stroke};

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color32,
    pub surface: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub success: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    /// Landmark overlay color (the classic tracking green).
    pub overlay: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color32::from_rgb(70, 130, 240),
            surface: Color32::from_rgb(30, 30, 35),
            error: Color32::from_rgb(244, 67, 54),
            warning: Color32::from_rgb(255, 152, 0),
            success: Color32::from_rgb(76, 175, 80),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(200, 200, 200),
            overlay: Color32::from_rgb(0, 255, 0),
        }
    }
}

/// Landmark index pairs forming the hand skeleton (MediaPipe convention).
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4), // thumb
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8), // index
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12), // middle
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16), // ring
    (13, 17),
    (17, 18),
    (18, 19),
    (19, 20), // pinky
    (0, 17), // palm edge
];

/// Draws the hand skeleton over the video panel. Landmark coordinates are in
/// the tracker's normalized 0..1 image space and get mapped into `rect`.
pub fn draw_hand_overlay(
    painter: &egui::Painter,
    rect: Rect,
    landmarks: &LandmarkSample,
    theme: &Theme,
) {
    let to_screen = |p: &nalgebra::Vector3<f64>| {
        Pos2::new(
            rect.left() + p.x as f32 * rect.width(),
            rect.top() + p.y as f32 * rect.height(),
        )
    };

    for &(a, b) in HAND_CONNECTIONS.iter() {
        if a < landmarks.len() && b < landmarks.len() {
            painter.line_segment(
                [to_screen(&landmarks[a]), to_screen(&landmarks[b])],
                Stroke::new(3.0, theme.overlay),
            );
        }
    }

    for landmark in landmarks {
        painter.circle_filled(to_screen(landmark), 4.0, theme.overlay);
    }
}

/// Background color for the recognition banner, per outcome.
pub fn recognition_color(recognition: &Recognition, theme: &Theme) -> Color32 {
    match recognition {
        Recognition::Sign { .. } => theme.success,
        Recognition::Unknown => theme.warning,
        Recognition::NoHand => theme.surface,
        Recognition::NormalizationFailed => theme.error,
    }
}

/// The big per-frame label, drawn as a colored banner over the panel width.
pub fn draw_recognition_banner(ui: &mut egui::Ui, recognition: &Recognition, theme: &Theme) {
    let banner_color = recognition_color(recognition, theme);
    let text_color = match recognition {
        Recognition::Unknown => Color32::BLACK,
        _ => theme.text_primary,
    };

    ui.allocate_ui(egui::vec2(ui.available_width(), 50.0), |ui| {
        let rect = ui.available_rect_before_wrap();
        ui.painter()
            .rect_filled(rect, egui::Rounding::same(8.0), banner_color);

        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new(format!("Detected sign: {}", recognition))
                    .size(22.0)
                    .color(text_color),
            );
        });
    });
}
