use eframe::egui;

/// Multiplicative rectangle factor for one zoom-in step.
pub const ZOOM_IN_FACTOR: f64 = 0.9;
/// Multiplicative rectangle factor for one zoom-out step.
pub const ZOOM_OUT_FACTOR: f64 = 1.1;

/// A navigation signal produced by the input layer.
///
/// The core model knows nothing about scroll wheels or keys; this layer
/// owns the policy of turning raw events into zoom direction, factor, and
/// reset signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    ZoomIn,
    ZoomOut,
    Reset,
    CyclePalette,
    ExportFrame,
}

impl ViewCommand {
    /// The zoom factor this command carries, if it is a zoom.
    pub fn zoom_factor(self) -> Option<f64> {
        match self {
            Self::ZoomIn => Some(ZOOM_IN_FACTOR),
            Self::ZoomOut => Some(ZOOM_OUT_FACTOR),
            _ => None,
        }
    }
}

/// Translate this frame's raw events into view commands.
///
/// Scroll up zooms in, scroll down zooms out, `R` resets, `P` cycles the
/// palette, `E` exports the current frame.
pub fn collect(ctx: &egui::Context) -> Vec<ViewCommand> {
    let mut commands = Vec::new();
    ctx.input(|i| {
        let scroll = i.raw_scroll_delta.y;
        if scroll > 0.0 {
            commands.push(ViewCommand::ZoomIn);
        } else if scroll < 0.0 {
            commands.push(ViewCommand::ZoomOut);
        }
        if i.key_pressed(egui::Key::R) {
            commands.push(ViewCommand::Reset);
        }
        if i.key_pressed(egui::Key::P) {
            commands.push(ViewCommand::CyclePalette);
        }
        if i.key_pressed(egui::Key::E) {
            commands.push(ViewCommand::ExportFrame);
        }
    });
    commands
}
