use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use eframe::egui;
use tracing::{info, warn};

use mandelzoom_core::ViewportModel;
use mandelzoom_render::{
    builtin_palettes, export_png, render, ColorParams, ExportMetadata, IterationBuffer, Palette,
    RenderBuffer, RenderCancel, RenderResult,
};

use crate::input::{self, ViewCommand};

// ---------------------------------------------------------------------------
// Render thread communication
// ---------------------------------------------------------------------------

struct RenderRequest {
    id: u64,
    view: ViewportModel,
    width: u32,
    height: u32,
}

struct RenderResponse {
    id: u64,
    /// The snapshot the frame was rendered from.
    view: ViewportModel,
    result: RenderResult,
}

/// Collapse a backlog of queued requests down to the newest one.
fn drain_latest(initial: RenderRequest, rx: &mpsc::Receiver<RenderRequest>) -> RenderRequest {
    let mut latest = initial;
    while let Ok(newer) = rx.try_recv() {
        latest = newer;
    }
    latest
}

/// Background worker: renders snapshot requests off the UI thread.
///
/// The worker only ever sees `ViewportModel` values copied into requests,
/// so UI-side mutations can never affect a pass already in flight.
fn render_worker(
    ctx: egui::Context,
    rx: mpsc::Receiver<RenderRequest>,
    tx: mpsc::Sender<RenderResponse>,
    cancel: Arc<RenderCancel>,
) {
    while let Ok(initial) = rx.recv() {
        let req = drain_latest(initial, &rx);
        let result = render(req.view, req.width, req.height, &cancel);

        if result.cancelled {
            continue; // A newer request is already queued.
        }
        let response = RenderResponse {
            id: req.id,
            view: req.view,
            result,
        };
        if tx.send(response).is_err() {
            return; // Channel closed — app is shutting down.
        }
        ctx.request_repaint();
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    /// The single navigation state. Owned here and passed by value into
    /// render requests; input handlers mutate it only between frames.
    view: ViewportModel,

    tx_request: mpsc::Sender<RenderRequest>,
    rx_response: mpsc::Receiver<RenderResponse>,
    cancel: Arc<RenderCancel>,
    render_id: u64,
    needs_render: bool,
    needs_recolor: bool,

    texture: Option<egui::TextureHandle>,
    current_iterations: Option<IterationBuffer>,
    /// Pixels of the displayed frame plus the viewport they were rendered
    /// from, kept for export.
    last_frame: Option<(RenderBuffer, ViewportModel)>,
    /// Viewport of the frame currently held in `current_iterations`.
    frame_view: ViewportModel,
    render_time: Duration,
    panel_size: [u32; 2],

    palettes: Vec<Palette>,
    palette_index: usize,
    smooth_coloring: bool,
}

impl ExplorerApp {
    pub fn new(egui_ctx: &egui::Context) -> Self {
        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();
        let cancel = Arc::new(RenderCancel::new());

        let ctx = egui_ctx.clone();
        let cancel_clone = Arc::clone(&cancel);
        thread::spawn(move || {
            render_worker(ctx, rx_req, tx_resp, cancel_clone);
        });

        Self {
            view: ViewportModel::default(),
            tx_request: tx_req,
            rx_response: rx_resp,
            cancel,
            render_id: 0,
            needs_render: true,
            needs_recolor: false,
            texture: None,
            current_iterations: None,
            last_frame: None,
            frame_view: ViewportModel::default(),
            render_time: Duration::ZERO,
            panel_size: [0, 0],
            palettes: builtin_palettes(),
            palette_index: 0,
            smooth_coloring: true,
        }
    }

    fn color_params(&self, max_iterations: u32) -> ColorParams {
        ColorParams::for_budget(max_iterations, self.smooth_coloring)
    }

    /// Apply one input command to the model.
    fn apply_command(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::ZoomIn | ViewCommand::ZoomOut => {
                let factor = command.zoom_factor().unwrap_or(1.0);
                let center = self.view.center();
                if let Err(err) = self.view.zoom(factor, center.re, center.im) {
                    warn!(%err, "Zoom rejected");
                    return;
                }
                self.needs_render = true;
            }
            ViewCommand::Reset => {
                self.view.reset();
                self.needs_render = true;
            }
            ViewCommand::CyclePalette => {
                self.palette_index = (self.palette_index + 1) % self.palettes.len();
                // The iteration data is still valid; only the colors change.
                self.needs_recolor = true;
            }
            ViewCommand::ExportFrame => self.export_frame(),
        }
    }

    /// Write the most recently displayed frame as a PNG in the working
    /// directory.
    fn export_frame(&self) {
        let Some((buffer, frame_view)) = &self.last_frame else {
            warn!("No frame to export yet");
            return;
        };
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let path = PathBuf::from(format!("mandelzoom_{stamp}.png"));
        let metadata = ExportMetadata {
            x_min: frame_view.x_min,
            x_max: frame_view.x_max,
            y_min: frame_view.y_min,
            y_max: frame_view.y_max,
            max_iterations: frame_view.max_iterations,
            palette_name: self.palettes[self.palette_index].name.to_string(),
        };
        match export_png(buffer, &path, &metadata) {
            Ok(()) => info!(path = %path.display(), "Frame exported"),
            Err(err) => warn!(%err, "Export failed"),
        }
    }

    /// Submit a fresh snapshot of the model to the render worker.
    fn request_render(&mut self) {
        let [width, height] = self.panel_size;
        if width == 0 || height == 0 {
            return;
        }
        self.cancel.cancel(); // Abort any in-flight pass.
        self.render_id += 1;
        let request = RenderRequest {
            id: self.render_id,
            view: self.view,
            width,
            height,
        };
        if self.tx_request.send(request).is_err() {
            warn!("Render worker is gone");
        }
        self.needs_render = false;
    }

    /// Colorize the stored iteration data and upload it as the display
    /// texture.
    fn upload_frame(&mut self, ctx: &egui::Context) {
        let Some(iterations) = &self.current_iterations else {
            return;
        };
        let params = self.color_params(iterations.max_iterations);
        let buffer = self.palettes[self.palette_index].colorize(iterations, &params);

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [buffer.width as usize, buffer.height as usize],
            &buffer.pixels,
        );
        self.texture = Some(ctx.load_texture("frame", image, egui::TextureOptions::LINEAR));
        self.last_frame = Some((buffer, self.frame_view));
    }

    /// Pull finished frames from the worker and upload the newest one.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(response) = self.rx_response.try_recv() {
            if response.id != self.render_id {
                continue; // Stale frame from before the last input.
            }
            self.render_time = response.result.elapsed;
            self.frame_view = response.view;
            self.current_iterations = Some(response.result.iterations);
            self.upload_frame(ctx);
            self.needs_recolor = false;
        }
    }

    fn draw_hud(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("hud"))
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .show(ctx, |ui| {
                egui::Frame::popup(&ctx.style()).show(ui, |ui| {
                    ui.label(format!(
                        "x: [{:.6}, {:.6}]",
                        self.view.x_min, self.view.x_max
                    ));
                    ui.label(format!(
                        "y: [{:.6}, {:.6}]",
                        self.view.y_min, self.view.y_max
                    ));
                    ui.label(format!("iterations: {}", self.view.max_iterations));
                    ui.label(format!(
                        "palette: {}",
                        self.palettes[self.palette_index].name
                    ));
                    let (done, total) = self.cancel.progress();
                    if done < total {
                        ui.label(format!("rendering… {done}/{total} tiles"));
                    } else {
                        ui.label(format!("render: {} ms", self.render_time.as_millis()));
                    }
                    ui.separator();
                    ui.label("scroll: zoom   R: reset   P: palette   E: export");
                });
            });
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        // Input → state, strictly before dispatching the next pass.
        for command in input::collect(ctx) {
            self.apply_command(command);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                let avail = ui.available_size();
                let size = [avail.x.max(1.0) as u32, avail.y.max(1.0) as u32];
                if size != self.panel_size {
                    self.panel_size = size;
                    self.needs_render = true;
                }

                if let Some(texture) = &self.texture {
                    ui.add(egui::Image::new(texture).fit_to_exact_size(avail));
                } else {
                    ui.centered_and_justified(|ui| {
                        ui.label("Rendering…");
                    });
                }
            });

        self.draw_hud(ctx);

        if self.needs_recolor {
            self.upload_frame(ctx);
            self.needs_recolor = false;
        }
        if self.needs_render {
            self.request_render();
        }
    }
}
