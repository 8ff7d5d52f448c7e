mod app;
mod input;

use eframe::egui;
use tracing::info;

use app::ExplorerApp;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting MandelZoom");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MandelZoom")
            .with_inner_size([800.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "MandelZoom",
        options,
        Box::new(|cc| Ok(Box::new(ExplorerApp::new(&cc.egui_ctx)))),
    )
}
