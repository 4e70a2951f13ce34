//! RestoLens entry point.

use eframe::egui;
use resto_lens::gui::RestoLensApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("RestoLens"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "RestoLens",
        options,
        Box::new(|cc| Ok(Box::new(RestoLensApp::new(cc)))),
    )
}
