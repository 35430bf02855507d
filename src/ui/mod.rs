//! Desktop window (eframe/egui).

mod app;
mod fonts;
mod painter;

pub use app::ClockApp;
pub use painter::EguiRenderer;

use tracing::info;

use crate::config::Config;
use crate::speech::Speaker;

/// Open the clock window and block until it is closed.
pub fn run(config: Config, speaker: Speaker) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("시계 배우기")
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([960.0, 640.0]),
        ..Default::default()
    };

    info!("Opening clock window");
    eframe::run_native(
        "sigye-rs",
        options,
        Box::new(move |cc| {
            fonts::install_hangul_font(&cc.egui_ctx, config.display.font_path.as_deref());
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(ClockApp::new(&config, speaker)))
        }),
    )
}
