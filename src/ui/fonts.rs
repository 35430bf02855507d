//! Hangul font loading. egui's bundled fonts have no Korean glyphs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::{FontData, FontDefinitions, FontFamily};
use tracing::{info, warn};

const FONT_NAME: &str = "hangul";

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/nanum/NanumGothic.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "C:\\Windows\\Fonts\\malgun.ttf",
];

fn locate(configured: Option<&Path>) -> Option<PathBuf> {
    configured.map(PathBuf::from).or_else(|| {
        CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    })
}

/// Add a Hangul-capable font as a fallback for every family.
pub fn install_hangul_font(ctx: &egui::Context, configured: Option<&Path>) {
    let Some(path) = locate(configured) else {
        warn!("No Hangul font found, Korean text will not render; set display.font_path");
        return;
    };

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read font {}: {e}", path.display());
            return;
        }
    };

    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(FONT_NAME.to_owned(), Arc::new(FontData::from_owned(bytes)));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(FONT_NAME.to_owned());
    }
    ctx.set_fonts(fonts);
    info!("Loaded Hangul font from {}", path.display());
}
