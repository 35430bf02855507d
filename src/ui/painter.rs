//! [`Renderer`] on top of an egui painter.

use egui::{Align2, Color32, FontId, Painter, Pos2};

use crate::clock_face::{Renderer, Rgb, Stroke};
use crate::dial::Point;

pub struct EguiRenderer<'a> {
    painter: &'a Painter,
}

impl<'a> EguiRenderer<'a> {
    pub fn new(painter: &'a Painter) -> Self {
        Self { painter }
    }
}

fn pos(p: Point) -> Pos2 {
    Pos2::new(p.x as f32, p.y as f32)
}

fn color(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

fn stroke(s: Stroke) -> egui::Stroke {
    egui::Stroke::new(s.width as f32, color(s.color))
}

impl Renderer for EguiRenderer<'_> {
    fn circle(&mut self, center: Point, radius: f64, fill: Option<Rgb>, outline: Option<Stroke>) {
        self.painter.circle(
            pos(center),
            radius as f32,
            fill.map(color).unwrap_or(Color32::TRANSPARENT),
            outline.map(stroke).unwrap_or(egui::Stroke::NONE),
        );
    }

    fn line(&mut self, from: Point, to: Point, s: Stroke) {
        let (from, to) = (pos(from), pos(to));
        self.painter.line_segment([from, to], stroke(s));
        // egui strokes have butt ends; cap them
        let cap = s.width as f32 / 2.0;
        self.painter.circle_filled(from, cap, color(s.color));
        self.painter.circle_filled(to, cap, color(s.color));
    }

    fn text(&mut self, at: Point, text: &str, size: f64, c: Rgb) {
        self.painter.text(
            pos(at),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(size as f32),
            color(c),
        );
    }
}
