//! Analog clock face: drawing through a [`Renderer`] and the drag-to-set
//! interaction.
//!
//! The face owns nothing but the hand currently being dragged. Time comes in
//! as an argument and edits go out as return values, so the caller decides
//! where the override lives.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::dial::{Dial, Hand, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const FACE: Rgb = Rgb(0xff, 0xff, 0xff);
pub const RIM: Rgb = Rgb(0xe2, 0xe8, 0xf0);
pub const INK: Rgb = Rgb(0x33, 0x41, 0x55);
pub const MINUTE_MARK: Rgb = Rgb(0x64, 0x74, 0x8b);
pub const HOUR_HAND: Rgb = Rgb(0x3b, 0x82, 0xf6);
pub const MINUTE_HAND: Rgb = Rgb(0x05, 0x96, 0x69);
pub const SECOND_HAND: Rgb = Rgb(0xea, 0x58, 0x0c);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Rgb,
}

impl Stroke {
    pub const fn new(width: f64, color: Rgb) -> Self {
        Self { width, color }
    }
}

/// Immediate-mode 2D drawing surface.
pub trait Renderer {
    fn circle(&mut self, center: Point, radius: f64, fill: Option<Rgb>, stroke: Option<Stroke>);
    /// Straight stroke with round ends.
    fn line(&mut self, from: Point, to: Point, stroke: Stroke);
    /// Text centered on `at`.
    fn text(&mut self, at: Point, text: &str, size: f64, color: Rgb);
}

const NUMERALS: [&str; 12] = ["12", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"];
const HOUR_MARK_LEN: f64 = 30.0;
const MINUTE_MARK_LEN: f64 = 15.0;
const NUMERAL_INSET: f64 = 50.0;
const NUMERAL_SIZE: f64 = 32.0;
const CENTER_DOT: f64 = 10.0;

/// Pointer feedback for the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCursor {
    Default,
    Grab,
    Grabbing,
}

#[derive(Debug, Default)]
pub struct ClockFace {
    dragging: Option<Hand>,
}

impl ClockFace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<Hand> {
        self.dragging
    }

    /// Draw the whole face showing `time`. The second hand is skipped when
    /// `show_second` is false (during narration).
    pub fn paint(&self, r: &mut impl Renderer, dial: &Dial, time: &NaiveDateTime, show_second: bool) {
        let radius = dial.radius;

        r.circle(dial.center, radius, Some(FACE), Some(Stroke::new(6.0, RIM)));

        for i in 0..60u32 {
            let angle = f64::from(i * 6) - 90.0;
            let (len, stroke) = if i % 5 == 0 {
                (HOUR_MARK_LEN, Stroke::new(6.0, INK))
            } else {
                (MINUTE_MARK_LEN, Stroke::new(2.0, MINUTE_MARK))
            };
            r.line(dial.point_at(angle, radius - len), dial.point_at(angle, radius), stroke);
        }

        for (i, label) in NUMERALS.iter().enumerate() {
            let angle = i as f64 * 30.0 - 90.0;
            r.text(dial.point_at(angle, radius - NUMERAL_INSET), label, NUMERAL_SIZE, INK);
        }

        r.line(dial.center, dial.hand_tip(Hand::Hour, time), Stroke::new(8.0, HOUR_HAND));
        r.line(dial.center, dial.hand_tip(Hand::Minute, time), Stroke::new(6.0, MINUTE_HAND));
        if show_second {
            r.line(dial.center, dial.hand_tip(Hand::Second, time), Stroke::new(2.0, SECOND_HAND));
        }

        r.circle(dial.center, CENTER_DOT, Some(INK), Some(Stroke::new(4.0, FACE)));
    }

    /// Pointer pressed at `p`. Returns true when a hand was grabbed.
    pub fn press(&mut self, dial: &Dial, p: Point) -> bool {
        self.dragging = dial.hand_at(p);
        if let Some(hand) = self.dragging {
            debug!("Dragging {hand:?} hand");
        }
        self.dragging.is_some()
    }

    /// Pointer moved to `p`. While dragging, returns `displayed` with the
    /// dragged hand's component replaced.
    pub fn drag_to(&mut self, dial: &Dial, p: Point, displayed: &NaiveDateTime) -> Option<NaiveDateTime> {
        let hand = self.dragging?;
        Some(hand.set_from_angle(displayed, dial.angle_of(p)))
    }

    pub fn release(&mut self) {
        self.dragging = None;
    }

    /// Pointer left the surface; ends any drag like a release.
    pub fn leave(&mut self) {
        self.release();
    }

    pub fn cursor(&self, dial: &Dial, hover: Option<Point>) -> PointerCursor {
        if self.dragging.is_some() {
            PointerCursor::Grabbing
        } else if hover.and_then(|p| dial.hand_at(p)).is_some() {
            PointerCursor::Grab
        } else {
            PointerCursor::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[derive(Default)]
    struct Recorder {
        circles: usize,
        lines: Vec<(Point, Point, Stroke)>,
        texts: Vec<(Point, String)>,
    }

    impl Renderer for Recorder {
        fn circle(&mut self, _: Point, _: f64, _: Option<Rgb>, _: Option<Stroke>) {
            self.circles += 1;
        }

        fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
            self.lines.push((from, to, stroke));
        }

        fn text(&mut self, at: Point, text: &str, _: f64, _: Rgb) {
            self.texts.push((at, text.to_string()));
        }
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    fn dial() -> Dial {
        Dial::fit(0.0, 0.0, 384.0, 384.0)
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn paints_marks_numerals_and_hands() {
        let mut r = Recorder::default();
        ClockFace::new().paint(&mut r, &dial(), &at(3, 0, 0), true);

        let hour_marks = r.lines.iter().filter(|(_, _, s)| s.color == INK).count();
        let minute_marks = r.lines.iter().filter(|(_, _, s)| s.color == MINUTE_MARK).count();
        assert_eq!(hour_marks, 12);
        assert_eq!(minute_marks, 48);
        assert_eq!(r.lines.len(), 12 + 48 + 3);
        assert_eq!(r.circles, 2);

        let labels: Vec<_> = r.texts.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(labels, NUMERALS);
        let d = dial();
        assert!(close(r.texts[0].0, Point::new(d.center.x, d.center.y - (d.radius - 50.0))));
    }

    #[test]
    fn hour_hand_points_at_three() {
        let mut r = Recorder::default();
        let d = dial();
        ClockFace::new().paint(&mut r, &d, &at(15, 0, 0), true);
        let (_, tip, _) = r
            .lines
            .iter()
            .find(|(_, _, s)| s.color == HOUR_HAND)
            .copied()
            .unwrap();
        assert!(close(tip, Point::new(d.center.x + d.radius * 0.5, d.center.y)));
    }

    #[test]
    fn second_hand_hidden_while_speaking() {
        let mut r = Recorder::default();
        ClockFace::new().paint(&mut r, &dial(), &at(3, 0, 0), false);
        assert!(r.lines.iter().all(|(_, _, s)| s.color != SECOND_HAND));
        assert_eq!(r.lines.len(), 12 + 48 + 2);
    }

    #[test]
    fn drag_sets_minute_and_release_ends_it() {
        let d = dial();
        let mut face = ClockFace::new();
        let shown = at(9, 10, 20);

        assert!(face.press(&d, d.point_at(-90.0, d.radius * 0.75)));
        assert_eq!(face.dragging(), Some(Hand::Minute));

        // drag to just past 6 o'clock: half past
        let below = Point::new(d.center.x - 1.0, d.center.y + 50.0);
        let t = face.drag_to(&d, below, &shown).unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (9, 30, 20));

        face.release();
        assert_eq!(face.drag_to(&d, d.point_at(0.0, 50.0), &shown), None);
    }

    #[test]
    fn press_in_dead_zone_grabs_nothing() {
        let d = dial();
        let mut face = ClockFace::new();
        assert!(!face.press(&d, d.point_at(0.0, d.radius * 0.45)));
        assert_eq!(face.drag_to(&d, d.point_at(0.0, 80.0), &at(1, 2, 3)), None);
    }

    #[test]
    fn leaving_ends_drag() {
        let d = dial();
        let mut face = ClockFace::new();
        face.press(&d, d.point_at(0.0, d.radius * 0.9));
        assert_eq!(face.cursor(&d, None), PointerCursor::Grabbing);
        face.leave();
        assert_eq!(face.dragging(), None);
        assert_eq!(face.cursor(&d, Some(d.point_at(0.0, d.radius * 0.9))), PointerCursor::Grab);
        assert_eq!(face.cursor(&d, Some(d.center)), PointerCursor::Default);
    }
}
