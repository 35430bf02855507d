//! The clock window: controls on the left, the dial in the middle, time
//! calculations on the right.

use std::time::{Duration, Instant};

use egui::{Button, Color32, CursorIcon, RichText, Sense, TextEdit, Ui};
use tracing::debug;

use super::painter::EguiRenderer;
use crate::clock_face::{ClockFace, PointerCursor};
use crate::config::Config;
use crate::dial::{Dial, Point};
use crate::duration::{difference_now, TimeArg, TimeDifference};
use crate::error::SpeechError;
use crate::korean::{
    format_digital, format_korean, set_time_phrase, since_phrase, until_phrase, HourFormat,
};
use crate::speech::speaker::UNAVAILABLE_NOTICE;
use crate::speech::Speaker;
use crate::ticker::{ClockTicker, LocalClock, TickSchedule, TimeSource};

const PRIMARY: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
const ACCENT: Color32 = Color32::from_rgb(0xea, 0x58, 0x0c);
const SECONDARY: Color32 = Color32::from_rgb(0x05, 0x96, 0x69);
const WARNING: Color32 = Color32::from_rgb(0xdc, 0x26, 0x26);

const STATUS_TTL: Duration = Duration::from_secs(4);
/// How often to look for the end of narration while speaking.
const SPEECH_POLL: Duration = Duration::from_millis(100);
const MIN_DIAL: f32 = 240.0;
const MAX_DIAL: f32 = 520.0;

const INSTRUCTIONS: [(&str, &str, &str); 4] = [
    ("👆", "바늘 움직이기", "시침, 분침, 초침을 드래그해서 시간을 바꿔보세요"),
    ("🔊", "소리로 듣기", "버튼을 눌러 시간을 소리로 들어보세요"),
    ("⚙", "설정 바꾸기", "12시간과 24시간 중에 선택할 수 있어요"),
    ("🧮", "시간 계산", "남은 시간과 지난 시간을 계산해보세요"),
];

pub struct ClockApp {
    clock: LocalClock,
    ticker: ClockTicker,
    schedule: TickSchedule,
    face: ClockFace,
    speaker: Speaker,
    format: HourFormat,
    target_input: String,
    start_input: String,
    status: Option<(String, Instant)>,
}

impl ClockApp {
    pub fn new(config: &Config, speaker: Speaker) -> Self {
        let clock = LocalClock;
        let period = Duration::from_millis(config.display.tick_interval_ms.max(1));

        Self {
            ticker: ClockTicker::new(clock.now()),
            schedule: TickSchedule::new(period, Instant::now()),
            clock,
            face: ClockFace::new(),
            speaker,
            format: HourFormat::from_24_hour(config.display.use_24_hour),
            target_input: String::new(),
            start_input: String::new(),
            status: None,
        }
    }

    /// Advance the ticker: follow the speaking flag, then fire the
    /// once-per-period tick.
    fn advance(&mut self) {
        let now = self.clock.now();
        self.ticker.sync_speaking(self.speaker.is_speaking(), now);
        if self.schedule.due(Instant::now()) {
            self.ticker.tick(now);
        }

        if self
            .status
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() > STATUS_TTL)
        {
            self.status = None;
        }
    }

    fn say(&mut self, text: String) {
        if let Err(e) = self.speaker.speak(&text) {
            let message = match e {
                SpeechError::Unavailable(_) => UNAVAILABLE_NOTICE.to_string(),
                other => other.to_string(),
            };
            self.status = Some((message, Instant::now()));
        }
    }

    fn show_header(&self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("🕐 시계 배우기").size(40.0).strong());
            ui.label(
                RichText::new("재미있게 시간을 배워보아요!")
                    .size(20.0)
                    .weak(),
            );
            ui.add_space(8.0);
        });
    }

    fn show_controls(&mut self, ui: &mut Ui) {
        let speaking = self.speaker.is_speaking();

        card(ui, "🔊 음성 안내", |ui| {
            let label = if speaking { "말하는 중..." } else { "시간 말하기" };
            let button = Button::new(RichText::new(label).size(22.0).strong().color(Color32::WHITE))
                .fill(PRIMARY)
                .min_size(egui::vec2(ui.available_width(), 56.0));
            if ui.add_enabled(!speaking, button).clicked() {
                self.say(format_korean(&self.ticker.displayed(), self.format));
            }
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("버튼을 눌러 현재 시간을 들어보세요").weak());
            });
        });

        card(ui, "⏰ 시간 형식", |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.format, HourFormat::TwelveHour, RichText::new("12시간").size(18.0));
                ui.selectable_value(&mut self.format, HourFormat::TwentyFourHour, RichText::new("24시간").size(18.0));
            });
        });

        card(ui, "현재 시간", |ui| {
            let now = self.ticker.current();
            ui.label(
                RichText::new(format_digital(&now, self.format))
                    .size(30.0)
                    .strong()
                    .color(PRIMARY),
            );
            ui.label(RichText::new(format_korean(&now, self.format)).size(17.0).weak());

            if self.ticker.manual().is_some()
                && ui
                    .add(Button::new("🕐 현재 시각으로 돌아가기").min_size(egui::vec2(ui.available_width(), 32.0)))
                    .clicked()
            {
                debug!("Override cleared");
                self.ticker.clear_manual();
            }
        });

        if let Some((message, _)) = &self.status {
            ui.colored_label(WARNING, RichText::new(message).strong());
        }
    }

    fn show_calculations(&mut self, ui: &mut Ui) {
        let now = self.ticker.current();

        card(ui, "⏳ 남은 시간", |ui| {
            ui.add(TextEdit::singleline(&mut self.target_input).hint_text("목표 시간 (예: 15:30)"));
            let until = calculate(&self.target_input, |target| {
                difference_now(&TimeArg::Instant(now), &TimeArg::clock(target))
            });
            result_line(ui, until.as_ref(), "목표 시간을 설정하세요", ACCENT);
            if speak_button(ui, "🔊 남은 시간 듣기", until.is_some()) {
                if let Some(d) = until {
                    self.say(until_phrase(&d.description));
                }
            }
        });

        card(ui, "⌛ 지난 시간", |ui| {
            ui.add(TextEdit::singleline(&mut self.start_input).hint_text("시작 시간 (예: 09:00)"));
            let since = calculate(&self.start_input, |start| {
                difference_now(&TimeArg::clock(start), &TimeArg::Instant(now))
            });
            result_line(ui, since.as_ref(), "시작 시간을 설정하세요", SECONDARY);
            if speak_button(ui, "🔊 지난 시간 듣기", since.is_some()) {
                if let Some(d) = since {
                    self.say(since_phrase(&d.description));
                }
            }
        });

        card(ui, "✋ 시간 맞추기", |ui| {
            ui.vertical_centered(|ui| {
                ui.label("시계 바늘을 드래그해서\n시간을 바꿔보세요!");
            });
            let manual = self.ticker.manual();
            let shown = manual
                .map(|t| format_korean(&t, self.format))
                .unwrap_or_else(|| "현재 시간".to_string());
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(shown).size(18.0).strong().color(PRIMARY));
            });
            if speak_button(ui, "🔊 설정한 시간 듣기", manual.is_some()) {
                if let Some(t) = manual {
                    self.say(set_time_phrase(&format_korean(&t, self.format)));
                }
            }
        });
    }

    fn show_clock(&mut self, ui: &mut Ui) {
        let available = ui.available_size();
        let side = available.x.min(available.y).clamp(MIN_DIAL, MAX_DIAL);
        let (response, painter) = ui.allocate_painter(egui::vec2(side, side), Sense::click_and_drag());

        let rect = response.rect;
        let dial = Dial::fit(
            f64::from(rect.min.x),
            f64::from(rect.min.y),
            f64::from(rect.width()),
            f64::from(rect.height()),
        );
        let to_point = |p: egui::Pos2| Point::new(f64::from(p.x), f64::from(p.y));

        let signals = DragSignals {
            inside: response.contains_pointer(),
            // egui reports a drag only after the pointer has moved past a
            // small threshold, by which time it may have crossed into the
            // next band; the hand is picked where the button went down
            started_at: response
                .drag_started()
                .then(|| ui.input(|i| i.pointer.press_origin()))
                .flatten()
                .map(to_point),
            dragged_to: response
                .dragged()
                .then(|| response.interact_pointer_pos())
                .flatten()
                .map(to_point),
            stopped: response.drag_stopped(),
        };
        apply_drag(&mut self.face, &mut self.ticker, &dial, signals);

        match self.face.cursor(&dial, response.hover_pos().map(to_point)) {
            PointerCursor::Grab => ui.ctx().set_cursor_icon(CursorIcon::Grab),
            PointerCursor::Grabbing => ui.ctx().set_cursor_icon(CursorIcon::Grabbing),
            PointerCursor::Default => {}
        }

        let mut renderer = EguiRenderer::new(&painter);
        self.face.paint(
            &mut renderer,
            &dial,
            &self.ticker.displayed(),
            !self.speaker.is_speaking(),
        );
    }
}

impl eframe::App for ClockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && self.speaker.is_speaking() {
            debug!("Narration stopped by user");
            self.speaker.stop();
        }
        self.advance();

        egui::TopBottomPanel::top("header").show(ctx, |ui| self.show_header(ui));
        egui::TopBottomPanel::bottom("instructions").show(ctx, show_instructions);
        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_controls(ui));
            });
        egui::SidePanel::right("calculations")
            .resizable(false)
            .exact_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_calculations(ui));
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| self.show_clock(ui));
        });

        let wait = if self.speaker.is_speaking() {
            SPEECH_POLL
        } else {
            self.schedule.remaining(Instant::now())
        };
        ctx.request_repaint_after(wait.max(Duration::from_millis(16)));
    }
}

/// One frame's pointer activity on the dial.
#[derive(Debug, Clone, Copy, Default)]
struct DragSignals {
    inside: bool,
    started_at: Option<Point>,
    dragged_to: Option<Point>,
    stopped: bool,
}

/// Feed a frame's pointer activity to the face; drags become the override.
fn apply_drag(face: &mut ClockFace, ticker: &mut ClockTicker, dial: &Dial, signals: DragSignals) {
    if face.dragging().is_some() && !signals.inside {
        face.leave();
    }
    if let Some(origin) = signals.started_at {
        face.press(dial, origin);
    }
    if let Some(p) = signals.dragged_to {
        let displayed = ticker.displayed();
        if let Some(t) = face.drag_to(dial, p, &displayed) {
            ticker.set_manual(t);
        }
    }
    if signals.stopped {
        face.release();
    }
}

/// Difference for a text field, `None` while the field is empty.
fn calculate(
    input: &str,
    compute: impl FnOnce(&str) -> Option<TimeDifference>,
) -> Option<TimeDifference> {
    let input = input.trim();
    if input.is_empty() {
        None
    } else {
        compute(input)
    }
}

fn card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style())
        .corner_radius(12.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).size(24.0).strong());
            ui.add_space(8.0);
            add_contents(ui);
        });
    ui.add_space(12.0);
}

fn result_line(ui: &mut Ui, result: Option<&TimeDifference>, placeholder: &str, color: Color32) {
    let text = result.map_or(placeholder, |d| d.description.as_str());
    ui.label(RichText::new(text).size(18.0).strong().color(color));
}

fn speak_button(ui: &mut Ui, label: &str, enabled: bool) -> bool {
    let button = Button::new(RichText::new(label).strong()).min_size(egui::vec2(ui.available_width(), 36.0));
    ui.add_enabled(enabled, button).clicked()
}

fn show_instructions(ui: &mut Ui) {
    ui.add_space(8.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("📚 사용 방법").size(28.0).strong());
    });
    ui.columns(INSTRUCTIONS.len(), |columns| {
        for (column, (icon, title, body)) in columns.iter_mut().zip(INSTRUCTIONS) {
            column.vertical_centered(|ui| {
                ui.label(RichText::new(icon).size(32.0));
                ui.label(RichText::new(title).size(18.0).strong());
                ui.label(RichText::new(body).weak());
            });
        }
    });
    ui.add_space(8.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dial::Hand;
    use chrono::{NaiveDate, NaiveDateTime, Timelike};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 8)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    fn dial() -> Dial {
        Dial::fit(0.0, 0.0, 384.0, 384.0)
    }

    fn frame(signals: DragSignals) -> DragSignals {
        DragSignals {
            inside: true,
            ..signals
        }
    }

    #[test]
    fn drag_from_press_origin_sets_override() {
        let d = dial();
        let mut face = ClockFace::new();
        let mut ticker = ClockTicker::new(at(9, 10, 20));

        // pressed in the minute band, drag reported once already in the
        // second band
        let press = d.point_at(-90.0, d.radius * 0.75);
        let below = Point::new(d.center.x - 1.0, d.center.y + d.radius * 0.85);
        apply_drag(
            &mut face,
            &mut ticker,
            &d,
            frame(DragSignals {
                started_at: Some(press),
                dragged_to: Some(below),
                ..DragSignals::default()
            }),
        );
        assert_eq!(face.dragging(), Some(Hand::Minute));
        let manual = ticker.manual().unwrap();
        assert_eq!((manual.hour(), manual.minute(), manual.second()), (9, 30, 20));

        apply_drag(&mut face, &mut ticker, &d, frame(DragSignals { stopped: true, ..DragSignals::default() }));
        assert_eq!(face.dragging(), None);
        assert_eq!(ticker.displayed(), manual);
    }

    #[test]
    fn leaving_the_dial_ends_the_drag() {
        let d = dial();
        let mut face = ClockFace::new();
        let mut ticker = ClockTicker::new(at(9, 10, 20));

        apply_drag(
            &mut face,
            &mut ticker,
            &d,
            frame(DragSignals {
                started_at: Some(d.point_at(0.0, d.radius * 0.9)),
                ..DragSignals::default()
            }),
        );
        assert_eq!(face.dragging(), Some(Hand::Second));

        apply_drag(
            &mut face,
            &mut ticker,
            &d,
            DragSignals {
                inside: false,
                dragged_to: Some(d.point_at(90.0, d.radius * 1.2)),
                ..DragSignals::default()
            },
        );
        assert_eq!(face.dragging(), None);
        assert_eq!(ticker.manual(), None);
    }
}
