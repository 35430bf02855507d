//! Dial geometry: hand angles, band hit-testing and angle-to-time inversion.
//!
//! Angles are in degrees in screen space (y grows downward), with the usual
//! -90° offset so that 0 on the clock sits at 12 o'clock.

use chrono::{NaiveDateTime, Timelike};

/// Gap between the dial rim and the edge of the drawing area.
pub const RIM_MARGIN: f64 = 10.0;

/// Hand lengths as a fraction of the dial radius. These double as the outer
/// edges of the drag bands.
pub const HOUR_HAND: f64 = 0.5;
pub const MINUTE_HAND: f64 = 0.7;
pub const SECOND_HAND: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Hour,
    Minute,
    Second,
}

impl Hand {
    pub fn length(self) -> f64 {
        match self {
            Self::Hour => HOUR_HAND,
            Self::Minute => MINUTE_HAND,
            Self::Second => SECOND_HAND,
        }
    }

    /// Current angle of this hand for `time`.
    ///
    /// The hour hand creeps half a degree per minute; minute and second
    /// hands jump in whole 6° steps.
    pub fn angle(self, time: &NaiveDateTime) -> f64 {
        match self {
            Self::Hour => {
                f64::from(time.hour() % 12) * 30.0 + f64::from(time.minute()) * 0.5 - 90.0
            }
            Self::Minute => f64::from(time.minute()) * 6.0 - 90.0,
            Self::Second => f64::from(time.second()) * 6.0 - 90.0,
        }
    }

    /// Write the component this hand controls, taken from a pointer angle,
    /// into a copy of `time`.
    ///
    /// The hour keeps the current 오전/오후 half. All other fields are left
    /// as they were.
    pub fn set_from_angle(self, time: &NaiveDateTime, angle: f64) -> NaiveDateTime {
        let turned = angle + 90.0;
        let updated = match self {
            Self::Hour => {
                let hour = step(turned, 30.0, 12);
                let pm = time.hour() >= 12;
                time.with_hour(if pm { hour + 12 } else { hour })
            }
            Self::Minute => time.with_minute(step(turned, 6.0, 60)),
            Self::Second => time.with_second(step(turned, 6.0, 60)),
        };
        updated.unwrap_or(*time)
    }
}

/// floor(value / size) wrapped into 0..count.
fn step(value: f64, size: f64, count: i64) -> u32 {
    ((value / size).floor() as i64).rem_euclid(count) as u32
}

/// A clock dial placed in some drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dial {
    pub center: Point,
    pub radius: f64,
}

impl Dial {
    /// Largest dial that fits the given area, inset by [`RIM_MARGIN`].
    pub fn fit(left: f64, top: f64, width: f64, height: f64) -> Self {
        let (half_w, half_h) = (width / 2.0, height / 2.0);
        Self {
            center: Point::new(left + half_w, top + half_h),
            radius: (half_w.min(half_h) - RIM_MARGIN).max(0.0),
        }
    }

    /// Point at `distance` from the center along `angle` degrees.
    pub fn point_at(&self, angle: f64, distance: f64) -> Point {
        let rad = angle.to_radians();
        Point::new(
            self.center.x + distance * rad.cos(),
            self.center.y + distance * rad.sin(),
        )
    }

    /// Pointer angle around the center, `atan2` in degrees.
    pub fn angle_of(&self, p: Point) -> f64 {
        (p.y - self.center.y).atan2(p.x - self.center.x).to_degrees()
    }

    /// Which hand a press at `p` grabs.
    ///
    /// This is coarse banding by distance, not a hit test on the hand
    /// strokes: beyond 0.8r is the second hand, beyond 0.7r the minute hand,
    /// beyond 0.5r the hour hand and the middle is dead.
    pub fn hand_at(&self, p: Point) -> Option<Hand> {
        let distance = (p.x - self.center.x).hypot(p.y - self.center.y);
        if distance > self.radius * SECOND_HAND {
            Some(Hand::Second)
        } else if distance > self.radius * MINUTE_HAND {
            Some(Hand::Minute)
        } else if distance > self.radius * HOUR_HAND {
            Some(Hand::Hour)
        } else {
            None
        }
    }

    /// Tip of `hand` when showing `time`.
    pub fn hand_tip(&self, hand: Hand, time: &NaiveDateTime) -> Point {
        self.point_at(hand.angle(time), self.radius * hand.length())
    }
}
