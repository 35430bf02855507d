//! Korean renderings of clock readings.
//!
//! Hours are read with native Korean counting words (한 시, 두 시, ...),
//! while minutes and seconds use Sino-Korean numerals (삼십 분, 오 초).

use chrono::{NaiveDateTime, Timelike};

const ONES: [&str; 10] = ["", "일", "이", "삼", "사", "오", "육", "칠", "팔", "구"];
const TENS: [&str; 6] = ["", "십", "이십", "삼십", "사십", "오십"];

/// Native Korean hour words, index 0 is hour 1.
const HOUR_WORDS: [&str; 24] = [
    "한", "두", "세", "네", "다섯", "여섯", "일곱", "여덟", "아홉", "열", "열한", "열두", "열세",
    "열네", "열다섯", "열여섯", "열일곱", "열여덟", "열아홉", "스무", "스물한", "스물두", "스물세",
    "스물네",
];

/// 12-hour (오전/오후) or 24-hour clock display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourFormat {
    #[default]
    TwelveHour,
    TwentyFourHour,
}

impl HourFormat {
    pub fn from_24_hour(use_24_hour: bool) -> Self {
        if use_24_hour {
            Self::TwentyFourHour
        } else {
            Self::TwelveHour
        }
    }

    pub fn is_24_hour(self) -> bool {
        self == Self::TwentyFourHour
    }

    /// Hour as shown to the user: 1-12 in 12-hour mode, 0-23 otherwise.
    pub fn display_hour(self, hour: u32) -> u32 {
        match self {
            Self::TwentyFourHour => hour,
            Self::TwelveHour => match hour % 12 {
                0 => 12,
                h => h,
            },
        }
    }

    /// 오전/오후 marker, absent in 24-hour mode.
    pub fn period(self, hour: u32) -> Option<&'static str> {
        match self {
            Self::TwentyFourHour => None,
            Self::TwelveHour if hour >= 12 => Some("오후"),
            Self::TwelveHour => Some("오전"),
        }
    }
}

/// Sino-Korean numeral for minutes and seconds.
///
/// Values of 60 and above have no table entry and come back as digits.
pub fn korean_number(n: u32) -> String {
    match n {
        0 => "영".to_string(),
        1..=9 => ONES[n as usize].to_string(),
        10..=59 => format!("{}{}", TENS[(n / 10) as usize], ONES[(n % 10) as usize]),
        _ => n.to_string(),
    }
}

/// Native Korean counting word used before "시".
///
/// Covers 1 through 24; anything else (including 0) falls back to digits.
pub fn hour_ordinal(n: u32) -> String {
    match n {
        1..=24 => HOUR_WORDS[(n - 1) as usize].to_string(),
        _ => n.to_string(),
    }
}

/// Spoken form, e.g. "오후 세 시 이십오 분 영 초".
pub fn format_korean(time: &NaiveDateTime, format: HourFormat) -> String {
    let hour = time.hour();
    let period = format.period(hour).map(|p| format!("{p} ")).unwrap_or_default();

    format!(
        "{period}{} 시 {} 분 {} 초",
        hour_ordinal(format.display_hour(hour)),
        korean_number(time.minute()),
        korean_number(time.second()),
    )
}

/// Digital readout, "15:25:00" or "오후 3:25:00".
pub fn format_digital(time: &NaiveDateTime, format: HourFormat) -> String {
    let hour = time.hour();
    let (minute, second) = (time.minute(), time.second());

    match format.period(hour) {
        None => format!("{hour:02}:{minute:02}:{second:02}"),
        Some(period) => format!(
            "{period} {}:{minute:02}:{second:02}",
            format.display_hour(hour)
        ),
    }
}

/// Narration for the "set time" card.
pub fn set_time_phrase(spoken: &str) -> String {
    format!("설정한 시간은 {spoken}입니다")
}

/// Narration for the countdown card.
pub fn until_phrase(description: &str) -> String {
    format!("목표 시간까지 {description}")
}

/// Narration for the elapsed-time card.
pub fn since_phrase(description: &str) -> String {
    format!("시작 시간부터 {description}")
}
