//! sigye-rs: a talking analog clock for children learning to read time in
//! Korean.
//!
//! The formatting, duration and dial-geometry modules are pure; speech and
//! drawing sit behind the [`speech::Narrator`] and [`clock_face::Renderer`]
//! traits so they can be exercised without audio or a display.

pub mod clock_face;
pub mod config;
pub mod dial;
pub mod duration;
pub mod error;
pub mod korean;
pub mod notifier;
pub mod speech;
pub mod ticker;

#[cfg(feature = "gui")]
pub mod ui;
