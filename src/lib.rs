//! Synthesize mouse input through the operating system's injection API.
//!
//! The crate has two halves:
//!
//! * The encoder ([`Injector`] together with [`InputEvent`] and [`RawInput`])
//!   turns semantic requests like "press the back button" or "scroll one notch"
//!   into the fixed-layout records `SendInput` expects and hands them to an
//!   [`InputSink`].
//! * The [`MotionController`] runs a background worker that keeps emitting
//!   relative motion while a displacement is held, optionally ramping the
//!   speed up over time.
//!
//! ```no_run
//! # #[cfg(target_os = "windows")]
//! # fn main() -> mouse_inject::InputResult<()> {
//! use mouse_inject::{Button, Direction, Injector, Mouse, MotionController, Settings};
//!
//! let settings = Settings::default();
//! let mut injector = Injector::native(&settings)?;
//! injector.button(Button::Left, Direction::Click)?;
//!
//! let controller = MotionController::new(injector, &settings);
//! controller.start();
//! controller.set_delta(4, 0);
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "windows"))]
//! # fn main() {}
//! ```

use std::{fmt, str::FromStr, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(test)]
use strum_macros::EnumIter;

mod agent;
pub mod event;
mod injector;
mod motion;
mod platform;
pub mod sink;

#[cfg(target_os = "windows")]
mod win;

pub use agent::{Agent, Token};
pub use event::{ENVELOPE_SIZE, InputEvent, KeybdInput, MouseInput, RawInput};
pub use injector::Injector;
pub use motion::{MotionController, accelerated_delta};
pub use platform::NativeSink;
pub use sink::{InputSink, RecordingSink};
#[cfg(target_os = "windows")]
pub use win::SendInputSink;

#[cfg(test)]
mod tests;

/// Logical mouse buttons the injector knows how to press and release.
///
/// Back and Forward are the two extended buttons. Windows injects both with
/// the same flag pair and tells them apart through the record's data word.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(test, derive(EnumIter))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    #[cfg_attr(feature = "serde", serde(alias = "L"))]
    #[cfg_attr(feature = "serde", serde(alias = "l"))]
    Left,
    #[cfg_attr(feature = "serde", serde(alias = "R"))]
    #[cfg_attr(feature = "serde", serde(alias = "r"))]
    Right,
    #[cfg_attr(feature = "serde", serde(alias = "M"))]
    #[cfg_attr(feature = "serde", serde(alias = "m"))]
    Middle,
    /// First extended button (`XBUTTON1`)
    Back,
    /// Second extended button (`XBUTTON2`)
    Forward,
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Button::Left => "left",
            Button::Right => "right",
            Button::Middle => "middle",
            Button::Back => "back",
            Button::Forward => "forward",
        };
        f.write_str(name)
    }
}

impl FromStr for Button {
    type Err = InputError;

    /// Parse a button name as it appears in a mapping file. Matching is case
    /// insensitive and ignores surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Button::Left),
            "right" | "r" => Ok(Button::Right),
            "middle" | "m" => Ok(Button::Middle),
            "back" | "x1" | "xbutton1" => Ok(Button::Back),
            "forward" | "x2" | "xbutton2" => Ok(Button::Forward),
            _ => Err(InputError::UnsupportedButton(s.to_string())),
        }
    }
}

/// The direction of a button action
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    #[cfg_attr(feature = "serde", serde(alias = "P"))]
    #[cfg_attr(feature = "serde", serde(alias = "p"))]
    #[cfg_attr(feature = "serde", serde(alias = "Pressed"))]
    #[cfg_attr(feature = "serde", serde(alias = "pressed"))]
    Press,
    #[cfg_attr(feature = "serde", serde(alias = "R"))]
    #[cfg_attr(feature = "serde", serde(alias = "r"))]
    #[cfg_attr(feature = "serde", serde(alias = "Released"))]
    #[cfg_attr(feature = "serde", serde(alias = "released"))]
    Release,
    /// Equivalent to a press followed by a release, submitted as one batch
    #[cfg_attr(feature = "serde", serde(alias = "C"))]
    #[cfg_attr(feature = "serde", serde(alias = "c"))]
    #[cfg_attr(feature = "serde", serde(alias = "Clicked"))]
    #[cfg_attr(feature = "serde", serde(alias = "clicked"))]
    #[default]
    Click,
}

/// Specifies the axis for scrolling
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    #[cfg_attr(feature = "serde", serde(alias = "H"))]
    #[cfg_attr(feature = "serde", serde(alias = "h"))]
    Horizontal,
    #[cfg_attr(feature = "serde", serde(alias = "V"))]
    #[cfg_attr(feature = "serde", serde(alias = "v"))]
    #[default]
    Vertical,
}

/// Error when simulating input
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The requested button is not one of left, right, middle, back or
    /// forward. No event was emitted.
    #[error("the mouse button {0:?} is not supported")]
    UnsupportedButton(String),
    /// The sink accepted fewer records than were submitted. Nothing is
    /// retried.
    #[error("only {accepted} of {submitted} input events were accepted. they may have been blocked by UIPI")]
    InjectionFailed { submitted: u32, accepted: u32 },
    /// The input you want to simulate is invalid
    #[error("provided input was invalid: {0}")]
    InvalidInput(&'static str),
    /// There is no injection facility for this platform
    #[error("not supported: {0}")]
    Unsupported(&'static str),
}

pub type InputResult<T> = Result<T, InputError>;

/// Settings shared by the [`Injector`] and the [`MotionController`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Time the motion worker idles between two ticks. The default is 10 ms.
    pub tick_interval: Duration,
    /// Initial ramp rate of the motion controller in units per second. Zero
    /// disables acceleration.
    pub acceleration: f64,
    /// Upper bound of the displacement per tick while accelerating
    pub max_speed: u32,
    /// Release buttons that are still held when the [`Injector`] is dropped
    pub release_buttons_when_dropped: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(10),
            acceleration: 0.0,
            max_speed: 0,
            release_buttons_when_dropped: true,
        }
    }
}

/// Contains functions to simulate mouse input
pub trait Mouse {
    /// Press, release or click a mouse button
    ///
    /// # Errors
    /// Returns [`InputError::InjectionFailed`] if the sink did not accept
    /// every event
    fn button(&mut self, button: Button, direction: Direction) -> InputResult<()>;

    /// Move the pointer by `dx`, `dy` relative to its current position. The
    /// operating system clamps the result to the screen.
    ///
    /// # Errors
    /// Returns [`InputError::InjectionFailed`] if the sink did not accept
    /// the event
    fn move_relative(&mut self, dx: i32, dy: i32) -> InputResult<()>;

    /// Scroll by `length` notches along `axis`. On the vertical axis a
    /// positive length scrolls down, on the horizontal axis it scrolls right.
    ///
    /// # Errors
    /// Returns [`InputError::InvalidInput`] if the resulting wheel delta does
    /// not fit into an `i32` and [`InputError::InjectionFailed`] if the sink
    /// did not accept the event
    fn scroll(&mut self, length: i32, axis: Axis) -> InputResult<()>;

    /// Press `button` without releasing it
    ///
    /// # Errors
    /// Same as [`Mouse::button`]
    fn press_button(&mut self, button: Button) -> InputResult<()> {
        self.button(button, Direction::Press)
    }

    /// Release a previously pressed `button`
    ///
    /// # Errors
    /// Same as [`Mouse::button`]
    fn release_button(&mut self, button: Button) -> InputResult<()> {
        self.button(button, Direction::Release)
    }

    /// Turn the vertical wheel by `notches`
    ///
    /// # Errors
    /// Same as [`Mouse::scroll`]
    fn scroll_wheel(&mut self, notches: i32) -> InputResult<()> {
        self.scroll(notches, Axis::Vertical)
    }
}
