use crate::{Axis, Button, Direction, InputResult, Mouse};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One stored mouse action, as a mapping layer would keep it in its
/// configuration
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Call the [`Mouse::button`] fn with the given mouse button and direction
    #[cfg_attr(feature = "serde", serde(alias = "B"))]
    #[cfg_attr(feature = "serde", serde(alias = "b"))]
    Button(
        Button,
        #[cfg_attr(feature = "serde", serde(default))] Direction,
    ),
    /// Call the [`Mouse::move_relative`] fn. The first i32 is the value to
    /// move on the x-axis and the second i32 is the value to move on the
    /// y-axis.
    #[cfg_attr(feature = "serde", serde(alias = "M"))]
    #[cfg_attr(feature = "serde", serde(alias = "m"))]
    MoveRelative(i32, i32),
    /// Call the [`Mouse::scroll`] fn.
    #[cfg_attr(feature = "serde", serde(alias = "S"))]
    #[cfg_attr(feature = "serde", serde(alias = "s"))]
    Scroll(i32, #[cfg_attr(feature = "serde", serde(default))] Axis),
}

pub trait Agent
where
    Self: Mouse,
{
    /// Execute the action associated with the token. A [`Token::Scroll`]
    /// will scroll, a [`Token::Button`] will press or release and so forth.
    ///
    /// # Errors
    ///
    /// Same as the individual functions. Have a look at [`InputResult`] for a
    /// list of possible errors
    fn execute(&mut self, token: &Token) -> InputResult<()> {
        match token {
            Token::Button(button, direction) => self.button(*button, *direction),
            Token::MoveRelative(dx, dy) => self.move_relative(*dx, *dy),
            Token::Scroll(length, axis) => self.scroll(*length, *axis),
        }
    }
}

impl<M: Mouse> Agent for M {}
