//! Input events and the fixed-layout records the injection API consumes.
//!
//! An [`InputEvent`] describes what should happen. [`InputEvent::to_raw`]
//! lowers it into a [`RawInput`], which mirrors the Win32 `INPUT` structure
//! field for field. [`RawInput::to_bytes`] produces that structure's exact
//! in-memory layout for the pointer width of the target.
//!
//! Flag values follow
//! <https://learn.microsoft.com/en-us/windows/win32/api/winuser/ns-winuser-mouseinput>

use std::mem::size_of;

use crate::{Axis, Button, InputError, InputResult};

/// Wheel movement of one notch
pub const WHEEL_DELTA: i32 = 120;

/// Data word of an `XDOWN`/`XUP` record for the first extended button
pub const XBUTTON1: u32 = 0x0001;
/// Data word of an `XDOWN`/`XUP` record for the second extended button
pub const XBUTTON2: u32 = 0x0002;

/// Type discriminator of a mouse record
pub const INPUT_MOUSE: u32 = 0;
/// Type discriminator of a keyboard record
pub const INPUT_KEYBOARD: u32 = 1;

pub const MOUSEEVENTF_MOVE: u32 = 0x0001;
pub const MOUSEEVENTF_LEFTDOWN: u32 = 0x0002;
pub const MOUSEEVENTF_LEFTUP: u32 = 0x0004;
pub const MOUSEEVENTF_RIGHTDOWN: u32 = 0x0008;
pub const MOUSEEVENTF_RIGHTUP: u32 = 0x0010;
pub const MOUSEEVENTF_MIDDLEDOWN: u32 = 0x0020;
pub const MOUSEEVENTF_MIDDLEUP: u32 = 0x0040;
pub const MOUSEEVENTF_XDOWN: u32 = 0x0080;
pub const MOUSEEVENTF_XUP: u32 = 0x0100;
pub const MOUSEEVENTF_WHEEL: u32 = 0x0800;
pub const MOUSEEVENTF_HWHEEL: u32 = 0x1000;
pub const MOUSEEVENTF_MOVE_NOCOALESCE: u32 = 0x2000;
pub const MOUSEEVENTF_VIRTUALDESK: u32 = 0x4000;
pub const MOUSEEVENTF_ABSOLUTE: u32 = 0x8000;

const PTR: usize = size_of::<usize>();

const fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

// dx, dy, mouseData, dwFlags, time, then the pointer sized dwExtraInfo
const MOUSE_EXTRA_OFFSET: usize = align_up(5 * 4, PTR);
const MOUSE_SIZE: usize = MOUSE_EXTRA_OFFSET + PTR;
// wVk, wScan, dwFlags, time, then dwExtraInfo
const KEYBD_EXTRA_OFFSET: usize = align_up(2 * 2 + 2 * 4, PTR);
const KEYBD_SIZE: usize = KEYBD_EXTRA_OFFSET + PTR;
const UNION_OFFSET: usize = align_up(4, PTR);
const UNION_SIZE: usize = if MOUSE_SIZE > KEYBD_SIZE {
    MOUSE_SIZE
} else {
    KEYBD_SIZE
};

/// Size in bytes of one `INPUT` record: 40 on 64 bit targets, 28 on 32 bit
/// targets
pub const ENVELOPE_SIZE: usize = align_up(UNION_OFFSET + UNION_SIZE, PTR);

/// A single input event to inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Relative pointer motion
    MouseMove { dx: i32, dy: i32 },
    MouseButtonDown(Button),
    MouseButtonUp(Button),
    /// Wheel rotation, already scaled to wheel units
    MouseWheel { delta: i32, axis: Axis },
    /// A keyboard record. Only carried so keyboard input can share the same
    /// envelope, the crate does not synthesize keys itself.
    KeyboardKey { vk: u16, scan: u16, flags: u32 },
}

impl InputEvent {
    /// Scroll event for `notches` wheel notches along `axis`
    ///
    /// A positive number of notches on the vertical axis scrolls down, which
    /// the API expresses as a negative wheel delta. The horizontal axis is
    /// not inverted.
    ///
    /// # Errors
    /// Returns [`InputError::InvalidInput`] if the delta overflows an `i32`
    pub fn wheel(notches: i32, axis: Axis) -> InputResult<Self> {
        let scaled = notches.checked_mul(WHEEL_DELTA);
        let delta = match axis {
            Axis::Vertical => scaled.and_then(i32::checked_neg),
            Axis::Horizontal => scaled,
        };
        delta
            .map(|delta| InputEvent::MouseWheel { delta, axis })
            .ok_or(InputError::InvalidInput(
                "the number of notches is too large to be expressed as a wheel delta",
            ))
    }

    /// Lower the event to the record the injection API expects
    #[must_use]
    pub fn to_raw(&self) -> RawInput {
        match *self {
            InputEvent::MouseMove { dx, dy } => RawInput::Mouse(MouseInput {
                dx,
                dy,
                mouse_data: 0,
                flags: MOUSEEVENTF_MOVE,
            }),
            InputEvent::MouseButtonDown(button) => {
                let (flags, mouse_data) = match button {
                    Button::Left => (MOUSEEVENTF_LEFTDOWN, 0),
                    Button::Right => (MOUSEEVENTF_RIGHTDOWN, 0),
                    Button::Middle => (MOUSEEVENTF_MIDDLEDOWN, 0),
                    Button::Back => (MOUSEEVENTF_XDOWN, XBUTTON1),
                    Button::Forward => (MOUSEEVENTF_XDOWN, XBUTTON2),
                };
                RawInput::Mouse(MouseInput::flags(flags, mouse_data))
            }
            InputEvent::MouseButtonUp(button) => {
                let (flags, mouse_data) = match button {
                    Button::Left => (MOUSEEVENTF_LEFTUP, 0),
                    Button::Right => (MOUSEEVENTF_RIGHTUP, 0),
                    Button::Middle => (MOUSEEVENTF_MIDDLEUP, 0),
                    Button::Back => (MOUSEEVENTF_XUP, XBUTTON1),
                    Button::Forward => (MOUSEEVENTF_XUP, XBUTTON2),
                };
                RawInput::Mouse(MouseInput::flags(flags, mouse_data))
            }
            InputEvent::MouseWheel { delta, axis } => {
                let flags = match axis {
                    Axis::Vertical => MOUSEEVENTF_WHEEL,
                    Axis::Horizontal => MOUSEEVENTF_HWHEEL,
                };
                // mouseData is a DWORD; negative deltas keep their bit pattern
                RawInput::Mouse(MouseInput::flags(flags, delta.cast_unsigned()))
            }
            InputEvent::KeyboardKey { vk, scan, flags } => {
                RawInput::Keyboard(KeybdInput { vk, scan, flags })
            }
        }
    }
}

/// Mouse payload of an `INPUT` record
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub dx: i32,
    pub dy: i32,
    /// Button mask for the extended buttons or the wheel delta
    pub mouse_data: u32,
    pub flags: u32,
}

impl MouseInput {
    fn flags(flags: u32, mouse_data: u32) -> Self {
        Self {
            dx: 0,
            dy: 0,
            mouse_data,
            flags,
        }
    }

    /// The data word reinterpreted as a signed wheel delta
    #[must_use]
    pub fn wheel_delta(&self) -> i32 {
        self.mouse_data.cast_signed()
    }
}

/// Keyboard payload of an `INPUT` record
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeybdInput {
    pub vk: u16,
    pub scan: u16,
    pub flags: u32,
}

/// One record as handed to the injection sink. The `time` and
/// `dwExtraInfo` fields of the native structure are always zero and
/// therefore not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInput {
    Mouse(MouseInput),
    Keyboard(KeybdInput),
}

impl RawInput {
    /// Type discriminator of the record
    #[must_use]
    pub fn kind(&self) -> u32 {
        match self {
            RawInput::Mouse(_) => INPUT_MOUSE,
            RawInput::Keyboard(_) => INPUT_KEYBOARD,
        }
    }

    /// Serialize the record into the native `INPUT` layout: a `DWORD` type
    /// followed by the union of `MOUSEINPUT` and `KEYBDINPUT`, aligned to the
    /// pointer width. Padding and the unused tail of the union are zero.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ENVELOPE_SIZE] {
        let mut buf = [0u8; ENVELOPE_SIZE];
        put(&mut buf, 0, &self.kind().to_le_bytes());
        let body = &mut buf[UNION_OFFSET..];
        match self {
            RawInput::Mouse(mi) => {
                put(body, 0, &mi.dx.to_le_bytes());
                put(body, 4, &mi.dy.to_le_bytes());
                put(body, 8, &mi.mouse_data.to_le_bytes());
                put(body, 12, &mi.flags.to_le_bytes());
                // time (16..20) and dwExtraInfo stay zero
            }
            RawInput::Keyboard(ki) => {
                put(body, 0, &ki.vk.to_le_bytes());
                put(body, 2, &ki.scan.to_le_bytes());
                put(body, 4, &ki.flags.to_le_bytes());
            }
        }
        buf
    }
}

fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}
