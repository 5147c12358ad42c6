use std::mem::size_of;

use log::{debug, warn};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBD_EVENT_FLAGS, KEYBDINPUT, MOUSE_EVENT_FLAGS,
    MOUSEINPUT, SendInput, VIRTUAL_KEY,
};

use crate::{InputError, InputResult, InputSink, KeybdInput, MouseInput, RawInput};

/// Injects records into the system input stream with `SendInput`
#[derive(Debug)]
pub struct SendInputSink {
    input_size: i32,
}

impl SendInputSink {
    /// # Errors
    /// Returns [`InputError::InvalidInput`] if the size of `INPUT` does not
    /// fit into the `cbSize` argument
    pub fn new() -> InputResult<Self> {
        let Ok(input_size): Result<i32, _> = size_of::<INPUT>().try_into() else {
            return Err(InputError::InvalidInput(
                "the size of the INPUT was so large, the size exceeded i32::MAX",
            ));
        };
        debug!("SendInput sink ready, record size {input_size}");
        Ok(Self { input_size })
    }
}

fn mouse_event(mi: &MouseInput) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: mi.dx,
                dy: mi.dy,
                mouseData: mi.mouse_data.cast_signed(),
                dwFlags: MOUSE_EVENT_FLAGS(mi.flags),
                time: 0, /* Always set it to 0 (see https://web.archive.org/web/20231004113147/https://devblogs.microsoft.com/oldnewthing/20121101-00/?p=6193) */
                dwExtraInfo: 0,
            },
        },
    }
}

fn keybd_event(ki: &KeybdInput) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(ki.vk),
                wScan: ki.scan,
                dwFlags: KEYBD_EVENT_FLAGS(ki.flags),
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn to_native(input: &RawInput) -> INPUT {
    match input {
        RawInput::Mouse(mi) => mouse_event(mi),
        RawInput::Keyboard(ki) => keybd_event(ki),
    }
}

impl InputSink for SendInputSink {
    fn send(&mut self, inputs: &[RawInput]) -> u32 {
        let native: Vec<INPUT> = inputs.iter().map(to_native).collect();
        let accepted = unsafe { SendInput(&native, self.input_size) };
        if (accepted as usize) < native.len() {
            let last_err = std::io::Error::last_os_error();
            warn!("SendInput accepted {accepted} of {} records: {last_err}", native.len());
        }
        accepted
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ENVELOPE_SIZE;

    #[test]
    fn envelope_size_matches_native_input() {
        assert_eq!(size_of::<INPUT>(), ENVELOPE_SIZE);
    }

    #[test]
    fn wheel_delta_survives_conversion() {
        let native = to_native(&RawInput::Mouse(MouseInput {
            dx: 0,
            dy: 0,
            mouse_data: (-120i32).cast_unsigned(),
            flags: crate::event::MOUSEEVENTF_WHEEL,
        }));
        assert_eq!(native.r#type, INPUT_MOUSE);
        let mi = unsafe { native.Anonymous.mi };
        assert_eq!(mi.mouseData, -120);
        assert_eq!(mi.dwFlags.0, crate::event::MOUSEEVENTF_WHEEL);
    }
}
