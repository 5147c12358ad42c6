#[cfg(target_os = "windows")]
/// The injection sink of the current platform
pub type NativeSink = crate::SendInputSink;

#[cfg(not(target_os = "windows"))]
pub use unsupported::NativeSink;

#[cfg(not(target_os = "windows"))]
mod unsupported {
    use crate::{InputError, InputResult, InputSink, RawInput};

    // Enum without any variants
    // This can never get constructed
    enum Never {}

    /// Placeholder for platforms without a supported injection API. It can
    /// not be constructed, so no code path ever sends through it.
    pub struct NativeSink {
        never: Never,
    }

    impl NativeSink {
        /// # Errors
        /// Always returns [`InputError::Unsupported`]
        pub fn new() -> InputResult<Self> {
            Err(InputError::Unsupported(
                "input injection is only available on Windows",
            ))
        }
    }

    impl InputSink for NativeSink {
        fn send(&mut self, _: &[RawInput]) -> u32 {
            match self.never {}
        }
    }
}
