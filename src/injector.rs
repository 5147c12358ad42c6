use log::{debug, trace, warn};

use crate::{
    Axis, Button, Direction, InputError, InputEvent, InputResult, InputSink, Mouse, NativeSink,
    RawInput, Settings,
};

/// Encodes mouse requests and submits them to an [`InputSink`]
pub struct Injector<S: InputSink> {
    sink: S,
    held: Vec<Button>, // Currently held buttons
    release_buttons_when_dropped: bool,
}

impl Injector<NativeSink> {
    /// Create an injector that talks to the platform's injection API
    ///
    /// # Errors
    /// Returns [`InputError::Unsupported`] on platforms without one
    pub fn native(settings: &Settings) -> InputResult<Self> {
        Ok(Self::new(NativeSink::new()?, settings))
    }
}

impl<S: InputSink> Injector<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        let Settings {
            release_buttons_when_dropped,
            ..
        } = settings;
        debug!("injector created");
        Self {
            sink,
            held: vec![],
            release_buttons_when_dropped: *release_buttons_when_dropped,
        }
    }

    /// Lower the events and hand them to the sink in one batch. Returns the
    /// number of records the sink accepted.
    ///
    /// # Errors
    /// Returns [`InputError::InjectionFailed`] if the sink accepted fewer
    /// records than were submitted. The submission is not retried.
    pub fn submit(&mut self, events: &[InputEvent]) -> InputResult<u32> {
        if events.is_empty() {
            return Ok(0);
        }
        let inputs: Vec<RawInput> = events.iter().map(InputEvent::to_raw).collect();
        let Ok(submitted) = u32::try_from(inputs.len()) else {
            return Err(InputError::InvalidInput(
                "too many input events for a single submission",
            ));
        };
        trace!("submitting {events:?}");
        let accepted = self.sink.send(&inputs);
        if accepted == submitted {
            Ok(accepted)
        } else {
            warn!("the sink accepted {accepted} of {submitted} input events");
            Err(InputError::InjectionFailed {
                submitted,
                accepted,
            })
        }
    }

    /// Returns a list of all currently pressed buttons
    #[must_use]
    pub fn held(&self) -> Vec<Button> {
        self.held.clone()
    }
}

impl<S: InputSink> Mouse for Injector<S> {
    fn button(&mut self, button: Button, direction: Direction) -> InputResult<()> {
        let mut events = vec![];
        if direction == Direction::Click || direction == Direction::Press {
            events.push(InputEvent::MouseButtonDown(button));
        }
        if direction == Direction::Click || direction == Direction::Release {
            events.push(InputEvent::MouseButtonUp(button));
        }
        self.submit(&events)?;

        match direction {
            Direction::Press => {
                if !self.held.contains(&button) {
                    self.held.push(button);
                }
            }
            Direction::Release => self.held.retain(|&b| b != button),
            Direction::Click => (),
        }
        Ok(())
    }

    fn move_relative(&mut self, dx: i32, dy: i32) -> InputResult<()> {
        self.submit(&[InputEvent::MouseMove { dx, dy }])?;
        Ok(())
    }

    fn scroll(&mut self, length: i32, axis: Axis) -> InputResult<()> {
        let event = InputEvent::wheel(length, axis)?;
        self.submit(&[event])?;
        Ok(())
    }
}

impl<S: InputSink> Drop for Injector<S> {
    // Release the held buttons before the sink is dropped
    fn drop(&mut self) {
        if !self.release_buttons_when_dropped {
            return;
        }
        for b in self.held() {
            if self.button(b, Direction::Release).is_err() {
                warn!("unable to release {b:?}");
            }
        }
        debug!("injector dropped");
    }
}
