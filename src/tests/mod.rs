use std::time::Duration;

use crate::{Injector, RecordingSink, Settings};

/// Module containing the tests of the motion worker's lifecycle and output
mod motion;

// Check if the code is running in the CI
fn is_ci() -> bool {
    matches!(std::env::var("CI").as_deref(), Ok("true"))
}

// Shared runners are slow to schedule threads, give the worker more ticks
// there before looking at its output
fn settle_time() -> Duration {
    if is_ci() {
        Duration::from_millis(150)
    } else {
        Duration::from_millis(60)
    }
}

fn recording_injector(settings: &Settings) -> (Injector<RecordingSink>, RecordingSink) {
    env_logger::try_init().ok();
    let sink = RecordingSink::new();
    (Injector::new(sink.clone(), settings), sink)
}
