//! Continuous relative motion driven by a background worker.
//!
//! Callers set a per-tick displacement. While it is non-zero, the worker
//! emits one relative move per tick. With a positive acceleration the
//! magnitude of every non-zero axis grows linearly with the time since the
//! displacement was last changed, starting from the requested magnitude and
//! capped at the maximum speed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::{InputSink, Injector, Mouse, Settings};

/// Ramped displacement of one axis
///
/// Returns `delta` unchanged when it is zero or when `acceleration` is not
/// positive. Otherwise the magnitude is
/// `min(max_speed, acceleration * elapsed + |delta|)`, carrying the sign of
/// `delta` and rounded to the nearest integer, ties to even.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn accelerated_delta(delta: i32, acceleration: f64, max_speed: u32, elapsed: Duration) -> i32 {
    if delta == 0 || acceleration.is_nan() || acceleration <= 0.0 {
        return delta;
    }
    let magnitude = (acceleration * elapsed.as_secs_f64() + f64::from(delta.unsigned_abs()))
        .min(f64::from(max_speed));
    // Saturates at the i32 bounds
    magnitude.copysign(f64::from(delta)).round_ties_even() as i32
}

/// What the worker should currently do. The deltas and `last_change` are
/// only ever written together under one lock.
#[derive(Debug, Clone, Copy)]
struct MotionIntent {
    delta_x: i32,
    delta_y: i32,
    acceleration: f64,
    max_speed: u32,
    last_change: Instant,
}

impl MotionIntent {
    fn new(settings: &Settings) -> Self {
        Self {
            delta_x: 0,
            delta_y: 0,
            acceleration: settings.acceleration,
            max_speed: settings.max_speed,
            last_change: Instant::now(),
        }
    }

    /// Displacement to emit at `now`, or `None` if no motion is requested
    fn step(&self, now: Instant) -> Option<(i32, i32)> {
        if self.delta_x == 0 && self.delta_y == 0 {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.last_change);
        Some((
            accelerated_delta(self.delta_x, self.acceleration, self.max_speed, elapsed),
            accelerated_delta(self.delta_y, self.acceleration, self.max_speed, elapsed),
        ))
    }
}

struct Shared<S: InputSink> {
    intent: Mutex<MotionIntent>,
    running: AtomicBool,
    injector: Arc<Mutex<Injector<S>>>,
    tick: Duration,
}

// Clears the run flag however the worker exits, a panicking sink included
struct StopOnExit<'a>(&'a AtomicBool);

impl Drop for StopOnExit<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<S: InputSink> Shared<S> {
    fn run(&self) {
        let _stop = StopOnExit(&self.running);
        debug!("motion worker started, tick {:?}", self.tick);
        while self.running.load(Ordering::SeqCst) {
            let intent = *self.intent.lock();
            if let Some((dx, dy)) = intent.step(Instant::now()) {
                if let Err(e) = self.injector.lock().move_relative(dx, dy) {
                    warn!("relative motion ({dx}, {dy}) was not injected: {e}");
                }
            }
            thread::sleep(self.tick);
        }
        debug!("motion worker exiting");
    }
}

/// Turns a held displacement into a stream of relative motion events
///
/// The controller owns at most one worker thread. Dropping the controller
/// stops it, so like [`MotionController::stop`] it must not be dropped while
/// the lock of [`MotionController::injector`] is held.
pub struct MotionController<S: InputSink + Send + 'static> {
    shared: Arc<Shared<S>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<S: InputSink + Send + 'static> MotionController<S> {
    /// Create a stopped controller that emits through `injector`
    pub fn new(injector: Injector<S>, settings: &Settings) -> Self {
        Self::with_shared_injector(Arc::new(Mutex::new(injector)), settings)
    }

    /// Create a stopped controller that shares `injector` with other callers,
    /// so one-shot button and wheel events go through the same sink
    pub fn with_shared_injector(injector: Arc<Mutex<Injector<S>>>, settings: &Settings) -> Self {
        Self {
            shared: Arc::new(Shared {
                intent: Mutex::new(MotionIntent::new(settings)),
                running: AtomicBool::new(false),
                injector,
                tick: settings.tick_interval,
            }),
            worker: Mutex::new(None),
        }
    }

    /// The injector the worker emits through
    #[must_use]
    pub fn injector(&self) -> Arc<Mutex<Injector<S>>> {
        Arc::clone(&self.shared.injector)
    }

    /// Spawn the worker. Returns `false` without doing anything if it is
    /// already running.
    pub fn start(&self) -> bool {
        let mut worker = self.worker.lock();
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let shared = Arc::clone(&self.shared);
        match thread::Builder::new()
            .name("motion-controller".to_string())
            .spawn(move || shared.run())
        {
            Ok(handle) => {
                *worker = Some(handle);
                true
            }
            Err(e) => {
                warn!("unable to spawn the motion worker: {e}");
                self.shared.running.store(false, Ordering::SeqCst);
                false
            }
        }
    }

    /// Stop the worker and wait until it has exited. No motion is emitted
    /// after this returns. Returns `false` if it was not running.
    ///
    /// Must not be called while holding the lock of [`Self::injector`], the
    /// worker may be waiting for it.
    pub fn stop(&self) -> bool {
        let mut worker = self.worker.lock();
        if self
            .shared
            .running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                warn!("the motion worker panicked");
            }
        }
        true
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn delta_x(&self) -> i32 {
        self.shared.intent.lock().delta_x
    }

    pub fn set_delta_x(&self, delta_x: i32) {
        let mut intent = self.shared.intent.lock();
        intent.delta_x = delta_x;
        intent.last_change = Instant::now();
    }

    #[must_use]
    pub fn delta_y(&self) -> i32 {
        self.shared.intent.lock().delta_y
    }

    pub fn set_delta_y(&self, delta_y: i32) {
        let mut intent = self.shared.intent.lock();
        intent.delta_y = delta_y;
        intent.last_change = Instant::now();
    }

    /// Set both axes at once with a single ramp origin
    pub fn set_delta(&self, delta_x: i32, delta_y: i32) {
        let mut intent = self.shared.intent.lock();
        intent.delta_x = delta_x;
        intent.delta_y = delta_y;
        intent.last_change = Instant::now();
    }

    #[must_use]
    pub fn acceleration(&self) -> f64 {
        self.shared.intent.lock().acceleration
    }

    /// Ramp rate in units per second. Values that are not positive disable
    /// the ramp.
    pub fn set_acceleration(&self, acceleration: f64) {
        self.shared.intent.lock().acceleration = acceleration;
    }

    #[must_use]
    pub fn max_speed(&self) -> u32 {
        self.shared.intent.lock().max_speed
    }

    /// Cap on the per-tick displacement while accelerating
    pub fn set_max_speed(&self, max_speed: u32) {
        self.shared.intent.lock().max_speed = max_speed;
    }
}

impl<S: InputSink + Send + 'static> Drop for MotionController<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
