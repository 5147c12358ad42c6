use std::{thread, time::Duration};

use crate::{Injector, InputSink, MotionController, RawInput, RecordingSink, Settings};

use super::{recording_injector, settle_time};

fn controller(settings: &Settings) -> (MotionController<RecordingSink>, RecordingSink) {
    let (injector, sink) = recording_injector(settings);
    (MotionController::new(injector, settings), sink)
}

fn fast_settings() -> Settings {
    Settings {
        tick_interval: Duration::from_millis(2),
        ..Default::default()
    }
}

fn moves(inputs: &[RawInput]) -> Vec<(i32, i32)> {
    inputs
        .iter()
        .map(|input| match input {
            RawInput::Mouse(mi) => (mi.dx, mi.dy),
            RawInput::Keyboard(ki) => panic!("unexpected keyboard record {ki:?}"),
        })
        .collect()
}

#[test]
fn unit_start_stop_are_idempotent() {
    let (controller, _sink) = controller(&fast_settings());
    assert!(!controller.is_running());
    assert!(!controller.stop());

    assert!(controller.start());
    assert!(!controller.start());
    assert!(controller.is_running());

    assert!(controller.stop());
    assert!(!controller.stop());
    assert!(!controller.is_running());

    // It can be started again after a stop
    assert!(controller.start());
    assert!(controller.stop());
}

#[test]
fn unit_concurrent_start_spawns_one_worker() {
    let (controller, _sink) = controller(&fast_settings());
    let spawned = thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| controller.start())).collect();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .filter(|started| matches!(started, Ok(true)))
            .count()
    });
    assert_eq!(spawned, 1);
    assert!(controller.stop());
}

#[test]
fn unit_raw_delta_without_acceleration() {
    let (controller, sink) = controller(&fast_settings());
    controller.set_delta_x(5);
    assert!(controller.start());
    thread::sleep(settle_time());
    assert!(controller.stop());

    let moves = moves(&sink.take());
    assert!(!moves.is_empty(), "expected the worker to emit motion");
    assert!(moves.iter().all(|&m| m == (5, 0)), "{moves:?}");
}

#[test]
fn unit_idle_without_delta() {
    let (controller, sink) = controller(&fast_settings());
    assert!(controller.start());
    thread::sleep(settle_time());
    assert!(sink.is_empty());

    controller.set_delta(0, -3);
    thread::sleep(settle_time());
    controller.set_delta(0, 0);
    // Let a tick that sampled the old delta finish
    thread::sleep(settle_time());
    let emitted = sink.len();
    assert!(emitted > 0);
    thread::sleep(settle_time());
    assert_eq!(sink.len(), emitted);
    assert!(controller.stop());
}

#[test]
fn unit_nothing_after_stop() {
    let (controller, sink) = controller(&fast_settings());
    controller.set_delta(1, 1);
    assert!(controller.start());
    thread::sleep(settle_time());
    assert!(controller.stop());

    let emitted = sink.len();
    thread::sleep(settle_time());
    assert_eq!(sink.len(), emitted);
}

#[test]
fn unit_acceleration_ramps_and_caps() {
    let settings = Settings {
        acceleration: 1000.0,
        max_speed: 40,
        ..fast_settings()
    };
    let (controller, sink) = controller(&settings);
    controller.set_delta(2, -2);
    assert!(controller.start());
    // 1000/s reaches the cap within 40 ms
    thread::sleep(settle_time() + Duration::from_millis(60));
    assert!(controller.stop());

    let moves = moves(&sink.take());
    assert!(moves.len() >= 2, "{moves:?}");
    for &(dx, dy) in &moves {
        assert_eq!(dx, -dy);
        assert!((2..=40).contains(&dx), "{moves:?}");
    }
    assert!(moves.windows(2).all(|w| w[0].0 <= w[1].0), "{moves:?}");
    assert_eq!(moves.last(), Some(&(40, -40)));
}

#[test]
fn unit_setters_and_getters() {
    let settings = Settings {
        acceleration: 2.5,
        max_speed: 12,
        ..fast_settings()
    };
    let (controller, _sink) = controller(&settings);
    assert_eq!(controller.acceleration(), 2.5);
    assert_eq!(controller.max_speed(), 12);
    assert_eq!((controller.delta_x(), controller.delta_y()), (0, 0));

    controller.set_delta_x(-4);
    controller.set_delta_y(9);
    controller.set_acceleration(0.0);
    controller.set_max_speed(100);
    assert_eq!((controller.delta_x(), controller.delta_y()), (-4, 9));
    assert_eq!(controller.acceleration(), 0.0);
    assert_eq!(controller.max_speed(), 100);
}

#[test]
fn unit_rejected_motion_keeps_the_worker_alive() {
    let (controller, sink) = controller(&fast_settings());
    sink.set_rejecting(true);
    controller.set_delta_x(3);
    assert!(controller.start());
    thread::sleep(settle_time());
    assert!(sink.is_empty());
    assert!(controller.is_running());

    sink.set_rejecting(false);
    thread::sleep(settle_time());
    assert!(!sink.is_empty());
    assert!(controller.stop());
}

#[test]
fn unit_drop_stops_the_worker() {
    let (controller, sink) = controller(&fast_settings());
    controller.set_delta_x(1);
    assert!(controller.start());
    thread::sleep(settle_time());
    drop(controller);

    let emitted = sink.len();
    thread::sleep(settle_time());
    assert_eq!(sink.len(), emitted);
}

// Sink that fails hard on the first submission and accepts everything after
#[derive(Default)]
struct PanicOnceSink {
    panicked: bool,
}

impl InputSink for PanicOnceSink {
    fn send(&mut self, inputs: &[RawInput]) -> u32 {
        if !self.panicked {
            self.panicked = true;
            panic!("sink failure");
        }
        u32::try_from(inputs.len()).unwrap()
    }
}

#[test]
fn unit_restart_after_worker_panic() {
    let settings = fast_settings();
    let controller = MotionController::new(
        Injector::new(PanicOnceSink::default(), &settings),
        &settings,
    );
    controller.set_delta_x(1);
    assert!(controller.start());
    thread::sleep(settle_time());
    assert!(!controller.is_running());

    // A dead worker does not block a new one
    controller.set_delta_x(0);
    assert!(controller.start());
    assert!(controller.is_running());
    assert!(controller.stop());
    assert!(!controller.is_running());
}
