use std::{sync::Arc, thread, time::Duration};

use mouse_inject::{
    Button, Injector, Mouse, MotionController, RawInput, RecordingSink, Settings,
    event::{MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MOVE},
};
use parking_lot::Mutex;

fn settings() -> Settings {
    Settings {
        tick_interval: Duration::from_millis(2),
        ..Default::default()
    }
}

#[test]
// Drag: press a button through the shared injector while the controller
// moves the pointer, then release it
fn drag_with_shared_injector() {
    env_logger::try_init().ok();
    let sink = RecordingSink::new();
    let injector = Arc::new(Mutex::new(Injector::new(sink.clone(), &settings())));
    let controller = MotionController::with_shared_injector(Arc::clone(&injector), &settings());

    injector.lock().press_button(Button::Left).unwrap();
    controller.start();
    controller.set_delta(3, 1);
    thread::sleep(Duration::from_millis(50));
    controller.set_delta(0, 0);
    controller.stop();
    injector.lock().release_button(Button::Left).unwrap();

    let flags: Vec<u32> = sink
        .inputs()
        .iter()
        .map(|input| match input {
            RawInput::Mouse(mi) => mi.flags,
            RawInput::Keyboard(_) => panic!("unexpected keyboard record"),
        })
        .collect();
    assert!(flags.len() >= 3, "{flags:?}");
    assert_eq!(flags.first(), Some(&MOUSEEVENTF_LEFTDOWN));
    assert_eq!(flags.last(), Some(&MOUSEEVENTF_LEFTUP));
    assert!(
        flags[1..flags.len() - 1]
            .iter()
            .all(|&f| f == MOUSEEVENTF_MOVE)
    );
    assert!(injector.lock().held().is_empty());
}

#[test]
fn controller_reports_its_injector() {
    let sink = RecordingSink::new();
    let controller = MotionController::new(Injector::new(sink.clone(), &settings()), &settings());
    controller.injector().lock().scroll_wheel(1).unwrap();
    assert_eq!(sink.len(), 1);
}

#[cfg(not(target_os = "windows"))]
#[test]
fn native_sink_is_unavailable() {
    assert!(matches!(
        Injector::native(&Settings::default()),
        Err(mouse_inject::InputError::Unsupported(_))
    ));
}
