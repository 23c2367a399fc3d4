#![allow(clippy::float_cmp)]

use super::*;

fn core() -> AppCore {
    AppCore::new(&BootConfig::default())
}

#[test]
fn core_starts_idle_with_no_frames() {
    let core = core();
    assert_eq!(core.input, InputState::Idle);
    assert_eq!(core.frames_rendered(), 0);
    assert!(core.viewport.is_empty());
}

#[test]
fn core_takes_clear_color_and_context_from_config() {
    let config = BootConfig { clear_color: [0.2, 0.4, 0.6, 1.0], context_kind: "webgl".into(), ..BootConfig::default() };
    let core = AppCore::new(&config);
    assert_eq!(core.clear_color, [0.2, 0.4, 0.6, 1.0]);
    assert_eq!(core.context_kind, "webgl");
}

#[test]
fn record_frame_counts_up() {
    let mut core = core();
    core.record_frame();
    core.record_frame();
    assert_eq!(core.frames_rendered(), 2);
}

#[test]
fn resize_to_reports_change_once() {
    let mut core = core();
    let vp = Viewport { width: 640, height: 480 };
    assert!(core.resize_to(vp));
    assert!(!core.resize_to(vp));
    assert_eq!(core.viewport, vp);
}

#[test]
fn resize_to_detects_single_axis_change() {
    let mut core = core();
    core.resize_to(Viewport { width: 640, height: 480 });
    assert!(core.resize_to(Viewport { width: 640, height: 481 }));
}

#[test]
fn handle_pointer_sequence_leaves_core_idle() {
    let mut core = core();
    assert_eq!(core.handle(InputEvent::PointerDown(Point::new(1.0, 1.0))), Action::None);
    assert!(core.input.is_pressed());
    assert_eq!(core.handle(InputEvent::PointerMove(Point::new(2.0, 3.0))), Action::None);
    assert_eq!(core.handle(InputEvent::PointerUp(Point::new(2.0, 3.0))), Action::None);
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn handle_resize_asks_for_refit() {
    let mut core = core();
    assert_eq!(core.handle(InputEvent::Resize), Action::ResizeNeeded);
}

#[test]
fn pointer_events_do_not_render() {
    let mut core = core();
    core.handle(InputEvent::PointerDown(Point::new(1.0, 1.0)));
    core.handle(InputEvent::PointerUp(Point::new(1.0, 1.0)));
    assert_eq!(core.frames_rendered(), 0);
}
