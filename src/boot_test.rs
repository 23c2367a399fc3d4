use std::cell::RefCell;
use std::error::Error as _;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;

use super::*;
use crate::input::Point;

// =============================================================
// Helpers
// =============================================================

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn count(log: &Log, prefix: &str) -> usize {
    log.borrow().iter().filter(|e| e.starts_with(prefix)).count()
}

struct MockHost {
    log: Log,
    has_window: bool,
    canvases: Vec<&'static str>,
}

impl MockHost {
    fn page(log: &Log) -> Self {
        Self { log: Rc::clone(log), has_window: true, canvases: vec!["webgl"] }
    }
}

impl Host for MockHost {
    type Window = &'static str;
    type Canvas = String;

    fn apply_stylesheet(&self, css: &str) {
        assert_eq!(css, STYLESHEET);
        self.log.borrow_mut().push("stylesheet".into());
    }

    fn window(&self) -> Option<Self::Window> {
        self.has_window.then_some("window")
    }

    fn canvas_by_id(&self, id: &str) -> Option<Self::Canvas> {
        self.log.borrow_mut().push(format!("lookup:{id}"));
        self.canvases.contains(&id).then(|| id.to_owned())
    }
}

struct MockApp {
    log: Log,
    render_fails: bool,
    events: Vec<InputEvent>,
}

impl AppHandle for MockApp {
    fn render(&mut self) -> Result<(), AppError> {
        self.log.borrow_mut().push("render".into());
        if self.render_fails {
            return Err(AppError::ContextUnavailable("webgl2".into()));
        }
        Ok(())
    }

    fn deliver(&mut self, event: InputEvent) -> Result<(), AppError> {
        self.events.push(event);
        Ok(())
    }
}

#[derive(Default)]
struct MockModule {
    log: Log,
    init_failures: u32,
    gate: Option<oneshot::Receiver<()>>,
    require_canvas: bool,
    render_fails: bool,
}

impl MockModule {
    fn new(log: &Log) -> Self {
        Self { log: Rc::clone(log), ..Default::default() }
    }
}

impl AppModule<MockHost> for MockModule {
    type Handle = MockApp;

    fn initialize(&mut self) -> impl Future<Output = Result<ModuleReady, AppError>> {
        let log = Rc::clone(&self.log);
        let gate = self.gate.take();
        let fail = self.init_failures > 0;
        self.init_failures = self.init_failures.saturating_sub(1);
        async move {
            log.borrow_mut().push("init:start".into());
            if let Some(gate) = gate {
                if gate.await.is_err() {
                    return Err(AppError::Js("gate dropped".into()));
                }
            }
            if fail {
                log.borrow_mut().push("init:fail".into());
                return Err(AppError::Js("instantiate failed".into()));
            }
            log.borrow_mut().push("init:ready".into());
            Ok(ModuleReady::signal())
        }
    }

    fn construct(&self, _ready: ModuleReady, window: &'static str, canvas: Option<String>) -> Result<MockApp, AppError> {
        self.log.borrow_mut().push(format!("construct:{window}:{canvas:?}"));
        if self.require_canvas && canvas.is_none() {
            return Err(AppError::CanvasMissing("webgl".into()));
        }
        Ok(MockApp { log: Rc::clone(&self.log), render_fails: self.render_fails, events: Vec::new() })
    }
}

fn bootstrap(log: &Log) -> Bootstrap<MockHost, MockModule> {
    Bootstrap::new(MockHost::page(log), MockModule::new(log), BootConfig::default())
}

// =============================================================
// Loading
// =============================================================

#[test]
fn new_applies_stylesheet_and_stays_unloaded() {
    let log = new_log();
    let boot = bootstrap(&log);
    assert_eq!(entries(&log), vec!["stylesheet"]);
    assert_eq!(boot.phase(), Phase::Unloaded);
}

// =============================================================
// Success path
// =============================================================

#[test]
fn success_runs_steps_in_order() {
    let log = new_log();
    let mut boot = bootstrap(&log);
    let app = block_on(boot.run());
    assert!(app.is_ok());
    assert_eq!(
        entries(&log),
        vec![
            "stylesheet",
            "init:start",
            "init:ready",
            "lookup:webgl",
            "construct:window:Some(\"webgl\")",
            "render",
        ]
    );
    assert_eq!(boot.phase(), Phase::Rendered);
}

#[test]
fn success_constructs_once_and_renders_once() {
    let log = new_log();
    let mut boot = bootstrap(&log);
    block_on(boot.run()).unwrap();
    assert_eq!(count(&log, "construct:"), 1);
    assert_eq!(count(&log, "render"), 1);
}

#[test]
fn construction_waits_for_initialization() {
    let log = new_log();
    let (tx, rx) = oneshot::channel();
    let mut module = MockModule::new(&log);
    module.gate = Some(rx);
    let mut boot = Bootstrap::new(MockHost::page(&log), module, BootConfig::default());

    let done = Rc::new(RefCell::new(None));
    let done_in_task = Rc::clone(&done);
    let mut pool = LocalPool::new();
    pool.spawner()
        .spawn_local(async move {
            let result = boot.run().await.map(|_| boot.phase());
            *done_in_task.borrow_mut() = Some(result);
        })
        .unwrap();

    pool.run_until_stalled();
    assert_eq!(entries(&log), vec!["stylesheet", "init:start"]);
    assert!(done.borrow().is_none());

    tx.send(()).unwrap();
    pool.run();
    assert_eq!(count(&log, "construct:"), 1);
    assert_eq!(count(&log, "render"), 1);
    assert!(matches!(*done.borrow(), Some(Ok(Phase::Rendered))));
}

#[test]
fn rendered_app_has_received_no_input() {
    let log = new_log();
    let mut boot = bootstrap(&log);
    let app = block_on(boot.run()).unwrap();
    assert!(app.events.is_empty());
}

#[test]
fn returned_handle_accepts_input_messages() {
    let log = new_log();
    let mut boot = bootstrap(&log);
    let mut app = block_on(boot.run()).unwrap();
    app.deliver(InputEvent::PointerDown(Point::new(4.0, 2.0))).unwrap();
    app.deliver(InputEvent::Resize).unwrap();
    assert_eq!(app.events, vec![InputEvent::PointerDown(Point::new(4.0, 2.0)), InputEvent::Resize]);
}

// =============================================================
// Initialization failure
// =============================================================

#[test]
fn init_failure_never_constructs_or_renders() {
    let log = new_log();
    let mut module = MockModule::new(&log);
    module.init_failures = 1;
    let mut boot = Bootstrap::new(MockHost::page(&log), module, BootConfig::default());

    let err = block_on(boot.run()).err().unwrap();
    assert!(matches!(err, BootError::Init(AppError::Js(_))));
    assert_eq!(count(&log, "construct:"), 0);
    assert_eq!(count(&log, "render"), 0);
    assert_eq!(count(&log, "lookup:"), 0);
    assert_eq!(boot.phase(), Phase::Failed);
}

#[test]
fn init_failure_still_applied_stylesheet() {
    let log = new_log();
    let mut module = MockModule::new(&log);
    module.init_failures = 1;
    let mut boot = Bootstrap::new(MockHost::page(&log), module, BootConfig::default());
    assert!(block_on(boot.run()).is_err());
    assert_eq!(entries(&log), vec!["stylesheet", "init:start", "init:fail"]);
}

#[test]
fn dropped_gate_fails_initialization() {
    let log = new_log();
    let (tx, rx) = oneshot::channel::<()>();
    let mut module = MockModule::new(&log);
    module.gate = Some(rx);
    drop(tx);
    let mut boot = Bootstrap::new(MockHost::page(&log), module, BootConfig::default());
    let err = block_on(boot.run()).err().unwrap();
    assert!(matches!(err, BootError::Init(_)));
    assert_eq!(count(&log, "render"), 0);
}

// =============================================================
// Host resources
// =============================================================

#[test]
fn missing_canvas_passes_none_to_construct() {
    let log = new_log();
    let host = MockHost { log: Rc::clone(&log), has_window: true, canvases: vec![] };
    let mut boot = Bootstrap::new(host, MockModule::new(&log), BootConfig::default());
    block_on(boot.run()).unwrap();
    assert!(entries(&log).contains(&"construct:window:None".to_owned()));
}

#[test]
fn missing_canvas_rejected_by_module_fails_construct() {
    let log = new_log();
    let host = MockHost { log: Rc::clone(&log), has_window: true, canvases: vec![] };
    let mut module = MockModule::new(&log);
    module.require_canvas = true;
    let mut boot = Bootstrap::new(host, module, BootConfig::default());
    let err = block_on(boot.run()).err().unwrap();
    assert!(matches!(err, BootError::Construct(AppError::CanvasMissing(_))));
    assert_eq!(count(&log, "render"), 0);
    assert_eq!(boot.phase(), Phase::Failed);
}

#[test]
fn canvas_lookup_uses_configured_id() {
    let log = new_log();
    let host = MockHost { log: Rc::clone(&log), has_window: true, canvases: vec!["stage"] };
    let config = BootConfig { canvas_id: "stage".into(), ..BootConfig::default() };
    let mut boot = Bootstrap::new(host, MockModule::new(&log), config);
    block_on(boot.run()).unwrap();
    assert!(entries(&log).contains(&"lookup:stage".to_owned()));
    assert!(entries(&log).contains(&"construct:window:Some(\"stage\")".to_owned()));
}

#[test]
fn missing_window_fails_before_construct() {
    let log = new_log();
    let host = MockHost { log: Rc::clone(&log), has_window: false, canvases: vec!["webgl"] };
    let mut boot = Bootstrap::new(host, MockModule::new(&log), BootConfig::default());
    let err = block_on(boot.run()).err().unwrap();
    assert!(matches!(err, BootError::WindowMissing));
    assert_eq!(count(&log, "construct:"), 0);
    assert_eq!(count(&log, "init:ready"), 1);
}

// =============================================================
// Render failure
// =============================================================

#[test]
fn render_failure_reports_render_step() {
    let log = new_log();
    let mut module = MockModule::new(&log);
    module.render_fails = true;
    let mut boot = Bootstrap::new(MockHost::page(&log), module, BootConfig::default());
    let err = block_on(boot.run()).err().unwrap();
    assert!(matches!(err, BootError::Render(AppError::ContextUnavailable(_))));
    assert_eq!(count(&log, "render"), 1);
    assert_eq!(boot.phase(), Phase::Failed);
}

// =============================================================
// Re-running
// =============================================================

#[test]
fn rerun_repeats_initialization_and_construction() {
    let log = new_log();
    let mut boot = bootstrap(&log);
    block_on(boot.run()).unwrap();
    block_on(boot.run()).unwrap();
    assert_eq!(count(&log, "stylesheet"), 1);
    assert_eq!(count(&log, "init:start"), 2);
    assert_eq!(count(&log, "construct:"), 2);
    assert_eq!(count(&log, "render"), 2);
}

#[test]
fn rerun_after_failure_can_succeed() {
    let log = new_log();
    let mut module = MockModule::new(&log);
    module.init_failures = 1;
    let mut boot = Bootstrap::new(MockHost::page(&log), module, BootConfig::default());
    assert!(block_on(boot.run()).is_err());
    assert_eq!(boot.phase(), Phase::Failed);
    assert!(block_on(boot.run()).is_ok());
    assert_eq!(boot.phase(), Phase::Rendered);
    assert_eq!(count(&log, "render"), 1);
}

// =============================================================
// Errors and phases
// =============================================================

#[test]
fn boot_error_wraps_app_error_as_source() {
    let err = BootError::Init(AppError::Js("boom".into()));
    assert_eq!(err.to_string(), "module initialization failed: host error: boom");
    assert!(err.source().is_some());
}

#[test]
fn window_missing_has_no_source() {
    assert!(BootError::WindowMissing.source().is_none());
}

#[test]
fn phase_default_is_unloaded() {
    assert_eq!(Phase::default(), Phase::Unloaded);
}
