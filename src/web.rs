//! Browser bindings for the bootstrap sequence.
//!
//! [`WebHost`] and [`WebModule`] implement the [`crate::boot`] traits against
//! the real DOM. [`on_page_load`] is the page-level entry point: it schedules
//! [`boot`] once the window's `load` event has fired, and `boot` keeps the
//! resulting [`App`] alive for the rest of the page's life.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::app::App;
use crate::boot::{AppHandle, AppModule, BootError, Bootstrap, Host, ModuleReady};
use crate::config::BootConfig;
use crate::consts::STYLESHEET_ID;
use crate::error::AppError;
use crate::input::{InputEvent, POINTER_EVENTS, Point};
use crate::live::{Detach, LiveSlot};

thread_local! {
    /// The one application handle for this page and the listeners feeding it.
    static LIVE: RefCell<LiveSlot<App, DomListener>> = const { RefCell::new(LiveSlot::new()) };
}

/// An event listener registered on a DOM target.
///
/// Owns its closure, so the JS callback stays valid exactly as long as the
/// registration is tracked.
struct DomListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl DomListener {
    fn register(target: EventTarget, event: &'static str, closure: Closure<dyn FnMut(Event)>) -> Result<Self, AppError> {
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self { target, event, closure })
    }
}

impl Detach for DomListener {
    fn detach(&self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {} listener: {}", self.event, AppError::from(err));
        }
    }
}

/// The live browser page.
pub struct WebHost;

impl Host for WebHost {
    type Window = Window;
    type Canvas = HtmlCanvasElement;

    fn apply_stylesheet(&self, css: &str) {
        if let Err(err) = inject_stylesheet(css) {
            log::warn!("stylesheet not applied: {err}");
        }
    }

    fn window(&self) -> Option<Window> {
        web_sys::window()
    }

    fn canvas_by_id(&self, id: &str) -> Option<HtmlCanvasElement> {
        let element = web_sys::window()?.document()?.get_element_by_id(id)?;
        if let Ok(canvas) = element.dyn_into::<HtmlCanvasElement>() {
            Some(canvas)
        } else {
            log::warn!("element #{id} is not a canvas");
            None
        }
    }
}

fn inject_stylesheet(css: &str) -> Result<(), AppError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(AppError::WindowMissing)?;
    if document.get_element_by_id(STYLESHEET_ID).is_some() {
        return Ok(());
    }
    let style = document.create_element("style")?;
    style.set_id(STYLESHEET_ID);
    style.set_text_content(Some(css));
    let head = document
        .head()
        .ok_or_else(|| AppError::Js("document has no <head>".into()))?;
    head.append_child(&style)?;
    Ok(())
}

/// The WebGL application module.
pub struct WebModule {
    config: BootConfig,
}

impl WebModule {
    #[must_use]
    pub fn new(config: BootConfig) -> Self {
        Self { config }
    }
}

impl AppModule<WebHost> for WebModule {
    type Handle = App;

    fn initialize(&mut self) -> impl Future<Output = Result<ModuleReady, AppError>> {
        detect_webgl2()
    }

    fn construct(
        &self,
        _ready: ModuleReady,
        window: Window,
        canvas: Option<HtmlCanvasElement>,
    ) -> Result<App, AppError> {
        let canvas = canvas.ok_or_else(|| AppError::CanvasMissing(self.config.canvas_id.clone()))?;
        App::with_config(window, canvas, &self.config)
    }
}

/// Yield to the microtask queue, then check the browser exposes WebGL2.
async fn detect_webgl2() -> Result<ModuleReady, AppError> {
    JsFuture::from(js_sys::Promise::resolve(&JsValue::UNDEFINED)).await?;
    let window = web_sys::window().ok_or(AppError::WindowMissing)?;
    if !js_sys::Reflect::has(&window, &JsValue::from_str("WebGL2RenderingContext"))? {
        return Err(AppError::ContextUnavailable("webgl2".into()));
    }
    Ok(ModuleReady::signal())
}

/// Schedule [`boot`] for when the page has finished loading.
///
/// Runs on the next tick instead if the page is already loaded.
///
/// # Errors
///
/// Returns an [`AppError`] if there is no window or the `load` listener
/// cannot be attached.
pub fn on_page_load(config: BootConfig) -> Result<(), AppError> {
    let window = web_sys::window().ok_or(AppError::WindowMissing)?;
    let loaded = window
        .document()
        .is_some_and(|d| d.ready_state() == "complete");
    if loaded {
        spawn_boot(config);
        return Ok(());
    }

    let on_load = Closure::once(move || spawn_boot(config));
    window.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
    on_load.forget();
    Ok(())
}

fn spawn_boot(config: BootConfig) {
    wasm_bindgen_futures::spawn_local(async move {
        match boot(config).await {
            Ok(()) => log::info!("page rendered"),
            Err(BootError::Wiring(err)) => log::error!("input disabled: {err}"),
            // Sequence failures are logged where they happen.
            Err(_) => {}
        }
    });
}

/// Run the bootstrap sequence against the live page.
///
/// On success the application is kept for the page lifetime. A handle from an
/// earlier run is replaced, and its listeners are removed from the page.
///
/// # Errors
///
/// Returns the [`BootError`] of the step that failed.
pub async fn boot(config: BootConfig) -> Result<(), BootError> {
    match config.level_filter() {
        Ok(level) => log::set_max_level(level),
        Err(err) => log::warn!("{err}"),
    }
    let input_enabled = config.input_enabled;

    let mut sequence = Bootstrap::new(WebHost, WebModule::new(config.clone()), config);
    let app = Rc::new(RefCell::new(sequence.run().await?));
    LIVE.with(|slot| slot.borrow_mut().replace(Rc::clone(&app)));

    if input_enabled {
        let mut listeners = Vec::new();
        let wired = wire_input(&app, &mut listeners);
        LIVE.with(|slot| {
            let mut slot = slot.borrow_mut();
            for listener in listeners {
                slot.attach(listener);
            }
        });
        wired.map_err(BootError::Wiring)?;
    }
    Ok(())
}

/// Forward canvas mouse events and window resizes to `app` as [`InputEvent`]s.
///
/// Each registered listener is pushed to `out` as soon as it is live, so a
/// failure part-way leaves nothing untracked.
fn wire_input(app: &Rc<RefCell<App>>, out: &mut Vec<DomListener>) -> Result<(), AppError> {
    let (window, canvas) = {
        let app = app.borrow();
        (app.window().clone(), app.canvas().clone())
    };

    for name in POINTER_EVENTS {
        let app = Rc::clone(app);
        let closure = Closure::wrap(Box::new(move |ev: Event| {
            let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
                return;
            };
            let offset = Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()));
            if let Some(event) = InputEvent::pointer(name, offset) {
                forward(&app, event);
            }
        }) as Box<dyn FnMut(Event)>);
        out.push(DomListener::register(canvas.clone().into(), name, closure)?);
    }

    let app = Rc::clone(app);
    let on_resize = Closure::wrap(Box::new(move |_: Event| forward(&app, InputEvent::Resize)) as Box<dyn FnMut(Event)>);
    out.push(DomListener::register(window.into(), "resize", on_resize)?);

    log::debug!("input listeners attached");
    Ok(())
}

fn forward(app: &Rc<RefCell<App>>, event: InputEvent) {
    match app.try_borrow_mut() {
        Ok(mut app) => {
            if let Err(err) = app.deliver(event) {
                log::warn!("{event:?} failed: {err}");
            }
        }
        Err(_) => log::warn!("{event:?} dropped: app busy"),
    }
}
