//! Bootstrap sequence: initialize the module, construct the application
//! handle from host resources, render once.
//!
//! The sequence is written against three traits so it runs unchanged in the
//! browser and under native tests:
//!
//! - [`Host`] supplies the window, looks up the canvas and applies the stylesheet.
//! - [`AppModule`] performs the one suspending initialization step and builds
//!   the handle once it holds a [`ModuleReady`] token.
//! - [`AppHandle`] is the running application: `render` plus input messages.
//!
//! ```text
//! Unloaded ──run()──▶ Initializing ──ok──▶ Ready ──construct+render──▶ Rendered
//!                          │                 │
//!                          └──err──▶ Failed ◀┘
//! ```

use std::future::Future;

use wasm_bindgen::JsValue;

use crate::config::BootConfig;
use crate::consts::STYLESHEET;
use crate::error::AppError;
use crate::input::InputEvent;

#[cfg(test)]
#[path = "boot_test.rs"]
mod boot_test;

/// One-shot proof that module initialization completed.
///
/// Not `Clone`: [`AppModule::construct`] consumes it, so a handle can only be
/// built from a token produced by a successful [`AppModule::initialize`].
#[derive(Debug)]
pub struct ModuleReady(());

impl ModuleReady {
    /// Signal readiness. Only module implementations should call this.
    #[must_use]
    pub fn signal() -> Self {
        Self(())
    }
}

/// Where the sequence currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Unloaded,
    Initializing,
    Ready,
    Rendered,
    Failed,
}

/// Which step of the sequence failed.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    /// Module initialization reported failure. The page never renders.
    #[error("module initialization failed: {0}")]
    Init(#[source] AppError),
    /// The host has no global window.
    #[error("host window is unavailable")]
    WindowMissing,
    /// The module could not build the application handle.
    #[error("application construction failed: {0}")]
    Construct(#[source] AppError),
    /// The first render pass failed.
    #[error("render failed: {0}")]
    Render(#[source] AppError),
    /// Input listeners could not be attached after rendering.
    #[error("input wiring failed: {0}")]
    Wiring(#[source] AppError),
}

impl From<BootError> for JsValue {
    fn from(err: BootError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// The page environment the sequence runs in.
pub trait Host {
    type Window;
    type Canvas;

    /// Apply `css` to the whole page.
    fn apply_stylesheet(&self, css: &str);

    /// The global window object, if the host has one.
    fn window(&self) -> Option<Self::Window>;

    /// Look up a canvas element by id.
    fn canvas_by_id(&self, id: &str) -> Option<Self::Canvas>;
}

/// The running application.
pub trait AppHandle {
    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] if the frame could not be drawn.
    fn render(&mut self) -> Result<(), AppError>;

    /// Deliver one input message.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] if handling the message failed.
    fn deliver(&mut self, event: InputEvent) -> Result<(), AppError>;
}

/// The application module behind the capability boundary.
pub trait AppModule<H: Host> {
    type Handle: AppHandle;

    /// Bring the module up. Suspends until it is ready or has failed.
    fn initialize(&mut self) -> impl Future<Output = Result<ModuleReady, AppError>>;

    /// Build the application handle. `canvas` is `None` when the host had no
    /// element under the configured id.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] if the handle cannot be built from the given
    /// resources.
    fn construct(
        &self,
        ready: ModuleReady,
        window: H::Window,
        canvas: Option<H::Canvas>,
    ) -> Result<Self::Handle, AppError>;
}

/// Drives one host and module through the boot phases.
pub struct Bootstrap<H, M> {
    host: H,
    module: M,
    config: BootConfig,
    phase: Phase,
}

impl<H: Host, M: AppModule<H>> Bootstrap<H, M> {
    /// Load the sequence. Applies the page stylesheet immediately, whether or
    /// not initialization later succeeds.
    pub fn new(host: H, module: M, config: BootConfig) -> Self {
        host.apply_stylesheet(STYLESHEET);
        Self { host, module, config, phase: Phase::Unloaded }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the sequence once and hand back the rendered application.
    ///
    /// Each call starts over from initialization; nothing carries over between
    /// runs except the host and module themselves.
    ///
    /// # Errors
    ///
    /// Returns the [`BootError`] for the first step that failed. No step is
    /// retried and `render` is never reached after a failure.
    pub async fn run(&mut self) -> Result<M::Handle, BootError> {
        self.enter(Phase::Initializing);
        let ready = match self.module.initialize().await {
            Ok(ready) => ready,
            Err(err) => return Err(self.fail(BootError::Init(err))),
        };
        self.enter(Phase::Ready);

        let Some(window) = self.host.window() else {
            return Err(self.fail(BootError::WindowMissing));
        };
        let canvas = self.host.canvas_by_id(&self.config.canvas_id);
        if canvas.is_none() {
            log::warn!("no element #{} on the page", self.config.canvas_id);
        }

        let mut handle = match self.module.construct(ready, window, canvas) {
            Ok(handle) => handle,
            Err(err) => return Err(self.fail(BootError::Construct(err))),
        };
        if let Err(err) = handle.render() {
            return Err(self.fail(BootError::Render(err)));
        }

        self.enter(Phase::Rendered);
        Ok(handle)
    }

    fn enter(&mut self, phase: Phase) {
        log::debug!("boot phase {:?} -> {phase:?}", self.phase);
        self.phase = phase;
    }

    fn fail(&mut self, err: BootError) -> BootError {
        log::error!("boot aborted in {:?}: {err}", self.phase);
        self.phase = Phase::Failed;
        err
    }
}
