use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use crate::boot::AppHandle;
use crate::config::BootConfig;
use crate::consts::{FRAGMENT_SHADER, VERTEX_SHADER};
use crate::error::AppError;
use crate::input::{Action, InputEvent, InputState, Point, Viewport};
use crate::mesh::MeshData;
use crate::renderer::{Geometry, Material, Renderer};

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

/// Application state that doesn't depend on the browser.
///
/// Separated from `App` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Clone)]
pub struct AppCore {
    pub viewport: Viewport,
    pub input: InputState,
    pub clear_color: [f32; 4],
    pub context_kind: String,
    frames_rendered: u32,
}

impl AppCore {
    #[must_use]
    pub fn new(config: &BootConfig) -> Self {
        Self {
            viewport: Viewport::default(),
            input: InputState::default(),
            clear_color: config.clear_color,
            context_kind: config.context_kind.clone(),
            frames_rendered: 0,
        }
    }

    /// Feed one input message through the state machine.
    pub fn handle(&mut self, event: InputEvent) -> Action {
        self.input.apply(event)
    }

    /// Adopt a new viewport. Returns whether the size changed.
    pub fn resize_to(&mut self, viewport: Viewport) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        true
    }

    pub fn record_frame(&mut self) {
        self.frames_rendered = self.frames_rendered.saturating_add(1);
    }

    #[must_use]
    pub fn frames_rendered(&self) -> u32 {
        self.frames_rendered
    }
}

/// The application handle exported to JavaScript.
///
/// Owns the window, the canvas, and everything uploaded to the canvas's
/// WebGL2 context.
#[wasm_bindgen]
pub struct App {
    window: Window,
    canvas: HtmlCanvasElement,
    renderer: Renderer,
    material: Material,
    geometry: Geometry,
    core: AppCore,
}

#[wasm_bindgen]
impl App {
    /// Bind to `window` and `canvas` with the default configuration.
    ///
    /// # Errors
    ///
    /// Rejects with a message if the context, shaders or buffers fail.
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Result<App, JsValue> {
        Self::with_config(window, canvas, &BootConfig::default()).map_err(JsValue::from)
    }

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Rejects if the WebGL context has been lost.
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.draw().map_err(JsValue::from)
    }

    /// # Errors
    ///
    /// Never rejects today; the signature matches the other input entry points.
    pub fn mouse_down(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.dispatch(InputEvent::PointerDown(Point::new(x, y))).map_err(JsValue::from)
    }

    /// # Errors
    ///
    /// Never rejects today; the signature matches the other input entry points.
    pub fn mouse_move(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.dispatch(InputEvent::PointerMove(Point::new(x, y))).map_err(JsValue::from)
    }

    /// # Errors
    ///
    /// Never rejects today; the signature matches the other input entry points.
    pub fn mouse_up(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.dispatch(InputEvent::PointerUp(Point::new(x, y))).map_err(JsValue::from)
    }

    /// Re-fit the canvas to the window and redraw if the size changed.
    ///
    /// # Errors
    ///
    /// Rejects if the window size cannot be read or the redraw fails.
    pub fn resize(&mut self) -> Result<(), JsValue> {
        self.dispatch(InputEvent::Resize).map_err(JsValue::from)
    }

    /// Number of frames drawn since construction.
    #[must_use]
    #[wasm_bindgen(getter)]
    pub fn frames_rendered(&self) -> u32 {
        self.core.frames_rendered()
    }
}

impl App {
    /// Size the canvas to the window, acquire the context and upload the scene.
    ///
    /// # Errors
    ///
    /// Returns the first [`AppError`] from sizing, context acquisition, shader
    /// compilation or buffer upload.
    pub fn with_config(window: Window, canvas: HtmlCanvasElement, config: &BootConfig) -> Result<Self, AppError> {
        let viewport = read_viewport(&window)?;
        canvas.set_width(viewport.width);
        canvas.set_height(viewport.height);

        let renderer = Renderer::new(&canvas, &config.context_kind)?;
        renderer.set_viewport(viewport);

        let mesh = MeshData::triangle();
        let material = Material::new(&renderer.gl, VERTEX_SHADER, FRAGMENT_SHADER, &mesh.layout())?;
        let geometry = Geometry::new(&renderer.gl, &mesh)?;

        let mut core = AppCore::new(config);
        core.resize_to(viewport);
        log::info!("app bound to {}x{} canvas", viewport.width, viewport.height);

        Ok(Self { window, canvas, renderer, material, geometry, core })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn draw(&mut self) -> Result<(), AppError> {
        if self.renderer.gl.is_context_lost() {
            return Err(AppError::ContextUnavailable(self.core.context_kind.clone()));
        }
        self.renderer
            .draw(&self.material, &self.geometry, self.core.clear_color);
        self.core.record_frame();
        Ok(())
    }

    fn dispatch(&mut self, event: InputEvent) -> Result<(), AppError> {
        match self.core.handle(event) {
            Action::None => Ok(()),
            Action::ResizeNeeded => self.refit(),
        }
    }

    fn refit(&mut self) -> Result<(), AppError> {
        let viewport = read_viewport(&self.window)?;
        if !self.core.resize_to(viewport) {
            return Ok(());
        }
        log::debug!("resized to {}x{}", viewport.width, viewport.height);
        self.canvas.set_width(viewport.width);
        self.canvas.set_height(viewport.height);
        self.renderer.set_viewport(viewport);
        self.draw()
    }
}

impl AppHandle for App {
    fn render(&mut self) -> Result<(), AppError> {
        self.draw()
    }

    fn deliver(&mut self, event: InputEvent) -> Result<(), AppError> {
        self.dispatch(event)
    }
}

fn read_viewport(window: &Window) -> Result<Viewport, AppError> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(Viewport::from_inner_size(width, height))
}
