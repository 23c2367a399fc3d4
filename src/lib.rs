//! WebGL2 application and its page bootstrap, compiled to WebAssembly.
//!
//! On page load the crate applies its stylesheet, initializes the application
//! module, binds one [`app::App`] to the window and the `#webgl` canvas, and
//! renders a single frame. Pointer and resize listeners are only attached when
//! [`config::BootConfig::input_enabled`] is set.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`boot`] | Bootstrap sequence over the `Host` / `AppModule` / `AppHandle` traits |
//! | [`web`] | Browser implementations of those traits and the page-load trigger |
//! | [`app`] | The exported `App` handle and its testable [`app::AppCore`] |
//! | [`renderer`] | WebGL2 context, shader programs and GPU buffers |
//! | [`mesh`] | CPU-side vertex/index data and its validation |
//! | [`input`] | Input messages, the press state machine and viewport sizing |
//! | [`live`] | The page's live handle and the listeners that must go with it |
//! | [`config`] | Boot configuration parsed from JSON |
//! | [`error`] | Application error type |
//! | [`consts`] | Element ids, shader sources and other constants |

pub mod app;
pub mod boot;
pub mod config;
pub mod consts;
pub mod error;
pub mod input;
pub mod live;
pub mod mesh;
pub mod renderer;
pub mod web;

use wasm_bindgen::prelude::*;

use crate::config::BootConfig;

/// Module start hook: installs panic and log forwarding to the browser
/// console, then (with the `autostart` feature) schedules the boot sequence.
///
/// # Errors
///
/// Rejects if the page-load listener cannot be registered.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Trace) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }
    log::set_max_level(log::LevelFilter::Info);

    #[cfg(feature = "autostart")]
    web::on_page_load(BootConfig::default())?;

    Ok(())
}

/// Boot the page by hand, for hosts built without `autostart`.
///
/// `config_json` is a JSON object of [`BootConfig`] fields; omitted fields
/// keep their defaults.
///
/// # Errors
///
/// Rejects with a message if the config is invalid or any boot step fails.
#[wasm_bindgen]
pub async fn boot_page(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(raw) => BootConfig::from_json(&raw).map_err(|err| JsValue::from_str(&err.to_string()))?,
        None => BootConfig::default(),
    };
    web::boot(config).await.map_err(JsValue::from)
}
