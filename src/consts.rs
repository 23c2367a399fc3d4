//! Shared constants for the WebGL application.

// ── Host lookup ─────────────────────────────────────────────────

/// Element id of the canvas the application binds to.
pub const CANVAS_ID: &str = "webgl";

/// Rendering context requested from the canvas.
pub const CONTEXT_KIND: &str = "webgl2";

/// Element id given to the injected `<style>` node so it is applied once.
pub const STYLESHEET_ID: &str = "webgl-app-style";

/// Page stylesheet, applied globally when the bootstrap sequence loads.
pub const STYLESHEET: &str = include_str!("../static/style.css");

// ── Rendering ───────────────────────────────────────────────────

/// Default clear colour (opaque black).
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Vertex attribute carrying clip-space positions.
pub const ATTR_POSITION: &str = "position";

/// Vertex attribute carrying per-vertex RGB colour.
pub const ATTR_COLOR: &str = "color";

pub const VERTEX_SHADER: &str = r"#version 300 es
in vec2 position;
in vec3 color;
out vec3 v_color;

void main() {
    v_color = color;
    gl_Position = vec4(position, 0.0, 1.0);
}
";

pub const FRAGMENT_SHADER: &str = r"#version 300 es
precision mediump float;
in vec3 v_color;
out vec4 out_color;

void main() {
    out_color = vec4(v_color, 1.0);
}
";
