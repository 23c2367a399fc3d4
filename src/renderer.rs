//! Rendering: WebGL2 context, shader programs and GPU buffers.
//!
//! This module is the only place that touches [`WebGl2RenderingContext`]. It
//! receives validated [`MeshData`] and shader sources and produces pixels; it
//! holds no application state of its own.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader};

use crate::error::AppError;
use crate::input::Viewport;
use crate::mesh::MeshData;

/// Owner of the canvas's WebGL2 context.
pub struct Renderer {
    pub gl: Gl,
}

impl Renderer {
    /// Acquire a `context_kind` context from `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ContextUnavailable`] if the canvas returns no
    /// context or one that is not WebGL2, and [`AppError::Js`] if
    /// `getContext` throws.
    pub fn new(canvas: &HtmlCanvasElement, context_kind: &str) -> Result<Self, AppError> {
        let gl = canvas
            .get_context(context_kind)?
            .ok_or_else(|| AppError::ContextUnavailable(context_kind.to_owned()))?
            .dyn_into::<Gl>()
            .map_err(|_| AppError::ContextUnavailable(context_kind.to_owned()))?;
        Ok(Self { gl })
    }

    /// Match the GL viewport to the drawing surface.
    pub fn set_viewport(&self, viewport: Viewport) {
        let (w, h) = viewport.gl_size();
        self.gl.viewport(0, 0, w, h);
    }

    /// Clear to `clear` and draw `geometry` with `material`.
    pub fn draw(&self, material: &Material, geometry: &Geometry, clear: [f32; 4]) {
        let [r, g, b, a] = clear;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(Gl::COLOR_BUFFER_BIT);

        self.gl.use_program(Some(&material.program));

        for (name, buffer) in &geometry.vertex_buffers {
            if let Some(attribute) = material.attributes.get(name) {
                self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
                self.gl.enable_vertex_attrib_array(attribute.location);
                self.gl
                    .vertex_attrib_pointer_with_i32(attribute.location, attribute.size, Gl::FLOAT, false, 0, 0);
            }
        }
        self.gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&geometry.index_buffer));

        self.gl
            .draw_elements_with_i32(Gl::TRIANGLES, geometry.index_count, Gl::UNSIGNED_BYTE, 0);

        self.gl.flush();
    }
}

struct Attribute {
    location: u32,
    size: i32,
}

/// A linked shader program and the locations of its vertex attributes.
pub struct Material {
    program: WebGlProgram,
    attributes: HashMap<String, Attribute>,
}

impl Material {
    /// Compile and link a program, then resolve `layout` attribute locations.
    ///
    /// Attributes the linked program does not use are left unbound.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Shader`] or [`AppError::Link`] with the driver's
    /// info log when compilation or linking fails.
    pub fn new(gl: &Gl, vertex_source: &str, fragment_source: &str, layout: &[(&str, i32)]) -> Result<Self, AppError> {
        let vertex_shader = compile_shader(gl, Gl::VERTEX_SHADER, vertex_source)?;
        let fragment_shader = compile_shader(gl, Gl::FRAGMENT_SHADER, fragment_source)?;
        let program = link_program(gl, &vertex_shader, &fragment_shader)?;

        let mut attributes = HashMap::new();
        for &(name, size) in layout {
            // -1 means the attribute is absent or optimised out.
            match u32::try_from(gl.get_attrib_location(&program, name)) {
                Ok(location) => {
                    attributes.insert(name.to_owned(), Attribute { location, size });
                }
                Err(_) => log::debug!("attribute {name} unused by program"),
            }
        }

        Ok(Self { program, attributes })
    }
}

fn compile_shader(gl: &Gl, shader_type: u32, source: &str) -> Result<WebGlShader, AppError> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| AppError::Shader("unable to create shader object".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(AppError::Shader(
            gl.get_shader_info_log(&shader)
                .unwrap_or_else(|| "unknown error creating shader".into()),
        ))
    }
}

fn link_program(gl: &Gl, vertex_shader: &WebGlShader, fragment_shader: &WebGlShader) -> Result<WebGlProgram, AppError> {
    let program = gl
        .create_program()
        .ok_or_else(|| AppError::Link("unable to create program object".into()))?;

    gl.attach_shader(&program, vertex_shader);
    gl.attach_shader(&program, fragment_shader);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(AppError::Link(
            gl.get_program_info_log(&program)
                .unwrap_or_else(|| "unknown error linking program".into()),
        ))
    }
}

/// Uploaded vertex streams and index buffer for one mesh.
pub struct Geometry {
    vertex_buffers: HashMap<String, WebGlBuffer>,
    index_buffer: WebGlBuffer,
    index_count: i32,
}

impl Geometry {
    /// Validate `mesh` and upload it as static buffers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Mesh`] if the mesh fails validation and
    /// [`AppError::Buffer`] if a buffer cannot be allocated.
    pub fn new(gl: &Gl, mesh: &MeshData) -> Result<Self, AppError> {
        mesh.validate()?;

        let mut vertex_buffers = HashMap::new();
        for attr in &mesh.attributes {
            vertex_buffers.insert(attr.name.clone(), create_vertex_buffer(gl, &attr.data)?);
        }
        let index_buffer = create_index_buffer(gl, &mesh.indices)?;

        Ok(Self { vertex_buffers, index_buffer, index_count: mesh.index_count() })
    }
}

fn create_vertex_buffer(gl: &Gl, data: &[f32]) -> Result<WebGlBuffer, AppError> {
    let buffer = gl.create_buffer().ok_or(AppError::Buffer)?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
    let view = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &view, Gl::STATIC_DRAW);
    gl.bind_buffer(Gl::ARRAY_BUFFER, None);
    Ok(buffer)
}

fn create_index_buffer(gl: &Gl, data: &[u8]) -> Result<WebGlBuffer, AppError> {
    let buffer = gl.create_buffer().ok_or(AppError::Buffer)?;
    gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&buffer));
    let view = js_sys::Uint8Array::from(data);
    gl.buffer_data_with_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, &view, Gl::STATIC_DRAW);
    gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, None);
    Ok(buffer)
}
