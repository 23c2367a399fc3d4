//! CPU-side vertex and index data, validated before upload.

use crate::consts::{ATTR_COLOR, ATTR_POSITION};
use crate::error::AppError;

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;

/// One named vertex attribute stream.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    /// Attribute name as declared in the vertex shader.
    pub name: String,
    /// Components per vertex (1..=4).
    pub size: u8,
    pub data: Vec<f32>,
}

impl VertexAttribute {
    #[must_use]
    pub fn new(name: &str, size: u8, data: Vec<f32>) -> Self {
        Self { name: name.to_owned(), size, data }
    }
}

/// Indexed triangle list with `u8` indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub attributes: Vec<VertexAttribute>,
    pub indices: Vec<u8>,
}

impl MeshData {
    /// A single triangle with red, green and blue corners.
    #[must_use]
    pub fn triangle() -> Self {
        Self {
            attributes: vec![
                VertexAttribute::new(ATTR_POSITION, 2, vec![0.0, 0.5, -0.5, -0.5, 0.5, -0.5]),
                VertexAttribute::new(ATTR_COLOR, 3, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]),
            ],
            indices: vec![0, 1, 2],
        }
    }

    /// Number of vertices shared by all attributes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Mesh`] when there are no attributes, an attribute
    /// size is outside `1..=4`, a stream is not a whole number of vertices, or
    /// streams disagree on the vertex count.
    pub fn vertex_count(&self) -> Result<usize, AppError> {
        let mut count = None;
        for attr in &self.attributes {
            if !(1..=4).contains(&attr.size) {
                return Err(AppError::Mesh(format!("attribute {} has size {}", attr.name, attr.size)));
            }
            let size = usize::from(attr.size);
            if !attr.data.len().is_multiple_of(size) {
                return Err(AppError::Mesh(format!(
                    "attribute {} has {} floats, not a multiple of {size}",
                    attr.name,
                    attr.data.len()
                )));
            }
            let n = attr.data.len() / size;
            match count {
                None => count = Some(n),
                Some(expected) if expected != n => {
                    return Err(AppError::Mesh(format!(
                        "attribute {} has {n} vertices, expected {expected}",
                        attr.name
                    )));
                }
                Some(_) => {}
            }
        }
        count.ok_or_else(|| AppError::Mesh("no vertex attributes".into()))
    }

    /// Check the whole mesh is drawable as a triangle list.
    ///
    /// # Errors
    ///
    /// Everything [`MeshData::vertex_count`] rejects, plus an index count that
    /// is zero or not a multiple of three, and any index past the last vertex.
    pub fn validate(&self) -> Result<(), AppError> {
        let vertices = self.vertex_count()?;
        if self.indices.is_empty() || !self.indices.len().is_multiple_of(3) {
            return Err(AppError::Mesh(format!("{} indices is not a whole triangle list", self.indices.len())));
        }
        if let Some(bad) = self.indices.iter().find(|i| usize::from(**i) >= vertices) {
            return Err(AppError::Mesh(format!("index {bad} out of range for {vertices} vertices")));
        }
        Ok(())
    }

    /// Index count as the `i32` expected by `drawElements`.
    #[must_use]
    pub fn index_count(&self) -> i32 {
        i32::try_from(self.indices.len()).unwrap_or(i32::MAX)
    }

    /// `(name, size)` pairs for binding attributes to a program.
    #[must_use]
    pub fn layout(&self) -> Vec<(&str, i32)> {
        self.attributes
            .iter()
            .map(|a| (a.name.as_str(), i32::from(a.size)))
            .collect()
    }
}
