//! Polygon meshes and the OBJ-subset loader.
//!
//! Only two statements are understood:
//!
//! - `v x y z` adds a vertex (file order, 1-based when referenced)
//! - `f i1 i2 i3 ...` adds a face; anything after a `/` in an index token
//!   (texture or normal references) is ignored
//!
//! Every other line is skipped. Faces are kept with all their indices; the
//! rasterizer only reads the first three.

use std::path::{Path, PathBuf};

use cinder_math::Vec3;
use thiserror::Error;

/// Errors that can occur while reading a mesh file.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("failed to read mesh {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A polygon mesh: vertex positions plus faces indexing into them.
///
/// Invariant: every face index is `< vertices.len()`. The loader drops faces
/// that would break it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions in file order
    pub vertices: Vec<Vec3>,

    /// Faces as 0-based vertex indices, any length
    pub faces: Vec<Vec<usize>>,
}

impl Mesh {
    /// Create a mesh from vertices and faces.
    ///
    /// Faces referencing missing vertices are dropped.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Vec<usize>>) -> Self {
        let mut mesh = Self { vertices, faces };
        mesh.drop_invalid_faces();
        mesh
    }

    /// True when there is nothing to draw: a failed load gives an empty mesh.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The triangle formed by the first three indices of each face.
    ///
    /// Faces with fewer than three indices yield nothing.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.faces.iter().filter(|face| face.len() >= 3).map(|face| {
            [
                self.vertices[face[0]],
                self.vertices[face[1]],
                self.vertices[face[2]],
            ]
        })
    }

    fn drop_invalid_faces(&mut self) {
        let vertex_count = self.vertices.len();
        let before = self.faces.len();
        self.faces
            .retain(|face| face.iter().all(|&index| index < vertex_count));

        let dropped = before - self.faces.len();
        if dropped > 0 {
            log::warn!(
                "Dropped {} face(s) referencing vertices beyond the {} defined",
                dropped,
                vertex_count
            );
        }
    }
}

/// Parse mesh text.
///
/// Malformed `v` or `f` lines (missing or unparseable numbers, index 0) are
/// skipped.
pub fn parse_mesh(source: &str) -> Mesh {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (line_number, line) in source.lines().enumerate() {
        let mut tokens = line.split_whitespace();

        let parsed = match tokens.next() {
            Some("v") => parse_vertex(tokens).map(|v| vertices.push(v)),
            Some("f") => parse_face(tokens).map(|f| faces.push(f)),
            _ => continue,
        };

        if parsed.is_none() {
            log::debug!("Skipping malformed line {}: {:?}", line_number + 1, line);
        }
    }

    Mesh::new(vertices, faces)
}

fn parse_vertex<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Vec3> {
    let mut coord = || tokens.next()?.parse::<f32>().ok();
    Some(Vec3::new(coord()?, coord()?, coord()?))
}

fn parse_face<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<Vec<usize>> {
    tokens
        .map(|token| {
            let index = token.split('/').next()?.parse::<usize>().ok()?;
            index.checked_sub(1)
        })
        .collect()
}

/// Read and parse a mesh file.
pub fn try_load_mesh(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_mesh(&source);
    log::info!(
        "Loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Load a mesh file, degrading to an empty mesh if it cannot be read.
///
/// The failure is logged and never propagated; check [`Mesh::is_empty`]
/// before relying on the result.
pub fn load_mesh(path: impl AsRef<Path>) -> Mesh {
    match try_load_mesh(path) {
        Ok(mesh) => mesh,
        Err(err) => {
            log::error!("{}", err);
            Mesh::default()
        }
    }
}
