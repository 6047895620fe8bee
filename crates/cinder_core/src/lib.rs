//! Cinder core - meshes, models and scene descriptions.
//!
//! This crate provides:
//!
//! - **Meshes**: `Mesh` and the OBJ-subset loader (`load_mesh`)
//! - **Mesh cache**: `MeshCache`, keyed by path and modification time
//! - **Scene types**: `Model` and the JSON `SceneDescription`
//!
//! # Example
//!
//! ```ignore
//! use cinder_core::{load_scene, MeshCache};
//!
//! let scene = load_scene("scene.json")?;
//! let mut cache = MeshCache::new();
//! let models = scene.raster.build_models(&mut cache);
//! ```

pub mod cache;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use cache::MeshCache;
pub use mesh::{load_mesh, parse_mesh, try_load_mesh, Mesh, MeshError};
pub use scene::{load_scene, Model, SceneDescription, SceneError};
