//! Scene types shared by the pipelines, and the JSON scene description.
//!
//! A scene file carries both a rasterizer section (camera + mesh models) and
//! a ray tracer section (camera, tunables, spheres). Either section may be
//! omitted; missing fields take the defaults below.
//!
//! ```json
//! {
//!   "width": 800,
//!   "height": 450,
//!   "raster": {
//!     "camera": { "position": [0, 0, 10], "direction": [0, 0, -1] },
//!     "models": [{ "mesh": "head.obj", "position": [0.5, 0, 0] }]
//!   },
//!   "trace": {
//!     "samples_per_pixel": 4,
//!     "max_bounces": 5,
//!     "seed": 7,
//!     "spheres": [{ "center": [0, 0, -1], "radius": 0.5, "color": [200, 10, 10] }]
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cinder_math::{
    translate, Camera, Color, Mat4, Vec3, DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR,
};
use serde::Deserialize;
use thiserror::Error;

use crate::cache::MeshCache;
use crate::mesh::Mesh;

/// A mesh placed in the world. Translation only.
#[derive(Clone, Debug)]
pub struct Model {
    /// Shared mesh geometry
    pub mesh: Arc<Mesh>,

    /// World-space position
    pub position: Vec3,
}

impl Model {
    /// Create a model at `position`.
    pub fn new(mesh: Arc<Mesh>, position: Vec3) -> Self {
        Self { mesh, position }
    }

    /// Get the 4x4 model matrix for this model.
    pub fn model_matrix(&self) -> Mat4 {
        translate(self.position)
    }
}

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top level of a scene file.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub width: u32,
    pub height: u32,
    pub raster: RasterDescription,
    pub trace: TraceDescription,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            raster: RasterDescription::default(),
            trace: TraceDescription::default(),
        }
    }
}

impl SceneDescription {
    /// Parse a scene from JSON text. Relative mesh paths are left as-is.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Load a scene file. Relative mesh paths are resolved against the
/// directory containing the scene file.
pub fn load_scene(path: impl AsRef<Path>) -> Result<SceneDescription, SceneError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut scene = SceneDescription::from_json(&source).map_err(|source| SceneError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(dir) = path.parent() {
        for model in &mut scene.raster.models {
            if model.mesh.is_relative() {
                model.mesh = dir.join(&model.mesh);
            }
        }
    }

    log::info!(
        "Loaded scene {}: {} model(s), {} sphere(s)",
        path.display(),
        scene.raster.models.len(),
        scene.trace.spheres.len()
    );
    Ok(scene)
}

/// Rasterizer section.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RasterDescription {
    pub camera: CameraDescription,
    pub background: [u8; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub models: Vec<ModelDescription>,
}

impl Default for RasterDescription {
    fn default() -> Self {
        Self {
            camera: CameraDescription::default(),
            background: [0, 0, 0],
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            models: Vec::new(),
        }
    }
}

impl RasterDescription {
    pub fn camera(&self) -> Camera {
        Camera::new(
            Vec3::from_array(self.camera.position),
            Vec3::from_array(self.camera.direction),
        )
    }

    pub fn background(&self) -> Color {
        Color::from(self.background)
    }

    /// Resolve every model's mesh through `cache`.
    ///
    /// Models whose mesh failed to load (empty) are left out.
    pub fn build_models(&self, cache: &mut MeshCache) -> Vec<Model> {
        self.models
            .iter()
            .filter_map(|desc| {
                let mesh = cache.get(&desc.mesh);
                if mesh.is_empty() {
                    log::warn!("Skipping model {}: mesh is empty", desc.mesh.display());
                    return None;
                }
                Some(Model::new(mesh, Vec3::from_array(desc.position)))
            })
            .collect()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub position: [f32; 3],
    pub direction: [f32; 3],
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 10.0],
            direction: [0.0, 0.0, -1.0],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ModelDescription {
    pub mesh: PathBuf,
    #[serde(default)]
    pub position: [f32; 3],
}

/// Ray tracer section.
///
/// Sample and bounce counts are stored as read; use the accessors, which
/// clamp them to at least 1.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TraceDescription {
    pub camera: TraceCameraDescription,
    pub samples_per_pixel: i64,
    pub max_bounces: i64,
    pub seed: Option<u64>,
    pub gamma_correct: bool,
    pub spheres: Vec<SphereDescription>,
}

impl Default for TraceDescription {
    fn default() -> Self {
        Self {
            camera: TraceCameraDescription::default(),
            samples_per_pixel: 1,
            max_bounces: 5,
            seed: None,
            gamma_correct: false,
            spheres: vec![
                SphereDescription {
                    center: [0.0, 0.0, -1.0],
                    radius: 0.5,
                    color: [200, 10, 10],
                },
                SphereDescription {
                    center: [0.0, -100.5, -1.0],
                    radius: 100.0,
                    color: [10, 10, 210],
                },
            ],
        }
    }
}

impl TraceDescription {
    pub fn samples_per_pixel(&self) -> u32 {
        clamp_count("samples_per_pixel", self.samples_per_pixel)
    }

    pub fn max_bounces(&self) -> u32 {
        clamp_count("max_bounces", self.max_bounces)
    }
}

fn clamp_count(name: &str, value: i64) -> u32 {
    if value < 1 {
        log::warn!("{} = {} is below 1, using 1", name, value);
        return 1;
    }
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Ray tracer camera. `direction` points backwards, from the scene towards
/// the eye, and the image plane sits `focal_length` in front of the eye.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TraceCameraDescription {
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub up: [f32; 3],
    pub focal_length: f32,
}

impl Default for TraceCameraDescription {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            direction: [0.0, 0.0, 1.0],
            up: [0.0, 1.0, 0.0],
            focal_length: 3.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SphereDescription {
    pub center: [f32; 3],
    pub radius: f32,
    /// 8-bit RGB
    pub color: [u8; 3],
}
