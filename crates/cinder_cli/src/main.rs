use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use cinder_core::{load_scene, MeshCache, Model, SceneDescription};
use cinder_math::{Camera, Vec3};
use cinder_renderer::{
    build_objects, tracer, FrameBuffer, RasterConfig, Rasterizer, TraceCamera, TraceConfig,
};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Position given to models added with `--mesh`.
const MESH_POSITION: Vec3 = Vec3::new(0.5, 0.0, 0.0);

#[derive(Debug, Parser)]
#[command(name = "cinder", version, about = "Render a scene with the rasterizer or the ray tracer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rasterize mesh models
    Raster(RasterArgs),
    /// Ray trace spheres
    Trace(TraceArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Scene description (JSON). Built-in defaults are used without one.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Output PNG. With several frames, an index is appended to the name.
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Number of consecutive frames to render
    #[arg(long, default_value_t = 1)]
    frames: u32,
}

#[derive(Debug, Args)]
struct RasterArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Extra OBJ mesh to draw at (0.5, 0, 0); may be repeated
    #[arg(long)]
    mesh: Vec<PathBuf>,

    /// Camera yaw in degrees (-90 looks down -Z); requires --pitch
    #[arg(long, allow_hyphen_values = true, requires = "pitch")]
    yaw: Option<f32>,

    /// Camera pitch in degrees
    #[arg(long, allow_hyphen_values = true, requires = "yaw")]
    pitch: Option<f32>,
}

#[derive(Debug, Args)]
struct TraceArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Samples per pixel (values below 1 become 1)
    #[arg(long, allow_hyphen_values = true)]
    samples: Option<i64>,

    /// Maximum bounces per ray (values below 1 become 1)
    #[arg(long, allow_hyphen_values = true)]
    bounces: Option<i64>,

    /// Seed for the random generator; random if not given
    #[arg(long)]
    seed: Option<u64>,

    /// Apply gamma 2 to the output
    #[arg(long)]
    gamma: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Raster(args) => run_raster(args),
        Command::Trace(args) => run_trace(args),
    }
}

/// Load the scene file if one was given and apply the size overrides.
fn load_description(common: &CommonArgs) -> Result<SceneDescription> {
    let mut scene = match &common.scene {
        Some(path) => {
            load_scene(path).with_context(|| format!("Failed to load scene {}", path.display()))?
        }
        None => SceneDescription::default(),
    };

    if let Some(width) = common.width {
        scene.width = width;
    }
    if let Some(height) = common.height {
        scene.height = height;
    }
    ensure!(
        scene.width > 0 && scene.height > 0,
        "Image size must be nonzero, got {}x{}",
        scene.width,
        scene.height
    );

    Ok(scene)
}

fn run_raster(args: RasterArgs) -> Result<()> {
    let scene = load_description(&args.common)?;
    let raster = &scene.raster;

    let camera = match (args.yaw, args.pitch) {
        (Some(yaw), Some(pitch)) => {
            Camera::from_yaw_pitch(Vec3::from_array(raster.camera.position), yaw, pitch)
        }
        _ => raster.camera(),
    };
    let config = RasterConfig::from(raster);

    let mut cache = MeshCache::new();
    let mut frame = FrameBuffer::new(scene.width, scene.height);
    let mut rasterizer = Rasterizer::new(scene.width, scene.height);

    for index in 0..args.common.frames {
        // Meshes edited on disk between frames are picked up here
        let mut models = raster.build_models(&mut cache);
        for path in &args.mesh {
            let mesh = cache.get(path);
            if mesh.is_empty() {
                log::warn!("Skipping mesh {}: nothing to draw", path.display());
                continue;
            }
            models.push(Model::new(mesh, MESH_POSITION));
        }
        if models.is_empty() {
            log::warn!("No models to draw, the image will be background only");
        }

        let start = Instant::now();
        let stats = rasterizer.render(&mut frame, &camera, &models, &config);
        log::info!(
            "Frame {}: {} triangles, {} culled, {} drawn, {} pixels in {:.2?}",
            index,
            stats.triangles,
            stats.culled,
            stats.drawn,
            stats.pixels_written,
            start.elapsed()
        );

        save_frame(&frame, &frame_path(&args.common.output, index, args.common.frames))?;
    }

    Ok(())
}

fn run_trace(args: TraceArgs) -> Result<()> {
    let mut scene = load_description(&args.common)?;
    let trace = &mut scene.trace;

    if let Some(samples) = args.samples {
        trace.samples_per_pixel = samples;
    }
    if let Some(bounces) = args.bounces {
        trace.max_bounces = bounces;
    }
    if let Some(seed) = args.seed {
        trace.seed = Some(seed);
    }
    trace.gamma_correct |= args.gamma;

    let camera = TraceCamera::from(&trace.camera);
    let config = TraceConfig::from(&*trace);
    let objects = build_objects(trace);

    // One generator for every frame, so frames differ but a seeded run
    // repeats exactly
    let mut rng = match trace.seed {
        Some(seed) => {
            log::info!("Seeding generator with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let mut frame = FrameBuffer::new(scene.width, scene.height);
    for index in 0..args.common.frames {
        let start = Instant::now();
        tracer::render(&mut frame, &camera, &objects, &config, &mut rng);
        log::info!(
            "Frame {}: {} object(s), {} spp, {} bounces in {:.2?}",
            index,
            objects.len(),
            config.samples_per_pixel,
            config.max_bounces,
            start.elapsed()
        );

        save_frame(&frame, &frame_path(&args.common.output, index, args.common.frames))?;
    }

    Ok(())
}

/// Output path for frame `index`: the path itself for a single frame,
/// otherwise `name_0003.png` style.
fn frame_path(output: &Path, index: u32, frames: u32) -> PathBuf {
    if frames <= 1 {
        return output.to_path_buf();
    }

    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{}_{:04}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{:04}", stem, index),
    };
    output.with_file_name(name)
}

fn save_frame(frame: &FrameBuffer, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        frame.as_bytes(),
        frame.width(),
        frame.height(),
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Wrote {}", path.display());
    Ok(())
}
