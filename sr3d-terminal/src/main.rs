//! SR3D Terminal Demo - Rotating Model
//!
//! Renders an OBJ model (or a cube) with the software rasterizer.
//! Controls:
//!   - W/S: Walk forward / back
//!   - A/D: Turn
//!   - Arrow Keys: Move up / down, strafe
//!   - 1-4: Wireframe, solid, solid + wireframe, textured
//!   - Space: Pause rotation
//!   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sr3d_core::{obj, Color, Mesh, RenderConfig, RenderMode, Texture};
use sr3d_terminal::{AppConfig, TerminalApp};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sr3d-terminal", version, about = "Software 3D rasterizer in the terminal")]
struct Args {
    /// Wavefront OBJ model to display (default: a cube)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Image used in textured mode (default: a checkerboard)
    #[arg(short, long)]
    texture: Option<PathBuf>,

    /// wireframe, solid, solid-wireframe or textured
    #[arg(long, default_value = "solid")]
    mode: RenderMode,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Terminal cells per logical pixel
    #[arg(long, default_value_t = 1)]
    scale: usize,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; redirect stderr to keep it off the rendered frame
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    let mesh = match &args.model {
        Some(path) => obj::load_obj(path)
            .with_context(|| format!("Failed to load model {}", path.display()))?,
        None => Mesh::cube(2.0),
    };

    let texture = match &args.texture {
        Some(path) => Texture::load(path)
            .with_context(|| format!("Failed to load texture {}", path.display()))?,
        None => Texture::checkerboard(64, 8, Color::WHITE, Color::from_rgb(40, 90, 160)),
    };

    let config = AppConfig {
        render: RenderConfig {
            scale: args.scale,
            fov_degrees: args.fov,
            mode: args.mode,
            ..RenderConfig::default()
        },
        fps: args.fps,
        ..AppConfig::default()
    };

    info!("Starting terminal renderer with {} triangles (press Q to quit)", mesh.len());
    let mut app = TerminalApp::new(mesh, Some(texture), config)?;
    app.run()?;

    Ok(())
}
