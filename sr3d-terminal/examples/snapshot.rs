//! Example: Render a single frame of an OBJ file to stdout
//!
//! Usage: cargo run --example snapshot -- path/to/model.obj
use std::env;
use std::io::{self, Write};

use crossterm::terminal;
use sr3d_core::{obj, Mesh, Pipeline, RenderConfig, RotationState, Scene};
use sr3d_terminal::TerminalSurface;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mesh = match args.get(1) {
        Some(path) => {
            println!("Loading OBJ file: {}", path);
            obj::load_obj(path)?
        }
        None => {
            eprintln!("Usage: {} <obj-file>", args[0]);
            eprintln!("\nNo OBJ file provided, using default cube...");
            Mesh::cube(2.0)
        }
    };

    let (cols, rows) = terminal::size().unwrap_or((80, 24));
    let mut surface = TerminalSurface::for_terminal(cols, rows.saturating_sub(2), 0, 1);
    let fb = surface.begin_frame();
    let mut pipeline = Pipeline::new(RenderConfig {
        width: fb.width(),
        height: fb.height(),
        ..RenderConfig::default()
    });
    let scene = Scene {
        rotation: RotationState::new(0.5, 0.6, 0.0),
        ..Scene::default()
    };
    let stats = pipeline.render(&mesh, &scene, None, fb);

    let mut stdout = io::stdout();
    surface.end_frame(&mut stdout)?;
    writeln!(stdout, "\n{}", stats)?;
    Ok(())
}
