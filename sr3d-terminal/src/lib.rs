//! Terminal front end for the SR3D software rasterizer
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info};
use sr3d_core::math::vec3;
use sr3d_core::{FrameStats, Mesh, Pipeline, RenderConfig, Scene, Texture};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod input;
pub mod surface;

pub use input::{apply, poll_input, InputAction, InputState};
pub use surface::TerminalSurface;

/// Terminal rows reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Runtime options for [`TerminalApp`]
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub fps: u32,
    /// Model rotation speed in radians per second
    pub spin: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            fps: 30,
            spin: 1.0,
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    texture: Option<Texture>,
    config: AppConfig,
    scene: Scene,
    pipeline: Pipeline,
    surface: TerminalSurface,
    running: bool,
    paused: bool,
    last_stats: FrameStats,
    last_second: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, texture: Option<Texture>, config: AppConfig) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let surface = TerminalSurface::for_terminal(cols, rows, STATUS_ROWS, config.render.scale);
        let scene = Scene::new(config.render.camera(vec3(0.0, 0.0, 0.0)));

        Ok(Self {
            mesh,
            texture,
            config,
            scene,
            pipeline: Pipeline::new(config.render),
            surface,
            running: true,
            paused: false,
            last_stats: FrameStats::default(),
            last_second: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        info!("Terminal renderer started ({} triangles)", self.mesh.len());

        let result = self.main_loop();

        // Cleanup runs on error too
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        info!("Terminal renderer stopped");

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs(1) / self.config.fps.max(1);
        let mut last_update = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            let input = poll_input(Duration::ZERO)?;
            let dt = last_update.elapsed().as_secs_f32();
            last_update = Instant::now();
            self.handle_input(input, target_frame_time.as_secs_f32())?;

            // Update
            self.update(dt);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_second).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_second).as_secs_f32();
                self.frame_count = 0;
                self.last_second = now;
                debug!("{:.1} fps, last frame: {}", self.fps, self.last_stats);
            }
        }

        Ok(())
    }

    /// Key presses arrive as discrete repeats, each worth one frame of motion
    fn handle_input(&mut self, input: InputState, step: f32) -> io::Result<()> {
        if input.quit {
            self.running = false;
        }
        if let Some((cols, rows)) = input.resized {
            self.surface.resize(cols, rows);
            execute!(stdout(), terminal::Clear(ClearType::All))?;
        }
        for action in input.actions {
            match action {
                InputAction::SetMode(mode) => {
                    info!("Render mode: {}", mode);
                    self.pipeline.set_mode(mode);
                }
                InputAction::TogglePause => self.paused = !self.paused,
                _ => self.scene.camera = apply(&self.scene.camera, action, step),
            }
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        if !self.paused {
            // Slow tumble for demo effect
            let angle = self.config.spin * dt;
            self.scene.rotation.rotate(angle * 0.5, 0.0, angle);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let fb = self.surface.begin_frame();
        self.last_stats = self
            .pipeline
            .render(&self.mesh, &self.scene, self.texture.as_ref(), fb);

        let mut stdout = stdout();
        self.surface.end_frame(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "SR3D | {:.1} fps | {} | {} tris | WS=walk AD=turn arrows=move 1-4=mode space=pause Q=quit",
                self.fps,
                self.pipeline.mode(),
                self.last_stats.rasterized
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
