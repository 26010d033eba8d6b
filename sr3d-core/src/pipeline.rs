//! Per-frame geometry-to-pixel pipeline
//!
//! For every mesh triangle: world transform, back-face cull, flat shade,
//! view transform, near-plane clip, projection and perspective divide,
//! screen-edge clip. The surviving fragments are ordered back to front
//! (painter's algorithm, no depth buffer) and rasterized.
use std::fmt;
use std::str::FromStr;

use log::{debug, trace, warn};

use crate::clip::{clip_to_screen, clip_triangle, Plane};
use crate::color::Color;
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Mesh, TexCoord, Triangle};
use crate::math::{direction, divide, dot, multiply, multiply_vec, normalize, vec3, Mat4, Vec4};
use crate::projection::Camera;
use crate::queue::TriangleQueue;
use crate::raster::{draw_triangle, fill_textured_triangle, fill_triangle};
use crate::texture::Texture;
use crate::transform::{RotationState, Transform};

/// Outline color drawn over filled faces in [`RenderMode::SolidWireframe`]
const WIRE_COLOR: Color = Color::BLACK;

/// How fragments are written to the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    Wireframe,
    #[default]
    Solid,
    SolidWireframe,
    Textured,
}

impl RenderMode {
    pub const ALL: [RenderMode; 4] = [
        RenderMode::Wireframe,
        RenderMode::Solid,
        RenderMode::SolidWireframe,
        RenderMode::Textured,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Wireframe => "wireframe",
            RenderMode::Solid => "solid",
            RenderMode::SolidWireframe => "solid-wireframe",
            RenderMode::Textured => "textured",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownMode(s.to_string()))
    }
}

/// Rendering parameters fixed for the lifetime of a [`Pipeline`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Logical framebuffer width in pixels
    pub width: usize,
    /// Logical framebuffer height in pixels
    pub height: usize,
    pub scale: usize,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Lower bound of the flat shade so unlit faces stay visible
    pub min_shade: f32,
    pub mode: RenderMode,
    pub clear_color: Color,
    /// Tint applied to every triangle before shading
    pub base_color: Color,
}

impl RenderConfig {
    /// A framebuffer matching this configuration
    pub fn framebuffer(&self) -> Framebuffer {
        Framebuffer::new(self.width, self.height, self.scale)
    }

    /// A camera at `position` using this configuration's lens
    pub fn camera(&self, position: Vec4) -> Camera {
        Camera {
            position,
            fov_degrees: self.fov_degrees,
            near: self.near,
            far: self.far,
            ..Camera::default()
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 128,
            scale: 1,
            fov_degrees: 90.0,
            near: 0.1,
            far: 1000.0,
            min_shade: 0.1,
            mode: RenderMode::Solid,
            clear_color: Color::BLACK,
            base_color: Color::WHITE,
        }
    }
}

/// Everything that changes between frames: camera, model pose and light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    /// Model rotation, applied before `offset`
    pub rotation: RotationState,
    /// Model translation in world space
    pub offset: Vec4,
    /// Direction towards the light
    pub light: Vec4,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    /// Model-to-world matrix
    pub fn world_matrix(&self) -> Mat4 {
        multiply(
            &Transform::rotation(&self.rotation),
            &Transform::translation(self.offset.x, self.offset.y, self.offset.z),
        )
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            rotation: RotationState::zero(),
            offset: direction(0.0, 0.0, 3.0),
            light: direction(0.0, 1.0, -1.0),
        }
    }
}

/// Triangle counts for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Mesh triangles entering the pipeline
    pub submitted: usize,
    /// Facing away from the camera
    pub culled: usize,
    /// Entirely behind the near plane
    pub near_clipped: usize,
    /// Entirely outside the viewport
    pub screen_clipped: usize,
    /// Fragments lost to clip queue overflow
    pub dropped: usize,
    /// Fragments drawn
    pub rasterized: usize,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} submitted, {} culled, {} near-clipped, {} off-screen, {} dropped, {} drawn",
            self.submitted,
            self.culled,
            self.near_clipped,
            self.screen_clipped,
            self.dropped,
            self.rasterized
        )
    }
}

/// Software render pipeline.
///
/// Holds the clip queue and fragment list so they are reused from frame to
/// frame; neither is shared between triangles' clip cascades.
#[derive(Debug)]
pub struct Pipeline {
    config: RenderConfig,
    queue: TriangleQueue,
    fragments: Vec<Triangle>,
    warned_missing_texture: bool,
}

impl Pipeline {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            queue: TriangleQueue::new(),
            fragments: Vec::new(),
            warned_missing_texture: false,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn mode(&self) -> RenderMode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.config.mode = mode;
    }

    /// Clear `fb` and draw `mesh` as seen from `scene.camera`.
    ///
    /// In [`RenderMode::Textured`] with no texture, faces are filled flat.
    pub fn render(
        &mut self,
        mesh: &Mesh,
        scene: &Scene,
        texture: Option<&Texture>,
        fb: &mut Framebuffer,
    ) -> FrameStats {
        let mut stats = FrameStats {
            submitted: mesh.len(),
            ..FrameStats::default()
        };
        fb.clear(self.config.clear_color);
        self.fragments.clear();

        let (width, height) = (fb.width(), fb.height());
        let world = scene.world_matrix();
        let view = scene.camera.view_matrix();
        let projection = scene.camera.projection_matrix(width, height);
        let near_plane = Plane::new(vec3(0.0, 0.0, scene.camera.near), direction(0.0, 0.0, 1.0));
        let light = normalize(&scene.light);

        for (index, source) in mesh.iter().enumerate() {
            let world_tri = source.map_vertices(|v| multiply_vec(&world, v));
            let normal = world_tri.calculate_normal();
            let to_face = world_tri.vertices[0] - scene.camera.position;
            if dot(&normal, &to_face) >= 0.0 {
                trace!("triangle {}: back-facing", index);
                stats.culled += 1;
                continue;
            }

            let shade = dot(&normal, &light).max(self.config.min_shade);
            let color = source.color.modulate(self.config.base_color).shaded(shade);
            let view_tri = world_tri
                .map_vertices(|v| multiply_vec(&view, v))
                .with_color(color);

            let clipped = clip_triangle(&near_plane, &view_tri);
            if clipped.is_empty() {
                trace!("triangle {}: behind the near plane", index);
                stats.near_clipped += 1;
                continue;
            }

            let mut visible = false;
            for piece in clipped {
                let screen = project(&piece, &projection, width as f32, height as f32);
                clip_to_screen(&screen, width, height, &mut self.queue);
                stats.dropped += self.queue.dropped();
                visible |= !self.queue.is_empty();
                self.fragments.extend(self.queue.drain());
            }
            if !visible {
                trace!("triangle {}: outside the viewport", index);
                stats.screen_clipped += 1;
            }
        }

        // Farthest first; the stable sort keeps mesh order among equal depths
        self.fragments
            .sort_by(|a, b| b.average_depth().total_cmp(&a.average_depth()));

        let mode = self.effective_mode(texture);
        for tri in &self.fragments {
            match (mode, texture) {
                (RenderMode::Wireframe, _) => draw_triangle(fb, tri, tri.color),
                (RenderMode::SolidWireframe, _) => {
                    fill_triangle(fb, tri, tri.color);
                    draw_triangle(fb, tri, WIRE_COLOR);
                }
                (RenderMode::Textured, Some(texture)) => fill_textured_triangle(fb, tri, texture),
                (RenderMode::Solid | RenderMode::Textured, _) => fill_triangle(fb, tri, tri.color),
            }
        }
        stats.rasterized = self.fragments.len();

        debug!("frame: {}", stats);
        stats
    }

    fn effective_mode(&mut self, texture: Option<&Texture>) -> RenderMode {
        if self.config.mode == RenderMode::Textured && texture.is_none() {
            if !self.warned_missing_texture {
                warn!("Textured mode without a texture, filling faces flat");
                self.warned_missing_texture = true;
            }
            return RenderMode::Solid;
        }
        self.config.mode
    }
}

/// Project a view-space triangle to pixel coordinates.
///
/// Texture coordinates become `(u/w, v/w, 1/w)` for perspective-correct
/// interpolation. The near-plane clip guarantees `w > 0`.
fn project(tri: &Triangle, projection: &Mat4, width: f32, height: f32) -> Triangle {
    let mut out = *tri;
    for i in 0..3 {
        let clip = multiply_vec(projection, &tri.vertices[i]);
        let w = clip.w;
        let t = tri.tex[i];
        out.tex[i] = TexCoord {
            u: t.u / w,
            v: t.v / w,
            w: 1.0 / w,
        };
        let ndc = divide(&clip, w);
        out.vertices[i] = vec3(
            (ndc.x + 1.0) * 0.5 * width,
            (ndc.y + 1.0) * 0.5 * height,
            ndc.z,
        );
    }
    out
}
