//! SR3D Core Library - software 3D rasterization
//!
//! Turns triangle meshes into pixels on the CPU: homogeneous math, plane
//! clipping, flat and perspective-correct textured scanline fills, and the
//! per-frame pipeline that orders them. Presentation, input and pacing live
//! in front-end crates.

pub mod clip;
pub mod color;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod queue;
pub mod raster;
pub mod texture;
pub mod transform;

// Re-export commonly used types
pub use clip::{Clipped, Plane};
pub use color::{Channel, Color};
pub use error::{Error, Result};
pub use framebuffer::Framebuffer;
pub use geometry::{Mesh, TexCoord, Triangle};
pub use math::{Mat4, Vec4};
pub use pipeline::{FrameStats, Pipeline, RenderConfig, RenderMode, Scene};
pub use projection::Camera;
pub use queue::{TriangleQueue, MAX_CLIP_FANOUT};
pub use texture::Texture;
pub use transform::{RotationState, Transform};
