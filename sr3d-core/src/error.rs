//! Error types for SR3D

use thiserror::Error;

/// Main error type for SR3D operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Index {index} on line {line} is out of range ({count} available)")]
    InvalidIndex { line: usize, index: i64, count: usize },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture data of {len} bytes does not describe a {width}x{height} RGBA image")]
    InvalidTexture { width: usize, height: usize, len: usize },

    #[error("Triangle queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Unknown render mode '{0}' (expected wireframe, solid, solid-wireframe or textured)")]
    UnknownMode(String),
}

/// Result type alias for SR3D operations
pub type Result<T> = std::result::Result<T, Error>;
