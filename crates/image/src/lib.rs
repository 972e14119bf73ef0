//! RGB frame buffers and the JPEG codec used by the streaming pipeline.
//!
//! Frames travel through the system JPEG-encoded; plugins that need pixels
//! decode them into an `Image`, draw on it, and encode it back.

pub mod draw;
pub mod error;
pub mod image;
pub mod jpeg;

pub use draw::{Rgb, draw_line, draw_polygon};
pub use error::ImageError;
pub use image::Image;
pub use jpeg::{jpeg_to_rgb, rgb_to_jpeg};
