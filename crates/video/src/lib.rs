//! Frame sources for the streaming pipeline.
//!
//! A source is opened from a URL and yields JPEG frames through the
//! `FrameSource` trait. Capture runs on its own task so that a slow consumer
//! never stalls the upstream connection; the buffering depth decides whether
//! frames queue up or only the newest one is kept.

pub mod config;
pub mod error;
pub mod source;
pub mod videoframe;
pub mod videoin;

pub use config::VideoInConfig;
pub use error::VideoError;
pub use source::{FrameSource, SourceOpener, VideoOpener};
pub use videoframe::VideoFrame;
pub use videoin::VideoIn;
