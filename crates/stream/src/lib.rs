//! Live camera sessions.
//!
//! A `Pipeline` turns a camera request into a `StreamSession`: it resolves the
//! camera, its ROIs and the algorithm up front, opens the frame source, and
//! then runs a producer loop that pushes multipart parts into a bounded
//! channel drained by the HTTP response.

pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;

pub use config::StreamConfig;
pub use context::RoiContext;
pub use error::StreamError;
pub use pipeline::{Pipeline, StreamReport, StreamRequest, StreamSession, StreamState};
