//! HTTP surface of the inference service.

pub mod config;
pub mod docker;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use docker::{ContainerRuntime, DockerCli, RuntimeError};
pub use error::ApiError;
pub use routes::app;
pub use state::AppState;

use algorithm::{PluginRegistry, roi_overlay};

/// Plugins compiled into the service.
pub fn default_registry(config: &ServerConfig) -> PluginRegistry {
    PluginRegistry::new().with_plugin(roi_overlay::plugin(config.jpeg_quality()))
}
