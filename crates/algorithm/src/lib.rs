//! Plugin algorithms and their dispatch.
//!
//! Plugins register their actions with a `PluginRegistry` at startup. At request
//! time an algorithm descriptor from the store names the plugin, and the
//! registry hands back an `Invocable` for the requested action. Payloads and
//! results are `Value` trees.

pub mod error;
pub mod plugin;
pub mod registry;
pub mod roi_overlay;
pub mod value;

pub use error::{InvokeError, RegistryError};
pub use plugin::{Invocable, Plugin};
pub use registry::{PluginRegistry, module_path};
pub use value::Value;
