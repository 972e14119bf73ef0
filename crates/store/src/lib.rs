//! Persistence boundary and tenant routing.
//!
//! Camera and employee documents live in per-tenant collections
//! (`camera_<tenant>`, `employee_<tenant>`); ROIs, algorithm descriptors,
//! instances and attendance records share fixed collections. Each request
//! resolves a `TenantScope` value and passes it down explicitly.

pub mod document;
pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod tenant;

pub use document::{Document, DocumentStore, Filter};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{AlgorithmDescriptor, Camera, Employee, RegionOfInterest};
pub use repository::Repository;
pub use tenant::{Entity, TenantRouter, TenantScope};
