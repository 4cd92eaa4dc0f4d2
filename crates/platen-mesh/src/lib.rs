//! Platen Mesh - triangle meshes for mass estimation
//!
//! Reads STL files (binary and ASCII, auto-detected) and computes the
//! mass properties the pricing engine needs:
//! - Volume via signed tetrahedra (robust to inverted normals)
//! - Mass from a material density in g/cm³
//!
//! Model units are assumed to be millimetres, the de-facto STL
//! convention for printable parts.

#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod mesh;
mod stl;

// Re-exports for convenience
pub use error::MeshError;
pub use mesh::{Triangle, TriangleMesh};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
