//! asset-flow
//!
//! A library for reconstructing meshes and scene graphs out of version-tagged
//! game asset containers. The container format itself is parsed elsewhere;
//! this crate takes the typed field trees a container parser produces and
//! turns them into flat, typed geometry (positions, normals, tangents,
//! colors, UV channels, triangle indices, submesh ranges) plus a navigable
//! object hierarchy with world transforms, bounds and ray picking. That is
//! enough to preview an asset tree without the engine that authored it.
//!
//! High-level modules
//! - `error`: the error taxonomy shared across decoding and assembly
//! - `fields`: typed field tree access and the container record contracts
//! - `formats`: vertex format tables per container generation
//! - `data_structures`: reconstructed data models (meshes, transforms, scenes)
//! - `resources`: the decoding/assembly passes that populate them
//!

pub mod data_structures;
pub mod error;
pub mod fields;
pub mod formats;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use data_structures::mesh::{Mesh, Submesh, Topology};
pub use data_structures::scene_graph::{Aabb, Ray, Scene, SceneObject};
pub use error::AssetError;
