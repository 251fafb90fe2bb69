//! Reconstructed data models: meshes, transforms, and scene graphs.
//!
//! This module contains the core data types the loading passes produce:
//!
//! - `mesh` holds the flattened geometry of one reconstructed mesh
//! - `transform` is the local position/rotation/scale triple with matrix composition
//! - `scene_graph` keeps the object hierarchy, world transforms, bounds and picking

pub mod mesh;
pub mod scene_graph;
pub mod transform;
