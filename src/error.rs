//! Errors shared by the decoding and assembly passes.

use thiserror::Error;

/// Errors produced while reconstructing geometry from a container record.
///
/// Format and decode errors abort the mesh they occur in; the scene builder
/// downgrades them to a missing mesh/texture on the affected object instead
/// of failing the whole load.
#[derive(Debug, Error)]
pub enum AssetError {
    /// A vertex format code outside the container generation's table.
    #[error("unsupported vertex format code {0}")]
    UnsupportedFormat(u8),

    /// The vertex data blob could not be obtained from any source.
    #[error("could not locate vertex data: {0}")]
    MissingResource(String),

    /// A structurally required field is absent or has the wrong shape.
    #[error("record field `{0}` is missing or malformed")]
    MalformedRecord(&'static str),
}
