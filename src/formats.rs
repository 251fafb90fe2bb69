//! Vertex format tables for the three container generations.
//!
//! A mesh record never states what its attribute bytes mean directly; it
//! stores per-channel format codes whose meaning changed twice over the
//! container format's history. Everything version dependent lives here as
//! plain lookup tables: raw code to canonical format, element sizes, integer
//! classification, and the positional channel-to-semantic assignment.

use crate::error::AssetError;

/// Canonical vertex element formats. Raw per-version codes remap onto this
/// set before any byte is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexFormat {
    Float,
    Float16,
    UNorm8,
    SNorm8,
    UNorm16,
    SNorm16,
    UInt8,
    SInt8,
    UInt16,
    SInt16,
    UInt32,
    SInt32,
}

/// The canonical code order used verbatim by containers of major version
/// 2019 and newer.
const CANONICAL: [VertexFormat; 12] = [
    VertexFormat::Float,
    VertexFormat::Float16,
    VertexFormat::UNorm8,
    VertexFormat::SNorm8,
    VertexFormat::UNorm16,
    VertexFormat::SNorm16,
    VertexFormat::UInt8,
    VertexFormat::SInt8,
    VertexFormat::UInt16,
    VertexFormat::SInt16,
    VertexFormat::UInt32,
    VertexFormat::SInt32,
];

/// 2017/2018 code order. Code 2 is the legacy color channel format of that
/// era and stores unsigned normalized bytes.
const MIDDLE: [VertexFormat; 13] = [
    VertexFormat::Float,
    VertexFormat::Float16,
    VertexFormat::UNorm8,
    VertexFormat::UNorm8,
    VertexFormat::SNorm8,
    VertexFormat::UNorm16,
    VertexFormat::SNorm16,
    VertexFormat::UInt8,
    VertexFormat::SInt8,
    VertexFormat::UInt16,
    VertexFormat::SInt16,
    VertexFormat::UInt32,
    VertexFormat::SInt32,
];

/// Pre-2017 containers only knew five element kinds.
const LEGACY: [VertexFormat; 5] = [
    VertexFormat::Float,
    VertexFormat::Float16,
    VertexFormat::UNorm8,
    VertexFormat::UInt8,
    VertexFormat::UInt32,
];

impl VertexFormat {
    /// Remap a raw per-version format code onto the canonical set.
    ///
    /// Fails for any code outside the generation's table; the caller aborts
    /// the enclosing mesh decode in that case, there is no partial-channel
    /// recovery.
    pub fn from_raw(code: u8, version: u32) -> Result<Self, AssetError> {
        let table: &[VertexFormat] = if version >= 2019 {
            &CANONICAL
        } else if version >= 2017 {
            &MIDDLE
        } else {
            &LEGACY
        };
        table
            .get(code as usize)
            .copied()
            .ok_or(AssetError::UnsupportedFormat(code))
    }

    /// Size of one element in bytes.
    pub fn size(&self) -> usize {
        match self {
            VertexFormat::Float | VertexFormat::UInt32 | VertexFormat::SInt32 => 4,
            VertexFormat::Float16
            | VertexFormat::UNorm16
            | VertexFormat::SNorm16
            | VertexFormat::UInt16
            | VertexFormat::SInt16 => 2,
            VertexFormat::UNorm8
            | VertexFormat::SNorm8
            | VertexFormat::UInt8
            | VertexFormat::SInt8 => 1,
        }
    }

    /// Whether the format decodes to integers rather than floats.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            VertexFormat::UInt8
                | VertexFormat::SInt8
                | VertexFormat::UInt16
                | VertexFormat::SInt16
                | VertexFormat::UInt32
                | VertexFormat::SInt32
        )
    }
}

/// Semantic meaning of a vertex channel slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    Position,
    Normal,
    Tangent,
    Color,
    /// UV set 0..7.
    TexCoord(u8),
    BlendWeight,
    BlendIndices,
}

/// Channel slot assignment for containers of major version 2018 and newer.
const SLOTS_MODERN: [ChannelKind; 14] = [
    ChannelKind::Position,
    ChannelKind::Normal,
    ChannelKind::Tangent,
    ChannelKind::Color,
    ChannelKind::TexCoord(0),
    ChannelKind::TexCoord(1),
    ChannelKind::TexCoord(2),
    ChannelKind::TexCoord(3),
    ChannelKind::TexCoord(4),
    ChannelKind::TexCoord(5),
    ChannelKind::TexCoord(6),
    ChannelKind::TexCoord(7),
    ChannelKind::BlendWeight,
    ChannelKind::BlendIndices,
];

/// Channel slot assignment for older containers. Note the tangent slot sits
/// behind the UV sets here.
const SLOTS_LEGACY: [ChannelKind; 8] = [
    ChannelKind::Position,
    ChannelKind::Normal,
    ChannelKind::Color,
    ChannelKind::TexCoord(0),
    ChannelKind::TexCoord(1),
    ChannelKind::TexCoord(2),
    ChannelKind::TexCoord(3),
    ChannelKind::Tangent,
];

/// Meaning of a positional channel slot for the given container version.
///
/// The slot number is not stored anywhere in the record; it is the channel's
/// position in the declared channel list. Slots outside the generation's
/// table have no meaning and read as `None`.
pub fn channel_kind(version: u32, slot: usize) -> Option<ChannelKind> {
    let table: &[ChannelKind] = if version >= 2018 {
        &SLOTS_MODERN
    } else {
        &SLOTS_LEGACY
    };
    table.get(slot).copied()
}

/// Number of UV channel slots a mesh of the given version carries.
pub fn uv_slot_count(version: u32) -> usize {
    if version >= 2018 { 8 } else { 4 }
}
