// Multi-byte fields in container data are little-endian, as is every target
// this crate builds for, so plain POD reads are exact.

use half::f16;

use crate::formats::VertexFormat;

/// Decoded channel contents. Which side comes out is fully determined by
/// `VertexFormat::is_integer`.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Floats(Vec<f32>),
    Ints(Vec<u32>),
}

impl Decoded {
    pub fn len(&self) -> usize {
        match self {
            Decoded::Floats(values) => values.len(),
            Decoded::Ints(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Float view of the channel. Integer channels widen with a plain cast;
    /// some records store float-typed attributes in integer formats.
    pub fn into_floats(self) -> Vec<f32> {
        match self {
            Decoded::Floats(values) => values,
            Decoded::Ints(values) => values.into_iter().map(|value| value as f32).collect(),
        }
    }
}

/// Decode a byte span as elements of the given format.
///
/// Output length is `bytes.len() / format.size()`; trailing bytes that do
/// not fill an element are ignored. Signed and unsigned integer formats both
/// widen through the unsigned path, mirroring how containers use integer
/// channels (index-like data, never negative).
pub fn decode_channel(bytes: &[u8], format: VertexFormat) -> Decoded {
    match format {
        VertexFormat::Float => Decoded::Floats(
            bytes
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<f32>)
                .collect(),
        ),
        VertexFormat::Float16 => Decoded::Floats(
            bytes
                .chunks_exact(2)
                .map(|chunk| f16::from_bits(bytemuck::pod_read_unaligned::<u16>(chunk)).to_f32())
                .collect(),
        ),
        VertexFormat::UNorm8 => Decoded::Floats(
            bytes.iter().map(|&byte| f32::from(byte) / 255.0).collect(),
        ),
        // Signed normalized values clamp at the floor only: the raw minimum
        // (e.g. -128/127) would otherwise undershoot -1.0.
        VertexFormat::SNorm8 => Decoded::Floats(
            bytes
                .iter()
                .map(|&byte| (f32::from(byte as i8) / 127.0).max(-1.0))
                .collect(),
        ),
        VertexFormat::UNorm16 => Decoded::Floats(
            bytes
                .chunks_exact(2)
                .map(|chunk| f32::from(bytemuck::pod_read_unaligned::<u16>(chunk)) / 65535.0)
                .collect(),
        ),
        VertexFormat::SNorm16 => Decoded::Floats(
            bytes
                .chunks_exact(2)
                .map(|chunk| {
                    (f32::from(bytemuck::pod_read_unaligned::<i16>(chunk)) / 32767.0).max(-1.0)
                })
                .collect(),
        ),
        VertexFormat::UInt8 | VertexFormat::SInt8 => {
            Decoded::Ints(bytes.iter().map(|&byte| u32::from(byte)).collect())
        }
        VertexFormat::UInt16 | VertexFormat::SInt16 => Decoded::Ints(
            bytes
                .chunks_exact(2)
                .map(|chunk| u32::from(bytemuck::pod_read_unaligned::<u16>(chunk)))
                .collect(),
        ),
        VertexFormat::UInt32 | VertexFormat::SInt32 => Decoded::Ints(
            bytes
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<u32>)
                .collect(),
        ),
    }
}
