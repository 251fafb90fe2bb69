//! Format table and vertex decoder behavior: remap tables per container
//! generation, element sizes, and the exact numeric semantics of every
//! supported encoding.

use asset_flow::error::AssetError;
use asset_flow::formats::{ChannelKind, VertexFormat, channel_kind, uv_slot_count};
use asset_flow::resources::decode::{Decoded, decode_channel};

mod common;

fn floats(decoded: Decoded) -> Vec<f32> {
    match decoded {
        Decoded::Floats(values) => values,
        Decoded::Ints(values) => panic!("expected floats, got ints: {:?}", values),
    }
}

fn ints(decoded: Decoded) -> Vec<u32> {
    match decoded {
        Decoded::Ints(values) => values,
        Decoded::Floats(values) => panic!("expected ints, got floats: {:?}", values),
    }
}

const ALL_FORMATS: [VertexFormat; 12] = [
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

#[test]
fn decode_length_matches_element_size() {
    common::test_utils::init_logging();
    for format in ALL_FORMATS {
        let bytes = vec![0u8; format.size() * 7];
        let decoded = decode_channel(&bytes, format);
        assert_eq!(decoded.len(), 7, "{:?}", format);

        // A trailing partial element is ignored, not an error.
        let ragged = vec![0u8; format.size() * 7 + format.size() - 1];
        assert_eq!(decode_channel(&ragged, format).len(), 7, "{:?}", format);
    }
}

#[test]
fn integer_classification_matches_decode_side() {
    for format in ALL_FORMATS {
        let bytes = vec![0u8; format.size() * 2];
        let decoded = decode_channel(&bytes, format);
        match decoded {
            Decoded::Ints(_) => assert!(format.is_integer(), "{:?}", format),
            Decoded::Floats(_) => assert!(!format.is_integer(), "{:?}", format),
        }
    }
}

#[test]
fn unorm8_round_trip() {
    let values = floats(decode_channel(&[0, 1, 128, 255], VertexFormat::UNorm8));
    assert_eq!(values, vec![0.0, 1.0 / 255.0, 128.0 / 255.0, 1.0]);
}

#[test]
fn unorm16_round_trip() {
    let bytes = bytemuck::cast_slice::<u16, u8>(&[0, 32768, 65535]).to_vec();
    let values = floats(decode_channel(&bytes, VertexFormat::UNorm16));
    assert_eq!(values, vec![0.0, 32768.0 / 65535.0, 1.0]);
}

#[test]
fn snorm8_clamps_at_negative_one() {
    // Raw -128 would be -128/127 without the floor clamp.
    let values = floats(decode_channel(&[0x80, 0x81, 0x7F, 0x00], VertexFormat::SNorm8));
    assert_eq!(values, vec![-1.0, -1.0, 1.0, 0.0]);
}

#[test]
fn snorm16_clamps_at_negative_one() {
    let bytes = bytemuck::cast_slice::<i16, u8>(&[i16::MIN, -32767, 32767, 0]).to_vec();
    let values = floats(decode_channel(&bytes, VertexFormat::SNorm16));
    assert_eq!(values, vec![-1.0, -1.0, 1.0, 0.0]);
}

#[test]
fn float16_promotes_to_f32() {
    // 1.0, -2.0, 0.5 in half precision.
    let bytes = bytemuck::cast_slice::<u16, u8>(&[0x3C00, 0xC000, 0x3800]).to_vec();
    let values = floats(decode_channel(&bytes, VertexFormat::Float16));
    assert_eq!(values, vec![1.0, -2.0, 0.5]);
}

#[test]
fn float32_reads_little_endian() {
    let bytes = bytemuck::cast_slice::<f32, u8>(&[1.5, -0.25]).to_vec();
    let values = floats(decode_channel(&bytes, VertexFormat::Float));
    assert_eq!(values, vec![1.5, -0.25]);
}

#[test]
fn signed_integers_widen_through_the_unsigned_path() {
    // Index channels never hold negative values; raw bytes pass through.
    assert_eq!(
        ints(decode_channel(&[0xFF, 0x01], VertexFormat::SInt8)),
        vec![255, 1]
    );
    let bytes = bytemuck::cast_slice::<u16, u8>(&[0xFFFF, 7]).to_vec();
    assert_eq!(
        ints(decode_channel(&bytes, VertexFormat::SInt16)),
        vec![65535, 7]
    );
    let bytes = bytemuck::cast_slice::<u32, u8>(&[70000, 3]).to_vec();
    assert_eq!(
        ints(decode_channel(&bytes, VertexFormat::UInt32)),
        vec![70000, 3]
    );
}

#[test]
fn canonical_codes_pass_through_for_2019() {
    for (code, expected) in ALL_FORMATS.iter().enumerate() {
        let format = VertexFormat::from_raw(code as u8, 2019).unwrap();
        assert_eq!(format, *expected);
    }
    assert!(matches!(
        VertexFormat::from_raw(12, 2019),
        Err(AssetError::UnsupportedFormat(12))
    ));
}

#[test]
fn middle_generation_remaps_onto_canonical() {
    assert_eq!(VertexFormat::from_raw(0, 2017).unwrap(), VertexFormat::Float);
    // Code 2 is the legacy color format of that era.
    assert_eq!(VertexFormat::from_raw(2, 2017).unwrap(), VertexFormat::UNorm8);
    assert_eq!(VertexFormat::from_raw(3, 2018).unwrap(), VertexFormat::UNorm8);
    assert_eq!(VertexFormat::from_raw(4, 2017).unwrap(), VertexFormat::SNorm8);
    assert_eq!(VertexFormat::from_raw(12, 2017).unwrap(), VertexFormat::SInt32);
    assert!(matches!(
        VertexFormat::from_raw(13, 2017),
        Err(AssetError::UnsupportedFormat(13))
    ));
}

#[test]
fn legacy_generation_knows_five_kinds() {
    assert_eq!(VertexFormat::from_raw(0, 5).unwrap(), VertexFormat::Float);
    assert_eq!(VertexFormat::from_raw(1, 2016).unwrap(), VertexFormat::Float16);
    assert_eq!(VertexFormat::from_raw(2, 2016).unwrap(), VertexFormat::UNorm8);
    assert_eq!(VertexFormat::from_raw(3, 2016).unwrap(), VertexFormat::UInt8);
    assert_eq!(VertexFormat::from_raw(4, 2016).unwrap(), VertexFormat::UInt32);
    assert!(matches!(
        VertexFormat::from_raw(5, 2016),
        Err(AssetError::UnsupportedFormat(5))
    ));
}

#[test]
fn channel_slots_differ_by_generation() {
    // Modern containers put the tangent right after the normal.
    assert_eq!(channel_kind(2018, 0), Some(ChannelKind::Position));
    assert_eq!(channel_kind(2018, 2), Some(ChannelKind::Tangent));
    assert_eq!(channel_kind(2018, 3), Some(ChannelKind::Color));
    assert_eq!(channel_kind(2019, 4), Some(ChannelKind::TexCoord(0)));
    assert_eq!(channel_kind(2019, 11), Some(ChannelKind::TexCoord(7)));
    assert_eq!(channel_kind(2019, 12), Some(ChannelKind::BlendWeight));
    assert_eq!(channel_kind(2019, 14), None);

    // Older containers park it behind the UV sets instead.
    assert_eq!(channel_kind(2017, 2), Some(ChannelKind::Color));
    assert_eq!(channel_kind(2017, 3), Some(ChannelKind::TexCoord(0)));
    assert_eq!(channel_kind(2017, 7), Some(ChannelKind::Tangent));
    assert_eq!(channel_kind(2017, 8), None);
}

#[test]
fn uv_slot_count_follows_generation() {
    assert_eq!(uv_slot_count(2018), 8);
    assert_eq!(uv_slot_count(2025), 8);
    assert_eq!(uv_slot_count(2017), 4);
    assert_eq!(uv_slot_count(5), 4);
}
