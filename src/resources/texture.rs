use crate::{
    error::AssetError,
    fields::{FieldNode, Record},
};

/// Decoded pixels, 4 bytes per pixel (RGBA), row-major with
/// `width * 4` bytes per row.
#[derive(Clone, Debug)]
pub struct TextureBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Collaborator contract: decode a texture record into raw RGBA pixels.
/// Rows come back in the decoder's native bottom-up order; the scene builder
/// flips them before storing.
pub trait TextureDecoder {
    fn decode(&self, record: &Record) -> Result<TextureBuffer, AssetError>;
}

/// Well-known material property names that carry the preview texture, in
/// preference order.
pub const TEXTURE_PROPERTIES: [&str; 3] = ["_MainTex", "_BaseMap", "_BaseColorMap"];

/// Find the texture reference a material's texture-environment properties
/// point at.
///
/// Preferred property names win in list order; only after none of them
/// resolves does the first entry with any resolvable reference count.
pub fn texture_reference(material: &FieldNode) -> Option<i64> {
    let properties = material.get("m_SavedProperties").get("m_TexEnvs");
    for name in TEXTURE_PROPERTIES {
        for entry in properties.items() {
            if entry.get("first").as_str() != Some(name) {
                continue;
            }
            if let Some(path_id) = entry.get("second").get("m_Texture").reference() {
                return Some(path_id);
            }
        }
    }
    properties
        .items()
        .find_map(|entry| entry.get("second").get("m_Texture").reference())
}

/// Flip pixel rows top to bottom in place, normalizing origin convention.
pub fn flip_rows(texture: &mut TextureBuffer) {
    let stride = texture.width as usize * 4;
    if stride == 0 {
        return;
    }
    let rows = texture.data.len() / stride;
    for row in 0..rows / 2 {
        let top = row * stride;
        let bottom = (rows - 1 - row) * stride;
        for byte in 0..stride {
            texture.data.swap(top + byte, bottom + byte);
        }
    }
}
