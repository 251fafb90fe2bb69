//! Shared fixtures: field tree builders for the record shapes the loaders
//! consume, plus stub collaborators.

use asset_flow::error::AssetError;
use asset_flow::fields::{FieldNode, MemorySource, Record, RecordKind};
use asset_flow::resources::texture::{TextureBuffer, TextureDecoder};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn vec3(x: f32, y: f32, z: f32) -> FieldNode {
    FieldNode::object([("x", x.into()), ("y", y.into()), ("z", z.into())])
}

pub fn quat(x: f32, y: f32, z: f32, w: f32) -> FieldNode {
    FieldNode::object([
        ("x", x.into()),
        ("y", y.into()),
        ("z", z.into()),
        ("w", w.into()),
    ])
}

/// An object reference field, `{m_FileID, m_PathID}`.
pub fn reference(path_id: i64) -> FieldNode {
    FieldNode::object([("m_FileID", 0i64.into()), ("m_PathID", path_id.into())])
}

pub fn channel(stream: u32, offset: u32, format: u32, dimension: u32) -> FieldNode {
    FieldNode::object([
        ("stream", stream.into()),
        ("offset", offset.into()),
        ("format", format.into()),
        ("dimension", dimension.into()),
    ])
}

pub fn submesh(first_byte: u32, index_count: u32, topology: u32) -> FieldNode {
    FieldNode::object([
        ("firstByte", first_byte.into()),
        ("indexCount", index_count.into()),
        ("topology", topology.into()),
        ("firstVertex", 0u32.into()),
        ("vertexCount", 0u32.into()),
    ])
}

/// Builder for mesh record field trees. Defaults make the smallest record
/// the assembler accepts; tests override what they exercise.
pub struct MeshFixture {
    pub name: String,
    pub vertex_count: u32,
    pub channels: Vec<FieldNode>,
    pub data: Vec<u8>,
    pub index_bytes: Vec<u8>,
    pub wide_indices: bool,
    pub submeshes: Vec<FieldNode>,
    pub stream_data: Option<(String, u64, u64)>,
}

impl MeshFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vertex_count: 0,
            channels: Vec::new(),
            data: Vec::new(),
            index_bytes: Vec::new(),
            wide_indices: false,
            submeshes: Vec::new(),
            stream_data: None,
        }
    }

    pub fn fields(self) -> FieldNode {
        let vertex_data = FieldNode::object([
            ("m_VertexCount", self.vertex_count.into()),
            ("m_Channels", FieldNode::Array(self.channels)),
            ("m_DataSize", FieldNode::Bytes(self.data)),
        ]);
        let mut fields = vec![
            ("m_Name".to_string(), FieldNode::from(self.name.as_str())),
            ("m_SubMeshes".to_string(), FieldNode::Array(self.submeshes)),
            (
                "m_IndexFormat".to_string(),
                FieldNode::Int(if self.wide_indices { 1 } else { 0 }),
            ),
            (
                "m_IndexBuffer".to_string(),
                FieldNode::Bytes(self.index_bytes),
            ),
            ("m_VertexData".to_string(), vertex_data),
        ];
        if let Some((path, offset, size)) = self.stream_data {
            fields.push((
                "m_StreamData".to_string(),
                FieldNode::object([
                    ("offset", FieldNode::Int(offset as i64)),
                    ("size", FieldNode::Int(size as i64)),
                    ("path", FieldNode::from(path.as_str())),
                ]),
            ));
        }
        FieldNode::Object(fields)
    }
}

/// A single triangle with float3 positions in one stream; the simplest
/// complete mesh record.
pub fn triangle_mesh_fields() -> FieldNode {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mut fixture = MeshFixture::new("triangle");
    fixture.vertex_count = 3;
    fixture.channels = vec![channel(0, 0, 0, 3)];
    fixture.data = bytemuck::cast_slice(&positions).to_vec();
    fixture.index_bytes = bytemuck::cast_slice(&[0u16, 1, 2]).to_vec();
    fixture.submeshes = vec![submesh(0, 3, 0)];
    fixture.fields()
}

pub fn transform_record(
    path_id: i64,
    owner: i64,
    parent: i64,
    position: (f32, f32, f32),
) -> Record {
    Record {
        path_id,
        kind: RecordKind::Transform,
        fields: FieldNode::object([
            ("m_GameObject", reference(owner)),
            ("m_Father", reference(parent)),
            ("m_LocalPosition", vec3(position.0, position.1, position.2)),
            ("m_LocalRotation", quat(0.0, 0.0, 0.0, 1.0)),
            ("m_LocalScale", vec3(1.0, 1.0, 1.0)),
        ]),
    }
}

pub fn game_object(path_id: i64, name: &str, component_ids: &[i64]) -> Record {
    let components = component_ids
        .iter()
        .map(|&id| FieldNode::object([("component", reference(id))]))
        .collect();
    Record {
        path_id,
        kind: RecordKind::GameObject,
        fields: FieldNode::object([
            ("m_Name", name.into()),
            ("m_Component", FieldNode::Array(components)),
        ]),
    }
}

pub fn mesh_filter(path_id: i64, mesh_id: i64) -> Record {
    Record {
        path_id,
        kind: RecordKind::MeshFilter,
        fields: FieldNode::object([("m_Mesh", reference(mesh_id))]),
    }
}

pub fn mesh_collider(path_id: i64, mesh_id: i64) -> Record {
    Record {
        path_id,
        kind: RecordKind::MeshCollider,
        fields: FieldNode::object([("m_Mesh", reference(mesh_id))]),
    }
}

pub fn mesh_record(path_id: i64, fields: FieldNode) -> Record {
    Record {
        path_id,
        kind: RecordKind::Mesh,
        fields,
    }
}

pub fn renderer(path_id: i64, material_ids: &[i64]) -> Record {
    let materials = material_ids.iter().map(|&id| reference(id)).collect();
    Record {
        path_id,
        kind: RecordKind::MeshRenderer,
        fields: FieldNode::object([("m_Materials", FieldNode::Array(materials))]),
    }
}

pub fn material(path_id: i64, tex_envs: &[(&str, i64)]) -> Record {
    let entries = tex_envs
        .iter()
        .map(|&(name, texture_id)| {
            FieldNode::object([
                ("first", name.into()),
                (
                    "second",
                    FieldNode::object([("m_Texture", reference(texture_id))]),
                ),
            ])
        })
        .collect();
    Record {
        path_id,
        kind: RecordKind::Material,
        fields: FieldNode::object([(
            "m_SavedProperties",
            FieldNode::object([("m_TexEnvs", FieldNode::Array(entries))]),
        )]),
    }
}

pub fn texture_record(path_id: i64, width: u32, height: u32, pixels: Vec<u8>) -> Record {
    Record {
        path_id,
        kind: RecordKind::Texture,
        fields: FieldNode::object([
            ("m_Width", width.into()),
            ("m_Height", height.into()),
            ("image data", FieldNode::Bytes(pixels)),
        ]),
    }
}

/// Source with the usual smallest scene: one transform, its named object,
/// and whatever extra records a test appends.
pub fn source_with(version: u32, records: Vec<Record>) -> MemorySource {
    let mut source = MemorySource::new(version);
    for record in records {
        source.push(record);
    }
    source
}

/// Texture collaborator stub: hands back the record's raw pixel bytes, or
/// fails when the record carries none.
pub struct RawPixelDecoder;

impl TextureDecoder for RawPixelDecoder {
    fn decode(&self, record: &Record) -> Result<TextureBuffer, AssetError> {
        let pixels = record
            .fields
            .get("image data")
            .as_bytes()
            .unwrap_or_default();
        if pixels.is_empty() {
            return Err(AssetError::MalformedRecord("image data"));
        }
        Ok(TextureBuffer {
            data: pixels.to_vec(),
            width: record.fields.get("m_Width").as_u32().unwrap_or(0),
            height: record.fields.get("m_Height").as_u32().unwrap_or(0),
        })
    }
}
