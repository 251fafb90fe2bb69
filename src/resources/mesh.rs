use crate::{
    data_structures::mesh::{ChannelInfo, Mesh, Submesh, Topology},
    error::AssetError,
    fields::FieldNode,
    formats::{self, ChannelKind, VertexFormat},
    resources::{
        decode::{Decoded, decode_channel},
        locate::{ResourceLocator, StreamRef},
    },
};

/**
 * Reconstruct a mesh from its record: submesh ranges, the (possibly
 * filtered) index list, and every declared vertex channel deinterleaved out
 * of the record's vertex blob.
 *
 * Fails with `MissingResource` when the vertex blob cannot be obtained and
 * with `MalformedRecord` when the record lacks the fields that any geometry
 * would need. Empty arrays are tolerated and produce an empty mesh.
 */
pub fn assemble(
    fields: &FieldNode,
    locator: &dyn ResourceLocator,
    version: u32,
) -> Result<Mesh, AssetError> {
    let name = fields.get("m_Name").as_str().unwrap_or("").to_string();

    let submeshes = read_submeshes(fields);
    let indices = read_indices(fields, &submeshes);

    let vertex_data = fields.get("m_VertexData");
    if vertex_data.is_absent() {
        return Err(AssetError::MalformedRecord("m_VertexData"));
    }
    let vertex_count = vertex_data.get("m_VertexCount").as_u32().unwrap_or(0) as usize;
    let channels = read_channels(vertex_data);

    let mut mesh = Mesh {
        name,
        indices,
        submeshes,
        uv_channels: vec![Vec::new(); formats::uv_slot_count(version)],
        ..Default::default()
    };

    if vertex_count == 0 || channels.is_empty() {
        return Ok(mesh);
    }

    let stream_lengths = stream_lengths(&channels, version)?;
    let blob = vertex_blob(fields, vertex_data, locator)?;

    // Streams are laid out back to back: stream n starts where stream n-1's
    // vertex_count repetitions ended.
    let mut start_pos = 0usize;
    for (stream_index, &stream_length) in stream_lengths.iter().enumerate() {
        if stream_length == 0 {
            continue;
        }
        for (slot, channel) in channels.iter().enumerate() {
            if channel.stream as usize != stream_index {
                continue;
            }
            let components = channel.component_count();
            if components == 0 {
                continue;
            }
            let format = VertexFormat::from_raw(channel.format, version)?;
            let element_size = format.size() * components;

            let mut packed = Vec::with_capacity(element_size * vertex_count);
            for vertex in 0..vertex_count {
                let from = start_pos + channel.offset as usize + vertex * stream_length;
                let run = blob
                    .get(from..from + element_size)
                    .ok_or(AssetError::MalformedRecord("m_VertexData.m_DataSize"))?;
                packed.extend_from_slice(run);
            }
            route_channel(&mut mesh, slot, decode_channel(&packed, format), version);
        }
        start_pos += stream_length * vertex_count;
    }

    Ok(mesh)
}

fn read_submeshes(fields: &FieldNode) -> Vec<Submesh> {
    fields
        .get("m_SubMeshes")
        .items()
        .map(|entry| Submesh {
            first_byte: entry.get("firstByte").as_u32().unwrap_or(0),
            index_count: entry.get("indexCount").as_u32().unwrap_or(0),
            topology: Topology::from_raw(entry.get("topology").as_u32().unwrap_or(0)),
            first_vertex: entry.get("firstVertex").as_u32().unwrap_or(0),
            vertex_count: entry.get("vertexCount").as_u32().unwrap_or(0),
        })
        .collect()
}

/// Decode the index buffer and, when triangle submeshes exist, keep only
/// their slices, concatenated in declaration order.
fn read_indices(fields: &FieldNode, submeshes: &[Submesh]) -> Vec<u16> {
    // Index width flag: 1 means 32-bit words, anything else 16-bit.
    let wide = fields.get("m_IndexFormat").as_u32() == Some(1);
    let bytes = fields.get("m_IndexBuffer").as_bytes().unwrap_or(&[]);

    let indices: Vec<u16> = if wide {
        // Narrowing is saturating on purpose. Meshes indexing past u16 lose
        // data here; downstream consumers expect 16-bit indices.
        bytes
            .chunks_exact(4)
            .map(|chunk| bytemuck::pod_read_unaligned::<u32>(chunk).min(65535) as u16)
            .collect()
    } else {
        bytes
            .chunks_exact(2)
            .map(bytemuck::pod_read_unaligned::<u16>)
            .collect()
    };

    if !submeshes
        .iter()
        .any(|submesh| submesh.topology == Topology::Triangles)
    {
        return indices;
    }

    let bytes_per_index = if wide { 4 } else { 2 };
    let mut filtered = Vec::new();
    for submesh in submeshes {
        if submesh.topology != Topology::Triangles {
            continue;
        }
        let start = (submesh.first_byte as usize / bytes_per_index).min(indices.len());
        let end = (start + submesh.index_count as usize).min(indices.len());
        filtered.extend_from_slice(&indices[start..end]);
    }
    filtered
}

fn read_channels(vertex_data: &FieldNode) -> Vec<ChannelInfo> {
    vertex_data
        .get("m_Channels")
        .items()
        .map(|entry| ChannelInfo {
            stream: entry.get("stream").as_u8().unwrap_or(0),
            offset: entry.get("offset").as_u16().unwrap_or(0),
            format: entry.get("format").as_u8().unwrap_or(0),
            dimension: entry.get("dimension").as_u8().unwrap_or(0),
        })
        .collect()
}

/// Per-stream vertex size: the furthest byte any of the stream's channels
/// reaches. Streams no channel lives in get length 0.
fn stream_lengths(channels: &[ChannelInfo], version: u32) -> Result<Vec<usize>, AssetError> {
    let stream_count = channels
        .iter()
        .map(|channel| channel.stream as usize + 1)
        .max()
        .unwrap_or(0);
    let mut lengths = vec![0usize; stream_count];
    for channel in channels {
        let components = channel.component_count();
        if components == 0 {
            continue;
        }
        let format = VertexFormat::from_raw(channel.format, version)?;
        let end = channel.offset as usize + components * format.size();
        let length = &mut lengths[channel.stream as usize];
        *length = (*length).max(end);
    }
    Ok(lengths)
}

/// Fetch the vertex blob: inline bytes when the record carries them,
/// otherwise the external slice named by the stream reference.
fn vertex_blob(
    fields: &FieldNode,
    vertex_data: &FieldNode,
    locator: &dyn ResourceLocator,
) -> Result<Vec<u8>, AssetError> {
    let inline = vertex_data.get("m_DataSize").as_bytes().unwrap_or(&[]);
    if !inline.is_empty() {
        return locator.locate(StreamRef::Inline(inline));
    }
    let stream = fields.get("m_StreamData");
    let path = stream.get("path").as_str().unwrap_or("");
    if !path.is_empty() {
        return locator.locate(StreamRef::External {
            path,
            offset: stream.get("offset").as_u64().unwrap_or(0),
            size: stream.get("size").as_u64().unwrap_or(0),
        });
    }
    Err(AssetError::MissingResource(
        "record carries neither inline vertex data nor a stream reference".to_string(),
    ))
}

/// Route a decoded channel into the mesh by its positional slot. Slots
/// outside the generation's table and blend data are dropped silently.
fn route_channel(mesh: &mut Mesh, slot: usize, decoded: Decoded, version: u32) {
    let Some(kind) = formats::channel_kind(version, slot) else {
        return;
    };
    match kind {
        ChannelKind::Position => mesh.vertices = decoded.into_floats(),
        ChannelKind::Normal => mesh.normals = decoded.into_floats(),
        ChannelKind::Tangent => mesh.tangents = decoded.into_floats(),
        ChannelKind::Color => mesh.colors = decoded.into_floats(),
        ChannelKind::TexCoord(set) => {
            if let Some(channel) = mesh.uv_channels.get_mut(set as usize) {
                *channel = decoded.into_floats();
            }
        }
        ChannelKind::BlendWeight | ChannelKind::BlendIndices => {}
    }
}
