//! Scene graph building from a loaded container.

use std::collections::HashMap;

use cgmath::{Quaternion, Vector3};

use crate::{
    data_structures::{
        mesh::Mesh,
        scene_graph::{Scene, SceneObject},
        transform::Transform,
    },
    fields::{FieldNode, Record, RecordKind, RecordSource},
    resources::{
        locate::ResourceLocator,
        texture::{self, TextureBuffer, TextureDecoder},
    },
};

/// Builds a `Scene` out of one container. Each build fully replaces whatever
/// the previous one produced; there is no incremental reload.
pub struct SceneBuilder<'a> {
    source: &'a dyn RecordSource,
    locator: &'a dyn ResourceLocator,
    textures: Option<&'a dyn TextureDecoder>,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(source: &'a dyn RecordSource, locator: &'a dyn ResourceLocator) -> Self {
        Self {
            source,
            locator,
            textures: None,
        }
    }

    /// Enable texture resolution through the given decoder. Without one,
    /// objects simply stay untextured.
    pub fn with_textures(mut self, decoder: &'a dyn TextureDecoder) -> Self {
        self.textures = Some(decoder);
        self
    }

    /// Run the full load pass.
    pub fn build(&self) -> Scene {
        let version = self.source.version();

        // Ordinary and UI-rect transforms carry the same fields and are
        // handled uniformly.
        let mut transforms = self.source.records_of(RecordKind::Transform);
        transforms.extend(self.source.records_of(RecordKind::RectTransform));

        let mut scene = Scene::default();
        let mut owners: Vec<Option<i64>> = Vec::with_capacity(transforms.len());
        let mut parents: Vec<Option<i64>> = Vec::with_capacity(transforms.len());
        let mut index_of: HashMap<i64, usize> = HashMap::new();

        for record in &transforms {
            let fields = &record.fields;
            let owner = fields.get("m_GameObject").reference();
            let name = owner
                .and_then(|path_id| self.source.record(path_id))
                .and_then(|object| object.fields.get("m_Name").as_str())
                .unwrap_or("GameObject")
                .to_string();
            let local = Transform {
                position: read_vec3(fields.get("m_LocalPosition"), Vector3::new(0.0, 0.0, 0.0)),
                rotation: read_quat(fields.get("m_LocalRotation")),
                scale: read_vec3(fields.get("m_LocalScale"), Vector3::new(1.0, 1.0, 1.0)),
            };
            index_of.insert(record.path_id, scene.objects.len());
            owners.push(owner);
            parents.push(fields.get("m_Father").reference());
            scene.objects.push(SceneObject::new(name, record.path_id, local));
        }

        // Second pass wires the hierarchy. A parent reference of zero or one
        // that resolves to nothing makes the object a root.
        for index in 0..scene.objects.len() {
            match parents[index].and_then(|path_id| index_of.get(&path_id).copied()) {
                Some(parent) => {
                    scene.objects[index].parent = Some(parent);
                    scene.objects[parent].children.push(index);
                }
                None => scene.roots.push(index),
            }
        }

        // Third pass resolves meshes and textures per owning object.
        for index in 0..scene.objects.len() {
            let Some(owner_id) = owners[index] else {
                continue;
            };
            let Some(owner) = self.source.record(owner_id) else {
                continue;
            };
            let components = component_records(self.source, owner);

            if let Some(mesh) = self.resolve_mesh(&components, version) {
                scene.objects[index].uv = mesh.primary_uv().cloned();
                scene.objects[index].mesh = Some(mesh);
            }
            if let Some(decoder) = self.textures {
                scene.objects[index].texture = self.resolve_texture(&components, decoder);
            }
        }

        scene.update_world_transforms();
        scene.update_bounds();
        log::info!(
            "Loaded scene with {} objects ({} roots)",
            scene.objects.len(),
            scene.roots.len()
        );
        scene
    }

    /// Prefer the physics collider's mesh; fall back to the render filter's
    /// when the collider has none or its assembly fails.
    fn resolve_mesh(&self, components: &[&Record], version: u32) -> Option<Mesh> {
        let collider = components
            .iter()
            .find(|record| record.kind == RecordKind::MeshCollider)
            .and_then(|record| self.assemble_component_mesh(record, version));
        if collider.is_some() {
            return collider;
        }
        components
            .iter()
            .find(|record| record.kind == RecordKind::MeshFilter)
            .and_then(|record| self.assemble_component_mesh(record, version))
    }

    fn assemble_component_mesh(&self, component: &Record, version: u32) -> Option<Mesh> {
        let mesh_id = component.fields.get("m_Mesh").reference()?;
        let record = self.source.record(mesh_id)?;
        match super::mesh::assemble(&record.fields, self.locator, version) {
            Ok(mesh) => Some(mesh),
            Err(error) => {
                log::warn!(
                    "Skipping mesh {} referenced by component {}: {}",
                    mesh_id,
                    component.path_id,
                    error
                );
                None
            }
        }
    }

    /// Walk the renderer's materials in order and return the first texture
    /// that resolves and decodes. Decoded rows get flipped before storing.
    fn resolve_texture(
        &self,
        components: &[&Record],
        decoder: &dyn TextureDecoder,
    ) -> Option<TextureBuffer> {
        let renderer = components
            .iter()
            .find(|record| record.kind == RecordKind::MeshRenderer)?;
        for material_ref in renderer.fields.get("m_Materials").items() {
            let Some(material_id) = material_ref.reference() else {
                continue;
            };
            let Some(material) = self.source.record(material_id) else {
                continue;
            };
            let Some(texture_id) = texture::texture_reference(&material.fields) else {
                continue;
            };
            let Some(texture_record) = self.source.record(texture_id) else {
                continue;
            };
            match decoder.decode(texture_record) {
                Ok(mut buffer) => {
                    texture::flip_rows(&mut buffer);
                    return Some(buffer);
                }
                Err(error) => {
                    log::warn!(
                        "Skipping texture {} on material {}: {}",
                        texture_id,
                        material_id,
                        error
                    );
                }
            }
        }
        None
    }
}

/// Resolve a named object's component references to records. Both the keyed
/// and the pair layout of the component list occur in the wild.
fn component_records<'s>(source: &'s dyn RecordSource, owner: &Record) -> Vec<&'s Record> {
    owner
        .fields
        .get("m_Component")
        .items()
        .filter_map(|entry| {
            let reference = entry.get("component");
            let reference = if reference.is_absent() {
                entry.get("second")
            } else {
                reference
            };
            reference.reference()
        })
        .filter_map(|path_id| source.record(path_id))
        .collect()
}

fn read_vec3(node: &FieldNode, default: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        node.get("x").as_f32().unwrap_or(default.x),
        node.get("y").as_f32().unwrap_or(default.y),
        node.get("z").as_f32().unwrap_or(default.z),
    )
}

fn read_quat(node: &FieldNode) -> Quaternion<f32> {
    Quaternion::new(
        node.get("w").as_f32().unwrap_or(1.0),
        node.get("x").as_f32().unwrap_or(0.0),
        node.get("y").as_f32().unwrap_or(0.0),
        node.get("z").as_f32().unwrap_or(0.0),
    )
}
