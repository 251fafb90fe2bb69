//! Scene graph and hierarchical scene organization.
//!
//! Objects live in an arena: the scene owns a flat pool and every
//! parent/child link is an index into it. The parent link is a plain
//! back-reference for upward lookup; ownership only ever runs root to leaf,
//! so the hierarchy cannot form ownership cycles even on hostile input.
//!
//! A scene is built once per container load and replaced wholesale on the
//! next load. After building, `update_world_transforms` pushes matrices top
//! down and `update_bounds` derives per-object world-space boxes, which are
//! what ray picking tests against.

use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};

use crate::data_structures::{mesh::Mesh, transform::Transform};
use crate::resources::texture::TextureBuffer;

/// Axis-aligned bounding box. The empty box is inverted (min above max) so
/// that including a first point or unioning a non-empty box just works.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn include(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn union(mut self, other: Aabb) -> Aabb {
        if other.is_empty() {
            return self;
        }
        self.include(other.min);
        self.include(other.max);
        self
    }

    /// Slab test. Returns the entry distance along the ray, clamped to zero
    /// when the origin already sits inside the box.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            if direction.abs() < f32::EPSILON {
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (self.min[axis] - origin) / direction;
            let t2 = (self.max[axis] - origin) / direction;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }
        if t_near <= t_far && t_far >= 0.0 {
            Some(t_near.max(0.0))
        } else {
            None
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

/// A ray for object picking, in world space.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

/// One object in the loaded scene.
pub struct SceneObject {
    pub name: String,
    /// Id of the transform record this object was built from.
    pub transform_id: i64,
    /// Arena index of the parent, if any. Non-owning back-reference.
    pub parent: Option<usize>,
    /// Arena indices of the owned children, in wiring order.
    pub children: Vec<usize>,
    pub local: Transform,
    pub world_matrix: Matrix4<f32>,
    pub mesh: Option<Mesh>,
    /// First UV channel of the resolved mesh, cached for preview texturing.
    pub uv: Option<Vec<f32>>,
    pub texture: Option<TextureBuffer>,
    /// World-space box around this object's own mesh. Empty without a mesh.
    pub bounds: Aabb,
    pub selected: bool,
}

impl SceneObject {
    pub fn new(name: String, transform_id: i64, local: Transform) -> Self {
        Self {
            name,
            transform_id,
            parent: None,
            children: Vec::new(),
            local,
            world_matrix: Matrix4::identity(),
            mesh: None,
            uv: None,
            texture: None,
            bounds: Aabb::empty(),
            selected: false,
        }
    }
}

/// A fully loaded scene: the object arena plus its root set.
#[derive(Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub roots: Vec<usize>,
}

impl Scene {
    /// Recompute every object's world matrix, walking each tree from its
    /// root. Roots compose against identity.
    pub fn update_world_transforms(&mut self) {
        let mut stack: Vec<(usize, Matrix4<f32>)> = self
            .roots
            .iter()
            .map(|&root| (root, Matrix4::identity()))
            .collect();
        while let Some((index, parent_matrix)) = stack.pop() {
            let world = parent_matrix * self.objects[index].local.to_matrix();
            self.objects[index].world_matrix = world;
            for &child in &self.objects[index].children {
                stack.push((child, world));
            }
        }
    }

    /// Recompute per-object bounds from mesh vertices in world space.
    /// Requires world matrices to be up to date.
    pub fn update_bounds(&mut self) {
        for index in 0..self.objects.len() {
            let object = &self.objects[index];
            let mut bounds = Aabb::empty();
            if let Some(mesh) = &object.mesh {
                for position in mesh.vertices.chunks_exact(3) {
                    let world =
                        object.world_matrix * Vector4::new(position[0], position[1], position[2], 1.0);
                    bounds.include(Vector3::new(world.x, world.y, world.z));
                }
            }
            self.objects[index].bounds = bounds;
        }
    }

    /// Union of all object bounds, for camera framing.
    pub fn bounds(&self) -> Aabb {
        self.objects
            .iter()
            .fold(Aabb::empty(), |total, object| total.union(object.bounds))
    }

    /// Pick the object whose bounds the ray enters at the smallest positive
    /// distance. Ties keep the earlier arena entry; enumeration order is
    /// fixed for a given load, so picking is deterministic.
    pub fn pick(&self, ray: &Ray) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, object) in self.objects.iter().enumerate() {
            if let Some(distance) = object.bounds.intersect(ray) {
                if distance > 0.0 && best.map_or(true, |(_, nearest)| distance < nearest) {
                    best = Some((index, distance));
                }
            }
        }
        best.map(|(index, _)| index)
    }

    /// Mark one object as selected, clearing any previous selection.
    pub fn select(&mut self, index: Option<usize>) {
        for object in self.objects.iter_mut() {
            object.selected = false;
        }
        if let Some(index) = index {
            if let Some(object) = self.objects.get_mut(index) {
                object.selected = true;
            }
        }
    }
}
