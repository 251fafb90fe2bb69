//! Typed field tree access for container records.
//!
//! A container parser (not part of this crate) turns every serialized record
//! into a tree of named, typed fields. This module is the contract between
//! that parser and the reconstruction passes: `FieldNode` is the tree,
//! `Record` ties a tree to its id and kind, and `RecordSource` is the lookup
//! surface the scene builder walks. Lookups never fail hard; a missing name
//! or index yields the `Absent` marker so call sites can chain reads and
//! decide at the end whether the shape was acceptable.

use std::collections::HashMap;

/// One node in a typed field tree.
///
/// Scalar variants carry the widest type of their family; narrower reads
/// go through the typed accessors below.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FieldNode {
    /// The dummy marker returned for any unresolvable lookup.
    #[default]
    Absent,
    Int(i64),
    Float(f32),
    Str(String),
    Bytes(Vec<u8>),
    Array(Vec<FieldNode>),
    /// Named children in declaration order. Order is meaningful: several
    /// record layouts are positional rather than keyed.
    Object(Vec<(String, FieldNode)>),
}

static ABSENT: FieldNode = FieldNode::Absent;

impl FieldNode {
    /// Build an object node from name/value pairs.
    pub fn object<const N: usize>(fields: [(&str, FieldNode); N]) -> Self {
        FieldNode::Object(
            fields
                .into_iter()
                .map(|(name, node)| (name.to_string(), node))
                .collect(),
        )
    }

    /// Build an array node.
    pub fn array(items: impl IntoIterator<Item = FieldNode>) -> Self {
        FieldNode::Array(items.into_iter().collect())
    }

    /// Child by field name, or `Absent`.
    pub fn get(&self, name: &str) -> &FieldNode {
        match self {
            FieldNode::Object(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, node)| node)
                .unwrap_or(&ABSENT),
            _ => &ABSENT,
        }
    }

    /// Array element by index, or `Absent`.
    pub fn at(&self, index: usize) -> &FieldNode {
        match self {
            FieldNode::Array(items) => items.get(index).unwrap_or(&ABSENT),
            _ => &ABSENT,
        }
    }

    /// Array elements in declaration order. Empty for non-arrays.
    pub fn items(&self) -> std::slice::Iter<'_, FieldNode> {
        match self {
            FieldNode::Array(items) => items.iter(),
            _ => [].iter(),
        }
    }

    /// Named children in declaration order. Empty for non-objects.
    pub fn entries(&self) -> &[(String, FieldNode)] {
        match self {
            FieldNode::Object(fields) => fields,
            _ => &[],
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldNode::Absent)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldNode::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        self.as_i64().and_then(|value| u32::try_from(value).ok())
    }

    pub fn as_u8(&self) -> Option<u8> {
        self.as_i64().and_then(|value| u8::try_from(value).ok())
    }

    pub fn as_u16(&self) -> Option<u16> {
        self.as_i64().and_then(|value| u16::try_from(value).ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_i64().and_then(|value| u64::try_from(value).ok())
    }

    /// Floats widen from integer fields as some layouts store whole-number
    /// scalars as ints.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            FieldNode::Float(value) => Some(*value),
            FieldNode::Int(value) => Some(*value as f32),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldNode::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldNode::Bytes(value) => Some(value),
            _ => None,
        }
    }

    /// Read an object reference (a `{m_FileID, m_PathID}` pair) to another
    /// record. An id of zero means "no target" and reads as `None`.
    pub fn reference(&self) -> Option<i64> {
        match self.get("m_PathID").as_i64() {
            Some(0) | None => None,
            Some(path_id) => Some(path_id),
        }
    }
}

impl From<i64> for FieldNode {
    fn from(value: i64) -> Self {
        FieldNode::Int(value)
    }
}

impl From<u32> for FieldNode {
    fn from(value: u32) -> Self {
        FieldNode::Int(i64::from(value))
    }
}

impl From<f32> for FieldNode {
    fn from(value: f32) -> Self {
        FieldNode::Float(value)
    }
}

impl From<&str> for FieldNode {
    fn from(value: &str) -> Self {
        FieldNode::Str(value.to_string())
    }
}

impl From<Vec<u8>> for FieldNode {
    fn from(value: Vec<u8>) -> Self {
        FieldNode::Bytes(value)
    }
}

/// The record kinds the reconstruction passes care about. Containers hold
/// many more; a parser only needs to classify these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    GameObject,
    Transform,
    RectTransform,
    MeshFilter,
    MeshRenderer,
    MeshCollider,
    Material,
    Mesh,
    Texture,
}

/// One deserialized container record: its id, classified kind and field tree.
#[derive(Clone, Debug)]
pub struct Record {
    pub path_id: i64,
    pub kind: RecordKind,
    pub fields: FieldNode,
}

/// Lookup surface over one loaded container.
pub trait RecordSource {
    /// Major version of the engine that serialized the container.
    fn version(&self) -> u32;

    /// All records of a kind, in container declaration order.
    fn records_of(&self, kind: RecordKind) -> Vec<&Record>;

    /// Resolve a record by id.
    fn record(&self, path_id: i64) -> Option<&Record>;
}

/// In-memory `RecordSource`, the hand-off point for container parsers and
/// the fixture type used by this crate's tests.
pub struct MemorySource {
    version: u32,
    records: Vec<Record>,
    by_id: HashMap<i64, usize>,
}

impl MemorySource {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            records: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Append a record. Later records win id collisions, mirroring last-write
    /// order in the containers observed.
    pub fn push(&mut self, record: Record) {
        self.by_id.insert(record.path_id, self.records.len());
        self.records.push(record);
    }
}

impl RecordSource for MemorySource {
    fn version(&self) -> u32 {
        self.version
    }

    fn records_of(&self, kind: RecordKind) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| record.kind == kind)
            .collect()
    }

    fn record(&self, path_id: i64) -> Option<&Record> {
        self.by_id.get(&path_id).map(|&index| &self.records[index])
    }
}
