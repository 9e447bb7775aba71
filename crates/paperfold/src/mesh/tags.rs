//! Vertex provenance: interned tag names and per-vertex append-only tag sets.
//!
//! Tag names are interned once per mesh generation; each vertex stores a small
//! ordered set of ids. Nothing here removes a tag; only a mesh reset clears
//! the table and every vertex set together.

use std::collections::{BTreeSet, HashMap};

use crate::expr::TagLookup;

/// Interned tag name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub u32);

pub(crate) type TagSet = BTreeSet<TagId>;

/// Name ↔ id table shared by all vertices of one mesh.
#[derive(Clone, Debug, Default)]
pub struct TagTable {
    names: Vec<String>,
    ids: HashMap<String, TagId>,
}

impl TagTable {
    pub fn intern(&mut self, name: &str) -> TagId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = TagId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    #[inline]
    pub fn id(&self, name: &str) -> Option<TagId> {
        self.ids.get(name).copied()
    }

    #[inline]
    pub fn name(&self, id: TagId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.names.clear();
        self.ids.clear();
    }
}

/// Read-only view of one vertex's tags, resolvable by name.
#[derive(Clone, Copy, Debug)]
pub struct VertexTags<'a> {
    table: &'a TagTable,
    ids: &'a TagSet,
}

impl<'a> VertexTags<'a> {
    pub(crate) fn new(table: &'a TagTable, ids: &'a TagSet) -> Self {
        Self { table, ids }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn contains_id(&self, id: TagId) -> bool {
        self.ids.contains(&id)
    }

    /// Tag names, sorted.
    pub fn names(&self) -> BTreeSet<&'a str> {
        let table = self.table;
        self.ids.iter().filter_map(|&id| table.name(id)).collect()
    }
}

impl TagLookup for VertexTags<'_> {
    fn has_tag(&self, name: &str) -> bool {
        self.table.id(name).is_some_and(|id| self.ids.contains(&id))
    }
}
