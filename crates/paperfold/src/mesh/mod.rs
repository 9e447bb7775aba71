//! Paper mesh: grid-generated vertices, fixed triangulation, tag provenance.
//!
//! Purpose
//! - Own every `Vertex` of the sheet; folds borrow the mesh mutably and change
//!   `position` and tags only.
//! - Answer provenance queries (`vertex_tags`, `all_tags`, `select`, ...) for
//!   renderers and sequencing layers.
//!
//! Assumptions and conventions
//! - Vertex `index = j * (cells_u + 1) + i` for grid column `i`, row `j`;
//!   `u = i / cells_u`, `v = j / cells_v`.
//! - Two CCW triangles per cell, seen from +Z.
//! - `reset()` regenerates the whole generation: flat positions, no tags,
//!   fold counter 0.

mod mapper;
mod tags;
mod types;

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::Vector3;

use crate::expr::TagExpr;
use crate::param::Uv;

pub use tags::{TagId, TagTable, VertexTags};
pub use types::{Aabb3, LayoutError, PaperLayout, Vertex};

/// Subdivided sheet plus per-vertex provenance.
#[derive(Clone, Debug)]
pub struct PaperMesh {
    layout: PaperLayout,
    vertices: Vec<Vertex>,
    triangles: Vec<[usize; 3]>,
    normals: Vec<Vector3<f64>>,
    bounds: Option<Aabb3>,
    tags: TagTable,
    fold_count: u64,
}

impl PaperMesh {
    /// Generate a flat, untagged sheet.
    pub fn new(layout: PaperLayout) -> Result<Self, LayoutError> {
        layout.check()?;
        let mut mesh = Self {
            layout,
            vertices: Vec::new(),
            triangles: grid_triangles(layout.cells_u, layout.cells_v),
            normals: Vec::new(),
            bounds: None,
            tags: TagTable::default(),
            fold_count: 0,
        };
        mesh.vertices = grid_vertices(&layout);
        mesh.commit();
        Ok(mesh)
    }

    /// Discard all folds: flat positions, empty tag sets, fold counter 0.
    pub fn reset(&mut self) {
        for vertex in &mut self.vertices {
            vertex.position = vertex.original;
            vertex.tags.clear();
        }
        self.tags.clear();
        self.fold_count = 0;
        self.commit();
        tracing::debug!(vertices = self.vertices.len(), "mesh reset");
    }

    #[inline]
    pub fn layout(&self) -> &PaperLayout {
        &self.layout
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Current positions in index order.
    pub fn positions(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.vertices.iter().map(|v| &v.position)
    }

    #[inline]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Per-vertex normals as of the last commit.
    #[inline]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    #[inline]
    pub fn bounds(&self) -> Option<Aabb3> {
        self.bounds
    }

    /// Completed folds since generation or the last reset.
    #[inline]
    pub fn fold_count(&self) -> u64 {
        self.fold_count
    }

    #[inline]
    pub fn tag_table(&self) -> &TagTable {
        &self.tags
    }

    /// Tag view for one vertex; `None` when out of range.
    pub fn tags_of(&self, index: usize) -> Option<VertexTags<'_>> {
        self.vertices
            .get(index)
            .map(|v| VertexTags::new(&self.tags, &v.tags))
    }

    /// Sorted tag names of one vertex (empty when out of range).
    pub fn vertex_tags(&self, index: usize) -> BTreeSet<&str> {
        self.tags_of(index).map(|t| t.names()).unwrap_or_default()
    }

    /// Every tag carried by at least one vertex.
    pub fn all_tags(&self) -> BTreeSet<&str> {
        // Names are interned only when first written to a vertex.
        self.tags.names().collect()
    }

    /// Indices of vertices carrying `name`.
    pub fn vertices_with_tag(&self, name: &str) -> Vec<usize> {
        let Some(id) = self.tags.id(name) else {
            return Vec::new();
        };
        self.vertices
            .iter()
            .filter(|v| v.tags.contains(&id))
            .map(|v| v.index)
            .collect()
    }

    /// Indices of vertices whose tags satisfy `expr`.
    pub fn select(&self, expr: &TagExpr) -> Vec<usize> {
        self.vertices
            .iter()
            .filter(|v| expr.eval(&VertexTags::new(&self.tags, &v.tags)))
            .map(|v| v.index)
            .collect()
    }

    /// Tag name → number of vertices carrying it.
    pub fn tag_census(&self) -> BTreeMap<&str, usize> {
        let mut counts = vec![0usize; self.tags.len()];
        for v in &self.vertices {
            for id in &v.tags {
                counts[id.0 as usize] += 1;
            }
        }
        self.tags.names().zip(counts).collect()
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub(crate) fn intern(&mut self, name: &str) -> TagId {
        self.tags.intern(name)
    }

    /// Advance the fold counter and return the new fold number (1-based).
    pub(crate) fn next_fold_number(&mut self) -> u64 {
        self.fold_count += 1;
        self.fold_count
    }

    /// Recompute derived geometry after positions changed.
    pub(crate) fn commit(&mut self) {
        self.normals = vertex_normals(&self.vertices, &self.triangles);
        self.bounds = Aabb3::from_points(self.vertices.iter().map(|v| &v.position));
    }
}

fn grid_vertices(layout: &PaperLayout) -> Vec<Vertex> {
    let (nu, nv) = (layout.cells_u, layout.cells_v);
    let mut out = Vec::with_capacity(layout.vertex_count());
    for j in 0..=nv {
        for i in 0..=nu {
            let parametric = Uv::new(i as f64 / nu as f64, j as f64 / nv as f64);
            let flat = layout.flat_position(parametric);
            out.push(Vertex {
                index: out.len(),
                parametric,
                original: flat,
                position: flat,
                tags: Default::default(),
            });
        }
    }
    out
}

fn grid_triangles(nu: usize, nv: usize) -> Vec<[usize; 3]> {
    let stride = nu + 1;
    let mut tris = Vec::with_capacity(2 * nu * nv);
    for j in 0..nv {
        for i in 0..nu {
            let a = j * stride + i;
            let b = a + 1;
            let c = b + stride;
            let d = a + stride;
            tris.push([a, b, c]);
            tris.push([a, c, d]);
        }
    }
    tris
}

/// Area-weighted vertex normals; isolated or collapsed vertices get +Z.
fn vertex_normals(vertices: &[Vertex], triangles: &[[usize; 3]]) -> Vec<Vector3<f64>> {
    let mut acc = vec![Vector3::zeros(); vertices.len()];
    for &[a, b, c] in triangles {
        let pa = vertices[a].position;
        let n = (vertices[b].position - pa).cross(&(vertices[c].position - pa));
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize(crate::cfg::DIR_EPS).unwrap_or_else(Vector3::z))
        .collect()
}
