//! Coordinate mapping between `(u, v)` and mesh-local positions.
//!
//! - `parametric_to_local`: current position of the vertex whose stored `(u, v)`
//!   is nearest under L1. An approximation, not interpolation: the result is
//!   always an existing vertex position. Ties go to the lowest index.
//! - `local_to_parametric`: flat-layout inverse (`u = x/width + 0.5`, ...).
//!
//! The two are exact inverses only on grid points of an unfolded sheet.

use nalgebra::Vector3;

use super::{PaperLayout, PaperMesh};
use crate::param::Uv;

impl PaperMesh {
    /// Current position of the vertex nearest to `p` in parameter space.
    ///
    /// Returns the origin for an empty mesh.
    pub fn parametric_to_local(&self, p: Uv) -> Vector3<f64> {
        self.nearest_vertex(p)
            .map(|i| self.vertices[i].position)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Index of the vertex nearest to `p` (L1 over `(u, v)`, first found wins).
    pub fn nearest_vertex(&self, p: Uv) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for v in &self.vertices {
            let d = v.parametric.l1(&p);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((v.index, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    #[inline]
    pub fn local_to_parametric(&self, point: Vector3<f64>) -> Uv {
        self.layout().local_to_parametric(point)
    }
}

impl PaperLayout {
    /// Flat-layout inverse; ignores `z` and clamps to the sheet.
    #[inline]
    pub fn local_to_parametric(&self, point: Vector3<f64>) -> Uv {
        Uv::new(point.x / self.width + 0.5, point.y / self.height + 0.5)
    }
}
