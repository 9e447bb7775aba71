//! Parametric addresses on the flat sheet.
//!
//! `(u, v)` ∈ [0,1]² names a location on the paper's original layout; `u`
//! runs along local +X and `v` along local +Y. Values are clamped on
//! construction, so every `Uv`/`FoldAxis` in circulation is in range.

use nalgebra::Vector3;

use crate::mesh::{PaperLayout, PaperMesh};

/// Parametric coordinate, clamped to the unit square.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Uv {
    pub u: f64,
    pub v: f64,
}

impl Uv {
    #[inline]
    pub fn new(u: f64, v: f64) -> Self {
        Self {
            u: clamp01(u),
            v: clamp01(v),
        }
    }

    /// L1 distance in parameter space.
    #[inline]
    pub fn l1(&self, other: &Uv) -> f64 {
        (self.u - other.u).abs() + (self.v - other.v).abs()
    }
}

/// Fold axis given by two parametric points.
///
/// Denotes an infinite line. The 3D line it maps to depends on the mesh's
/// *current* vertex positions, so the same value can name different lines
/// before and after earlier folds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FoldAxis {
    pub u1: f64,
    pub v1: f64,
    pub u2: f64,
    pub v2: f64,
}

impl FoldAxis {
    pub fn new(u1: f64, v1: f64, u2: f64, v2: f64) -> Self {
        Self {
            u1: clamp01(u1),
            v1: clamp01(v1),
            u2: clamp01(u2),
            v2: clamp01(v2),
        }
    }

    #[inline]
    pub fn start(&self) -> Uv {
        Uv::new(self.u1, self.v1)
    }

    #[inline]
    pub fn end(&self) -> Uv {
        Uv::new(self.u2, self.v2)
    }

    /// Both endpoints coincide in parameter space. Folding about such an axis
    /// yields NaN geometry; check this first.
    pub fn is_degenerate(&self) -> bool {
        self.start().l1(&self.end()) == 0.0
    }

    /// Local-space endpoints through the nearest-vertex mapping on current positions.
    pub fn to_local(&self, mesh: &PaperMesh) -> (Vector3<f64>, Vector3<f64>) {
        (
            mesh.parametric_to_local(self.start()),
            mesh.parametric_to_local(self.end()),
        )
    }

    /// Parametric axis of a local-space segment via the flat-layout inverse.
    ///
    /// Exact only while the sheet is unfolded; endpoints off the sheet clamp
    /// to its border.
    pub fn from_local(start: Vector3<f64>, end: Vector3<f64>, layout: &PaperLayout) -> Self {
        let a = layout.local_to_parametric(start);
        let b = layout.local_to_parametric(end);
        Self::new(a.u, a.v, b.u, b.v)
    }
}

#[inline]
fn clamp01(x: f64) -> f64 {
    // NaN stays NaN; clamp panics only on an invalid range.
    x.clamp(0.0, 1.0)
}
