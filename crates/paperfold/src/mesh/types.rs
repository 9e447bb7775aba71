//! Plain data for the paper mesh: layout, vertices, bounds.

use std::fmt;

use nalgebra::Vector3;

use crate::mesh::tags::TagSet;
use crate::param::Uv;

/// Sheet size and grid subdivision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaperLayout {
    pub width: f64,
    pub height: f64,
    /// Cells along u (local X).
    pub cells_u: usize,
    /// Cells along v (local Y).
    pub cells_v: usize,
}

impl Default for PaperLayout {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            cells_u: 10,
            cells_v: 10,
        }
    }
}

impl PaperLayout {
    pub fn square(size: f64, cells: usize) -> Self {
        Self {
            width: size,
            height: size,
            cells_u: cells,
            cells_v: cells,
        }
    }

    pub fn check(&self) -> Result<(), LayoutError> {
        if !(self.width > 0.0 && self.width.is_finite())
            || !(self.height > 0.0 && self.height.is_finite())
        {
            return Err(LayoutError::BadSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.cells_u == 0 || self.cells_v == 0 {
            return Err(LayoutError::NoCells {
                cells_u: self.cells_u,
                cells_v: self.cells_v,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        (self.cells_u + 1) * (self.cells_v + 1)
    }

    /// Largest side of the flat sheet.
    #[inline]
    pub fn largest_dimension(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Flat-layout position of a parametric coordinate.
    #[inline]
    pub fn flat_position(&self, p: Uv) -> Vector3<f64> {
        Vector3::new((p.u - 0.5) * self.width, (p.v - 0.5) * self.height, 0.0)
    }
}

/// Rejected `PaperLayout`.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Width or height not a positive finite number.
    BadSize { width: f64, height: f64 },
    /// Zero cells along an axis.
    NoCells { cells_u: usize, cells_v: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::BadSize { width, height } => {
                write!(f, "paper size must be positive and finite (got {width} x {height})")
            }
            LayoutError::NoCells { cells_u, cells_v } => write!(
                f,
                "paper needs at least one cell per axis (got {cells_u} x {cells_v})"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// One mesh vertex.
///
/// Invariants:
/// - `index` and `parametric` never change for the lifetime of a mesh generation.
/// - `tags` only grows between resets.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub index: usize,
    pub parametric: Uv,
    /// Generation-time flat position.
    pub original: Vector3<f64>,
    /// Current position (mesh-local).
    pub position: Vector3<f64>,
    pub(crate) tags: TagSet,
}

/// Axis-aligned bounds of the current vertex positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
    pub mins: Vector3<f64>,
    pub maxs: Vector3<f64>,
}

impl Aabb3 {
    /// Bounds of `points`; `None` if empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vector3<f64>>,
    {
        let mut it = points.into_iter();
        let first = *it.next()?;
        let mut bb = Aabb3 {
            mins: first,
            maxs: first,
        };
        for p in it {
            bb.mins = bb.mins.inf(p);
            bb.maxs = bb.maxs.sup(p);
        }
        Some(bb)
    }

    #[inline]
    pub fn extents(&self) -> Vector3<f64> {
        self.maxs - self.mins
    }

    #[inline]
    pub fn center(&self) -> Vector3<f64> {
        (self.mins + self.maxs) * 0.5
    }
}
