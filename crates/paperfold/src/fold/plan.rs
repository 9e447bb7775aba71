//! Partition of the mesh for one fold, and the rigid motion of the moved side.

use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::cfg::FoldCfg;
use crate::mesh::{PaperMesh, VertexTags};

/// Where a vertex falls for one fold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Rejected by the eligibility predicate; untouched, untagged.
    Ineligible,
    /// Eligible and strictly on the positive side of the fold plane.
    Moved,
    /// Eligible, on the axis or the non-positive side.
    Static,
}

/// Fold geometry plus the per-vertex side assignment.
///
/// Built completely before any mutation, so a panicking predicate leaves the
/// mesh untouched.
#[derive(Clone, Debug)]
pub struct FoldPlan {
    pub start: Vector3<f64>,
    /// `normalize(end - start)`; NaN for a zero-length axis.
    pub direction: Vector3<f64>,
    /// `normalize(direction × cfg.forward)`.
    pub normal: Vector3<f64>,
    /// Indexed like the mesh vertices.
    pub sides: Vec<Side>,
}

impl FoldPlan {
    pub fn partition<F>(
        mesh: &PaperMesh,
        start: Vector3<f64>,
        end: Vector3<f64>,
        cfg: &FoldCfg,
        mut eligible: F,
    ) -> Self
    where
        F: FnMut(&VertexTags<'_>) -> bool,
    {
        // Zero-length axes are not guarded: normalize() yields NaN and every
        // side test below fails, leaving all eligible vertices static.
        let direction = (end - start).normalize();
        let normal = direction.cross(&cfg.forward).normalize();
        let sides = mesh
            .vertices()
            .iter()
            .map(|v| {
                let ok = mesh.tags_of(v.index).is_some_and(|t| eligible(&t));
                if !ok {
                    Side::Ineligible
                } else if (v.position - start).dot(&normal) > cfg.side_eps {
                    Side::Moved
                } else {
                    Side::Static
                }
            })
            .collect();
        Self {
            start,
            direction,
            normal,
            sides,
        }
    }

    pub fn moved(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices(Side::Moved)
    }

    pub fn indices(&self, side: Side) -> impl Iterator<Item = usize> + '_ {
        self.sides
            .iter()
            .enumerate()
            .filter(move |(_, s)| **s == side)
            .map(|(i, _)| i)
    }

    /// `(moved, static, ineligible)` counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.sides
            .iter()
            .fold((0, 0, 0), |(m, s, n), side| match side {
                Side::Moved => (m + 1, s, n),
                Side::Static => (m, s + 1, n),
                Side::Ineligible => (m, s, n + 1),
            })
    }
}

/// Rotation of the moved side about the fold line, optionally lifted off the
/// sheet for flat folds.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Swing {
    pivot: Vector3<f64>,
    axis: Unit<Vector3<f64>>,
    angle: f64,
    /// Full flat-fold layer offset; zero for non-flat folds.
    lift: Vector3<f64>,
}

impl Swing {
    pub(crate) fn new(plan: &FoldPlan, angle_deg: f64, cfg: &FoldCfg) -> Self {
        let lift = if cfg.is_flat(angle_deg) && cfg.separate_flat_layers {
            plan.direction.cross(&plan.normal) * (angle_deg.signum() * cfg.flat_offset)
        } else {
            Vector3::zeros()
        };
        Self {
            pivot: plan.start,
            // Already unit length (or NaN, which must propagate).
            axis: Unit::new_unchecked(plan.direction),
            angle: angle_deg.to_radians(),
            lift,
        }
    }

    /// Position of a vertex with pre-fold offset `rel` from the pivot, at
    /// fraction `t` ∈ [0,1] of the fold.
    #[inline]
    pub(crate) fn pose(&self, rel: Vector3<f64>, t: f64) -> Vector3<f64> {
        let q = UnitQuaternion::from_axis_angle(&self.axis, self.angle * t);
        self.pivot + q * rel + self.lift * t
    }

    #[inline]
    pub(crate) fn pivot(&self) -> Vector3<f64> {
        self.pivot
    }
}
