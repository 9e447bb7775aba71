//! Fold axis from a drag gesture.
//!
//! The axis is the perpendicular bisector of the drag (origin → target) inside
//! the plane with normal `reference_normal`, long enough to span the sheet in
//! any orientation, and oriented so that the drag origin is on the moved side.
//! Folding 180° about it carries the origin onto the target.

use nalgebra::Vector3;

use crate::cfg::{FoldCfg, DIR_EPS, DRAG_EPS};
use crate::fold::FoldSpec;
use crate::mesh::PaperLayout;
use crate::param::FoldAxis;

/// Local-space axis segment produced by `derive_axis`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragAxis {
    pub start: Vector3<f64>,
    pub end: Vector3<f64>,
}

impl DragAxis {
    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        (self.end - self.start).normalize()
    }

    /// Unrestricted, unnamed fold about this axis.
    pub fn spec(&self, angle_deg: f64) -> FoldSpec<'static> {
        FoldSpec::new(self.start, self.end, angle_deg)
    }

    /// Parametric form for reporting, clipped to the flat sheet first so that
    /// clamping does not bend the line. A line missing the sheet clamps as-is.
    pub fn to_fold_axis(&self, layout: &PaperLayout) -> FoldAxis {
        let (hw, hh) = (layout.width * 0.5, layout.height * 0.5);
        let d = self.end - self.start;
        let mut lo = 0.0f64;
        let mut hi = 1.0f64;
        for (p, dp, half) in [(self.start.x, d.x, hw), (self.start.y, d.y, hh)] {
            if dp.abs() < DIR_EPS {
                if p.abs() > half {
                    lo = 1.0;
                    hi = 0.0;
                }
                continue;
            }
            let a = (-half - p) / dp;
            let b = (half - p) / dp;
            lo = lo.max(a.min(b));
            hi = hi.min(a.max(b));
        }
        if lo > hi {
            return FoldAxis::from_local(self.start, self.end, layout);
        }
        FoldAxis::from_local(self.start + d * lo, self.start + d * hi, layout)
    }
}

/// Derive a fold axis from a drag.
///
/// Returns `None` only when the drag is shorter than `DRAG_EPS` (keep the
/// previous axis). A displacement along `reference_normal` falls back to its
/// XY perpendicular, and a displacement purely along Z to local X.
pub fn derive_axis(
    origin: Vector3<f64>,
    target: Vector3<f64>,
    reference_normal: Vector3<f64>,
    layout: &PaperLayout,
    cfg: &FoldCfg,
) -> Option<DragAxis> {
    let drag = target - origin;
    if drag.norm() < DRAG_EPS {
        tracing::trace!("drag too short; keeping previous axis");
        return None;
    }
    let dir = reference_normal
        .cross(&drag)
        .try_normalize(DIR_EPS)
        // Displacement along the reference normal: perpendicular within XY.
        .or_else(|| Vector3::new(-drag.y, drag.x, 0.0).try_normalize(DIR_EPS))
        // Pure Z displacement: every XY direction is perpendicular.
        .unwrap_or_else(Vector3::x);

    let mid = (origin + target) * 0.5;
    let reach = 2.0 * layout.largest_dimension();
    let mut axis = DragAxis {
        start: mid - dir * reach,
        end: mid + dir * reach,
    };

    let normal = dir.cross(&cfg.forward).normalize();
    let side = |p: Vector3<f64>, start: Vector3<f64>| (p - start).dot(&normal);
    let origin_moves = side(origin, axis.start) > cfg.side_eps;
    let target_stays = side(target, axis.start) <= cfg.side_eps;
    if !(origin_moves && target_stays) {
        std::mem::swap(&mut axis.start, &mut axis.end);
    }
    tracing::debug!(start = ?axis.start, end = ?axis.end, "drag axis");
    Some(axis)
}
