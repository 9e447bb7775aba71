//! Tolerances and per-engine fold configuration.
//!
//! Policy
//! - Tolerances are fixed constants; `FoldCfg` copies them as defaults so an
//!   engine can be tuned without touching call sites.

use nalgebra::Vector3;

/// Signed distance a vertex must clear to count as on the moved side.
/// Points on the axis (within this band) stay static.
pub const SIDE_EPS: f64 = 1e-4;
/// An angle within this many degrees of ±180° is a flat fold.
pub const FLAT_ANGLE_EPS_DEG: f64 = 1e-4;
/// Layer separation applied to the moved side of a flat fold (local units).
pub const FLAT_FOLD_OFFSET: f64 = 1e-3;
/// Drag displacements shorter than this produce no axis.
pub const DRAG_EPS: f64 = 1e-6;
/// Directions shorter than this are treated as degenerate.
pub(crate) const DIR_EPS: f64 = 1e-9;

/// Fold engine configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldCfg {
    pub side_eps: f64,
    pub flat_angle_eps_deg: f64,
    pub flat_offset: f64,
    /// Apply `flat_offset` to flat folds; off yields exactly coplanar layers.
    pub separate_flat_layers: bool,
    /// Global reference axis for the fold-plane test:
    /// `normal = normalize(direction × forward)`.
    ///
    /// Constant across folds; it does not follow the local surface orientation
    /// after out-of-plane folds. The default looks into the sheet (−Z), which
    /// puts the left-hand side of the axis direction (seen from +Z) on the
    /// moved side.
    pub forward: Vector3<f64>,
}

impl Default for FoldCfg {
    fn default() -> Self {
        Self {
            side_eps: SIDE_EPS,
            flat_angle_eps_deg: FLAT_ANGLE_EPS_DEG,
            flat_offset: FLAT_FOLD_OFFSET,
            separate_flat_layers: true,
            forward: Vector3::new(0.0, 0.0, -1.0),
        }
    }
}

impl FoldCfg {
    /// Whether `angle_deg` is a flat (±180°) fold under this configuration.
    #[inline]
    pub fn is_flat(&self, angle_deg: f64) -> bool {
        (angle_deg.abs() - 180.0).abs() <= self.flat_angle_eps_deg
    }
}
