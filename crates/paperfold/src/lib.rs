//! Paper folding on a subdivided planar mesh, with per-vertex fold provenance.
//!
//! Layers (leaves first)
//! - `param`: parametric `(u, v)` addresses and `FoldAxis`.
//! - `mesh`: grid-generated `PaperMesh`, nearest-vertex coordinate mapping,
//!   and the append-only tag store that records which fold touched what.
//! - `expr`: the small boolean tag language (`AND`/`OR`/`NOT`/parens) used
//!   to restrict a fold to a subset of the paper.
//! - `fold`: partition + rotation, instant and tick-driven.
//! - `drag`: fold axis from a drag gesture.
//!
//! Conventions
//! - The flat sheet lies in the local XY plane facing +Z, centered at the origin.
//! - Angles at the public API are degrees; positive angles lift the moved side
//!   towards +Z.
//! - Folds mutate positions and tags only; vertex count and triangulation are
//!   fixed until `PaperMesh::reset`.

pub mod cfg;
pub mod drag;
pub mod expr;
pub mod fold;
pub mod mesh;
pub mod param;
pub mod rand;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::FoldCfg;
pub use nalgebra::Vector3 as Vec3;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::FoldCfg;
    pub use crate::drag::{derive_axis, DragAxis};
    pub use crate::expr::{
        evaluate, extract_tag_names, validate, validate_report, ExprCache, ExprError, TagExpr,
        TagLookup,
    };
    pub use crate::fold::{
        AnimatedFold, Eligibility, FoldEngine, FoldOutcome, FoldPlan, FoldSpec, FoldStatus, Side,
    };
    pub use crate::mesh::{Aabb3, LayoutError, PaperLayout, PaperMesh, TagId, Vertex};
    pub use crate::param::{FoldAxis, Uv};
    pub use nalgebra::Vector3 as Vec3;
}
