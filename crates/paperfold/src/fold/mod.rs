//! Fold engine: partition, rotate, record provenance.
//!
//! Purpose
//! - Given a local-space axis, a signed angle (degrees), an optional base name
//!   and an optional eligibility filter, split the mesh into ineligible /
//!   moved / static vertices, rotate the moved side about the axis and tag
//!   every eligible vertex with exactly one of `{name}_moved`/`{name}_static`.
//!
//! Assumptions and conventions
//! - Fold-plane normal is `normalize(direction × cfg.forward)` with a global
//!   `forward`, not the local surface normal. Multi-fold results are exact only
//!   while folds stay coplanar about that axis.
//! - Flat folds (±180°) lift the moved side by `cfg.flat_offset` along
//!   `direction × normal` (sign of the angle) to keep layers apart.
//! - Unnamed folds use `fold_{n}` with `n` the 1-based fold number.
//! - Each call is atomic per mesh; `AnimatedFold` borrows the mesh until done,
//!   so folds on one mesh cannot interleave.
//! - A zero-length axis is not rejected (NaN direction); check
//!   `FoldSpec::is_degenerate` first.

mod animate;
mod plan;

use std::fmt;

use nalgebra::Vector3;

use crate::cfg::{FoldCfg, DIR_EPS};
use crate::expr::{ExprCache, TagExpr};
use crate::mesh::{PaperMesh, VertexTags};
use crate::param::FoldAxis;

pub use animate::AnimatedFold;
pub use plan::{FoldPlan, Side};

use plan::Swing;

/// Which vertices may take part in a fold.
#[derive(Clone, Copy, Default)]
pub enum Eligibility<'a> {
    #[default]
    All,
    /// Tag expression source; compiled through the engine's cache.
    Expression(&'a str),
    Compiled(&'a TagExpr),
    Predicate(&'a dyn Fn(&VertexTags<'_>) -> bool),
}

impl fmt::Debug for Eligibility<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eligibility::All => write!(f, "All"),
            Eligibility::Expression(src) => write!(f, "Expression({src:?})"),
            Eligibility::Compiled(e) => write!(f, "Compiled({e})"),
            Eligibility::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// One fold request in local space.
#[derive(Clone, Copy, Debug)]
pub struct FoldSpec<'a> {
    pub start: Vector3<f64>,
    pub end: Vector3<f64>,
    pub angle_deg: f64,
    pub name: Option<&'a str>,
    pub eligibility: Eligibility<'a>,
}

impl<'a> FoldSpec<'a> {
    pub fn new(start: Vector3<f64>, end: Vector3<f64>, angle_deg: f64) -> Self {
        Self {
            start,
            end,
            angle_deg,
            name: None,
            eligibility: Eligibility::All,
        }
    }

    /// Local endpoints of a parametric axis on the mesh's current positions.
    pub fn from_axis(axis: FoldAxis, mesh: &PaperMesh, angle_deg: f64) -> Self {
        let (start, end) = axis.to_local(mesh);
        Self::new(start, end, angle_deg)
    }

    pub fn named(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Restrict to vertices matching a tag expression; blank means everyone.
    pub fn with_expression(mut self, expr: &'a str) -> Self {
        self.eligibility = Eligibility::Expression(expr);
        self
    }

    pub fn with_predicate(mut self, pred: &'a dyn Fn(&VertexTags<'_>) -> bool) -> Self {
        self.eligibility = Eligibility::Predicate(pred);
        self
    }

    /// Endpoints coincide in local space, so the fold has no direction.
    ///
    /// Unlike `FoldAxis::is_degenerate` this also catches distinct `(u, v)`
    /// endpoints that snap to one vertex, or vertices stacked by earlier folds.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let len = (self.end - self.start).norm();
        len.is_nan() || len < DIR_EPS
    }
}

/// Result of a completed fold.
#[derive(Clone, Debug, PartialEq)]
pub struct FoldOutcome {
    /// 1-based fold number on this mesh generation.
    pub fold_number: u64,
    pub moved_tag: String,
    pub static_tag: String,
    pub moved: usize,
    pub static_count: usize,
    pub ineligible: usize,
    pub flat: bool,
}

/// Progress of an `AnimatedFold`.
#[derive(Clone, Debug, PartialEq)]
pub enum FoldStatus {
    InProgress { progress: f64 },
    Done(FoldOutcome),
}

/// Stateless apart from configuration and a compiled-expression cache.
#[derive(Clone, Debug, Default)]
pub struct FoldEngine {
    cfg: FoldCfg,
    cache: ExprCache,
}

impl FoldEngine {
    pub fn new(cfg: FoldCfg) -> Self {
        Self {
            cfg,
            cache: ExprCache::new(),
        }
    }

    #[inline]
    pub fn cfg(&self) -> &FoldCfg {
        &self.cfg
    }

    #[inline]
    pub fn cache(&self) -> &ExprCache {
        &self.cache
    }

    /// Partition only; the mesh is not modified.
    pub fn plan(&mut self, mesh: &PaperMesh, spec: &FoldSpec<'_>) -> FoldPlan {
        if spec.is_degenerate() {
            tracing::warn!(start = ?spec.start, end = ?spec.end, "zero-length fold axis");
        }
        let cfg = self.cfg;
        let plan = match spec.eligibility {
            Eligibility::All => FoldPlan::partition(mesh, spec.start, spec.end, &cfg, |_| true),
            Eligibility::Expression(src) => {
                let expr = self.cache.get(src);
                FoldPlan::partition(mesh, spec.start, spec.end, &cfg, |t| expr.eval(t))
            }
            Eligibility::Compiled(expr) => {
                FoldPlan::partition(mesh, spec.start, spec.end, &cfg, |t| expr.eval(t))
            }
            Eligibility::Predicate(pred) => {
                FoldPlan::partition(mesh, spec.start, spec.end, &cfg, pred)
            }
        };
        let (moved, stat, skipped) = plan.counts();
        tracing::debug!(
            filter = ?spec.eligibility,
            moved,
            static_count = stat,
            ineligible = skipped,
            "fold partition"
        );
        plan
    }

    /// Fold instantly.
    pub fn apply(&mut self, mesh: &mut PaperMesh, spec: &FoldSpec<'_>) -> FoldOutcome {
        self.animate(mesh, spec, 0.0).finish()
    }

    /// Convenience for a parametric axis on current positions.
    pub fn apply_axis(
        &mut self,
        mesh: &mut PaperMesh,
        axis: FoldAxis,
        angle_deg: f64,
        name: Option<&str>,
        expr: Option<&str>,
    ) -> FoldOutcome {
        let mut spec = FoldSpec::from_axis(axis, mesh, angle_deg);
        spec.name = name;
        if let Some(src) = expr {
            spec.eligibility = Eligibility::Expression(src);
        }
        self.apply(mesh, &spec)
    }

    /// Start a fold driven by `AnimatedFold::tick` over `duration` seconds.
    pub fn animate<'m>(
        &mut self,
        mesh: &'m mut PaperMesh,
        spec: &FoldSpec<'_>,
        duration: f64,
    ) -> AnimatedFold<'m> {
        let plan = self.plan(mesh, spec);
        let swing = Swing::new(&plan, spec.angle_deg, &self.cfg);
        let flat = self.cfg.is_flat(spec.angle_deg);
        AnimatedFold::new(
            mesh,
            plan,
            swing,
            spec.name.map(str::to_owned),
            flat,
            duration,
        )
    }
}

/// Tag every eligible vertex and bump the fold counter.
///
/// Tags are interned only when some vertex receives them, so `all_tags` never
/// lists a tag nobody carries.
pub(crate) fn write_tags(
    mesh: &mut PaperMesh,
    plan: &FoldPlan,
    name: Option<&str>,
    flat: bool,
) -> FoldOutcome {
    let fold_number = mesh.next_fold_number();
    let base = match name {
        Some(n) if !n.trim().is_empty() => n.to_owned(),
        _ => format!("fold_{fold_number}"),
    };
    let moved_tag = format!("{base}_moved");
    let static_tag = format!("{base}_static");
    let (moved, static_count, ineligible) = plan.counts();

    let moved_id = (moved > 0).then(|| mesh.intern(&moved_tag));
    let static_id = (static_count > 0).then(|| mesh.intern(&static_tag));
    for (vertex, side) in mesh.vertices_mut().iter_mut().zip(&plan.sides) {
        let id = match side {
            Side::Moved => moved_id,
            Side::Static => static_id,
            Side::Ineligible => None,
        };
        if let Some(id) = id {
            vertex.tags.insert(id);
        }
    }
    tracing::debug!(fold = fold_number, %moved_tag, %static_tag, moved, static_count, "fold tagged");
    FoldOutcome {
        fold_number,
        moved_tag,
        static_tag,
        moved,
        static_count,
        ineligible,
        flat,
    }
}
