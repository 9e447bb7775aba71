//! Tick-driven fold: the partition is fixed up front, the angle is lerped
//! from 0 to the target over `duration`, and tags are written only on
//! completion.
//!
//! Each tick poses the moved vertices from their *pre-fold* offsets, so ticks
//! never compound. The fold holds the mesh mutably until it is finished or
//! dropped; dropping early leaves the partial rotation in place and writes no
//! tags.

use nalgebra::Vector3;

use super::plan::{FoldPlan, Swing};
use super::{write_tags, FoldOutcome, FoldStatus};
use crate::mesh::PaperMesh;

pub struct AnimatedFold<'m> {
    mesh: &'m mut PaperMesh,
    plan: FoldPlan,
    swing: Swing,
    /// Moved vertex → offset from the pivot before the fold started.
    rest: Vec<(usize, Vector3<f64>)>,
    name: Option<String>,
    flat: bool,
    duration: f64,
    elapsed: f64,
    outcome: Option<FoldOutcome>,
}

impl<'m> AnimatedFold<'m> {
    pub(crate) fn new(
        mesh: &'m mut PaperMesh,
        plan: FoldPlan,
        swing: Swing,
        name: Option<String>,
        flat: bool,
        duration: f64,
    ) -> Self {
        let pivot = swing.pivot();
        let rest = plan
            .moved()
            .map(|i| (i, mesh.vertices()[i].position - pivot))
            .collect();
        Self {
            mesh,
            plan,
            swing,
            rest,
            name,
            flat,
            duration,
            elapsed: 0.0,
            outcome: None,
        }
    }

    /// Advance by `dt` seconds and re-pose the moved side.
    ///
    /// Once done, further ticks return the same outcome without touching the mesh.
    pub fn tick(&mut self, dt: f64) -> FoldStatus {
        if let Some(outcome) = &self.outcome {
            return FoldStatus::Done(outcome.clone());
        }
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        let t = self.progress();
        self.pose(t);
        if t >= 1.0 {
            FoldStatus::Done(self.complete())
        } else {
            FoldStatus::InProgress { progress: t }
        }
    }

    /// Jump to the end pose and write tags.
    pub fn finish(mut self) -> FoldOutcome {
        if let Some(outcome) = self.outcome.take() {
            return outcome;
        }
        self.elapsed = self.duration.max(0.0);
        self.pose(1.0);
        self.complete()
    }

    /// Interpolation progress in [0,1]; non-positive or NaN durations jump to 1.
    pub fn progress(&self) -> f64 {
        if self.duration.is_nan() || self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    #[inline]
    pub fn plan(&self) -> &FoldPlan {
        &self.plan
    }

    /// Read access to the mesh between ticks.
    #[inline]
    pub fn mesh(&self) -> &PaperMesh {
        &*self.mesh
    }

    fn pose(&mut self, t: f64) {
        let vertices = self.mesh.vertices_mut();
        for &(i, rel) in &self.rest {
            vertices[i].position = self.swing.pose(rel, t);
        }
        self.mesh.commit();
    }

    fn complete(&mut self) -> FoldOutcome {
        let outcome = write_tags(self.mesh, &self.plan, self.name.as_deref(), self.flat);
        tracing::debug!(
            fold = outcome.fold_number,
            duration = self.duration,
            "animated fold complete"
        );
        self.outcome = Some(outcome.clone());
        outcome
    }
}
