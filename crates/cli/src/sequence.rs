//! Scripted fold sequences: the JSON input document and the run report.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use paperfold::expr::validate;
use paperfold::fold::{Eligibility, FoldEngine, FoldOutcome, FoldSpec, FoldStatus};
use paperfold::mesh::{PaperLayout, PaperMesh};
use paperfold::param::FoldAxis;
use serde::{Deserialize, Serialize};

/// Paper layout as written in a sequence file; missing fields take defaults.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LayoutDoc {
    pub width: f64,
    pub height: f64,
    pub cells_u: usize,
    pub cells_v: usize,
}

impl Default for LayoutDoc {
    fn default() -> Self {
        PaperLayout::default().into()
    }
}

impl From<PaperLayout> for LayoutDoc {
    fn from(l: PaperLayout) -> Self {
        Self {
            width: l.width,
            height: l.height,
            cells_u: l.cells_u,
            cells_v: l.cells_v,
        }
    }
}

impl From<LayoutDoc> for PaperLayout {
    fn from(d: LayoutDoc) -> Self {
        PaperLayout {
            width: d.width,
            height: d.height,
            cells_u: d.cells_u,
            cells_v: d.cells_v,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct AxisDoc {
    pub u1: f64,
    pub v1: f64,
    pub u2: f64,
    pub v2: f64,
}

impl From<AxisDoc> for FoldAxis {
    fn from(a: AxisDoc) -> Self {
        FoldAxis::new(a.u1, a.v1, a.u2, a.v2)
    }
}

impl From<FoldAxis> for AxisDoc {
    fn from(a: FoldAxis) -> Self {
        Self {
            u1: a.u1,
            v1: a.v1,
            u2: a.u2,
            v2: a.v2,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Step {
    pub axis: AxisDoc,
    /// Signed degrees.
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_expression: Option<String>,
    /// Seconds; absent or non-positive folds instantly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Sequence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutDoc>,
    pub steps: Vec<Step>,
}

impl Sequence {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    /// Reject bad expressions, angles and axes before any fold is applied.
    ///
    /// Axes that only collapse on the mesh (both ends snapping to one vertex)
    /// are caught per step by `run_sequence`.
    pub fn check(&self) -> Result<()> {
        for (i, step) in self.steps.iter().enumerate() {
            ensure!(step.angle.is_finite(), "step {i}: angle must be finite");
            if FoldAxis::from(step.axis).is_degenerate() {
                bail!("step {i}: fold axis has zero length");
            }
            if let Some(expr) = &step.tag_expression {
                validate(expr).with_context(|| format!("step {i}: tag expression {expr:?}"))?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct BoundsDoc {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub axis: AxisDoc,
    pub angle: f64,
    /// Ticks used by an animated step; 0 for instant folds.
    pub ticks: usize,
    pub fold_number: u64,
    pub moved_tag: String,
    pub static_tag: String,
    pub moved: usize,
    pub static_count: usize,
    pub ineligible: usize,
    pub flat: bool,
}

impl StepReport {
    pub(crate) fn new(index: usize, step: &Step, ticks: usize, out: FoldOutcome) -> Self {
        Self {
            index,
            axis: step.axis,
            angle: step.angle,
            ticks,
            fold_number: out.fold_number,
            moved_tag: out.moved_tag,
            static_tag: out.static_tag,
            moved: out.moved,
            static_count: out.static_count,
            ineligible: out.ineligible,
            flat: out.flat,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RunReport {
    pub layout: LayoutDoc,
    pub vertices: usize,
    pub fold_count: u64,
    pub steps: Vec<StepReport>,
    pub census: BTreeMap<String, usize>,
    pub bounds: Option<BoundsDoc>,
}

impl RunReport {
    pub fn from_mesh(mesh: &PaperMesh, steps: Vec<StepReport>) -> Self {
        Self {
            layout: (*mesh.layout()).into(),
            vertices: mesh.len(),
            fold_count: mesh.fold_count(),
            steps,
            census: mesh
                .tag_census()
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v))
                .collect(),
            bounds: mesh.bounds().map(|bb| BoundsDoc {
                min: [bb.mins.x, bb.mins.y, bb.mins.z],
                max: [bb.maxs.x, bb.maxs.y, bb.maxs.z],
            }),
        }
    }
}

/// Apply every step of `seq` to `mesh` in order.
///
/// Animated steps advance by `tick` seconds until done.
pub fn run_sequence(
    mesh: &mut PaperMesh,
    engine: &mut FoldEngine,
    seq: &Sequence,
    tick: f64,
) -> Result<Vec<StepReport>> {
    seq.check()?;
    ensure!(tick.is_finite() && tick > 0.0, "tick must be positive, got {tick}");
    let mut reports = Vec::with_capacity(seq.steps.len());
    for (i, step) in seq.steps.iter().enumerate() {
        let mut spec = FoldSpec::from_axis(step.axis.into(), mesh, step.angle);
        ensure!(
            !spec.is_degenerate(),
            "step {i}: fold axis collapses to a single vertex"
        );
        spec.name = step.tag_name.as_deref();
        if let Some(expr) = step.tag_expression.as_deref() {
            spec.eligibility = Eligibility::Expression(expr);
        }
        let duration = step.duration.unwrap_or(0.0);
        let (outcome, ticks) = if duration > 0.0 {
            let mut anim = engine.animate(mesh, &spec, duration);
            let mut ticks = 0usize;
            loop {
                ticks += 1;
                if let FoldStatus::Done(outcome) = anim.tick(tick) {
                    break (outcome, ticks);
                }
            }
        } else {
            (engine.apply(mesh, &spec), 0)
        };
        tracing::info!(
            step = i,
            fold = outcome.fold_number,
            moved = outcome.moved,
            static_count = outcome.static_count,
            ineligible = outcome.ineligible,
            ticks,
            "fold step"
        );
        reports.push(StepReport::new(i, step, ticks, outcome));
    }
    Ok(reports)
}
