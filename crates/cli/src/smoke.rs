//! Seeded random fold run with runtime checks of the provenance invariants.
//!
//! Even folds are unrestricted; odd folds only admit the previous fold's
//! moved side. After every fold:
//! - moved + static + ineligible covers the mesh,
//! - every eligible vertex gained exactly one of the two new tags, and every
//!   ineligible vertex gained neither,
//! - no vertex lost a tag.

use std::collections::BTreeSet;

use anyhow::{ensure, Result};
use paperfold::expr::TagExpr;
use paperfold::fold::{FoldEngine, FoldSpec};
use paperfold::mesh::PaperMesh;
use paperfold::rand::{draw_fold, AxisCfg, ReplayToken};

use crate::sequence::{Step, StepReport};

pub fn random_run(
    mesh: &mut PaperMesh,
    engine: &mut FoldEngine,
    folds: u64,
    seed: u64,
    cfg: AxisCfg,
) -> Result<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(folds as usize);
    let mut restrict: Option<String> = None;
    for index in 0..folds {
        let (axis, angle) = draw_fold(cfg, ReplayToken { seed, index });
        let expr = if index % 2 == 1 { restrict.take() } else { None };
        let before: Vec<BTreeSet<String>> = (0..mesh.len())
            .map(|i| mesh.vertex_tags(i).into_iter().map(str::to_owned).collect())
            .collect();

        let mut spec = FoldSpec::from_axis(axis, mesh, angle);
        if let Some(src) = expr.as_deref() {
            spec = spec.with_expression(src);
        }
        let outcome = engine.apply(mesh, &spec);
        tracing::info!(
            index,
            angle,
            filter = expr.as_deref().unwrap_or(""),
            moved = outcome.moved,
            static_count = outcome.static_count,
            "random fold"
        );

        ensure!(
            outcome.moved + outcome.static_count + outcome.ineligible == mesh.len(),
            "fold {index}: partition does not cover the mesh"
        );
        let filter = TagExpr::compile(expr.as_deref().unwrap_or(""));
        for (i, old) in before.iter().enumerate() {
            let now = mesh.vertex_tags(i);
            ensure!(
                old.iter().all(|t| now.contains(t.as_str())),
                "fold {index}: vertex {i} lost a tag"
            );
            let got_moved = now.contains(outcome.moved_tag.as_str());
            let got_static = now.contains(outcome.static_tag.as_str());
            let eligible = filter.eval(old);
            ensure!(
                !(got_moved && got_static),
                "fold {index}: vertex {i} tagged both moved and static"
            );
            ensure!(
                (got_moved || got_static) == eligible,
                "fold {index}: vertex {i} eligibility {eligible} does not match its tags"
            );
        }

        restrict = Some(outcome.moved_tag.clone());
        let step = Step {
            axis: axis.into(),
            angle,
            tag_name: None,
            tag_expression: expr,
            duration: None,
        };
        reports.push(StepReport::new(index as usize, &step, 0, outcome));
    }
    Ok(reports)
}
