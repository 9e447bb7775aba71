mod provenance;
mod sequence;
mod smoke;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use paperfold::expr::{evaluate, extract_tag_names, validate_report};
use paperfold::fold::FoldEngine;
use paperfold::mesh::{PaperLayout, PaperMesh};
use paperfold::rand::AxisCfg;
use paperfold::FoldCfg;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;

use provenance::{ensure_parent, write_sidecar, Payload};
use sequence::{RunReport, Sequence};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Fold sequences on a paper mesh and inspect vertex provenance")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

/// Paper and engine overrides shared by the folding subcommands.
#[derive(Args, Clone, Copy, Debug)]
struct PaperArgs {
    /// Square paper side length; overrides the sequence layout
    #[arg(long)]
    size: Option<f64>,
    /// Cells per side; overrides the sequence layout
    #[arg(long)]
    cells: Option<usize>,
    /// Layer separation for flat folds
    #[arg(long)]
    flat_offset: Option<f64>,
    /// Do not separate layers on flat folds
    #[arg(long)]
    no_layer_offset: bool,
}

impl PaperArgs {
    fn layout(&self, base: PaperLayout) -> PaperLayout {
        let mut layout = base;
        if let Some(size) = self.size {
            layout.width = size;
            layout.height = size;
        }
        if let Some(cells) = self.cells {
            layout.cells_u = cells;
            layout.cells_v = cells;
        }
        layout
    }

    fn fold_cfg(&self) -> FoldCfg {
        let mut cfg = FoldCfg {
            separate_flat_layers: !self.no_layer_offset,
            ..FoldCfg::default()
        };
        if let Some(offset) = self.flat_offset {
            cfg.flat_offset = offset;
        }
        cfg
    }
}

#[derive(Subcommand)]
enum Action {
    /// Apply a JSON fold sequence and write a run report
    Run {
        #[arg(long)]
        sequence: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Animation tick in seconds for steps with a duration
        #[arg(long, default_value_t = 1.0 / 60.0)]
        tick: f64,
        #[command(flatten)]
        paper: PaperArgs,
    },
    /// Check a tag expression for balanced parentheses and allowed characters
    Validate { expr: String },
    /// Evaluate a tag expression against a tag set
    Eval {
        expr: String,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Apply seeded random folds and check provenance invariants
    Random {
        #[arg(long, default_value_t = 8)]
        folds: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Optional report path
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        paper: PaperArgs,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run {
            sequence,
            out,
            tick,
            paper,
        } => run(&sequence, &out, tick, paper),
        Action::Validate { expr } => validate_cmd(&expr),
        Action::Eval { expr, tags } => eval_cmd(&expr, &tags),
        Action::Random {
            folds,
            seed,
            out,
            paper,
        } => random(folds, seed, out.as_deref(), paper),
        Action::Report => report(),
    }
}

fn run(sequence: &Path, out: &Path, tick: f64, paper: PaperArgs) -> Result<()> {
    tracing::info!(sequence = %sequence.display(), out = %out.display(), tick, "run");
    let seq = Sequence::load(sequence)?;
    let layout = paper.layout(seq.layout.unwrap_or_default().into());
    let mut mesh = PaperMesh::new(layout).context("building paper mesh")?;
    let mut engine = FoldEngine::new(paper.fold_cfg());
    let steps = sequence::run_sequence(&mut mesh, &mut engine, &seq, tick)?;
    let report = RunReport::from_mesh(&mesh, steps);

    write_json(out, &report)?;
    write_sidecar(
        out,
        Payload::new(
            "run",
            json!({
                "sequence": sequence.to_string_lossy(),
                "tick": tick,
                "layout": report.layout,
                "flat_offset": engine.cfg().flat_offset,
                "separate_flat_layers": engine.cfg().separate_flat_layers,
            }),
        ),
    )?;
    tracing::info!(folds = report.fold_count, tags = report.census.len(), "run complete");
    Ok(())
}

fn validate_cmd(expr: &str) -> Result<()> {
    let (valid, message) = validate_report(expr);
    let obj = json!({
        "valid": valid,
        "message": message,
        "tags": extract_tag_names(expr),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    if !valid {
        bail!("invalid tag expression: {message}");
    }
    Ok(())
}

fn eval_cmd(expr: &str, tags: &[String]) -> Result<()> {
    let names: Vec<&str> = tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
    let result = evaluate(expr, names.as_slice());
    tracing::info!(expr, tags = ?names, result, "eval");
    println!("{result}");
    Ok(())
}

fn random(folds: u64, seed: u64, out: Option<&Path>, paper: PaperArgs) -> Result<()> {
    tracing::info!(folds, seed, "random");
    let layout = paper.layout(PaperLayout::default());
    let mut mesh = PaperMesh::new(layout).context("building paper mesh")?;
    let mut engine = FoldEngine::new(paper.fold_cfg());
    let steps = smoke::random_run(&mut mesh, &mut engine, folds, seed, AxisCfg::default())?;
    let report = RunReport::from_mesh(&mesh, steps);
    tracing::info!(folds = report.fold_count, tags = report.census.len(), "invariants hold");

    match out {
        Some(out) => {
            write_json(out, &report)?;
            write_sidecar(
                out,
                Payload::new(
                    "random",
                    json!({ "folds": folds, "seed": seed, "layout": report.layout }),
                ),
            )?;
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "paperfold": paperfold::VERSION,
        "defaults": {
            "layout": sequence::LayoutDoc::default(),
            "flat_offset": FoldCfg::default().flat_offset,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn write_json<T: Serialize>(out: &Path, value: &T) -> Result<()> {
    ensure_parent(out)?;
    fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn no_overrides() -> PaperArgs {
        PaperArgs {
            size: None,
            cells: None,
            flat_offset: None,
            no_layer_offset: false,
        }
    }

    #[test]
    fn run_writes_report_and_sidecar() {
        let dir = tempdir().unwrap();
        let seq_path = dir.path().join("seq.json");
        fs::write(
            &seq_path,
            r#"{ "steps": [ { "axis": { "u1": 0.0, "v1": 0.5, "u2": 1.0, "v2": 0.5 }, "angle": 180.0 } ] }"#,
        )
        .unwrap();
        let out = dir.path().join("out").join("half.json");
        let paper = PaperArgs {
            cells: Some(4),
            ..no_overrides()
        };
        run(&seq_path, &out, 0.1, paper).unwrap();

        let report: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(report["vertices"], 25);
        assert_eq!(report["steps"][0]["moved_tag"], "fold_1_moved");
        assert_eq!(report["census"]["fold_1_moved"], 10);
        assert!(dir.path().join("out").join("half.provenance.json").exists());
    }

    #[test]
    fn run_fails_on_missing_sequence() {
        let dir = tempdir().unwrap();
        let err = run(&dir.path().join("nope.json"), &dir.path().join("o.json"), 0.1, no_overrides())
            .unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }

    #[test]
    fn paper_overrides_apply() {
        let paper = PaperArgs {
            size: Some(2.0),
            cells: Some(3),
            flat_offset: Some(0.01),
            no_layer_offset: true,
        };
        let layout = paper.layout(PaperLayout::default());
        assert_eq!((layout.width, layout.height, layout.cells_u, layout.cells_v), (2.0, 2.0, 3, 3));
        let cfg = paper.fold_cfg();
        assert_eq!(cfg.flat_offset, 0.01);
        assert!(!cfg.separate_flat_layers);
    }
}
