//! Fold a sheet in half, then fold only the flap again.
//!
//! Prints the tag census after each step; run with
//!   cargo run -p paperfold --example half_fold

use paperfold::prelude::*;

fn main() {
    let mut mesh = PaperMesh::new(PaperLayout::default()).expect("default layout is valid");
    let mut engine = FoldEngine::default();

    let half = engine.apply_axis(&mut mesh, FoldAxis::new(0.0, 0.5, 1.0, 0.5), 180.0, Some("h"), None);
    println!(
        "fold {}: moved={} static={}",
        half.fold_number, half.moved, half.static_count
    );

    let flap = engine.apply_axis(
        &mut mesh,
        FoldAxis::new(0.5, 0.0, 0.5, 0.5),
        90.0,
        None,
        Some("h_moved"),
    );
    println!(
        "fold {}: moved={} static={} ineligible={}",
        flap.fold_number, flap.moved, flap.static_count, flap.ineligible
    );

    for (tag, count) in mesh.tag_census() {
        println!("{tag:>16} {count}");
    }
    if let Some(bb) = mesh.bounds() {
        println!("bounds min={:?} max={:?}", bb.mins, bb.maxs);
    }
}
