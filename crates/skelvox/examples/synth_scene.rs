//! Example: synthetic neuron scene.
//!
//! Builds a branching skeleton through a cubic volume together with two
//! surfaces: "somata" as one combined mask of spheres, "spines" as per-id
//! blocks. Runs the export in-process, prints a summary, and writes the scene
//! as JSON so it can be fed to `sv_export`.
//!
//! Run from the workspace root:
//!   cargo run -p skelvox --example synth_scene -- --help
//!   cargo run -p skelvox --example synth_scene -- --out scene.json

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use skelvox::{
    BlockDto, DatasetDto, ExportConfig, JsonScene, SceneDto, SkeletonDto, SurfaceDto, run_export,
};

#[derive(Parser, Debug)]
#[command(about = "Generate a synthetic skeleton + surface scene and export it")]
struct Args {
    /// Voxels per axis
    #[arg(long, default_value_t = 64)]
    size: usize,

    /// Physical edge length of one voxel
    #[arg(long, default_value_t = 0.5)]
    voxel: f64,

    /// Samples per skeleton branch
    #[arg(long, default_value_t = 40)]
    samples: usize,

    /// Output scene JSON
    #[arg(long, default_value = "synth_scene.json")]
    out: String,
}

fn skeleton(extent: f64, samples: usize) -> SkeletonDto {
    let c = extent / 2.0;
    let mut positions = vec![[c, c, c]];
    let mut edges = Vec::new();

    // three branches leaving the center
    let dirs = [[1.0, 0.2, 0.1], [-0.6, 0.8, 0.0], [-0.3, -0.7, 0.5]];
    for d in dirs {
        let norm: f64 = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];
        let step = 0.45 * extent / samples as f64 / norm.sqrt();
        let mut prev = 0;
        for i in 1..=samples {
            let t = i as f64 * step;
            positions.push([c + d[0] * t, c + d[1] * t, c + d[2] * t]);
            let cur = positions.len() - 1;
            edges.push([prev, cur]);
            prev = cur;
        }
    }

    let n = positions.len();
    SkeletonDto {
        positions,
        edges,
        radii: (0..n).map(|i| if i == 0 { 4.0 } else { 0.6 }).collect(),
        types: (0..n).map(|i| if i == 0 { 1 } else { 3 }).collect(),
        beginning: Some(0),
    }
}

fn somata(size: usize, centers: &[[f64; 3]], radius: f64) -> SurfaceDto {
    let mut mask = vec![0i16; size * size * size];
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let p = [x as f64 + 0.5, y as f64 + 0.5, z as f64 + 0.5];
                let inside = centers.iter().any(|c| {
                    (0..3).map(|a| (p[a] - c[a]).powi(2)).sum::<f64>() <= radius * radius
                });
                if inside {
                    mask[(z * size + y) * size + x] = 1;
                }
            }
        }
    }
    SurfaceDto::Combined {
        name: "somata".to_owned(),
        ids: centers.len(),
        dims: [size; 3],
        mask,
    }
}

fn spines(skel: &SkeletonDto, every: usize, half: f64, voxel: f64) -> SurfaceDto {
    let blocks = skel
        .positions
        .iter()
        .skip(1)
        .step_by(every.max(1))
        .map(|p| {
            // hosts hand back cubes; the builder resamples when the clipped
            // block ends up one voxel larger
            let n = (2.0 * half / voxel).round() as usize + 1;
            BlockDto {
                min: [p[0] - half, p[1] - half, p[2] - half],
                max: [p[0] + half, p[1] + half, p[2] + half],
                dims: [n; 3],
                mask: vec![1; n.pow(3)],
            }
        })
        .collect();
    SurfaceDto::Blocks {
        name: "spines".to_owned(),
        blocks,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let extent = args.size as f64 * args.voxel;

    let skel = skeleton(extent, args.samples);
    let soma_center = skel.positions[0].map(|v| v / args.voxel);
    let scene_dto = SceneDto {
        dataset: Some(DatasetDto {
            min: [0.0; 3],
            max: [extent; 3],
            size: [args.size; 3],
        }),
        surfaces: vec![
            somata(args.size, &[soma_center], args.size as f64 / 10.0),
            spines(&skel, 7, 1.0, args.voxel),
        ],
        skeleton: Some(skel),
    };

    let scene = JsonScene::from_dto(scene_dto).context("building scene")?;

    let t0 = Instant::now();
    let bundle = run_export(&scene, ExportConfig::default()).context("running export")?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

    println!(
        "exported {} nodes in {elapsed_ms:.2} ms",
        bundle.report.node_count
    );
    for s in &bundle.report.surfaces {
        println!(
            "  {}: {} labels, {} regions, {} edges hit, {} issues",
            s.name,
            s.label_count,
            s.region_count,
            s.edges_hit,
            s.issues.len()
        );
    }

    let text = scene.to_json().context("serializing scene")?;
    std::fs::write(&args.out, text).with_context(|| format!("writing {}", args.out))?;
    println!("scene written to {}", args.out);
    Ok(())
}
