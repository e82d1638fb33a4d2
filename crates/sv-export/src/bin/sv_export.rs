use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::{ImageBuffer, Luma};
use serde::{Deserialize, Serialize};
use skelvox::{
    ConnectivityDto, ExportConfig, ExportConfigDto, FlipDto, JsonScene, RunContext, TraversalDto,
    UnitsDto, Volume, build_label_image, read_swc, records_to_skeleton, run_export,
    write_stats_table,
};

#[derive(Parser, Debug)]
#[command(name = "sv_export")]
#[command(about = "Export neuron skeletons as SWC annotated with surface label crossings")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the SWC, per-surface statistics tables and the run report.
    #[command(name = "export")]
    Export(ExportArgs),
    /// Write the label volume of one surface as 16-bit z-slices.
    #[command(name = "label-image")]
    LabelImage(LabelImageArgs),
    /// Replace the scene skeleton with one read from an SWC file.
    #[command(name = "import")]
    Import(ImportArgs),
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// JSON export config; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// SWC coordinate units
    #[arg(long, value_enum)]
    units: Option<UnitsDto>,
    /// Axes whose inverted extent is corrected
    #[arg(long, value_enum)]
    flip: Option<FlipDto>,
    /// Labeling connectivity of combined masks
    #[arg(long, value_enum)]
    connectivity: Option<ConnectivityDto>,
    /// Node order of the exported tree
    #[arg(long, value_enum)]
    traversal: Option<TraversalDto>,
}

#[derive(Args, Debug, Clone)]
struct ExportArgs {
    #[arg(long, required = true)]
    scene: PathBuf,
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Base name of the output files; defaults to the scene file stem.
    #[arg(long)]
    name: Option<String>,
    /// Surface to process; repeat for several. Defaults to all surfaces.
    #[arg(long = "surface")]
    surfaces: Vec<String>,
    /// Process no surface at all.
    #[arg(long, conflicts_with = "surfaces")]
    no_surfaces: bool,
    /// Plain 7-column SWC instead of the extended format.
    #[arg(long)]
    plain: bool,
    /// Also write traced-segment overlays per surface.
    #[arg(long)]
    debug_overlay: bool,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug, Clone)]
struct LabelImageArgs {
    #[arg(long, required = true)]
    scene: PathBuf,
    #[arg(long, required = true)]
    surface: String,
    #[arg(long, default_value = "out")]
    out: PathBuf,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug, Clone)]
struct ImportArgs {
    #[arg(long, required = true)]
    scene: PathBuf,
    #[arg(long, required = true)]
    swc: PathBuf,
    /// Output scene; defaults to overwriting `--scene`.
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Debug, Clone, Serialize)]
struct MetaLabelImage {
    surface: String,
    dims: [usize; 3],
    label_count: u32,
    flipped_axes: Vec<String>,
    issues: Vec<String>,
    slices: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Export(args) => run_export_cmd(args),
        Command::LabelImage(args) => run_label_image(args),
        Command::Import(args) => run_import(args),
    }
}

fn run_export_cmd(args: ExportArgs) -> Result<()> {
    let scene = load_scene(&args.scene)?;

    let mut dto = load_config(&args.config)?;
    if args.no_surfaces {
        dto.surfaces = Some(Vec::new());
    } else if !args.surfaces.is_empty() {
        dto.surfaces = Some(args.surfaces.clone());
    }
    if args.plain {
        dto.extended = false;
    }
    if args.debug_overlay {
        dto.debug_overlay = true;
    }
    let config = ExportConfig::from(dto);

    let bundle = run_export(&scene, config)
        .with_context(|| format!("exporting scene {}", args.scene.display()))?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;
    let base = match &args.name {
        Some(name) => name.clone(),
        None => file_stem(&args.scene)?,
    };

    let swc_name = if bundle.context.config().extended {
        format!("{base}.extended.swc")
    } else {
        format!("{base}.swc")
    };
    let mut swc = Vec::new();
    bundle.write_swc(&mut swc).context("formatting swc")?;
    write_bytes(args.out.join(swc_name), &swc)?;

    for s in &bundle.stats {
        let mut table = Vec::new();
        write_stats_table(&mut table, &s.regions).context("formatting statistics table")?;
        write_bytes(args.out.join(format!("{base}_{}.tab", file_part(&s.name))), &table)?;
    }

    if let Some(overlay) = &bundle.overlay {
        for (name, vol) in overlay.volumes() {
            let dir = args.out.join(format!("{base}_{}_db", file_part(name)));
            let n = save_z_slices(&dir, vol)?;
            log::info!("{name}: wrote {n} overlay slices to {}", dir.display());
        }
    }

    write_json(args.out.join("meta.json"), &bundle.report)?;
    log::info!(
        "exported {} nodes, {} surfaces, {} issues",
        bundle.report.node_count,
        bundle.report.surfaces.len(),
        bundle.report.issue_count()
    );
    Ok(())
}

fn run_label_image(args: LabelImageArgs) -> Result<()> {
    let scene = load_scene(&args.scene)?;
    let config = ExportConfig::from(load_config(&args.config)?);

    let (ctx, surface) = build_label_image(&scene, config, &args.surface)
        .with_context(|| format!("building label image of '{}'", args.surface))?;

    let dir = args.out.join(format!("{}_labels", file_part(&surface.name)));
    let slices = save_z_slices(&dir, surface.labels.volume())?;

    write_json(
        dir.join("meta.json"),
        &MetaLabelImage {
            surface: surface.name.clone(),
            dims: surface.labels.dims(),
            label_count: surface.labels.count(),
            flipped_axes: skelvox::Axis::ALL
                .into_iter()
                .filter(|&a| ctx.transform().is_flipped(a))
                .map(|a| a.to_string())
                .collect(),
            issues: surface.issues.iter().map(ToString::to_string).collect(),
            slices,
        },
    )?;

    log::info!(
        "{}: {} labels written to {}",
        surface.name,
        surface.labels.count(),
        dir.display()
    );
    Ok(())
}

fn run_import(args: ImportArgs) -> Result<()> {
    let mut scene = load_scene(&args.scene)?;
    ensure_file_exists(&args.swc, "swc")?;

    let config = ExportConfig::from(load_config(&args.config)?);
    let ctx = RunContext::from_host(&scene, config).context("reading scene dataset")?;

    let text = fs::read_to_string(&args.swc)
        .with_context(|| format!("reading {}", args.swc.display()))?;
    let records = read_swc(&text).with_context(|| format!("parsing {}", args.swc.display()))?;
    let graph = records_to_skeleton(&records, ctx.transform(), ctx.config().units)
        .with_context(|| format!("rebuilding skeleton from {}", args.swc.display()))?;

    if graph.beginning().is_none() {
        bail!("{} has no root row (parent id -1)", args.swc.display());
    }
    scene.set_skeleton(&graph);

    let out = args.out.unwrap_or_else(|| args.scene.clone());
    let json = scene.to_json().context("serializing scene")?;
    write_bytes(out.clone(), json.as_bytes())?;

    log::info!(
        "imported {} samples, {} edges into {}",
        graph.len(),
        graph.edges().len(),
        out.display()
    );
    Ok(())
}

fn load_scene(path: &Path) -> Result<JsonScene> {
    ensure_file_exists(path, "scene")?;
    let text =
        fs::read_to_string(path).with_context(|| format!("reading scene {}", path.display()))?;
    JsonScene::from_json(&text).with_context(|| format!("loading scene {}", path.display()))
}

/// Config file (or defaults) with command line overrides applied.
fn load_config(args: &ConfigArgs) -> Result<ExportConfigDto> {
    let mut dto = match &args.config {
        Some(path) => {
            ensure_file_exists(path, "config")?;
            read_json::<ExportConfigDto>(path)?
        }
        None => ExportConfigDto::default(),
    };
    if let Some(units) = args.units {
        dto.units = units;
    }
    if let Some(flip) = args.flip {
        dto.flip = flip;
    }
    if let Some(connectivity) = args.connectivity {
        dto.connectivity = connectivity;
    }
    if let Some(traversal) = args.traversal {
        dto.traversal = traversal;
    }
    Ok(dto)
}

/// One PNG per z plane, `z0000.png` upward. Values above `u16::MAX` saturate.
fn save_z_slices(dir: &Path, vol: &Volume<u32>) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;
    let [nx, ny, nz] = vol.dims();
    for z in 0..nz {
        let plane = z_plane_u16(vol, z);
        let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(nx as u32, ny as u32, plane)
            .context("constructing 16-bit slice from raw values")?;
        let path = dir.join(format!("z{z:04}.png"));
        img.save(&path)
            .with_context(|| format!("saving image {}", path.display()))?;
    }
    Ok(nz)
}

fn z_plane_u16(vol: &Volume<u32>, z: usize) -> Vec<u16> {
    let plane = vol.nx() * vol.ny();
    vol.data()[z * plane..(z + 1) * plane]
        .iter()
        .map(|&v| u16::try_from(v).unwrap_or(u16::MAX))
        .collect()
}

fn file_stem(path: &Path) -> Result<String> {
    match path.file_stem() {
        Some(stem) => Ok(stem.to_string_lossy().into_owned()),
        None => bail!("cannot derive an output name from {}", path.display()),
    }
}

// Surface names come from the host; keep them to one safe path component.
fn file_part(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_bytes(path: PathBuf, bytes: &[u8]) -> Result<()> {
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
