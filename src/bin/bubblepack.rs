use anyhow::{Context, Result};
use bubblepack::viz::{self, PreviewOptions, Shape};
use bubblepack::{CandidateSort, CirclePacker, FirstPosition, ItemFields, PackConfig, PackOutcome};
use bubblepack::{stats, storage};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bubblepack",
    version,
    about = "Compute, save & preview proportional-area bubble layouts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack items into a canvas (and optionally save, plot, and print stats).
    Pack(PackArgs),
    /// Print the default packing configuration as JSON.
    Defaults,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    TopLeft,
    Center,
    Random,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SeedArg {
    TopLeft,
    Center,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ShapeArg {
    Circle,
    Square,
    Triangle,
}

#[derive(Args, Debug)]
struct PackArgs {
    /// Items to pack (.csv with header row, or .json).
    #[arg(short, long)]
    input: PathBuf,
    /// Column/key holding the item id.
    #[arg(long, default_value = "id")]
    id_field: String,
    /// Column/key holding the item value.
    #[arg(long, default_value = "value")]
    value_field: String,
    /// Column/key holding an optional #RRGGBB color.
    #[arg(long, default_value = "color")]
    color_field: String,
    /// Column/key holding an optional icon reference.
    #[arg(long, default_value = "icon")]
    icon_field: String,
    /// Drawable canvas width (default 800).
    #[arg(long, default_value_t = 800.0)]
    width: f64,
    /// Drawable canvas height (default 600).
    #[arg(long, default_value_t = 600.0)]
    height: f64,
    /// JSON configuration file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    fill_ratio: Option<f64>,
    /// Angular step between tangency candidates, in degrees.
    #[arg(long)]
    angle_step_deg: Option<f64>,
    #[arg(long)]
    dist_padding: Option<f64>,
    #[arg(long)]
    overlap_max: Option<f64>,
    #[arg(long)]
    max_drop_tries: Option<usize>,
    /// Seed position(s) for the largest circle; repeat to try several in order.
    #[arg(long, value_enum)]
    first_position: Vec<SeedArg>,
    #[arg(long, value_enum)]
    candidate_sort: Option<SortArg>,
    #[arg(long)]
    min_radius: Option<f64>,
    #[arg(long)]
    max_radius: Option<f64>,
    /// Candidate checks allowed per search attempt (0 = unbounded).
    #[arg(long)]
    max_steps: Option<u64>,
    /// RNG seed for --candidate-sort random.
    #[arg(long)]
    seed: Option<u64>,
    /// Save placements to file (format inferred by --format or extension). Defaults to stdout JSON.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Render a preview at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Mark drawn for each item in the preview.
    #[arg(long, value_enum, default_value = "circle")]
    shape: ShapeArg,
    /// Locale for value labels (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Print a layout summary to stderr.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Pack(args) => cmd_pack(args),
        Command::Defaults => {
            println!("{}", serde_json::to_string_pretty(&PackConfig::default())?);
            Ok(())
        }
    }
}

fn build_config(args: &PackArgs) -> Result<PackConfig> {
    let mut cfg = match &args.config {
        Some(path) => PackConfig::from_json_file(path)?,
        None => PackConfig::default(),
    };
    if let Some(v) = args.fill_ratio {
        cfg.fill_ratio = v;
    }
    if let Some(deg) = args.angle_step_deg {
        cfg.angle_step = deg.to_radians();
    }
    if let Some(v) = args.dist_padding {
        cfg.dist_padding = v;
    }
    if let Some(v) = args.overlap_max {
        cfg.overlap_max = v;
    }
    if let Some(v) = args.max_drop_tries {
        cfg.max_drop_tries = v;
    }
    if !args.first_position.is_empty() {
        cfg.first_positions = args
            .first_position
            .iter()
            .map(|p| match p {
                SeedArg::TopLeft => FirstPosition::TopLeft,
                SeedArg::Center => FirstPosition::Center,
            })
            .collect();
    }
    if let Some(s) = args.candidate_sort {
        cfg.candidate_sort = match s {
            SortArg::TopLeft => CandidateSort::TopLeft,
            SortArg::Center => CandidateSort::Center,
            SortArg::Random => CandidateSort::Random,
        };
    }
    if let Some(v) = args.min_radius {
        cfg.min_radius = v;
    }
    if let Some(v) = args.max_radius {
        cfg.max_radius = Some(v);
    }
    if let Some(v) = args.max_steps {
        cfg.max_steps = (v > 0).then_some(v);
    }
    if let Some(v) = args.seed {
        cfg.seed = Some(v);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_pack(args: PackArgs) -> Result<()> {
    let cfg = build_config(&args)?;
    let fields = ItemFields {
        id: args.id_field.clone(),
        value: args.value_field.clone(),
        color: Some(args.color_field.clone()),
        icon: Some(args.icon_field.clone()),
    };

    let items = storage::load_items(&args.input, &fields)?;
    let (items, removed) = storage::positive_items(items);
    if removed > 0 {
        warn!("ignored {} items without a positive value", removed);
    }
    if items.is_empty() {
        anyhow::bail!("no items with a positive value in {}", args.input.display());
    }

    let packer = CirclePacker::new(cfg)?;
    let outcome = packer
        .pack(&items, args.width, args.height)
        .context("packing failed")?;
    match &outcome {
        PackOutcome::Placed(c) => info!("placed all {} items", c.len()),
        PackOutcome::PartiallyPlaced { circles, dropped } => eprintln!(
            "Placed {} of {} items; dropped: {}",
            circles.len(),
            items.len(),
            dropped.join(", ")
        ),
        PackOutcome::Failed { .. } => {}
    }

    if args.stats {
        let s = stats::summarize(&outcome, items.len(), args.width, args.height);
        eprintln!(
            "requested={} placed={} dropped={} clamped={}  coverage={:.1}%  \
             max_overlap={:.1}%  radius={}..{}",
            s.requested,
            s.placed,
            s.dropped,
            s.clamped,
            s.coverage * 100.0,
            s.max_overlap_fraction * 100.0,
            fmt_opt(s.min_radius),
            fmt_opt(s.max_radius)
        );
    }

    if outcome.is_failed() {
        anyhow::bail!(
            "no arrangement found for {} items on a {}x{} canvas (dropped: {})",
            items.len(),
            args.width,
            args.height,
            outcome.dropped().join(", ")
        );
    }

    let circles = outcome.circles();
    match args.out.as_ref() {
        Some(path) => {
            let fmt = match args.format {
                Some(OutFormat::Csv) => "csv",
                Some(OutFormat::Json) => "json",
                None => path.extension().and_then(|e| e.to_str()).unwrap_or("json"),
            }
            .to_ascii_lowercase();
            match fmt.as_str() {
                "csv" => storage::save_csv(circles, path)?,
                "json" => storage::save_json(circles, path)?,
                other => anyhow::bail!("unsupported format: {}", other),
            }
            eprintln!("Saved {} circles to {}", circles.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(circles)?),
    }

    if let Some(plot_path) = args.plot.as_ref() {
        let opts = PreviewOptions {
            shape: match args.shape {
                ShapeArg::Circle => Shape::Circle,
                ShapeArg::Square => Shape::Square,
                ShapeArg::Triangle => Shape::Triangle,
            },
            locale: args.locale.clone(),
            ..PreviewOptions::default()
        };
        viz::render_preview(circles, args.width, args.height, plot_path, &opts)?;
        eprintln!("Wrote preview to {}", plot_path.display());
    }

    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 2 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.2}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}
