use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "aspectfit", version)]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crop and/or pad a file, or every file of a directory, to an aspect ratio.
    Fit(FitArgs),
    /// Shift image content right, repeating the left edge.
    Shift(ShiftArgs),
    /// Deep-merge JSON files and print the result.
    Merge(MergeArgs),
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Input file or directory.
    input: PathBuf,

    /// Output file or directory (must match the kind of input).
    output: PathBuf,

    /// Target aspect ratio, `W:H` or a decimal.
    #[arg(long)]
    aspect: Option<String>,

    /// Dimension that stays fixed (width, height).
    #[arg(long)]
    keep: Option<String>,

    /// Where the crop window sits (center, top, bottom, left, right).
    #[arg(long)]
    crop_gravity: Option<String>,

    /// Where the image sits on the padded canvas.
    #[arg(long)]
    pad_gravity: Option<String>,

    /// Pad color: `R,G,B[,A]`, `#RRGGBB[AA]` or a name.
    #[arg(long)]
    pad_color: Option<String>,

    /// JPEG quality (1-100).
    #[arg(long)]
    quality: Option<u8>,

    /// Output extension for directory runs.
    #[arg(long)]
    format: Option<String>,

    /// Descend into sub-directories.
    #[arg(long, overrides_with = "no_recursive")]
    recursive: bool,

    /// Stay in the top directory, even if a config file says otherwise.
    #[arg(long, overrides_with = "recursive")]
    no_recursive: bool,

    /// Worker threads for directory runs.
    #[arg(long)]
    threads: Option<usize>,

    /// JSON job config; may be repeated, later files win.
    #[arg(long = "config")]
    configs: Vec<PathBuf>,

    #[command(flatten)]
    merge: MergeFlags,
}

#[derive(Parser, Debug)]
struct ShiftArgs {
    input: PathBuf,
    output: PathBuf,

    /// Columns to shift by.
    #[arg(long, default_value_t = 12)]
    amount: u32,

    /// JPEG quality (1-100).
    #[arg(
        long,
        default_value_t = aspectfit::DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    quality: u8,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// JSON files, merged left to right.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[command(flatten)]
    merge: MergeFlags,
}

#[derive(clap::Args, Debug)]
struct MergeFlags {
    /// How arrays are combined when config layers merge.
    #[arg(long, value_enum, ignore_case = true, default_value_t = ListChoice::Extend)]
    list_strategy: ListChoice,

    /// Object key used by `--list-strategy by-key`.
    #[arg(long)]
    list_key: Option<String>,

    /// What to do with mismatched values.
    #[arg(long, value_enum, ignore_case = true, default_value_t = ConflictChoice::Right)]
    conflict: ConflictChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ListChoice {
    Extend,
    Unique,
    ByIndex,
    ByKey,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConflictChoice {
    Right,
    Left,
    Both,
    Raise,
}

impl MergeFlags {
    fn to_options(&self) -> aspectfit::MergeOptions {
        let list_strategy = match self.list_strategy {
            ListChoice::Extend => aspectfit::ListStrategy::Extend,
            ListChoice::Unique => aspectfit::ListStrategy::Unique,
            ListChoice::ByIndex => aspectfit::ListStrategy::ByIndex,
            ListChoice::ByKey => aspectfit::ListStrategy::ByKey,
        };
        let conflict = match self.conflict {
            ConflictChoice::Right => aspectfit::ConflictPolicy::Right,
            ConflictChoice::Left => aspectfit::ConflictPolicy::Left,
            ConflictChoice::Both => aspectfit::ConflictPolicy::Both,
            ConflictChoice::Raise => aspectfit::ConflictPolicy::Raise,
        };
        aspectfit::MergeOptions {
            list_strategy,
            list_key: self.list_key.clone(),
            conflict,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Fit(args) => cmd_fit(args),
        Command::Shift(args) => cmd_shift(args),
        Command::Merge(args) => cmd_merge(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::WARN,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let merge = args.merge.to_options();
    let from_files =
        aspectfit::JobConfig::load(args.configs.as_slice(), &merge).context("load job config")?;

    let from_flags = aspectfit::JobConfig {
        aspect: args
            .aspect
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("parse --aspect")?,
        keep: args
            .keep
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("parse --keep")?,
        crop_gravity: args
            .crop_gravity
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("parse --crop-gravity")?,
        pad_gravity: args
            .pad_gravity
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("parse --pad-gravity")?,
        pad_color: args
            .pad_color
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("parse --pad-color")?,
        quality: args.quality,
        format: args.format,
        recursive: match (args.recursive, args.no_recursive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        },
        threads: args.threads,
    };

    let job = from_files.overlay(from_flags).resolve()?;
    let job = aspectfit::BatchJob::new(args.input, args.output, job);
    let report = aspectfit::run(&job)?;

    if report.failed() > 0 {
        anyhow::bail!(
            "{} of {} file(s) failed",
            report.failed(),
            report.outcomes.len()
        );
    }
    Ok(())
}

fn cmd_shift(args: ShiftArgs) -> anyhow::Result<()> {
    let img = aspectfit::load_image(&args.input)
        .with_context(|| format!("read image '{}'", args.input.display()))?;
    let out = aspectfit::shift_right(&img, args.amount)?;

    let save = aspectfit::SaveOptions {
        jpeg_quality: args.quality,
        ..aspectfit::SaveOptions::default()
    };
    aspectfit::save_dynamic_image(&out, &args.output, &save)
        .with_context(|| format!("write image '{}'", args.output.display()))?;

    tracing::info!("OK: {} -> {}", args.input.display(), args.output.display());
    Ok(())
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    let opts = args.merge.to_options();
    let layers = args
        .files
        .iter()
        .map(aspectfit::read_json)
        .collect::<Result<Vec<_>, _>>()?;
    let merged = aspectfit::merge_layers(layers, &opts)?;

    let text = serde_json::to_string_pretty(&merged).context("serialize merged JSON")?;
    println!("{text}");
    Ok(())
}
