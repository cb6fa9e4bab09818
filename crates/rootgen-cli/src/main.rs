//! rootgen CLI: deterministic fixture generation.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use rootgen::{
    read_fills_1d, read_fills_2d, Axis, EventWriter, Hist1D, Hist2D, JsonContainer, LeafType,
    SchemaBuilder, Session, WriteOptions,
};

#[derive(Parser)]
#[command(name = "rootgen")]
#[command(about = "rootgen - deterministic tree and histogram fixture generator")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the flat-tree fixture: every leaf type as scalar,
    /// fixed array, and counter-driven slice, with value == event index.
    FlatTree {
        /// Output fixture file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of events to commit
        #[arg(long, default_value = "100")]
        events: u64,

        /// File-level title
        #[arg(long, default_value = "flat tree fixture")]
        title: String,

        /// Mark the container payload as compressed
        #[arg(long)]
        compressed: bool,
    },

    /// Fill a 1-D histogram from a text fixture of `x weight` lines.
    Hist1d {
        /// Output fixture file
        #[arg(short, long)]
        output: PathBuf,

        /// Input text fixture, one fill per line
        #[arg(short, long)]
        input: PathBuf,

        /// Histogram name
        #[arg(long, default_value = "h1")]
        name: String,

        /// Fixed-width binning: number of bins (with --min/--max)
        #[arg(long, conflicts_with = "edges")]
        bins: Option<usize>,

        /// Fixed-width binning: domain low edge
        #[arg(long, requires = "bins")]
        min: Option<f64>,

        /// Fixed-width binning: domain high edge
        #[arg(long, requires = "bins")]
        max: Option<f64>,

        /// Variable binning: comma-separated ascending edges
        #[arg(long)]
        edges: Option<String>,

        /// Count under/overflow fills in the histogram statistics
        #[arg(long)]
        stat_overflows: bool,

        /// File-level title
        #[arg(long, default_value = "")]
        title: String,

        /// Mark the container payload as compressed
        #[arg(long)]
        compressed: bool,
    },

    /// Fill a 2-D histogram from a text fixture of `x y weight` lines.
    Hist2d {
        /// Output fixture file
        #[arg(short, long)]
        output: PathBuf,

        /// Input text fixture, one fill per line
        #[arg(short, long)]
        input: PathBuf,

        /// Histogram name
        #[arg(long, default_value = "h2")]
        name: String,

        /// X axis: number of bins (with --x-min/--x-max)
        #[arg(long, conflicts_with = "x_edges")]
        x_bins: Option<usize>,

        /// X axis: domain low edge
        #[arg(long, requires = "x_bins")]
        x_min: Option<f64>,

        /// X axis: domain high edge
        #[arg(long, requires = "x_bins")]
        x_max: Option<f64>,

        /// X axis: comma-separated ascending edges
        #[arg(long)]
        x_edges: Option<String>,

        /// Y axis: number of bins (with --y-min/--y-max)
        #[arg(long, conflicts_with = "y_edges")]
        y_bins: Option<usize>,

        /// Y axis: domain low edge
        #[arg(long, requires = "y_bins")]
        y_min: Option<f64>,

        /// Y axis: domain high edge
        #[arg(long, requires = "y_bins")]
        y_max: Option<f64>,

        /// Y axis: comma-separated ascending edges
        #[arg(long)]
        y_edges: Option<String>,

        /// Count under/overflow fills in the histogram statistics
        #[arg(long)]
        stat_overflows: bool,

        /// File-level title
        #[arg(long, default_value = "")]
        title: String,

        /// Mark the container payload as compressed
        #[arg(long)]
        compressed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::FlatTree {
            output,
            events,
            title,
            compressed,
        } => flat_tree(&output, events, &title, compressed),
        Commands::Hist1d {
            output,
            input,
            name,
            bins,
            min,
            max,
            edges,
            stat_overflows,
            title,
            compressed,
        } => {
            let hist = match (bins, edges) {
                (Some(n), None) => {
                    let (lo, hi) = (
                        min.context("--min is required with --bins")?,
                        max.context("--max is required with --bins")?,
                    );
                    Hist1D::fixed(&name, n, lo, hi)?
                }
                (None, Some(e)) => Hist1D::variable(&name, parse_edges(&e)?)?,
                _ => bail!("exactly one of --bins or --edges is required"),
            };
            hist1d(&output, &input, hist, stat_overflows, &title, compressed)
        }
        Commands::Hist2d {
            output,
            input,
            name,
            x_bins,
            x_min,
            x_max,
            x_edges,
            y_bins,
            y_min,
            y_max,
            y_edges,
            stat_overflows,
            title,
            compressed,
        } => {
            let xa = build_axis("x", x_bins, x_min, x_max, x_edges)?;
            let ya = build_axis("y", y_bins, y_min, y_max, y_edges)?;
            let hist = Hist2D::with_axes(&name, xa, ya);
            hist2d(&output, &input, hist, stat_overflows, &title, compressed)
        }
    }
}

/// Resolve one 2-D axis from either fixed-width or explicit edges.
fn build_axis(
    which: &str,
    bins: Option<usize>,
    min: Option<f64>,
    max: Option<f64>,
    edges: Option<String>,
) -> Result<Axis> {
    match (bins, edges) {
        (Some(n), None) => {
            let lo = min.with_context(|| format!("--{which}-min is required with --{which}-bins"))?;
            let hi = max.with_context(|| format!("--{which}-max is required with --{which}-bins"))?;
            Ok(Axis::fixed(n, lo, hi)?)
        }
        (None, Some(e)) => Ok(Axis::variable(parse_edges(&e)?)?),
        _ => bail!("exactly one of --{which}-bins or --{which}-edges is required"),
    }
}

fn parse_edges(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .with_context(|| format!("bad edge value: '{s}'"))
        })
        .collect()
}

fn flat_tree(output: &Path, events: u64, title: &str, compressed: bool) -> Result<()> {
    let mut schema = SchemaBuilder::new();
    schema.scalar("I32", LeafType::I32)?;
    schema.scalar("I64", LeafType::I64)?;
    schema.scalar("U32", LeafType::U32)?;
    schema.scalar("U64", LeafType::U64)?;
    schema.scalar("F32", LeafType::F32)?;
    schema.scalar("F64", LeafType::F64)?;
    schema.scalar("Str", LeafType::Str)?;
    schema.fixed_array("ArrI32", LeafType::I32, 10)?;
    schema.fixed_array("ArrI64", LeafType::I64, 10)?;
    schema.fixed_array("ArrU32", LeafType::U32, 10)?;
    schema.fixed_array("ArrU64", LeafType::U64, 10)?;
    schema.fixed_array("ArrF32", LeafType::F32, 10)?;
    schema.fixed_array("ArrF64", LeafType::F64, 10)?;
    schema.scalar("N", LeafType::I32)?;
    schema.var_array("SliI32", LeafType::I32, "N")?;
    schema.var_array("SliI64", LeafType::I64, "N")?;
    schema.var_array("SliU32", LeafType::U32, "N")?;
    schema.var_array("SliU64", LeafType::U64, "N")?;
    schema.var_array("SliF32", LeafType::F32, "N")?;
    schema.var_array("SliF64", LeafType::F64, "N")?;

    let mut writer = EventWriter::new("tree", "flat tree", schema.finish());
    for i in 0..events {
        writer.stage("I32", i as i32)?;
        writer.stage("I64", i as i64)?;
        writer.stage("U32", i as u32)?;
        writer.stage("U64", i)?;
        writer.stage("F32", i as f32)?;
        writer.stage("F64", i as f64)?;
        writer.stage("Str", format!("evt-{i:03}"))?;
        writer.stage("ArrI32", vec![i as i32; 10])?;
        writer.stage("ArrI64", vec![i as i64; 10])?;
        writer.stage("ArrU32", vec![i as u32; 10])?;
        writer.stage("ArrU64", vec![i; 10])?;
        writer.stage("ArrF32", vec![i as f32; 10])?;
        writer.stage("ArrF64", vec![i as f64; 10])?;
        let n = (i % 10) as usize;
        writer.stage("N", n as i32)?;
        writer.stage("SliI32", vec![i as i32; n])?;
        writer.stage("SliI64", vec![i as i64; n])?;
        writer.stage("SliU32", vec![i as u32; n])?;
        writer.stage("SliU64", vec![i; n])?;
        writer.stage("SliF32", vec![i as f32; n])?;
        writer.stage("SliF64", vec![i as f64; n])?;
        writer.commit()?;
    }

    let mut session = Session::new();
    session.record_tree(writer.finish());
    write_session(&session, output, title, compressed)
}

fn hist1d(
    output: &Path,
    input: &Path,
    mut hist: Hist1D,
    stat_overflows: bool,
    title: &str,
    compressed: bool,
) -> Result<()> {
    hist.set_stat_overflows(stat_overflows)?;
    let fills = read_fills_1d(input)?;
    tracing::info!(fills = fills.len(), input = %input.display(), "read 1-D fill fixture");
    for (x, w) in fills {
        hist.fill(x, w)?;
    }
    let mut session = Session::new();
    session.record_h1(hist);
    write_session(&session, output, title, compressed)
}

fn hist2d(
    output: &Path,
    input: &Path,
    mut hist: Hist2D,
    stat_overflows: bool,
    title: &str,
    compressed: bool,
) -> Result<()> {
    hist.set_stat_overflows(stat_overflows)?;
    let fills = read_fills_2d(input)?;
    tracing::info!(fills = fills.len(), input = %input.display(), "read 2-D fill fixture");
    for (x, y, w) in fills {
        hist.fill(x, y, w)?;
    }
    let mut session = Session::new();
    session.record_h2(hist);
    write_session(&session, output, title, compressed)
}

fn write_session(session: &Session, output: &Path, title: &str, compressed: bool) -> Result<()> {
    let mut container = JsonContainer::create(
        output,
        WriteOptions {
            compressed,
            title: title.to_string(),
        },
    )?;
    session.write_to(&mut container)?;
    tracing::info!(path = %output.display(), "fixture written");
    Ok(())
}
