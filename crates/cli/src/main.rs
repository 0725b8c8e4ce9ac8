mod preview;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use gaze_plot_core::output::input_stem;
use gaze_plot_core::{OutputLayout, PipelineConfig, analyze, parse_gaze_log};
use gaze_plot_protocol::Viewport;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gaze-plot")]
#[command(version, about = "Plot where a reviewer's gaze sat on a diff over time")]
struct Args {
    /// Session log to graph, looked up in the data directory (`.txt` optional)
    filename: String,

    /// The session was recorded against a split (side-by-side) diff
    #[arg(short, long)]
    split: bool,

    /// Also print each figure to the terminal
    #[arg(long)]
    show: bool,

    /// Sampling period in milliseconds
    #[arg(long, default_value_t = 10)]
    sample: u32,

    /// Drop fixations this short or shorter (ms)
    #[arg(long, default_value_t = 50)]
    ignore: u32,

    /// Samples on the same line closer than this are one fixation (ms)
    #[arg(long, default_value_t = 200)]
    merge: u32,

    /// Directory holding session logs
    #[arg(long, default_value = "Data")]
    data_dir: PathBuf,

    /// Directory figures are written under, one subdirectory per log
    #[arg(long, default_value = "Graph")]
    out_dir: PathBuf,

    /// Also write each commit's series as JSON next to its figure
    #[arg(long)]
    export: bool,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Figure height in pixels
    #[arg(long, default_value_t = 800.0)]
    height: f64,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            split: self.split,
            sample_period_ms: self.sample,
            ignore_threshold_ms: self.ignore,
            merge_threshold_ms: self.merge,
        }
    }

    fn input_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.txt", input_stem(&self.filename)))
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing()?;

    let config = args.pipeline_config();
    config.validate()?;

    let path = args.input_path();
    let data = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let log = parse_gaze_log(&data, config.split)
        .with_context(|| format!("parsing {}", path.display()))?;
    info!(
        commits = log.commits.len(),
        samples = log.samples.len(),
        skipped = log.skipped,
        split = config.split,
        "loaded session"
    );

    let layout = OutputLayout::new(&args.out_dir, &args.filename);
    let viewport = Viewport::new(args.width, args.height);
    let mut written = 0usize;

    for result in analyze(&log, &config) {
        let plot = match result {
            Ok(plot) => plot,
            Err(err) => {
                warn!("{err}, skipping");
                continue;
            }
        };

        let figure = layout.write_figure(&plot, &viewport)?;
        info!(
            href = %plot.href,
            points = plot.points.len(),
            path = %figure.display(),
            "wrote figure"
        );

        if args.export {
            let series = layout.write_series(&plot)?;
            info!(path = %series.display(), "wrote series");
        }

        if args.show {
            preview::show(&plot)?;
        }

        written += 1;
    }

    info!(written, dir = %layout.dir().display(), "done");
    Ok(())
}
