use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pointillism::prelude::*;
use pointillism_examples::{
    init_tracing, load_luminance, render_points_to_png, DotShade, DotSize, RenderConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

const PROGRESS_EVERY: usize = 1000;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliFavor {
    Bright,
    Dark,
}

impl From<CliFavor> for BrightnessOrder {
    fn from(value: CliFavor) -> Self {
        match value {
            CliFavor::Bright => BrightnessOrder::BrightFirst,
            CliFavor::Dark => BrightnessOrder::DarkFirst,
        }
    }
}

/// Render an image as non-overlapping dots sized and spaced by local brightness.
#[derive(Parser, Debug)]
#[command(name = "stipple", version, about)]
struct Cli {
    /// Source image (PNG or JPEG)
    #[arg(required_unless_present = "list_keys")]
    input: Option<PathBuf>,

    /// Output PNG
    #[arg(short, long, default_value = "stipple.png")]
    output: PathBuf,

    /// Random seed; a random one is chosen and logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Override a sampling parameter, e.g. --set vary_density=true (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    assignments: Vec<String>,

    /// Print the sampling parameters and exit
    #[arg(long)]
    list_keys: bool,

    /// Keep at most this many dots, drained from the favored brightness end
    #[arg(long, value_name = "N")]
    select: Option<usize>,

    /// Brightness end drained first by --select
    #[arg(long, value_enum, default_value_t = CliFavor::Dark)]
    favor: CliFavor,

    /// Draw every dot with this radius in pixels (default: draw_radius)
    #[arg(long, conflicts_with = "dot_scale")]
    dot_radius: Option<f32>,

    /// Draw each dot at its exclusion radius times this factor
    #[arg(long)]
    dot_scale: Option<f32>,

    /// Draw every dot with this intensity instead of its luminance
    #[arg(long)]
    ink: Option<u8>,

    /// Background intensity
    #[arg(long, default_value_t = 0)]
    background: u8,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = StippleConfig::default();
    for assignment in &cli.assignments {
        config
            .apply_assignment(assignment)
            .with_context(|| format!("invalid --set {}", assignment))?;
    }

    if cli.list_keys {
        for (key, value) in config.entries() {
            println!("{key} = {value}");
        }
        return Ok(());
    }

    let input = cli.input.context("missing input image")?;
    let field = load_luminance(&input)?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!("Sampling with seed {}.", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut accepted = 0usize;
    let mut progress = FnSink::new(|event| match event {
        SamplingEvent::PointAccepted { .. } => {
            accepted += 1;
            if accepted % PROGRESS_EVERY == 0 {
                debug!("{} points accepted.", accepted);
            }
        }
        SamplingEvent::Warning { context, message } => warn!("{}: {}", context, message),
        _ => {}
    });

    let runner = StippleRunner::try_new(config.clone(), &field)?;
    let result = runner.run_with_events(&mut rng, &mut progress)?;

    let points = match cli.select {
        Some(n) => select_subset_with_events(
            &result.points,
            n,
            cli.favor.into(),
            &mut rng,
            &mut progress,
        )
        .into_points(),
        None => result.points.to_vec(),
    };

    let dot_size = match (cli.dot_radius, cli.dot_scale) {
        (Some(r), _) => DotSize::Fixed(r),
        (None, Some(factor)) => DotSize::Scaled(factor),
        (None, None) => DotSize::Fixed(config.draw_radius as f32),
    };
    let shade = cli.ink.map_or(DotShade::Luminance, DotShade::Solid);
    let render = RenderConfig::new(field.width(), field.height())
        .with_background(cli.background)
        .with_dot_size(dot_size)
        .with_shade(shade);

    render_points_to_png(&points, &render, &cli.output)?;
    Ok(())
}
