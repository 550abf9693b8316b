use pointillism::prelude::*;
use pointillism_examples::{init_tracing, render_points_to_png, DotShade, DotSize, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Horizontal ramp, black on the left, white on the right.
    let (width, height) = (800, 400);
    let field = FnField::new(width, height, |x, _| ((x * 255) / (width - 1)) as u8);

    let config = StippleConfig::varying(2.0, 12.0)
        .with_draw_radius(4)
        .with_sample_limit(30);

    let mut rng = StdRng::seed_from_u64(42);
    let result = run_sampling(&config, &field, &mut rng)?;

    // Black ink on white paper: the dense left side reads as dark.
    let render = RenderConfig::new(width, height)
        .with_background(255)
        .with_dot_size(DotSize::Scaled(0.35))
        .with_shade(DotShade::Solid(0));

    render_points_to_png(&result.points, &render, "stipple-gradient.png")?;
    Ok(())
}
