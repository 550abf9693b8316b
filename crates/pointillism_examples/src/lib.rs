#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, load_luminance, render_points, render_points_to_png, DotShade, DotSize,
    RenderConfig,
};
