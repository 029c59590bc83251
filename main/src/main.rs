use std::{env, fs, path::PathBuf, time::Duration};

use anyhow::Context as _;
use color_picker::{
    CpuBackend, PickerConfig, PickerFactory, Point, PointerEvent, SurfaceId, SurfaceRect,
};
use instant::Instant;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Usage: `color-picker-demo [config.json] [out_dir]`
fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("color_picker=debug".parse()?),
        )
        .init();

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => PickerConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => PickerConfig::default(),
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".into()));

    let factory = PickerFactory::new(config, CpuBackend)?;
    let rect = SurfaceRect::new(0.0, 0.0, 200.0, 200.0);

    let mut first = factory.create_session(SurfaceId(1), rect)?;
    let second = factory.create_session(SurfaceId(2), rect)?;
    let _picked = first.on_color_picked(|color| tracing::info!(%color, "first picker"));
    let _picked_second = second.on_color_picked(|color| tracing::info!(%color, "second picker"));

    // Drag the hue slider across the strip, one step every 8ms.
    let start = Instant::now();
    for step in 0..=30u32 {
        let at = start + Duration::from_millis(u64::from(step) * 8);
        first.set_hue(step as f32 / 30.0 * 0.6, at);
        first.tick(at);
    }
    if let Some(deadline) = first.next_deadline() {
        first.tick(deadline);
    }
    tracing::info!(
        hue = first.view().plane_hue(),
        redraws = first.view().plane_render_count(),
        "hue drag finished"
    );

    first.pointer(&PointerEvent::new(SurfaceId(1), Point::new(150.0, 120.0)));
    second.pointer(&PointerEvent::new(SurfaceId(2), Point::new(40.0, 180.0)));
    tracing::info!(first = %first.current_color(), second = %second.current_color(), "picked");

    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    if let Some(strip) = first.hue_strip() {
        let path = out_dir.join("hue_strip.png");
        fs::write(&path, strip.encode_png()?)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    let png = first.view().with_plane(|plane| plane.image().encode_png())?;
    let path = out_dir.join("plane.png");
    fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(dir = %out_dir.display(), "images written");

    first.dispose();
    Ok(())
}
