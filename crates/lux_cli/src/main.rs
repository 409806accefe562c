use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use lux_core::{demo, Camera};
use lux_renderer::{
    Framebuffer, IntegratorKind, ProgressivePathTracer, RayIntersector, RenderSettings, RenderTask,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;
mod config;

use cli::Args;
use config::load_settings;

/// How often the main thread checks on a background render
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How often render progress is logged
const REPORT_INTERVAL: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let mut settings = load_settings(args.config.as_deref())?;
    args.apply_overrides(&mut settings);
    settings.validate()?;

    let demo_scene = demo::by_name(&args.scene).with_context(|| {
        format!("unknown scene '{}' (available: {})", args.scene, demo::NAMES.join(", "))
    })?;
    log::info!(
        "Scene '{}': {} models, {} triangles, {} lights",
        demo_scene.scene.name,
        demo_scene.scene.models.len(),
        demo_scene.scene.triangle_count(),
        demo_scene.scene.lights.len()
    );

    let camera = demo_scene.camera;
    let intersector = Arc::new(RayIntersector::with_scene(Arc::new(demo_scene.scene))?);
    let time_limit = args.time_limit.map(Duration::from_secs_f64);

    let image = if args.frames > 1 {
        render_progressive(&intersector, &camera, &args, &settings, time_limit)
    } else {
        render_once(intersector, camera, &args, settings, time_limit)?
    };

    image
        .save_png(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

/// One parallel render on a background thread, cancelled at the time limit.
fn render_once(
    intersector: Arc<RayIntersector>,
    camera: Camera,
    args: &Args,
    settings: RenderSettings,
    time_limit: Option<Duration>,
) -> Result<Framebuffer> {
    let start = Instant::now();
    let task = RenderTask::spawn(intersector, camera, args.width, args.height, settings, args.seed)?;

    let mut last_report = Instant::now();
    while !task.is_finished() {
        thread::sleep(POLL_INTERVAL);

        if time_limit.is_some_and(|limit| start.elapsed() >= limit) {
            log::warn!("Time limit reached, stopping render");
            task.cancel();
            break;
        }
        if last_report.elapsed() >= REPORT_INTERVAL {
            let progress = task.progress();
            log::info!(
                "{:.1}% ({}/{} pixels)",
                progress.fraction() * 100.0,
                progress.completed,
                progress.total
            );
            last_report = Instant::now();
        }
    }

    let outcome = task.join()?;
    log::info!(
        "Rendered {} pixels in {:.2?}{}",
        outcome.pixels_rendered,
        start.elapsed(),
        if outcome.cancelled { " (partial)" } else { "" }
    );
    Ok(outcome.image)
}

/// Accumulate path-traced frames until the frame count or time limit.
fn render_progressive(
    intersector: &RayIntersector,
    camera: &Camera,
    args: &Args,
    settings: &RenderSettings,
    time_limit: Option<Duration>,
) -> Framebuffer {
    if settings.integrator == IntegratorKind::Whitted {
        log::warn!("Progressive rendering always path traces; ignoring the whitted integrator");
    }

    let mut tracer = ProgressivePathTracer::new(args.width, args.height);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let start = Instant::now();

    for frame in 0..args.frames {
        if time_limit.is_some_and(|limit| start.elapsed() >= limit) {
            log::warn!("Time limit reached after {} frames", frame);
            break;
        }
        tracer.render_frame(intersector, camera, settings, &mut rng);
        log::info!("Frame {}/{} ({:.2?})", frame + 1, args.frames, start.elapsed());
    }

    tracer.accumulator().clone()
}
