mod camera;
mod cli;
mod description;
mod light;
mod logger;
mod material;
mod primitives;
mod ray;
mod render;
mod scene;
mod tracer;

use crate::{
    cli::Args,
    render::{RenderSettings, FILTER_FACTOR},
    scene::Scene,
};
use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use log::{info, warn};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.log_level.clone());

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let depth_output = args.depth_output()?;
    let settings = RenderSettings {
        width: args.width(),
        height: args.height(),
        bounces: args.bounces,
        jitter: args.jitter,
        filter: args.filter,
        seed: args.seed,
        bounded_shadows: args.bounded_shadows,
    };

    let scene = Scene::from_file(&args.input, settings.aspect())?;
    info!(
        "Loaded {:?}: {} objects, {} lights, {} materials",
        args.input,
        scene.group().len(),
        scene.lights().len(),
        scene.materials().len()
    );
    if scene.group().is_empty() {
        warn!("Scene has no objects, the image will only show the background");
    }

    let start = std::time::Instant::now();
    let frame = render::render(&scene, &settings);
    let duration = start.elapsed();

    let factor = if settings.filter { FILTER_FACTOR } else { 1 };
    let samples = f64::from(settings.width * settings.height * factor * factor)
        * settings.samples_per_pixel() as f64
        / 1_000_000.0;
    info!(
        "Time elapsed: {:.2?}, camera samples: {:.2}M, samples per second: {:.2}M",
        duration,
        samples,
        samples / duration.as_secs_f64()
    );

    frame.color.save(&args.output, |color| color)?;
    info!(
        "Saved {:?} ({}x{})",
        args.output,
        frame.color.width(),
        frame.color.height()
    );

    if let Some(path) = &args.normals {
        frame.normals.save(path, |normal| (normal + Vec3::ONE) / 2.0)?;
        info!("Saved {:?}", path);
    }

    if let Some(depth) = depth_output {
        let range = depth.max - depth.min;
        if range == 0.0 {
            warn!("Depth range is empty, not writing {:?}", depth.path);
        } else {
            frame
                .depth
                .save(&depth.path, |t| (t - Vec3::splat(depth.min)) / range)?;
            info!("Saved {:?}", depth.path);
        }
    }

    Ok(())
}
