use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "raytracer")]
#[command(about = "Whitted style ray tracer with shadows and mirror reflections")]
pub struct Args {
    /// Scene description in TOML
    #[arg(short, long)]
    pub input: PathBuf,

    /// Image width and height in pixels
    #[arg(
        long,
        num_args = 2,
        value_names = ["WIDTH", "HEIGHT"],
        default_values = ["800", "600"],
        value_parser = clap::value_parser!(u32).range(2..)
    )]
    pub size: Vec<u32>,

    /// Color image
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Surface normals image
    #[arg(long)]
    pub normals: Option<PathBuf>,

    /// Depth image, distances between MIN and MAX map to black through white
    #[arg(long, num_args = 3, value_names = ["MIN", "MAX", "FILE"])]
    pub depth: Option<Vec<String>>,

    /// Maximum number of mirror bounces
    #[arg(short, long, default_value = "4")]
    pub bounces: u32,

    /// Average 16 randomly offset samples per pixel
    #[arg(long)]
    pub jitter: bool,

    /// Render at three times the size and box filter down
    #[arg(long)]
    pub filter: bool,

    /// Seed for the jitter offsets
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Ignore occluders behind the light
    #[arg(long)]
    pub bounded_shadows: bool,

    /// Worker threads, all cores when omitted
    #[arg(long)]
    pub threads: Option<usize>,

    /// Set the logging level, RUST_LOG or info when omitted
    #[arg(long)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, PartialEq)]
pub struct DepthOutput {
    pub min: f32,
    pub max: f32,
    pub path: PathBuf,
}

impl Args {
    pub fn width(&self) -> u32 {
        self.size[0]
    }

    pub fn height(&self) -> u32 {
        self.size[1]
    }

    pub fn depth_output(&self) -> Result<Option<DepthOutput>> {
        let values = match &self.depth {
            Some(values) => values,
            None => return Ok(None),
        };

        let min = values[0]
            .parse()
            .with_context(|| format!("Invalid minimum depth: {}", values[0]))?;
        let max = values[1]
            .parse()
            .with_context(|| format!("Invalid maximum depth: {}", values[1]))?;

        Ok(Some(DepthOutput {
            min,
            max,
            path: PathBuf::from(&values[2]),
        }))
    }
}
