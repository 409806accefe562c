use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lux_renderer::{IntegratorKind, RenderSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Integrator {
    Path,
    Whitted,
}

impl From<Integrator> for IntegratorKind {
    fn from(integrator: Integrator) -> Self {
        match integrator {
            Integrator::Path => IntegratorKind::Path,
            Integrator::Whitted => IntegratorKind::Whitted,
        }
    }
}

/// Render a built-in scene to a PNG.
#[derive(Debug, Parser)]
#[command(name = "lux")]
#[command(about = "CPU ray tracer and path tracer")]
pub struct Args {
    /// Built-in scene to render (floor, cornell)
    #[arg(long, default_value = "cornell")]
    pub scene: String,

    /// Render settings as JSON; command-line flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub integrator: Option<Integrator>,

    /// Image width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Samples per pixel (per frame when rendering progressively)
    #[arg(long, short = 's')]
    pub spp: Option<u32>,

    /// Maximum path tracing bounces
    #[arg(long)]
    pub max_bounces: Option<u32>,

    /// Maximum Whitted recursion depth
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Sub-pixel grid resolution per sample
    #[arg(long)]
    pub super_sample: Option<u32>,

    /// Accumulate this many path-traced frames progressively
    #[arg(long, default_value_t = 1)]
    pub frames: u32,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Stop after this many seconds and keep what has been rendered
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Output PNG path
    #[arg(short, long, default_value = "lux.png")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut RenderSettings) {
        if let Some(integrator) = self.integrator {
            settings.integrator = integrator.into();
        }
        if let Some(spp) = self.spp {
            settings.samples_per_pixel = spp;
        }
        if let Some(bounces) = self.max_bounces {
            settings.max_bounces = bounces;
        }
        if let Some(depth) = self.max_depth {
            settings.max_depth = depth;
        }
        if let Some(rate) = self.super_sample {
            settings.super_sample_rate = rate;
        }
    }
}
