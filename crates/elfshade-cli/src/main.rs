//! elfshade CLI - render audio-reactive SDF scenes to PNG frames

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use elfshade_core::frame::{ControlBank, channels};
use elfshade_render::image::RgbaImage;
use elfshade_render::scenes::ShapeKind;
use elfshade_render::{FrameRenderer, ImageTexture, RenderSettings, SceneKind, settings_path};
use glam::Vec2;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "elfshade")]
#[command(about = "Sphere-traced, audio-reactive SDF scenes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scenes
    Scenes,

    /// Render a single frame
    Render {
        #[command(flatten)]
        frame: FrameArgs,

        /// Seconds into the animation
        #[arg(short, long, default_value = "0")]
        time: f32,

        /// Output image file (.png)
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,

        /// Previous frame to echo through the feedback layer
        #[arg(long)]
        feedback: Option<PathBuf>,
    },

    /// Render a numbered frame sequence with feedback between frames
    Animate {
        #[command(flatten)]
        frame: FrameArgs,

        /// Number of frames
        #[arg(short = 'n', long, default_value = "60")]
        frames: u32,

        /// Frames per second (overrides the settings file)
        #[arg(long)]
        fps: Option<f32>,

        /// Seconds into the animation of the first frame
        #[arg(long, default_value = "0")]
        start: f32,

        /// Directory for frame_0000.png, frame_0001.png, ...
        #[arg(short, long, default_value = "frames")]
        output_dir: PathBuf,
    },

    /// Print the effective settings as JSON
    Settings {
        /// Settings file to read instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the default settings file location instead
        #[arg(long)]
        path: bool,

        /// Write the effective settings to the default location
        #[arg(long, conflicts_with = "path")]
        init: bool,
    },
}

/// Options shared by every command that renders
#[derive(Args)]
struct FrameArgs {
    /// Scene to render (see `elfshade scenes`)
    #[arg(short, long, default_value = "creature")]
    scene: SceneKind,

    /// Image width (overrides the settings file)
    #[arg(long)]
    width: Option<u32>,

    /// Image height (overrides the settings file)
    #[arg(long)]
    height: Option<u32>,

    /// Control value as `channel=value`, channel by name or index; repeatable
    #[arg(short, long = "control", value_parser = parse_control)]
    controls: Vec<ControlArg>,

    /// Pointer position as `x,y` in 0..1
    #[arg(long, value_parser = parse_mouse)]
    mouse: Option<Vec2>,

    /// Shape shown by the viewer scene
    #[arg(long)]
    shape: Option<ShapeKind>,

    /// Settings file to read instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ControlArg {
    channel: usize,
    value: f32,
}

fn parse_control(s: &str) -> std::result::Result<ControlArg, String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected channel=value, got '{}'", s))?;
    let name = name.trim();

    let channel = channels::by_name(name)
        .or_else(|| name.parse().ok())
        .ok_or_else(|| {
            format!(
                "unknown channel '{}' (names: {})",
                name,
                channels::NAMES.join(", ")
            )
        })?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value for '{}': {}", name, e))?;

    Ok(ControlArg { channel, value })
}

fn parse_mouse(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{}'", s))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {}", e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {}", e))?;
    Ok(Vec2::new(x, y))
}

fn main() -> Result<()> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scenes => {
            list_scenes();
        }
        Commands::Render {
            frame,
            time,
            output,
            feedback,
        } => {
            run_render(&frame, time, &output, feedback.as_deref())?;
        }
        Commands::Animate {
            frame,
            frames,
            fps,
            start,
            output_dir,
        } => {
            run_animate(&frame, frames, fps, start, &output_dir)?;
        }
        Commands::Settings { config, path, init } => {
            run_settings(config.as_deref(), path, init)?;
        }
    }

    Ok(())
}

fn list_scenes() {
    for kind in SceneKind::all() {
        println!("{:<10} {}", kind.name(), kind.description());
    }
}

/// Settings file plus command-line overrides
fn load_settings(args: &FrameArgs) -> Result<RenderSettings> {
    let mut settings = RenderSettings::load_or_default(args.config.as_deref())?;
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(shape) = args.shape {
        settings.viewer.shape = shape;
    }
    Ok(settings)
}

fn control_bank(args: &FrameArgs) -> Result<ControlBank> {
    let mut bank = ControlBank::default();
    for control in &args.controls {
        bank.set(control.channel, control.value)?;
    }
    Ok(bank)
}

fn run_render(args: &FrameArgs, time: f32, output: &Path, feedback: Option<&Path>) -> Result<()> {
    let settings = load_settings(args)?;
    let renderer = FrameRenderer::new(&settings)?;
    let bank = control_bank(args)?;
    let stage = args.scene.build(&settings);

    let previous = feedback
        .map(|path| {
            ImageTexture::open(path)
                .map(ImageTexture::into_image)
                .with_context(|| format!("Failed to read feedback frame {}", path.display()))
        })
        .transpose()?;

    let frame = renderer
        .frame(time)
        .with_mouse(args.mouse.unwrap_or(Vec2::splat(0.5)))
        .with_controls(&bank);

    tracing::info!(
        "Rendering {} at t={} ({}x{})",
        args.scene,
        time,
        renderer.width(),
        renderer.height()
    );

    let image = renderer.render(stage.as_ref(), &frame, previous.as_ref())?;
    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!("Saved to {}", output.display());
    Ok(())
}

fn run_animate(
    args: &FrameArgs,
    frames: u32,
    fps: Option<f32>,
    start: f32,
    output_dir: &Path,
) -> Result<()> {
    let mut settings = load_settings(args)?;
    if let Some(fps) = fps {
        settings.fps = fps;
    }
    let renderer = FrameRenderer::new(&settings)?;
    let bank = control_bank(args)?;
    let stage = args.scene.build(&settings);
    let mouse = args.mouse.unwrap_or(Vec2::splat(0.5));

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    tracing::info!(
        "Animating {}: {} frames at {} fps into {}",
        args.scene,
        frames,
        settings.fps,
        output_dir.display()
    );

    let started = Instant::now();
    let mut previous: Option<RgbaImage> = None;
    for index in 0..frames {
        let time = start + index as f32 / settings.fps;
        let frame = renderer.frame(time).with_mouse(mouse).with_controls(&bank);

        let image = renderer.render(stage.as_ref(), &frame, previous.as_ref())?;
        let path = output_dir.join(format!("frame_{:04}.png", index));
        image
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!("Wrote {}", path.display());
        previous = Some(image);
    }

    tracing::info!("Rendered {} frames in {:.2?}", frames, started.elapsed());
    Ok(())
}

fn run_settings(config: Option<&Path>, show_path: bool, init: bool) -> Result<()> {
    if show_path {
        match settings_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("No configuration directory on this platform"),
        }
        return Ok(());
    }

    let settings = RenderSettings::load_or_default(config)?;

    if init {
        let path = settings_path().context("No configuration directory on this platform")?;
        settings.save(&path)?;
        tracing::info!("Wrote {}", path.display());
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
