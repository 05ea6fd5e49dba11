/// mono3d terminal demo: a spinning shape drawn with dithered 1-bit shading
///
/// Controls:
///   - WASD / Arrow Keys: Rotate the shape
///   - E/R: Roll rotation
///   - F/X: Toggle fill / edges
///   - Q/ESC: Quit
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mono3d_core::{RenderStyle, SceneConfig, Shape};
use mono3d_terminal::{render_headless, AppOptions, TerminalApp};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeKind {
    Cube,
    Octahedron,
}

impl ShapeKind {
    fn build(self) -> Shape {
        match self {
            ShapeKind::Cube => Shape::cube(2.0),
            ShapeKind::Octahedron => Shape::octahedron(1.5),
        }
    }
}

#[derive(Parser)]
#[command(name = "mono3d-terminal", about = "Render a shaded 3D shape in the terminal")]
struct Cli {
    /// Shape to render
    #[arg(long, value_enum, default_value = "cube")]
    shape: ShapeKind,

    /// Stroke face edges
    #[arg(long)]
    wireframe: bool,

    /// Skip the stippled face fill
    #[arg(long)]
    no_fill: bool,

    /// Scene configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Render this many frames without a terminal UI and print the last one
    #[arg(long)]
    frames: Option<u32>,

    /// Headless output width in cells
    #[arg(long, default_value = "80")]
    cols: u16,

    /// Headless output height in cells
    #[arg(long, default_value = "24")]
    rows: u16,
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose { "debug" } else { "info" };
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::new(filter));

    match (&cli.log_file, cli.frames) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (None, Some(_)) => builder.with_writer(io::stderr).init(),
        // The alternate screen owns the terminal
        (None, None) => builder.with_writer(io::sink).init(),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig {
            light: [0.0, 0.6, 0.8],
            ..SceneConfig::default()
        },
    };

    let options = AppOptions {
        style: RenderStyle {
            filled: !cli.no_fill,
            wireframe: cli.wireframe,
        },
        config,
        ..AppOptions::default()
    };
    let shape = cli.shape.build();

    if let Some(frames) = cli.frames {
        let text = render_headless(shape, cli.cols, cli.rows, frames, &options)?;
        print!("{text}");
        return Ok(());
    }

    let mut app = TerminalApp::new(shape, options)?;
    app.run()?;
    Ok(())
}
