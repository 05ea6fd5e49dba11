/// Terminal front end: renders a spinning shape into a 1-bit bitmap shown as braille
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use mono3d_core::{
    DrawStats, RenderStyle, RotationState, Scene, SceneConfig, Shape, Vector3, Viewport, Xform,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod bitmap;
pub mod renderer;

pub use bitmap::Bitmap;
pub use renderer::BrailleRenderer;

/// Distance from the camera to the shape's center
const VIEW_DISTANCE: f32 = 4.0;

/// Options shared by the interactive and headless paths
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub style: RenderStyle,
    pub config: SceneConfig,
    /// Rotation added every frame, in radians
    pub spin: RotationState,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            style: RenderStyle::FILLED,
            config: SceneConfig::default(),
            spin: RotationState::new(0.01, 0.015, 0.0),
        }
    }
}

/// Scene, bitmap and object placement for one shape
pub struct Frame {
    shape: Shape,
    scene: Scene,
    bitmap: Bitmap,
    rotation: RotationState,
    style: RenderStyle,
    last_stats: DrawStats,
}

impl Frame {
    /// Build a frame sized to `width x height` pixels. The configured
    /// viewport is replaced by the bitmap size.
    pub fn new(shape: Shape, width: usize, height: usize, options: &AppOptions) -> mono3d_core::Result<Self> {
        let config = SceneConfig {
            viewport: Viewport::new(width as u32, height as u32),
            ..options.config.clone()
        };
        let horizontal_bias = config.horizontal_bias;
        let mut scene = Scene::with_config(config)?;

        scene.set_camera(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 1.0),
            1.0,
            Vector3::new(0.0, 1.0, 0.0),
        );
        // Put the forward axis in the middle of the bitmap
        let scale = height.max(1) as f32;
        scene.set_center(width as f32 / (2.0 * scale * horizontal_bias), 0.5);

        debug!(width, height, faces = shape.face_count(), "frame created");

        Ok(Self {
            shape,
            scene,
            bitmap: Bitmap::new(width, height),
            rotation: RotationState::new(0.3, 0.3, 0.0),
            style: options.style,
            last_stats: DrawStats::default(),
        })
    }

    pub fn rotation_mut(&mut self) -> &mut RotationState {
        &mut self.rotation
    }

    pub fn style_mut(&mut self) -> &mut RenderStyle {
        &mut self.style
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn last_stats(&self) -> DrawStats {
        self.last_stats
    }

    /// Clear and redraw the shape at its current rotation
    pub fn render(&mut self) -> DrawStats {
        let placement = Xform::rotation(&self.rotation)
            .with_translation(Vector3::new(0.0, 0.0, VIEW_DISTANCE));

        self.bitmap.clear(false);
        self.last_stats = self
            .scene
            .draw_shape(&mut self.bitmap, &self.shape, &placement, self.style);
        self.last_stats
    }
}

/// Render `frames` frames without touching the terminal and return the last one as braille
pub fn render_headless(
    shape: Shape,
    cols: u16,
    rows: u16,
    frames: u32,
    options: &AppOptions,
) -> mono3d_core::Result<String> {
    let (width, height) = BrailleRenderer::bitmap_size(cols, rows);
    let mut frame = Frame::new(shape, width, height, options)?;

    for _ in 0..frames.max(1) {
        let stats = frame.render();
        debug!(drawn = stats.drawn, culled = stats.backface_culled, "headless frame");
        let s = options.spin;
        frame.rotation_mut().rotate(s.x, s.y, s.z);
    }

    Ok(BrailleRenderer::render_to_string(frame.bitmap()))
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    frame: Frame,
    presenter: BrailleRenderer,
    spin: RotationState,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(shape: Shape, options: AppOptions) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size()?;
        // Top row is reserved for the status line
        let (width, height) = BrailleRenderer::bitmap_size(cols, rows.saturating_sub(1));

        Ok(Self {
            frame: Frame::new(shape, width, height, &options)?,
            presenter: BrailleRenderer::new(),
            spin: options.spin,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        info!("terminal renderer started");

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        info!(result = ?result.as_ref().err(), "terminal renderer stopped");

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            let rotation = self.frame.rotation_mut();
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('w') | KeyCode::Up => rotation.rotate(0.1, 0.0, 0.0),
                KeyCode::Char('s') | KeyCode::Down => rotation.rotate(-0.1, 0.0, 0.0),
                KeyCode::Char('a') | KeyCode::Left => rotation.rotate(0.0, -0.1, 0.0),
                KeyCode::Char('d') | KeyCode::Right => rotation.rotate(0.0, 0.1, 0.0),
                KeyCode::Char('e') => rotation.rotate(0.0, 0.0, 0.1),
                KeyCode::Char('r') => rotation.rotate(0.0, 0.0, -0.1),
                KeyCode::Char('f') => {
                    let style = self.frame.style_mut();
                    style.filled = !style.filled;
                    debug!(?style, "toggled fill");
                }
                KeyCode::Char('x') => {
                    let style = self.frame.style_mut();
                    style.wireframe = !style.wireframe;
                    debug!(?style, "toggled wireframe");
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn update(&mut self) {
        // Continuous slow rotation for demo effect
        let s = self.spin;
        self.frame.rotation_mut().rotate(s.x, s.y, s.z);
    }

    fn render(&mut self) -> io::Result<()> {
        let stats = self.frame.render();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.presenter.draw(self.frame.bitmap(), &mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "mono3d | FPS: {:.1} | faces {}/{} | WASD/Arrows=Rotate E/R=Roll F=Fill X=Edges Q=Quit",
                self.fps, stats.drawn, stats.faces
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
