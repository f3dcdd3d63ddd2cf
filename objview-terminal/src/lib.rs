/// Terminal preview of OBJ models through the orbit camera
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Matrix4;
use objview_core::{
    Camera, DegeneratePolicy, Mesh, ModelTransform, OrbitAngles, Perspective, ViewerConfig,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Orbit change per key press, as a fraction of π
pub const ORBIT_STEP: f32 = 0.05;

/// Shown when no models are given
pub const CUBE_OBJ: &str = "\
o Cube
v -1.0 -1.0  1.0
v  1.0 -1.0  1.0
v  1.0  1.0  1.0
v -1.0  1.0  1.0
v -1.0 -1.0 -1.0
v  1.0 -1.0 -1.0
v  1.0  1.0 -1.0
v -1.0  1.0 -1.0
f 1 2 3 4
f 6 5 8 7
f 5 1 4 8
f 2 6 7 3
f 4 3 7 8
f 5 6 2 1
";

/// A mesh and where it sits in the world
pub struct SceneModel {
    pub name: String,
    pub mesh: Mesh,
    pub model_matrix: Matrix4<f32>,
}

impl SceneModel {
    pub fn from_obj(
        name: &str,
        text: &str,
        transform: &ModelTransform,
        policy: DegeneratePolicy,
    ) -> Result<Self> {
        let mesh = Mesh::from_obj(text, policy).with_context(|| format!("parse OBJ: {}", name))?;
        log::info!("loaded {}: {} triangles", name, mesh.triangle_count());
        Ok(Self {
            name: name.to_string(),
            mesh,
            model_matrix: transform.matrix(),
        })
    }

    pub fn cube() -> Result<Self> {
        let transform = ModelTransform {
            scale: 0.3,
            ..ModelTransform::default()
        };
        Self::from_obj("cube", CUBE_OBJ, &transform, DegeneratePolicy::default())
    }
}

/// Read every configured model from disk, in order
pub fn load_models(config: &ViewerConfig) -> Result<Vec<SceneModel>> {
    config
        .models
        .iter()
        .map(|source| {
            let text = std::fs::read_to_string(&source.source)
                .with_context(|| format!("read OBJ: {}", source.source))?;
            SceneModel::from_obj(&source.source, &text, &source.transform, config.degenerate)
        })
        .collect()
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    models: Vec<SceneModel>,
    angles: OrbitAngles,
    camera: Camera,
    perspective: Perspective,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(models: Vec<SceneModel>, perspective: Perspective) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            models,
            angles: OrbitAngles::zero(),
            camera: Camera::default(),
            perspective,
            // Top row is the status line
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn angles(&self) -> OrbitAngles {
        self.angles
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.angles.rotate(ORBIT_STEP, 0.0, 0.0);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.angles.rotate(-ORBIT_STEP, 0.0, 0.0);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.angles.rotate(0.0, -ORBIT_STEP, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.angles.rotate(0.0, ORBIT_STEP, 0.0);
            }
            KeyCode::Char('e') => {
                self.angles.rotate(0.0, 0.0, ORBIT_STEP);
            }
            KeyCode::Char('r') => {
                self.angles.rotate(0.0, 0.0, -ORBIT_STEP);
            }
            _ => {}
        }
    }

    /// Rasterize every model into the renderer's buffers
    pub fn paint(&mut self) -> objview_core::Result<()> {
        let camera = self.camera.view_matrix(&self.angles)?;
        let persp = self.perspective.matrix(self.renderer.aspect())?;

        self.renderer.clear();
        for model in &self.models {
            self.renderer
                .render_mesh(&model.mesh, &model.model_matrix, &camera, &persp);
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        if let Err(error) = self.paint() {
            // Keep showing the previous frame
            log::warn!("skipping frame: {}", error);
            return Ok(());
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "objview | {} model(s) | rot {:+.2}π {:+.2}π {:+.2}π | FPS: {:.1} | W/S A/D E/R rotate, Q quits",
                self.models.len(),
                self.angles.x,
                self.angles.y,
                self.angles.z,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use objview_core::ModelSource;

    #[test]
    fn test_builtin_cube() {
        let cube = SceneModel::cube().unwrap();
        assert_eq!(cube.mesh.triangle_count(), 12);
        assert!((cube.model_matrix[(0, 0)] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_has_context() {
        let config = ViewerConfig {
            models: vec![ModelSource {
                source: "/nonexistent/teapot.obj".into(),
                transform: ModelTransform::default(),
            }],
            ..ViewerConfig::default()
        };
        let error = load_models(&config).err().unwrap();
        assert!(error.to_string().contains("/nonexistent/teapot.obj"));
    }

    #[test]
    fn test_malformed_file_has_context() {
        let error = SceneModel::from_obj(
            "broken.obj",
            "v 1.0 foo 2.0\n",
            &ModelTransform::default(),
            DegeneratePolicy::default(),
        )
        .err()
        .unwrap();
        assert!(error.to_string().contains("broken.obj"));
        assert!(matches!(
            error.downcast_ref::<objview_core::Error>(),
            Some(objview_core::Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_key_step() {
        // Constructed by hand: `new` needs a real terminal.
        let mut app = TerminalApp {
            models: vec![SceneModel::cube().unwrap()],
            angles: OrbitAngles::zero(),
            camera: Camera::default(),
            perspective: Perspective::default(),
            renderer: AsciiRenderer::new(40, 20),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE));
        assert_eq!(app.angles(), OrbitAngles::new(ORBIT_STEP, -ORBIT_STEP, ORBIT_STEP));

        app.paint().unwrap();

        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.running);
    }
}
