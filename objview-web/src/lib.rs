/// objview Web - WASM/WebGL2 viewer
///
/// Fetches the configured OBJ models, uploads flat-shaded meshes and draws
/// them under the orbit camera. The page drives the orbit through three
/// range inputs.
use std::cell::RefCell;
use std::rc::Rc;

use objview_core::{Axis, Camera, Error, Mesh, OrbitAngles, Perspective, ViewerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, HtmlInputElement, WebGl2RenderingContext as GL};

mod error;
mod fetch;
mod gl;
mod logger;

pub use error::WebError;
use gl::{GpuModel, ShaderProgram};

/// Everything a frame needs; shared with the slider callbacks
struct Scene {
    gl: GL,
    program: ShaderProgram,
    models: Vec<GpuModel>,
    camera: Camera,
    angles: OrbitAngles,
    perspective: Perspective,
    aspect: f32,
}

impl Scene {
    fn new(canvas_id: &str, config: &ViewerConfig) -> Result<Self, WebError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| WebError::Dom("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| WebError::Dom(format!("no element #{}", canvas_id)))?
            .dyn_into()
            .map_err(|_| WebError::Dom(format!("#{} is not a canvas", canvas_id)))?;

        let gl: GL = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .ok_or_else(|| WebError::Gl("WebGL2 isn't available".into()))?
            .dyn_into()
            .map_err(|_| WebError::Gl("unexpected context type".into()))?;

        let (width, height) = (canvas.width(), canvas.height());
        gl.viewport(0, 0, width as i32, height as i32);
        let [r, g, b, a] = config.clear_color;
        gl.clear_color(r, g, b, a);
        gl.enable(GL::DEPTH_TEST);

        let program = ShaderProgram::new(&gl)?;
        Ok(Self {
            gl,
            program,
            models: Vec::new(),
            camera: Camera::default(),
            angles: OrbitAngles::zero(),
            perspective: config.perspective,
            aspect: width as f32 / height.max(1) as f32,
        })
    }

    fn render(&self) -> Result<(), WebError> {
        let camera_matrix = match self.camera.view_matrix(&self.angles) {
            Ok(matrix) => matrix,
            Err(Error::DegenerateCamera) => {
                log::warn!("degenerate camera at {:?}, skipping frame", self.angles);
                return Ok(());
            }
            Err(error) => return Err(WebError::Gl(error.to_string())),
        };
        let persp_matrix = self
            .perspective
            .matrix(self.aspect)
            .map_err(|e| WebError::Gl(e.to_string()))?;

        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.use_program(Some(&self.program.program));
        gl.uniform_matrix4fv_with_f32_array(
            Some(&self.program.camera_matrix),
            false,
            camera_matrix.as_slice(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            Some(&self.program.persp_matrix),
            false,
            persp_matrix.as_slice(),
        );

        for model in &self.models {
            model.draw(gl, &self.program);
        }
        Ok(())
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    scene: Rc<RefCell<Scene>>,
}

#[wasm_bindgen]
impl WebViewer {
    /// Draw the loaded models with the current orbit
    pub fn render(&self) -> Result<(), JsValue> {
        self.scene.borrow().render()?;
        Ok(())
    }

    /// Set one orbit angle (a fraction of π) and redraw
    pub fn set_rotation(&self, axis: &str, value: f32) -> Result<(), JsValue> {
        let axis = Axis::from_name(axis)
            .ok_or_else(|| JsValue::from_str(&format!("unknown axis {:?}", axis)))?;
        set_and_render(&self.scene, axis, value)?;
        Ok(())
    }

    /// Add deltas (fractions of π) to the orbit and redraw
    pub fn rotate(&self, dx: f32, dy: f32, dz: f32) -> Result<(), JsValue> {
        self.scene.borrow_mut().angles.rotate(dx, dy, dz);
        self.render()
    }

    /// Feed the `input` events of three range inputs into the orbit angles
    pub fn attach_sliders(&self, x_id: &str, y_id: &str, z_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| WebError::Dom("no document".into()))?;

        for (id, axis) in [(x_id, Axis::X), (y_id, Axis::Y), (z_id, Axis::Z)] {
            let slider = document
                .get_element_by_id(id)
                .ok_or_else(|| WebError::Dom(format!("no element #{}", id)))?;
            let scene = Rc::clone(&self.scene);
            let on_input = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let Some(value) = slider_value(&input.value()) else {
                    log::warn!("ignoring non-numeric slider value {:?}", input.value());
                    return;
                };
                if let Err(error) = set_and_render(&scene, axis, value) {
                    log::error!("{}", error);
                }
            });
            slider.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
            // Listeners live as long as the page.
            on_input.forget();
        }
        Ok(())
    }

    pub fn model_count(&self) -> usize {
        self.scene.borrow().models.len()
    }
}

fn set_and_render(scene: &RefCell<Scene>, axis: Axis, value: f32) -> Result<(), WebError> {
    scene.borrow_mut().angles.set(axis, value);
    scene.borrow().render()
}

fn slider_value(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Set up WebGL on `canvas_id`, load every configured model in order and
/// draw the first frame.
///
/// `config_json` overrides [`ViewerConfig`] fields; models are fetched from
/// their `source` URLs. Any failed model fails the whole start.
#[wasm_bindgen]
pub async fn start(canvas_id: String, config_json: Option<String>) -> Result<WebViewer, JsValue> {
    let config = match config_json {
        Some(json) => ViewerConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => ViewerConfig::default(),
    };

    let mut scene = Scene::new(&canvas_id, &config)?;
    for source in &config.models {
        let text = fetch::fetch_text(&source.source).await?;
        let mesh = Mesh::from_obj(&text, config.degenerate).map_err(|error| WebError::Model {
            source_name: source.source.clone(),
            error,
        })?;
        log::info!(
            "loaded {}: {} triangles",
            source.source,
            mesh.triangle_count()
        );
        let model = GpuModel::upload(&scene.gl, &mesh, source.transform.matrix())?;
        scene.models.push(model);
    }

    scene.render()?;
    Ok(WebViewer {
        scene: Rc::new(RefCell::new(scene)),
    })
}

#[wasm_bindgen(start)]
pub fn main() {
    logger::init(log::LevelFilter::Info);
}
