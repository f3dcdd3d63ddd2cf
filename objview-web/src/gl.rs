/// WebGL2 plumbing: the debug shader program and per-model buffers
use js_sys::Float32Array;
use nalgebra::Matrix4;
use objview_core::Mesh;
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

use crate::error::WebError;

/// Colors each fragment with its normal; divides by `w` itself and pushes
/// vertices with `w <= 0` out of the clip volume.
pub const VERTEX_SHADER: &str = r#"
attribute vec4 vPosition;
attribute vec3 vNormal;
uniform mat4 uModelMatrix;
uniform mat4 uCameraMatrix;
uniform mat4 uPerspMatrix;
varying vec4 fColor;
void main() {
    fColor = vec4(vNormal, 1.0);
    gl_Position = uPerspMatrix * uCameraMatrix * uModelMatrix * vPosition;
    if (gl_Position.w <= 0.0) {
        gl_Position = vec4(2.0, 2.0, 2.0, 1.0);
    } else {
        gl_Position.xyz = gl_Position.xyz / gl_Position.w;
        gl_Position.w = 1.0;
    }
}
"#;

pub const FRAGMENT_SHADER: &str = r#"
precision mediump float;
varying vec4 fColor;
void main() {
    gl_FragColor = fColor;
}
"#;

pub const POSITION_ATTRIBUTE: &str = "vPosition";
pub const NORMAL_ATTRIBUTE: &str = "vNormal";

/// Linked program with its attribute and uniform locations resolved
pub struct ShaderProgram {
    pub program: WebGlProgram,
    pub position: u32,
    pub normal: u32,
    pub model_matrix: WebGlUniformLocation,
    pub camera_matrix: WebGlUniformLocation,
    pub persp_matrix: WebGlUniformLocation,
}

impl ShaderProgram {
    pub fn new(gl: &GL) -> Result<Self, WebError> {
        let vertex = compile_shader(gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(gl, &vertex, &fragment)?;
        gl.use_program(Some(&program));

        let attribute = |name: &str| -> Result<u32, WebError> {
            let location = gl.get_attrib_location(&program, name);
            u32::try_from(location)
                .map_err(|_| WebError::Gl(format!("attribute {} not found", name)))
        };
        let uniform = |name: &str| -> Result<WebGlUniformLocation, WebError> {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| WebError::Gl(format!("uniform {} not found", name)))
        };

        Ok(Self {
            position: attribute(POSITION_ATTRIBUTE)?,
            normal: attribute(NORMAL_ATTRIBUTE)?,
            model_matrix: uniform("uModelMatrix")?,
            camera_matrix: uniform("uCameraMatrix")?,
            persp_matrix: uniform("uPerspMatrix")?,
            program,
        })
    }
}

pub fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, WebError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| WebError::Gl("unable to create shader object".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(WebError::Gl(format!(
            "shader failed to compile: {}",
            gl.get_shader_info_log(&shader).unwrap_or_default()
        )))
    }
}

pub fn link_program(
    gl: &GL,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> Result<WebGlProgram, WebError> {
    let program = gl
        .create_program()
        .ok_or_else(|| WebError::Gl("unable to create program object".into()))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(WebError::Gl(format!(
            "program failed to link: {}",
            gl.get_program_info_log(&program).unwrap_or_default()
        )))
    }
}

/// Copy `data` into a new static `ARRAY_BUFFER`
pub fn upload_buffer(gl: &GL, data: &[f32]) -> Result<WebGlBuffer, WebError> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| WebError::Gl("unable to create buffer".into()))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let array = Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
    Ok(buffer)
}

/// A model resident on the GPU
pub struct GpuModel {
    pub positions: WebGlBuffer,
    pub normals: WebGlBuffer,
    pub vertex_count: i32,
    pub model_matrix: Matrix4<f32>,
}

impl GpuModel {
    pub fn upload(gl: &GL, mesh: &Mesh, model_matrix: Matrix4<f32>) -> Result<Self, WebError> {
        let vertex_count = i32::try_from(mesh.vertex_count())
            .map_err(|_| WebError::Gl("mesh has too many vertices".into()))?;
        Ok(Self {
            positions: upload_buffer(gl, &mesh.position_buffer())?,
            normals: upload_buffer(gl, &mesh.normal_buffer())?,
            vertex_count,
            model_matrix,
        })
    }

    pub fn draw(&self, gl: &GL, program: &ShaderProgram) {
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.positions));
        gl.vertex_attrib_pointer_with_i32(program.position, 4, GL::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(program.position);

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.normals));
        gl.vertex_attrib_pointer_with_i32(program.normal, 3, GL::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(program.normal);

        gl.uniform_matrix4fv_with_f32_array(
            Some(&program.model_matrix),
            false,
            self.model_matrix.as_slice(),
        );
        gl.draw_arrays(GL::TRIANGLES, 0, self.vertex_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_interface_names() {
        for name in [
            POSITION_ATTRIBUTE,
            NORMAL_ATTRIBUTE,
            "uModelMatrix",
            "uCameraMatrix",
            "uPerspMatrix",
        ] {
            assert!(VERTEX_SHADER.contains(name), "vertex shader lacks {}", name);
        }
        assert!(VERTEX_SHADER.contains("attribute vec4 vPosition;"));
        assert!(VERTEX_SHADER.contains("attribute vec3 vNormal;"));
        assert!(FRAGMENT_SHADER.contains("fColor"));
    }
}
