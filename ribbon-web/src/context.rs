/// WebGL2 implementation of the graphics context
use nalgebra::Matrix4;
use ribbon_core::{GraphicsContext, Primitive, RenderError, ShaderStage, Uniform};
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

pub struct WebGlContext {
    gl: GL,
}

impl WebGlContext {
    pub fn new(gl: GL) -> Self {
        Self { gl }
    }
}

fn primitive_mode(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Points => GL::POINTS,
        Primitive::LineStrip => GL::LINE_STRIP,
        Primitive::TriangleFan => GL::TRIANGLE_FAN,
        Primitive::TriangleStrip => GL::TRIANGLE_STRIP,
    }
}

fn upload_matrix(gl: &GL, location: &WebGlUniformLocation, matrix: &Matrix4<f32>) {
    // nalgebra stores column-major, as WebGL expects
    gl.uniform_matrix4fv_with_f32_array(Some(location), false, matrix.as_slice());
}

impl GraphicsContext for WebGlContext {
    type Buffer = WebGlBuffer;
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type UniformLocation = WebGlUniformLocation;

    fn create_buffer(&mut self) -> Result<WebGlBuffer, RenderError> {
        self.gl
            .create_buffer()
            .ok_or_else(|| RenderError::Resource("could not create buffer".to_string()))
    }

    fn buffer_data(&mut self, buffer: &WebGlBuffer, data: &[f32]) {
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        let array = js_sys::Float32Array::from(data);
        self.gl
            .buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STREAM_DRAW);
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<WebGlShader, String> {
        let shader_type = match stage {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        };
        let shader = self
            .gl
            .create_shader(shader_type)
            .ok_or_else(|| "could not create shader".to_string())?;
        self.gl.shader_source(&shader, source);
        self.gl.compile_shader(&shader);

        if self
            .gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(shader)
        } else {
            Err(self.gl.get_shader_info_log(&shader).unwrap_or_default())
        }
    }

    fn link_program(
        &mut self,
        vertex: &WebGlShader,
        fragment: &WebGlShader,
    ) -> Result<WebGlProgram, String> {
        let program = self
            .gl
            .create_program()
            .ok_or_else(|| "could not create program".to_string())?;
        self.gl.attach_shader(&program, vertex);
        self.gl.attach_shader(&program, fragment);
        self.gl.link_program(&program);

        if self
            .gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(program)
        } else {
            Err(self.gl.get_program_info_log(&program).unwrap_or_default())
        }
    }

    fn use_program(&mut self, program: &WebGlProgram) {
        self.gl.use_program(Some(program));
    }

    fn attrib_location(&mut self, program: &WebGlProgram, name: &str) -> Option<u32> {
        u32::try_from(self.gl.get_attrib_location(program, name)).ok()
    }

    fn uniform_location(
        &mut self,
        program: &WebGlProgram,
        name: &str,
    ) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    fn vertex_attrib(
        &mut self,
        buffer: &WebGlBuffer,
        location: u32,
        components: i32,
        normalized: bool,
    ) {
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        self.gl
            .vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, normalized, 0, 0);
        self.gl.enable_vertex_attrib_array(location);
    }

    fn uniform(&mut self, location: &WebGlUniformLocation, value: Uniform) {
        let gl = &self.gl;
        match value {
            Uniform::Int(v) => gl.uniform1i(Some(location), v),
            Uniform::Float(v) => gl.uniform1f(Some(location), v),
            Uniform::Vec2(v) => gl.uniform2fv_with_f32_array(Some(location), &v),
            Uniform::Vec3(v) => gl.uniform3fv_with_f32_array(Some(location), &v),
            Uniform::Vec4(v) => gl.uniform4fv_with_f32_array(Some(location), &v),
            Uniform::Mat4(m) => upload_matrix(gl, location, &m),
        }
    }

    fn enable_depth_test(&mut self) {
        self.gl.enable(GL::DEPTH_TEST);
    }

    fn clear(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize) {
        self.gl
            .draw_arrays(primitive_mode(primitive), first as i32, count as i32);
    }
}
