//! Immediate-mode graphics API seam.
//!
//! The render session only talks to the GPU through [`GraphicsContext`], so the
//! same frame logic drives WebGL in the browser and the ASCII rasterizer in the
//! terminal.

use nalgebra::Matrix4;

use crate::error::RenderError;

/// Primitive assembly mode of a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Points,
    LineStrip,
    TriangleFan,
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// A value for a single uniform slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4(Matrix4<f32>),
}

/// A `draw_arrays` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub first: usize,
    pub count: usize,
}

impl DrawCall {
    pub fn new(primitive: Primitive, first: usize, count: usize) -> Self {
        Self {
            primitive,
            first,
            count,
        }
    }
}

pub trait GraphicsContext {
    type Buffer;
    type Shader;
    type Program;
    type UniformLocation;

    fn create_buffer(&mut self) -> Result<Self::Buffer, RenderError>;

    /// Replace the contents of `buffer`
    fn buffer_data(&mut self, buffer: &Self::Buffer, data: &[f32]);

    /// Compile one stage; the error is the driver's info log
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;

    /// Link a program; the error is the driver's info log
    fn link_program(
        &mut self,
        vertex: &Self::Shader,
        fragment: &Self::Shader,
    ) -> Result<Self::Program, String>;

    fn use_program(&mut self, program: &Self::Program);

    fn attrib_location(&mut self, program: &Self::Program, name: &str) -> Option<u32>;

    fn uniform_location(
        &mut self,
        program: &Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;

    /// Feed attribute `location` from `buffer`, `components` floats per vertex
    fn vertex_attrib(
        &mut self,
        buffer: &Self::Buffer,
        location: u32,
        components: i32,
        normalized: bool,
    );

    fn uniform(&mut self, location: &Self::UniformLocation, value: Uniform);

    fn enable_depth_test(&mut self);

    /// Clear colour and depth
    fn clear(&mut self, color: [f32; 4]);

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize);
}
