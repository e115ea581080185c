/// GPU-side vertex storage and the draw calls issued for it
use crate::error::RenderError;
use crate::geometry::{MeshLayout, SurfaceMesh};
use crate::gpu::{DrawCall, GraphicsContext, Primitive};
use crate::program::ShaderProgram;

/// Draw calls for `count` vertices laid out as `layout`.
///
/// A grid is drawn as one triangle fan when `fan` is set, otherwise as one
/// line strip per column.
pub fn draw_calls(layout: MeshLayout, count: usize, fan: bool) -> Vec<DrawCall> {
    if count == 0 {
        return Vec::new();
    }

    match layout {
        MeshLayout::Grid { .. } if fan => vec![DrawCall::new(Primitive::TriangleFan, 0, count)],
        MeshLayout::Grid { columns } => {
            let strip_length = count / columns.max(1);
            if strip_length == 0 {
                return Vec::new();
            }
            (0..count)
                .step_by(strip_length)
                .map(|first| {
                    DrawCall::new(Primitive::LineStrip, first, strip_length.min(count - first))
                })
                .collect()
        }
        MeshLayout::Strip => vec![DrawCall::new(Primitive::TriangleStrip, 0, count)],
        MeshLayout::Points => vec![DrawCall::new(Primitive::Points, 0, count)],
    }
}

pub struct GeometryBuffer<G: GraphicsContext> {
    pub name: String,
    vertex_buffer: G::Buffer,
    tex_coord_buffer: Option<G::Buffer>,
    count: usize,
    layout: MeshLayout,
    textured: bool,
}

impl<G: GraphicsContext> GeometryBuffer<G> {
    pub fn new(gl: &mut G, name: &str, textured: bool) -> Result<Self, RenderError> {
        let vertex_buffer = gl.create_buffer()?;
        let tex_coord_buffer = if textured {
            Some(gl.create_buffer()?)
        } else {
            None
        };

        Ok(Self {
            name: name.to_string(),
            vertex_buffer,
            tex_coord_buffer,
            count: 0,
            layout: MeshLayout::Points,
            textured: false,
        })
    }

    /// Replace the buffer contents with `mesh`
    pub fn upload(&mut self, gl: &mut G, mesh: &SurfaceMesh) {
        let positions = mesh.flat_positions();
        gl.buffer_data(&self.vertex_buffer, &positions);

        self.textured = false;
        if let Some(buffer) = &self.tex_coord_buffer {
            if mesh.is_textured() {
                gl.buffer_data(buffer, &mesh.flat_tex_coords());
                self.textured = true;
            }
        }

        self.count = positions.len() / 3;
        self.layout = mesh.layout;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn layout(&self) -> MeshLayout {
        self.layout
    }

    /// Bind the buffers to `program`'s attributes and issue the draw calls.
    /// Returns the calls issued.
    pub fn draw(&self, gl: &mut G, program: &ShaderProgram<G>, fan: bool) -> Vec<DrawCall> {
        let slots = &program.slots;
        if let Some(location) = slots.vertex {
            gl.vertex_attrib(&self.vertex_buffer, location, 3, false);
        }
        // Positions double as normals
        if let Some(location) = slots.normal {
            gl.vertex_attrib(&self.vertex_buffer, location, 3, true);
        }
        if let (Some(location), Some(buffer), true) =
            (slots.tex_coord, &self.tex_coord_buffer, self.textured)
        {
            gl.vertex_attrib(buffer, location, 2, false);
        }

        let calls = draw_calls(self.layout, self.count, fan);
        for call in &calls {
            gl.draw_arrays(call.primitive, call.first, call.count);
        }
        calls
    }
}
