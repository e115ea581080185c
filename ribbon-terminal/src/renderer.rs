/// ASCII rasterizer implementing the graphics context for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use ribbon_core::{GraphicsContext, Primitive, RenderError, ShaderStage, Uniform, Viewport};
use std::collections::HashMap;
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Attribute locations the fixed pipeline understands
const ATTRIBUTES: [&str; 3] = ["vertex", "normal", "texCoord"];

const MARKER: char = 'O';

#[derive(Debug, Clone, Copy)]
struct AttribBinding {
    buffer: usize,
    components: usize,
}

/// Screen-space vertex: `(x, y, depth)`
type ScreenVertex = (f32, f32, f32);

/// Software context that interprets the ribbon program's uniforms with a
/// fixed Lambert pipeline. Shader sources are accepted but never executed.
pub struct AsciiContext {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    buffers: Vec<Vec<f32>>,
    attribs: [Option<AttribBinding>; 3],
    uniforms: HashMap<String, Uniform>,
    depth_test: bool,
}

impl AsciiContext {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            buffers: Vec::new(),
            attribs: [None; 3],
            uniforms: HashMap::new(),
            depth_test: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resize the character grid; contents are discarded
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; width * height];
        self.char_buffer = vec![' '; width * height];
    }

    /// Character at `(x, y)`, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Number of non-blank cells
    pub fn coverage(&self) -> usize {
        self.char_buffer.iter().filter(|c| **c != ' ').count()
    }

    fn matrix(&self, name: &str) -> Matrix4<f32> {
        match self.uniforms.get(name) {
            Some(Uniform::Mat4(matrix)) => *matrix,
            _ => Matrix4::identity(),
        }
    }

    fn float(&self, name: &str) -> f32 {
        match self.uniforms.get(name) {
            Some(Uniform::Float(value)) => *value,
            _ => 0.0,
        }
    }

    fn light_direction(&self) -> Vector3<f32> {
        let light = match self.uniforms.get("lightPos") {
            Some(Uniform::Vec3(position)) => Vector3::from(*position),
            _ => Vector3::zeros(),
        };
        light.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z)
    }

    fn ambient_level(&self) -> f32 {
        match self.uniforms.get("ambientColor") {
            Some(Uniform::Vec3([r, g, b])) => 0.299 * r + 0.587 * g + 0.114 * b,
            _ => 0.0,
        }
    }

    /// Object-space positions of vertices `first..first + count`
    fn fetch_positions(&self, first: usize, count: usize) -> Vec<Point3<f32>> {
        let Some(binding) = self.attribs[0] else {
            return Vec::new();
        };
        let data = &self.buffers[binding.buffer];
        let stride = binding.components.max(1);

        (first..first + count)
            .map_while(|index| {
                let offset = index * stride;
                let x = *data.get(offset)?;
                let y = data.get(offset + 1).copied().unwrap_or(0.0);
                let z = data.get(offset + 2).copied().unwrap_or(0.0);
                Some(Point3::new(x, y, z))
            })
            .collect()
    }

    fn project(&self, mvp: &Matrix4<f32>, point: &Point3<f32>) -> Option<ScreenVertex> {
        let viewport = Viewport::new(self.width as u32, self.height as u32);
        let clip: Vector4<f32> = mvp * point.to_homogeneous();
        viewport.to_screen(&clip)
    }

    /// Brightness of a face under the current light, both sides lit
    fn shade(&self, normal_matrix: &Matrix3<f32>, corners: [&Point3<f32>; 3]) -> char {
        let [p0, p1, p2] = corners;
        let face = (p1 - p0).cross(&(p2 - p0));
        let normal = match (normal_matrix * face).try_normalize(f32::EPSILON) {
            Some(normal) => normal,
            None => return LUMINOSITY_RAMP[1],
        };

        let diffuse = normal.dot(&self.light_direction()).abs();
        let brightness = (self.ambient_level() + diffuse).clamp(0.0, 1.0);

        // Map brightness to character, skipping the blank
        let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
        let index = 1 + (brightness * steps).round() as usize;
        LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
    }

    fn depth_char(depth: f32) -> char {
        // Nearer (smaller depth) is brighter
        let brightness = ((1.0 - depth) * 0.5).clamp(0.0, 1.0);
        let steps = (LUMINOSITY_RAMP.len() - 3) as f32;
        LUMINOSITY_RAMP[2 + (brightness * steps).round() as usize]
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if !self.depth_test || depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
        }
    }

    fn draw_line(&mut self, from: ScreenVertex, to: ScreenVertex) {
        let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            let depth = from.2 + (to.2 - from.2) * t;
            self.plot(x.floor() as i32, y.floor() as i32, depth, Self::depth_char(depth));
        }
    }

    fn rasterize_triangle(&mut self, coords: [ScreenVertex; 3], character: char) {
        let [v0, v1, v2] = coords;

        // Zero-area triangles cover no pixel centre
        let area = (v1.0 - v0.0) * (v2.1 - v0.1) - (v2.0 - v0.0) * (v1.1 - v0.1);
        if area.abs() < 1e-6 {
            return;
        }

        // Bounding box, clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            let py = y as f32 + 0.5;
            // Only walk the columns the triangle spans on this row
            let Some((from, to)) = row_span(coords, py) else {
                continue;
            };
            let start = ((from - 0.5).floor() as i32 - 1).max(min_x);
            let end = ((to - 0.5).ceil() as i32 + 1).min(max_x);

            for x in start..=end {
                let px = x as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, character);
                    }
                }
            }
        }
    }

    fn draw_triangles(
        &mut self,
        positions: &[Point3<f32>],
        screen: &[Option<ScreenVertex>],
        triangles: Vec<[usize; 3]>,
    ) {
        let normal_matrix: Matrix3<f32> =
            self.matrix("normalMatrix").fixed_view::<3, 3>(0, 0).into_owned();
        for [a, b, c] in triangles {
            let (Some(sa), Some(sb), Some(sc)) = (screen[a], screen[b], screen[c]) else {
                continue;
            };
            let corners = [&positions[a], &positions[b], &positions[c]];
            let character = self.shade(&normal_matrix, corners);
            self.rasterize_triangle([sa, sb, sc], character);
        }
    }

    /// Write the character grid to `writer`
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::DarkYellow,
                    '+' | '*' => Color::Yellow,
                    '#' | '%' | '@' => Color::White,
                    MARKER => Color::Red,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl GraphicsContext for AsciiContext {
    type Buffer = usize;
    type Shader = ShaderStage;
    type Program = ();
    type UniformLocation = String;

    fn create_buffer(&mut self) -> Result<usize, RenderError> {
        self.buffers.push(Vec::new());
        Ok(self.buffers.len() - 1)
    }

    fn buffer_data(&mut self, buffer: &usize, data: &[f32]) {
        if let Some(storage) = self.buffers.get_mut(*buffer) {
            storage.clear();
            storage.extend_from_slice(data);
        }
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderStage, String> {
        log::debug!("terminal pipeline ignores {:?} shader ({} bytes)", stage, source.len());
        Ok(stage)
    }

    fn link_program(
        &mut self,
        _vertex: &ShaderStage,
        _fragment: &ShaderStage,
    ) -> Result<(), String> {
        Ok(())
    }

    fn use_program(&mut self, _program: &()) {}

    fn attrib_location(&mut self, _program: &(), name: &str) -> Option<u32> {
        ATTRIBUTES.iter().position(|a| *a == name).map(|i| i as u32)
    }

    fn uniform_location(&mut self, _program: &(), name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn vertex_attrib(&mut self, buffer: &usize, location: u32, components: i32, _normalized: bool) {
        if let Some(slot) = self.attribs.get_mut(location as usize) {
            *slot = Some(AttribBinding {
                buffer: *buffer,
                components: components.max(1) as usize,
            });
        }
    }

    fn uniform(&mut self, location: &String, value: Uniform) {
        self.uniforms.insert(location.clone(), value);
    }

    fn enable_depth_test(&mut self) {
        self.depth_test = true;
    }

    fn clear(&mut self, _color: [f32; 4]) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize) {
        let positions = self.fetch_positions(first, count);
        let mvp = self.matrix("ModelViewProjectionMatrix");
        let screen: Vec<Option<ScreenVertex>> =
            positions.iter().map(|p| self.project(&mvp, p)).collect();

        match primitive {
            Primitive::Points => {
                let character = if self.float("pointMode") > 0.5 { MARKER } else { '@' };
                for (x, y, depth) in screen.iter().flatten() {
                    // Markers sit on top of the surface
                    self.plot(x.floor() as i32, y.floor() as i32, depth - 1e-3, character);
                }
            }
            Primitive::LineStrip => {
                for pair in screen.windows(2) {
                    if let [Some(from), Some(to)] = pair {
                        self.draw_line(*from, *to);
                    }
                }
            }
            Primitive::TriangleFan => {
                let triangles = (1..positions.len().saturating_sub(1))
                    .map(|i| [0, i, i + 1])
                    .collect();
                self.draw_triangles(&positions, &screen, triangles);
            }
            Primitive::TriangleStrip => {
                let triangles = (0..positions.len().saturating_sub(2))
                    .map(|i| [i, i + 1, i + 2])
                    .collect();
                self.draw_triangles(&positions, &screen, triangles);
            }
        }
    }
}

/// Horizontal extent of a triangle along the line `y = py`
fn row_span(coords: [ScreenVertex; 3], py: f32) -> Option<(f32, f32)> {
    let [v0, v1, v2] = coords;
    let mut span: Option<(f32, f32)> = None;
    let mut include = |x: f32| {
        span = Some(match span {
            Some((from, to)) => (from.min(x), to.max(x)),
            None => (x, x),
        });
    };

    for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
        let (low, high) = (a.1.min(b.1), a.1.max(b.1));
        if py < low || py > high {
            continue;
        }
        if (b.1 - a.1).abs() < f32::EPSILON {
            include(a.0);
            include(b.0);
        } else {
            include(a.0 + (py - a.1) / (b.1 - a.1) * (b.0 - a.0));
        }
    }
    span
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
