//! Render session and per-frame pipeline.
//!
//! A [`RenderSession`] owns everything one viewer needs: the graphics
//! context, the linked program, the surface buffer, the user point marker and
//! the trackball. Control values are passed in on every call and never stored.

use nalgebra::Matrix4;

use crate::config::RenderConfig;
use crate::controls::ControlState;
use crate::error::RenderError;
use crate::geometry::SurfaceMesh;
use crate::gpu::{DrawCall, GraphicsContext, Uniform};
use crate::model::GeometryBuffer;
use crate::program::{set_uniform, ShaderProgram};
use crate::rotator::TrackballRotator;
use crate::shaders;
use crate::surface::Surface;
use crate::transform::{FrameMatrices, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceVariant {
    /// Lit surface drawn as a triangle fan or as line strips
    Shaded,
    /// Textured triangle strip with a movable user point
    Textured,
}

impl SurfaceVariant {
    /// Sample the surface the way this variant draws it
    pub fn sample(self, surface: &Surface, step: f64) -> SurfaceMesh {
        match self {
            Self::Shaded => surface.sample_grid(step),
            Self::Textured => surface.sample_strip(step),
        }
    }
}

pub struct RenderSession<G: GraphicsContext> {
    gl: G,
    config: RenderConfig,
    variant: SurfaceVariant,
    surface: Surface,
    program: ShaderProgram<G>,
    model: GeometryBuffer<G>,
    marker: Option<GeometryBuffer<G>>,
    rotator: TrackballRotator,
}

impl<G: GraphicsContext> RenderSession<G> {
    /// Compile the program for `variant`, create the buffers and upload the
    /// initial surface
    pub fn new(
        mut gl: G,
        config: RenderConfig,
        variant: SurfaceVariant,
        controls: &ControlState,
    ) -> Result<Self, RenderError> {
        config.validate()?;

        let program = ShaderProgram::create(&mut gl, "Basic", shaders::sources(variant))?;
        program.activate(&mut gl);

        let model = GeometryBuffer::new(&mut gl, "Surface", variant == SurfaceVariant::Textured)?;
        let marker = match variant {
            SurfaceVariant::Textured => Some(GeometryBuffer::new(&mut gl, "UserPoint", false)?),
            SurfaceVariant::Shaded => None,
        };

        let mut session = Self {
            surface: Surface::new(config.surface),
            rotator: TrackballRotator::new(config.scene.view_distance),
            gl,
            config,
            variant,
            program,
            model,
            marker,
        };
        session.regenerate(controls);
        session.gl.enable_depth_test();

        log::info!("render session ready ({:?})", variant);
        Ok(session)
    }

    /// Resample the surface for the current mode and upload it.
    /// Returns the new vertex count.
    pub fn regenerate(&mut self, controls: &ControlState) -> usize {
        let step = controls.step(&self.config.sampling);
        let mesh = self.variant.sample(&self.surface, step);
        self.model.upload(&mut self.gl, &mesh);

        log::info!(
            "sampled {} vertices at step {} ({:?})",
            self.model.count(),
            step,
            self.variant
        );
        self.model.count()
    }

    /// Regenerate, then draw one frame
    pub fn rerender(&mut self, controls: &ControlState) -> Vec<DrawCall> {
        self.regenerate(controls);
        self.draw(controls)
    }

    /// Matrices for the current rotator state
    pub fn frame_matrices(&self) -> FrameMatrices {
        let scene = &self.config.scene;
        let projection = scene.projection.matrix();
        let rotation = Transform::axis_rotation(scene.recenter_axis, scene.recenter_angle);
        let [x, y, z] = scene.translation;
        let translation = Transform::translation_matrix(x, y, z);

        FrameMatrices::compose(&projection, &self.rotator.view_matrix(), &rotation, &translation)
    }

    /// Render one frame. Returns every draw call issued.
    pub fn draw(&mut self, controls: &ControlState) -> Vec<DrawCall> {
        self.gl.clear(self.config.scene.clear_color);

        let matrices = self.frame_matrices();
        self.upload_frame_uniforms(&matrices, controls);

        let gl = &mut self.gl;
        let slots = &self.program.slots;
        set_uniform(gl, &slots.point_mode, Uniform::Float(0.0));
        let mut calls = self.model.draw(gl, &self.program, controls.detailed);

        if let Some(marker) = &mut self.marker {
            let point = controls.user_point;
            let position = self.surface.position(f64::from(point.x), f64::from(point.y));
            marker.upload(gl, &SurfaceMesh::point(position));

            set_uniform(gl, &slots.point_mode, Uniform::Float(1.0));
            calls.extend(marker.draw(gl, &self.program, false));
            set_uniform(gl, &slots.point_mode, Uniform::Float(0.0));
        }

        log::debug!("frame drew {} calls", calls.len());
        calls
    }

    fn upload_frame_uniforms(&mut self, matrices: &FrameMatrices, controls: &ControlState) {
        let gl = &mut self.gl;
        let slots = &self.program.slots;
        let material = &self.config.material;

        let mvp = Uniform::Mat4(matrices.model_view_projection);
        set_uniform(gl, &slots.model_view_projection, mvp);
        set_uniform(gl, &slots.normal_matrix, Uniform::Mat4(matrices.normal));

        set_uniform(gl, &slots.shininess, Uniform::Float(material.shininess));
        set_uniform(gl, &slots.light_pos, Uniform::Vec3(controls.light_position));
        set_uniform(gl, &slots.light_vec, Uniform::Vec3(material.light_vec));
        set_uniform(gl, &slots.ambient_color, Uniform::Vec3(material.ambient));
        set_uniform(gl, &slots.diffuse_color, Uniform::Vec3(material.diffuse));
        set_uniform(gl, &slots.specular_color, Uniform::Vec3(material.specular));
        set_uniform(gl, &slots.color, Uniform::Vec4(material.color));

        if self.variant == SurfaceVariant::Textured {
            let point = controls.user_point;
            let user_point = self.surface.tex_coord(f64::from(point.x), f64::from(point.y));

            set_uniform(gl, &slots.texture, Uniform::Int(0));
            set_uniform(gl, &slots.user_point, Uniform::Vec2([user_point.x, user_point.y]));
            set_uniform(gl, &slots.rotation_angle, Uniform::Float(controls.rotation_radians()));
        }
    }

    pub fn context(&self) -> &G {
        &self.gl
    }

    pub fn context_mut(&mut self) -> &mut G {
        &mut self.gl
    }

    pub fn rotator(&self) -> &TrackballRotator {
        &self.rotator
    }

    pub fn rotator_mut(&mut self) -> &mut TrackballRotator {
        &mut self.rotator
    }

    pub fn variant(&self) -> SurfaceVariant {
        self.variant
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn vertex_count(&self) -> usize {
        self.model.count()
    }

    /// Model-view-projection of the next frame
    pub fn model_view_projection(&self) -> Matrix4<f32> {
        self.frame_matrices().model_view_projection
    }
}
