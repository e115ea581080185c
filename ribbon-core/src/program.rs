/// Linked shader program and the slots the frame renderer writes
use crate::error::ShaderError;
use crate::gpu::{GraphicsContext, ShaderStage, Uniform};

/// Vertex and fragment source of one program
#[derive(Debug, Clone, Copy)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// Attribute and uniform handles, resolved once after linking.
/// Slots the program does not declare stay `None`.
pub struct ProgramSlots<G: GraphicsContext> {
    pub vertex: Option<u32>,
    pub normal: Option<u32>,
    pub tex_coord: Option<u32>,

    pub model_view_projection: Option<G::UniformLocation>,
    pub normal_matrix: Option<G::UniformLocation>,
    pub color: Option<G::UniformLocation>,

    pub ambient_color: Option<G::UniformLocation>,
    pub diffuse_color: Option<G::UniformLocation>,
    pub specular_color: Option<G::UniformLocation>,
    pub shininess: Option<G::UniformLocation>,

    pub light_pos: Option<G::UniformLocation>,
    pub light_vec: Option<G::UniformLocation>,

    pub texture: Option<G::UniformLocation>,
    pub user_point: Option<G::UniformLocation>,
    pub rotation_angle: Option<G::UniformLocation>,
    pub point_mode: Option<G::UniformLocation>,
}

impl<G: GraphicsContext> ProgramSlots<G> {
    fn resolve(gl: &mut G, program: &G::Program) -> Self {
        Self {
            vertex: gl.attrib_location(program, "vertex"),
            normal: gl.attrib_location(program, "normal"),
            tex_coord: gl.attrib_location(program, "texCoord"),

            model_view_projection: gl.uniform_location(program, "ModelViewProjectionMatrix"),
            normal_matrix: gl.uniform_location(program, "normalMatrix"),
            color: gl.uniform_location(program, "color"),

            ambient_color: gl.uniform_location(program, "ambientColor"),
            diffuse_color: gl.uniform_location(program, "diffuseColor"),
            specular_color: gl.uniform_location(program, "specularColor"),
            shininess: gl.uniform_location(program, "shininessVal"),

            light_pos: gl.uniform_location(program, "lightPos"),
            light_vec: gl.uniform_location(program, "lightVec"),

            texture: gl.uniform_location(program, "textureSampler"),
            user_point: gl.uniform_location(program, "userPoint"),
            rotation_angle: gl.uniform_location(program, "rotationAngle"),
            point_mode: gl.uniform_location(program, "pointMode"),
        }
    }
}

pub struct ShaderProgram<G: GraphicsContext> {
    pub name: String,
    program: G::Program,
    pub slots: ProgramSlots<G>,
}

impl<G: GraphicsContext> ShaderProgram<G> {
    /// Compile both stages, link them and resolve the slots
    pub fn create(gl: &mut G, name: &str, sources: ShaderSources<'_>) -> Result<Self, ShaderError> {
        let vertex = gl
            .compile_shader(ShaderStage::Vertex, sources.vertex)
            .map_err(ShaderError::Vertex)?;
        let fragment = gl
            .compile_shader(ShaderStage::Fragment, sources.fragment)
            .map_err(ShaderError::Fragment)?;
        let program = gl
            .link_program(&vertex, &fragment)
            .map_err(ShaderError::Link)?;

        let slots = ProgramSlots::resolve(gl, &program);
        log::debug!("linked shader program '{name}'");

        Ok(Self {
            name: name.to_string(),
            program,
            slots,
        })
    }

    /// Make this program current
    pub fn activate(&self, gl: &mut G) {
        gl.use_program(&self.program);
    }
}

/// Upload `value` if the slot exists
pub fn set_uniform<G: GraphicsContext>(
    gl: &mut G,
    slot: &Option<G::UniformLocation>,
    value: Uniform,
) {
    if let Some(location) = slot {
        gl.uniform(location, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::recording::{Call, RecordingContext};

    const SOURCES: ShaderSources<'static> = ShaderSources {
        vertex: "void main() {}",
        fragment: "void main() {}",
    };

    #[test]
    fn test_create_resolves_slots() {
        let mut gl = RecordingContext {
            missing: vec!["texCoord".to_string(), "userPoint".to_string()],
            ..Default::default()
        };
        let program = ShaderProgram::create(&mut gl, "Basic", SOURCES).unwrap();

        assert_eq!(program.slots.vertex, Some(0));
        assert_eq!(program.slots.normal, Some(1));
        assert_eq!(program.slots.tex_coord, None);
        assert_eq!(program.slots.user_point, None);
        assert_eq!(
            program.slots.model_view_projection.as_deref(),
            Some("ModelViewProjectionMatrix")
        );
        assert_eq!(program.slots.shininess.as_deref(), Some("shininessVal"));

        program.activate(&mut gl);
        assert_eq!(gl.calls.last(), Some(&Call::UseProgram));
    }

    #[test]
    fn test_vertex_failure_surfaces_log() {
        let mut gl = RecordingContext {
            fail_stage: Some((ShaderStage::Vertex, "ERROR: 0:1: syntax error".to_string())),
            ..Default::default()
        };
        let result = ShaderProgram::create(&mut gl, "Basic", SOURCES);
        assert_eq!(
            result.err(),
            Some(ShaderError::Vertex("ERROR: 0:1: syntax error".to_string()))
        );
        // The fragment stage is never compiled
        assert_eq!(gl.calls, vec![Call::Compile(ShaderStage::Vertex)]);
    }

    #[test]
    fn test_fragment_and_link_failures() {
        let mut gl = RecordingContext {
            fail_stage: Some((ShaderStage::Fragment, "bad precision".to_string())),
            ..Default::default()
        };
        let err = ShaderProgram::create(&mut gl, "Basic", SOURCES).err().unwrap();
        assert_eq!(err.to_string(), "Error in fragment shader:  bad precision");

        let mut gl = RecordingContext {
            fail_link: Some("varying mismatch".to_string()),
            ..Default::default()
        };
        let err = ShaderProgram::create(&mut gl, "Basic", SOURCES).err().unwrap();
        assert_eq!(err, ShaderError::Link("varying mismatch".to_string()));
    }

    #[test]
    fn test_set_uniform_skips_missing_slot() {
        let mut gl = RecordingContext::default();
        set_uniform(&mut gl, &None, Uniform::Float(1.0));
        assert!(gl.calls.is_empty());

        set_uniform(&mut gl, &Some("shininessVal".to_string()), Uniform::Float(10.0));
        assert_eq!(gl.last_uniform("shininessVal"), Some(Uniform::Float(10.0)));
    }
}
