/// GLSL ES 3.0 programs for both surface variants
use crate::program::ShaderSources;
use crate::renderer::SurfaceVariant;

const SHADED_VERTEX: &str = r#"#version 300 es
in vec3 vertex;
in vec3 normal;
uniform mat4 ModelViewProjectionMatrix;
uniform mat4 normalMatrix;
uniform float pointMode;

out vec3 vNormal;
out vec3 vPosition;

void main() {
    vec4 position = ModelViewProjectionMatrix * vec4(vertex, 1.0);
    vPosition = position.xyz / position.w;
    vNormal = mat3(normalMatrix) * normal;
    gl_PointSize = pointMode > 0.5 ? 8.0 : 1.0;
    gl_Position = position;
}
"#;

const SHADED_FRAGMENT: &str = r#"#version 300 es
precision highp float;

in vec3 vNormal;
in vec3 vPosition;

uniform vec4 color;
uniform vec3 ambientColor;
uniform vec3 diffuseColor;
uniform vec3 specularColor;
uniform float shininessVal;
uniform vec3 lightPos;
uniform vec3 lightVec;

out vec4 fragColor;

void main() {
    vec3 N = normalize(vNormal);
    vec3 L = length(lightVec) > 0.0 ? normalize(-lightVec) : normalize(lightPos - vPosition);

    float lambertian = max(dot(N, L), 0.0);
    float specular = 0.0;
    if (lambertian > 0.0) {
        vec3 R = reflect(-L, N);
        vec3 V = normalize(-vPosition);
        specular = pow(max(dot(R, V), 0.0), shininessVal);
    }

    vec3 lit = ambientColor + lambertian * diffuseColor + specular * specularColor;
    fragColor = vec4(lit, 1.0) * color;
}
"#;

const TEXTURED_VERTEX: &str = r#"#version 300 es
in vec3 vertex;
in vec3 normal;
in vec2 texCoord;
uniform mat4 ModelViewProjectionMatrix;
uniform mat4 normalMatrix;
uniform vec2 userPoint;
uniform float rotationAngle;
uniform float pointMode;

out vec3 vNormal;
out vec3 vPosition;
out vec2 vTexCoord;

vec2 rotateAround(vec2 p, vec2 centre, float angle) {
    float c = cos(angle);
    float s = sin(angle);
    vec2 d = p - centre;
    return centre + vec2(c * d.x - s * d.y, s * d.x + c * d.y);
}

void main() {
    vec4 position = ModelViewProjectionMatrix * vec4(vertex, 1.0);
    vPosition = position.xyz / position.w;
    vNormal = mat3(normalMatrix) * normal;
    vTexCoord = rotateAround(texCoord, userPoint, rotationAngle);
    gl_PointSize = pointMode > 0.5 ? 8.0 : 1.0;
    gl_Position = position;
}
"#;

const TEXTURED_FRAGMENT: &str = r#"#version 300 es
precision highp float;

in vec3 vNormal;
in vec3 vPosition;
in vec2 vTexCoord;

uniform sampler2D textureSampler;
uniform vec4 color;
uniform vec3 ambientColor;
uniform vec3 diffuseColor;
uniform vec3 lightPos;
uniform float pointMode;

out vec4 fragColor;

void main() {
    if (pointMode > 0.5) {
        fragColor = color;
        return;
    }
    vec3 N = normalize(vNormal);
    vec3 L = normalize(lightPos - vPosition);
    float lambertian = abs(dot(N, L));
    vec4 texel = texture(textureSampler, vTexCoord);
    fragColor = vec4(texel.rgb * (ambientColor + lambertian * diffuseColor), texel.a);
}
"#;

pub fn sources(variant: SurfaceVariant) -> ShaderSources<'static> {
    match variant {
        SurfaceVariant::Shaded => ShaderSources {
            vertex: SHADED_VERTEX,
            fragment: SHADED_FRAGMENT,
        },
        SurfaceVariant::Textured => ShaderSources {
            vertex: TEXTURED_VERTEX,
            fragment: TEXTURED_FRAGMENT,
        },
    }
}
