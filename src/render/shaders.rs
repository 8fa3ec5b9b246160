/// Vertex shader for the foliage point cloud.
///
/// Blends each point between its chaos and target position with the same
/// two-piece cubic ease as `animation::cubic_in_out`, then layers a wind
/// offset that fades out entirely in the chaos state.
pub const FOLIAGE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_chaos_pos;
layout(location = 1) in vec3 a_target_pos;
layout(location = 2) in float a_random;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_time;
uniform float u_progress;

out float v_random;

void main() {
    v_random = a_random;

    float t = u_progress;
    float eased = t < 0.5 ? 4.0 * t * t * t : (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0;

    vec3 pos = mix(a_chaos_pos, a_target_pos, eased);

    // Wind; amplitude scales with the eased progress so chaos is untouched
    pos.x += sin(u_time * 2.0 + pos.y) * 0.1 * eased;
    pos.z += cos(u_time * 1.5 + pos.y) * 0.1 * eased;

    vec4 mv_position = u_view * u_model * vec4(pos, 1.0);

    gl_PointSize = (50.0 * a_random + 30.0) / -mv_position.z;
    gl_Position = u_projection * mv_position;
}
"#;

/// Fragment shader for the foliage points: needle gradient plus gold glints
pub const FOLIAGE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform float u_time;
uniform vec3 u_color_low;
uniform vec3 u_color_high;
uniform vec3 u_color_sparkle;

in float v_random;

out vec4 fragColor;

void main() {
    vec2 center = gl_PointCoord - 0.5;
    if (length(center) > 0.5) {
        discard;
    }

    // Bias toward the dark green for depth; tips carry the bright emerald
    vec3 color = mix(u_color_low, u_color_high, v_random * 0.8 + 0.2);

    float sparkle = sin(u_time * 3.0 + v_random * 20.0);
    if (sparkle > 0.96) {
        color = mix(color, u_color_sparkle, 0.9);
    }

    fragColor = vec4(color, 1.0);
}
"#;

/// Shared vertex shader for instanced meshes (ornaments, dust, star).
/// The per-instance transform rides in four attribute slots.
pub const INSTANCE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;
layout(location = 3) in mat4 a_transform;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_position;
out vec3 v_normal;
out vec3 v_color;

void main() {
    vec4 world_pos = u_model * a_transform * vec4(a_position, 1.0);

    v_world_position = world_pos.xyz;
    v_normal = mat3(u_model) * mat3(a_transform) * a_normal;
    v_color = a_color;

    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Fragment shader for the lit ornament categories (boxes, balls, gems)
pub const LIT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;
in vec3 v_color;

uniform vec3 u_camera_pos;
uniform vec3 u_key_dir;
uniform vec3 u_key_color;
uniform vec3 u_fill_pos;
uniform vec3 u_fill_color;
uniform vec3 u_ambient_color;

out vec4 fragColor;

void main() {
    vec3 normal = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_position);

    // Warm key light
    float key = max(dot(normal, u_key_dir), 0.0);
    vec3 diffuse = v_color * u_key_color * key;

    // Green fill falls off with distance
    vec3 to_fill = u_fill_pos - v_world_position;
    float fill_atten = 1.0 / (1.0 + 0.02 * dot(to_fill, to_fill));
    float fill = max(dot(normal, normalize(to_fill)), 0.0);
    diffuse += v_color * u_fill_color * fill * fill_atten;

    // Metallic glint from the key light
    vec3 half_dir = normalize(u_key_dir + view_dir);
    float spec = pow(max(dot(normal, half_dir), 0.0), 32.0);
    vec3 specular = u_key_color * spec * 0.6;

    float rim = pow(1.0 - max(dot(normal, view_dir), 0.0), 3.0);
    vec3 rim_light = u_key_color * rim * 0.2;

    vec3 color = u_ambient_color * v_color + diffuse + specular + rim_light;
    fragColor = vec4(color, 1.0);
}
"#;

/// Fragment shader for self-lit instances (light bulbs, dust, star).
/// Output deliberately exceeds 1.0 so the bloom pass picks it up.
pub const EMISSIVE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;
in vec3 v_color;

uniform float u_intensity;

out vec4 fragColor;

void main() {
    fragColor = vec4(v_color * u_intensity, 1.0);
}
"#;

/// Fullscreen-triangle vertex shader for the post passes
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

out vec2 v_uv;

void main() {
    float x = float((gl_VertexID & 1) << 2);
    float y = float((gl_VertexID & 2) << 1);
    v_uv = vec2(x * 0.5, y * 0.5);
    gl_Position = vec4(x - 1.0, y - 1.0, 0.0, 1.0);
}
"#;

/// Bloom extraction with a soft knee around the threshold
pub const BLOOM_EXTRACT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform float u_threshold;

out vec4 fragColor;

void main() {
    vec3 color = texture(u_texture, v_uv).rgb;
    float brightness = dot(color, vec3(0.2126, 0.7152, 0.0722));

    float knee = smoothstep(u_threshold - 0.1, u_threshold + 0.1, brightness);
    fragColor = vec4(color * knee, 1.0);
}
"#;

/// Separable Gaussian blur, run once per axis at half resolution
pub const BLUR_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform vec2 u_direction;

out vec4 fragColor;

void main() {
    vec2 texel = 1.0 / vec2(textureSize(u_texture, 0));

    float weights[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);

    vec3 result = texture(u_texture, v_uv).rgb * weights[0];

    for (int i = 1; i < 5; i++) {
        vec2 offset = u_direction * texel * float(i) * 2.0;
        result += texture(u_texture, v_uv + offset).rgb * weights[i];
        result += texture(u_texture, v_uv - offset).rgb * weights[i];
    }

    fragColor = vec4(result, 1.0);
}
"#;

/// Final composite: bloom add, exposure, Reinhard tone map, gamma, vignette
pub const COMPOSITE_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_scene;
uniform sampler2D u_bloom;
uniform float u_bloom_strength;
uniform float u_vignette_strength;
uniform float u_exposure;

out vec4 fragColor;

void main() {
    vec3 scene = texture(u_scene, v_uv).rgb;
    vec3 bloom = texture(u_bloom, v_uv).rgb;

    vec3 color = (scene + bloom * u_bloom_strength) * u_exposure;

    // Tone map, then gamma
    color = color / (color + vec3(1.0));
    color = pow(color, vec3(1.0 / 2.2));

    vec2 uv = v_uv - 0.5;
    float vignette = 1.0 - dot(uv, uv) * u_vignette_strength;
    color *= vignette;

    fragColor = vec4(color, 1.0);
}
"#;
