/// Instanced boxes and quads, tinted per instance with a two-tone
/// toon step on the face normal.
pub const SCENE_SHADER: &str = r#"
@group(0) @binding(0)
var<uniform> view_proj: mat4x4<f32>;

struct Instance {
    @location(2) m0: vec4<f32>,
    @location(3) m1: vec4<f32>,
    @location(4) m2: vec4<f32>,
    @location(5) m3: vec4<f32>,
    @location(6) tint: vec4<f32>,
};

struct Varyings {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) tint: vec4<f32>,
};

@vertex
fn vs_main(@location(0) corner: vec3<f32>, @location(1) normal: vec3<f32>, inst: Instance) -> Varyings {
    let model = mat4x4<f32>(inst.m0, inst.m1, inst.m2, inst.m3);
    var v: Varyings;
    v.clip = view_proj * model * vec4<f32>(corner, 1.0);
    v.normal = normalize((model * vec4<f32>(normal, 0.0)).xyz);
    v.tint = inst.tint;
    return v;
}

@fragment
fn fs_main(v: Varyings) -> @location(0) vec4<f32> {
    let key = normalize(vec3<f32>(0.4, 0.6, 1.0));
    let shade = select(0.85, 1.0, dot(v.normal, key) > 0.2);
    return vec4<f32>(v.tint.rgb * shade, v.tint.a);
}
"#;
