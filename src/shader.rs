use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Line-list shader. Vertices arrive in simulation units and are mapped to
/// clip space using the simulation area size, with y pointing down.
pub const LINE_SHADER: &str = r#"
struct Uniforms {
    area: vec2<f32>,
    _padding: vec2<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    let ndc = vec2<f32>(
        position.x / uniforms.area.x * 2.0 - 1.0,
        1.0 - position.y / uniforms.area.y * 2.0,
    );
    return vec4<f32>(ndc, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return uniforms.color;
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
}

impl From<Vec2> for LineVertex {
    fn from(v: Vec2) -> Self {
        Self {
            position: v.to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub area: [f32; 2],
    pub _padding: [f32; 2],
    pub color: [f32; 4],
}

/// Flatten spring segments into a line list, two vertices per segment.
pub fn segment_vertices<I>(segments: I, out: &mut Vec<LineVertex>)
where
    I: IntoIterator<Item = (Vec2, Vec2)>,
{
    out.clear();
    for (a, b) in segments {
        out.push(a.into());
        out.push(b.into());
    }
}
