//! WGSL pixel shaders for the shader workers.
//!
//! Every shader is a fragment entry point reading input 0 at binding 0/1.
//! Constant buffers bind at group 1, resource textures after the input.

use std::fmt;

/// 128-bit shader identifier, displayed GUID-style.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub u128);

impl fmt::Display for ShaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        write!(
            f,
            "{:08X}-{:04X}-{:04X}-{:04X}-{:012X}",
            (v >> 96) as u32,
            (v >> 80) as u16,
            (v >> 64) as u16,
            (v >> 48) as u16,
            v & 0xFFFF_FFFF_FFFF
        )
    }
}

impl fmt::Debug for ShaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShaderId({self})")
    }
}

/// Immutable shader code with its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderCode {
    /// Id the host registers the shader under.
    pub id: ShaderId,
    /// Name used in logs and errors.
    pub name: &'static str,
    /// Fragment entry point.
    pub entry_point: &'static str,
    /// WGSL source.
    pub source: &'static str,
}

impl ShaderCode {
    /// Source bytes as handed to the host.
    pub fn bytes(&self) -> &'static [u8] {
        self.source.as_bytes()
    }
}

/// Rec.709 grayscale, opaque output.
pub const GRAYSCALE: ShaderCode = ShaderCode {
    id: ShaderId(0x3C0B_6E51_92A4_4F0D_8E61_2D7F_A4C3_1B58),
    name: "grayscale",
    entry_point: "fs_main",
    source: r#"
@group(0) @binding(0) var input_tex: texture_2d<f32>;
@group(0) @binding(1) var input_smp: sampler;

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    let c = textureSample(input_tex, input_smp, uv);
    let y = dot(c.rgb, vec3<f32>(0.2126, 0.7152, 0.0722));
    return vec4<f32>(y, y, y, 1.0);
}
"#,
};

/// Split toning from a 256x2 lookup texture.
///
/// Row 0 holds shadows deltas, row 1 highlights deltas, each biased by 128.
pub const SPLIT_TONE: ShaderCode = ShaderCode {
    id: ShaderId(0x5982_0389_BBD5_40E8_9AF2_309B_B294_B396),
    name: "split_tone",
    entry_point: "fs_main",
    source: r#"
@group(0) @binding(0) var input_tex: texture_2d<f32>;
@group(0) @binding(1) var input_smp: sampler;
@group(0) @binding(2) var lookup_tex: texture_2d<f32>;

fn delta(channel: f32, row: i32) -> vec3<f32> {
    let x = i32(round(clamp(channel, 0.0, 1.0) * 255.0));
    let t = textureLoad(lookup_tex, vec2<i32>(x, row), 0);
    return round(t.rgb * 255.0) - vec3<f32>(128.0);
}

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    let c = textureSample(input_tex, input_smp, uv);
    let r = delta(c.r, 0).r + delta(c.r, 1).r;
    let g = delta(c.g, 0).g + delta(c.g, 1).g;
    let b = delta(c.b, 0).b + delta(c.b, 1).b;
    let out = clamp(round(c.rgb * 255.0) + vec3<f32>(r, g, b), vec3<f32>(0.0), vec3<f32>(255.0));
    return vec4<f32>(out / 255.0, c.a);
}
"#,
};

/// Smooth circular magnifier.
pub const MAGNIFY_SMOOTH: ShaderCode = ShaderCode {
    id: ShaderId(0x7438_B2C0_A722_4D47_BBF3_4404_0D5C_11A9),
    name: "magnify_smooth",
    entry_point: "fs_main",
    source: r#"
struct Magnify {
    inner_radius: f32,
    outer_radius: f32,
    magnification_amount: f32,
    horizontal_position: f32,
    vertical_position: f32,
    aspect_ratio: f32,
    _pad: vec2<f32>,
}

@group(0) @binding(0) var input_tex: texture_2d<f32>;
@group(0) @binding(1) var input_smp: sampler;
@group(1) @binding(0) var<uniform> params: Magnify;

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    let center = vec2<f32>(params.horizontal_position, params.vertical_position);
    let to_pixel = uv - center;
    let dist = length(to_pixel / vec2<f32>(1.0, params.aspect_ratio));
    let outer = max(params.inner_radius, params.outer_radius);
    let ratio = smoothstep(params.inner_radius, outer, dist);
    let magnified = center + to_pixel / params.magnification_amount;
    return textureSample(input_tex, input_smp, mix(magnified, uv, ratio));
}
"#,
};

/// Saturation around Rec.709 luma; level 0 is grayscale, 1 the input.
pub const SATURATION: ShaderCode = ShaderCode {
    id: ShaderId(0xA1D4_07E2_6C3B_4B95_9F20_58E1_C6A7_0D34),
    name: "saturation",
    entry_point: "fs_main",
    source: r#"
struct Saturation {
    level: f32,
    _pad: vec3<f32>,
}

@group(0) @binding(0) var input_tex: texture_2d<f32>;
@group(0) @binding(1) var input_smp: sampler;
@group(1) @binding(0) var<uniform> params: Saturation;

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    let c = textureSample(input_tex, input_smp, uv);
    let y = dot(c.rgb, vec3<f32>(0.2126, 0.7152, 0.0722));
    return vec4<f32>(mix(vec3<f32>(y), c.rgb, params.level), c.a);
}
"#,
};

/// Every shader, for tooling.
pub const ALL: [&ShaderCode; 4] = [&GRAYSCALE, &SPLIT_TONE, &MAGNIFY_SMOOTH, &SATURATION];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(
            MAGNIFY_SMOOTH.id.to_string(),
            "7438B2C0-A722-4D47-BBF3-44040D5C11A9"
        );
    }

    #[test]
    fn test_ids_unique() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.id, b.id, "{} vs {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn test_entry_points_present() {
        for shader in ALL {
            assert!(shader.source.contains(&format!("fn {}(", shader.entry_point)));
            assert!(!shader.bytes().is_empty());
        }
    }
}
