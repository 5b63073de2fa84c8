//! Shader programs and their render pipelines.
//!
//! Each program declares the resource names it binds as a
//! [`ProgramContract`]. Loading resolves those names against the WGSL source
//! into a uniform table, and the bind group indices used at draw time are
//! read back from that table rather than assumed.

use bytemuck::{Pod, Zeroable};
use orrery_render::{
    BindingSlot, ColorVertex, DepthBuffer, GlyphVertex, PositionVertex, ProgramContract,
    ShaderLibrary, SphereVertex, UniformTable,
};

use crate::error::SceneError;
use crate::plan::{BodyDraw, CompositePass};

pub const PLANET_PROGRAM: ProgramContract = ProgramContract {
    name: "planet",
    required: &[
        "camera",
        "body",
        "light",
        "diffuse_map",
        "diffuse_sampler",
        "normal_map",
        "normal_sampler",
    ],
};

pub const STARFIELD_PROGRAM: ProgramContract = ProgramContract {
    name: "starfield",
    required: &["camera"],
};

pub const ORBIT_PROGRAM: ProgramContract = ProgramContract {
    name: "orbit",
    required: &["camera", "ring"],
};

pub const SCREEN_PROGRAM: ProgramContract = ProgramContract {
    name: "screen",
    required: &["scene_color", "scene_sampler", "post"],
};

pub const FONT_PROGRAM: ProgramContract = ProgramContract {
    name: "font",
    required: &["glyph_atlas", "glyph_sampler"],
};

/// Per-body uniform block.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// Tint in rgb, tint strength in a.
    pub color: [f32; 4],
    pub flags: u32,
    pub _pad: [u32; 3],
}

impl BodyUniform {
    pub fn new(draw: &BodyDraw, tint_strength: f32) -> Self {
        let [r, g, b] = draw.tint;
        Self {
            model: draw.model.to_cols_array_2d(),
            normal_matrix: draw.normal_matrix.to_cols_array_2d(),
            color: [r, g, b, tint_strength],
            flags: draw.flags.bits(),
            _pad: [0; 3],
        }
    }
}

/// Per-ring uniform block.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct RingUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Point light position, w unused.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
}

/// Composite pass parameters.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PostUniform {
    pub effects: u32,
    pub _pad: u32,
    pub texel_size: [f32; 2],
}

impl PostUniform {
    pub fn new(pass: &CompositePass) -> Self {
        Self {
            effects: pass.effects.bits(),
            _pad: 0,
            texel_size: pass.texel_size,
        }
    }
}

/// Lit, textured spheres. Lighting happens in view space.
pub const PLANET_SHADER_SOURCE: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

struct Body {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    color: vec4<f32>,
    flags: u32,
};

struct Light {
    position: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var<uniform> body: Body;
@group(2) @binding(0) var diffuse_map: texture_2d<f32>;
@group(2) @binding(1) var diffuse_sampler: sampler;
@group(2) @binding(2) var normal_map: texture_2d<f32>;
@group(2) @binding(3) var normal_sampler: sampler;
@group(3) @binding(0) var<uniform> light: Light;

const SHADE: u32 = 1u;
const CEL: u32 = 2u;
const NORMAL_MAP: u32 = 4u;

const AMBIENT: f32 = 0.1;
const SHININESS: f32 = 32.0;
const SPECULAR_STRENGTH: f32 = 0.4;
const CEL_BANDS: f32 = 4.0;
const OUTLINE_THRESHOLD: f32 = 0.25;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) tangent: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) tangent: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let model_view = camera.view * body.model;
    let view_position = model_view * vec4<f32>(in.position, 1.0);

    var out: VertexOutput;
    out.clip_position = camera.projection * view_position;
    out.view_position = view_position.xyz;
    out.normal = (body.normal_matrix * vec4<f32>(in.normal, 0.0)).xyz;
    out.tangent = (model_view * vec4<f32>(in.tangent, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(diffuse_map, diffuse_sampler, in.uv).rgb;
    let bump = textureSample(normal_map, normal_sampler, in.uv).xyz * 2.0 - 1.0;
    let base = mix(texel, texel * body.color.rgb, body.color.a);

    var n = normalize(in.normal);
    if (body.flags & NORMAL_MAP) != 0u {
        let t = normalize(in.tangent - n * dot(in.tangent, n));
        let b = cross(n, t);
        n = normalize(mat3x3<f32>(t, b, n) * bump);
    }

    let light_position = (camera.view * vec4<f32>(light.position.xyz, 1.0)).xyz;
    let l = normalize(light_position - in.view_position);
    let v = normalize(-in.view_position);

    var color = base;
    if (body.flags & SHADE) != 0u {
        var diffuse = max(dot(n, l), 0.0);
        var specular = pow(max(dot(n, normalize(l + v)), 0.0), SHININESS);
        if (body.flags & CEL) != 0u {
            diffuse = floor(diffuse * CEL_BANDS) / CEL_BANDS;
            specular = step(0.5, specular);
        }
        color = base * (AMBIENT + diffuse) + vec3<f32>(specular * SPECULAR_STRENGTH);
    }

    if (body.flags & CEL) != 0u && dot(n, v) < OUTLINE_THRESHOLD {
        color = body.color.rgb;
    }

    return vec4<f32>(clamp(color, vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
}
"#;

/// Colored points, one vertex stream each for position and color.
pub const STARFIELD_SHADER_SOURCE: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.projection * camera.view * vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

/// Unit circle line strips scaled per ring.
pub const ORBIT_SHADER_SOURCE: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

struct Ring {
    model: mat4x4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var<uniform> ring: Ring;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return camera.projection * camera.view * ring.model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return ring.color;
}
"#;

/// Full-screen composite with flips, then blur, then greyscale.
pub const SCREEN_SHADER_SOURCE: &str = r#"
struct Post {
    effects: u32,
    _pad: u32,
    texel_size: vec2<f32>,
};

@group(0) @binding(0) var scene_color: texture_2d<f32>;
@group(0) @binding(1) var scene_sampler: sampler;
@group(0) @binding(2) var<uniform> post: Post;

const FLIP_X: u32 = 1u;
const FLIP_Y: u32 = 2u;
const GREYSCALE: u32 = 4u;
const BLUR: u32 = 8u;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
    );
    let corner = corners[idx];

    var out: VertexOutput;
    out.position = vec4<f32>(corner, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x * 0.5 + 0.5, 0.5 - corner.y * 0.5);
    return out;
}

fn blur3x3(uv: vec2<f32>) -> vec3<f32> {
    var sum = vec3<f32>(0.0);
    for (var y = -1; y <= 1; y++) {
        for (var x = -1; x <= 1; x++) {
            let weight = f32((2 - abs(x)) * (2 - abs(y))) / 16.0;
            let offset = vec2<f32>(f32(x), f32(y)) * post.texel_size;
            sum += textureSampleLevel(scene_color, scene_sampler, uv + offset, 0.0).rgb * weight;
        }
    }
    return sum;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var uv = in.uv;
    if (post.effects & FLIP_X) != 0u {
        uv.x = 1.0 - uv.x;
    }
    if (post.effects & FLIP_Y) != 0u {
        uv.y = 1.0 - uv.y;
    }

    var color = textureSampleLevel(scene_color, scene_sampler, uv, 0.0).rgb;
    if (post.effects & BLUR) != 0u {
        color = blur3x3(uv);
    }
    if (post.effects & GREYSCALE) != 0u {
        color = vec3<f32>(dot(color, vec3<f32>(0.2126, 0.7152, 0.0722)));
    }
    return vec4<f32>(color, 1.0);
}
"#;

/// Alpha-blended glyph quads in NDC.
pub const FONT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var glyph_atlas: texture_2d<f32>;
@group(0) @binding(1) var glyph_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(position, 0.0, 1.0);
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(glyph_atlas, glyph_sampler, in.uv);
}
"#;

/// Bind group indices of the planet program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanetGroups {
    pub camera: u32,
    pub body: u32,
    pub material: u32,
    pub light: u32,
}

/// Bind group indices of the orbit program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbitGroups {
    pub camera: u32,
    pub ring: u32,
}

/// Bind group layouts the programs are built against.
pub struct SharedLayouts<'a> {
    pub camera: &'a wgpu::BindGroupLayout,
    pub body: &'a wgpu::BindGroupLayout,
    pub light: &'a wgpu::BindGroupLayout,
    pub ring: &'a wgpu::BindGroupLayout,
    pub material: &'a wgpu::BindGroupLayout,
    pub screen: &'a wgpu::BindGroupLayout,
    pub glyph: &'a wgpu::BindGroupLayout,
}

/// Color formats the pipelines render into.
#[derive(Debug, Clone, Copy)]
pub struct TargetFormats {
    pub offscreen: wgpu::TextureFormat,
    pub surface: wgpu::TextureFormat,
}

/// Every pipeline the composer draws with.
pub struct ProgramSet {
    pub planet: wgpu::RenderPipeline,
    pub sky: wgpu::RenderPipeline,
    pub planet_groups: PlanetGroups,
    pub starfield: wgpu::RenderPipeline,
    pub starfield_camera_group: u32,
    pub orbit: wgpu::RenderPipeline,
    pub orbit_groups: OrbitGroups,
    pub screen: wgpu::RenderPipeline,
    pub screen_group: u32,
    /// Only built when the text overlay is enabled.
    pub font: Option<wgpu::RenderPipeline>,
    pub font_group: u32,
}

impl ProgramSet {
    pub fn new(
        device: &wgpu::Device,
        library: &mut ShaderLibrary,
        layouts: &SharedLayouts<'_>,
        formats: TargetFormats,
        with_font: bool,
    ) -> Result<Self, SceneError> {
        let planet = library.load_program(device, &PLANET_PROGRAM, PLANET_SHADER_SOURCE)?;
        let planet_groups = planet_groups(&planet.bindings)?;
        let planet_layout = pipeline_layout(
            device,
            "planet",
            &planet.bindings.order_by_group(
                PLANET_PROGRAM.name,
                &[
                    ("camera", layouts.camera),
                    ("body", layouts.body),
                    ("diffuse_map", layouts.material),
                    ("light", layouts.light),
                ],
            )?,
        );
        let sphere = [SphereVertex::layout()];
        let lit = |label: &str, cull: wgpu::Face| {
            mesh_pipeline(
                device,
                MeshPipeline {
                    label,
                    module: &planet.module,
                    layout: &planet_layout,
                    buffers: &sphere,
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(cull),
                    format: formats.offscreen,
                    blend: None,
                    depth: Some(DepthBuffer::stencil_state(true)),
                },
            )
        };
        let planet_pipeline = lit("planet-pipeline", wgpu::Face::Back);
        let sky_pipeline = lit("sky-pipeline", wgpu::Face::Front);

        let starfield =
            library.load_program(device, &STARFIELD_PROGRAM, STARFIELD_SHADER_SOURCE)?;
        let starfield_camera_group = starfield
            .bindings
            .group_of(STARFIELD_PROGRAM.name, "camera")?;
        let starfield_layout = pipeline_layout(
            device,
            "starfield",
            &starfield
                .bindings
                .order_by_group(STARFIELD_PROGRAM.name, &[("camera", layouts.camera)])?,
        );
        let starfield_pipeline = mesh_pipeline(
            device,
            MeshPipeline {
                label: "starfield-pipeline",
                module: &starfield.module,
                layout: &starfield_layout,
                buffers: &[PositionVertex::layout(), ColorVertex::layout()],
                topology: wgpu::PrimitiveTopology::PointList,
                cull_mode: None,
                format: formats.offscreen,
                blend: None,
                depth: Some(DepthBuffer::stencil_state(true)),
            },
        );

        let orbit = library.load_program(device, &ORBIT_PROGRAM, ORBIT_SHADER_SOURCE)?;
        let orbit_groups = OrbitGroups {
            camera: orbit.bindings.group_of(ORBIT_PROGRAM.name, "camera")?,
            ring: orbit.bindings.group_of(ORBIT_PROGRAM.name, "ring")?,
        };
        let orbit_layout = pipeline_layout(
            device,
            "orbit",
            &orbit.bindings.order_by_group(
                ORBIT_PROGRAM.name,
                &[("camera", layouts.camera), ("ring", layouts.ring)],
            )?,
        );
        let orbit_pipeline = mesh_pipeline(
            device,
            MeshPipeline {
                label: "orbit-pipeline",
                module: &orbit.module,
                layout: &orbit_layout,
                buffers: &[PositionVertex::layout()],
                topology: wgpu::PrimitiveTopology::LineStrip,
                cull_mode: None,
                format: formats.offscreen,
                blend: None,
                depth: Some(DepthBuffer::stencil_state(true)),
            },
        );

        let screen = library.load_program(device, &SCREEN_PROGRAM, SCREEN_SHADER_SOURCE)?;
        let screen_group = texture_group(
            &screen.bindings,
            SCREEN_PROGRAM.name,
            "scene_color",
            "scene_sampler",
        )?;
        screen.bindings.require_slot(
            SCREEN_PROGRAM.name,
            "post",
            BindingSlot {
                group: screen_group,
                binding: 2,
            },
        )?;
        let screen_layout = pipeline_layout(
            device,
            "screen",
            &screen
                .bindings
                .order_by_group(SCREEN_PROGRAM.name, &[("scene_color", layouts.screen)])?,
        );
        let screen_pipeline = mesh_pipeline(
            device,
            MeshPipeline {
                label: "screen-pipeline",
                module: &screen.module,
                layout: &screen_layout,
                buffers: &[],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                format: formats.surface,
                blend: None,
                depth: None,
            },
        );

        let (font, font_group) = if with_font {
            let font = library.load_program(device, &FONT_PROGRAM, FONT_SHADER_SOURCE)?;
            let font_group = texture_group(
                &font.bindings,
                FONT_PROGRAM.name,
                "glyph_atlas",
                "glyph_sampler",
            )?;
            let font_layout = pipeline_layout(
                device,
                "font",
                &font
                    .bindings
                    .order_by_group(FONT_PROGRAM.name, &[("glyph_atlas", layouts.glyph)])?,
            );
            let pipeline = mesh_pipeline(
                device,
                MeshPipeline {
                    label: "font-pipeline",
                    module: &font.module,
                    layout: &font_layout,
                    buffers: &[GlyphVertex::layout()],
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    format: formats.offscreen,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    depth: Some(overlay_depth_state()),
                },
            );
            (Some(pipeline), font_group)
        } else {
            (None, 0)
        };

        log::info!(
            "Built {} pipelines for {} programs",
            if with_font { 6 } else { 5 },
            library.len()
        );

        Ok(Self {
            planet: planet_pipeline,
            sky: sky_pipeline,
            planet_groups,
            starfield: starfield_pipeline,
            starfield_camera_group,
            orbit: orbit_pipeline,
            orbit_groups,
            screen: screen_pipeline,
            screen_group,
            font,
            font_group,
        })
    }

    /// Sphere pipeline for a body draw's culling mode.
    pub fn sphere_pipeline(&self, cull: wgpu::Face) -> &wgpu::RenderPipeline {
        match cull {
            wgpu::Face::Front => &self.sky,
            wgpu::Face::Back => &self.planet,
        }
    }
}

/// Resolve the planet program's groups and check its material bindings sit
/// where the material layout puts them.
fn planet_groups(table: &UniformTable) -> Result<PlanetGroups, SceneError> {
    let program = PLANET_PROGRAM.name;
    let material = table.group_of(program, "diffuse_map")?;
    for (binding, name) in ["diffuse_map", "diffuse_sampler", "normal_map", "normal_sampler"]
        .into_iter()
        .enumerate()
    {
        table.require_slot(
            program,
            name,
            BindingSlot {
                group: material,
                binding: binding as u32,
            },
        )?;
    }
    Ok(PlanetGroups {
        camera: table.group_of(program, "camera")?,
        body: table.group_of(program, "body")?,
        material,
        light: table.group_of(program, "light")?,
    })
}

/// Group of a texture/sampler pair, checked to sit at bindings 0 and 1.
fn texture_group(
    table: &UniformTable,
    program: &str,
    texture: &str,
    sampler: &str,
) -> Result<u32, SceneError> {
    let group = table.group_of(program, texture)?;
    table.require_slot(program, texture, BindingSlot { group, binding: 0 })?;
    table.require_slot(program, sampler, BindingSlot { group, binding: 1 })?;
    Ok(group)
}

/// The overlay draws over everything without touching depth.
fn overlay_depth_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        depth_compare: wgpu::CompareFunction::Always,
        ..DepthBuffer::stencil_state(false)
    }
}

fn pipeline_layout(
    device: &wgpu::Device,
    name: &str,
    groups: &[&wgpu::BindGroupLayout],
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{name}-pipeline-layout")),
        bind_group_layouts: groups,
        immediate_size: 0,
    })
}

struct MeshPipeline<'a> {
    label: &'a str,
    module: &'a wgpu::ShaderModule,
    layout: &'a wgpu::PipelineLayout,
    buffers: &'a [wgpu::VertexBufferLayout<'static>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth: Option<wgpu::DepthStencilState>,
}

fn mesh_pipeline(device: &wgpu::Device, desc: MeshPipeline<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.module,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: desc.depth,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: desc.module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// Layout of a uniform block at binding 0.
pub fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[uniform_entry(0, size, visibility)],
    })
}

/// Layout of `pairs` texture/sampler pairs at consecutive bindings, plus an
/// optional fragment uniform block after them.
pub fn sampled_layout(
    device: &wgpu::Device,
    label: &str,
    pairs: u32,
    uniform_size: Option<u64>,
) -> wgpu::BindGroupLayout {
    let mut entries = Vec::with_capacity(pairs as usize * 2 + 1);
    for pair in 0..pairs {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: pair * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: pair * 2 + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }
    if let Some(size) = uniform_size {
        entries.push(uniform_entry(pairs * 2, size, wgpu::ShaderStages::FRAGMENT));
    }
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

fn uniform_entry(
    binding: u32,
    size: u64,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(size),
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAMS: [(&ProgramContract, &str); 5] = [
        (&PLANET_PROGRAM, PLANET_SHADER_SOURCE),
        (&STARFIELD_PROGRAM, STARFIELD_SHADER_SOURCE),
        (&ORBIT_PROGRAM, ORBIT_SHADER_SOURCE),
        (&SCREEN_PROGRAM, SCREEN_SHADER_SOURCE),
        (&FONT_PROGRAM, FONT_SHADER_SOURCE),
    ];

    #[test]
    fn test_every_program_resolves() {
        for (contract, source) in PROGRAMS {
            let table = UniformTable::resolve(contract, source).unwrap();
            assert_eq!(table.len(), contract.required.len(), "{}", contract.name);
        }
    }

    #[test]
    fn test_planet_groups() {
        let table = UniformTable::resolve(&PLANET_PROGRAM, PLANET_SHADER_SOURCE).unwrap();
        assert_eq!(
            planet_groups(&table).unwrap(),
            PlanetGroups {
                camera: 0,
                body: 1,
                material: 2,
                light: 3,
            }
        );
    }

    #[test]
    fn test_texture_groups() {
        let screen = UniformTable::resolve(&SCREEN_PROGRAM, SCREEN_SHADER_SOURCE).unwrap();
        assert_eq!(
            texture_group(&screen, "screen", "scene_color", "scene_sampler").unwrap(),
            0
        );
        let font = UniformTable::resolve(&FONT_PROGRAM, FONT_SHADER_SOURCE).unwrap();
        assert_eq!(
            texture_group(&font, "font", "glyph_atlas", "glyph_sampler").unwrap(),
            0
        );
        assert!(texture_group(&font, "font", "glyph_sampler", "glyph_atlas").is_err());
    }

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<BodyUniform>(), 160);
        assert_eq!(std::mem::size_of::<RingUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightUniform>(), 16);
        assert_eq!(std::mem::size_of::<PostUniform>(), 16);
    }

    #[test]
    fn test_post_uniform_from_composite() {
        let pass = CompositePass {
            effects: crate::flags::EffectFlags::FLIP_X | crate::flags::EffectFlags::BLUR,
            texel_size: [0.5, 0.25],
            vertex_count: 6,
        };
        let post = PostUniform::new(&pass);
        assert_eq!(post.effects, 9);
        assert_eq!(post.texel_size, [0.5, 0.25]);
    }
}
