//! GPU-free description of one frame.
//!
//! [`plan_frame`] turns the scene script, the camera pose and the viewer
//! toggles into a [`FramePlan`]: every draw of the off-screen pass in
//! submission order, followed by the single composite draw. The composer
//! uploads what the plan asks for and replays it; tests inspect it directly.

use glam::{Mat4, Vec3};

use crate::body::{BodyDescriptor, BodyKind, body_transforms, normal_matrix, ring_transform};
use crate::flags::{EffectFlags, ModeState, ShadingFlags};
use crate::text::VERTICES_PER_GLYPH;

/// Per-frame values the plan is computed from.
#[derive(Debug, Clone)]
pub struct FrameInputs {
    /// Scaled seconds since start.
    pub time: f32,
    pub camera_pose: Mat4,
    pub modes: ModeState,
    pub star_count: u32,
    /// Reciprocal off-screen size.
    pub texel_size: [f32; 2],
    pub sky_scale: f32,
    /// Overlay text, when the overlay is enabled.
    pub overlay: Option<String>,
}

/// Texture names bound for one body draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureBinding {
    /// Bound at unit 0.
    pub diffuse: &'static str,
    /// Bound at unit 1, only when the draw carries NORMAL_MAP.
    pub normal: Option<&'static str>,
}

impl TextureBinding {
    /// Number of texture units in use.
    pub fn count(&self) -> usize {
        1 + usize::from(self.normal.is_some())
    }
}

/// One indexed sphere draw.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDraw {
    /// Position in the scene script.
    pub body: usize,
    pub name: &'static str,
    pub model: Mat4,
    pub normal_matrix: Mat4,
    pub flags: ShadingFlags,
    pub tint: [f32; 3],
    pub textures: TextureBinding,
    /// Faces discarded by the rasterizer. The sky is seen from inside.
    pub cull: wgpu::Face,
}

/// One orbit ring draw.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitDraw {
    pub body: usize,
    pub transform: Mat4,
}

/// The text overlay draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub text: String,
    pub vertex_count: u32,
}

/// Draws into the off-screen target, in order: stars, bodies, orbits, text.
#[derive(Debug, Clone, PartialEq)]
pub struct OffscreenPass {
    pub view: Mat4,
    pub star_count: u32,
    pub light_position: Vec3,
    pub bodies: Vec<BodyDraw>,
    pub orbits: Vec<OrbitDraw>,
    pub text: Option<TextDraw>,
}

/// The full-screen quad drawn to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositePass {
    pub effects: EffectFlags,
    pub texel_size: [f32; 2],
    pub vertex_count: u32,
}

/// Everything one frame draws.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub offscreen: OffscreenPass,
    pub composite: CompositePass,
}

/// Shading flags a body is drawn with under the current modes.
///
/// Cel shading applies to everything but the sky. Normal mapping applies to
/// bodies that have a normal map.
pub fn draw_flags(body: &BodyDescriptor, modes: &ModeState) -> ShadingFlags {
    let mut flags = body.base_flags;
    if modes.cel && body.kind != BodyKind::Sky {
        flags |= ShadingFlags::CEL;
    }
    if modes.normal_map && body.normal_map.is_some() {
        flags |= ShadingFlags::NORMAL_MAP;
    }
    flags
}

/// Build the plan for one frame.
pub fn plan_frame(scene: &[BodyDescriptor], inputs: &FrameInputs) -> FramePlan {
    let view = inputs.camera_pose.inverse();
    let camera_position = inputs.camera_pose.w_axis.truncate();
    let transforms = body_transforms(scene, inputs.time, camera_position, inputs.sky_scale);

    let bodies = scene
        .iter()
        .zip(&transforms)
        .enumerate()
        .map(|(index, (body, &model))| {
            let flags = draw_flags(body, &inputs.modes);
            let normal = if flags.contains(ShadingFlags::NORMAL_MAP) {
                body.normal_map
            } else {
                None
            };
            BodyDraw {
                body: index,
                name: body.name,
                model,
                normal_matrix: normal_matrix(view, model),
                flags,
                tint: body.tint,
                textures: TextureBinding {
                    diffuse: body.texture,
                    normal,
                },
                cull: match body.kind {
                    BodyKind::Sky => wgpu::Face::Front,
                    _ => wgpu::Face::Back,
                },
            }
        })
        .collect();

    let orbits = scene
        .iter()
        .enumerate()
        .filter(|(_, body)| body.ring)
        .map(|(index, body)| OrbitDraw {
            body: index,
            transform: ring_transform(body, &transforms),
        })
        .collect();

    let text = inputs.overlay.as_ref().map(|text| TextDraw {
        vertex_count: text.chars().filter(|c| *c != '\n').count() as u32 * VERTICES_PER_GLYPH,
        text: text.clone(),
    });

    FramePlan {
        offscreen: OffscreenPass {
            view,
            star_count: inputs.star_count,
            light_position: Vec3::ZERO,
            bodies,
            orbits,
            text,
        },
        composite: CompositePass {
            effects: inputs.modes.effects,
            texel_size: inputs.texel_size,
            vertex_count: 6,
        },
    }
}
