//! Owns every GPU resource of the scene and draws it once per frame.
//!
//! Construction follows a fixed order (camera channel, geometry, programs,
//! textures, off-screen target, camera, procedural geometry) and stops at the
//! first failure. Each frame is planned with [`plan_frame`], its uniforms are
//! written, and it is replayed into two scoped render passes: the off-screen
//! pass ends before the composite pass begins.

use glam::{Mat4, Vec3};
use orrery_render::{
    BufferAllocator, CameraUniform, ColorSpace, DynamicUniforms, FrameEncoder, GlyphVertex,
    IndexData, MeshBuffer, OffscreenTarget, PassTarget, PixelBuffer, RenderContext,
    RenderPassBuilder, SamplerMode, ShaderLibrary, StreamBuffer, SurfaceError, TextureTable,
    UniformChannel, aspect_ratio, reverse_z_perspective,
};

use crate::body::SOLAR_SYSTEM;
use crate::camera::CameraController;
use crate::error::SceneError;
use crate::flags::ModeState;
use crate::orbit::orbit_ring;
use crate::plan::{CompositePass, FrameInputs, FramePlan, OffscreenPass, plan_frame};
use crate::programs::{
    BodyUniform, LightUniform, PostUniform, ProgramSet, RingUniform, SharedLayouts,
    TargetFormats, sampled_layout, uniform_layout,
};
use crate::sphere::SphereMesh;
use crate::starfield::{STAR_COUNT, STAR_RADIUS, StarField};
use crate::text::{TextLayout, VERTICES_PER_GLYPH, layout_text};
use crate::textures::TextureSource;

/// Flat tangent-space normal bound when a draw has no normal map.
const DEFAULT_NORMAL: &str = "default_normal";

const SPHERE_STACKS: u32 = 32;
const SPHERE_SLICES: u32 = 64;

/// Longest overlay string drawn, in characters.
const MAX_GLYPHS: u32 = 256;

const RING_COLOR: [f32; 4] = [0.45, 0.45, 0.5, 1.0];

/// Scene parameters taken from configuration.
#[derive(Debug, Clone)]
pub struct SceneSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: wgpu::Color,
    pub start_distance: f32,
    pub dolly_step: f32,
    pub pitch_divisor: f32,
    pub star_seed: u64,
    pub orbit_segments: u32,
    pub sky_scale: f32,
    pub time_scale: f32,
    pub overlay_text: bool,
    pub font_atlas: String,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 400.0,
            clear_color: orrery_render::SPACE_BLACK,
            start_distance: 35.0,
            dolly_step: 0.1,
            pitch_divisor: 240.0,
            star_seed: 0,
            orbit_segments: crate::orbit::ORBIT_SEGMENTS,
            sky_scale: 150.0,
            time_scale: 1.0,
            overlay_text: false,
            font_atlas: "font".to_string(),
        }
    }
}

/// Texture bind groups for one body.
struct Material {
    /// Diffuse map with the flat default normal map.
    plain: wgpu::BindGroup,
    /// Diffuse map with the body's own normal map.
    mapped: Option<wgpu::BindGroup>,
}

/// Glyph vertices rewritten whenever the overlay text changes.
struct TextOverlay {
    vertices: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_count: u32,
    text: String,
}

impl TextOverlay {
    fn upload(&mut self, queue: &wgpu::Queue, text: &str) {
        if self.text == text {
            return;
        }
        let mut vertices = layout_text(text, TextLayout::default());
        vertices.truncate((MAX_GLYPHS * VERTICES_PER_GLYPH) as usize);
        queue.write_buffer(&self.vertices, 0, bytemuck::cast_slice(&vertices));
        self.vertex_count = vertices.len() as u32;
        self.text = text.to_string();
    }
}

/// The solar system renderer.
pub struct SceneComposer {
    settings: SceneSettings,
    camera_channel: UniformChannel,
    projection: Mat4,
    body_uniforms: DynamicUniforms<BodyUniform>,
    ring_uniforms: DynamicUniforms<RingUniform>,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    post_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    sphere: MeshBuffer,
    stars: StreamBuffer,
    ring: StreamBuffer,
    programs: ProgramSet,
    // Held so every texture outlives the bind groups that reference it.
    textures: TextureTable,
    materials: Vec<Material>,
    tint_strength: f32,
    text: Option<TextOverlay>,
    offscreen: OffscreenTarget,
    camera: CameraController,
    modes: ModeState,
    star_field: StarField,
}

impl SceneComposer {
    /// Build the scene for a render context. The off-screen target takes
    /// the surface's current size and keeps it.
    pub fn new(
        ctx: &RenderContext,
        settings: SceneSettings,
        source: &dyn TextureSource,
    ) -> Result<Self, SceneError> {
        Self::with_target(
            &ctx.device,
            &ctx.queue,
            ctx.surface_format,
            (ctx.surface_config.width, ctx.surface_config.height),
            settings,
            source,
        )
    }

    /// Build the scene against an explicit surface format and off-screen size.
    pub fn with_target(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        settings: SceneSettings,
        source: &dyn TextureSource,
    ) -> Result<Self, SceneError> {
        // Shared camera block.
        let camera_channel = UniformChannel::new(device);

        // Geometry.
        let allocator = BufferAllocator::new(device);
        let sphere_mesh = SphereMesh::uv_sphere(SPHERE_STACKS, SPHERE_SLICES);
        let sphere = allocator.create_mesh(
            "sphere",
            bytemuck::cast_slice(&sphere_mesh.vertices),
            IndexData::U32(&sphere_mesh.indices),
        );
        log::info!(
            "Created sphere mesh ({} vertices, {} indices)",
            sphere_mesh.vertices.len(),
            sphere_mesh.indices.len()
        );

        let body_uniforms = DynamicUniforms::<BodyUniform>::new(
            device,
            "body",
            SOLAR_SYSTEM.len() as u32,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let ring_count = SOLAR_SYSTEM.iter().filter(|b| b.ring).count() as u32;
        let ring_uniforms = DynamicUniforms::<RingUniform>::new(
            device,
            "ring",
            ring_count,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let light_size = std::mem::size_of::<LightUniform>() as u64;
        let light_layout =
            uniform_layout(device, "light-layout", light_size, wgpu::ShaderStages::FRAGMENT);
        let material_layout = sampled_layout(device, "material-layout", 2, None);
        let post_size = std::mem::size_of::<PostUniform>() as u64;
        let screen_layout = sampled_layout(device, "screen-layout", 1, Some(post_size));
        let glyph_layout = sampled_layout(device, "glyph-layout", 1, None);

        // Programs.
        let mut library = ShaderLibrary::new();
        let programs = ProgramSet::new(
            device,
            &mut library,
            &SharedLayouts {
                camera: camera_channel.layout(),
                body: body_uniforms.layout(),
                light: &light_layout,
                ring: ring_uniforms.layout(),
                material: &material_layout,
                screen: &screen_layout,
                glyph: &glyph_layout,
            },
            TargetFormats {
                offscreen: OffscreenTarget::COLOR_FORMAT,
                surface: surface_format,
            },
            settings.overlay_text,
        )?;

        // Textures.
        let textures = load_textures(device, queue, source, &settings)?;
        let materials = SOLAR_SYSTEM
            .iter()
            .map(|body| {
                let bind = |normal: &str| {
                    material_bind_group(device, &material_layout, &textures, body.texture, normal)
                };
                let plain = bind(DEFAULT_NORMAL)?;
                let mapped = body.normal_map.map(bind).transpose()?;
                Ok(Material { plain, mapped })
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        // Off-screen target.
        let offscreen = OffscreenTarget::new(device, width, height)?;

        let light_buffer = uniform_buffer(device, "light-uniform", light_size);
        let light_bind_group = uniform_bind_group(device, "light", &light_layout, &light_buffer);

        let post_buffer = uniform_buffer(device, "post-uniform", post_size);
        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("screen-bind-group"),
            layout: &screen_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&offscreen.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&offscreen.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: post_buffer.as_entire_binding(),
                },
            ],
        });

        let text = if settings.overlay_text {
            let atlas = textures.get(&settings.font_atlas)?;
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("glyph-bind-group"),
                layout: &glyph_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&atlas.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(
                            textures.sampler(atlas.sampler_mode),
                        ),
                    },
                ],
            });
            let capacity = u64::from(MAX_GLYPHS * VERTICES_PER_GLYPH)
                * std::mem::size_of::<GlyphVertex>() as u64;
            Some(TextOverlay {
                vertices: allocator.create_dynamic_vertex_buffer("glyph-vertices", capacity),
                bind_group,
                vertex_count: 0,
                text: String::new(),
            })
        } else {
            None
        };

        // Camera.
        let camera = CameraController::new(
            settings.start_distance,
            settings.dolly_step,
            settings.pitch_divisor,
        );
        let (target_width, target_height) = offscreen.size();
        let projection = reverse_z_perspective(
            settings.fov_y_degrees.to_radians(),
            aspect_ratio(target_width, target_height),
            settings.near,
            settings.far,
        );

        // Procedural geometry.
        let star_field = StarField::generate(settings.star_seed, STAR_COUNT, STAR_RADIUS);
        let stars = allocator.create_streams(
            "stars",
            &[
                bytemuck::cast_slice(&star_field.positions),
                bytemuck::cast_slice(&star_field.colors),
            ],
            star_field.len() as u32,
        );
        let ring_points = orbit_ring(settings.orbit_segments);
        let ring = allocator.create_streams(
            "orbit-ring",
            &[bytemuck::cast_slice(&ring_points)],
            ring_points.len() as u32,
        );
        log::info!(
            "Generated {} stars (seed {}) and a {}-segment orbit ring",
            star_field.len(),
            settings.star_seed,
            settings.orbit_segments
        );

        let tint_strength = if source.tints() { 1.0 } else { 0.0 };
        let mut composer = Self {
            settings,
            camera_channel,
            projection,
            body_uniforms,
            ring_uniforms,
            light_buffer,
            light_bind_group,
            post_buffer,
            screen_bind_group,
            sphere,
            stars,
            ring,
            programs,
            textures,
            materials,
            tint_strength,
            text,
            offscreen,
            camera,
            modes: ModeState::default(),
            star_field,
        };
        composer.upload_camera(queue);
        Ok(composer)
    }

    /// Plan, upload and draw one frame. `elapsed` is wall-clock seconds
    /// since start; the configured time scale is applied here.
    pub fn render(&mut self, ctx: &RenderContext, elapsed: f32) -> Result<(), SurfaceError> {
        let plan = self.plan(elapsed);
        self.upload(&ctx.queue, &plan);

        let surface_texture = ctx.get_current_texture()?;
        let mut frame = FrameEncoder::new(&ctx.device, surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .clear_color(self.settings.clear_color)
                .depth(&self.offscreen.depth)
                .label("offscreen-pass");
            let mut pass =
                frame.begin_render_pass(&builder, PassTarget::View(&self.offscreen.color_view));
            self.draw_offscreen(&mut pass, &plan.offscreen);
        }
        {
            let builder = RenderPassBuilder::new().label("composite-pass");
            let mut pass = frame.begin_render_pass(&builder, PassTarget::Surface);
            self.draw_composite(&mut pass, &plan.composite);
        }
        frame.submit(&ctx.queue);
        Ok(())
    }

    /// The plan for a frame at `elapsed` seconds.
    pub fn plan(&self, elapsed: f32) -> FramePlan {
        let overlay = self.text.as_ref().map(|_| self.modes.status_line());
        plan_frame(
            &SOLAR_SYSTEM,
            &FrameInputs {
                time: elapsed * self.settings.time_scale,
                camera_pose: self.camera.pose(),
                modes: self.modes,
                star_count: self.star_field.len() as u32,
                texel_size: self.offscreen.texel_size(),
                sky_scale: self.settings.sky_scale,
                overlay,
            },
        )
    }

    fn upload(&mut self, queue: &wgpu::Queue, plan: &FramePlan) {
        self.camera_channel
            .upload(queue, CameraUniform::new(plan.offscreen.view, self.projection));

        for (slot, draw) in plan.offscreen.bodies.iter().enumerate() {
            self.body_uniforms
                .write(queue, slot as u32, &BodyUniform::new(draw, self.tint_strength));
        }
        for (slot, orbit) in plan.offscreen.orbits.iter().enumerate() {
            let ring = RingUniform {
                model: orbit.transform.to_cols_array_2d(),
                color: RING_COLOR,
            };
            self.ring_uniforms.write(queue, slot as u32, &ring);
        }

        let light = LightUniform {
            position: plan.offscreen.light_position.extend(1.0).to_array(),
        };
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&light));
        queue.write_buffer(
            &self.post_buffer,
            0,
            bytemuck::bytes_of(&PostUniform::new(&plan.composite)),
        );

        if let (Some(overlay), Some(text)) = (self.text.as_mut(), plan.offscreen.text.as_ref()) {
            overlay.upload(queue, &text.text);
        }
    }

    fn draw_offscreen(&self, pass: &mut wgpu::RenderPass<'_>, plan: &OffscreenPass) {
        let programs = &self.programs;
        let camera = self.camera_channel.bind_group();

        pass.set_pipeline(&programs.starfield);
        pass.set_bind_group(programs.starfield_camera_group, camera, &[]);
        self.stars.bind(pass);
        pass.draw(0..plan.star_count, 0..1);

        let groups = programs.planet_groups;
        self.sphere.bind(pass);
        for (slot, draw) in plan.bodies.iter().enumerate() {
            let material = &self.materials[draw.body];
            let textures = match (&material.mapped, draw.textures.normal) {
                (Some(mapped), Some(_)) => mapped,
                _ => &material.plain,
            };
            pass.set_pipeline(programs.sphere_pipeline(draw.cull));
            pass.set_bind_group(groups.camera, camera, &[]);
            pass.set_bind_group(
                groups.body,
                self.body_uniforms.bind_group(),
                &[self.body_uniforms.offset(slot as u32)],
            );
            pass.set_bind_group(groups.material, textures, &[]);
            pass.set_bind_group(groups.light, &self.light_bind_group, &[]);
            self.sphere.draw(pass);
        }

        let groups = programs.orbit_groups;
        pass.set_pipeline(&programs.orbit);
        pass.set_bind_group(groups.camera, camera, &[]);
        self.ring.bind(pass);
        for slot in 0..plan.orbits.len() as u32 {
            pass.set_bind_group(
                groups.ring,
                self.ring_uniforms.bind_group(),
                &[self.ring_uniforms.offset(slot)],
            );
            self.ring.draw(pass);
        }

        if let (Some(pipeline), Some(overlay), Some(text)) =
            (&programs.font, &self.text, &plan.text)
        {
            let count = text.vertex_count.min(overlay.vertex_count);
            pass.set_pipeline(pipeline);
            pass.set_bind_group(programs.font_group, &overlay.bind_group, &[]);
            pass.set_vertex_buffer(0, overlay.vertices.slice(..));
            pass.draw(0..count, 0..1);
        }
    }

    fn draw_composite(&self, pass: &mut wgpu::RenderPass<'_>, plan: &CompositePass) {
        pass.set_pipeline(&self.programs.screen);
        pass.set_bind_group(self.programs.screen_group, &self.screen_bind_group, &[]);
        pass.draw(0..plan.vertex_count, 0..1);
    }

    fn upload_camera(&mut self, queue: &wgpu::Queue) {
        self.camera_channel
            .upload(queue, CameraUniform::new(self.camera.view(), self.projection));
    }

    /// Move the camera along its own Z axis and re-upload the view.
    pub fn dolly(&mut self, queue: &wgpu::Queue, delta: f32) {
        self.camera.dolly(delta);
        self.upload_camera(queue);
    }

    /// One configured dolly step forward.
    pub fn step_forward(&mut self, queue: &wgpu::Queue) {
        self.camera.step_forward();
        self.upload_camera(queue);
    }

    /// One configured dolly step backward.
    pub fn step_backward(&mut self, queue: &wgpu::Queue) {
        self.camera.step_backward();
        self.upload_camera(queue);
    }

    /// Pitch by a vertical mouse delta in pixels and re-upload the view.
    pub fn pitch(&mut self, queue: &wgpu::Queue, delta_pixels: f32) {
        self.camera.pitch(delta_pixels);
        self.upload_camera(queue);
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// The camera block as last uploaded.
    pub fn camera_uniform(&self) -> &CameraUniform {
        self.camera_channel.current()
    }

    pub fn modes(&self) -> &ModeState {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeState {
        &mut self.modes
    }

    pub fn star_field(&self) -> &StarField {
        &self.star_field
    }

    pub fn offscreen_size(&self) -> (u32, u32) {
        self.offscreen.size()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// World-space camera position.
    pub fn camera_position(&self) -> Vec3 {
        self.camera.translation()
    }
}

/// Upload every texture the scene needs.
///
/// Normal maps are required for every body that supports them; a missing one
/// is reported against the body.
fn load_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    source: &dyn TextureSource,
    settings: &SceneSettings,
) -> Result<TextureTable, SceneError> {
    let mut table = TextureTable::new(device);
    table.insert(
        device,
        queue,
        DEFAULT_NORMAL,
        &PixelBuffer::solid(1, 1, [128, 128, 255, 255]),
        ColorSpace::Linear,
        SamplerMode::Repeat,
    )?;

    for body in &SOLAR_SYSTEM {
        if !table.contains(body.texture) {
            let pixels = source.load(body.texture)?;
            table.insert(
                device,
                queue,
                body.texture,
                &pixels,
                ColorSpace::Srgb,
                SamplerMode::Repeat,
            )?;
        }
        if let Some(normal) = body.normal_map {
            let pixels = source.load(normal).map_err(|err| match err {
                SceneError::MissingTexture { .. } => SceneError::MissingNormalMap {
                    body: body.name,
                    texture: normal,
                },
                other => other,
            })?;
            table.insert(
                device,
                queue,
                normal,
                &pixels,
                ColorSpace::Linear,
                SamplerMode::Repeat,
            )?;
        }
    }

    if settings.overlay_text {
        let pixels = source.load(&settings.font_atlas)?;
        table.insert(
            device,
            queue,
            &settings.font_atlas,
            &pixels,
            ColorSpace::Srgb,
            SamplerMode::ClampToEdge,
        )?;
    }

    log::info!("Loaded {} textures", table.len());
    Ok(table)
}

fn material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    textures: &TextureTable,
    diffuse: &str,
    normal: &str,
) -> Result<wgpu::BindGroup, SceneError> {
    let diffuse_texture = textures.get(diffuse)?;
    let normal_texture = textures.get(normal)?;
    Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("material-{diffuse}-{normal}")),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&diffuse_texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(
                    textures.sampler(diffuse_texture.sampler_mode),
                ),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&normal_texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(
                    textures.sampler(normal_texture.sampler_mode),
                ),
            },
        ],
    }))
}

fn uniform_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn uniform_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label}-bind-group")),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::ProceduralSource;
    use orrery_render::OffscreenError;

    fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::LowPower,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    fn build(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: (u32, u32),
        settings: SceneSettings,
        source: &dyn TextureSource,
    ) -> Result<SceneComposer, SceneError> {
        SceneComposer::with_target(
            device,
            queue,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            size,
            settings,
            source,
        )
    }

    /// Serves placeholders but has no normal map for one body.
    struct WithoutNormal(&'static str);

    impl TextureSource for WithoutNormal {
        fn load(&self, name: &str) -> Result<PixelBuffer, SceneError> {
            if name == self.0 {
                return Err(SceneError::MissingTexture {
                    name: name.to_string(),
                    dir: "memory".into(),
                });
            }
            ProceduralSource::new("font").load(name)
        }

        fn tints(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_builds_with_procedural_textures() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let settings = SceneSettings {
            star_seed: 7,
            overlay_text: true,
            ..SceneSettings::default()
        };
        let composer =
            build(&device, &queue, (320, 240), settings, &ProceduralSource::new("font")).unwrap();

        assert_eq!(composer.offscreen_size(), (320, 240));
        assert_eq!(composer.star_field().len(), 400);
        // default normal + 12 diffuse + 5 normal maps + font
        assert_eq!(composer.texture_count(), 19);
        assert_eq!(composer.camera_position(), Vec3::new(0.0, 0.0, 35.0));
    }

    #[test]
    fn test_camera_mutation_uploads_view() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut composer = build(
            &device,
            &queue,
            (64, 64),
            SceneSettings::default(),
            &ProceduralSource::new("font"),
        )
        .unwrap();

        composer.step_forward(&queue);
        composer.pitch(&queue, 24.0);
        let uploaded = Mat4::from_cols_array_2d(&composer.camera_uniform().view);
        assert!((composer.camera().pose() * uploaded).abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_plan_reuses_star_field() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let composer = build(
            &device,
            &queue,
            (64, 64),
            SceneSettings::default(),
            &ProceduralSource::new("font"),
        )
        .unwrap();
        let before = composer.star_field().positions.clone();
        for frame in 0..3 {
            let plan = composer.plan(frame as f32 * 0.016);
            assert_eq!(plan.offscreen.star_count, 400);
            assert_eq!(plan.offscreen.bodies.len(), 12);
            assert_eq!(plan.offscreen.orbits.len(), 9);
        }
        assert_eq!(composer.star_field().positions, before);
    }

    #[test]
    fn test_missing_normal_map_fails() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let result = build(
            &device,
            &queue,
            (64, 64),
            SceneSettings::default(),
            &WithoutNormal("mars_normal"),
        );
        assert!(matches!(
            result,
            Err(SceneError::MissingNormalMap {
                body: "mars",
                texture: "mars_normal"
            })
        ));
    }

    #[test]
    fn test_zero_sized_target_fails() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let result = build(
            &device,
            &queue,
            (0, 480),
            SceneSettings::default(),
            &ProceduralSource::new("font"),
        );
        assert!(matches!(
            result,
            Err(SceneError::Offscreen(OffscreenError::ZeroExtent { .. }))
        ));
    }
}
