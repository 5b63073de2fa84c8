//! Uniform storage shared between programs.
//!
//! [`UniformChannel`] is the single camera block (view + projection) that every
//! 3D program binds at group 0. [`DynamicUniforms`] packs many per-draw
//! payloads into one buffer addressed by dynamic offsets, so all per-draw data
//! can be written before a render pass starts.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Camera matrices as laid out in the shared uniform block.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

/// The shared camera block: one buffer, one layout, one bind group.
pub struct UniformChannel {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    current: CameraUniform,
}

impl UniformChannel {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera-uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<CameraUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera-bind-group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            layout,
            bind_group,
            current: CameraUniform::default(),
        }
    }

    /// Write the block. Takes effect for every program bound to the channel.
    pub fn upload(&mut self, queue: &wgpu::Queue, camera: CameraUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&camera));
        self.current = camera;
    }

    /// The value most recently uploaded.
    pub fn current(&self) -> &CameraUniform {
        &self.current
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Round `size` up to the next multiple of `alignment`.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// Fixed number of `T` payloads packed at the device's dynamic-offset alignment.
pub struct DynamicUniforms<T: Pod> {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: u32,
    _payload: PhantomData<T>,
}

impl<T: Pod> DynamicUniforms<T> {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        capacity: u32,
        visibility: wgpu::ShaderStages,
    ) -> Self {
        let payload_size = std::mem::size_of::<T>() as u64;
        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride = aligned_stride(payload_size, alignment);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}-uniforms")),
            size: stride * u64::from(capacity.max(1)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label}-uniform-layout")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(payload_size),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-uniform-bind-group")),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(payload_size),
                }),
            }],
        });

        Self {
            buffer,
            layout,
            bind_group,
            stride,
            capacity,
            _payload: PhantomData,
        }
    }

    /// Write `payload` into `slot`. Slots past capacity are dropped with a warning.
    pub fn write(&self, queue: &wgpu::Queue, slot: u32, payload: &T) {
        if slot >= self.capacity {
            log::warn!(
                "Uniform slot {slot} exceeds capacity {}, payload dropped",
                self.capacity
            );
            return;
        }
        queue.write_buffer(
            &self.buffer,
            u64::from(slot) * self.stride,
            bytemuck::bytes_of(payload),
        );
    }

    /// Dynamic offset to pass to `set_bind_group` for `slot`.
    pub fn offset(&self, slot: u32) -> u32 {
        (u64::from(slot) * self.stride) as u32
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
