//! GPU mesh primitives and spatial transforms.
//!
//! - [`Vertex3d`] — the vertex format (position, normal, UV), `#[repr(C)]`
//!   for predictable GPU upload.
//! - [`Mesh`] — GPU-resident geometry with vertex and index buffers,
//!   immutable after creation.
//! - [`Transform`] — position/rotation/scale, converted to a matrix in SRT
//!   order.
//!
//! The showcase renders exactly one mesh at a time (the specimen or its
//! placeholder); meshes are built from [`RawModel`](crate::RawModel) data
//! via [`RawModel::upload`](crate::RawModel::upload).

use crate::gpu::GpuContext;
use glam::{Mat4, Quat, Vec3};

/// A vertex with position, normal, and texture coordinates.
///
/// 32 bytes per vertex: position at offset 0, normal at 12, uv at 24.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// 3D position in model space.
    pub position: [f32; 3],
    /// Surface normal (normalized for correct lighting).
    pub normal: [f32; 3],
    /// Texture coordinates; unused by STL input but kept in the layout.
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout for this vertex type.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// GPU-resident geometry with vertex and index buffers.
///
/// Immutable after creation; to render different geometry, create a new
/// mesh. Front faces wind counter-clockwise.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Uploads vertex and index data to GPU buffers.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Specimen Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Specimen Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

/// Position, rotation, and scale for placing the specimen in the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space position (translation).
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Scale factors for each axis.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform (origin, no rotation, unit scale).
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a positioned, unrotated transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sets the position (translation) component.
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the rotation component.
    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets uniform scale on all axes.
    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Converts this transform to a matrix, applying scale, then rotation,
    /// then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_matrix_applies_srt_order() {
        let transform = Transform::new()
            .position(Vec3::new(1.0, 2.0, 3.0))
            .uniform_scale(2.0);

        let p = transform.matrix().transform_point3(Vec3::X);
        // Scale first (2, 0, 0), then translate.
        assert!((p - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::new().matrix(), Mat4::IDENTITY);
    }
}
