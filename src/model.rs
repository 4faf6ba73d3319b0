//! CPU-side model loading and processing.
//!
//! The showcase treats the specimen mesh as an opaque external asset: it is
//! decoded off the frame loop by the [`ModelCache`](crate::ModelCache),
//! normalized into a predictable framing, and only then uploaded to the
//! GPU. Everything in this module is plain CPU data so the pipeline can be
//! tested without a device.
//!
//! Currently STL is the only supported on-disk format (binary and ASCII,
//! no UV coordinates).

use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};
use glam::Vec3;
use std::path::Path;

/// Errors that can occur when loading a specimen model.
#[derive(Debug)]
pub enum ModelError {
    /// File could not be read.
    Io(std::io::Error),
    /// File format could not be determined from the extension.
    UnknownFormat(String),
    /// The model data was invalid or corrupt.
    Decode(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Io(e) => write!(f, "IO error: {}", e),
            ModelError::UnknownFormat(ext) => write!(f, "Unknown model format: '{}'", ext),
            ModelError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ModelError {
    fn from(e: std::io::Error) -> Self {
        ModelError::Io(e)
    }
}

/// Decoded model geometry before GPU upload.
///
/// This intermediate representation allows framing transformations
/// (centering, scaling, normal smoothing) before the final mesh is created.
#[derive(Clone, Debug)]
pub struct RawModel {
    /// Vertex positions, normals, and UVs.
    pub vertices: Vec<Vertex3d>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl RawModel {
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Decode a model from a file, detecting the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "stl" => {
                let file = std::fs::File::open(path)?;
                let mut reader = std::io::BufReader::new(file);
                Self::from_stl(&mut reader)
            }
            _ => Err(ModelError::UnknownFormat(ext)),
        }
    }

    /// Decode an STL model from raw bytes.
    pub fn from_stl_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        let mut cursor = std::io::Cursor::new(bytes);
        Self::from_stl(&mut cursor)
    }

    fn from_stl<R: std::io::Read + std::io::Seek>(reader: &mut R) -> Result<Self, ModelError> {
        let stl = stl_io::read_stl(reader)
            .map_err(|e| ModelError::Decode(format!("STL decode error: {}", e)))?;

        let mut vertices = Vec::with_capacity(stl.faces.len() * 3);
        let mut indices = Vec::with_capacity(stl.faces.len() * 3);

        for (i, face) in stl.faces.iter().enumerate() {
            let normal: [f32; 3] = face.normal.into();

            for &vertex_idx in &face.vertices {
                let position: [f32; 3] = (*stl.vertices.get(vertex_idx).ok_or_else(|| {
                    ModelError::Decode(format!("face references missing vertex {}", vertex_idx))
                })?)
                .into();
                // STL carries no UVs.
                vertices.push(Vertex3d::new(position, normal, [0.0, 0.0]));
            }

            let base = (i * 3) as u32;
            indices.extend_from_slice(&[base, base + 1, base + 2]);
        }

        Ok(Self::new(vertices, indices))
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }

    /// Center point of the bounding box.
    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    /// Size of the bounding box.
    pub fn size(&self) -> Vec3 {
        let (min, max) = self.bounds();
        max - min
    }

    /// Translates all vertices by the given offset.
    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position[0] += offset.x;
            v.position[1] += offset.y;
            v.position[2] += offset.z;
        }
    }

    /// Scales all vertices uniformly around the origin.
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            v.position[0] *= factor;
            v.position[1] *= factor;
            v.position[2] *= factor;
        }
    }

    /// Centers the model at the origin.
    pub fn recenter(&mut self) {
        let center = self.center();
        self.translate(-center);
    }

    /// Scales the model to fit within a unit cube (-0.5 to 0.5).
    pub fn normalize(&mut self) {
        let size = self.size();
        let max_dim = size.x.max(size.y).max(size.z);
        if max_dim > 0.0 {
            self.scale(1.0 / max_dim);
        }
    }

    /// Recalculates smooth vertex normals from face geometry.
    ///
    /// Face normals are accumulated per vertex (area-weighted via the raw
    /// cross product) and normalized, which is what STL input needs.
    pub fn recalculate_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }

        for tri in self.indices.chunks(3) {
            if tri.len() < 3 {
                continue;
            }
            let i0 = tri[0] as usize;
            let i1 = tri[1] as usize;
            let i2 = tri[2] as usize;

            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);

            let face_normal = (p1 - p0).cross(p2 - p0);
            for &i in &[i0, i1, i2] {
                self.vertices[i].normal[0] += face_normal.x;
                self.vertices[i].normal[1] += face_normal.y;
                self.vertices[i].normal[2] += face_normal.z;
            }
        }

        for v in &mut self.vertices {
            let n = Vec3::from(v.normal).normalize_or_zero();
            v.normal = n.into();
        }
    }

    /// Applies the showcase framing preset: recenter, fit to a unit cube,
    /// smooth the normals. Every decoded specimen goes through this before
    /// upload so the base transform can assume a predictable extent.
    pub fn framed(mut self) -> Self {
        self.recenter();
        self.normalize();
        self.recalculate_normals();
        self
    }

    /// Built-in placeholder: a unit-diameter UV sphere.
    ///
    /// Rendered while the real specimen is loading and as the graceful
    /// fallback when loading fails.
    pub fn placeholder() -> Self {
        let segments = 32u32;
        let rings = 16u32;
        let radius = 0.5f32;

        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        for ring in 0..=rings {
            let phi = std::f32::consts::PI * ring as f32 / rings as f32;
            for seg in 0..=segments {
                let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
                let normal = Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                );
                vertices.push(Vertex3d::new(
                    (normal * radius).into(),
                    normal.into(),
                    [
                        seg as f32 / segments as f32,
                        ring as f32 / rings as f32,
                    ],
                ));
            }
        }

        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
        for ring in 0..rings {
            for seg in 0..segments {
                let a = ring * (segments + 1) + seg;
                let b = a + segments + 1;
                // CCW winding viewed from outside the sphere.
                indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }

        Self::new(vertices, indices)
    }

    /// Uploads this model to the GPU as a [`Mesh`].
    pub fn upload(&self, gpu: &GpuContext) -> Mesh {
        Mesh::new(gpu, &self.vertices, &self.indices)
    }
}
