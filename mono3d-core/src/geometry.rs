/// Static triangle meshes
use nalgebra::Vector3;

use crate::error::{Error, Result};

/// 16-bit indices address at most this many vertices
pub const MAX_VERTICES: usize = 1 << 16;

/// Unit normal of the triangle `p1, p2, p3` (right-hand rule on the two edges from `p1`)
pub fn triangle_normal(p1: &Vector3<f32>, p2: &Vector3<f32>, p3: &Vector3<f32>) -> Vector3<f32> {
    let edge1 = p2 - p1;
    let edge2 = p3 - p1;

    edge1.cross(&edge2).normalize()
}

/// An immutable indexed triangle mesh.
///
/// Front faces wind counter-clockwise when seen from outside, i.e. the
/// normal from [`triangle_normal`] points outward.
#[derive(Debug, Clone)]
pub struct Shape {
    points: Vec<Vector3<f32>>,
    faces: Vec<[u16; 3]>,
    face_color_bias: Option<Vec<f32>>,
    center: Vector3<f32>,
}

impl Shape {
    /// Build a shape, checking that every index is in range.
    pub fn new(
        points: Vec<Vector3<f32>>,
        faces: Vec<[u16; 3]>,
        face_color_bias: Option<Vec<f32>>,
    ) -> Result<Self> {
        if points.len() > MAX_VERTICES {
            return Err(Error::TooManyVertices(points.len()));
        }

        for (face, triple) in faces.iter().enumerate() {
            if let Some(&index) = triple.iter().find(|&&i| i as usize >= points.len()) {
                return Err(Error::IndexOutOfRange {
                    face,
                    index,
                    vertex_count: points.len(),
                });
            }
        }

        if let Some(bias) = &face_color_bias {
            if bias.len() != faces.len() {
                return Err(Error::FaceBiasLength {
                    expected: faces.len(),
                    actual: bias.len(),
                });
            }
        }

        Ok(Self::new_unchecked(points, faces, face_color_bias))
    }

    /// Build a shape from a flat index buffer of `3 * faces` entries.
    pub fn from_index_buffer(
        points: Vec<Vector3<f32>>,
        indices: &[u16],
        face_color_bias: Option<Vec<f32>>,
    ) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(Error::MalformedIndexBuffer(indices.len()));
        }

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::new(points, faces, face_color_bias)
    }

    /// Build a shape from trusted data. Out-of-range indices will panic at draw time.
    pub fn new_unchecked(
        points: Vec<Vector3<f32>>,
        faces: Vec<[u16; 3]>,
        face_color_bias: Option<Vec<f32>>,
    ) -> Self {
        let center = centroid(&points);
        Self {
            points,
            faces,
            face_color_bias,
            center,
        }
    }

    pub fn points(&self) -> &[Vector3<f32>] {
        &self.points
    }

    pub fn faces(&self) -> &[[u16; 3]] {
        &self.faces
    }

    pub fn face_color_bias(&self) -> Option<&[f32]> {
        self.face_color_bias.as_deref()
    }

    /// Average of the vertex positions, for ordering whole shapes
    pub fn center(&self) -> Vector3<f32> {
        self.center
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned cube centred on the origin
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let points = vec![
            Vector3::new(-h, -h, -h),
            Vector3::new(h, -h, -h),
            Vector3::new(h, h, -h),
            Vector3::new(-h, h, -h),
            Vector3::new(-h, -h, h),
            Vector3::new(h, -h, h),
            Vector3::new(h, h, h),
            Vector3::new(-h, h, h),
        ];
        let faces = vec![
            // Front
            [4, 5, 6],
            [4, 6, 7],
            // Back
            [0, 3, 2],
            [0, 2, 1],
            // Top
            [3, 7, 6],
            [3, 6, 2],
            // Bottom
            [0, 1, 5],
            [0, 5, 4],
            // Right
            [1, 2, 6],
            [1, 6, 5],
            // Left
            [0, 4, 7],
            [0, 7, 3],
        ];

        Self::new_unchecked(points, faces, None)
    }

    /// Regular octahedron with vertices on the axes at distance `radius`
    pub fn octahedron(radius: f32) -> Self {
        let r = radius;
        let points = vec![
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(-r, 0.0, 0.0),
            Vector3::new(0.0, r, 0.0),
            Vector3::new(0.0, -r, 0.0),
            Vector3::new(0.0, 0.0, r),
            Vector3::new(0.0, 0.0, -r),
        ];
        let faces = vec![
            [0, 2, 4],
            [1, 4, 2],
            [0, 4, 3],
            [1, 3, 4],
            [0, 5, 2],
            [1, 2, 5],
            [0, 3, 5],
            [1, 5, 3],
        ];

        Self::new_unchecked(points, faces, None)
    }
}

fn centroid(points: &[Vector3<f32>]) -> Vector3<f32> {
    if points.is_empty() {
        return Vector3::zeros();
    }
    points.iter().sum::<Vector3<f32>>() / points.len() as f32
}
