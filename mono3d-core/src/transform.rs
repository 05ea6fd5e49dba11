/// Affine transforms and rotation state
use nalgebra::{Matrix3, Rotation3, Vector3};

/// Euler angles (radians) for a shape's placement, accumulated frame to frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Add per-axis deltas in radians
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// A 3x3 linear part plus a translation.
///
/// Points are transformed as `linear * p + translation`. Composition is
/// written in application order: `a.then(&b)` applies `a` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xform {
    pub linear: Matrix3<f32>,
    pub translation: Vector3<f32>,
}

impl Xform {
    pub fn identity() -> Self {
        Self {
            linear: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Pure translation by `offset`
    pub fn translation(offset: Vector3<f32>) -> Self {
        Self {
            linear: Matrix3::identity(),
            translation: offset,
        }
    }

    /// Linear-only transform from a row-major 3x3 matrix
    #[allow(clippy::too_many_arguments)]
    pub fn from_rows(
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
        g: f32,
        h: f32,
        i: f32,
    ) -> Self {
        Self {
            linear: Matrix3::new(a, b, c, d, e, f, g, h, i),
            translation: Vector3::zeros(),
        }
    }

    pub fn uniform_scale(s: f32) -> Self {
        Self {
            linear: Matrix3::from_diagonal_element(s),
            translation: Vector3::zeros(),
        }
    }

    /// Rotation from a rotation state, applied in order X, then Y, then Z
    pub fn rotation(rotation: &RotationState) -> Self {
        let rx = Rotation3::new(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Rotation3::new(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Rotation3::new(Vector3::new(0.0, 0.0, rotation.z));

        Self {
            linear: (rz * ry * rx).into_inner(),
            translation: Vector3::zeros(),
        }
    }

    /// Returns a copy with the translation replaced
    pub fn with_translation(mut self, offset: Vector3<f32>) -> Self {
        self.translation = offset;
        self
    }

    /// Compose: apply `self`, then `next`.
    pub fn then(&self, next: &Xform) -> Xform {
        Xform {
            linear: next.linear * self.linear,
            translation: next.linear * self.translation + next.translation,
        }
    }

    pub fn transform_point(&self, p: &Vector3<f32>) -> Vector3<f32> {
        self.linear * p + self.translation
    }

    /// Distance between two transforms, for approximate comparisons
    pub fn distance(&self, other: &Xform) -> f32 {
        (self.linear - other.linear).norm() + (self.translation - other.translation).norm()
    }
}

impl Default for Xform {
    fn default() -> Self {
        Self::identity()
    }
}
