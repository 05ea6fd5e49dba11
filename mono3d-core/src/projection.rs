/// Camera construction and perspective projection
use nalgebra::{Point2, Vector3};

use crate::transform::Xform;

/// World-to-camera transform plus the projection scale.
///
/// Camera space looks down +z; x and y map to screen x and y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub transform: Xform,
    pub scale: f32,
}

impl Camera {
    /// Build a camera at `origin` looking at `target`.
    ///
    /// The stored scale is `reference_height * scale`. `origin == target`
    /// divides by zero; callers must not pass coincident points.
    pub fn look_at(
        origin: Vector3<f32>,
        target: Vector3<f32>,
        scale: f32,
        up: Vector3<f32>,
        reference_height: f32,
    ) -> Self {
        let aimed = aim(origin, target);

        let transform = if up.x != 0.0 || up.y != 0.0 {
            let l = (up.x * up.x + up.y * up.y).sqrt();
            // Turns the up hint's x/y direction onto +y
            let roll = Xform::from_rows(
                up.y / l, -up.x / l, 0.0,
                up.x / l, up.y / l, 0.0,
                0.0, 0.0, 1.0,
            );
            aimed.then(&roll)
        } else {
            aimed
        };

        Self {
            transform,
            scale: reference_height * scale,
        }
    }

    pub fn to_camera_space(&self, p: &Vector3<f32>) -> Vector3<f32> {
        self.transform.transform_point(p)
    }
}

/// Translate to `origin`, yaw the view direction onto the z axis, then
/// pitch by its elevation. Yaw is skipped when looking straight up or down.
pub fn aim(origin: Vector3<f32>, target: Vector3<f32>) -> Xform {
    let mut camera = Xform::translation(-origin);
    let dir = (target - origin).normalize();

    let mut h = 0.0;
    if dir.x != 0.0 || dir.z != 0.0 {
        h = (dir.x * dir.x + dir.z * dir.z).sqrt();
        let yaw = Xform::from_rows(
            dir.z / h, 0.0, -dir.x / h,
            0.0, 1.0, 0.0,
            dir.x / h, 0.0, dir.z / h,
        );
        camera = camera.then(&yaw);
    }

    let pitch = Xform::from_rows(
        1.0, 0.0, 0.0,
        0.0, h, -dir.y,
        0.0, dir.y, h,
    );
    camera.then(&pitch)
}

/// Perspective divide and screen offset for camera-space points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub horizontal_bias: f32,
}

impl Projection {
    /// Screen position of a camera-space point, or `None` at or behind the camera
    pub fn project(&self, p: &Vector3<f32>) -> Option<Point2<f32>> {
        if p.z <= 0.0 {
            return None;
        }
        Some(Point2::new(
            self.scale * (p.x / p.z + self.horizontal_bias * self.center_x),
            self.scale * (p.y / p.z + self.center_y),
        ))
    }

    /// Replace x and y with screen coordinates, keeping camera-space z.
    /// Points with `z <= 0` are left untouched.
    pub fn project_in_place(&self, p: &mut Vector3<f32>) {
        if let Some(screen) = self.project(p) {
            p.x = screen.x;
            p.y = screen.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: f32 = 240.0;

    fn up() -> Vector3<f32> {
        Vector3::new(0.0, 1.0, 0.0)
    }

    #[test]
    fn test_identity_camera() {
        let camera = Camera::look_at(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0), 1.0, up(), HEIGHT);
        assert!(camera.transform.distance(&Xform::identity()) < 1e-6);
        assert_eq!(camera.scale, 240.0);
    }

    #[test]
    fn test_scale_uses_reference_height() {
        let camera = Camera::look_at(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0), 0.5, up(), HEIGHT);
        assert_eq!(camera.scale, 120.0);
    }

    #[test]
    fn test_target_lands_on_forward_axis() {
        let origin = Vector3::new(3.0, 2.0, -4.0);
        let target = Vector3::new(-1.0, 0.5, 2.0);
        let camera = Camera::look_at(origin, target, 1.0, up(), HEIGHT);

        let p = camera.to_camera_space(&target);
        let distance = (target - origin).norm();
        assert!(p.x.abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
        assert!((p.z - distance).abs() < 1e-4);

        assert!(camera.to_camera_space(&origin).norm() < 1e-5);
    }

    #[test]
    fn test_zero_horizontal_up_skips_roll() {
        let origin = Vector3::new(1.0, 1.0, 1.0);
        let target = Vector3::new(2.0, 0.0, 5.0);
        let camera = Camera::look_at(origin, target, 1.0, Vector3::new(0.0, 0.0, 3.0), HEIGHT);
        assert_eq!(camera.transform, aim(origin, target));
    }

    #[test]
    fn test_vertical_view_skips_yaw() {
        let camera = Camera::look_at(
            Vector3::zeros(),
            Vector3::new(0.0, 5.0, 0.0),
            1.0,
            Vector3::new(0.0, 1.0, 0.0),
            HEIGHT,
        );
        let pitch_only = Xform::from_rows(1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0);
        assert!(camera.transform.distance(&pitch_only) < 1e-6);

        let forward = camera.to_camera_space(&Vector3::new(0.0, 5.0, 0.0));
        assert!((forward - Vector3::new(0.0, 0.0, 5.0)).norm() < 1e-5);
    }

    #[test]
    fn test_roll_with_sideways_up() {
        let camera = Camera::look_at(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 1.0),
            1.0,
            Vector3::new(1.0, 0.0, 0.0),
            HEIGHT,
        );
        let p = camera.to_camera_space(&Vector3::new(1.0, 0.0, 1.0));
        assert!((p - Vector3::new(0.0, 1.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_roll_puts_up_hint_on_camera_up() {
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let hints = [
            Vector3::new(half, half, 0.0),
            Vector3::new(-half, half, 0.0),
            Vector3::new(0.6, -0.8, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];

        for up_hint in hints {
            let camera = Camera::look_at(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0), 1.0, up_hint, HEIGHT);
            let mapped = camera.to_camera_space(&up_hint);
            assert!(
                (mapped - up()).norm() < 1e-5,
                "up {up_hint:?} mapped to {mapped:?}"
            );
            // Forward axis is untouched by the roll
            let forward = camera.to_camera_space(&Vector3::new(0.0, 0.0, 2.0));
            assert!((forward - Vector3::new(0.0, 0.0, 2.0)).norm() < 1e-5);
        }
    }

    #[test]
    fn test_projection() {
        let projection = Projection {
            scale: 240.0,
            center_x: 0.5,
            center_y: 0.5,
            horizontal_bias: 4.0 / 3.0,
        };

        let center = projection.project(&Vector3::new(0.0, 0.0, 3.0)).unwrap();
        assert!((center.x - 160.0).abs() < 1e-4);
        assert!((center.y - 120.0).abs() < 1e-4);

        let p = projection.project(&Vector3::new(1.0, -1.0, 2.0)).unwrap();
        assert!((p.x - 280.0).abs() < 1e-4);
        assert!((p.y - 0.0).abs() < 1e-4);

        assert!(projection.project(&Vector3::new(1.0, 1.0, 0.0)).is_none());
        assert!(projection.project(&Vector3::new(1.0, 1.0, -2.0)).is_none());
    }

    #[test]
    fn test_project_in_place_keeps_depth_and_skips_behind() {
        let projection = Projection {
            scale: 240.0,
            center_x: 0.5,
            center_y: 0.5,
            horizontal_bias: 4.0 / 3.0,
        };

        let mut front = Vector3::new(0.0, 0.0, 2.0);
        projection.project_in_place(&mut front);
        assert_eq!(front.z, 2.0);
        assert!((front.y - 120.0).abs() < 1e-4);

        let mut behind = Vector3::new(0.3, 0.4, -1.0);
        projection.project_in_place(&mut behind);
        assert_eq!(behind, Vector3::new(0.3, 0.4, -1.0));
    }
}
