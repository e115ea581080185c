//! Trackball rotator.
//!
//! Pointer positions are projected onto a virtual unit sphere centred in the
//! viewport. Dragging from one sphere point to another rotates the view by the
//! arc between them; rotations accumulate in a unit quaternion.

use nalgebra::{Matrix4, Unit, UnitQuaternion, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct TrackballRotator {
    orientation: UnitQuaternion<f32>,
    view_distance: f32,
    drag_from: Option<Vector3<f32>>,
}

impl TrackballRotator {
    pub fn new(view_distance: f32) -> Self {
        Self {
            orientation: UnitQuaternion::identity(),
            view_distance,
            drag_from: None,
        }
    }

    /// Current view matrix: `translation(0, 0, -view_distance) * rotation`
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(0.0, 0.0, -self.view_distance))
            * self.orientation.to_homogeneous()
    }

    pub fn orientation(&self) -> UnitQuaternion<f32> {
        self.orientation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Start a drag at pointer position `(x, y)` in a `width` x `height` viewport
    pub fn begin_drag(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.drag_from = sphere_point(x, y, width, height);
    }

    /// Continue a drag. Returns `true` when the orientation changed and the
    /// view should be redrawn.
    pub fn drag_to(&mut self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let (Some(from), Some(to)) = (self.drag_from, sphere_point(x, y, width, height)) else {
            return false;
        };
        self.drag_from = Some(to);

        if (to - from).norm() < 1e-6 {
            return false;
        }
        match UnitQuaternion::rotation_between(&from, &to) {
            Some(rotation) => {
                self.orientation = rotation * self.orientation;
                true
            }
            None => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    /// Rotate by `angle` radians about `axis` in view space
    pub fn rotate(&mut self, axis: Vector3<f32>, angle: f32) {
        if let Some(axis) = Unit::try_new(axis, f32::EPSILON) {
            self.orientation = UnitQuaternion::from_axis_angle(&axis, angle) * self.orientation;
        }
    }

    pub fn reset(&mut self) {
        self.orientation = UnitQuaternion::identity();
        self.drag_from = None;
    }
}

impl Default for TrackballRotator {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Project a pointer position onto the unit trackball sphere.
/// Positions outside the sphere land on its rim.
fn sphere_point(x: f32, y: f32, width: f32, height: f32) -> Option<Vector3<f32>> {
    let radius = width.min(height) / 2.0;
    if !(radius > 0.0) {
        return None;
    }

    let dx = (x - width / 2.0) / radius;
    let dy = (height / 2.0 - y) / radius;
    let d2 = dx * dx + dy * dy;

    if d2 <= 1.0 {
        Some(Vector3::new(dx, dy, (1.0 - d2).sqrt()))
    } else {
        let d = d2.sqrt();
        Some(Vector3::new(dx / d, dy / d, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_identity() {
        let rotator = TrackballRotator::default();
        assert!((rotator.view_matrix() - Matrix4::identity()).norm() < 1e-6);
        assert!(!rotator.is_dragging());
    }

    #[test]
    fn test_view_distance_translates() {
        let rotator = TrackballRotator::new(5.0);
        let view = rotator.view_matrix();
        let origin = view.transform_point(&nalgebra::Point3::origin());
        assert!((origin.z + 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_point() {
        let centre = sphere_point(50.0, 50.0, 100.0, 100.0).unwrap();
        assert!((centre - Vector3::z()).norm() < 1e-6);

        let rim = sphere_point(200.0, 50.0, 100.0, 100.0).unwrap();
        assert!((rim - Vector3::x()).norm() < 1e-6);

        assert!(sphere_point(0.0, 0.0, 0.0, 100.0).is_none());
    }

    #[test]
    fn test_horizontal_drag_rotates_about_y() {
        let mut rotator = TrackballRotator::default();
        rotator.begin_drag(50.0, 50.0, 100.0, 100.0);
        assert!(rotator.drag_to(75.0, 50.0, 100.0, 100.0));
        rotator.end_drag();

        let (axis, angle) = rotator.orientation().axis_angle().unwrap();
        assert!((axis.into_inner() - Vector3::y()).norm() < 1e-5);
        assert!(angle > 0.0);

        // A point in front of the viewer moves to the right
        let moved = rotator.view_matrix().transform_vector(&Vector3::z());
        assert!(moved.x > 0.0);
    }

    #[test]
    fn test_drag_without_movement() {
        let mut rotator = TrackballRotator::default();
        rotator.begin_drag(30.0, 40.0, 100.0, 100.0);
        assert!(!rotator.drag_to(30.0, 40.0, 100.0, 100.0));
        rotator.end_drag();
        assert!(!rotator.drag_to(60.0, 40.0, 100.0, 100.0));
        assert_eq!(rotator.orientation(), UnitQuaternion::identity());
    }

    #[test]
    fn test_rotate_and_reset() {
        let mut rotator = TrackballRotator::default();
        rotator.rotate(Vector3::x(), 0.5);
        assert!((rotator.orientation().angle() - 0.5).abs() < 1e-6);

        rotator.rotate(Vector3::zeros(), 1.0);
        assert!((rotator.orientation().angle() - 0.5).abs() < 1e-6);

        rotator.reset();
        assert!(rotator.orientation().angle().abs() < 1e-6);
    }
}
