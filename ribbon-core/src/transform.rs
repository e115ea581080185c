/// Transformation matrices and the per-frame matrix pipeline
use nalgebra::{Matrix4, Unit, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation by `angle` radians about `axis`; the axis is normalized first.
    /// A zero axis yields the identity.
    pub fn axis_rotation(axis: [f32; 3], angle: f32) -> Matrix4<f32> {
        match Unit::try_new(Vector3::from(axis), f32::EPSILON) {
            Some(axis) => Matrix4::from_axis_angle(&axis, angle),
            None => Matrix4::identity(),
        }
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Place the viewed surface: `translation * rotation * view`
    pub fn model_view(
        view: &Matrix4<f32>,
        rotation: &Matrix4<f32>,
        translation: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        translation * (rotation * view)
    }

    /// Inverse-transpose of the model-view matrix.
    ///
    /// Returns `None` for a singular model-view.
    pub fn normal_matrix(model_view: &Matrix4<f32>) -> Option<Matrix4<f32>> {
        model_view.try_inverse().map(|inverse| inverse.transpose())
    }
}

/// Matrices uploaded for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub model_view: Matrix4<f32>,
    pub model_view_projection: Matrix4<f32>,
    pub normal: Matrix4<f32>,
}

impl FrameMatrices {
    /// Compose `projection * translation * rotation * view` and its normal matrix
    pub fn compose(
        projection: &Matrix4<f32>,
        view: &Matrix4<f32>,
        rotation: &Matrix4<f32>,
        translation: &Matrix4<f32>,
    ) -> Self {
        let model_view = Transform::model_view(view, rotation, translation);
        let normal = Transform::normal_matrix(&model_view).unwrap_or_else(|| {
            log::warn!("singular model-view matrix, using identity normal matrix");
            Matrix4::identity()
        });

        Self {
            model_view,
            model_view_projection: projection * model_view,
            normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::OrthoBox;

    #[test]
    fn test_zero_axis_is_identity() {
        let matrix = Transform::axis_rotation([0.0, 0.0, 0.0], 1.0);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_axis_rotation_normalizes_axis() {
        let short = Transform::axis_rotation([0.707, 0.707, 0.0], 0.7);
        let long = Transform::axis_rotation([2.0, 2.0, 0.0], 0.7);
        assert!((short - long).norm() < 1e-5);

        // Quarter turn about z sends x to y
        let quarter = Transform::axis_rotation([0.0, 0.0, 1.0], std::f32::consts::FRAC_PI_2);
        let x = quarter.transform_vector(&Vector3::x());
        assert!((x - Vector3::y()).norm() < 1e-6);
    }

    #[test]
    fn test_identity_view_composition() {
        let projection = OrthoBox::default().matrix();
        let rotation = Transform::axis_rotation([0.707, 0.707, 0.0], 0.7);
        let translation = Transform::translation_matrix(0.0, 0.0, -10.0);

        let frame =
            FrameMatrices::compose(&projection, &Matrix4::identity(), &rotation, &translation);

        let expected = projection * translation * rotation;
        assert!((frame.model_view_projection - expected).norm() < 1e-6);
        assert!((frame.model_view - translation * rotation).norm() < 1e-6);
    }

    #[test]
    fn test_composition_order_with_view() {
        let projection = OrthoBox::default().matrix();
        let view = Transform::axis_rotation([1.0, 0.0, 0.0], 0.3);
        let rotation = Transform::axis_rotation([0.707, 0.707, 0.0], 0.7);
        let translation = Transform::translation_matrix(0.0, 0.0, -10.0);

        let frame = FrameMatrices::compose(&projection, &view, &rotation, &translation);
        let expected = projection * translation * rotation * view;
        assert!((frame.model_view_projection - expected).norm() < 1e-5);

        // Swapping the placement transforms changes the result
        let swapped = projection * rotation * translation * view;
        assert!((frame.model_view_projection - swapped).norm() > 1e-3);
    }

    #[test]
    fn test_normal_matrix_under_nonuniform_scale() {
        let model_view = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        let normal_matrix = Transform::normal_matrix(&model_view).unwrap();

        // Plane x + y = 0: normal (1, 1, 0), tangent (1, -1, 0)
        let normal = normal_matrix.transform_vector(&Vector3::new(1.0, 1.0, 0.0));
        let tangent = model_view.transform_vector(&Vector3::new(1.0, -1.0, 0.0));

        assert!(normal.dot(&tangent).abs() < 1e-6);
        assert!((normal - Vector3::new(0.5, 1.0, 0.0)).norm() < 1e-6);

        // Transforming the normal with the model-view itself would be wrong
        let naive = model_view.transform_vector(&Vector3::new(1.0, 1.0, 0.0));
        assert!(naive.dot(&tangent).abs() > 1.0);
    }

    #[test]
    fn test_singular_model_view_falls_back() {
        let projection = OrthoBox::default().matrix();
        let flatten = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 0.0, 1.0));
        let frame = FrameMatrices::compose(
            &projection,
            &flatten,
            &Matrix4::identity(),
            &Matrix4::identity(),
        );
        assert!((frame.normal - Matrix4::identity()).norm() < 1e-6);
    }
}
