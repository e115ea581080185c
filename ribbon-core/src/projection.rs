/// Projection box and viewport mapping
use nalgebra::{Matrix4, Vector4};
use serde::Deserialize;

/// Axis-aligned orthographic view volume
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrthoBox {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoBox {
    /// A cube of half-size `extent` centred on the origin
    pub fn cube(extent: f32) -> Self {
        Self {
            left: -extent,
            right: extent,
            bottom: -extent,
            top: extent,
            near: -extent,
            far: extent,
        }
    }

    pub fn is_valid(&self) -> bool {
        let spans = [
            self.right - self.left,
            self.top - self.bottom,
            self.far - self.near,
        ];
        spans.iter().all(|span| span.is_finite() && span.abs() > f32::EPSILON)
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_orthographic(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

impl Default for OrthoBox {
    fn default() -> Self {
        Self::cube(20.0)
    }
}

/// Pixel (or character cell) grid that clip-space coordinates map onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Map a clip-space position to screen space.
    ///
    /// Returns `(x, y, depth)` with `y` growing downwards and depth in NDC,
    /// or `None` when the point lies outside the view volume.
    pub fn to_screen(&self, clip: &Vector4<f32>) -> Option<(f32, f32, f32)> {
        // Prevent division by near-zero w
        if clip.w.abs() < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&ndc_x)
            || !(-1.0..=1.0).contains(&ndc_y)
            || !(-1.0..=1.0).contains(&depth)
        {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height as f32;

        Some((screen_x, screen_y, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_default_box_maps_corners() {
        let projection = OrthoBox::default().matrix();
        let corner = projection.transform_point(&Point3::new(20.0, 20.0, 0.0));
        assert!((corner.x - 1.0).abs() < 1e-6);
        assert!((corner.y - 1.0).abs() < 1e-6);

        let origin = projection.transform_point(&Point3::origin());
        assert!(origin.coords.norm() < 1e-6);
    }

    #[test]
    fn test_degenerate_box() {
        let mut ortho = OrthoBox::default();
        assert!(ortho.is_valid());
        ortho.right = ortho.left;
        assert!(!ortho.is_valid());
    }

    #[test]
    fn test_viewport_mapping() {
        let viewport = Viewport::new(80, 40);
        let (x, y, depth) = viewport.to_screen(&Vector4::new(0.0, 0.0, 0.5, 1.0)).unwrap();
        assert!((x - 40.0).abs() < 1e-6);
        assert!((y - 20.0).abs() < 1e-6);
        assert!((depth - 0.5).abs() < 1e-6);

        let (_, top, _) = viewport.to_screen(&Vector4::new(0.0, 1.0, 0.0, 1.0)).unwrap();
        assert!(top.abs() < 1e-6);

        assert!(viewport.to_screen(&Vector4::new(1.5, 0.0, 0.0, 1.0)).is_none());
        assert!(viewport.to_screen(&Vector4::new(0.0, 0.0, 0.0, 0.0)).is_none());
    }
}
