//! Ribbon surface sampler.
//!
//! The surface is
//!
//! ```text
//! x = (a + b·sin(n·u)) · cos(u) − v · sin(u)
//! y = (a + b·sin(n·u)) · sin(u) + v · cos(u)
//! z = b · cos(n·u)
//! ```
//!
//! with `u` and `v` given in degrees and every point multiplied by `scale`.
//! Sampling is pure: the same parameters and step always produce the same
//! sequence.

use nalgebra::{Point2, Point3};

use crate::config::SurfaceParams;
use crate::geometry::{MeshLayout, SurfaceMesh};

/// Upper bound on the vertices one sampling pass may produce
pub const MAX_VERTICES: usize = 1 << 24;

/// Number of samples `k * step` (k = 0, 1, ...) strictly below `span`.
/// Saturates at `usize::MAX` for steps too small to count.
pub fn sample_count(span: f64, step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || !span.is_finite() || span <= 0.0 {
        return 0;
    }
    if span / step > (usize::MAX / 4) as f64 {
        return usize::MAX;
    }

    let mut count = (span / step).ceil() as usize;
    while count > 0 && (count - 1) as f64 * step >= span {
        count -= 1;
    }
    while (count as f64) * step < span {
        count += 1;
    }
    count
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Surface {
    pub params: SurfaceParams,
}

impl Surface {
    pub fn new(params: SurfaceParams) -> Self {
        Self { params }
    }

    /// Evaluate the scaled surface point at `(u, v)` degrees
    pub fn position(&self, u: f64, v: f64) -> Point3<f32> {
        let SurfaceParams { a, b, n, scale, .. } = self.params;
        let u = u.to_radians();
        let v = v.to_radians();

        let radius = a + b * (n * u).sin();
        let x = radius * u.cos() - v * u.sin();
        let y = radius * u.sin() + v * u.cos();
        let z = b * (n * u).cos();

        Point3::new((x * scale) as f32, (y * scale) as f32, (z * scale) as f32)
    }

    /// Texture coordinate of `(u, v)`: `s = u / u_end`, `t = (v + v_end) / (2 v_end)`
    pub fn tex_coord(&self, u: f64, v: f64) -> Point2<f32> {
        let SurfaceParams { u_end, v_end, .. } = self.params;
        let s = u / u_end;
        let t = (v + v_end) / (2.0 * v_end);
        Point2::new(s as f32, t as f32)
    }

    /// Sample counts along `u` and `v` for a step
    pub fn grid_dims(&self, step: f64) -> (usize, usize) {
        let SurfaceParams {
            u_end,
            v_start,
            v_end,
            ..
        } = self.params;
        (
            sample_count(u_end, step),
            sample_count(v_end - v_start, step),
        )
    }

    /// Vertices `sample_grid` would produce, or `None` above [`MAX_VERTICES`]
    pub fn grid_vertex_count(&self, step: f64) -> Option<usize> {
        let (columns, rows) = self.grid_dims(step);
        columns
            .checked_mul(rows)
            .filter(|&count| count <= MAX_VERTICES)
    }

    /// Vertices `sample_strip` would produce, or `None` above [`MAX_VERTICES`]
    pub fn strip_vertex_count(&self, step: f64) -> Option<usize> {
        let (columns, rows) = self.grid_dims(step);
        columns
            .checked_mul(rows)
            .and_then(|count| count.checked_mul(2))
            .filter(|&count| count <= MAX_VERTICES)
    }

    /// Sample the `u`/`v` grid, one column of `v` samples per `u` sample.
    /// A step that would exceed [`MAX_VERTICES`] yields an empty mesh.
    pub fn sample_grid(&self, step: f64) -> SurfaceMesh {
        let Some(capacity) = self.grid_vertex_count(step) else {
            log::warn!("step {step} samples more than {MAX_VERTICES} vertices, skipping");
            return SurfaceMesh::new(MeshLayout::Grid { columns: 0 });
        };
        let (columns, rows) = self.grid_dims(step);
        let mut mesh = SurfaceMesh::with_capacity(MeshLayout::Grid { columns }, capacity, false);

        for i in 0..columns {
            let u = i as f64 * step;
            for j in 0..rows {
                let v = self.params.v_start + j as f64 * step;
                mesh.positions.push(self.position(u, v));
            }
        }

        mesh
    }

    /// Sample a continuous triangle strip with texture coordinates.
    ///
    /// Every grid sample `(u, v)` is followed by its neighbour
    /// `(u + step, v + step)`. A step that would exceed [`MAX_VERTICES`]
    /// yields an empty mesh.
    pub fn sample_strip(&self, step: f64) -> SurfaceMesh {
        let Some(capacity) = self.strip_vertex_count(step) else {
            log::warn!("step {step} samples more than {MAX_VERTICES} vertices, skipping");
            return SurfaceMesh::new(MeshLayout::Strip);
        };
        let (columns, rows) = self.grid_dims(step);
        let mut mesh = SurfaceMesh::with_capacity(MeshLayout::Strip, capacity, true);

        for i in 0..columns {
            let u = i as f64 * step;
            for j in 0..rows {
                let v = self.params.v_start + j as f64 * step;
                for (u, v) in [(u, v), (u + step, v + step)] {
                    mesh.positions.push(self.position(u, v));
                    mesh.tex_coords.push(self.tex_coord(u, v));
                }
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_count(360.0, 1.0), 360);
        assert_eq!(sample_count(51.0, 1.0), 51);
        assert_eq!(sample_count(360.0, 0.2), 1800);
        assert_eq!(sample_count(51.0, 0.2), 255);
        assert_eq!(sample_count(51.0, 2.0), 26);
        assert_eq!(sample_count(51.0, 0.0), 0);
        assert_eq!(sample_count(51.0, f64::NAN), 0);
    }

    #[test]
    fn test_grid_count_formula() {
        let surface = Surface::default();
        for step in [1.0, 0.5, 0.25, 0.2, 2.0, 3.0] {
            let mesh = surface.sample_grid(step);
            let columns = (360.0_f64 / step).ceil() as usize;
            let expected = columns * (51.0_f64 / step).ceil() as usize;
            assert_eq!(mesh.vertex_count(), expected, "step {step}");
            assert_eq!(mesh.layout, MeshLayout::Grid { columns });
        }
    }

    #[test]
    fn test_known_value() {
        let surface = Surface::default();
        let point = surface.position(0.0, 0.0);
        assert!((point - Point3::new(3.5, 0.0, 3.5)).norm() < 1e-6);

        // Grid starts at v = -1, so the origin sample is the second in column 0
        let mesh = surface.sample_grid(1.0);
        assert!((mesh.positions[1] - Point3::new(3.5, 0.0, 3.5)).norm() < 1e-6);
    }

    #[test]
    fn test_quarter_turn_value() {
        // u = 90: radius = 2, x = -v, y = 2, z = 0
        let surface = Surface::default();
        let point = surface.position(90.0, 0.0);
        assert!((point - Point3::new(0.0, 7.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let surface = Surface::default();
        let first = surface.sample_grid(1.0);
        let second = surface.sample_grid(1.0);
        let bits = |mesh: &SurfaceMesh| -> Vec<u32> {
            mesh.flat_positions().iter().map(|f| f.to_bits()).collect()
        };
        assert_eq!(bits(&first), bits(&second));

        assert_eq!(surface.sample_strip(2.0), surface.sample_strip(2.0));
    }

    #[test]
    fn test_strip_pairs_neighbours() {
        let surface = Surface::default();
        let step = 2.0;
        let mesh = surface.sample_strip(step);
        let (columns, rows) = surface.grid_dims(step);

        assert_eq!(mesh.layout, MeshLayout::Strip);
        assert_eq!(mesh.vertex_count(), 2 * columns * rows);
        assert_eq!(mesh.tex_coords.len(), mesh.vertex_count());

        assert_eq!(mesh.positions[0], surface.position(0.0, -1.0));
        assert_eq!(mesh.positions[1], surface.position(2.0, 1.0));
        assert_eq!(mesh.positions[2], surface.position(0.0, 1.0));
    }

    #[test]
    fn test_tex_coord_ranges() {
        let surface = Surface::default();
        let mesh = surface.sample_strip(1.0);

        for (index, coord) in mesh.tex_coords.iter().enumerate() {
            assert!((0.0..=1.0).contains(&coord.x), "s = {}", coord.x);
            assert!((0.0..=1.0).contains(&coord.y), "t = {}", coord.y);
            // Base samples never reach the seam
            if index % 2 == 0 {
                assert!(coord.x < 1.0);
            }
        }

        let origin = surface.tex_coord(0.0, -50.0);
        assert!(origin.coords.norm() < 1e-6);
    }

    #[test]
    fn test_invalid_step_yields_empty_mesh() {
        let surface = Surface::default();
        assert!(surface.sample_grid(0.0).is_empty());
        assert!(surface.sample_strip(-1.0).is_empty());
    }

    #[test]
    fn test_tiny_step_is_bounded() {
        let surface = Surface::default();
        assert_eq!(sample_count(360.0, 1e-300), usize::MAX);

        assert_eq!(surface.grid_vertex_count(1.0), Some(360 * 51));
        assert_eq!(surface.strip_vertex_count(1.0), Some(2 * 360 * 51));
        assert_eq!(surface.grid_vertex_count(1e-9), None);
        assert_eq!(surface.strip_vertex_count(1e-4), None);

        assert!(surface.sample_grid(1e-9).is_empty());
        assert!(surface.sample_strip(1e-300).is_empty());
    }
}
