/// Generated vertex data ready for upload
use nalgebra::{Point2, Point3};

/// How a vertex sequence is meant to be assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshLayout {
    /// `columns` runs of equal length, one per `u` sample
    Grid { columns: usize },
    /// One continuous triangle strip
    Strip,
    /// Free-standing points
    Points,
}

/// Positions in object space with optional parallel texture coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    pub positions: Vec<Point3<f32>>,
    /// Empty, or exactly one entry per position
    pub tex_coords: Vec<Point2<f32>>,
    pub layout: MeshLayout,
}

impl SurfaceMesh {
    pub fn new(layout: MeshLayout) -> Self {
        Self {
            positions: Vec::new(),
            tex_coords: Vec::new(),
            layout,
        }
    }

    pub fn with_capacity(layout: MeshLayout, capacity: usize, textured: bool) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            tex_coords: if textured {
                Vec::with_capacity(capacity)
            } else {
                Vec::new()
            },
            layout,
        }
    }

    /// A single point, used for the user point marker
    pub fn point(position: Point3<f32>) -> Self {
        Self {
            positions: vec![position],
            tex_coords: Vec::new(),
            layout: MeshLayout::Points,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_textured(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` sequence
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Texture coordinates as a flat `s, t, s, t, ...` sequence
    pub fn flat_tex_coords(&self) -> Vec<f32> {
        self.tex_coords.iter().flat_map(|t| [t.x, t.y]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_keeps_order() {
        let mut mesh = SurfaceMesh::new(MeshLayout::Strip);
        mesh.positions.push(Point3::new(1.0, 2.0, 3.0));
        mesh.positions.push(Point3::new(4.0, 5.0, 6.0));
        mesh.tex_coords.push(Point2::new(0.1, 0.2));
        mesh.tex_coords.push(Point2::new(0.3, 0.4));

        assert_eq!(mesh.flat_positions(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(mesh.flat_tex_coords(), vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(mesh.vertex_count(), 2);
        assert!(mesh.is_textured());
    }

    #[test]
    fn test_point_mesh() {
        let mesh = SurfaceMesh::point(Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.layout, MeshLayout::Points);
        assert_eq!(mesh.vertex_count(), 1);
        assert!(!mesh.is_textured());
    }
}
