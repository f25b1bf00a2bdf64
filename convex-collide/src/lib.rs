//! Narrow-phase collision detection for convex 2D polygons.
//!
//! Detects overlap between two convex polygons with the Separating Axis
//! Theorem and, for overlapping pairs, computes a Minimum Translation
//! Vector - the smallest displacement that separates them. The crate does
//! no rendering, input handling or broad-phase culling; callers hand in
//! polygon data each tick and take the corrected position back out.

use std::{error, fmt, ops};

pub mod sat;

pub use sat::{collides, mtv_between, project, resolve, Mtv, Projection};

/// A point or a vector in the 2D space.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl ops::Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl ops::Div<f32> for Vec2 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        Vec2 {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Dot product of myself and another 2D vector.
    pub fn dot(&self, rhs: &Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// The magnitude of this 2D vector.
    pub fn magnitude(&self) -> f32 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }

    /// Normalize this 2D vector to unit length.
    pub fn normalize(&self) -> Self {
        *self / self.magnitude()
    }
}

/// Perpendicular of the directed edge `a` -> `b`, *not* normalized to unit
/// length.
///
/// Whether it points into or out of a polygon depends on the vertex winding;
/// callers must not assume outward-facing without checking the winding order.
pub fn edge_normal(a: Vec2, b: Vec2) -> Vec2 {
    Vec2 {
        x: -(a.y - b.y),
        y: a.x - b.x,
    }
}

/// Unit-length perpendicular of the directed edge `a` -> `b`.
///
/// Fails on coincident endpoints rather than dividing by zero.
pub fn unit_edge_normal(a: Vec2, b: Vec2) -> Result<Vec2, DegenerateShape> {
    let length = (b - a).magnitude();
    if length == 0. {
        return Err(DegenerateShape::ZeroLengthEdge(0));
    }
    Ok(edge_normal(a, b) / length)
}

/// Malformed geometry that would poison the collision math with NaNs.
///
/// Rejected when a [`Polygon`] is constructed, never silently clamped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DegenerateShape {
    /// A polygon needs at least 3 vertices.
    TooFewVertices(usize),
    /// The edge starting at this vertex index has coincident endpoints, so
    /// its normal cannot be normalized.
    ZeroLengthEdge(usize),
    /// An empty vertex set was handed to a projection.
    NoVertices,
}

impl fmt::Display for DegenerateShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegenerateShape::TooFewVertices(count) => {
                write!(f, "polygon needs at least 3 vertices, got {count}")
            }
            DegenerateShape::ZeroLengthEdge(index) => {
                write!(f, "edge starting at vertex {index} has zero length")
            }
            DegenerateShape::NoVertices => write!(f, "cannot project an empty vertex set"),
        }
    }
}

impl error::Error for DegenerateShape {}

/// A convex 2D polygon: a world-space position plus local-space vertices.
///
/// Vertices are wound consistently (the constructors produce clockwise in
/// screen space). Convexity is the caller's responsibility and is not
/// validated; vertex count and edge lengths are.
#[derive(Clone, PartialEq, Debug)]
pub struct Polygon {
    /// World-space origin of the polygon.
    pub position: Vec2,
    vertices: Vec<Vec2>,
}

impl Polygon {
    /// Create a polygon from local-space vertices.
    ///
    /// Rejects fewer than 3 vertices and any zero-length edge.
    pub fn new(position: Vec2, vertices: Vec<Vec2>) -> Result<Polygon, DegenerateShape> {
        if vertices.len() < 3 {
            return Err(DegenerateShape::TooFewVertices(vertices.len()));
        }
        for (i, (a, b)) in edges(&vertices).enumerate() {
            if a == b {
                return Err(DegenerateShape::ZeroLengthEdge(i));
            }
        }
        Ok(Polygon { position, vertices })
    }

    /// An axis-aligned box with the given full side lengths, centered on the
    /// local origin.
    pub fn axis_box(position: Vec2, width: f32, height: f32) -> Result<Polygon, DegenerateShape> {
        let half = Vec2::new(width / 2., height / 2.);
        Polygon::new(
            position,
            vec![
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ],
        )
    }

    /// A regular polygon with `sides` vertices, each `scale` away from the
    /// local origin, wound clockwise in screen space.
    pub fn regular(position: Vec2, sides: usize, scale: Vec2) -> Result<Polygon, DegenerateShape> {
        if sides < 3 {
            return Err(DegenerateShape::TooFewVertices(sides));
        }
        let increment = std::f32::consts::PI * 2. / sides as f32;
        let vertices = (0..sides)
            .map(|i| {
                let angle = i as f32 * increment;
                Vec2::new(angle.sin() * scale.x, angle.cos() * -scale.y)
            })
            .collect();
        Polygon::new(position, vertices)
    }

    /// The local-space vertices.
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// The world-space vertices, derived from position on every call - never
    /// cached.
    pub fn global_vertices(&self) -> Vec<Vec2> {
        self.vertices.iter().map(|v| *v + self.position).collect()
    }

    /// Check if this polygon overlaps another one. Touching edges do not
    /// count as overlapping.
    pub fn collides_with(&self, other: &Polygon) -> bool {
        sat::collides(self, other)
    }

    /// Push this polygon out of `collider` by the minimum translation
    /// vector, if the two overlap. Returns the applied displacement.
    pub fn resolve_against(&mut self, collider: &Polygon) -> Option<Vec2> {
        sat::resolve(self, collider)
    }
}

/// An iterator over the edges of a vertex loop, as ordered endpoint pairs.
/// The last vertex connects back to the first.
pub struct Edges<'a> {
    vertices: &'a [Vec2],
    current_index: usize,
}

impl Iterator for Edges<'_> {
    type Item = (Vec2, Vec2);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index == self.vertices.len() {
            return None;
        }
        let a = self.vertices[self.current_index];
        let b = self.vertices[(self.current_index + 1) % self.vertices.len()];
        self.current_index += 1;
        Some((a, b))
    }
}

/// Iterate over the edges of a vertex loop.
pub fn edges(vertices: &[Vec2]) -> Edges<'_> {
    Edges {
        vertices,
        current_index: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_normal_is_perpendicular() {
        let a = Vec2::new(1., 2.);
        let b = Vec2::new(4., -3.);
        let n = edge_normal(a, b);
        assert_eq!(0., n.dot(&(b - a)));
    }

    #[test]
    fn unit_edge_normal_has_unit_length() {
        let n = unit_edge_normal(Vec2::new(0., 0.), Vec2::new(3., 4.)).unwrap();
        assert!((n.magnitude() - 1.).abs() < 1e-6);
    }

    #[test]
    fn unit_edge_normal_rejects_coincident_points() {
        let p = Vec2::new(2., 2.);
        assert_eq!(
            Err(DegenerateShape::ZeroLengthEdge(0)),
            unit_edge_normal(p, p)
        );
    }

    #[test]
    fn too_few_vertices_rejected() {
        let result = Polygon::new(
            Vec2::default(),
            vec![Vec2::new(0., 0.), Vec2::new(1., 0.)],
        );
        assert_eq!(Err(DegenerateShape::TooFewVertices(2)), result);
        assert_eq!(
            Err(DegenerateShape::TooFewVertices(2)),
            Polygon::regular(Vec2::default(), 2, Vec2::new(1., 1.))
        );
    }

    #[test]
    fn zero_length_edge_rejected() {
        let result = Polygon::new(
            Vec2::default(),
            vec![
                Vec2::new(0., 0.),
                Vec2::new(1., 0.),
                Vec2::new(1., 0.),
                Vec2::new(0., 1.),
            ],
        );
        assert_eq!(Err(DegenerateShape::ZeroLengthEdge(1)), result);
    }

    #[test]
    fn global_vertices_offset_by_position() {
        let p = Polygon::axis_box(Vec2::new(10., -5.), 2., 2.).unwrap();
        let globals = p.global_vertices();
        assert_eq!(4, globals.len());
        assert_eq!(Vec2::new(9., -6.), globals[0]);
        assert_eq!(Vec2::new(11., -4.), globals[2]);
    }

    #[test]
    fn regular_polygon_vertices_equidistant() {
        let sides = 7;
        let p = Polygon::regular(Vec2::default(), sides, Vec2::new(32., 32.)).unwrap();
        assert_eq!(sides, p.vertices().len());
        for v in p.vertices() {
            assert!((v.magnitude() - 32.).abs() < 1e-4);
        }
    }

    #[test]
    fn edges_close_the_loop() {
        let p = Polygon::axis_box(Vec2::default(), 2., 2.).unwrap();
        let pairs: Vec<_> = edges(p.vertices()).collect();
        assert_eq!(4, pairs.len());
        assert_eq!(pairs[3].1, pairs[0].0);
    }
}
