//! Separating Axis Theorem overlap tests and minimum-translation-vector
//! resolution.
//!
//! Two convex shapes are disjoint iff some edge normal of either shape
//! separates their projections. The MTV is found by scanning the collider's
//! edge normals for the axis of minimal penetration, once in each direction
//! of the pair, and keeping the shallower of the two responses.

use tracing::instrument;

use crate::{edge_normal, edges, DegenerateShape, Polygon, Vec2};

/// The projection of a vertex set onto an axis: a scalar interval with
/// `start <= end`. Transient - recomputed on every query, never cached.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Projection {
    pub start: f32,
    pub end: f32,
}

impl Projection {
    /// Checks if myself and the given projection overlap.
    ///
    /// Strict on both ends: intervals that merely touch do *not* overlap, so
    /// shapes in edge contact count as just separated.
    pub fn overlaps(&self, rhs: &Self) -> bool {
        self.start < rhs.end && self.end > rhs.start
    }
}

/// Project a vertex set onto an axis.
///
/// The axis need not be unit length; the interval is then in units of the
/// axis's own magnitude, which is fine as long as both shapes of a
/// comparison are projected onto the same axis. Penetration *depths* are
/// only meaningful for unit axes, so the MTV solver normalizes first.
#[instrument]
pub fn project(vertices: &[Vec2], axis: Vec2) -> Result<Projection, DegenerateShape> {
    let (first, rest) = vertices.split_first().ok_or(DegenerateShape::NoVertices)?;
    let mut start = axis.dot(first);
    let mut end = start;
    for v in rest {
        let p = axis.dot(v);
        if p < start {
            start = p;
        } else if p > end {
            end = p;
        }
    }
    Ok(Projection { start, end })
}

/// Infallible projection for vertex sets known to be non-empty, i.e. taken
/// from a validated [`Polygon`].
fn project_shape(vertices: &[Vec2], axis: Vec2) -> Projection {
    let mut start = axis.dot(&vertices[0]);
    let mut end = start;
    for v in &vertices[1..] {
        let p = axis.dot(v);
        if p < start {
            start = p;
        } else if p > end {
            end = p;
        }
    }
    Projection { start, end }
}

/// One-sided SAT pass: test every edge normal of `s1` as a candidate
/// separating axis. Returns false as soon as one separates the shapes.
///
/// SAT needs the edge normals of *both* shapes, so a single pass proves
/// nothing on its own; [`collides`] runs it in both directions.
fn overlap_one_sided(s1: &[Vec2], s2: &[Vec2]) -> bool {
    for (a, b) in edges(s1) {
        let axis = edge_normal(a, b);
        let p1 = project_shape(s1, axis);
        let p2 = project_shape(s2, axis);
        if !p1.overlaps(&p2) {
            return false;
        }
    }
    true
}

/// Check if two convex polygons overlap, via SAT over the edge normals of
/// both shapes. Touching edges do not count as overlapping.
pub fn collides(p1: &Polygon, p2: &Polygon) -> bool {
    let s1 = p1.global_vertices();
    let s2 = p2.global_vertices();
    overlap_one_sided(&s1, &s2) && overlap_one_sided(&s2, &s1)
}

/// A minimum translation vector: move the mover by `normal * magnitude` to
/// achieve minimal separation along `normal`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Mtv {
    /// Unit-length axis of minimal penetration.
    pub normal: Vec2,
    /// Signed push-out distance along `normal`.
    pub magnitude: f32,
}

impl Mtv {
    /// The displacement this MTV asks for.
    pub fn displacement(&self) -> Vec2 {
        self.normal * self.magnitude
    }
}

/// The signed correction that pushes `mover`'s interval out of `collider`'s
/// through the nearer boundary, or `None` if the intervals don't overlap on
/// this axis (the axis separates the shapes).
pub fn axis_response(mover: Projection, collider: Projection) -> Option<f32> {
    let to_collider_start = collider.start - mover.end;
    if to_collider_start > 0. {
        return None;
    }
    let to_collider_end = collider.end - mover.start;
    if to_collider_end < 0. {
        return None;
    }
    // to_collider_start is <= 0 here, so negate it for the comparison.
    if -to_collider_start < to_collider_end {
        Some(to_collider_start)
    } else {
        Some(to_collider_end)
    }
}

/// One-sided MTV: scan the *collider's* edge normals for the axis on which
/// pushing the mover out takes the least travel.
///
/// Returns `None` as soon as any axis separates the shapes. Because the axes
/// come from one shape only, the result can miss the true minimum;
/// [`resolve`] runs the scan in both directions and reconciles.
pub fn mtv_between(mover: &Polygon, collider: &Polygon) -> Option<Mtv> {
    mtv_between_shapes(&mover.global_vertices(), &collider.global_vertices())
}

fn mtv_between_shapes(mover: &[Vec2], collider: &[Vec2]) -> Option<Mtv> {
    let mut min_response = f32::INFINITY;
    let mut min_normal = Vec2::default();
    for (a, b) in edges(collider) {
        // Edge lengths are validated at Polygon construction, so the
        // normalization cannot divide by zero.
        let axis = edge_normal(a, b) / (b - a).magnitude();
        let m_projected = project_shape(mover, axis);
        let c_projected = project_shape(collider, axis);
        let response = axis_response(m_projected, c_projected)?;
        if response.abs() < min_response.abs() {
            min_response = response;
            min_normal = axis;
        }
    }
    if !min_response.is_finite() {
        return None;
    }
    Some(Mtv {
        normal: min_normal,
        magnitude: min_response,
    })
}

/// Push `mover` out of `collider` by the minimum translation vector.
///
/// Combines both one-sided MTVs: the true separating axis is whichever
/// direction found the shallower penetration. A single discrete position
/// correction - no iteration, no effect on any velocity. Returns the applied
/// displacement, or `None` if the shapes don't overlap.
#[instrument]
pub fn resolve(mover: &mut Polygon, collider: &Polygon) -> Option<Vec2> {
    let r1 = mtv_between(mover, collider)?;
    let mut r2 = mtv_between(collider, mover)?;
    // r2 was computed from the collider's frame; flip it to push the mover.
    r2.normal = -r2.normal;

    let min = if r2.magnitude.abs() < r1.magnitude.abs() {
        r2
    } else {
        r1
    };
    if !min.magnitude.is_finite() {
        return None;
    }

    let displacement = min.displacement();
    mover.position += displacement;
    Some(displacement)
}
