//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in area coordinates.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::vertex::Vertex;
use crate::sim::{Entity, FlowField, ShapeKind, Trail};

/// Segments used to approximate an ellipse outline
pub const ELLIPSE_SEGMENTS: u32 = 32;
/// Segments per rounded rectangle corner
pub const CORNER_SEGMENTS: u32 = 6;
/// Width of flow field heading lines
const FLOW_LINE_WIDTH: f32 = 1.0;

/// Something that can emit its own geometry at a given position
pub trait Drawable {
    fn draw(&self, position: Vec2) -> Vec<Vertex>;
}

impl Drawable for Entity {
    /// Outline for the entity's shape, rotated by its spin angle, fanned
    /// from `position`. Alpha comes from the current (possibly faded) color.
    fn draw(&self, position: Vec2) -> Vec<Vertex> {
        let half = self.extents / 2.0;
        let outline = match self.shape {
            ShapeKind::Ellipse => ellipse_outline(half, ELLIPSE_SEGMENTS),
            ShapeKind::Polygon { sides } => ellipse_outline(half, sides.max(3)),
            ShapeKind::Triangle => vec![
                Vec2::new(-half.x, -half.y),
                Vec2::new(-half.x, half.y),
                Vec2::new(half.x, 0.0),
            ],
            ShapeKind::Rect { corner_radius } => rect_outline(half, corner_radius),
        };

        let rotation = Vec2::from_angle(self.spin.map(|s| s.value).unwrap_or(0.0));
        let points: Vec<Vec2> = outline
            .into_iter()
            .map(|p| position + rotation.rotate(p))
            .collect();
        fan(position, &points, self.color.to_f32())
    }
}

/// Closed outline of an axis-aligned ellipse with the given half-extents
fn ellipse_outline(half: Vec2, segments: u32) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * TAU;
            Vec2::new(half.x * theta.cos(), half.y * theta.sin())
        })
        .collect()
}

/// Rectangle outline; corners are rounded when `corner_radius > 0`
fn rect_outline(half: Vec2, corner_radius: f32) -> Vec<Vec2> {
    let r = corner_radius.min(half.x).min(half.y);
    if r <= 0.0 {
        return vec![
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ];
    }

    // Corner centres in winding order, each sweeping a quarter turn
    let inner = half - Vec2::splat(r);
    let corners = [
        (Vec2::new(inner.x, inner.y), 0.0),
        (Vec2::new(-inner.x, inner.y), FRAC_PI_2),
        (Vec2::new(-inner.x, -inner.y), 2.0 * FRAC_PI_2),
        (Vec2::new(inner.x, -inner.y), 3.0 * FRAC_PI_2),
    ];
    let mut points = Vec::with_capacity(corners.len() * (CORNER_SEGMENTS as usize + 1));
    for (centre, start) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let theta = start + i as f32 / CORNER_SEGMENTS as f32 * FRAC_PI_2;
            points.push(centre + Vec2::new(r * theta.cos(), r * theta.sin()));
        }
    }
    points
}

/// Triangle fan from `center` around a closed outline
fn fan(center: Vec2, outline: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for (i, &p1) in outline.iter().enumerate() {
        let p2 = outline[(i + 1) % outline.len()];
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(p1, color));
        vertices.push(Vertex::at(p2, color));
    }
    vertices
}

/// Two triangles covering the segment `a`..`b` with the given half-width
fn quad(a: Vec2, b: Vec2, half_width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x);

    let v1a = a + perp * half_width;
    let v1b = a - perp * half_width;
    let v2a = b + perp * half_width;
    let v2b = b - perp * half_width;

    vec![
        Vertex::at(v1a, color),
        Vertex::at(v1b, color),
        Vertex::at(v2a, color),
        Vertex::at(v2a, color),
        Vertex::at(v1b, color),
        Vertex::at(v2b, color),
    ]
}

/// One half-cell line per flow field cell, pointing along its heading
pub fn flowfield_lines(field: &FlowField, color: [f32; 4]) -> Vec<Vertex> {
    let reach = field.cell_size() / 2.0;
    let mut vertices = Vec::with_capacity(field.cells().len() * 6);
    for cell in field.cells() {
        let tip = cell.position + cell.velocity * reach;
        vertices.extend(quad(cell.position, tip, FLOW_LINE_WIDTH / 2.0, color));
    }
    vertices
}

/// Thin quad for a trail; collapsed trails produce nothing
pub fn trail_segment(trail: &Trail, width: f32) -> Vec<Vertex> {
    quad(trail.start, trail.end, width / 2.0, trail.color.to_f32())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlowFieldConfig;
    use crate::sim::Rgba;

    fn shaped(shape: ShapeKind, w: f32, h: f32) -> Entity {
        Entity::new(Vec2::ZERO, Vec2::new(w, h))
            .unwrap()
            .with_shape(shape)
            .unwrap()
    }

    fn max_x(vertices: &[Vertex]) -> f32 {
        vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max)
    }

    #[test]
    fn test_ellipse_fan() {
        let e = shaped(ShapeKind::Ellipse, 20.0, 10.0);
        let verts = e.draw(Vec2::new(100.0, 100.0));
        assert_eq!(verts.len(), ELLIPSE_SEGMENTS as usize * 3);
        assert!((max_x(&verts) - 110.0).abs() < 1e-4);
        for v in &verts {
            let p = Vec2::from(v.position) - Vec2::new(100.0, 100.0);
            // Inside or on the ellipse
            assert!((p.x / 10.0).powi(2) + (p.y / 5.0).powi(2) <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_triangle_points_along_heading() {
        let e = shaped(ShapeKind::Triangle, 10.0, 6.0);
        let verts = e.draw(Vec2::ZERO);
        assert_eq!(verts.len(), 9);
        assert!((max_x(&verts) - 5.0).abs() < 1e-5);

        // A quarter-turn spin points the tip along +y
        let spun = e.with_spin(FRAC_PI_2, 0.0);
        let verts = spun.draw(Vec2::ZERO);
        let max_y = verts.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_polygon_sides() {
        let e = shaped(ShapeKind::Polygon { sides: 6 }, 10.0, 10.0);
        assert_eq!(e.draw(Vec2::ZERO).len(), 18);
    }

    #[test]
    fn test_rect_corners() {
        let sharp = shaped(ShapeKind::Rect { corner_radius: 0.0 }, 8.0, 4.0);
        let verts = sharp.draw(Vec2::ZERO);
        assert_eq!(verts.len(), 12);
        assert!((max_x(&verts) - 4.0).abs() < 1e-5);

        let rounded = shaped(ShapeKind::Rect { corner_radius: 1.0 }, 8.0, 4.0);
        let verts = rounded.draw(Vec2::ZERO);
        assert_eq!(verts.len(), 4 * (CORNER_SEGMENTS as usize + 1) * 3);
        assert!((max_x(&verts) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_faded_alpha_reaches_vertices() {
        let mut e = shaped(ShapeKind::Ellipse, 4.0, 4.0);
        e.color = Rgba::new(255, 0, 0, 0);
        let verts = e.draw(Vec2::ZERO);
        assert!(verts.iter().all(|v| v.color == [1.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_flowfield_lines() {
        let cfg = FlowFieldConfig {
            cell_size: 50.0,
            ..Default::default()
        };
        let field = FlowField::new(100.0, 100.0, &cfg).unwrap();
        let verts = flowfield_lines(&field, [1.0; 4]);
        assert_eq!(verts.len(), 4 * 6);
        // Initial headings point along +x: first line spans x 25..50
        assert!((verts[2].position[0] - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_trail_segment() {
        let trail = Trail::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let verts = trail_segment(&trail, 2.0);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].position, [0.0, 1.0]);

        let collapsed = Trail::new(Vec2::ONE, Vec2::ONE);
        assert!(trail_segment(&collapsed, 2.0).is_empty());
    }
}
