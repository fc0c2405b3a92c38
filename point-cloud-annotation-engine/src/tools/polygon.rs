//! 2D polygon primitives behind the region selector: winding-number
//! containment, convex hulls, and a boundary-segment union used to inflate
//! selection outlines.

use bevy::prelude::*;

const STITCH_EPSILON: f32 = 1e-5;

/// Winding number of `polygon` around `point`. Non-zero means inside; robust
/// to self-intersecting outlines.
pub fn winding_number(point: Vec2, polygon: &[Vec2]) -> i32 {
    let mut winding = 0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        if a.y <= point.y {
            if b.y > point.y && cross(b - a, point - a) > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && cross(b - a, point - a) < 0.0 {
            winding -= 1;
        }
    }
    winding
}

pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    polygon.len() >= 3 && winding_number(point, polygon) != 0
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Convex hull by monotone chain, counter-clockwise, without the closing
/// vertex. Non-finite input points are dropped; fewer than 3 distinct
/// survivors yield no hull.
pub fn convex_hull(points: &[Vec2]) -> Option<Vec<Vec2>> {
    let mut sorted: Vec<Vec2> = points.iter().copied().filter(|p| p.is_finite()).collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|a, b| (*a - *b).length() < STITCH_EPSILON);
    if sorted.len() < 3 {
        return None;
    }

    let mut hull: Vec<Vec2> = Vec::with_capacity(sorted.len() * 2);
    for pass in 0..2 {
        let start = hull.len();
        let iter: Box<dyn Iterator<Item = &Vec2> + '_> = if pass == 0 {
            Box::new(sorted.iter())
        } else {
            Box::new(sorted.iter().rev())
        };
        for p in iter {
            while hull.len() >= start + 2
                && cross(
                    hull[hull.len() - 1] - hull[hull.len() - 2],
                    *p - hull[hull.len() - 2],
                ) <= 0.0
            {
                hull.pop();
            }
            hull.push(*p);
        }
        hull.pop();
    }
    (hull.len() >= 3).then_some(hull)
}

/// Closed regular n-gon approximating a disc.
pub fn regular_ngon(center: Vec2, radius: f32, segments: usize) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Signed area of a polygon (positive when counter-clockwise).
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    let mut area = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        area += cross(a, b);
    }
    area * 0.5
}

/// Boundary-segment union of two simple polygons: every edge is split at the
/// crossings with the other polygon, sub-segments strictly inside the other
/// polygon are discarded, and the survivors are stitched back into loops.
/// Returns the outer boundary (the loop with the largest area), or `None`
/// for degenerate input.
pub fn union_boundary(a: &[Vec2], b: &[Vec2]) -> Option<Vec<Vec2>> {
    if a.len() < 3 {
        return (b.len() >= 3).then(|| b.to_vec());
    }
    if b.len() < 3 {
        return Some(a.to_vec());
    }

    let mut segments = Vec::new();
    collect_outside_segments(a, b, &mut segments, true);
    collect_outside_segments(b, a, &mut segments, false);
    let loops = stitch_loops(segments);
    loops
        .into_iter()
        .max_by(|x, y| polygon_area(x).abs().total_cmp(&polygon_area(y).abs()))
}

/// Splits `poly`'s edges at crossings with `other` and keeps the sub-segments
/// outside `other`. A sub-segment riding exactly on `other`'s boundary
/// (coincident edges) belongs to the union boundary once, so it is kept from
/// the first polygon only.
fn collect_outside_segments(
    poly: &[Vec2],
    other: &[Vec2],
    out: &mut Vec<(Vec2, Vec2)>,
    keep_boundary: bool,
) {
    for i in 0..poly.len() {
        let p0 = poly[i];
        let p1 = poly[(i + 1) % poly.len()];

        let mut cuts = vec![0.0, 1.0];
        for j in 0..other.len() {
            let q0 = other[j];
            let q1 = other[(j + 1) % other.len()];
            if let Some(t) = segment_intersection_t(p0, p1, q0, q1) {
                cuts.push(t);
            }
        }
        cuts.sort_by(|x, y| x.total_cmp(y));
        cuts.dedup_by(|x, y| (*x - *y).abs() < STITCH_EPSILON);

        for pair in cuts.windows(2) {
            let start = p0.lerp(p1, pair[0]);
            let end = p0.lerp(p1, pair[1]);
            if (end - start).length() < STITCH_EPSILON {
                continue;
            }
            let mid = start.lerp(end, 0.5);
            if on_boundary(mid, other) {
                if keep_boundary {
                    out.push((start, end));
                }
            } else if winding_number(mid, other) == 0 {
                out.push((start, end));
            }
        }
    }
}

fn on_boundary(point: Vec2, polygon: &[Vec2]) -> bool {
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let ab = b - a;
        let t = (point - a).dot(ab) / ab.length_squared().max(f32::EPSILON);
        let nearest = a + ab * t.clamp(0.0, 1.0);
        if (point - nearest).length() < STITCH_EPSILON * 10.0 {
            return true;
        }
    }
    false
}

/// Parameter along `p0..p1` of a proper crossing with `q0..q1`.
fn segment_intersection_t(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> Option<f32> {
    let r = p1 - p0;
    let s = q1 - q0;
    let denom = cross(r, s);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = cross(q0 - p0, s) / denom;
    let u = cross(q0 - p0, r) / denom;
    ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)).then_some(t)
}

fn stitch_loops(mut segments: Vec<(Vec2, Vec2)>) -> Vec<Vec<Vec2>> {
    let mut loops = Vec::new();
    while let Some((start, mut cursor)) = segments.pop() {
        let mut ring = vec![start, cursor];
        loop {
            let next = segments
                .iter()
                .position(|(s, _)| (*s - cursor).length() < STITCH_EPSILON * 10.0)
                .or_else(|| {
                    segments
                        .iter()
                        .position(|(_, e)| (*e - cursor).length() < STITCH_EPSILON * 10.0)
                });
            let Some(index) = next else {
                break;
            };
            let (s, e) = segments.swap_remove(index);
            cursor = if (s - cursor).length() < (e - cursor).length() {
                e
            } else {
                s
            };
            if (cursor - start).length() < STITCH_EPSILON * 10.0 {
                break;
            }
            ring.push(cursor);
        }
        if ring.len() >= 3 {
            loops.push(ring);
        }
    }
    loops
}

/// Inflates a convex hull by unioning a disc polygon onto every hull vertex
/// and keeping the outer boundary.
pub fn inflate_hull(hull: &[Vec2], radius: f32, segments: usize) -> Option<Vec<Vec2>> {
    if hull.len() < 3 {
        return None;
    }
    let mut boundary = hull.to_vec();
    for vertex in hull {
        let disc = regular_ngon(*vertex, radius, segments);
        boundary = union_boundary(&boundary, &disc)?;
    }
    Some(boundary)
}
