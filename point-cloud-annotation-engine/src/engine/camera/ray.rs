use bevy::prelude::*;

/// Ray against an oriented box: transform into box-local space and run the
/// slab test against the centered AABB.
pub fn ray_hits_obb(origin: Vec3, dir: Vec3, transform: Mat4, size: Vec3) -> Option<f32> {
    let inv = transform.inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    let he = size * 0.5;
    ray_aabb_hit_t(o_local, d_local, -he, he)
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let (mut tmin, mut tmax) = ((min.x - ray_origin.x) * inv.x, (max.x - ray_origin.x) * inv.x);
    if tmin > tmax { std::mem::swap(&mut tmin, &mut tmax); }

    let (mut tymin, mut tymax) = ((min.y - ray_origin.y) * inv.y, (max.y - ray_origin.y) * inv.y);
    if tymin > tymax { std::mem::swap(&mut tymin, &mut tymax); }

    if (tmin > tymax) || (tymin > tmax) { return None; }
    if tymin > tmin { tmin = tymin; }
    if tymax < tmax { tmax = tymax; }

    let (mut tzmin, mut tzmax) = ((min.z - ray_origin.z) * inv.z, (max.z - ray_origin.z) * inv.z);
    if tzmin > tzmax { std::mem::swap(&mut tzmin, &mut tzmax); }

    if (tmin > tzmax) || (tzmin > tmax) { return None; }
    if tzmin > tmin { tmin = tzmin; }
    if tzmax < tmax { tmax = tzmax; }

    if tmax < 0.0 { return None; }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Ray against an infinite plane, front or back side.
pub fn ray_plane_hit(origin: Vec3, dir: Vec3, plane_point: Vec3, plane_normal: Vec3) -> Option<Vec3> {
    let denom = dir.dot(plane_normal);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (plane_point - origin).dot(plane_normal) / denom;
    (t > 0.0).then(|| origin + dir * t)
}

/// Shortest distance from a point to the ray's supporting line, for marker
/// hit-testing. Points behind the ray origin report infinity.
pub fn ray_point_distance(origin: Vec3, dir: Vec3, point: Vec3) -> f32 {
    let dir = dir.normalize_or_zero();
    let t = (point - origin).dot(dir);
    if t < 0.0 {
        return f32::INFINITY;
    }
    (origin + dir * t - point).length()
}
