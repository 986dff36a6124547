use crate::Vector2;

/// Finds the intersection point of two lines.
///
/// Each line is defined by a point and a direction vector. Returns None if the lines
/// are parallel.
pub fn find_intersection(
    point1: Vector2,
    direction1: Vector2,
    point2: Vector2,
    direction2: Vector2,
) -> Option<Vector2> {
    let det = direction1.x * direction2.y - direction1.y * direction2.x;
    if det.abs() < 1e-10 {
        return None;
    }

    let dp = point2 - point1;
    let t = (dp.x * direction2.y - dp.y * direction2.x) / det;
    Some(point1 + t * direction1)
}

/// Closest point to `p` on the segment `a`-`b`.
pub fn closest_point_on_segment(a: Vector2, b: Vector2, p: Vector2) -> Vector2 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

pub fn distance_to_segment(a: Vector2, b: Vector2, p: Vector2) -> f64 {
    (closest_point_on_segment(a, b, p) - p).norm()
}

/// Whether the segment `a`-`b` passes within `radius` of `center`.
pub fn segment_hits_circle(a: Vector2, b: Vector2, center: Vector2, radius: f64) -> bool {
    distance_to_segment(a, b, center) < radius
}

/// Point at `distance` from `from` in the direction of `towards`. Returns `from` when
/// both points coincide.
pub fn point_towards(from: Vector2, towards: Vector2, distance: f64) -> Vector2 {
    let d = towards - from;
    let n = d.norm();
    if n < 1e-9 {
        return from;
    }
    from + d * (distance / n)
}
