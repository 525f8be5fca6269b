//! Geometric kernel over 2D landmark positions.
//!
//! Every function here is pure and total: degenerate input resolves to a
//! defined value instead of an error. Only the XY plane is used.

use nalgebra::Vector2;

use crate::types::Point;

fn planar(from: &Point, to: &Point) -> Vector2<f64> {
    Vector2::new(to.x - from.x, to.y - from.y)
}

/// Angle ABC at vertex `b`, in degrees within [0, 180].
///
/// Returns 0.0 when either ray has zero length. Callers should read that as
/// "indeterminate", not as a real measurement.
pub fn angle(a: &Point, b: &Point, c: &Point) -> f64 {
    let ba = planar(b, a);
    let bc = planar(b, c);
    let norms = ba.norm() * bc.norm();
    if norms == 0.0 {
        return 0.0;
    }
    (ba.dot(&bc) / norms).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Euclidean distance in the XY plane.
pub fn distance(a: &Point, b: &Point) -> f64 {
    planar(a, b).norm()
}

/// Mean of X and Y. Z and visibility are not propagated.
pub fn midpoint(a: &Point, b: &Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Inclination of the shoulder->hip segment from horizontal, in [0, 180].
///
/// 0 or 180 is horizontal, 90 is upright. Coincident points give 0.
pub fn torso_incline(shoulder_mid: &Point, hip_mid: &Point) -> f64 {
    let v = planar(shoulder_mid, hip_mid);
    if v.x == 0.0 && v.y == 0.0 {
        return 0.0;
    }
    v.y.atan2(v.x).to_degrees().abs().min(180.0)
}

/// Wrap an angle into [0, 360).
pub fn normalize_angle(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
