//! Circle geometry used by the overlap test.

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub const fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        PI * self.r * self.r
    }

    #[inline]
    pub fn distance(&self, other: &Circle) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// True when the circle lies fully inside `[0, width] x [0, height]`.
    #[inline]
    pub fn inside(&self, width: f64, height: f64) -> bool {
        self.x >= self.r
            && self.x <= width - self.r
            && self.y >= self.r
            && self.y <= height - self.r
    }
}

/// Area of the lens shared by two circles.
///
/// Disjoint or tangent circles share nothing; a circle contained in the other
/// shares its whole area. Otherwise the lens is the two circular sectors minus
/// the kite spanned by both centers and the two intersection points.
pub fn intersection_area(a: &Circle, b: &Circle) -> f64 {
    let d = a.distance(b);
    let (r1, r2) = (a.r, b.r);
    if d >= r1 + r2 {
        return 0.0;
    }
    if d <= (r1 - r2).abs() {
        let r = r1.min(r2);
        return PI * r * r;
    }
    let (r1sq, r2sq, dsq) = (r1 * r1, r2 * r2, d * d);
    let alpha = ((dsq + r1sq - r2sq) / (2.0 * d * r1)).clamp(-1.0, 1.0).acos();
    let beta = ((dsq + r2sq - r1sq) / (2.0 * d * r2)).clamp(-1.0, 1.0).acos();
    let kite = 0.5
        * ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2))
            .max(0.0)
            .sqrt();
    (r1sq * alpha + r2sq * beta - kite).max(0.0)
}

/// Shared area as a fraction of each circle's own area, `(of_a, of_b)`.
pub fn overlap_fractions(a: &Circle, b: &Circle) -> (f64, f64) {
    let inter = intersection_area(a, b);
    if inter == 0.0 {
        return (0.0, 0.0);
    }
    (fraction(inter, a.area()), fraction(inter, b.area()))
}

fn fraction(inter: f64, area: f64) -> f64 {
    if area > 0.0 { inter / area } else { f64::INFINITY }
}

/// Both overlap fractions are within `overlap_max`.
#[inline]
pub fn overlap_within(a: &Circle, b: &Circle, overlap_max: f64) -> bool {
    let (fa, fb) = overlap_fractions(a, b);
    fa <= overlap_max && fb <= overlap_max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lens_of_two_unit_circles_one_apart() {
        let a = Circle::new(0.0, 0.0, 1.0);
        let b = Circle::new(1.0, 0.0, 1.0);
        let want = 2.0 * PI / 3.0 - 3f64.sqrt() / 2.0;
        assert!((intersection_area(&a, &b) - want).abs() < 1e-12);
    }

    #[test]
    fn lens_is_symmetric() {
        let a = Circle::new(3.0, 4.0, 5.0);
        let b = Circle::new(9.0, 1.0, 2.5);
        let ab = intersection_area(&a, &b);
        let ba = intersection_area(&b, &a);
        assert!(ab > 0.0);
        assert!((ab - ba).abs() < 1e-9);
    }
}
