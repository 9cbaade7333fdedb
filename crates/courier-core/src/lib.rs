pub mod geometry;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::geometry::Aabb;

    /// Build an AABB from its center point, the way actor hit-boxes are
    /// usually positioned in tests.
    pub fn aabb_centered(cx: f32, cy: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    /// Assert two floats are within `eps` of each other.
    pub fn assert_close(a: f32, b: f32, eps: f32) {
        assert!(
            (a - b).abs() <= eps,
            "expected {a} and {b} to be within {eps}"
        );
    }
}
