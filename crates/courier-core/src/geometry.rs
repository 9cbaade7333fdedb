use serde::{Deserialize, Serialize};

/// Axis-aligned box in world pixels. Origin is top-left, +y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Horizontal overlap amount; positive only when the boxes overlap on x.
    pub fn overlap_x(&self, other: &Aabb) -> f32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }

    /// Vertical overlap amount; positive only when the boxes overlap on y.
    pub fn overlap_y(&self, other: &Aabb) -> f32 {
        self.bottom().min(other.bottom()) - self.top().max(other.top())
    }
}

/// Which way gravity currently pulls. Flips instantaneously, never blends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityDir {
    /// Normal gravity: pulls toward increasing y (the floor).
    #[default]
    Down,
    /// Inverted gravity: pulls toward decreasing y (the ceiling).
    Up,
}

impl GravityDir {
    /// Signed factor for integration: +1 pulls down-screen, -1 up-screen.
    pub fn sign(&self) -> f32 {
        match self {
            GravityDir::Down => 1.0,
            GravityDir::Up => -1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            GravityDir::Down => GravityDir::Up,
            GravityDir::Up => GravityDir::Down,
        }
    }
}

/// A contact side, from the point of view of the tile being touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Up,
    Down,
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersects_is_exclusive_at_edges() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let touching = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Aabb::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.intersects(&touching), "edge contact is not intersection");
        assert!(a.intersects(&overlapping));
    }

    #[test]
    fn overlap_amounts() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(6.0, 8.0, 10.0, 10.0);
        assert!((a.overlap_x(&b) - 4.0).abs() < 1e-6);
        assert!((a.overlap_y(&b) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn gravity_sign_and_flip() {
        assert_eq!(GravityDir::Down.sign(), 1.0);
        assert_eq!(GravityDir::Up.sign(), -1.0);
        assert_eq!(GravityDir::Down.flipped(), GravityDir::Up);
        assert_eq!(GravityDir::Up.flipped().flipped(), GravityDir::Up);
    }
}
