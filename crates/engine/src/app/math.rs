use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, rhs: Vec2) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.3},{:.3}]", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Scales `self` so its width becomes `width`, keeping the aspect ratio.
    pub fn fit_width(self, width: f32) -> Size {
        if self.width <= 0.0 {
            return Size::new(width, 0.0);
        }
        Size::new(width, self.height * width / self.width)
    }
}

/// Axis-aligned rectangle in screen pixels, `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_ops_are_componentwise() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(10.0, -4.0);

        assert_eq!(a + b, Vec2::new(11.0, -2.0));
        assert_eq!(b - a, Vec2::new(9.0, -6.0));
        assert_eq!(a * 3.0, Vec2::new(3.0, 6.0));
        assert_eq!(a.dot(b), 2.0);
    }

    #[test]
    fn add_assign_accumulates() {
        let mut a = Vec2::new(1.0, 1.0);
        a += Vec2::new(0.5, -2.0);
        assert_eq!(a, Vec2::new(1.5, -1.0));
    }

    #[test]
    fn fit_width_keeps_aspect_ratio() {
        let size = Size::new(200.0, 100.0).fit_width(50.0);
        assert_eq!(size.width, 50.0);
        assert!((size.height - 25.0).abs() < 0.0001);
    }

    #[test]
    fn zero_sized_rect_is_empty() {
        assert!(ScreenRect::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(ScreenRect::new(0.0, 0.0, 10.0, -1.0).is_empty());
        assert!(!ScreenRect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
