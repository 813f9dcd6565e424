//! 2D vector helpers on top of [`glam::Vec2`].
//!
//! `glam` already covers add, subtract, scale, divide and length through its
//! operators. The simulation additionally needs a normalization that never
//! blows up on (near) zero vectors, which is what [`Vec2Ext`] provides.

use glam::Vec2;

/// Magnitudes at or below this are treated as zero when normalizing.
pub const NORMALIZE_EPSILON: f32 = 1e-8;

/// Extra vector operations used by the force model.
pub trait Vec2Ext {
    /// Unit vector in the same direction, or [`Vec2::ZERO`] when the
    /// magnitude is at or below [`NORMALIZE_EPSILON`].
    fn safe_normalize(self) -> Vec2;

    /// `safe_normalize() * target`.
    fn with_magnitude(self, target: f32) -> Vec2;

    /// Shrink the vector to `max` length if it is longer, keeping direction.
    fn clamp_magnitude(self, max: f32) -> Vec2;
}

impl Vec2Ext for Vec2 {
    #[inline]
    fn safe_normalize(self) -> Vec2 {
        let mag = self.length();
        if mag > NORMALIZE_EPSILON {
            self / mag
        } else {
            Vec2::ZERO
        }
    }

    #[inline]
    fn with_magnitude(self, target: f32) -> Vec2 {
        self.safe_normalize() * target
    }

    #[inline]
    fn clamp_magnitude(self, max: f32) -> Vec2 {
        if self.length() > max {
            self.with_magnitude(max)
        } else {
            self
        }
    }
}
