pub use kurbo::{Point, Rect, Size, Vec2};

/// Largest edge the CPU rasterizer can address.
pub const MAX_DIM: u32 = u16::MAX as u32;

/// Pixel area the composite must fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DisplayRect {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl DisplayRect {
    /// Build a rect from possibly malformed host values.
    ///
    /// Negative dimensions clamp to zero, oversized ones to [`MAX_DIM`].
    pub fn new(width: i64, height: i64) -> Self {
        fn clamp_dim(v: i64) -> u32 {
            v.clamp(0, i64::from(MAX_DIM)) as u32
        }

        Self {
            width: clamp_dim(width),
            height: clamp_dim(height),
        }
    }

    /// Pull a directly built or deserialized rect back into `0..=MAX_DIM`.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.min(MAX_DIM),
            height: self.height.min(MAX_DIM),
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    pub fn to_kurbo(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn center(self) -> Point {
        self.to_kurbo().center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_dimensions_clamp_to_zero() {
        let r = DisplayRect::new(-5, 40);
        assert_eq!(r.width, 0);
        assert_eq!(r.height, 40);
        assert!(r.is_empty());
    }

    #[test]
    fn oversized_dimensions_clamp_to_max() {
        let r = DisplayRect::new(1 << 20, 10);
        assert_eq!(r.width, MAX_DIM);
    }

    #[test]
    fn literal_rect_clamps_on_demand() {
        let r = DisplayRect {
            width: 70_000,
            height: 12,
        }
        .clamped();
        assert_eq!((r.width, r.height), (MAX_DIM, 12));
    }

    #[test]
    fn center_is_half_extent() {
        let r = DisplayRect::new(300, 100);
        assert_eq!(r.center(), Point::new(150.0, 50.0));
        assert_eq!(r.min_side(), 100);
    }
}
