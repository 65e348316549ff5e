//! Geometry for the fanned thumbnail stack.
//!
//! Everything here is pure integer/float math over pixel sizes; nothing touches a raster.
//! Fractional values are truncated toward zero the same way at every step so that a given
//! display rect always yields the same placements.

use crate::core::DisplayRect;
use crate::error::{ThumbError, ThumbResult};

/// Fixed layout constants of the compositor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Width part of the `width:height` aspect ratio.
    pub aspect_width: f64,
    /// Height part of the `width:height` aspect ratio.
    pub aspect_height: f64,
    /// Card border stroke width in pixels.
    pub border_width: u32,
    /// The sub-rect is divided by this to get the total fan offset.
    pub offset_divisor: f64,
    /// Maximum number of cards drawn.
    pub max_cards: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            aspect_width: 3.0,
            aspect_height: 2.0,
            border_width: 1,
            offset_divisor: 4.0,
            max_cards: 3,
        }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> ThumbResult<()> {
        let finite_pos = |v: f64| v.is_finite() && v > 0.0;
        if !finite_pos(self.aspect_width) || !finite_pos(self.aspect_height) {
            return Err(ThumbError::validation(
                "aspect ratio parts must be finite and > 0",
            ));
        }
        if !finite_pos(self.offset_divisor) {
            return Err(ThumbError::validation(
                "offset divisor must be finite and > 0",
            ));
        }
        if self.max_cards == 0 {
            return Err(ThumbError::validation("max_cards must be >= 1"));
        }
        Ok(())
    }

    /// Minimum height a host should reserve for a fixed width.
    pub fn min_height_for_width(&self, width: u32) -> u32 {
        trunc_px(f64::from(width) / self.aspect_width * self.aspect_height)
    }

    /// Minimum width a host should reserve for a fixed height.
    pub fn min_width_for_height(&self, height: u32) -> u32 {
        trunc_px(f64::from(height) / self.aspect_height * self.aspect_width)
    }
}

/// Largest centered sub-rect of the configured aspect ratio inside a [`DisplayRect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitRect {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

/// Letterbox/pillarbox fit of the aspect ratio into `rect`.
pub fn solve_fit(rect: DisplayRect, params: &LayoutParams) -> FitRect {
    let expected_height = params.min_height_for_width(rect.width);
    if expected_height > rect.height {
        let expected_width = params.min_width_for_height(rect.height).min(rect.width);
        FitRect {
            x: f64::from(rect.width - expected_width) / 2.0,
            y: 0.0,
            width: expected_width,
            height: rect.height,
        }
    } else {
        FitRect {
            x: 0.0,
            y: f64::from(rect.height - expected_height) / 2.0,
            width: rect.width,
            height: expected_height,
        }
    }
}

/// Card size and top-left positions for a fan of `count` cards.
#[derive(Clone, Debug, PartialEq)]
pub struct FanLayout {
    pub card_width: u32,
    pub card_height: u32,
    /// Per-card stagger, `(x, y)`.
    pub step: (u32, u32),
    /// One entry per card, oldest first.
    pub positions: Vec<(i32, i32)>,
}

impl FanLayout {
    pub fn has_area(&self) -> bool {
        self.card_width > 0 && self.card_height > 0
    }
}

/// Total size reduction shared by all cards; zero for a single card.
pub fn offset_size(fit: &FitRect, count: usize, params: &LayoutParams) -> (f64, f64) {
    if count <= 1 {
        return (0.0, 0.0);
    }
    (
        f64::from(fit.width) / params.offset_divisor,
        f64::from(fit.height) / params.offset_divisor,
    )
}

pub fn plan_fan(fit: &FitRect, count: usize, params: &LayoutParams) -> FanLayout {
    let (offset_w, offset_h) = offset_size(fit, count, params);
    let card_width = trunc_px(f64::from(fit.width) - offset_w);
    let card_height = trunc_px(f64::from(fit.height) - offset_h);

    let step = if count > 1 {
        let parts = (count - 1) as f64;
        (trunc_px(offset_w / parts), trunc_px(offset_h / parts))
    } else {
        (0, 0)
    };

    let base_x = fit.x + offset_w;
    let positions = (0..count)
        .map(|i| {
            let i = i as f64;
            let x = base_x - f64::from(step.0) * i;
            let y = fit.y + f64::from(step.1) * i;
            (x.floor() as i32, y.floor() as i32)
        })
        .collect();

    FanLayout {
        card_width,
        card_height,
        step,
        positions,
    }
}

/// Aspect-preserving size of `src` scaled to fit inside `bounds`.
///
/// Returns `(0, 0)` when either side of `src` or `bounds` is zero.
pub fn fit_within(src: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = (u64::from(src.0), u64::from(src.1));
    let (bw, bh) = (u64::from(bounds.0), u64::from(bounds.1));
    if sw == 0 || sh == 0 || bw == 0 || bh == 0 {
        return (0, 0);
    }

    let w_for_full_h = bh * sw / sh;
    let (w, h) = if w_for_full_h <= bw {
        (w_for_full_h, bh)
    } else {
        (bw, bw * sh / sw)
    };
    (w.max(1) as u32, h.max(1) as u32)
}

fn trunc_px(v: f64) -> u32 {
    if v.is_nan() || v <= 0.0 {
        return 0;
    }
    v.trunc().min(f64::from(u32::MAX)) as u32
}
