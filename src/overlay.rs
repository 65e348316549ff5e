//! Crossed-circle "no drop" glyph drawn over a disabled thumbnail.

use vello_cpu::kurbo::Shape;

use crate::blend::{Surface, blit_over};
use crate::core::{DisplayRect, Point};
use crate::error::ThumbResult;
use crate::raster::CompositeFrame;
use crate::render::{Rasterizer, color, point_to_cpu};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphGeometry {
    pub diameter: u32,
    pub pen_width: u32,
    pub center: Point,
}

impl GlyphGeometry {
    pub fn for_rect(rect: DisplayRect) -> Self {
        let diameter = (f64::from(rect.min_side()) * 0.8).round() as u32;
        let pen_width = ((f64::from(diameter) * 0.1) as u32).max(1);
        Self {
            diameter,
            pen_width,
            center: rect.center(),
        }
    }

    /// End points of the 45° diagonal, both on the circle.
    pub fn diagonal(&self) -> (Point, Point) {
        let half = f64::from(self.diameter) / 2.0;
        let d = half * std::f64::consts::FRAC_PI_4.cos();
        (
            Point::new(self.center.x - d, self.center.y - d),
            Point::new(self.center.x + d, self.center.y + d),
        )
    }
}

/// Draw the glyph centered on `frame` with `rgba`, composited at `opacity`.
pub fn draw_disabled_overlay(
    rasterizer: &mut Rasterizer,
    frame: &mut CompositeFrame,
    rgba: [u8; 4],
    opacity: f32,
) -> ThumbResult<()> {
    let rect = DisplayRect {
        width: frame.width,
        height: frame.height,
    };
    if rect.is_empty() {
        return Ok(());
    }
    let glyph = GlyphGeometry::for_rect(rect);
    if glyph.diameter == 0 {
        return Ok(());
    }

    let pixmap = rasterizer.rasterize(rect.width, rect.height, |ctx| {
        ctx.set_paint(color(rgba));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(glyph.pen_width)));

        let circle = vello_cpu::kurbo::Circle::new(
            point_to_cpu(glyph.center),
            f64::from(glyph.diameter) / 2.0,
        );
        ctx.stroke_path(&circle.to_path(0.1));

        let (a, b) = glyph.diagonal();
        let mut line = vello_cpu::kurbo::BezPath::new();
        line.move_to(point_to_cpu(a));
        line.line_to(point_to_cpu(b));
        ctx.stroke_path(&line);
        Ok(())
    })?;

    let src = Surface {
        width: rect.width,
        height: rect.height,
        data: pixmap.data_as_u8_slice(),
    };
    blit_over(&mut frame.data, rect.width, rect.height, &src, 0, 0, opacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_scales_with_min_side() {
        let g = GlyphGeometry::for_rect(DisplayRect::new(300, 100));
        assert_eq!(g.diameter, 80);
        assert_eq!(g.pen_width, 8);
        assert_eq!(g.center, Point::new(150.0, 50.0));
    }

    #[test]
    fn pen_width_never_below_one() {
        let g = GlyphGeometry::for_rect(DisplayRect::new(6, 6));
        assert_eq!(g.diameter, 5);
        assert_eq!(g.pen_width, 1);
    }

    #[test]
    fn diagonal_runs_top_left_to_bottom_right() {
        let g = GlyphGeometry::for_rect(DisplayRect::new(100, 100));
        let (a, b) = g.diagonal();
        assert!(a.x < b.x && a.y < b.y);
        assert!((a.distance(g.center) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn overlay_marks_center_and_ring() {
        let mut r = Rasterizer::new();
        let mut frame = CompositeFrame::transparent(DisplayRect::new(100, 100));
        draw_disabled_overlay(&mut r, &mut frame, [255, 255, 255, 255], 1.0).unwrap();

        // Center lies on the diagonal.
        assert!(frame.pixel(50, 50).unwrap()[3] > 200);
        // Ring at radius 40 to the right of the center.
        assert!(frame.pixel(90, 50).unwrap()[3] > 200);
        // Inside the ring but away from the diagonal stays clear.
        assert_eq!(frame.pixel(70, 30).unwrap()[3], 0);
        assert_eq!(frame.pixel(2, 2).unwrap()[3], 0);
    }
}
