use crate::error::ThumbResult;
use crate::layout::fit_within;
use crate::raster::{SourceImage, image_paint};
use crate::render::{Rasterizer, color};

/// Visual style shared by every card of a fan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardStyle {
    pub border_width: u32,
    pub border: [u8; 4],
    pub fill: [u8; 4],
}

/// Render one bordered card of `width x height` with `source` fitted inside the border.
///
/// The result is a transparent pixmap holding the filled, stroked frame and the image
/// centered in the `(width - 2b, height - 2b)` inset.
pub fn render_card(
    rasterizer: &mut Rasterizer,
    source: &SourceImage,
    width: u32,
    height: u32,
    style: &CardStyle,
) -> ThumbResult<vello_cpu::Pixmap> {
    let full_border = style.border_width.saturating_mul(2);
    let inset = (
        width.saturating_sub(full_border),
        height.saturating_sub(full_border),
    );
    let (scaled_w, scaled_h) = fit_within((source.width(), source.height()), inset);
    let paint = if scaled_w > 0 && scaled_h > 0 {
        Some(image_paint(source.resized(scaled_w, scaled_h))?)
    } else {
        None
    };
    let pos_x = (width - scaled_w) / 2;
    let pos_y = (height - scaled_h) / 2;

    rasterizer.rasterize(width, height, |ctx| {
        let w = f64::from(width);
        let h = f64::from(height);
        let b = f64::from(style.border_width);
        let half = b / 2.0;
        let frame =
            vello_cpu::kurbo::Rect::new(half, half, (w - half).max(half), (h - half).max(half));

        ctx.set_paint(color(style.fill));
        ctx.fill_rect(&frame);
        if style.border_width > 0 {
            ctx.set_paint(color(style.border));
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(b).with_join(vello_cpu::kurbo::Join::Miter),
            );
            ctx.stroke_rect(&frame);
        }

        if let Some(paint) = paint {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(pos_x),
                f64::from(pos_y),
            )));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(scaled_w),
                f64::from(scaled_h),
            ));
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        }
        Ok(())
    })
}
