//! Default card image shown when no sources are set or dropping is disabled.

use crate::error::{ThumbError, ThumbResult};
use crate::raster::SourceImage;

const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="96" height="64" viewBox="0 0 96 64">
  <rect x="6" y="6" width="84" height="52" rx="4" fill="none" stroke="#000" stroke-width="4"/>
  <circle cx="30" cy="22" r="6" fill="#000"/>
  <path d="M12 52 L36 30 L50 42 L64 24 L84 52 Z" fill="#000"/>
</svg>"##;

/// Raster edge used for the icon; cards only ever downscale it.
const ICON_SCALE: f32 = 4.0;

/// Rasterize the built-in icon and paint it with `rgba`.
pub fn placeholder_image(rgba: [u8; 4]) -> ThumbResult<SourceImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_str(ICON_SVG, &opts)
        .map_err(|e| ThumbError::decode(format!("parse placeholder svg: {e}")))?;

    let width = (tree.size().width() * ICON_SCALE).ceil() as u32;
    let height = (tree.size().height() * ICON_SCALE).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ThumbError::validation("failed to allocate placeholder pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(ICON_SCALE, ICON_SCALE),
        &mut pixmap.as_mut(),
    );

    let mut straight = pixmap.data().to_vec();
    paint_with_color(&mut straight, rgba);
    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| ThumbError::validation("placeholder byte len mismatch"))?;
    Ok(SourceImage::from_rgba(img))
}

/// Keep each pixel's coverage, replace its color.
///
/// Input alpha is read from premultiplied or straight pixels alike; output is straight RGBA.
pub fn paint_with_color(rgba: &mut [u8], color: [u8; 4]) {
    let [r, g, b, a] = color;
    for px in rgba.chunks_exact_mut(4) {
        let coverage = u16::from(px[3]);
        px[0] = r;
        px[1] = g;
        px[2] = b;
        px[3] = ((coverage * u16::from(a) + 127) / 255) as u8;
    }
}
