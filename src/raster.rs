use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::blend::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::core::DisplayRect;
use crate::error::{ThumbError, ThumbResult};

/// Decoded source raster, straight (non-premultiplied) RGBA8.
///
/// Cloning is cheap; the pixels are shared.
#[derive(Clone, Debug)]
pub struct SourceImage {
    rgba: Arc<image::RgbaImage>,
}

impl SourceImage {
    pub fn from_rgba(rgba: image::RgbaImage) -> Self {
        Self {
            rgba: Arc::new(rgba),
        }
    }

    pub fn decode(bytes: &[u8]) -> ThumbResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .map_err(|e| ThumbError::decode(format!("decode image from memory: {e}")))?;
        Ok(Self::from_rgba(dyn_img.to_rgba8()))
    }

    pub fn open(path: &Path) -> ThumbResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        let dyn_img = image::load_from_memory(&bytes)
            .map_err(|e| ThumbError::decode(format!("'{}': {e}", path.display())))?;
        Ok(Self::from_rgba(dyn_img.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn as_rgba(&self) -> &image::RgbaImage {
        &self.rgba
    }

    /// Smoothly resample to exactly `width x height`.
    pub fn resized(&self, width: u32, height: u32) -> image::RgbaImage {
        if self.width() == width && self.height() == height {
            return self.rgba.as_ref().clone();
        }
        image::imageops::resize(
            self.rgba.as_ref(),
            width,
            height,
            image::imageops::FilterType::Triangle,
        )
    }
}

/// A composited output raster as premultiplied RGBA8, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl CompositeFrame {
    pub fn transparent(rect: DisplayRect) -> Self {
        let len = (rect.width as usize)
            .saturating_mul(rect.height as usize)
            .saturating_mul(4);
        Self {
            width: rect.width,
            height: rect.height,
            data: vec![0u8; len],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Straight-alpha copy, suitable for encoding.
    pub fn to_rgba_image(&self) -> ThumbResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| ThumbError::validation("composite frame byte len mismatch"))
    }

    pub fn save_png(&self, path: &Path) -> ThumbResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ThumbError::validation("cannot encode an empty composite"));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ThumbResult<vello_cpu::Pixmap> {
    let (w, h) = to_u16_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ThumbError::validation("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

/// Wrap straight RGBA pixels as a `vello_cpu` image paint.
pub(crate) fn image_paint(rgba: image::RgbaImage) -> ThumbResult<vello_cpu::Image> {
    let (width, height) = rgba.dimensions();
    let mut premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut premul);
    let pixmap = pixmap_from_premul_bytes(&premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn to_u16_dims(width: u32, height: u32) -> ThumbResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ThumbError::validation(format!("raster width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ThumbError::validation(format!("raster height {height} exceeds u16")))?;
    Ok((w, h))
}
