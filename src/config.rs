use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::card::CardStyle;
use crate::error::{ThumbError, ThumbResult};
use crate::layout::LayoutParams;

/// Colors used by the compositor, straight RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Card border stroke; also tints the placeholder icon.
    pub border: [u8; 4],
    /// Background behind each card's image.
    pub card_fill: [u8; 4],
    /// Disabled-drop glyph.
    pub overlay: [u8; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            border: [44, 49, 58, 255],
            card_fill: [55, 61, 72, 255],
            overlay: [211, 216, 222, 255],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    pub layout: LayoutParams,
    pub palette: Palette,
    /// Opacity the disabled glyph is composited with, `0..=1`.
    pub overlay_opacity: f32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutParams::default(),
            palette: Palette::default(),
            overlay_opacity: 0.8,
        }
    }
}

impl CompositorConfig {
    pub fn from_json_file(path: &Path) -> ThumbResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ThumbError::config(format!("parse '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ThumbResult<()> {
        self.layout
            .validate()
            .map_err(|e| ThumbError::config(e.to_string()))?;
        if !self.overlay_opacity.is_finite() || !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(ThumbError::config("overlay_opacity must be within 0..=1"));
        }
        Ok(())
    }

    pub fn card_style(&self) -> CardStyle {
        CardStyle {
            border_width: self.layout.border_width,
            border: self.palette.border,
            fill: self.palette.card_fill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: CompositorConfig =
            serde_json::from_str(r#"{"layout": {"max_cards": 5}, "overlay_opacity": 0.5}"#)
                .unwrap();
        assert_eq!(cfg.layout.max_cards, 5);
        assert_eq!(cfg.layout.aspect_width, 3.0);
        assert_eq!(cfg.palette, Palette::default());
        assert_eq!(cfg.overlay_opacity, 0.5);
        cfg.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_opacity_and_layout() {
        let cfg = CompositorConfig {
            overlay_opacity: 1.5,
            ..CompositorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ThumbError::Config(_))));

        let mut cfg = CompositorConfig::default();
        cfg.layout.offset_divisor = 0.0;
        assert!(matches!(cfg.validate(), Err(ThumbError::Config(_))));
    }

    #[test]
    fn card_style_follows_palette() {
        let cfg = CompositorConfig::default();
        let style = cfg.card_style();
        assert_eq!(style.border_width, 1);
        assert_eq!(style.border, cfg.palette.border);
        assert_eq!(style.fill, cfg.palette.card_fill);
    }

    #[test]
    fn missing_file_is_error() {
        assert!(CompositorConfig::from_json_file(Path::new("/nonexistent/thumbstack.json")).is_err());
    }
}
