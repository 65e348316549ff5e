use std::path::{Path, PathBuf};

use crate::config::CompositorConfig;
use crate::core::DisplayRect;
use crate::error::ThumbResult;
use crate::fan::compose_fan;
use crate::layout::solve_fit;
use crate::overlay::draw_disabled_overlay;
use crate::placeholder::placeholder_image;
use crate::raster::{CompositeFrame, SourceImage};
use crate::render::Rasterizer;
use crate::sources::{drop_candidate, load_sources};

/// How the host sizes the thumbnail area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeMode {
    /// Follow whatever rect the host hands in.
    #[default]
    Adaptive,
    /// Width is fixed; the host should reserve the matching minimum height.
    FixedWidth(u32),
    /// Height is fixed; the host should reserve the matching minimum width.
    FixedHeight(u32),
}

/// Minimum size a host should reserve, `0` meaning unconstrained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinSize {
    pub width: u32,
    pub height: u32,
}

/// Counters for observing cache behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositorStats {
    /// Full recomputes performed.
    pub recomputes: u64,
    /// Render requests served from cache.
    pub cache_hits: u64,
    /// Recomputes that failed and fell back to a transparent frame.
    pub failures: u64,
}

/// Lazily recomputed fanned-stack thumbnail.
///
/// Every setter that changes an input marks the cached composite dirty; the next
/// [`ThumbnailCompositor::render`] rebuilds it in full before returning.
pub struct ThumbnailCompositor {
    config: CompositorConfig,
    rect: DisplayRect,
    sources: Vec<SourceImage>,
    drop_enabled: bool,
    size_mode: SizeMode,

    placeholder: Option<SourceImage>,
    rasterizer: Rasterizer,
    cache: Option<CompositeFrame>,
    stats: CompositorStats,
}

impl ThumbnailCompositor {
    pub fn new(config: CompositorConfig) -> ThumbResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rect: DisplayRect::default(),
            sources: Vec::new(),
            drop_enabled: true,
            size_mode: SizeMode::Adaptive,
            placeholder: None,
            rasterizer: Rasterizer::new(),
            cache: None,
            stats: CompositorStats::default(),
        })
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn display_rect(&self) -> DisplayRect {
        self.rect
    }

    pub fn sources(&self) -> &[SourceImage] {
        &self.sources
    }

    pub fn is_drop_enabled(&self) -> bool {
        self.drop_enabled
    }

    pub fn size_mode(&self) -> SizeMode {
        self.size_mode
    }

    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    /// `true` when the next render will recompute.
    pub fn is_dirty(&self) -> bool {
        self.cache.is_none()
    }

    fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            tracing::debug!("thumbnail cache invalidated");
        }
    }

    /// Host resize. Unchanged sizes keep the cache.
    pub fn set_display_rect(&mut self, rect: DisplayRect) {
        let rect = rect.clamped();
        if self.rect == rect {
            return;
        }
        self.rect = rect;
        self.invalidate();
    }

    /// Replace the source set. Always invalidates, even for an identical set.
    pub fn set_sources(&mut self, sources: Vec<SourceImage>) {
        self.sources = sources;
        self.invalidate();
    }

    /// Decode `paths` and use them as the source set; unreadable files are skipped.
    pub fn set_source_paths<P: AsRef<Path>>(&mut self, paths: &[P]) {
        self.set_sources(load_sources(paths));
    }

    pub fn clear_sources(&mut self) {
        self.set_sources(Vec::new());
    }

    pub fn set_drop_enabled(&mut self, enabled: bool) {
        if self.drop_enabled == enabled {
            return;
        }
        self.drop_enabled = enabled;
        self.invalidate();
    }

    pub fn set_fixed_width(&mut self, width: u32) {
        if self.size_mode == SizeMode::FixedWidth(width) {
            return;
        }
        self.size_mode = SizeMode::FixedWidth(width);
        self.invalidate();
    }

    pub fn set_fixed_height(&mut self, height: u32) {
        if self.size_mode == SizeMode::FixedHeight(height) {
            return;
        }
        self.size_mode = SizeMode::FixedHeight(height);
        self.invalidate();
    }

    pub fn set_adaptive(&mut self) {
        self.size_mode = SizeMode::Adaptive;
    }

    pub fn min_size(&self) -> MinSize {
        let layout = &self.config.layout;
        match self.size_mode {
            SizeMode::Adaptive => MinSize::default(),
            SizeMode::FixedWidth(w) => MinSize {
                width: 0,
                height: layout.min_height_for_width(w),
            },
            SizeMode::FixedHeight(h) => MinSize {
                width: layout.min_width_for_height(h),
                height: 0,
            },
        }
    }

    /// The single file a drop of `paths` would act on, or `None` when it should be refused.
    pub fn accept_drop<P: AsRef<Path>>(&self, paths: &[P]) -> Option<PathBuf> {
        if !self.drop_enabled {
            return None;
        }
        drop_candidate(paths)
    }

    /// Composite sized exactly to the current display rect.
    ///
    /// Served from cache while clean. Never fails: a recompute error is logged and yields a
    /// transparent frame.
    pub fn render(&mut self) -> &CompositeFrame {
        let frame = match self.cache.take() {
            Some(frame) => {
                self.stats.cache_hits += 1;
                tracing::debug!("thumbnail served from cache");
                frame
            }
            None => {
                self.stats.recomputes += 1;
                self.recompute().unwrap_or_else(|err| {
                    self.stats.failures += 1;
                    tracing::warn!(%err, "thumbnail recompute failed");
                    CompositeFrame::transparent(self.rect)
                })
            }
        };
        self.cache.insert(frame)
    }

    fn placeholder(&mut self) -> ThumbResult<SourceImage> {
        if let Some(p) = &self.placeholder {
            return Ok(p.clone());
        }
        let p = placeholder_image(self.config.palette.border)?;
        self.placeholder = Some(p.clone());
        Ok(p)
    }

    fn cards_to_draw(&mut self) -> ThumbResult<Vec<SourceImage>> {
        if !self.drop_enabled || self.sources.is_empty() {
            return Ok(vec![self.placeholder()?]);
        }
        Ok(self.sources.clone())
    }

    #[tracing::instrument(
        skip(self),
        fields(
            width = self.rect.width,
            height = self.rect.height,
            sources = self.sources.len(),
            drop_enabled = self.drop_enabled
        )
    )]
    fn recompute(&mut self) -> ThumbResult<CompositeFrame> {
        let rect = self.rect;
        if rect.is_empty() {
            return Ok(CompositeFrame::transparent(rect));
        }

        let cards = self.cards_to_draw()?;
        let fit = solve_fit(rect, &self.config.layout);
        let style = self.config.card_style();
        let mut frame = compose_fan(
            &mut self.rasterizer,
            rect,
            &fit,
            &cards,
            &self.config.layout,
            &style,
        )?;

        if !self.drop_enabled {
            draw_disabled_overlay(
                &mut self.rasterizer,
                &mut frame,
                self.config.palette.overlay,
                self.config.overlay_opacity,
            )?;
        }
        Ok(frame)
    }
}
