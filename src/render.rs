use crate::error::ThumbResult;
use crate::raster::to_u16_dims;

/// Contexts kept alive at once: one for card-sized targets, one for the full-rect overlay.
const MAX_CONTEXTS: usize = 2;

/// Reusable `vello_cpu` contexts for drawing cards and overlays.
///
/// One context is kept per target size, most recently used last, so alternating between card
/// and overlay targets does not rebuild either.
#[derive(Default)]
pub struct Rasterizer {
    contexts: Vec<vello_cpu::RenderContext>,
    built: u64,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contexts created so far.
    pub fn contexts_built(&self) -> u64 {
        self.built
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> ThumbResult<R>,
    ) -> ThumbResult<R> {
        let cached = self
            .contexts
            .iter()
            .position(|ctx| ctx.width() == width && ctx.height() == height);
        let mut ctx = match cached {
            Some(i) => self.contexts.remove(i),
            None => {
                if self.contexts.len() >= MAX_CONTEXTS {
                    self.contexts.remove(0);
                }
                self.built += 1;
                tracing::debug!(width, height, "render context created");
                vello_cpu::RenderContext::new(width, height)
            }
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.contexts.push(ctx);
        out
    }

    /// Run `draw` against a fresh transparent target of `width x height` and read it back.
    pub fn rasterize(
        &mut self,
        width: u32,
        height: u32,
        draw: impl FnOnce(&mut vello_cpu::RenderContext) -> ThumbResult<()>,
    ) -> ThumbResult<vello_cpu::Pixmap> {
        let (w, h) = to_u16_dims(width, height)?;
        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            draw(ctx)?;
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })
    }
}

pub(crate) fn color(rgba: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

pub(crate) fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}
