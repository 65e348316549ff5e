use crate::blend::{Surface, blit_over};
use crate::card::{CardStyle, render_card};
use crate::core::DisplayRect;
use crate::error::ThumbResult;
use crate::layout::{FitRect, LayoutParams, plan_fan};
use crate::raster::{CompositeFrame, SourceImage};
use crate::render::Rasterizer;

/// The cards that will be drawn: the last `max_cards` supplied, oldest first.
pub fn select_cards(sources: &[SourceImage], max_cards: usize) -> &[SourceImage] {
    let start = sources.len().saturating_sub(max_cards);
    &sources[start..]
}

/// Draw `sources` as a fanned stack of cards inside `fit`, on a transparent `rect`-sized frame.
///
/// Cards are drawn oldest first, so the newest ends up on top.
pub fn compose_fan(
    rasterizer: &mut Rasterizer,
    rect: DisplayRect,
    fit: &FitRect,
    sources: &[SourceImage],
    params: &LayoutParams,
    style: &CardStyle,
) -> ThumbResult<CompositeFrame> {
    let mut frame = CompositeFrame::transparent(rect);
    let cards = select_cards(sources, params.max_cards);
    let fan = plan_fan(fit, cards.len(), params);
    if !fan.has_area() {
        return Ok(frame);
    }

    for (source, &(x, y)) in cards.iter().zip(&fan.positions) {
        let card = render_card(rasterizer, source, fan.card_width, fan.card_height, style)?;
        let surface = Surface {
            width: fan.card_width,
            height: fan.card_height,
            data: card.data_as_u8_slice(),
        };
        blit_over(&mut frame.data, rect.width, rect.height, &surface, x, y, 1.0)?;
    }
    Ok(frame)
}
