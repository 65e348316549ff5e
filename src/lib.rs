//! Fanned-stack thumbnail compositing.
//!
//! A [`ThumbnailCompositor`] turns up to three source images and a display rect into one
//! raster: the images drawn as bordered cards, fanned and aspect-fit inside the rect, with an
//! optional "drop disabled" glyph on top. Output is cached until an input changes.
#![forbid(unsafe_code)]

pub mod blend;
pub mod card;
pub mod compositor;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod fan;
pub mod layout;
pub mod overlay;
pub mod placeholder;
pub mod raster;
pub mod render;
pub mod sources;

pub use card::CardStyle;
pub use compositor::{CompositorStats, MinSize, SizeMode, ThumbnailCompositor};
pub use config::{CompositorConfig, Palette};
pub use crate::core::DisplayRect;
pub use error::{ThumbError, ThumbResult};
pub use export::{ExportTools, export_thumbnail};
pub use layout::{FanLayout, FitRect, LayoutParams, plan_fan, solve_fit};
pub use raster::{CompositeFrame, SourceImage};
pub use sources::{drop_candidate, is_supported_review_file, load_sources};
