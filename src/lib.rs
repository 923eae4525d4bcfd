//! Malath lets a user color a pixel-art template by voice.
//!
//! Pick a template from a [`TemplateCatalog`], start a [`GridSession`], then say a zone
//! number and a color name. Each recognized transcript paints the zone and the grid can be
//! re-rendered with a [`GridRenderer`]:
//!
//! - Load a template into a [`GridSession`]
//! - Feed transcripts through [`GridSession::apply_transcript`] or a [`SpeechCapture`]
//! - Render the [`ColoredMatrix`] to an RGB image
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Template catalog adapter.
pub mod catalog;
/// Grayscale preview palette.
pub mod palette;
pub(crate) mod render;
/// Session state and paint operations.
pub mod session;
pub(crate) mod voice;

pub use crate::catalog::{ColorMap, InMemoryCatalog, Template, TemplateCatalog};
pub use crate::foundation::core::{Cell, ColoredMatrix, Rgb8, ZoneMatrix};
pub use crate::foundation::error::{MalathError, MalathResult, Missing};
pub use crate::palette::{GrayscalePalette, color_for_zone, grayscale_to_rgb};
pub use crate::render::grid::{DEFAULT_CELL_SIZE, DEFAULT_LABEL_SIZE_PX, GridRenderer, RenderOpts};
pub use crate::render::text::{FONT_ENV_VAR, FontResource};
pub use crate::session::{GridSession, PaintOutcome, SessionOpts};
pub use crate::voice::capture::{ScriptedCapture, SpeechCapture};
pub use crate::voice::interpret::{Interpretation, VoiceCommand, ZoneVocabulary, interpret};
