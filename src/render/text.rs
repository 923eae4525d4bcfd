use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{MalathError, MalathResult};

/// Environment variable naming a font file for zone labels.
pub const FONT_ENV_VAR: &str = "MALATH_FONT";

/// Raw font bytes used to draw zone labels.
#[derive(Clone, Debug)]
pub struct FontResource {
    bytes: Arc<Vec<u8>>,
}

impl FontResource {
    /// Wrap font file bytes (TTF/OTF).
    pub fn from_bytes(bytes: Vec<u8>) -> MalathResult<Self> {
        if bytes.is_empty() {
            return Err(MalathError::validation("font bytes must be non-empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }

    /// Read a font file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> MalathResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            MalathError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes)
    }

    /// Font named by `MALATH_FONT`, if set and readable.
    pub fn discover() -> Option<Self> {
        let path = std::env::var_os(FONT_ENV_VAR)?;
        match Self::from_path(&path) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring {FONT_ENV_VAR}");
                None
            }
        }
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Shapes single-line labels with one registered font family.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Register `font` and prepare fresh Parley contexts.
    pub(crate) fn new(font: &FontResource) -> MalathResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            MalathError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MalathError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font.bytes().to_vec()),
                0,
            ),
        })
    }

    /// Font handle for glyph drawing.
    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Lay out `text` on a single unbounded line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> MalathResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MalathError::validation(
                "label size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}
