use std::collections::HashMap;

use crate::catalog::ColorMap;
use crate::foundation::core::{Cell, ColoredMatrix, Rgb8};
use crate::foundation::error::{MalathError, MalathResult};
use crate::palette::{GrayscalePalette, grayscale_to_rgb};
use crate::render::text::{FontResource, TextBrushRgba8, TextLayoutEngine};

/// Default edge length of one grid cell, in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 50;
/// Default zone label font size, in pixels.
pub const DEFAULT_LABEL_SIZE_PX: f32 = 28.0;

/// Options for [`GridRenderer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOpts {
    /// Edge length of one cell in pixels.
    pub cell_size: u32,
    /// Zone label font size in pixels.
    pub label_size_px: f32,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            label_size_px: DEFAULT_LABEL_SIZE_PX,
        }
    }
}

impl RenderOpts {
    /// Return options with a different cell size.
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Return options with a different label size.
    pub fn with_label_size_px(mut self, size: f32) -> Self {
        self.label_size_px = size;
        self
    }

    /// Check option ranges.
    pub fn validate(&self) -> MalathResult<()> {
        if self.cell_size == 0 {
            return Err(MalathError::validation("cell_size must be > 0"));
        }
        if !self.label_size_px.is_finite() || self.label_size_px <= 0.0 {
            return Err(MalathError::validation(
                "label_size_px must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Rasterizes a [`ColoredMatrix`] into an RGB image.
///
/// Painted cells are flat fills. Unpainted cells get their grayscale preview, a one pixel
/// black border and their zone id centered as a label. Without a font the labels are
/// skipped and everything else is drawn the same way.
pub struct GridRenderer {
    opts: RenderOpts,
    text: Option<TextLayoutEngine>,
    ctx: Option<vello_cpu::RenderContext>,
    label_ink: HashMap<String, Option<vello_cpu::kurbo::Rect>>,
}

impl GridRenderer {
    /// Build a renderer; `font` is used for zone labels.
    pub fn new(opts: RenderOpts, font: Option<&FontResource>) -> MalathResult<Self> {
        opts.validate()?;
        let text = match font {
            Some(f) => Some(TextLayoutEngine::new(f)?),
            None => {
                tracing::warn!("no label font available; zone numbers will not be drawn");
                None
            }
        };
        Ok(Self {
            opts,
            text,
            ctx: None,
            label_ink: HashMap::new(),
        })
    }

    /// Renderer options.
    pub fn opts(&self) -> RenderOpts {
        self.opts
    }

    /// `true` when zone labels are drawn.
    pub fn draws_labels(&self) -> bool {
        self.text.is_some()
    }

    /// Output size in pixels for a `rows` x `cols` grid.
    pub fn output_size(&self, rows: usize, cols: usize) -> MalathResult<(u32, u32)> {
        let dim = |n: usize, what: &str| -> MalathResult<u32> {
            u32::try_from(n)
                .ok()
                .and_then(|n| n.checked_mul(self.opts.cell_size))
                .ok_or_else(|| MalathError::render(format!("image {what} overflows u32")))
        };
        Ok((dim(cols, "width")?, dim(rows, "height")?))
    }

    /// Draw `matrix`; the image is `(cols * cell_size, rows * cell_size)` pixels.
    #[tracing::instrument(skip_all, fields(rows = matrix.rows(), cols = matrix.cols()))]
    pub fn render(
        &mut self,
        matrix: &ColoredMatrix,
        colors: &ColorMap,
        palette: &GrayscalePalette,
    ) -> MalathResult<image::RgbImage> {
        let (width, height) = self.output_size(matrix.rows(), matrix.cols())?;
        let w16: u16 = width
            .try_into()
            .map_err(|_| MalathError::render("image width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| MalathError::render("image height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
            _ => vello_cpu::RenderContext::new(w16, h16),
        };
        ctx.reset();
        let drawn = self.draw_cells(&mut ctx, matrix, colors, palette);
        let out = drawn.map(|()| {
            let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            pixmap
        });
        self.ctx = Some(ctx);

        pixmap_to_rgb(&out?, width, height)
    }

    fn draw_cells(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        matrix: &ColoredMatrix,
        colors: &ColorMap,
        palette: &GrayscalePalette,
    ) -> MalathResult<()> {
        let cell = f64::from(self.opts.cell_size);
        let full = vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            cell * matrix.cols() as f64,
            cell * matrix.rows() as f64,
        );
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        set_rgb(ctx, Rgb8::WHITE);
        ctx.fill_rect(&full);

        for (row, col, value) in matrix.iter() {
            let x0 = cell * col as f64;
            let y0 = cell * row as f64;
            let rect = vello_cpu::kurbo::Rect::new(x0, y0, x0 + cell, y0 + cell);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

            match value {
                Cell::Painted(name) => {
                    set_rgb(ctx, colors.get(name).unwrap_or(Rgb8::WHITE));
                    ctx.fill_rect(&rect);
                }
                Cell::Zone(zone) => {
                    let gray = palette.get(*zone).ok_or_else(|| {
                        MalathError::render(format!("zone {zone} has no grayscale value"))
                    })?;
                    set_rgb(ctx, grayscale_to_rgb(i64::from(gray))?);
                    ctx.fill_rect(&rect);
                    draw_border(ctx, rect);
                    self.draw_label(ctx, &zone.to_string(), x0, y0, cell)?;
                }
            }
        }
        Ok(())
    }

    fn draw_label(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        label: &str,
        x0: f64,
        y0: f64,
        cell: f64,
    ) -> MalathResult<()> {
        let size_px = self.opts.label_size_px;
        let Some(text) = self.text.as_mut() else {
            return Ok(());
        };
        let layout = text.layout_line(label, size_px, Rgb8::BLACK.into())?;

        let ink = match self.label_ink.get(label).copied() {
            Some(ink) => ink,
            None => {
                let ink = ink_bounds(&layout, text.font(), size_px)?;
                self.label_ink.insert(label.to_owned(), ink);
                ink
            }
        };
        // Blank labels leave no ink.
        let Some(ink) = ink else {
            return Ok(());
        };

        // Center the inked pixels; the line box includes ascent and descent space.
        let text_x = x0 + ((cell - ink.width()) / 2.0).floor() - ink.x0;
        let text_y = y0 + ((cell - ink.height()) / 2.0).floor() - ink.y0;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((text_x, text_y)));
        fill_layout(ctx, &layout, text.font());
        Ok(())
    }
}

fn fill_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Pixel bounds of the ink `layout` leaves, in layout coordinates.
///
/// Rasterizes into a padded scratch pixmap so overhanging outlines are kept. Offsets stay
/// integral, so the same glyphs drawn at an integral translation cover the same pixels.
fn ink_bounds(
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    size_px: f32,
) -> MalathResult<Option<vello_cpu::kurbo::Rect>> {
    let pad = f64::from(size_px).ceil();
    let side = |len: f32| -> MalathResult<u16> {
        let v = (f64::from(len) + 2.0 * pad).ceil();
        if v.is_finite() && v >= 1.0 && v <= f64::from(u16::MAX) {
            Ok(v as u16)
        } else {
            Err(MalathError::render(format!("label scratch size {v} out of range")))
        }
    };
    let (w, h) = (side(layout.width())?, side(layout.height())?);

    let mut scratch = vello_cpu::RenderContext::new(w, h);
    scratch.set_transform(vello_cpu::kurbo::Affine::translate((pad, pad)));
    fill_layout(&mut scratch, layout, font);
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    scratch.flush();
    scratch.render_to_pixmap(&mut pixmap);

    let width = usize::from(w);
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for (i, px) in pixmap.data_as_u8_slice().chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let (x, y) = (i % width, i / width);
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
        });
    }
    Ok(bounds.map(|(x0, y0, x1, y1)| {
        vello_cpu::kurbo::Rect::new(
            x0 as f64 - pad,
            y0 as f64 - pad,
            x1 as f64 - pad,
            y1 as f64 - pad,
        )
    }))
}

fn set_rgb(ctx: &mut vello_cpu::RenderContext, c: Rgb8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255));
}

// One pixel wide, inset so neighbouring cells never overdraw it.
fn draw_border(ctx: &mut vello_cpu::RenderContext, r: vello_cpu::kurbo::Rect) {
    use vello_cpu::kurbo::Rect;

    set_rgb(ctx, Rgb8::BLACK);
    ctx.fill_rect(&Rect::new(r.x0, r.y0, r.x1, r.y0 + 1.0));
    ctx.fill_rect(&Rect::new(r.x0, r.y1 - 1.0, r.x1, r.y1));
    ctx.fill_rect(&Rect::new(r.x0, r.y0, r.x0 + 1.0, r.y1));
    ctx.fill_rect(&Rect::new(r.x1 - 1.0, r.y0, r.x1, r.y1));
}

// Every pixel is opaque, so premultiplied bytes equal straight RGB.
fn pixmap_to_rgb(
    pixmap: &vello_cpu::Pixmap,
    width: u32,
    height: u32,
) -> MalathResult<image::RgbImage> {
    let rgba = pixmap.data_as_u8_slice();
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    image::RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| MalathError::render("pixmap byte len mismatch"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/grid.rs"]
mod tests;
