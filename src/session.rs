//! Single-user coloring session over one active template.

use std::time::Duration;

use crate::catalog::{ColorMap, Template, TemplateCatalog};
use crate::foundation::core::{Cell, ColoredMatrix, ZoneMatrix};
use crate::foundation::error::{MalathError, MalathResult};
use crate::palette::GrayscalePalette;
use crate::render::grid::GridRenderer;
use crate::voice::capture::SpeechCapture;
use crate::voice::interpret::{VoiceCommand, ZoneVocabulary, interpret};

/// Default capture window for one voice command.
pub const DEFAULT_LISTEN_TIMEOUT: Duration = Duration::from_secs(10);
/// Default transcription locale.
pub const DEFAULT_LOCALE: &str = "ar";

/// Options for [`GridSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOpts {
    /// How long to wait for speech before giving up.
    pub listen_timeout: Duration,
    /// Locale passed to the transcription collaborator.
    pub locale: String,
    /// Number words used to resolve zone ids.
    pub zone_words: ZoneVocabulary,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            listen_timeout: DEFAULT_LISTEN_TIMEOUT,
            locale: DEFAULT_LOCALE.to_owned(),
            zone_words: ZoneVocabulary::arabic(),
        }
    }
}

/// Result of one successful paint command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaintOutcome {
    /// Transcript the command was read from.
    pub transcript: String,
    /// Zone that was painted.
    pub zone: u32,
    /// Color it was painted with.
    pub color: String,
    /// Number of cells belonging to the zone.
    pub cells_painted: usize,
}

/// Grid state for the active template.
///
/// `zones` is the template's matrix and never changes until another template is loaded;
/// `colored` starts as a copy of it and accumulates painting.
#[derive(Clone, Debug)]
pub struct GridSession {
    template: String,
    zones: ZoneMatrix,
    colored: ColoredMatrix,
    palette: GrayscalePalette,
    colors: ColorMap,
    palette_image: String,
    opts: SessionOpts,
}

impl GridSession {
    /// Start a session on template `name`.
    pub fn load(
        catalog: &dyn TemplateCatalog,
        name: &str,
        opts: SessionOpts,
    ) -> MalathResult<Self> {
        let template = catalog.template(name)?;
        Self::from_template(template, opts)
    }

    /// Start a session on an already fetched template.
    pub fn from_template(template: Template, opts: SessionOpts) -> MalathResult<Self> {
        let palette = GrayscalePalette::for_matrix(&template.zones)?;
        Ok(Self {
            colored: ColoredMatrix::unpainted(&template.zones),
            template: template.name,
            zones: template.zones,
            palette,
            colors: template.colors,
            palette_image: template.palette_image,
            opts,
        })
    }

    /// Switch to template `name`, discarding all painting.
    ///
    /// On error the current template and its painting are kept.
    #[tracing::instrument(skip(self, catalog))]
    pub fn load_template(&mut self, catalog: &dyn TemplateCatalog, name: &str) -> MalathResult<()> {
        let next = Self::load(catalog, name, self.opts.clone())?;
        *self = next;
        tracing::info!(
            rows = self.zones.rows(),
            cols = self.zones.cols(),
            zones = self.palette.len(),
            "template loaded"
        );
        Ok(())
    }

    /// Discard all painting on the current template.
    pub fn reset(&mut self) {
        self.colored = ColoredMatrix::unpainted(&self.zones);
    }

    /// Paint every cell whose original zone id is `zone`.
    ///
    /// Cells of other zones keep whatever they currently hold, so earlier commands are
    /// preserved and repeating a command changes nothing. Returns the number of cells in
    /// the zone. Colors outside the template vocabulary are rejected and leave the grid
    /// untouched.
    pub fn paint_zone(&mut self, zone: u32, color: &str) -> MalathResult<usize> {
        if !self.colors.contains(color) {
            return Err(MalathError::validation(format!(
                "color \"{color}\" is not part of template \"{}\"",
                self.template
            )));
        }
        let mut painted = 0;
        for (cell, &original) in self.colored.cells_mut().iter_mut().zip(self.zones.cells()) {
            if original == zone {
                *cell = Cell::Painted(color.to_owned());
                painted += 1;
            }
        }
        tracing::debug!(zone, color, painted, "painted zone");
        Ok(painted)
    }

    /// Interpret `transcript` and apply it.
    ///
    /// Unrecognized transcripts return [`crate::MalathError::Unrecognized`] and leave the
    /// grid untouched.
    #[tracing::instrument(skip(self))]
    pub fn apply_transcript(&mut self, transcript: &str) -> MalathResult<PaintOutcome> {
        let VoiceCommand { zone, color } =
            interpret(transcript, &self.colors, &self.opts.zone_words).into_command()?;
        let cells_painted = self.paint_zone(zone, &color)?;
        Ok(PaintOutcome {
            transcript: transcript.to_owned(),
            zone,
            color,
            cells_painted,
        })
    }

    /// Block on `capture` for one utterance, then apply it.
    ///
    /// Timeouts and transcription failures are returned as-is and never retried.
    pub fn listen_and_paint(&mut self, capture: &mut dyn SpeechCapture) -> MalathResult<PaintOutcome> {
        let transcript = capture
            .capture(self.opts.listen_timeout, &self.opts.locale)
            .inspect_err(|e| tracing::warn!(error = %e, "voice capture failed"))?;
        self.apply_transcript(&transcript)
    }

    /// Render the current grid.
    pub fn render(&self, renderer: &mut GridRenderer) -> MalathResult<image::RgbImage> {
        renderer.render(&self.colored, &self.colors, &self.palette)
    }

    /// Active template name.
    pub fn template_name(&self) -> &str {
        &self.template
    }

    /// Original zone matrix of the active template.
    pub fn zones(&self) -> &ZoneMatrix {
        &self.zones
    }

    /// Current painting state.
    pub fn colored(&self) -> &ColoredMatrix {
        &self.colored
    }

    /// Grayscale preview palette.
    pub fn palette(&self) -> &GrayscalePalette {
        &self.palette
    }

    /// Color vocabulary of the active template.
    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    /// Palette image reference of the active template.
    pub fn palette_image(&self) -> &str {
        &self.palette_image
    }

    /// Session options.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
