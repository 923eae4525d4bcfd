/// Convenience result type used across Malath APIs.
pub type MalathResult<T> = Result<T, MalathError>;

/// Which half of a voice command could not be resolved from a transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Missing {
    /// No color of the active template occurs in the transcript.
    Color,
    /// No token of the transcript is a zone number word.
    Zone,
    /// Neither a color nor a zone number was found.
    ColorAndZone,
}

impl Missing {
    /// `true` when the color could not be resolved.
    pub fn color(self) -> bool {
        matches!(self, Self::Color | Self::ColorAndZone)
    }

    /// `true` when the zone could not be resolved.
    pub fn zone(self) -> bool {
        matches!(self, Self::Zone | Self::ColorAndZone)
    }
}

/// Top-level error type used by Malath.
#[derive(thiserror::Error, Debug)]
pub enum MalathError {
    /// Grayscale value outside `[0, 255]`.
    #[error("invalid grayscale value {0}: must be within 0..=255")]
    InvalidGrayscale(i64),

    /// Palette requested over a template with no zones.
    #[error("cannot derive a grayscale palette: template has no zones")]
    ZeroZoneCount,

    /// Nothing was heard before the capture window closed.
    #[error("no speech captured within {secs}s")]
    AudioTimeout {
        /// Capture window in seconds.
        secs: u64,
    },

    /// The speech-to-text collaborator failed.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// The transcript did not name a known color and/or zone.
    #[error("{}", unrecognized_message(.missing, .zone, .color))]
    Unrecognized {
        /// What could not be resolved.
        missing: Missing,
        /// Zone id, when it did resolve.
        zone: Option<u32>,
        /// Color name, when it did resolve.
        color: Option<String>,
    },

    /// Template name not present in the catalog.
    #[error("unknown template \"{0}\"")]
    UnknownTemplate(String),

    /// Input validation error (catalog data, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterization error.
    #[error("render error: {0}")]
    Render(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn unrecognized_message(missing: &Missing, zone: &Option<u32>, color: &Option<String>) -> String {
    match missing {
        Missing::Color => match zone {
            Some(z) => format!("color not recognized (zone {z} was heard)"),
            None => "color not recognized".to_owned(),
        },
        Missing::Zone => match color {
            Some(c) => format!("zone number not recognized (color \"{c}\" was heard)"),
            None => "zone number not recognized".to_owned(),
        },
        Missing::ColorAndZone => "neither a color nor a zone number was recognized".to_owned(),
    }
}

impl MalathError {
    /// Build a [`MalathError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MalathError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MalathError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`MalathError::Transcription`] value.
    pub fn transcription(msg: impl Into<String>) -> Self {
        Self::Transcription(msg.into())
    }

    /// `true` for failures of a single voice interaction.
    ///
    /// These never touch session state; the user simply triggers another attempt.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AudioTimeout { .. } | Self::Transcription(_) | Self::Unrecognized { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
