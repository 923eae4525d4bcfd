use crate::catalog::ColorMap;
use crate::foundation::error::{MalathError, MalathResult, Missing};

/// Fixed word-to-number vocabulary used to resolve zone ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneVocabulary {
    words: Vec<(String, u32)>,
}

impl ZoneVocabulary {
    /// Build a vocabulary from `(word, zone)` pairs.
    pub fn new(words: impl IntoIterator<Item = (impl Into<String>, u32)>) -> Self {
        Self {
            words: words.into_iter().map(|(w, z)| (w.into(), z)).collect(),
        }
    }

    /// Arabic number words for zones 0 through 5.
    pub fn arabic() -> Self {
        Self::new([
            ("صفر", 0),
            ("واحد", 1),
            ("اثنين", 2),
            ("ثلاثه", 3),
            ("اربعه", 4),
            ("خمسه", 5),
        ])
    }

    /// Zone id for an exact word match.
    pub fn lookup(&self, word: &str) -> Option<u32> {
        self.words.iter().find(|(w, _)| w == word).map(|(_, z)| *z)
    }

    /// `(word, zone)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.words.iter().map(|(w, z)| (w.as_str(), *z))
    }
}

impl Default for ZoneVocabulary {
    fn default() -> Self {
        Self::arabic()
    }
}

/// A fully resolved voice command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoiceCommand {
    /// Zone to paint.
    pub zone: u32,
    /// Color name from the template vocabulary.
    pub color: String,
}

/// Outcome of scanning one transcript; either half may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interpretation {
    /// First declared color found anywhere in the transcript.
    pub color: Option<String>,
    /// Zone of the first whitespace token that is a number word.
    pub zone: Option<u32>,
}

impl Interpretation {
    /// What is missing, if anything.
    pub fn missing(&self) -> Option<Missing> {
        match (self.color.is_some(), self.zone.is_some()) {
            (true, true) => None,
            (false, true) => Some(Missing::Color),
            (true, false) => Some(Missing::Zone),
            (false, false) => Some(Missing::ColorAndZone),
        }
    }

    /// Convert into a command, or an [`MalathError::Unrecognized`] naming what is missing.
    pub fn into_command(self) -> MalathResult<VoiceCommand> {
        match (self.color, self.zone) {
            (Some(color), Some(zone)) => Ok(VoiceCommand { zone, color }),
            (color, zone) => Err(MalathError::Unrecognized {
                missing: match (&color, &zone) {
                    (None, Some(_)) => Missing::Color,
                    (Some(_), None) => Missing::Zone,
                    _ => Missing::ColorAndZone,
                },
                zone,
                color,
            }),
        }
    }
}

/// Scan a transcript for a color name and a zone number.
///
/// Color: the first name in declaration order that occurs as a substring anywhere in the
/// transcript. Zone: the first whitespace-separated token that exactly equals a number
/// word. Both scans cover the whole transcript, so word order does not matter.
///
/// No case folding, punctuation stripping or diacritic removal is applied. A color name
/// that is a substring of another (or of an unrelated word) can match unexpectedly, and a
/// number word glued to punctuation will not match.
pub fn interpret(transcript: &str, colors: &ColorMap, zones: &ZoneVocabulary) -> Interpretation {
    let color = colors
        .names()
        .find(|name| transcript.contains(name))
        .map(str::to_owned);
    let zone = transcript
        .split_whitespace()
        .find_map(|token| zones.lookup(token));

    tracing::debug!(transcript, ?color, ?zone, "interpreted transcript");
    Interpretation { color, zone }
}

#[cfg(test)]
#[path = "../../tests/unit/voice/interpret.rs"]
mod tests;
