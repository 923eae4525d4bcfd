//! Read-only template catalog: zone matrices, color vocabularies and palette images.

mod color;

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::color::ColorDef;
use crate::foundation::core::{Rgb8, ZoneMatrix};
use crate::foundation::error::{MalathError, MalathResult};

/// Ordered color vocabulary of a template.
///
/// Declaration order matters: voice commands resolve to the first declared name found in
/// the transcript.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorMap {
    entries: Vec<(String, Rgb8)>,
}

impl ColorMap {
    /// Build a color map, rejecting empty or duplicate names.
    pub fn new(entries: impl IntoIterator<Item = (String, Rgb8)>) -> MalathResult<Self> {
        let entries: Vec<(String, Rgb8)> = entries.into_iter().collect();
        let mut seen = HashSet::new();
        for (name, _) in &entries {
            if name.trim().is_empty() {
                return Err(MalathError::validation("color names must be non-empty"));
            }
            if !seen.insert(name.as_str()) {
                return Err(MalathError::validation(format!(
                    "duplicate color name \"{name}\""
                )));
            }
        }
        Ok(Self { entries })
    }

    /// RGB value registered for `name`.
    pub fn get(&self, name: &str) -> Option<Rgb8> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rgb)| *rgb)
    }

    /// `true` when `name` is part of the vocabulary.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Color names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, rgb)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb8)> + '_ {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A predefined coloring template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    /// Catalog key.
    pub name: String,
    /// Zone id grid.
    pub zones: ZoneMatrix,
    /// Color vocabulary.
    pub colors: ColorMap,
    /// Reference to the palette image shown next to the grid.
    pub palette_image: String,
}

/// Read-only source of templates keyed by name.
pub trait TemplateCatalog {
    /// Template names in catalog order.
    fn names(&self) -> Vec<String>;

    /// Look up a template by name.
    fn template(&self, name: &str) -> MalathResult<Template>;
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDef {
    templates: Vec<TemplateDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateDef {
    name: String,
    zones: Vec<Vec<u32>>,
    colors: Vec<ColorEntryDef>,
    #[serde(default)]
    palette: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColorEntryDef {
    name: String,
    rgb: ColorDef,
}

impl TemplateDef {
    fn into_template(self) -> MalathResult<Template> {
        let zones = ZoneMatrix::from_rows(self.zones)
            .map_err(|e| MalathError::validation(format!("template \"{}\": {e}", self.name)))?;
        let colors = ColorMap::new(self.colors.into_iter().map(|c| (c.name, c.rgb.0)))
            .map_err(|e| MalathError::validation(format!("template \"{}\": {e}", self.name)))?;
        if colors.is_empty() {
            return Err(MalathError::validation(format!(
                "template \"{}\" declares no colors",
                self.name
            )));
        }
        Ok(Template {
            name: self.name,
            zones,
            colors,
            palette_image: self.palette,
        })
    }
}

/// Catalog held entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    templates: Vec<Template>,
}

impl InMemoryCatalog {
    /// Build a catalog, rejecting duplicate template names.
    pub fn new(templates: impl IntoIterator<Item = Template>) -> MalathResult<Self> {
        let templates: Vec<Template> = templates.into_iter().collect();
        let mut seen = HashSet::new();
        for t in &templates {
            if !seen.insert(t.name.as_str()) {
                return Err(MalathError::validation(format!(
                    "duplicate template name \"{}\"",
                    t.name
                )));
            }
        }
        Ok(Self { templates })
    }

    /// Parse a JSON catalog document.
    pub fn from_reader<R: std::io::Read>(r: R) -> MalathResult<Self> {
        let def: CatalogDef = serde_json::from_reader(r)
            .map_err(|e| MalathError::serde(format!("parse template catalog JSON: {e}")))?;
        let templates = def
            .templates
            .into_iter()
            .map(TemplateDef::into_template)
            .collect::<MalathResult<Vec<_>>>()?;
        Self::new(templates)
    }

    /// Parse a JSON catalog file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> MalathResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MalathError::validation(format!("open template catalog '{}': {e}", path.display()))
        })?;
        let catalog = Self::from_reader(BufReader::new(f))?;
        tracing::debug!(
            path = %path.display(),
            templates = catalog.templates.len(),
            "loaded template catalog"
        );
        Ok(catalog)
    }

    /// Templates in catalog order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }
}

impl TemplateCatalog for InMemoryCatalog {
    fn names(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.name.clone()).collect()
    }

    fn template(&self, name: &str) -> MalathResult<Template> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or_else(|| MalathError::UnknownTemplate(name.to_owned()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog.rs"]
mod tests;
