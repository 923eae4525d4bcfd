//! Grayscale preview values for unpainted zones.

use std::collections::BTreeMap;

use crate::foundation::core::{Rgb8, ZoneMatrix};
use crate::foundation::error::{MalathError, MalathResult};

/// Grayscale preview value for zone `index` out of `max_index`.
///
/// Zone 0 is background and always maps to 255. Other zones get
/// `floor(255 / max_index) * index`, so the sequence is non-decreasing in `index`.
pub fn color_for_zone(index: u32, max_index: u32) -> MalathResult<u8> {
    if index == 0 {
        return Ok(255);
    }
    if max_index == 0 {
        return Err(MalathError::ZeroZoneCount);
    }
    let step = 255 / u64::from(max_index);
    let value = step * u64::from(index);
    u8::try_from(value).map_err(|_| MalathError::InvalidGrayscale(value as i64))
}

/// Expand a grayscale value into an RGB triple.
pub fn grayscale_to_rgb(value: i64) -> MalathResult<Rgb8> {
    let v = u8::try_from(value).map_err(|_| MalathError::InvalidGrayscale(value))?;
    Ok(Rgb8::new(v, v, v))
}

/// Zone id to grayscale mapping for one template.
///
/// Defined for exactly the distinct ids of the matrix it was built from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrayscalePalette {
    values: BTreeMap<u32, u8>,
}

impl GrayscalePalette {
    /// Derive the palette for every distinct id in `zones`.
    pub fn for_matrix(zones: &ZoneMatrix) -> MalathResult<Self> {
        Self::for_ids(zones.distinct_ids())
    }

    /// Derive the palette for an explicit id set, scaled by its maximum.
    pub fn for_ids(ids: impl IntoIterator<Item = u32>) -> MalathResult<Self> {
        let ids: Vec<u32> = ids.into_iter().collect();
        let Some(&max) = ids.iter().max() else {
            return Err(MalathError::ZeroZoneCount);
        };
        let values = ids
            .into_iter()
            .map(|id| color_for_zone(id, max).map(|v| (id, v)))
            .collect::<MalathResult<BTreeMap<_, _>>>()?;
        Ok(Self { values })
    }

    /// Grayscale value for `zone`, when the zone is part of the template.
    pub fn get(&self, zone: u32) -> Option<u8> {
        self.values.get(&zone).copied()
    }

    /// Preview color for `zone`, when the zone is part of the template.
    pub fn rgb(&self, zone: u32) -> Option<Rgb8> {
        self.get(zone).map(|v| Rgb8::new(v, v, v))
    }

    /// Number of zones covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when no zone is covered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(zone, grayscale)` pairs in ascending zone order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;
