//! CPU rasterization of coloring grids.

pub(crate) mod grid;
pub(crate) mod text;
