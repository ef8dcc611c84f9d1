//! Charts for the cleaned train table.
//!
//! [`data`] turns columns into chart-ready numbers (grouped counts,
//! histogram bins, density curve, box statistics); [`PlotRenderer`] draws
//! them to PNG files with `plotters`.

pub mod data;
mod render;

pub use render::{PlotKind, PlotRenderer};
