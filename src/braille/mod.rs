//! Braille-dot raster used for every map layer

mod canvas;

pub use canvas::{BrailleCanvas, Tint, BRAILLE_BLANK};
