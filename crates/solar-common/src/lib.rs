//! Common types shared across the solar irradiation map crates.

pub mod axis;
pub mod cell;
pub mod error;
pub mod record;
pub mod style;

pub use axis::{Axis, AxisBounds};
pub use cell::{CellValue, DecimalSeparator};
pub use error::{SolarMapError, SolarMapResult};
pub use record::RawRecord;
pub use style::{
    ClassBreak, ClassificationScheme, ClassifiedConfig, Color, ColorStop, GradientConfig,
    Interpolation, LegendConfig, ObservedRampConfig, SchemeConfig, SchemeDefinition, StyleError,
    UNKNOWN_COLOR,
};
