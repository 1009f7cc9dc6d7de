// Domain models

mod heatmap;
mod runtime;

pub use heatmap::{DateRange, HeatmapGrid, HeatmapPoint};
pub use runtime::{RuntimeDataPoint, RuntimeDataResponse, RuntimeMeta, RuntimeSource};
