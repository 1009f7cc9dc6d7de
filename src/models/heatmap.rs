// Chart-facing derived models

use serde::{Deserialize, Serialize};

use super::RuntimeSource;

/// One heatmap cell: grid coordinates plus the active category id.
/// Recomputed per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapPoint {
    pub time_index: usize,
    pub date_index: usize,
    pub value: i32,
}

/// Everything the chart renderer needs in one response: the date axis
/// (filtered), the time axis, the legend, and the cells.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapGrid {
    pub dates: Vec<String>,
    pub times: Vec<String>,
    pub sources: Vec<RuntimeSource>,
    pub points: Vec<HeatmapPoint>,
}

impl HeatmapGrid {
    /// Grid with empty axes and no cells; served before the first fetch.
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            times: Vec::new(),
            sources: Vec::new(),
            points: Vec::new(),
        }
    }
}

/// Inclusive date range as selected in the dashboard. An empty bound means
/// nothing is selected yet; ordering (`start <= end`) is the range picker's
/// responsibility, not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl DateRange {
    /// True when either bound is missing (the empty-selection sentinel).
    pub fn is_unset(&self) -> bool {
        self.start.is_empty() || self.end.is_empty()
    }
}
