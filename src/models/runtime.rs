// Upstream runtime-data payload models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One power-source category (Unknown/Battery/Solar/Genset combinations).
/// Reference data served by the upstream; `value` is the category id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSource {
    pub value: i32,
    pub display: String,
    pub color: String,
    pub desc: String,
}

/// One time-slot observation. `time` is a local `HH:MM` label; `rtsources`
/// foreign-keys `RuntimeSource::value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeDataPoint {
    pub time: String,
    pub rtsources: i32,
    pub sys_volt: f64,
    pub batt_curr: f64,
    pub batt_volt: f64,
    pub rect_curr: f64,
    pub load_curr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeMeta {
    pub sources: Vec<RuntimeSource>,
}

/// Full upstream payload: the source legend plus per-date slot lists.
/// The date map is a `BTreeMap` so structural equality ignores upstream key
/// order and iteration is already ascending (ISO dates sort
/// lexicographically, which is chronological).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeDataResponse {
    pub meta: RuntimeMeta,
    pub data: BTreeMap<String, Vec<RuntimeDataPoint>>,
}

impl RuntimeDataResponse {
    /// Legend entry for a category id, if the upstream declared one.
    pub fn source_by_id(&self, id: i32) -> Option<&RuntimeSource> {
        self.meta.sources.iter().find(|s| s.value == id)
    }

    /// Total point count across all dates.
    pub fn point_count(&self) -> usize {
        self.data.values().map(Vec::len).sum()
    }
}
