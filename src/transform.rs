// Payload -> chart-shape derivations. All pure and synchronous; handlers
// call these directly on the held payload.

use crate::models::{HeatmapPoint, RuntimeDataResponse};

/// Every date in the payload, ascending. ISO `YYYY-MM-DD` keys sort
/// lexicographically, which is chronological.
pub fn extract_dates(response: &RuntimeDataResponse) -> Vec<String> {
    response.data.keys().cloned().collect()
}

/// Canonical time axis: the slot labels of the chronologically first date,
/// in their original order. Later dates are assumed to share its
/// cardinality and ordering; see [`find_slot_mismatch`].
pub fn extract_time_slots(response: &RuntimeDataResponse, dates: &[String]) -> Vec<String> {
    let Some(first) = dates.first() else {
        return Vec::new();
    };
    response
        .data
        .get(first)
        .map(|points| points.iter().map(|p| p.time.clone()).collect())
        .unwrap_or_default()
}

/// Inclusive `start <= date <= end` filter over the sorted date list. An
/// empty bound (or an empty input) is the "nothing selected yet" sentinel
/// and yields an empty list, not an error. Bounds are not checked for
/// ordering here.
pub fn filter_dates_by_range(all_dates: &[String], start: &str, end: &str) -> Vec<String> {
    if start.is_empty() || end.is_empty() {
        return Vec::new();
    }
    all_dates
        .iter()
        .filter(|d| d.as_str() >= start && d.as_str() <= end)
        .cloned()
        .collect()
}

/// Flatten the filtered dates into grid cells: per-date then per-slot order
/// with zero-based indices, `value` carrying the active category id. Dates
/// missing from the payload are skipped without emitting anything.
pub fn heatmap_points(
    response: &RuntimeDataResponse,
    filtered_dates: &[String],
) -> Vec<HeatmapPoint> {
    let mut cells = Vec::new();
    for (date_index, date) in filtered_dates.iter().enumerate() {
        let Some(points) = response.data.get(date) else {
            continue;
        };
        for (time_index, point) in points.iter().enumerate() {
            cells.push(HeatmapPoint {
                time_index,
                date_index,
                value: point.rtsources,
            });
        }
    }
    cells
}

/// A date whose slot count differs from the time-axis reference date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMismatch {
    pub date: String,
    pub expected: usize,
    pub actual: usize,
}

/// First date (ascending) whose point count differs from the first date's.
/// Such payloads still render; cells past the reference cardinality
/// misalign in the grid, so the poller logs a warning per accepted payload.
pub fn find_slot_mismatch(response: &RuntimeDataResponse) -> Option<SlotMismatch> {
    let mut per_date = response.data.iter();
    let (_, reference) = per_date.next()?;
    let expected = reference.len();
    for (date, points) in per_date {
        if points.len() != expected {
            return Some(SlotMismatch {
                date: date.clone(),
                expected,
                actual: points.len(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuntimeMeta;
    use std::collections::BTreeMap;

    fn empty_response() -> RuntimeDataResponse {
        RuntimeDataResponse {
            meta: RuntimeMeta { sources: vec![] },
            data: BTreeMap::new(),
        }
    }

    #[test]
    fn empty_payload_yields_empty_axes() {
        let response = empty_response();
        let dates = extract_dates(&response);
        assert!(dates.is_empty());
        assert!(extract_time_slots(&response, &dates).is_empty());
        assert!(find_slot_mismatch(&response).is_none());
    }

    #[test]
    fn unset_range_is_the_empty_selection() {
        let dates = vec!["2024-01-01".to_string()];
        assert!(filter_dates_by_range(&dates, "", "").is_empty());
        assert!(filter_dates_by_range(&dates, "2024-01-01", "").is_empty());
        assert!(filter_dates_by_range(&[], "2024-01-01", "2024-01-02").is_empty());
    }
}
