// Model tests: upstream snake_case decode, chart camelCase encode

use heatboard::models::*;

const SAMPLE_PAYLOAD: &str = r##"{
  "meta": {
    "sources": [
      { "value": 1, "display": "Battery", "color": "#f45b5b", "desc": "Battery only" },
      { "value": 2, "display": "Solar", "color": "#90ed7d", "desc": "Solar assisted" }
    ]
  },
  "data": {
    "2024-01-02": [
      { "time": "00:00", "rtsources": 2, "sys_volt": 53.5, "batt_curr": -12.25, "batt_volt": 48.5, "rect_curr": 10.5, "load_curr": 22.75 }
    ],
    "2024-01-01": [
      { "time": "00:00", "rtsources": 1, "sys_volt": 52.5, "batt_curr": -10.25, "batt_volt": 47.5, "rect_curr": 9.5, "load_curr": 20.75 }
    ]
  }
}"##;

#[test]
fn test_response_decodes_documented_payload() {
    let response: RuntimeDataResponse = serde_json::from_str(SAMPLE_PAYLOAD).unwrap();
    assert_eq!(response.meta.sources.len(), 2);
    assert_eq!(response.meta.sources[0].value, 1);
    assert_eq!(response.meta.sources[0].display, "Battery");
    assert_eq!(response.meta.sources[1].color, "#90ed7d");
    assert_eq!(response.data.len(), 2);
    let points = &response.data["2024-01-02"];
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].time, "00:00");
    assert_eq!(points[0].rtsources, 2);
    assert_eq!(points[0].sys_volt, 53.5);
    assert_eq!(points[0].batt_curr, -12.25);
    assert_eq!(points[0].load_curr, 22.75);
}

#[test]
fn test_response_dates_iterate_ascending_after_decode() {
    // Keys arrive newest-first in SAMPLE_PAYLOAD; the map reorders them.
    let response: RuntimeDataResponse = serde_json::from_str(SAMPLE_PAYLOAD).unwrap();
    let dates: Vec<String> = response.data.keys().cloned().collect();
    assert_eq!(dates, ["2024-01-01", "2024-01-02"]);
}

#[test]
fn test_response_equality_ignores_date_key_order() {
    let sorted = r##"{
      "meta": {
        "sources": [
          { "value": 1, "display": "Battery", "color": "#f45b5b", "desc": "Battery only" },
          { "value": 2, "display": "Solar", "color": "#90ed7d", "desc": "Solar assisted" }
        ]
      },
      "data": {
        "2024-01-01": [
          { "time": "00:00", "rtsources": 1, "sys_volt": 52.5, "batt_curr": -10.25, "batt_volt": 47.5, "rect_curr": 9.5, "load_curr": 20.75 }
        ],
        "2024-01-02": [
          { "time": "00:00", "rtsources": 2, "sys_volt": 53.5, "batt_curr": -12.25, "batt_volt": 48.5, "rect_curr": 10.5, "load_curr": 22.75 }
        ]
      }
    }"##;
    let a: RuntimeDataResponse = serde_json::from_str(SAMPLE_PAYLOAD).unwrap();
    let b: RuntimeDataResponse = serde_json::from_str(sorted).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_response_json_roundtrip() {
    let response: RuntimeDataResponse = serde_json::from_str(SAMPLE_PAYLOAD).unwrap();
    let json = serde_json::to_string(&response).unwrap();
    let back: RuntimeDataResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(back, response);
}

#[test]
fn test_source_by_id_and_point_count() {
    let response: RuntimeDataResponse = serde_json::from_str(SAMPLE_PAYLOAD).unwrap();
    assert_eq!(
        response.source_by_id(2).map(|s| s.display.as_str()),
        Some("Solar")
    );
    assert!(response.source_by_id(99).is_none());
    assert_eq!(response.point_count(), 2);
}

#[test]
fn test_heatmap_point_serializes_camel_case() {
    let point = HeatmapPoint {
        time_index: 3,
        date_index: 1,
        value: 2,
    };
    let json = serde_json::to_string(&point).unwrap();
    assert!(json.contains("\"timeIndex\":3"));
    assert!(json.contains("\"dateIndex\":1"));
    assert!(json.contains("\"value\":2"));
}

#[test]
fn test_heatmap_grid_empty_serializes_all_axes() {
    let json = serde_json::to_string(&HeatmapGrid::empty()).unwrap();
    assert!(json.contains("\"dates\":[]"));
    assert!(json.contains("\"times\":[]"));
    assert!(json.contains("\"sources\":[]"));
    assert!(json.contains("\"points\":[]"));
}

#[test]
fn test_date_range_defaults_and_unset_sentinel() {
    let range: DateRange = serde_json::from_str("{}").unwrap();
    assert!(range.is_unset());

    let range: DateRange = serde_json::from_str(r#"{"start":"2024-01-01"}"#).unwrap();
    assert!(range.is_unset());

    let range: DateRange =
        serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#).unwrap();
    assert!(!range.is_unset());
    assert_eq!(range.start, "2024-01-01");
    assert_eq!(range.end, "2024-01-31");
}
