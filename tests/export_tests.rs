// CSV export tests: header, row shape, quoting, legend lookup

use heatboard::export::{CSV_HEADER, to_csv};
use heatboard::models::{RuntimeDataPoint, RuntimeDataResponse, RuntimeMeta, RuntimeSource};
use std::collections::BTreeMap;

fn source(value: i32, display: &str, desc: &str) -> RuntimeSource {
    RuntimeSource {
        value,
        display: display.into(),
        color: "#7cb5ec".into(),
        desc: desc.into(),
    }
}

fn point(time: &str, rtsources: i32) -> RuntimeDataPoint {
    RuntimeDataPoint {
        time: time.into(),
        rtsources,
        sys_volt: 53.5,
        batt_curr: -12.25,
        batt_volt: 48.5,
        rect_curr: 10.5,
        load_curr: 22.75,
    }
}

fn sample_response() -> RuntimeDataResponse {
    let mut data = BTreeMap::new();
    data.insert(
        "2024-01-01".to_string(),
        vec![point("00:00", 1), point("00:30", 2)],
    );
    data.insert(
        "2024-01-02".to_string(),
        vec![point("00:00", 2), point("00:30", 1)],
    );
    RuntimeDataResponse {
        meta: RuntimeMeta {
            sources: vec![
                source(1, "Battery", "Battery only"),
                source(2, "Solar", "Solar assisted"),
            ],
        },
        data,
    }
}

#[test]
fn csv_header_matches_dashboard_columns() {
    assert_eq!(
        CSV_HEADER.join(","),
        "Date,Time,Source,Description,rtsources,sys_volt,batt_curr,batt_volt,rect_curr,load_curr"
    );
    // No dates selected: the document is the header line alone.
    let csv = to_csv(&sample_response(), &[]).unwrap();
    assert_eq!(csv, format!("{}\n", CSV_HEADER.join(",")));
}

#[test]
fn csv_rows_follow_grid_order_with_legend_lookup() {
    let response = sample_response();
    let dates: Vec<String> = response.data.keys().cloned().collect();
    let csv = to_csv(&response, &dates).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[1],
        "2024-01-01,00:00,Battery,Battery only,1,53.5,-12.25,48.5,10.5,22.75"
    );
    assert_eq!(
        lines[2],
        "2024-01-01,00:30,Solar,Solar assisted,2,53.5,-12.25,48.5,10.5,22.75"
    );
    assert_eq!(
        lines[3],
        "2024-01-02,00:00,Solar,Solar assisted,2,53.5,-12.25,48.5,10.5,22.75"
    );
    assert_eq!(
        lines[4],
        "2024-01-02,00:30,Battery,Battery only,1,53.5,-12.25,48.5,10.5,22.75"
    );
}

#[test]
fn csv_quotes_fields_with_commas_quotes_and_newlines() {
    let mut response = sample_response();
    response.meta.sources = vec![
        source(1, "Battery, backup", "the \"quiet\" source"),
        source(2, "Solar", "line one\nline two"),
    ];
    let dates = vec!["2024-01-01".to_string()];
    let csv = to_csv(&response, &dates).unwrap();
    assert!(csv.contains("\"Battery, backup\""));
    assert!(csv.contains("\"the \"\"quiet\"\" source\""));
    assert!(csv.contains("\"line one\nline two\""));
}

#[test]
fn csv_unknown_source_leaves_legend_columns_empty() {
    let mut response = sample_response();
    response
        .data
        .insert("2024-01-03".to_string(), vec![point("00:00", 99)]);
    let dates = vec!["2024-01-03".to_string()];
    let csv = to_csv(&response, &dates).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "2024-01-03,00:00,,,99,53.5,-12.25,48.5,10.5,22.75");
}

#[test]
fn csv_skips_dates_missing_from_payload() {
    let response = sample_response();
    let dates = vec!["2023-12-31".to_string(), "2024-01-01".to_string()];
    let csv = to_csv(&response, &dates).unwrap();
    assert_eq!(csv.lines().count(), 3);
}
