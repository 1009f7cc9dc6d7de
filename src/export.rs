// CSV export of the filtered date range

use crate::models::RuntimeDataResponse;

/// Column layout the dashboard's download button promises.
pub const CSV_HEADER: [&str; 10] = [
    "Date",
    "Time",
    "Source",
    "Description",
    "rtsources",
    "sys_volt",
    "batt_curr",
    "batt_volt",
    "rect_curr",
    "load_curr",
];

/// Render one CSV document: the header plus one row per point across
/// `dates`, in grid order. `Source`/`Description` resolve through the
/// payload legend; an unknown category id leaves them empty. Fields
/// containing commas, quotes, or newlines are quoted with internal quotes
/// doubled (csv writer default).
pub fn to_csv(response: &RuntimeDataResponse, dates: &[String]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(CSV_HEADER)?;

    for date in dates {
        let Some(points) = response.data.get(date) else {
            continue;
        };
        for point in points {
            let source = response.source_by_id(point.rtsources);
            let rtsources = point.rtsources.to_string();
            let sys_volt = point.sys_volt.to_string();
            let batt_curr = point.batt_curr.to_string();
            let batt_volt = point.batt_volt.to_string();
            let rect_curr = point.rect_curr.to_string();
            let load_curr = point.load_curr.to_string();
            writer.write_record([
                date.as_str(),
                point.time.as_str(),
                source.map(|s| s.display.as_str()).unwrap_or(""),
                source.map(|s| s.desc.as_str()).unwrap_or(""),
                rtsources.as_str(),
                sys_volt.as_str(),
                batt_curr.as_str(),
                batt_volt.as_str(),
                rect_curr.as_str(),
                load_curr.as_str(),
            ])?;
        }
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}
