//! Query string decoding for the publication list
//!
//! List filters arrive as repeated keys (`organisms=A&organisms=B`), with or
//! without a `[]` suffix. The date range is accepted either flat
//! (`startDate`/`endDate`) or bracketed (`dateRange[start]`/`dateRange[end]`).

use bioscope_domain::{DateRange, SearchFilters, ValidationError};

pub fn publication_filters(raw: Option<&str>) -> Result<SearchFilters, ValidationError> {
    let mut filters = SearchFilters::default();
    let mut start: Option<String> = None;
    let mut end: Option<String> = None;

    for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        match key.trim_end_matches("[]") {
            "query" => filters.query = Some(value.into_owned()),
            "experimentTypes" => push_value(&mut filters.experiment_types, &value),
            "organisms" => push_value(&mut filters.organisms, &value),
            "spaceConditions" => push_value(&mut filters.space_conditions, &value),
            "mission" => filters.mission = Some(value.into_owned()),
            "startDate" | "dateRange[start]" => start = Some(value.into_owned()),
            "endDate" | "dateRange[end]" => end = Some(value.into_owned()),
            _ => {}
        }
    }

    let range = DateRange::parse(start.as_deref(), end.as_deref())?;
    if !range.is_unbounded() {
        filters.date_range = Some(range);
    }

    Ok(filters)
}

fn push_value(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
