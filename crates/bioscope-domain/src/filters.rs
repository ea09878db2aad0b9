//! Search filter descriptor and date handling

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ValidationError;

/// Ephemeral query descriptor for the filter engine.
///
/// List filters are OR-combined within a field and AND-combined across
/// fields. Empty lists and blank strings impose no constraint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub experiment_types: Vec<String>,
    pub organisms: Vec<String>,
    pub space_conditions: Vec<String>,
    pub mission: Option<String>,
    pub date_range: Option<DateRange>,
}

impl SearchFilters {
    /// Filter descriptor carrying only a free-text query
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// The lower-cased query, if one is active
    pub fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// The mission constraint, if one is active
    pub fn active_mission(&self) -> Option<&str> {
        self.mission.as_deref().filter(|m| !m.is_empty())
    }

    /// The date range, if at least one bound is set
    pub fn active_date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref().filter(|r| !r.is_unbounded())
    }

    /// Whether this descriptor passes every record
    pub fn is_empty(&self) -> bool {
        self.normalized_query().is_none()
            && self.experiment_types.is_empty()
            && self.organisms.is_empty()
            && self.space_conditions.is_empty()
            && self.active_mission().is_none()
            && self.active_date_range().is_none()
    }
}

/// Inclusive publication date range. Either bound may be open.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    #[serde(deserialize_with = "deserialize_start_bound")]
    pub start: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "deserialize_end_bound")]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Build a range from raw bound strings
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ValidationError> {
        let start = start
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_date_bound(s, false).ok_or_else(|| invalid_date("dateRange.start", s)))
            .transpose()?;
        let end = end
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_date_bound(s, true).ok_or_else(|| invalid_date("dateRange.end", s)))
            .transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ValidationError::new(
                    "dateRange",
                    "start must not be after end",
                ));
            }
        }

        Ok(Self { start, end })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

fn invalid_date(field: &str, raw: &str) -> ValidationError {
    ValidationError::new(field, format!("invalid date '{}'", raw))
}

/// Parse a timestamp from RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`, or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a range bound. A date-only end bound covers the whole day; past the
/// last representable day it saturates at `DateTime::<Utc>::MAX_UTC`.
pub fn parse_date_bound(raw: &str, is_end: bool) -> Option<DateTime<Utc>> {
    let parsed = parse_timestamp(raw)?;
    if is_end && NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").is_ok() {
        let end_of_day = parsed
            .checked_add_signed(Duration::days(1))
            .and_then(|next| next.checked_sub_signed(Duration::milliseconds(1)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        return Some(end_of_day);
    }
    Some(parsed)
}

/// Deserialize an optional timestamp in any format `parse_timestamp` accepts
pub fn deserialize_flexible_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
    }
}

fn deserialize_start_bound<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_bound(deserializer, false)
}

fn deserialize_end_bound<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_bound(deserializer, true)
}

fn deserialize_bound<'de, D>(deserializer: D, is_end: bool) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date_bound(s, is_end)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
    }
}
