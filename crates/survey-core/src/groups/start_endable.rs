//! Start/end group: date, time (seconds since midnight) and time period

use super::group_display_name;
use crate::error::ParamsError;
use crate::params::{get_attribute, Params};
use crate::validators;
use chrono::NaiveDate;
use serde_json::Value;

/// Attribute names of the start/end group
pub const START_END_ATTRIBUTES: [&str; 6] = [
    "startDate",
    "startTime",
    "startTimePeriod",
    "endDate",
    "endTime",
    "endTimePeriod",
];

const SECONDS_PER_DAY: i64 = 86_400;

/// Validate the start/end group of a dirty parameter bag
///
/// Errors are reported as `StartEndable`, or `<display_name> StartEndable`.
#[must_use]
pub fn validate_params(dirty: &Value, display_name: Option<&str>) -> Vec<ParamsError> {
    let name = group_display_name(display_name, "StartEndable");
    let mut errors = Vec::new();
    errors.extend(validators::is_date_string("startDate", dirty.get("startDate"), &name));
    errors.extend(validators::is_positive_integer("startTime", dirty.get("startTime"), &name));
    errors.extend(validators::is_string("startTimePeriod", dirty.get("startTimePeriod"), &name));
    errors.extend(validators::is_date_string("endDate", dirty.get("endDate"), &name));
    errors.extend(validators::is_positive_integer("endTime", dirty.get("endTime"), &name));
    errors.extend(validators::is_string("endTimePeriod", dirty.get("endTimePeriod"), &name));
    errors
}

/// Duration between start and end, in seconds
///
/// Both times are required and must be non-negative integers. When both
/// dates are present, whole days between them are added, so overnight
/// activities get a positive duration. An end before the start gives `None`.
#[must_use]
pub fn duration_seconds(attributes: &Params) -> Option<i64> {
    span_seconds(attributes).filter(|seconds| *seconds >= 0)
}

/// Whether the start and end times describe a consistent interval
///
/// `None` when either time is missing, `false` when a time is not a
/// non-negative integer or the end comes before the start.
#[must_use]
pub fn times_are_valid(attributes: &Params) -> Option<bool> {
    let missing = ["startTime", "endTime"]
        .iter()
        .any(|key| attributes.get(*key).map_or(true, Value::is_null));
    if missing {
        return None;
    }
    Some(span_seconds(attributes).is_some_and(|seconds| seconds >= 0))
}

fn span_seconds(attributes: &Params) -> Option<i64> {
    let start_time = i64::try_from(get_attribute::<u64>(attributes, "startTime")?).ok()?;
    let end_time = i64::try_from(get_attribute::<u64>(attributes, "endTime")?).ok()?;
    let start_date = parse_date(attributes, "startDate");
    let end_date = parse_date(attributes, "endDate");
    let days = match (start_date, end_date) {
        (Some(start), Some(end)) => (end - start).num_days(),
        _ => 0,
    };
    Some(days * SECONDS_PER_DAY + end_time - start_time)
}

fn parse_date(attributes: &Params, key: &str) -> Option<NaiveDate> {
    let text: String = get_attribute(attributes, key)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d").ok()
}
