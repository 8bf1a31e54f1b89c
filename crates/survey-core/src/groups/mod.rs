//! Field-group validators shared by several object kinds
//!
//! - [`uuidable`]: the `_uuid` identifier
//! - [`start_endable`]: start/end date, time and time period
//! - [`weight`]: the `_weights` array and its methods

pub mod start_endable;
pub mod uuidable;
pub mod weight;

pub(crate) fn group_display_name(display_name: Option<&str>, group: &str) -> String {
    match display_name {
        Some(name) if !name.is_empty() => format!("{name} {group}"),
        _ => group.to_owned(),
    }
}
